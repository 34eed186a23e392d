//! Two-column numbered listings.
//!
//! `n` items are split into a left column of `ceil(n / 2)` items numbered
//! from 1 and a right column continuing the numbering.

/// One printed line: 0-based indices of the items it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub left: usize,
    pub right: Option<usize>,
}

pub fn rows(n: usize) -> Vec<Row> {
    let half = n.div_ceil(2);
    (0..half)
        .map(|left| Row {
            left,
            right: Some(left + half).filter(|&r| r < n),
        })
        .collect()
}

/// Renders `titles` as numbered columns. The left column is padded to
/// `column_width` characters.
pub fn render<S: AsRef<str>>(titles: &[S], column_width: usize) -> String {
    let number_width = titles.len().to_string().len();
    let mut out = String::new();

    for row in rows(titles.len()) {
        let left = titles[row.left].as_ref();
        out.push_str(&format!("{:>number_width$}. {left}", row.left + 1));

        if let Some(right) = row.right {
            let gap = column_width.saturating_sub(left.chars().count()).max(1);
            out.push_str(&" ".repeat(gap));
            out.push_str(&format!(
                "{:>number_width$}. {}",
                right + 1,
                titles[right].as_ref()
            ));
        }
        out.push('\n');
    }

    out
}
