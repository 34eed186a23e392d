//! Validation of operator input.

/// Case-insensitive token that leaves a selection loop.
pub const CANCEL_TOKEN: &str = "done";

/// True iff `input` is all ASCII digits and its value lies in `low..=high`.
pub fn validate_numeric(input: &str, low: usize, high: usize) -> bool {
    parse_choice(input, low, high).is_some()
}

/// Parses `input` the way `validate_numeric` checks it.
pub fn parse_choice(input: &str, low: usize, high: usize) -> Option<usize> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (low..=high).contains(n))
}

pub fn is_cancel(input: &str) -> bool {
    input.eq_ignore_ascii_case(CANCEL_TOKEN)
}

/// Playlist names become file names, so only letters and digits are allowed.
pub fn is_valid_playlist_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_alphanumeric)
}
