use std::{
    ffi::OsString,
    fmt::{self, Display},
    path::Path,
};

/// The kinds of things the external player can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Track,
    Playlist,
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Track => write!(f, "track"),
            ItemKind::Playlist => write!(f, "playlist"),
        }
    }
}

/// Something with a title that the external player knows how to play.
pub trait Playable {
    fn kind(&self) -> ItemKind;

    fn title(&self) -> &str;

    fn path(&self) -> &Path;

    /// Argument handed to the player binary to select this item.
    ///
    /// Tracks use `--file=<path>`, playlists use `--playlist<path>` with no
    /// separator; the player parses them exactly like that.
    fn player_arg(&self) -> OsString {
        let flag = match self.kind() {
            ItemKind::Track => "--file=",
            ItemKind::Playlist => "--playlist",
        };
        let mut arg = OsString::from(flag);
        arg.push(self.path().as_os_str());
        arg
    }
}
