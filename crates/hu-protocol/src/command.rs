//! Enumerated field values shared by both link directions
//!
//! Each enum has a one-byte wire code (`code`/`TryFrom<u8>`) and the textual
//! name the phone application uses for it (`as_str`).

use crate::error::ParseError;

/// Which catalog entity a song list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContextKind {
    /// No scope; songs were pushed without a query
    #[default]
    None,
    Playlist,
    Album,
    Artist,
}

impl ContextKind {
    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Playlist => 1,
            Self::Album => 2,
            Self::Artist => 3,
        }
    }

    /// Lowercase name, empty for [`ContextKind::None`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Playlist => "playlist",
            Self::Album => "album",
            Self::Artist => "artist",
        }
    }

    /// Parse the lowercase name; unknown and empty names map to `None`
    pub fn from_name(name: &str) -> Self {
        match name {
            "playlist" => Self::Playlist,
            "album" => Self::Album,
            "artist" => Self::Artist,
            _ => Self::None,
        }
    }
}

impl TryFrom<u8> for ContextKind {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Playlist),
            2 => Ok(Self::Album),
            3 => Ok(Self::Artist),
            code => Err(ParseError::InvalidCode {
                field: "context",
                code,
            }),
        }
    }
}

/// Song list requests the head unit can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryKind {
    /// QUERY_PLAYLIST_SONGS
    PlaylistSongs,
    /// QUERY_ALBUM_SONGS
    AlbumSongs,
    /// QUERY_ARTIST_SONGS
    ArtistSongs,
}

impl QueryKind {
    pub fn code(&self) -> u8 {
        match self {
            Self::PlaylistSongs => 1,
            Self::AlbumSongs => 2,
            Self::ArtistSongs => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaylistSongs => "QUERY_PLAYLIST_SONGS",
            Self::AlbumSongs => "QUERY_ALBUM_SONGS",
            Self::ArtistSongs => "QUERY_ARTIST_SONGS",
        }
    }

    /// The song list context a response to this query will carry
    pub fn context(&self) -> ContextKind {
        match self {
            Self::PlaylistSongs => ContextKind::Playlist,
            Self::AlbumSongs => ContextKind::Album,
            Self::ArtistSongs => ContextKind::Artist,
        }
    }
}

impl TryFrom<u8> for QueryKind {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::PlaylistSongs),
            2 => Ok(Self::AlbumSongs),
            3 => Ok(Self::ArtistSongs),
            code => Err(ParseError::InvalidCode {
                field: "query",
                code,
            }),
        }
    }
}

/// Playback transport controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportCommand {
    /// PLAY_PAUSE
    PlayPause,
    /// NEXT_SONG
    NextSong,
    /// PREV_SONG
    PrevSong,
}

impl TransportCommand {
    pub fn code(&self) -> u8 {
        match self {
            Self::PlayPause => 1,
            Self::NextSong => 2,
            Self::PrevSong => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayPause => "PLAY_PAUSE",
            Self::NextSong => "NEXT_SONG",
            Self::PrevSong => "PREV_SONG",
        }
    }
}

impl TryFrom<u8> for TransportCommand {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::PlayPause),
            2 => Ok(Self::NextSong),
            3 => Ok(Self::PrevSong),
            code => Err(ParseError::InvalidCode {
                field: "command",
                code,
            }),
        }
    }
}
