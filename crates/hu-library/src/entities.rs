//! Catalog records mirrored from the phone
//!
//! Names that belong to another entity (a song's album, an album's artist)
//! are stored as copies, not references.

use hu_protocol::{AlbumEntry, ArtistEntry, ContextKind, PlaylistEntry, SongEntry};

use crate::bounded::{CatalogId, CatalogName};

/// Records addressable by their opaque id
pub trait CatalogRecord {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPlaylist {
    pub id: CatalogId,
    pub name: CatalogName,
    /// Informational; the song table is loaded separately
    pub song_count: u16,
}

impl CatalogPlaylist {
    pub fn new(id: &str, name: &str, song_count: u16) -> Self {
        Self {
            id: CatalogId::truncating(id),
            name: CatalogName::truncating(name),
            song_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogArtist {
    pub id: CatalogId,
    pub name: CatalogName,
    pub album_count: u8,
    pub song_count: u16,
}

impl CatalogArtist {
    pub fn new(id: &str, name: &str, album_count: u8, song_count: u16) -> Self {
        Self {
            id: CatalogId::truncating(id),
            name: CatalogName::truncating(name),
            album_count,
            song_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogAlbum {
    pub id: CatalogId,
    pub name: CatalogName,
    pub artist: CatalogName,
    pub song_count: u8,
    pub year: u16,
}

impl CatalogAlbum {
    pub fn new(id: &str, name: &str, artist: &str, song_count: u8, year: u16) -> Self {
        Self {
            id: CatalogId::truncating(id),
            name: CatalogName::truncating(name),
            artist: CatalogName::truncating(artist),
            song_count,
            year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSong {
    pub id: CatalogId,
    pub title: CatalogName,
    pub artist: CatalogName,
    pub album: CatalogName,
    pub duration_sec: u16,
    pub track: u8,
}

impl CatalogSong {
    pub fn new(
        id: &str,
        title: &str,
        artist: &str,
        album: &str,
        duration_sec: u16,
        track: u8,
    ) -> Self {
        Self {
            id: CatalogId::truncating(id),
            title: CatalogName::truncating(title),
            artist: CatalogName::truncating(artist),
            album: CatalogName::truncating(album),
            duration_sec,
            track,
        }
    }
}

macro_rules! impl_catalog_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CatalogRecord for $ty {
                fn id(&self) -> &str {
                    self.id.as_str()
                }
            }
        )*
    };
}

impl_catalog_record!(CatalogPlaylist, CatalogArtist, CatalogAlbum, CatalogSong);

impl From<&PlaylistEntry> for CatalogPlaylist {
    fn from(entry: &PlaylistEntry) -> Self {
        Self::new(&entry.id, &entry.name, entry.song_count)
    }
}

impl From<&ArtistEntry> for CatalogArtist {
    fn from(entry: &ArtistEntry) -> Self {
        Self::new(&entry.id, &entry.name, entry.album_count, entry.song_count)
    }
}

impl From<&AlbumEntry> for CatalogAlbum {
    fn from(entry: &AlbumEntry) -> Self {
        Self::new(
            &entry.id,
            &entry.name,
            &entry.artist,
            entry.song_count,
            entry.year,
        )
    }
}

impl From<&SongEntry> for CatalogSong {
    fn from(entry: &SongEntry) -> Self {
        Self::new(
            &entry.id,
            &entry.title,
            &entry.artist,
            &entry.album,
            entry.duration_sec,
            entry.track,
        )
    }
}

/// Which entity the song table currently belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongListContext {
    kind: ContextKind,
    id: CatalogId,
}

impl SongListContext {
    pub fn new(kind: ContextKind, id: &str) -> Self {
        Self {
            kind,
            id: CatalogId::truncating(id),
        }
    }

    /// No context; songs were not requested for any entity
    pub fn none() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// `"playlist"`, `"album"`, `"artist"` or `""`
    pub fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn is_none(&self) -> bool {
        self.kind == ContextKind::None
    }

    pub fn matches(&self, kind: ContextKind, id: &str) -> bool {
        self.kind == kind && self.id == id
    }
}
