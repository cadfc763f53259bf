//! Built-in demo catalog and source selection
//!
//! Until the phone has pushed anything, presentation reads a small fixed
//! catalog instead of the (empty) cache. [`active_catalog`] makes that choice.

use hu_protocol::ContextKind;

use crate::cache::CatalogCache;
use crate::entities::{CatalogAlbum, CatalogArtist, CatalogPlaylist, CatalogSong, CatalogRecord};

/// Read access shared by the cache and the fallback catalog
pub trait CatalogReader {
    fn playlists(&self) -> &[CatalogPlaylist];
    fn artists(&self) -> &[CatalogArtist];
    fn albums(&self) -> &[CatalogAlbum];
    /// Songs of the current list
    fn songs(&self) -> &[CatalogSong];

    fn playlist_count(&self) -> usize {
        self.playlists().len()
    }

    fn playlist(&self, index: usize) -> Option<&CatalogPlaylist> {
        self.playlists().get(index)
    }

    fn playlist_by_id(&self, id: &str) -> Option<&CatalogPlaylist> {
        self.playlists().iter().find(|p| p.id() == id)
    }

    fn artist_count(&self) -> usize {
        self.artists().len()
    }

    fn artist(&self, index: usize) -> Option<&CatalogArtist> {
        self.artists().get(index)
    }

    fn artist_by_id(&self, id: &str) -> Option<&CatalogArtist> {
        self.artists().iter().find(|a| a.id() == id)
    }

    fn album_count(&self) -> usize {
        self.albums().len()
    }

    fn album(&self, index: usize) -> Option<&CatalogAlbum> {
        self.albums().get(index)
    }

    fn album_by_id(&self, id: &str) -> Option<&CatalogAlbum> {
        self.albums().iter().find(|a| a.id() == id)
    }

    fn song_count(&self) -> usize {
        self.songs().len()
    }

    fn song(&self, index: usize) -> Option<&CatalogSong> {
        self.songs().get(index)
    }

    fn song_by_id(&self, id: &str) -> Option<&CatalogSong> {
        self.songs().iter().find(|s| s.id() == id)
    }
}

impl CatalogReader for CatalogCache {
    fn playlists(&self) -> &[CatalogPlaylist] {
        CatalogCache::playlists(self)
    }

    fn artists(&self) -> &[CatalogArtist] {
        CatalogCache::artists(self)
    }

    fn albums(&self) -> &[CatalogAlbum] {
        CatalogCache::albums(self)
    }

    fn songs(&self) -> &[CatalogSong] {
        CatalogCache::songs(self)
    }
}

/// The cache once it holds remote data, the fallback before that
pub fn active_catalog<'a>(
    cache: &'a CatalogCache,
    fallback: &'a FallbackCatalog,
) -> &'a dyn CatalogReader {
    if cache.has_remote_data() {
        cache
    } else {
        fallback
    }
}

// (id, title, artist, album, duration)
const DEMO_SONGS: &[(&str, &str, &str, &str, u16)] = &[
    ("1", "Come Together", "The Beatles", "Abbey Road", 259),
    ("2", "Something", "The Beatles", "Abbey Road", 182),
    ("3", "Here Comes The Sun", "The Beatles", "Abbey Road", 185),
    ("4", "Let It Be", "The Beatles", "Let It Be", 243),
    ("5", "Get Back", "The Beatles", "Let It Be", 191),
    ("6", "Shine On You Crazy Diamond", "Pink Floyd", "Wish You Were Here", 810),
    ("7", "Wish You Were Here", "Pink Floyd", "Wish You Were Here", 334),
    ("8", "Comfortably Numb", "Pink Floyd", "The Wall", 382),
    ("9", "Hey You", "Pink Floyd", "The Wall", 280),
    ("10", "Stairway To Heaven", "Led Zeppelin", "Led Zeppelin IV", 482),
    ("11", "Black Dog", "Led Zeppelin", "Led Zeppelin IV", 296),
    ("12", "Kashmir", "Led Zeppelin", "Physical Graffiti", 517),
    ("13", "Bohemian Rhapsody", "Queen", "A Night at the Opera", 355),
    ("14", "Love of My Life", "Queen", "A Night at the Opera", 219),
    ("15", "We Will Rock You", "Queen", "News of the World", 122),
    ("16", "We Are The Champions", "Queen", "News of the World", 179),
];

// (album, year)
const DEMO_YEARS: &[(&str, u16)] = &[
    ("Abbey Road", 1969),
    ("Let It Be", 1970),
    ("Wish You Were Here", 1975),
    ("The Wall", 1979),
    ("Led Zeppelin IV", 1971),
    ("Physical Graffiti", 1975),
    ("A Night at the Opera", 1975),
    ("News of the World", 1977),
];

// (id, name, song ids)
const DEMO_PLAYLISTS: &[(&str, &str, &[&str])] = &[
    ("1", "Classic Rock", &["1", "8", "10", "13", "15"]),
    ("2", "Chill Vibes", &["3", "7", "14", "4"]),
    ("3", "Road Trip", &["11", "12", "5", "16", "2"]),
    ("4", "Late Night", &["6", "7", "9", "14"]),
];

/// Fixed demo library shown before the phone connects
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    playlists: Vec<CatalogPlaylist>,
    artists: Vec<CatalogArtist>,
    albums: Vec<CatalogAlbum>,
    songs: Vec<CatalogSong>,
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCatalog {
    pub fn new() -> Self {
        let mut songs = Vec::with_capacity(DEMO_SONGS.len());
        let mut albums: Vec<CatalogAlbum> = Vec::new();
        let mut artists: Vec<CatalogArtist> = Vec::new();

        for &(id, title, artist, album, duration) in DEMO_SONGS {
            let track = songs
                .iter()
                .filter(|s: &&CatalogSong| s.album == album)
                .count() as u8
                + 1;
            songs.push(CatalogSong::new(id, title, artist, album, duration, track));

            match albums.iter_mut().find(|a| a.name == album) {
                Some(existing) => existing.song_count += 1,
                None => {
                    let year = DEMO_YEARS
                        .iter()
                        .find(|(name, _)| *name == album)
                        .map_or(0, |(_, year)| *year);
                    let album_id = (albums.len() + 1).to_string();
                    albums.push(CatalogAlbum::new(&album_id, album, artist, 1, year));
                    if let Some(a) = artists.iter_mut().find(|a| a.name == artist) {
                        a.album_count += 1;
                    }
                }
            }

            match artists.iter_mut().find(|a| a.name == artist) {
                Some(existing) => existing.song_count += 1,
                None => {
                    let artist_id = (artists.len() + 1).to_string();
                    artists.push(CatalogArtist::new(&artist_id, artist, 1, 1));
                }
            }
        }

        let playlists = DEMO_PLAYLISTS
            .iter()
            .map(|(id, name, members)| CatalogPlaylist::new(id, name, members.len() as u16))
            .collect();

        Self {
            playlists,
            artists,
            albums,
            songs,
        }
    }

    /// Songs belonging to a playlist, album or artist id
    pub fn songs_for(&self, kind: ContextKind, id: &str) -> Vec<&CatalogSong> {
        match kind {
            ContextKind::None => self.songs.iter().collect(),
            ContextKind::Playlist => DEMO_PLAYLISTS
                .iter()
                .find(|(pid, _, _)| *pid == id)
                .map(|(_, _, members)| {
                    members
                        .iter()
                        .filter_map(|song_id| self.song_by_id(song_id))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
            ContextKind::Album => match self.album_by_id(id) {
                Some(album) => self
                    .songs
                    .iter()
                    .filter(|s| s.album == album.name && s.artist == album.artist)
                    .collect(),
                None => Vec::new(),
            },
            ContextKind::Artist => match self.artist_by_id(id) {
                Some(artist) => self
                    .songs
                    .iter()
                    .filter(|s| s.artist == artist.name)
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

impl CatalogReader for FallbackCatalog {
    fn playlists(&self) -> &[CatalogPlaylist] {
        &self.playlists
    }

    fn artists(&self) -> &[CatalogArtist] {
        &self.artists
    }

    fn albums(&self) -> &[CatalogAlbum] {
        &self.albums
    }

    /// Every demo song
    fn songs(&self) -> &[CatalogSong] {
        &self.songs
    }
}
