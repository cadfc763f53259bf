//! Bounded catalog cache
//!
//! Four fixed-capacity tables mirrored from the phone, plus the context tag
//! that scopes the song table. Snapshots replace a table wholesale; the song
//! table only ever holds the songs of one context.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{CatalogAlbum, CatalogArtist, CatalogPlaylist, CatalogSong, SongListContext};
use crate::error::LibraryError;
use crate::table::{CatalogTable, CatalogTableKind, ReplaceOutcome};

/// Maximum records per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogLimits {
    pub playlists: usize,
    pub artists: usize,
    pub albums: usize,
    pub songs: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            playlists: 50,
            artists: 100,
            albums: 100,
            songs: 200,
        }
    }
}

/// The device's copy of the phone's library
#[derive(Debug, Clone)]
pub struct CatalogCache {
    limits: CatalogLimits,
    playlists: CatalogTable<CatalogPlaylist>,
    artists: CatalogTable<CatalogArtist>,
    albums: CatalogTable<CatalogAlbum>,
    songs: CatalogTable<CatalogSong>,
    song_context: SongListContext,
    has_remote_data: bool,
    generation: u64,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    /// Create an empty cache with default limits
    pub fn new() -> Self {
        Self::with_limits(CatalogLimits::default())
    }

    pub fn with_limits(limits: CatalogLimits) -> Self {
        Self {
            limits,
            playlists: CatalogTable::new(CatalogTableKind::Playlists, limits.playlists),
            artists: CatalogTable::new(CatalogTableKind::Artists, limits.artists),
            albums: CatalogTable::new(CatalogTableKind::Albums, limits.albums),
            songs: CatalogTable::new(CatalogTableKind::Songs, limits.songs),
            song_context: SongListContext::none(),
            has_remote_data: false,
            generation: 0,
        }
    }

    pub fn limits(&self) -> CatalogLimits {
        self.limits
    }

    fn record_added(&mut self) {
        self.has_remote_data = true;
        self.generation += 1;
    }

    fn record_replaced(&mut self, kind: CatalogTableKind, outcome: ReplaceOutcome) {
        if outcome.stored > 0 {
            self.has_remote_data = true;
        }
        self.generation += 1;
        debug!("Replaced {}: {} stored", kind, outcome.stored);
    }

    // Playlists

    pub fn add_playlist(&mut self, playlist: CatalogPlaylist) -> Result<(), LibraryError> {
        self.playlists.push(playlist)?;
        self.record_added();
        Ok(())
    }

    pub fn clear_playlists(&mut self) {
        self.playlists.clear();
        self.generation += 1;
    }

    pub fn replace_playlists<I>(&mut self, playlists: I) -> ReplaceOutcome
    where
        I: IntoIterator<Item = CatalogPlaylist>,
    {
        let outcome = self.playlists.replace_with(playlists);
        self.record_replaced(self.playlists.kind(), outcome);
        outcome
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    pub fn playlist(&self, index: usize) -> Option<&CatalogPlaylist> {
        self.playlists.get(index)
    }

    pub fn playlist_by_id(&self, id: &str) -> Option<&CatalogPlaylist> {
        self.playlists.find(id)
    }

    pub fn playlists(&self) -> &[CatalogPlaylist] {
        self.playlists.as_slice()
    }

    // Artists

    pub fn add_artist(&mut self, artist: CatalogArtist) -> Result<(), LibraryError> {
        self.artists.push(artist)?;
        self.record_added();
        Ok(())
    }

    pub fn clear_artists(&mut self) {
        self.artists.clear();
        self.generation += 1;
    }

    pub fn replace_artists<I>(&mut self, artists: I) -> ReplaceOutcome
    where
        I: IntoIterator<Item = CatalogArtist>,
    {
        let outcome = self.artists.replace_with(artists);
        self.record_replaced(self.artists.kind(), outcome);
        outcome
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn artist(&self, index: usize) -> Option<&CatalogArtist> {
        self.artists.get(index)
    }

    pub fn artist_by_id(&self, id: &str) -> Option<&CatalogArtist> {
        self.artists.find(id)
    }

    pub fn artists(&self) -> &[CatalogArtist] {
        self.artists.as_slice()
    }

    // Albums

    pub fn add_album(&mut self, album: CatalogAlbum) -> Result<(), LibraryError> {
        self.albums.push(album)?;
        self.record_added();
        Ok(())
    }

    pub fn clear_albums(&mut self) {
        self.albums.clear();
        self.generation += 1;
    }

    pub fn replace_albums<I>(&mut self, albums: I) -> ReplaceOutcome
    where
        I: IntoIterator<Item = CatalogAlbum>,
    {
        let outcome = self.albums.replace_with(albums);
        self.record_replaced(self.albums.kind(), outcome);
        outcome
    }

    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    pub fn album(&self, index: usize) -> Option<&CatalogAlbum> {
        self.albums.get(index)
    }

    pub fn album_by_id(&self, id: &str) -> Option<&CatalogAlbum> {
        self.albums.find(id)
    }

    pub fn albums(&self) -> &[CatalogAlbum] {
        self.albums.as_slice()
    }

    // Songs

    pub fn add_song(&mut self, song: CatalogSong) -> Result<(), LibraryError> {
        self.songs.push(song)?;
        self.record_added();
        Ok(())
    }

    /// Empty the song table; the song context is left as is
    pub fn clear_songs(&mut self) {
        self.songs.clear();
        self.generation += 1;
    }

    pub fn replace_songs<I>(&mut self, songs: I) -> ReplaceOutcome
    where
        I: IntoIterator<Item = CatalogSong>,
    {
        let outcome = self.songs.replace_with(songs);
        self.record_replaced(self.songs.kind(), outcome);
        outcome
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn song(&self, index: usize) -> Option<&CatalogSong> {
        self.songs.get(index)
    }

    pub fn song_by_id(&self, id: &str) -> Option<&CatalogSong> {
        self.songs.find(id)
    }

    pub fn songs(&self) -> &[CatalogSong] {
        self.songs.as_slice()
    }

    // Song context

    pub fn set_song_context(&mut self, context: SongListContext) {
        debug!(
            "Song context set to {} {:?}",
            context.type_name(),
            context.id()
        );
        self.song_context = context;
        self.generation += 1;
    }

    pub fn song_context(&self) -> &SongListContext {
        &self.song_context
    }

    // Whole cache

    /// True once any record was stored since the last [`reset`](Self::reset)
    pub fn has_remote_data(&self) -> bool {
        self.has_remote_data
    }

    /// Changes on every mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Empty every table and forget the song context
    pub fn reset(&mut self) {
        self.playlists.clear();
        self.artists.clear();
        self.albums.clear();
        self.songs.clear();
        self.song_context = SongListContext::none();
        self.has_remote_data = false;
        self.generation += 1;
    }
}
