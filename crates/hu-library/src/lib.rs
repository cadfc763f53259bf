//! Head Unit Library Cache
//!
//! This crate holds the device-side copy of the phone's music library and the
//! small amount of browsing state that survives power cycles.
//!
//! # Architecture
//!
//! - [`CatalogCache`]: four fixed-capacity tables (playlists, artists,
//!   albums, songs) and the [`SongListContext`] that scopes the song table.
//!   Snapshots from the phone replace a table wholesale.
//! - [`Selections`]: the last viewed playlist/artist/album positions, kept in
//!   a [`SelectionStore`] ([`MemoryStore`] or [`JsonFileStore`])
//! - [`FallbackCatalog`]: a fixed demo library shown until remote data arrives;
//!   [`active_catalog`] picks between the two through [`CatalogReader`]
//! - [`paging`]: four-per-page browsing helpers
//!
//! String fields are [`BoundedString`]s: ids hold at most 48 bytes and names
//! 64, and longer values are truncated with a warning.
//!
//! # Example
//!
//! ```rust
//! use hu_library::{CatalogCache, CatalogLimits, CatalogPlaylist};
//!
//! let mut cache = CatalogCache::with_limits(CatalogLimits {
//!     playlists: 2,
//!     ..CatalogLimits::default()
//! });
//!
//! let outcome = cache.replace_playlists([
//!     CatalogPlaylist::new("P1", "A", 10),
//!     CatalogPlaylist::new("P2", "B", 5),
//!     CatalogPlaylist::new("P3", "C", 20),
//! ]);
//! assert_eq!(outcome.rejected, 1);
//! assert_eq!(cache.playlist_by_id("P2").map(|p| p.name.as_str()), Some("B"));
//! assert!(cache.has_remote_data());
//! ```

pub mod bounded;
pub mod cache;
pub mod entities;
pub mod error;
pub mod fallback;
pub mod paging;
pub mod selection;
pub mod table;

pub use bounded::{
    BoundedString, CatalogId, CatalogName, ID_CAPACITY, NAME_CAPACITY, NOW_PLAYING_CAPACITY,
};
pub use cache::{CatalogCache, CatalogLimits};
pub use entities::{
    CatalogAlbum, CatalogArtist, CatalogPlaylist, CatalogRecord, CatalogSong, SongListContext,
};
pub use error::{LibraryError, StoreError};
pub use fallback::{active_catalog, CatalogReader, FallbackCatalog};
pub use paging::ITEMS_PER_PAGE;
pub use selection::{
    JsonFileStore, MemoryStore, SelectionMemory, SelectionStore, Selections,
    SELECTION_NAMESPACE,
};
pub use table::{CatalogTable, CatalogTableKind, ReplaceOutcome};
