//! Integration tests for the library cache
//!
//! These tests exercise the public surface the link layer and presentation
//! use:
//! - Capacity limits on every table
//! - Clearing and replacement semantics
//! - Song list context tagging
//! - Selection memory persistence across restarts

use hu_library::{
    CatalogAlbum, CatalogArtist, CatalogCache, CatalogLimits, CatalogPlaylist, CatalogSong,
    LibraryError, MemoryStore, SelectionMemory, Selections, SongListContext,
};
use hu_protocol::ContextKind;

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub fn playlist(n: usize) -> CatalogPlaylist {
        CatalogPlaylist::new(&format!("P{}", n), &format!("Playlist {}", n), n as u16)
    }

    pub fn song(n: usize) -> CatalogSong {
        CatalogSong::new(
            &format!("S{}", n),
            &format!("Song {}", n),
            "Artist",
            "Album",
            200,
            (n % 20) as u8 + 1,
        )
    }
}

// ============================================================================
// Capacity
// ============================================================================

mod capacity_tests {
    use super::*;

    #[test]
    fn test_artist_capacity_two() {
        let mut cache = CatalogCache::with_limits(CatalogLimits {
            artists: 2,
            ..CatalogLimits::default()
        });

        cache
            .add_artist(CatalogArtist::new("R1", "One", 1, 10))
            .unwrap();
        cache
            .add_artist(CatalogArtist::new("R2", "Two", 2, 20))
            .unwrap();
        let third = cache.add_artist(CatalogArtist::new("R3", "Three", 3, 30));

        assert!(matches!(
            third,
            Err(LibraryError::CapacityExceeded { capacity: 2, .. })
        ));
        assert_eq!(cache.artist_count(), 2);
        assert!(cache.artist_by_id("R3").is_none());
    }

    #[test]
    fn test_default_playlist_capacity() {
        let mut cache = CatalogCache::new();
        for n in 0..50 {
            cache.add_playlist(helpers::playlist(n)).unwrap();
        }
        assert!(cache.add_playlist(helpers::playlist(50)).is_err());
        assert_eq!(cache.playlist_count(), 50);
        assert_eq!(cache.playlist(49).map(|p| p.id.as_str()), Some("P49"));
    }

    #[test]
    fn test_replace_songs_truncates_at_capacity() {
        let mut cache = CatalogCache::with_limits(CatalogLimits {
            songs: 3,
            ..CatalogLimits::default()
        });
        let outcome = cache.replace_songs((0..5).map(helpers::song));
        assert_eq!(outcome.stored, 3);
        assert_eq!(outcome.rejected, 2);
        assert_eq!(cache.song_count(), 3);
    }
}

// ============================================================================
// Clearing and Lookup
// ============================================================================

mod lookup_tests {
    use super::*;

    #[test]
    fn test_clear_then_get_is_none() {
        let mut cache = CatalogCache::new();
        cache
            .add_album(CatalogAlbum::new("A1", "Abbey Road", "The Beatles", 17, 1969))
            .unwrap();
        cache.clear_albums();

        assert_eq!(cache.album_count(), 0);
        assert!(cache.album(0).is_none());
        assert!(cache.album_by_id("A1").is_none());
    }

    #[test]
    fn test_replace_never_merges() {
        let mut cache = CatalogCache::new();
        cache.replace_playlists((0..3).map(helpers::playlist));
        cache.replace_playlists([helpers::playlist(7)]);

        assert_eq!(cache.playlist_count(), 1);
        assert!(cache.playlist_by_id("P0").is_none());
        assert!(cache.playlist_by_id("P7").is_some());
    }

    #[test]
    fn test_index_past_count() {
        let mut cache = CatalogCache::new();
        cache.add_song(helpers::song(1)).unwrap();
        assert!(cache.song(1).is_none());
        assert!(cache.song_by_id("missing").is_none());
    }

    #[test]
    fn test_song_context_round_trip() {
        let mut cache = CatalogCache::new();
        cache.set_song_context(SongListContext::new(ContextKind::Album, "A1"));

        let ctx = cache.song_context();
        assert_eq!(ctx.type_name(), "album");
        assert_eq!(ctx.id(), "A1");
    }
}

// ============================================================================
// Selection Memory
// ============================================================================

mod selection_tests {
    use super::*;

    #[test]
    fn test_save_restart_load() {
        let mut selections = Selections::new(MemoryStore::new());
        selections.load_selections();
        selections.select_playlist(12).unwrap();
        selections.select_album(4).unwrap();

        let store = selections.into_store();
        let mut after_reboot = Selections::new(store);
        assert_eq!(
            after_reboot.load_selections(),
            SelectionMemory {
                last_playlist: 12,
                last_artist: 0,
                last_album: 4,
            }
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn adds_beyond_capacity_are_rejected(capacity in 0usize..20, extra in 1usize..10) {
            let mut cache = CatalogCache::with_limits(CatalogLimits {
                playlists: capacity,
                ..CatalogLimits::default()
            });

            for n in 0..capacity {
                prop_assert!(cache.add_playlist(helpers::playlist(n)).is_ok());
            }
            for n in 0..extra {
                prop_assert!(cache.add_playlist(helpers::playlist(capacity + n)).is_err());
            }
            prop_assert_eq!(cache.playlist_count(), capacity);
        }

        #[test]
        fn replace_stores_min_of_count_and_capacity(count in 0usize..40, capacity in 0usize..20) {
            let mut cache = CatalogCache::with_limits(CatalogLimits {
                songs: capacity,
                ..CatalogLimits::default()
            });
            let outcome = cache.replace_songs((0..count).map(helpers::song));

            prop_assert_eq!(outcome.stored, count.min(capacity));
            prop_assert_eq!(outcome.stored + outcome.rejected, count);
            prop_assert_eq!(cache.song_count(), outcome.stored);
            prop_assert_eq!(cache.has_remote_data(), outcome.stored > 0);
        }

        #[test]
        fn long_names_are_truncated_to_capacity(name in "\\PC{0,120}") {
            let playlist = CatalogPlaylist::new("P", &name, 0);
            prop_assert!(playlist.name.len() <= 64);
            prop_assert!(name.starts_with(playlist.name.as_str()));
        }
    }
}
