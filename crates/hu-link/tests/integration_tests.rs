//! Integration tests for the link session
//!
//! These tests drive a `SyncEngine` through a scripted radio and verify:
//! - Reassembly of snapshots split at arbitrary chunk boundaries
//! - Discarding partial messages on disconnect
//! - Capacity overflow reporting
//! - Outbound navigation messages and their local side effects
//! - Reconnect housekeeping

use std::time::{Duration, Instant};

use hu_library::{CatalogLimits, CatalogTableKind, SongListContext};
use hu_link::{
    LinkConfig, LinkError, LinkEvent, NavigationHandler, RadioEvent, RadioEventSender, RadioStack,
    SyncEngine,
};
use hu_protocol::service::ServiceIdentity;
use hu_protocol::{
    ArtistEntry, ContextKind, FrameDecoder, Message, MessageKind, PlaybackStatus, PlaylistEntry,
    QueryKind, SongEntry, SongList, SongStarted, TransportCommand,
};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Radio stack that records notifications and lets tests inject events
    pub struct ScriptedRadio {
        pub events: Option<RadioEventSender>,
        pub sent: Vec<Vec<u8>>,
        pub mtu: usize,
        pub advertising_starts: usize,
        /// Refuse every notification once this many were accepted
        pub accept_limit: Option<usize>,
    }

    impl ScriptedRadio {
        pub fn new(mtu: usize) -> Self {
            Self {
                events: None,
                sent: Vec::new(),
                mtu,
                advertising_starts: 0,
                accept_limit: None,
            }
        }
    }

    impl RadioStack for ScriptedRadio {
        fn start(
            &mut self,
            _device_name: &str,
            _service: &ServiceIdentity,
            events: RadioEventSender,
        ) {
            self.events = Some(events);
            self.advertising_starts += 1;
        }

        fn start_advertising(&mut self) {
            self.advertising_starts += 1;
        }

        fn notify(&mut self, bytes: &[u8]) -> bool {
            if self.accept_limit.is_some_and(|limit| self.sent.len() >= limit) {
                return false;
            }
            self.sent.push(bytes.to_vec());
            true
        }

        fn mtu(&self) -> usize {
            self.mtu
        }
    }

    pub fn engine_with(config: LinkConfig) -> SyncEngine<ScriptedRadio> {
        let mut engine = SyncEngine::with_config(ScriptedRadio::new(20), config);
        engine.start().unwrap();
        engine
    }

    pub fn connected_engine() -> SyncEngine<ScriptedRadio> {
        let mut engine = engine_with(LinkConfig::default());
        inject(&engine, RadioEvent::Connected);
        engine.tick();
        engine.drain_events();
        engine
    }

    pub fn inject(engine: &SyncEngine<ScriptedRadio>, event: RadioEvent) {
        engine
            .radio()
            .events
            .as_ref()
            .expect("radio started")
            .send(event)
            .expect("session alive");
    }

    pub fn deliver(engine: &mut SyncEngine<ScriptedRadio>, chunks: &[&[u8]]) {
        for chunk in chunks {
            inject(engine, RadioEvent::Received(chunk.to_vec()));
        }
        engine.tick();
    }

    pub fn deliver_message(
        engine: &mut SyncEngine<ScriptedRadio>,
        message: &Message,
        chunk_len: usize,
    ) {
        let bytes = message.encode();
        let chunks: Vec<&[u8]> = bytes.chunks(chunk_len.max(1)).collect();
        deliver(engine, &chunks);
    }

    /// Decode everything the engine has notified so far
    pub fn sent_messages(engine: &SyncEngine<ScriptedRadio>) -> Vec<Message> {
        let mut decoder = FrameDecoder::new();
        for chunk in &engine.radio().sent {
            decoder.push_chunk(chunk);
        }
        let mut out = Vec::new();
        while let Some(frame) = decoder.next_frame() {
            out.push(Message::decode(&frame.unwrap()).unwrap());
        }
        out
    }

    pub fn playlist(id: &str, name: &str, song_count: u16) -> PlaylistEntry {
        PlaylistEntry {
            id: id.into(),
            name: name.into(),
            song_count,
        }
    }

    pub fn songs(prefix: &str, n: usize) -> Vec<SongEntry> {
        (0..n)
            .map(|i| SongEntry {
                id: format!("{}{}", prefix, i),
                title: format!("Title {}", i),
                artist: "Artist".into(),
                album: "Album".into(),
                duration_sec: 180 + i as u16,
                track: i as u8 + 1,
            })
            .collect()
    }
}

use helpers::*;

// ============================================================================
// Reassembly
// ============================================================================

mod reassembly_tests {
    use super::*;

    #[test]
    fn test_three_playlists_in_three_uneven_chunks() {
        let mut engine = connected_engine();
        let msg = Message::PlaylistList(vec![
            playlist("P1", "A", 10),
            playlist("P2", "B", 5),
            playlist("P3", "C", 20),
        ]);
        let bytes = msg.encode();
        let (a, rest) = bytes.split_at(3);
        let (b, c) = rest.split_at(17);

        deliver(&mut engine, &[a, b, c]);

        let cache = engine.cache();
        assert_eq!(cache.playlist_count(), 3);
        assert_eq!(cache.playlist_by_id("P2").unwrap().name, "B");
        assert_eq!(cache.playlist_by_id("P3").unwrap().song_count, 20);
        assert!(cache.has_remote_data());
    }

    #[test]
    fn test_disconnect_discards_partial_song_list() {
        let mut engine = connected_engine();
        let stale = Message::SongList(SongList {
            context: ContextKind::Album,
            context_id: "A1".into(),
            songs: songs("OLD", 6),
        });
        let bytes = stale.encode();
        deliver(&mut engine, &[&bytes[..bytes.len() / 2]]);

        inject(&engine, RadioEvent::Disconnected);
        engine.tick();
        inject(&engine, RadioEvent::Connected);
        engine.tick();

        let fresh = Message::SongList(SongList {
            context: ContextKind::Album,
            context_id: "A1".into(),
            songs: songs("NEW", 2),
        });
        deliver_message(&mut engine, &fresh, 20);

        let cache = engine.cache();
        assert_eq!(cache.song_count(), 2);
        assert!(cache.songs().iter().all(|s| s.id.starts_with("NEW")));
        assert!(!engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, LinkEvent::FrameDropped { .. })));
    }

    #[test]
    fn test_several_frames_in_one_chunk() {
        let mut engine = connected_engine();
        let mut bytes = Message::PlaylistList(vec![playlist("P1", "A", 1)]).encode();
        bytes.extend(
            Message::ArtistList(vec![ArtistEntry {
                id: "R1".into(),
                name: "Queen".into(),
                album_count: 2,
                song_count: 6,
            }])
            .encode(),
        );

        deliver(&mut engine, &[&bytes]);
        assert_eq!(engine.cache().playlist_count(), 1);
        assert_eq!(engine.cache().artist_by_id("R1").unwrap().album_count, 2);
    }

    #[test]
    fn test_oversized_header_dropped_then_resync() {
        let config = LinkConfig {
            max_payload_len: 256,
            ..LinkConfig::default()
        };
        let mut engine = engine_with(config);
        inject(&engine, RadioEvent::Connected);
        engine.tick();

        // Header declaring 1 MiB
        let mut bogus = vec![0xA5, 0x5A, 0x01];
        bogus.extend_from_slice(&(1u32 << 20).to_le_bytes());
        deliver(&mut engine, &[&bogus, b"payload bytes"]);

        deliver_message(
            &mut engine,
            &Message::PlaylistList(vec![playlist("P1", "A", 1)]),
            20,
        );

        assert_eq!(engine.cache().playlist_count(), 1);
        let events = engine.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, LinkEvent::FrameDropped { .. }))
                .count(),
            1
        );
    }
}

// ============================================================================
// Capacity
// ============================================================================

mod capacity_tests {
    use super::*;

    #[test]
    fn test_artist_overflow_reported() {
        let config = LinkConfig {
            limits: CatalogLimits {
                artists: 2,
                ..CatalogLimits::default()
            },
            ..LinkConfig::default()
        };
        let mut engine = engine_with(config);
        inject(&engine, RadioEvent::Connected);
        engine.tick();
        engine.drain_events();

        let artists = (1..=3)
            .map(|i| ArtistEntry {
                id: format!("R{}", i),
                name: format!("Artist {}", i),
                album_count: 1,
                song_count: 1,
            })
            .collect();
        deliver_message(&mut engine, &Message::ArtistList(artists), 20);

        assert_eq!(engine.cache().artist_count(), 2);
        assert_eq!(
            engine.drain_events(),
            vec![LinkEvent::CatalogReplaced {
                table: CatalogTableKind::Artists,
                stored: 2,
                rejected: 1
            }]
        );
    }
    #[test]
    fn test_large_song_list_keeps_first_capacity_songs() {
        let mut engine = connected_engine();
        let songs: Vec<SongEntry> = (0..800)
            .map(|i| SongEntry {
                id: format!("song-{:05}", i),
                title: format!("A reasonably long track title, take {:04}", i),
                artist: "The Long Named Touring Band".into(),
                album: "Live At The Big Arena (Deluxe)".into(),
                duration_sec: 200,
                track: (i % 20) as u8 + 1,
            })
            .collect();
        let message = Message::SongList(SongList {
            context: ContextKind::None,
            context_id: String::new(),
            songs,
        });
        assert!(message.encode().len() > 64 * 1024);

        deliver_message(&mut engine, &message, 180);

        assert_eq!(engine.cache().song_count(), 200);
        assert_eq!(engine.cache().song(199).unwrap().id, "song-00199");
        let events = engine.drain_events();
        assert!(events.contains(&LinkEvent::CatalogReplaced {
            table: CatalogTableKind::Songs,
            stored: 200,
            rejected: 600
        }));
        assert!(!events.iter().any(LinkEvent::is_error));
    }
}

// ============================================================================
// Navigation
// ============================================================================

mod navigation_tests {
    use super::*;

    #[test]
    fn test_query_sets_context_and_clears_songs() {
        let mut engine = connected_engine();
        deliver_message(
            &mut engine,
            &Message::SongList(SongList {
                context: ContextKind::Playlist,
                context_id: "P1".into(),
                songs: songs("S", 3),
            }),
            20,
        );
        assert_eq!(engine.cache().song_count(), 3);

        engine.query(QueryKind::AlbumSongs, "A7");

        let cache = engine.cache();
        assert_eq!(cache.song_count(), 0);
        assert_eq!(cache.song_context().type_name(), "album");
        assert_eq!(cache.song_context().id(), "A7");
        assert_eq!(
            sent_messages(&engine),
            vec![Message::Query {
                kind: QueryKind::AlbumSongs,
                id: "A7".into()
            }]
        );
    }

    #[test]
    fn test_refused_chunk_abandons_message() {
        let mut engine = connected_engine();
        engine.radio_mut().mtu = 8;
        engine.radio_mut().accept_limit = Some(1);

        let result = engine.send_message(&Message::Query {
            kind: QueryKind::AlbumSongs,
            id: "AL-0001".into(),
        });

        assert_eq!(result, Err(LinkError::SendFailed));
        assert_eq!(engine.radio().sent.len(), 1);
        assert_eq!(
            engine.drain_events(),
            vec![LinkEvent::SendDropped(MessageKind::Query)]
        );
    }

    #[test]
    fn test_most_recent_query_wins() {
        let mut engine = connected_engine();
        engine.query(QueryKind::PlaylistSongs, "P1");
        engine.query(QueryKind::PlaylistSongs, "P2");

        // Response to the first query arrives late
        deliver_message(
            &mut engine,
            &Message::SongList(SongList {
                context: ContextKind::Playlist,
                context_id: "P1".into(),
                songs: songs("P1-", 4),
            }),
            20,
        );
        assert_eq!(engine.cache().song_count(), 0);

        deliver_message(
            &mut engine,
            &Message::SongList(SongList {
                context: ContextKind::Playlist,
                context_id: "P2".into(),
                songs: songs("P2-", 2),
            }),
            20,
        );
        assert_eq!(engine.cache().song_count(), 2);

        let events = engine.drain_events();
        assert!(events.contains(&LinkEvent::SongListIgnored {
            expected: SongListContext::new(ContextKind::Playlist, "P2"),
            received: SongListContext::new(ContextKind::Playlist, "P1"),
        }));
    }

    #[test]
    fn test_request_play_is_chunked_to_mtu() {
        let mut engine = connected_engine();
        deliver_message(
            &mut engine,
            &Message::SongList(SongList {
                context: ContextKind::Artist,
                context_id: "R1".into(),
                songs: songs("S", 2),
            }),
            20,
        );

        engine.radio_mut().mtu = 8;
        engine.request_play("S1", ContextKind::Artist, "R1", 1);

        assert!(engine.radio().sent.iter().all(|c| c.len() <= 8));
        assert!(engine.radio().sent.len() > 1);
        assert!(matches!(
            sent_messages(&engine).as_slice(),
            [Message::PlayRequest(req)] if req.song_id == "S1" && req.index == 1
        ));

        let playback = engine.playback();
        assert!(playback.playing);
        assert_eq!(playback.progress_sec, 0);
        assert_eq!(
            playback.current.as_ref().map(|c| c.title.as_str()),
            Some("Title 1")
        );
    }

    #[test]
    fn test_commands_when_disconnected_are_dropped() {
        let mut engine = engine_with(LinkConfig::default());
        engine.send_command(TransportCommand::NextSong);

        assert!(engine.radio().sent.is_empty());
        assert_eq!(
            engine.send_message(&Message::Command(TransportCommand::PrevSong)),
            Err(LinkError::NotConnected)
        );
        assert!(engine
            .drain_events()
            .iter()
            .all(|e| matches!(e, LinkEvent::SendDropped(_))));
    }

    #[test]
    fn test_play_pause_toggles_optimistically() {
        let mut engine = connected_engine();
        engine.send_command(TransportCommand::PlayPause);
        assert!(engine.playback().playing);
        engine.send_command(TransportCommand::PlayPause);
        assert!(!engine.playback().playing);
        assert_eq!(sent_messages(&engine).len(), 2);
    }
}

// ============================================================================
// Playback and Lifecycle
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_song_started_and_status() {
        let mut engine = connected_engine();
        deliver_message(
            &mut engine,
            &Message::SongStarted(SongStarted {
                song_id: "S5".into(),
                title: "Bohemian Rhapsody".into(),
                artist: "Queen".into(),
                album: "A Night at the Opera".into(),
                duration_sec: 355,
                playing: true,
                progress_sec: 3,
            }),
            20,
        );
        deliver_message(
            &mut engine,
            &Message::PlaybackState(PlaybackStatus {
                playing: true,
                progress_sec: 60,
                shuffle: false,
                repeat: true,
            }),
            20,
        );

        let playback = engine.playback();
        assert_eq!(playback.progress_sec, 60);
        assert!(playback.repeat);
        assert_eq!(
            engine.drain_events(),
            vec![
                LinkEvent::SongStarted {
                    song_id: "S5".into()
                },
                LinkEvent::PlaybackChanged
            ]
        );
        // Playback messages never touch the catalog
        assert!(!engine.cache().has_remote_data());
    }

    #[test]
    fn test_advertising_restarts_after_disconnect() {
        let mut engine = connected_engine();
        let t0 = Instant::now();
        let starts = engine.radio().advertising_starts;

        inject(&engine, RadioEvent::Disconnected);
        engine.tick_at(t0);
        assert!(!engine.is_connected());
        engine.tick_at(t0 + Duration::from_millis(200));
        assert_eq!(engine.radio().advertising_starts, starts);

        engine.tick_at(t0 + Duration::from_millis(600));
        assert_eq!(engine.radio().advertising_starts, starts + 1);
        assert_eq!(
            engine.drain_events(),
            vec![LinkEvent::Disconnected, LinkEvent::AdvertisingRestarted]
        );
    }

    #[test]
    fn test_cache_survives_disconnect() {
        let mut engine = connected_engine();
        deliver_message(
            &mut engine,
            &Message::PlaylistList(vec![playlist("P1", "A", 1)]),
            20,
        );
        inject(&engine, RadioEvent::Disconnected);
        engine.tick();
        assert_eq!(engine.cache().playlist_count(), 1);

        engine.reset_cache();
        assert!(!engine.cache().has_remote_data());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn playlist_entry() -> impl Strategy<Value = PlaylistEntry> {
        ("[A-Z][0-9]{1,6}", "\\PC{0,40}", any::<u16>()).prop_map(|(id, name, song_count)| {
            PlaylistEntry {
                id,
                name,
                song_count,
            }
        })
    }

    /// Split `bytes` at the given cut points
    fn split_at_cuts(bytes: &[u8], mut cuts: Vec<usize>) -> Vec<Vec<u8>> {
        cuts.iter_mut().for_each(|c| *c %= bytes.len() + 1);
        cuts.sort_unstable();
        cuts.dedup();

        let mut chunks = Vec::new();
        let mut start = 0;
        for cut in cuts {
            if cut > start {
                chunks.push(bytes[start..cut].to_vec());
                start = cut;
            }
        }
        chunks.push(bytes[start..].to_vec());
        chunks
    }

    proptest! {
        #[test]
        fn playlist_list_independent_of_chunking(
            entries in prop::collection::vec(playlist_entry(), 0..12),
            cuts in prop::collection::vec(any::<usize>(), 0..16),
        ) {
            let msg = Message::PlaylistList(entries);
            let bytes = msg.encode();

            let mut whole = connected_engine();
            deliver(&mut whole, &[&bytes]);

            let mut split = connected_engine();
            let chunks = split_at_cuts(&bytes, cuts);
            let refs: Vec<&[u8]> = chunks.iter().map(Vec::as_slice).collect();
            deliver(&mut split, &refs);

            prop_assert_eq!(whole.cache().playlists(), split.cache().playlists());
            prop_assert_eq!(split.cache().playlist_count(), whole.cache().playlist_count());
        }

        #[test]
        fn snapshot_stores_at_most_capacity(count in 0usize..30, capacity in 0usize..12) {
            let config = LinkConfig {
                limits: CatalogLimits { playlists: capacity, ..CatalogLimits::default() },
                ..LinkConfig::default()
            };
            let mut engine = engine_with(config);
            inject(&engine, RadioEvent::Connected);
            engine.tick();

            let entries = (0..count)
                .map(|i| playlist(&format!("P{}", i), "x", 1))
                .collect();
            deliver_message(&mut engine, &Message::PlaylistList(entries), 20);

            prop_assert_eq!(engine.cache().playlist_count(), count.min(capacity));
        }
    }
}
