//! Events the link session reports to presentation
//!
//! Events are buffered by the [`SyncEngine`](crate::SyncEngine) and handed
//! out through `drain_events`, in the order they happened.

use hu_library::{CatalogTableKind, SongListContext};
use hu_protocol::{MessageKind, TransportCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    // -------------------------------------------------------------------------
    // Connection lifecycle
    // -------------------------------------------------------------------------
    /// A phone connected
    Connected,

    /// The phone disconnected; any partial message was discarded
    Disconnected,

    /// Advertising restarted after the reconnect grace period
    AdvertisingRestarted,

    // -------------------------------------------------------------------------
    // Catalog changes
    // -------------------------------------------------------------------------
    /// A table was replaced by a snapshot
    CatalogReplaced {
        table: CatalogTableKind,
        stored: usize,
        /// Records dropped because the table was full
        rejected: usize,
    },

    /// A song list for a context other than the one last queried arrived
    SongListIgnored {
        expected: SongListContext,
        received: SongListContext,
    },

    /// Songs were requested; the song table is empty until they arrive
    SongsRequested(SongListContext),

    // -------------------------------------------------------------------------
    // Playback
    // -------------------------------------------------------------------------
    /// The phone started a song
    SongStarted { song_id: String },

    /// Play state, progress, shuffle or repeat changed
    PlaybackChanged,

    /// The phone answered a transport command
    CommandAcknowledged {
        command: TransportCommand,
        accepted: bool,
    },

    // -------------------------------------------------------------------------
    // Protocol trouble
    // -------------------------------------------------------------------------
    /// An inbound frame was malformed or unexpected and was dropped
    FrameDropped { reason: String },

    /// An outbound message was not sent because no phone is connected
    SendDropped(MessageKind),
}

impl LinkEvent {
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            LinkEvent::Connected | LinkEvent::Disconnected | LinkEvent::AdvertisingRestarted
        )
    }

    /// Whether presentation should re-read the catalog
    pub fn is_catalog_change(&self) -> bool {
        matches!(
            self,
            LinkEvent::CatalogReplaced { .. } | LinkEvent::SongsRequested(_)
        )
    }

    pub fn is_playback(&self) -> bool {
        matches!(
            self,
            LinkEvent::SongStarted { .. }
                | LinkEvent::PlaybackChanged
                | LinkEvent::CommandAcknowledged { .. }
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            LinkEvent::FrameDropped { .. }
                | LinkEvent::SendDropped(_)
                | LinkEvent::SongListIgnored { .. }
        )
    }
}
