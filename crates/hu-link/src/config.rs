//! Link configuration

use std::time::Duration;

use hu_library::CatalogLimits;
use hu_protocol::{max_snapshot_payload_len, MessageKind, DEFAULT_MAX_PAYLOAD_LEN};
use serde::{Deserialize, Serialize};

/// Link session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Name the device advertises under
    pub device_name: String,
    /// Delay between a disconnect and restarting advertising (ms)
    pub reconnect_grace_ms: u64,
    /// Largest payload a frame header may declare; see
    /// [`LinkConfig::payload_limit`]
    pub max_payload_len: usize,
    /// Catalog table capacities
    pub limits: CatalogLimits,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device_name: "Amperfy-ESP32".to_string(),
            reconnect_grace_ms: 500,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            limits: CatalogLimits::default(),
        }
    }
}

impl LinkConfig {
    pub fn reconnect_grace(&self) -> Duration {
        Duration::from_millis(self.reconnect_grace_ms)
    }

    /// Payload limit the decoder enforces
    ///
    /// Never below the worst-case size of a snapshot that fills every table,
    /// so a snapshot is only ever cut by table capacity.
    pub fn payload_limit(&self) -> usize {
        let tables = [
            (MessageKind::PlaylistList, self.limits.playlists),
            (MessageKind::ArtistList, self.limits.artists),
            (MessageKind::AlbumList, self.limits.albums),
            (MessageKind::SongList, self.limits.songs),
        ];
        tables
            .into_iter()
            .filter_map(|(kind, capacity)| max_snapshot_payload_len(kind, capacity))
            .fold(self.max_payload_len, usize::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_covers_full_song_table() {
        let config = LinkConfig::default();
        let full = max_snapshot_payload_len(MessageKind::SongList, 200).unwrap();
        assert!(config.payload_limit() >= full);
        assert_eq!(config.payload_limit(), DEFAULT_MAX_PAYLOAD_LEN);
    }

    #[test]
    fn test_limit_follows_larger_tables() {
        let config = LinkConfig {
            max_payload_len: 1024,
            limits: CatalogLimits {
                songs: 1000,
                ..CatalogLimits::default()
            },
            ..LinkConfig::default()
        };
        assert_eq!(
            config.payload_limit(),
            max_snapshot_payload_len(MessageKind::SongList, 1000).unwrap()
        );
    }
}
