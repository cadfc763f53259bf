//! Head Unit Link Protocol
//!
//! This crate provides framing and encoding for the message protocol spoken
//! between a phone music application and an in-vehicle head unit over a
//! Nordic-UART-style BLE service (one write characteristic, one notify
//! characteristic).
//!
//! # Architecture
//!
//! - [`frame`]: the self-delimiting frame header, a streaming
//!   [`FrameDecoder`] that reassembles frames from MTU-sized chunks, and
//!   outbound chunking
//! - [`message`]: typed [`Message`] values and their payload layouts
//! - [`wire`]: length-prefixed field primitives
//! - [`command`]: enumerated field values (contexts, queries, transport
//!   controls)
//!
//! A `*_LIST` message always carries a complete table snapshot. Frames that
//! exceed one chunk are split by the sender and reassembled here.
//!
//! # Example
//!
//! ```rust
//! use hu_protocol::{FrameDecoder, Message, PlaylistEntry};
//!
//! let snapshot = Message::PlaylistList(vec![PlaylistEntry {
//!     id: "P1".into(),
//!     name: "Road Trip".into(),
//!     song_count: 12,
//! }]);
//!
//! let mut decoder = FrameDecoder::new();
//! for chunk in snapshot.to_chunks(20) {
//!     decoder.push_chunk(&chunk);
//! }
//!
//! let frame = decoder.next_frame().unwrap().unwrap();
//! assert_eq!(Message::decode(&frame).unwrap(), snapshot);
//! ```

pub mod command;
pub mod error;
pub mod frame;
pub mod message;
pub mod wire;

pub use command::{ContextKind, QueryKind, TransportCommand};
pub use error::ParseError;
pub use frame::{
    split_into_chunks, Frame, FrameDecoder, MessageKind, DEFAULT_CHUNK_LEN,
    DEFAULT_MAX_PAYLOAD_LEN, HEADER_LEN, MAGIC,
};
pub use message::{
    max_record_len, max_snapshot_payload_len, AlbumEntry, ArtistEntry, Message, PlayRequest,
    PlaybackStatus, PlaylistEntry, SongEntry, SongList, SongStarted,
};

/// BLE service and characteristic identities the head unit publishes
pub mod service {
    /// Nordic UART service
    pub const SERVICE_UUID: &str = "6E400001-B5A3-F393-E0A9-E50E24DCCA9E";
    /// Write characteristic (phone → head unit)
    pub const RX_CHARACTERISTIC_UUID: &str = "6E400002-B5A3-F393-E0A9-E50E24DCCA9E";
    /// Notify characteristic (head unit → phone)
    pub const TX_CHARACTERISTIC_UUID: &str = "6E400003-B5A3-F393-E0A9-E50E24DCCA9E";

    /// A GATT service with one write and one notify characteristic
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ServiceIdentity {
        pub service: &'static str,
        pub rx: &'static str,
        pub tx: &'static str,
    }

    /// The service the head unit is reached through
    pub const UART_SERVICE: ServiceIdentity = ServiceIdentity {
        service: SERVICE_UUID,
        rx: RX_CHARACTERISTIC_UUID,
        tx: TX_CHARACTERISTIC_UUID,
    };
}
