//! Frame layer: header, reassembly and chunking
//!
//! The BLE write characteristic delivers one MTU-bounded chunk per write, so
//! every logical message is wrapped in a self-delimiting frame and split
//! across as many chunks as it needs.
//!
//! # Frame Format
//! ```text
//! A5 5A [kind] [len: u32 LE] [payload; len]
//! ```
//!
//! - `A5 5A`: Magic (two bytes)
//! - `kind`: Message kind (see [`MessageKind`])
//! - `len`: Payload length in bytes
//! - `payload`: Kind-specific fields (see [`crate::message`])
//!
//! # Resynchronization
//! A header with the wrong magic, an unknown kind or an oversized length
//! drops whatever has been buffered. The decoder then skips whole chunks until
//! one starts with the magic, since a sender always begins a frame on a fresh
//! write.

use tracing::{debug, warn};

use crate::error::ParseError;

/// Frame magic bytes
pub const MAGIC: [u8; 2] = [0xA5, 0x5A];
/// Magic + kind + u32 length
pub const HEADER_LEN: usize = 7;
/// Largest payload accepted unless configured otherwise; covers a 200-song
/// snapshot of worst-case records
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 256 * 1024;
/// Usable bytes per write on a link that never negotiated a larger MTU
pub const DEFAULT_CHUNK_LEN: usize = 20;

/// Kind byte carried in every frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// Full playlist snapshot (phone → device)
    PlaylistList = 0x01,
    /// Full artist snapshot (phone → device)
    ArtistList = 0x02,
    /// Full album snapshot (phone → device)
    AlbumList = 0x03,
    /// Songs of one playlist/album/artist (phone → device)
    SongList = 0x04,
    /// A song began playing (phone → device)
    SongStarted = 0x10,
    /// Play/pause, progress, shuffle and repeat (phone → device)
    PlaybackState = 0x11,
    /// Result of a transport command (phone → device)
    CommandAck = 0x12,
    /// Song list request (device → phone)
    Query = 0x20,
    /// Play a song (device → phone)
    PlayRequest = 0x21,
    /// Transport control (device → phone)
    Command = 0x22,
}

impl MessageKind {
    /// Protocol name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaylistList => "PLAYLIST_LIST",
            Self::ArtistList => "ARTIST_LIST",
            Self::AlbumList => "ALBUM_LIST",
            Self::SongList => "SONG_LIST",
            Self::SongStarted => "SONG_STARTED",
            Self::PlaybackState => "PLAYBACK_STATE",
            Self::CommandAck => "COMMAND_ACK",
            Self::Query => "QUERY",
            Self::PlayRequest => "PLAY_REQUEST",
            Self::Command => "COMMAND",
        }
    }

    /// Whether this kind replaces a whole catalog table
    pub fn is_snapshot(&self) -> bool {
        matches!(
            self,
            Self::PlaylistList | Self::ArtistList | Self::AlbumList | Self::SongList
        )
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::PlaylistList),
            0x02 => Ok(Self::ArtistList),
            0x03 => Ok(Self::AlbumList),
            0x04 => Ok(Self::SongList),
            0x10 => Ok(Self::SongStarted),
            0x11 => Ok(Self::PlaybackState),
            0x12 => Ok(Self::CommandAck),
            0x20 => Ok(Self::Query),
            0x21 => Ok(Self::PlayRequest),
            0x22 => Ok(Self::Command),
            _ => Err(ParseError::UnknownKind(value)),
        }
    }
}

/// One complete, reassembled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: MessageKind,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(kind: MessageKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    /// Encode header and payload into wire bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&MAGIC);
        out.push(self.kind as u8);
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Split encoded bytes into writes of at most `chunk_len` bytes
///
/// A `chunk_len` of zero is treated as one byte per chunk.
pub fn split_into_chunks(bytes: &[u8], chunk_len: usize) -> Vec<Vec<u8>> {
    bytes.chunks(chunk_len.max(1)).map(<[u8]>::to_vec).collect()
}

fn is_header_shaped(chunk: &[u8]) -> bool {
    let n = chunk.len().min(MAGIC.len());
    n > 0 && chunk[..n] == MAGIC[..n]
}

/// Streaming frame reassembler
///
/// Chunks go in through [`push_chunk`](Self::push_chunk), complete frames come
/// out of [`next_frame`](Self::next_frame). A single chunk may finish one frame
/// and start the next.
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    max_payload_len: usize,
    resyncing: bool,
}

impl FrameDecoder {
    /// Create a decoder with the default payload limit
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_LEN)
    }

    /// Create a decoder that rejects payloads above `max_payload_len`
    pub fn with_max_payload(max_payload_len: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(512),
            max_payload_len,
            resyncing: false,
        }
    }

    /// Append one inbound write
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        if self.resyncing {
            if !is_header_shaped(chunk) {
                debug!("Skipping {} byte chunk while resynchronizing", chunk.len());
                return;
            }
            debug!("Resynchronized on header-shaped chunk");
            self.resyncing = false;
        }

        self.buffer.extend_from_slice(chunk);
    }

    /// Try to extract the next complete frame
    ///
    /// Returns `None` when more chunks are needed, `Some(Err(_))` when the
    /// buffered header was malformed and has been dropped.
    pub fn next_frame(&mut self) -> Option<Result<Frame, ParseError>> {
        if self.buffer.is_empty() {
            return None;
        }

        // Check as much of the magic as has arrived
        if let Some(pos) = self
            .buffer
            .iter()
            .zip(MAGIC.iter())
            .position(|(got, want)| got != want)
        {
            let byte = self.buffer[pos];
            return Some(Err(self.drop_buffer(ParseError::BadMagic(byte))));
        }

        if self.buffer.len() < HEADER_LEN {
            return None;
        }

        let kind = match MessageKind::try_from(self.buffer[2]) {
            Ok(kind) => kind,
            Err(e) => return Some(Err(self.drop_buffer(e))),
        };

        let declared = u32::from_le_bytes([
            self.buffer[3],
            self.buffer[4],
            self.buffer[5],
            self.buffer[6],
        ]) as usize;

        if declared > self.max_payload_len {
            return Some(Err(self.drop_buffer(ParseError::PayloadTooLarge {
                declared,
                max: self.max_payload_len,
            })));
        }

        let total = HEADER_LEN + declared;
        if self.buffer.len() < total {
            return None;
        }

        let payload = self.buffer[HEADER_LEN..total].to_vec();
        self.buffer.drain(..total);

        debug!("Reassembled {} frame ({} bytes)", kind.name(), declared);
        Some(Ok(Frame { kind, payload }))
    }

    fn drop_buffer(&mut self, err: ParseError) -> ParseError {
        warn!(
            "Dropping {} buffered bytes: {}",
            self.buffer.len(),
            err
        );
        self.buffer.clear();
        self.resyncing = true;
        err
    }

    /// Discard any partial frame (e.g. on disconnect)
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.resyncing = false;
    }

    /// Bytes of an incomplete frame currently held
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether chunks are being skipped until a header-shaped one arrives
    pub fn is_resyncing(&self) -> bool {
        self.resyncing
    }

    pub fn max_payload_len(&self) -> usize {
        self.max_payload_len
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
