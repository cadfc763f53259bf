//! Typed messages carried inside frames
//!
//! # Payload Layouts
//! ```text
//! PLAYLIST_LIST   [count: u16] { id, name, song_count: u16 }*
//! ARTIST_LIST     [count: u16] { id, name, album_count: u8, song_count: u16 }*
//! ALBUM_LIST      [count: u16] { id, name, artist, song_count: u8, year: u16 }*
//! SONG_LIST       [context: u8] context_id [count: u16]
//!                 { id, title, artist, album, duration: u16, track: u8 }*
//! SONG_STARTED    song_id, title, artist, album, duration: u16, playing: u8, progress: u16
//! PLAYBACK_STATE  playing: u8, progress: u16, shuffle: u8, repeat: u8
//! COMMAND_ACK     command: u8, accepted: u8
//! QUERY           query: u8, id
//! PLAY_REQUEST    song_id, [context: u8], context_id, index: u16
//! COMMAND         command: u8
//! ```
//! Strings use the length-prefixed form from [`crate::wire`].

use tracing::warn;

use crate::command::{ContextKind, QueryKind, TransportCommand};
use crate::error::ParseError;
use crate::frame::{split_into_chunks, Frame, MessageKind};
use crate::wire::{PayloadReader, PayloadWriter, MAX_STRING_LEN};

/// One playlist in a PLAYLIST_LIST snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,
    pub song_count: u16,
}

/// One artist in an ARTIST_LIST snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistEntry {
    pub id: String,
    pub name: String,
    pub album_count: u8,
    pub song_count: u16,
}

/// One album in an ALBUM_LIST snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub id: String,
    pub name: String,
    /// Artist display name (not a reference)
    pub artist: String,
    pub song_count: u8,
    pub year: u16,
}

/// One song in a SONG_LIST snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongEntry {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_sec: u16,
    pub track: u8,
}

/// Songs scoped to one playlist, album or artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongList {
    pub context: ContextKind,
    pub context_id: String,
    pub songs: Vec<SongEntry>,
}

/// Now-playing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongStarted {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_sec: u16,
    pub playing: bool,
    pub progress_sec: u16,
}

/// Periodic playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub playing: bool,
    pub progress_sec: u16,
    pub shuffle: bool,
    pub repeat: bool,
}

/// Request to start playing a song
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub song_id: String,
    /// Scope the song was picked from; `None` plays it standalone
    pub context: ContextKind,
    pub context_id: String,
    /// Position of the song within its list
    pub index: u16,
}

/// Every message either side of the link can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    PlaylistList(Vec<PlaylistEntry>),
    ArtistList(Vec<ArtistEntry>),
    AlbumList(Vec<AlbumEntry>),
    SongList(SongList),
    SongStarted(SongStarted),
    PlaybackState(PlaybackStatus),
    CommandAck {
        command: TransportCommand,
        accepted: bool,
    },
    Query {
        kind: QueryKind,
        id: String,
    },
    PlayRequest(PlayRequest),
    Command(TransportCommand),
}

/// Worst-case bytes of one string field
const MAX_STR_FIELD_LEN: usize = 1 + MAX_STRING_LEN;

/// Largest encoding of one record in a `*_LIST` payload of `kind`
///
/// `None` for kinds that are not snapshots.
pub fn max_record_len(kind: MessageKind) -> Option<usize> {
    match kind {
        MessageKind::PlaylistList => Some(2 * MAX_STR_FIELD_LEN + 2),
        MessageKind::ArtistList => Some(2 * MAX_STR_FIELD_LEN + 3),
        MessageKind::AlbumList => Some(3 * MAX_STR_FIELD_LEN + 3),
        MessageKind::SongList => Some(4 * MAX_STR_FIELD_LEN + 3),
        _ => None,
    }
}

/// Largest payload a `*_LIST` snapshot holding `records` entries can need
pub fn max_snapshot_payload_len(kind: MessageKind, records: usize) -> Option<usize> {
    let prefix = match kind {
        // context byte and context id ahead of the count
        MessageKind::SongList => 1 + MAX_STR_FIELD_LEN + 2,
        _ => 2,
    };
    max_record_len(kind).map(|len| prefix + records.saturating_mul(len))
}

/// A record that appears repeatedly inside a list payload
trait ListRecord: Sized {
    fn write(&self, w: &mut PayloadWriter);
    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ParseError>;
}

impl ListRecord for PlaylistEntry {
    fn write(&self, w: &mut PayloadWriter) {
        w.put_str(&self.id);
        w.put_str(&self.name);
        w.put_u16(self.song_count);
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            id: r.string()?,
            name: r.string()?,
            song_count: r.u16()?,
        })
    }
}

impl ListRecord for ArtistEntry {
    fn write(&self, w: &mut PayloadWriter) {
        w.put_str(&self.id);
        w.put_str(&self.name);
        w.put_u8(self.album_count);
        w.put_u16(self.song_count);
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            id: r.string()?,
            name: r.string()?,
            album_count: r.u8()?,
            song_count: r.u16()?,
        })
    }
}

impl ListRecord for AlbumEntry {
    fn write(&self, w: &mut PayloadWriter) {
        w.put_str(&self.id);
        w.put_str(&self.name);
        w.put_str(&self.artist);
        w.put_u8(self.song_count);
        w.put_u16(self.year);
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            id: r.string()?,
            name: r.string()?,
            artist: r.string()?,
            song_count: r.u8()?,
            year: r.u16()?,
        })
    }
}

impl ListRecord for SongEntry {
    fn write(&self, w: &mut PayloadWriter) {
        w.put_str(&self.id);
        w.put_str(&self.title);
        w.put_str(&self.artist);
        w.put_str(&self.album);
        w.put_u16(self.duration_sec);
        w.put_u8(self.track);
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            id: r.string()?,
            title: r.string()?,
            artist: r.string()?,
            album: r.string()?,
            duration_sec: r.u16()?,
            track: r.u8()?,
        })
    }
}

fn write_list<T: ListRecord>(w: &mut PayloadWriter, records: &[T]) {
    let count = records.len().min(u16::MAX as usize);
    if count < records.len() {
        warn!(
            "List truncated from {} to {} records",
            records.len(),
            count
        );
    }
    w.put_u16(count as u16);
    for record in &records[..count] {
        record.write(w);
    }
}

fn read_list<T: ListRecord>(r: &mut PayloadReader<'_>) -> Result<Vec<T>, ParseError> {
    let count = r.u16()? as usize;
    // Each record is at least a few bytes; don't trust count for allocation
    let mut records = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        records.push(T::read(r)?);
    }
    Ok(records)
}

impl Message {
    /// Kind byte this message is framed with
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::PlaylistList(_) => MessageKind::PlaylistList,
            Self::ArtistList(_) => MessageKind::ArtistList,
            Self::AlbumList(_) => MessageKind::AlbumList,
            Self::SongList(_) => MessageKind::SongList,
            Self::SongStarted(_) => MessageKind::SongStarted,
            Self::PlaybackState(_) => MessageKind::PlaybackState,
            Self::CommandAck { .. } => MessageKind::CommandAck,
            Self::Query { .. } => MessageKind::Query,
            Self::PlayRequest(_) => MessageKind::PlayRequest,
            Self::Command(_) => MessageKind::Command,
        }
    }

    /// Whether the phone sends this message (as opposed to the head unit)
    pub fn is_from_phone(&self) -> bool {
        !matches!(
            self,
            Self::Query { .. } | Self::PlayRequest(_) | Self::Command(_)
        )
    }

    /// Encode only the payload fields
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::with_capacity(64);
        match self {
            Self::PlaylistList(entries) => write_list(&mut w, entries),
            Self::ArtistList(entries) => write_list(&mut w, entries),
            Self::AlbumList(entries) => write_list(&mut w, entries),
            Self::SongList(list) => {
                w.put_u8(list.context.code());
                w.put_str(&list.context_id);
                write_list(&mut w, &list.songs);
            }
            Self::SongStarted(s) => {
                w.put_str(&s.song_id);
                w.put_str(&s.title);
                w.put_str(&s.artist);
                w.put_str(&s.album);
                w.put_u16(s.duration_sec);
                w.put_bool(s.playing);
                w.put_u16(s.progress_sec);
            }
            Self::PlaybackState(s) => {
                w.put_bool(s.playing);
                w.put_u16(s.progress_sec);
                w.put_bool(s.shuffle);
                w.put_bool(s.repeat);
            }
            Self::CommandAck { command, accepted } => {
                w.put_u8(command.code());
                w.put_bool(*accepted);
            }
            Self::Query { kind, id } => {
                w.put_u8(kind.code());
                w.put_str(id);
            }
            Self::PlayRequest(req) => {
                w.put_str(&req.song_id);
                w.put_u8(req.context.code());
                w.put_str(&req.context_id);
                w.put_u16(req.index);
            }
            Self::Command(cmd) => w.put_u8(cmd.code()),
        }
        w.finish()
    }

    /// Wrap this message in a frame
    pub fn to_frame(&self) -> Frame {
        Frame::new(self.kind(), self.encode_payload())
    }

    /// Encode to complete wire bytes (header + payload)
    pub fn encode(&self) -> Vec<u8> {
        self.to_frame().encode()
    }

    /// Encode and split into writes of at most `chunk_len` bytes
    pub fn to_chunks(&self, chunk_len: usize) -> Vec<Vec<u8>> {
        split_into_chunks(&self.encode(), chunk_len)
    }

    /// Decode a reassembled frame
    pub fn decode(frame: &Frame) -> Result<Self, ParseError> {
        let mut r = PayloadReader::new(&frame.payload);
        let message = match frame.kind {
            MessageKind::PlaylistList => Self::PlaylistList(read_list(&mut r)?),
            MessageKind::ArtistList => Self::ArtistList(read_list(&mut r)?),
            MessageKind::AlbumList => Self::AlbumList(read_list(&mut r)?),
            MessageKind::SongList => {
                let context = ContextKind::try_from(r.u8()?)?;
                let context_id = r.string()?;
                let songs = read_list(&mut r)?;
                Self::SongList(SongList {
                    context,
                    context_id,
                    songs,
                })
            }
            MessageKind::SongStarted => Self::SongStarted(SongStarted {
                song_id: r.string()?,
                title: r.string()?,
                artist: r.string()?,
                album: r.string()?,
                duration_sec: r.u16()?,
                playing: r.bool()?,
                progress_sec: r.u16()?,
            }),
            MessageKind::PlaybackState => Self::PlaybackState(PlaybackStatus {
                playing: r.bool()?,
                progress_sec: r.u16()?,
                shuffle: r.bool()?,
                repeat: r.bool()?,
            }),
            MessageKind::CommandAck => Self::CommandAck {
                command: TransportCommand::try_from(r.u8()?)?,
                accepted: r.bool()?,
            },
            MessageKind::Query => Self::Query {
                kind: QueryKind::try_from(r.u8()?)?,
                id: r.string()?,
            },
            MessageKind::PlayRequest => Self::PlayRequest(PlayRequest {
                song_id: r.string()?,
                context: ContextKind::try_from(r.u8()?)?,
                context_id: r.string()?,
                index: r.u16()?,
            }),
            MessageKind::Command => Self::Command(TransportCommand::try_from(r.u8()?)?),
        };
        r.finish()?;
        Ok(message)
    }
}
