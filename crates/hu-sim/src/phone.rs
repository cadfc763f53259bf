//! Virtual phone application
//!
//! Plays the phone side of the link: holds a music library, pushes catalog
//! snapshots, answers song queries and transport commands, and reports what
//! is playing. Outbound chunks queue up until the caller moves them onto a
//! radio, usually through [`VirtualPhone::exchange`].

use std::collections::VecDeque;

use hu_protocol::{
    AlbumEntry, ArtistEntry, ContextKind, FrameDecoder, Message, PlayRequest, PlaybackStatus,
    PlaylistEntry, QueryKind, SongEntry, SongList, SongStarted, TransportCommand,
    DEFAULT_CHUNK_LEN,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::radio::VirtualRadio;

/// Size of a generated library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryShape {
    pub playlists: usize,
    pub artists: usize,
    pub albums_per_artist: usize,
    pub songs_per_album: usize,
}

impl Default for LibraryShape {
    fn default() -> Self {
        Self {
            playlists: 6,
            artists: 5,
            albums_per_artist: 2,
            songs_per_album: 4,
        }
    }
}

/// Configuration for creating a virtual phone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualPhoneConfig {
    /// Display name
    pub name: String,
    /// Bytes per write to the device
    pub chunk_len: usize,
    /// Generated library size
    pub library: LibraryShape,
}

impl Default for VirtualPhoneConfig {
    fn default() -> Self {
        Self {
            name: "Virtual Phone".to_string(),
            chunk_len: DEFAULT_CHUNK_LEN,
            library: LibraryShape::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct PhoneSong {
    entry: SongEntry,
    album_id: String,
    artist_id: String,
}

/// The phone's music library
#[derive(Debug, Clone, Default)]
pub struct PhoneLibrary {
    playlists: Vec<(PlaylistEntry, Vec<usize>)>,
    artists: Vec<ArtistEntry>,
    albums: Vec<AlbumEntry>,
    songs: Vec<PhoneSong>,
}

impl PhoneLibrary {
    /// Build a synthetic library; playlist `p` holds every song whose index
    /// is `p` modulo the playlist count
    pub fn generated(shape: LibraryShape) -> Self {
        let mut library = Self::default();

        for a in 0..shape.artists {
            let artist_id = format!("ar{}", a);
            let artist_name = format!("Artist {}", a + 1);
            let mut artist_songs = 0u16;

            for b in 0..shape.albums_per_artist {
                let album_id = format!("al{}-{}", a, b);
                let album_name = format!("Album {}.{}", a + 1, b + 1);

                for t in 0..shape.songs_per_album {
                    library.songs.push(PhoneSong {
                        entry: SongEntry {
                            id: format!("so{}-{}-{}", a, b, t),
                            title: format!("Track {} ({})", t + 1, album_name),
                            artist: artist_name.clone(),
                            album: album_name.clone(),
                            duration_sec: 150 + ((a * 37 + b * 11 + t * 23) % 240) as u16,
                            track: u8::try_from(t + 1).unwrap_or(u8::MAX),
                        },
                        album_id: album_id.clone(),
                        artist_id: artist_id.clone(),
                    });
                    artist_songs = artist_songs.saturating_add(1);
                }

                library.albums.push(AlbumEntry {
                    id: album_id,
                    name: album_name,
                    artist: artist_name.clone(),
                    song_count: u8::try_from(shape.songs_per_album).unwrap_or(u8::MAX),
                    year: 1965 + ((a * 3 + b) % 55) as u16,
                });
            }

            library.artists.push(ArtistEntry {
                id: artist_id,
                name: artist_name,
                album_count: u8::try_from(shape.albums_per_artist).unwrap_or(u8::MAX),
                song_count: artist_songs,
            });
        }

        for p in 0..shape.playlists {
            let members: Vec<usize> = (0..library.songs.len())
                .filter(|i| i % shape.playlists == p)
                .collect();
            library.playlists.push((
                PlaylistEntry {
                    id: format!("pl{}", p),
                    name: format!("Playlist {}", p + 1),
                    song_count: u16::try_from(members.len()).unwrap_or(u16::MAX),
                },
                members,
            ));
        }

        library
    }

    pub fn playlists(&self) -> Vec<PlaylistEntry> {
        self.playlists.iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn artists(&self) -> &[ArtistEntry] {
        &self.artists
    }

    pub fn albums(&self) -> &[AlbumEntry] {
        &self.albums
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    /// Songs for a query, in list order; unknown ids yield nothing
    pub fn songs_for(&self, kind: QueryKind, id: &str) -> Vec<SongEntry> {
        match kind {
            QueryKind::PlaylistSongs => self
                .playlists
                .iter()
                .find(|(p, _)| p.id == id)
                .map(|(_, members)| {
                    members
                        .iter()
                        .filter_map(|&i| self.songs.get(i))
                        .map(|s| s.entry.clone())
                        .collect()
                })
                .unwrap_or_default(),
            QueryKind::AlbumSongs => self
                .songs
                .iter()
                .filter(|s| s.album_id == id)
                .map(|s| s.entry.clone())
                .collect(),
            QueryKind::ArtistSongs => self
                .songs
                .iter()
                .filter(|s| s.artist_id == id)
                .map(|s| s.entry.clone())
                .collect(),
        }
    }

    pub fn song_by_id(&self, id: &str) -> Option<&SongEntry> {
        self.songs.iter().map(|s| &s.entry).find(|s| s.id == id)
    }
}

/// A simulated phone running the music app
#[derive(Debug)]
pub struct VirtualPhone {
    name: String,
    chunk_len: usize,
    library: PhoneLibrary,
    decoder: FrameDecoder,
    /// Chunks waiting to be written to the device
    pending_output: VecDeque<Vec<u8>>,
    /// Every request decoded from the device
    received: Vec<Message>,
    /// Songs of the list playback was started from
    queue: Vec<SongEntry>,
    position: usize,
    now_playing: Option<SongEntry>,
    playing: bool,
    progress_sec: u16,
}

impl Default for VirtualPhone {
    fn default() -> Self {
        Self::from_config(VirtualPhoneConfig::default())
    }
}

impl VirtualPhone {
    pub fn new(name: impl Into<String>, library: PhoneLibrary) -> Self {
        Self {
            name: name.into(),
            chunk_len: DEFAULT_CHUNK_LEN,
            library,
            decoder: FrameDecoder::new(),
            pending_output: VecDeque::new(),
            received: Vec::new(),
            queue: Vec::new(),
            position: 0,
            now_playing: None,
            playing: false,
            progress_sec: 0,
        }
    }

    pub fn from_config(config: VirtualPhoneConfig) -> Self {
        let mut phone = Self::new(config.name, PhoneLibrary::generated(config.library));
        phone.chunk_len = config.chunk_len;
        phone
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library(&self) -> &PhoneLibrary {
        &self.library
    }

    pub fn set_chunk_len(&mut self, chunk_len: usize) {
        self.chunk_len = chunk_len;
    }

    pub fn now_playing(&self) -> Option<&SongEntry> {
        self.now_playing.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Requests decoded from the device so far
    pub fn received(&self) -> &[Message] {
        &self.received
    }

    /// Frame `message` and queue its chunks
    pub fn queue_message(&mut self, message: &Message) {
        let chunks = message.to_chunks(self.chunk_len);
        debug!(
            "{} queued {} in {} chunk(s)",
            self.name,
            message.kind().name(),
            chunks.len()
        );
        self.pending_output.extend(chunks);
    }

    /// Queue playlist, artist and album snapshots
    pub fn push_catalog(&mut self) {
        info!("{} pushing catalog snapshot", self.name);
        self.queue_message(&Message::PlaylistList(self.library.playlists()));
        self.queue_message(&Message::ArtistList(self.library.artists().to_vec()));
        self.queue_message(&Message::AlbumList(self.library.albums().to_vec()));
    }

    /// Take the next chunk to write to the device
    pub fn take_output(&mut self) -> Option<Vec<u8>> {
        self.pending_output.pop_front()
    }

    pub fn has_output(&self) -> bool {
        !self.pending_output.is_empty()
    }

    pub fn output_count(&self) -> usize {
        self.pending_output.len()
    }

    pub fn clear_output(&mut self) {
        self.pending_output.clear();
    }

    /// Link dropped: forget partial inbound data and unsent chunks
    pub fn reset_link(&mut self) {
        self.decoder.clear();
        self.pending_output.clear();
    }

    /// Feed one notification from the device
    pub fn receive(&mut self, chunk: &[u8]) {
        self.decoder.push_chunk(chunk);
        while let Some(result) = self.decoder.next_frame() {
            match result.and_then(|frame| Message::decode(&frame)) {
                Ok(message) => self.handle_request(message),
                Err(e) => warn!("{} dropped device frame: {}", self.name, e),
            }
        }
    }

    fn handle_request(&mut self, message: Message) {
        debug!("{} received {}", self.name, message.kind().name());
        self.received.push(message.clone());

        match message {
            Message::Query { kind, id } => {
                let songs = self.library.songs_for(kind, &id);
                self.queue_message(&Message::SongList(SongList {
                    context: kind.context(),
                    context_id: id,
                    songs,
                }));
            }
            Message::PlayRequest(request) => self.play(request),
            Message::Command(command) => self.command(command),
            other => warn!(
                "{} ignoring phone-bound message {}",
                self.name,
                other.kind().name()
            ),
        }
    }

    fn play(&mut self, request: PlayRequest) {
        let queue = match request.context {
            ContextKind::Playlist => self
                .library
                .songs_for(QueryKind::PlaylistSongs, &request.context_id),
            ContextKind::Album => self
                .library
                .songs_for(QueryKind::AlbumSongs, &request.context_id),
            ContextKind::Artist => self
                .library
                .songs_for(QueryKind::ArtistSongs, &request.context_id),
            ContextKind::None => Vec::new(),
        };

        let Some(song) = self.library.song_by_id(&request.song_id).cloned() else {
            warn!("{} has no song {:?}", self.name, request.song_id);
            return;
        };

        self.position = queue
            .iter()
            .position(|s| s.id == song.id)
            .unwrap_or(usize::from(request.index));
        self.queue = queue;
        self.start_song(song);
    }

    fn start_song(&mut self, song: SongEntry) {
        info!("{} playing {:?}", self.name, song.title);
        self.playing = true;
        self.progress_sec = 0;
        self.queue_message(&Message::SongStarted(SongStarted {
            song_id: song.id.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            album: song.album.clone(),
            duration_sec: song.duration_sec,
            playing: true,
            progress_sec: 0,
        }));
        self.now_playing = Some(song);
    }

    fn command(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::PlayPause => {
                let accepted = self.now_playing.is_some();
                if accepted {
                    self.playing = !self.playing;
                }
                self.ack(command, accepted);
                if accepted {
                    self.queue_status();
                }
            }
            TransportCommand::NextSong | TransportCommand::PrevSong => {
                if self.queue.is_empty() {
                    self.ack(command, false);
                    return;
                }
                let len = self.queue.len();
                self.position = if command == TransportCommand::NextSong {
                    (self.position + 1) % len
                } else {
                    (self.position + len - 1) % len
                };
                self.ack(command, true);
                let song = self.queue[self.position].clone();
                self.start_song(song);
            }
        }
    }

    fn ack(&mut self, command: TransportCommand, accepted: bool) {
        self.queue_message(&Message::CommandAck { command, accepted });
    }

    /// Queue a playback status report
    pub fn queue_status(&mut self) {
        self.queue_message(&Message::PlaybackState(PlaybackStatus {
            playing: self.playing,
            progress_sec: self.progress_sec,
            shuffle: false,
            repeat: false,
        }));
    }

    /// Advance the playing song's clock
    pub fn advance(&mut self, seconds: u16) {
        if !self.playing {
            return;
        }
        if let Some(song) = &self.now_playing {
            self.progress_sec = self
                .progress_sec
                .saturating_add(seconds)
                .min(song.duration_sec);
        }
    }

    /// Move queued chunks onto the radio and device notifications back in
    ///
    /// Returns the number of chunks moved in either direction.
    pub fn exchange(&mut self, radio: &mut VirtualRadio) -> usize {
        let mut moved = 0;

        while let Some(chunk) = radio.take_notification() {
            self.receive(&chunk);
            moved += 1;
        }

        if radio.is_connected() {
            while let Some(chunk) = self.pending_output.pop_front() {
                radio.write(&chunk);
                moved += 1;
            }
        }

        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_library_shape() {
        let library = PhoneLibrary::generated(LibraryShape {
            playlists: 3,
            artists: 2,
            albums_per_artist: 2,
            songs_per_album: 5,
        });
        assert_eq!(library.artists().len(), 2);
        assert_eq!(library.albums().len(), 4);
        assert_eq!(library.song_count(), 20);
        assert_eq!(library.artists()[0].song_count, 10);

        let playlists = library.playlists();
        let total: u16 = playlists.iter().map(|p| p.song_count).sum();
        assert_eq!(total, 20);
        assert_eq!(library.songs_for(QueryKind::AlbumSongs, "al1-0").len(), 5);
        assert!(library.songs_for(QueryKind::ArtistSongs, "nope").is_empty());
    }

    #[test]
    fn test_query_answered_with_song_list() {
        let mut phone = VirtualPhone::default();
        let request = Message::Query {
            kind: QueryKind::ArtistSongs,
            id: "ar0".into(),
        };
        for chunk in request.to_chunks(20) {
            phone.receive(&chunk);
        }

        assert_eq!(phone.received(), &[request]);
        assert!(phone.has_output());

        let mut decoder = FrameDecoder::new();
        while let Some(chunk) = phone.take_output() {
            decoder.push_chunk(&chunk);
        }
        let reply = Message::decode(&decoder.next_frame().unwrap().unwrap()).unwrap();
        match reply {
            Message::SongList(list) => {
                assert_eq!(list.context, ContextKind::Artist);
                assert_eq!(list.context_id, "ar0");
                assert_eq!(list.songs.len(), 8);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_next_wraps_within_queue() {
        let mut phone = VirtualPhone::default();
        phone.play(PlayRequest {
            song_id: "so0-1-3".into(),
            context: ContextKind::Album,
            context_id: "al0-1".into(),
            index: 3,
        });
        assert_eq!(phone.now_playing().map(|s| s.track), Some(4));

        phone.command(TransportCommand::NextSong);
        assert_eq!(phone.now_playing().map(|s| s.id.as_str()), Some("so0-1-0"));

        phone.command(TransportCommand::PrevSong);
        assert_eq!(phone.now_playing().map(|s| s.id.as_str()), Some("so0-1-3"));
    }

    #[test]
    fn test_play_pause_without_song_rejected() {
        let mut phone = VirtualPhone::default();
        phone.command(TransportCommand::PlayPause);
        assert!(!phone.is_playing());
        assert_eq!(phone.output_count(), 1);
    }
}
