//! Now-playing state
//!
//! Updated from `SONG_STARTED` and `PLAYBACK_STATE` messages, and
//! optimistically when the head unit asks the phone to play something.

use hu_library::{BoundedString, CatalogId, CatalogSong, NOW_PLAYING_CAPACITY};
use hu_protocol::{PlaybackStatus, SongStarted};

pub type NowPlayingText = BoundedString<NOW_PLAYING_CAPACITY>;

/// The song the phone is playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub song_id: CatalogId,
    pub title: NowPlayingText,
    pub artist: NowPlayingText,
    pub album: NowPlayingText,
    pub duration_sec: u16,
}

impl From<&SongStarted> for NowPlaying {
    fn from(msg: &SongStarted) -> Self {
        Self {
            song_id: CatalogId::truncating(&msg.song_id),
            title: NowPlayingText::truncating(&msg.title),
            artist: NowPlayingText::truncating(&msg.artist),
            album: NowPlayingText::truncating(&msg.album),
            duration_sec: msg.duration_sec,
        }
    }
}

impl From<&CatalogSong> for NowPlaying {
    fn from(song: &CatalogSong) -> Self {
        Self {
            song_id: song.id.clone(),
            title: NowPlayingText::truncating(&song.title),
            artist: NowPlayingText::truncating(&song.artist),
            album: NowPlayingText::truncating(&song.album),
            duration_sec: song.duration_sec,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current: Option<NowPlaying>,
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub progress_sec: u16,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_song_started(&mut self, msg: &SongStarted) {
        self.current = Some(NowPlaying::from(msg));
        self.playing = msg.playing;
        self.progress_sec = msg.progress_sec;
    }

    pub fn apply_status(&mut self, status: &PlaybackStatus) {
        self.playing = status.playing;
        self.progress_sec = status.progress_sec;
        self.shuffle = status.shuffle;
        self.repeat = status.repeat;
    }

    /// Show `song` as playing from the start before the phone confirms
    pub fn start_optimistic(&mut self, song: &CatalogSong) {
        self.current = Some(NowPlaying::from(song));
        self.playing = true;
        self.progress_sec = 0;
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    /// Move progress forward while playing, stopping at the song's end
    pub fn advance(&mut self, seconds: u16) {
        if !self.playing {
            return;
        }
        if let Some(current) = &self.current {
            self.progress_sec = self
                .progress_sec
                .saturating_add(seconds)
                .min(current.duration_sec);
        }
    }

    /// Progress through the current song, 0..=100
    pub fn progress_percent(&self) -> u8 {
        match &self.current {
            Some(current) if current.duration_sec > 0 => {
                let pct = u32::from(self.progress_sec) * 100 / u32::from(current.duration_sec);
                pct.min(100) as u8
            }
            _ => 0,
        }
    }
}

/// Render seconds as `M:SS`
pub fn format_duration(seconds: u16) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
