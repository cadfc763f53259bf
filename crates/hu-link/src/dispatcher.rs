//! Inbound message handling
//!
//! Raw chunks are reassembled into frames, decoded, and applied: catalog
//! snapshots replace cache tables, playback messages update the now-playing
//! state. A payload is fully decoded before anything is cleared, so a
//! malformed snapshot never leaves a half-emptied table behind.

use hu_library::{
    CatalogAlbum, CatalogArtist, CatalogCache, CatalogPlaylist, CatalogSong, CatalogTableKind,
    ReplaceOutcome, SongListContext,
};
use hu_protocol::{Frame, FrameDecoder, Message, ParseError, SongList};
use tracing::{debug, info, warn};

use crate::error::LinkError;
use crate::events::LinkEvent;
use crate::playback::PlaybackState;

/// Reassembler plus the rules for applying each message kind
#[derive(Debug, Default)]
pub struct Dispatcher {
    decoder: FrameDecoder,
}

impl Dispatcher {
    pub fn new(max_payload_len: usize) -> Self {
        Self {
            decoder: FrameDecoder::with_max_payload(max_payload_len),
        }
    }

    /// Feed one inbound write and apply every frame it completes
    pub fn push_chunk(
        &mut self,
        chunk: &[u8],
        cache: &mut CatalogCache,
        playback: &mut PlaybackState,
        events: &mut Vec<LinkEvent>,
    ) {
        self.decoder.push_chunk(chunk);

        while let Some(result) = self.decoder.next_frame() {
            let outcome = result
                .map_err(LinkError::from)
                .and_then(|frame| self.handle_frame(&frame, cache, playback, events));

            if let Err(e) = outcome {
                warn!("Dropped inbound frame: {}", e);
                events.push(LinkEvent::FrameDropped {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Decode and apply one complete frame
    pub fn handle_frame(
        &self,
        frame: &Frame,
        cache: &mut CatalogCache,
        playback: &mut PlaybackState,
        events: &mut Vec<LinkEvent>,
    ) -> Result<(), LinkError> {
        let message = Message::decode(frame)?;
        if !message.is_from_phone() {
            return Err(ParseError::UnexpectedKind(frame.kind.name()).into());
        }
        apply(message, cache, playback, events);
        Ok(())
    }

    /// Forget any partially received frame
    pub fn reset(&mut self) {
        if self.decoder.pending_len() > 0 {
            debug!(
                "Discarding {} bytes of partial frame",
                self.decoder.pending_len()
            );
        }
        self.decoder.clear();
    }

    pub fn pending_len(&self) -> usize {
        self.decoder.pending_len()
    }
}

/// Apply a decoded phone message to the cache and playback state
pub fn apply(
    message: Message,
    cache: &mut CatalogCache,
    playback: &mut PlaybackState,
    events: &mut Vec<LinkEvent>,
) {
    match message {
        Message::PlaylistList(entries) => {
            let outcome = cache.replace_playlists(entries.iter().map(CatalogPlaylist::from));
            replaced(CatalogTableKind::Playlists, outcome, events);
        }
        Message::ArtistList(entries) => {
            let outcome = cache.replace_artists(entries.iter().map(CatalogArtist::from));
            replaced(CatalogTableKind::Artists, outcome, events);
        }
        Message::AlbumList(entries) => {
            let outcome = cache.replace_albums(entries.iter().map(CatalogAlbum::from));
            replaced(CatalogTableKind::Albums, outcome, events);
        }
        Message::SongList(list) => apply_song_list(list, cache, events),
        Message::SongStarted(started) => {
            info!("Now playing {:?} ({})", started.title, started.song_id);
            playback.apply_song_started(&started);
            events.push(LinkEvent::SongStarted {
                song_id: started.song_id,
            });
        }
        Message::PlaybackState(status) => {
            playback.apply_status(&status);
            events.push(LinkEvent::PlaybackChanged);
        }
        Message::CommandAck { command, accepted } => {
            debug!("{} acknowledged: {}", command.as_str(), accepted);
            events.push(LinkEvent::CommandAcknowledged { command, accepted });
        }
        Message::Query { .. } | Message::PlayRequest(_) | Message::Command(_) => {
            // Filtered by handle_frame; the device never receives its own requests
            warn!("Ignoring device-bound message {}", message.kind().name());
        }
    }
}

fn apply_song_list(list: SongList, cache: &mut CatalogCache, events: &mut Vec<LinkEvent>) {
    let received = SongListContext::new(list.context, &list.context_id);
    let current = cache.song_context();

    if !current.is_none() && *current != received {
        warn!(
            "Ignoring song list for {} {:?}; expecting {} {:?}",
            received.type_name(),
            received.id(),
            current.type_name(),
            current.id()
        );
        events.push(LinkEvent::SongListIgnored {
            expected: current.clone(),
            received,
        });
        return;
    }

    if current.is_none() {
        cache.set_song_context(received);
    }
    let outcome = cache.replace_songs(list.songs.iter().map(CatalogSong::from));
    replaced(CatalogTableKind::Songs, outcome, events);
}

fn replaced(table: CatalogTableKind, outcome: ReplaceOutcome, events: &mut Vec<LinkEvent>) {
    info!(
        "Loaded {} {} ({} rejected)",
        outcome.stored, table, outcome.rejected
    );
    events.push(LinkEvent::CatalogReplaced {
        table,
        stored: outcome.stored,
        rejected: outcome.rejected,
    });
}
