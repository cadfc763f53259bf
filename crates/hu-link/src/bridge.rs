//! Outbound navigation intents
//!
//! Presentation expresses what the user did through [`NavigationHandler`];
//! [`NavigationBridge`] turns each intent into a protocol message, applies
//! its local side effects, and sends it in MTU-sized chunks. Nothing is
//! retried or tracked; a send without a connected phone is dropped.

use hu_library::{CatalogCache, SongListContext};
use hu_protocol::{ContextKind, Message, PlayRequest, QueryKind, TransportCommand};
use tracing::{debug, info, warn};

use crate::error::LinkError;
use crate::events::LinkEvent;
use crate::playback::PlaybackState;
use crate::transport::{RadioStack, TransportSession};

/// What the user can ask for from the head unit
pub trait NavigationHandler {
    /// Ask for the songs of a playlist, album or artist
    fn query(&mut self, kind: QueryKind, id: &str);

    /// Ask the phone to play `song_id`, picked at `index` of a list
    fn request_play(&mut self, song_id: &str, context: ContextKind, context_id: &str, index: u16);

    /// Play/pause, next or previous
    fn send_command(&mut self, command: TransportCommand);
}

/// Borrowed view of a session that carries out navigation intents
pub struct NavigationBridge<'a, R> {
    pub(crate) transport: &'a mut TransportSession<R>,
    pub(crate) cache: &'a mut CatalogCache,
    pub(crate) playback: &'a mut PlaybackState,
    pub(crate) events: &'a mut Vec<LinkEvent>,
}

impl<R: RadioStack> NavigationBridge<'_, R> {
    /// Frame `message` and send it in chunks of the current MTU
    pub fn send_message(&mut self, message: &Message) -> Result<(), LinkError> {
        if !self.transport.is_connected() {
            debug!("Not sending {}: no peer", message.kind().name());
            self.events.push(LinkEvent::SendDropped(message.kind()));
            return Err(LinkError::NotConnected);
        }

        let chunks = message.to_chunks(self.transport.mtu());
        debug!(
            "Sending {} in {} chunk(s)",
            message.kind().name(),
            chunks.len()
        );
        for (sent, chunk) in chunks.iter().enumerate() {
            if !self.transport.send(chunk) {
                // Later chunks cannot complete the frame
                warn!(
                    "Radio refused chunk {} of {} for {}; abandoning message",
                    sent + 1,
                    chunks.len(),
                    message.kind().name()
                );
                self.events.push(LinkEvent::SendDropped(message.kind()));
                return Err(LinkError::SendFailed);
            }
        }
        Ok(())
    }

    fn send_or_log(&mut self, message: &Message) {
        if let Err(e) = self.send_message(message) {
            debug!("{} not sent: {}", message.kind().name(), e);
        }
    }
}

impl<R: RadioStack> NavigationHandler for NavigationBridge<'_, R> {
    fn query(&mut self, kind: QueryKind, id: &str) {
        let context = SongListContext::new(kind.context(), id);
        info!("{} {:?}", kind.as_str(), id);

        // Most recent query wins; the list shows as loading until it arrives
        self.cache.set_song_context(context.clone());
        self.cache.clear_songs();
        self.events.push(LinkEvent::SongsRequested(context));

        self.send_or_log(&Message::Query {
            kind,
            id: id.to_string(),
        });
    }

    fn request_play(&mut self, song_id: &str, context: ContextKind, context_id: &str, index: u16) {
        info!(
            "Play {:?} from {} {:?} at {}",
            song_id,
            context.as_str(),
            context_id,
            index
        );

        if let Some(song) = self.cache.song_by_id(song_id) {
            self.playback.start_optimistic(song);
            self.events.push(LinkEvent::PlaybackChanged);
        }

        self.send_or_log(&Message::PlayRequest(PlayRequest {
            song_id: song_id.to_string(),
            context,
            context_id: context_id.to_string(),
            index,
        }));
    }

    fn send_command(&mut self, command: TransportCommand) {
        info!("Command {}", command.as_str());

        if command == TransportCommand::PlayPause {
            self.playback.toggle_playing();
            self.events.push(LinkEvent::PlaybackChanged);
        }

        self.send_or_log(&Message::Command(command));
    }
}
