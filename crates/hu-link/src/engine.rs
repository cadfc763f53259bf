//! The device-side sync session
//!
//! [`SyncEngine`] owns the transport, the reassembler, the catalog cache and
//! the now-playing state. The main loop calls [`SyncEngine::tick`];
//! presentation reads the cache, drains [`LinkEvent`]s and sends intents
//! through [`NavigationHandler`].

use std::time::Instant;

use hu_library::CatalogCache;
use hu_protocol::{ContextKind, Message, QueryKind, TransportCommand};
use tracing::info;

use crate::bridge::{NavigationBridge, NavigationHandler};
use crate::config::LinkConfig;
use crate::dispatcher::Dispatcher;
use crate::error::LinkError;
use crate::events::LinkEvent;
use crate::playback::PlaybackState;
use crate::transport::{RadioStack, TransportEvent, TransportSession};

pub struct SyncEngine<R> {
    config: LinkConfig,
    transport: TransportSession<R>,
    dispatcher: Dispatcher,
    cache: CatalogCache,
    playback: PlaybackState,
    event_buffer: Vec<LinkEvent>,
}

impl<R: RadioStack> SyncEngine<R> {
    /// Create an engine with default configuration
    pub fn new(radio: R) -> Self {
        Self::with_config(radio, LinkConfig::default())
    }

    pub fn with_config(radio: R, config: LinkConfig) -> Self {
        Self {
            transport: TransportSession::new(radio, config.reconnect_grace()),
            dispatcher: Dispatcher::new(config.payload_limit()),
            cache: CatalogCache::with_limits(config.limits),
            playback: PlaybackState::new(),
            event_buffer: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Bring the radio up under the configured device name
    pub fn start(&mut self) -> Result<(), LinkError> {
        self.transport.start(&self.config.device_name)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Service the transport and apply everything it delivered
    pub fn tick_at(&mut self, now: Instant) {
        for event in self.transport.tick_at(now) {
            match event {
                TransportEvent::Connected => {
                    self.event_buffer.push(LinkEvent::Connected);
                }
                TransportEvent::Disconnected => {
                    self.dispatcher.reset();
                    self.event_buffer.push(LinkEvent::Disconnected);
                }
                TransportEvent::AdvertisingRestarted => {
                    self.event_buffer.push(LinkEvent::AdvertisingRestarted);
                }
                TransportEvent::Received(bytes) => {
                    self.dispatcher.push_chunk(
                        &bytes,
                        &mut self.cache,
                        &mut self.playback,
                        &mut self.event_buffer,
                    );
                }
            }
        }
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Local-only playback toggles (shuffle, repeat) and progress
    pub fn playback_mut(&mut self) -> &mut PlaybackState {
        &mut self.playback
    }

    pub fn transport(&self) -> &TransportSession<R> {
        &self.transport
    }

    pub fn radio(&self) -> &R {
        self.transport.radio()
    }

    pub fn radio_mut(&mut self) -> &mut R {
        self.transport.radio_mut()
    }

    /// Take all events since the last call
    pub fn drain_events(&mut self) -> Vec<LinkEvent> {
        std::mem::take(&mut self.event_buffer)
    }

    /// Forget all remote data, e.g. when the user switches phones
    pub fn reset_cache(&mut self) {
        info!("Resetting catalog cache");
        self.cache.reset();
        self.dispatcher.reset();
    }

    pub fn navigation(&mut self) -> NavigationBridge<'_, R> {
        NavigationBridge {
            transport: &mut self.transport,
            cache: &mut self.cache,
            playback: &mut self.playback,
            events: &mut self.event_buffer,
        }
    }

    /// Send an arbitrary message to the phone
    pub fn send_message(&mut self, message: &Message) -> Result<(), LinkError> {
        self.navigation().send_message(message)
    }
}

impl<R: RadioStack> NavigationHandler for SyncEngine<R> {
    fn query(&mut self, kind: QueryKind, id: &str) {
        self.navigation().query(kind, id);
    }

    fn request_play(&mut self, song_id: &str, context: ContextKind, context_id: &str, index: u16) {
        self.navigation()
            .request_play(song_id, context, context_id, index);
    }

    fn send_command(&mut self, command: TransportCommand) {
        self.navigation().send_command(command);
    }
}
