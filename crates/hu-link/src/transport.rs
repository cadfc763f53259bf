//! Connection lifecycle over a BLE radio stack
//!
//! The radio stack is an external collaborator reached through
//! [`RadioStack`]. Its callbacks may run on another context, so they only
//! push [`RadioEvent`]s into an unbounded queue; [`TransportSession::tick`]
//! drains that queue on the main loop and never blocks.
//!
//! After a disconnect the session waits a short grace period, measured
//! against tick timestamps, and then restarts advertising so the phone can
//! reconnect.

use std::time::{Duration, Instant};

use hu_protocol::service::{ServiceIdentity, UART_SERVICE};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::error::LinkError;

/// Raw notifications from the radio stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioEvent {
    /// A central connected
    Connected,
    /// The central went away
    Disconnected,
    /// One write to the RX characteristic, exactly as received
    Received(Vec<u8>),
}

pub type RadioEventSender = UnboundedSender<RadioEvent>;

/// Primitives a BLE peripheral stack provides
///
/// Failures inside the stack are its own business; nothing here returns a
/// typed error.
pub trait RadioStack {
    /// Bring the stack up, publish `service` and begin advertising.
    /// Connection and data callbacks are delivered through `events`.
    fn start(&mut self, device_name: &str, service: &ServiceIdentity, events: RadioEventSender);

    fn start_advertising(&mut self);

    /// Send one notification on the TX characteristic; `false` if not ready
    fn notify(&mut self, bytes: &[u8]) -> bool;

    /// Largest notification payload the current connection allows
    fn mtu(&self) -> usize;
}

/// Lifecycle and data events surfaced by [`TransportSession::tick`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    Received(Vec<u8>),
    AdvertisingRestarted,
}

/// One logical connection to a phone
pub struct TransportSession<R> {
    radio: R,
    events_tx: RadioEventSender,
    events_rx: UnboundedReceiver<RadioEvent>,
    device_name: Option<String>,
    connected: bool,
    disconnected_at: Option<Instant>,
    grace: Duration,
}

impl<R: RadioStack> TransportSession<R> {
    /// Wrap `radio`; advertising restarts `grace` after each disconnect
    pub fn new(radio: R, grace: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            radio,
            events_tx,
            events_rx,
            device_name: None,
            connected: false,
            disconnected_at: None,
            grace,
        }
    }

    /// Bring the radio up under `device_name`
    ///
    /// Only the first call does anything; later calls are logged and
    /// rejected with [`LinkError::AlreadyStarted`].
    pub fn start(&mut self, device_name: &str) -> Result<(), LinkError> {
        if let Some(name) = &self.device_name {
            warn!("Transport already started as {:?}", name);
            return Err(LinkError::AlreadyStarted);
        }
        info!(
            "Starting BLE transport as {:?} (service {})",
            device_name, UART_SERVICE.service
        );
        self.radio.start(device_name, &UART_SERVICE, self.events_tx.clone());
        self.device_name = Some(device_name.to_string());
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.device_name.is_some()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Best-effort send of one notification
    ///
    /// Dropped (returns `false`) when no peer is connected or the radio is
    /// not ready.
    pub fn send(&mut self, bytes: &[u8]) -> bool {
        if !self.connected {
            debug!("Dropping {} bytes: not connected", bytes.len());
            return false;
        }
        self.radio.notify(bytes)
    }

    pub fn mtu(&self) -> usize {
        self.radio.mtu()
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Periodic housekeeping at the current time
    pub fn tick(&mut self) -> Vec<TransportEvent> {
        self.tick_at(Instant::now())
    }

    /// Drain queued radio events in order and restart advertising once the
    /// grace period after a disconnect has passed
    pub fn tick_at(&mut self, now: Instant) -> Vec<TransportEvent> {
        let mut events = Vec::new();

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                RadioEvent::Connected => {
                    if !self.connected {
                        info!("Peer connected");
                        self.connected = true;
                        self.disconnected_at = None;
                        events.push(TransportEvent::Connected);
                    }
                }
                RadioEvent::Disconnected => {
                    if self.connected {
                        info!("Peer disconnected");
                        self.connected = false;
                        self.disconnected_at = Some(now);
                        events.push(TransportEvent::Disconnected);
                    }
                }
                RadioEvent::Received(bytes) => {
                    debug!("Received {} bytes", bytes.len());
                    events.push(TransportEvent::Received(bytes));
                }
            }
        }

        if let Some(since) = self.disconnected_at {
            if now.saturating_duration_since(since) >= self.grace {
                info!("Restarting advertising");
                self.radio.start_advertising();
                self.disconnected_at = None;
                events.push(TransportEvent::AdvertisingRestarted);
            }
        }

        events
    }
}
