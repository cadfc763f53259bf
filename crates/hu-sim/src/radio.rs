//! Virtual BLE peripheral
//!
//! Implements [`RadioStack`] in-process. The test or demo plays the central
//! (the phone's side of the air link) through [`connect`](VirtualRadio::connect),
//! [`write`](VirtualRadio::write) and [`take_notification`](VirtualRadio::take_notification).

use std::collections::VecDeque;

use hu_link::{RadioEvent, RadioEventSender, RadioStack};
use hu_protocol::service::ServiceIdentity;
use hu_protocol::DEFAULT_CHUNK_LEN;
use tracing::{debug, warn};

/// A simulated peripheral radio
#[derive(Debug)]
pub struct VirtualRadio {
    /// Advertised name, set by `start`
    device_name: Option<String>,
    /// GATT service published by `start`
    service: Option<ServiceIdentity>,
    /// Callback queue owned by the transport session
    events: Option<RadioEventSender>,
    advertising: bool,
    /// Times advertising was (re)started
    advertising_count: usize,
    connected: bool,
    mtu: usize,
    /// Notifications sent to the central, oldest first
    notifications: VecDeque<Vec<u8>>,
}

impl Default for VirtualRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualRadio {
    pub fn new() -> Self {
        Self::with_mtu(DEFAULT_CHUNK_LEN)
    }

    pub fn with_mtu(mtu: usize) -> Self {
        Self {
            device_name: None,
            service: None,
            events: None,
            advertising: false,
            advertising_count: 0,
            connected: false,
            mtu,
            notifications: VecDeque::new(),
        }
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn published_service(&self) -> Option<&ServiceIdentity> {
        self.service.as_ref()
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    pub fn advertising_count(&self) -> usize {
        self.advertising_count
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Change the negotiated MTU
    pub fn set_mtu(&mut self, mtu: usize) {
        self.mtu = mtu;
    }

    fn emit(&self, event: RadioEvent) {
        match &self.events {
            Some(tx) => {
                if tx.send(event).is_err() {
                    warn!("Transport session gone; event dropped");
                }
            }
            None => warn!("Radio not started; event dropped"),
        }
    }

    /// A central connects; only possible while advertising
    pub fn connect(&mut self) -> bool {
        if !self.advertising || self.connected {
            return false;
        }
        debug!("Central connected");
        self.advertising = false;
        self.connected = true;
        self.emit(RadioEvent::Connected);
        true
    }

    /// The central drops the link
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        debug!("Central disconnected");
        self.connected = false;
        self.emit(RadioEvent::Disconnected);
    }

    /// The central writes one chunk to the RX characteristic
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        if !self.connected {
            return false;
        }
        self.emit(RadioEvent::Received(bytes.to_vec()));
        true
    }

    /// Take the oldest notification the device sent
    pub fn take_notification(&mut self) -> Option<Vec<u8>> {
        self.notifications.pop_front()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }
}

impl RadioStack for VirtualRadio {
    fn start(&mut self, device_name: &str, service: &ServiceIdentity, events: RadioEventSender) {
        debug!("Publishing service {} as {:?}", service.service, device_name);
        self.device_name = Some(device_name.to_string());
        self.service = Some(*service);
        self.events = Some(events);
        self.start_advertising();
    }

    fn start_advertising(&mut self) {
        self.advertising = true;
        self.advertising_count += 1;
    }

    fn notify(&mut self, bytes: &[u8]) -> bool {
        if !self.connected {
            return false;
        }
        self.notifications.push_back(bytes.to_vec());
        true
    }

    fn mtu(&self) -> usize {
        self.mtu
    }
}
