//! Head Unit Link Session
//!
//! This crate keeps the head unit's [`CatalogCache`](hu_library::CatalogCache)
//! in sync with the phone over a BLE UART-style link.
//!
//! # Architecture
//!
//! - [`TransportSession`]: one connection at a time over a [`RadioStack`];
//!   radio callbacks only enqueue [`RadioEvent`]s, and advertising restarts
//!   after a grace period once the phone disconnects
//! - [`Dispatcher`]: reassembles inbound chunks into frames and applies them
//!   to the cache and [`PlaybackState`]
//! - [`NavigationBridge`]: turns [`NavigationHandler`] intents into outbound
//!   messages
//! - [`SyncEngine`]: owns all of the above and is driven by a periodic tick
//!
//! Every observable change is reported as a [`LinkEvent`] through
//! [`SyncEngine::drain_events`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hu_link::{NavigationHandler, SyncEngine};
//! use hu_protocol::QueryKind;
//!
//! let mut engine = SyncEngine::new(radio);
//! engine.start()?;
//!
//! loop {
//!     engine.tick();
//!     for event in engine.drain_events() {
//!         if event.is_catalog_change() {
//!             // redraw from engine.cache()
//!         }
//!     }
//!     # break;
//! }
//!
//! engine.query(QueryKind::PlaylistSongs, "P1");
//! ```

pub mod bridge;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod events;
pub mod playback;
pub mod transport;

pub use bridge::{NavigationBridge, NavigationHandler};
pub use config::LinkConfig;
pub use dispatcher::Dispatcher;
pub use engine::SyncEngine;
pub use error::LinkError;
pub use events::LinkEvent;
pub use playback::{format_duration, NowPlaying, PlaybackState};
pub use transport::{RadioEvent, RadioEventSender, RadioStack, TransportEvent, TransportSession};
