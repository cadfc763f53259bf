//! Head Unit Simulation Library
//!
//! This crate provides a simulation layer for running the head unit's link
//! session without a BLE radio or a phone. It includes:
//!
//! - **VirtualRadio**: an in-process [`RadioStack`](hu_link::RadioStack) whose
//!   central side is driven by the caller
//! - **VirtualPhone**: a simulated phone app with a generated library that
//!   pushes snapshots and answers queries, play requests and commands
//!
//! # Example
//!
//! ```rust
//! use hu_link::SyncEngine;
//! use hu_sim::{VirtualPhone, VirtualRadio};
//!
//! let mut engine = SyncEngine::new(VirtualRadio::new());
//! engine.start().unwrap();
//!
//! let mut phone = VirtualPhone::default();
//! engine.radio_mut().connect();
//! phone.push_catalog();
//!
//! // Move chunks across the simulated air link, then let the device process them
//! phone.exchange(engine.radio_mut());
//! engine.tick();
//!
//! assert_eq!(engine.cache().playlist_count(), 6);
//! ```

pub mod phone;
pub mod radio;

pub use phone::{LibraryShape, PhoneLibrary, VirtualPhone, VirtualPhoneConfig};
pub use radio::VirtualRadio;
