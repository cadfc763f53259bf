//! Error types for the link session

use thiserror::Error;

/// Errors that can occur on the link
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Inbound frame could not be decoded
    #[error("protocol error: {0}")]
    Protocol(#[from] hu_protocol::ParseError),

    /// No phone is connected
    #[error("no peer connected")]
    NotConnected,

    /// The radio refused a chunk partway through a message
    #[error("radio refused notification")]
    SendFailed,

    /// The radio stack was already brought up
    #[error("transport already started")]
    AlreadyStarted,
}
