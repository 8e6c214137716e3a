//! Error types for the IRC endpoint
//!
//! Defines session-level errors and per-command errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::codec::CodecError;

/// Application-level errors
///
/// Every variant ends the session (or, for `Bind`, the process).
/// None of them is ever shown to the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the connection (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing error (fatal)
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The peer stayed silent longer than the read timeout
    #[error("Read timed out")]
    ReadTimeout,

    /// A reply could not be flushed within the write timeout
    #[error("Write timed out")]
    WriteTimeout,

    /// The listener could not be bound (fatal at startup)
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The listener has no usable local address
    #[error("Listener address unavailable: {0}")]
    LocalAddr(std::io::Error),
}

/// Per-command errors
///
/// Recovered inside the session: each one becomes a numeric reply
/// and the session keeps processing the following lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A required argument is missing (ERR_NEEDMOREPARAMS)
    #[error("{command}: not enough parameters")]
    NeedMoreParams { command: String },

    /// Identity commands after registration (ERR_ALREADYREGISTRED)
    #[error("already registered")]
    AlreadyRegistered,
}

impl AppError {
    /// Whether this error is an ordinary end of the connection
    ///
    /// Peer resets and broken pipes are as expected as a clean close.
    pub fn is_disconnect(&self) -> bool {
        match self {
            AppError::Io(e) | AppError::Codec(CodecError::Io(e)) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }

    /// Build a bind error for the given address
    pub fn bind(addr: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Bind {
            addr: addr.into(),
            source,
        }
    }
}
