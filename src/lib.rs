//! Minimal IRC Endpoint Library
//!
//! A teaching-scale IRC server built on tokio: it accepts line-oriented
//! connections, runs the NICK/USER registration handshake and answers a
//! small fixed command set with scripted replies.
//!
//! # Features
//! - CRLF line framing with reassembly of lines split across reads
//! - NICK/USER registration with a one-time welcome burst
//! - PING/PONG, and a scripted JOIN reply for registered clients
//! - Contained errors for unknown and malformed commands
//! - Read/write timeouts and a server-wide shutdown signal
//!
//! # Architecture
//! One task per connection, each owning its [`Session`] outright:
//! - [`Server`] accepts connections and spawns [`handle_connection`]
//! - [`handle_connection`] frames the stream with [`LineCodec`] and
//!   writes whatever the session returns
//! - [`Session`] is the pure state machine: one line in, replies out
//!
//! There is no shared registry, so two sessions may register the same
//! nick without noticing each other.
//!
//! # Example
//! ```ignore
//! use minimal_irc::{Server, Timeouts};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::bind("127.0.0.1:6667", Timeouts::from_secs(600, 30))
//!         .await
//!         .unwrap();
//!     server.run().await;
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::ClientState;
pub use codec::{CodecError, LineCodec};
pub use config::{Config, ConfigError, Timeouts};
pub use error::{AppError, CommandError};
pub use handler::handle_connection;
pub use message::{Command, Reply};
pub use server::Server;
pub use session::Session;
pub use types::SessionId;
