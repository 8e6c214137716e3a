//! Client state definition
//!
//! Holds the identity a connection builds up during the registration
//! handshake. Owned by exactly one session; never shared.

use crate::message::NO_NICK;

/// Registration state of one connected client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Nickname (None before NICK)
    pub nick: Option<String>,
    /// Username (None before USER)
    pub user: Option<String>,
    /// Set once both nick and user are known; never cleared
    registered: bool,
}

impl ClientState {
    /// Create an unregistered client
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the welcome burst has been sent
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Reply target: the nick, or `*` before one is set
    pub fn target(&self) -> &str {
        self.nick.as_deref().unwrap_or(NO_NICK)
    }

    /// Set the client's nickname
    pub fn set_nick(&mut self, nick: String) {
        self.nick = Some(nick);
    }

    /// Set the client's username
    pub fn set_user(&mut self, user: String) {
        self.user = Some(user);
    }

    /// Complete registration if possible
    ///
    /// Returns the `(nick, user)` pair only on the call that flips the
    /// client to registered; every later call returns `None`.
    pub fn try_register(&mut self) -> Option<(&str, &str)> {
        if self.registered {
            return None;
        }
        match (self.nick.as_deref(), self.user.as_deref()) {
            (Some(nick), Some(user)) if !nick.is_empty() && !user.is_empty() => {
                self.registered = true;
                Some((nick, user))
            }
            _ => None,
        }
    }

    /// Nick and user of a registered client
    pub fn identity(&self) -> Option<(&str, &str)> {
        if !self.registered {
            return None;
        }
        Some((self.nick.as_deref()?, self.user.as_deref()?))
    }
}
