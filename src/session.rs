//! Per-connection protocol state machine
//!
//! A [`Session`] consumes framed lines and produces the replies to write,
//! in order. It does no I/O, so the whole protocol can be exercised
//! without a socket; see [`crate::handler`] for the driver.

use tracing::{debug, info};

use crate::client::ClientState;
use crate::error::CommandError;
use crate::message::{Command, Reply};
use crate::types::SessionId;

/// The protocol side of one connection
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    client: ClientState,
}

impl Session {
    /// Create a session for a freshly accepted connection
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            client: ClientState::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current registration state
    pub fn client(&self) -> &ClientState {
        &self.client
    }

    /// Process one framed line
    ///
    /// Blank lines produce nothing. A malformed command produces its error
    /// numeric and leaves the session usable.
    pub fn handle_line(&mut self, line: &str) -> Vec<Reply> {
        let Some(cmd) = Command::parse(line) else {
            return Vec::new();
        };

        debug!(session = %self.id, verb = %cmd.verb, params = ?cmd.params, "Received command");

        match self.dispatch(&cmd) {
            Ok(replies) => replies,
            Err(err) => {
                debug!(session = %self.id, error = %err, "Command rejected");
                vec![Reply::from_error(err, self.client.target())]
            }
        }
    }

    fn dispatch(&mut self, cmd: &Command) -> Result<Vec<Reply>, CommandError> {
        match cmd.verb.as_str() {
            "NICK" => self.handle_nick(cmd),
            "USER" => self.handle_user(cmd),
            "PONG" => Ok(Vec::new()),
            "JOIN" if self.client.is_registered() => self.handle_join(cmd),
            "PING" => Ok(vec![Reply::Pong {
                token: cmd.param(0)?.to_string(),
            }]),
            _ => Ok(vec![self.unknown_command(cmd)]),
        }
    }

    fn unknown_command(&self, cmd: &Command) -> Reply {
        Reply::UnknownCommand {
            target: self.client.target().to_string(),
            command: cmd.verb.clone(),
        }
    }

    fn handle_nick(&mut self, cmd: &Command) -> Result<Vec<Reply>, CommandError> {
        let nick = cmd.param(0)?;

        if self.client.is_registered() {
            // Identity is fixed once the welcome burst went out.
            debug!(session = %self.id, nick, "Ignoring NICK after registration");
            return Ok(Vec::new());
        }

        self.client.set_nick(nick.to_string());
        Ok(self.try_register())
    }

    fn handle_user(&mut self, cmd: &Command) -> Result<Vec<Reply>, CommandError> {
        let user = cmd.param(0)?;

        if self.client.is_registered() {
            return Err(CommandError::AlreadyRegistered);
        }

        self.client.set_user(user.to_string());
        Ok(self.try_register())
    }

    fn handle_join(&self, cmd: &Command) -> Result<Vec<Reply>, CommandError> {
        let channel = cmd.param(0)?;
        let Some((nick, user)) = self.client.identity() else {
            return Ok(vec![self.unknown_command(cmd)]);
        };

        debug!(session = %self.id, nick, channel, "JOIN");
        Ok(Reply::join_sequence(nick, user, channel))
    }

    fn try_register(&mut self) -> Vec<Reply> {
        match self.client.try_register() {
            Some((nick, user)) => {
                info!(session = %self.id, nick, user, "Client registered");
                Reply::welcome_burst(nick, user)
            }
            None => Vec::new(),
        }
    }
}
