//! Message protocol definitions
//!
//! Inbound lines are tokenized into a [`Command`]; outbound lines are
//! [`Reply`] values whose `Display` output is the exact wire text
//! (without the trailing `\r\n`, which the codec appends).

use std::fmt;

use crate::error::CommandError;

/// Name the server uses as the prefix of its numerics
pub const SERVER_NAME: &str = "server";

/// Host part of every client mask
pub const CLIENT_HOST: &str = "localhost";

/// Software name announced in RPL_YOURHOST
pub const SOFTWARE: &str = "minimal-irc";

/// Version announced in RPL_MYINFO
pub const VERSION: &str = "v0.1";

/// Token of the unsolicited PING that closes the welcome burst
pub const PING_CHALLENGE: &str = "12345";

/// Placeholder target for clients without a nick
pub const NO_NICK: &str = "*";

/// Client → Server command
///
/// A whitespace-tokenized line: the verb is upper-cased, the arguments
/// are kept verbatim. There is no trailing-parameter handling, so
/// `:Real Name` arrives as two arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command word, upper-cased
    pub verb: String,
    /// Positional arguments
    pub params: Vec<String>,
}

impl Command {
    /// Tokenize a line, returning `None` for blank or whitespace-only lines
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?.to_uppercase();
        let params = parts.map(str::to_string).collect();
        Some(Self { verb, params })
    }

    /// Checked access to the argument at `index`
    ///
    /// A missing argument is a malformed command, reported as
    /// ERR_NEEDMOREPARAMS for this verb.
    pub fn param(&self, index: usize) -> Result<&str, CommandError> {
        self.params
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CommandError::NeedMoreParams {
                command: self.verb.clone(),
            })
    }
}

/// Server → Client line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 001 RPL_WELCOME
    Welcome { nick: String, user: String },
    /// 002 RPL_YOURHOST
    YourHost { nick: String },
    /// 003 RPL_CREATED
    Created { nick: String },
    /// 004 RPL_MYINFO
    MyInfo { nick: String },
    /// Unsolicited PING sent after the numerics of the welcome burst
    PingChallenge,
    /// JOIN echoed back to the joining client
    Join {
        nick: String,
        user: String,
        channel: String,
    },
    /// 331 RPL_NOTOPIC
    NoTopic { nick: String, channel: String },
    /// 353 RPL_NAMREPLY listing only the requester
    NamReply { nick: String, channel: String },
    /// 366 RPL_ENDOFNAMES
    EndOfNames { nick: String, channel: String },
    /// Answer to a client PING
    Pong { token: String },
    /// 421 ERR_UNKNOWNCOMMAND
    UnknownCommand { target: String, command: String },
    /// 461 ERR_NEEDMOREPARAMS
    NeedMoreParams { target: String, command: String },
    /// 462 ERR_ALREADYREGISTRED
    AlreadyRegistered { target: String },
}

impl Reply {
    /// The five lines sent once when registration completes, in order
    pub fn welcome_burst(nick: &str, user: &str) -> Vec<Reply> {
        vec![
            Reply::Welcome {
                nick: nick.to_string(),
                user: user.to_string(),
            },
            Reply::YourHost {
                nick: nick.to_string(),
            },
            Reply::Created {
                nick: nick.to_string(),
            },
            Reply::MyInfo {
                nick: nick.to_string(),
            },
            Reply::PingChallenge,
        ]
    }

    /// The four lines answering a JOIN, in order
    pub fn join_sequence(nick: &str, user: &str, channel: &str) -> Vec<Reply> {
        vec![
            Reply::Join {
                nick: nick.to_string(),
                user: user.to_string(),
                channel: channel.to_string(),
            },
            Reply::NoTopic {
                nick: nick.to_string(),
                channel: channel.to_string(),
            },
            Reply::NamReply {
                nick: nick.to_string(),
                channel: channel.to_string(),
            },
            Reply::EndOfNames {
                nick: nick.to_string(),
                channel: channel.to_string(),
            },
        ]
    }

    /// Convert a per-command error into the numeric shown to the client
    ///
    /// `target` is the client's nick, or `*` before one is known.
    pub fn from_error(err: CommandError, target: &str) -> Self {
        match err {
            CommandError::NeedMoreParams { command } => Reply::NeedMoreParams {
                target: target.to_string(),
                command,
            },
            CommandError::AlreadyRegistered => Reply::AlreadyRegistered {
                target: target.to_string(),
            },
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Welcome { nick, user } => write!(
                f,
                ":{SERVER_NAME} 001 {nick} :Welcome to the IRC Network {nick}!{user}@{CLIENT_HOST}"
            ),
            Reply::YourHost { nick } => write!(
                f,
                ":{SERVER_NAME} 002 {nick} :Your host is {SERVER_NAME}, running {SOFTWARE}"
            ),
            Reply::Created { nick } => {
                write!(f, ":{SERVER_NAME} 003 {nick} :This server was created today")
            }
            Reply::MyInfo { nick } => {
                write!(f, ":{SERVER_NAME} 004 {nick} {SERVER_NAME} {VERSION} o o")
            }
            Reply::PingChallenge => write!(f, "PING :{PING_CHALLENGE}"),
            Reply::Join {
                nick,
                user,
                channel,
            } => write!(f, ":{nick}!{user}@{CLIENT_HOST} JOIN {channel}"),
            Reply::NoTopic { nick, channel } => {
                write!(f, ":{SERVER_NAME} 331 {nick} {channel} :No topic set")
            }
            Reply::NamReply { nick, channel } => {
                write!(f, ":{SERVER_NAME} 353 {nick} = {channel} :{nick}")
            }
            Reply::EndOfNames { nick, channel } => {
                write!(f, ":{SERVER_NAME} 366 {nick} {channel} :End of /NAMES list.")
            }
            Reply::Pong { token } => write!(f, "PONG {token}"),
            Reply::UnknownCommand { target, command } => {
                write!(f, ":{SERVER_NAME} 421 {target} {command} :Unknown command")
            }
            Reply::NeedMoreParams { target, command } => {
                write!(f, ":{SERVER_NAME} 461 {target} {command} :Not enough parameters")
            }
            Reply::AlreadyRegistered { target } => {
                write!(f, ":{SERVER_NAME} 462 {target} :You may not reregister")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases_verb_only() {
        let cmd = Command::parse("nick Alice").unwrap();
        assert_eq!(cmd.verb, "NICK");
        assert_eq!(cmd.params, vec!["Alice"]);
    }

    #[test]
    fn test_parse_blank_lines() {
        assert!(Command::parse("").is_none());
        assert!(Command::parse("   \t ").is_none());
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let cmd = Command::parse("  USER  bob 0 *   :Bob Smith ").unwrap();
        assert_eq!(cmd.verb, "USER");
        assert_eq!(cmd.params, vec!["bob", "0", "*", ":Bob", "Smith"]);
    }

    #[test]
    fn test_missing_param_is_need_more_params() {
        let cmd = Command::parse("JOIN").unwrap();
        assert_eq!(
            cmd.param(0),
            Err(CommandError::NeedMoreParams {
                command: "JOIN".to_string()
            })
        );
    }

    #[test]
    fn test_welcome_burst_text() {
        let lines: Vec<String> = Reply::welcome_burst("alice", "al")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                ":server 001 alice :Welcome to the IRC Network alice!al@localhost",
                ":server 002 alice :Your host is server, running minimal-irc",
                ":server 003 alice :This server was created today",
                ":server 004 alice server v0.1 o o",
                "PING :12345",
            ]
        );
    }

    #[test]
    fn test_join_sequence_text() {
        let lines: Vec<String> = Reply::join_sequence("alice", "al", "#rust")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                ":alice!al@localhost JOIN #rust",
                ":server 331 alice #rust :No topic set",
                ":server 353 alice = #rust :alice",
                ":server 366 alice #rust :End of /NAMES list.",
            ]
        );
    }

    #[test]
    fn test_error_replies_text() {
        let need_more = Reply::from_error(
            CommandError::NeedMoreParams {
                command: "PING".to_string(),
            },
            NO_NICK,
        );
        assert_eq!(
            need_more.to_string(),
            ":server 461 * PING :Not enough parameters"
        );

        let rereg = Reply::from_error(CommandError::AlreadyRegistered, "alice");
        assert_eq!(rereg.to_string(), ":server 462 alice :You may not reregister");
    }
}
