//! Response definitions
//!
//! Classifies a reply line from the server. Error tokens are checked first
//! and must match exactly; everything else is parsed against the fixed set
//! of success grammars.

use std::str::FromStr;

use bytes::Bytes;

use crate::error::{BeanError, Result, ServerError};

/// A successful reply line, with its fields parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `INSERTED <id>`
    Inserted(u64),

    /// `BURIED` or `BURIED <id>`
    Buried(Option<u64>),

    /// `RESERVED <id> <bytes>`; a body follows
    Reserved { id: u64, bytes: usize },

    /// `FOUND <id> <bytes>`; a body follows
    Found { id: u64, bytes: usize },

    Deleted,
    Released,
    Touched,
    Paused,

    /// `KICKED <count>` from `kick`, bare `KICKED` from `kick-job`
    Kicked(Option<u32>),

    /// `USING <tube>`
    Using(String),

    /// `WATCHING <count>`
    Watching(u32),

    /// `OK <bytes>`; a YAML body follows
    Ok { bytes: usize },
}

impl Reply {
    /// Length of the body that follows this reply line, if any
    pub fn body_len(&self) -> Option<usize> {
        match self {
            Reply::Reserved { bytes, .. } | Reply::Found { bytes, .. } | Reply::Ok { bytes } => {
                Some(*bytes)
            }
            _ => None,
        }
    }
}

/// A job handed out by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Server-assigned id
    pub id: u64,

    /// Opaque payload, without framing
    pub body: Bytes,
}

impl Job {
    pub fn new(id: u64, body: impl Into<Bytes>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }
}

/// Classify a reply line (including its trailing `\r\n`)
///
/// Returns `BeanError::Server` for the eleven error tokens and
/// `BeanError::UnexpectedResponse` for anything that is neither an error
/// token nor a well-formed success reply.
pub fn parse_reply(line: &str) -> Result<Reply> {
    if let Some(err) = ServerError::from_line(line) {
        return Err(BeanError::Server(err));
    }

    let content = line
        .strip_suffix("\r\n")
        .ok_or_else(|| BeanError::unexpected(line))?;

    let mut fields = content.split(' ');
    let status = fields.next().unwrap_or_default();
    let args: Vec<&str> = fields.collect();

    let reply = match (status, args.as_slice()) {
        ("INSERTED", [id]) => number(id).map(Reply::Inserted),
        ("BURIED", []) => Some(Reply::Buried(None)),
        ("BURIED", [id]) => number(id).map(|id| Reply::Buried(Some(id))),
        ("RESERVED", [id, bytes]) => number(id)
            .zip(number(bytes))
            .map(|(id, bytes)| Reply::Reserved { id, bytes }),
        ("FOUND", [id, bytes]) => number(id)
            .zip(number(bytes))
            .map(|(id, bytes)| Reply::Found { id, bytes }),
        ("DELETED", []) => Some(Reply::Deleted),
        ("RELEASED", []) => Some(Reply::Released),
        ("TOUCHED", []) => Some(Reply::Touched),
        ("PAUSED", []) => Some(Reply::Paused),
        ("KICKED", []) => Some(Reply::Kicked(None)),
        ("KICKED", [count]) => number(count).map(|n| Reply::Kicked(Some(n))),
        ("USING", [tube]) if !tube.is_empty() => Some(Reply::Using(tube.to_string())),
        ("WATCHING", [count]) => number(count).map(Reply::Watching),
        ("OK", [bytes]) => number(bytes).map(|bytes| Reply::Ok { bytes }),
        _ => None,
    };

    reply.ok_or_else(|| BeanError::unexpected(line))
}

/// Parse an unsigned decimal field; signs and whitespace are rejected
fn number<T: FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
