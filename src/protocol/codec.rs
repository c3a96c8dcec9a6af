//! Protocol codec
//!
//! Encoding of commands and framing of replies.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! <verb> [<arg> ...]\r\n
//! [<body>\r\n]              (put only)
//! ```
//!
//! ### Reply
//! ```text
//! <STATUS> [<field> ...]\r\n
//! [<body>\r\n]              (RESERVED, FOUND, OK)
//! ```
//!
//! Replies are read through the same reader for the line and the body, so
//! the line reader must never consume past the terminator.

use std::io::{Read, Write};

use crate::error::{BeanError, Result};
use super::Command;

/// Line terminator for commands, replies and bodies
pub const CRLF: &[u8] = b"\r\n";

/// Longest reply line accepted before giving up on framing
pub const MAX_LINE_LENGTH: usize = 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: verb and arguments separated by single spaces, then CRLF. A put
/// also carries its body and a second CRLF.
pub fn encode_command(command: &Command<'_>) -> Vec<u8> {
    let verb = command.verb();

    let line = match command {
        Command::Put {
            priority,
            delay,
            ttr,
            body,
        } => format!("{verb} {priority} {delay} {ttr} {}", body.len()),
        Command::ReserveWithTimeout { seconds } => format!("{verb} {seconds}"),
        Command::Delete { id }
        | Command::Touch { id }
        | Command::Peek { id }
        | Command::KickJob { id }
        | Command::StatsJob { id } => format!("{verb} {id}"),
        Command::Release {
            id,
            priority,
            delay,
        } => format!("{verb} {id} {priority} {delay}"),
        Command::Bury { id, priority } => format!("{verb} {id} {priority}"),
        Command::Use { tube }
        | Command::Watch { tube }
        | Command::Ignore { tube }
        | Command::StatsTube { tube } => format!("{verb} {tube}"),
        Command::PauseTube { tube, delay } => format!("{verb} {tube} {delay}"),
        Command::Kick { bound } => format!("{verb} {bound}"),
        Command::Reserve
        | Command::PeekReady
        | Command::PeekDelayed
        | Command::PeekBuried
        | Command::Stats
        | Command::ListTubes
        | Command::ListTubeUsed
        | Command::ListTubesWatched
        | Command::Quit => verb.to_string(),
    };

    let body = match command {
        Command::Put { body, .. } => Some(*body),
        _ => None,
    };

    let body_len = body.map_or(0, |b| b.len() + CRLF.len());
    let mut message = Vec::with_capacity(line.len() + CRLF.len() + body_len);
    message.extend_from_slice(line.as_bytes());
    message.extend_from_slice(CRLF);
    if let Some(body) = body {
        message.extend_from_slice(body);
        message.extend_from_slice(CRLF);
    }

    message
}

/// Write a command to a stream
///
/// Callers check `Command::validate` first; this writes whatever it is given.
pub fn write_command<W: Write>(writer: &mut W, command: &Command<'_>) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Framing
// =============================================================================

/// Read one reply line, terminator included
///
/// Reads a byte at a time so nothing past the `\r\n` is consumed. Transport
/// failures, including end of stream before the terminator, surface as
/// `BeanError::Io`.
pub fn read_line<R: Read>(reader: &mut R) -> Result<String> {
    let mut line = Vec::with_capacity(64);
    let mut byte = [0u8; 1];

    while !line.ends_with(CRLF) {
        if line.len() >= MAX_LINE_LENGTH {
            return Err(BeanError::unexpected(&String::from_utf8_lossy(&line)));
        }
        reader.read_exact(&mut byte)?;
        line.push(byte[0]);
    }

    String::from_utf8(line)
        .map_err(|e| BeanError::unexpected(&String::from_utf8_lossy(e.as_bytes())))
}

/// Read a body of `len` bytes plus its trailing CRLF
///
/// Consumes exactly `len + 2` bytes and returns the first `len`. Body bytes
/// are not interpreted.
pub fn read_body<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let total = len
        .checked_add(CRLF.len())
        .ok_or_else(|| BeanError::UnexpectedResponse(format!("body length {len} overflows")))?;

    let mut body = vec![0u8; total];
    reader.read_exact(&mut body)?;

    if !body.ends_with(CRLF) {
        return Err(BeanError::UnexpectedResponse(format!(
            "body of {len} bytes not terminated by CRLF"
        )));
    }

    body.truncate(len);
    Ok(body)
}
