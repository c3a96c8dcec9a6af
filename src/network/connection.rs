//! Connection
//!
//! Owns the transport stream for one server connection.

use std::io::{BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{BeanError, Result};
use crate::protocol::{parse_reply, read_body, read_line, write_command, Command, Reply};

/// A single framed stream to the server
///
/// Reads go through one `BufReader`, so a body read resumes exactly where
/// the reply line ended. Writes bypass the buffer and go straight to the
/// underlying stream.
pub struct Connection<S> {
    /// Stream with a read buffer in front of it
    reader: BufReader<S>,

    /// Largest body accepted from a reply header
    max_body_size: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Open a TCP connection as described by `config`
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        let stream = match config.connect_timeout() {
            Some(timeout) => connect_any(config.addr.as_str(), timeout)?,
            None => TcpStream::connect(config.addr.as_str())?,
        };

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| config.addr.clone());

        stream.set_nodelay(config.nodelay)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self::with_peer(stream, config, peer_addr))
    }
}

/// Try every resolved address in turn, as `TcpStream::connect` does
///
/// Returns the last error once all addresses have failed.
fn connect_any<A: ToSocketAddrs>(addr: A, timeout: Duration) -> Result<TcpStream> {
    let mut last_err = None;

    for candidate in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) => BeanError::Io(e),
        None => BeanError::Config("address did not resolve".to_string()),
    })
}

impl<S: Read + Write> Connection<S> {
    /// Wrap an already-connected stream
    pub fn new(stream: S, config: &Config) -> Self {
        Self::with_peer(stream, config, config.addr.clone())
    }

    fn with_peer(stream: S, config: &Config, peer_addr: String) -> Self {
        Self {
            reader: BufReader::new(stream),
            max_body_size: config.max_body_size,
            peer_addr,
        }
    }

    /// Write one command
    pub fn send(&mut self, command: &Command<'_>) -> Result<()> {
        tracing::trace!("-> {} {}", self.peer_addr, command.verb());
        write_command(self.reader.get_mut(), command)
    }

    /// Read and classify one reply line
    ///
    /// The raw line is returned alongside the reply for error reporting.
    pub fn recv_reply(&mut self) -> Result<(Reply, String)> {
        let line = read_line(&mut self.reader)?;
        tracing::trace!("<- {} {:?}", self.peer_addr, line);

        let reply = parse_reply(&line)?;
        if let Some(len) = reply.body_len() {
            if len > self.max_body_size {
                return Err(BeanError::UnexpectedResponse(format!(
                    "{} declares {} body bytes, limit is {}",
                    line.trim_end(),
                    len,
                    self.max_body_size
                )));
            }
        }
        Ok((reply, line))
    }

    /// Read the body announced by the last reply
    pub fn recv_body(&mut self, len: usize) -> Result<Vec<u8>> {
        read_body(&mut self.reader, len)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Give back the underlying stream
    ///
    /// Bytes already buffered but not yet consumed are discarded.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}
