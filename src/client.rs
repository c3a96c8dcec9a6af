//! Client Module
//!
//! The connection handle and one method per protocol verb.
//!
//! ## Concurrency Model: One Exchange at a Time
//!
//! - Every method locks the connection, writes its command, reads the reply
//!   line and any body, and only then unlocks
//! - Callers on other threads queue on the lock; exchanges never interleave
//! - A transport failure or a reply that breaks framing drops the
//!   connection; every later call fails with `BeanError::ConnectionClosed`

use std::io::{Read, Write};
use std::net::TcpStream;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{BeanError, Result};
use crate::network::Connection;
use crate::protocol::{decode_list, decode_stats, Command, Job, Reply, Stats};

/// A client for one queue server connection
///
/// `Client` is `Sync` whenever its stream is `Send`, so it can be shared
/// across threads behind an `Arc`.
pub struct Client<S = TcpStream> {
    /// The live connection; `None` once closed or broken
    conn: Mutex<Option<Connection<S>>>,
}

impl Client<TcpStream> {
    /// Connect to the server named in `config`
    pub fn connect(config: &Config) -> Result<Self> {
        let conn = Connection::connect(config)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Connect to `host:port` with default settings
    pub fn connect_to(host: &str, port: u16) -> Result<Self> {
        let config = Config::builder().addr(format!("{host}:{port}")).build();
        Self::connect(&config)
    }
}

impl<S: Read + Write> Client<S> {
    /// Build a client over an already-connected stream
    pub fn from_stream(stream: S, config: &Config) -> Self {
        Self {
            conn: Mutex::new(Some(Connection::new(stream, config))),
        }
    }

    // =========================================================================
    // Producer Operations
    // =========================================================================

    /// Submit a job to the tube in use, returning its id
    pub fn put(&self, priority: u32, delay: u32, ttr: u32, body: &[u8]) -> Result<u64> {
        let command = Command::Put {
            priority,
            delay,
            ttr,
            body,
        };
        self.exchange(&command, |_, reply, line| match reply {
            Reply::Inserted(id) => Ok(id),
            Reply::Buried(Some(id)) => Err(BeanError::Buried { id: Some(id) }),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    /// Select the tube that later puts go to
    pub fn use_tube(&self, tube: &str) -> Result<()> {
        self.exchange(&Command::Use { tube }, |_, reply, line| match reply {
            Reply::Using(_) => Ok(()),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    // =========================================================================
    // Worker Operations
    // =========================================================================

    /// Wait for a job from any watched tube
    pub fn reserve(&self) -> Result<Job> {
        self.reserve_with(&Command::Reserve)
    }

    /// Wait up to `seconds` (measured by the server) for a job
    ///
    /// Fails with `TIMED_OUT` if nothing became ready; check with
    /// [`BeanError::is_timed_out`].
    pub fn reserve_with_timeout(&self, seconds: u32) -> Result<Job> {
        self.reserve_with(&Command::ReserveWithTimeout { seconds })
    }

    fn reserve_with(&self, command: &Command<'_>) -> Result<Job> {
        self.exchange(command, |conn, reply, line| match reply {
            Reply::Reserved { id, bytes } => Ok(Job::new(id, conn.recv_body(bytes)?)),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        self.exchange(&Command::Delete { id }, |_, reply, line| match reply {
            Reply::Deleted => Ok(()),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    /// Return a reserved job to the ready queue (or delayed, if `delay > 0`)
    pub fn release(&self, id: u64, priority: u32, delay: u32) -> Result<()> {
        let command = Command::Release {
            id,
            priority,
            delay,
        };
        self.exchange(&command, |_, reply, line| match reply {
            Reply::Released => Ok(()),
            Reply::Buried(None) => Err(BeanError::Buried { id: Some(id) }),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    pub fn bury(&self, id: u64, priority: u32) -> Result<()> {
        self.exchange(&Command::Bury { id, priority }, |_, reply, line| match reply {
            Reply::Buried(None) => Ok(()),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    /// Reset the TTR clock of a reserved job
    pub fn touch(&self, id: u64) -> Result<()> {
        self.exchange(&Command::Touch { id }, |_, reply, line| match reply {
            Reply::Touched => Ok(()),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    /// Add a tube to the watch list, returning how many tubes are watched
    pub fn watch(&self, tube: &str) -> Result<u32> {
        self.exchange(&Command::Watch { tube }, Self::watching)
    }

    /// Remove a tube from the watch list, returning how many remain
    pub fn ignore(&self, tube: &str) -> Result<u32> {
        self.exchange(&Command::Ignore { tube }, Self::watching)
    }

    fn watching(_: &mut Connection<S>, reply: Reply, line: &str) -> Result<u32> {
        match reply {
            Reply::Watching(count) => Ok(count),
            _ => Err(BeanError::unexpected(line)),
        }
    }

    // =========================================================================
    // Other Operations
    // =========================================================================

    pub fn peek(&self, id: u64) -> Result<Job> {
        self.peek_with(&Command::Peek { id })
    }

    pub fn peek_ready(&self) -> Result<Job> {
        self.peek_with(&Command::PeekReady)
    }

    pub fn peek_delayed(&self) -> Result<Job> {
        self.peek_with(&Command::PeekDelayed)
    }

    pub fn peek_buried(&self) -> Result<Job> {
        self.peek_with(&Command::PeekBuried)
    }

    fn peek_with(&self, command: &Command<'_>) -> Result<Job> {
        self.exchange(command, |conn, reply, line| match reply {
            Reply::Found { id, bytes } => Ok(Job::new(id, conn.recv_body(bytes)?)),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    /// Kick up to `bound` jobs in the used tube, returning how many moved
    pub fn kick(&self, bound: u32) -> Result<u32> {
        self.exchange(&Command::Kick { bound }, |_, reply, line| match reply {
            Reply::Kicked(Some(count)) => Ok(count),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    pub fn kick_job(&self, id: u64) -> Result<()> {
        self.exchange(&Command::KickJob { id }, |_, reply, line| match reply {
            Reply::Kicked(None) => Ok(()),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    pub fn pause_tube(&self, tube: &str, delay: u32) -> Result<()> {
        self.exchange(&Command::PauseTube { tube, delay }, |_, reply, line| {
            match reply {
                Reply::Paused => Ok(()),
                _ => Err(BeanError::unexpected(line)),
            }
        })
    }

    /// Server-wide statistics
    pub fn stats(&self) -> Result<Stats> {
        self.yaml_body(&Command::Stats, decode_stats)
    }

    pub fn stats_job(&self, id: u64) -> Result<Stats> {
        self.yaml_body(&Command::StatsJob { id }, decode_stats)
    }

    pub fn stats_tube(&self, tube: &str) -> Result<Stats> {
        self.yaml_body(&Command::StatsTube { tube }, decode_stats)
    }

    /// Names of all existing tubes
    pub fn list_tubes(&self) -> Result<Vec<String>> {
        self.yaml_body(&Command::ListTubes, decode_list)
    }

    pub fn list_tubes_watched(&self) -> Result<Vec<String>> {
        self.yaml_body(&Command::ListTubesWatched, decode_list)
    }

    /// Name of the tube currently in use
    pub fn list_tube_used(&self) -> Result<String> {
        self.exchange(&Command::ListTubeUsed, |_, reply, line| match reply {
            Reply::Using(tube) => Ok(tube),
            _ => Err(BeanError::unexpected(line)),
        })
    }

    fn yaml_body<T>(&self, command: &Command<'_>, decode: fn(&[u8]) -> Result<T>) -> Result<T> {
        let body = self.exchange(command, |conn, reply, line| match reply {
            Reply::Ok { bytes } => conn.recv_body(bytes),
            _ => Err(BeanError::unexpected(line)),
        })?;
        // The body is fully read by now, so a decode failure leaves the
        // stream usable.
        decode(&body)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Send `quit` and drop the connection
    ///
    /// Closing an already-closed client is a no-op.
    pub fn close(&self) {
        if let Some(mut conn) = self.conn.lock().take() {
            if let Err(e) = conn.send(&Command::Quit) {
                tracing::debug!("quit to {} failed: {}", conn.peer_addr(), e);
            }
            tracing::debug!("Closed connection to {}", conn.peer_addr());
        }
    }

    /// Whether the connection has been closed or broken
    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }

    /// Take back the underlying stream without sending `quit`
    pub fn into_inner(self) -> Option<S> {
        self.conn.into_inner().map(Connection::into_inner)
    }

    // =========================================================================
    // Exchange
    // =========================================================================

    /// Run one full command/reply exchange under the connection lock
    ///
    /// `handle` receives the classified reply together with the raw line and
    /// must consume any body the reply announces before returning.
    fn exchange<T, F>(&self, command: &Command<'_>, handle: F) -> Result<T>
    where
        F: FnOnce(&mut Connection<S>, Reply, &str) -> Result<T>,
    {
        command.validate()?;

        let mut slot = self.conn.lock();
        let conn = slot.as_mut().ok_or(BeanError::ConnectionClosed)?;

        tracing::debug!("{} to {}", command.verb(), conn.peer_addr());

        let result = conn.send(command).and_then(|()| {
            let (reply, line) = conn.recv_reply()?;
            handle(conn, reply, &line)
        });

        if let Err(e) = &result {
            if e.is_fatal() {
                tracing::warn!(
                    "Dropping connection to {} after {}: {}",
                    conn.peer_addr(),
                    command.verb(),
                    e
                );
                *slot = None;
            }
        }

        result
    }
}
