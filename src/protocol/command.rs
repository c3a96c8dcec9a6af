//! Command definitions
//!
//! Represents requests sent to the server. Commands borrow their tube names
//! and bodies from the caller; they live only as long as one exchange.

use crate::error::{BeanError, Result};

/// Longest tube name the server accepts
pub const MAX_TUBE_NAME_LEN: usize = 200;

/// A request to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Submit a job to the tube in use
    Put {
        priority: u32,
        delay: u32,
        ttr: u32,
        body: &'a [u8],
    },

    /// Block until a job is ready in a watched tube
    Reserve,

    /// Like `Reserve`, but the server gives up after `seconds`
    ReserveWithTimeout { seconds: u32 },

    Delete { id: u64 },

    /// Put a reserved job back in the ready (or delayed) queue
    Release { id: u64, priority: u32, delay: u32 },

    Bury { id: u64, priority: u32 },

    /// Request more time to work on a reserved job
    Touch { id: u64 },

    /// Select the tube that later puts go to
    Use { tube: &'a str },

    /// Add a tube to the watch list
    Watch { tube: &'a str },

    /// Remove a tube from the watch list
    Ignore { tube: &'a str },

    Peek { id: u64 },
    PeekReady,
    PeekDelayed,
    PeekBuried,

    /// Move up to `bound` buried or delayed jobs into the ready queue
    Kick { bound: u32 },

    KickJob { id: u64 },

    Stats,
    StatsJob { id: u64 },
    StatsTube { tube: &'a str },
    ListTubes,
    ListTubeUsed,
    ListTubesWatched,

    /// Stop reservations from a tube for `delay` seconds
    PauseTube { tube: &'a str, delay: u32 },

    /// Close the connection
    Quit,
}

impl Command<'_> {
    /// The protocol verb, as written on the wire
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Put { .. } => "put",
            Command::Reserve => "reserve",
            Command::ReserveWithTimeout { .. } => "reserve-with-timeout",
            Command::Delete { .. } => "delete",
            Command::Release { .. } => "release",
            Command::Bury { .. } => "bury",
            Command::Touch { .. } => "touch",
            Command::Use { .. } => "use",
            Command::Watch { .. } => "watch",
            Command::Ignore { .. } => "ignore",
            Command::Peek { .. } => "peek",
            Command::PeekReady => "peek-ready",
            Command::PeekDelayed => "peek-delayed",
            Command::PeekBuried => "peek-buried",
            Command::Kick { .. } => "kick",
            Command::KickJob { .. } => "kick-job",
            Command::Stats => "stats",
            Command::StatsJob { .. } => "stats-job",
            Command::StatsTube { .. } => "stats-tube",
            Command::ListTubes => "list-tubes",
            Command::ListTubeUsed => "list-tube-used",
            Command::ListTubesWatched => "list-tubes-watched",
            Command::PauseTube { .. } => "pause-tube",
            Command::Quit => "quit",
        }
    }

    /// The tube name carried by this command, if any
    pub fn tube(&self) -> Option<&str> {
        match self {
            Command::Use { tube }
            | Command::Watch { tube }
            | Command::Ignore { tube }
            | Command::StatsTube { tube }
            | Command::PauseTube { tube, .. } => Some(*tube),
            _ => None,
        }
    }

    /// Reject commands the server would misparse.
    ///
    /// Only tube names need checking; every other argument is numeric.
    pub fn validate(&self) -> Result<()> {
        match self.tube() {
            Some(tube) => validate_tube_name(tube),
            None => Ok(()),
        }
    }
}

/// Check a tube name against the server's naming rules
///
/// Names are 1 to 200 bytes of ASCII letters, digits and `-+/;.$_()`, and
/// may not begin with a hyphen.
pub fn validate_tube_name(name: &str) -> Result<()> {
    let valid_char = |b: u8| b.is_ascii_alphanumeric() || b"-+/;.$_()".contains(&b);

    let ok = !name.is_empty()
        && name.len() <= MAX_TUBE_NAME_LEN
        && !name.starts_with('-')
        && name.bytes().all(valid_char);

    if ok {
        Ok(())
    } else {
        Err(BeanError::InvalidTubeName(name.to_string()))
    }
}
