//! Error types for beanwire
//!
//! Three categories reach the caller: conditions named by the server,
//! transport failures, and replies that fit no known grammar.

use thiserror::Error;

/// Result type alias using BeanError
pub type Result<T> = std::result::Result<T, BeanError>;

/// Error conditions the server reports with a bare status token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ServerError {
    #[error("server is out of memory")]
    OutOfMemory,

    #[error("server internal error")]
    InternalError,

    #[error("server is draining and not accepting new jobs")]
    Draining,

    #[error("command was badly formatted")]
    BadFormat,

    #[error("server did not recognize the command")]
    UnknownCommand,

    #[error("job or tube not found")]
    NotFound,

    #[error("job body exceeds the server's max-job-size")]
    JobTooBig,

    #[error("job body was not followed by CRLF")]
    ExpectedCrlf,

    #[error("a reserved job's TTR is about to expire")]
    DeadlineSoon,

    #[error("reserve timed out")]
    TimedOut,

    #[error("cannot ignore the only watched tube")]
    NotIgnored,
}

impl ServerError {
    /// Every condition, in the order replies are checked against them
    pub const ALL: [ServerError; 11] = [
        ServerError::OutOfMemory,
        ServerError::InternalError,
        ServerError::Draining,
        ServerError::BadFormat,
        ServerError::UnknownCommand,
        ServerError::NotFound,
        ServerError::JobTooBig,
        ServerError::ExpectedCrlf,
        ServerError::DeadlineSoon,
        ServerError::TimedOut,
        ServerError::NotIgnored,
    ];

    /// The exact reply line the server sends for this condition
    pub fn line(self) -> &'static str {
        match self {
            ServerError::OutOfMemory => "OUT_OF_MEMORY\r\n",
            ServerError::InternalError => "INTERNAL_ERROR\r\n",
            ServerError::Draining => "DRAINING\r\n",
            ServerError::BadFormat => "BAD_FORMAT\r\n",
            ServerError::UnknownCommand => "UNKNOWN_COMMAND\r\n",
            ServerError::NotFound => "NOT_FOUND\r\n",
            ServerError::JobTooBig => "JOB_TOO_BIG\r\n",
            ServerError::ExpectedCrlf => "EXPECTED_CRLF\r\n",
            ServerError::DeadlineSoon => "DEADLINE_SOON\r\n",
            ServerError::TimedOut => "TIMED_OUT\r\n",
            ServerError::NotIgnored => "NOT_IGNORED\r\n",
        }
    }

    /// Match a reply line exactly against the error tokens
    pub fn from_line(line: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.line() == line)
    }
}

/// Unified error type for beanwire operations
#[derive(Debug, Error)]
pub enum BeanError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Unexpected response: {0:?}")]
    UnexpectedResponse(String),

    /// The server buried the job because it could not grow its priority queue
    #[error("Job buried by server (id: {id:?})")]
    Buried { id: Option<u64> },

    // -------------------------------------------------------------------------
    // Client-side Validation
    // -------------------------------------------------------------------------
    #[error("Invalid tube name: {0:?}")]
    InvalidTubeName(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BeanError {
    /// The server reported NOT_FOUND
    pub fn is_not_found(&self) -> bool {
        self.server_error() == Some(ServerError::NotFound)
    }

    /// The server reported TIMED_OUT
    pub fn is_timed_out(&self) -> bool {
        self.server_error() == Some(ServerError::TimedOut)
    }

    /// The named server condition, if this is one
    pub fn server_error(&self) -> Option<ServerError> {
        match self {
            BeanError::Server(e) => Some(*e),
            _ => None,
        }
    }

    /// Whether the stream position is no longer trustworthy.
    ///
    /// A client that sees a fatal error drops its connection.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BeanError::Io(_) | BeanError::UnexpectedResponse(_) | BeanError::ConnectionClosed
        )
    }

    pub(crate) fn unexpected(line: &str) -> Self {
        BeanError::UnexpectedResponse(line.to_string())
    }
}
