//! # beanwire
//!
//! A blocking client for the beanstalkd work-queue protocol with:
//! - Exact command encoding for every protocol verb
//! - Streaming reply framing (line, then length-prefixed body)
//! - Typed replies and typed server, transport and protocol errors
//! - One connection shared safely between threads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Client                                 │
//! │          (one method per verb, Mutex per exchange)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Connection                               │
//! │              (owns the stream, read buffer)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Encoder   │          │  Line/Body  │
//!   │  (Command)  │          │   Readers   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Classifier │
//!                           │   (Reply)   │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use beanwire::Client;
//!
//! let client = Client::connect_to("127.0.0.1", 11300)?;
//! let id = client.put(1024, 0, 60, b"hello")?;
//! let job = client.reserve()?;
//! assert_eq!(job.id, id);
//! client.delete(job.id)?;
//! # Ok::<(), beanwire::BeanError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BeanError, Result, ServerError};
pub use config::Config;
pub use client::Client;
pub use protocol::{Job, Stats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of beanwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
