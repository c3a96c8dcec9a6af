//! Network Module
//!
//! Transport handling for the client.
//!
//! ## Architecture
//! - One `Connection` per server, owning its stream
//! - Line and body reads share a single read buffer
//! - Exclusive access is enforced by the `Client` that owns the connection

mod connection;

pub use connection::Connection;
