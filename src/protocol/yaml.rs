//! YAML bodies
//!
//! The server answers `stats`, `stats-job`, `stats-tube` and the tube
//! listings with a YAML document. Stats become a flat string map; listings
//! become a list of tube names.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::{BeanError, Result};

/// Server, tube or job statistics
pub type Stats = HashMap<String, String>;

/// Decode a YAML mapping of scalars into `Stats`
///
/// Values keep the exact text the server wrote (`0.005000` stays
/// `0.005000`); a null value becomes the empty string. Nested values are
/// rejected.
pub fn decode_stats(body: &[u8]) -> Result<Stats> {
    let map: HashMap<String, Option<String>> = decode(body, "stats")?;

    Ok(map
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Decode a YAML sequence of tube names
pub fn decode_list(body: &[u8]) -> Result<Vec<String>> {
    decode(body, "tube list")
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_yaml::from_slice(body).map_err(|e| BeanError::Serialization(format!("{what}: {e}")))
}
