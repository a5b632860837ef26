//! Time utility functions

use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current timestamp in milliseconds
///
/// A clock set before the Unix epoch reads as 0.
pub fn now_ms() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or_default()
}

/// Identifier for a newly created record: the creation time in milliseconds
pub fn timestamp_id() -> String {
  now_ms().to_string()
}
