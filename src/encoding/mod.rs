//! Record representation for storage
//!
//! This module provides the JSON record types persisted in the data file
//! and returned over HTTP.

pub mod record;

pub use record::{Collection, Fields, Record, ID_FIELD};
