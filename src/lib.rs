//! flatstore: a JSON record collection served over HTTP and persisted to a
//! single file.
//!
//! Reads are public; create, update and delete require the configured API
//! key. Every mutation loads the whole collection, changes it in memory and
//! writes it back.

pub mod config;
pub mod encoding;
pub mod error;
pub mod protocol;
pub mod server;
pub mod store;
pub mod util;

pub use config::{Cli, Config};
pub use encoding::{Collection, Record};
pub use error::{ApiError, ConfigError, StoreError};
pub use server::{ApiKey, AppState, Authorizer, Server, build_router};
pub use store::{FileStore, MemoryStore, Store};
