//! Record commands
//!
//! This module maps the five data operations onto a [`Store`](crate::store::Store)
//! independently of the HTTP transport. Each command loads the whole
//! collection, works on it in memory and, for mutations, saves it back.

pub mod command;
pub mod create;
pub mod delete;
pub mod get;
pub mod update;

pub use command::{Command, Reply, parse_fields};
pub use create::CreateCmd;
pub use delete::DeleteCmd;
pub use get::{GetCmd, ListCmd};
pub use update::UpdateCmd;
