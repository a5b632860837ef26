use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::encoding::{Fields, Record};
use crate::error::ApiError;
use crate::protocol::create::CreateCmd;
use crate::protocol::delete::DeleteCmd;
use crate::protocol::get::{GetCmd, ListCmd};
use crate::protocol::update::UpdateCmd;
use crate::store::Store;

/// Data commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Every record
    List(ListCmd),
    /// One record by id
    Get(GetCmd),
    /// Append a record with a fresh id
    Create(CreateCmd),
    /// Overlay fields onto a record
    Update(UpdateCmd),
    /// Remove a record
    Delete(DeleteCmd),
}

impl Command {
    /// Whether the command changes the collection and so needs a valid API key
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::List(_) | Command::Get(_))
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::List(_) => "list",
            Command::Get(_) => "get",
            Command::Create(_) => "create",
            Command::Update(_) => "update",
            Command::Delete(_) => "delete",
        }
    }

    /// Execute the command on the given store
    pub fn execute(&self, store: &dyn Store) -> Result<Reply, ApiError> {
        match self {
            Command::List(cmd) => Ok(cmd.execute(store)),
            Command::Get(cmd) => cmd.execute(store),
            Command::Create(cmd) => Ok(cmd.execute(store)),
            Command::Update(cmd) => cmd.execute(store),
            Command::Delete(cmd) => cmd.execute(store),
        }
    }
}

/// Successful command outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 200 with the full collection
    Records(Vec<Record>),
    /// 200 with a single record
    Found(Record),
    /// 201 with the created record
    Created(Record),
    /// 204 with no body
    Deleted,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Records(records) => (StatusCode::OK, Json(records)).into_response(),
            Reply::Found(record) => (StatusCode::OK, Json(record)).into_response(),
            Reply::Created(record) => (StatusCode::CREATED, Json(record)).into_response(),
            Reply::Deleted => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Parse a request body into the fields of a record
///
/// Empty bodies and `{}` are rejected as empty; anything other than a JSON
/// object is rejected as well.
pub fn parse_fields(body: &[u8]) -> Result<Fields, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::EmptyBody);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) if fields.is_empty() => Err(ApiError::EmptyBody),
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::NotAnObject),
        Err(e) => Err(ApiError::InvalidJson(e.to_string())),
    }
}
