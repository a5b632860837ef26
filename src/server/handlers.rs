use axum::extract::{Path, State};
use bytes::Bytes;

use crate::error::ApiError;
use crate::protocol::{
    Command, CreateCmd, DeleteCmd, GetCmd, ListCmd, Reply, UpdateCmd, parse_fields,
};
use crate::server::AppState;
use crate::server::auth::Authorized;

/// GET /api/data
pub(crate) async fn list_records(State(state): State<AppState>) -> Result<Reply, ApiError> {
    state.execute(Command::List(ListCmd)).await
}

/// GET /api/data/:id
pub(crate) async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply, ApiError> {
    state.execute(Command::Get(GetCmd::new(id))).await
}

/// POST /api/data
pub(crate) async fn create_record(
    _: Authorized,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    let fields = parse_fields(&body)?;
    state.execute(Command::Create(CreateCmd::new(fields))).await
}

/// PUT /api/data/:id
pub(crate) async fn update_record(
    _: Authorized,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    let fields = parse_fields(&body)?;
    state.execute(Command::Update(UpdateCmd::new(id, fields))).await
}

/// DELETE /api/data/:id
pub(crate) async fn delete_record(
    _: Authorized,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply, ApiError> {
    state.execute(Command::Delete(DeleteCmd::new(id))).await
}
