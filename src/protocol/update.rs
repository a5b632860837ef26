use crate::encoding::Fields;
use crate::error::ApiError;
use crate::protocol::command::Reply;
use crate::store::Store;

/// Update command: shallow-merge fields into an existing record
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCmd {
    pub id: String,
    pub fields: Fields,
}

impl UpdateCmd {
    /// Create a new update command
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Execute the update command
    pub fn execute(&self, store: &dyn Store) -> Result<Reply, ApiError> {
        let mut records = store.load();
        let record = records
            .iter_mut()
            .find(|record| record.has_id(&self.id))
            .ok_or(ApiError::NotFound)?;

        record.overlay(self.fields.clone());
        let updated = record.clone();
        store.save(&records);

        Ok(Reply::Found(updated))
    }
}
