use crate::error::ApiError;
use crate::protocol::command::Reply;
use crate::store::Store;

/// Delete command: remove the record with the given id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCmd {
    pub id: String,
}

impl DeleteCmd {
    /// Create a new delete command
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Execute the delete command; nothing is written when no record matches
    pub fn execute(&self, store: &dyn Store) -> Result<Reply, ApiError> {
        let mut records = store.load();
        let before = records.len();
        records.retain(|record| !record.has_id(&self.id));

        if records.len() == before {
            return Err(ApiError::NotFound);
        }

        store.save(&records);
        Ok(Reply::Deleted)
    }
}
