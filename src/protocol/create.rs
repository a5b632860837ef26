use tracing::debug;

use crate::encoding::{Fields, Record};
use crate::protocol::command::Reply;
use crate::store::Store;
use crate::util::time::timestamp_id;

/// Create command: append a record with a time-based id
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCmd {
    pub fields: Fields,
}

impl CreateCmd {
    /// Create a new create command
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    /// Execute the create command
    pub fn execute(&self, store: &dyn Store) -> Reply {
        let record = Record::new(timestamp_id(), self.fields.clone());

        let mut records = store.load();
        records.push(record.clone());
        store.save(&records);

        debug!("Created record {:?}", record.id());
        Reply::Created(record)
    }
}
