use crate::error::ApiError;
use crate::protocol::command::Reply;
use crate::store::Store;

/// List command: every record, in stored order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCmd;

impl ListCmd {
    /// Execute the list command
    pub fn execute(&self, store: &dyn Store) -> Reply {
        Reply::Records(store.load())
    }
}

/// Get command: one record by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCmd {
    pub id: String,
}

impl GetCmd {
    /// Create a new get command
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Execute the get command
    pub fn execute(&self, store: &dyn Store) -> Result<Reply, ApiError> {
        store
            .load()
            .into_iter()
            .find(|record| record.has_id(&self.id))
            .map(Reply::Found)
            .ok_or(ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Record;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::with_records(vec![
            serde_json::from_value(json!({"id": "1", "name": "a"})).unwrap(),
            serde_json::from_value(json!({"id": "2", "name": "b"})).unwrap(),
        ])
    }

    #[test]
    fn test_list_returns_all_in_order() {
        let store = store();
        match ListCmd.execute(&store) {
            Reply::Records(records) => {
                let ids: Vec<_> = records.iter().filter_map(Record::id).collect();
                assert_eq!(ids, vec!["1", "2"]);
            }
            other => panic!("Expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_list_empty() {
        assert_eq!(ListCmd.execute(&MemoryStore::new()), Reply::Records(vec![]));
    }

    #[test]
    fn test_get_found() {
        let store = store();
        let reply = GetCmd::new("2").execute(&store).unwrap();
        assert_eq!(
            reply,
            Reply::Found(serde_json::from_value(json!({"id": "2", "name": "b"})).unwrap())
        );
    }

    #[test]
    fn test_get_not_found() {
        let store = store();
        assert_eq!(GetCmd::new("3").execute(&store), Err(ApiError::NotFound));
    }

    #[test]
    fn test_reads_do_not_mutate() {
        let store = store();
        let before = store.load();
        let _ = ListCmd.execute(&store);
        let _ = GetCmd::new("1").execute(&store);
        let _ = GetCmd::new("missing").execute(&store);
        assert_eq!(store.load(), before);
    }
}
