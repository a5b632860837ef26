//! JSON record type

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifying field carried by every record
pub const ID_FIELD: &str = "id";

/// Open set of fields submitted by a client
pub type Fields = Map<String, Value>;

/// Every record, in insertion order
pub type Collection = Vec<Record>;

/// A single JSON object in the collection
///
/// Field order is kept as inserted, so a created record serializes with
/// `id` first and the submitted fields after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create a record with the given id followed by `fields`.
    /// An `id` inside `fields` is dropped.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        let mut map = Map::with_capacity(fields.len() + 1);
        map.insert(ID_FIELD.to_string(), Value::String(id.into()));
        for (key, value) in fields {
            if key != ID_FIELD {
                map.insert(key, value);
            }
        }
        Self(map)
    }

    /// The record id, if present and a string
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Exact id match
    pub fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Shallow-merge `fields` into this record, leaving `id` untouched
    pub fn overlay(&mut self, fields: Fields) {
        for (key, value) in fields {
            if key != ID_FIELD {
                self.0.insert(key, value);
            }
        }
    }

    /// Look up a single field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Every field, `id` included, in stored order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}
