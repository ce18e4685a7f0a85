//! Storage trait and record filters.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

/// How a filter compares a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals value; a missing field equals `null`
    Eq,
    /// Field differs from value
    Ne,
    /// Field is present and not `null`
    Present,
}

/// One predicate over a stored record's top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    pub fn present(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Present, Value::Null)
    }

    fn new(field: impl Into<String>, op: FilterOp, value: impl Serialize) -> Self {
        Self {
            field: field.into(),
            op,
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }

    /// Check a serialized record against this filter.
    pub fn matches(&self, record: &Value) -> bool {
        let field = record.get(&self.field).unwrap_or(&Value::Null);
        match self.op {
            FilterOp::Eq => *field == self.value,
            FilterOp::Ne => *field != self.value,
            FilterOp::Present => !field.is_null(),
        }
    }
}

/// Records addressable by a string id.
pub trait HasId {
    fn id(&self) -> &str;
}

/// Collection-oriented CRUD over serializable records.
pub trait Storage: Send + Sync {
    /// Insert a new record; fails if the id already exists in the collection.
    fn create<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()>;

    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>>;

    /// Replace an existing record; `NotFound` if absent.
    fn update<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()>;

    /// Remove a record by id; `NotFound` if absent.
    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Remove every record matching all filters, returning how many went.
    fn delete_where(&self, collection: &str, filters: &[Filter]) -> Result<usize>;

    /// Records matching all filters, in insertion order.
    fn query<T: DeserializeOwned>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>>;

    fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.query(collection, &[])
    }
}
