//! Document store types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field map of a stored document
pub type FieldMap = serde_json::Map<String, Value>;

/// Store-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: FieldMap,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a single field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Reference to a document returned by a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub collection: String,
    pub id: DocumentId,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<DocumentId>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Ordered result set of a query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    docs: Vec<Document>,
}

impl Snapshot {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn into_docs(self) -> Vec<Document> {
        self.docs
    }
}

/// Field filter applied by a query
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field is an array holding an element equal to `value`
    ArrayContains { field: String, value: Value },
    /// Field equals `value`
    Equals { field: String, value: Value },
}

impl Filter {
    /// Check whether a field map satisfies this filter
    pub fn matches(&self, fields: &FieldMap) -> bool {
        match self {
            Filter::ArrayContains { field, value } => fields
                .get(field)
                .and_then(Value::as_array)
                .map(|items| items.iter().any(|item| item == value))
                .unwrap_or(false),
            Filter::Equals { field, value } => fields.get(field) == Some(value),
        }
    }
}

/// A collection query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Option<Filter>,
}

impl Query {
    /// Query every document in a collection
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filter: None,
        }
    }

    pub fn array_contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter::ArrayContains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Check whether a document belongs to this query's result set
    pub fn matches(&self, fields: &FieldMap) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(fields))
    }
}

/// State of a live query as seen by a subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// No result set has been delivered yet
    Loading,
    /// Full current result set
    Ready(Snapshot),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            QueryState::Loading => None,
            QueryState::Ready(snapshot) => Some(snapshot),
        }
    }
}
