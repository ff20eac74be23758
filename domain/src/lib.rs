use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// --- Identifiers ---

/// Identifier of a stored author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for AuthorId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for AuthorId {
    fn from(id: &str) -> Self {
        Self::new(id.to_string())
    }
}
impl From<AuthorId> for String {
    fn from(author_id: AuthorId) -> Self {
        author_id.0
    }
}
impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id.to_string())
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// An author of documents. The id stays `None` until the author is first saved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub id: Option<AuthorId>,
    pub name: String,
}

impl Author {
    /// Creates an unsaved author.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(id: impl Into<AuthorId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }
}

// --- Document ---

/// A text document written by an [`Author`].
///
/// `created` is stamped by the store on every save, so after an update it
/// holds the time of the last save rather than the first one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub id: Option<DocumentId>,
    pub title: String,
    pub content: String,
    pub author: Author,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates an unsaved document referencing `author`.
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author,
            created: None,
        }
    }

    /// Id of the referenced author, if the reference carries one.
    pub fn author_id(&self) -> Option<&AuthorId> {
        self.author.id.as_ref()
    }
}

// --- Search Request ---

/// Filters applied by a document search.
///
/// Every field is optional: an empty set or a `None` bound imposes no
/// constraint, so `SearchRequest::default()` matches every document. Values
/// inside one set are alternatives; distinct fields must all match.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// Title must start with at least one of these.
    pub title_prefixes: HashSet<String>,
    /// Content must contain at least one of these.
    pub contains_contents: HashSet<String>,
    /// Author id must be one of these.
    pub author_ids: HashSet<AuthorId>,
    /// Inclusive lower bound on `created`.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created`.
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    /// True when no field constrains the search.
    pub fn is_unconstrained(&self) -> bool {
        self.title_prefixes.is_empty()
            && self.contains_contents.is_empty()
            && self.author_ids.is_empty()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}
