use crate::search::document_matches;
use application::{ApplicationError, AuthorRepository, DocumentRepository};
use domain::{Author, AuthorId, Document, DocumentId, SearchRequest};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

// --- Author Repository Implementation ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorRepository {
    // Author ID -> Author
    authors: HashMap<AuthorId, Author>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self {
            authors: HashMap::new(),
        }
    }
}

impl AuthorRepository for InMemoryAuthorRepository {
    #[instrument(skip(self, author))]
    fn save(&mut self, id: &AuthorId, author: &Author) -> Result<(), ApplicationError> {
        debug!(author_id = %id, "Saving author to in-memory store");
        self.authors.insert(id.clone(), author.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    fn get(&self, id: &AuthorId) -> Result<Option<Author>, ApplicationError> {
        debug!(author_id = %id, "Getting author from in-memory store");
        Ok(self.authors.get(id).cloned())
    }

    fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.authors.len())
    }
}

// --- Document Repository Implementation ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    // Document ID -> Document
    documents: HashMap<DocumentId, Document>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    fn save(&mut self, id: &DocumentId, document: &Document) -> Result<(), ApplicationError> {
        debug!(doc_id = %id, "Saving document to in-memory store");
        self.documents.insert(id.clone(), document.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        Ok(self.documents.get(id).cloned())
    }

    /// Linear scan over every stored document.
    #[instrument(skip(self, request))]
    fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        debug!(candidates = self.documents.len(), "Searching in-memory store");
        let hits: Vec<Document> = self
            .documents
            .values()
            .filter(|doc| document_matches(doc, request))
            .cloned()
            .collect();
        trace!(count = hits.len(), "Documents after filtering");
        Ok(hits)
    }

    fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.documents.len())
    }
}
