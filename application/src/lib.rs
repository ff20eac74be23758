use chrono::{DateTime, Utc};
use domain::{Author, AuthorId, Document, DocumentId, SearchRequest};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// --- Application Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum ApplicationError {
    /// A document referenced an author that is not in the author store.
    #[error("Can't find author by id {0}")]
    ReferenceNotFound(String),
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving authors.
pub trait AuthorRepository: Send + Sync {
    /// Inserts or overwrites the author stored under `id`.
    fn save(&mut self, id: &AuthorId, author: &Author) -> Result<(), ApplicationError>;
    /// Retrieves an author by its id.
    fn get(&self, id: &AuthorId) -> Result<Option<Author>, ApplicationError>;
    /// Number of stored authors.
    fn count(&self) -> Result<usize, ApplicationError>;
}

/// Interface for storing, retrieving and searching documents.
pub trait DocumentRepository: Send + Sync {
    /// Inserts or overwrites the document stored under `id`.
    fn save(&mut self, id: &DocumentId, document: &Document) -> Result<(), ApplicationError>;
    /// Retrieves a document by its id.
    fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Returns every stored document matching all constraints of `request`.
    /// Result order follows the store's iteration order.
    fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError>;
    /// Number of stored documents.
    fn count(&self) -> Result<usize, ApplicationError>;
}

/// Source of the timestamps written into `Document::created`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// --- Application Services (Use Cases) ---

/// Store facade over the author and document repositories.
///
/// Saving assigns missing ids, re-stamps `created` on every document save and
/// resolves a document's author against the author store.
pub struct DocumentManager {
    authors: Box<dyn AuthorRepository>,
    documents: Box<dyn DocumentRepository>,
    clock: Box<dyn Clock>,
}

impl DocumentManager {
    pub fn new(
        authors: Box<dyn AuthorRepository>,
        documents: Box<dyn DocumentRepository>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            authors,
            documents,
            clock,
        }
    }

    /// Upserts an author, generating an id when it has none.
    #[instrument(skip(self, author), fields(name = %author.name))]
    pub fn save_author(&mut self, mut author: Author) -> Result<Author, ApplicationError> {
        let id = author
            .id
            .get_or_insert_with(|| AuthorId::new(generate_id()))
            .clone();

        self.authors.save(&id, &author)?;
        info!(author_id = %id, "Author saved");
        Ok(author)
    }

    /// Upserts a document.
    ///
    /// Fails with [`ApplicationError::ReferenceNotFound`] when the document's
    /// author is not stored; nothing is written in that case. Otherwise the
    /// author is replaced by the stored one, a missing id is generated and
    /// `created` is set to the current time.
    #[instrument(skip(self, document), fields(title = %document.title))]
    pub fn save_document(&mut self, mut document: Document) -> Result<Document, ApplicationError> {
        let author = match document.author_id() {
            Some(author_id) => self.authors.get(author_id)?,
            None => None,
        }
        .ok_or_else(|| {
            let requested = document
                .author_id()
                .map(AuthorId::to_string)
                .unwrap_or_else(|| "<unassigned>".to_string());
            warn!(author_id = %requested, "Document save failed: author not found");
            ApplicationError::ReferenceNotFound(requested)
        })?;

        let id = document
            .id
            .get_or_insert_with(|| DocumentId::new(generate_id()))
            .clone();
        document.created = Some(self.clock.now());
        document.author = author;

        self.documents.save(&id, &document)?;
        info!(doc_id = %id, author_id = ?document.author_id(), "Document saved");
        Ok(document)
    }

    /// Returns all stored documents matching `request`.
    #[instrument(skip(self, request))]
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        let documents = self.documents.search(request)?;
        debug!(
            unconstrained = request.is_unconstrained(),
            total_hits = documents.len(),
            "Search finished"
        );
        Ok(documents)
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        let document = self.documents.get(id)?;
        debug!(found = document.is_some(), "Document lookup");
        Ok(document)
    }

    #[instrument(skip(self))]
    pub fn find_author_by_id(&self, id: &AuthorId) -> Result<Option<Author>, ApplicationError> {
        let author = self.authors.get(id)?;
        debug!(found = author.is_some(), "Author lookup");
        Ok(author)
    }

    pub fn author_count(&self) -> Result<usize, ApplicationError> {
        self.authors.count()
    }

    pub fn document_count(&self) -> Result<usize, ApplicationError> {
        self.documents.count()
    }
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    #[derive(Default)]
    struct FakeAuthors(HashMap<AuthorId, Author>);

    impl AuthorRepository for FakeAuthors {
        fn save(&mut self, id: &AuthorId, author: &Author) -> Result<(), ApplicationError> {
            self.0.insert(id.clone(), author.clone());
            Ok(())
        }
        fn get(&self, id: &AuthorId) -> Result<Option<Author>, ApplicationError> {
            Ok(self.0.get(id).cloned())
        }
        fn count(&self) -> Result<usize, ApplicationError> {
            Ok(self.0.len())
        }
    }

    // Ignores the request; filtering is covered by the infrastructure tests.
    #[derive(Default)]
    struct FakeDocuments(HashMap<DocumentId, Document>);

    impl DocumentRepository for FakeDocuments {
        fn save(&mut self, id: &DocumentId, document: &Document) -> Result<(), ApplicationError> {
            self.0.insert(id.clone(), document.clone());
            Ok(())
        }
        fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
            Ok(self.0.get(id).cloned())
        }
        fn search(&self, _request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
            Ok(self.0.values().cloned().collect())
        }
        fn count(&self) -> Result<usize, ApplicationError> {
            Ok(self.0.len())
        }
    }

    /// Advances one second on every reading.
    struct SteppingClock(AtomicI64);

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.0.fetch_add(1, Ordering::SeqCst);
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(tick)
        }
    }

    fn manager() -> DocumentManager {
        init_tracing();
        DocumentManager::new(
            Box::new(FakeAuthors::default()),
            Box::new(FakeDocuments::default()),
            Box::new(SteppingClock(AtomicI64::new(0))),
        )
    }

    #[test]
    fn save_author_assigns_unique_id() {
        let mut manager = manager();
        let ada = manager.save_author(Author::new("Ada")).unwrap();
        let alan = manager.save_author(Author::new("Alan")).unwrap();

        let ada_id = ada.id.clone().expect("id should be assigned");
        assert!(!ada_id.as_str().is_empty());
        assert_ne!(ada.id, alan.id);
        assert_eq!(manager.author_count().unwrap(), 2);
    }

    #[test]
    fn resaving_author_keeps_id_and_overwrites_fields() {
        let mut manager = manager();
        let mut ada = manager.save_author(Author::new("Ada")).unwrap();
        let id = ada.id.clone().unwrap();

        ada.name = "Ada Lovelace".to_string();
        let resaved = manager.save_author(ada).unwrap();

        assert_eq!(resaved.id.as_ref(), Some(&id));
        assert_eq!(manager.author_count().unwrap(), 1);
        let stored = manager.find_author_by_id(&id).unwrap().unwrap();
        assert_eq!(stored.name, "Ada Lovelace");
    }

    #[test]
    fn save_author_with_caller_id_uses_it() {
        let mut manager = manager();
        let saved = manager.save_author(Author::with_id("a1", "Ada")).unwrap();
        assert_eq!(saved.id, Some(AuthorId::from("a1")));
        assert!(manager.find_author_by_id(&"a1".into()).unwrap().is_some());
    }

    #[test]
    fn save_document_with_unknown_author_fails() {
        let mut manager = manager();
        let ghost = Author::with_id("missing", "Ghost");
        let result = manager.save_document(Document::new("Title", "body", ghost));

        assert_eq!(
            result,
            Err(ApplicationError::ReferenceNotFound("missing".to_string()))
        );
        assert_eq!(manager.document_count().unwrap(), 0);
    }

    #[test]
    fn save_document_with_unsaved_author_fails() {
        let mut manager = manager();
        let result = manager.save_document(Document::new("Title", "body", Author::new("Ada")));
        assert!(matches!(
            result,
            Err(ApplicationError::ReferenceNotFound(_))
        ));
        assert_eq!(manager.document_count().unwrap(), 0);
    }

    #[test]
    fn save_document_assigns_id_and_created() {
        let mut manager = manager();
        let ada = manager.save_author(Author::new("Ada")).unwrap();
        let doc = manager
            .save_document(Document::new("Intro to CS", "hello world", ada.clone()))
            .unwrap();

        assert!(doc.id.is_some());
        assert_eq!(
            doc.created,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(doc.author, ada);
    }

    #[test]
    fn resaving_document_keeps_id_and_refreshes_created() {
        let mut manager = manager();
        let ada = manager.save_author(Author::new("Ada")).unwrap();
        let first = manager
            .save_document(Document::new("Intro", "v1", ada))
            .unwrap();

        let mut update = first.clone();
        update.content = "v2".to_string();
        let second = manager.save_document(update).unwrap();

        assert_eq!(second.id, first.id);
        assert!(second.created > first.created);
        assert_eq!(manager.document_count().unwrap(), 1);

        let stored = manager.find_by_id(first.id.as_ref().unwrap()).unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[test]
    fn save_document_replaces_author_with_stored_one() {
        let mut manager = manager();
        let ada = manager.save_author(Author::with_id("a1", "Ada")).unwrap();
        let doc = manager
            .save_document(Document::new("Notes", "text", Author::with_id("a1", "stale name")))
            .unwrap();
        assert_eq!(doc.author, ada);

        manager
            .save_author(Author::with_id("a1", "Ada Lovelace"))
            .unwrap();
        let resaved = manager.save_document(doc).unwrap();
        assert_eq!(resaved.author.name, "Ada Lovelace");
    }

    #[test]
    fn find_by_id_misses_return_none() {
        let manager = manager();
        assert_eq!(manager.find_by_id(&DocumentId::from("nope")).unwrap(), None);
        assert_eq!(manager.find_author_by_id(&AuthorId::from("nope")).unwrap(), None);
    }

    #[test]
    fn reference_not_found_message_names_the_id() {
        let err = ApplicationError::ReferenceNotFound("a42".to_string());
        assert_eq!(err.to_string(), "Can't find author by id a42");
    }
}
