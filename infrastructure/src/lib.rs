// Module declarations
pub mod clock;
pub mod persistence;
pub mod search;

// Re-export all implementations
pub use clock::SystemClock;
pub use persistence::{InMemoryAuthorRepository, InMemoryDocumentRepository};

use application::DocumentManager;

/// Builds a [`DocumentManager`] over empty in-memory stores and the system clock.
pub fn in_memory_document_manager() -> DocumentManager {
    DocumentManager::new(
        Box::new(InMemoryAuthorRepository::new()),
        Box::new(InMemoryDocumentRepository::new()),
        Box::new(SystemClock),
    )
}
