pub mod in_memory_repository;

// Re-export both repository types
pub use in_memory_repository::{InMemoryAuthorRepository, InMemoryDocumentRepository};
