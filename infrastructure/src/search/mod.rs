pub mod filter;

pub use filter::document_matches;
