use domain::{Document, SearchRequest};
use tracing::trace;

/// Checks whether `doc` satisfies every constraint of `request`.
///
/// Each non-empty field of the request must match; within a field any one
/// listed value is enough. An unconstrained request matches all documents.
pub fn document_matches(doc: &Document, request: &SearchRequest) -> bool {
    if !request.title_prefixes.is_empty()
        && !request
            .title_prefixes
            .iter()
            .any(|prefix| doc.title.starts_with(prefix.as_str()))
    {
        trace!(doc_id = ?doc.id, "Title prefix filter not met, skipping doc.");
        return false;
    }

    if !request.contains_contents.is_empty()
        && !request
            .contains_contents
            .iter()
            .any(|needle| doc.content.contains(needle.as_str()))
    {
        trace!(doc_id = ?doc.id, "Content filter not met, skipping doc.");
        return false;
    }

    if !request.author_ids.is_empty()
        && !doc
            .author_id()
            .is_some_and(|author_id| request.author_ids.contains(author_id))
    {
        trace!(doc_id = ?doc.id, "Author filter not met, skipping doc.");
        return false;
    }

    if !within_created_bounds(doc, request) {
        trace!(doc_id = ?doc.id, "Created range filter not met, skipping doc.");
        return false;
    }

    true
}

/// Both bounds are inclusive. An unstamped document fails any set bound.
fn within_created_bounds(doc: &Document, request: &SearchRequest) -> bool {
    if request.created_from.is_none() && request.created_to.is_none() {
        return true;
    }
    let Some(created) = doc.created else {
        return false;
    };
    request.created_from.is_none_or(|from| created >= from)
        && request.created_to.is_none_or(|to| created <= to)
}
