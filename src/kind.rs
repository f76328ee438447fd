//! Hierarchical code-action-kind matching.
//!
//! Kinds are dotted strings such as `quickfix` or `source.fixAll.eslint`.
//! A kind matches a filter when it is the filter itself or a dotted
//! descendant of it, so `source.fixAll.eslint` matches `source.fixAll` but
//! `sourceX` does not match `source`.

/// Returns `true` when `kind` equals `filter` or starts with `filter`
/// followed by a `.` separator.
pub fn kind_matches(kind: &str, filter: &str) -> bool {
    match kind.strip_prefix(filter) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}
