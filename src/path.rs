//! Data-model path handling.
//!
//! Paths are slash-delimited and absolute paths start with `/`. The store
//! also accepts bracket and dot notation (`items[0].name`), which
//! [`segments`] normalizes before walking.

/// Resolve a possibly-relative path against a base context path.
///
/// Absolute paths never consult the base. Relative paths are joined to the
/// base with exactly one `/`, whether or not the base already ends with one,
/// so resolution is stable for any base spelling.
pub fn resolve(path: &str, base: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let base = if base.is_empty() { "/" } else { base };
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Trim the template-placeholder prefixes from a property path binding.
///
/// Applied only while rewriting `{ path }` bindings during tree building:
/// a leading `./` is dropped, and a leading `item` token (a legacy alias for
/// the current data context) is dropped with its separator. The literal `.`
/// binds directly to the current context's value and is preserved, as are
/// absolute paths and already-bare relative paths.
///
/// `./item/name` → `name`, `./name` → `name`, `.` → `.`, `/name` → `/name`,
/// `title` → `title`.
pub fn trim_binding(path: &str) -> String {
    if path == "." {
        return path.to_string();
    }
    let trimmed = path.strip_prefix("./").unwrap_or(path);
    if trimmed == "item" {
        // A bare `item` means the current context; `.` is the canonical
        // spelling the query API understands.
        return ".".to_string();
    }
    if let Some(rest) = trimmed.strip_prefix("item/") {
        return rest.to_string();
    }
    trimmed.to_string()
}

/// Split a path into its segments, normalizing bracket accessors (`[0]`) and
/// dot accessors to plain segments. Empty segments are dropped, so `/`,
/// `""`, and a trailing slash all behave.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(|c| c == '/' || c == '.' || c == '[' || c == ']')
        .filter(|s| !s.is_empty())
        .collect()
}

/// True when a segment addresses an array index.
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_ignore_the_base() {
        assert_eq!(resolve("/name", "/items/3"), "/name");
        assert_eq!(resolve("/name", "/"), "/name");
    }

    #[test]
    fn relative_paths_join_with_one_separator() {
        assert_eq!(resolve("name", "/items/3"), "/items/3/name");
        assert_eq!(resolve("name", "/items/3/"), "/items/3/name");
        assert_eq!(resolve("name", "/"), "/name");
        assert_eq!(resolve("name", ""), "/name");
    }

    #[test]
    fn trimming_follows_the_normative_table() {
        assert_eq!(trim_binding("./item/name"), "name");
        assert_eq!(trim_binding("./name"), "name");
        assert_eq!(trim_binding("."), ".");
        assert_eq!(trim_binding("/name"), "/name");
        assert_eq!(trim_binding("title"), "title");
    }

    #[test]
    fn bare_item_means_the_current_context() {
        assert_eq!(trim_binding("item"), ".");
        assert_eq!(trim_binding("./item"), ".");
        assert_eq!(trim_binding("item/name"), "name");
    }

    #[test]
    fn segments_normalize_brackets_and_dots() {
        assert_eq!(segments("/items/0/name"), vec!["items", "0", "name"]);
        assert_eq!(segments("items[0].name"), vec!["items", "0", "name"]);
        assert_eq!(segments("book.0.title"), vec!["book", "0", "title"]);
        assert!(segments("/").is_empty());
        assert!(segments("").is_empty());
    }

    #[test]
    fn index_segments_are_all_digits() {
        assert!(is_index_segment("0"));
        assert!(is_index_segment("42"));
        assert!(!is_index_segment("items"));
        assert!(!is_index_segment("4a"));
        assert!(!is_index_segment(""));
    }
}
