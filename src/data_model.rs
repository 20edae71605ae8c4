use serde::Serialize;

use crate::message::DataEntry;
use crate::path;
use crate::value::{self, DataValue};

/// A surface's hierarchical key/value store. The root is always a mapping;
/// everything below it is an owned tree of [`DataValue`] nodes addressed by
/// slash-delimited paths.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DataModel {
    root: DataValue,
}

impl Default for DataModel {
    fn default() -> Self {
        DataModel {
            root: DataValue::empty_map(),
        }
    }
}

impl DataModel {
    pub fn new() -> Self {
        DataModel::default()
    }

    /// The root mapping.
    pub fn root(&self) -> &DataValue {
        &self.root
    }

    /// Apply a `dataModelUpdate` payload.
    ///
    /// At the root (`path` of `/` or absent) each entry *replaces* its key
    /// wholesale; root-level keys are never deep-merged. At a non-root path
    /// the mapping chain is navigated (created where missing), and the
    /// entries are *merged* into the mapping found there — sibling keys at
    /// that path are untouched.
    pub fn apply_update(&mut self, update_path: Option<&str>, contents: &[DataEntry]) {
        let is_root = update_path.map_or(true, |p| path::segments(p).is_empty());
        if is_root {
            for entry in contents {
                if let Some(parsed) = value::entry_value(entry) {
                    // Deliberately routed through write(): a root key like
                    // "items[0]" is path-normalized, not stored verbatim.
                    self.write(&entry.key, parsed);
                }
            }
            return;
        }

        let segments = update_path.map(path::segments).unwrap_or_default();
        let mut current = &mut self.root;
        for segment in segments {
            let Some(next) = slot_mut(current, segment) else {
                return;
            };
            current = next;
        }
        if !matches!(current, DataValue::Map(_)) {
            *current = DataValue::empty_map();
        }
        let DataValue::Map(target) = current else {
            unreachable!("target was just normalized to a mapping");
        };
        for entry in contents {
            if let Some(parsed) = value::entry_value(entry) {
                target.insert(entry.key.clone(), parsed);
            }
        }
    }

    /// Walk `path` from the root. `None` when any segment is missing or the
    /// walk hits a value it cannot descend into.
    pub fn read(&self, read_path: &str) -> Option<&DataValue> {
        let mut current = &self.root;
        for segment in path::segments(read_path) {
            current = match current {
                DataValue::Map(entries) => entries.get(segment)?,
                DataValue::Array(items) if path::is_index_segment(segment) => {
                    items.get(segment.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Walk `path`, creating intermediate mappings as needed, and set the
    /// leaf. A scalar occupying an intermediate segment is overwritten with
    /// a fresh mapping — last writer wins, never a merge-type error.
    /// Existing arrays are descended by numeric segment (padding with null
    /// when the index is past the end).
    pub fn write(&mut self, write_path: &str, value: DataValue) {
        let segments = path::segments(write_path);
        let Some((last, parents)) = segments.split_last() else {
            // Writing the root itself: only a mapping is a legal root.
            if matches!(value, DataValue::Map(_)) {
                self.root = value;
            } else {
                log::error!("Cannot set the data model root to a non-mapping value");
            }
            return;
        };

        let mut current = &mut self.root;
        for segment in parents {
            let Some(next) = slot_mut(current, segment) else {
                return;
            };
            current = next;
        }
        if let Some(slot) = slot_mut(current, last) {
            *slot = value;
        }
    }
}

/// Largest array index a write may pad out to. Anything past this (or past
/// `usize` entirely) is treated as a malformed path, not an allocation
/// request.
const MAX_ARRAY_INDEX: usize = 0xFFFF;

/// Mutable access to the slot `segment` addresses inside `container`,
/// creating it if missing. A container that cannot hold the segment (scalar,
/// or array addressed by a non-numeric segment) is overwritten with an empty
/// mapping first. `None` when the segment addresses an array with an index
/// that is out of range; the write is dropped rather than landing in the
/// wrong slot.
fn slot_mut<'a>(container: &'a mut DataValue, segment: &str) -> Option<&'a mut DataValue> {
    let descends_array =
        matches!(container, DataValue::Array(_)) && path::is_index_segment(segment);
    if !descends_array && !matches!(container, DataValue::Map(_)) {
        *container = DataValue::empty_map();
    }
    match container {
        DataValue::Array(items) => {
            let index = match segment.parse::<usize>() {
                Ok(index) if index <= MAX_ARRAY_INDEX => index,
                _ => {
                    log::warn!("Array index {:?} is out of range, ignoring write", segment);
                    return None;
                }
            };
            if index >= items.len() {
                items.resize(index + 1, DataValue::Null);
            }
            Some(&mut items[index])
        }
        DataValue::Map(entries) => Some(
            entries
                .entry(segment.to_string())
                .or_insert(DataValue::Null),
        ),
        _ => unreachable!("container was just normalized"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::DataEntry;

    #[test]
    fn write_creates_the_full_chain() {
        let mut model = DataModel::new();
        model.write("/a/b/c", DataValue::from("value"));
        assert_eq!(model.read("/a/b/c"), Some(&DataValue::String("value".into())));
    }

    #[test]
    fn read_misses_return_none() {
        let mut model = DataModel::new();
        model.write("/a", DataValue::from(1.0));
        assert_eq!(model.read("/missing"), None);
        assert_eq!(model.read("/a/deeper"), None);
    }

    #[test]
    fn writing_through_a_scalar_overwrites_it() {
        let mut model = DataModel::new();
        model.write("/a", DataValue::from("scalar"));
        model.write("/a/b", DataValue::from(2.0));
        assert_eq!(model.read("/a/b"), Some(&DataValue::Number(2.0)));
    }

    #[test]
    fn arrays_are_descended_by_numeric_segment() {
        let mut model = DataModel::new();
        model.write(
            "/items",
            DataValue::Array(vec![DataValue::from("a"), DataValue::from("b")]),
        );
        assert_eq!(model.read("/items/1"), Some(&DataValue::String("b".into())));
        model.write("/items/1", DataValue::from("c"));
        assert_eq!(model.read("/items/1"), Some(&DataValue::String("c".into())));
    }

    #[test]
    fn overlong_numeric_segment_never_aliases_index_zero() {
        let mut model = DataModel::new();
        model.write(
            "/items",
            DataValue::Array(vec![DataValue::from("a"), DataValue::from("b")]),
        );
        // Does not fit in usize; the write must be dropped, not land at 0.
        model.write("/items/99999999999999999999999", DataValue::from("X"));
        assert_eq!(model.read("/items/0"), Some(&DataValue::String("a".into())));
        assert_eq!(model.read("/items/1"), Some(&DataValue::String("b".into())));
    }

    #[test]
    fn absurd_array_index_does_not_grow_the_array() {
        let mut model = DataModel::new();
        model.write("/items", DataValue::Array(vec![DataValue::from("a")]));
        model.write("/items/4000000000", DataValue::from("X"));
        let items = model.read("/items").and_then(DataValue::as_array).expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], DataValue::String("a".into()));
    }

    #[test]
    fn out_of_range_intermediate_segment_drops_the_write() {
        let mut model = DataModel::new();
        model.write("/items", DataValue::Array(vec![DataValue::from("a")]));
        model.write("/items/99999999999999999999999/name", DataValue::from("X"));
        assert_eq!(model.read("/items/0"), Some(&DataValue::String("a".into())));
    }

    #[test]
    fn bracket_and_dot_notation_normalize() {
        let mut model = DataModel::new();
        model.write(
            "/books",
            DataValue::Array(vec![DataValue::from("dune")]),
        );
        assert_eq!(model.read("books[0]"), Some(&DataValue::String("dune".into())));
        assert_eq!(model.read("books.0"), Some(&DataValue::String("dune".into())));
    }

    #[test]
    fn root_update_replaces_keys_individually() {
        let mut model = DataModel::new();
        model.apply_update(None, &[DataEntry::string("user", r#"{"name":"Bob"}"#)]);
        model.apply_update(Some("/"), &[DataEntry::string("theme", "dark")]);

        // The second root update replaced only its own key.
        let user = model.read("/user").and_then(DataValue::as_map).expect("user");
        assert_eq!(user.get("name"), Some(&DataValue::String("Bob".into())));
        assert_eq!(model.read("/theme"), Some(&DataValue::String("dark".into())));

        // Re-sending a root key replaces it wholesale, not deep-merged.
        model.apply_update(None, &[DataEntry::string("user", r#"{"age":42}"#)]);
        let user = model.read("/user").and_then(DataValue::as_map).expect("user");
        assert_eq!(user.get("name"), None);
        assert_eq!(user.get("age"), Some(&DataValue::Number(42.0)));
    }

    #[test]
    fn sub_path_update_merges_with_siblings() {
        let mut model = DataModel::new();
        model.apply_update(None, &[DataEntry::string("user", r#"{"name":"Bob"}"#)]);
        model.apply_update(Some("/user"), &[DataEntry::string("city", "Lisbon")]);

        let user = model.read("/user").and_then(DataValue::as_map).expect("user");
        assert_eq!(user.get("name"), Some(&DataValue::String("Bob".into())));
        assert_eq!(user.get("city"), Some(&DataValue::String("Lisbon".into())));
    }

    #[test]
    fn sub_path_update_creates_missing_intermediates() {
        let mut model = DataModel::new();
        model.apply_update(Some("/a/b"), &[DataEntry::number("n", 1.0)]);
        assert_eq!(model.read("/a/b/n"), Some(&DataValue::Number(1.0)));
    }
}
