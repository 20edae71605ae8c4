use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::message::DataEntry;

/// A value stored in a surface's data model: a scalar, an ordered sequence,
/// or a keyed mapping, recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<DataValue>),
    Map(IndexMap<String, DataValue>),
}

impl DataValue {
    /// An empty mapping, the shape intermediate path segments are created with.
    pub fn empty_map() -> Self {
        DataValue::Map(IndexMap::new())
    }

    pub fn as_array(&self) -> Option<&Vec<DataValue>> {
        match self {
            DataValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, DataValue>> {
        match self {
            DataValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for `Map` and `Array`, the two container kinds a path walk can
    /// descend into.
    pub fn is_container(&self) -> bool {
        matches!(self, DataValue::Map(_) | DataValue::Array(_))
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(b) => DataValue::Bool(b),
            serde_json::Value::Number(n) => DataValue::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => DataValue::String(s),
            serde_json::Value::Array(items) => {
                DataValue::Array(items.into_iter().map(DataValue::from).collect())
            }
            serde_json::Value::Object(entries) => DataValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, DataValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Number(n)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

/// Parse a wire `valueString`: attempt a strict JSON parse, converting the
/// result recursively so the stored shape is uniform with `valueMap`-sourced
/// data. A string that is not valid JSON is stored verbatim — this fallback
/// is expected wire behavior, not an error.
pub fn parse_value_string(raw: &str) -> DataValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(parsed) => DataValue::from(parsed),
        Err(_) => {
            log::debug!("valueString is not JSON, storing verbatim: {:?}", raw);
            DataValue::String(raw.to_string())
        }
    }
}

/// Extract the value carried by a data entry. Exactly one of the `value*`
/// fields is expected; when several are present the first in wire order
/// (string, number, boolean, map) wins, and an entry with none is skipped.
pub fn entry_value(entry: &DataEntry) -> Option<DataValue> {
    if let Some(raw) = &entry.value_string {
        return Some(parse_value_string(raw));
    }
    if let Some(n) = entry.value_number {
        return Some(DataValue::Number(n));
    }
    if let Some(b) = entry.value_boolean {
        return Some(DataValue::Bool(b));
    }
    if let Some(entries) = &entry.value_map {
        return Some(DataValue::Map(entries_to_map(entries)));
    }
    log::warn!("Data entry {:?} carries no value, skipping", entry.key);
    None
}

/// Convert a sequence of `{ key, value* }` entries into a keyed mapping.
/// The outer structure is converted directly, without JSON-parsing; each
/// entry's own `valueString` still goes through [`parse_value_string`].
pub fn entries_to_map(entries: &[DataEntry]) -> IndexMap<String, DataValue> {
    let mut map = IndexMap::new();
    for entry in entries {
        if let Some(value) = entry_value(entry) {
            map.insert(entry.key.clone(), value);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_string_parses_json_objects() {
        let value = parse_value_string(r#"{"name":"Bob","age":42}"#);
        let map = value.as_map().expect("should be a map");
        assert_eq!(map.get("name"), Some(&DataValue::String("Bob".into())));
        assert_eq!(map.get("age"), Some(&DataValue::Number(42.0)));
    }

    #[test]
    fn value_string_parses_json_arrays() {
        let value = parse_value_string(r#"[1,2,3]"#);
        assert_eq!(
            value,
            DataValue::Array(vec![
                DataValue::Number(1.0),
                DataValue::Number(2.0),
                DataValue::Number(3.0),
            ])
        );
    }

    #[test]
    fn malformed_json_falls_back_to_the_raw_string() {
        let raw = r#"[{"id":1},{"id":2}"#;
        assert_eq!(parse_value_string(raw), DataValue::String(raw.into()));
    }

    #[test]
    fn plain_strings_stay_strings() {
        assert_eq!(parse_value_string("hello"), DataValue::String("hello".into()));
    }

    #[test]
    fn nested_value_maps_convert_recursively() {
        let entries = vec![DataEntry {
            key: "user".into(),
            value_string: None,
            value_number: None,
            value_boolean: None,
            value_map: Some(vec![
                DataEntry::string("name", "Ada"),
                DataEntry::string("tags", r#"["a","b"]"#),
            ]),
        }];
        let map = entries_to_map(&entries);
        let user = map.get("user").and_then(DataValue::as_map).expect("user map");
        assert_eq!(user.get("name"), Some(&DataValue::String("Ada".into())));
        // Inner valueString entries still go through the JSON parse.
        assert_eq!(
            user.get("tags"),
            Some(&DataValue::Array(vec![
                DataValue::String("a".into()),
                DataValue::String("b".into()),
            ]))
        );
    }

    #[test]
    fn entries_without_a_value_are_skipped() {
        let entries = vec![DataEntry {
            key: "empty".into(),
            value_string: None,
            value_number: None,
            value_boolean: None,
            value_map: None,
        }];
        assert!(entries_to_map(&entries).is_empty());
    }
}
