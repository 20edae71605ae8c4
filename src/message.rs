use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::component::ComponentDescriptor;

/// A server-to-client protocol message, discriminated by its single present
/// key on the wire (`{"beginRendering": {...}}`, `{"surfaceUpdate": {...}}`,
/// and so on). Decoded once here; the engine never probes raw shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Message {
    BeginRendering(BeginRendering),
    SurfaceUpdate(SurfaceUpdate),
    DataModelUpdate(DataModelUpdate),
    DeleteSurface(DeleteSurface),
}

/// Sets a surface's root component and optional styles, which makes the
/// surface renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    pub surface_id: String,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<IndexMap<String, serde_json::Value>>,
}

/// Upserts component descriptors into a surface. A re-sent id fully
/// overwrites the previous descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    pub surface_id: String,
    pub components: Vec<ComponentDescriptor>,
}

/// Applies a merge (non-root path) or per-key replace (root path) to a
/// surface's data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    pub surface_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub contents: Vec<DataEntry>,
}

/// Removes a surface entirely: components, data model, and derived tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    pub surface_id: String,
}

/// One `{ key, value* }` entry in a data-model update. Exactly one of the
/// value fields is expected; `valueString` may carry stringified JSON and
/// `valueMap` nests further entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_map: Option<Vec<DataEntry>>,
}

impl DataEntry {
    pub fn string(key: impl Into<String>, raw: impl Into<String>) -> Self {
        DataEntry {
            key: key.into(),
            value_string: Some(raw.into()),
            value_number: None,
            value_boolean: None,
            value_map: None,
        }
    }

    pub fn number(key: impl Into<String>, value: f64) -> Self {
        DataEntry {
            key: key.into(),
            value_string: None,
            value_number: Some(value),
            value_boolean: None,
            value_map: None,
        }
    }

    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        DataEntry {
            key: key.into(),
            value_string: None,
            value_number: None,
            value_boolean: Some(value),
            value_map: None,
        }
    }

    pub fn map(key: impl Into<String>, entries: Vec<DataEntry>) -> Self {
        DataEntry {
            key: key.into(),
            value_string: None,
            value_number: None,
            value_boolean: None,
            value_map: Some(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_decode_by_their_single_present_key() {
        let json = r#"{"beginRendering":{"surfaceId":"main","root":"root"}}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        match message {
            Message::BeginRendering(begin) => {
                assert_eq!(begin.surface_id, "main");
                assert_eq!(begin.root, "root");
                assert!(begin.styles.is_none());
            }
            other => panic!("expected BeginRendering, got {:?}", other),
        }
    }

    #[test]
    fn data_model_updates_decode_nested_entries() {
        let json = r#"{
            "dataModelUpdate": {
                "surfaceId": "main",
                "path": "/user",
                "contents": [
                    { "key": "name", "valueString": "Ada" },
                    { "key": "age", "valueNumber": 36 },
                    { "key": "flags", "valueMap": [ { "key": "admin", "valueBoolean": true } ] }
                ]
            }
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        let Message::DataModelUpdate(update) = message else {
            panic!("expected DataModelUpdate");
        };
        assert_eq!(update.path.as_deref(), Some("/user"));
        assert_eq!(update.contents.len(), 3);
        assert_eq!(update.contents[1].value_number, Some(36.0));
        let flags = update.contents[2].value_map.as_ref().unwrap();
        assert_eq!(flags[0].value_boolean, Some(true));
    }
}
