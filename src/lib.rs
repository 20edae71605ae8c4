//! # Server-Driven UI State Engine
//!
//! A reactive state engine for server-driven UI: it ingests an ordered
//! stream of protocol messages describing surfaces, component trees, and a
//! hierarchical data model, and continuously derives a concrete, renderable
//! component tree per surface.
//!
//! ## Features
//! - Path-addressed hierarchical data store with merge and replace semantics
//! - Recursive tree construction with cycle detection
//! - Template expansion over bound collections, re-evaluated as data arrives
//! - Relative path bindings trimmed and resolved per data context
//! - Fully isolated surfaces under one processor
//!
//! ## Example
//! ```
//! use sdui_engine::{parse_messages, Processor};
//!
//! let batch = r#"[
//!   { "surfaceUpdate": { "surfaceId": "main", "components": [
//!     { "id": "root", "component": { "Column": {
//!       "children": { "explicitList": ["greeting"] } } } },
//!     { "id": "greeting", "component": { "Text": { "text": "Hello" } } }
//!   ] } },
//!   { "beginRendering": { "surfaceId": "main", "root": "root" } }
//! ]"#;
//!
//! let mut processor = Processor::new();
//! processor
//!     .process_messages(&parse_messages(batch).unwrap())
//!     .unwrap();
//!
//! let tree = processor.surfaces()["main"].component_tree.as_ref().unwrap();
//! assert_eq!(tree.component_type, "Column");
//! assert_eq!(tree.children[0].id, "greeting");
//! ```

pub mod builder;
pub mod component;
pub mod data_model;
pub mod error;
pub mod message;
pub mod path;
pub mod processor;
pub mod surface;
pub mod value;

// --- Core types ---
pub use component::{
    ChildrenSpec, ComponentDescriptor, ComponentNode, ListTemplate, PathBinding, PropertyValue,
};
pub use data_model::DataModel;
pub use error::{EngineError, EngineResult};
pub use message::{
    BeginRendering, DataEntry, DataModelUpdate, DeleteSurface, Message, SurfaceUpdate,
};
pub use processor::{Processor, DEFAULT_SURFACE_ID};
pub use surface::Surface;
pub use value::DataValue;

/// Decode a single wire message from JSON.
pub fn parse_message(json: &str) -> EngineResult<Message> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a JSON array of wire messages, preserving order.
pub fn parse_messages(json: &str) -> EngineResult<Vec<Message>> {
    Ok(serde_json::from_str(json)?)
}
