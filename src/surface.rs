use indexmap::IndexMap;
use serde::Serialize;

use crate::component::{ComponentDescriptor, ComponentNode};
use crate::data_model::DataModel;

/// One independent rendering target. Surfaces are fully isolated: no data
/// model, component, or tree state is shared between surface ids.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    /// Set by a `beginRendering` message; the tree stays `None` until then.
    pub root_component_id: Option<String>,
    /// Opaque style bag, passed through to the renderer unmodified.
    pub styles: IndexMap<String, serde_json::Value>,
    /// Raw descriptors keyed by component id; last write per id wins.
    pub components: IndexMap<String, ComponentDescriptor>,
    pub data_model: DataModel,
    /// Derived snapshot, rebuilt from scratch on every mutating message.
    /// `None` when no root is set or the last build failed on a cycle.
    pub component_tree: Option<ComponentNode>,
}
