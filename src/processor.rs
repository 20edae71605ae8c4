use indexmap::IndexMap;

use crate::builder;
use crate::component::ComponentNode;
use crate::error::EngineResult;
use crate::message::Message;
use crate::path;
use crate::surface::Surface;
use crate::value::DataValue;

/// The surface id used by the query API when none is given.
pub const DEFAULT_SURFACE_ID: &str = "@default";

/// Consolidates an ordered stream of protocol messages into a map of
/// surfaces, each carrying its own data model and a derived, renderable
/// component tree.
///
/// The processor is single-threaded and synchronous: [`process_messages`]
/// fully applies every message and rebuilds the affected trees before
/// returning. Callers exposing one processor to several threads must
/// serialize access themselves.
///
/// [`process_messages`]: Processor::process_messages
#[derive(Debug, Default)]
pub struct Processor {
    surfaces: IndexMap<String, Surface>,
}

impl Processor {
    pub fn new() -> Self {
        Processor::default()
    }

    /// Apply a message batch in order, rebuilding each affected surface's
    /// tree immediately after the message that touched it.
    ///
    /// A circular component dependency aborts the call: the failing
    /// surface's tree is set to `None`, the error propagates, messages
    /// applied before the failure stay applied, and the rest of the batch is
    /// not processed.
    pub fn process_messages(&mut self, messages: &[Message]) -> EngineResult<()> {
        for message in messages {
            match message {
                Message::BeginRendering(begin) => {
                    let surface = self.surface_mut(&begin.surface_id);
                    surface.root_component_id = Some(begin.root.clone());
                    if let Some(styles) = &begin.styles {
                        surface.styles = styles.clone();
                    }
                    self.rebuild(&begin.surface_id)?;
                }
                Message::SurfaceUpdate(update) => {
                    let surface = self.surface_mut(&update.surface_id);
                    for descriptor in &update.components {
                        surface
                            .components
                            .insert(descriptor.id.clone(), descriptor.clone());
                    }
                    self.rebuild(&update.surface_id)?;
                }
                Message::DataModelUpdate(update) => {
                    let surface = self.surface_mut(&update.surface_id);
                    surface
                        .data_model
                        .apply_update(update.path.as_deref(), &update.contents);
                    self.rebuild(&update.surface_id)?;
                }
                Message::DeleteSurface(delete) => {
                    self.surfaces.shift_remove(&delete.surface_id);
                }
            }
        }
        Ok(())
    }

    /// The live surface registry. State observed here is current as soon as
    /// [`process_messages`](Processor::process_messages) returns.
    pub fn surfaces(&self) -> &IndexMap<String, Surface> {
        &self.surfaces
    }

    pub fn clear_surfaces(&mut self) {
        self.surfaces.clear();
    }

    /// Read data relative to a node's data context. The path `"."` (or an
    /// empty path) means the context value itself; other relative paths are
    /// joined to the context, absolute paths ignore it.
    pub fn get_data(
        &self,
        node: &ComponentNode,
        data_path: &str,
        surface_id: Option<&str>,
    ) -> Option<&DataValue> {
        let surface = self.surfaces.get(surface_id.unwrap_or(DEFAULT_SURFACE_ID))?;
        surface.data_model.read(&context_resolved(node, data_path))
    }

    /// Write data relative to a node's data context, creating the surface
    /// and any intermediate mappings as needed. The caller decides when to
    /// reprocess; writes here do not rebuild trees by themselves.
    pub fn set_data(
        &mut self,
        node: &ComponentNode,
        data_path: &str,
        value: DataValue,
        surface_id: Option<&str>,
    ) {
        let surface = self.surface_mut(surface_id.unwrap_or(DEFAULT_SURFACE_ID));
        surface
            .data_model
            .write(&context_resolved(node, data_path), value);
    }

    /// Read by absolute path, without a node context.
    pub fn get_data_by_path(&self, data_path: &str, surface_id: Option<&str>) -> Option<&DataValue> {
        let surface = self.surfaces.get(surface_id.unwrap_or(DEFAULT_SURFACE_ID))?;
        surface.data_model.read(data_path)
    }

    /// Write by absolute path, without a node context.
    pub fn set_data_by_path(&mut self, data_path: &str, value: DataValue, surface_id: Option<&str>) {
        let surface = self.surface_mut(surface_id.unwrap_or(DEFAULT_SURFACE_ID));
        surface.data_model.write(data_path, value);
    }

    /// Resolve a possibly-relative path against a base context path. See
    /// [`path::resolve`].
    pub fn resolve_path(&self, data_path: &str, base: &str) -> String {
        path::resolve(data_path, base)
    }

    fn surface_mut(&mut self, surface_id: &str) -> &mut Surface {
        self.surfaces.entry(surface_id.to_string()).or_default()
    }

    fn rebuild(&mut self, surface_id: &str) -> EngineResult<()> {
        let Some(surface) = self.surfaces.get_mut(surface_id) else {
            return Ok(());
        };
        match builder::build_tree(surface) {
            Ok(tree) => {
                surface.component_tree = tree;
                Ok(())
            }
            Err(err) => {
                surface.component_tree = None;
                Err(err)
            }
        }
    }
}

fn context_resolved(node: &ComponentNode, data_path: &str) -> String {
    if data_path == "." || data_path.is_empty() {
        node.data_context_path.clone()
    } else {
        path::resolve(data_path, &node.data_context_path)
    }
}
