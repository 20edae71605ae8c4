//! Recursive component-tree construction.
//!
//! Every mutating message triggers a full rebuild of the affected surface's
//! tree; there is no incremental patching. Trees are expected to be modest
//! in size, and a full pass keeps the rebuild deterministic.

use indexmap::IndexMap;

use crate::component::{ChildrenSpec, ComponentDescriptor, ComponentNode, PropertyValue};
use crate::data_model::DataModel;
use crate::error::{EngineError, EngineResult};
use crate::path;
use crate::surface::Surface;
use crate::value::DataValue;

/// Build the surface's component tree from its current root, descriptors,
/// and data model. `Ok(None)` when no root is set or the root descriptor has
/// not arrived yet; `Err` only on a circular dependency.
pub fn build_tree(surface: &Surface) -> EngineResult<Option<ComponentNode>> {
    let Some(root_id) = surface.root_component_id.as_deref() else {
        return Ok(None);
    };
    let mut ancestry = Vec::new();
    build_node(
        &surface.components,
        &surface.data_model,
        root_id,
        root_id.to_string(),
        "/",
        &mut ancestry,
        &[],
    )
}

/// Build one node. `component_id` is the descriptor to instantiate and
/// `node_id` the id the instance carries (they differ for template
/// expansions, where the instance id gains one `:<index>` suffix per
/// enclosing expansion level). `ancestry` is the chain of descriptor ids on
/// the current recursion path; `expansion` is the trail of template indices
/// enclosing this node.
fn build_node(
    components: &IndexMap<String, ComponentDescriptor>,
    data: &DataModel,
    component_id: &str,
    node_id: String,
    context_path: &str,
    ancestry: &mut Vec<String>,
    expansion: &[usize],
) -> EngineResult<Option<ComponentNode>> {
    if ancestry.iter().any(|ancestor| ancestor == component_id) {
        return Err(EngineError::CircularDependency {
            id: component_id.to_string(),
        });
    }

    let Some(descriptor) = components.get(component_id) else {
        // The descriptor may simply not have arrived yet; the next
        // surfaceUpdate rebuild will pick it up.
        log::warn!("Skipping unknown component {:?}", component_id);
        return Ok(None);
    };

    ancestry.push(component_id.to_string());

    let mut properties = IndexMap::new();
    let mut children = Vec::new();
    for (key, value) in &descriptor.properties {
        match value {
            PropertyValue::Children(spec) => {
                expand_children(
                    components, data, spec, context_path, ancestry, expansion, &mut children,
                )?;
            }
            PropertyValue::String(child_id) if key == "child" => {
                // Card-style single child: the reference is consumed into
                // the children list. An id that has not arrived yet is
                // skipped with a warning like any other missing child.
                if let Some(node) = build_node(
                    components,
                    data,
                    child_id,
                    child_id.clone(),
                    context_path,
                    ancestry,
                    expansion,
                )? {
                    children.push(node);
                }
            }
            other => {
                properties.insert(key.clone(), rewrite_bindings(other));
            }
        }
    }

    ancestry.pop();

    Ok(Some(ComponentNode {
        id: node_id,
        component_type: descriptor.component_type.clone(),
        data_context_path: context_path.to_string(),
        properties,
        children,
    }))
}

fn expand_children(
    components: &IndexMap<String, ComponentDescriptor>,
    data: &DataModel,
    spec: &ChildrenSpec,
    context_path: &str,
    ancestry: &mut Vec<String>,
    expansion: &[usize],
    children: &mut Vec<ComponentNode>,
) -> EngineResult<()> {
    match spec {
        ChildrenSpec::ExplicitList(ids) => {
            for child_id in ids {
                if let Some(node) = build_node(
                    components,
                    data,
                    child_id,
                    child_id.clone(),
                    context_path,
                    ancestry,
                    expansion,
                )? {
                    children.push(node);
                }
            }
        }
        ChildrenSpec::Template(template) => {
            let bound_path = path::resolve(&template.data_binding, context_path);
            let items = data.read(&bound_path).and_then(DataValue::as_array);
            // Missing or non-array data is not an error: the template simply
            // expands to nothing until the data arrives.
            let Some(items) = items else {
                return Ok(());
            };
            for index in 0..items.len() {
                let mut trail = expansion.to_vec();
                trail.push(index);
                let instance_id = instance_id(&template.component_id, &trail);
                let item_context = format!("{}/{}", bound_path, index);
                if let Some(node) = build_node(
                    components,
                    data,
                    &template.component_id,
                    instance_id,
                    &item_context,
                    ancestry,
                    &trail,
                )? {
                    children.push(node);
                }
            }
        }
    }
    Ok(())
}

/// `"<templateId>:<i>"`, gaining one segment per expansion level,
/// outermost first.
fn instance_id(template_id: &str, trail: &[usize]) -> String {
    let suffix: Vec<String> = trail.iter().map(usize::to_string).collect();
    format!("{}:{}", template_id, suffix.join(":"))
}

/// Rewrite every `{ path }` binding in a property value by the trimming
/// convention, recursively; everything else is passed through unchanged.
/// Property bindings stay relative — the renderer resolves them against the
/// node's `data_context_path` at display time.
fn rewrite_bindings(value: &PropertyValue) -> PropertyValue {
    match value {
        PropertyValue::Path(binding) => PropertyValue::path(path::trim_binding(&binding.path)),
        PropertyValue::Array(items) => {
            PropertyValue::Array(items.iter().map(rewrite_bindings).collect())
        }
        PropertyValue::Object(entries) => PropertyValue::Object(
            entries
                .iter()
                .map(|(key, nested)| (key.clone(), rewrite_bindings(nested)))
                .collect(),
        ),
        other => other.clone(),
    }
}
