use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A raw component as supplied by a `surfaceUpdate` message. On the wire the
/// type tag is the single key of the `component` object:
/// `{ "id": "title", "component": { "Text": { "text": "Hi" } } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    pub id: String,
    pub component_type: String,
    pub properties: IndexMap<String, PropertyValue>,
}

impl ComponentDescriptor {
    pub fn new(
        id: impl Into<String>,
        component_type: impl Into<String>,
        properties: IndexMap<String, PropertyValue>,
    ) -> Self {
        ComponentDescriptor {
            id: id.into(),
            component_type: component_type.into(),
            properties,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DescriptorWire {
    id: String,
    component: IndexMap<String, IndexMap<String, PropertyValue>>,
}

impl<'de> Deserialize<'de> for ComponentDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = DescriptorWire::deserialize(deserializer)?;
        let mut entries = wire.component.into_iter();
        let (component_type, properties) = entries
            .next()
            .ok_or_else(|| D::Error::custom("component must carry a type key"))?;
        if entries.next().is_some() {
            return Err(D::Error::custom("component must carry exactly one type key"));
        }
        Ok(ComponentDescriptor {
            id: wire.id,
            component_type,
            properties,
        })
    }
}

impl Serialize for ComponentDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut component = IndexMap::new();
        component.insert(self.component_type.clone(), self.properties.clone());
        DescriptorWire {
            id: self.id.clone(),
            component,
        }
        .serialize(serializer)
    }
}

/// One value in a component's property bag. Most values are opaque literals;
/// a map with the single key `path` is a data binding, and a map keyed
/// `explicitList` or `template` is a children spec.
///
/// Variant order matters: serde tries untagged variants in declaration
/// order, so the structural shapes must win over the plain-object fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Children(ChildrenSpec),
    Path(PathBinding),
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(IndexMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn path(path: impl Into<String>) -> Self {
        PropertyValue::Path(PathBinding { path: path.into() })
    }

    pub fn string(value: impl Into<String>) -> Self {
        PropertyValue::String(value.into())
    }

    pub fn explicit_list<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PropertyValue::Children(ChildrenSpec::ExplicitList(
            ids.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn template(component_id: impl Into<String>, data_binding: impl Into<String>) -> Self {
        PropertyValue::Children(ChildrenSpec::Template(ListTemplate {
            component_id: component_id.into(),
            data_binding: data_binding.into(),
        }))
    }
}

/// A `{ path }` data binding found in a property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathBinding {
    pub path: String,
}

/// A `children` property: either an ordered list of child component ids or a
/// template expanded once per item of a bound collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildrenSpec {
    ExplicitList(Vec<String>),
    Template(ListTemplate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListTemplate {
    pub component_id: String,
    pub data_binding: String,
}

/// A resolved node in a surface's derived component tree. Immutable per
/// rebuild; the whole tree is reconstructed on every mutating message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// The descriptor id, suffixed with `:<index>` once per enclosing
    /// template expansion level (outermost first).
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    /// Absolute data-model path this node and its descendants resolve
    /// relative bindings against.
    pub data_context_path: String,
    /// Descriptor properties with every `{ path }` binding rewritten by the
    /// trimming convention; children specs are consumed into `children`.
    pub properties: IndexMap<String, PropertyValue>,
    pub children: Vec<ComponentNode>,
}
