use crate::element::ElementType;
use crate::props::{PropValue, Props};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type InstanceId = String;

/// Id of the page tree root
pub const ROOT_ID: &str = "root";

/// Prop marking a container as a composite layout slot
pub const SLOT_PROP: &str = "data-slot";

/// Prop marking the structural container of a composite
pub const PART_PROP: &str = "data-part";

/// Prop tagging an element with a semantic role inside a composite
pub const ROLE_PROP: &str = "data-role";

/// A named layout slot of a composite element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPosition {
    Left,
    Center,
    Right,
}

impl SlotPosition {
    pub const ALL: [SlotPosition; 3] = [
        SlotPosition::Left,
        SlotPosition::Center,
        SlotPosition::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotPosition::Left => "left",
            SlotPosition::Center => "center",
            SlotPosition::Right => "right",
        }
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SlotPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotPosition::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown slot position: {}", s))
    }
}

/// Settings of a composite element, mirrored into its child tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_position: Option<SlotPosition>,
}

/// Binds a prop to a field of an external data collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBinding {
    pub prop: String,
    pub field: String,
}

/// One node of the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: InstanceId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
    /// Order matters: later sources win ties in the cascade
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_source_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Instance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_binding_fields: Vec<DataBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_config: Option<CompositeConfig>,
}

impl Instance {
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            label: None,
            props: Props::new(),
            style_source_ids: Vec::new(),
            children: Vec::new(),
            data_binding_fields: Vec::new(),
            composite_config: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_style_source(mut self, source_id: impl Into<String>) -> Self {
        self.style_source_ids.push(source_id.into());
        self
    }

    pub fn with_child(mut self, child: Instance) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Instance>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_composite_config(mut self, config: CompositeConfig) -> Self {
        self.composite_config = Some(config);
        self
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(PropValue::as_str)
    }

    /// The slot this container stands for, if it is a composite slot
    pub fn slot_position(&self) -> Option<SlotPosition> {
        self.prop_str(SLOT_PROP).and_then(|s| s.parse().ok())
    }

    pub fn is_composite(&self) -> bool {
        self.element_type.is_composite() || self.composite_config.is_some()
    }

    /// Depth-first search of this subtree
    pub fn find(&self, id: &str) -> Option<&Instance> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Instance> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// The direct parent of `id` within this subtree
    pub fn find_parent(&self, id: &str) -> Option<&Instance> {
        if self.children.iter().any(|c| c.id == id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_parent(id))
    }

    /// Ids along the path from this node down to `id`, both ends included
    pub fn path_to(&self, id: &str) -> Option<Vec<&Instance>> {
        if self.id == id {
            return Some(vec![self]);
        }
        for child in &self.children {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// Every id in this subtree, pre-order
    pub fn ids(&self) -> Vec<&str> {
        let mut out = vec![self.id.as_str()];
        for child in &self.children {
            out.extend(child.ids());
        }
        out
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Number of nodes in this subtree, self included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Instance::size).sum::<usize>()
    }

    /// Detach the child subtree `id` from anywhere below this node
    pub(crate) fn remove_descendant(&mut self, id: &str) -> Option<Instance> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }
}

/// Partial update for [`Instance`]; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub clear_label: bool,
    /// Merged key by key into the existing props
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_props: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_source_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Instance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_binding_fields: Option<Vec<DataBinding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_config: Option<CompositeConfig>,
    #[serde(default)]
    pub clear_composite_config: bool,
}

impl InstancePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn remove_prop(mut self, key: impl Into<String>) -> Self {
        self.remove_props.push(key.into());
        self
    }

    pub fn style_source_ids(mut self, ids: Vec<String>) -> Self {
        self.style_source_ids = Some(ids);
        self
    }

    pub fn children(mut self, children: Vec<Instance>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn composite_config(mut self, config: CompositeConfig) -> Self {
        self.composite_config = Some(config);
        self
    }

    /// Whether applying this patch could change the composite settings
    pub fn touches_composite_config(&self) -> bool {
        self.composite_config.is_some() || self.clear_composite_config
    }

    /// Props as they would look after this patch
    pub(crate) fn merged_props(&self, current: &Props) -> Props {
        let mut props = current.clone();
        for key in &self.remove_props {
            props.remove(key);
        }
        for (key, value) in &self.props {
            props.insert(key.clone(), value.clone());
        }
        props
    }

    /// Shallow-merge into `target`; validation is the caller's job
    pub(crate) fn apply_to(self, target: &mut Instance) {
        target.props = self.merged_props(&target.props);
        if self.clear_label {
            target.label = None;
        }
        if let Some(label) = self.label {
            target.label = Some(label);
        }
        if let Some(ids) = self.style_source_ids {
            target.style_source_ids = ids;
        }
        if let Some(children) = self.children {
            target.children = children;
        }
        if let Some(bindings) = self.data_binding_fields {
            target.data_binding_fields = bindings;
        }
        if self.clear_composite_config {
            target.composite_config = None;
        }
        if let Some(config) = self.composite_config {
            target.composite_config = Some(config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        Instance::new("root", ElementType::Body).with_child(
            Instance::new("section", ElementType::Section)
                .with_child(Instance::new("heading", ElementType::Heading).with_prop("text", "Hi"))
                .with_child(Instance::new("para", ElementType::Paragraph)),
        )
    }

    #[test]
    fn test_find_and_parent() {
        let root = sample();
        assert_eq!(root.find("para").unwrap().element_type, ElementType::Paragraph);
        assert_eq!(root.find_parent("para").unwrap().id, "section");
        assert!(root.find_parent("root").is_none());
        assert!(root.find("missing").is_none());
    }

    #[test]
    fn test_path_and_ids() {
        let root = sample();
        let path: Vec<&str> = root
            .path_to("heading")
            .unwrap()
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(path, vec!["root", "section", "heading"]);
        assert_eq!(root.ids(), vec!["root", "section", "heading", "para"]);
        assert_eq!(root.size(), 4);
    }

    #[test]
    fn test_patch_merges_props_shallowly() {
        let mut node = Instance::new("h", ElementType::Heading)
            .with_prop("text", "Old")
            .with_prop("level", 2.0);

        InstancePatch::new()
            .prop("text", "New")
            .label("Title")
            .apply_to(&mut node);

        assert_eq!(node.prop_str("text"), Some("New"));
        assert_eq!(node.prop("level").and_then(PropValue::as_number), Some(2.0));
        assert_eq!(node.label.as_deref(), Some("Title"));

        InstancePatch::new().remove_prop("level").apply_to(&mut node);
        assert!(node.prop("level").is_none());
    }

    #[test]
    fn test_json_shape() {
        let node = Instance::new("n1", ElementType::NavBrand)
            .with_label("Logo")
            .with_style_source("src-1");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "nav-brand");
        assert_eq!(json["styleSourceIds"][0], "src-1");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_slot_position_from_prop() {
        let slot = Instance::new("s", ElementType::Container).with_prop(SLOT_PROP, "center");
        assert_eq!(slot.slot_position(), Some(SlotPosition::Center));
        assert_eq!(Instance::new("c", ElementType::Container).slot_position(), None);
    }
}
