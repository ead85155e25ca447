//! One place that reads a composite's structure back out of the tree.

use super::SemanticRole;
use pagecraft_document::{Instance, InstanceId, SlotPosition, PART_PROP};
use std::collections::BTreeMap;

/// Value of `data-part` on a composite's structural container
pub const CONTAINER_PART: &str = "container";

/// Where everything inside a composite currently sits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticView {
    pub composite_id: InstanceId,
    pub container: Option<InstanceId>,
    pub slots: BTreeMap<SlotPosition, InstanceId>,
    pub parts: BTreeMap<SemanticRole, InstanceId>,
    /// Slot each part currently sits in; absent when outside any slot
    pub placement: BTreeMap<SemanticRole, SlotPosition>,
}

impl SemanticView {
    pub fn has_slots(&self) -> bool {
        self.container.is_some() && !self.slots.is_empty()
    }

    pub fn part(&self, role: SemanticRole) -> Option<&str> {
        self.parts.get(&role).map(String::as_str)
    }

    pub fn slot(&self, position: SlotPosition) -> Option<&str> {
        self.slots.get(&position).map(String::as_str)
    }

    pub fn slot_of(&self, role: SemanticRole) -> Option<SlotPosition> {
        self.placement.get(&role).copied()
    }

    /// Parts currently in `position`, in role order
    pub fn roles_in(&self, position: SlotPosition) -> Vec<SemanticRole> {
        self.placement
            .iter()
            .filter(|(_, pos)| **pos == position)
            .map(|(role, _)| *role)
            .collect()
    }

    /// The slot position held by the brand mark, if it sits in a slot
    pub fn brand_position(&self) -> Option<SlotPosition> {
        self.slot_of(SemanticRole::BrandMark)
    }
}

/// Read the semantic view of `composite`.
///
/// The container is the first direct child marked `data-part="container"`;
/// slots are its children marked `data-slot`. Each role resolves to the
/// first matching element in document order anywhere below the composite.
pub fn project_semantic_view(composite: &Instance) -> SemanticView {
    let mut view = SemanticView {
        composite_id: composite.id.clone(),
        ..SemanticView::default()
    };

    if let Some(container) = composite
        .children
        .iter()
        .find(|child| child.prop_str(PART_PROP) == Some(CONTAINER_PART))
    {
        view.container = Some(container.id.clone());
        for slot in &container.children {
            if let Some(position) = slot.slot_position() {
                view.slots.entry(position).or_insert_with(|| slot.id.clone());
            }
        }
    }

    for child in &composite.children {
        collect_parts(child, None, &mut view);
    }

    view
}

fn collect_parts(node: &Instance, slot: Option<SlotPosition>, view: &mut SemanticView) {
    let slot = match node.slot_position() {
        Some(position) if view.slot(position) == Some(node.id.as_str()) => Some(position),
        _ => slot,
    };

    if let Some(role) = SemanticRole::of(node) {
        if !view.parts.contains_key(&role) {
            view.parts.insert(role, node.id.clone());
            if let Some(position) = slot {
                view.placement.insert(role, position);
            }
        }
        // Parts are opaque; a button inside the link list is not the CTA
        return;
    }

    for child in &node.children {
        collect_parts(child, slot, view);
    }
}
