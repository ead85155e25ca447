//! # Mutations
//!
//! Serializable edit intents. A property panel, a drag-and-drop surface or
//! an import script sends these to [`EditSession::apply`](crate::EditSession::apply),
//! which validates, applies, runs post-effects and records one history entry.
//!
//! ## Semantics
//!
//! ### Move
//! - Detaches the subtree and re-inserts it; ids and style references are kept
//! - Fails on cycles and placement violations; nothing changes on failure
//!
//! ### Delete
//! - Removes the node and all descendants
//! - Style sources they referenced stay in the registry
//!
//! ### Style writes
//! - `SetStyleOverride` writes straight into a source and refuses shared ones
//! - `SetInstanceStyle` targets an instance and forks shared sources first

use pagecraft_document::{Instance, InstanceId, InstancePatch, SlotPosition};
use pagecraft_styles::{InteractionState, StyleMetadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Insert a subtree under `parent_id` (page root if omitted)
    InsertInstance {
        instance: Instance,
        #[serde(default)]
        parent_id: Option<InstanceId>,
        #[serde(default)]
        index: Option<usize>,
    },

    /// Shallow-merge fields into an instance
    UpdateInstance {
        id: InstanceId,
        patch: InstancePatch,
        /// Suppress composite re-derivation when the caller is the sync itself
        #[serde(default)]
        skip_composite_sync: bool,
    },

    MoveInstance {
        id: InstanceId,
        new_parent_id: InstanceId,
        #[serde(default)]
        index: Option<usize>,
    },

    DeleteInstance {
        id: InstanceId,
    },

    /// Copy then delete, as one undo step
    Cut {
        id: InstanceId,
    },

    /// Insert a fresh copy of the clipboard
    Paste {
        #[serde(default)]
        parent_id: Option<InstanceId>,
        #[serde(default)]
        index: Option<usize>,
    },

    SetStyleOverride {
        source_id: String,
        property: String,
        value: String,
        #[serde(default)]
        breakpoint: Option<String>,
        #[serde(default)]
        state: Option<InteractionState>,
    },

    RemoveStyleOverride {
        source_id: String,
        property: String,
        #[serde(default)]
        breakpoint: Option<String>,
        #[serde(default)]
        state: Option<InteractionState>,
    },

    /// Style an instance, forking a shared source if that is what it would hit
    SetInstanceStyle {
        instance_id: InstanceId,
        property: String,
        value: String,
        #[serde(default)]
        breakpoint: Option<String>,
        #[serde(default)]
        state: Option<InteractionState>,
    },

    SetStyleMetadata {
        source_id: String,
        #[serde(default)]
        metadata: Option<StyleMetadata>,
    },

    /// Replace a shared source on an instance with an editable local copy
    ForkSource {
        instance_id: InstanceId,
        source_id: String,
    },

    ApplyTemplate {
        composite_id: InstanceId,
        template_id: String,
    },

    SetBrandPosition {
        composite_id: InstanceId,
        position: SlotPosition,
    },
}

impl Mutation {
    /// Human-readable label, used as the history entry description
    pub fn describe(&self) -> String {
        match self {
            Mutation::InsertInstance { instance, .. } => {
                format!("Insert {}", instance.element_type)
            }
            Mutation::UpdateInstance { id, .. } => format!("Update {}", id),
            Mutation::MoveInstance { id, .. } => format!("Move {}", id),
            Mutation::DeleteInstance { id } => format!("Delete {}", id),
            Mutation::Cut { id } => format!("Cut {}", id),
            Mutation::Paste { .. } => "Paste".to_string(),
            Mutation::SetStyleOverride { property, .. }
            | Mutation::SetInstanceStyle { property, .. } => format!("Set {}", property),
            Mutation::RemoveStyleOverride { property, .. } => format!("Remove {}", property),
            Mutation::SetStyleMetadata { .. } => "Edit effects".to_string(),
            Mutation::ForkSource { .. } => "Detach style".to_string(),
            Mutation::ApplyTemplate { template_id, .. } => format!("Apply {} layout", template_id),
            Mutation::SetBrandPosition { position, .. } => format!("Move brand {}", position),
        }
    }

    /// Instance the mutation targets directly, when there is one
    pub fn target(&self) -> Option<&str> {
        match self {
            Mutation::UpdateInstance { id, .. }
            | Mutation::MoveInstance { id, .. }
            | Mutation::DeleteInstance { id }
            | Mutation::Cut { id } => Some(id),
            Mutation::SetInstanceStyle { instance_id, .. }
            | Mutation::ForkSource { instance_id, .. } => Some(instance_id),
            Mutation::ApplyTemplate { composite_id, .. }
            | Mutation::SetBrandPosition { composite_id, .. } => Some(composite_id),
            _ => None,
        }
    }
}

/// What applying a mutation did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    /// Session version after the mutation
    pub version: u64,

    /// Instance or style source the mutation created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Ids of every instance removed from the document
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<InstanceId>,

    /// Parents whose child lists changed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub touched_parents: Vec<InstanceId>,

    /// Follow-up effects that ran afterwards
    #[serde(default)]
    pub follow_ups: usize,
}
