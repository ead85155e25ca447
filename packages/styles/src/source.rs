use crate::breakpoint::{BreakpointId, BASE_BREAKPOINT};
use crate::metadata::StyleMetadata;
use crate::state::InteractionState;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type StyleSourceId = String;

/// What kind of bundle a style source is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSourceKind {
    /// Owned by the instances that reference it; freely editable
    Local,
    /// Shared design token
    Token,
    /// Shared preset
    Preset,
}

impl StyleSourceKind {
    pub fn is_editable(self) -> bool {
        matches!(self, StyleSourceKind::Local)
    }
}

impl fmt::Display for StyleSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StyleSourceKind::Local => "local",
            StyleSourceKind::Token => "token",
            StyleSourceKind::Preset => "preset",
        })
    }
}

/// A named, reusable bundle of overrides (a "class")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSource {
    pub id: StyleSourceId,
    pub kind: StyleSourceKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StyleMetadata>,
}

impl StyleSource {
    pub fn is_editable(&self) -> bool {
        self.kind.is_editable()
    }
}

/// Request to create a source in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct NewSource {
    pub kind: StyleSourceKind,
    /// Explicit name; `None` draws from the auto-naming sequence of `component_type`
    pub name: Option<String>,
    pub component_type: String,
}

impl NewSource {
    pub fn local(component_type: impl Into<String>) -> Self {
        Self {
            kind: StyleSourceKind::Local,
            name: None,
            component_type: component_type.into(),
        }
    }

    pub fn named(kind: StyleSourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            component_type: String::new(),
        }
    }
}

/// A single declared value in the raw override table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    pub source_id: StyleSourceId,
    #[serde(default = "base_breakpoint")]
    pub breakpoint_id: BreakpointId,
    #[serde(default)]
    pub state: InteractionState,
    pub property: String,
    pub value: String,
}

fn base_breakpoint() -> BreakpointId {
    BASE_BREAKPOINT.to_string()
}

impl OverrideEntry {
    /// Entry at the base breakpoint, default state
    pub fn base(
        source_id: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            breakpoint_id: base_breakpoint(),
            state: InteractionState::Default,
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn at(mut self, breakpoint_id: impl Into<String>) -> Self {
        self.breakpoint_id = breakpoint_id.into();
        self
    }

    pub fn in_state(mut self, state: InteractionState) -> Self {
        self.state = state;
        self
    }
}

/// Fork edge: `dependent` was forked from the shared source `base`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub base_id: StyleSourceId,
    pub dependent_id: StyleSourceId,
}
