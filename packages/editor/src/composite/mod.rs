//! # Slot-Based Composite Layout
//!
//! A composite (e.g. a navbar) keeps a materialized child tree:
//!
//! ```text
//! navbar
//! └── container            data-part="container"
//!     ├── slot             data-slot="left"
//!     ├── slot             data-slot="center"
//!     └── slot             data-slot="right"
//! ```
//!
//! Its semantic parts (brand mark, link list, call-to-action) live in the
//! slots. Templates and brand positions only ever *move* those parts, so
//! ids, labels, props and style references survive every layout change.

pub mod layout;
pub mod projection;
pub mod template;

pub use layout::{
    apply_template, ensure_slots, refresh_slot_visibility, set_brand_position, sync_composite,
    LayoutContext,
};
pub use projection::{project_semantic_view, SemanticView};
pub use template::{builtin_templates, find_template, LayoutTemplate};

use pagecraft_document::{ElementType, Instance, ROLE_PROP};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticRole {
    BrandMark,
    LinkList,
    CallToAction,
}

impl SemanticRole {
    pub const ALL: [SemanticRole; 3] = [
        SemanticRole::BrandMark,
        SemanticRole::LinkList,
        SemanticRole::CallToAction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticRole::BrandMark => "brand-mark",
            SemanticRole::LinkList => "link-list",
            SemanticRole::CallToAction => "call-to-action",
        }
    }

    /// Role of `instance` inside a composite.
    ///
    /// An explicit `data-role` prop wins; otherwise the element type decides.
    pub fn of(instance: &Instance) -> Option<SemanticRole> {
        if let Some(role) = instance.prop_str(ROLE_PROP) {
            return role.parse().ok();
        }
        match instance.element_type {
            ElementType::NavBrand => Some(SemanticRole::BrandMark),
            ElementType::NavMenu => Some(SemanticRole::LinkList),
            ElementType::Button => Some(SemanticRole::CallToAction),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SemanticRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown semantic role: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_type() {
        let brand = Instance::new("b", ElementType::NavBrand);
        let menu = Instance::new("m", ElementType::NavMenu);
        let text = Instance::new("t", ElementType::Text);

        assert_eq!(SemanticRole::of(&brand), Some(SemanticRole::BrandMark));
        assert_eq!(SemanticRole::of(&menu), Some(SemanticRole::LinkList));
        assert_eq!(SemanticRole::of(&text), None);
    }

    #[test]
    fn test_explicit_role_wins() {
        let link = Instance::new("l", ElementType::Link).with_prop(ROLE_PROP, "call-to-action");
        assert_eq!(SemanticRole::of(&link), Some(SemanticRole::CallToAction));

        let button = Instance::new("b", ElementType::Button).with_prop(ROLE_PROP, "decoration");
        assert_eq!(SemanticRole::of(&button), None);
    }
}
