//! # Cascade Resolution
//!
//! Turns `(style source ids, breakpoint, state)` into one flat
//! [`Declaration`]. Resolution is a pure read of the registry; nothing is
//! cached here, callers that need stability memoize on the exact inputs plus
//! [`StyleRegistry::version`].
//!
//! ## Precedence (later wins, always per property)
//!
//! ```text
//! 1. base breakpoint, default state      for each source in array order
//! 2. requested breakpoint, default state for each source in array order
//! 3. base breakpoint, requested state    for each source in array order
//! 4. requested breakpoint, requested state
//! ```
//!
//! Layers 2 and 4 only apply for a non-base breakpoint, layers 3 and 4 only
//! for a non-default state. Unknown source ids are skipped.

use crate::breakpoint::BASE_BREAKPOINT;
use crate::registry::{PropertyMap, StyleRegistry};
use crate::state::InteractionState;
use serde::Serialize;
use std::collections::BTreeMap;

/// Resolved `property → value` mapping for one node. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Declaration {
    properties: BTreeMap<String, String>,
}

impl Declaration {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Render as a CSS rule body: `  property: value;` per line
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (key, value) in &self.properties {
            css.push_str("  ");
            css.push_str(key);
            css.push_str(": ");
            css.push_str(value);
            css.push_str(";\n");
        }
        css
    }

    fn merge_layer(&mut self, layer: &PropertyMap) {
        for (property, value) in layer {
            self.properties.insert(property.clone(), value.clone());
        }
    }
}

impl<'a> IntoIterator for &'a Declaration {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

/// The (breakpoint, state) layers consulted for a lookup, lowest precedence first
fn layer_keys(breakpoint: &str, state: InteractionState) -> Vec<(&str, InteractionState)> {
    let mut keys = vec![(BASE_BREAKPOINT, InteractionState::Default)];
    let responsive = breakpoint != BASE_BREAKPOINT;

    if responsive {
        keys.push((breakpoint, InteractionState::Default));
    }
    if !state.is_default() {
        keys.push((BASE_BREAKPOINT, state));
        if responsive {
            keys.push((breakpoint, state));
        }
    }
    keys
}

/// Resolve the declared overrides of `source_ids` at `breakpoint` / `state`
pub fn resolve<S: AsRef<str>>(
    registry: &StyleRegistry,
    source_ids: &[S],
    breakpoint: &str,
    state: InteractionState,
) -> Declaration {
    let mut declaration = Declaration::default();

    for (bp, st) in layer_keys(breakpoint, state) {
        for id in source_ids {
            if let Some(layer) = registry.layer(id.as_ref(), bp, st) {
                declaration.merge_layer(layer);
            }
        }
    }

    declaration
}

/// Like [`resolve`], with structured metadata compiled in beneath the overrides.
///
/// Metadata has no breakpoint or state axis, so it forms the lowest layer;
/// an explicit override of e.g. `box-shadow` wins over the compiled one.
pub fn resolve_with_metadata<S: AsRef<str>>(
    registry: &StyleRegistry,
    source_ids: &[S],
    breakpoint: &str,
    state: InteractionState,
) -> Declaration {
    let mut declaration = Declaration::default();

    for id in source_ids {
        if let Some(metadata) = registry.metadata(id.as_ref()) {
            for (property, value) in metadata.to_declarations() {
                declaration.properties.insert(property.to_string(), value);
            }
        }
    }

    let overrides = resolve(registry, source_ids, breakpoint, state);
    declaration.merge_layer(&overrides.properties);
    declaration
}

impl StyleRegistry {
    /// Shorthand for [`resolve`] against this registry
    pub fn resolve<S: AsRef<str>>(
        &self,
        source_ids: &[S],
        breakpoint: &str,
        state: InteractionState,
    ) -> Declaration {
        resolve(self, source_ids, breakpoint, state)
    }
}
