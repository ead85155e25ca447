//! Site-wide shared components (header, footer, ...).
//!
//! Each shared component is an ordinary by-value [`DocumentTree`] stored
//! under a name. Pages never embed them; lookups that take only an instance
//! id go through [`Location`] resolution instead: page first, then here.

use crate::errors::{EditorError, EditorResult};
use pagecraft_document::{DocumentTree, Instance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an instance was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum Location {
    Page,
    Shared(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedComponents {
    roots: BTreeMap<String, DocumentTree>,
}

impl SharedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, tree: DocumentTree) -> EditorResult<()> {
        let name = name.into();
        if self.roots.contains_key(&name) {
            return Err(EditorError::DuplicateSharedComponent(name));
        }
        self.roots.insert(name, tree);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> EditorResult<DocumentTree> {
        self.roots
            .remove(name)
            .ok_or_else(|| EditorError::SharedComponentNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&DocumentTree> {
        self.roots.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut DocumentTree> {
        self.roots.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn trees(&self) -> impl Iterator<Item = (&str, &DocumentTree)> {
        self.roots.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// First shared component containing `id`
    pub fn find(&self, id: &str) -> Option<(&str, &Instance)> {
        self.roots
            .iter()
            .find_map(|(name, tree)| tree.find(id).map(|instance| (name.as_str(), instance)))
    }

    pub fn owner_of(&self, id: &str) -> Option<&str> {
        self.find(id).map(|(name, _)| name)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_document::ElementType;

    fn header() -> DocumentTree {
        let root = Instance::new("header-root", ElementType::Body)
            .with_child(Instance::new("site-nav", ElementType::Navbar));
        DocumentTree::from_root(root).unwrap()
    }

    #[test]
    fn test_register_and_find() {
        let mut shared = SharedComponents::new();
        shared.register("header", header()).unwrap();

        let (owner, instance) = shared.find("site-nav").unwrap();
        assert_eq!(owner, "header");
        assert_eq!(instance.element_type, ElementType::Navbar);
        assert!(shared.find("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut shared = SharedComponents::new();
        shared.register("header", header()).unwrap();
        assert!(matches!(
            shared.register("header", header()),
            Err(EditorError::DuplicateSharedComponent(_))
        ));
    }

    #[test]
    fn test_location_json() {
        let json = serde_json::to_string(&Location::Shared("footer".into())).unwrap();
        assert_eq!(json, r#"{"kind":"shared","name":"footer"}"#);
    }
}
