//! Single-slot clipboard holding a detached subtree.

use pagecraft_common::IdGenerator;
use pagecraft_document::{walk_instance_mut, Instance, VisitorMut};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<Instance>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a deep copy of `instance`, replacing whatever was there
    pub fn copy(&mut self, instance: &Instance) {
        self.slot = Some(instance.clone());
    }

    pub fn peek(&self) -> Option<&Instance> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// A fresh copy of the clipboard contents with every id regenerated.
    ///
    /// The slot itself is left untouched so it can be pasted again.
    pub fn instantiate(
        &self,
        ids: &mut IdGenerator,
    ) -> Option<(Instance, BTreeMap<String, String>)> {
        let mut copy = self.slot.clone()?;
        let mut rewriter = IdRewriter::new(ids);
        rewriter.visit_instance_mut(&mut copy);
        Some((copy, rewriter.mapping))
    }
}

/// Gives every node in a subtree a freshly generated id
pub struct IdRewriter<'a> {
    ids: &'a mut IdGenerator,
    /// Old id → new id
    pub mapping: BTreeMap<String, String>,
}

impl<'a> IdRewriter<'a> {
    pub fn new(ids: &'a mut IdGenerator) -> Self {
        Self {
            ids,
            mapping: BTreeMap::new(),
        }
    }
}

impl VisitorMut for IdRewriter<'_> {
    fn visit_instance_mut(&mut self, instance: &mut Instance) {
        let fresh = self.ids.new_id();
        let old = std::mem::replace(&mut instance.id, fresh.clone());
        self.mapping.insert(old, fresh);
        walk_instance_mut(self, instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_document::ElementType;
    use std::collections::HashSet;

    fn card() -> Instance {
        Instance::new("card", ElementType::Container)
            .with_style_source("card-style")
            .with_child(Instance::new("card-title", ElementType::Heading))
            .with_child(Instance::new("card-cta", ElementType::Button))
    }

    #[test]
    fn test_copy_is_detached() {
        let mut clipboard = Clipboard::new();
        let mut original = card();
        clipboard.copy(&original);
        original.label = Some("changed".into());

        assert!(clipboard.peek().unwrap().label.is_none());
    }

    #[test]
    fn test_instantiate_regenerates_every_id() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(&card());
        let mut ids = IdGenerator::from_seed("page");

        let (first, mapping) = clipboard.instantiate(&mut ids).unwrap();
        let (second, _) = clipboard.instantiate(&mut ids).unwrap();

        let a: HashSet<&str> = first.ids().into_iter().collect();
        let b: HashSet<&str> = second.ids().into_iter().collect();
        assert!(a.is_disjoint(&b));
        assert!(!a.contains("card"));
        assert_eq!(mapping["card"], first.id);
        assert_eq!(first.style_source_ids, vec!["card-style"]);
        assert_eq!(clipboard.peek().unwrap().id, "card");
    }

    #[test]
    fn test_empty_clipboard() {
        let clipboard = Clipboard::new();
        assert!(clipboard.instantiate(&mut IdGenerator::from_seed("x")).is_none());
    }
}
