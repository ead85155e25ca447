//! # Document Tree
//!
//! Owns the instance graph and enforces its structural invariants.
//!
//! Every mutating call validates first and only then touches the tree, so a
//! returned error always means nothing changed.

use crate::element::ElementType;
use crate::errors::{DocumentError, DocumentResult};
use crate::instance::{Instance, InstanceId, InstancePatch, ROOT_ID};
use crate::placement::{can_place, check_subtree};
use crate::props::validate_props;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A strict rooted tree of [`Instance`] nodes with globally unique ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Instance", into = "Instance")]
pub struct DocumentTree {
    root: Instance,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Empty page: a single body root
    pub fn new() -> Self {
        Self {
            root: Instance::new(ROOT_ID, ElementType::Body),
        }
    }

    /// Adopt an existing root, checking every invariant
    pub fn from_root(root: Instance) -> DocumentResult<Self> {
        check_subtree(&root, &mut Vec::new())?;
        check_unique_ids(&root, &mut HashSet::new())?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Instance {
        &self.root
    }

    pub fn root_id(&self) -> &str {
        &self.root.id
    }

    /// Swap in a root captured from this tree earlier, e.g. a history snapshot
    pub fn replace_root(&mut self, root: Instance) -> Instance {
        std::mem::replace(&mut self.root, root)
    }

    pub fn into_root(self) -> Instance {
        self.root
    }

    /// Depth-first search from the root; O(tree size)
    pub fn find(&self, id: &str) -> Option<&Instance> {
        self.root.find(id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Instance> {
        self.root.find_mut(id)
    }

    pub fn get(&self, id: &str) -> DocumentResult<&Instance> {
        self.find(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn parent_of(&self, id: &str) -> Option<&Instance> {
        self.root.find_parent(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.parent_of(id)
            .and_then(|parent| parent.children.iter().position(|c| c.id == id))
    }

    /// Ancestors of `id` from the root down to its parent
    pub fn ancestors(&self, id: &str) -> Vec<&Instance> {
        let mut path = self.root.path_to(id).unwrap_or_default();
        path.pop();
        path
    }

    pub fn ids(&self) -> Vec<&str> {
        self.root.ids()
    }

    pub fn len(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Can a node of `element_type` go directly under `parent_id`?
    ///
    /// The same check `insert` and `move_instance` make, exposed for live
    /// drag feedback.
    pub fn can_place(&self, element_type: ElementType, parent_id: &str) -> DocumentResult<()> {
        can_place(element_type, &self.type_chain(parent_id)?)
    }

    /// Insert `instance` under `parent_id` (root if omitted) at `index`
    /// (append if omitted; clamped to the child count)
    pub fn insert(
        &mut self,
        instance: Instance,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> DocumentResult<InstanceId> {
        let parent_id = parent_id.unwrap_or(ROOT_ID).to_string();
        let mut chain = self.type_chain(&parent_id)?;
        check_subtree(&instance, &mut chain)?;
        self.check_fresh_ids(&instance)?;

        let id = instance.id.clone();
        let parent = self
            .find_mut(&parent_id)
            .ok_or_else(|| DocumentError::NotFound(parent_id.clone()))?;
        let index = index.unwrap_or(parent.children.len()).min(parent.children.len());
        parent.children.insert(index, instance);

        debug!(id = %id, parent = %parent_id, index, "Inserted instance");
        Ok(id)
    }

    /// Shallow-merge `patch` into the node at `id`
    pub fn update(&mut self, id: &str, patch: InstancePatch) -> DocumentResult<()> {
        let current = self.get(id)?;

        let props = patch.merged_props(&current.props);
        validate_props(current.element_type, &props)?;

        if let Some(children) = &patch.children {
            let mut chain = self.type_chain(id)?;
            let mut seen = HashSet::new();
            for child in children {
                check_subtree(child, &mut chain)?;
                check_unique_ids(child, &mut seen)?;
            }
            // Ids already outside this node must stay unique
            let outside: HashSet<&str> = self
                .root
                .ids()
                .into_iter()
                .filter(|other| !current.contains(other) || *other == id)
                .collect();
            if let Some(clash) = seen.iter().find(|s| outside.contains(s.as_str())) {
                return Err(DocumentError::DuplicateId(clash.clone()));
            }
        }

        let node = self
            .find_mut(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;
        patch.apply_to(node);

        debug!(id = %id, "Updated instance");
        Ok(())
    }

    /// Detach the subtree at `id` and re-insert it under `new_parent_id`
    ///
    /// `index` is interpreted against the parent's children after the node
    /// has been detached, and clamped.
    pub fn move_instance(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: Option<usize>,
    ) -> DocumentResult<()> {
        if id == self.root.id {
            return Err(DocumentError::RootImmutable);
        }
        let node = self.get(id)?;
        if !self.contains(new_parent_id) {
            return Err(DocumentError::NotFound(new_parent_id.to_string()));
        }
        if node.contains(new_parent_id) {
            return Err(DocumentError::CycleViolation {
                id: id.to_string(),
                target: new_parent_id.to_string(),
            });
        }
        let mut chain = self.type_chain(new_parent_id)?;
        check_subtree(node, &mut chain)?;

        let node = self
            .root
            .remove_descendant(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;
        let parent = self
            .find_mut(new_parent_id)
            .ok_or_else(|| DocumentError::NotFound(new_parent_id.to_string()))?;
        let index = index.unwrap_or(parent.children.len()).min(parent.children.len());
        parent.children.insert(index, node);

        debug!(id = %id, parent = %new_parent_id, index, "Moved instance");
        Ok(())
    }

    /// Remove the subtree at `id`, returning it
    ///
    /// Style sources it referenced are left in place.
    pub fn delete(&mut self, id: &str) -> DocumentResult<Instance> {
        if id == self.root.id {
            return Err(DocumentError::RootImmutable);
        }
        let removed = self
            .root
            .remove_descendant(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;

        debug!(id = %id, removed = removed.size(), "Deleted instance");
        Ok(removed)
    }

    /// Types from the root down to `id` inclusive
    fn type_chain(&self, id: &str) -> DocumentResult<Vec<ElementType>> {
        self.root
            .path_to(id)
            .map(|path| path.iter().map(|i| i.element_type).collect())
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }

    fn check_fresh_ids(&self, incoming: &Instance) -> DocumentResult<()> {
        let mut seen: HashSet<String> = self.root.ids().into_iter().map(str::to_string).collect();
        check_unique_ids(incoming, &mut seen)
    }
}

fn check_unique_ids(node: &Instance, seen: &mut HashSet<String>) -> DocumentResult<()> {
    if !seen.insert(node.id.clone()) {
        return Err(DocumentError::DuplicateId(node.id.clone()));
    }
    node.children
        .iter()
        .try_for_each(|child| check_unique_ids(child, seen))
}

impl TryFrom<Instance> for DocumentTree {
    type Error = DocumentError;

    fn try_from(root: Instance) -> Result<Self, Self::Error> {
        DocumentTree::from_root(root)
    }
}

impl From<DocumentTree> for Instance {
    fn from(tree: DocumentTree) -> Self {
        tree.root
    }
}
