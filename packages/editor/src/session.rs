//! # Edit Session
//!
//! An EditSession is one user's live view of a [`Document`]: it owns the
//! history, the clipboard, the id generator, and the interaction fields
//! (selection, hover, isolation, current breakpoint and state).
//!
//! Every undo-able change goes through [`EditSession::apply`]:
//!
//! ```text
//! Mutation → validate + apply → post-effects → history entry
//!                  ↓ error
//!            state restored, error returned
//! ```

use crate::clipboard::Clipboard;
use crate::composite::{
    apply_template, find_template, refresh_slot_visibility, set_brand_position, sync_composite,
    LayoutContext,
};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::errors::{EditorError, EditorResult};
use crate::history::History;
use crate::mutations::{Mutation, MutationResult};
use crate::post_effects::{ClearStaleSelection, FollowUp, PostEffectEngine};
use crate::shared::{Location, SharedComponents};
use pagecraft_common::{get_document_id, IdGenerator};
use pagecraft_document::{
    walk_instance, DocumentError, DocumentTree, Instance, InstanceId, InstancePatch, SlotPosition,
    StyleReferenceCollector, Visitor,
};
use pagecraft_styles::{
    breakpoint_for_width, resolve_with_metadata, BreakpointId, Declaration, InteractionState,
    NewSource, OverrideEntry, StyleError, StyleMetadata, StyleRegistry, StyleSourceId,
    StyleSourceKind, BASE_BREAKPOINT,
};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, instrument};

/// Everything undo/redo swaps back in
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub root: Instance,
    pub styles: StyleRegistry,
    pub shared: SharedComponents,
}

/// Options for [`EditSession::update_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Don't re-derive a composite's children after a config change
    pub skip_composite_sync: bool,
}

/// A style reference whose source no longer exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub location: Location,
    pub instance_id: InstanceId,
    pub source_id: StyleSourceId,
}

pub struct EditSession {
    document: Document,
    history: History<Snapshot>,
    clipboard: Clipboard,
    ids: IdGenerator,
    effects: PostEffectEngine,

    selection: Option<InstanceId>,
    hover: Option<InstanceId>,
    isolation: Option<InstanceId>,
    breakpoint: BreakpointId,
    state: InteractionState,

    /// Bumped on every applied change, undo and redo included
    version: u64,
}

impl EditSession {
    pub fn new(document: Document, config: &EditorConfig) -> Self {
        let seed = config
            .id_seed
            .clone()
            .unwrap_or_else(|| get_document_id(&document.path.to_string_lossy()));
        let mut ids = IdGenerator::from_seed(seed);
        ids.observe_all(document.tree.ids());
        for (_, tree) in document.shared.trees() {
            ids.observe_all(tree.ids());
        }

        let initial = Snapshot {
            root: document.tree.root().clone(),
            styles: document.styles.clone(),
            shared: document.shared.clone(),
        };

        Self {
            document,
            history: History::new(initial, config.history_limit),
            clipboard: Clipboard::new(),
            ids,
            effects: PostEffectEngine::new(),
            selection: None,
            hover: None,
            isolation: None,
            breakpoint: BASE_BREAKPOINT.to_string(),
            state: InteractionState::Default,
            version: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.document.tree
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.document.styles
    }

    pub fn shared(&self) -> &SharedComponents {
        &self.document.shared
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn save(&mut self) -> EditorResult<()> {
        self.document.save()
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    /// Find `id` in the page tree, falling back to shared components
    pub fn locate(&self, id: &str) -> Option<(Location, &Instance)> {
        if let Some(instance) = self.document.tree.find(id) {
            return Some((Location::Page, instance));
        }
        self.document
            .shared
            .find(id)
            .map(|(name, instance)| (Location::Shared(name.to_string()), instance))
    }

    pub fn find(&self, id: &str) -> EditorResult<&Instance> {
        self.locate(id)
            .map(|(_, instance)| instance)
            .ok_or_else(|| EditorError::InstanceNotFound(id.to_string()))
    }

    fn location_of(&self, id: &str) -> EditorResult<Location> {
        self.locate(id)
            .map(|(location, _)| location)
            .ok_or_else(|| EditorError::InstanceNotFound(id.to_string()))
    }

    fn tree_at(&self, location: &Location) -> EditorResult<&DocumentTree> {
        match location {
            Location::Page => Ok(&self.document.tree),
            Location::Shared(name) => self
                .document
                .shared
                .get(name)
                .ok_or_else(|| EditorError::SharedComponentNotFound(name.clone())),
        }
    }

    fn tree_at_mut(&mut self, location: &Location) -> EditorResult<&mut DocumentTree> {
        match location {
            Location::Page => Ok(&mut self.document.tree),
            Location::Shared(name) => self
                .document
                .shared
                .get_mut(name)
                .ok_or_else(|| EditorError::SharedComponentNotFound(name.clone())),
        }
    }

    /// Nearest composite above `id`
    pub fn composite_ancestor(&self, id: &str) -> Option<InstanceId> {
        let location = self.location_of(id).ok()?;
        let tree = self.tree_at(&location).ok()?;
        tree.ancestors(id)
            .into_iter()
            .rev()
            .find(|instance| instance.is_composite())
            .map(|instance| instance.id.clone())
    }

    fn layout_context(&mut self, composite_id: &str) -> EditorResult<LayoutContext<'_>> {
        let location = self.location_of(composite_id)?;
        let document = &mut self.document;
        let tree = match &location {
            Location::Page => &mut document.tree,
            Location::Shared(name) => document
                .shared
                .get_mut(name)
                .ok_or_else(|| EditorError::SharedComponentNotFound(name.clone()))?,
        };
        Ok(LayoutContext {
            tree,
            styles: &mut document.styles,
            ids: &mut self.ids,
        })
    }

    // ---------------------------------------------------------------------
    // Interaction state
    // ---------------------------------------------------------------------

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn hover(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    pub fn isolation(&self) -> Option<&str> {
        self.isolation.as_deref()
    }

    pub fn set_selection(&mut self, id: Option<&str>) -> EditorResult<()> {
        self.selection = self.checked_id(id)?;
        Ok(())
    }

    pub fn set_hover(&mut self, id: Option<&str>) -> EditorResult<()> {
        self.hover = self.checked_id(id)?;
        Ok(())
    }

    /// Restrict editing focus to the subtree at `id`; the tree is unchanged
    pub fn set_isolation(&mut self, id: Option<&str>) -> EditorResult<()> {
        self.isolation = self.checked_id(id)?;
        Ok(())
    }

    /// Whether `id` is inside the isolated subtree (always, when not isolating)
    pub fn in_focus(&self, id: &str) -> bool {
        match &self.isolation {
            None => true,
            Some(root) => self
                .locate(root)
                .map_or(false, |(_, instance)| instance.contains(id)),
        }
    }

    fn checked_id(&self, id: Option<&str>) -> EditorResult<Option<InstanceId>> {
        match id {
            Some(id) => {
                self.find(id)?;
                Ok(Some(id.to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn breakpoint(&self) -> &str {
        &self.breakpoint
    }

    pub fn set_breakpoint(&mut self, id: &str) -> EditorResult<()> {
        if !self.document.styles.has_breakpoint(id) {
            return Err(StyleError::BreakpointNotFound(id.to_string()).into());
        }
        self.breakpoint = id.to_string();
        Ok(())
    }

    /// Pick the current breakpoint from a viewport width
    pub fn set_viewport_width(&mut self, width: u32) -> &str {
        self.breakpoint =
            breakpoint_for_width(self.document.styles.breakpoints(), width).to_string();
        &self.breakpoint
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn set_state(&mut self, state: InteractionState) {
        self.state = state;
    }

    // ---------------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------------

    /// Resolved declaration of `id` at the current breakpoint and state
    pub fn resolve_instance(&self, id: &str) -> EditorResult<Declaration> {
        self.resolve_instance_at(id, &self.breakpoint, self.state)
    }

    pub fn resolve_instance_at(
        &self,
        id: &str,
        breakpoint: &str,
        state: InteractionState,
    ) -> EditorResult<Declaration> {
        let instance = self.find(id)?;
        Ok(resolve_with_metadata(
            &self.document.styles,
            &instance.style_source_ids,
            breakpoint,
            state,
        ))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Apply a mutation, run its post-effects and record one history entry.
    ///
    /// On error the document is exactly as it was before the call.
    #[instrument(skip(self, mutation), fields(mutation = %mutation.describe()))]
    pub fn apply(&mut self, mutation: Mutation) -> EditorResult<MutationResult> {
        let checkpoint = self.capture();
        let clipboard = matches!(mutation, Mutation::Cut { .. }).then(|| self.clipboard.clone());

        match self.apply_with_effects(&mutation) {
            Ok(mut result) => {
                result.version = self.commit(mutation.describe());
                debug!(
                    version = result.version,
                    follow_ups = result.follow_ups,
                    "Applied mutation"
                );
                Ok(result)
            }
            Err(err) => {
                debug!(error = %err, "Mutation rejected");
                self.restore(checkpoint);
                if let Some(clipboard) = clipboard {
                    self.clipboard = clipboard;
                }
                Err(err)
            }
        }
    }

    fn apply_with_effects(&mut self, mutation: &Mutation) -> EditorResult<MutationResult> {
        let mut result = self.apply_inner(mutation)?;
        let follow_ups = self.effects.analyze(mutation, &result, self);
        result.follow_ups = self.run_follow_ups(follow_ups)?;
        Ok(result)
    }

    fn apply_inner(&mut self, mutation: &Mutation) -> EditorResult<MutationResult> {
        match mutation {
            Mutation::InsertInstance {
                instance,
                parent_id,
                index,
            } => self.insert_subtree(instance.clone(), parent_id.as_deref(), *index),

            Mutation::UpdateInstance { id, patch, .. } => self.update_inner(id, patch.clone()),

            Mutation::MoveInstance {
                id,
                new_parent_id,
                index,
            } => {
                let location = self.location_of(id)?;
                let tree = self.tree_at_mut(&location)?;
                let old_parent = tree.parent_of(id).map(|p| p.id.clone());
                tree.move_instance(id, new_parent_id, *index)?;

                Ok(MutationResult {
                    touched_parents: old_parent
                        .into_iter()
                        .chain(std::iter::once(new_parent_id.clone()))
                        .collect(),
                    ..MutationResult::default()
                })
            }

            Mutation::DeleteInstance { id } => self.delete_inner(id).map(|(_, result)| result),

            Mutation::Cut { id } => {
                let (removed, result) = self.delete_inner(id)?;
                self.clipboard.copy(&removed);
                Ok(result)
            }

            Mutation::Paste { parent_id, index } => {
                let (instance, _) = self
                    .clipboard
                    .instantiate(&mut self.ids)
                    .ok_or(EditorError::EmptyClipboard)?;
                self.insert_subtree(instance, parent_id.as_deref(), *index)
            }

            Mutation::SetStyleOverride {
                source_id,
                property,
                value,
                breakpoint,
                state,
            } => {
                self.document.styles.set_override(
                    source_id,
                    property,
                    value,
                    breakpoint.as_deref(),
                    *state,
                )?;
                Ok(MutationResult::default())
            }

            Mutation::RemoveStyleOverride {
                source_id,
                property,
                breakpoint,
                state,
            } => {
                self.document
                    .styles
                    .remove_override(source_id, property, breakpoint.as_deref(), *state)?;
                Ok(MutationResult::default())
            }

            Mutation::SetInstanceStyle {
                instance_id,
                property,
                value,
                breakpoint,
                state,
            } => {
                let (source, created) = self.style_target(instance_id)?;
                let breakpoint = breakpoint.clone().unwrap_or_else(|| self.breakpoint.clone());
                let state = state.unwrap_or(self.state);
                self.document
                    .styles
                    .set_override(&source, property, value, Some(&breakpoint), Some(state))?;
                Ok(MutationResult {
                    created,
                    ..MutationResult::default()
                })
            }

            Mutation::SetStyleMetadata {
                source_id,
                metadata,
            } => {
                self.document
                    .styles
                    .set_metadata(source_id, metadata.clone())?;
                Ok(MutationResult::default())
            }

            Mutation::ForkSource {
                instance_id,
                source_id,
            } => {
                let forked = self.fork_inner(instance_id, source_id)?;
                Ok(MutationResult {
                    created: Some(forked),
                    ..MutationResult::default()
                })
            }

            Mutation::ApplyTemplate {
                composite_id,
                template_id,
            } => {
                let template = find_template(template_id)
                    .ok_or_else(|| EditorError::UnknownTemplate(template_id.clone()))?;
                let mut ctx = self.layout_context(composite_id)?;
                apply_template(&mut ctx, composite_id, &template)?;
                Ok(MutationResult::default())
            }

            Mutation::SetBrandPosition {
                composite_id,
                position,
            } => {
                let mut ctx = self.layout_context(composite_id)?;
                set_brand_position(&mut ctx, composite_id, *position)?;
                Ok(MutationResult::default())
            }
        }
    }

    fn insert_subtree(
        &mut self,
        instance: Instance,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> EditorResult<MutationResult> {
        let parent_id = parent_id
            .map(str::to_string)
            .unwrap_or_else(|| self.document.tree.root_id().to_string());
        let location = self.location_of(&parent_id)?;
        self.check_ids_free(&instance, &location)?;

        self.ids.observe_all(instance.ids());
        let tree = self.tree_at_mut(&location)?;
        let id = tree.insert(instance, Some(&parent_id), index)?;

        Ok(MutationResult {
            created: Some(id),
            touched_parents: vec![parent_id],
            ..MutationResult::default()
        })
    }

    fn update_inner(&mut self, id: &str, patch: InstancePatch) -> EditorResult<MutationResult> {
        let location = self.location_of(id)?;
        let Some(children) = patch.children.clone() else {
            self.tree_at_mut(&location)?.update(id, patch)?;
            return Ok(MutationResult::default());
        };

        for child in &children {
            self.check_ids_free(child, &location)?;
            self.ids.observe_all(child.ids());
        }
        let before: BTreeSet<String> = self
            .find(id)?
            .children
            .iter()
            .flat_map(|c| c.ids())
            .map(str::to_string)
            .collect();

        self.tree_at_mut(&location)?.update(id, patch)?;

        let after: HashSet<&str> = children.iter().flat_map(|c| c.ids()).collect();
        Ok(MutationResult {
            removed: before
                .into_iter()
                .filter(|old| !after.contains(old.as_str()))
                .collect(),
            touched_parents: vec![id.to_string()],
            ..MutationResult::default()
        })
    }

    /// Detach `id` and return the removed subtree
    fn delete_inner(&mut self, id: &str) -> EditorResult<(Instance, MutationResult)> {
        let location = self.location_of(id)?;
        let tree = self.tree_at_mut(&location)?;
        let parent = tree.parent_of(id).map(|p| p.id.clone());
        let removed = tree.delete(id)?;

        let result = MutationResult {
            removed: removed.ids().into_iter().map(str::to_string).collect(),
            touched_parents: parent.into_iter().collect(),
            ..MutationResult::default()
        };
        Ok((removed, result))
    }

    /// Ids in `node` must not already exist in another tree than `home`.
    /// Clashes inside `home` are caught by the tree itself.
    fn check_ids_free(&self, node: &Instance, home: &Location) -> EditorResult<()> {
        for id in node.ids() {
            if let Some((location, _)) = self.locate(id) {
                if &location != home {
                    return Err(DocumentError::DuplicateId(id.to_string()).into());
                }
            }
        }
        Ok(())
    }

    fn run_follow_ups(&mut self, follow_ups: Vec<FollowUp>) -> EditorResult<usize> {
        let count = follow_ups.len();
        for follow_up in follow_ups {
            debug!(?follow_up, "Running post-effect");
            match follow_up {
                FollowUp::ClearSelection => self.selection = None,
                FollowUp::ClearHover => self.hover = None,
                FollowUp::ClearIsolation => self.isolation = None,
                FollowUp::SyncComposite { composite_id } => {
                    let mut ctx = self.layout_context(&composite_id)?;
                    sync_composite(&mut ctx, &composite_id)?;
                }
                FollowUp::RefreshSlotVisibility { composite_id } => {
                    let mut ctx = self.layout_context(&composite_id)?;
                    refresh_slot_visibility(&mut ctx, &composite_id)?;
                }
            }
        }
        Ok(count)
    }

    fn capture(&self) -> Snapshot {
        Snapshot {
            root: self.document.tree.root().clone(),
            styles: self.document.styles.clone(),
            shared: self.document.shared.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.document.tree.replace_root(snapshot.root);
        self.document.styles.restore(snapshot.styles);
        self.document.shared = snapshot.shared;
    }

    /// Finish a successful change: bump the version and record history
    fn commit(&mut self, description: String) -> u64 {
        self.version += 1;
        self.document.mark_dirty();
        let snapshot = self.capture();
        self.history.record(snapshot, Some(description));
        self.version
    }

    // ---------------------------------------------------------------------
    // Convenience wrappers
    // ---------------------------------------------------------------------

    /// Insert under `parent_id` (page root if omitted); returns the new id
    pub fn insert(
        &mut self,
        instance: Instance,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> EditorResult<InstanceId> {
        let id = instance.id.clone();
        let result = self.apply(Mutation::InsertInstance {
            instance,
            parent_id: parent_id.map(str::to_string),
            index,
        })?;
        Ok(result.created.unwrap_or(id))
    }

    pub fn update(&mut self, id: &str, patch: InstancePatch) -> EditorResult<MutationResult> {
        self.update_with(id, patch, UpdateOptions::default())
    }

    pub fn update_with(
        &mut self,
        id: &str,
        patch: InstancePatch,
        options: UpdateOptions,
    ) -> EditorResult<MutationResult> {
        self.apply(Mutation::UpdateInstance {
            id: id.to_string(),
            patch,
            skip_composite_sync: options.skip_composite_sync,
        })
    }

    pub fn move_instance(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: Option<usize>,
    ) -> EditorResult<MutationResult> {
        self.apply(Mutation::MoveInstance {
            id: id.to_string(),
            new_parent_id: new_parent_id.to_string(),
            index,
        })
    }

    pub fn delete(&mut self, id: &str) -> EditorResult<MutationResult> {
        self.apply(Mutation::DeleteInstance { id: id.to_string() })
    }

    /// Deep-copy the subtree at `id` into the clipboard
    pub fn copy(&mut self, id: &str) -> EditorResult<()> {
        let instance = self.find(id)?.clone();
        self.clipboard.copy(&instance);
        Ok(())
    }

    pub fn cut(&mut self, id: &str) -> EditorResult<MutationResult> {
        self.apply(Mutation::Cut { id: id.to_string() })
    }

    /// Paste a fresh copy of the clipboard; returns the new root id
    pub fn paste(
        &mut self,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> EditorResult<InstanceId> {
        let result = self.apply(Mutation::Paste {
            parent_id: parent_id.map(str::to_string),
            index,
        })?;
        result.created.ok_or(EditorError::EmptyClipboard)
    }

    pub fn set_override(
        &mut self,
        source_id: &str,
        property: &str,
        value: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> EditorResult<MutationResult> {
        self.apply(Mutation::SetStyleOverride {
            source_id: source_id.to_string(),
            property: property.to_string(),
            value: value.to_string(),
            breakpoint: breakpoint.map(str::to_string),
            state,
        })
    }

    /// Style an instance. Omitted axes use the session's current breakpoint
    /// and state. Returns the source that was written.
    pub fn set_instance_style(
        &mut self,
        instance_id: &str,
        property: &str,
        value: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> EditorResult<StyleSourceId> {
        self.apply(Mutation::SetInstanceStyle {
            instance_id: instance_id.to_string(),
            property: property.to_string(),
            value: value.to_string(),
            breakpoint: breakpoint.map(str::to_string),
            state,
        })?;
        let instance = self.find(instance_id)?;
        instance
            .style_source_ids
            .iter()
            .rev()
            .find(|id| self.document.styles.is_editable(id))
            .cloned()
            .ok_or_else(|| StyleError::SourceNotFound(instance_id.to_string()).into())
    }

    pub fn set_style_metadata(
        &mut self,
        source_id: &str,
        metadata: Option<StyleMetadata>,
    ) -> EditorResult<MutationResult> {
        self.apply(Mutation::SetStyleMetadata {
            source_id: source_id.to_string(),
            metadata,
        })
    }

    /// Replace `source_id` on an instance with a local copy; returns the copy
    pub fn fork_source(
        &mut self,
        instance_id: &str,
        source_id: &str,
    ) -> EditorResult<StyleSourceId> {
        let result = self.apply(Mutation::ForkSource {
            instance_id: instance_id.to_string(),
            source_id: source_id.to_string(),
        })?;
        result
            .created
            .ok_or_else(|| StyleError::SourceNotFound(source_id.to_string()).into())
    }

    pub fn apply_template(
        &mut self,
        composite_id: &str,
        template_id: &str,
    ) -> EditorResult<MutationResult> {
        self.apply(Mutation::ApplyTemplate {
            composite_id: composite_id.to_string(),
            template_id: template_id.to_string(),
        })
    }

    pub fn set_brand_position(
        &mut self,
        composite_id: &str,
        position: SlotPosition,
    ) -> EditorResult<MutationResult> {
        self.apply(Mutation::SetBrandPosition {
            composite_id: composite_id.to_string(),
            position,
        })
    }

    // ---------------------------------------------------------------------
    // Fork-on-write
    // ---------------------------------------------------------------------

    /// The source an instance-level style write lands in, plus the id of a
    /// source created to make that possible.
    ///
    /// The last existing source wins; a shared one is forked first, and an
    /// instance with no sources gets a new local one.
    fn style_target(
        &mut self,
        instance_id: &str,
    ) -> EditorResult<(StyleSourceId, Option<StyleSourceId>)> {
        let instance = self.find(instance_id)?;
        let last = instance
            .style_source_ids
            .iter()
            .rev()
            .find(|id| self.document.styles.contains(id))
            .cloned();

        match last {
            Some(source) if self.document.styles.is_editable(&source) => Ok((source, None)),
            Some(source) => {
                let forked = self.fork_inner(instance_id, &source)?;
                Ok((forked.clone(), Some(forked)))
            }
            None => {
                let element_type = instance.element_type;
                let mut source_ids = instance.style_source_ids.clone();
                let source = self
                    .document
                    .styles
                    .create_source(StyleSourceKind::Local, None, element_type.as_str())?;
                source_ids.push(source.clone());

                let location = self.location_of(instance_id)?;
                self.tree_at_mut(&location)?
                    .update(instance_id, InstancePatch::new().style_source_ids(source_ids))?;
                Ok((source.clone(), Some(source)))
            }
        }
    }

    fn fork_inner(&mut self, instance_id: &str, source_id: &str) -> EditorResult<StyleSourceId> {
        let instance = self.find(instance_id)?;
        if !instance.style_source_ids.iter().any(|id| id == source_id) {
            return Err(EditorError::SourceNotReferenced {
                instance: instance_id.to_string(),
                source_id: source_id.to_string(),
            });
        }
        let element_type = instance.element_type;
        let source_ids = instance.style_source_ids.clone();

        let styles = &mut self.document.styles;
        if !styles.contains(source_id) {
            return Err(StyleError::SourceNotFound(source_id.to_string()).into());
        }
        let forked = styles.create_source(StyleSourceKind::Local, None, element_type.as_str())?;
        styles.copy_definition(source_id, &forked)?;
        styles.set_dependency(source_id, &forked)?;

        let source_ids = source_ids
            .into_iter()
            .map(|id| if id == source_id { forked.clone() } else { id })
            .collect();
        let location = self.location_of(instance_id)?;
        self.tree_at_mut(&location)?
            .update(instance_id, InstancePatch::new().style_source_ids(source_ids))?;

        info!(instance = %instance_id, base = %source_id, forked = %forked, "Forked style source");
        Ok(forked)
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one history entry; `false` when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        self.after_history_move();
        true
    }

    /// Step forward one history entry; `false` when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        for follow_up in ClearStaleSelection::stale(self) {
            match follow_up {
                FollowUp::ClearSelection => self.selection = None,
                FollowUp::ClearHover => self.hover = None,
                FollowUp::ClearIsolation => self.isolation = None,
                _ => {}
            }
        }
        if !self.document.styles.has_breakpoint(&self.breakpoint) {
            self.breakpoint = BASE_BREAKPOINT.to_string();
        }
        self.version += 1;
        self.document.mark_dirty();
    }

    /// Run `f` as one history entry. If it fails, the document is rolled
    /// back to where it was when the transaction began.
    pub fn transaction<T>(
        &mut self,
        description: impl Into<String>,
        f: impl FnOnce(&mut Self) -> EditorResult<T>,
    ) -> EditorResult<T> {
        let checkpoint = self.capture();
        self.history.begin_batch(Some(description.into()));

        match f(self) {
            Ok(value) => {
                let current = self.capture();
                self.history.end_batch(current);
                Ok(value)
            }
            Err(err) => {
                self.restore(checkpoint);
                self.history.abort_batch();
                Err(err)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Bulk import and shared components
    // ---------------------------------------------------------------------

    /// Create `sources`, then write the overrides `entries` builds from their
    /// new ids, as a single history entry. Nothing is kept on error.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn batch_import(
        &mut self,
        sources: Vec<NewSource>,
        entries: impl FnOnce(&[StyleSourceId]) -> Vec<OverrideEntry>,
    ) -> EditorResult<Vec<StyleSourceId>> {
        let before = self.document.styles.clone();
        let result = self
            .document
            .styles
            .batch_create(sources)
            .and_then(|created| {
                let entries = entries(&created);
                self.document.styles.batch_set_overrides(entries)?;
                Ok(created)
            });

        match result {
            Ok(created) => {
                self.commit("Import styles".to_string());
                Ok(created)
            }
            Err(err) => {
                self.document.styles.restore(before);
                Err(err.into())
            }
        }
    }

    /// Add a shared component under `name`
    pub fn register_shared(&mut self, name: &str, tree: DocumentTree) -> EditorResult<()> {
        for id in tree.ids() {
            if self.locate(id).is_some() {
                return Err(DocumentError::DuplicateId(id.to_string()).into());
            }
        }
        self.ids.observe_all(tree.ids());
        self.document.shared.register(name, tree)?;
        self.commit(format!("Add shared {}", name));
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Garbage
    // ---------------------------------------------------------------------

    /// References to sources that no longer exist, page first
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut finder = DanglingFinder {
            styles: &self.document.styles,
            location: Location::Page,
            found: Vec::new(),
        };
        finder.visit_instance(self.document.tree.root());
        for (name, tree) in self.document.shared.trees() {
            finder.location = Location::Shared(name.to_string());
            finder.visit_instance(tree.root());
        }
        finder.found
    }

    /// Sources no instance references and no fork depends on
    pub fn unreferenced_sources(&self) -> Vec<StyleSourceId> {
        let mut referenced = StyleReferenceCollector::collect(self.document.tree.root());
        for (_, tree) in self.document.shared.trees() {
            referenced.extend(StyleReferenceCollector::collect(tree.root()));
        }
        let referenced: HashSet<&str> = referenced.iter().map(String::as_str).collect();

        let styles = &self.document.styles;
        styles
            .unreferenced_sources(&referenced)
            .into_iter()
            .filter(|id| styles.dependents_of(id).is_empty())
            .collect()
    }

    /// Delete every unreferenced source, as one history entry
    pub fn prune_unreferenced_sources(&mut self) -> EditorResult<Vec<StyleSourceId>> {
        let unused = self.unreferenced_sources();
        if unused.is_empty() {
            return Ok(unused);
        }
        for id in &unused {
            self.document.styles.delete_source(id)?;
        }
        info!(removed = unused.len(), "Pruned unreferenced style sources");
        self.commit("Remove unused styles".to_string());
        Ok(unused)
    }
}

struct DanglingFinder<'a> {
    styles: &'a StyleRegistry,
    location: Location,
    found: Vec<DanglingReference>,
}

impl Visitor for DanglingFinder<'_> {
    fn visit_instance(&mut self, instance: &Instance) {
        for source_id in &instance.style_source_ids {
            if !self.styles.contains(source_id) {
                self.found.push(DanglingReference {
                    location: self.location.clone(),
                    instance_id: instance.id.clone(),
                    source_id: source_id.clone(),
                });
            }
        }
        walk_instance(self, instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_document::ElementType;

    fn session() -> EditSession {
        let config = EditorConfig {
            id_seed: Some("p".into()),
            ..EditorConfig::default()
        };
        let mut session = EditSession::new(Document::new("page.json"), &config);
        session
            .insert(Instance::new("hero", ElementType::Section), None, None)
            .unwrap();
        session
            .insert(Instance::new("title", ElementType::Heading), Some("hero"), None)
            .unwrap();
        session
    }

    #[test]
    fn test_session_creation() {
        let session = EditSession::new(Document::new("page.json"), &EditorConfig::default());
        assert_eq!(session.version(), 0);
        assert_eq!(session.breakpoint(), "base");
        assert!(session.selection().is_none());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_failed_mutation_leaves_no_trace() {
        let mut session = session();
        let version = session.version();
        let levels = session.history().undo_levels();

        let result = session.insert(
            Instance::new("inner", ElementType::Section),
            Some("hero"),
            None,
        );

        assert!(matches!(
            result,
            Err(EditorError::Document(DocumentError::PlacementViolation { .. }))
        ));
        assert_eq!(session.version(), version);
        assert_eq!(session.history().undo_levels(), levels);
    }

    #[test]
    fn test_delete_clears_selection_and_hover() {
        let mut session = session();
        session.set_selection(Some("title")).unwrap();
        session.set_hover(Some("hero")).unwrap();

        let result = session.delete("hero").unwrap();

        assert_eq!(result.follow_ups, 2);
        assert!(session.selection().is_none());
        assert!(session.hover().is_none());
    }

    #[test]
    fn test_rejected_cut_keeps_clipboard() {
        let mut session = session();
        let root = session.tree().root().id.clone();

        let result = session.cut(&root);

        assert!(matches!(
            result,
            Err(EditorError::Document(DocumentError::RootImmutable))
        ));
        assert!(session.clipboard().is_empty());

        session.copy("title").unwrap();
        assert!(session.cut(&root).is_err());
        assert_eq!(session.clipboard().peek().map(|i| i.id.as_str()), Some("title"));
        assert!(session.find("hero").is_ok());
    }

    #[test]
    fn test_paste_after_very_large_existing_id() {
        let mut session = session();
        session
            .insert(Instance::new("p-4294967295", ElementType::Text), Some("hero"), None)
            .unwrap();

        session.copy("p-4294967295").unwrap();
        let pasted = session.paste(Some("hero"), None).unwrap();

        assert_eq!(pasted, "p-4294967296");
        assert_eq!(session.tree().get("hero").unwrap().children.len(), 3);
    }

    #[test]
    fn test_selection_requires_known_id() {
        let mut session = session();
        assert!(matches!(
            session.set_selection(Some("ghost")),
            Err(EditorError::InstanceNotFound(_))
        ));
    }

    #[test]
    fn test_breakpoint_switching() {
        let mut session = session();
        assert!(session.set_breakpoint("tablet").is_ok());
        assert!(session.set_breakpoint("watch").is_err());
        assert_eq!(session.breakpoint(), "tablet");
        assert_eq!(session.set_viewport_width(400), "mobile");
        assert_eq!(session.set_viewport_width(1280), "base");
    }

    #[test]
    fn test_set_instance_style_creates_local_source() {
        let mut session = session();
        let source = session
            .set_instance_style("title", "color", "navy", None, None)
            .unwrap();

        assert!(session.styles().is_editable(&source));
        assert_eq!(session.find("title").unwrap().style_source_ids, vec![source.clone()]);
        assert_eq!(
            session.resolve_instance("title").unwrap().get("color"),
            Some("navy")
        );
    }

    #[test]
    fn test_set_instance_style_uses_current_axes() {
        let mut session = session();
        session.set_breakpoint("mobile").unwrap();
        session.set_state(InteractionState::Hover);
        let source = session
            .set_instance_style("title", "color", "red", None, None)
            .unwrap();

        assert_eq!(
            session
                .styles()
                .get_override(&source, "color", Some("mobile"), Some(InteractionState::Hover)),
            Some("red")
        );
        assert_eq!(session.styles().get_override(&source, "color", None, None), None);
    }

    #[test]
    fn test_set_instance_style_forks_token() {
        let mut session = session();
        let token = session
            .transaction("Seed token", |s| {
                let token = s.document.styles.create_source(
                    StyleSourceKind::Token,
                    Some("brand-heading"),
                    "heading",
                )?;
                s.document
                    .styles
                    .edit_definition(&token, "font-size", "32px", None, None)?;
                s.update("title", InstancePatch::new().style_source_ids(vec![token.clone()]))?;
                Ok(token)
            })
            .unwrap();

        let forked = session
            .set_instance_style("title", "color", "teal", Some("base"), None)
            .unwrap();

        assert_ne!(forked, token);
        assert_eq!(session.find("title").unwrap().style_source_ids, vec![forked.clone()]);
        assert_eq!(session.styles().get_override(&token, "color", None, None), None);
        assert_eq!(session.styles().dependents_of(&token), vec![forked.as_str()]);

        let resolved = session.resolve_instance("title").unwrap();
        assert_eq!(resolved.get("font-size"), Some("32px"));
        assert_eq!(resolved.get("color"), Some("teal"));
    }

    #[test]
    fn test_fork_requires_reference() {
        let mut session = session();
        let result = session.fork_source("title", "src-404");
        assert!(matches!(result, Err(EditorError::SourceNotReferenced { .. })));
    }

    #[test]
    fn test_transaction_rolls_back() {
        let mut session = session();
        let before = session.tree().clone();

        let result: EditorResult<()> = session.transaction("Doomed", |s| {
            s.insert(Instance::new("note", ElementType::Text), Some("hero"), None)?;
            s.delete("ghost")?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(session.tree(), &before);
        assert_eq!(session.history().undo_levels(), 2);
    }

    #[test]
    fn test_locate_falls_back_to_shared() {
        let mut session = session();
        let header = DocumentTree::from_root(
            Instance::new("site-header", ElementType::Header)
                .with_child(Instance::new("site-nav", ElementType::Navbar)),
        )
        .unwrap();
        session.register_shared("header", header).unwrap();

        let (location, _) = session.locate("site-nav").unwrap();
        assert_eq!(location, Location::Shared("header".into()));
        assert_eq!(session.locate("title").unwrap().0, Location::Page);
        assert!(session.locate("nowhere").is_none());
    }

    #[test]
    fn test_garbage_queries() {
        let mut session = session();
        let orphan = session
            .batch_import(vec![NewSource::local("card")], |_| vec![])
            .unwrap()
            .remove(0);
        session
            .update("title", InstancePatch::new().style_source_ids(vec!["src-gone".into()]))
            .unwrap();

        assert_eq!(session.unreferenced_sources(), vec![orphan.clone()]);
        let dangling = session.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].instance_id, "title");

        assert_eq!(session.prune_unreferenced_sources().unwrap(), vec![orphan]);
        assert!(session.styles().is_empty());
        assert!(session.undo());
        assert_eq!(session.styles().len(), 1);
    }
}
