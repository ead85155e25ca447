//! # Post-Effect System
//!
//! A mutation can leave derived state out of step with the document.
//! After each mutation the engine asks every registered effect what needs to
//! follow, and the session carries those follow-ups out before recording
//! history, so one undo step covers both.
//!
//! Current effects:
//! - selection, hover and isolation ids that no longer exist are cleared
//! - a composite whose `compositeConfig` changed is re-synchronized, unless
//!   the update asked to skip it
//! - a direct move into or out of a composite slot refreshes slot visibility

use crate::mutations::{Mutation, MutationResult};
use crate::session::EditSession;
use pagecraft_document::InstanceId;

/// Derived work a mutation calls for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    ClearSelection,
    ClearHover,
    ClearIsolation,
    SyncComposite { composite_id: InstanceId },
    RefreshSlotVisibility { composite_id: InstanceId },
}

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Inspect the session after `mutation` and report follow-ups
    fn analyze(
        &self,
        mutation: &Mutation,
        result: &MutationResult,
        session: &EditSession,
    ) -> Vec<FollowUp>;
}

/// Clear interaction ids that point at removed instances
#[derive(Debug)]
pub struct ClearStaleSelection;

impl ClearStaleSelection {
    pub fn stale(session: &EditSession) -> Vec<FollowUp> {
        let gone = |id: Option<&str>| id.map_or(false, |id| session.locate(id).is_none());

        let mut follow_ups = Vec::new();
        if gone(session.selection()) {
            follow_ups.push(FollowUp::ClearSelection);
        }
        if gone(session.hover()) {
            follow_ups.push(FollowUp::ClearHover);
        }
        if gone(session.isolation()) {
            follow_ups.push(FollowUp::ClearIsolation);
        }
        follow_ups
    }
}

impl PostEffect for ClearStaleSelection {
    fn analyze(
        &self,
        _mutation: &Mutation,
        result: &MutationResult,
        session: &EditSession,
    ) -> Vec<FollowUp> {
        if result.removed.is_empty() {
            return vec![];
        }
        Self::stale(session)
    }
}

/// Re-derive a composite's children after its settings changed
#[derive(Debug)]
pub struct CompositeSync;

impl PostEffect for CompositeSync {
    fn analyze(
        &self,
        mutation: &Mutation,
        _result: &MutationResult,
        session: &EditSession,
    ) -> Vec<FollowUp> {
        match mutation {
            Mutation::UpdateInstance {
                id,
                patch,
                skip_composite_sync: false,
            } if patch.touches_composite_config() => {
                let is_composite = session
                    .locate(id)
                    .map_or(false, |(_, instance)| instance.is_composite());
                if is_composite {
                    vec![FollowUp::SyncComposite {
                        composite_id: id.clone(),
                    }]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }
}

/// Show or hide slots after a drag-and-drop changed what they hold
#[derive(Debug)]
pub struct SlotVisibility;

impl PostEffect for SlotVisibility {
    fn analyze(
        &self,
        mutation: &Mutation,
        result: &MutationResult,
        session: &EditSession,
    ) -> Vec<FollowUp> {
        if matches!(
            mutation,
            Mutation::ApplyTemplate { .. } | Mutation::SetBrandPosition { .. }
        ) {
            return vec![];
        }

        result
            .touched_parents
            .iter()
            .filter(|parent| {
                session
                    .locate(parent)
                    .map_or(false, |(_, instance)| instance.slot_position().is_some())
            })
            .filter_map(|slot| session.composite_ancestor(slot))
            .map(|composite_id| FollowUp::RefreshSlotVisibility { composite_id })
            .collect()
    }
}

/// Post-effect engine that runs all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![
                Box::new(ClearStaleSelection),
                Box::new(CompositeSync),
                Box::new(SlotVisibility),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    pub fn register(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Follow-ups from every effect, duplicates removed, in discovery order
    pub fn analyze(
        &self,
        mutation: &Mutation,
        result: &MutationResult,
        session: &EditSession,
    ) -> Vec<FollowUp> {
        let mut follow_ups: Vec<FollowUp> = Vec::new();

        for effect in &self.effects {
            for follow_up in effect.analyze(mutation, result, session) {
                if !follow_ups.contains(&follow_up) {
                    follow_ups.push(follow_up);
                }
            }
        }

        follow_ups
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
