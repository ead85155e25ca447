//! # Pagecraft Editor
//!
//! Editing engine for Pagecraft pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: instance tree + placement rules   │
//! │ styles:   sources, overrides, cascade       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save page, styles, shared headers   │
//! │  - Apply mutations with validation          │
//! │  - Snapshot history, batches, clipboard     │
//! │  - Slot-based composite layout (navbars)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ canvas / panels: resolve + render           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Instances are source of truth**: resolved declarations are derived
//! 2. **Validate before commit**: a rejected mutation changes nothing
//! 3. **Shared styles are read-only**: instance edits fork them first
//! 4. **Layout is projected**: templates move semantic parts, never rebuild them
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, EditSession, EditorConfig};
//! use pagecraft_document::{ElementType, Instance};
//!
//! let config = EditorConfig::default();
//! let mut session = EditSession::new(Document::load("page.json")?, &config);
//!
//! let hero = session.insert(Instance::new("hero", ElementType::Section), None, None)?;
//! session.set_instance_style(&hero, "padding", "64px", None, None)?;
//! session.undo();
//!
//! session.save()?;
//! ```

mod clipboard;
mod composite;
mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod post_effects;
mod session;
mod shared;

pub use clipboard::{Clipboard, IdRewriter};
pub use composite::{
    builtin_templates, find_template, project_semantic_view, LayoutTemplate, SemanticRole,
    SemanticView,
};
pub use config::{EditorConfig, DEFAULT_HISTORY_LIMIT};
pub use document::{Document, DocumentStorage, FORMAT_VERSION};
pub use errors::{EditorError, EditorResult};
pub use history::{History, HistoryEntry};
pub use mutations::{Mutation, MutationResult};
pub use post_effects::{
    ClearStaleSelection, CompositeSync, FollowUp, PostEffect, PostEffectEngine, SlotVisibility,
};
pub use session::{DanglingReference, EditSession, Snapshot, UpdateOptions};
pub use shared::{Location, SharedComponents};
