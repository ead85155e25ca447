//! # Document Handle
//!
//! A Document is one page plus everything it needs to render: the instance
//! tree, the style registry, and the shared components it can reference.
//! The three are always serialized and restored together.
//!
//! Documents can be:
//! - **Memory-backed**: Temporary, for tests or scratch edits
//! - **File-backed**: Persisted JSON with dirty tracking
//!
//! ## Persisted shape
//!
//! ```json
//! { "formatVersion": 1, "root": { ... }, "styles": { ... }, "shared": { ... } }
//! ```

use crate::config::EditorConfig;
use crate::errors::{EditorError, EditorResult};
use crate::shared::SharedComponents;
use pagecraft_document::{DocumentError, DocumentTree};
use pagecraft_styles::StyleRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const FORMAT_VERSION: u32 = 1;

/// Editable page document
#[derive(Debug, Clone)]
pub struct Document {
    /// Path the document was loaded from or will be saved to
    pub path: PathBuf,

    pub(crate) tree: DocumentTree,
    pub(crate) styles: StyleRegistry,
    pub(crate) shared: SharedComponents,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStorage {
    /// In-memory only
    Memory,

    /// File-backed
    File { dirty: bool },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDocument {
    format_version: u32,
    root: DocumentTree,
    styles: StyleRegistry,
    #[serde(default)]
    shared: SharedComponents,
}

impl Document {
    /// Empty memory-backed page with the default breakpoints
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, &EditorConfig::default())
    }

    /// Empty memory-backed page using the config's breakpoint set
    pub fn with_config(path: impl Into<PathBuf>, config: &EditorConfig) -> Self {
        Self {
            path: path.into(),
            tree: DocumentTree::new(),
            styles: StyleRegistry::with_breakpoints(config.breakpoints()),
            shared: SharedComponents::new(),
            storage: DocumentStorage::Memory,
        }
    }

    /// Assemble a memory-backed document from parts
    pub fn from_parts(
        path: impl Into<PathBuf>,
        tree: DocumentTree,
        styles: StyleRegistry,
        shared: SharedComponents,
    ) -> EditorResult<Self> {
        check_ids_disjoint(&tree, &shared)?;
        Ok(Self {
            path: path.into(),
            tree,
            styles,
            shared,
            storage: DocumentStorage::Memory,
        })
    }

    /// Parse a document from JSON (memory-backed)
    pub fn from_json(path: impl Into<PathBuf>, json: &str) -> EditorResult<Self> {
        let persisted: PersistedDocument = serde_json::from_str(json)?;
        if persisted.format_version != FORMAT_VERSION {
            return Err(EditorError::UnsupportedFormat {
                found: persisted.format_version,
                expected: FORMAT_VERSION,
            });
        }
        Self::from_parts(path, persisted.root, persisted.styles, persisted.shared)
    }

    /// Load document from file (file-backed)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut document = Self::from_json(path, &json)?;
        document.storage = DocumentStorage::File { dirty: false };

        info!(
            instances = document.tree.len(),
            sources = document.styles.len(),
            shared = document.shared.len(),
            "Loaded document"
        );
        Ok(document)
    }

    pub fn to_json(&self) -> EditorResult<String> {
        let persisted = PersistedDocument {
            format_version: FORMAT_VERSION,
            root: self.tree.clone(),
            styles: self.styles.clone(),
            shared: self.shared.clone(),
        };
        Ok(serde_json::to_string_pretty(&persisted)?)
    }

    /// Save document to disk (if file-backed)
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&mut self) -> EditorResult<()> {
        match self.storage {
            DocumentStorage::File { .. } => {
                std::fs::write(&self.path, self.to_json()?)?;
                self.storage = DocumentStorage::File { dirty: false };
                debug!("Saved document");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Write to `path` and become file-backed there
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> EditorResult<()> {
        self.path = path.into();
        self.storage = DocumentStorage::File { dirty: true };
        self.save()
    }

    pub fn storage(&self) -> DocumentStorage {
        self.storage
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { dirty: true })
    }

    pub(crate) fn mark_dirty(&mut self) {
        if let DocumentStorage::File { dirty } = &mut self.storage {
            *dirty = true;
        }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn shared(&self) -> &SharedComponents {
        &self.shared
    }
}

/// Instance ids are unique across the page and every shared component
fn check_ids_disjoint(tree: &DocumentTree, shared: &SharedComponents) -> EditorResult<()> {
    let mut seen: HashSet<&str> = tree.ids().into_iter().collect();
    for (_, component) in shared.trees() {
        for id in component.ids() {
            if !seen.insert(id) {
                return Err(DocumentError::DuplicateId(id.to_string()).into());
            }
        }
    }
    Ok(())
}
