//! Error types for the editor

use pagecraft_document::DocumentError;
use pagecraft_styles::StyleError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Instance not found in page or shared components: {0}")]
    InstanceNotFound(String),

    #[error("Instance {instance} does not reference style source {source_id}")]
    SourceNotReferenced { instance: String, source_id: String },

    #[error("Shared component not found: {0}")]
    SharedComponentNotFound(String),

    #[error("Shared component already registered: {0}")]
    DuplicateSharedComponent(String),

    #[error("Unknown layout template: {0}")]
    UnknownTemplate(String),

    #[error("Instance is not a composite: {0}")]
    NotComposite(String),

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("Unsupported document format version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("Document is not file-backed")]
    NotFileBacked,
}

impl EditorError {
    /// Not-found errors from any layer, for callers that fall back elsewhere
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EditorError::InstanceNotFound(_)
                | EditorError::SharedComponentNotFound(_)
                | EditorError::Document(DocumentError::NotFound(_))
                | EditorError::Style(StyleError::SourceNotFound(_))
        )
    }
}
