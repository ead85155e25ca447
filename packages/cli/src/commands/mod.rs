pub mod check;
pub mod init;
pub mod layout;
pub mod resolve;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use layout::{layout, LayoutArgs};
pub use resolve::{resolve, ResolveArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use pagecraft_editor::{Document, EditSession};
use std::path::PathBuf;

/// Load the config and open the document it (or `explicit`) points at
pub(crate) fn open_session(cwd: &str, explicit: Option<&PathBuf>) -> Result<EditSession> {
    let config = Config::load(cwd)?;
    let path = config.document_path(cwd, explicit);
    let document = Document::load(&path)
        .with_context(|| format!("Cannot open document {}", path.display()))?;
    Ok(EditSession::new(document, &config.editor))
}
