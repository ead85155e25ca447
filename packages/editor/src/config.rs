use crate::errors::EditorResult;
use pagecraft_styles::{default_breakpoints, Breakpoint};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Editing settings, usually read from `pagecraft.config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo levels (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Breakpoint set for new documents; the default set when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<Breakpoint>>,

    /// Seed for generated instance ids; derived from the document path when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            breakpoints: None,
            id_seed: None,
        }
    }
}

impl EditorConfig {
    /// Read a config file
    pub fn from_file(path: &Path) -> EditorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        self.breakpoints.clone().unwrap_or_else(default_breakpoints)
    }
}
