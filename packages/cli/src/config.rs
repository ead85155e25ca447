use pagecraft_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Page document the commands operate on by default
    #[serde(default = "default_document")]
    pub document: String,

    /// Editing settings (history limit, breakpoints, id seed)
    #[serde(flatten)]
    pub editor: EditorConfig,
}

fn default_document() -> String {
    "page.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Resolve the document path: an explicit argument wins over the config
    pub fn document_path(&self, cwd: &str, explicit: Option<&PathBuf>) -> PathBuf {
        match explicit {
            Some(path) => PathBuf::from(cwd).join(path),
            None => PathBuf::from(cwd).join(&self.document),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            editor: EditorConfig::default(),
        }
    }
}
