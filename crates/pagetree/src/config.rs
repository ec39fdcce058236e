// File: src/config.rs
// Purpose: Configuration parsing from pagetree.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::meta::{PageKind, DEFAULT_META_FUNCTION};
use crate::route::RouteRecord;

/// Default configuration file name
pub const CONFIG_FILE: &str = "pagetree.toml";

/// Route generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Explicit route list; when non-empty, directory scanning is skipped
    #[serde(default)]
    pub routes: Vec<RouteRecord>,

    /// Directory the configuration was loaded from; relative paths resolve against it
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingConfig {
    /// Directory containing page files (default: "src/pages")
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Extensions parsed as single-file documents (default: ["vue"])
    #[serde(default = "default_document_extensions")]
    pub document_extensions: Vec<String>,

    /// Extensions parsed as plain scripts (default: ["tsx", "jsx"])
    #[serde(default = "default_script_extensions")]
    pub script_extensions: Vec<String>,

    /// Directory names never scanned for pages (default: ["components"])
    #[serde(default = "default_reserved_dirs")]
    pub reserved_dirs: Vec<String>,

    /// Name of the metadata declaration function
    #[serde(default = "default_meta_function")]
    pub meta_function: String,
}

// Default values
fn default_pages_dir() -> String {
    "src/pages".to_string()
}

fn default_document_extensions() -> Vec<String> {
    vec!["vue".to_string()]
}

fn default_script_extensions() -> Vec<String> {
    vec!["tsx".to_string(), "jsx".to_string()]
}

fn default_reserved_dirs() -> Vec<String> {
    vec!["components".to_string()]
}

fn default_meta_function() -> String {
    DEFAULT_META_FUNCTION.to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            document_extensions: default_document_extensions(),
            script_extensions: default_script_extensions(),
            reserved_dirs: default_reserved_dirs(),
            meta_function: default_meta_function(),
        }
    }
}

impl RoutingConfig {
    /// How a file with this extension is parsed, if it is a page at all
    pub fn page_kind(&self, extension: &str) -> Option<PageKind> {
        if self.document_extensions.iter().any(|e| e == extension) {
            Some(PageKind::Document)
        } else if self.script_extensions.iter().any(|e| e == extension) {
            Some(PageKind::Script)
        } else {
            None
        }
    }

    pub fn is_reserved(&self, dir_name: &str) -> bool {
        self.reserved_dirs.iter().any(|d| d == dir_name)
    }
}

impl Config {
    /// Load configuration from a pagetree.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let root = path.parent().map(Path::to_path_buf);

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self {
                root,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self {
                root,
                ..Self::default()
            });
        }

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.root = root;

        Ok(config)
    }

    /// Load configuration from default path (./pagetree.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(CONFIG_FILE)
    }

    /// Pages directory, resolved against the config file's directory
    pub fn pages_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.join(&self.routing.pages_dir),
            None => PathBuf::from(&self.routing.pages_dir),
        }
    }

    /// Whether the explicit route list replaces scanning
    pub fn has_override(&self) -> bool {
        !self.routes.is_empty()
    }
}
