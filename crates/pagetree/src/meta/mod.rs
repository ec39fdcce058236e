/// Route metadata extraction
///
/// Pages declare metadata in one of two ways:
///
/// - a `<config>` custom block holding a JSON object (single-file documents only)
/// - a `defineRouteMeta({ ... })` call whose argument is an object literal
///
/// Precedence for documents: a call in `<script>` replaces the `<config>` block; a
/// call in `<script setup>` is only consulted when neither of those produced
/// anything. Script pages are searched for the call directly.
///
/// Extraction never fails a build: a broken declaration means "no metadata".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::route::RouteMeta;

pub mod literal;
pub mod sfc;

pub use sfc::{parse_document, CustomBlock, DocumentSections};

/// Custom block type holding JSON route metadata
pub const CONFIG_BLOCK: &str = "config";

/// Default name of the metadata declaration function
pub const DEFAULT_META_FUNCTION: &str = "defineRouteMeta";

/// How a page file's content is organised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Single-file document with `<script>`, `<script setup>` and custom blocks
    Document,
    /// Plain script body
    Script,
}

/// Extracts route metadata from page sources
#[derive(Debug, Clone)]
pub struct MetaExtractor {
    function: String,
}

impl MetaExtractor {
    /// Creates an extractor looking for calls of `function`
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
        }
    }

    /// Name of the declaration function this extractor looks for
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Extracts metadata from one page file
    ///
    /// `origin` only labels log messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagetree::meta::{MetaExtractor, PageKind};
    /// use std::path::Path;
    ///
    /// let extractor = MetaExtractor::default();
    /// let meta = extractor.extract(
    ///     PageKind::Script,
    ///     "defineRouteMeta({ title: 'About' })\nexport default () => <h1>About</h1>",
    ///     Path::new("pages/about.tsx"),
    /// );
    /// assert_eq!(meta["title"], "About");
    /// ```
    pub fn extract(&self, kind: PageKind, src: &str, origin: &Path) -> RouteMeta {
        match kind {
            PageKind::Document => self.from_sections(&parse_document(src), origin),
            PageKind::Script => self.from_script(src, origin).unwrap_or_default(),
        }
    }

    /// Applies the document precedence rules to already-sectioned content
    pub fn from_sections(&self, doc: &DocumentSections, origin: &Path) -> RouteMeta {
        let baseline = doc
            .custom_block(CONFIG_BLOCK)
            .map(|block| config_block_meta(block, origin))
            .unwrap_or_default();

        if let Some(meta) = doc
            .script
            .as_deref()
            .and_then(|script| self.from_script(script, origin))
        {
            return meta;
        }

        if baseline.is_empty() {
            if let Some(meta) = doc
                .script_setup
                .as_deref()
                .and_then(|script| self.from_script(script, origin))
            {
                return meta;
            }
        }

        baseline
    }

    fn from_script(&self, script: &str, origin: &Path) -> Option<RouteMeta> {
        match literal::try_find_call_argument(script, &self.function) {
            Ok(Some(Value::Object(meta))) => Some(meta),
            Ok(Some(_)) => {
                debug!(
                    "Ignoring {}() in {:?}: argument is not an object literal",
                    self.function, origin
                );
                None
            }
            Ok(None) => None,
            Err(err) => {
                debug!("Ignoring {}() in {:?}: {}", self.function, origin, err);
                None
            }
        }
    }
}

impl Default for MetaExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_META_FUNCTION)
    }
}

/// Parses a `<config>` block; malformed content counts as empty
fn config_block_meta(block: &CustomBlock, origin: &Path) -> RouteMeta {
    if block.content.trim().is_empty() {
        return RouteMeta::new();
    }

    match serde_json::from_str::<Value>(&block.content) {
        Ok(Value::Object(meta)) => meta,
        Ok(_) => {
            warn!(
                "Ignoring <{}> block in {:?}: expected a JSON object",
                block.kind, origin
            );
            RouteMeta::new()
        }
        Err(err) => {
            warn!("Ignoring malformed <{}> block in {:?}: {}", block.kind, origin, err);
            RouteMeta::new()
        }
    }
}

/// Route name declared in metadata, if any
pub fn declared_name(meta: &RouteMeta) -> Option<&str> {
    meta.get("name").and_then(Value::as_str)
}
