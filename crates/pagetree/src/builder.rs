// File: src/builder.rs
// Purpose: Build the ranked route tree from a directory of page files

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{Config, RoutingConfig};
use crate::error::{Result, RouteError};
use crate::meta::{declared_name, MetaExtractor, PageKind};
use crate::path::{route_name, route_path};
use crate::route::pattern::LAYOUT_NAME;
use crate::route::{
    rank_routes, ComponentRef, LayoutRoute, PageRoute, RouteMeta, RouteNode, RouteRecord,
};
use crate::source::{DirEntry, PageSource};

/// Route path of the pages directory itself
pub const ROOT_PATH: &str = "/";

/// A page dropped because another file already claimed its route path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteConflict {
    pub path: String,
    /// The dropped file
    pub file: PathBuf,
    /// The file that claimed the path first
    pub claimed_by: PathBuf,
}

/// Result of one build pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTree {
    /// Ranked top-level routes
    pub routes: Vec<RouteNode>,
    pub conflicts: Vec<RouteConflict>,
}

impl RouteTree {
    /// Every node of the tree, depth-first
    pub fn walk(&self) -> impl Iterator<Item = &RouteNode> {
        self.routes.iter().flat_map(RouteNode::walk)
    }

    /// Number of nodes, layouts included
    pub fn route_count(&self) -> usize {
        self.walk().count()
    }

    pub fn find(&self, path: &str) -> Option<&RouteNode> {
        self.walk().find(|node| node.path() == path && !node.is_layout())
    }

    pub fn records(&self) -> Vec<RouteRecord> {
        self.routes.iter().map(RouteRecord::from).collect()
    }
}

/// The route table handed downstream
#[derive(Debug, Clone, PartialEq)]
pub enum RouteTable {
    /// Built by scanning the pages directory
    Scanned(RouteTree),
    /// Taken verbatim from configuration
    Override(Vec<RouteRecord>),
}

impl RouteTable {
    pub fn records(&self) -> Vec<RouteRecord> {
        match self {
            RouteTable::Scanned(tree) => tree.records(),
            RouteTable::Override(routes) => routes.clone(),
        }
    }

    /// Conflicts detected while scanning; always empty for an override
    pub fn conflicts(&self) -> &[RouteConflict] {
        match self {
            RouteTable::Scanned(tree) => &tree.conflicts,
            RouteTable::Override(_) => &[],
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, RouteTable::Override(_))
    }
}

/// State of one build pass
///
/// Route paths are unique across the whole tree: the first file to claim a
/// path keeps it.
#[derive(Debug, Default)]
struct BuildPass {
    claimed: HashMap<String, PathBuf>,
    conflicts: Vec<RouteConflict>,
}

impl BuildPass {
    /// Claims `path` for `file`; returns false (and records a conflict) if taken
    fn claim(&mut self, path: &str, file: &Path) -> bool {
        if let Some(owner) = self.claimed.get(path) {
            warn!(
                "Route conflict: {} from {:?} is already defined by {:?}, skipping",
                path, file, owner
            );
            self.conflicts.push(RouteConflict {
                path: path.to_string(),
                file: file.to_path_buf(),
                claimed_by: owner.clone(),
            });
            return false;
        }

        self.claimed.insert(path.to_string(), file.to_path_buf());
        true
    }
}

/// Builds route trees from a [`PageSource`]
///
/// # Examples
///
/// ```
/// use pagetree::{MemorySource, RouteTreeBuilder, RoutingConfig};
/// use std::path::Path;
///
/// let source = MemorySource::new()
///     .with_file("pages/index.vue", "<template/>")
///     .with_file("pages/about.vue", "<template/>")
///     .with_file("pages/users/@id.vue", "<template/>");
///
/// let routing = RoutingConfig::default();
/// let tree = RouteTreeBuilder::new(&source, &routing)
///     .build(Path::new("pages"))
///     .unwrap();
///
/// let paths: Vec<&str> = tree.routes.iter().map(|r| r.path()).collect();
/// assert_eq!(paths, vec!["/users/:id", "/about", "/"]);
/// ```
pub struct RouteTreeBuilder<'a, S> {
    source: S,
    routing: &'a RoutingConfig,
    extractor: MetaExtractor,
}

impl<'a, S: PageSource> RouteTreeBuilder<'a, S> {
    pub fn new(source: S, routing: &'a RoutingConfig) -> Self {
        Self {
            source,
            routing,
            extractor: MetaExtractor::new(routing.meta_function.clone()),
        }
    }

    pub fn with_extractor(mut self, extractor: MetaExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Runs one build pass over `pages_dir` and ranks the result
    ///
    /// Any listing or read failure aborts the pass.
    pub fn build(&self, pages_dir: &Path) -> Result<RouteTree> {
        if !self.source.is_dir(pages_dir) {
            return Err(RouteError::MissingPagesDir(pages_dir.to_path_buf()));
        }

        let mut pass = BuildPass::default();
        let mut routes = Vec::new();
        self.build_dir(pages_dir, ROOT_PATH, &mut routes, &mut pass)?;
        rank_routes(&mut routes);

        let tree = RouteTree {
            routes,
            conflicts: pass.conflicts,
        };
        info!(
            "Generated {} routes from {:?} ({} conflicts)",
            tree.route_count(),
            pages_dir,
            tree.conflicts.len()
        );

        Ok(tree)
    }

    /// Builds one directory into `siblings`
    ///
    /// With a layout file, the directory's routes (and those of its
    /// subdirectories) go into a single layout node instead.
    fn build_dir(
        &self,
        dir: &Path,
        parent_path: &str,
        siblings: &mut Vec<RouteNode>,
        pass: &mut BuildPass,
    ) -> Result<()> {
        let entries = self.source.list_dir(dir)?;

        let pages: Vec<(&DirEntry, PageKind)> = entries
            .iter()
            .filter(|entry| !entry.is_dir())
            .filter_map(|entry| {
                let kind = self.routing.page_kind(entry.extension()?)?;
                Some((entry, kind))
            })
            .collect();

        let mut layout: Option<LayoutRoute> = None;
        for (entry, kind) in pages.iter().filter(|(entry, _)| entry.stem() == LAYOUT_NAME) {
            // A layout claims its own file path like any page; a second
            // `layout.*` in the directory loses that claim.
            let own_path = route_path(parent_path, LAYOUT_NAME, true);
            if !pass.claim(&own_path, &entry.path) {
                continue;
            }

            let meta = self.extract(entry, *kind)?;
            let name = self.name_for(&meta, parent_path, LAYOUT_NAME);
            debug!("Layout {} -> {:?}", parent_path, entry.path);

            layout = Some(LayoutRoute {
                path: parent_path.to_string(),
                name,
                component: ComponentRef::from(entry.path.as_path()),
                meta,
                children: Vec::new(),
                rank: 0,
            });
        }

        match layout {
            Some(mut layout) => {
                self.build_entries(&entries, &pages, parent_path, &mut layout.children, pass)?;
                siblings.push(RouteNode::Layout(layout));
            }
            None => self.build_entries(&entries, &pages, parent_path, siblings, pass)?,
        }

        Ok(())
    }

    /// Own page files first, then subdirectories
    fn build_entries(
        &self,
        entries: &[DirEntry],
        pages: &[(&DirEntry, PageKind)],
        parent_path: &str,
        target: &mut Vec<RouteNode>,
        pass: &mut BuildPass,
    ) -> Result<()> {
        for (entry, kind) in pages {
            let stem = entry.stem();
            if stem == LAYOUT_NAME {
                continue;
            }

            let path = route_path(parent_path, stem, true);
            if !pass.claim(&path, &entry.path) {
                continue;
            }

            let meta = self.extract(entry, *kind)?;
            let name = self.name_for(&meta, parent_path, stem);
            debug!("Route {} ({}) -> {:?}", path, name, entry.path);

            target.push(RouteNode::Page(PageRoute {
                path,
                name,
                component: ComponentRef::from(entry.path.as_path()),
                meta,
                rank: 0,
            }));
        }

        for entry in entries.iter().filter(|entry| entry.is_dir()) {
            if self.routing.is_reserved(&entry.name) {
                debug!("Skipping reserved directory {:?}", entry.path);
                continue;
            }

            let dir_path = route_path(parent_path, &entry.name, false);
            self.build_dir(&entry.path, &dir_path, target, pass)?;
        }

        Ok(())
    }

    fn extract(&self, entry: &DirEntry, kind: PageKind) -> Result<RouteMeta> {
        let src = self.source.read_to_string(&entry.path)?;
        Ok(self.extractor.extract(kind, &src, &entry.path))
    }

    fn name_for(&self, meta: &RouteMeta, parent_path: &str, stem: &str) -> String {
        declared_name(meta)
            .map(str::to_string)
            .unwrap_or_else(|| route_name(parent_path, stem))
    }
}

/// Produces the route table for a configuration
///
/// A non-empty `routes` list in the configuration is returned as-is and the
/// source is never touched; otherwise the pages directory is scanned.
pub fn generate_routes<S: PageSource>(config: &Config, source: S) -> Result<RouteTable> {
    if config.has_override() {
        info!(
            "Using {} routes from configuration, skipping page scan",
            config.routes.len()
        );
        return Ok(RouteTable::Override(config.routes.clone()));
    }

    let tree = RouteTreeBuilder::new(source, &config.routing).build(&config.pages_dir())?;
    Ok(RouteTable::Scanned(tree))
}
