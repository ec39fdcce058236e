/// Route tree types
///
/// A built tree is made of [`RouteNode`]s: plain pages, or layouts wrapping the
/// routes of their directory. [`RouteRecord`] is the flat shape handed to whatever
/// renders the table into module code, and the shape of a user-supplied override.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod pattern;
pub mod rank;

pub use pattern::{classify_segment, SegmentKind};
pub use rank::{path_rank, rank_routes};

/// Arbitrary per-route metadata (a JSON object)
pub type RouteMeta = serde_json::Map<String, serde_json::Value>;

/// Reference to a page's source file
///
/// The file is resolved, never loaded: the renderer decides how to import it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(PathBuf);

impl ComponentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<&Path> for ComponentRef {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// A routable page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRoute {
    pub path: String,
    pub name: String,
    pub component: ComponentRef,
    #[serde(default)]
    pub meta: RouteMeta,
    /// Specificity score, set by [`rank_routes`]
    #[serde(default)]
    pub rank: i32,
}

/// A layout rendered at its parent's path around the routes of its directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRoute {
    pub path: String,
    pub name: String,
    pub component: ComponentRef,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default)]
    pub children: Vec<RouteNode>,
    #[serde(default)]
    pub rank: i32,
}

/// A node of the route tree
///
/// Serialized with a `kind` tag (`"page"` or `"layout"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteNode {
    Page(PageRoute),
    Layout(LayoutRoute),
}

impl RouteNode {
    pub fn path(&self) -> &str {
        match self {
            RouteNode::Page(page) => &page.path,
            RouteNode::Layout(layout) => &layout.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RouteNode::Page(page) => &page.name,
            RouteNode::Layout(layout) => &layout.name,
        }
    }

    pub fn component(&self) -> &ComponentRef {
        match self {
            RouteNode::Page(page) => &page.component,
            RouteNode::Layout(layout) => &layout.component,
        }
    }

    pub fn meta(&self) -> &RouteMeta {
        match self {
            RouteNode::Page(page) => &page.meta,
            RouteNode::Layout(layout) => &layout.meta,
        }
    }

    pub fn rank(&self) -> i32 {
        match self {
            RouteNode::Page(page) => page.rank,
            RouteNode::Layout(layout) => layout.rank,
        }
    }

    pub(crate) fn set_rank(&mut self, rank: i32) {
        match self {
            RouteNode::Page(page) => page.rank = rank,
            RouteNode::Layout(layout) => layout.rank = rank,
        }
    }

    /// Nested routes; always empty for pages
    pub fn children(&self) -> &[RouteNode] {
        match self {
            RouteNode::Page(_) => &[],
            RouteNode::Layout(layout) => &layout.children,
        }
    }

    pub fn is_layout(&self) -> bool {
        matches!(self, RouteNode::Layout(_))
    }

    /// Iterates over this node and all of its descendants, depth-first
    ///
    /// ```
    /// use pagetree::{ComponentRef, LayoutRoute, PageRoute, RouteMeta, RouteNode};
    ///
    /// let page = RouteNode::Page(PageRoute {
    ///     path: "/about".into(),
    ///     name: "about".into(),
    ///     component: ComponentRef::new("pages/about.vue"),
    ///     meta: RouteMeta::new(),
    ///     rank: 0,
    /// });
    /// let layout = RouteNode::Layout(LayoutRoute {
    ///     path: "/".into(),
    ///     name: "layout".into(),
    ///     component: ComponentRef::new("pages/layout.vue"),
    ///     meta: RouteMeta::new(),
    ///     children: vec![page],
    ///     rank: 0,
    /// });
    ///
    /// let paths: Vec<&str> = layout.walk().map(|node| node.path()).collect();
    /// assert_eq!(paths, vec!["/", "/about"]);
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = &RouteNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

/// Route record in the shape consumed downstream
///
/// Also the shape of the routes a configuration may supply to replace scanning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,
    #[serde(default, skip_serializing_if = "RouteMeta::is_empty")]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
}

impl From<&RouteNode> for RouteRecord {
    fn from(node: &RouteNode) -> Self {
        RouteRecord {
            path: node.path().to_string(),
            name: Some(node.name().to_string()),
            component: Some(node.component().clone()),
            meta: node.meta().clone(),
            children: node.children().iter().map(RouteRecord::from).collect(),
        }
    }
}
