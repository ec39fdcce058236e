//! # pagetree
//!
//! File-based route table generation for client-side routers:
//! - Index files (`users/index.vue` → `/users`)
//! - Dynamic segments (`users/@id.vue` → `/users/:id`)
//! - Catch-all files (`docs/*.vue` → `/docs/:pathMatch(.*)`)
//! - Layouts (`admin/layout.vue` wraps every route under `admin/`)
//! - Route metadata from `<config>` blocks or `defineRouteMeta({ ... })` calls
//!
//! ## Ordering
//!
//! Sibling routes are sorted most specific first, so a router taking the first
//! match sees static paths before dynamic ones and catch-all paths last. Equal
//! ranks keep directory order (entries sorted by name, files before
//! subdirectories).
//!
//! ## Example
//!
//! ```
//! use pagetree::{generate_routes, Config, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with_file("src/pages/index.vue", "<template/>")
//!     .with_file("src/pages/*.vue", "<template/>")
//!     .with_file(
//!         "src/pages/about.tsx",
//!         "defineRouteMeta({ title: 'About' })\nexport default () => null",
//!     );
//!
//! let table = generate_routes(&Config::default(), &source).unwrap();
//! let paths: Vec<String> = table.records().into_iter().map(|r| r.path).collect();
//! assert_eq!(paths, vec!["/about", "/", "/:pathMatch(.*)"]);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod builder;
pub mod config;
pub mod error;
pub mod meta;
pub mod path;
pub mod route;
pub mod source;

pub use builder::{generate_routes, RouteConflict, RouteTable, RouteTree, RouteTreeBuilder};
pub use config::{Config, RoutingConfig};
pub use error::{Result, RouteError};
pub use meta::{MetaExtractor, PageKind};
pub use route::{ComponentRef, LayoutRoute, PageRoute, RouteMeta, RouteNode, RouteRecord};
pub use source::{FsSource, MemorySource, PageSource};
