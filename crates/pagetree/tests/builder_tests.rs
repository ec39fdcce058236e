//! Integration tests for the route tree builder
//!
//! Page trees are held in a `MemorySource`; on-disk behaviour lives in
//! `fs_tests.rs`.
//!
//! Covers:
//! - Path conventions (index, @dynamic, catch-all)
//! - Global path conflicts
//! - Layout wrapping and nesting
//! - Reserved directories
//! - Metadata precedence and name overrides
//! - Ranking and idempotence
//! - Configuration override

use pagetree::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::cell::Cell;
use std::path::{Path, PathBuf};

const PAGE: &str = "<template><div/></template>";

fn build(source: &MemorySource) -> RouteTree {
    let routing = RoutingConfig::default();
    RouteTreeBuilder::new(source, &routing)
        .build(Path::new("pages"))
        .unwrap()
}

fn paths(routes: &[RouteNode]) -> Vec<&str> {
    routes.iter().map(|r| r.path()).collect()
}

fn meta(node: &RouteNode) -> Value {
    Value::Object(node.meta().clone())
}

// ============================================================================
// Conventions
// ============================================================================

#[rstest]
#[case("pages/index.vue", "/", "index")]
#[case("pages/about.vue", "/about", "about")]
#[case("pages/users/index.vue", "/users", "users_index")]
#[case("pages/users/@id.vue", "/users/:id", "users__id")]
#[case("pages/@org/repos.tsx", "/:org/repos", ":org_repos")]
#[case("pages/*.jsx", "/:pathMatch(.*)", "FUZZYMATCH")]
#[case("pages/docs/*.vue", "/docs/:pathMatch(.*)", "docs_FUZZYMATCH")]
fn test_single_page_conventions(#[case] file: &str, #[case] path: &str, #[case] name: &str) {
    let source = MemorySource::new().with_file(file, PAGE);
    let tree = build(&source);

    assert_eq!(tree.route_count(), 1);
    let node = &tree.routes[0];
    assert_eq!(node.path(), path);
    assert_eq!(node.name(), name);
    assert_eq!(node.component().path(), Path::new(file));
    assert!(node.meta().is_empty());
}

#[test]
fn test_unrecognised_files_are_ignored() {
    let source = MemorySource::new()
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/README.md", "# Pages")
        .with_file("pages/styles.css", "body {}")
        .with_file("pages/helpers.ts", "export const a = 1");

    let tree = build(&source);
    assert_eq!(paths(&tree.routes), vec!["/"]);
}

// ============================================================================
// Conflicts
// ============================================================================

#[test]
fn test_same_path_from_two_extensions() {
    let source = MemorySource::new()
        .with_file("pages/about.tsx", "export default () => null")
        .with_file("pages/about.vue", PAGE);

    let tree = build(&source);

    assert_eq!(paths(&tree.routes), vec!["/about"]);
    assert_eq!(
        tree.routes[0].component().path(),
        Path::new("pages/about.tsx")
    );
    assert_eq!(
        tree.conflicts,
        vec![RouteConflict {
            path: "/about".to_string(),
            file: PathBuf::from("pages/about.vue"),
            claimed_by: PathBuf::from("pages/about.tsx"),
        }]
    );
}

#[test]
fn test_conflicts_are_global_across_directories() {
    let source = MemorySource::new()
        .with_file("pages/users.vue", PAGE)
        .with_file("pages/users/index.vue", PAGE)
        .with_file("pages/users/@id.vue", PAGE);

    let tree = build(&source);

    let all: Vec<&str> = tree.walk().map(|n| n.path()).collect();
    assert_eq!(all, vec!["/users/:id", "/users"]);
    assert_eq!(tree.conflicts.len(), 1);
    assert_eq!(tree.conflicts[0].path, "/users");
    assert_eq!(tree.conflicts[0].file, PathBuf::from("pages/users/index.vue"));
}

#[test]
fn test_paths_are_unique() {
    let source = MemorySource::new()
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/index.tsx", "")
        .with_file("pages/blog/index.vue", PAGE)
        .with_file("pages/blog.jsx", "")
        .with_file("pages/blog/@slug.vue", PAGE)
        .with_file("pages/@slug/index.vue", PAGE)
        .with_file("pages/@slug.vue", PAGE);

    let tree = build(&source);
    let mut all: Vec<&str> = tree.walk().map(|n| n.path()).collect();
    let before = all.len();
    all.sort();
    all.dedup();

    assert_eq!(all.len(), before);
    assert_eq!(tree.conflicts.len(), 3);
}

// ============================================================================
// Layouts
// ============================================================================

#[test]
fn test_layout_wraps_directory() {
    let source = MemorySource::new()
        .with_file("pages/layout.vue", PAGE)
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/c.vue", PAGE);

    let tree = build(&source);

    assert_eq!(tree.routes.len(), 1);
    let layout = &tree.routes[0];
    assert!(layout.is_layout());
    assert_eq!(layout.path(), "/");
    assert_eq!(layout.name(), "layout");
    assert_eq!(layout.component().path(), Path::new("pages/layout.vue"));
    assert_eq!(paths(layout.children()), vec!["/c", "/"]);
    assert!(tree.conflicts.is_empty());
}

#[test]
fn test_no_layout_gives_flat_siblings() {
    let source = MemorySource::new()
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/c.vue", PAGE);

    let tree = build(&source);

    assert_eq!(paths(&tree.routes), vec!["/c", "/"]);
    assert!(tree.routes.iter().all(|r| !r.is_layout()));
}

#[test]
fn test_layout_in_subdirectory() {
    let source = MemorySource::new()
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/admin/layout.vue", PAGE)
        .with_file("pages/admin/users.vue", PAGE)
        .with_file("pages/admin/settings/index.vue", PAGE);

    let tree = build(&source);

    assert_eq!(paths(&tree.routes), vec!["/admin", "/"]);
    let admin = &tree.routes[0];
    assert!(admin.is_layout());
    assert_eq!(admin.name(), "admin_layout");
    // Equal ranks keep discovery order: own files before subdirectories
    assert_eq!(
        paths(admin.children()),
        vec!["/admin/users", "/admin/settings"]
    );
}

#[test]
fn test_nested_layouts() {
    let source = MemorySource::new()
        .with_file("pages/layout.vue", PAGE)
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/blog/layout.tsx", "export default () => null")
        .with_file("pages/blog/@slug.vue", PAGE)
        .with_file("pages/blog/index.vue", PAGE);

    let tree = build(&source);

    assert_eq!(tree.routes.len(), 1);
    let root = &tree.routes[0];
    assert_eq!(paths(root.children()), vec!["/blog", "/"]);

    let blog = &root.children()[0];
    assert!(blog.is_layout());
    assert_eq!(blog.component().path(), Path::new("pages/blog/layout.tsx"));
    assert_eq!(paths(blog.children()), vec!["/blog/:slug", "/blog"]);
    assert_eq!(tree.route_count(), 5);

    // Layouts render at their parent's path but claim `<parent>/layout`
    assert!(tree.conflicts.is_empty());
    assert_eq!(tree.find("/blog").map(|n| n.is_layout()), Some(false));
}

#[test]
fn test_duplicate_layout_files() {
    let source = MemorySource::new()
        .with_file("pages/layout.tsx", "export default () => null")
        .with_file("pages/layout.vue", PAGE)
        .with_file("pages/index.vue", PAGE);

    let tree = build(&source);

    assert_eq!(tree.routes.len(), 1);
    assert_eq!(
        tree.routes[0].component().path(),
        Path::new("pages/layout.tsx")
    );
    assert_eq!(paths(tree.routes[0].children()), vec!["/"]);
    assert_eq!(
        tree.conflicts,
        vec![RouteConflict {
            path: "/layout".to_string(),
            file: PathBuf::from("pages/layout.vue"),
            claimed_by: PathBuf::from("pages/layout.tsx"),
        }]
    );
}

#[test]
fn test_layout_file_claims_its_path() {
    let source = MemorySource::new()
        .with_file("pages/layout.vue", PAGE)
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/layout/index.vue", PAGE);

    let tree = build(&source);

    assert_eq!(tree.routes.len(), 1);
    assert_eq!(paths(tree.routes[0].children()), vec!["/"]);
    assert!(tree.find("/layout").is_none());
    assert_eq!(
        tree.conflicts,
        vec![RouteConflict {
            path: "/layout".to_string(),
            file: PathBuf::from("pages/layout/index.vue"),
            claimed_by: PathBuf::from("pages/layout.vue"),
        }]
    );
}

#[test]
fn test_layout_meta_and_name() {
    let source = MemorySource::new()
        .with_file(
            "pages/account/layout.vue",
            r#"<config>{ "name": "account-shell", "auth": true }</config>"#,
        )
        .with_file("pages/account/index.vue", PAGE);

    let tree = build(&source);

    let layout = &tree.routes[0];
    assert_eq!(layout.name(), "account-shell");
    assert_eq!(meta(layout), json!({ "name": "account-shell", "auth": true }));
    assert!(layout.children()[0].meta().is_empty());
}

// ============================================================================
// Reserved directories
// ============================================================================

#[test]
fn test_components_are_never_routes() {
    let source = MemorySource::new()
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/components/Button.vue", PAGE)
        .with_file("pages/blog/components/Card.vue", PAGE)
        .with_file("pages/blog/index.vue", PAGE);

    let tree = build(&source);

    let all: Vec<&str> = tree.walk().map(|n| n.path()).collect();
    assert_eq!(all, vec!["/blog", "/"]);
}

#[test]
fn test_custom_reserved_dirs() {
    let source = MemorySource::new()
        .with_file("pages/index.vue", PAGE)
        .with_file("pages/components/index.vue", PAGE)
        .with_file("pages/partials/header.vue", PAGE);

    let routing = RoutingConfig {
        reserved_dirs: vec!["partials".to_string()],
        ..RoutingConfig::default()
    };
    let tree = RouteTreeBuilder::new(&source, &routing)
        .build(Path::new("pages"))
        .unwrap();

    let all: Vec<&str> = tree.walk().map(|n| n.path()).collect();
    assert_eq!(all, vec!["/components", "/"]);
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn test_config_block_becomes_meta() {
    let source = MemorySource::new().with_file(
        "pages/profile.vue",
        r#"<template><div/></template>
<config>
{ "title": "Profile", "requiresAuth": true }
</config>"#,
    );

    let tree = build(&source);
    assert_eq!(
        meta(&tree.routes[0]),
        json!({ "title": "Profile", "requiresAuth": true })
    );
}

#[test]
fn test_script_call_overrides_config_block() {
    let source = MemorySource::new().with_file(
        "pages/profile.vue",
        r#"<config>{ "title": "Block", "requiresAuth": true }</config>
<script lang="ts">
defineRouteMeta({
  title: 'Script',
  tags: ["a", "b"],
})
export default {}
</script>
<template><div/></template>"#,
    );

    let tree = build(&source);
    assert_eq!(
        meta(&tree.routes[0]),
        json!({ "title": "Script", "tags": ["a", "b"] })
    );
}

#[test]
fn test_script_page_meta() {
    let source = MemorySource::new().with_file(
        "pages/settings.tsx",
        r#"import { defineRouteMeta } from 'router'

defineRouteMeta({ title: `Settings`, order: 2 } as const)

export default function Settings() {
  return <h1>Settings</h1>
}"#,
    );

    let tree = build(&source);
    assert_eq!(meta(&tree.routes[0]), json!({ "title": "Settings", "order": 2 }));
}

#[test]
fn test_broken_meta_keeps_page_routable() {
    let source = MemorySource::new()
        .with_file("pages/a.vue", "<config>{ not json }</config>")
        .with_file("pages/b.tsx", "defineRouteMeta({ title: t('b') })")
        .with_file("pages/c.jsx", "defineRouteMeta({ title: 'unterminated )");

    let tree = build(&source);

    assert_eq!(tree.route_count(), 3);
    assert!(tree.walk().all(|n| n.meta().is_empty()));
}

#[test]
fn test_meta_name_overrides_route_name() {
    let source = MemorySource::new()
        .with_file(
            "pages/users/@id.vue",
            "<script setup>defineRouteMeta({ name: 'user-detail' })</script>",
        )
        .with_file("pages/users/index.vue", r#"<config>{ "name": 42 }</config>"#);

    let tree = build(&source);

    assert_eq!(tree.find("/users/:id").unwrap().name(), "user-detail");
    assert_eq!(tree.find("/users").unwrap().name(), "users_index");
}

#[test]
fn test_custom_meta_function() {
    let source = MemorySource::new()
        .with_file("pages/a.tsx", "definePage({ title: 'A' })")
        .with_file("pages/b.tsx", "defineRouteMeta({ title: 'B' })");

    let routing = RoutingConfig {
        meta_function: "definePage".to_string(),
        ..RoutingConfig::default()
    };
    let tree = RouteTreeBuilder::new(&source, &routing)
        .build(Path::new("pages"))
        .unwrap();

    assert_eq!(meta(tree.find("/a").unwrap()), json!({ "title": "A" }));
    assert!(tree.find("/b").unwrap().meta().is_empty());
}

// ============================================================================
// Ranking
// ============================================================================

#[test]
fn test_siblings_ordered_by_specificity() {
    let source = MemorySource::new()
        .with_file("pages/*.vue", PAGE)
        .with_file("pages/@id.vue", PAGE)
        .with_file("pages/a.vue", PAGE)
        .with_file("pages/index.vue", PAGE);

    let tree = build(&source);

    assert_eq!(
        paths(&tree.routes),
        vec!["/a", "/:id", "/", "/:pathMatch(.*)"]
    );
    assert!(tree.routes.windows(2).all(|w| w[0].rank() > w[1].rank()));
}

#[test]
fn test_every_level_is_ranked() {
    let source = MemorySource::new()
        .with_file("pages/docs/layout.vue", PAGE)
        .with_file("pages/docs/*.vue", PAGE)
        .with_file("pages/docs/@page.vue", PAGE)
        .with_file("pages/docs/intro.vue", PAGE);

    let tree = build(&source);

    let docs = &tree.routes[0];
    assert_eq!(docs.rank(), route::path_rank("/docs"));
    assert_eq!(
        paths(docs.children()),
        vec!["/docs/intro", "/docs/:page", "/docs/:pathMatch(.*)"]
    );
    assert!(tree
        .walk()
        .all(|n| n.rank() == route::path_rank(n.path())));
}

#[test]
fn test_build_is_idempotent() {
    let source = MemorySource::new()
        .with_file("pages/layout.vue", PAGE)
        .with_file("pages/index.vue", r#"<config>{ "title": "Home" }</config>"#)
        .with_file("pages/about.tsx", "defineRouteMeta({ order: 1 })")
        .with_file("pages/about.vue", PAGE)
        .with_file("pages/users/@id.vue", PAGE)
        .with_file("pages/users/*.vue", PAGE)
        .with_file("pages/users/new.vue", PAGE);

    let first = build(&source);
    let second = build(&source);

    assert_eq!(first, second);
}

// ============================================================================
// Errors
// ============================================================================

struct UnreadableSource(MemorySource);

impl PageSource for UnreadableSource {
    fn list_dir(&self, dir: &Path) -> Result<Vec<source::DirEntry>> {
        self.0.list_dir(dir)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Err(RouteError::ReadFile {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.0.is_dir(path)
    }
}

#[test]
fn test_missing_pages_dir() {
    let source = MemorySource::new().with_file("src/pages/index.vue", PAGE);
    let routing = RoutingConfig::default();

    let err = RouteTreeBuilder::new(&source, &routing)
        .build(Path::new("pages"))
        .unwrap_err();

    assert!(matches!(err, RouteError::MissingPagesDir(_)));
    assert_eq!(err.path(), Path::new("pages"));
}

#[test]
fn test_unreadable_page_aborts_build() {
    let source = UnreadableSource(MemorySource::new().with_file("pages/index.vue", PAGE));
    let routing = RoutingConfig::default();

    let err = RouteTreeBuilder::new(source, &routing)
        .build(Path::new("pages"))
        .unwrap_err();

    assert!(matches!(err, RouteError::ReadFile { .. }));
    assert_eq!(err.path(), Path::new("pages/index.vue"));
}

// ============================================================================
// Override
// ============================================================================

#[derive(Default)]
struct CountingSource {
    calls: Cell<usize>,
}

impl PageSource for CountingSource {
    fn list_dir(&self, _dir: &Path) -> Result<Vec<source::DirEntry>> {
        self.calls.set(self.calls.get() + 1);
        Ok(Vec::new())
    }

    fn read_to_string(&self, _path: &Path) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        Ok(String::new())
    }

    fn is_dir(&self, _path: &Path) -> bool {
        self.calls.set(self.calls.get() + 1);
        true
    }
}

#[test]
fn test_override_bypasses_scanning() {
    let config: Config = toml::from_str(
        r#"
        [[routes]]
        path = "/"
        name = "home"
        component = "src/pages/home.vue"

        [[routes]]
        path = "/legacy"
        meta = { hidden = true }
        "#,
    )
    .unwrap();

    let source = CountingSource::default();
    let table = generate_routes(&config, &source).unwrap();

    assert!(table.is_override());
    assert_eq!(table.records(), config.routes);
    assert!(table.conflicts().is_empty());
    assert_eq!(source.calls.get(), 0);
}

#[test]
fn test_empty_override_scans_pages() {
    let source = MemorySource::new()
        .with_file("src/pages/index.vue", PAGE)
        .with_file("src/pages/about.vue", PAGE);

    let table = generate_routes(&Config::default(), &source).unwrap();

    assert!(!table.is_override());
    let records = table.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path, "/about");
    assert_eq!(records[0].name.as_deref(), Some("about"));
    assert_eq!(
        records[0].component,
        Some(ComponentRef::new("src/pages/about.vue"))
    );
}
