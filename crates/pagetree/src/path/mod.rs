/// Route path utilities: normalization and joining
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
/// Route paths always use forward slashes, whatever the host platform.

use std::borrow::Cow;

pub mod convention;
pub use convention::{route_name, route_path};

/// Validates if a route path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not contain `.` or `..` segments
/// - Must not end with `/` (except root `/`)
///
/// # Examples
///
/// ```
/// use pagetree::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/users/:id"));
///
/// assert!(!is_canonical(""));
/// assert!(!is_canonical("users"));
/// assert!(!is_canonical("/users/"));
/// assert!(!is_canonical("/users//list"));
/// assert!(!is_canonical("/users/../list"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    if !path.starts_with('/') || path.contains('\\') {
        return false;
    }
    if path == "/" {
        return true;
    }

    path[1..]
        .split('/')
        .all(|segment| !matches!(segment, "" | "." | ".."))
}

/// Normalize a route path to canonical form
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// - Backslashes: `\users\list` → `/users/list`
/// - Repeated separators: `/users//list` → `/users/list`
/// - Trailing slashes: `/users/` → `/users`
/// - Dot segments: `/users/./list/..` → `/users`
///
/// # Examples
///
/// ```
/// use pagetree::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("\\users\\:id"), "/users/:id");
/// assert_eq!(normalize_path("/a//b/../c/"), "/a/c");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let replaced = path.replace('\\', "/");
    let segments = replaced
        .split('/')
        .fold(Vec::new(), |mut segments, segment| {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
            segments
        });

    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

/// Joins a child segment onto a parent route path and normalizes the result
///
/// An empty child collapses onto the parent.
///
/// ```
/// use pagetree::path::join_route_path;
///
/// assert_eq!(join_route_path("/", "about"), "/about");
/// assert_eq!(join_route_path("/users", ""), "/users");
/// assert_eq!(join_route_path("/users/", ":id"), "/users/:id");
/// ```
pub fn join_route_path(parent: &str, child: &str) -> String {
    normalize_path(&format!("{}/{}", parent, child)).into_owned()
}
