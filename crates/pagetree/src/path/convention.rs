/// File naming conventions for pages
///
/// Maps a `(parent route path, file or directory name)` pair to a route path and a
/// route name. Names are passed without their extension.
///
/// | Name      | Route path (under `/users`)   | Route name            |
/// |-----------|-------------------------------|-----------------------|
/// | `index`   | `/users`                      | `users_index`         |
/// | `settings`| `/users/settings`             | `users_settings`      |
/// | `@id`     | `/users/:id`                  | `users__id`           |
/// | `*`       | `/users/:pathMatch(.*)`       | `users_FUZZYMATCH`    |

use super::join_route_path;
use crate::route::pattern::{CATCH_ALL, CATCH_ALL_NAME, DYNAMIC_PREFIX, INDEX_NAME};

/// Builds the conventional route name for a page
///
/// # Examples
///
/// ```
/// use pagetree::path::route_name;
///
/// assert_eq!(route_name("/", "about"), "about");
/// assert_eq!(route_name("/users", "@id"), "users__id");
/// assert_eq!(route_name("/docs", "*"), "docs_FUZZYMATCH");
/// ```
pub fn route_name(parent_path: &str, name: &str) -> String {
    join_route_path(parent_path, name)
        .trim_start_matches('/')
        .replace('/', "_")
        .replace(DYNAMIC_PREFIX, "_")
        .replace('*', CATCH_ALL_NAME)
}

/// Builds the route path contributed by a file or directory
///
/// `is_leaf_file` is true for page files; only those collapse `index` onto the
/// parent path. Directories follow the dynamic and catch-all rules unchanged.
///
/// # Examples
///
/// ```
/// use pagetree::path::route_path;
///
/// assert_eq!(route_path("/users", "index", true), "/users");
/// assert_eq!(route_path("/users", "index", false), "/users/index");
/// assert_eq!(route_path("/users", "@id", true), "/users/:id");
/// assert_eq!(route_path("/", "*", true), "/:pathMatch(.*)");
/// ```
pub fn route_path(parent_path: &str, name: &str, is_leaf_file: bool) -> String {
    let name = if is_leaf_file && name == INDEX_NAME {
        ""
    } else {
        name
    };

    let name = match name.strip_prefix(DYNAMIC_PREFIX) {
        Some(param) => format!(":{}", param),
        None => name.to_string(),
    };

    let name = if name.contains('*') {
        name.replacen('*', CATCH_ALL, 1)
    } else {
        name
    };

    join_route_path(parent_path, &name)
}
