/// Specificity ranking of sibling routes
///
/// A router that takes the first matching route needs static routes before
/// dynamic ones and catch-all routes last. Each path segment scores
/// [`SEGMENT_BASE`] plus a bonus for its kind; a route's rank is the sum over its
/// segments. Higher rank = matched first.

use super::pattern::{classify_segment, SegmentKind};
use super::RouteNode;

/// Base score of any segment
pub const SEGMENT_BASE: i32 = 4;

/// Bonus for a segment of the given kind (pure function)
///
/// | Kind       | Bonus |
/// |------------|-------|
/// | `Static`   | +3    |
/// | `Dynamic`  | +2    |
/// | `Root`     | +1    |
/// | `CatchAll` | -1    |
pub fn segment_bonus(kind: SegmentKind) -> i32 {
    match kind {
        SegmentKind::Static => 3,
        SegmentKind::Dynamic => 2,
        SegmentKind::Root => 1,
        SegmentKind::CatchAll => -1,
    }
}

/// Computes the rank of a route path
///
/// A leading `/` is dropped before splitting, so `/` is a single empty segment.
///
/// # Examples
///
/// ```
/// use pagetree::route::path_rank;
///
/// assert!(path_rank("/about") > path_rank("/:id"));
/// assert!(path_rank("/:id") > path_rank("/"));
/// assert!(path_rank("/") > path_rank("/:pathMatch(.*)"));
/// ```
pub fn path_rank(path: &str) -> i32 {
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .map(|segment| SEGMENT_BASE + segment_bonus(classify_segment(segment)))
        .sum()
}

/// Ranks every node and orders each sibling list, most specific first
///
/// Children are ranked before their parent's level is sorted. The sort is stable:
/// routes with equal rank keep their discovery order.
pub fn rank_routes(routes: &mut [RouteNode]) {
    for node in routes.iter_mut() {
        if let RouteNode::Layout(layout) = node {
            rank_routes(&mut layout.children);
        }
        let rank = path_rank(node.path());
        node.set_rank(rank);
    }

    routes.sort_by(|a, b| b.rank().cmp(&a.rank()));
}
