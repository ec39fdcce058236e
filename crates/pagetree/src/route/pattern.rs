/// Route path segment classification
///
/// Pure functional classification of the segments produced by the naming
/// conventions. The ranker scores segments by their [`SegmentKind`].

/// Catch-all token written into route paths for `*` file names
pub const CATCH_ALL: &str = ":pathMatch(.*)";

/// Replacement for `*` in route names
pub const CATCH_ALL_NAME: &str = "FUZZYMATCH";

/// File name prefix declaring a dynamic segment (`@id` → `:id`)
pub const DYNAMIC_PREFIX: char = '@';

/// File name that collapses onto its directory's route path
pub const INDEX_NAME: &str = "index";

/// File name (without extension) of a directory's layout
pub const LAYOUT_NAME: &str = "layout";

/// Kinds of route path segments, from the ranker's point of view
///
/// # Examples
///
/// ```
/// use pagetree::route::pattern::{classify_segment, SegmentKind};
///
/// assert_eq!(classify_segment("about"), SegmentKind::Static);
/// assert_eq!(classify_segment(":id"), SegmentKind::Dynamic);
/// assert_eq!(classify_segment(":pathMatch(.*)"), SegmentKind::CatchAll);
/// assert_eq!(classify_segment(""), SegmentKind::Root);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Plain literal segment: `about`
    Static,
    /// Segment carrying a named parameter: `:id`
    Dynamic,
    /// Exactly the catch-all token
    CatchAll,
    /// Empty segment (the root or an index route)
    Root,
}

/// Classifies one route path segment (pure function)
///
/// A segment that embeds the catch-all token next to literal text (`raw:pathMatch(.*)`)
/// is dynamic, not a catch-all.
pub fn classify_segment(segment: &str) -> SegmentKind {
    if segment == CATCH_ALL {
        SegmentKind::CatchAll
    } else if segment.contains(':') {
        SegmentKind::Dynamic
    } else if segment.is_empty() {
        SegmentKind::Root
    } else {
        SegmentKind::Static
    }
}
