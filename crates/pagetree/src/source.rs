// File: src/source.rs
// Purpose: Filesystem boundary of the route builder

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, RouteError};

/// Whether a directory entry is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// File name without its last extension (`layout.vue` -> `layout`)
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }

    /// Last extension, without the dot
    pub fn extension(&self) -> Option<&str> {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }
}

/// Synchronous access to a tree of page files
pub trait PageSource {
    /// Lists the direct children of `dir`, sorted by name
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn is_dir(&self, path: &Path) -> bool;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        (**self).list_dir(dir)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}

// ============================================================================
// On-disk source
// ============================================================================

/// Page files on the local filesystem
///
/// Symbolic links are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl PageSource for FsSource {
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| RouteError::ListDir {
                path: dir.to_path_buf(),
                source: io::Error::from(err),
            })?;

            let kind = if entry.file_type().is_dir() {
                EntryKind::Dir
            } else if entry.file_type().is_file() {
                EntryKind::File
            } else {
                continue;
            };

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.into_path(),
                kind,
            });
        }

        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| RouteError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// Page files held in memory
///
/// Directories are implied by the files below them; empty ones can be added
/// with [`MemorySource::with_dir`].
///
/// # Examples
///
/// ```
/// use pagetree::source::{MemorySource, PageSource};
/// use std::path::Path;
///
/// let source = MemorySource::new()
///     .with_file("pages/index.vue", "<template/>")
///     .with_file("pages/users/@id.vue", "<template/>");
///
/// let names: Vec<String> = source
///     .list_dir(Path::new("pages"))
///     .unwrap()
///     .into_iter()
///     .map(|entry| entry.name)
///     .collect();
/// assert_eq!(names, vec!["index.vue", "users"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.dirs.insert(clean(path.as_ref()));
        self
    }

    /// Adds or replaces a file
    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(clean(path.as_ref()), content.into());
    }

    /// Removes a file, returning its content
    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<String> {
        self.files.remove(&clean(path.as_ref()))
    }

    fn children_of(&self, dir: &Path) -> Option<BTreeMap<String, EntryKind>> {
        let mut children = BTreeMap::new();
        let mut found = self.dirs.contains(dir);

        let paths = self.files.keys().map(|p| (p, EntryKind::File));
        let dirs = self.dirs.iter().map(|p| (p, EntryKind::Dir));

        for (path, kind) in paths.chain(dirs) {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            found = true;

            let name = first.as_os_str().to_string_lossy().into_owned();
            let kind = if components.next().is_some() {
                EntryKind::Dir
            } else {
                kind
            };
            children.entry(name).or_insert(kind);
        }

        found.then_some(children)
    }
}

impl PageSource for MemorySource {
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let dir = clean(dir);
        let children = self.children_of(&dir).ok_or_else(|| RouteError::ListDir {
            path: dir.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        })?;

        Ok(children
            .into_iter()
            .map(|(name, kind)| DirEntry {
                path: dir.join(&name),
                name,
                kind,
            })
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .get(&clean(path))
            .cloned()
            .ok_or_else(|| RouteError::ReadFile {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.children_of(&clean(path)).is_some()
    }
}

/// Drops `.` components so that `./pages/a.vue` and `pages/a.vue` are one key
fn clean(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
