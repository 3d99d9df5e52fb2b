//=========================================================================
// Asset Sources
//=========================================================================
//
// Discovery and byte access for asset files.
//
// Paths handed out by a source are relative to its root, use forward
// slashes on every platform, and are sorted so loading order (and thus
// progress reporting) is deterministic.
//
// Both sources accept excluded prefixes (e.g. code or metadata folders
// shipped next to the assets in a packaged build).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{trace, warn};
use walkdir::WalkDir;

//=== AssetSource =========================================================

/// Enumerates and reads asset files.
pub trait AssetSource: Send + Sync {
    /// Every loadable path, sorted.
    fn list(&self) -> io::Result<Vec<String>>;

    /// Raw bytes of `path`, as returned by [`AssetSource::list`].
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

//--- Exclusion -----------------------------------------------------------

/// Normalized set of excluded path prefixes.
#[derive(Debug, Clone, Default)]
struct Exclusions {
    prefixes: Vec<String>,
}

impl Exclusions {
    fn add(&mut self, prefix: &str) {
        let prefix = prefix.trim_matches('/');
        if !prefix.is_empty() {
            self.prefixes.push(prefix.to_owned());
        }
    }

    fn excludes(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            path == prefix
                || (path.starts_with(prefix.as_str()) && path[prefix.len()..].starts_with('/'))
        })
    }
}

//=== DirectorySource =====================================================

/// Recursively walks a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    exclusions: Exclusions,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclusions: Exclusions::default(),
        }
    }

    /// Skips everything under `prefix` (relative to the root).
    pub fn with_excluded(mut self, prefix: &str) -> Self {
        self.exclusions.add(prefix);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root-relative, forward-slash form of `path`.
    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        Some(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }
}

/// A symlink whose target is missing, as opposed to a loop or an
/// unreadable directory.
fn is_dangling_link(error: &walkdir::Error) -> bool {
    error.loop_ancestor().is_none()
        && error
            .path()
            .and_then(|path| fs::symlink_metadata(path).ok())
            .is_some_and(|meta| meta.file_type().is_symlink())
}

impl AssetSource for DirectorySource {
    /// Walks the tree below the root, following links.
    ///
    /// Only an unreadable root is an error. A broken entry below it is
    /// logged and skipped; a dangling file link is still listed so the
    /// loader reports (and counts) its failed read like any other file.
    fn list(&self) -> io::Result<Vec<String>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(true) {
            let path = match entry {
                Ok(entry) if entry.file_type().is_file() => entry.into_path(),
                Ok(_) => continue,
                Err(e) if e.depth() == 0 => return Err(io::Error::from(e)),
                Err(e) if is_dangling_link(&e) => {
                    warn!("Dangling asset link: {}", e);
                    match e.path() {
                        Some(path) => path.to_path_buf(),
                        None => continue,
                    }
                }
                Err(e) => {
                    warn!("Skipping unreadable asset entry: {}", e);
                    continue;
                }
            };

            let Some(path) = self.relative(&path) else {
                continue;
            };
            if self.exclusions.excludes(&path) {
                trace!("Excluded asset {}", path);
                continue;
            }
            paths.push(path);
        }

        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(path))
    }
}

//=== MemorySource ========================================================

/// In-memory entries, e.g. assets embedded with `include_bytes!` in a
/// packaged build, or fixtures in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
    exclusions: Exclusions,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn with_excluded(mut self, prefix: &str) -> Self {
        self.exclusions.add(prefix);
        self
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files
            .insert(path.trim_start_matches('/').to_owned(), bytes.into());
    }
}

impl AssetSource for MemorySource {
    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self
            .files
            .keys()
            .filter(|path| !self.exclusions.excludes(path))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no entry {path}")))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_lists_sorted_paths() {
        let source = MemorySource::new()
            .with_file("sprites/b.png", vec![1])
            .with_file("/a.ttf", vec![2]);

        assert_eq!(source.list().unwrap(), vec!["a.ttf", "sprites/b.png"]);
        assert_eq!(source.read("a.ttf").unwrap(), vec![2]);
    }

    #[test]
    fn memory_source_missing_entry_is_not_found() {
        let source = MemorySource::new();
        let err = source.read("nope.png").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn excluded_prefixes_match_whole_segments() {
        let source = MemorySource::new()
            .with_file("META-INF/MANIFEST.MF", vec![])
            .with_file("xyz/Main.class", vec![])
            .with_file("xyzzy.png", vec![])
            .with_file("images/a.png", vec![])
            .with_excluded("/META-INF")
            .with_excluded("/xyz");

        assert_eq!(source.list().unwrap(), vec!["images/a.png", "xyzzy.png"]);
    }

    #[test]
    fn empty_exclusion_is_ignored() {
        let mut exclusions = Exclusions::default();
        exclusions.add("/");
        assert!(!exclusions.excludes("anything.png"));
    }
}
