//! File acquisition: collects documents and images from a directory tree
//!
//! Both the filesystem walk and the in-memory entry tree flatten to leaf
//! files named by their path relative to the traversal root, using `/` as
//! the separator regardless of platform.

use crate::assets::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Errors that can occur during acquisition
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Failed to walk {path}: {source}", path = .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Input path {path} is not a directory", path = .0.display())]
    NotADirectory(PathBuf),
}

/// Payload of an acquired file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

/// One acquired leaf file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredFile {
    /// Path relative to the traversal root, `/`-separated
    pub name: String,
    pub content: FileContent,
}

/// Everything acquired from one root, in name order
#[derive(Debug, Default)]
pub struct Acquired {
    pub documents: Vec<AcquiredFile>,
    pub images: Vec<AcquiredFile>,

    /// Files that matched but could not be read; already logged
    pub skipped: Vec<PathBuf>,
}

/// Which files are picked up
#[derive(Debug, Clone)]
pub struct AcquisitionOptions {
    /// Extensions (lowercase, no dot) treated as markup documents
    pub document_extensions: Vec<String>,

    /// Whether image files are collected as assets
    pub include_images: bool,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            document_extensions: vec!["md".into(), "markdown".into(), "txt".into()],
            include_images: true,
        }
    }
}

impl AcquisitionOptions {
    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.document_extensions.iter().any(|e| *e == ext))
    }
}

/// Walk a directory and read every document and image below it
///
/// A document that cannot be read as UTF-8 text is logged and left out;
/// only a failure to walk the tree itself is an error.
///
/// # Parameters
/// * `root` - Directory to walk
/// * `options` - Which extensions to pick up
///
/// # Returns
/// * `Ok(Acquired)` - Documents and images sorted by relative name
/// * `Err(AcquisitionError)` - The root is not a directory or could not be walked
pub fn acquire_directory(
    root: &Path,
    options: &AcquisitionOptions,
) -> Result<Acquired, AcquisitionError> {
    if !root.is_dir() {
        return Err(AcquisitionError::NotADirectory(root.to_path_buf()));
    }

    let mut document_paths = Vec::new();
    let mut image_paths = Vec::new();

    // Prune hidden entries before descending into them
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|source| AcquisitionError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        if options.is_document(path) {
            document_paths.push(path.to_path_buf());
        } else if options.include_images && ImageFormat::from_path(path).is_image() {
            image_paths.push(path.to_path_buf());
        }
    }

    let mut acquired = Acquired::default();

    for (path, result) in read_all(&document_paths, read_text) {
        match result {
            Ok(content) => acquired.documents.push(AcquiredFile {
                name: relative_name(&path, root),
                content: FileContent::Text(content),
            }),
            Err(e) => {
                log::warn!("Skipping unreadable document {}: {}", path.display(), e);
                acquired.skipped.push(path);
            }
        }
    }

    for (path, result) in read_all(&image_paths, |p| std::fs::read(p)) {
        match result {
            Ok(bytes) => acquired.images.push(AcquiredFile {
                name: relative_name(&path, root),
                content: FileContent::Binary(bytes),
            }),
            Err(e) => {
                log::warn!("Skipping unreadable image {}: {}", path.display(), e);
                acquired.skipped.push(path);
            }
        }
    }

    log::info!(
        "Acquired {} documents and {} images from {}",
        acquired.documents.len(),
        acquired.images.len(),
        root.display()
    );

    Ok(acquired)
}

fn read_text(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// Read every path, keeping input order
#[cfg(feature = "parallel")]
fn read_all<T, F>(paths: &[PathBuf], read: F) -> Vec<(PathBuf, std::io::Result<T>)>
where
    T: Send,
    F: Fn(&Path) -> std::io::Result<T> + Sync,
{
    paths
        .par_iter()
        .map(|path| (path.clone(), read(path)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn read_all<T, F>(paths: &[PathBuf], read: F) -> Vec<(PathBuf, std::io::Result<T>)>
where
    F: Fn(&Path) -> std::io::Result<T>,
{
    paths.iter().map(|path| (path.clone(), read(path))).collect()
}

/// Dotfiles and anything inside a dot-directory below the root
/// Dot-named entry below the root; the root itself may be hidden
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn relative_name(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A named node of a dropped entry tree
#[derive(Debug, Clone)]
pub enum Entry {
    File { name: String, content: FileContent },
    Directory { name: String, children: Vec<Entry> },
}

impl Entry {
    pub fn file(name: impl Into<String>, content: FileContent) -> Self {
        Entry::File {
            name: name.into(),
            content,
        }
    }

    pub fn dir(name: impl Into<String>, children: Vec<Entry>) -> Self {
        Entry::Directory {
            name: name.into(),
            children,
        }
    }
}

/// Flatten an entry tree to its leaf files
///
/// Leaves are emitted depth-first in child order, each named by its path
/// relative to `root` (the root's own name is not included). A file passed
/// as the root is returned under its own name.
pub fn flatten_entries(root: &Entry) -> Vec<AcquiredFile> {
    let mut files = Vec::new();
    let mut stack: Vec<(String, &Entry)> = match root {
        Entry::File { name, .. } => vec![(name.clone(), root)],
        Entry::Directory { children, .. } => children
            .iter()
            .rev()
            .map(|child| (entry_name(child).to_string(), child))
            .collect(),
    };

    while let Some((path, entry)) = stack.pop() {
        match entry {
            Entry::File { content, .. } => files.push(AcquiredFile {
                name: path,
                content: content.clone(),
            }),
            Entry::Directory { children, .. } => {
                for child in children.iter().rev() {
                    stack.push((format!("{}/{}", path, entry_name(child)), child));
                }
            }
        }
    }

    files
}

fn entry_name(entry: &Entry) -> &str {
    match entry {
        Entry::File { name, .. } | Entry::Directory { name, .. } => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FileContent {
        FileContent::Text(s.to_string())
    }

    #[test]
    fn test_flatten_nested_tree() {
        let tree = Entry::dir(
            "deck",
            vec![
                Entry::file("01_intro.md", text("# Intro")),
                Entry::dir(
                    "part2",
                    vec![
                        Entry::file("a.md", text("## A")),
                        Entry::dir("img", vec![Entry::file("x.png", FileContent::Binary(vec![1]))]),
                    ],
                ),
                Entry::file("99_end.md", text("# End")),
            ],
        );

        let names: Vec<String> = flatten_entries(&tree).into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["01_intro.md", "part2/a.md", "part2/img/x.png", "99_end.md"]
        );
    }

    #[test]
    fn test_flatten_single_file_root() {
        let files = flatten_entries(&Entry::file("solo.md", text("x")));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "solo.md");
        assert_eq!(files[0].content, text("x"));
    }

    #[test]
    fn test_flatten_empty_directories() {
        let tree = Entry::dir("root", vec![Entry::dir("empty", vec![])]);
        assert!(flatten_entries(&tree).is_empty());
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let root = Path::new("/deck");
        let path = Path::new("/deck").join("part").join("a.md");
        assert_eq!(relative_name(&path, root), "part/a.md");
    }

    #[test]
    fn test_hidden_entries_pruned_below_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".deck");
        std::fs::create_dir_all(root.join(".git/objects")).unwrap();
        std::fs::create_dir_all(root.join("part")).unwrap();
        std::fs::write(root.join(".git/objects/HEAD.md"), "# secret").unwrap();
        std::fs::write(root.join(".notes.md"), "# notes").unwrap();
        std::fs::write(root.join("part/slides.md"), "# shown").unwrap();

        let visited: Vec<String> = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry))
            .filter_map(Result::ok)
            .map(|entry| relative_name(entry.path(), &root))
            .collect();
        assert!(visited.contains(&"part/slides.md".to_string()));
        assert!(visited.iter().all(|name| !name.contains(".git") && name != ".notes.md"));

        let acquired = acquire_directory(&root, &AcquisitionOptions::default()).unwrap();
        let names: Vec<&str> = acquired.documents.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["part/slides.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_hidden_directory_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        std::fs::create_dir(&git).unwrap();
        std::fs::write(git.join("config"), "x").unwrap();
        std::fs::write(dir.path().join("a.md"), "# A").unwrap();
        std::fs::set_permissions(&git, std::fs::Permissions::from_mode(0o000)).unwrap();

        let result = acquire_directory(dir.path(), &AcquisitionOptions::default());
        std::fs::set_permissions(&git, std::fs::Permissions::from_mode(0o755)).unwrap();

        let acquired = result.unwrap();
        assert_eq!(acquired.documents.len(), 1);
        assert_eq!(acquired.documents[0].name, "a.md");
    }

    #[test]
    fn test_document_extension_matching() {
        let options = AcquisitionOptions::default();
        assert!(options.is_document(Path::new("a.md")));
        assert!(options.is_document(Path::new("a.MD")));
        assert!(options.is_document(Path::new("a.txt")));
        assert!(!options.is_document(Path::new("a.png")));
        assert!(!options.is_document(Path::new("README")));
    }
}
