use crate::error::{AppError, Result};
use log;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const BRANCH_GLYPH: &str = "├── ";
pub const INDENT_UNIT: &str = "│   ";
pub const DEFAULT_IGNORE_PATTERNS: [&str; 4] = [".git", "__pycache__", ".idea", ".vscode"];

/// Substrings that exclude any entry whose path contains one of them.
///
/// `IgnorePatterns::default()` builds a fresh copy of the built-in list on
/// every call, so callers never share a mutable default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS)
    }
}

impl IgnorePatterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| {
                if p.is_empty() {
                    // An empty substring would match every path.
                    log::debug!("Dropping empty ignore pattern");
                    false
                } else {
                    true
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Matches against the path with `.` components removed, so entries under
    /// root `.` are seen as `a.txt`, not `./a.txt`.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let normalized: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        let path_str = normalized.to_string_lossy();
        self.patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub name: String,
    pub is_dir: bool,
}

impl TreeLine {
    fn write_with_indent(&self, f: &mut impl fmt::Write, indent: &str) -> fmt::Result {
        f.write_str(indent)?;
        for _ in 0..self.depth {
            f.write_str(INDENT_UNIT)?;
        }
        f.write_str(BRANCH_GLYPH)?;
        f.write_str(&self.name)?;
        f.write_char('\n')
    }
}

/// Ordered lines of a rendered directory tree, parents before children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeBlock {
    lines: Vec<TreeLine>,
}

impl TreeBlock {
    pub fn lines(&self) -> &[TreeLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeLine> {
        self.lines.iter()
    }

    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        for line in &self.lines {
            // Writing into a String cannot fail.
            let _ = line.write_with_indent(&mut out, indent);
        }
        out
    }
}

impl fmt::Display for TreeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            line.write_with_indent(f, "")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TreeBlock {
    type Item = &'a TreeLine;
    type IntoIter = std::slice::Iter<'a, TreeLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Walks `root` depth-first, siblings sorted by name, skipping ignored
/// entries together with everything beneath them.
///
/// Symbolic links are followed. A dangling link is listed as a plain entry;
/// any other traversal error, including a link loop, is returned as-is.
pub fn build_tree(root: &Path, ignore: &IgnorePatterns) -> Result<TreeBlock> {
    let metadata = fs::metadata(root).map_err(|e| AppError::FileRead {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "Tree root is not a directory: {}",
            root.display()
        )));
    }

    log::info!("Walking directory tree: {}", root.display());
    log::debug!("Ignore patterns: {:?}", ignore.patterns());

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if ignore.is_ignored(entry.path()) {
                log::trace!("Skipping ignored entry: {}", entry.path().display());
                false
            } else {
                true
            }
        });

    let mut lines = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(line) = dangling_link_line(&err, ignore) {
                    lines.push(line);
                    continue;
                }
                return Err(err.into());
            }
        };
        log::trace!("Tree entry: {}", entry.path().display());
        lines.push(TreeLine {
            depth: entry.depth() - 1,
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type().is_dir(),
        });
    }

    log::info!("Directory walk complete. {} entries listed.", lines.len());
    Ok(TreeBlock { lines })
}

fn dangling_link_line(err: &walkdir::Error, ignore: &IgnorePatterns) -> Option<TreeLine> {
    if err.loop_ancestor().is_some() {
        return None;
    }
    let path = err.path()?;
    let is_symlink = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    // A followed link whose target cannot be stat'ed.
    if !is_symlink || fs::metadata(path).is_ok() || err.depth() == 0 {
        return None;
    }
    if ignore.is_ignored(path) {
        log::trace!("Skipping ignored entry: {}", path.display());
        return None;
    }
    log::debug!("Dangling symbolic link: {}", path.display());
    Some(TreeLine {
        depth: err.depth() - 1,
        name: path.file_name()?.to_string_lossy().into_owned(),
        is_dir: false,
    })
}

/// Renders the tree under `root` as text, each line prefixed with `indent`.
pub fn generate_project_tree(root: &Path, indent: &str, ignore: &IgnorePatterns) -> Result<String> {
    Ok(build_tree(root, ignore)?.render(indent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir(root.join("b")).unwrap();
        fs::write(root.join("b").join("inner.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git").join("HEAD"), "ref: refs/heads/main").unwrap();
        dir
    }

    #[test]
    fn default_patterns_are_fresh_per_call() {
        let mut first = IgnorePatterns::default();
        first.patterns.push("target".to_string());
        let second = IgnorePatterns::default();
        assert_eq!(second.patterns(), &DEFAULT_IGNORE_PATTERNS.map(String::from));
    }

    #[test]
    fn matches_substring_anywhere_in_path() {
        let ignore = IgnorePatterns::default();
        assert!(ignore.is_ignored(Path::new("./.git")));
        assert!(ignore.is_ignored(Path::new("./src/__pycache__/mod.pyc")));
        assert!(ignore.is_ignored(Path::new("./.gitignore")));
        assert!(!ignore.is_ignored(Path::new("./src/main.rs")));
    }

    #[test]
    fn current_dir_prefix_is_not_matched() {
        let ignore = IgnorePatterns::new(["./", "/a"]);
        assert!(!ignore.is_ignored(Path::new("./a.txt")));
        assert!(!ignore.is_ignored(Path::new("./b")));
        assert!(ignore.is_ignored(Path::new("./b/a.txt")));
    }

    #[test]
    fn empty_patterns_are_dropped() {
        let ignore = IgnorePatterns::new(["", "target"]);
        assert_eq!(ignore.patterns(), &["target".to_string()]);
        assert!(!ignore.is_ignored(Path::new("./src")));
    }

    #[test]
    fn renders_scenario_tree() {
        let dir = fixture();
        let text = generate_project_tree(dir.path(), "", &IgnorePatterns::default()).unwrap();
        assert_eq!(text, "├── a.txt\n├── b\n│   ├── inner.rs\n");
    }

    #[test]
    fn ignored_directory_is_not_traversed() {
        let dir = fixture();
        let block = build_tree(dir.path(), &IgnorePatterns::default()).unwrap();
        assert!(block.iter().all(|line| line.name != ".git" && line.name != "HEAD"));
    }

    #[test]
    fn siblings_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta", "Gamma", "beta", "alpha"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let block = build_tree(dir.path(), &IgnorePatterns::default()).unwrap();
        let names: Vec<&str> = block.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn one_line_per_entry_at_each_level() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src").join("nested")).unwrap();
        fs::write(root.join("src").join("lib.rs"), "").unwrap();
        fs::write(root.join("src").join("nested").join("deep.rs"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();

        let block = build_tree(root, &IgnorePatterns::default()).unwrap();
        let depth_of = |d: usize| block.iter().filter(|l| l.depth == d).count();
        assert_eq!(depth_of(0), 2);
        assert_eq!(depth_of(1), 2);
        assert_eq!(depth_of(2), 1);

        let text = block.render("  ");
        assert_eq!(
            text,
            "  ├── README.md\n  ├── src\n  │   ├── lib.rs\n  │   ├── nested\n  │   │   ├── deep.rs\n"
        );
        for line in text.lines() {
            assert!(line.starts_with("  "));
            assert!(line.contains(BRANCH_GLYPH));
        }
    }

    #[test]
    fn custom_patterns_replace_defaults() {
        let dir = fixture();
        fs::create_dir(dir.path().join("target")).unwrap();
        let block = build_tree(dir.path(), &IgnorePatterns::new(["target"])).unwrap();
        let names: Vec<&str> = block.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&".git"));
        assert!(!names.contains(&"target"));
    }

    #[test]
    fn display_matches_unindented_render() {
        let dir = fixture();
        let block = build_tree(dir.path(), &IgnorePatterns::default()).unwrap();
        assert_eq!(block.to_string(), block.render(""));
        assert!(block.lines()[1].is_dir);
    }

    #[test]
    fn empty_directory_renders_nothing() {
        let dir = TempDir::new().unwrap();
        let block = build_tree(dir.path(), &IgnorePatterns::default()).unwrap();
        assert!(block.is_empty());
        assert_eq!(block.render(""), "");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = build_tree(&dir.path().join("nope"), &IgnorePatterns::default()).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
    }

    #[test]
    fn file_root_is_an_error() {
        let dir = fixture();
        let err = build_tree(&dir.path().join("a.txt"), &IgnorePatterns::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_descended() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real").join("f.txt"), "").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let block = build_tree(root, &IgnorePatterns::default()).unwrap();
        assert_eq!(block.render(""), "├── link\n│   ├── f.txt\n├── real\n│   ├── f.txt\n");
        assert!(block.lines()[0].is_dir);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_listed_as_plain_entry() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "").unwrap();
        std::os::unix::fs::symlink(root.join("gone"), root.join("broken")).unwrap();
        fs::write(root.join("c.txt"), "").unwrap();

        let block = build_tree(root, &IgnorePatterns::default()).unwrap();
        assert_eq!(block.render(""), "├── a.txt\n├── broken\n├── c.txt\n");
        assert!(!block.lines()[1].is_dir);

        let filtered = build_tree(root, &IgnorePatterns::new(["broken"])).unwrap();
        assert_eq!(filtered.render(""), "├── a.txt\n├── c.txt\n");
    }

    #[cfg(unix)]
    #[test]
    fn link_loop_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        std::os::unix::fs::symlink(root, root.join("sub").join("up")).unwrap();

        let err = build_tree(root, &IgnorePatterns::default()).unwrap_err();
        assert!(matches!(err, AppError::WalkDir(_)));
    }
}
