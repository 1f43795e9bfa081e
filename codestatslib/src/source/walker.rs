//! Tree walking with exclusion pruning and extension filtering.
//!
//! A path whose string form contains any exclusion substring is pruned along
//! with its whole subtree. Directories are descended into; every other entry
//! is a leaf and is kept only if its extension is in the valid set.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CodestatsError;
use crate::Result;

use super::config::ScanConfig;

/// The extension of `path` including its leading `.`, if it has one.
///
/// Dotfiles such as `.bashrc` and names like `Makefile` have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// Walk one root and return the files to count, sorted.
///
/// The root is made absolute first, so returned paths are absolute and
/// exclusion substrings are matched against absolute paths. Any traversal
/// error (permission denied, broken symlink, symlink loop) aborts the walk
/// and names the path that caused it.
pub fn walk(root: impl AsRef<Path>, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root.as_ref())?;

    if !root.exists() {
        return Err(CodestatsError::PathNotFound(root));
    }

    if let Some(pattern) = config.excluded_by(&root) {
        debug!(path = %root.display(), pattern, "root excluded");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(&root).follow_links(true).into_iter();

    for entry in walker.filter_entry(|e| match config.excluded_by(e.path()) {
        Some(pattern) => {
            debug!(path = %e.path().display(), pattern, "pruned");
            false
        }
        None => true,
    }) {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.clone());
            CodestatsError::Walk { path, source: err }
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        match extension_of(path) {
            Some(ext) if config.accepts_extension(&ext) => files.push(path.to_path_buf()),
            _ => {}
        }
    }

    // Sort for deterministic output
    files.sort();

    Ok(files)
}

/// Walk every root in the config and return the de-duplicated union.
pub fn walk_roots(config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut all_files = Vec::new();

    for root in &config.roots {
        all_files.extend(walk(root, config)?);
    }

    // Overlapping roots would otherwise count files twice
    all_files.sort();
    all_files.dedup();

    Ok(all_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn create_test_tree(dir: &Path) {
        write(&dir.join("app.py"), "print('hi')\n");
        write(&dir.join("lib/util.js"), "var x = 1;\n");
        write(&dir.join("lib/deep/nested/helper.py"), "pass\n");
        write(&dir.join("lib/notes.txt"), "not code\n");
        write(&dir.join("Makefile"), "all:\n");
        write(&dir.join(".bashrc"), "alias ll='ls -l'\n");
        write(&dir.join("node_modules/pkg/index.js"), "module.exports = {};\n");
        write(&dir.join(".git/hooks/pre-commit.sh"), "exit 0\n");
        write(&dir.join("src/__pycache__/mod.py"), "cached\n");
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b.py")), Some(".py".to_string()));
        assert_eq!(extension_of(Path::new("a/b.tar.gz")), Some(".gz".to_string()));
        assert_eq!(extension_of(Path::new("Makefile")), None);
        assert_eq!(extension_of(Path::new(".bashrc")), None);
    }

    #[test]
    fn test_walk_finds_valid_files_only() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        create_test_tree(&root);

        let files = walk(&root, &ScanConfig::new()).unwrap();
        let found = names(&files, &root);

        assert_eq!(
            found,
            vec!["app.py", "lib/deep/nested/helper.py", "lib/util.js"]
        );
    }

    #[test]
    fn test_walk_returns_absolute_paths() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("a.py"), "x = 1\n");

        let files = walk(temp.path(), &ScanConfig::new()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].is_absolute());
    }

    #[test]
    fn test_excluded_subdirectory_contributes_nothing() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        write(&root.join("keep/a.py"), "x = 1\n");
        write(&root.join("generated_code/b.py"), "y = 2\n");
        write(&root.join("generated_code/inner/c.py"), "z = 3\n");

        let config = ScanConfig::new().exclude("generated_code");
        let files = walk(&root, &config).unwrap();

        assert_eq!(names(&files, &root), vec!["keep/a.py"]);
    }

    #[test]
    fn test_exclusion_matches_file_names_too() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        write(&root.join("index.html"), "<html></html>\n");
        write(&root.join("resume_draft.html"), "<html></html>\n");

        let config = ScanConfig::new().exclude("resume_draft");
        let files = walk(&root, &config).unwrap();

        assert_eq!(names(&files, &root), vec!["index.html"]);
    }

    #[test]
    fn test_excluded_root_yields_nothing() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap().join("venv");
        write(&root.join("lib/site.py"), "import os\n");

        let files = walk(&root, &ScanConfig::new()).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_extension_filter_applies_to_nested_files() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        write(&root.join("a/b/c/d/readme.md"), "# title\n");
        write(&root.join("a/b/c/d/run.sh"), "echo hi\n");

        let config = ScanConfig::empty().extension(".sh");
        let files = walk(&root, &config).unwrap();

        assert_eq!(names(&files, &root), vec!["a/b/c/d/run.sh"]);
    }

    #[test]
    fn test_walk_single_file_root() {
        let temp = tempdir().unwrap();
        let file = temp.path().canonicalize().unwrap().join("solo.c");
        write(&file, "int main() { return 0; }\n");

        let files = walk(&file, &ScanConfig::new()).unwrap();

        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_walk_nonexistent_root() {
        let result = walk("/nonexistent/path", &ScanConfig::new());

        assert!(matches!(result, Err(CodestatsError::PathNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_fatal() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        write(&root.join("ok.py"), "x = 1\n");
        std::os::unix::fs::symlink(root.join("missing.py"), root.join("dangling.py")).unwrap();

        let result = walk(&root, &ScanConfig::new());

        match result {
            Err(CodestatsError::Walk { path, .. }) => assert!(path.ends_with("dangling.py")),
            other => panic!("Expected Walk error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        write(&root.join("ok.py"), "x = 1\n");
        write(&root.join("locked/inner.py"), "y = 2\n");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = walk(&root, &ScanConfig::new());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(CodestatsError::Walk { path, .. }) => assert_eq!(path, locked),
            other => panic!("Expected Walk error, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_roots_dedups_overlapping_roots() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        write(&root.join("a.py"), "x = 1\n");
        write(&root.join("sub/b.py"), "y = 2\n");

        let config = ScanConfig::new().root(&root).root(root.join("sub"));
        let files = walk_roots(&config).unwrap();

        assert_eq!(names(&files, &root), vec!["a.py", "sub/b.py"]);
    }

    #[test]
    fn test_walk_roots_propagates_missing_root() {
        let temp = tempdir().unwrap();
        let config = ScanConfig::new()
            .root(temp.path())
            .root(temp.path().join("does-not-exist"));

        assert!(walk_roots(&config).is_err());
    }
}
