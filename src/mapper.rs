//! Per-file fan-out over pattern-matched source files.
//!
//! The mapper enumerates files under a root whose relative path matches a
//! selection pattern, then hands each file's contents to an independent
//! handler. Handlers run in parallel and share nothing; the first failure
//! fails the whole mapping. Outputs already written by other in-flight
//! handlers are left as-is.

use crate::pattern::Pattern;
use anyhow::{Context as _, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Enumerate files under `root` matching `pattern`, as sorted root-relative
/// paths.
pub fn collect_matches(root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>> {
    let mut matches: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .filter(|rel| pattern.matches(rel))
        .collect();

    matches.sort();
    Ok(matches)
}

/// Invoke `handler(contents, relative_path)` once per file matching
/// `pattern` under `root`, in parallel, collecting every result.
pub fn map_files<T, F>(root: &Path, pattern: &Pattern, handler: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&str, &Path) -> Result<T> + Sync,
{
    let matches = collect_matches(root, pattern)?;

    matches
        .par_iter()
        .map(|rel| {
            let path = root.join(rel);
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            handler(&contents, rel)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::fs;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_handler_runs_exactly_once_per_match() {
        let dir = tempfile::tempdir().unwrap();
        // 3 matching, 2 non-matching
        write(dir.path(), "a.md", "A");
        write(dir.path(), "b.md", "B");
        write(dir.path(), "c.md", "C");
        write(dir.path(), "notes.txt", "skip");
        write(dir.path(), "sub/d.md", "skip");

        let calls = AtomicUsize::new(0);
        let seen = Mutex::new(Vec::new());
        let pattern = Pattern::compile("*.md").unwrap();

        map_files(dir.path(), &pattern, |contents, rel| {
            calls.fetch_add(1, Ordering::Relaxed);
            seen.lock()
                .unwrap()
                .push((rel.to_path_buf(), contents.to_string()));
            Ok(())
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 3);

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                (PathBuf::from("a.md"), "A".to_string()),
                (PathBuf::from("b.md"), "B".to_string()),
                (PathBuf::from("c.md"), "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_recursive_pattern_reaches_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pages/index.md", "top");
        write(dir.path(), "pages/docs/guide.md", "nested");

        let pattern = Pattern::compile("pages/**/*.md").unwrap();
        let matches = collect_matches(dir.path(), &pattern).unwrap();

        assert_eq!(
            matches,
            vec![
                PathBuf::from("pages/docs/guide.md"),
                PathBuf::from("pages/index.md"),
            ]
        );
    }

    #[test]
    fn test_results_follow_sorted_match_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.md", "2");
        write(dir.path(), "a.md", "1");
        write(dir.path(), "c.md", "3");

        let pattern = Pattern::compile("*.md").unwrap();
        let results =
            map_files(dir.path(), &pattern, |contents, _| Ok(contents.to_string())).unwrap();

        assert_eq!(results, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_handler_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "A");
        write(dir.path(), "bad.md", "B");

        let pattern = Pattern::compile("*.md").unwrap();
        let result = map_files(dir.path(), &pattern, |_, rel| {
            if rel == Path::new("bad.md") {
                bail!("bad file");
            }
            Ok(())
        });

        assert_eq!(result.unwrap_err().root_cause().to_string(), "bad file");
    }

    #[test]
    fn test_no_matches_yields_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "text");

        let pattern = Pattern::compile("*.md").unwrap();
        let results = map_files(dir.path(), &pattern, |_, _| Ok(())).unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn test_junk_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".DS_Store", "junk");
        write(dir.path(), "real.md", "ok");

        let pattern = Pattern::compile("*").unwrap();
        let matches = collect_matches(dir.path(), &pattern).unwrap();

        assert_eq!(matches, vec![PathBuf::from("real.md")]);
    }
}
