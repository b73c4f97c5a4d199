//! File sets: path selectors paired with the rulers that check them.

use crate::critic::CriticError;
use crate::ruler::{RulerBox, RulerSpec};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of files picked up by recursive selectors.
pub const SOURCE_EXTENSION: &str = "rb";

/// A labelled group of files checked with one set of rulers.
#[derive(Debug)]
pub struct FileSet {
    label: String,
    paths: Vec<String>,
    recursive: bool,
    rulers: Vec<RulerSpec>,
}

impl FileSet {
    /// Creates a file set.
    ///
    /// Non-recursive selectors are glob patterns; recursive ones name
    /// files or directories that are walked for `*.rb` files.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        paths: Vec<String>,
        recursive: bool,
        rulers: Vec<RulerSpec>,
    ) -> Self {
        Self {
            label: label.into(),
            paths,
            recursive,
            rulers,
        }
    }

    /// Label reported with this set's problems.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Configured path selectors.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Active ruler recipes, in configuration order.
    #[must_use]
    pub fn rulers(&self) -> &[RulerSpec] {
        &self.rulers
    }

    /// Builds a fresh instance of every active ruler.
    #[must_use]
    pub fn build_rulers(&self) -> Vec<RulerBox> {
        self.rulers.iter().map(RulerSpec::build).collect()
    }

    /// Expands the selectors against `root` into a sorted, de-duplicated
    /// list of files.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid glob pattern or a failed walk.
    pub fn files(&self, root: &Path) -> Result<Vec<PathBuf>, CriticError> {
        let mut files = Vec::new();

        for selector in &self.paths {
            let base = root.join(selector);
            if self.recursive {
                walk_sources(&base, &mut files)?;
            } else {
                let pattern = base.to_string_lossy();
                for entry in glob::glob(&pattern)? {
                    let path = entry.map_err(|e| CriticError::Io(e.into_error()))?;
                    if path.is_file() {
                        files.push(path);
                    }
                }
            }
        }

        files.sort();
        files.dedup();
        debug!("File set {:?} selected {} files", self.label, files.len());
        Ok(files)
    }
}

fn walk_sources(base: &Path, files: &mut Vec<PathBuf>) -> Result<(), CriticError> {
    if base.is_file() {
        files.push(base.to_path_buf());
        return Ok(());
    }

    for entry in ignore::WalkBuilder::new(base).build() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        let lib = dir.path().join("lib/nested");
        fs::create_dir_all(&lib).expect("mkdir");
        fs::write(dir.path().join("lib/a.rb"), "a = 1\n").expect("write");
        fs::write(lib.join("b.rb"), "b = 2\n").expect("write");
        fs::write(lib.join("notes.txt"), "text\n").expect("write");
        dir
    }

    #[test]
    fn test_glob_selectors() {
        let dir = tree();
        let set = FileSet::new("default", vec!["lib/*.rb".to_string()], false, Vec::new());
        let files = set.files(dir.path()).expect("files");
        assert_eq!(files, vec![dir.path().join("lib/a.rb")]);
    }

    #[test]
    fn test_recursive_selectors_keep_sources_only() {
        let dir = tree();
        let set = FileSet::new("default", vec!["lib".to_string()], true, Vec::new());
        let files = set.files(dir.path()).expect("files");
        assert_eq!(
            files,
            vec![dir.path().join("lib/a.rb"), dir.path().join("lib/nested/b.rb")]
        );
    }

    #[test]
    fn test_overlapping_selectors_are_deduplicated() {
        let dir = tree();
        let set = FileSet::new(
            "default",
            vec!["lib/**/*.rb".to_string(), "lib/a.rb".to_string()],
            false,
            Vec::new(),
        );
        assert_eq!(set.files(dir.path()).expect("files").len(), 2);
    }

    #[test]
    fn test_invalid_glob() {
        let set = FileSet::new("default", vec!["lib/[".to_string()], false, Vec::new());
        assert!(matches!(set.files(Path::new(".")), Err(CriticError::Glob(_))));
    }
}
