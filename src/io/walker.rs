use crate::errors::{GenError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects the Rust sources under a root directory.
pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    /// All `.rs` files under the root, sorted so that rounds see them in a
    /// stable order.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(GenError::file_system("Source root is not a directory", &self.root));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| GenError::FileSystem {
                message: format!("Failed to walk source tree: {e}"),
                path: e.path().map(Path::to_path_buf),
                source: e.into_io_error(),
            })?;
            let path = entry.path();

            if entry.file_type().is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if path.extension().is_none_or(|ext| ext != "rs") {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !self
            .ignore_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    }
}

pub fn find_source_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    FileWalker::new(root.to_path_buf())
        .with_ignore_patterns(exclude)?
        .walk()
}
