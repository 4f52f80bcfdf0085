//! Loading and parsing of Rust source files.

use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use tracing::debug_span;

use crate::errors::{GenError, Result};
use crate::model::Namespace;

/// A parsed source file together with the module path it defines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub namespace: Namespace,
    pub ast: syn::File,
}

impl SourceFile {
    pub fn parse(path: impl Into<PathBuf>, namespace: Namespace, text: &str) -> Result<Self> {
        let path = path.into();
        let ast = syn::parse_file(text).map_err(|e| GenError::parse(&path, &e))?;
        Ok(Self {
            path,
            namespace,
            ast,
        })
    }

    /// Read and parse `path`, deriving its module path relative to `root`.
    pub fn load(root: &Path, path: &Path) -> Result<Self> {
        let _span = debug_span!("parse_file", path = %path.display()).entered();
        let text = read_source(path)?;
        Self::parse(path, module_path_for(root, path), &text)
    }
}

/// Module path a file defines under the crate source root.
///
/// `lib.rs` and `main.rs` at the root define the crate root, `a/mod.rs`
/// defines `a` and `a/b.rs` defines `a::b`.
pub fn module_path_for(root: &Path, path: &Path) -> Namespace {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let is_crate_root = segments.is_empty() && (stem == "lib" || stem == "main");
    if stem != "mod" && !is_crate_root {
        segments.push(stem);
    }
    Namespace::new(segments)
}

/// Load and parse `files`, keeping their order.
///
/// Files are read in parallel. Parsing stays on the calling thread because
/// `syn` trees hold `proc_macro2` spans, which are neither `Send` nor `Sync`.
pub fn load_sources(root: &Path, files: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let texts: Vec<(PathBuf, String)> = files
        .par_iter()
        .map(|path| read_source(path).map(|text| (path.clone(), text)))
        .collect::<Result<_>>()?;

    texts
        .into_iter()
        .map(|(path, text)| {
            let _span = debug_span!("parse_file", path = %path.display()).entered();
            SourceFile::parse(&path, module_path_for(root, &path), &text)
        })
        .collect()
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| GenError::FileSystem {
        message: format!("Failed to read source file: {e}"),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_for_crate_roots() {
        let root = Path::new("/p/src");
        assert!(module_path_for(root, Path::new("/p/src/lib.rs")).is_root());
        assert!(module_path_for(root, Path::new("/p/src/main.rs")).is_root());
    }

    #[test]
    fn test_module_path_for_nested_files() {
        let root = Path::new("/p/src");
        assert_eq!(module_path_for(root, Path::new("/p/src/a/mod.rs")).to_string(), "a");
        assert_eq!(module_path_for(root, Path::new("/p/src/a/b.rs")).to_string(), "a::b");
        assert_eq!(module_path_for(root, Path::new("/p/src/a/lib.rs")).to_string(), "a::lib");
    }

    #[test]
    fn test_parse_failure_reports_file() {
        let err = SourceFile::parse("src/bad.rs", Namespace::root(), "impl {").unwrap_err();
        match err {
            GenError::Parse { file, .. } => assert_eq!(file, PathBuf::from("src/bad.rs")),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_sources_keeps_order() {
        let root = tempfile::TempDir::new().unwrap();
        let a = root.path().join("a.rs");
        let b = root.path().join("b.rs");
        std::fs::write(&a, "struct A;").unwrap();
        std::fs::write(&b, "struct B;").unwrap();

        let sources = load_sources(root.path(), &[b.clone(), a.clone()]).unwrap();
        let paths: Vec<_> = sources.iter().map(|s| s.path.clone()).collect();
        assert_eq!(paths, vec![b, a]);
        assert_eq!(sources[0].namespace.to_string(), "b");
    }
}
