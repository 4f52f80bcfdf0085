//! Source emission.
//!
//! Emitting a generated unit is the only externally visible side effect of a
//! run. A unit is either written completely or not at all: [`FsEmitter`]
//! writes through a temporary file that is removed on every failure path and
//! renamed into place once the full text is on disk. Each qualified name may
//! be emitted once per emitter; a second request for the same name fails.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::{GenError, Result};
use crate::synth::QualifiedName;

pub trait SourceEmitter {
    /// Persist `text` as the unit `name`.
    ///
    /// # Errors
    ///
    /// Returns `GenError::Emission` if the destination cannot be created or
    /// written, or if `name` was already emitted.
    fn emit(&mut self, name: &QualifiedName, text: &str) -> Result<()>;
}

impl<E: SourceEmitter + ?Sized> SourceEmitter for &mut E {
    fn emit(&mut self, name: &QualifiedName, text: &str) -> Result<()> {
        (**self).emit(name, text)
    }
}

/// Writes `<root>/<namespace segments>/<Name>.rs`.
#[derive(Debug)]
pub struct FsEmitter {
    root: PathBuf,
    emitted: BTreeSet<QualifiedName>,
}

impl FsEmitter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            emitted: BTreeSet::new(),
        }
    }

    pub fn path_for(&self, name: &QualifiedName) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(name.namespace.segments());
        path.push(format!("{}.rs", name.name));
        path
    }
}

impl SourceEmitter for FsEmitter {
    fn emit(&mut self, name: &QualifiedName, text: &str) -> Result<()> {
        if self.emitted.contains(name) {
            return Err(GenError::emission(name.to_string(), already_emitted(name)));
        }
        let path = self.path_for(name);
        write_unit(&path, text).map_err(|e| GenError::emission(name.to_string(), e))?;
        tracing::debug!(unit = %name, path = %path.display(), "wrote generated unit");
        self.emitted.insert(name.clone());
        Ok(())
    }
}

/// Temporary destination that disappears unless it was persisted.
struct PendingFile {
    path: PathBuf,
    persisted: bool,
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn write_unit(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut pending = PendingFile {
        path: path.with_extension("rs.tmp"),
        persisted: false,
    };
    {
        let mut file = fs::File::create(&pending.path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&pending.path, path)?;
    pending.persisted = true;
    Ok(())
}

fn already_emitted(name: &QualifiedName) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{name} was already emitted"),
    )
}

/// Keeps emitted units in memory, keyed and ordered by qualified name.
#[derive(Debug, Default, Clone)]
pub struct MemoryEmitter {
    units: BTreeMap<QualifiedName, String>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&str> {
        self.units.get(name).map(String::as_str)
    }

    pub fn names(&self) -> Vec<QualifiedName> {
        self.units.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn into_units(self) -> BTreeMap<QualifiedName, String> {
        self.units
    }
}

impl SourceEmitter for MemoryEmitter {
    fn emit(&mut self, name: &QualifiedName, text: &str) -> Result<()> {
        if self.units.contains_key(name) {
            return Err(GenError::emission(name.to_string(), already_emitted(name)));
        }
        self.units.insert(name.clone(), text.to_string());
        Ok(())
    }
}
