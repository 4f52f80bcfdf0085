//! Generator configuration.
//!
//! Settings come from `patgen.toml` (see [`loader`]) and can be overridden on
//! the command line. Every field is optional in the file.

use serde::{Deserialize, Serialize};

use crate::errors::{GenError, Result};
use crate::runtime::MAX_ARITY;

pub mod loader;

pub use loader::{load_config, load_config_from, parse_and_validate_config};

/// Name of the configuration file searched for in the directory hierarchy.
pub const CONFIG_FILE_NAME: &str = "patgen.toml";

/// Root configuration structure for patgen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatgenConfig {
    /// Suffix appended to a declaration name to form the derived unit name
    pub suffix: String,

    /// Attribute marking a declaration to scan (`#[patterns]`)
    pub patterns_marker: String,

    /// Attribute marking an extractor candidate (`#[unapply]`)
    pub unapply_marker: String,

    /// Widest tuple an extractor may return
    pub max_arity: usize,

    /// Upper bound on discovery rounds before the driver gives up
    pub max_rounds: usize,

    /// Path under which generated code reaches the pattern runtime
    pub runtime_path: String,

    /// Glob patterns for source files to skip
    pub exclude: Vec<String>,
}

impl Default for PatgenConfig {
    fn default() -> Self {
        Self {
            suffix: "Patterns".to_string(),
            patterns_marker: "patterns".to_string(),
            unapply_marker: "unapply".to_string(),
            max_arity: MAX_ARITY,
            max_rounds: 16,
            runtime_path: "::patgen::runtime".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl PatgenConfig {
    /// Check that the configuration can drive a generation run.
    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            return Err(GenError::Configuration("suffix must not be empty".into()));
        }
        if !is_identifier(&self.suffix) {
            return Err(GenError::Configuration(format!(
                "suffix '{}' is not a valid identifier",
                self.suffix
            )));
        }
        for (field, marker) in [
            ("patterns_marker", &self.patterns_marker),
            ("unapply_marker", &self.unapply_marker),
        ] {
            if !is_identifier(marker) {
                return Err(GenError::Configuration(format!(
                    "{field} '{marker}' is not a valid attribute name"
                )));
            }
        }
        if self.patterns_marker == self.unapply_marker {
            return Err(GenError::Configuration(
                "patterns_marker and unapply_marker must differ".into(),
            ));
        }
        if self.max_arity > MAX_ARITY {
            return Err(GenError::Configuration(format!(
                "max_arity {} exceeds the runtime limit of {}",
                self.max_arity, MAX_ARITY
            )));
        }
        if self.max_rounds == 0 {
            return Err(GenError::Configuration("max_rounds must be at least 1".into()));
        }
        if syn::parse_str::<syn::Path>(&self.runtime_path).is_err() {
            return Err(GenError::Configuration(format!(
                "runtime_path '{}' is not a valid path",
                self.runtime_path
            )));
        }
        for pattern in &self.exclude {
            glob::Pattern::new(pattern)?;
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    syn::parse_str::<syn::Ident>(s).is_ok()
}
