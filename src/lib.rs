//! Pattern factory generation from `#[unapply]` extractor functions.
//!
//! `patgen` scans a crate for impl blocks and inline modules marked
//! `#[patterns]`, checks the `#[unapply]` functions inside them and writes
//! one `<Name>Patterns` unit per eligible declaration. Each unit exposes a
//! factory per extractor that builds a structural [`runtime::Pattern`] from
//! sub-patterns.
//!
//! ```ignore
//! let config = patgen::PatgenConfig::default();
//! let driver = patgen::Driver::from_config(&config)?;
//! let report = driver.run(sources, &mut emitter, &sink)?;
//! ```

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod io;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod synth;
pub mod validate;

// Marker attributes for code that patgen reads
pub use patgen_macros::{patterns, unapply};

// Re-export commonly used types
pub use crate::config::{load_config, PatgenConfig};
pub use crate::diagnostics::{
    Attribution, CollectingSink, Diagnostic, DiagnosticSink, LogSink, Severity,
};
pub use crate::errors::{GenError, Result};
pub use crate::io::{FsEmitter, MemoryEmitter, SourceEmitter, SourceFile};
pub use crate::model::{DeclarationModel, MethodModel, Namespace, Origin};
pub use crate::pipeline::{Driver, DriverReport, Orchestrator, RoundReport};
pub use crate::registry::{DeclarationRegistry, MarkedDeclaration, SourceRegistry};
pub use crate::render::TokenRenderer;
pub use crate::synth::{derive_name, GenerationUnit, QualifiedName, Renderer};
pub use crate::validate::{Rule, SignatureValidator};
