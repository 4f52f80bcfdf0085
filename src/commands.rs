//! Command implementations behind the `patgen` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::GenerateOptions;
use crate::config::{self, PatgenConfig};
use crate::diagnostics::LogSink;
use crate::io::{find_source_files, load_sources, FsEmitter, MemoryEmitter, SourceEmitter};
use crate::pipeline::Driver;
use crate::synth::QualifiedName;

/// What a command run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Units emitted, in emission order
    pub emitted: Vec<QualifiedName>,
    pub warnings: usize,
    pub errors: usize,
}

impl CommandOutcome {
    /// Any ERROR diagnostic makes the run unsuccessful.
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

/// Resolve the effective configuration: explicit file or nearest
/// `patgen.toml` above `src`, then command-line overrides.
pub fn resolve_config(src: &Path, options: &GenerateOptions) -> Result<PatgenConfig> {
    let mut config = match &options.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_config(src)?,
    };

    if let Some(suffix) = &options.suffix {
        config.suffix = suffix.clone();
    }
    if let Some(runtime_path) = &options.runtime_path {
        config.runtime_path = runtime_path.clone();
    }
    config.exclude.extend(options.exclude.iter().cloned());

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// `patgen generate`: write every derived unit under `out`.
pub fn run_generate(src: &Path, out: &Path, options: &GenerateOptions) -> Result<CommandOutcome> {
    let config = resolve_config(src, options)?;
    let mut emitter = FsEmitter::new(out);
    let outcome = run_with(src, &config, &mut emitter)?;
    log::info!(
        "Generated {} unit(s) into {}",
        outcome.emitted.len(),
        out.display()
    );
    Ok(outcome)
}

/// `patgen check`: run discovery, validation and synthesis in memory.
pub fn run_check(src: &Path, options: &GenerateOptions) -> Result<CommandOutcome> {
    let config = resolve_config(src, options)?;
    let mut emitter = MemoryEmitter::new();
    run_with(src, &config, &mut emitter)
}

/// Drive a full generation run over the crate rooted at `src`.
pub fn run_with(src: &Path, config: &PatgenConfig, emitter: &mut dyn SourceEmitter) -> Result<CommandOutcome> {
    let files = find_source_files(src, &config.exclude)
        .with_context(|| format!("Failed to scan {}", src.display()))?;
    log::debug!("Found {} source file(s) under {}", files.len(), src.display());

    let sources = load_sources(src, &files)?;
    let driver = Driver::from_config(config)?;
    let sink = LogSink::new();
    let report = driver.run(sources, emitter, &sink)?;

    Ok(CommandOutcome {
        emitted: report.emitted().cloned().collect(),
        warnings: sink.warning_count(),
        errors: sink.error_count(),
    })
}

/// Path a unit would be written to by `generate`, for display.
pub fn unit_path(out: &Path, name: &QualifiedName) -> PathBuf {
    FsEmitter::new(out).path_for(name)
}
