//! Multi-round driver.
//!
//! Generated units are themselves Rust source and may carry marked
//! declarations. The driver feeds every emitted unit back into discovery and
//! keeps running rounds until one turns up nothing new. Each declaration is
//! processed in exactly one round, the round in which it is first observed.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, info, info_span};

use crate::config::PatgenConfig;
use crate::diagnostics::DiagnosticSink;
use crate::errors::{GenError, Result};
use crate::io::{SourceEmitter, SourceFile};
use crate::model::Markers;
use crate::registry::{DeclarationRegistry, MarkedDeclaration, SourceRegistry};
use crate::render::TokenRenderer;
use crate::synth::{QualifiedName, Renderer};

use super::orchestrator::{Orchestrator, RoundReport};

/// Pseudo directory reported as the origin of fed-back generated units.
const GENERATED_ORIGIN: &str = "<generated>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub rounds: Vec<RoundReport>,
}

impl DriverReport {
    pub fn emitted(&self) -> impl Iterator<Item = &QualifiedName> {
        self.rounds.iter().flat_map(|r| r.emitted.iter())
    }

    pub fn emitted_count(&self) -> usize {
        self.rounds.iter().map(|r| r.emitted.len()).sum()
    }

    pub fn declaration_count(&self) -> usize {
        self.rounds.iter().map(|r| r.declarations).sum()
    }
}

pub struct Driver<R, G = SourceRegistry> {
    orchestrator: Orchestrator<R>,
    registry: G,
    max_rounds: usize,
    marker: String,
}

impl Driver<TokenRenderer> {
    /// Driver wired with the source registry and token renderer described by `config`.
    pub fn from_config(config: &PatgenConfig) -> Result<Self> {
        let renderer = TokenRenderer::new(&config.runtime_path)?;
        let registry = SourceRegistry::new(Markers {
            patterns: config.patterns_marker.clone(),
            unapply: config.unapply_marker.clone(),
        });
        Ok(Self::new(
            Orchestrator::from_config(config, renderer),
            registry,
            config.max_rounds,
        )
        .with_marker(&config.patterns_marker))
    }
}

impl<R: Renderer, G: DeclarationRegistry> Driver<R, G> {
    pub fn new(orchestrator: Orchestrator<R>, registry: G, max_rounds: usize) -> Self {
        Self {
            orchestrator,
            registry,
            max_rounds: max_rounds.max(1),
            marker: "patterns".to_string(),
        }
    }

    fn with_marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    /// Run rounds over `sources` until no new marked declaration appears.
    ///
    /// # Errors
    ///
    /// Fails with the first emission error, with a parse error if a generated
    /// unit is not valid Rust, or with `GenError::RoundLimit` when generated
    /// code keeps producing new declarations past `max_rounds`.
    pub fn run(
        &self,
        sources: Vec<SourceFile>,
        emitter: &mut dyn SourceEmitter,
        sink: &dyn DiagnosticSink,
    ) -> Result<DriverReport> {
        let _span = info_span!("generate", files = sources.len()).entered();
        let mut report = DriverReport::default();
        let mut seen = BTreeSet::new();
        let mut pending = sources;

        for round in 1.. {
            let discovered: Vec<MarkedDeclaration> = pending
                .iter()
                .flat_map(|source| self.registry.discover(source, sink))
                .collect();
            let fresh = take_unseen(discovered, &mut seen);
            if fresh.is_empty() {
                debug!(round, "no new declarations, stopping");
                break;
            }
            if round > self.max_rounds {
                return Err(GenError::RoundLimit {
                    rounds: self.max_rounds,
                    marker: self.marker.clone(),
                });
            }

            let mut recorder = RecordingEmitter::new(&mut *emitter);
            let round_report = self.orchestrator.run_round(round, &fresh, sink, &mut recorder)?;
            pending = recorder.into_sources()?;
            report.rounds.push(round_report);
        }

        info!(
            rounds = report.rounds.len(),
            emitted = report.emitted_count(),
            "generation finished"
        );
        Ok(report)
    }
}

/// Keep declarations not observed before, in discovery order.
///
/// A declaration is identified by its qualified name and where it was
/// written, so two impls of the same type in different places stay distinct.
fn take_unseen(discovered: Vec<MarkedDeclaration>, seen: &mut BTreeSet<String>) -> Vec<MarkedDeclaration> {
    discovered
        .into_iter()
        .filter(|decl| seen.insert(format!("{}@{}", decl.key(), decl.origin)))
        .collect()
}

/// Forwards to the real emitter and keeps a copy of each unit for the next round.
struct RecordingEmitter<'a> {
    inner: &'a mut dyn SourceEmitter,
    recorded: Vec<(QualifiedName, String)>,
}

impl<'a> RecordingEmitter<'a> {
    fn new(inner: &'a mut dyn SourceEmitter) -> Self {
        Self {
            inner,
            recorded: Vec::new(),
        }
    }

    fn into_sources(self) -> Result<Vec<SourceFile>> {
        self.recorded
            .into_iter()
            .map(|(name, text)| {
                let mut path = PathBuf::from(GENERATED_ORIGIN);
                path.extend(name.namespace.segments());
                path.push(format!("{}.rs", name.name));
                SourceFile::parse(path, name.namespace, &text)
            })
            .collect()
    }
}

impl SourceEmitter for RecordingEmitter<'_> {
    fn emit(&mut self, name: &QualifiedName, text: &str) -> Result<()> {
        self.inner.emit(name, text)?;
        self.recorded.push((name.clone(), text.to_string()));
        Ok(())
    }
}
