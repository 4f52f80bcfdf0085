//! One discovery round.
//!
//! A round first collects: every marked declaration is extracted, validated
//! and synthesized into a unit keyed by its qualified name. Declarations that
//! fail validation or collide on a name are dropped with ERROR diagnostics.
//! The round then emits the surviving units in name order and stops at the
//! first emission failure.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, info_span};

use crate::config::PatgenConfig;
use crate::diagnostics::{Attribution, Diagnostic, DiagnosticSink};
use crate::errors::Result;
use crate::io::SourceEmitter;
use crate::model::{DeclarationModel, Markers, ModelExtractor};
use crate::registry::MarkedDeclaration;
use crate::synth::{GenerationUnit, QualifiedName, Renderer, UnitSynthesizer};
use crate::validate::SignatureValidator;

/// Phase of a discovery round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Extracting, validating and synthesizing the round's declarations
    Collecting,
    /// Handing finished units to the emitter
    Emitting,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collecting => write!(f, "collecting"),
            Self::Emitting => write!(f, "emitting"),
        }
    }
}

/// Outcome of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub round: usize,
    /// Marked declarations seen in the round
    pub declarations: usize,
    /// Units handed to the emitter, in emission order
    pub emitted: Vec<QualifiedName>,
}

impl RoundReport {
    pub fn is_idle(&self) -> bool {
        self.declarations == 0
    }

    pub fn excluded(&self) -> usize {
        self.declarations - self.emitted.len()
    }
}

pub struct Orchestrator<R> {
    extractor: ModelExtractor,
    validator: SignatureValidator,
    synthesizer: UnitSynthesizer<R>,
}

impl<R: Renderer> Orchestrator<R> {
    pub fn new(extractor: ModelExtractor, validator: SignatureValidator, synthesizer: UnitSynthesizer<R>) -> Self {
        Self {
            extractor,
            validator,
            synthesizer,
        }
    }

    pub fn from_config(config: &PatgenConfig, renderer: R) -> Self {
        let markers = Markers {
            patterns: config.patterns_marker.clone(),
            unapply: config.unapply_marker.clone(),
        };
        Self::new(
            ModelExtractor::new(markers),
            SignatureValidator::new(config.max_arity),
            UnitSynthesizer::new(renderer, config.suffix.clone()),
        )
    }

    /// Collecting phase: build, validate and synthesize every declaration.
    ///
    /// Units are keyed by qualified name, so the result does not depend on
    /// the order declarations were discovered in. Declarations whose derived
    /// names collide are all excluded with an ERROR each.
    pub fn collect(
        &self,
        declarations: &[MarkedDeclaration],
        sink: &dyn DiagnosticSink,
    ) -> BTreeMap<QualifiedName, GenerationUnit> {
        let models: Vec<DeclarationModel> = declarations.iter().map(|d| self.extractor.extract(d)).collect();

        let mut by_name: BTreeMap<QualifiedName, Vec<&DeclarationModel>> = BTreeMap::new();
        for model in models.iter().filter(|m| self.validator.is_eligible(m, sink)) {
            by_name
                .entry(self.synthesizer.qualified_name(model))
                .or_default()
                .push(model);
        }

        by_name
            .into_iter()
            .filter_map(|(name, mut group)| {
                if group.len() == 1 {
                    let unit = self.synthesizer.synthesize(group[0]);
                    return Some((name, unit));
                }
                group.sort_by(|a, b| a.origin.cmp(&b.origin));
                report_collision(&name, &group, sink);
                None
            })
            .collect()
    }

    /// Emitting phase: hand units to `emitter` in name order.
    ///
    /// The first failure is returned immediately; no later unit is emitted.
    pub fn emit(
        &self,
        units: BTreeMap<QualifiedName, GenerationUnit>,
        emitter: &mut dyn SourceEmitter,
    ) -> Result<Vec<QualifiedName>> {
        let mut emitted = Vec::with_capacity(units.len());
        for (name, unit) in units {
            if let Err(e) = emitter.emit(&unit.name, &unit.text) {
                tracing::error!(unit = %name, error = %e, "emission failed, aborting round");
                return Err(e);
            }
            emitted.push(name);
        }
        Ok(emitted)
    }

    /// Run one round. An empty round does no work.
    pub fn run_round(
        &self,
        round: usize,
        declarations: &[MarkedDeclaration],
        sink: &dyn DiagnosticSink,
        emitter: &mut dyn SourceEmitter,
    ) -> Result<RoundReport> {
        let mut report = RoundReport {
            round,
            declarations: declarations.len(),
            emitted: Vec::new(),
        };
        if declarations.is_empty() {
            debug!(round, "no marked declarations, round is idle");
            return Ok(report);
        }

        let _span = info_span!("round", round).entered();

        let units = {
            let _phase = info_span!("phase", state = %RoundState::Collecting).entered();
            self.collect(declarations, sink)
        };
        debug!(
            declarations = declarations.len(),
            eligible = units.len(),
            "collected generation units"
        );

        report.emitted = {
            let _phase = info_span!("phase", state = %RoundState::Emitting).entered();
            self.emit(units, emitter)?
        };
        info!(
            emitted = report.emitted.len(),
            excluded = report.excluded(),
            "round complete"
        );
        Ok(report)
    }
}

fn report_collision(name: &QualifiedName, group: &[&DeclarationModel], sink: &dyn DiagnosticSink) {
    for (i, model) in group.iter().enumerate() {
        let others: Vec<String> = group
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| format!("`{}` at {}", other.display_name(), other.origin))
            .collect();
        sink.report(
            Diagnostic::error(
                format!(
                    "name collision: derived unit `{name}` is also produced by {}",
                    others.join(", ")
                ),
                Attribution::declaration(model.display_name(), model.origin.clone()),
            )
            .with_rule("name collision"),
        );
    }
}
