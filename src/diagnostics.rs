//! Diagnostic channel.
//!
//! Validation never fails the run. Problems are reported as (severity,
//! message, attribution) triples to a [`DiagnosticSink`]. Sinks take `&self`
//! and are `Sync`; concurrent reports are serialized.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::model::Origin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The declaration, and optionally the function, a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribution {
    /// Declaration path, e.g. `shapes::Circle`
    pub declaration: String,
    /// Offending function, if the diagnostic is about one
    pub function: Option<String>,
    pub origin: Origin,
}

impl Attribution {
    pub fn declaration(declaration: impl Into<String>, origin: Origin) -> Self {
        Self {
            declaration: declaration.into(),
            function: None,
            origin,
        }
    }

    pub fn function(declaration: impl Into<String>, function: impl Into<String>, origin: Origin) -> Self {
        Self {
            declaration: declaration.into(),
            function: Some(function.into()),
            origin,
        }
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(function) => write!(f, "{}::{}", self.declaration, function),
            None => write!(f, "{}", self.declaration),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub attribution: Attribution,
    /// Short name of the violated rule, when there is one
    pub rule: Option<&'static str>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, attribution: Attribution) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            attribution,
            rule: None,
        }
    }

    pub fn error(message: impl Into<String>, attribution: Attribution) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            attribution,
            rule: None,
        }
    }

    pub fn with_rule(mut self, rule: &'static str) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}: {}",
            self.attribution.origin, self.severity, self.attribution, self.message
        )
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Keeps every diagnostic in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Diagnostics in a stable order, independent of arrival order.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics();
        diagnostics.sort_by(|a, b| {
            (&a.attribution, a.severity, &a.message).cmp(&(&b.attribution, b.severity, &b.message))
        });
        diagnostics
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.diagnostics().into_iter().filter(Diagnostic::is_error).collect()
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.diagnostics().into_iter().filter(|d| !d.is_error()).collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade and counts them.
#[derive(Debug, Default)]
pub struct LogSink {
    warnings: AtomicUsize,
    errors: AtomicUsize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                self.warnings.fetch_add(1, Ordering::Relaxed);
                log::warn!("{diagnostic}");
            }
            Severity::Error => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                log::error!("{diagnostic}");
            }
        }
    }
}
