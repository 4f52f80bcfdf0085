//! Signature validation of `#[unapply]` extractors.
//!
//! An extractor must be callable without an instance, take exactly one
//! parameter (the value to decompose, by value or by shared reference), be
//! visible outside its declaration, and return `Option<(..)>` whose tuple
//! width fits the widest generated pattern. Every violated rule is reported,
//! for every candidate: validation folds over all of them rather than
//! stopping at the first failure.

use std::fmt;

use syn::{Type, Visibility};

use crate::diagnostics::{Attribution, Diagnostic, DiagnosticSink};
use crate::model::{DeclarationModel, MethodModel, Origin};
use crate::runtime::MAX_ARITY;

/// A single violated rule of the extractor contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    InstanceBound,
    WrongArity { found: usize },
    MutableParameter,
    ReturnShape,
    ArityTooWide { width: usize, max: usize },
    NotAccessible,
    Async,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InstanceBound => "instance-bound",
            Self::WrongArity { .. } => "wrong arity",
            Self::MutableParameter => "mutable parameter",
            Self::ReturnShape => "return shape",
            Self::ArityTooWide { .. } => "arity too wide",
            Self::NotAccessible => "not accessible",
            Self::Async => "async",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstanceBound => write!(f, "instance-bound: extractor must not take a `self` receiver"),
            Self::WrongArity { found } => {
                write!(f, "wrong arity: expected exactly one parameter, found {found}")
            }
            Self::MutableParameter => write!(
                f,
                "mutable parameter: the decomposed value must be taken by value or by shared reference"
            ),
            Self::ReturnShape => write!(f, "return shape: return type must be `Option<(..)>`"),
            Self::ArityTooWide { width, max } => write!(
                f,
                "arity too wide: tuple width {width} exceeds the maximum pattern arity {max}"
            ),
            Self::NotAccessible => {
                write!(f, "not accessible: extractor must be visible outside its declaration")
            }
            Self::Async => write!(f, "async: extractor must not be `async`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignatureValidator {
    max_arity: usize,
}

impl Default for SignatureValidator {
    fn default() -> Self {
        Self::new(MAX_ARITY)
    }
}

impl SignatureValidator {
    pub fn new(max_arity: usize) -> Self {
        Self {
            max_arity: max_arity.min(MAX_ARITY),
        }
    }

    /// Every rule `method` violates. Empty means the extractor is valid.
    pub fn violations(&self, method: &MethodModel) -> Vec<Rule> {
        let mut rules = Vec::new();

        if method.has_receiver() {
            rules.push(Rule::InstanceBound);
        }

        let params: Vec<_> = method.params().collect();
        if params.len() != 1 {
            rules.push(Rule::WrongArity { found: params.len() });
        }
        if params
            .iter()
            .any(|param| matches!(param.ty.as_ref(), Type::Reference(r) if r.mutability.is_some()))
        {
            rules.push(Rule::MutableParameter);
        }

        match method.return_components() {
            None => rules.push(Rule::ReturnShape),
            Some(components) if components.len() > self.max_arity => rules.push(Rule::ArityTooWide {
                width: components.len(),
                max: self.max_arity,
            }),
            Some(_) => {}
        }

        if matches!(method.vis, Visibility::Inherited) {
            rules.push(Rule::NotAccessible);
        }
        if method.sig.asyncness.is_some() {
            rules.push(Rule::Async);
        }

        rules
    }

    /// Validate one extractor, reporting one ERROR per violated rule.
    pub fn is_valid(
        &self,
        declaration: &DeclarationModel,
        method: &MethodModel,
        sink: &dyn DiagnosticSink,
    ) -> bool {
        let violations = self.violations(method);
        for rule in &violations {
            let attribution = Attribution::function(
                declaration.display_name(),
                method.name(),
                Origin::new(&declaration.origin.file, method.line),
            );
            sink.report(Diagnostic::error(rule.to_string(), attribution).with_rule(rule.name()));
        }
        violations.is_empty()
    }

    /// Decide whether a declaration may be generated.
    ///
    /// A declaration without extractors gets one WARNING. Otherwise it is
    /// eligible only if every extractor is valid; one invalid extractor
    /// excludes the whole declaration.
    pub fn is_eligible(&self, declaration: &DeclarationModel, sink: &dyn DiagnosticSink) -> bool {
        let extractors: Vec<_> = declaration.extractors().collect();
        if extractors.is_empty() {
            sink.report(Diagnostic::warning(
                "No #[unapply] functions found.",
                Attribution::declaration(declaration.display_name(), declaration.origin.clone()),
            ));
            return false;
        }
        extractors
            .into_iter()
            .fold(true, |valid, method| self.is_valid(declaration, method, sink) && valid)
    }
}
