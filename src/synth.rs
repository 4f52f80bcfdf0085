//! Derived unit naming and synthesis.
//!
//! Name and text of a [`GenerationUnit`] depend on nothing but the
//! declaration model it was made from, so units can be synthesized in any
//! order and still come out byte-identical.

use std::fmt;

use crate::model::{DeclarationModel, Namespace, PATH_SEPARATOR};

/// Simple name used by anonymous/default declarations. Yields the bare suffix.
pub const PLACEHOLDER_NAME: &str = "$";

/// Fully qualified name of a generated unit.
///
/// Ordered by namespace, then name, which is the order units are emitted in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub namespace: Namespace,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// `a.b.FooPatterns` form.
    pub fn dotted(&self) -> String {
        self.joined(".")
    }

    fn joined(&self, separator: &str) -> String {
        if self.namespace.is_root() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.namespace.join(separator), separator, self.name)
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined(PATH_SEPARATOR))
    }
}

/// One generated source unit, ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationUnit {
    pub name: QualifiedName,
    pub text: String,
}

/// Turns a derived name and a validated model into source text.
///
/// Rounds run on one thread, so renderers may hold `syn` values.
pub trait Renderer {
    fn render(&self, derived_name: &str, model: &DeclarationModel) -> String;
}

/// Strip embedded separators from `simple_name` and append `suffix`.
///
/// `Foo` gives `FooPatterns`, `outer::Foo` gives `outerFooPatterns`, and the
/// placeholder `$` gives the suffix alone.
pub fn derive_name(simple_name: &str, suffix: &str) -> String {
    let base: String = simple_name.chars().filter(|c| *c != ':' && *c != '.').collect();
    if base == PLACEHOLDER_NAME {
        suffix.to_string()
    } else {
        format!("{base}{suffix}")
    }
}

pub fn qualified_name(model: &DeclarationModel, suffix: &str) -> QualifiedName {
    QualifiedName::new(model.namespace.clone(), derive_name(&model.name, suffix))
}

pub struct UnitSynthesizer<R> {
    renderer: R,
    suffix: String,
}

impl<R: Renderer> UnitSynthesizer<R> {
    pub fn new(renderer: R, suffix: impl Into<String>) -> Self {
        Self {
            renderer,
            suffix: suffix.into(),
        }
    }

    pub fn qualified_name(&self, model: &DeclarationModel) -> QualifiedName {
        qualified_name(model, &self.suffix)
    }

    pub fn synthesize(&self, model: &DeclarationModel) -> GenerationUnit {
        let name = self.qualified_name(model);
        let text = self.renderer.render(&name.name, model);
        GenerationUnit { name, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_appends_suffix() {
        assert_eq!(derive_name("Foo", "Patterns"), "FooPatterns");
    }

    #[test]
    fn test_derive_name_placeholder_is_suffix_alone() {
        assert_eq!(derive_name("$", "Patterns"), "Patterns");
    }

    #[test]
    fn test_derive_name_strips_separators() {
        assert_eq!(derive_name("outer::Inner", "Patterns"), "outerInnerPatterns");
        assert_eq!(derive_name("Outer.Inner", "Patterns"), "OuterInnerPatterns");
        assert_eq!(derive_name("::$", "Patterns"), "Patterns");
    }

    #[test]
    fn test_qualified_name_forms() {
        let name = QualifiedName::new(Namespace::parse("a.b"), derive_name("Foo", "Patterns"));
        assert_eq!(name.to_string(), "a::b::FooPatterns");
        assert_eq!(name.dotted(), "a.b.FooPatterns");

        let root = QualifiedName::new(Namespace::root(), "FooPatterns");
        assert_eq!(root.to_string(), "FooPatterns");
        assert_eq!(root.dotted(), "FooPatterns");
    }

    #[test]
    fn test_qualified_names_order_by_namespace_first() {
        let mut names = vec![
            QualifiedName::new(Namespace::parse("b"), "APatterns"),
            QualifiedName::new(Namespace::root(), "ZPatterns"),
            QualifiedName::new(Namespace::parse("a"), "ZPatterns"),
        ];
        names.sort();
        let rendered: Vec<_> = names.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["ZPatterns", "a::ZPatterns", "b::APatterns"]);
    }
}
