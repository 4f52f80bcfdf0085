//! Structural model of `#[patterns]` declarations.
//!
//! A [`DeclarationModel`] is built once per discovery round from a marked
//! `impl` block or inline `mod` (see [`extract`]) and is never mutated
//! afterwards. Its [`MethodModel`]s keep the original `syn` signature so that
//! validation and rendering can inspect parameter and return types.

use std::fmt;
use std::path::{Path, PathBuf};

use syn::{Attribute, FnArg, GenericArgument, PathArguments, ReturnType, Signature, Type, Visibility};

pub mod extract;

pub use extract::ModelExtractor;

/// Separator used between namespace segments in generated names.
pub const PATH_SEPARATOR: &str = "::";

/// Attribute names that drive discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Class-level marker (`#[patterns]`)
    pub patterns: String,
    /// Function-level marker (`#[unapply]`)
    pub unapply: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            patterns: "patterns".to_string(),
            unapply: "unapply".to_string(),
        }
    }
}

impl Markers {
    /// Find the class-level marker among `attrs`.
    pub fn patterns_attr<'a>(&self, attrs: &'a [Attribute]) -> Option<&'a Attribute> {
        find_marker(attrs, &self.patterns)
    }

    pub fn has_unapply(&self, attrs: &[Attribute]) -> bool {
        find_marker(attrs, &self.unapply).is_some()
    }
}

/// Attributes match on their last path segment so `#[patgen::unapply]` works.
fn find_marker<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name)
    })
}

/// Crate-relative module path of a declaration.
///
/// Segments are plain identifiers; an empty namespace is the crate root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace(Vec<String>);

impl Namespace {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a namespace from segments. Empty segments are dropped and any
    /// embedded separator splits a segment in two.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            segments
                .into_iter()
                .flat_map(|s| {
                    s.as_ref()
                        .split([':', '.'])
                        .filter(|part| !part.is_empty())
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect(),
        )
    }

    /// Parse `a::b` or `a.b`.
    pub fn parse(path: &str) -> Self {
        Self::new([path])
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self::new(segments)
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join(PATH_SEPARATOR))
    }
}

/// Where a declaration or function was written. Used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Origin {
    pub file: PathBuf,
    pub line: usize,
}

impl Origin {
    pub fn new(file: impl AsRef<Path>, line: usize) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            line,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// What kind of item carried the class-level marker.
#[derive(Debug, Clone)]
pub enum DeclarationKind {
    /// Inherent `impl` block; extractors are associated functions
    Impl {
        self_ty: Box<Type>,
        generics: syn::Generics,
    },
    /// Inline module; extractors are free functions reached as `module::f`
    Module { ident: syn::Ident },
}

/// One marked declaration.
#[derive(Debug, Clone)]
pub struct DeclarationModel {
    pub namespace: Namespace,
    pub name: String,
    pub kind: DeclarationKind,
    pub methods: Vec<MethodModel>,
    pub origin: Origin,
}

impl DeclarationModel {
    pub fn has_default_namespace(&self) -> bool {
        self.namespace.is_root()
    }

    /// Functions carrying the extractor marker, in declaration order.
    pub fn extractors(&self) -> impl Iterator<Item = &MethodModel> {
        self.methods.iter().filter(|m| m.is_extractor())
    }

    /// Declaration path used in diagnostics, e.g. `shapes::Circle`.
    pub fn display_name(&self) -> String {
        if self.namespace.is_root() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.namespace, PATH_SEPARATOR, self.name)
        }
    }
}

/// One function inside a marked declaration.
#[derive(Debug, Clone)]
pub struct MethodModel {
    pub sig: Signature,
    pub vis: Visibility,
    pub attrs: Vec<Attribute>,
    pub line: usize,
    extractor: bool,
}

impl MethodModel {
    pub fn new(sig: Signature, vis: Visibility, attrs: Vec<Attribute>, line: usize, markers: &Markers) -> Self {
        let extractor = markers.has_unapply(&attrs);
        Self {
            sig,
            vis,
            attrs,
            line,
            extractor,
        }
    }

    pub fn name(&self) -> String {
        self.sig.ident.to_string()
    }

    pub fn is_extractor(&self) -> bool {
        self.extractor
    }

    pub fn has_receiver(&self) -> bool {
        self.sig.receiver().is_some()
    }

    /// Typed parameters, excluding any `self` receiver.
    pub fn params(&self) -> impl Iterator<Item = &syn::PatType> {
        self.sig.inputs.iter().filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
    }

    /// Component types of an `Option<(..)>` return, or `None` if the return
    /// type has another shape.
    pub fn return_components(&self) -> Option<Vec<&Type>> {
        let ReturnType::Type(_, ty) = &self.sig.output else {
            return None;
        };
        match option_inner(ty)? {
            Type::Tuple(tuple) => Some(tuple.elems.iter().collect()),
            _ => None,
        }
    }
}

/// The `T` in `Option<T>` (also `std::option::Option<T>`).
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
