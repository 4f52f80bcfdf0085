//! Marker discovery.
//!
//! The registry looks up declarations tagged with the class-level marker in a
//! parsed source file. It is a plain walk over item attributes, recursing into
//! inline modules so every declaration gets its full module path.

use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{Attribute, Item, LitStr, Meta, Type};

use crate::diagnostics::{Attribution, Diagnostic, DiagnosticSink};
use crate::io::SourceFile;
use crate::model::{Markers, Namespace, Origin};

/// The item carrying the class-level marker.
#[derive(Debug, Clone)]
pub enum DeclarationItem {
    Impl(syn::ItemImpl),
    Module(syn::ItemMod),
}

/// A raw marked declaration as found in the source.
#[derive(Debug, Clone)]
pub struct MarkedDeclaration {
    pub namespace: Namespace,
    pub item: DeclarationItem,
    pub origin: Origin,
    /// Name given through `#[patterns(name = "...")]`
    pub name_override: Option<String>,
}

impl MarkedDeclaration {
    /// Namespace-qualified declared name, e.g. `shapes::nested#Square`.
    pub fn key(&self) -> String {
        let name = self.name_override.clone().unwrap_or_else(|| match &self.item {
            DeclarationItem::Impl(item) => item.self_ty.to_token_stream().to_string(),
            DeclarationItem::Module(item) => item.ident.to_string(),
        });
        format!("{}#{}", self.namespace, name)
    }
}

pub trait DeclarationRegistry: Send + Sync {
    /// Marked declarations of `source`, in source order.
    fn discover(&self, source: &SourceFile, sink: &dyn DiagnosticSink) -> Vec<MarkedDeclaration>;
}

#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    markers: Markers,
}

impl SourceRegistry {
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    fn scan_items(
        &self,
        source: &SourceFile,
        namespace: &Namespace,
        items: &[Item],
        sink: &dyn DiagnosticSink,
        found: &mut Vec<MarkedDeclaration>,
    ) {
        for item in items {
            match item {
                Item::Impl(item_impl) => {
                    let line = item_impl.impl_token.span.start().line;
                    let Some(attr) = self.markers.patterns_attr(&item_impl.attrs) else {
                        continue;
                    };
                    if item_impl.trait_.is_some() {
                        self.misplaced(source, namespace, "trait impl", line, sink);
                        continue;
                    }
                    self.push(
                        source,
                        namespace,
                        attr,
                        DeclarationItem::Impl(item_impl.clone()),
                        line,
                        sink,
                        found,
                    );
                }
                Item::Mod(item_mod) => {
                    let line = item_mod.mod_token.span.start().line;
                    if let Some(attr) = self.markers.patterns_attr(&item_mod.attrs) {
                        if item_mod.content.is_some() {
                            self.push(
                                source,
                                namespace,
                                attr,
                                DeclarationItem::Module(item_mod.clone()),
                                line,
                                sink,
                                found,
                            );
                        } else {
                            self.misplaced(source, namespace, "out-of-line module", line, sink);
                        }
                    }
                    if let Some((_, nested)) = &item_mod.content {
                        let child = namespace.child(item_mod.ident.to_string());
                        self.scan_items(source, &child, nested, sink, found);
                    }
                }
                Item::Struct(item) => self.check_unsupported(source, namespace, &item.attrs, "struct", sink),
                Item::Enum(item) => self.check_unsupported(source, namespace, &item.attrs, "enum", sink),
                Item::Trait(item) => self.check_unsupported(source, namespace, &item.attrs, "trait", sink),
                Item::Fn(item) => self.check_unsupported(source, namespace, &item.attrs, "function", sink),
                _ => {}
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &self,
        source: &SourceFile,
        namespace: &Namespace,
        attr: &Attribute,
        item: DeclarationItem,
        line: usize,
        sink: &dyn DiagnosticSink,
        found: &mut Vec<MarkedDeclaration>,
    ) {
        let origin = Origin::new(&source.path, line);
        let name_override = match parse_name_override(attr, &self.markers.patterns) {
            Ok(name_override) => name_override,
            Err(e) => {
                sink.report(
                    Diagnostic::error(e.to_string(), Attribution::declaration(namespace.to_string(), origin))
                        .with_rule("marker arguments"),
                );
                return;
            }
        };
        if let (DeclarationItem::Impl(item_impl), None) = (&item, &name_override) {
            if !matches!(item_impl.self_ty.as_ref(), Type::Path(_)) {
                let self_ty = item_impl.self_ty.to_token_stream().to_string();
                sink.report(
                    Diagnostic::error(
                        format!(
                            "self type `{self_ty}` is not a path; use #[{}(name = \"...\")]",
                            self.markers.patterns
                        ),
                        Attribution::declaration(namespace.to_string(), origin),
                    )
                    .with_rule("unnamed self type"),
                );
                return;
            }
        }
        found.push(MarkedDeclaration {
            namespace: namespace.clone(),
            item,
            origin,
            name_override,
        });
    }

    fn misplaced(
        &self,
        source: &SourceFile,
        namespace: &Namespace,
        what: &str,
        line: usize,
        sink: &dyn DiagnosticSink,
    ) {
        sink.report(Diagnostic::warning(
            format!(
                "#[{}] on a {what} is ignored; use an inherent impl block or an inline module",
                self.markers.patterns
            ),
            Attribution::declaration(namespace.to_string(), Origin::new(&source.path, line)),
        ));
    }

    fn check_unsupported(
        &self,
        source: &SourceFile,
        namespace: &Namespace,
        attrs: &[Attribute],
        what: &str,
        sink: &dyn DiagnosticSink,
    ) {
        if let Some(attr) = self.markers.patterns_attr(attrs) {
            let line = attr.span().start().line;
            self.misplaced(source, namespace, what, line, sink);
        }
    }
}

impl DeclarationRegistry for SourceRegistry {
    fn discover(&self, source: &SourceFile, sink: &dyn DiagnosticSink) -> Vec<MarkedDeclaration> {
        let mut found = Vec::new();
        self.scan_items(source, &source.namespace, &source.ast.items, sink, &mut found);
        found
    }
}

/// Read `name = "..."` from `#[patterns(...)]`.
fn parse_name_override(attr: &Attribute, marker: &str) -> syn::Result<Option<String>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(_) => {
            let mut name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    name = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error(format!("unsupported #[{marker}] argument")))
                }
            })?;
            match name {
                Some(name) if !is_valid_base_name(&name) => Err(syn::Error::new_spanned(
                    attr,
                    format!("#[{marker}] name '{name}' must be `$` or an identifier path"),
                )),
                other => Ok(other),
            }
        }
        Meta::NameValue(_) => Err(syn::Error::new_spanned(
            attr,
            format!("expected #[{marker}] or #[{marker}(name = \"...\")]"),
        )),
    }
}

fn is_valid_base_name(name: &str) -> bool {
    name == "$"
        || name
            .split([':', '.'])
            .filter(|part| !part.is_empty())
            .all(|part| syn::parse_str::<syn::Ident>(part).is_ok())
            && name.chars().any(|c| c != ':' && c != '.')
}
