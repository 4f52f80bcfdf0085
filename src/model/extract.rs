//! Model extraction: marked declaration in, [`DeclarationModel`] out.
//!
//! Extraction is a pure transformation. The caller guarantees the item really
//! carries the class-level marker; nothing is re-checked here and member
//! functions are kept unfiltered, in source order.

use quote::ToTokens;
use tracing::debug_span;

use super::{DeclarationKind, DeclarationModel, Markers, MethodModel, PATH_SEPARATOR};
use crate::registry::{DeclarationItem, MarkedDeclaration};

#[derive(Debug, Clone, Default)]
pub struct ModelExtractor {
    markers: Markers,
}

impl ModelExtractor {
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    pub fn extract(&self, marked: &MarkedDeclaration) -> DeclarationModel {
        let name = marked
            .name_override
            .clone()
            .unwrap_or_else(|| declared_name(&marked.item));
        let _span = debug_span!("extract", declaration = %name).entered();

        let (kind, methods) = match &marked.item {
            DeclarationItem::Impl(item) => (
                DeclarationKind::Impl {
                    self_ty: item.self_ty.clone(),
                    generics: item.generics.clone(),
                },
                self.impl_methods(item),
            ),
            DeclarationItem::Module(item) => (
                DeclarationKind::Module {
                    ident: item.ident.clone(),
                },
                self.module_methods(item),
            ),
        };

        DeclarationModel {
            namespace: marked.namespace.clone(),
            name,
            kind,
            methods,
            origin: marked.origin.clone(),
        }
    }

    fn impl_methods(&self, item: &syn::ItemImpl) -> Vec<MethodModel> {
        item.items
            .iter()
            .filter_map(|member| match member {
                syn::ImplItem::Fn(f) => Some(MethodModel::new(
                    f.sig.clone(),
                    f.vis.clone(),
                    f.attrs.clone(),
                    f.sig.ident.span().start().line,
                    &self.markers,
                )),
                _ => None,
            })
            .collect()
    }

    fn module_methods(&self, item: &syn::ItemMod) -> Vec<MethodModel> {
        let Some((_, items)) = &item.content else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|member| match member {
                syn::Item::Fn(f) => Some(MethodModel::new(
                    f.sig.clone(),
                    f.vis.clone(),
                    f.attrs.clone(),
                    f.sig.ident.span().start().line,
                    &self.markers,
                )),
                _ => None,
            })
            .collect()
    }
}

/// Simple name of the declared item: the self type path without generic
/// arguments for an `impl`, the module ident for a `mod`.
fn declared_name(item: &DeclarationItem) -> String {
    match item {
        DeclarationItem::Impl(item) => match item.self_ty.as_ref() {
            syn::Type::Path(type_path) => type_path
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
            other => other.to_token_stream().to_string().replace(' ', ""),
        },
        DeclarationItem::Module(item) => item.ident.to_string(),
    }
}
