//! Default code renderer.
//!
//! For a declaration `Foo` the rendered unit is a `pub struct FooPatterns;`
//! with one `pub fn` per extractor. A factory takes one sub-pattern per tuple
//! component and returns the runtime `PatternN` for the extractor's arity:
//!
//! ```text
//! #[patterns]
//! impl<T> Option<T> {
//!     #[unapply]
//!     pub fn unapply_some(value: &Option<T>) -> Option<(T,)> { .. }
//! }
//! ```
//!
//! renders
//!
//! ```text
//! pub struct OptionPatterns;
//! impl OptionPatterns {
//!     pub fn some<T, P1>(p1: P1) -> ::patgen::runtime::Pattern1<Option<T>, T, P1>
//!     where
//!         P1: ::patgen::runtime::Pattern<T>,
//!     {
//!         ::patgen::runtime::Pattern1::new(|value: &Option<T>| <Option<T>>::unapply_some(value), p1)
//!     }
//! }
//! ```
//!
//! The unit is meant to be `include!`d into the module that holds the
//! declaration, so types and paths are emitted exactly as written there.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::visit_mut::{self, VisitMut};
use syn::punctuated::Punctuated;
use syn::{parse_quote, GenericParam, Generics, Ident, Type, WhereClause};

use crate::errors::{GenError, Result};
use crate::model::{DeclarationKind, DeclarationModel, MethodModel};
use crate::synth::Renderer;

const HEADER: &str = "// @generated by patgen. Do not edit.\n\n";
const EXTRACTOR_PREFIX: &str = "unapply_";

#[derive(Debug, Clone)]
pub struct TokenRenderer {
    runtime_path: syn::Path,
}

impl Default for TokenRenderer {
    fn default() -> Self {
        Self {
            runtime_path: parse_quote!(::patgen::runtime),
        }
    }
}

impl TokenRenderer {
    pub fn new(runtime_path: &str) -> Result<Self> {
        let runtime_path = syn::parse_str(runtime_path).map_err(|e| {
            GenError::Configuration(format!("runtime_path '{runtime_path}' is not a valid path: {e}"))
        })?;
        Ok(Self { runtime_path })
    }

    fn factory(&self, model: &DeclarationModel, method: &MethodModel, name: &Ident) -> TokenStream {
        let Some(param) = method.params().next() else {
            return TokenStream::new();
        };
        let rt = &self.runtime_path;
        let mut resolver = SelfResolver::for_declaration(model);

        let mut param_ty = (*param.ty).clone();
        resolver.visit_type_mut(&mut param_ty);
        // Factories see `&subject`; a by-value extractor needs `subject: Clone`.
        let (subject, call_arg) = match param_ty {
            Type::Reference(reference) => (*reference.elem, quote!(value)),
            owned => (owned, quote!(::core::clone::Clone::clone(value))),
        };

        let components: Vec<Type> = method
            .return_components()
            .unwrap_or_default()
            .into_iter()
            .map(|ty| {
                let mut ty = ty.clone();
                resolver.visit_type_mut(&mut ty);
                ty
            })
            .collect();

        let pattern_ty = format_ident!("Pattern{}", components.len());
        let pattern_params: Vec<Ident> = (1..=components.len()).map(|i| format_ident!("P{}", i)).collect();
        let args: Vec<Ident> = (1..=components.len()).map(|i| format_ident!("p{}", i)).collect();

        let mut generics = factory_generics(model, method, &mut resolver);
        let where_clause = generics.make_where_clause();
        for (param, component) in pattern_params.iter().zip(&components) {
            where_clause
                .predicates
                .push(parse_quote!(#param: #rt::Pattern<#component>));
        }
        generics
            .params
            .extend(pattern_params.iter().map(|p| -> GenericParam { parse_quote!(#p) }));
        let where_clause = generics.where_clause.take();

        let extractor = &method.sig.ident;
        let callee = match &model.kind {
            DeclarationKind::Impl { self_ty, .. } => quote!(<#self_ty>::#extractor),
            DeclarationKind::Module { ident } => quote!(#ident::#extractor),
        };
        let doc = format!(" Pattern backed by `{}::{}`.", model.name, extractor);

        quote! {
            #[doc = #doc]
            pub fn #name #generics (#(#args: #pattern_params),*) -> #rt::#pattern_ty<#subject, #(#components,)* #(#pattern_params),*>
            #where_clause
            {
                #rt::#pattern_ty::new(|value: &#subject| #callee(#call_arg), #(#args),*)
            }
        }
    }
}

impl Renderer for TokenRenderer {
    fn render(&self, derived_name: &str, model: &DeclarationModel) -> String {
        let ident = format_ident!("{}", derived_name);
        let extractors: Vec<&MethodModel> = model.extractors().collect();
        let names = factory_names(&extractors);
        let factories = extractors
            .iter()
            .zip(&names)
            .map(|(method, name)| self.factory(model, method, name));
        let doc = format!(" Pattern factories for `{}`.", model.display_name());

        let file: syn::File = parse_quote! {
            #[doc = #doc]
            pub struct #ident;

            impl #ident {
                #(#factories)*
            }
        };
        format!("{HEADER}{}", prettyplease::unparse(&file))
    }
}

/// Factory names: the extractor name without its `unapply_` prefix, or the
/// full name when the remainder is not an identifier or would collide.
fn factory_names(extractors: &[&MethodModel]) -> Vec<Ident> {
    let full: Vec<String> = extractors.iter().map(|m| m.name()).collect();
    let short: Vec<Option<String>> = full
        .iter()
        .map(|name| {
            name.strip_prefix(EXTRACTOR_PREFIX)
                .filter(|rest| syn::parse_str::<Ident>(rest).is_ok())
                .map(str::to_string)
        })
        .collect();

    extractors
        .iter()
        .enumerate()
        .map(|(i, method)| match &short[i] {
            Some(candidate)
                if short.iter().filter(|s| s.as_ref() == Some(candidate)).count() == 1
                    && !full.contains(candidate) =>
            {
                format_ident!("{}", candidate)
            }
            _ => method.sig.ident.clone(),
        })
        .collect()
}

/// Declaration generics followed by the extractor's own, lifetimes first.
fn factory_generics(model: &DeclarationModel, method: &MethodModel, resolver: &mut SelfResolver) -> Generics {
    let mut params: Vec<GenericParam> = Vec::new();
    let mut where_clause = WhereClause {
        where_token: Default::default(),
        predicates: Punctuated::new(),
    };

    let declaration_generics = match &model.kind {
        DeclarationKind::Impl { generics, .. } => Some(generics),
        DeclarationKind::Module { .. } => None,
    };
    for generics in declaration_generics.into_iter().chain([&method.sig.generics]) {
        params.extend(generics.params.iter().cloned());
        if let Some(clause) = &generics.where_clause {
            where_clause.predicates.extend(clause.predicates.iter().cloned());
        }
    }
    params.sort_by_key(|param| !matches!(param, GenericParam::Lifetime(_)));

    let mut generics = Generics {
        params: params.into_iter().collect(),
        where_clause: Some(where_clause),
        ..Default::default()
    };
    if !generics.params.is_empty() {
        generics.lt_token = Some(Default::default());
        generics.gt_token = Some(Default::default());
    }
    resolver.visit_generics_mut(&mut generics);
    generics
}

/// Rewrites `Self` to the declaration's self type, since inside the generated
/// unit `Self` would name the pattern struct instead.
struct SelfResolver {
    self_ty: Option<Type>,
}

impl SelfResolver {
    fn for_declaration(model: &DeclarationModel) -> Self {
        let self_ty = match &model.kind {
            DeclarationKind::Impl { self_ty, .. } => Some((**self_ty).clone()),
            DeclarationKind::Module { .. } => None,
        };
        Self { self_ty }
    }
}

impl VisitMut for SelfResolver {
    fn visit_type_mut(&mut self, ty: &mut Type) {
        if let (Some(self_ty), Type::Path(type_path)) = (&self.self_ty, &*ty) {
            let segments = &type_path.path.segments;
            if type_path.qself.is_none() && segments.first().is_some_and(|s| s.ident == "Self") {
                let rest: Vec<_> = segments.iter().skip(1).collect();
                *ty = if rest.is_empty() {
                    self_ty.clone()
                } else {
                    parse_quote!(<#self_ty> #(:: #rest)*)
                };
                return;
            }
        }
        visit_mut::visit_type_mut(self, ty);
    }
}
