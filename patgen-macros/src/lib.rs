//! Marker attributes for `patgen`.
//!
//! Both attributes leave the annotated item untouched. They only exist so
//! that marked code compiles; `patgen` reads them from source:
//! - `#[patterns]` / `#[patterns(name = "...")]` on an inherent impl block or
//!   an inline module
//! - `#[unapply]` on each extractor function inside it

use proc_macro::TokenStream;

/// Marks a declaration whose `#[unapply]` functions get pattern factories.
///
/// # Example
///
/// ```ignore
/// #[patterns]
/// impl Circle {
///     #[unapply]
///     pub fn unapply_circle(value: &Circle) -> Option<(f64,)> {
///         Some((value.radius,))
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn patterns(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Marks an extractor function inside a `#[patterns]` declaration.
#[proc_macro_attribute]
pub fn unapply(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}
