use proc_macro::TokenStream;
use syn_utils::into_macro_output;

#[macro_use]
mod syn_utils;

mod same_value_impl;

/// Implements `SameValue` by comparing every field with `SameValue`.
///
/// Each type parameter receives a `SameValue` bound.
///
/// # Examples
///
/// ```ignore
/// #[derive(SameValue)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// #[derive(SameValue)]
/// enum Shape {
///     Empty,
///     Circle { center: Point, radius: f64 },
///     Polygon(Vec<Point>),
/// }
/// ```
#[proc_macro_derive(SameValue)]
pub fn derive_same_value(input: TokenStream) -> TokenStream {
    into_macro_output(same_value_impl::derive_same_value(input.into()))
}
