//! Derive macros for the todolist client state layer
//!
//! Every feature slice describes its inputs as one action enum that mixes
//! three kinds of variant: thunk commands that start a request, settled
//! actions that carry the request's outcome back, and plain synchronous
//! transitions. `#[derive(Action)]` generates the helpers used to tell them
//! apart in logs and tests.
//!
//! # Example
//!
//! ```ignore
//! use todolist_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(slice = "todolists")]
//! enum TodolistsAction {
//!     #[thunk]
//!     Add { title: String },
//!
//!     #[settled]
//!     Added(Result<Todolist, RequestError>),
//!
//!     FilterChanged { id: String, filter: FilterValue },
//! }
//!
//! assert!(TodolistsAction::Add { title: "x".into() }.is_thunk());
//! assert_eq!(TodolistsAction::Add { title: "x".into() }.action_type(), "todolists/Add");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Variant};

/// Derive macro for action enums
///
/// Generates helper methods:
/// - `is_thunk()` - Returns true if this variant starts a request
/// - `is_settled()` - Returns true if this variant carries a request outcome
/// - `is_transition()` - Returns true for every other variant
/// - `action_type()` - Returns `"<slice>/<Variant>"` for logging
///
/// # Attributes
///
/// - `#[action(slice = "...")]` - Slice name used as the `action_type` prefix
///   (defaults to the enum name)
/// - `#[thunk]` - Mark a variant as a thunk command
/// - `#[settled]` - Mark a variant as a settled request outcome
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[thunk]` and `#[settled]` attributes
/// - The `#[action]` attribute is malformed
#[proc_macro_derive(Action, attributes(action, thunk, settled))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let slice = match slice_name(&input.attrs) {
        Ok(Some(slice)) => slice,
        Ok(None) => name.to_string(),
        Err(error) => return error.to_compile_error().into(),
    };

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut thunk_arms = Vec::new();
    let mut settled_arms = Vec::new();
    let mut action_type_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_thunk = has_attribute(&variant.attrs, "thunk");
        let is_settled = has_attribute(&variant.attrs, "settled");

        if is_thunk && is_settled {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[thunk] and #[settled]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(variant);

        if is_thunk {
            thunk_arms.push(quote! { #pattern => true, });
        }

        if is_settled {
            settled_arms.push(quote! { #pattern => true, });
        }

        let type_name = format!("{slice}/{}", variant.ident);
        action_type_arms.push(quote! { #pattern => #type_name, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action starts a request
            #[must_use]
            pub const fn is_thunk(&self) -> bool {
                match self {
                    #(#thunk_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action carries the outcome of a request
            #[must_use]
            pub const fn is_settled(&self) -> bool {
                match self {
                    #(#settled_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is a plain synchronous transition
            #[must_use]
            pub const fn is_transition(&self) -> bool {
                !self.is_thunk() && !self.is_settled()
            }

            /// Returns the `"<slice>/<Variant>"` name of this action
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                match self {
                    #(#action_type_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Build a pattern that matches `variant` regardless of its fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident: &Ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Read `slice = "..."` out of a container-level `#[action(...)]` attribute
fn slice_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut slice = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("slice") {
                let value: LitStr = meta.value()?.parse()?;
                slice = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `slice`"))
            }
        })?;
    }
    Ok(slice)
}

/// Check if attributes contain a specific attribute name
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
