//! Derive macros for the reducer architecture
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `ActionType` for action enums
//!
//! # Example
//!
//! ```ignore
//! use reducer_core::action::ActionType;
//! use reducer_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     AddTodo,
//!     ToggleTodo(TodoId),
//!     #[action(rename = "CLEAR")]
//!     ClearCompleted,
//! }
//!
//! assert_eq!(TodoAction::AddTodo.action_type(), "ADD_TODO");
//! assert_eq!(TodoAction::ACTION_TYPES, &["ADD_TODO", "TOGGLE_TODO", "CLEAR"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for Action enums
///
/// Implements `reducer_core::action::ActionType` and adds an associated
/// constant `ACTION_TYPES` listing every discriminant in declaration order.
///
/// The discriminant of a variant is its name in `SCREAMING_SNAKE_CASE`
/// (`EditNewTodo` becomes `EDIT_NEW_TODO`), the same spelling
/// `#[serde(rename_all = "SCREAMING_SNAKE_CASE")]` produces.
///
/// # Attributes
///
/// - `#[action(rename = "NAME")]` - Use `NAME` as the variant's discriminant
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - Applied to an enum without variants
/// - `#[action(...)]` contains anything other than `rename = "..."`
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    if data_enum.variants.is_empty() {
        return syn::Error::new_spanned(&input, "#[derive(Action)] requires at least one variant")
            .to_compile_error()
            .into();
    }

    let mut type_names = Vec::with_capacity(data_enum.variants.len());
    let mut arms = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let type_name = match renamed(&variant.attrs) {
            Ok(Some(rename)) => rename,
            Ok(None) => screaming_snake_case(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        arms.push(match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } => #type_name, },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #type_name, },
            Fields::Unit => quote! { Self::#variant_name => #type_name, },
        });
        type_names.push(type_name);
    }

    let expanded = quote! {
        impl #impl_generics ::reducer_core::action::ActionType
            for #name #ty_generics #where_clause
        {
            fn action_type(&self) -> &'static str {
                match self {
                    #(#arms)*
                }
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Every action discriminant, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#type_names),*];
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[action(rename = "...")]` from a variant's attributes
fn renamed(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `rename = \"...\"`"))
            }
        })?;
    }

    Ok(rename)
}

/// Converts a `CamelCase` identifier to `SCREAMING_SNAKE_CASE`
///
/// Acronym runs stay together: `HTTPRequest` becomes `HTTP_REQUEST`.
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
