//! Code generation for `#[derive(Catalog)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_catalog_attrs, FieldType};

pub fn catalog_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Catalog can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Catalog can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut query_names: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_catalog_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Unannotated fields are not queryable.
        let field_type = match attrs.field_type {
            Some(t) => t,
            None if attrs.optional || attrs.rename.is_some() => {
                return Err(Error::new(
                    attrs.span,
                    "catalog field needs a type: String, Number or Bool",
                ))
            }
            None => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if query_names.contains(&query_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate catalog field name '{}'", query_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for catalog queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = if attrs.optional {
            let inner = value_tokens(field_type, quote! { v }, true);
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(v) => #inner,
                    ::core::option::Option::None => ::catalog_query::Value::None,
                }
            }
        } else {
            value_tokens(field_type, quote! { self.#field_name }, false)
        };

        field_matches.push(quote! {
            #query_name => #value_expr,
        });
        query_names.push(query_name);
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*

            /// Every queryable field name, in declaration order.
            pub const CATALOG_FIELDS: &'static [&'static str] = &[#(#query_names),*];
        }

        impl #impl_generics ::catalog_query::FieldAccessor for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::catalog_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::catalog_query::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` for one field. `by_ref` means `place` is already a
/// reference (the binding of an `Option` match).
fn value_tokens(field_type: FieldType, place: TokenStream, by_ref: bool) -> TokenStream {
    match (field_type, by_ref) {
        (FieldType::String, true) => quote! { ::catalog_query::Value::String(#place) },
        (FieldType::String, false) => quote! { ::catalog_query::Value::String(&#place) },
        (FieldType::Number, true) => {
            quote! { ::catalog_query::Value::Number(::catalog_query::Number::from(*#place)) }
        }
        (FieldType::Number, false) => {
            quote! { ::catalog_query::Value::Number(::catalog_query::Number::from(#place)) }
        }
        (FieldType::Bool, true) => quote! { ::catalog_query::Value::Bool(*#place) },
        (FieldType::Bool, false) => quote! { ::catalog_query::Value::Bool(#place) },
    }
}

/// Converts a field name to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == ' ' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
