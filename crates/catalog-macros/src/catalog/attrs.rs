//! Parsing of `#[catalog(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field is exposed to the query engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `#[catalog(String)]`
    String,
    /// `#[catalog(Number)]`
    Number,
    /// `#[catalog(Bool)]`
    Bool,
}

impl FieldType {
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "String" | "string" | "text" => Ok(FieldType::String),
            "Number" | "number" => Ok(FieldType::Number),
            "Bool" | "boolean" => Ok(FieldType::Bool),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown catalog field type: '{}'. Expected one of: String, Number, Bool",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[catalog(...)]`.
#[derive(Debug, Clone)]
pub struct CatalogAttr {
    pub field_type: Option<FieldType>,
    pub skip: bool,
    /// The field is an `Option<_>`; `None` reads as a missing value.
    pub optional: bool,
    /// Logical name used in queries (default: the Rust field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for CatalogAttr {
    fn default() -> Self {
        CatalogAttr {
            field_type: None,
            skip: false,
            optional: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for CatalogAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = CatalogAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("optional") {
                        attr.optional = true;
                    } else if let Some(ident) = p.get_ident() {
                        if attr.field_type.is_some() {
                            return Err(Error::new(
                                ident.span(),
                                "catalog field type given more than once",
                            ));
                        }
                        attr.field_type = Some(FieldType::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected catalog field type: String, Number, Bool, optional or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    match &nv.value {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) if !s.value().is_empty() => attr.rename = Some(s.value()),
                        _ => {
                            return Err(Error::new(
                                nv.value.span(),
                                "rename must be a non-empty string literal",
                            ))
                        }
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown catalog attribute. Expected: String, Number, Bool, optional, skip, or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && (attr.field_type.is_some() || attr.optional || attr.rename.is_some()) {
            return Err(Error::new(
                attr.span,
                "skip cannot be combined with other catalog attributes",
            ));
        }

        Ok(attr)
    }
}

/// Extracts the `#[catalog(...)]` attribute of a field.
pub fn parse_catalog_attrs(attrs: &[Attribute]) -> Result<CatalogAttr> {
    for attr in attrs {
        if attr.path().is_ident("catalog") {
            return attr.parse_args::<CatalogAttr>();
        }
    }
    Ok(CatalogAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &str) -> Result<CatalogAttr> {
        syn::parse_str::<CatalogAttr>(tokens)
    }

    #[test]
    fn field_types() {
        assert_eq!(parse("String").unwrap().field_type, Some(FieldType::String));
        assert_eq!(parse("text").unwrap().field_type, Some(FieldType::String));
        assert_eq!(parse("Number").unwrap().field_type, Some(FieldType::Number));
        assert_eq!(parse("Bool").unwrap().field_type, Some(FieldType::Bool));
        assert_eq!(parse("boolean").unwrap().field_type, Some(FieldType::Bool));
    }

    #[test]
    fn optional_and_rename() {
        let attr = parse(r#"Number, optional, rename = "guestCount""#).unwrap();
        assert_eq!(attr.field_type, Some(FieldType::Number));
        assert!(attr.optional);
        assert_eq!(attr.rename.as_deref(), Some("guestCount"));
    }

    #[test]
    fn skip() {
        let attr = parse("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.field_type, None);
    }

    #[test]
    fn skip_with_type_rejected() {
        assert!(parse("skip, String").is_err());
    }

    #[test]
    fn unknown_type_rejected() {
        let err = parse("Timestamp").unwrap_err();
        assert!(err.to_string().contains("unknown catalog field type"));
    }

    #[test]
    fn duplicate_type_rejected() {
        assert!(parse("String, Number").is_err());
    }

    #[test]
    fn empty_rename_rejected() {
        assert!(parse(r#"String, rename = """#).is_err());
        assert!(parse("String, rename = 3").is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(parse(r#"String, alias = "x""#).is_err());
    }
}
