//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts the directive string from struct fields during macro
//! expansion. The directive's content is not interpreted here; it is parsed at
//! bind time so its errors surface through the runtime error types.

use syn::{Attribute, Field, LitStr, Type};

/// Parsed `#[env(...)]` attribute of a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Directive text, e.g. `"PORT,base:16"`.
    ///
    /// `None` means the field carries no directive and is left untouched,
    /// unless it is a nested record.
    pub directive: Option<LitStr>,
}

impl FieldAttrs {
    /// Extract the `#[env(...)]` attribute from a struct field.
    ///
    /// Accepted forms:
    /// - `#[env("KEY,options")]`
    /// - `#[env(directive = "KEY,options")]`
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            if attrs.directive.is_some() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "duplicate env attribute: a field takes a single directive",
                ));
            }

            attrs.directive = Some(parse_directive(attr)?);
        }

        Ok(attrs)
    }
}

fn parse_directive(attr: &Attribute) -> syn::Result<LitStr> {
    // #[env("KEY,options")]
    if let Ok(lit) = attr.parse_args::<LitStr>() {
        return Ok(lit);
    }

    // #[env(directive = "KEY,options")]
    let mut directive = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("directive") {
            let value = meta.value()?;
            directive = Some(value.parse::<LitStr>()?);
            return Ok(());
        }

        Err(meta.error("unsupported env attribute, expected a directive string"))
    })?;

    directive.ok_or_else(|| {
        syn::Error::new_spanned(attr, "expected #[env(\"KEY[,OPTION]*\")]")
    })
}

/// Kind name for field types that are rejected without consulting `Field`.
///
/// Function pointers cannot carry a blanket `Field` impl covering every
/// signature, so they are recognised syntactically.
pub fn unsupported_kind(ty: &Type) -> Option<&'static str> {
    match ty {
        Type::BareFn(_) => Some("function"),
        Type::Paren(inner) => unsupported_kind(&inner.elem),
        Type::Group(inner) => unsupported_kind(&inner.elem),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_directive_literal() {
        let field: Field = parse_quote! {
            #[env("PORT,base:16")]
            pub port: u16
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.directive.unwrap().value(), "PORT,base:16");
    }

    #[test]
    fn test_parse_directive_named() {
        let field: Field = parse_quote! {
            #[env(directive = "HOSTS,sep:;")]
            pub hosts: Vec<String>
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.directive.unwrap().value(), "HOSTS,sep:;");
    }

    #[test]
    fn test_no_attribute() {
        let field: Field = parse_quote! {
            pub retries: u32
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.directive.is_none());
    }

    #[test]
    fn test_other_attributes_ignored() {
        let field: Field = parse_quote! {
            #[allow(dead_code)]
            #[env("LEVEL")]
            pub level: u8
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.directive.unwrap().value(), "LEVEL");
    }

    #[test]
    fn test_empty_directive_literal_is_kept() {
        let field: Field = parse_quote! {
            #[env("")]
            pub level: u8
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.directive.unwrap().value(), "");
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let field: Field = parse_quote! {
            #[env("A")]
            #[env("B")]
            pub level: u8
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let field: Field = parse_quote! {
            #[env(name = "A")]
            pub level: u8
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }

    #[test]
    fn test_non_string_rejected() {
        let field: Field = parse_quote! {
            #[env(42)]
            pub level: u8
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }

    #[test]
    fn test_bare_path_rejected() {
        let field: Field = parse_quote! {
            #[env]
            pub level: u8
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }

    #[test]
    fn test_unsupported_kind() {
        let ty: Type = parse_quote!(fn(&str) -> bool);
        assert_eq!(unsupported_kind(&ty), Some("function"));

        let ty: Type = parse_quote!((fn()));
        assert_eq!(unsupported_kind(&ty), Some("function"));

        let ty: Type = parse_quote!(Vec<String>);
        assert_eq!(unsupported_kind(&ty), None);
    }
}
