//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldAttrs;

/// `Record` derive macro
///
/// Implements `envbind::Record` and `envbind::Field` so the struct can be
/// passed to `envbind::load` and nested inside other records.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[env("KEY[,OPTION]*")]`: Directive naming the key and parsing options
/// - `#[env(directive = "KEY[,OPTION]*")]`: Same, in key-value form
///
/// Fields without `#[env(...)]` are left untouched, except nested records,
/// which are always walked.
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(Record, attributes(env))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Ok(expand_impls(input, Vec::new()));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record only supports structs",
            ));
        }
    };

    let mut binders = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = field_ident.to_string();
        let attrs = FieldAttrs::from_field(field)?;

        let directive = match &attrs.directive {
            Some(lit) => quote! { ::core::option::Option::Some(#lit) },
            None => quote! { ::core::option::Option::None },
        };

        let binder = match attrs::unsupported_kind(&field.ty) {
            Some(kind) => quote! {
                ::envbind::bind::bind_slot(
                    source,
                    #field_name,
                    #directive,
                    ::envbind::Slot::Unsupported(#kind),
                )?;
            },
            None => quote! {
                ::envbind::bind::bind_field(
                    source,
                    #field_name,
                    #directive,
                    &mut self.#field_ident,
                )?;
            },
        };
        binders.push(binder);
    }

    Ok(expand_impls(input, binders))
}

fn expand_impls(
    input: &DeriveInput,
    binders: Vec<proc_macro2::TokenStream>,
) -> proc_macro2::TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::envbind::Record for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn bind_fields(
                &mut self,
                source: &dyn ::envbind::KeyGetter,
            ) -> ::core::result::Result<(), ::envbind::BindError> {
                #(#binders)*
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics ::envbind::Field for #struct_name #ty_generics #where_clause {
            fn slot(&mut self) -> ::envbind::Slot<'_> {
                ::envbind::Slot::Record(self)
            }
        }
    }
}
