//! jtdrpc-macros - Derive macro for JTD type descriptors
//!
//! This crate provides `#[derive(Describe)]`, which implements
//! `jtdrpc_core::Describe` so a type can report its shape to the resolver.
//!
//! The derive reads the type's `serde` attributes so the described shape
//! matches what serde actually puts on the wire, and accepts its own `jtd`
//! attributes for what serde cannot express.

use darling::{FromDeriveInput, FromField, FromVariant, ast};
use jtdrpc_attrs::{RenameRule, SerdeAttrs, unraw};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Container options for the Describe derive macro
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(jtd), forward_attrs(serde))]
struct DescribeOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<VariantOpts, FieldOpts>,
    attrs: Vec<syn::Attribute>,

    /// Definition name to register instead of the type's identifier
    #[darling(default)]
    name: Option<String>,

    /// The type serializes itself to arbitrary JSON
    #[darling(default)]
    opaque: bool,

    /// The type serializes itself to a JSON string
    #[darling(default)]
    as_string: bool,
}

#[derive(Debug, FromField)]
#[darling(attributes(jtd), forward_attrs(serde))]
struct FieldOpts {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    attrs: Vec<syn::Attribute>,

    /// May be absent from the output
    #[darling(default)]
    optional: bool,

    #[darling(default)]
    rename: Option<String>,

    #[darling(default)]
    opaque: bool,

    #[darling(default)]
    as_string: bool,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(jtd), forward_attrs(serde))]
struct VariantOpts {
    ident: syn::Ident,
    fields: ast::Fields<darling::util::Ignored>,
    attrs: Vec<syn::Attribute>,

    #[darling(default)]
    rename: Option<String>,
}

/// Derive macro describing a type's JSON shape
///
/// Structs with named fields become records, newtype structs describe as
/// their inner type (or a definition when they contain themselves), unit
/// structs carry no payload and enums whose variants are all units become a
/// closed set of string literals.
///
/// # Example
///
/// ```ignore
/// #[derive(Serialize, Describe)]
/// #[serde(rename_all = "camelCase")]
/// struct CreateUserRequest {
///     user_name: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     email: Option<String>,
///     #[jtd(as_string)]
///     id: Uuid,
/// }
/// ```
#[proc_macro_derive(Describe, attributes(jtd, serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match DescribeOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    match expand(&opts) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn expand(opts: &DescribeOpts) -> syn::Result<TokenStream2> {
    let name = &opts.ident;

    if let Some(lifetime) = opts.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Describe cannot be derived for types with lifetime parameters",
        ));
    }

    let mut generics = opts.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(::jtdrpc_core::Describe));
        param.bounds.push(syn::parse_quote!('static));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let container = SerdeAttrs::parse(&opts.attrs)?;
    let type_name = opts.name.clone().unwrap_or_else(|| unraw(name));

    let body = if opts.opaque {
        quote!(::jtdrpc_core::TypeDescriptor::Opaque)
    } else if opts.as_string {
        quote!(::jtdrpc_core::TypeDescriptor::TextLike)
    } else {
        match &opts.data {
            ast::Data::Struct(fields) => describe_struct(name, &type_name, fields, &container)?,
            ast::Data::Enum(variants) => describe_enum(name, &type_name, variants, &container)?,
        }
    };

    Ok(quote! {
        impl #impl_generics ::jtdrpc_core::Describe for #name #ty_generics #where_clause {
            fn describe() -> ::jtdrpc_core::TypeDescriptor {
                #body
            }
        }
    })
}

fn describe_struct(
    name: &syn::Ident,
    type_name: &str,
    fields: &ast::Fields<FieldOpts>,
    container: &SerdeAttrs,
) -> syn::Result<TokenStream2> {
    let mut kept = Vec::with_capacity(fields.len());
    for field in fields.iter() {
        let serde = SerdeAttrs::parse(&field.attrs)?;
        if !serde.skip {
            kept.push((field, serde));
        }
    }

    match fields.style {
        ast::Style::Unit => Ok(quote!(::jtdrpc_core::TypeDescriptor::Unit)),
        ast::Style::Tuple if fields.len() == 1 => {
            Ok(describe_newtype(type_name, &fields.fields[0]))
        }
        ast::Style::Tuple => Err(syn::Error::new_spanned(
            name,
            "tuple structs with more than one field have no JTD representation",
        )),
        ast::Style::Struct if container.transparent && kept.len() == 1 => {
            Ok(describe_newtype(type_name, kept[0].0))
        }
        ast::Style::Struct => {
            let rule = container.rename_rule()?;
            let mut field_tokens = Vec::with_capacity(kept.len());
            for (field, serde) in &kept {
                field_tokens.push(describe_field(field, serde, rule)?);
            }
            Ok(quote! {
                ::jtdrpc_core::TypeDescriptor::Struct(
                    ::jtdrpc_core::StructDescriptor::named(
                        ::jtdrpc_core::TypeIdentity::of::<Self>(#type_name)
                    )
                    #(.field(#field_tokens))*
                )
            })
        }
    }
}

/// Descriptor expression for a field's value type
fn describe_type(field: &FieldOpts) -> TokenStream2 {
    let ty = &field.ty;
    if field.opaque {
        quote!(::jtdrpc_core::TypeRef::new(::jtdrpc_core::TypeDescriptor::Opaque))
    } else if field.as_string {
        quote!(::jtdrpc_core::TypeRef::new(::jtdrpc_core::TypeDescriptor::TextLike))
    } else {
        quote!(::jtdrpc_core::TypeRef::of::<#ty>())
    }
}

/// Newtypes keep an identity so a wrapper that contains itself can still be
/// registered as a definition
fn describe_newtype(type_name: &str, field: &FieldOpts) -> TokenStream2 {
    let type_ref = describe_type(field);
    quote! {
        ::jtdrpc_core::TypeDescriptor::Newtype(::jtdrpc_core::NewtypeDescriptor::new(
            ::jtdrpc_core::TypeIdentity::of::<Self>(#type_name),
            #type_ref,
        ))
    }
}

fn describe_field(
    field: &FieldOpts,
    serde: &SerdeAttrs,
    rule: Option<RenameRule>,
) -> syn::Result<TokenStream2> {
    if serde.flatten {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "flattened fields have no JTD representation",
        ));
    }

    let Some(ident) = &field.ident else {
        return Err(syn::Error::new_spanned(&field.ty, "expected a named field"));
    };
    let declared = unraw(ident);
    let external = field
        .rename
        .clone()
        .or_else(|| serde.rename.clone())
        .or_else(|| rule.map(|r| r.apply_to_field(&declared)))
        .filter(|external| *external != declared);

    let type_ref = describe_type(field);
    let rename = external.map(|n| quote!(.rename(#n)));
    let optional = (field.optional || serde.skip_serializing_if).then(|| quote!(.optional(true)));

    Ok(quote! {
        ::jtdrpc_core::FieldDescriptor::new(#declared, #type_ref) #rename #optional
    })
}

fn describe_enum(
    name: &syn::Ident,
    type_name: &str,
    variants: &[VariantOpts],
    container: &SerdeAttrs,
) -> syn::Result<TokenStream2> {
    let rule = container.rename_rule()?;
    let mut values = Vec::with_capacity(variants.len());

    for variant in variants {
        if !variant.fields.is_unit() {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "enums with data-carrying variants have no JTD representation; \
                 mark the enum #[jtd(opaque)] to accept any value",
            ));
        }
        let serde = SerdeAttrs::parse(&variant.attrs)?;
        if serde.skip {
            continue;
        }
        let declared = unraw(&variant.ident);
        let value = variant
            .rename
            .clone()
            .or(serde.rename)
            .or_else(|| rule.map(|r| r.apply_to_variant(&declared)))
            .unwrap_or(declared);
        values.push(value);
    }

    if values.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "an enum needs at least one serialized variant",
        ));
    }

    Ok(quote! {
        ::jtdrpc_core::TypeDescriptor::Enum(::jtdrpc_core::EnumDescriptor::named(
            ::jtdrpc_core::TypeIdentity::of::<Self>(#type_name),
            [#(#values),*],
        ))
    })
}
