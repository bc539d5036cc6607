//! Type catalog scanned from Rust source.
//!
//! Schema inference normally goes through `#[derive(Describe)]` at compile
//! time. This module offers the same mapping without compiling anything: it
//! parses a source file with [`syn`], records every struct and enum deriving
//! `Serialize` or `Describe`, and builds [`TypeDescriptor`]s from the
//! recorded shapes on demand.
//!
//! # Recognized Attributes
//!
//! - `#[serde(rename = "...")]`, `#[serde(rename_all = "...")]`
//! - `#[serde(skip)]`, `#[serde(skip_serializing)]`
//! - `#[serde(skip_serializing_if = "...")]` marks a field optional
//! - `#[serde(transparent)]`
//! - `#[jtd(optional, rename, name, opaque, as_string)]`
//!
//! # Limitations
//!
//! Types are matched by their last path segment, so two same-named types in
//! different modules of one file are indistinguishable. Generic types,
//! data-carrying enums, tuple structs with several fields and flattened
//! fields are recorded but describe as unsupported, so they only fail
//! resolution when actually referenced.

use anyhow::{Context, Result};
use jtdrpc_attrs::{RenameRule, SerdeAttrs, unraw};
use jtdrpc_core::{
    EnumDescriptor, FieldDescriptor, NewtypeDescriptor, StructDescriptor, TypeDescriptor,
    TypeIdentity, TypeRef,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, LitStr, Token, Type};

/// Every schema-bearing type declared in one source file
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    types: BTreeMap<String, SourceType>,
}

/// A struct or enum as declared in source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceType {
    /// Definition name (the identifier unless `#[jtd(name)]` overrides it)
    pub name: String,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Struct(Vec<Field>),
    /// Serializes as its single inner value
    Newtype(FieldType),
    Enum(Vec<String>),
    Unit,
    Opaque,
    Text,
    /// Recorded but not describable; the reason is reported on use
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub external_name: String,
    pub optional: bool,
    pub ty: FieldType,
}

/// Simplified field type representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Timestamp,
    /// Dates and times without a zone, serialized as plain strings
    Text,
    /// `serde_json::Value`
    Json,
    Opaque,
    Unit,
    Vec(Box<FieldType>),
    Option(Box<FieldType>),
    /// String-keyed map; carries the value type
    Map(Box<FieldType>),
    Custom(String),
    Unsupported(String),
}

impl SourceCatalog {
    /// Parse a Rust source file
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse_source(&content)
    }

    /// Parse Rust source code and record its schema-bearing types
    pub fn parse_source(source: &str) -> Result<Self> {
        let file = syn::parse_file(source).context("Failed to parse Rust source")?;

        let mut catalog = Self::default();
        catalog.collect(&file.items)?;
        Ok(catalog)
    }

    fn collect(&mut self, items: &[syn::Item]) -> Result<()> {
        for item in items {
            match item {
                syn::Item::Struct(s) if is_schema_item(&s.attrs) => {
                    let ty = SourceType::from_struct(s)?;
                    self.insert(s.ident.to_string(), ty);
                }
                syn::Item::Enum(e) if is_schema_item(&e.attrs) => {
                    let ty = SourceType::from_enum(e)?;
                    self.insert(e.ident.to_string(), ty);
                }
                syn::Item::Mod(m) => {
                    if let Some((_, items)) = &m.content {
                        self.collect(items)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn insert(&mut self, ident: String, ty: SourceType) {
        if let TypeKind::Unsupported(reason) = &ty.kind {
            tracing::debug!("Recorded {} as unsupported: {}", ident, reason);
        }
        self.types.insert(ident, ty);
    }

    /// Identifiers of every recorded type, sorted
    pub fn idents(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn get(&self, ident: &str) -> Option<&SourceType> {
        self.types.get(ident)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptor for the type declared as `ident`
    pub fn describe(self: &Arc<Self>, ident: &str) -> Option<TypeDescriptor> {
        let ty = self.get(ident)?;
        let identity = TypeIdentity::new(format!("source::{ident}"), ty.name.clone());

        Some(match &ty.kind {
            TypeKind::Struct(fields) => {
                let record = fields.iter().fold(
                    StructDescriptor::named(identity),
                    |record, field| {
                        let mut descriptor =
                            FieldDescriptor::new(field.name.clone(), self.type_ref(&field.ty))
                                .optional(field.optional);
                        if field.external_name != field.name {
                            descriptor = descriptor.rename(field.external_name.clone());
                        }
                        record.field(descriptor)
                    },
                );
                TypeDescriptor::Struct(record)
            }
            TypeKind::Newtype(inner) => {
                TypeDescriptor::Newtype(NewtypeDescriptor::new(identity, self.type_ref(inner)))
            }
            TypeKind::Enum(values) => {
                TypeDescriptor::Enum(EnumDescriptor::named(identity, values.iter().cloned()))
            }
            TypeKind::Unit => TypeDescriptor::Unit,
            TypeKind::Opaque => TypeDescriptor::Opaque,
            TypeKind::Text => TypeDescriptor::TextLike,
            TypeKind::Unsupported(reason) => {
                TypeDescriptor::Unsupported(format!("{ident} ({reason})"))
            }
        })
    }

    fn type_ref(self: &Arc<Self>, ty: &FieldType) -> TypeRef {
        let catalog = Arc::clone(self);
        let ty = ty.clone();
        TypeRef::lazy(move || catalog.field_descriptor(&ty))
    }

    fn field_descriptor(self: &Arc<Self>, ty: &FieldType) -> TypeDescriptor {
        match ty {
            FieldType::String => TypeDescriptor::String,
            FieldType::Bool => TypeDescriptor::Bool,
            FieldType::I8 => TypeDescriptor::Int8,
            FieldType::I16 => TypeDescriptor::Int16,
            FieldType::I32 => TypeDescriptor::Int32,
            FieldType::I64 => TypeDescriptor::Int64,
            FieldType::U8 => TypeDescriptor::Uint8,
            FieldType::U16 => TypeDescriptor::Uint16,
            FieldType::U32 => TypeDescriptor::Uint32,
            FieldType::U64 => TypeDescriptor::Uint64,
            FieldType::F32 => TypeDescriptor::Float32,
            FieldType::F64 => TypeDescriptor::Float64,
            FieldType::Timestamp => TypeDescriptor::Timestamp,
            FieldType::Text => TypeDescriptor::TextLike,
            FieldType::Json => TypeDescriptor::Dynamic,
            FieldType::Opaque => TypeDescriptor::Opaque,
            FieldType::Unit => TypeDescriptor::Unit,
            FieldType::Vec(inner) => TypeDescriptor::Sequence(self.type_ref(inner)),
            FieldType::Option(inner) => TypeDescriptor::Nullable(self.type_ref(inner)),
            FieldType::Map(value) => TypeDescriptor::Map(self.type_ref(value)),
            FieldType::Custom(name) => self
                .describe(name)
                .unwrap_or_else(|| TypeDescriptor::Unsupported(name.clone())),
            FieldType::Unsupported(ty) => TypeDescriptor::Unsupported(ty.clone()),
        }
    }
}

impl SourceType {
    fn from_struct(s: &syn::ItemStruct) -> Result<SourceType> {
        let attrs = ItemAttrs::parse(&s.attrs)?;
        let name = attrs.name.clone().unwrap_or_else(|| s.ident.to_string());

        let kind = if !s.generics.params.is_empty() {
            TypeKind::Unsupported("generic type".to_string())
        } else if attrs.opaque {
            TypeKind::Opaque
        } else if attrs.as_string {
            TypeKind::Text
        } else {
            match &s.fields {
                Fields::Named(fields) if attrs.serde.transparent => {
                    match fields.named.iter().find(|f| !is_skipped(&f.attrs)) {
                        Some(f) => TypeKind::Newtype(parse_field_type(&f.ty)),
                        None => TypeKind::Unit,
                    }
                }
                Fields::Named(fields) => struct_kind(&fields.named, &attrs)?,
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                    match fields.unnamed.first() {
                        Some(f) => TypeKind::Newtype(parse_field_type(&f.ty)),
                        None => TypeKind::Unit,
                    }
                }
                Fields::Unnamed(_) => {
                    TypeKind::Unsupported("tuple struct with several fields".to_string())
                }
                Fields::Unit => TypeKind::Unit,
            }
        };

        Ok(SourceType { name, kind })
    }

    fn from_enum(e: &syn::ItemEnum) -> Result<SourceType> {
        let attrs = ItemAttrs::parse(&e.attrs)?;
        let name = attrs.name.clone().unwrap_or_else(|| e.ident.to_string());

        let kind = if attrs.opaque {
            TypeKind::Opaque
        } else if !e.generics.params.is_empty() {
            TypeKind::Unsupported("generic type".to_string())
        } else if e.variants.iter().any(|v| !matches!(v.fields, Fields::Unit)) {
            TypeKind::Unsupported("data-carrying enum".to_string())
        } else {
            let rule = attrs.rename_rule()?;
            let mut values = Vec::new();
            for variant in &e.variants {
                let variant_attrs = ItemAttrs::parse(&variant.attrs)?;
                if variant_attrs.serde.skip {
                    continue;
                }
                let ident = unraw(&variant.ident);
                values.push(match (variant_attrs.serde.rename, rule) {
                    (Some(rename), _) => rename,
                    (None, Some(rule)) => rule.apply_to_variant(&ident),
                    (None, None) => ident,
                });
            }
            TypeKind::Enum(values)
        };

        Ok(SourceType { name, kind })
    }
}

fn struct_kind(fields: &Punctuated<syn::Field, Token![,]>, attrs: &ItemAttrs) -> Result<TypeKind> {
    let rule = attrs.rename_rule()?;
    let mut out = Vec::new();

    for f in fields {
        let field_attrs = ItemAttrs::parse(&f.attrs)?;
        if field_attrs.serde.skip {
            continue;
        }
        if field_attrs.serde.flatten {
            return Ok(TypeKind::Unsupported("flattened field".to_string()));
        }

        let name = f.ident.as_ref().map(unraw).context("Field must have a name")?;
        let external_name = match (&field_attrs.jtd_rename, &field_attrs.serde.rename, rule) {
            (Some(rename), _, _) | (None, Some(rename), _) => rename.clone(),
            (None, None, Some(rule)) => rule.apply_to_field(&name),
            (None, None, None) => name.clone(),
        };
        let ty = if field_attrs.opaque {
            FieldType::Opaque
        } else if field_attrs.as_string {
            FieldType::Text
        } else {
            parse_field_type(&f.ty)
        };

        out.push(Field {
            name,
            external_name,
            optional: field_attrs.optional || field_attrs.serde.skip_serializing_if,
            ty,
        });
    }

    Ok(TypeKind::Struct(out))
}

/// Check if an item derives `Serialize` or `Describe`.
fn is_schema_item(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .any(|path| {
            path.segments
                .last()
                .is_some_and(|s| s.ident == "Serialize" || s.ident == "Describe")
        })
}

fn is_skipped(attrs: &[Attribute]) -> bool {
    SerdeAttrs::parse(attrs).is_ok_and(|a| a.skip)
}

/// Parse a syn::Type into a FieldType.
fn parse_field_type(ty: &Type) -> FieldType {
    match ty {
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return FieldType::Unsupported(quote::quote!(#ty).to_string());
            };
            let ident = segment.ident.to_string();
            let args = type_args(segment);

            match (ident.as_str(), args.as_slice()) {
                ("String" | "str" | "char", _) => FieldType::String,
                ("bool", _) => FieldType::Bool,
                ("i8", _) => FieldType::I8,
                ("i16", _) => FieldType::I16,
                ("i32", _) => FieldType::I32,
                ("i64" | "i128" | "isize", _) => FieldType::I64,
                ("u8", _) => FieldType::U8,
                ("u16", _) => FieldType::U16,
                ("u32", _) => FieldType::U32,
                ("u64" | "u128" | "usize", _) => FieldType::U64,
                ("f32", _) => FieldType::F32,
                ("f64", _) => FieldType::F64,
                ("DateTime", _) => FieldType::Timestamp,
                ("NaiveDate" | "NaiveDateTime" | "NaiveTime", _) => FieldType::Text,
                ("Value", []) => FieldType::Json,
                ("Option", [inner]) => FieldType::Option(Box::new(parse_field_type(inner))),
                ("Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet", [inner, ..]) => {
                    FieldType::Vec(Box::new(parse_field_type(inner)))
                }
                ("HashMap" | "BTreeMap" | "Map", [key, value, ..]) => {
                    if parse_field_type(key) == FieldType::String {
                        FieldType::Map(Box::new(parse_field_type(value)))
                    } else {
                        FieldType::Unsupported(quote::quote!(#ty).to_string())
                    }
                }
                ("Box" | "Rc" | "Arc" | "Cow", [inner, ..]) => parse_field_type(inner),
                (_, []) => FieldType::Custom(ident),
                _ => FieldType::Unsupported(quote::quote!(#ty).to_string()),
            }
        }
        Type::Reference(r) => parse_field_type(&r.elem),
        Type::Slice(s) => FieldType::Vec(Box::new(parse_field_type(&s.elem))),
        Type::Array(a) => FieldType::Vec(Box::new(parse_field_type(&a.elem))),
        Type::Paren(p) => parse_field_type(&p.elem),
        Type::Group(g) => parse_field_type(&g.elem),
        Type::Tuple(t) if t.elems.is_empty() => FieldType::Unit,
        _ => FieldType::Unsupported(quote::quote!(#ty).to_string()),
    }
}

fn type_args(segment: &syn::PathSegment) -> Vec<&Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `serde` and `jtd` attributes on an item, field or variant
#[derive(Debug, Default, PartialEq)]
struct ItemAttrs {
    serde: SerdeAttrs,
    optional: bool,
    jtd_rename: Option<String>,
    name: Option<String>,
    opaque: bool,
    as_string: bool,
}

impl ItemAttrs {
    fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = Self {
            serde: SerdeAttrs::parse(attrs).context("Failed to parse #[serde] attribute")?,
            ..Self::default()
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("jtd")) {
            attr.parse_nested_meta(|meta| out.jtd_key(meta))
                .context("Failed to parse #[jtd] attribute")?;
        }

        Ok(out)
    }

    fn jtd_key(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("optional") {
            self.optional = true;
        } else if meta.path.is_ident("opaque") {
            self.opaque = true;
        } else if meta.path.is_ident("as_string") {
            self.as_string = true;
        } else if meta.path.is_ident("rename") {
            self.jtd_rename = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse::<LitStr>()?.value());
        } else {
            return Err(meta.error("unknown jtd attribute"));
        }
        Ok(())
    }

    fn rename_rule(&self) -> Result<Option<RenameRule>> {
        Ok(self.serde.rename_rule()?)
    }
}
