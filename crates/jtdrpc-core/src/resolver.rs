//! Type resolver
//!
//! Turns a [`TypeDescriptor`] into a JTD [`Schema`]. Named records and named
//! enums become definitions in the [`Registry`] and are referenced by name;
//! everything else is inlined.
//!
//! A named type is reserved in the registry *before* its fields are resolved,
//! so a field that leads back to the type itself resolves to a `ref` and the
//! recursion terminates. Newtypes are inlined, except that a newtype whose
//! inner type leads back to itself is promoted to a definition.

use crate::descriptor::{EnumDescriptor, NewtypeDescriptor, StructDescriptor, TypeDescriptor};
use crate::error::{ResolveError, ResolveResult};
use crate::registry::Registry;
use crate::schema::{Schema, TypeTag};
use std::collections::{BTreeMap, HashSet};

/// Resolve a descriptor, registering any named types it reaches.
///
/// Resolution is all or nothing: on error the registry is left exactly as it
/// was before the call.
pub fn resolve(descriptor: &TypeDescriptor, registry: &mut Registry) -> ResolveResult<Schema> {
    let snapshot = registry.clone();
    let result = Resolver::new(registry).resolve(descriptor);
    if result.is_err() {
        *registry = snapshot;
    }
    result
}

struct Resolver<'r> {
    registry: &'r mut Registry,
    /// Newtypes whose inner type is currently being resolved
    expanding: HashSet<String>,
}

impl<'r> Resolver<'r> {
    fn new(registry: &'r mut Registry) -> Self {
        Self {
            registry,
            expanding: HashSet::new(),
        }
    }

    fn resolve(&mut self, descriptor: &TypeDescriptor) -> ResolveResult<Schema> {
        let schema = match descriptor {
            TypeDescriptor::Bool => Schema::of_type(TypeTag::Boolean),
            TypeDescriptor::String | TypeDescriptor::TextLike => Schema::of_type(TypeTag::String),
            TypeDescriptor::Timestamp => Schema::of_type(TypeTag::Timestamp),
            TypeDescriptor::Int8 => Schema::of_type(TypeTag::Int8),
            TypeDescriptor::Int16 => Schema::of_type(TypeTag::Int16),
            TypeDescriptor::Int32 => Schema::of_type(TypeTag::Int32),
            TypeDescriptor::Uint8 => Schema::of_type(TypeTag::Uint8),
            TypeDescriptor::Uint16 => Schema::of_type(TypeTag::Uint16),
            TypeDescriptor::Uint32 => Schema::of_type(TypeTag::Uint32),
            TypeDescriptor::Float32 => Schema::of_type(TypeTag::Float32),
            TypeDescriptor::Float64 => Schema::of_type(TypeTag::Float64),
            TypeDescriptor::Int64 | TypeDescriptor::Uint64 => {
                return Err(ResolveError::Overflow64Bit {
                    type_name: descriptor.type_name(),
                    path: String::new(),
                });
            }
            TypeDescriptor::Nullable(inner) => self.resolve(&inner.get())?.with_nullable(true),
            TypeDescriptor::Sequence(items) => {
                Schema::elements(self.resolve(&items.get())?).with_nullable(true)
            }
            TypeDescriptor::Map(values) => {
                Schema::values(self.resolve(&values.get())?).with_nullable(true)
            }
            TypeDescriptor::Struct(record) => self.resolve_struct(record)?,
            TypeDescriptor::Enum(enumeration) => self.resolve_enum(enumeration),
            TypeDescriptor::Newtype(newtype) => self.resolve_newtype(newtype)?,
            TypeDescriptor::Opaque | TypeDescriptor::Dynamic => Schema::empty(),
            TypeDescriptor::Unit => Schema::void(),
            TypeDescriptor::Unsupported(name) => {
                return Err(ResolveError::UnsupportedType {
                    type_name: name.clone(),
                    path: String::new(),
                });
            }
        };
        Ok(schema)
    }

    fn resolve_struct(&mut self, record: &StructDescriptor) -> ResolveResult<Schema> {
        let Some(identity) = &record.identity else {
            return self.resolve_fields(record);
        };

        if let Some(name) = self.registry.name_of(identity) {
            return Ok(Schema::reference(name));
        }

        let name = self.registry.reserve(identity);
        tracing::debug!("Registered definition {} for {}", name, identity.path);

        match self.resolve_fields(record) {
            Ok(body) => {
                self.registry.complete(identity, body);
                Ok(Schema::reference(name))
            }
            Err(e) => {
                self.registry.release(identity);
                Err(e)
            }
        }
    }

    fn resolve_fields(&mut self, record: &StructDescriptor) -> ResolveResult<Schema> {
        let mut required = BTreeMap::new();
        let mut optional = BTreeMap::new();

        for field in &record.fields {
            let key = field.external_name();
            let descriptor = field.ty.get();

            // Absence already stands in for null, so an optional field drops
            // one nullable layer.
            let value = match (&descriptor, field.optional) {
                (TypeDescriptor::Nullable(inner), true) => self.resolve(&inner.get()),
                _ => self.resolve(&descriptor),
            }
            .map_err(|e| e.in_segment(key))?;

            if field.optional {
                required.remove(key);
                optional.insert(key.to_string(), value);
            } else {
                optional.remove(key);
                required.insert(key.to_string(), value);
            }
        }

        Ok(Schema::properties(required, optional))
    }

    fn resolve_enum(&mut self, enumeration: &EnumDescriptor) -> Schema {
        let body = Schema::enumeration(enumeration.values.iter().cloned());
        let Some(identity) = &enumeration.identity else {
            return body;
        };

        if let Some(name) = self.registry.name_of(identity) {
            return Schema::reference(name);
        }

        let name = self.registry.reserve(identity);
        tracing::debug!("Registered enum definition {} for {}", name, identity.path);
        self.registry.complete(identity, body);
        Schema::reference(name)
    }

    /// A newtype is inlined unless its inner type reaches the newtype again.
    /// Re-entry reserves a definition name, and the outer call then stores
    /// the inner schema under it.
    fn resolve_newtype(&mut self, newtype: &NewtypeDescriptor) -> ResolveResult<Schema> {
        let identity = &newtype.identity;

        if let Some(name) = self.registry.name_of(identity) {
            return Ok(Schema::reference(name));
        }

        if self.expanding.contains(&identity.path) {
            let name = self.registry.reserve(identity);
            tracing::debug!("Registered recursive newtype {} for {}", name, identity.path);
            return Ok(Schema::reference(name));
        }

        self.expanding.insert(identity.path.clone());
        let body = self.resolve(&newtype.inner.get());
        self.expanding.remove(&identity.path);
        let body = body?;

        match self.registry.name_of(identity).map(str::to_string) {
            Some(name) => {
                self.registry.complete(identity, body);
                Ok(Schema::reference(name))
            }
            None => Ok(body),
        }
    }
}
