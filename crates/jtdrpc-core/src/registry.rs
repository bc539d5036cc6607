//! Registry of named definitions
//!
//! Maps each native type identity to a unique definition name. Names are
//! handed out in first-seen order: the first type declared `Flag` keeps the
//! bare name, later distinct types with the same declared name become
//! `Flag2`, `Flag3`, and so on.

use crate::descriptor::{Describe, TypeIdentity};
use crate::error::ResolveResult;
use crate::schema::Schema;
use std::collections::{BTreeMap, HashMap};

/// Name used when a type declares an empty name
const ANONYMOUS_NAME: &str = "Anonymous";

/// A registered definition.
///
/// `schema` is `None` while the type's body is still being resolved; a
/// recursive reference seen in that window resolves to the name alone.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedDefinition {
    pub name: String,
    pub schema: Option<Schema>,
}

/// Identity-to-definition table shared by every type resolved for a service
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_path: HashMap<String, NamedDefinition>,
    taken: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a describable type into a schema, registering every named type
    /// it reaches.
    pub fn resolve<T: Describe + ?Sized>(&mut self) -> ResolveResult<Schema> {
        crate::resolver::resolve(&T::describe(), self)
    }

    /// Definition name already assigned to `identity`, if any
    pub fn name_of(&self, identity: &TypeIdentity) -> Option<&str> {
        self.by_path.get(&identity.path).map(|d| d.name.as_str())
    }

    /// Assign a unique name to `identity` and record it as pending.
    ///
    /// Returns the existing name when the identity is already registered.
    pub fn reserve(&mut self, identity: &TypeIdentity) -> String {
        if let Some(name) = self.name_of(identity) {
            return name.to_string();
        }

        let base = if identity.name.is_empty() {
            ANONYMOUS_NAME
        } else {
            identity.name.as_str()
        };
        let mut name = base.to_string();
        let mut suffix = 2u32;
        while self.taken.contains_key(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }

        if name != base {
            tracing::debug!(
                "Name {} already taken, registering {} as {}",
                base,
                identity.path,
                name
            );
        }

        self.taken.insert(name.clone(), identity.path.clone());
        self.by_path.insert(
            identity.path.clone(),
            NamedDefinition {
                name: name.clone(),
                schema: None,
            },
        );
        name
    }

    /// Store the resolved body of a reserved identity
    pub fn complete(&mut self, identity: &TypeIdentity, schema: Schema) {
        if let Some(definition) = self.by_path.get_mut(&identity.path) {
            definition.schema = Some(schema);
        }
    }

    /// Drop a reservation whose body failed to resolve
    pub fn release(&mut self, identity: &TypeIdentity) {
        if let Some(definition) = self.by_path.remove(&identity.path) {
            self.taken.remove(&definition.name);
        }
    }

    /// Completed definition registered under `name`
    pub fn get(&self, name: &str) -> Option<&Schema> {
        let path = self.taken.get(name)?;
        self.by_path.get(path)?.schema.as_ref()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Every completed definition, keyed and ordered by name
    pub fn definitions(&self) -> BTreeMap<String, Schema> {
        self.by_path
            .values()
            .filter_map(|d| d.schema.clone().map(|s| (d.name.clone(), s)))
            .collect()
    }

    pub fn into_definitions(self) -> BTreeMap<String, Schema> {
        self.by_path
            .into_values()
            .filter_map(|d| d.schema.map(|s| (d.name, s)))
            .collect()
    }
}
