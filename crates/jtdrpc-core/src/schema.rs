//! JSON Type Definition schema model
//!
//! [`Schema`] mirrors the JTD wire shape one-to-one so documents round-trip
//! through serde unchanged. Because the wire shape can express invalid
//! combinations (e.g. both `ref` and `type`), the populated form is read
//! through [`Schema::form`], and whole documents are checked with
//! [`Schema::validate`].
//!
//! Mappings are [`BTreeMap`]s, so serialized JSON and every iteration over
//! properties, definitions or mapping tags is sorted and deterministic.

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Metadata key flagging a response that carries no meaningful payload
pub const VOID_METADATA_KEY: &str = "void";

static NO_PROPERTIES: BTreeMap<String, Schema> = BTreeMap::new();

/// Primitive tags of the `type` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Boolean,
    String,
    Timestamp,
    Float32,
    Float64,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::String => "string",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
            TypeTag::Int8 => "int8",
            TypeTag::Uint8 => "uint8",
            TypeTag::Int16 => "int16",
            TypeTag::Uint16 => "uint16",
            TypeTag::Int32 => "int32",
            TypeTag::Uint32 => "uint32",
        }
    }

    /// True for every integer and floating point tag
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            TypeTag::Boolean | TypeTag::String | TypeTag::Timestamp
        )
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON Type Definition schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Named reusable schemas; only meaningful on the root node
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Schema>,

    /// Free-form annotations, ignored by validation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,

    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeTag>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_properties: Option<BTreeMap<String, Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<String, Schema>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Borrowed view of the single form a [`Schema`] node takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Form<'a> {
    Empty,
    Ref(&'a str),
    Type(TypeTag),
    Enum(&'a [String]),
    Elements(&'a Schema),
    Properties {
        required: &'a BTreeMap<String, Schema>,
        optional: &'a BTreeMap<String, Schema>,
        additional: bool,
    },
    Values(&'a Schema),
    Discriminator {
        tag: &'a str,
        mapping: &'a BTreeMap<String, Schema>,
    },
}

impl Form<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Form::Empty => "empty",
            Form::Ref(_) => "ref",
            Form::Type(_) => "type",
            Form::Enum(_) => "enum",
            Form::Elements(_) => "elements",
            Form::Properties { .. } => "properties",
            Form::Values(_) => "values",
            Form::Discriminator { .. } => "discriminator",
        }
    }
}

impl Schema {
    /// Schema accepting any value
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of_type(tag: TypeTag) -> Self {
        Self {
            ty: Some(tag),
            ..Self::default()
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            reference: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn elements(items: Schema) -> Self {
        Self {
            elements: Some(Box::new(items)),
            ..Self::default()
        }
    }

    pub fn values(values: Schema) -> Self {
        Self {
            values: Some(Box::new(values)),
            ..Self::default()
        }
    }

    /// Record schema. `optionalProperties` is only populated when non-empty.
    pub fn properties(
        required: BTreeMap<String, Schema>,
        optional: BTreeMap<String, Schema>,
    ) -> Self {
        Self {
            properties: Some(required),
            optional_properties: (!optional.is_empty()).then_some(optional),
            ..Self::default()
        }
    }

    pub fn discriminator(tag: impl Into<String>, mapping: BTreeMap<String, Schema>) -> Self {
        Self {
            discriminator: Some(tag.into()),
            mapping: Some(mapping),
            ..Self::default()
        }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enumeration: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Empty schema flagged as carrying no meaningful payload
    pub fn void() -> Self {
        Self::empty().with_metadata(VOID_METADATA_KEY, Value::Bool(true))
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_definitions(mut self, definitions: BTreeMap<String, Schema>) -> Self {
        self.definitions = definitions;
        self
    }

    /// True when metadata marks this schema as a payload-less response
    pub fn is_void(&self) -> bool {
        matches!(self.metadata.get(VOID_METADATA_KEY), Some(Value::Bool(true)))
    }

    /// Parse a schema document
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The form this node takes.
    ///
    /// Fails when keywords of more than one form are populated, or when a
    /// form is missing its companion keyword.
    pub fn form(&self) -> SchemaResult<Form<'_>> {
        self.form_at("#")
    }

    fn form_at(&self, path: &str) -> SchemaResult<Form<'_>> {
        let mut keywords = Vec::new();
        if self.reference.is_some() {
            keywords.push("ref");
        }
        if self.ty.is_some() {
            keywords.push("type");
        }
        if self.enumeration.is_some() {
            keywords.push("enum");
        }
        if self.elements.is_some() {
            keywords.push("elements");
        }
        if self.properties.is_some() || self.optional_properties.is_some() {
            keywords.push("properties");
        }
        if self.values.is_some() {
            keywords.push("values");
        }
        if self.discriminator.is_some() || self.mapping.is_some() {
            keywords.push("discriminator");
        }

        if keywords.len() > 1 {
            return Err(SchemaError::AmbiguousForm {
                path: path.to_string(),
                keywords,
            });
        }

        if self.additional_properties.is_some()
            && self.properties.is_none()
            && self.optional_properties.is_none()
        {
            return Err(SchemaError::IncompleteForm {
                path: path.to_string(),
                keyword: "additionalProperties",
                missing: "properties",
            });
        }

        if let Some(name) = &self.reference {
            return Ok(Form::Ref(name));
        }
        if let Some(tag) = self.ty {
            return Ok(Form::Type(tag));
        }
        if let Some(values) = &self.enumeration {
            return Ok(Form::Enum(values));
        }
        if let Some(items) = &self.elements {
            return Ok(Form::Elements(items));
        }
        if self.properties.is_some() || self.optional_properties.is_some() {
            return Ok(Form::Properties {
                required: self.properties.as_ref().unwrap_or(&NO_PROPERTIES),
                optional: self.optional_properties.as_ref().unwrap_or(&NO_PROPERTIES),
                additional: self.additional_properties.unwrap_or(false),
            });
        }
        if let Some(values) = &self.values {
            return Ok(Form::Values(values));
        }
        match (&self.discriminator, &self.mapping) {
            (Some(tag), Some(mapping)) => Ok(Form::Discriminator { tag, mapping }),
            (Some(_), None) => Err(SchemaError::IncompleteForm {
                path: path.to_string(),
                keyword: "discriminator",
                missing: "mapping",
            }),
            (None, Some(_)) => Err(SchemaError::IncompleteForm {
                path: path.to_string(),
                keyword: "mapping",
                missing: "discriminator",
            }),
            (None, None) => Ok(Form::Empty),
        }
    }

    /// Validate this node as the root of a schema document.
    ///
    /// Every `ref` must name one of this node's `definitions`.
    pub fn validate(&self) -> SchemaResult<()> {
        for (name, definition) in &self.definitions {
            definition.validate_node(&self.definitions, &format!("#/definitions/{name}"))?;
        }
        self.validate_body(&self.definitions, "#")
    }

    /// Validate this node against definitions held elsewhere (e.g. a service's
    /// shared definitions). The node itself may not declare definitions.
    pub fn validate_against(&self, definitions: &BTreeMap<String, Schema>) -> SchemaResult<()> {
        self.validate_node(definitions, "#")
    }

    pub(crate) fn validate_node(
        &self,
        definitions: &BTreeMap<String, Schema>,
        path: &str,
    ) -> SchemaResult<()> {
        if !self.definitions.is_empty() {
            return Err(SchemaError::DefinitionsNotAtRoot {
                path: path.to_string(),
            });
        }
        self.validate_body(definitions, path)
    }

    fn validate_body(
        &self,
        definitions: &BTreeMap<String, Schema>,
        path: &str,
    ) -> SchemaResult<()> {
        match self.form_at(path)? {
            Form::Empty | Form::Type(_) => Ok(()),
            Form::Ref(name) => {
                if definitions.contains_key(name) {
                    Ok(())
                } else {
                    Err(SchemaError::UnresolvedRef {
                        path: path.to_string(),
                        name: name.to_string(),
                    })
                }
            }
            Form::Enum(values) => {
                if values.is_empty() {
                    return Err(SchemaError::EmptyEnum {
                        path: path.to_string(),
                    });
                }
                let mut seen = BTreeSet::new();
                for value in values {
                    if !seen.insert(value.as_str()) {
                        return Err(SchemaError::DuplicateEnumValue {
                            path: path.to_string(),
                            value: value.clone(),
                        });
                    }
                }
                Ok(())
            }
            Form::Elements(items) => items.validate_node(definitions, &format!("{path}/elements")),
            Form::Values(values) => values.validate_node(definitions, &format!("{path}/values")),
            Form::Properties {
                required, optional, ..
            } => {
                for (key, schema) in required {
                    if optional.contains_key(key) {
                        return Err(SchemaError::PropertyConflict {
                            path: path.to_string(),
                            key: key.clone(),
                        });
                    }
                    schema.validate_node(definitions, &format!("{path}/properties/{key}"))?;
                }
                for (key, schema) in optional {
                    schema.validate_node(
                        definitions,
                        &format!("{path}/optionalProperties/{key}"),
                    )?;
                }
                Ok(())
            }
            Form::Discriminator { tag, mapping } => {
                for (value, variant) in mapping {
                    let variant_path = format!("{path}/mapping/{value}");
                    let invalid = |reason| SchemaError::InvalidMapping {
                        path: path.to_string(),
                        tag: value.clone(),
                        reason,
                    };

                    let Form::Properties {
                        required, optional, ..
                    } = variant.form_at(&variant_path)?
                    else {
                        return Err(invalid("variant must use the properties form"));
                    };
                    if variant.nullable {
                        return Err(invalid("variant must not be nullable"));
                    }
                    if required.contains_key(tag) || optional.contains_key(tag) {
                        return Err(invalid("variant redeclares the discriminator"));
                    }
                    variant.validate_node(definitions, &variant_path)?;
                }
                Ok(())
            }
        }
    }

    /// Names of every definition referenced from this node or below
    pub fn references(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        if let Some(name) = &self.reference {
            out.insert(name);
        }
        for child in self.children() {
            child.collect_references(out);
        }
    }

    /// Direct sub-schemas of this node, excluding definitions
    pub fn children(&self) -> impl Iterator<Item = &Schema> {
        let maps = [
            self.properties.as_ref(),
            self.optional_properties.as_ref(),
            self.mapping.as_ref(),
        ];
        self.elements
            .as_deref()
            .into_iter()
            .chain(self.values.as_deref())
            .chain(maps.into_iter().flatten().flat_map(|m| m.values()))
    }
}
