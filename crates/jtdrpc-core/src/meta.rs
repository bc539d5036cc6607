//! Service metadata document
//!
//! The JSON document a service publishes to describe itself: its methods,
//! each method's request and response schema, and the named definitions
//! those schemas reference. Code generators consume this document.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Method timeout applied when none is configured, in milliseconds
pub const DEFAULT_METHOD_TIMEOUT_MS: u64 = 60_000;

fn default_timeout() -> u64 {
    DEFAULT_METHOD_TIMEOUT_MS
}

/// Metadata for a whole service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub service_name: String,

    #[serde(default)]
    pub multi_arg: bool,

    #[serde(default)]
    pub help: String,

    /// Methods in declaration order
    #[serde(default)]
    pub interfaces: Vec<MethodMeta>,

    /// Definitions shared by every method schema
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Schema>,
}

/// Metadata for one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMeta {
    pub method_name: String,

    #[serde(default)]
    pub param_names: Vec<String>,

    #[serde(default = "default_timeout")]
    pub method_timeout: u64,

    #[serde(default)]
    pub help: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type_def: Option<Schema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type_def: Option<Schema>,
}

impl MethodMeta {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            param_names: Vec::new(),
            method_timeout: DEFAULT_METHOD_TIMEOUT_MS,
            help: String::new(),
            request_type_def: None,
            response_type_def: None,
        }
    }
}

impl Meta {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodMeta> {
        self.interfaces.iter().find(|m| m.method_name == name)
    }

    /// Check the document is internally consistent.
    ///
    /// Every definition and method schema must be valid JTD, every `ref`
    /// must name a shared definition, and method names must be unique.
    pub fn validate(&self) -> SchemaResult<()> {
        for (name, definition) in &self.definitions {
            definition.validate_node(&self.definitions, &format!("#/definitions/{name}"))?;
        }

        let mut seen = BTreeSet::new();
        for method in &self.interfaces {
            if !seen.insert(method.method_name.as_str()) {
                return Err(SchemaError::DuplicateMethod {
                    name: method.method_name.clone(),
                });
            }
            let path = format!("#/interfaces/{}", method.method_name);
            if let Some(request) = &method.request_type_def {
                request.validate_node(&self.definitions, &format!("{path}/requestTypeDef"))?;
            }
            if let Some(response) = &method.response_type_def {
                response.validate_node(&self.definitions, &format!("{path}/responseTypeDef"))?;
            }
        }
        Ok(())
    }
}
