//! jtdrpc-core - Schema model, type resolution and service metadata
//!
//! This crate provides the foundational types for describing RPC services
//! with JSON Type Definition:
//! - [`Schema`] - the JTD schema model and its validation rules
//! - [`Describe`] and [`TypeDescriptor`] - how native types report their shape
//! - [`Registry`] and [`resolve`] - turning descriptors into named definitions
//! - [`Meta`] and [`ServiceBuilder`] - the service metadata document

mod descriptor;
mod error;
mod meta;
mod registry;
mod resolver;
mod schema;
mod service;

pub use descriptor::{
    Describe, EnumDescriptor, FieldDescriptor, NewtypeDescriptor, StructDescriptor,
    TypeDescriptor, TypeIdentity, TypeRef,
};
pub use error::{ErrorKind, ResolveError, ResolveResult, SchemaError, SchemaResult};
pub use meta::{DEFAULT_METHOD_TIMEOUT_MS, Meta, MethodMeta};
pub use registry::{NamedDefinition, Registry};
pub use resolver::resolve;
pub use schema::{Form, Schema, TypeTag, VOID_METADATA_KEY};
pub use service::{MethodOptions, ServiceBuilder};

/// Diagnostic verbosity, most verbose first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(format!("unknown log level `{other}`")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Describe, LogLevel, Meta, MethodMeta, MethodOptions, Registry, ResolveError,
        ResolveResult, Schema, SchemaError, SchemaResult, ServiceBuilder, TypeDescriptor, TypeTag,
    };
}
