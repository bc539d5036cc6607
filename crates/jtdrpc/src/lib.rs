//! # jtdrpc
//!
//! Describe the request and response types of an RPC service as JSON Type
//! Definition schemas, publish them as a metadata document, and generate
//! Go or TypeScript clients from that document.
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! jtdrpc = "0.3"
//! jtdrpc-core = "0.3"
//! ```
//!
//! `#[derive(Describe)]` expands to paths under `jtdrpc_core`, so that crate
//! must be a direct dependency as well.
//!
//! ## Describing a Service
//!
//! ```ignore
//! use jtdrpc::prelude::*;
//!
//! #[derive(Debug, Serialize, Deserialize, Describe)]
//! #[serde(rename_all = "camelCase")]
//! pub struct GetUserRequest {
//!     pub user_id: String,
//! }
//!
//! #[derive(Debug, Serialize, Deserialize, Describe)]
//! pub struct User {
//!     pub name: String,
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub email: Option<String>,
//! }
//!
//! let mut builder = ServiceBuilder::new("users").help("User directory");
//! builder.method::<GetUserRequest, User>("getUser", MethodOptions::new())?;
//! let meta = builder.build();
//!
//! let client = generate(Target::TypeScript, &meta, &CodegenConfig::default())?;
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`jtdrpc_core`] - Schema model, descriptors, resolver and metadata
//! - [`jtdrpc_macros`] - `#[derive(Describe)]`
//! - [`jtdrpc_codegen`] - Go and TypeScript generators

// Re-export core types
pub use jtdrpc_core::{
    Describe, ErrorKind, Form, LogLevel, Meta, MethodMeta, MethodOptions, Registry, ResolveError,
    ResolveResult, Schema, SchemaError, SchemaResult, ServiceBuilder, TypeDescriptor, TypeTag,
    resolve,
};

// Re-export the derive; it shares its name with the trait
pub use jtdrpc_macros::Describe;

// Re-export generators
pub use jtdrpc_codegen::{
    ClientFlavor, CodegenConfig, CodegenError, CodegenResult, GoConfig, Target, TypeScriptConfig,
    generate, write_atomic,
};

// Re-export common dependencies that service authors need
pub use serde;
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use jtdrpc::prelude::*;` to import commonly used types.
///
/// This includes:
/// - The `Describe` trait and derive
/// - Service building: `ServiceBuilder`, `MethodOptions`, `Meta`
/// - Generation: `generate`, `Target`, `CodegenConfig`
/// - Serde derives: `Serialize`, `Deserialize`
pub mod prelude {
    pub use crate::{
        CodegenConfig, Describe, Meta, MethodOptions, Schema, ServiceBuilder, Target, generate,
    };

    // Serde derives (commonly needed for described types)
    pub use serde::{Deserialize, Serialize};
}
