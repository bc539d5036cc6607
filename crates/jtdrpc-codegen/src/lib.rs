//! jtdrpc-codegen - Go and TypeScript generation from JTD service metadata
//!
//! Generators consume a serialized [`Meta`] document, never live types, and
//! produce deterministic source text: the same document always yields
//! byte-identical output.
//!
//! # Targets
//!
//! - **Go** ([`go`]): `type` declarations for every definition, ordered so
//!   each declaration precedes its users. Discriminators are rejected.
//! - **TypeScript** ([`typescript`]): type aliases plus an RPC client class
//!   with one promise-returning method per service method.
//!
//! # Pipeline
//!
//! ```text
//! Meta (JSON)
//!     ↓
//!  validate
//!     ↓
//!  hoist inline request/response schemas
//!     ↓
//!  ├─→ [Go generator]         → types.go
//!  └─→ [TypeScript generator] → client.ts
//!     ↓
//!  write_atomic
//! ```
//!
//! # Example
//!
//! ```
//! use jtdrpc_codegen::{CodegenConfig, Target, generate};
//! use jtdrpc_core::Meta;
//!
//! let meta = Meta::from_json(r#"{
//!     "serviceName": "names",
//!     "interfaces": [
//!         {"methodName": "GetName", "responseTypeDef": {"type": "string"}}
//!     ]
//! }"#).unwrap();
//!
//! let ts = generate(Target::TypeScript, &meta, &CodegenConfig::default()).unwrap();
//! assert!(ts.contains("export type GetNameResponse = string;"));
//! ```

mod config;
mod error;
pub mod go;
pub mod naming;
pub mod normalize;
mod output;
pub mod typescript;

pub use config::{ClientFlavor, CodegenConfig, GoConfig, TypeScriptConfig};
pub use error::{CodegenError, CodegenResult};
pub use normalize::hoist_inline_types;
pub use output::write_atomic;

use jtdrpc_core::Meta;

/// Generator target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Go,
    TypeScript,
}

impl Target {
    /// Conventional file extension for generated source
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Go => "go",
            Target::TypeScript => "ts",
        }
    }
}

impl std::str::FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Target::Go),
            "ts" | "typescript" => Ok(Target::TypeScript),
            _ => Err(CodegenError::Config(format!(
                "unknown target `{s}` (expected `go` or `typescript`)"
            ))),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Go => write!(f, "go"),
            Target::TypeScript => write!(f, "typescript"),
        }
    }
}

/// Generate source for `meta` in the given target language
pub fn generate(target: Target, meta: &Meta, config: &CodegenConfig) -> CodegenResult<String> {
    match target {
        Target::Go => go::generate_meta(meta, &config.go),
        Target::TypeScript => typescript::generate_client(meta, &config.typescript),
    }
}

#[cfg(test)]
mod lib_tests;
