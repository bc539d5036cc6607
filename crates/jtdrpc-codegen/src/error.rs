//! Error types for code generation

use jtdrpc_core::{ErrorKind, SchemaError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for code generation
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Error raised while generating or committing target source
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The target's type system cannot express a discriminated union
    #[error("discriminator `{tag}` is not supported by the {target} generator")]
    UnsupportedDiscriminator { target: &'static str, tag: String },

    /// A literal could not be encoded as target source
    #[error("failed to encode literal: {0}")]
    Encoding(String),

    /// The service metadata document is not valid
    #[error("invalid service metadata: {0}")]
    InvalidMeta(#[from] SchemaError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generator configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Two definition names declare the same target type
    #[error("definitions `{first}` and `{second}` both declare type `{declared}`")]
    DuplicateTypeName {
        declared: String,
        first: String,
        second: String,
    },
}

impl CodegenError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CodegenError::UnsupportedDiscriminator { .. } => 30,
            CodegenError::Encoding(_) => 31,
            CodegenError::InvalidMeta(_) => 32,
            CodegenError::Io { .. } => 33,
            CodegenError::Config(_) => 34,
            CodegenError::DuplicateTypeName { .. } => 35,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CodegenError::UnsupportedDiscriminator { .. } => ErrorKind::UnsupportedDiscriminator,
            CodegenError::Encoding(_) => ErrorKind::Encoding,
            CodegenError::InvalidMeta(_) => ErrorKind::InvalidSchema,
            CodegenError::Io { .. } => ErrorKind::Io,
            CodegenError::Config(_) => ErrorKind::Config,
            CodegenError::DuplicateTypeName { .. } => ErrorKind::InvalidSchema,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::Encoding(err.to_string())
    }
}

impl From<toml::de::Error> for CodegenError {
    fn from(err: toml::de::Error) -> Self {
        CodegenError::Config(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
