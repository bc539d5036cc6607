//! Error types for schema validation and type resolution

use thiserror::Error;

/// Result type alias for schema validation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type alias for type resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Classification shared by every fatal error in the generation pipeline.
///
/// All of these abort the run; the classification exists so callers (and
/// tests) can tell *why* a run was aborted without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A native type with no JTD representation
    UnsupportedType,
    /// A 64-bit integer kind (JTD has no 64-bit integers)
    Overflow64Bit,
    /// A discriminator form requested against a target that cannot express it
    UnsupportedDiscriminator,
    /// A literal could not be encoded for the target
    Encoding,
    /// A schema document violates the JTD rules
    InvalidSchema,
    /// Reading input or committing output failed
    Io,
    /// Generator configuration could not be loaded
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::Overflow64Bit => "64-bit integer",
            ErrorKind::UnsupportedDiscriminator => "unsupported discriminator",
            ErrorKind::Encoding => "encoding",
            ErrorKind::InvalidSchema => "invalid schema",
            ErrorKind::Io => "io",
            ErrorKind::Config => "config",
        };
        f.write_str(s)
    }
}

/// Error raised when a schema document violates the JSON Type Definition rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// More than one form's keywords are populated on the same node
    #[error("schema at {path} mixes forms: {}", .keywords.join(", "))]
    AmbiguousForm {
        path: String,
        keywords: Vec<&'static str>,
    },

    /// `definitions` appears below the root
    #[error("schema at {path} declares definitions below the root")]
    DefinitionsNotAtRoot { path: String },

    /// A `ref` names a definition that does not exist
    #[error("schema at {path} refers to undefined definition `{name}`")]
    UnresolvedRef { path: String, name: String },

    /// A form keyword without its companion keyword
    #[error("schema at {path} uses `{keyword}` without `{missing}`")]
    IncompleteForm {
        path: String,
        keyword: &'static str,
        missing: &'static str,
    },

    /// An enum form without any values
    #[error("schema at {path} has an empty enum")]
    EmptyEnum { path: String },

    /// An enum form listing the same value twice
    #[error("schema at {path} repeats enum value `{value}`")]
    DuplicateEnumValue { path: String, value: String },

    /// A key that is both required and optional
    #[error("schema at {path} declares `{key}` as both required and optional")]
    PropertyConflict { path: String, key: String },

    /// A discriminator mapping entry that is not a usable variant
    #[error("discriminator mapping `{tag}` at {path} is invalid: {reason}")]
    InvalidMapping {
        path: String,
        tag: String,
        reason: &'static str,
    },

    /// Schema JSON could not be parsed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Two methods of one service share a name
    #[error("method `{name}` is declared more than once")]
    DuplicateMethod { name: String },
}

impl SchemaError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            SchemaError::AmbiguousForm { .. } => 1,
            SchemaError::DefinitionsNotAtRoot { .. } => 2,
            SchemaError::UnresolvedRef { .. } => 3,
            SchemaError::IncompleteForm { .. } => 4,
            SchemaError::EmptyEnum { .. } => 5,
            SchemaError::DuplicateEnumValue { .. } => 6,
            SchemaError::PropertyConflict { .. } => 7,
            SchemaError::InvalidMapping { .. } => 8,
            SchemaError::Serialization(_) => 9,
            SchemaError::DuplicateMethod { .. } => 10,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidSchema
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Serialization(err.to_string())
    }
}

/// Error raised while turning a type descriptor into a schema.
///
/// `path` names the field chain that led to the offending type, outermost
/// first (e.g. `Order.lines.quantity`). It is empty for a root type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The descriptor has a kind with no JTD representation
    #[error("unsupported type `{type_name}`{}", at(.path))]
    UnsupportedType { type_name: String, path: String },

    /// 64-bit integers cannot be represented in JTD
    #[error("64-bit integer type `{type_name}` is not supported{}", at(.path))]
    Overflow64Bit { type_name: String, path: String },
}

fn at(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (at {path})")
    }
}

impl ResolveError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            ResolveError::UnsupportedType { .. } => 20,
            ResolveError::Overflow64Bit { .. } => 21,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            ResolveError::Overflow64Bit { .. } => ErrorKind::Overflow64Bit,
        }
    }

    /// The field chain leading to the offending type
    pub fn path(&self) -> &str {
        match self {
            ResolveError::UnsupportedType { path, .. }
            | ResolveError::Overflow64Bit { path, .. } => path,
        }
    }

    /// Prepend a path segment while the error unwinds out of a field
    pub(crate) fn in_segment(mut self, segment: &str) -> Self {
        let path = match &mut self {
            ResolveError::UnsupportedType { path, .. }
            | ResolveError::Overflow64Bit { path, .. } => path,
        };
        *path = if path.is_empty() {
            segment.to_string()
        } else {
            format!("{segment}.{path}")
        };
        self
    }
}
