//! Generator configuration, read from `jtdrpc.toml`

use crate::error::{CodegenError, CodegenResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for every generator target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    #[serde(default)]
    pub typescript: TypeScriptConfig,

    #[serde(default)]
    pub go: GoConfig,
}

/// Which RPC client base class generated TypeScript extends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientFlavor {
    /// `RPCContextClient`; every method takes a `ctx: Context` first
    #[default]
    Context,
    /// `RPCClient`; methods take only the request
    Plain,
}

impl std::str::FromStr for ClientFlavor {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "context" => Ok(ClientFlavor::Context),
            "plain" => Ok(ClientFlavor::Plain),
            _ => Err(CodegenError::Config(format!(
                "unknown client flavor `{s}` (expected `context` or `plain`)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeScriptConfig {
    #[serde(default)]
    pub flavor: ClientFlavor,

    /// Module the client base class is imported from
    #[serde(default = "default_client_module")]
    pub client_module: String,

    /// Module `Context` is imported from (context flavor only)
    #[serde(default = "default_context_module")]
    pub context_module: String,
}

fn default_client_module() -> String {
    "@loke/http-rpc-client".to_string()
}

fn default_context_module() -> String {
    "@loke/context".to_string()
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            flavor: ClientFlavor::default(),
            client_module: default_client_module(),
            context_module: default_context_module(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoConfig {
    /// Package clause; omitted when unset
    #[serde(default)]
    pub package: Option<String>,

    /// Type name for a non-empty root schema
    #[serde(default = "default_root_type")]
    pub root_type: String,
}

fn default_root_type() -> String {
    "Root".to_string()
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            package: None,
            root_type: default_root_type(),
        }
    }
}

impl CodegenConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> CodegenResult<Self> {
        Ok(toml::from_str(content)?)
    }
}
