//! Client and type generation command

use anyhow::{Context, Result};
use jtdrpc_codegen::{ClientFlavor, CodegenConfig, Target, generate, write_atomic};
use jtdrpc_core::Meta;
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "jtdrpc.toml";

/// Command-line overrides applied on top of the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub flavor: Option<ClientFlavor>,
    pub client_module: Option<String>,
    pub context_module: Option<String>,
    pub package: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut CodegenConfig) {
        if let Some(flavor) = self.flavor {
            config.typescript.flavor = flavor;
        }
        if let Some(module) = self.client_module {
            config.typescript.client_module = module;
        }
        if let Some(module) = self.context_module {
            config.typescript.context_module = module;
        }
        if let Some(package) = self.package {
            config.go.package = Some(package);
        }
    }
}

/// Load generator configuration.
///
/// An explicit path must exist; otherwise `jtdrpc.toml` in the working
/// directory is used when present, and defaults when not.
pub fn load_config(path: Option<&Path>) -> Result<CodegenConfig> {
    match path {
        Some(path) => CodegenConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            tracing::debug!("Using {} from working directory", DEFAULT_CONFIG_FILE);
            CodegenConfig::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load config: {}", DEFAULT_CONFIG_FILE))
        }
        None => Ok(CodegenConfig::default()),
    }
}

/// Read and parse a service metadata document
pub fn load_meta(path: &Path) -> Result<Meta> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;

    Meta::from_json(&content)
        .with_context(|| format!("Failed to parse metadata: {}", path.display()))
}

/// Generate source for `meta` with the resolved configuration
pub fn render(target: Target, meta: &Meta, config: &CodegenConfig) -> Result<String> {
    generate(target, meta, config)
        .with_context(|| format!("Failed to generate {} for {}", target, meta.service_name))
}

/// Generate command implementation
pub fn run(
    target: Target,
    meta_path: &Path,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> Result<()> {
    let meta = load_meta(meta_path)?;
    let mut config = load_config(config_path.as_deref())?;
    overrides.apply(&mut config);

    let source = render(target, &meta, &config)?;

    match output {
        Some(path) => {
            write_atomic(&path, source.as_bytes())?;
            tracing::info!(
                target_lang = %target,
                bytes = source.len(),
                "Wrote {}",
                path.display()
            );
        }
        None => print!("{}", source),
    }

    Ok(())
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
