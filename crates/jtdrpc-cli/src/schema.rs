//! Schema inference command
//!
//! Resolves types scanned from a source file into one shared set of
//! definitions and prints them as a JSON document:
//!
//! ```json
//! {
//!   "definitions": { "Customer": { ... } },
//!   "schemas": { "Order": { "ref": "Order" } }
//! }
//! ```

use crate::source::SourceCatalog;
use anyhow::{Context, Result};
use jtdrpc_codegen::write_atomic;
use jtdrpc_core::{Registry, Schema, resolve};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inferred schemas sharing one definition table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InferredSchemas {
    pub definitions: BTreeMap<String, Schema>,
    pub schemas: BTreeMap<String, Schema>,
}

/// Resolve `types` (every describable type when empty) from `catalog`
pub fn infer(catalog: SourceCatalog, types: &[String]) -> Result<InferredSchemas> {
    let catalog = Arc::new(catalog);
    let requested: Vec<String> = if types.is_empty() {
        catalog.idents().map(str::to_string).collect()
    } else {
        types.to_vec()
    };

    let mut registry = Registry::new();
    let mut schemas = BTreeMap::new();

    for ident in requested {
        let descriptor = catalog
            .describe(&ident)
            .with_context(|| format!("Type '{}' not found in source", ident))?;

        match resolve(&descriptor, &mut registry) {
            Ok(schema) => {
                schemas.insert(ident, schema);
            }
            Err(e) if types.is_empty() => {
                tracing::warn!(error = %e, "Skipping {}", ident);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to infer schema for '{}'", ident));
            }
        }
    }

    Ok(InferredSchemas {
        definitions: registry.into_definitions(),
        schemas,
    })
}

/// Schema command implementation
pub fn run(source: &Path, types: &[String], output: Option<PathBuf>) -> Result<()> {
    let catalog = SourceCatalog::parse_file(source)?;
    tracing::debug!("Scanned {} types from {}", catalog.len(), source.display());

    let inferred = infer(catalog, types)?;
    let json = serde_json::to_string_pretty(&inferred).context("Failed to serialize schemas")?;

    match output {
        Some(path) => {
            write_atomic(&path, format!("{json}\n").as_bytes())?;
            tracing::info!(
                definitions = inferred.definitions.len(),
                "Wrote {}",
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
