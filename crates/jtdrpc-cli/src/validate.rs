//! Metadata validation command

use crate::generate::load_meta;
use anyhow::{Context, Result};
use jtdrpc_core::Meta;
use std::path::Path;

/// Counts reported after a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub service_name: String,
    pub methods: usize,
    pub definitions: usize,
    pub void_methods: usize,
}

impl Summary {
    fn of(meta: &Meta) -> Self {
        Self {
            service_name: meta.service_name.clone(),
            methods: meta.interfaces.len(),
            definitions: meta.definitions.len(),
            void_methods: meta
                .interfaces
                .iter()
                .filter(|m| m.response_type_def.as_ref().is_none_or(|s| s.is_void()))
                .count(),
        }
    }
}

/// Validate a parsed document
pub fn check_meta(meta: &Meta) -> Result<Summary> {
    meta.validate()
        .with_context(|| format!("Service '{}' is invalid", meta.service_name))?;

    Ok(Summary::of(meta))
}

/// Validate command implementation
pub fn check(path: &Path) -> Result<()> {
    println!("Checking metadata: {}", path.display());

    let meta = load_meta(path)?;
    let summary = check_meta(&meta)?;

    println!("✓ Service: {}", summary.service_name);
    println!(
        "✓ Methods: {} ({} without response)",
        summary.methods, summary.void_methods
    );
    println!("✓ Definitions: {}", summary.definitions);
    println!("\nMetadata is valid!");

    Ok(())
}

#[cfg(test)]
#[path = "validate/validate_tests.rs"]
mod validate_tests;
