//! jtdrpc-logging - Priority-prefixed logfmt logging
//!
//! This crate provides:
//! - [`PriorityLayer`] tracing layer that writes `<N>`-prefixed logfmt lines
//! - [`init_logging`] to install it with an `RUST_LOG`-aware filter

mod layer;
mod logfmt;

pub use jtdrpc_core::LogLevel;
pub use layer::{PriorityLayer, env_filter, init_logging};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, PriorityLayer, init_logging};
}
