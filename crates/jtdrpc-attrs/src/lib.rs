//! jtdrpc-attrs - Serde attribute reading
//!
//! Both `#[derive(Describe)]` and the CLI's source scanner need to know what
//! serde will put on the wire for a type. This crate reads the serde
//! attributes that change the serialized shape and applies `rename_all`
//! conventions, so the two paths cannot disagree.

mod rename;
mod serde_attrs;

pub use rename::RenameRule;
pub use serde_attrs::{SerdeAttrs, skip_meta_value, unraw};
