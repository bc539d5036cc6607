//! Go generator.
//!
//! Renders JTD schemas as Go type expressions and emits `type` declarations
//! for every definition.
//!
//! # Type Mapping
//!
//! | JTD form | Go |
//! |----------|----|
//! | `ref` | capitalized definition name |
//! | `string` | `string` |
//! | `timestamp` | `time.Time` |
//! | `int8` … `uint32`, `float32`, `float64` | same-named Go type |
//! | `boolean` | `bool` |
//! | `elements` | `[]T` |
//! | `values` | `map[string]T` |
//! | `properties` | `struct` with `json` tags, optional fields `omitempty` |
//! | `enum` | `string` |
//! | empty | `interface{}` |
//! | `discriminator` | unsupported |
//!
//! A nullable schema becomes a pointer, except for slices, maps and
//! `interface{}` which already admit `nil`.

use crate::config::GoConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::{capitalize, go_field_name, string_literal};
use crate::normalize::{check_declared_names, hoist_inline_types};
use jtdrpc_core::{Form, Meta, Schema, TypeTag};
use std::collections::{BTreeMap, BTreeSet};

const TARGET: &str = "go";

/// Render a schema as a Go type expression
pub fn render_type(schema: &Schema) -> CodegenResult<String> {
    render(schema, 0)
}

fn render(schema: &Schema, depth: usize) -> CodegenResult<String> {
    let form = schema.form()?;
    let t = match form {
        Form::Ref(name) => capitalize(name),
        Form::Type(tag) => scalar(tag).to_string(),
        Form::Elements(items) => format!("[]{}", render(items, depth)?),
        Form::Values(values) => format!("map[string]{}", render(values, depth)?),
        Form::Properties {
            required, optional, ..
        } => render_struct(required, optional, depth)?,
        Form::Discriminator { tag, .. } => {
            return Err(CodegenError::UnsupportedDiscriminator {
                target: TARGET,
                tag: tag.to_string(),
            });
        }
        Form::Enum(_) => "string".to_string(),
        Form::Empty => "interface{}".to_string(),
    };

    let nilable = matches!(form, Form::Elements(_) | Form::Values(_) | Form::Empty);
    if schema.nullable && !nilable {
        Ok(format!("*{t}"))
    } else {
        Ok(t)
    }
}

fn scalar(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::String => "string",
        TypeTag::Timestamp => "time.Time",
        TypeTag::Boolean => "bool",
        TypeTag::Int8 => "int8",
        TypeTag::Uint8 => "uint8",
        TypeTag::Int16 => "int16",
        TypeTag::Uint16 => "uint16",
        TypeTag::Int32 => "int32",
        TypeTag::Uint32 => "uint32",
        TypeTag::Float32 => "float32",
        TypeTag::Float64 => "float64",
    }
}

fn render_struct(
    required: &BTreeMap<String, Schema>,
    optional: &BTreeMap<String, Schema>,
    depth: usize,
) -> CodegenResult<String> {
    if required.is_empty() && optional.is_empty() {
        return Ok("struct{}".to_string());
    }

    let indent = "\t".repeat(depth + 1);
    let mut taken = BTreeSet::new();
    let mut code = String::from("struct {\n");

    let fields = required
        .iter()
        .map(|(k, v)| (k, v, false))
        .chain(optional.iter().map(|(k, v)| (k, v, true)));
    for (key, value, omit_empty) in fields {
        let name = unique_field_name(&mut taken, go_field_name(key));
        let tag = if omit_empty {
            format!("{key},omitempty")
        } else {
            key.clone()
        };
        let tag = string_literal(&tag)?;
        if tag.contains('`') {
            return Err(CodegenError::Encoding(format!(
                "property `{key}` cannot appear in a Go struct tag"
            )));
        }
        code.push_str(&format!(
            "{indent}{name} {} `json:{tag}`\n",
            render(value, depth + 1)?
        ));
    }

    code.push_str(&"\t".repeat(depth));
    code.push('}');
    Ok(code)
}

fn unique_field_name(taken: &mut BTreeSet<String>, base: String) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Emit declarations for a root schema document.
///
/// Every definition becomes a named type; a root that is not the empty form
/// is additionally declared as `config.root_type`.
pub fn generate_types(root: &Schema, config: &GoConfig) -> CodegenResult<String> {
    root.validate()?;
    let root_is_empty = matches!(root.form()?, Form::Empty);
    let root_name = (!root_is_empty).then_some(config.root_type.as_str());
    check_declared_names(root.definitions.keys().map(String::as_str).chain(root_name))?;

    let mut declarations = Vec::new();
    for name in dependency_order(&root.definitions) {
        if let Some(schema) = root.definitions.get(name) {
            declarations.push(declare(name, schema)?);
        }
    }
    if let Some(root_name) = root_name {
        declarations.push(declare(root_name, root)?);
    }

    let uses_time =
        uses_timestamp(root) || root.definitions.values().any(uses_timestamp);
    Ok(assemble(config, uses_time, declarations))
}

/// Emit declarations for every type a service document refers to.
///
/// Inline method schemas are hoisted to named types first, so each request
/// and response shape gets its own declaration.
pub fn generate_meta(meta: &Meta, config: &GoConfig) -> CodegenResult<String> {
    meta.validate()?;

    let mut meta = meta.clone();
    check_declared_names(meta.definitions.keys().map(String::as_str))?;
    hoist_inline_types(&mut meta);

    let mut declarations = Vec::new();
    for name in dependency_order(&meta.definitions) {
        if let Some(schema) = meta.definitions.get(name) {
            declarations.push(declare(name, schema)?);
        }
    }

    tracing::debug!(
        "Generated {} Go declarations for {}",
        declarations.len(),
        meta.service_name
    );

    let uses_time = meta.definitions.values().any(uses_timestamp);
    Ok(assemble(config, uses_time, declarations))
}

fn declare(name: &str, schema: &Schema) -> CodegenResult<String> {
    Ok(format!("type {} {}\n", capitalize(name), render_type(schema)?))
}

fn assemble(config: &GoConfig, uses_time: bool, declarations: Vec<String>) -> String {
    let mut blocks = Vec::new();
    if let Some(package) = &config.package {
        blocks.push(format!("package {package}\n"));
        if uses_time {
            blocks.push("import \"time\"\n".to_string());
        }
    }
    blocks.extend(declarations);
    blocks.join("\n")
}

/// Definition names ordered so each one follows the definitions it refers to.
///
/// Names are visited in sorted order; a reference back to a name already on
/// the path is skipped, which breaks cycles the same way on every run.
fn dependency_order(definitions: &BTreeMap<String, Schema>) -> Vec<&str> {
    let mut visited = BTreeSet::new();
    let mut order = Vec::with_capacity(definitions.len());
    for name in definitions.keys() {
        visit(name, definitions, &mut visited, &mut order);
    }
    order
}

fn visit<'a>(
    name: &str,
    definitions: &'a BTreeMap<String, Schema>,
    visited: &mut BTreeSet<&'a str>,
    order: &mut Vec<&'a str>,
) {
    let Some((key, schema)) = definitions.get_key_value(name) else {
        return;
    };
    if !visited.insert(key.as_str()) {
        return;
    }
    for dependency in schema.references() {
        visit(dependency, definitions, visited, order);
    }
    order.push(key.as_str());
}

fn uses_timestamp(schema: &Schema) -> bool {
    schema.ty == Some(TypeTag::Timestamp) || schema.children().any(uses_timestamp)
}
