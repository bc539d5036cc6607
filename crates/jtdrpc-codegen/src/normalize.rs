//! Inline-type hoisting shared by both generators

use crate::error::{CodegenError, CodegenResult};
use crate::naming::{capitalize, to_pascal_case};
use jtdrpc_core::{Form, Meta, Schema};
use std::collections::BTreeMap;

/// Fail when two names capitalize to the same declared type name.
pub fn check_declared_names<'a>(names: impl IntoIterator<Item = &'a str>) -> CodegenResult<()> {
    let mut declared: BTreeMap<String, &str> = BTreeMap::new();
    for name in names {
        if let Some(first) = declared.insert(capitalize(name), name) {
            return Err(CodegenError::DuplicateTypeName {
                declared: capitalize(name),
                first: first.to_string(),
                second: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Promote inline method schemas to named definitions.
///
/// Every request or response schema that is neither a `ref` nor the empty
/// form is moved into `meta.definitions` as `<Method>Request` or
/// `<Method>Response` and replaced by a `ref` to it. A name whose capitalized
/// form is already declared gets `_` appended until it is free. Void
/// responses stay inline.
///
/// Returns the order definitions should be emitted in: the pre-existing
/// definitions sorted by name, then the hoisted names in method order.
pub fn hoist_inline_types(meta: &mut Meta) -> Vec<String> {
    let mut order: Vec<String> = meta.definitions.keys().cloned().collect();
    let base_names: Vec<String> = meta
        .interfaces
        .iter()
        .map(|m| to_pascal_case(&m.method_name))
        .collect();

    for (method, base) in meta.interfaces.iter_mut().zip(base_names) {
        if let Some(request) = method.request_type_def.take() {
            method.request_type_def = Some(hoist(
                &mut meta.definitions,
                &mut order,
                request,
                format!("{base}Request"),
            ));
        }

        if let Some(response) = method.response_type_def.take() {
            method.response_type_def = Some(if response.is_void() {
                response
            } else {
                hoist(
                    &mut meta.definitions,
                    &mut order,
                    response,
                    format!("{base}Response"),
                )
            });
        }
    }

    order
}

fn hoist(
    definitions: &mut BTreeMap<String, Schema>,
    order: &mut Vec<String>,
    schema: Schema,
    mut name: String,
) -> Schema {
    if !is_inline(&schema) {
        return schema;
    }

    while definitions
        .keys()
        .any(|taken| capitalize(taken) == capitalize(&name))
    {
        name.push('_');
    }
    tracing::debug!("Hoisted inline schema as {}", name);

    definitions.insert(name.clone(), schema);
    order.push(name.clone());
    Schema::reference(name)
}

fn is_inline(schema: &Schema) -> bool {
    !matches!(schema.form(), Ok(Form::Empty | Form::Ref(_)))
}

#[cfg(test)]
#[path = "normalize/normalize_tests.rs"]
mod normalize_tests;
