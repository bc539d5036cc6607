//! TypeScript generator.
//!
//! Renders JTD schemas as TypeScript type expressions and emits a client
//! class for a service [`Meta`] document.
//!
//! # Type Mapping
//!
//! | JTD form | TypeScript |
//! |----------|------------|
//! | `ref` | capitalized definition name |
//! | `string`, `timestamp` | `string` |
//! | numeric types | `number` |
//! | `boolean` | `boolean` |
//! | `elements` | `T[]`, or `(T)[]` when `T` is nullable |
//! | `values` | `Record<string, T>` |
//! | `properties` | object literal, required keys then optional keys, each sorted |
//! | `discriminator` | union of object literals, each with its tag fixed |
//! | `enum` | union of string literals |
//! | empty | `any` |
//!
//! A nullable schema appends ` | null`.
//!
//! # Client Layout
//!
//! ```text
//! import { RPCContextClient } from "@loke/http-rpc-client";
//! import { Context } from "@loke/context";
//!
//! export type GetUserRequest = { ... };
//!
//! /**
//!  * service help
//!  */
//! export class UsersService extends RPCContextClient {
//!   constructor(baseUrl: string) {
//!     super(baseUrl, "users")
//!   }
//!   /**
//!    * method help
//!    */
//!   getUser(ctx: Context, req: GetUserRequest): Promise<User> {
//!     return this.request(ctx, "getUser", req);
//!   }
//! }
//! ```

use crate::config::{ClientFlavor, TypeScriptConfig};
use crate::error::CodegenResult;
use crate::naming::{capitalize, string_literal, to_pascal_case, ts_property_key};
use crate::normalize::{check_declared_names, hoist_inline_types};
use jtdrpc_core::{Form, Meta, MethodMeta, Schema, TypeTag};

/// Render a schema as a TypeScript type expression
pub fn render_type(schema: &Schema) -> CodegenResult<String> {
    let mut t = match schema.form()? {
        Form::Ref(name) => capitalize(name),
        Form::Type(tag) => scalar(tag).to_string(),
        Form::Elements(items) => {
            let inner = render_type(items)?;
            if renders_as_union(items)? {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
        Form::Values(values) => format!("Record<string, {}>", render_type(values)?),
        Form::Properties {
            required, optional, ..
        } => {
            let mut t = String::from("{\n");
            for (key, value) in required {
                t.push_str(&format!(
                    "  {}: {};\n",
                    ts_property_key(key)?,
                    render_type(value)?
                ));
            }
            for (key, value) in optional {
                t.push_str(&format!(
                    "  {}?: {};\n",
                    ts_property_key(key)?,
                    render_type(value)?
                ));
            }
            t.push('}');
            t
        }
        Form::Discriminator { tag, mapping } => {
            let mut t = String::new();
            for (value, variant) in mapping {
                let mut variant = variant.clone();
                variant
                    .properties
                    .get_or_insert_with(Default::default)
                    .insert(tag.to_string(), Schema::enumeration([value.as_str()]));
                t.push_str("\n| ");
                t.push_str(&render_type(&variant)?);
            }
            t
        }
        Form::Enum(values) => values
            .iter()
            .map(|v| string_literal(v))
            .collect::<CodegenResult<Vec<_>>>()?
            .join(" | "),
        Form::Empty => "any".to_string(),
    };

    if schema.nullable {
        t.push_str(" | null");
    }

    Ok(t)
}

/// `|` binds looser than `[]`, so a union element needs parentheses
fn renders_as_union(schema: &Schema) -> CodegenResult<bool> {
    Ok(schema.nullable
        || match schema.form()? {
            Form::Enum(values) => values.len() > 1,
            Form::Discriminator { .. } => true,
            _ => false,
        })
}

fn scalar(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::String | TypeTag::Timestamp => "string",
        TypeTag::Boolean => "boolean",
        _ => "number",
    }
}

/// Emit a complete client module for `meta`.
///
/// The document is validated first; inline method schemas are then hoisted
/// into named types so every signature refers to a declared type.
pub fn generate_client(meta: &Meta, config: &TypeScriptConfig) -> CodegenResult<String> {
    meta.validate()?;

    let mut meta = meta.clone();
    check_declared_names(meta.definitions.keys().map(String::as_str))?;
    let order = hoist_inline_types(&mut meta);

    let mut code = String::new();
    let client_module = string_literal(&config.client_module)?;
    let base_class = match config.flavor {
        ClientFlavor::Context => {
            code.push_str(&format!(
                "import {{ RPCContextClient }} from {client_module};\n"
            ));
            code.push_str(&format!(
                "import {{ Context }} from {};\n",
                string_literal(&config.context_module)?
            ));
            "RPCContextClient"
        }
        ClientFlavor::Plain => {
            code.push_str(&format!("import {{ RPCClient }} from {client_module};\n"));
            "RPCClient"
        }
    };

    for name in &order {
        if let Some(schema) = meta.definitions.get(name) {
            code.push('\n');
            code.push_str(&format!(
                "export type {} = {};\n",
                capitalize(name),
                render_type(schema)?
            ));
        }
    }

    code.push('\n');
    code.push_str(&doc_comment(&meta.help, ""));
    code.push_str(&format!(
        "export class {}Service extends {} {{\n",
        to_pascal_case(&meta.service_name),
        base_class
    ));
    code.push_str("  constructor(baseUrl: string) {\n");
    code.push_str(&format!(
        "    super(baseUrl, {})\n",
        string_literal(&meta.service_name)?
    ));
    code.push_str("  }\n");

    for method in &meta.interfaces {
        code.push_str(&doc_comment(&method.help, "  "));
        code.push_str(&method_stub(method, config.flavor)?);
    }

    code.push_str("}\n");

    tracing::debug!(
        "Generated TypeScript client for {} ({} types, {} methods)",
        meta.service_name,
        order.len(),
        meta.interfaces.len()
    );

    Ok(code)
}

fn method_stub(method: &MethodMeta, flavor: ClientFlavor) -> CodegenResult<String> {
    let request = match &method.request_type_def {
        Some(schema) => render_type(schema)?,
        None => "any".to_string(),
    };
    let response = match &method.response_type_def {
        Some(schema) if schema.is_void() => "void".to_string(),
        Some(schema) => render_type(schema)?,
        None => "any".to_string(),
    };
    let name = ts_property_key(&method.method_name)?;
    let literal = string_literal(&method.method_name)?;

    let (params, call) = match flavor {
        ClientFlavor::Context => ("ctx: Context, req", "ctx, "),
        ClientFlavor::Plain => ("req", ""),
    };
    Ok(format!(
        "  {name}({params}: {request}): Promise<{response}> {{\n\
         \x20   return this.request({call}{literal}, req);\n\
         \x20 }}\n"
    ))
}

/// A JSDoc block with one ` * ` line per line of `text`
fn doc_comment(text: &str, indent: &str) -> String {
    let mut doc = format!("{indent}/**\n");
    for line in text.split('\n') {
        doc.push_str(&format!("{indent} * {line}\n"));
    }
    doc.push_str(&format!("{indent} */\n"));
    doc
}

#[cfg(test)]
#[path = "typescript/typescript_tests.rs"]
mod typescript_tests;
