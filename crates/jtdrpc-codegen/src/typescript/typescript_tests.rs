#![allow(non_snake_case)]

use super::*;
use crate::error::CodegenError;
use jtdrpc_core::SchemaError;
use std::collections::BTreeMap;
use test_case::test_case;

fn schema(json: &str) -> Schema {
    Schema::from_json(json).unwrap()
}

// render_type tests

#[test_case(r#"{"type": "string"}"#, "string")]
#[test_case(r#"{"type": "timestamp"}"#, "string")]
#[test_case(r#"{"type": "uint8"}"#, "number")]
#[test_case(r#"{"type": "int32"}"#, "number")]
#[test_case(r#"{"type": "float64"}"#, "number")]
#[test_case(r#"{"type": "boolean"}"#, "boolean")]
#[test_case(r#"{}"#, "any")]
#[test_case(r#"{"nullable": true}"#, "any | null")]
#[test_case(r#"{"ref": "user"}"#, "User")]
#[test_case(r#"{"elements": {"type": "string"}}"#, "string[]")]
#[test_case(r#"{"elements": {"type": "string", "nullable": true}}"#, "(string | null)[]")]
#[test_case(r#"{"elements": {"type": "string"}, "nullable": true}"#, "string[] | null")]
#[test_case(r#"{"values": {"type": "boolean"}}"#, "Record<string, boolean>")]
#[test_case(r#"{"enum": ["FREE", "PAID"]}"#, r#""FREE" | "PAID""#)]
#[test_case(r#"{"elements": {"enum": ["a", "b"]}}"#, r#"("a" | "b")[]"#)]
#[test_case(r#"{"elements": {"enum": ["a"]}}"#, r#""a"[]"#)]
#[test_case(r#"{"elements": {"ref": "tag"}}"#, "Tag[]")]
fn render_type___form___renders_expected(input: &str, expected: &str) {
    assert_eq!(render_type(&schema(input)).unwrap(), expected);
}

#[test]
fn render_type___properties___sorted_required_then_optional() {
    let input = schema(
        r#"{
            "properties": {"name": {"type": "string"}, "anything": {}},
            "optionalProperties": {"zeta": {"type": "int8"}, "alpha": {}}
        }"#,
    );

    assert_eq!(
        render_type(&input).unwrap(),
        "{\n  anything: any;\n  name: string;\n  alpha?: any;\n  zeta?: number;\n}"
    );
}

#[test]
fn render_type___non_identifier_keys___are_quoted() {
    let input = schema(
        r#"{
            "properties": {"Organization ID": {"type": "string"}, "Environment": {"type": "string"}},
            "optionalProperties": {"Location ID": {"type": "string", "nullable": true}}
        }"#,
    );

    assert_eq!(
        render_type(&input).unwrap(),
        "{\n  Environment: string;\n  \"Organization ID\": string;\n  \"Location ID\"?: string | null;\n}"
    );
}

#[test]
fn render_type___empty_properties___renders_empty_object() {
    assert_eq!(render_type(&schema(r#"{"properties": {}}"#)).unwrap(), "{\n}");
}

#[test]
fn render_type___nested_object___is_not_reindented() {
    let input = schema(
        r#"{"properties": {"comments": {"elements": {"properties": {"text": {"type": "string"}}}}}}"#,
    );

    assert_eq!(
        render_type(&input).unwrap(),
        "{\n  comments: {\n  text: string;\n}[];\n}"
    );
}

#[test]
fn render_type___discriminator___renders_tagged_union() {
    let input = schema(
        r#"{
            "discriminator": "kind",
            "mapping": {
                "b": {"properties": {"y": {"type": "string"}}},
                "a": {"properties": {"x": {"type": "string"}}}
            }
        }"#,
    );

    assert_eq!(
        render_type(&input).unwrap(),
        "\n| {\n  kind: \"a\";\n  x: string;\n}\n| {\n  kind: \"b\";\n  y: string;\n}"
    );
}

#[test]
fn render_type___elements_of_discriminator___parenthesizes_union() {
    let input = schema(
        r#"{
            "elements": {
                "discriminator": "kind",
                "mapping": {"a": {"properties": {"x": {"type": "string"}}}}
            }
        }"#,
    );

    assert_eq!(
        render_type(&input).unwrap(),
        "(\n| {\n  kind: \"a\";\n  x: string;\n})[]"
    );
}

#[test]
fn render_type___discriminator_variant_with_only_optional___gets_tag_property() {
    let input = schema(
        r#"{
            "discriminator": "type",
            "mapping": {"ping": {"optionalProperties": {"note": {"type": "string"}}}}
        }"#,
    );

    assert_eq!(
        render_type(&input).unwrap(),
        "\n| {\n  type: \"ping\";\n  note?: string;\n}"
    );
}

#[test]
fn render_type___enum_with_quote___is_escaped() {
    let input = Schema::enumeration(["say \"hi\""]);

    assert_eq!(render_type(&input).unwrap(), r#""say \"hi\"""#);
}

#[test]
fn render_type___ambiguous_node___is_invalid_meta() {
    let mut input = Schema::of_type(TypeTag::String);
    input.reference = Some("User".into());

    let err = render_type(&input).unwrap_err();

    assert!(matches!(
        err,
        CodegenError::InvalidMeta(SchemaError::AmbiguousForm { .. })
    ));
}

// generate_client tests

fn get_name_meta() -> Meta {
    let mut meta = Meta::new("names");
    meta.help = "Name lookups".into();
    meta.interfaces.push(MethodMeta {
        help: "Fetch a name".into(),
        response_type_def: Some(Schema::of_type(TypeTag::String)),
        ..MethodMeta::new("GetName")
    });
    meta
}

#[test]
fn generate_client___inline_response___is_hoisted_and_referenced() {
    let out = generate_client(&get_name_meta(), &TypeScriptConfig::default()).unwrap();

    assert!(out.contains("\nexport type GetNameResponse = string;\n"));
    assert!(out.contains(
        "  GetName(ctx: Context, req: any): Promise<GetNameResponse> {\n    return this.request(ctx, \"GetName\", req);\n  }\n"
    ));
}

#[test]
fn generate_client___context_flavor___full_output() {
    let out = generate_client(&get_name_meta(), &TypeScriptConfig::default()).unwrap();

    assert_eq!(
        out,
        "import { RPCContextClient } from \"@loke/http-rpc-client\";\n\
         import { Context } from \"@loke/context\";\n\
         \n\
         export type GetNameResponse = string;\n\
         \n\
         /**\n\
         \x20* Name lookups\n\
         \x20*/\n\
         export class NamesService extends RPCContextClient {\n\
         \x20 constructor(baseUrl: string) {\n\
         \x20   super(baseUrl, \"names\")\n\
         \x20 }\n\
         \x20 /**\n\
         \x20  * Fetch a name\n\
         \x20  */\n\
         \x20 GetName(ctx: Context, req: any): Promise<GetNameResponse> {\n\
         \x20   return this.request(ctx, \"GetName\", req);\n\
         \x20 }\n\
         }\n"
    );
}

#[test]
fn generate_client___plain_flavor___omits_context() {
    let config = TypeScriptConfig {
        flavor: ClientFlavor::Plain,
        ..TypeScriptConfig::default()
    };

    let out = generate_client(&get_name_meta(), &config).unwrap();

    assert!(out.starts_with("import { RPCClient } from \"@loke/http-rpc-client\";\n\n"));
    assert!(!out.contains("Context"));
    assert!(out.contains("extends RPCClient {"));
    assert!(out.contains("  GetName(req: any): Promise<GetNameResponse> {\n    return this.request(\"GetName\", req);\n"));
}

#[test]
fn generate_client___custom_modules___are_imported() {
    let config = TypeScriptConfig {
        client_module: "./rpc".into(),
        context_module: "./ctx".into(),
        ..TypeScriptConfig::default()
    };

    let out = generate_client(&get_name_meta(), &config).unwrap();

    assert!(out.starts_with(
        "import { RPCContextClient } from \"./rpc\";\nimport { Context } from \"./ctx\";\n"
    ));
}

#[test]
fn generate_client___void_response___returns_promise_void() {
    let mut meta = Meta::new("service1");
    meta.interfaces.push(MethodMeta {
        response_type_def: Some(Schema::void()),
        ..MethodMeta::new("hello1")
    });

    let out = generate_client(&meta, &TypeScriptConfig::default()).unwrap();

    assert!(out.contains("hello1(ctx: Context, req: any): Promise<void>"));
    assert!(!out.contains("export type"));
}

#[test]
fn generate_client___multiline_help___one_comment_line_each() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(MethodMeta {
        help: "first\nsecond".into(),
        ..MethodMeta::new("run")
    });

    let out = generate_client(&meta, &TypeScriptConfig::default()).unwrap();

    assert!(out.contains("  /**\n   * first\n   * second\n   */\n  run("));
}

#[test]
fn generate_client___empty_help___emits_blank_comment_line() {
    let out = generate_client(&Meta::new("svc"), &TypeScriptConfig::default()).unwrap();

    assert!(out.contains("/**\n * \n */\nexport class SvcService"));
}

#[test]
fn generate_client___kebab_method___is_quoted_member() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(MethodMeta::new("list-users"));

    let out = generate_client(&meta, &TypeScriptConfig::default()).unwrap();

    assert!(out.contains("  \"list-users\"(ctx: Context, req: any): Promise<any> {\n    return this.request(ctx, \"list-users\", req);"));
}

#[test]
fn generate_client___dangling_ref___is_rejected() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(MethodMeta {
        request_type_def: Some(Schema::reference("Missing")),
        ..MethodMeta::new("run")
    });

    let err = generate_client(&meta, &TypeScriptConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        CodegenError::InvalidMeta(SchemaError::UnresolvedRef { .. })
    ));
}

#[test]
fn generate_client___definitions___emitted_sorted_before_hoisted() {
    let mut meta = Meta::new("svc");
    meta.definitions.insert(
        "user".into(),
        Schema::properties(
            [("id".to_string(), Schema::of_type(TypeTag::String))].into(),
            BTreeMap::new(),
        ),
    );
    meta.definitions
        .insert("Account".into(), Schema::of_type(TypeTag::String));
    meta.interfaces.push(MethodMeta {
        request_type_def: Some(Schema::elements(Schema::reference("user"))),
        response_type_def: Some(Schema::reference("user")),
        ..MethodMeta::new("find")
    });

    let out = generate_client(&meta, &TypeScriptConfig::default()).unwrap();

    let account = out.find("export type Account = string;").unwrap();
    let user = out.find("export type User = {").unwrap();
    let request = out.find("export type FindRequest = User[];").unwrap();
    assert!(account < user && user < request);
    assert!(out.contains("find(ctx: Context, req: FindRequest): Promise<User>"));
}

#[test]
fn generate_client___lowercase_definition_named_like_hoisted___is_deconflicted() {
    let mut meta = get_name_meta();
    meta.definitions
        .insert("getNameResponse".into(), Schema::of_type(TypeTag::Boolean));

    let out = generate_client(&meta, &TypeScriptConfig::default()).unwrap();

    assert!(out.contains("export type GetNameResponse = boolean;\n"));
    assert!(out.contains("export type GetNameResponse_ = string;\n"));
    assert!(out.contains("Promise<GetNameResponse_>"));
    assert_eq!(out.matches("export type GetNameResponse =").count(), 1);
}

#[test]
fn generate_client___definitions_differing_in_case___are_rejected() {
    let mut meta = Meta::new("svc");
    meta.definitions.insert("foo".into(), Schema::of_type(TypeTag::String));
    meta.definitions.insert("Foo".into(), Schema::of_type(TypeTag::Int32));

    let err = generate_client(&meta, &TypeScriptConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        CodegenError::DuplicateTypeName { ref declared, .. } if declared == "Foo"
    ));
}
