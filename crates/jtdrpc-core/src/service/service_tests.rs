#![allow(non_snake_case)]

use super::*;
use crate::descriptor::{FieldDescriptor, StructDescriptor, TypeIdentity, TypeRef};
use crate::error::ErrorKind;
use serde_json::json;

struct GetUser;
struct User;

impl Describe for GetUser {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Struct(
            StructDescriptor::named(TypeIdentity::new("svc::GetUser", "GetUser"))
                .field(FieldDescriptor::new("user_id", TypeRef::of::<String>()).rename("userId"))
                .field(FieldDescriptor::new("verbose", TypeRef::of::<bool>()).optional(true)),
        )
    }
}

impl Describe for User {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Struct(
            StructDescriptor::named(TypeIdentity::new("svc::User", "User"))
                .field(FieldDescriptor::new("name", TypeRef::of::<String>()))
                .field(FieldDescriptor::new("friends", TypeRef::of::<Vec<User>>())),
        )
    }
}

#[test]
fn ServiceBuilder___method___derives_param_names_from_request_fields() {
    let mut builder = ServiceBuilder::new("users");

    builder
        .method::<GetUser, User>("getUser", MethodOptions::new().help("Fetch a user"))
        .unwrap();
    let meta = builder.build();

    let method = meta.method("getUser").unwrap();
    assert_eq!(method.param_names, vec!["userId", "verbose"]);
    assert_eq!(method.help, "Fetch a user");
    assert_eq!(method.method_timeout, 60_000);
    assert_eq!(method.request_type_def, Some(Schema::reference("GetUser")));
}

#[test]
fn ServiceBuilder___shared_type___is_one_definition() {
    let mut builder = ServiceBuilder::new("users");

    builder
        .method::<GetUser, User>("getUser", MethodOptions::new())
        .unwrap()
        .method::<User, User>("updateUser", MethodOptions::new())
        .unwrap();
    let meta = builder.build();

    let names: Vec<&str> = meta.definitions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["GetUser", "User"]);
    assert_eq!(meta.interfaces.len(), 2);
    assert!(meta.validate().is_ok());
}

#[test]
fn ServiceBuilder___unit_response___is_void() {
    let mut builder = ServiceBuilder::new("jobs");

    builder
        .method::<GetUser, ()>("delete", MethodOptions::new())
        .unwrap();
    let meta = builder.build();

    assert!(
        meta.method("delete")
            .unwrap()
            .response_type_def
            .as_ref()
            .unwrap()
            .is_void()
    );
}

#[test]
fn ServiceBuilder___timeout_and_param_override___are_recorded() {
    let mut builder = ServiceBuilder::new("jobs");

    builder
        .method::<GetUser, bool>(
            "run",
            MethodOptions::new()
                .timeout(Duration::from_secs(5))
                .param_names(["job"]),
        )
        .unwrap();
    let meta = builder.build();

    let method = meta.method("run").unwrap();
    assert_eq!(method.method_timeout, 5000);
    assert_eq!(method.param_names, vec!["job"]);
}

#[test]
fn ServiceBuilder___redeclared_method___replaces_earlier() {
    let mut builder = ServiceBuilder::new("svc");

    builder.method_with_schemas("ping", None, None, MethodOptions::new().help("old"));
    builder.method_with_schemas("ping", None, None, MethodOptions::new().help("new"));
    let meta = builder.build();

    assert_eq!(meta.interfaces.len(), 1);
    assert_eq!(meta.interfaces[0].help, "new");
}

#[test]
fn ServiceBuilder___64_bit_request___fails() {
    let mut builder = ServiceBuilder::new("svc");

    let err = builder
        .method::<u64, bool>("count", MethodOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Overflow64Bit);
}

#[test]
fn ServiceBuilder___failing_response___discards_request_definitions() {
    let mut builder = ServiceBuilder::new("svc");

    let err = builder
        .method::<GetUser, u64>("lookup", MethodOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Overflow64Bit);
    assert!(builder.registry().is_empty());
    let meta = builder.build();
    assert!(meta.interfaces.is_empty());
    assert!(meta.definitions.is_empty());
}

#[test]
fn ServiceBuilder___build___serializes_service_document() {
    let mut builder = ServiceBuilder::new("users").help("User directory");
    builder
        .method::<GetUser, User>("getUser", MethodOptions::new())
        .unwrap();

    let json = serde_json::to_value(builder.build()).unwrap();

    assert_eq!(json["serviceName"], json!("users"));
    assert_eq!(json["help"], json!("User directory"));
    assert_eq!(
        json["definitions"]["GetUser"],
        json!({
            "properties": {"userId": {"type": "string"}},
            "optionalProperties": {"verbose": {"type": "boolean"}}
        })
    );
    assert_eq!(
        json["definitions"]["User"]["properties"]["friends"],
        json!({"elements": {"ref": "User"}, "nullable": true})
    );
}
