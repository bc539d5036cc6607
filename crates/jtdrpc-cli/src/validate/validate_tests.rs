#![allow(non_snake_case)]

use super::*;
use jtdrpc_core::{MethodMeta, Schema, TypeTag};

fn method(name: &str, response: Option<Schema>) -> MethodMeta {
    let mut method = MethodMeta::new(name);
    method.response_type_def = response;
    method
}

#[test]
fn check_meta___valid_document___summarizes() {
    let mut meta = Meta::new("billing");
    meta.definitions
        .insert("Invoice".to_string(), Schema::of_type(TypeTag::String));
    meta.interfaces = vec![
        method("get", Some(Schema::reference("Invoice"))),
        method("ping", Some(Schema::void())),
        method("notify", None),
    ];

    let summary = check_meta(&meta).unwrap();

    assert_eq!(
        summary,
        Summary {
            service_name: "billing".to_string(),
            methods: 3,
            definitions: 1,
            void_methods: 2,
        }
    );
}

#[test]
fn check_meta___duplicate_method___fails_with_service_context() {
    let mut meta = Meta::new("billing");
    meta.interfaces = vec![method("get", None), method("get", None)];

    let err = check_meta(&meta).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("Service 'billing' is invalid"));
    assert!(message.contains("method `get` is declared more than once"));
}

#[test]
fn check_meta___dangling_reference___fails() {
    let mut meta = Meta::new("billing");
    meta.interfaces = vec![method("get", Some(Schema::reference("Missing")))];

    let err = check_meta(&meta).unwrap_err();

    assert!(format!("{err:#}").contains("undefined definition `Missing`"));
}
