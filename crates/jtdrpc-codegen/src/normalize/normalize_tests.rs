#![allow(non_snake_case)]

use super::*;
use jtdrpc_core::{MethodMeta, TypeTag};

fn method(name: &str, request: Option<Schema>, response: Option<Schema>) -> MethodMeta {
    MethodMeta {
        request_type_def: request,
        response_type_def: response,
        ..MethodMeta::new(name)
    }
}

fn record(field: &str) -> Schema {
    Schema::properties(
        [(field.to_string(), Schema::of_type(TypeTag::String))].into(),
        BTreeMap::new(),
    )
}

#[test]
fn hoist_inline_types___inline_schemas___become_refs() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(method(
        "getName",
        Some(record("id")),
        Some(Schema::of_type(TypeTag::String)),
    ));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order, vec!["GetNameRequest", "GetNameResponse"]);
    let m = &meta.interfaces[0];
    assert_eq!(m.request_type_def, Some(Schema::reference("GetNameRequest")));
    assert_eq!(m.response_type_def, Some(Schema::reference("GetNameResponse")));
    assert_eq!(
        meta.definitions["GetNameResponse"],
        Schema::of_type(TypeTag::String)
    );
}

#[test]
fn hoist_inline_types___existing_definitions___come_first_sorted() {
    let mut meta = Meta::new("svc");
    meta.definitions.insert("Zeta".into(), record("z"));
    meta.definitions.insert("Alpha".into(), record("a"));
    meta.interfaces.push(method("a", Some(record("x")), None));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order, vec!["Alpha", "Zeta", "ARequest"]);
}

#[test]
fn hoist_inline_types___taken_name___appends_underscores() {
    let mut meta = Meta::new("typed");
    meta.definitions.insert("GetUserRequest".into(), record("name"));
    meta.definitions.insert("GetUserRequest_".into(), record("other"));
    meta.interfaces.push(method("getUser", Some(record("id")), None));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order.last().map(String::as_str), Some("GetUserRequest__"));
    assert_eq!(
        meta.interfaces[0].request_type_def,
        Some(Schema::reference("GetUserRequest__"))
    );
}

#[test]
fn hoist_inline_types___name_taken_after_capitalizing___appends_underscore() {
    let mut meta = Meta::new("typed");
    meta.definitions.insert("getUserRequest".into(), record("name"));
    meta.interfaces.push(method("getUser", Some(record("id")), None));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order, vec!["getUserRequest", "GetUserRequest_"]);
    assert_eq!(
        meta.interfaces[0].request_type_def,
        Some(Schema::reference("GetUserRequest_"))
    );
}

#[test]
fn hoist_inline_types___refs_and_empty___stay_inline() {
    let mut meta = Meta::new("svc");
    meta.definitions.insert("User".into(), record("id"));
    meta.interfaces.push(method(
        "get",
        Some(Schema::empty()),
        Some(Schema::reference("User").with_nullable(true)),
    ));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order, vec!["User"]);
    assert_eq!(meta.interfaces[0].request_type_def, Some(Schema::empty()));
}

#[test]
fn hoist_inline_types___void_response___is_not_hoisted() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(method("hello1", None, Some(Schema::void())));

    let order = hoist_inline_types(&mut meta);

    assert!(order.is_empty());
    assert!(meta.definitions.is_empty());
    assert_eq!(meta.interfaces[0].response_type_def, Some(Schema::void()));
}

#[test]
fn hoist_inline_types___kebab_method___uses_pascal_case_name() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(method("list-users", Some(record("page")), None));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order, vec!["ListUsersRequest"]);
}

#[test]
fn hoist_inline_types___second_method_collision___is_deconflicted() {
    let mut meta = Meta::new("svc");
    meta.interfaces.push(method("get_user", Some(record("a")), None));
    meta.interfaces.push(method("getUser", Some(record("b")), None));

    let order = hoist_inline_types(&mut meta);

    assert_eq!(order, vec!["GetUserRequest", "GetUserRequest_"]);
}

// check_declared_names tests

#[test]
fn check_declared_names___distinct_after_capitalizing___is_ok() {
    assert!(check_declared_names(["user", "Account", "user_"]).is_ok());
}

#[test]
fn check_declared_names___same_after_capitalizing___fails() {
    let err = check_declared_names(["Foo", "foo"]).unwrap_err();

    assert_eq!(
        err.to_string(),
        "definitions `Foo` and `foo` both declare type `Foo`"
    );
}
