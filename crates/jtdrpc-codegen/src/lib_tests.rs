#![allow(non_snake_case)]

use super::*;
use jtdrpc_core::{MethodMeta, Schema, TypeTag};
use test_case::test_case;

#[test_case("go", Target::Go)]
#[test_case("golang", Target::Go)]
#[test_case("ts", Target::TypeScript)]
#[test_case("TypeScript", Target::TypeScript)]
fn Target___from_str___parses(input: &str, expected: Target) {
    assert_eq!(input.parse::<Target>().unwrap(), expected);
}

#[test]
fn Target___from_str_unknown___is_config_error() {
    let err = "rust".parse::<Target>().unwrap_err();

    assert!(err.to_string().contains("unknown target `rust`"));
}

#[test]
fn Target___display___round_trips_through_from_str() {
    for target in [Target::Go, Target::TypeScript] {
        assert_eq!(target.to_string().parse::<Target>().unwrap(), target);
    }
}

#[test]
fn Target___extension___matches_language() {
    assert_eq!(Target::Go.extension(), "go");
    assert_eq!(Target::TypeScript.extension(), "ts");
}

#[test]
fn generate___dispatches_on_target() {
    let mut meta = Meta::new("names");
    meta.interfaces.push(MethodMeta {
        response_type_def: Some(Schema::of_type(TypeTag::String)),
        ..MethodMeta::new("GetName")
    });
    let config = CodegenConfig::default();

    let go = generate(Target::Go, &meta, &config).unwrap();
    let ts = generate(Target::TypeScript, &meta, &config).unwrap();

    assert_eq!(go, "type GetNameResponse string\n");
    assert!(ts.contains("export class NamesService"));
}
