#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case(
    CodegenError::UnsupportedDiscriminator { target: "go", tag: "kind".into() },
    30,
    ErrorKind::UnsupportedDiscriminator
)]
#[test_case(CodegenError::Encoding("x".into()), 31, ErrorKind::Encoding)]
#[test_case(
    CodegenError::InvalidMeta(SchemaError::EmptyEnum { path: "#".into() }),
    32,
    ErrorKind::InvalidSchema
)]
#[test_case(
    CodegenError::io("out.ts", std::io::Error::other("disk full")),
    33,
    ErrorKind::Io
)]
#[test_case(CodegenError::Config("bad".into()), 34, ErrorKind::Config)]
#[test_case(
    CodegenError::DuplicateTypeName {
        declared: "Foo".into(),
        first: "Foo".into(),
        second: "foo".into(),
    },
    35,
    ErrorKind::InvalidSchema
)]
fn CodegenError___variant___maps_code_and_kind(err: CodegenError, code: u32, kind: ErrorKind) {
    assert_eq!(err.error_code(), code);
    assert_eq!(err.kind(), kind);
}

#[test]
fn CodegenError___unsupported_discriminator___names_target_and_tag() {
    let err = CodegenError::UnsupportedDiscriminator {
        target: "go",
        tag: "kind".into(),
    };

    assert_eq!(
        err.to_string(),
        "discriminator `kind` is not supported by the go generator"
    );
}

#[test]
fn CodegenError___io___includes_path() {
    let err = CodegenError::io("gen/client.ts", std::io::Error::other("denied"));

    assert_eq!(err.to_string(), "I/O error on gen/client.ts: denied");
}

#[test]
fn CodegenError___from_toml_error___is_config() {
    let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();

    let err: CodegenError = toml_err.into();

    assert!(matches!(err, CodegenError::Config(_)));
}
