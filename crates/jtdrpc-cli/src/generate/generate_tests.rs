#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;

const META: &str = r#"{
    "serviceName": "greeter",
    "interfaces": [
        {
            "methodName": "hello",
            "requestTypeDef": {"properties": {"name": {"type": "string"}}},
            "responseTypeDef": {"type": "string"}
        }
    ]
}"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// Overrides tests

#[test]
fn Overrides___empty___leaves_config_unchanged() {
    let mut config = CodegenConfig::default();

    Overrides::default().apply(&mut config);

    assert_eq!(config, CodegenConfig::default());
}

#[test]
fn Overrides___set_values___replace_config() {
    let mut config = CodegenConfig::default();
    let overrides = Overrides {
        flavor: Some(ClientFlavor::Plain),
        client_module: Some("./rpc".to_string()),
        context_module: None,
        package: Some("api".to_string()),
    };

    overrides.apply(&mut config);

    assert_eq!(config.typescript.flavor, ClientFlavor::Plain);
    assert_eq!(config.typescript.client_module, "./rpc");
    assert_eq!(config.typescript.context_module, "@loke/context");
    assert_eq!(config.go.package.as_deref(), Some("api"));
}

// load_config tests

#[test]
fn load_config___explicit_file___is_parsed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "custom.toml", "[go]\npackage = \"models\"\n");

    let config = load_config(Some(&path)).unwrap();

    assert_eq!(config.go.package.as_deref(), Some("models"));
}

#[test]
fn load_config___explicit_missing_file___returns_error() {
    let dir = TempDir::new().unwrap();

    let result = load_config(Some(&dir.path().join("absent.toml")));

    assert!(result.is_err());
}

#[test]
fn load_config___malformed_toml___returns_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.toml", "[typescript]\nflavor = \"fancy\"\n");

    let err = load_config(Some(&path)).unwrap_err();

    assert!(format!("{err:#}").contains("Failed to load config"));
}

// load_meta tests

#[test]
fn load_meta___valid_document___parses() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "meta.json", META);

    let meta = load_meta(&path).unwrap();

    assert_eq!(meta.service_name, "greeter");
    assert_eq!(meta.interfaces.len(), 1);
}

#[test]
fn load_meta___invalid_json___reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "meta.json", "{ not json");

    let err = load_meta(&path).unwrap_err();

    assert!(err.to_string().contains("meta.json"));
}

// run tests

#[test]
fn run___output_path___writes_generated_client() {
    let dir = TempDir::new().unwrap();
    let meta_path = write_file(&dir, "meta.json", META);
    let config_path = write_file(&dir, "jtdrpc.toml", "");
    let output = dir.path().join("client.ts");

    run(
        Target::TypeScript,
        &meta_path,
        Some(output.clone()),
        Some(config_path),
        Overrides::default(),
    )
    .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("export class GreeterService extends RPCContextClient"));
    assert!(written.contains("export type HelloRequest = {"));
}

#[test]
fn run___go_with_package_override___emits_package_clause() {
    let dir = TempDir::new().unwrap();
    let meta_path = write_file(&dir, "meta.json", META);
    let config_path = write_file(&dir, "jtdrpc.toml", "");
    let output = dir.path().join("types.go");
    let overrides = Overrides {
        package: Some("greeter".to_string()),
        ..Overrides::default()
    };

    run(Target::Go, &meta_path, Some(output.clone()), Some(config_path), overrides).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("package greeter\n"));
    assert!(written.contains("type HelloRequest struct {"));
}

#[test]
fn run___generation_failure___leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let meta_path = write_file(
        &dir,
        "meta.json",
        r#"{
            "serviceName": "events",
            "interfaces": [{
                "methodName": "emit",
                "requestTypeDef": {
                    "discriminator": "kind",
                    "mapping": {"a": {"properties": {}}}
                }
            }]
        }"#,
    );
    let config_path = write_file(&dir, "jtdrpc.toml", "");
    let output = dir.path().join("types.go");

    let result = run(
        Target::Go,
        &meta_path,
        Some(output.clone()),
        Some(config_path),
        Overrides::default(),
    );

    assert!(result.is_err());
    assert!(!output.exists());
}
