//! Tests for the configuration loader.

use super::*;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct ServerSection {
    port: u16,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    server: ServerSection,
    #[serde(default)]
    public_paths: Vec<String>,
}

fn write(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let path = dir.path().join(filename);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn detect_format_by_extension() {
    assert_eq!(detect_format("gateway.yaml").unwrap(), FileFormat::Yaml);
    assert_eq!(detect_format("gateway.yml").unwrap(), FileFormat::Yaml);
    assert_eq!(detect_format("gateway.toml").unwrap(), FileFormat::Toml);
    assert_eq!(detect_format("gateway.json").unwrap(), FileFormat::Json);
    assert!(matches!(
        detect_format("gateway.txt"),
        Err(ConfigError::UnsupportedFormat(_))
    ));
    assert!(detect_format("gateway").is_err());
}

#[test]
fn from_str_reads_toml() {
    let toml = r#"
public_paths = ["/auth/**", "/actuator/**"]

[server]
port = 8000
name = "edge"
"#;
    let cfg: TestConfig = from_str(toml, FileFormat::Toml).unwrap();
    assert_eq!(cfg.server.port, 8000);
    assert_eq!(cfg.server.name.as_deref(), Some("edge"));
    assert_eq!(cfg.public_paths, vec!["/auth/**", "/actuator/**"]);
}

#[test]
fn load_config_reads_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "gateway.yaml",
        "server:\n  port: 9000\npublic_paths:\n  - /login/**\n",
    );
    let cfg: TestConfig = load_config(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.public_paths, vec!["/login/**"]);
}

#[test]
fn load_config_reports_missing_file() {
    let result: ConfigResult<TestConfig> = load_config("/definitely/not/here.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn substitution_uses_existing_variables() {
    let path = std::env::var("PATH").unwrap_or_default();
    assert_eq!(substitute_env_vars("p=${PATH}"), format!("p={path}"));
    assert_eq!(substitute_env_vars("p=$PATH"), format!("p={path}"));
}

#[test]
fn substitution_keeps_unknown_variables() {
    let input = "secret=${WARDEN_TEST_SURELY_UNSET_VARIABLE}";
    assert_eq!(substitute_env_vars(input), input);
}

#[test]
fn load_with_env_without_file_uses_defaults() {
    #[derive(Debug, Deserialize)]
    struct Defaults {
        #[serde(default = "default_port")]
        port: u16,
    }
    fn default_port() -> u16 {
        8000
    }

    let cfg: Defaults = load_with_env(None, "WARDEN_TEST_NO_SUCH_PREFIX").unwrap();
    assert_eq!(cfg.port, 8000);
}

#[test]
fn wrong_types_are_deserialize_errors() {
    let result: ConfigResult<TestConfig> =
        from_str("[server]\nport = \"not-a-port\"\n", FileFormat::Toml);
    assert!(matches!(result, Err(ConfigError::Deserialize(_))));
}
