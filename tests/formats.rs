use std::collections::BTreeSet;
use std::fs;

use confpath::{Config, ConfigError, Format, Key, Value};
use serde::Deserialize;
use tempfile::TempDir;

const YAML: &str = r#"
name: demo
debug: true
ratio: 0.25
server:
  host: localhost
  port: 8080
  tags: [web, api]
replicas:
  - host: r1
    port: 9001
  - host: r2
    port: 9002
"#;

const JSON: &str = r#"{
  "name": "demo",
  "debug": true,
  "ratio": 0.25,
  "server": {"host": "localhost", "port": 8080, "tags": ["web", "api"]},
  "replicas": [
    {"host": "r1", "port": 9001},
    {"host": "r2", "port": 9002}
  ]
}"#;

const TOML: &str = r#"
name = "demo"
debug = true
ratio = 0.25

[server]
host = "localhost"
port = 8080
tags = ["web", "api"]

[[replicas]]
host = "r1"
port = 9001

[[replicas]]
host = "r2"
port = 9002
"#;

#[derive(Debug, Deserialize, PartialEq)]
struct Replica {
    host: String,
    port: u16,
}

fn load_all() -> (TempDir, Vec<Config>) {
    let dir = TempDir::new().unwrap();
    let mut configs = Vec::new();

    for (file, contents, format) in [
        ("app.yaml", YAML, Format::Yaml),
        ("app.json", JSON, Format::Json),
        ("app.toml", TOML, Format::Toml),
    ] {
        let path = dir.path().join(file);
        fs::write(&path, contents).unwrap();
        configs.push(Config::load(&path, format).unwrap());
    }

    (dir, configs)
}

#[test]
fn test_formats_answer_queries_identically() {
    let (_dir, configs) = load_all();

    for config in &configs {
        assert_eq!(config.get_string("name").unwrap(), "demo");
        assert!(config.get_bool("debug").unwrap());
        assert_eq!(config.get_float("ratio").unwrap(), 0.25);
        assert_eq!(config.get_int("server.port").unwrap(), 8080);
        assert_eq!(config.get_string("server.tags.1").unwrap(), "api");
        assert_eq!(config.get_int("replicas.1.port").unwrap(), 9002);
        assert_eq!(config.get_int_or("server.missing", 1), 1);

        let keys = config.list_keys("server").unwrap();
        let expected: BTreeSet<Key> = ["host", "port", "tags"]
            .into_iter()
            .map(Key::from)
            .collect();
        assert_eq!(keys, expected);

        let replica: Replica = config.decode_as("replicas.0").unwrap();
        assert_eq!(
            replica,
            Replica {
                host: "r1".to_string(),
                port: 9001
            }
        );

        assert!(matches!(
            config.get_string("server.port"),
            Err(ConfigError::LeafTypeMismatch { .. })
        ));
        assert!(matches!(
            config.get_value("replicas.2"),
            Err(ConfigError::IndexInvalid { index: 2, len: 2 })
        ));
    }

    assert_eq!(configs[0], configs[1]);
    assert_eq!(configs[1], configs[2]);
}

#[test]
fn test_auto_detection_matches_explicit_format() {
    let dir = TempDir::new().unwrap();

    for (file, contents, format) in [
        ("a.conf", YAML, Format::Yaml),
        ("b.conf", JSON, Format::Json),
        ("c.conf", TOML, Format::Toml),
    ] {
        let path = dir.path().join(file);
        fs::write(&path, contents).unwrap();

        let detected = Config::load_auto(&path).unwrap();
        let explicit = Config::load(&path, format).unwrap();
        assert_eq!(detected, explicit);
        assert_eq!(
            detected.get_value("replicas.0.host").unwrap(),
            &Value::from("r1")
        );
    }
}

#[test]
fn test_explicit_format_mismatch_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.toml");
    fs::write(&path, TOML).unwrap();

    assert!(matches!(
        Config::load(&path, Format::Json),
        Err(ConfigError::ParseError {
            format: Format::Json,
            ..
        })
    ));
}
