//! File-based configuration loading.
//!
//! Each supported format is parsed by its serde implementation into that
//! crate's own value type and then converted into a [`Value`] tree.

use std::fmt;
use std::path::{Path, PathBuf};

use super::value::{Key, Map, Value};
use super::ConfigError;

/// A serialization format a configuration document can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// All formats, in the order auto-detection tries them.
    pub const ALL: [Format; 3] = [Format::Yaml, Format::Json, Format::Toml];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Yaml => "YAML",
            Format::Json => "JSON",
            Format::Toml => "TOML",
        })
    }
}

/// Reads and parses a config file in the given format.
pub(crate) fn load_file(path: &Path, format: Format) -> Result<Map, ConfigError> {
    let contents = read_file(path)?;
    let root = parse_str(&contents, format, path)?;
    tracing::debug!(path = %path.display(), %format, keys = root.len(), "loaded config file");
    Ok(root)
}

/// Reads a config file and parses it with the first format that accepts it.
///
/// Individual parse failures are discarded; if no format accepts the
/// document the result is [`ConfigError::UnsupportedFormat`].
pub(crate) fn load_file_auto(path: &Path) -> Result<Map, ConfigError> {
    let contents = read_file(path)?;

    for format in Format::ALL {
        match parse_str(&contents, format, path) {
            Ok(root) => {
                tracing::debug!(path = %path.display(), %format, "detected config format");
                return Ok(root);
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), %format, error = %e, "format rejected");
            }
        }
    }

    Err(ConfigError::UnsupportedFormat(path.to_path_buf()))
}

/// Parses a document into a root map.
///
/// `path` is only used to label errors.
pub(crate) fn parse_str(contents: &str, format: Format, path: &Path) -> Result<Map, ConfigError> {
    let parse_error = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::ParseError {
        path: path.to_path_buf(),
        format,
        source,
    };

    let value = match format {
        Format::Yaml => {
            let mut yaml: serde_yaml::Value =
                serde_yaml::from_str(contents).map_err(|e| parse_error(Box::new(e)))?;
            // Resolve `<<: *anchor` merge keys.
            yaml.apply_merge().map_err(|e| parse_error(Box::new(e)))?;
            Value::from(yaml)
        }
        Format::Json => serde_json::from_str::<serde_json::Value>(contents)
            .map(Value::from)
            .map_err(|e| parse_error(Box::new(e)))?,
        Format::Toml => toml::from_str::<toml::Table>(contents)
            .map(|t| Value::from(toml::Value::Table(t)))
            .map_err(|e| parse_error(Box::new(e)))?,
    };

    match value {
        Value::Map(map) => Ok(map),
        // An empty YAML document decodes to null.
        Value::Null => Ok(Map::new()),
        other => Err(ConfigError::RootNotMap {
            path: path.to_path_buf(),
            actual: other.kind(),
        }),
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Label used in errors for documents that did not come from a file.
pub(crate) fn inline_path() -> PathBuf {
    PathBuf::from("<inline>")
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as J;

        match value {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            J::String(s) => Value::String(s),
            J::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            J::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Key::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Y;

        match value {
            Y::Null => Value::Null,
            Y::Bool(b) => Value::Bool(b),
            Y::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Y::String(s) => Value::String(s),
            Y::Sequence(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Y::Mapping(mapping) => Value::Map(
                mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from(v)))
                    .collect(),
            ),
            Y::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> Key {
    use serde_yaml::Value as Y;

    match key {
        Y::Bool(b) => Key::Bool(b),
        Y::String(s) => Key::Str(s),
        Y::Number(n) => match n.as_i64() {
            Some(i) => Key::Int(i),
            None => Key::Str(n.to_string()),
        },
        Y::Tagged(tagged) => yaml_key(tagged.value),
        other => Key::Str(
            serde_yaml::to_string(&other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        ),
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        use toml::Value as T;

        match value {
            T::String(s) => Value::String(s),
            T::Integer(i) => Value::Int(i),
            T::Float(f) => Value::Float(f),
            T::Boolean(b) => Value::Bool(b),
            T::Datetime(dt) => Value::String(dt.to_string()),
            T::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            T::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (Key::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_load_yaml_file() {
        let file = write_temp("name: demo\nports:\n  - 80\n  - 443\n");
        let root = load_file(file.path(), Format::Yaml).unwrap();

        assert_eq!(root.get(&Key::from("name")), Some(&Value::from("demo")));
        assert_eq!(
            root.get(&Key::from("ports")),
            Some(&Value::Sequence(vec![Value::Int(80), Value::Int(443)]))
        );
    }

    #[test]
    fn test_json_integers_stay_integers() {
        let root = parse_str(
            r#"{"n": 3, "f": 3.5, "big": 18446744073709551615}"#,
            Format::Json,
            &inline_path(),
        )
        .unwrap();

        assert_eq!(root.get(&Key::from("n")), Some(&Value::Int(3)));
        assert_eq!(root.get(&Key::from("f")), Some(&Value::Float(3.5)));
        assert!(matches!(root.get(&Key::from("big")), Some(Value::Float(_))));
    }

    #[test]
    fn test_toml_datetime_becomes_string() {
        let root = parse_str("at = 1979-05-27T07:32:00Z\n", Format::Toml, &inline_path()).unwrap();

        assert_eq!(
            root.get(&Key::from("at")),
            Some(&Value::from("1979-05-27T07:32:00Z"))
        );
    }

    #[test]
    fn test_yaml_non_string_keys() {
        let root = parse_str(
            "1: one\ntrue: yes\n1.5: half\n",
            Format::Yaml,
            &inline_path(),
        )
        .unwrap();

        assert_eq!(root.get(&Key::Int(1)), Some(&Value::from("one")));
        assert_eq!(root.get(&Key::Bool(true)), Some(&Value::from("yes")));
        assert_eq!(root.get(&Key::from("1.5")), Some(&Value::from("half")));
    }

    #[test]
    fn test_yaml_tagged_value_unwrapped() {
        let root = parse_str("ports: !custom [80]\n", Format::Yaml, &inline_path()).unwrap();

        assert_eq!(
            root.get(&Key::from("ports")),
            Some(&Value::Sequence(vec![Value::Int(80)]))
        );
    }

    #[test]
    fn test_yaml_merge_keys_applied() {
        let root = parse_str(
            "base: &b\n  x: 1\n  y: 0\nchild:\n  <<: *b\n  y: 2\n",
            Format::Yaml,
            &inline_path(),
        )
        .unwrap();

        let child = root.get(&Key::from("child")).and_then(Value::as_map).unwrap();
        assert_eq!(child.get(&Key::from("x")), Some(&Value::Int(1)));
        assert_eq!(child.get(&Key::from("y")), Some(&Value::Int(2)));
        assert!(!child.contains_key(&Key::from("<<")));
    }

    #[test]
    fn test_invalid_yaml_merge_is_parse_error() {
        let result = parse_str("child:\n  <<: 5\n", Format::Yaml, &inline_path());
        assert!(matches!(
            result,
            Err(ConfigError::ParseError {
                format: Format::Yaml,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_yaml_is_empty_map() {
        let root = parse_str("", Format::Yaml, &inline_path()).unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn test_non_map_root_rejected() {
        let result = parse_str("[1, 2]", Format::Json, &inline_path());
        assert!(matches!(result, Err(ConfigError::RootNotMap { .. })));
    }

    #[test]
    fn test_syntax_error_reports_format() {
        let result = parse_str("{ not json", Format::Json, &inline_path());
        assert!(matches!(
            result,
            Err(ConfigError::ParseError {
                format: Format::Json,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_file(Path::new("/nonexistent/path/config.yaml"), Format::Yaml);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_auto_detects_toml() {
        let file = write_temp("[server]\nhost = \"example.com\"\nport = 8080\n");
        let root = load_file_auto(file.path()).unwrap();

        let server = root.get(&Key::from("server")).and_then(Value::as_map).unwrap();
        assert_eq!(server.get(&Key::from("port")), Some(&Value::Int(8080)));
    }

    #[test]
    fn test_auto_detect_unrecognized() {
        let file = write_temp("= = [[[\n");
        let result = load_file_auto(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_auto_detect_missing_file_is_io_error() {
        let result = load_file_auto(Path::new("/nonexistent/path/config"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
