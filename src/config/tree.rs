use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::env;
use super::file::{self, Format};
use super::resolve::lookup_path;
use super::value::{Key, Map, Sequence, Value, ValueKind};
use super::ConfigError;

/// A loaded configuration document with dotted-path access.
///
/// Paths are `.`-separated. A segment made only of digits addresses a
/// sequence element, any other segment addresses a map key:
///
/// ```
/// use confpath::{Config, Format};
///
/// let config = Config::parse(
///     r#"{"a": {"b": [10, 20, 30], "c": "x"}}"#,
///     Format::Json,
/// )?;
///
/// assert_eq!(config.get_int("a.b.1")?, 20);
/// assert_eq!(config.get_string("a.c")?, "x");
/// assert_eq!(config.get_int_or("a.z", 99), 99);
/// # Ok::<(), confpath::ConfigError>(())
/// ```
///
/// Strict accessors (`get_*`) return the first error met while walking the
/// path, or a [`ConfigError::LeafTypeMismatch`] when the addressed value has a
/// different type than requested. No conversion between types is attempted:
/// an integer is never returned as a float, nor a boolean as a string.
///
/// Defaulted accessors (`get_*_or`) never fail. Every error, whether the key
/// is missing or present with the wrong type, is replaced by the default.
/// Use the strict accessors when those cases must be told apart.
///
/// The tree is never mutated after loading, so a `Config` can be shared
/// across threads freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: Map,
}

impl From<Map> for Config {
    fn from(root: Map) -> Self {
        Self::new(root)
    }
}

/// A static type that can be extracted from a [`Value`] without conversion.
pub trait FromValue: Sized {
    /// The only dynamic type this target accepts.
    const KIND: ValueKind;

    /// Returns the value if its dynamic type is exactly [`Self::KIND`].
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for Map {
    const KIND: ValueKind = ValueKind::Map;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_map().cloned()
    }
}

impl FromValue for Sequence {
    const KIND: ValueKind = ValueKind::Sequence;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_sequence().cloned()
    }
}

impl Config {
    /// Wraps an already decoded root map.
    pub fn new(root: Map) -> Self {
        Self { root }
    }

    /// Parses a document held in memory.
    pub fn parse(contents: &str, format: Format) -> Result<Self, ConfigError> {
        file::parse_str(contents, format, &file::inline_path()).map(Self::new)
    }

    /// Loads a config file written in `format`.
    pub fn load(path: impl AsRef<Path>, format: Format) -> Result<Self, ConfigError> {
        file::load_file(path.as_ref(), format).map(Self::new)
    }

    /// Loads a config file, trying YAML, JSON and TOML in that order.
    ///
    /// Per-format parse errors are discarded; when no format accepts the
    /// file the error is [`ConfigError::UnsupportedFormat`].
    pub fn load_auto(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        file::load_file_auto(path.as_ref()).map(Self::new)
    }

    /// Returns the root map.
    pub fn root(&self) -> &Map {
        &self.root
    }

    /// Returns a reference to the node at `path`, whatever its type.
    pub fn get_value(&self, path: &str) -> Result<&Value, ConfigError> {
        lookup_path(&self.root, path)
    }

    /// Returns the value at `path` if its type is exactly `T`.
    pub fn get<T: FromValue>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self.get_value(path)?;
        T::from_value(value).ok_or_else(|| ConfigError::LeafTypeMismatch {
            path: path.to_string(),
            expected: T::KIND,
            actual: value.kind(),
        })
    }

    /// Returns the value at `path`, or `default` on any error.
    ///
    /// Missing keys and type mismatches are indistinguishable here.
    pub fn get_or<T: FromValue>(&self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    /// Returns the string at `path`.
    ///
    /// A value written as `---ENV NAME` is replaced by the `NAME`
    /// environment variable, or an empty string when it is unset.
    pub fn get_string(&self, path: &str) -> Result<String, ConfigError> {
        self.get::<String>(path).map(env::expand)
    }

    pub fn get_int(&self, path: &str) -> Result<i64, ConfigError> {
        self.get(path)
    }

    pub fn get_float(&self, path: &str) -> Result<f64, ConfigError> {
        self.get(path)
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, ConfigError> {
        self.get(path)
    }

    pub fn get_map(&self, path: &str) -> Result<Map, ConfigError> {
        self.get(path)
    }

    pub fn get_sequence(&self, path: &str) -> Result<Sequence, ConfigError> {
        self.get(path)
    }

    /// Returns the string at `path`, or `default` on any error.
    ///
    /// Environment indirection is not applied to either the stored value or
    /// the default.
    pub fn get_string_or(&self, path: &str, default: impl Into<String>) -> String {
        self.get_or(path, default.into())
    }

    pub fn get_int_or(&self, path: &str, default: i64) -> i64 {
        self.get_or(path, default)
    }

    pub fn get_float_or(&self, path: &str, default: f64) -> f64 {
        self.get_or(path, default)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> bool {
        self.get_or(path, default)
    }

    pub fn get_map_or(&self, path: &str, default: Map) -> Map {
        self.get_or(path, default)
    }

    pub fn get_sequence_or(&self, path: &str, default: Sequence) -> Sequence {
        self.get_or(path, default)
    }

    /// Returns the keys of the map at `path`.
    pub fn list_keys(&self, path: &str) -> Result<BTreeSet<Key>, ConfigError> {
        Ok(self.map_at(path)?.keys().cloned().collect())
    }

    /// Decodes the map at `path` into `T` by field name.
    ///
    /// The subtree passes through a JSON representation, so non-finite
    /// floats (YAML `.nan`, `.inf`) arrive as `null`. An `f64` field holding
    /// one fails to decode; use `Option<f64>` or read it with
    /// [`Config::get_float`].
    ///
    /// ```
    /// use confpath::{Config, Format};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let config = Config::parse("server:\n  host: localhost\n  port: 8080\n", Format::Yaml)?;
    /// let server: Server = config.decode_as("server")?;
    /// assert_eq!(server.port, 8080);
    /// # Ok::<(), confpath::ConfigError>(())
    /// ```
    pub fn decode_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let map = self.map_at(path)?;
        decode_map(map, path)
    }

    /// Decodes the whole document into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        decode_map(&self.root, "")
    }

    fn map_at(&self, path: &str) -> Result<&Map, ConfigError> {
        let value = self.get_value(path)?;
        value.as_map().ok_or_else(|| ConfigError::LeafTypeMismatch {
            path: path.to_string(),
            expected: ValueKind::Map,
            actual: value.kind(),
        })
    }
}

fn decode_map<T: DeserializeOwned>(map: &Map, path: &str) -> Result<T, ConfigError> {
    let decode_error = |source: serde_json::Error| ConfigError::Decode {
        path: path.to_string(),
        source,
    };

    let json = serde_json::to_value(map).map_err(decode_error)?;
    serde_json::from_value(json).map_err(decode_error)
}

/// Renders the tree as pretty-printed JSON.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.root) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("{}"),
        }
    }
}
