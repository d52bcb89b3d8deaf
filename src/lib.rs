pub mod config;

pub use config::{
    Config, ConfigError, Format, FromValue, Key, Map, Sequence, Value, ValueKind, ENV_MARKER,
};
