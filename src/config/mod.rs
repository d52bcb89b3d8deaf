//! Configuration loading and dotted-path access.

mod env;
mod error;
mod file;
mod path;
mod resolve;
mod tree;
mod value;

pub use env::ENV_MARKER;
pub use error::ConfigError;
pub use file::Format;
pub use tree::{Config, FromValue};
pub use value::{Key, Map, Sequence, Value, ValueKind};
