//! Dotted path resolution over the configuration tree.
//!
//! Each segment narrows the current node by one level. Digit-only segments
//! address sequence positions, everything else addresses map keys, so a path
//! like `servers.0.host` walks alternating maps and sequences without the
//! caller declaring node shapes. Resolution stops at the first failing
//! segment.

use super::path::{self, Segment};
use super::value::{Key, Map, Value, ValueKind};
use super::ConfigError;

/// Resolves `path` against the root map and returns the addressed node.
pub(crate) fn lookup_path<'a>(root: &'a Map, path: &str) -> Result<&'a Value, ConfigError> {
    let segments = path::parse(path)?;
    let Some((first, rest)) = segments.split_first() else {
        return Err(ConfigError::EmptyPath);
    };

    let mut current = match *first {
        Segment::Key(key) => map_child(root, key)?,
        Segment::Index(_) => {
            return Err(ConfigError::SegmentTypeMismatch {
                segment: first.to_string(),
                expected: ValueKind::Sequence,
                actual: ValueKind::Map,
            })
        }
    };
    for segment in rest {
        current = resolve_segment(current, *segment)?;
    }

    Ok(current)
}

/// Extracts the child of `node` addressed by a single segment.
fn resolve_segment<'a>(node: &'a Value, segment: Segment<'_>) -> Result<&'a Value, ConfigError> {
    match segment {
        Segment::Index(index) => {
            let Value::Sequence(items) = node else {
                return Err(mismatch(segment, ValueKind::Sequence, node));
            };
            items.get(index).ok_or(ConfigError::IndexInvalid {
                index,
                len: items.len(),
            })
        }
        Segment::Key(key) => {
            let Value::Map(map) = node else {
                return Err(mismatch(segment, ValueKind::Map, node));
            };
            map_child(map, key)
        }
    }
}

fn map_child<'a>(map: &'a Map, key: &str) -> Result<&'a Value, ConfigError> {
    map.get(&Key::from(key)).ok_or_else(|| ConfigError::KeyNotFound {
        key: key.to_string(),
    })
}

fn mismatch(segment: Segment<'_>, expected: ValueKind, node: &Value) -> ConfigError {
    ConfigError::SegmentTypeMismatch {
        segment: segment.to_string(),
        expected,
        actual: node.kind(),
    }
}
