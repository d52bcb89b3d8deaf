//! Dotted path tokenization.
//!
//! `"servers.0.host"` splits into `[Key("servers"), Index(0), Key("host")]`.
//! There is no escaping: a segment can never contain a literal `.`.

use std::fmt;

use super::ConfigError;

/// One `.`-delimited component of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// All-digit segment, addressed as a sequence position.
    Index(usize),
    /// Anything else, addressed as a map key.
    Key(&'a str),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{i}"),
            Segment::Key(k) => f.write_str(k),
        }
    }
}

/// Splits a dotted path into segments.
///
/// Segments made only of ASCII digits become [`Segment::Index`]. A digit run
/// too large for `usize` cannot address any sequence and is kept as a key.
pub(crate) fn parse(path: &str) -> Result<Vec<Segment<'_>>, ConfigError> {
    if path.is_empty() {
        return Err(ConfigError::EmptyPath);
    }

    Ok(path.split('.').map(classify).collect())
}

fn classify(part: &str) -> Segment<'_> {
    if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = part.parse::<usize>() {
            return Segment::Index(index);
        }
    }
    Segment::Key(part)
}
