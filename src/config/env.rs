//! Environment variable indirection for string values.
//!
//! A string value of the form `---ENV NAME` is replaced by the value of the
//! `NAME` environment variable. Unset variables yield an empty string.

/// Marker that turns a string value into an environment variable reference.
pub const ENV_MARKER: &str = "---ENV ";

/// Substitutes `value` from the environment if it carries [`ENV_MARKER`].
pub(crate) fn expand(value: String) -> String {
    let Some(name) = value.strip_prefix(ENV_MARKER) else {
        return value;
    };

    match std::env::var(name) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::debug!(var = name, error = %e, "referenced environment variable unavailable");
            String::new()
        }
    }
}
