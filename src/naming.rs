//! Mapping between Rust-style option names and CatGt flag names.

use crate::error::{BuildError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Separator used between words in option names supplied by callers.
pub const WORD_SEPARATOR: char = '_';

/// Separator CatGt uses between words in its flag names.
pub const FLAG_SEPARATOR: char = '-';

/// Flags emitted from the dedicated fields of a config. Options may not reuse them.
pub const RESERVED_FLAGS: [&str; 4] = ["dir", "run", "g", "t"];

static OPTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("option name pattern is valid"));

/// Rewrite an option name into CatGt's flag spelling.
///
/// Every underscore becomes a dash, one for one. Leading, trailing and
/// consecutive separators are kept in place, so `_a__b_` becomes `-a--b-`.
///
/// ```
/// assert_eq!(catgt_commands::naming::to_flag_name("prb_fld"), "prb-fld");
/// ```
pub fn to_flag_name(name: &str) -> String {
    name.replace(WORD_SEPARATOR, &FLAG_SEPARATOR.to_string())
}

/// Validate an option name and return its flag spelling.
///
/// Names must be non-empty, consist of ASCII letters, digits, `_` or `-`, and
/// must not collide with one of [`RESERVED_FLAGS`].
pub fn validate_option_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(BuildError::Configuration(
            "option name must not be empty".to_string(),
        ));
    }
    if !OPTION_NAME.is_match(name) {
        return Err(BuildError::Configuration(format!(
            "option name '{}' may only contain ASCII letters, digits, '_' or '-'",
            name
        )));
    }
    let flag = to_flag_name(name);
    if RESERVED_FLAGS.contains(&flag.as_str()) {
        return Err(BuildError::Configuration(format!(
            "option '{}' would duplicate the reserved flag -{}",
            name, flag
        )));
    }
    Ok(flag)
}
