//! Closed set of values an option can carry, and their flag rendering.

use crate::error::{BuildError, Result};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").expect("decimal pattern is valid"));

/// A single element of a list-valued option.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    /// Canonical decimal text: integers as-is, floats through `f64`'s `Display`
    /// (never scientific notation, no trailing `.0` for integral values).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

/// Value of a named option.
///
/// Booleans are presence flags: `true` renders a bare `-name`, `false` renders
/// nothing. Every other variant renders as `-name=<text>`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Elements are comma-joined in their original order.
    List(Vec<Scalar>),
    /// A filesystem location, normalized to an absolute path when the config is built.
    Path(PathBuf),
}

impl OptionValue {
    /// Short human-readable name of the variant, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
            OptionValue::List(_) => "list",
            OptionValue::Path(_) => "path",
        }
    }

    /// Reject values that type-check but have no textual form CatGt can parse.
    pub(crate) fn check(&self, option: &str) -> Result<()> {
        let non_finite = match self {
            OptionValue::Float(v) => !v.is_finite(),
            OptionValue::List(items) => items
                .iter()
                .any(|item| matches!(item, Scalar::Float(v) if !v.is_finite())),
            _ => false,
        };
        if non_finite {
            return Err(BuildError::unsupported(option, "non-finite float"));
        }
        Ok(())
    }

    /// Render this value as a CatGt flag named `flag` (already in dash form).
    ///
    /// Returns `None` for `Bool(false)`, which is omitted from the command.
    pub(crate) fn to_flag(&self, flag: &str) -> Option<String> {
        let text = match self {
            OptionValue::Bool(true) => return Some(format!("-{}", flag)),
            OptionValue::Bool(false) => return None,
            OptionValue::Int(v) => v.to_string(),
            OptionValue::Float(v) => v.to_string(),
            OptionValue::Str(v) => v.clone(),
            OptionValue::List(items) => items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            OptionValue::Path(p) => p.to_string_lossy().into_owned(),
        };
        Some(format!("-{}={}", flag, text))
    }

    /// Convert a TOML value from a settings file.
    ///
    /// Tables, datetimes, nested arrays and booleans inside arrays have no CatGt
    /// spelling and are rejected with [`BuildError::UnsupportedValueType`].
    pub fn from_toml(option: &str, value: &toml::Value) -> Result<Self> {
        let converted = match value {
            toml::Value::Boolean(b) => OptionValue::Bool(*b),
            toml::Value::Integer(i) => OptionValue::Int(*i),
            toml::Value::Float(x) => OptionValue::Float(*x),
            toml::Value::String(s) => OptionValue::Str(s.clone()),
            toml::Value::Array(items) => OptionValue::List(
                items
                    .iter()
                    .map(|item| scalar_from_toml(option, item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            toml::Value::Datetime(_) => return Err(BuildError::unsupported(option, "datetime")),
            toml::Value::Table(_) => return Err(BuildError::unsupported(option, "table")),
        };
        converted.check(option)?;
        Ok(converted)
    }
}

impl Scalar {
    /// Guess the type of a bare textual value: integers and plain decimals become
    /// numbers, anything else stays a string.
    pub fn infer(text: &str) -> Self {
        if INTEGER.is_match(text) {
            if let Ok(v) = text.parse() {
                return Scalar::Int(v);
            }
        }
        if DECIMAL.is_match(text) {
            if let Ok(v) = text.parse() {
                return Scalar::Float(v);
            }
        }
        Scalar::Str(text.to_string())
    }
}

impl OptionValue {
    /// Guess the type of a value given as text, e.g. on a command line.
    ///
    /// `true`/`false` become booleans, text containing a comma becomes a list of
    /// inferred scalars, and everything else goes through [`Scalar::infer`].
    pub fn infer(text: &str) -> Self {
        match text {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ if text.contains(',') => {
                OptionValue::List(text.split(',').map(Scalar::infer).collect())
            }
            _ => Scalar::infer(text).into(),
        }
    }
}

fn scalar_from_toml(option: &str, value: &toml::Value) -> Result<Scalar> {
    match value {
        toml::Value::Integer(i) => Ok(Scalar::Int(*i)),
        toml::Value::Float(x) => Ok(Scalar::Float(*x)),
        toml::Value::String(s) => Ok(Scalar::Str(s.clone())),
        toml::Value::Boolean(_) => Err(BuildError::unsupported(option, "boolean inside a list")),
        toml::Value::Array(_) => Err(BuildError::unsupported(option, "nested list")),
        toml::Value::Datetime(_) => Err(BuildError::unsupported(option, "datetime inside a list")),
        toml::Value::Table(_) => Err(BuildError::unsupported(option, "table inside a list")),
    }
}

// f32 goes through its own shortest text form so 0.1f32 stays "0.1" rather
// than the widened 0.10000000149011612.
fn widen_f32(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(f64::from(v))
}

macro_rules! from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::Int(i64::from(v))
            }
        }

        impl From<$t> for OptionValue {
            fn from(v: $t) -> Self {
                OptionValue::Int(i64::from(v))
            }
        }
    )*};
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

// Values above i64::MAX keep their exact decimal text, which renders the same flag.
macro_rules! from_wide_uint {
    ($($t:ty),*) => {$(
        impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                match i64::try_from(v) {
                    Ok(i) => Scalar::Int(i),
                    Err(_) => Scalar::Str(v.to_string()),
                }
            }
        }

        impl From<$t> for OptionValue {
            fn from(v: $t) -> Self {
                Scalar::from(v).into()
            }
        }
    )*};
}

from_wide_uint!(u64, usize);

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(widen_f32(v))
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        OptionValue::Float(widen_f32(v))
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<Scalar> for OptionValue {
    fn from(v: Scalar) -> Self {
        match v {
            Scalar::Int(i) => OptionValue::Int(i),
            Scalar::Float(x) => OptionValue::Float(x),
            Scalar::Str(s) => OptionValue::Str(s),
        }
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for OptionValue {
    fn from(v: Vec<T>) -> Self {
        OptionValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>, const N: usize> From<[T; N]> for OptionValue {
    fn from(v: [T; N]) -> Self {
        OptionValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Scalar>> From<&[T]> for OptionValue {
    fn from(v: &[T]) -> Self {
        OptionValue::List(v.iter().cloned().map(Into::into).collect())
    }
}
