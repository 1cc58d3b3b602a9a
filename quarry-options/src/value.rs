use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Serialize, Serializer};

use crate::InvalidValue;

/// A whole number of any magnitude.
///
/// Stored as a sign and normalized decimal digits, so values beyond the
/// machine integer range survive resolution unchanged. Use [`Integer::to_i64`]
/// where a bounded number is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    /// ASCII digits without leading zeros; `"0"` for zero.
    digits: String,
}

impl Integer {
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The value as an `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_string().parse().ok()
    }
}

impl FromStr for Integer {
    type Err = InvalidValue;

    /// Accepts an optional sign followed by decimal digits, with surrounding
    /// whitespace ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidValue::NotAnInteger {
            raw: raw.to_string(),
        };
        let trimmed = raw.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let digits = match body.trim_start_matches('0') {
            "" => "0",
            rest => rest,
        };
        Ok(Self {
            negative: negative && digits != "0",
            digits: digits.to_string(),
        })
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self {
            negative: value < 0,
            digits: value.unsigned_abs().to_string(),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "{}", self.digits)
    }
}

impl Serialize for Integer {
    /// A number when it fits in an `i64`, otherwise its decimal string.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_i64() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.collect_str(self),
        }
    }
}

/// A coerced option value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// No value was supplied and the option has no default.
    #[default]
    Unset,
    Bool(bool),
    Int(Integer),
    Str(String),
    Path(PathBuf),
    /// An enum value, canonicalized to its declared casing.
    Choice(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, OptionValue::Unset)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            OptionValue::Int(i) => Some(i),
            _ => None,
        }
    }

    /// An `Int` value that fits in an `i64`.
    pub fn as_int(&self) -> Option<i64> {
        self.as_integer().and_then(Integer::to_i64)
    }

    /// String content of a `Str` or `Choice` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) | OptionValue::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            OptionValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Unset => write!(f, "<unset>"),
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Str(s) | OptionValue::Choice(s) => write!(f, "{}", s),
            OptionValue::Path(p) => write!(f, "{}", p.display()),
            OptionValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value.into())
    }
}

impl From<Integer> for OptionValue {
    fn from(value: Integer) -> Self {
        OptionValue::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

impl From<PathBuf> for OptionValue {
    fn from(value: PathBuf) -> Self {
        OptionValue::Path(value)
    }
}
