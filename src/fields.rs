//! Field helpers shared by the record types
//!
//! Input normalization (trimming, required/optional text), timestamps, and
//! the `closed_enum!` macro used for the fixed value sets stored as text.

use crate::{Error, Result};
use chrono::{Local, NaiveDate};

/// Format used for `created_at` columns
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used for date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trim a required text field, rejecting blank values
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank becomes `None`
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Display text for an optional value: `-` when absent or blank
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

/// Current local time in the stored timestamp format
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Today's local date in the stored date format
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::invalid(field, format!("`{}` is not a YYYY-MM-DD date ({})", value.trim(), e)))
}

/// Normalized lookup key for enum text: case-insensitive, `-`/`_` read as spaces
pub(crate) fn choice_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a text column onto a closed enum while reading a row
pub(crate) fn column_choice<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = Error>,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Declares a closed set of values persisted by their display text.
///
/// Generates `as_str`, `all`, `Default`, `FromStr` (rejecting values outside
/// the set), `Display` and serde impls using the display text.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $field:literal, default $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Get the stored text of this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Get all values, in display order
            pub fn all() -> &'static [$name] {
                &[ $( $name::$variant, )+ ]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> crate::Result<Self> {
                let wanted = crate::fields::choice_key(s);
                $name::all()
                    .iter()
                    .copied()
                    .find(|v| crate::fields::choice_key(v.as_str()) == wanted)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = $name::all().iter().map(|v| v.as_str()).collect();
                        crate::Error::invalid(
                            $field,
                            format!("unknown value `{}` (expected one of: {})", s.trim(), expected.join(", ")),
                        )
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

pub(crate) use closed_enum;
