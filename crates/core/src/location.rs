//! Location size/status enumerations and location code rules.
//!
//! Both enumerations travel as upper-case labels (`"SMALL"`, `"EMPTY"`, ...)
//! on the wire and in the `locations` table. Parsing is case-insensitive and
//! also accepts the Spanish size labels still sent by older scanner clients
//! (`PEQUEÑO`, `MEDIANO`, `GRANDE`). Output is always the canonical label,
//! and only canonical labels are ever stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a location code such as `U010101A1`.
pub const MAX_LOCATION_CODE_LEN: usize = 32;

macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical upper-case label stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_uppercase();
                match normalized.as_str() {
                    $( $label $(| $alias)* => Ok($name::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "Invalid {}: '{}'. Must be one of: {}",
                        $what,
                        s.trim(),
                        [$($label),+].join(", "),
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_label_enum! {
    /// Physical size class of a storage bin.
    LocationSize, "location size" {
        Small = "SMALL" | "PEQUEÑO" | "PEQUENO",
        Medium = "MEDIUM" | "MEDIANO",
        Large = "LARGE" | "GRANDE",
    }
}

define_label_enum! {
    /// Fill status of a storage bin.
    LocationStatus, "location status" {
        Empty = "EMPTY",
        Half = "HALF",
        Full = "FULL",
    }
}

/// Validate and normalize a location code.
///
/// Surrounding whitespace (common with keyboard-wedge scanners) is removed.
/// The remaining code must be non-empty, at most [`MAX_LOCATION_CODE_LEN`]
/// characters, and contain only ASCII letters, digits, `-` or `_`. Case is
/// preserved; codes are compared case-sensitively.
pub fn validate_location_code(raw: &str) -> Result<String, CoreError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(CoreError::Validation(
            "Location code must not be empty".into(),
        ));
    }
    if code.len() > MAX_LOCATION_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "Location code must be at most {MAX_LOCATION_CODE_LEN} characters"
        )));
    }
    if let Some(bad) = code
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CoreError::Validation(format!(
            "Location code contains invalid character '{bad}'"
        )));
    }
    Ok(code.to_string())
}
