//! Validation of exposed function names

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// lowerCamelCase or snake_case identifier, as guest property names are written
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*([A-Z_][a-z0-9_]*)*$").expect("identifier pattern is valid")
});

/// Which names a registry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// A single identifier: `add`, `typeOf`, `to_upper`
    Identifier,
    /// Identifiers joined by dots: `math.sqrt`
    #[default]
    Dotted,
    /// Anything non-empty without whitespace or NUL
    Any,
}

impl NamePolicy {
    /// Whether `name` is acceptable under this policy
    pub fn accepts(self, name: &str) -> bool {
        match self {
            NamePolicy::Identifier => IDENTIFIER.is_match(name),
            NamePolicy::Dotted => name.split('.').all(|segment| IDENTIFIER.is_match(segment)),
            NamePolicy::Any => {
                !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '\0')
            }
        }
    }
}
