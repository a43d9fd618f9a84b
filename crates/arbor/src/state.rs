use std::{fmt, str::FromStr};

use convert_case::{Case, Casing};
use serde::Serialize;

use crate::error::{Error, Result};

/// Return true if the character may appear in a node name.
pub fn valid_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

/// A node name: lowercase ASCII alphanumerics, underscores and dashes. Names
/// need not be unique; they exist for lookup and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Create a name, returning an error if it contains invalid characters.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() || !name.chars().all(valid_name_char) {
            return Err(Error::Invalid(format!("node name {name:?}")));
        }
        Ok(Self(name.to_string()))
    }

    /// Munge an arbitrary string into a valid name: snake-case it, then drop
    /// anything that is still invalid.
    pub fn convert(name: &str) -> Self {
        let filtered: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| valid_name_char(*c))
            .collect();
        if filtered.is_empty() {
            Self("node".into())
        } else {
            Self(filtered)
        }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for NodeName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
