//! Request verbs used to select a route table.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// HTTP-style verb. Only selects a sub-registry; no network semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// All recognised verbs, in table order.
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Put, Verb::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Verb::Get => 0,
            Verb::Post => 1,
            Verb::Put => 2,
            Verb::Delete => 3,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a form declares a method outside the recognised set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised verb: {0}")]
pub struct UnknownVerb(pub String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    /// Case-insensitive, the way form `method` attributes are written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(UnknownVerb(s.to_string())),
        }
    }
}
