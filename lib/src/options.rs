//! Shared option types that replace boolean flag parameters in the Rust API.

use serde::{Deserialize, Serialize};

/// Controls which triples [`crate::query::QueryEngine::describe_with`] collects.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescribeMode {
    /// Only triples whose subject is the described IRI.
    #[default]
    Subject,
    /// Triples whose subject or object is the described IRI.
    SubjectOrObject,
}

impl DescribeMode {
    pub fn includes_inbound(self) -> bool {
        matches!(self, DescribeMode::SubjectOrObject)
    }
}

/// Controls how a save handles an existing file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Overwrite {
    /// Replace whatever is at the destination.
    Allow,
    /// Fail rather than replace an existing file.
    Preserve,
}

impl Overwrite {
    pub fn as_bool(self) -> bool {
        matches!(self, Overwrite::Allow)
    }
}

impl From<bool> for Overwrite {
    fn from(value: bool) -> Self {
        if value {
            Overwrite::Allow
        } else {
            Overwrite::Preserve
        }
    }
}
