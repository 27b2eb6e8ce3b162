//! Traffic direction.

use serde::Serialize;
use std::fmt;

use crate::error::RuleParseError;

/// Direction of the traffic a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Traffic arriving at the host
    Inbound,
    /// Traffic leaving the host
    Outbound,
}

impl Direction {
    /// All directions, in bucket order.
    pub const ALL: [Direction; 2] = [Direction::Inbound, Direction::Outbound];

    /// Parse a direction from its rule-file form.
    ///
    /// Only the exact lowercase strings `inbound` and `outbound` are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inbound" => Some(Direction::Inbound),
            "outbound" => Some(Direction::Outbound),
            _ => None,
        }
    }

    /// Get the rule-file string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RuleParseError::InvalidDirection(s.to_string()))
    }
}
