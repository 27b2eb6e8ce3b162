//! Inclusive value ranges.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// An inclusive range `start..=end`.
///
/// The constructor guarantees `start <= end`. A range with `start == end`
/// is degenerate and matches a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RuleRange<T> {
    start: T,
    end: T,
}

/// Port range of a rule.
pub type PortRange = RuleRange<u16>;

/// IPv4 address range of a rule, as big-endian integers.
pub type AddressRange = RuleRange<u32>;

impl<T: Copy + Ord> RuleRange<T> {
    /// Create a range, returning `None` if `start > end`.
    pub fn new(start: T, end: T) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Create a range holding exactly one value.
    pub fn single(value: T) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// Whether this range holds exactly one value.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Inclusive membership test on both ends.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        value >= self.start && value <= self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = Ipv4Addr::from(self.start);
        if self.is_single() {
            write!(f, "{}", start)
        } else {
            write!(f, "{}-{}", start, Ipv4Addr::from(self.end))
        }
    }
}
