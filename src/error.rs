//! Error types for fwrule.

use thiserror::Error;

/// Error type for fwrule operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (rule file missing, unreadable, or a failed read mid-file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule line did not match the rule grammar
    #[error("invalid rule on line {line}: {source}")]
    InvalidRule {
        /// 1-based line number in the rule source
        line: usize,
        #[source]
        source: RuleParseError,
    },

    /// A query carried a malformed direction, protocol or address
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] RuleParseError),

    /// A query port outside 0..=65535
    #[error("port out of range: {0}")]
    PortOutOfRange(u32),
}

/// Result type alias for fwrule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for parsing a single rule line or one of its fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    /// Fewer than four comma-separated fields
    #[error("missing {0} field")]
    MissingField(&'static str),

    /// Direction other than `inbound` / `outbound`
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// Protocol other than `tcp` / `udp`
    #[error("invalid protocol: {0:?}")]
    InvalidProtocol(String),

    /// Port that is not a decimal integer in 0..=65535
    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    /// Address that is not a dotted-quad IPv4 address
    #[error("invalid IP address: {0:?}")]
    InvalidIpAddress(String),

    /// Range whose start is numerically greater than its end
    #[error("inverted {field} range: {start} > {end}")]
    InvertedRange {
        field: &'static str,
        start: String,
        end: String,
    },
}
