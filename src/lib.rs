//! fwrule - a static packet filter over range-based allow rules.
//!
//! Rules are loaded once from text, one rule per line:
//!
//! ```text
//! <direction>,<protocol>,<port-or-range>,<address-or-range>
//! inbound,tcp,80,192.168.1.1-192.168.1.100
//! outbound,udp,53,8.8.8.8
//! inbound,tcp,10000-20000,10.0.0.1
//! ```
//!
//! Each rule lands in one of four buckets keyed by (direction, protocol).
//! A packet is accepted when any rule in its bucket contains both its port
//! and its source address; both ends of every range are inclusive.
//!
//! # Quick Start
//!
//! ```
//! use fwrule::{Firewall, LoadConfig};
//!
//! let rules = "inbound,tcp,80,192.168.1.1-192.168.1.100\noutbound,udp,53,8.8.8.8\n";
//! let firewall = Firewall::from_reader(rules.as_bytes(), &LoadConfig::default())?;
//!
//! assert!(firewall.accept_packet("inbound", "tcp", 80, "192.168.1.5")?);
//! assert!(!firewall.accept_packet("inbound", "tcp", 81, "192.168.1.5")?);
//! assert!(!firewall.accept_packet("inbound", "udp", 53, "8.8.8.8")?);
//! # Ok::<(), fwrule::Error>(())
//! ```
//!
//! # Errors
//!
//! Loading fails on an unreadable source or, under the default
//! [`MalformedLinePolicy::Reject`], on the first line that does not parse.
//! Queries fail on an unknown direction or protocol, a port above 65535, or a
//! malformed address.

mod direction;
mod engine;
mod error;
mod protocol;

pub mod rule;
pub mod ruleset;

// Re-export core types
pub use direction::Direction;
pub use engine::Firewall;
pub use error::{Error, Result, RuleParseError};
pub use protocol::Protocol;

// Re-export rule store types
pub use rule::{AddressRange, Bucket, PortRange, Rule};
pub use ruleset::{LoadConfig, MalformedLinePolicy, RuleStore};
