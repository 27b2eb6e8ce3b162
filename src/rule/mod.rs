//! Rule types and the (direction, protocol) bucket mapping.

mod parser;
mod range;

pub use parser::{parse_ipv4, parse_rule};
pub use range::{AddressRange, PortRange, RuleRange};

use serde::Serialize;
use std::fmt;

use crate::{Direction, Protocol};

/// A single parsed allow rule.
///
/// A packet matches the rule when its direction and protocol are equal to the
/// rule's, its port lies in `ports` and its source address lies in
/// `addresses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    pub direction: Direction,
    pub protocol: Protocol,
    pub ports: PortRange,
    pub addresses: AddressRange,
}

impl Rule {
    /// Get the bucket this rule belongs to.
    pub fn bucket(&self) -> Bucket {
        Bucket::of(self.direction, self.protocol)
    }

    /// Test port and address membership.
    ///
    /// Direction and protocol are not checked here; they select the bucket.
    #[inline]
    pub fn matches(&self, port: u16, address: u32) -> bool {
        self.ports.contains(port) && self.addresses.contains(address)
    }
}

/// Canonical rule-file form, e.g. `inbound,tcp,80,192.168.1.1-192.168.1.100`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.direction, self.protocol, self.ports, self.addresses
        )
    }
}

/// One of the four (direction, protocol) rule buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bucket {
    InboundTcp = 0,
    InboundUdp = 1,
    OutboundTcp = 2,
    OutboundUdp = 3,
}

impl Bucket {
    /// Number of buckets.
    pub const COUNT: usize = 4;

    /// All buckets in index order.
    pub const ALL: [Bucket; Bucket::COUNT] = [
        Bucket::InboundTcp,
        Bucket::InboundUdp,
        Bucket::OutboundTcp,
        Bucket::OutboundUdp,
    ];

    /// Get the bucket for a direction and protocol.
    pub fn of(direction: Direction, protocol: Protocol) -> Self {
        match (direction, protocol) {
            (Direction::Inbound, Protocol::Tcp) => Bucket::InboundTcp,
            (Direction::Inbound, Protocol::Udp) => Bucket::InboundUdp,
            (Direction::Outbound, Protocol::Tcp) => Bucket::OutboundTcp,
            (Direction::Outbound, Protocol::Udp) => Bucket::OutboundUdp,
        }
    }

    /// Array index of this bucket.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn direction(self) -> Direction {
        match self {
            Bucket::InboundTcp | Bucket::InboundUdp => Direction::Inbound,
            Bucket::OutboundTcp | Bucket::OutboundUdp => Direction::Outbound,
        }
    }

    pub fn protocol(self) -> Protocol {
        match self {
            Bucket::InboundTcp | Bucket::OutboundTcp => Protocol::Tcp,
            Bucket::InboundUdp | Bucket::OutboundUdp => Protocol::Udp,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.direction(), self.protocol())
    }
}
