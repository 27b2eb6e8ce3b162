//! Packet matching against a loaded rule store.

use std::io::Read;
use std::net::Ipv4Addr;
use std::path::Path;

use crate::error::{Error, Result};
use crate::rule::parse_ipv4;
use crate::ruleset::{LoadConfig, RuleStore};
use crate::{Direction, Protocol};

/// Firewall answers allow/deny for packets against a fixed rule store.
///
/// Rules are allow rules with OR semantics: a packet is accepted when any
/// rule in its (direction, protocol) bucket contains both its port and its
/// address. Queries never mutate the store, so a `&Firewall` can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Firewall {
    store: RuleStore,
}

impl Firewall {
    /// Create a firewall over an already built store.
    pub fn new(store: RuleStore) -> Self {
        Self { store }
    }

    /// Load a firewall from a rule file.
    ///
    /// # Examples
    /// ```no_run
    /// use fwrule::{Firewall, LoadConfig};
    ///
    /// let firewall = Firewall::from_path("rules.csv", &LoadConfig::default())?;
    /// let allowed = firewall.accept_packet("inbound", "tcp", 80, "192.168.1.2")?;
    /// # Ok::<(), fwrule::Error>(())
    /// ```
    pub fn from_path(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Self> {
        RuleStore::from_path(path, config).map(Self::new)
    }

    /// Load a firewall by reading rule lines from a reader.
    pub fn from_reader<R: Read>(reader: R, config: &LoadConfig) -> Result<Self> {
        RuleStore::from_reader(reader, config).map(Self::new)
    }

    /// Get the underlying rule store.
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Decide whether a packet is allowed.
    pub fn accept(
        &self,
        direction: Direction,
        protocol: Protocol,
        port: u16,
        address: Ipv4Addr,
    ) -> bool {
        self.matching_rule(direction, protocol, port, address).is_some()
    }

    /// Index of the first rule in the packet's bucket that allows it.
    ///
    /// Buckets are scanned in load order, so the result is deterministic, but
    /// any matching index would justify the same decision.
    pub fn matching_rule(
        &self,
        direction: Direction,
        protocol: Protocol,
        port: u16,
        address: Ipv4Addr,
    ) -> Option<usize> {
        let address = u32::from(address);
        let rules = self.store.rules();

        let hit = self
            .store
            .bucket_for(direction, protocol)
            .iter()
            .copied()
            .find(|&index| rules[index].matches(port, address));

        if let Some(index) = hit {
            log::trace!(
                "{},{},{},{} allowed by rule {}",
                direction,
                protocol,
                port,
                Ipv4Addr::from(address),
                index
            );
        }
        hit
    }

    /// Decide whether a packet is allowed, from its textual fields.
    ///
    /// Unlike [`Firewall::accept`], every field is validated: an unknown
    /// direction or protocol, a port above 65535 or a malformed address is an
    /// error, never a silent deny.
    pub fn accept_packet(
        &self,
        direction: &str,
        protocol: &str,
        port: u32,
        address: &str,
    ) -> Result<bool> {
        let direction: Direction = direction.parse()?;
        let protocol: Protocol = protocol.parse()?;
        let port = u16::try_from(port).map_err(|_| Error::PortOutOfRange(port))?;
        let address = Ipv4Addr::from(parse_ipv4(address)?);

        Ok(self.accept(direction, protocol, port, address))
    }
}
