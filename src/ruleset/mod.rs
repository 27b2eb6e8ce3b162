//! Rule store: parsed rules bucketed by direction and protocol.

mod config;

pub use config::{LoadConfig, MalformedLinePolicy};

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::rule::{parse_rule, AddressRange, Bucket, PortRange, Rule};
use crate::{Direction, Protocol};

/// RuleStore owns every loaded rule.
///
/// Rule indices are assigned in load order starting at 0. Each index is a
/// member of exactly one of four buckets, selected by the rule's direction
/// and protocol. The store is immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    /// All rules, indexed by rule number
    rules: Vec<Rule>,
    /// Rule numbers per bucket, indexed by `Bucket::index()`
    buckets: [Vec<usize>; Bucket::COUNT],
}

impl RuleStore {
    /// Build a store from rule-text lines.
    ///
    /// # Examples
    /// ```
    /// use fwrule::{Direction, LoadConfig, Protocol, RuleStore};
    ///
    /// let store = RuleStore::load(
    ///     ["inbound,tcp,80,192.168.1.1-192.168.1.100", "outbound,udp,53,8.8.8.8"],
    ///     &LoadConfig::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(store.bucket_for(Direction::Outbound, Protocol::Udp), &[1]);
    /// ```
    pub fn load<I, S>(lines: I, config: &LoadConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(lines.into_iter().map(Ok), config)
    }

    /// Build a store by reading rule lines from a reader.
    pub fn from_reader<R: Read>(reader: R, config: &LoadConfig) -> Result<Self> {
        let lines = BufReader::new(reader).lines().map(|l| l.map_err(Error::from));
        Self::build(lines, config)
    }

    /// Build a store from a rule file.
    ///
    /// A file that cannot be opened is reported before any line is parsed.
    pub fn from_path(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("Loading rules from {}", path.display());
        Self::from_reader(file, config)
    }

    /// Build a store from already parsed rules.
    pub fn from_rules<I: IntoIterator<Item = Rule>>(rules: I) -> Self {
        let mut store = Self::default();
        for rule in rules {
            store.push(rule);
        }
        store
    }

    fn build<I, S>(lines: I, config: &LoadConfig) -> Result<Self>
    where
        I: Iterator<Item = Result<S>>,
        S: AsRef<str>,
    {
        let mut store = Self::default();
        let mut skipped = 0usize;

        for (line_no, line) in (1..).zip(lines) {
            let line = line?;
            let line = line.as_ref();

            if config.ignores(line) {
                continue;
            }

            match parse_rule(line) {
                Ok(rule) => store.push(rule),
                Err(source) => match config.on_malformed {
                    MalformedLinePolicy::Reject => {
                        return Err(Error::InvalidRule {
                            line: line_no,
                            source,
                        })
                    }
                    MalformedLinePolicy::Skip => {
                        log::warn!("Skipping rule on line {}: {}", line_no, source);
                        skipped += 1;
                    }
                },
            }
        }

        log::debug!(
            "Loaded {} rules ({} skipped): {}",
            store.len(),
            skipped,
            store.summary()
        );

        Ok(store)
    }

    fn push(&mut self, rule: Rule) {
        let index = self.rules.len();
        self.buckets[rule.bucket().index()].push(index);
        self.rules.push(rule);
    }

    /// Rule indices for a direction and protocol.
    pub fn bucket_for(&self, direction: Direction, protocol: Protocol) -> &[usize] {
        self.bucket(Bucket::of(direction, protocol))
    }

    /// Rule indices in a bucket.
    pub fn bucket(&self, bucket: Bucket) -> &[usize] {
        &self.buckets[bucket.index()]
    }

    /// Number of rules in a bucket.
    pub fn bucket_len(&self, bucket: Bucket) -> usize {
        self.buckets[bucket.index()].len()
    }

    /// Port range of a rule, or `None` for an unknown index.
    pub fn port_range_of(&self, index: usize) -> Option<PortRange> {
        self.rules.get(index).map(|r| r.ports)
    }

    /// Address range of a rule, or `None` for an unknown index.
    pub fn address_range_of(&self, index: usize) -> Option<AddressRange> {
        self.rules.get(index).map(|r| r.addresses)
    }

    pub fn rule(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// All rules in index order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the total number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Per-bucket counts, e.g. `inbound,tcp=2 inbound,udp=0 ...`.
    pub fn summary(&self) -> String {
        Bucket::ALL
            .iter()
            .map(|b| format!("{}={}", b, self.bucket_len(*b)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
