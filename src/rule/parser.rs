//! Rule line parser.
//!
//! Grammar, one rule per line:
//!
//! ```text
//! <direction>,<protocol>,<port-or-range>,<address-or-range>
//! ```
//!
//! `direction` is `inbound` or `outbound`, `protocol` is `tcp` or `udp`.
//! A port is a decimal integer in 0..=65535 and an address is a dotted-quad
//! IPv4 address. Either may be given as `start-end`, which is inclusive.

use super::{AddressRange, PortRange, Rule, RuleRange};
use crate::error::RuleParseError;
use crate::{Direction, Protocol};

/// Parse one rule line.
///
/// # Examples
/// ```
/// use fwrule::rule::parse_rule;
/// use fwrule::{Direction, Protocol};
///
/// let rule = parse_rule("inbound,tcp,80,192.168.1.1-192.168.1.100").unwrap();
/// assert_eq!(rule.direction, Direction::Inbound);
/// assert_eq!(rule.protocol, Protocol::Tcp);
/// assert!(rule.ports.is_single());
/// ```
pub fn parse_rule(line: &str) -> Result<Rule, RuleParseError> {
    // The first two commas delimit direction and protocol; the first comma of
    // the remainder delimits port from address.
    let mut fields = line.splitn(3, ',');
    let direction = fields
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RuleParseError::MissingField("direction"))?;
    let protocol = fields
        .next()
        .map(str::trim)
        .ok_or(RuleParseError::MissingField("protocol"))?;
    let rest = fields.next().ok_or(RuleParseError::MissingField("port"))?;
    let (port, address) = rest
        .split_once(',')
        .ok_or(RuleParseError::MissingField("address"))?;

    Ok(Rule {
        direction: direction.parse()?,
        protocol: protocol.parse()?,
        ports: parse_port_range(port.trim())?,
        addresses: parse_address_range(address.trim())?,
    })
}

/// Convert a dotted-quad IPv4 address to its big-endian integer form.
///
/// ```
/// assert_eq!(fwrule::rule::parse_ipv4("192.168.1.1").unwrap(), 0xC0A8_0101);
/// ```
pub fn parse_ipv4(s: &str) -> Result<u32, RuleParseError> {
    let invalid = || RuleParseError::InvalidIpAddress(s.to_string());

    let mut octets = s.split('.');
    let mut value: u32 = 0;
    for _ in 0..4 {
        let octet = octets.next().ok_or_else(invalid)?;
        if !is_decimal(octet) {
            return Err(invalid());
        }
        let octet: u8 = octet.parse().map_err(|_| invalid())?;
        value = (value << 8) | u32::from(octet);
    }
    if octets.next().is_some() {
        return Err(invalid());
    }

    Ok(value)
}

/// Parse a port or `start-end` port range.
pub(crate) fn parse_port_range(s: &str) -> Result<PortRange, RuleParseError> {
    parse_range(s, "port", parse_port)
}

/// Parse an address or `start-end` address range.
pub(crate) fn parse_address_range(s: &str) -> Result<AddressRange, RuleParseError> {
    parse_range(s, "address", parse_ipv4)
}

fn parse_port(s: &str) -> Result<u16, RuleParseError> {
    if !is_decimal(s) {
        return Err(RuleParseError::InvalidPort(s.to_string()));
    }
    s.parse().map_err(|_| RuleParseError::InvalidPort(s.to_string()))
}

fn parse_range<T, F>(
    s: &str,
    field: &'static str,
    parse_value: F,
) -> Result<RuleRange<T>, RuleParseError>
where
    T: Copy + Ord,
    F: Fn(&str) -> Result<T, RuleParseError>,
{
    match s.split_once('-') {
        None => Ok(RuleRange::single(parse_value(s)?)),
        Some((start_text, end_text)) => {
            let (start_text, end_text) = (start_text.trim(), end_text.trim());
            let start = parse_value(start_text)?;
            let end = parse_value(end_text)?;
            RuleRange::new(start, end).ok_or_else(|| RuleParseError::InvertedRange {
                field,
                start: start_text.to_string(),
                end: end_text.to_string(),
            })
        }
    }
}

/// Non-empty and ASCII digits only. `str::parse` alone would accept a sign.
fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
