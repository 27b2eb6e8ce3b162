//! Integration tests for loading rule files and matching packets.

use fwrule::{
    Bucket, Direction, Error, Firewall, LoadConfig, Protocol, RuleParseError, RuleStore,
};
use std::io::Write;
use std::net::Ipv4Addr;
use tempfile::NamedTempFile;

fn rule_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load(contents: &str) -> Firewall {
    let file = rule_file(contents);
    Firewall::from_path(file.path(), &LoadConfig::default()).unwrap()
}

#[test]
fn test_scenario_port_in_and_out_of_range() {
    let fw = load("inbound,tcp,80,192.168.1.1-192.168.1.100\n");

    assert!(fw.accept_packet("inbound", "tcp", 80, "192.168.1.5").unwrap());
    assert!(!fw.accept_packet("inbound", "tcp", 81, "192.168.1.5").unwrap());
}

#[test]
fn test_scenario_wrong_direction() {
    let fw = load("outbound,udp,53,8.8.8.8\n");

    assert!(fw.accept_packet("outbound", "udp", 53, "8.8.8.8").unwrap());
    assert!(!fw.accept_packet("inbound", "udp", 53, "8.8.8.8").unwrap());
}

#[test]
fn test_scenario_second_rule_matches() {
    let fw = load("inbound,tcp,22,10.0.0.1\ninbound,tcp,443,10.0.0.2\n");

    assert!(fw.accept_packet("inbound", "tcp", 443, "10.0.0.2").unwrap());
}

#[test]
fn test_rule_order_does_not_change_decisions() {
    let rules = [
        "inbound,tcp,22,10.0.0.1",
        "inbound,tcp,443,10.0.0.2",
        "inbound,tcp,8000-9000,10.0.1.0-10.0.1.255",
        "inbound,tcp,0-65535,172.16.0.1",
    ];
    let mut reversed = rules;
    reversed.reverse();

    let forward = Firewall::new(RuleStore::load(rules, &LoadConfig::default()).unwrap());
    let backward = Firewall::new(RuleStore::load(reversed, &LoadConfig::default()).unwrap());

    for (port, addr) in [
        (22, "10.0.0.1"),
        (443, "10.0.0.2"),
        (443, "10.0.0.1"),
        (8500, "10.0.1.77"),
        (9001, "10.0.1.77"),
        (1, "172.16.0.1"),
        (65535, "172.16.0.1"),
        (80, "172.16.0.2"),
    ] {
        assert_eq!(
            forward.accept_packet("inbound", "tcp", port, addr).unwrap(),
            backward.accept_packet("inbound", "tcp", port, addr).unwrap(),
            "port {} addr {}",
            port,
            addr
        );
    }
}

#[test]
fn test_single_value_rule_requires_exact_match() {
    let fw = load("outbound,tcp,443,1.2.3.4\n");
    let addr = Ipv4Addr::new(1, 2, 3, 4);

    for port in [0u16, 442, 443, 444, u16::MAX] {
        assert_eq!(
            fw.accept(Direction::Outbound, Protocol::Tcp, port, addr),
            port == 443
        );
    }
    for last in [0u8, 3, 4, 5, 255] {
        assert_eq!(
            fw.accept(
                Direction::Outbound,
                Protocol::Tcp,
                443,
                Ipv4Addr::new(1, 2, 3, last)
            ),
            last == 4
        );
    }
}

#[test]
fn test_ranged_rule_bounds_are_inclusive() {
    let fw = load("inbound,udp,1000-2000,10.0.0.10-10.0.0.20\n");
    let (p0, p1) = (1000u16, 2000u16);
    let a0 = u32::from(Ipv4Addr::new(10, 0, 0, 10));
    let a1 = u32::from(Ipv4Addr::new(10, 0, 0, 20));

    for port in [0, p0 - 1, p0, 1500, p1, p1 + 1, u16::MAX] {
        for addr in [a0 - 1, a0, a0 + 5, a1, a1 + 1] {
            let expected = (p0..=p1).contains(&port) && (a0..=a1).contains(&addr);
            assert_eq!(
                fw.accept(Direction::Inbound, Protocol::Udp, port, Ipv4Addr::from(addr)),
                expected,
                "port {} addr {}",
                port,
                Ipv4Addr::from(addr)
            );
        }
    }
}

#[test]
fn test_buckets_are_isolated() {
    let fw = load(
        "inbound,tcp,1-65535,0.0.0.0-255.255.255.255\n\
         outbound,udp,53,8.8.8.8\n",
    );
    let addr = Ipv4Addr::new(8, 8, 8, 8);

    assert!(fw.accept(Direction::Inbound, Protocol::Tcp, 53, addr));
    assert!(fw.accept(Direction::Outbound, Protocol::Udp, 53, addr));
    assert!(!fw.accept(Direction::Inbound, Protocol::Udp, 53, addr));
    assert!(!fw.accept(Direction::Outbound, Protocol::Tcp, 53, addr));

    let store = fw.store();
    assert_eq!(store.bucket_len(Bucket::InboundTcp), 1);
    assert_eq!(store.bucket_len(Bucket::OutboundUdp), 1);
    assert_eq!(store.bucket_len(Bucket::InboundUdp), 0);
    assert_eq!(store.bucket_len(Bucket::OutboundTcp), 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Firewall::from_path(dir.path().join("absent.csv"), &LoadConfig::default())
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_file_fails_load() {
    let file = rule_file("inbound,tcp,80,1.1.1.1\ninbound,tcp,80,1.1.1\n");
    let err = Firewall::from_path(file.path(), &LoadConfig::default()).unwrap_err();

    match err {
        Error::InvalidRule { line, source } => {
            assert_eq!(line, 2);
            assert_eq!(source, RuleParseError::InvalidIpAddress("1.1.1".to_string()));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_inverted_address_range_fails_load() {
    let file = rule_file("inbound,tcp,80,10.0.0.9-10.0.0.1\n");
    let err = Firewall::from_path(file.path(), &LoadConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidRule {
            line: 1,
            source: RuleParseError::InvertedRange { field: "address", .. }
        }
    ));
}

#[test]
fn test_lenient_load_keeps_good_rules() {
    let file = rule_file(
        "# header comment\n\
         inbound,tcp,80,1.1.1.1\n\
         inbound,tcp,99999,1.1.1.1\n\
         outbound,udp,53,8.8.8.8\n",
    );
    let fw = Firewall::from_path(file.path(), &LoadConfig::lenient()).unwrap();

    assert_eq!(fw.store().len(), 2);
    assert!(fw.accept_packet("inbound", "tcp", 80, "1.1.1.1").unwrap());
    assert!(fw.accept_packet("outbound", "udp", 53, "8.8.8.8").unwrap());
}

#[test]
fn test_crlf_rule_file() {
    let fw = load("inbound,tcp,80,1.1.1.1\r\noutbound,tcp,443,2.2.2.2\r\n");

    assert_eq!(fw.store().len(), 2);
    assert!(fw.accept_packet("outbound", "tcp", 443, "2.2.2.2").unwrap());
}

#[test]
fn test_bad_query_does_not_affect_state() {
    let fw = load("inbound,tcp,80,1.1.1.1\n");

    assert!(fw.accept_packet("inbound", "tcp", 70000, "1.1.1.1").is_err());
    assert!(fw.accept_packet("inbound", "tcp", 80, "300.1.1.1").is_err());
    assert!(fw.accept_packet("inbound", "tcp", 80, "1.1.1.1").unwrap());
    assert_eq!(fw.store().len(), 1);
}

#[test]
fn test_concurrent_queries() {
    let mut rules = String::new();
    for i in 0..64u32 {
        rules.push_str(&format!(
            "inbound,tcp,{}-{},10.0.{}.0-10.0.{}.255\n",
            i * 100,
            i * 100 + 50,
            i,
            i
        ));
    }
    let fw = load(&rules);

    let expected: Vec<bool> = (0..64u16)
        .map(|i| {
            let addr = Ipv4Addr::new(10, 0, i as u8, 7);
            fw.accept(Direction::Inbound, Protocol::Tcp, i * 100 + 25, addr)
        })
        .collect();
    assert!(expected.iter().all(|&allowed| allowed));

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for i in 0..64u16 {
                    let addr = Ipv4Addr::new(10, 0, i as u8, 7);
                    assert_eq!(
                        fw.accept(Direction::Inbound, Protocol::Tcp, i * 100 + 25, addr),
                        expected[i as usize]
                    );
                    assert!(!fw.accept(Direction::Inbound, Protocol::Tcp, i * 100 + 75, addr));
                }
            });
        }
    });
}
