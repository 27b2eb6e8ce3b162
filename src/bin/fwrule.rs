//! fwrule: query a rule file from the command line.

use clap::{Parser, Subcommand};
use fwrule::{Bucket, Direction, Firewall, LoadConfig, MalformedLinePolicy, Protocol};
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fwrule")]
#[command(version)]
#[command(about = "Check packets against a static allow-rule file", long_about = None)]
struct Cli {
    /// Rule file, one `direction,protocol,port,address` rule per line
    #[arg(short, long)]
    rules: PathBuf,

    /// What to do with malformed rule lines: reject or skip
    #[arg(long, default_value = "reject", value_parser = parse_policy)]
    on_malformed: MalformedLinePolicy,

    /// Treat every line as a rule (no `#` comments, no blank lines)
    #[arg(long)]
    no_comments: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single packet; exits 0 on ACCEPT and 2 on DENY
    Check {
        /// inbound or outbound
        direction: String,
        /// tcp or udp
        protocol: String,
        /// Port number
        port: u32,
        /// Dotted-quad IPv4 address
        address: String,
    },

    /// Check every `direction,protocol,port,address` line of a file
    Batch {
        /// Query file
        queries: PathBuf,
    },

    /// Print rule counts per bucket
    Stats,

    /// Print every loaded rule
    Dump {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn parse_policy(s: &str) -> Result<MalformedLinePolicy, String> {
    MalformedLinePolicy::parse(s).ok_or_else(|| format!("unknown policy: {}", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = LoadConfig {
        on_malformed: cli.on_malformed,
        skip_comments: !cli.no_comments,
        skip_blank_lines: !cli.no_comments,
    };

    let firewall = match Firewall::from_path(&cli.rules, &config) {
        Ok(fw) => fw,
        Err(e) => {
            eprintln!("Error: {}: {}", cli.rules.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Check {
            direction,
            protocol,
            port,
            address,
        } => check(&firewall, &direction, &protocol, port, &address, cli.verbose),
        Commands::Batch { queries } => batch(&firewall, &queries).map(|_| ExitCode::SUCCESS),
        Commands::Stats => {
            stats(&firewall);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dump { json } => dump(&firewall, json).map(|_| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(
    firewall: &Firewall,
    direction: &str,
    protocol: &str,
    port: u32,
    address: &str,
    verbose: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let direction: Direction = direction.parse()?;
    let protocol: Protocol = protocol.parse()?;
    let port = u16::try_from(port).map_err(|_| fwrule::Error::PortOutOfRange(port))?;
    let address = Ipv4Addr::from(fwrule::rule::parse_ipv4(address)?);

    match firewall.matching_rule(direction, protocol, port, address) {
        Some(index) => {
            println!("ACCEPT");
            if verbose {
                if let Some(rule) = firewall.store().rule(index) {
                    println!("  matched rule {}: {}", index, rule);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("DENY");
            Ok(ExitCode::from(2))
        }
    }
}

fn batch(firewall: &Firewall, queries: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(queries)?;

    for (line_no, line) in (1..).zip(content.lines()) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[direction, protocol, port, address] = fields.as_slice() else {
            let msg = format!("line {}: expected 4 fields, got {}", line_no, fields.len());
            return Err(msg.into());
        };
        let port: u32 = port
            .parse()
            .map_err(|_| format!("line {}: invalid port {:?}", line_no, port))?;

        let allowed = firewall
            .accept_packet(direction, protocol, port, address)
            .map_err(|e| format!("line {}: {}", line_no, e))?;
        println!("{}", allowed);
    }

    Ok(())
}

fn stats(firewall: &Firewall) {
    let store = firewall.store();
    println!("Total rules: {}", store.len());
    for bucket in Bucket::ALL {
        println!("  {:<14} {}", bucket.to_string(), store.bucket_len(bucket));
    }
}

fn dump(firewall: &Firewall, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rules = firewall.store().rules();

    if json {
        println!("{}", serde_json::to_string_pretty(rules)?);
    } else {
        for rule in rules {
            println!("{}", rule);
        }
    }

    Ok(())
}
