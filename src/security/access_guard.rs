//! Client address allow-list with CIDR range matching.
//!
//! # Responsibilities
//! - Parse configured patterns (literal IPs, "address/prefix" ranges)
//! - Answer "is this client address allowed?"
//!
//! # Design Decisions
//! - Fail closed: absent, empty, or unparseable client addresses are denied
//! - Malformed config entries are dropped with a warning, never fatal
//! - An empty allow-list denies every client
//! - Immutable after construction; safe to share across request tasks

use std::net::IpAddr;

use tracing::warn;

/// A single allow-list entry, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowEntry {
    /// Literal address; matches on identical family and bytes.
    Exact(IpAddr),
    /// CIDR range; matches addresses sharing the top `prefix_bits` bits.
    Range { network: IpAddr, prefix_bits: u8 },
}

impl AllowEntry {
    /// Parse a configured pattern. Returns `None` for anything that is not
    /// a valid address or a valid "address/prefix" pair.
    fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        match pattern.split_once('/') {
            Some((addr, bits)) => {
                let network: IpAddr = addr.parse().ok()?;
                let prefix_bits: u8 = bits.parse().ok()?;
                if prefix_bits > address_width(&network) {
                    return None;
                }
                Some(AllowEntry::Range {
                    network,
                    prefix_bits,
                })
            }
            None => pattern.parse().ok().map(AllowEntry::Exact),
        }
    }

    fn matches(&self, client: IpAddr) -> bool {
        match *self {
            AllowEntry::Exact(addr) => addr == client,
            AllowEntry::Range {
                network,
                prefix_bits,
            } => match (client, network) {
                (IpAddr::V4(c), IpAddr::V4(n)) => {
                    prefix_match(&c.octets(), &n.octets(), prefix_bits)
                }
                (IpAddr::V6(c), IpAddr::V6(n)) => {
                    prefix_match(&c.octets(), &n.octets(), prefix_bits)
                }
                // Family mismatch never matches, regardless of prefix.
                _ => false,
            },
        }
    }
}

fn address_width(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// Compare the top `prefix_bits` bits of two equal-length address byte
/// strings: whole bytes first, then the partial byte under a high-bit mask.
fn prefix_match(client: &[u8], network: &[u8], prefix_bits: u8) -> bool {
    let whole_bytes = (prefix_bits / 8) as usize;
    let remainder = prefix_bits % 8;

    if client[..whole_bytes] != network[..whole_bytes] {
        return false;
    }

    if remainder > 0 {
        let mask = 0xFFu8 << (8 - remainder);
        return client[whole_bytes] & mask == network[whole_bytes] & mask;
    }

    true
}

/// Immutable allow-list answering whether a client address may reach the
/// service. Built once from configuration at startup.
#[derive(Debug)]
pub struct AccessGuard {
    entries: Vec<AllowEntry>,
}

impl AccessGuard {
    /// Build the guard from configured patterns. Entries that fail to parse
    /// are skipped; the resulting list may be empty, which denies everyone.
    pub fn new(patterns: &[String]) -> Self {
        let mut entries = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            match AllowEntry::parse(pattern) {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(pattern = %pattern, "Skipping malformed allow-list entry");
                }
            }
        }

        if entries.is_empty() {
            warn!("Allow-list is empty, every client will be denied");
        }

        Self { entries }
    }

    /// Whether the given client address is allowed. Any match suffices.
    pub fn allow(&self, client: Option<&str>) -> bool {
        let Some(raw) = client else {
            return false;
        };
        if raw.is_empty() {
            return false;
        }
        let Ok(addr) = raw.parse::<IpAddr>() else {
            return false;
        };

        self.entries.iter().any(|entry| entry.matches(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(patterns: &[&str]) -> AccessGuard {
        let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        AccessGuard::new(&owned)
    }

    #[test]
    fn exact_and_range_matching() {
        let guard = guard(&["10.0.0.0/24", "192.168.1.5"]);

        assert!(guard.allow(Some("10.0.0.7")));
        assert!(!guard.allow(Some("10.0.1.7")));
        assert!(guard.allow(Some("192.168.1.5")));
        assert!(!guard.allow(Some("192.168.1.6")));
        assert!(!guard.allow(None));
    }

    #[test]
    fn zero_prefix_matches_whole_family() {
        let guard = guard(&["10.0.0.0/0"]);

        assert!(guard.allow(Some("10.0.0.1")));
        assert!(guard.allow(Some("203.0.113.9")));
        assert!(guard.allow(Some("255.255.255.255")));
        // Same prefix length, different family: still a non-match.
        assert!(!guard.allow(Some("::1")));
    }

    #[test]
    fn full_width_prefix_requires_exact_address() {
        let guard = guard(&["10.0.0.5/32"]);

        assert!(guard.allow(Some("10.0.0.5")));
        assert!(!guard.allow(Some("10.0.0.4")));
        assert!(!guard.allow(Some("10.0.0.6")));
    }

    #[test]
    fn partial_byte_prefix_masks_high_bits() {
        // /20 splits the third octet: 10.0.16.0 .. 10.0.31.255.
        let guard = guard(&["10.0.16.0/20"]);

        assert!(guard.allow(Some("10.0.16.1")));
        assert!(guard.allow(Some("10.0.31.254")));
        assert!(!guard.allow(Some("10.0.32.1")));
        assert!(!guard.allow(Some("10.0.15.255")));
    }

    #[test]
    fn ipv6_ranges_match() {
        let guard = guard(&["2001:db8::/32", "::1"]);

        assert!(guard.allow(Some("::1")));
        assert!(guard.allow(Some("2001:db8::42")));
        assert!(guard.allow(Some("2001:db8:ffff::1")));
        assert!(!guard.allow(Some("2001:db9::1")));
    }

    #[test]
    fn family_mismatch_never_matches() {
        let g = guard(&["10.0.0.0/0", "0.0.0.0/0"]);
        assert!(!g.allow(Some("2001:db8::1")));

        let guard = guard(&["::/0"]);
        assert!(!guard.allow(Some("10.0.0.1")));
    }

    #[test]
    fn malformed_entries_are_dropped_not_fatal() {
        let guard = guard(&["not-an-ip", "10.0.0.0/99", "10.0.0.0/24/7", "192.168.1.5"]);

        assert!(guard.allow(Some("192.168.1.5")));
        assert!(!guard.allow(Some("10.0.0.1")));
    }

    #[test]
    fn empty_list_denies_everyone() {
        let guard = guard(&[]);
        assert!(!guard.allow(Some("127.0.0.1")));
    }

    #[test]
    fn unparseable_or_empty_client_is_denied() {
        let guard = guard(&["0.0.0.0/0"]);

        assert!(!guard.allow(Some("")));
        assert!(!guard.allow(Some("hostname.example")));
        assert!(!guard.allow(Some("10.0.0")));
    }
}
