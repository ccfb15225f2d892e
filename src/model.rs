use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use crate::constants::NOT_AVAILABLE;
use crate::error::{self, Error};

/// Normalized subdomain names that belong to one root domain.
pub type CandidateSet = HashSet<String>;

/// Outcome of the HTTP liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Code(u16),
    /// Neither the HTTPS nor the HTTP attempt answered in time.
    Unreachable,
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpStatus::Code(code) => write!(f, "{}", code),
            HttpStatus::Unreachable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for HttpStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HttpStatus::Code(code) => serializer.serialize_u16(*code),
            HttpStatus::Unreachable => serializer.serialize_str("unreachable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdomainRecord {
    pub name: String,
    pub ip_addresses: BTreeSet<Ipv4Addr>,
    pub http_status: Option<HttpStatus>,
    pub server_info: Option<String>,
}

impl SubdomainRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip_addresses: BTreeSet::new(),
            http_status: None,
            server_info: None,
        }
    }
}

/// Trims and lowercases a root domain, rejecting anything but a plain
/// hostname. Labels may hold ASCII letters, digits, `-` and `_`; empty labels
/// are refused, which also rules out `..` and a leading `.`.
pub fn validate_domain(domain: &str) -> error::Result<String> {
    let domain = domain.trim().to_ascii_lowercase();
    let valid = !domain.is_empty()
        && domain.len() <= 253
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        });

    if valid {
        Ok(domain)
    } else {
        Err(Error::InvalidDomain(domain))
    }
}
