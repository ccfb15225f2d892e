use std::net::SocketAddr;
use std::time::Duration;

use clap::ValueEnum;

use crate::constants::{
    CERT_LOG_URL, DOH_URL, HOST_SEARCH_URL, MAX_CONCURRENCY, PROBE_TIMEOUT, SOURCE_TIMEOUT,
};
use crate::error::{Error, Result};

/// Which backend answers A-record lookups during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolverKind {
    /// JSON DNS-over-HTTPS endpoint
    Doh,
    /// Plain UDP queries against `name_server`
    System,
}

/// Base URLs of the outbound collaborators. Paths and query strings are
/// appended by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub host_search: String,
    pub cert_log: String,
    pub doh: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            host_search: HOST_SEARCH_URL.to_string(),
            cert_log: CERT_LOG_URL.to_string(),
            doh: DOH_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub endpoints: Endpoints,
    pub resolver: ResolverKind,
    pub name_server: SocketAddr,
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub source_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            resolver: ResolverKind::Doh,
            name_server: SocketAddr::from(([8, 8, 8, 8], 53)),
            concurrency: MAX_CONCURRENCY,
            probe_timeout: PROBE_TIMEOUT,
            source_timeout: SOURCE_TIMEOUT,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "probe timeout must be greater than zero".to_string(),
            ));
        }
        for (name, url) in [
            ("host search", &self.endpoints.host_search),
            ("certificate log", &self.endpoints.cert_log),
            ("DoH", &self.endpoints.doh),
        ] {
            url::Url::parse(url)
                .map_err(|e| Error::InvalidConfig(format!("{} URL {:?}: {}", name, url, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.probe_timeout, Duration::from_millis(5000));
        assert_eq!(config.resolver, ResolverKind::Doh);
        assert_eq!(
            config.name_server,
            crate::constants::NAME_SERVER.parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn rejects_zero_concurrency() {
        let config = ScanConfig {
            concurrency: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_malformed_endpoint() {
        let mut config = ScanConfig::default();
        config.endpoints.doh = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
