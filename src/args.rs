use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};

use crate::config::{Endpoints, ResolverKind, ScanConfig};
use crate::constants::{CERT_LOG_URL, DOH_URL, HOST_SEARCH_URL, NAME_SERVER};
use crate::model::validate_domain;

/// Options shared by the server and the command line scanner.
#[derive(Args, Debug, Clone)]
pub struct ScanOptions {
    /// Maximum number of subdomains enriched at the same time
    #[arg(short, long, default_value = "50", env = "SUBSCOUT_CONCURRENCY")]
    pub concurrency: usize,

    /// Timeout of each HTTP liveness attempt, in milliseconds
    #[arg(long, default_value = "5000", env = "SUBSCOUT_PROBE_TIMEOUT_MS")]
    pub probe_timeout_ms: u64,

    /// Timeout for discovery source and DoH requests, in seconds
    #[arg(long, default_value = "30", env = "SUBSCOUT_SOURCE_TIMEOUT")]
    pub source_timeout: u64,

    /// Backend used for A-record lookups
    #[arg(long, value_enum, default_value = "doh", env = "SUBSCOUT_RESOLVER")]
    pub resolver: ResolverKind,

    /// Name server queried when the system resolver is selected
    #[arg(long, default_value = NAME_SERVER, env = "SUBSCOUT_NAME_SERVER")]
    pub name_server: SocketAddr,

    /// Base URL of the host search source
    #[arg(long, default_value = HOST_SEARCH_URL, env = "SUBSCOUT_HOST_SEARCH_URL")]
    pub host_search_url: String,

    /// Base URL of the certificate transparency log source
    #[arg(long, default_value = CERT_LOG_URL, env = "SUBSCOUT_CERT_LOG_URL")]
    pub cert_log_url: String,

    /// Base URL of the DNS-over-HTTPS resolver
    #[arg(long, default_value = DOH_URL, env = "SUBSCOUT_DOH_URL")]
    pub doh_url: String,
}

impl From<ScanOptions> for ScanConfig {
    fn from(opts: ScanOptions) -> Self {
        ScanConfig {
            endpoints: Endpoints {
                host_search: opts.host_search_url,
                cert_log: opts.cert_log_url,
                doh: opts.doh_url,
            },
            resolver: opts.resolver,
            name_server: opts.name_server,
            concurrency: opts.concurrency,
            probe_timeout: Duration::from_millis(opts.probe_timeout_ms),
            source_timeout: Duration::from_secs(opts.source_timeout),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the subdomain finder page", long_about = None)]
pub struct ServerArgs {
    /// Address the HTTP server listens on
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "SUBSCOUT_BIND")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub scan: ScanOptions,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Find subdomains and probe their DNS and HTTP liveness", long_about = None)]
pub struct CliArgs {
    /// Root domain to enumerate subdomains for
    #[arg(short, long, value_parser = validate_domain)]
    pub domain: String,

    /// Directory to write txt/json/csv reports into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub scan: ScanOptions,
}
