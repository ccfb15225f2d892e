pub mod args;
pub mod config;
mod constants;
pub mod dns;
pub mod enrich;
pub mod enumeration;
pub mod error;
pub mod model;
pub mod pages;
pub mod probe;
pub mod reporting;

pub use args::{CliArgs, ScanOptions, ServerArgs};
pub use config::{Endpoints, ResolverKind, ScanConfig};
pub use constants::{NOT_AVAILABLE, NO_CACHE_HEADERS};
pub use error::{Error, Result};
pub use model::{CandidateSet, HttpStatus, SubdomainRecord};
pub use reporting::{Report, ReportRow};

use reqwest::Client;
use tokio::time::Duration;
use tracing::info;

use dns::Resolver;
use enrich::Enricher;
use enumeration::collect_candidates;
use probe::probe_client;

/// Discovery, enrichment and report assembly for one root domain at a time.
///
/// Cheap to clone; clones share the underlying HTTP connection pools.
#[derive(Clone)]
pub struct Scanner {
    source_client: Client,
    endpoints: Endpoints,
    enricher: Enricher,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        config.validate()?;

        let source_client = Client::builder()
            .timeout(config.source_timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        let resolver = match config.resolver {
            ResolverKind::Doh => Resolver::doh(source_client.clone(), &config.endpoints.doh),
            ResolverKind::System => Resolver::system(config.name_server),
        };

        let enricher = Enricher::new(
            probe_client()?,
            resolver,
            config.probe_timeout,
            config.concurrency,
        );

        Ok(Self {
            source_client,
            endpoints: config.endpoints.clone(),
            enricher,
        })
    }

    /// Candidate subdomains of `domain` reported by the discovery sources.
    pub async fn collect(&self, domain: &str) -> CandidateSet {
        collect_candidates(&self.source_client, &self.endpoints, domain).await
    }

    /// Runs the whole pipeline. Source, DNS and probe failures only ever
    /// degrade rows; they never fail the scan.
    pub async fn scan(&self, domain: &str) -> Report {
        let domain = domain.trim().to_lowercase();
        info!(domain = %domain, "Starting scan");

        let candidates = self.collect(&domain).await;
        let records = self.enricher.enrich(&candidates).await;
        let report = Report::assemble(domain, records);

        info!(domain = %report.domain, subdomains = report.len(), "Scan complete");
        report
    }
}
