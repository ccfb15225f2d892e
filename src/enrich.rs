use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::dns::Resolver;
use crate::model::{CandidateSet, SubdomainRecord};
use crate::probe::probe_http_status;

/// Runs the DNS and HTTP liveness steps for every candidate subdomain.
#[derive(Clone)]
pub struct Enricher {
    client: Client,
    resolver: Resolver,
    probe_timeout: Duration,
    max_concurrency: usize,
}

impl Enricher {
    pub fn new(
        client: Client,
        resolver: Resolver,
        probe_timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            client,
            resolver,
            probe_timeout,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Enriches each candidate in its own task and returns one record per
    /// candidate, in completion order.
    ///
    /// Every task owns the record it builds, so tasks never touch each other's
    /// state. At most `max_concurrency` tasks are past the semaphore at once.
    /// A task that dies still yields an unenriched record for its name.
    pub async fn enrich(&self, candidates: &CandidateSet) -> Vec<SubdomainRecord> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = FuturesUnordered::new();

        for sub in candidates.iter() {
            let client = self.client.clone();
            let resolver = self.resolver.clone();
            let semaphore_clone = semaphore.clone();
            let sub_clone = sub.clone();
            let probe_timeout = self.probe_timeout;

            let handle = tokio::spawn(async move {
                let _permit = match semaphore_clone.acquire_owned().await {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(subdomain = %sub_clone, error = %e, "Failed to acquire semaphore");
                        return SubdomainRecord::new(sub_clone);
                    }
                };

                enrich_one(&client, &resolver, sub_clone, probe_timeout).await
            });

            let name = sub.clone();
            tasks.push(async move { (name, handle.await) });
        }

        let mut records = Vec::with_capacity(candidates.len());
        while let Some((name, res)) = tasks.next().await {
            match res {
                Ok(record) => records.push(record),
                Err(e) => {
                    if e.is_panic() {
                        warn!(subdomain = %name, "Enrichment task panicked");
                    } else {
                        warn!(subdomain = %name, error = %e, "Enrichment task failed");
                    }
                    records.push(SubdomainRecord::new(name));
                }
            }
        }

        info!(records = records.len(), "Enrichment complete");
        records
    }
}

async fn enrich_one(
    client: &Client,
    resolver: &Resolver,
    name: String,
    probe_timeout: Duration,
) -> SubdomainRecord {
    let mut record = SubdomainRecord::new(name);

    match resolver.lookup_ipv4(&record.name).await {
        Ok(ips) => record.ip_addresses.extend(ips),
        Err(e) => {
            debug!(subdomain = %record.name, error = %e, "DNS lookup failed");
        }
    }

    let status = probe_http_status(client, &record.name, probe_timeout).await;
    debug!(subdomain = %record.name, status = %status, ips = record.ip_addresses.len(), "Enriched");
    record.http_status = Some(status);

    record
}
