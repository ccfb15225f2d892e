use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use reqwest::Client;
use serde::Deserialize;
use trust_dns_resolver::{config::*, TokioAsyncResolver};
use url::Url;

use crate::constants::RECORD_TYPE_A;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// Answers A-record lookups for the enrichment step.
#[derive(Clone)]
pub enum Resolver {
    /// JSON DNS-over-HTTPS API (`/resolve?name=`).
    Doh { client: Client, base_url: String },
    /// Recursive resolution through a single UDP name server.
    System(TokioAsyncResolver),
}

impl Resolver {
    pub fn doh(client: Client, base_url: impl Into<String>) -> Self {
        Resolver::Doh {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn system(name_server: SocketAddr) -> Self {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig {
            socket_addr: name_server,
            protocol: Protocol::Udp,
            tls_dns_name: None,
            trust_negative_responses: false,
            bind_addr: None,
        });

        Resolver::System(TokioAsyncResolver::tokio(config, ResolverOpts::default()))
    }

    /// IPv4 addresses `name` resolves to. Records of other types are skipped.
    pub async fn lookup_ipv4(&self, name: &str) -> Result<BTreeSet<Ipv4Addr>> {
        match self {
            Resolver::Doh { client, base_url } => doh_lookup(client, base_url, name).await,
            Resolver::System(resolver) => {
                let lookup = resolver.lookup_ip(name).await?;
                Ok(lookup
                    .iter()
                    .filter_map(|ip| match ip {
                        IpAddr::V4(v4) => Some(v4),
                        IpAddr::V6(_) => None,
                    })
                    .collect())
            }
        }
    }
}

async fn doh_lookup(client: &Client, base_url: &str, name: &str) -> Result<BTreeSet<Ipv4Addr>> {
    let url = Url::parse_with_params(
        &format!("{}/resolve", base_url.trim_end_matches('/')),
        &[("name", name)],
    )
    .map_err(|e| Error::InvalidConfig(format!("DoH URL {:?}: {}", base_url, e)))?;

    let resp = client.get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(Error::UnexpectedStatus {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let body: DohResponse = resp.json().await?;
    Ok(a_records(&body))
}

fn a_records(body: &DohResponse) -> BTreeSet<Ipv4Addr> {
    body.answer
        .iter()
        .filter(|answer| answer.record_type == RECORD_TYPE_A)
        .filter_map(|answer| answer.data.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_a_records() {
        let body: DohResponse = serde_json::from_str(
            r#"{"Status":0,"Answer":[
                {"name":"www.example.com.","type":5,"TTL":60,"data":"edge.example.net."},
                {"name":"edge.example.net.","type":1,"TTL":60,"data":"93.184.216.34"},
                {"name":"edge.example.net.","type":1,"TTL":60,"data":"93.184.216.35"},
                {"name":"edge.example.net.","type":28,"TTL":60,"data":"2606:2800:220:1::"}
            ]}"#,
        )
        .unwrap();

        let ips: Vec<String> = a_records(&body).iter().map(|ip| ip.to_string()).collect();
        assert_eq!(ips, vec!["93.184.216.34", "93.184.216.35"]);
    }

    #[test]
    fn missing_answer_section_means_no_addresses() {
        let body: DohResponse = serde_json::from_str(r#"{"Status":3}"#).unwrap();
        assert!(a_records(&body).is_empty());
    }
}
