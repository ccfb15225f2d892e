use rand::seq::SliceRandom;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Endpoints;
use crate::constants::USER_AGENTS;
use crate::model::CandidateSet;

#[derive(Debug, Deserialize)]
struct CertLogEntry {
    name_value: String,
}

/// An external service queried for candidate subdomain names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Plain text, one `host,ip` pair per line.
    HostSearch,
    /// Certificate transparency search returning a JSON array.
    CertLog,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::HostSearch, Source::CertLog];

    pub fn name(&self) -> &'static str {
        match self {
            Source::HostSearch => "hostsearch",
            Source::CertLog => "certlog",
        }
    }

    pub fn url(&self, endpoints: &Endpoints, domain: &str) -> Result<Url, url::ParseError> {
        match self {
            Source::HostSearch => Url::parse_with_params(
                &format!("{}/hostsearch/", endpoints.host_search.trim_end_matches('/')),
                &[("q", domain)],
            ),
            Source::CertLog => Url::parse_with_params(
                &format!("{}/", endpoints.cert_log.trim_end_matches('/')),
                &[("q", format!("%.{}", domain).as_str()), ("output", "json")],
            ),
        }
    }

    /// Raw names found in a response body, before normalization.
    pub fn extract(&self, body: &str) -> Vec<String> {
        match self {
            Source::HostSearch => extract_host_search(body),
            Source::CertLog => match extract_cert_log(body) {
                Ok(names) => names,
                Err(e) => {
                    warn!(source = self.name(), error = %e, "Malformed certificate log response");
                    Vec::new()
                }
            },
        }
    }
}

pub fn extract_host_search(body: &str) -> Vec<String> {
    body.split('\n')
        .filter_map(|line| line.split(',').next())
        .filter(|host| !host.is_empty() && host.contains('.'))
        .map(str::to_string)
        .collect()
}

pub fn extract_cert_log(body: &str) -> Result<Vec<String>, serde_json::Error> {
    let entries: Vec<CertLogEntry> = serde_json::from_str(body)?;
    Ok(entries
        .iter()
        .flat_map(|entry| entry.name_value.split('\n'))
        .filter(|name| !name.is_empty() && name.contains('.') && !name.contains('*'))
        .map(str::to_string)
        .collect())
}

/// Trims and lowercases `name`, keeping it only when it ends with `domain`.
///
/// This is a plain suffix match, so the root domain itself is kept too.
pub fn normalize(name: &str, domain: &str) -> Option<String> {
    let clean = name.trim().to_lowercase();
    if !clean.is_empty() && clean.ends_with(domain) {
        Some(clean)
    } else {
        None
    }
}

async fn fetch_source(
    client: &Client,
    source: Source,
    endpoints: &Endpoints,
    domain: &str,
) -> Option<String> {
    let url = match source.url(endpoints, domain) {
        Ok(url) => url,
        Err(e) => {
            warn!(source = source.name(), error = %e, "Cannot build source URL");
            return None;
        }
    };

    let mut request = client.get(url);
    if let Some(agent) = USER_AGENTS.choose(&mut rand::thread_rng()) {
        request = request.header(header::USER_AGENT, *agent);
    }
    if source == Source::CertLog {
        request = request.header(header::ACCEPT, "application/json");
    }

    let resp = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(source = source.name(), error = %e, "Source request failed");
            return None;
        }
    };

    if !resp.status().is_success() {
        warn!(source = source.name(), status = %resp.status(), "Source returned an error status");
        return None;
    }

    match resp.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(source = source.name(), error = %e, "Failed to read source response");
            None
        }
    }
}

/// Queries every discovery source in turn and merges what they report.
///
/// A failing source contributes nothing; when all of them fail the set is
/// simply empty.
pub async fn collect_candidates(
    client: &Client,
    endpoints: &Endpoints,
    domain: &str,
) -> CandidateSet {
    let mut candidates = CandidateSet::new();

    for source in Source::ALL {
        let Some(body) = fetch_source(client, source, endpoints, domain).await else {
            continue;
        };

        let extracted = source.extract(&body);
        let before = candidates.len();
        candidates.extend(
            extracted
                .iter()
                .filter_map(|name| normalize(name, domain)),
        );
        debug!(
            source = source.name(),
            extracted = extracted.len(),
            added = candidates.len() - before,
            "Source processed"
        );
    }

    info!(domain = %domain, candidates = candidates.len(), "Collected candidate subdomains");
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_search_takes_host_before_comma() {
        let body = "sub1.example.com,1.2.3.4\nother.org,9.9.9.9\n\nlocalhost,127.0.0.1\n";
        assert_eq!(
            extract_host_search(body),
            vec!["sub1.example.com", "other.org"]
        );
    }

    #[test]
    fn host_search_line_without_comma_is_whole_host() {
        assert_eq!(extract_host_search("api.example.com"), vec!["api.example.com"]);
    }

    #[test]
    fn host_search_error_text_has_no_hosts() {
        assert!(extract_host_search("API count exceeded - Increase Quota with Membership").is_empty());
    }

    #[test]
    fn cert_log_splits_multi_name_entries_and_drops_wildcards() {
        let body = r#"[{"name_value":"sub2.example.com\n*.example.com"},{"name_value":"www.example.com"},{"name_value":"nodot"}]"#;
        assert_eq!(
            extract_cert_log(body).unwrap(),
            vec!["sub2.example.com", "www.example.com"]
        );
    }

    #[test]
    fn cert_log_ignores_extra_fields() {
        let body = r#"[{"issuer_name":"C=US","name_value":"a.example.com","id":1}]"#;
        assert_eq!(extract_cert_log(body).unwrap(), vec!["a.example.com"]);
    }

    #[test]
    fn malformed_cert_log_contributes_nothing() {
        assert!(extract_cert_log("<html>busy</html>").is_err());
        assert!(Source::CertLog.extract("<html>busy</html>").is_empty());
    }

    #[test]
    fn normalize_trims_lowercases_and_filters_suffix() {
        assert_eq!(
            normalize("  API.Example.COM \r", "example.com"),
            Some("api.example.com".to_string())
        );
        assert_eq!(normalize("example.com", "example.com"), Some("example.com".to_string()));
        assert_eq!(normalize("other.org", "example.com"), None);
        assert_eq!(normalize("   ", "example.com"), None);
    }

    #[test]
    fn source_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            Source::HostSearch.url(&endpoints, "example.com").unwrap().as_str(),
            "https://api.hackertarget.com/hostsearch/?q=example.com"
        );
        assert_eq!(
            Source::CertLog.url(&endpoints, "example.com").unwrap().as_str(),
            "https://crt.sh/?q=%25.example.com&output=json"
        );
    }
}
