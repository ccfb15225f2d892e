use std::time::Duration;

use subscout::pages::results_page;
use subscout::{Endpoints, ScanConfig, Scanner};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn config_for(server: &MockServer) -> ScanConfig {
    ScanConfig {
        endpoints: Endpoints {
            host_search: server.uri(),
            cert_log: server.uri(),
            doh: server.uri(),
        },
        probe_timeout: Duration::from_millis(300),
        source_timeout: Duration::from_secs(5),
        ..ScanConfig::default()
    }
}

#[tokio::test]
async fn test_end_to_end_example() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hostsearch/"))
        .and(query_param("q", "example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("sub1.example.com,1.2.3.4\nother.org,9.9.9.9"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("output", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"name_value":"sub2.example.com\n*.example.com"}]"#),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("name", "sub1.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": 0,
            "Answer": [{"name": "sub1.example.com.", "type": 1, "TTL": 60, "data": "192.0.2.10"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("name", "sub2.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Status": 3})))
        .mount(&mock_server)
        .await;

    let scanner = Scanner::new(&config_for(&mock_server)).unwrap();
    let report = scanner.scan(" Example.COM ").await;

    assert_eq!(report.domain, "example.com");
    assert_eq!(report.len(), 2);
    assert_eq!(report.records[0].name, "sub1.example.com");
    assert_eq!(report.records[1].name, "sub2.example.com");

    let sub1_ips: Vec<String> = report.records[0]
        .ip_addresses
        .iter()
        .map(|ip| ip.to_string())
        .collect();
    assert_eq!(sub1_ips, vec!["192.0.2.10"]);
    assert!(report.records[1].ip_addresses.is_empty());
    assert!(report.records.iter().all(|r| r.http_status.is_some()));

    let rows = report.rows();
    assert_eq!(rows[0].ip_addresses, "192.0.2.10");
    assert_eq!(rows[1].ip_addresses, "N/A");
    assert!(rows.iter().all(|row| !row.http_status.is_empty()));

    let page = results_page(&report);
    assert!(page.contains("Found 2 unique subdomains for example.com"));
    assert!(!page.contains("other.org"));
}

#[tokio::test]
async fn test_scan_with_no_sources_is_empty_report() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let scanner = Scanner::new(&config_for(&mock_server)).unwrap();
    let report = scanner.scan("example.com").await;

    assert!(report.is_empty());
    assert!(report.rows().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ScanConfig {
        concurrency: 0,
        ..ScanConfig::default()
    };
    assert!(matches!(
        Scanner::new(&config),
        Err(subscout::Error::InvalidConfig(_))
    ));
}
