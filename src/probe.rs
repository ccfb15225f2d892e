use reqwest::{redirect::Policy, Certificate, Client};
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::error::Result;
use crate::model::HttpStatus;

/// Client used for liveness probes. Redirects are reported, not followed.
pub fn probe_client() -> Result<Client> {
    probe_client_with_roots(Vec::new())
}

/// Same as [`probe_client`], trusting `roots` on top of the built-in CA set.
pub fn probe_client_with_roots(roots: Vec<Certificate>) -> Result<Client> {
    let builder = roots.into_iter().fold(
        Client::builder()
            .redirect(Policy::none())
            .pool_idle_timeout(Some(Duration::from_secs(30))),
        |builder, root| builder.add_root_certificate(root),
    );
    Ok(builder.build()?)
}

/// Sends `HEAD https://<host>`, falling back to `HEAD http://<host>`.
///
/// Each attempt gets `limit` to produce a response. An attempt that runs out of
/// time is dropped, which aborts the request and releases its connection, and
/// counts the same as a connection failure.
pub async fn probe_http_status(client: &Client, host: &str, limit: Duration) -> HttpStatus {
    for scheme in ["https", "http"] {
        let url = format!("{}://{}", scheme, host);

        match timeout(limit, client.head(&url).send()).await {
            Ok(Ok(resp)) => return HttpStatus::Code(resp.status().as_u16()),
            Ok(Err(e)) => {
                debug!(url = %url, error = %e, "Liveness attempt failed");
            }
            Err(_) => {
                debug!(url = %url, timeout_ms = limit.as_millis() as u64, "Liveness attempt timed out");
            }
        }
    }

    HttpStatus::Unreachable
}
