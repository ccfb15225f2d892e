use anyhow::Result;
use clap::Parser;
use subscout::{pages, ScanConfig, Scanner, ServerArgs, NO_CACHE_HEADERS};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const MAX_HEADER_BYTES: usize = 16 * 1024;

struct Request {
    method: String,
    target: String,
}

struct Response {
    status: u16,
    reason: &'static str,
    content_type: &'static str,
    no_cache: bool,
    body: String,
}

impl Response {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: "text/html; charset=utf-8",
            no_cache: true,
            body,
        }
    }

    fn text(status: u16, reason: &'static str, body: String) -> Self {
        Self {
            status,
            reason,
            content_type: "text/plain; charset=utf-8",
            no_cache: false,
            body,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            self.reason,
            self.content_type,
            self.body.len()
        );
        if self.no_cache {
            for (name, value) in NO_CACHE_HEADERS {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    SearchPage,
    MissingDomain,
    Scan(String),
    MethodNotAllowed,
}

/// Value of the `domain` query parameter, if the parameter is present at all.
fn domain_param(target: &str) -> Option<String> {
    let (_, query) = target.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "domain")
        .map(|(_, value)| value.trim().to_string())
}

fn route(request: &Request) -> Route {
    if request.method != "GET" {
        return Route::MethodNotAllowed;
    }
    match domain_param(&request.target) {
        None => Route::SearchPage,
        Some(domain) if domain.is_empty() => Route::MissingDomain,
        Some(domain) => Route::Scan(domain),
    }
}

async fn respond(request: &Request, scanner: &Scanner) -> Response {
    match route(request) {
        Route::SearchPage => Response::html(pages::search_page()),
        Route::MissingDomain => Response::text(
            400,
            "Bad Request",
            "❌ Error: No domain provided".to_string(),
        ),
        Route::MethodNotAllowed => Response::text(
            405,
            "Method Not Allowed",
            "❌ Error: Only GET is supported".to_string(),
        ),
        Route::Scan(domain) => {
            let scanner = scanner.clone();
            match tokio::spawn(async move { scanner.scan(&domain).await }).await {
                Ok(report) => Response::html(pages::results_page(&report)),
                Err(e) => {
                    error!(error = %e, "Scan task failed");
                    Response::text(500, "Internal Server Error", format!("❌ Error: {}", e))
                }
            }
        }
    }
}

async fn read_request<R: AsyncRead + Unpin>(stream: &mut R) -> Option<Request> {
    let mut buf = Vec::new();
    loop {
        let mut temp = [0u8; 1024];
        let n = stream.read(&mut temp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&temp[..n]);

        let mut headers = [httparse::EMPTY_HEADER; 32];
        let mut req = httparse::Request::new(&mut headers);
        match req.parse(&buf).ok()? {
            httparse::Status::Complete(_) => {
                return Some(Request {
                    method: req.method.unwrap_or("").to_string(),
                    target: req.path.unwrap_or("/").to_string(),
                });
            }
            httparse::Status::Partial if buf.len() < MAX_HEADER_BYTES => continue,
            httparse::Status::Partial => return None,
        }
    }
}

async fn handle_connection(mut stream: TcpStream, scanner: Scanner) {
    let request = match read_request(&mut stream).await {
        Some(r) => r,
        None => {
            debug!("Dropping connection without a parseable request");
            return;
        }
    };
    info!(method = %request.method, target = %request.target, "Request");

    let response = respond(&request, &scanner).await;
    if let Err(e) = stream.write_all(&response.to_bytes()).await {
        warn!(error = %e, "Failed to write response");
    }
    let _ = stream.shutdown().await;
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ServerArgs::parse();
    let scanner = Scanner::new(&ScanConfig::from(args.scan))?;

    let listener = TcpListener::bind(args.bind).await?;
    info!(addr = %args.bind, "Listening");

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        debug!(peer = %peer, "Accepted connection");

        let scanner = scanner.clone();
        tokio::spawn(handle_connection(socket, scanner));
    }
}
