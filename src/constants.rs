use once_cell::sync::Lazy;
use std::time::Duration;

pub const HOST_SEARCH_URL: &str = "https://api.hackertarget.com";
pub const CERT_LOG_URL: &str = "https://crt.sh";
pub const DOH_URL: &str = "https://dns.google.com";
pub const NAME_SERVER: &str = "8.8.8.8:53";

pub const PROBE_TIMEOUT: Duration = Duration::from_millis(5000);
pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_CONCURRENCY: usize = 50;

/// DNS RR type code for an A record.
pub const RECORD_TYPE_A: u16 = 1;

/// Placeholder for any cell with nothing to show.
pub const NOT_AVAILABLE: &str = "N/A";

pub const NO_CACHE_HEADERS: &[(&str, &str)] = &[
    (
        "Cache-Control",
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    ),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

pub static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
    ]
});
