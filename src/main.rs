use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use subscout::reporting::write_outputs;
use subscout::{CliArgs, Report, ScanConfig, Scanner};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_table(report: &Report) {
    let rows = report.rows();
    let width = rows
        .iter()
        .map(|row| row.subdomain.len())
        .chain(std::iter::once("SUBDOMAIN".len()))
        .max()
        .unwrap_or_default();

    println!(
        "{:<width$}  {:<6}  IP ADDRESSES",
        "SUBDOMAIN",
        "STATUS",
        width = width
    );
    for row in rows {
        println!(
            "{:<width$}  {:<6}  {}",
            row.subdomain,
            row.http_status,
            row.ip_addresses,
            width = width
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let scanner = Scanner::new(&ScanConfig::from(args.scan))?;

    let scan_start = Instant::now();
    let report = scanner.scan(&args.domain).await;
    info!(elapsed = ?scan_start.elapsed(), "Scan finished");

    println!(
        "Found {} unique subdomains for {}\n",
        report.len(),
        report.domain
    );
    print_table(&report);

    if let Some(output) = args.output {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let output_dir = output.join(format!("{}_{}", report.domain, timestamp));
        for path in write_outputs(&report, &output_dir)? {
            info!(path = %path.display(), "Wrote report");
        }
    }

    Ok(())
}
