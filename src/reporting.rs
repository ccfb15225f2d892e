use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use itertools::Itertools;
use serde::Serialize;

use crate::constants::NOT_AVAILABLE;
use crate::error::Result;
use crate::model::{validate_domain, SubdomainRecord};

/// Punctuation in the order the Unicode root collation ranks it. All of it
/// sorts before digits, and digits sort before letters.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn collation_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(rank) = PUNCTUATION_ORDER.find(c) {
        (1, rank as u32)
    } else if c.is_ascii_digit() {
        (2, c as u32)
    } else if c.is_ascii_alphabetic() {
        (3, c.to_ascii_lowercase() as u32)
    } else {
        (4, c as u32)
    }
}

/// Orders hostnames the way a locale-aware string comparison does, so
/// `_dmarc.example.com` lands before `1.example.com` and `a-b` before `a.b`.
/// Names equal under that order fall back to byte order.
pub fn hostname_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(collation_weight)
        .cmp(b.chars().map(collation_weight))
        .then_with(|| a.cmp(b))
}

/// Enriched records for one root domain, sorted by subdomain name.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub domain: String,
    pub records: Vec<SubdomainRecord>,
}

/// One table row, every cell already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub subdomain: String,
    pub ip_addresses: String,
    pub http_status: String,
    pub server_info: String,
}

impl From<&SubdomainRecord> for ReportRow {
    fn from(record: &SubdomainRecord) -> Self {
        let ip_addresses = if record.ip_addresses.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            record.ip_addresses.iter().join(", ")
        };

        Self {
            subdomain: record.name.clone(),
            ip_addresses,
            http_status: record
                .http_status
                .map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.to_string()),
            server_info: record
                .server_info
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

impl Report {
    pub fn assemble(domain: impl Into<String>, mut records: Vec<SubdomainRecord>) -> Self {
        records.sort_by(|a, b| hostname_cmp(&a.name, &b.name));
        Self {
            domain: domain.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.records.iter().map(ReportRow::from).collect()
    }
}

/// Writes `<domain>_subdomains.txt`, `<domain>_report.json` and
/// `<domain>_report.csv` into `output_dir` and returns their paths.
/// The domain becomes part of each file name, so anything that is not a plain
/// hostname is rejected before the directory is touched.
pub fn write_outputs(report: &Report, output_dir: &Path) -> Result<Vec<PathBuf>> {
    validate_domain(&report.domain)?;
    std::fs::create_dir_all(output_dir)?;

    let txt_file = output_dir.join(format!("{}_subdomains.txt", report.domain));
    let mut file = File::create(&txt_file)?;
    for record in &report.records {
        writeln!(file, "{}", record.name)?;
    }

    let json_file = output_dir.join(format!("{}_report.json", report.domain));
    std::fs::write(&json_file, serde_json::to_string_pretty(report)?)?;

    let csv_file = output_dir.join(format!("{}_report.csv", report.domain));
    let mut wtr = Writer::from_path(&csv_file)?;
    for row in report.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(vec![txt_file, json_file, csv_file])
}
