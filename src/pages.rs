use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::reporting::{Report, ReportRow};

const STYLE: &str = r#"
        * { box-sizing: border-box; }
        body {
            background-color: #121212;
            color: #00ff00;
            font-family: monospace, 'Courier New';
            margin: 0;
            padding: 10px;
            line-height: 1.6;
            min-height: 100vh;
            display: flex;
            flex-direction: column;
        }
        .container {
            width: 100%;
            max-width: 1200px;
            margin: 0 auto;
            padding: 15px;
            flex-grow: 1;
        }
        input, button {
            width: 100%;
            padding: 12px;
            margin-top: 10px;
            font-family: monospace;
            font-size: 16px;
        }
        input { background-color: #000; color: #00ff00; border: 2px solid #00ff00; }
        button { background-color: #00ff00; color: #000; border: none; cursor: pointer; }
        button:hover { background-color: #00cc00; }
        h1, h2 { text-align: center; }
        .stats { margin: 10px 0; font-style: italic; text-align: center; }
        .table-wrapper { width: 100%; overflow: auto; max-height: 500px; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { border: 1px solid #00ff00; padding: 8px; text-align: left; white-space: nowrap; }
        th { background-color: #333; position: sticky; top: 0; }
        .search-again { display: block; max-width: 300px; margin: 15px auto; padding: 10px;
            background-color: #333; color: #00ff00; text-align: center; text-decoration: none; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
{}
    </div>
</body>
</html>"#,
        encode_text(title),
        STYLE,
        body
    )
}

fn search_form(value: &str) -> String {
    format!(
        r#"        <form method="GET" action="/">
            <input type="text" name="domain" value="{}" placeholder="Enter domain (e.g., example.com)" required>
            <button type="submit">Find Subdomains</button>
        </form>"#,
        encode_double_quoted_attribute(value)
    )
}

/// The landing page with an empty search form.
pub fn search_page() -> String {
    let body = format!(
        "        <h1>Subdomain Finder</h1>\n{}",
        search_form("")
    );
    layout("Subdomain Finder", &body)
}

fn table_row(row: &ReportRow) -> String {
    format!(
        "                    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        encode_text(&row.subdomain),
        encode_text(&row.ip_addresses),
        encode_text(&row.http_status),
        encode_text(&row.server_info)
    )
}

/// The results table for `report`, with a form to search again.
pub fn results_page(report: &Report) -> String {
    let rows: String = report.rows().iter().map(table_row).collect();

    let body = format!(
        r#"        <h2>Subdomain Finder</h2>
{}
        <div class="stats">Found {} unique subdomains for {}</div>
        <div class="table-wrapper">
            <table>
                <thead>
                    <tr>
                        <th>Subdomain</th>
                        <th>IP Addresses</th>
                        <th>HTTP Status</th>
                        <th>Server Info</th>
                    </tr>
                </thead>
                <tbody>
{}                </tbody>
            </table>
        </div>
        <a href="/" class="search-again">Search Again</a>"#,
        search_form(&report.domain),
        report.len(),
        encode_text(&report.domain),
        rows
    );
    layout("Subdomain Finder Results", &body)
}
