use copygen_errors::AppError;
use std::time::Duration;
use url::Url;

pub struct SheetFetcher {
    http_client: reqwest::Client,
    base_url: String,
    max_rows: usize,
}

impl SheetFetcher {
    pub fn new(base_url: String, max_rows: usize, timeout: Duration) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_rows,
        })
    }

    pub fn export_url(&self, sheet_id: &str, gid: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&format!(
            "{}/spreadsheets/d/{}/export",
            self.base_url,
            urlencoding::encode(sheet_id)
        ))
        .map_err(|e| AppError::SheetFetchFailed(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("format", "csv")
            .append_pair("gid", gid);

        Ok(url)
    }

    /// Fetches the sheet tab as CSV and renders its last rows as a Markdown
    /// table. `Ok(None)` means the sheet has no data rows.
    pub async fn fetch(&self, sheet_id: &str, gid: &str) -> Result<Option<String>, AppError> {
        let url = self.export_url(sheet_id, gid)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout
                } else {
                    AppError::SheetFetchFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SheetFetchFailed(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SheetFetchFailed(e.to_string()))?;

        // Unpublished sheets redirect to a sign-in page instead of failing.
        if body.trim_start().starts_with('<') {
            return Err(AppError::SheetFetchFailed(
                "sheet is not published (got HTML)".to_string(),
            ));
        }

        Ok(render_markdown(&body, self.max_rows))
    }
}

/// Renders CSV text as a Markdown pipe table, keeping only the last
/// `max_rows` data rows. Ragged rows are padded or cut to the header width,
/// unreadable records are skipped.
pub fn render_markdown(csv_text: &str, max_rows: usize) -> Option<String> {
    let csv_text = csv_text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(clean_cell).collect(),
        Err(e) => {
            tracing::warn!("Sheet header unreadable: {}", e);
            return None;
        }
    };
    if headers.iter().all(String::is_empty) {
        return None;
    }
    let width = headers.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Skipping malformed sheet line: {}", e);
                continue;
            }
        };

        let mut cells: Vec<String> = record.iter().take(width).map(clean_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        cells.resize(width, String::new());
        rows.push(cells);
    }

    if rows.is_empty() {
        return None;
    }

    let skip = rows.len().saturating_sub(max_rows);
    let mut table = String::new();
    push_markdown_row(&mut table, &headers);
    table.push('|');
    for _ in 0..width {
        table.push_str(" --- |");
    }
    table.push('\n');
    for row in rows.iter().skip(skip) {
        push_markdown_row(&mut table, row);
    }

    Some(table.trim_end().to_string())
}

fn push_markdown_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}

fn clean_cell(cell: &str) -> String {
    cell.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
