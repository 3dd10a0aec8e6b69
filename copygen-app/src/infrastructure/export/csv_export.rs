use crate::domain::{CopyPlan, COPY_COLUMNS};
use base64::Engine;
use copygen_errors::AppError;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const FALLBACK_FILE_NAME: &str = "copy_plan.csv";

/// CSV bytes for spreadsheet tools: UTF-8 BOM, a header row, then one
/// record per copy row.
pub fn to_csv_bytes(plan: &CopyPlan) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(COPY_COLUMNS)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    for row in &plan.rows {
        writer
            .write_record(row.cells())
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn download_file_name(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    if stem.trim_matches('_').is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        format!("{}_plan.csv", stem)
    }
}

/// `data:` URI that lets the result page offer the CSV without a second request.
pub fn csv_data_uri(bytes: &[u8]) -> String {
    format!(
        "data:text/csv;charset=utf-8;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
