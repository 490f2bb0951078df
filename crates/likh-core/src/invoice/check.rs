//! Advisory checks on structured invoice output.
//!
//! The model is instructed to produce the schema but nothing enforces it.
//! These checks report deviations; they never reject or rewrite a result.

use csv::{ReaderBuilder, Trim};

use super::INVOICE_COLUMNS;

/// List ways `text` deviates from the 16-column invoice CSV.
///
/// An empty list means the text looks like a clean schema-conformant CSV.
pub fn check_invoice_csv(text: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        issues.push("Result is empty".to_string());
        return issues;
    }

    let body = if trimmed.starts_with("```") {
        issues.push("CSV is wrapped in a markdown code fence".to_string());
        strip_fence(trimmed)
    } else {
        trimmed
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => {
            issues.push(format!("Header is not valid CSV: {}", e));
            return issues;
        }
        None => {
            issues.push("No header row".to_string());
            return issues;
        }
    };

    if header.len() != INVOICE_COLUMNS.len() {
        issues.push(format!(
            "Header has {} columns, expected {}",
            header.len(),
            INVOICE_COLUMNS.len()
        ));
    }

    for (i, (found, expected)) in header.iter().zip(INVOICE_COLUMNS.iter()).enumerate() {
        // Tolerate annotations such as "Particulars (name of originator)".
        if !found.to_lowercase().starts_with(&expected.to_lowercase()) {
            issues.push(format!(
                "Column {} is '{}', expected '{}'",
                i + 1,
                found,
                expected
            ));
        }
    }

    let mut rows = 0;
    for (i, record) in records.enumerate() {
        let line = i + 2;
        match record {
            Ok(record) if record.iter().all(|f| f.is_empty()) => {}
            Ok(record) => {
                rows += 1;
                if record.len() != INVOICE_COLUMNS.len() {
                    issues.push(format!(
                        "Line {} has {} fields, expected {}",
                        line,
                        record.len(),
                        INVOICE_COLUMNS.len()
                    ));
                }
            }
            Err(e) => issues.push(format!("Line {} is not valid CSV: {}", line, e)),
        }
    }

    if rows == 0 {
        issues.push("No line item rows".to_string());
    }

    issues
}

/// Drop an opening ```` ```lang ```` line and a closing fence.
fn strip_fence(text: &str) -> &str {
    let after_open = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    after_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(after_open)
        .trim()
}
