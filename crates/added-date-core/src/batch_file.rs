use crate::date::parse_date;
use crate::error::EditError;
use added_date_models::BatchRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read and validate a batch file of `Title, Date[, Year]` lines.
///
/// Every row is validated before anything is returned: one bad row rejects the whole file.
pub fn load_batch_file<P: AsRef<Path>>(path: P) -> Result<Vec<BatchRow>, EditError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| EditError::Io {
        context: format!("Failed to open {}", path.display()),
        source,
    })?;
    parse_batch(file, &path.display().to_string())
}

pub fn parse_batch<R: Read>(mut reader: R, source_name: &str) -> Result<Vec<BatchRow>, EditError> {
    // Kept in memory so row numbers can be taken from the text itself
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|source| EditError::Io {
        context: format!("Failed to read {}", source_name),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut invalid = Vec::new();
    let mut seen_first = false;

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| physical_line(&text, p.byte()))
                    .unwrap_or(index as u64 + 1);
                invalid.push(EditError::InvalidCsvRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| physical_line(&text, p.byte()))
            .unwrap_or(index as u64 + 1);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let is_first = !seen_first;
        seen_first = true;
        if is_first && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("title")) {
            debug!(line = line, "Skipping header row");
            continue;
        }

        match parse_row(&record, line) {
            Ok(row) => rows.push(row),
            Err(err) => invalid.push(err),
        }
    }

    if !invalid.is_empty() {
        return Err(EditError::InvalidBatchFile {
            path: source_name.to_string(),
            rows: invalid,
        });
    }
    if rows.is_empty() {
        return Err(EditError::EmptyBatch(source_name.to_string()));
    }

    debug!(rows = rows.len(), source = %source_name, "Loaded batch file");
    Ok(rows)
}

/// 1-based line of the first character of the record starting at `offset`.
///
/// The reader reports a record's position before the blank lines it skipped,
/// so line terminators are stepped over first.
fn physical_line(text: &str, offset: u64) -> u64 {
    let bytes = text.as_bytes();
    let mut start = usize::try_from(offset).unwrap_or(bytes.len()).min(bytes.len());
    while start < bytes.len() && matches!(bytes[start], b'\r' | b'\n') {
        start += 1;
    }
    bytes[..start].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

fn parse_row(record: &StringRecord, line: u64) -> Result<BatchRow, EditError> {
    let invalid = |reason: String| EditError::InvalidCsvRow { line, reason };

    if record.len() < 2 || record.len() > 3 {
        return Err(invalid(format!(
            "expected 'Title, Date[, Year]', found {} field(s)",
            record.len()
        )));
    }

    let title = record.get(0).unwrap_or("");
    if title.is_empty() {
        return Err(invalid("title is empty".to_string()));
    }

    let date_text = record.get(1).unwrap_or("");
    let date = parse_date(date_text).map_err(|e| invalid(e.to_string()))?;

    let year = match record.get(2) {
        Some(text) if !text.is_empty() => Some(
            text.parse::<u32>()
                .map_err(|_| invalid(format!("year '{}' is not an integer", text)))?,
        ),
        _ => None,
    };

    Ok(BatchRow {
        line,
        title: title.to_string(),
        date,
        year,
    })
}
