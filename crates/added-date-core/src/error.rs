use added_date_sources::SourceError;
use thiserror::Error;

/// Everything that can stop an added-date edit
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Invalid date format: '{0}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    InvalidDateFormat(String),

    #[error("Invalid CSV row at line {line}: {reason}")]
    InvalidCsvRow { line: u64, reason: String },

    #[error("'{title}' matches {count} items ({candidates}). Narrow it with --year or pick one with --interactive")]
    AmbiguousMatch {
        title: String,
        count: usize,
        candidates: String,
    },

    #[error("Could not find item '{title}' in library '{library}'")]
    NoMatch { title: String, library: String },

    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("Plex connection failed: {0}")]
    ConnectionError(#[source] SourceError),

    #[error("Failed to update '{title}': {source}")]
    MutationFailed {
        title: String,
        #[source]
        source: SourceError,
    },

    #[error("Library '{0}' not found")]
    LibraryNotFound(String),

    #[error("{path}: {} invalid row(s)", .rows.len())]
    InvalidBatchFile { path: String, rows: Vec<EditError> },

    #[error("{0}: no rows to process")]
    EmptyBatch(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl EditError {
    /// Classify a failure from a read (search, lookup, handshake)
    pub fn lookup(err: SourceError) -> Self {
        match err {
            SourceError::LibraryNotFound(name) => EditError::LibraryNotFound(name),
            other => EditError::ConnectionError(other),
        }
    }

    /// Classify a failure from the write call
    pub fn mutation(title: &str, err: SourceError) -> Self {
        if err.is_connection_failure() {
            EditError::ConnectionError(err)
        } else {
            EditError::MutationFailed {
                title: title.to_string(),
                source: err,
            }
        }
    }

    /// Short name of the error kind, used in batch summaries and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            EditError::InvalidDateFormat(_) => "invalid_date_format",
            EditError::InvalidCsvRow { .. } => "invalid_csv_row",
            EditError::AmbiguousMatch { .. } => "ambiguous_match",
            EditError::NoMatch { .. } => "no_match",
            EditError::ConfigurationMissing(_) => "configuration_missing",
            EditError::ConnectionError(_) => "connection_error",
            EditError::MutationFailed { .. } => "mutation_failed",
            EditError::LibraryNotFound(_) => "library_not_found",
            EditError::InvalidBatchFile { .. } => "invalid_batch_file",
            EditError::EmptyBatch(_) => "empty_batch",
            EditError::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_not_found_keeps_its_kind() {
        let err = EditError::lookup(SourceError::LibraryNotFound("Films".to_string()));
        assert!(matches!(err, EditError::LibraryNotFound(ref name) if name == "Films"));
    }

    #[test]
    fn test_unauthorized_write_is_a_connection_error() {
        let err = EditError::mutation("Alien", SourceError::Unauthorized { status: 401 });
        assert_eq!(err.kind(), "connection_error");

        let err = EditError::mutation(
            "Alien",
            SourceError::Status {
                context: "Failed to update metadata".to_string(),
                status: 500,
            },
        );
        assert_eq!(err.kind(), "mutation_failed");
    }

    #[test]
    fn test_batch_file_message_counts_rows() {
        let err = EditError::InvalidBatchFile {
            path: "dates.csv".to_string(),
            rows: vec![
                EditError::InvalidCsvRow {
                    line: 2,
                    reason: "missing date".to_string(),
                },
                EditError::InvalidCsvRow {
                    line: 5,
                    reason: "missing date".to_string(),
                },
            ],
        };
        assert_eq!(err.to_string(), "dates.csv: 2 invalid row(s)");
    }
}
