use crate::error::EditError;
use crate::resolver::MatchMode;
use crate::selection::RejectAll;
use crate::update::{update_item, AppliedUpdate, Target, UpdateOutcome, UpdateRequest};
use added_date_models::BatchRow;
use added_date_sources::PlexLibrary;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub library: String,
    pub dry_run: bool,
}

/// What happened to one CSV row
#[derive(Debug)]
pub enum RowOutcome {
    Updated { row: BatchRow, update: AppliedUpdate },
    Skipped { row: BatchRow, reason: String },
    Failed { row: BatchRow, error: EditError },
}

impl RowOutcome {
    pub fn row(&self) -> &BatchRow {
        match self {
            RowOutcome::Updated { row, .. } | RowOutcome::Skipped { row, .. } | RowOutcome::Failed { row, .. } => row,
        }
    }
}

/// Run every row in file order, never stopping on a failed row.
///
/// Ambiguous titles fail their row instead of prompting. `on_outcome` sees each row's result
/// before the next row starts.
pub async fn process_batch<L, F>(
    library: &L,
    rows: Vec<BatchRow>,
    options: &BatchOptions,
    mut on_outcome: F,
) -> Vec<RowOutcome>
where
    L: PlexLibrary + ?Sized,
    F: FnMut(&RowOutcome),
{
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        debug!(line = row.line, title = %row.title, year = ?row.year, "Processing batch row");

        let request = UpdateRequest {
            library: options.library.clone(),
            target: Target::Title {
                title: row.title.clone(),
                year: row.year,
            },
            date: row.date,
            dry_run: options.dry_run,
            mode: MatchMode::Unattended,
        };

        let outcome = match update_item(library, &RejectAll, &request).await {
            Ok(UpdateOutcome::Updated(update)) => RowOutcome::Updated { row, update },
            Ok(UpdateOutcome::Unchanged(item)) => RowOutcome::Skipped {
                reason: format!("{} already added on {}", item.display_name(), item.added_at),
                row,
            },
            Ok(UpdateOutcome::Cancelled) => RowOutcome::Skipped {
                row,
                reason: "no candidate selected".to_string(),
            },
            Err(error) => RowOutcome::Failed { row, error },
        };

        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    outcomes
}

/// A failed row, kept for the end-of-run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRow {
    pub line: u64,
    pub title: String,
    pub kind: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<FailedRow>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                RowOutcome::Updated { .. } => summary.updated += 1,
                RowOutcome::Skipped { .. } => summary.skipped += 1,
                RowOutcome::Failed { row, error } => {
                    summary.failed += 1;
                    summary.failures.push(FailedRow {
                        line: row.line,
                        title: row.title.clone(),
                        kind: error.kind(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.updated + self.skipped + self.failed
    }
}
