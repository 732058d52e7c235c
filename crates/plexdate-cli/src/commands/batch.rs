use super::batch_ui::BatchUI;
use super::{connect, report_applied, ConnectionArgs};
use crate::output::{Output, OutputFormat};
use added_date_core::{load_batch_file, process_batch, BatchOptions, BatchSummary, EditError, RowOutcome};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Apply every row of a CSV file.
///
/// The file is validated in full before connecting. Row-level failures are reported and
/// summarised but do not make the run fail.
pub async fn run_batch(connection: ConnectionArgs, csv: PathBuf, dry_run: bool, output: &Output) -> Result<()> {
    let rows = match load_batch_file(&csv) {
        Ok(rows) => rows,
        Err(EditError::InvalidBatchFile { path, rows }) => {
            for row in &rows {
                output.error(row.to_string());
            }
            return Err(eyre!("{}: {} invalid row(s), nothing was changed", path, rows.len()));
        }
        Err(e) => return Err(e.into()),
    };

    let session = connect(connection).await?;
    let emitter = session.undo_emitter();
    let options = BatchOptions {
        library: session.library.clone(),
        dry_run,
    };

    info!(file = %csv.display(), rows = rows.len(), dry_run = dry_run, "Starting batch");

    let show_progress = output.format() == OutputFormat::Human;
    let ui = BatchUI::new(rows.len(), show_progress);

    let outcomes = process_batch(&session.client, rows, &options, |outcome| {
        let row = outcome.row();
        ui.row_done(row.line, &row.title, || report_row(output, outcome, &emitter));
    })
    .await;
    ui.finish();

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        "Batch finished"
    );
    report_summary(output, &summary, dry_run);

    Ok(())
}

fn report_row(output: &Output, outcome: &RowOutcome, emitter: &added_date_core::UndoEmitter) {
    match outcome {
        RowOutcome::Updated { row, update } => report_applied(output, update, emitter, Some(row.line)),
        RowOutcome::Skipped { row, reason } => match output.format() {
            OutputFormat::Human => output.warn(format!("[line {}] {}: skipped, {}", row.line, row.title, reason)),
            OutputFormat::Json | OutputFormat::JsonPretty => output.json(&json!({
                "type": "skipped",
                "line": row.line,
                "title": row.title,
                "reason": reason,
            })),
        },
        RowOutcome::Failed { row, error } => match output.format() {
            OutputFormat::Human => output.error(format!("[line {}] {}: {}", row.line, row.title, error)),
            OutputFormat::Json | OutputFormat::JsonPretty => output.json(&json!({
                "type": "failed",
                "line": row.line,
                "title": row.title,
                "kind": error.kind(),
                "reason": error.to_string(),
            })),
        },
    }
}

fn report_summary(output: &Output, summary: &BatchSummary, dry_run: bool) {
    match output.format() {
        OutputFormat::Human => {
            let verb = if dry_run { "would update" } else { "updated" };
            output.info(format!(
                "\nBatch complete: {} row(s), {} {}, {} skipped, {} failed",
                summary.total(),
                summary.updated,
                verb,
                summary.skipped,
                summary.failed
            ));
            if !summary.failures.is_empty() {
                output.info("Failed rows:");
                for failure in &summary.failures {
                    output.info(format!("  line {}: {} ({})", failure.line, failure.title, failure.reason));
                }
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let failures: Vec<_> = summary
                .failures
                .iter()
                .map(|f| {
                    json!({
                        "line": f.line,
                        "title": f.title,
                        "kind": f.kind,
                        "reason": f.reason,
                    })
                })
                .collect();
            output.json(&json!({
                "type": "summary",
                "dry_run": dry_run,
                "total": summary.total(),
                "updated": summary.updated,
                "skipped": summary.skipped,
                "failed": summary.failed,
                "failures": failures,
            }));
        }
    }
}
