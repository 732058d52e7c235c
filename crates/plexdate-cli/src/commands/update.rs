use super::select::ConsoleSelector;
use super::{connect, report_applied, ConnectionArgs};
use crate::output::{Output, OutputFormat};
use added_date_core::{parse_date, update_item, MatchMode, RejectAll, Target, UpdateOutcome, UpdateRequest};
use color_eyre::Result;
use serde_json::json;
use tracing::info;

/// Update a single item found by title or rating key
pub async fn run_update(
    connection: ConnectionArgs,
    target: Target,
    date_text: &str,
    interactive: bool,
    dry_run: bool,
    output: &Output,
) -> Result<()> {
    // Bad dates are rejected before any network traffic
    let date = parse_date(date_text)?;

    let session = connect(connection).await?;
    let emitter = session.undo_emitter();

    let mode = if interactive {
        MatchMode::Interactive
    } else {
        MatchMode::Unattended
    };
    let request = UpdateRequest {
        library: session.library.clone(),
        target: target.clone(),
        date,
        dry_run,
        mode,
    };

    info!(target_item = %target.label(), date = %date, dry_run = dry_run, "Updating added date");

    let outcome = if interactive {
        let selector = ConsoleSelector::new(output);
        update_item(&session.client, &selector, &request).await?
    } else {
        update_item(&session.client, &RejectAll, &request).await?
    };

    match outcome {
        UpdateOutcome::Updated(applied) => report_applied(output, &applied, &emitter, None),
        UpdateOutcome::Unchanged(item) => match output.format() {
            OutputFormat::Human => output.warn(format!(
                "{} is already set to {}. No changes made.",
                item.display_name(),
                item.added_at
            )),
            OutputFormat::Json | OutputFormat::JsonPretty => output.json(&json!({
                "type": "unchanged",
                "id": item.id,
                "title": item.title,
                "year": item.year,
                "added_at": item.added_at.to_string(),
            })),
        },
        UpdateOutcome::Cancelled => output.info("Selection cancelled. No changes made."),
    }

    Ok(())
}
