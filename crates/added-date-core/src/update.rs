use crate::error::EditError;
use crate::resolver::{resolve, MatchMode, ResolutionResult};
use crate::selection::CandidateSelector;
use added_date_models::{DateSpec, Item, UndoRecord};
use added_date_sources::PlexLibrary;
use tracing::{debug, warn};

/// How the item to edit is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Title { title: String, year: Option<u32> },
    /// Rating key; skips search entirely
    Id(String),
}

impl Target {
    pub fn label(&self) -> String {
        match self {
            Target::Title { title, year: Some(year) } => format!("{} ({})", title, year),
            Target::Title { title, year: None } => title.clone(),
            Target::Id(id) => format!("id {}", id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub library: String,
    pub target: Target,
    pub date: DateSpec,
    pub dry_run: bool,
    pub mode: MatchMode,
}

/// A write that went through (or would have, in a dry run)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedUpdate {
    pub item: Item,
    pub record: UndoRecord,
    pub new_date: DateSpec,
    /// Value read back from the server after the write
    pub confirmed: Option<DateSpec>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(AppliedUpdate),
    /// The item already carries the requested date
    Unchanged(Item),
    /// The user declined to pick a candidate
    Cancelled,
}

/// Find the target item, then set its added date
pub async fn update_item<L, S>(
    library: &L,
    selector: &S,
    request: &UpdateRequest,
) -> Result<UpdateOutcome, EditError>
where
    L: PlexLibrary + ?Sized,
    S: CandidateSelector + ?Sized,
{
    let item = match find_target(library, selector, request).await? {
        Some(item) => item,
        None => return Ok(UpdateOutcome::Cancelled),
    };

    apply_date(library, &request.library, &item, request.date, request.dry_run).await
}

async fn find_target<L, S>(
    library: &L,
    selector: &S,
    request: &UpdateRequest,
) -> Result<Option<Item>, EditError>
where
    L: PlexLibrary + ?Sized,
    S: CandidateSelector + ?Sized,
{
    let (title, year) = match &request.target {
        Target::Id(id) => {
            return library
                .fetch_item(id)
                .await
                .map_err(EditError::lookup)?
                .map(Some)
                .ok_or_else(|| EditError::NoMatch {
                    title: request.target.label(),
                    library: request.library.clone(),
                });
        }
        Target::Title { title, year } => (title, *year),
    };

    match resolve(library, &request.library, title, year, request.mode).await? {
        ResolutionResult::NoMatch => Err(EditError::NoMatch {
            title: request.target.label(),
            library: request.library.clone(),
        }),
        ResolutionResult::SingleMatch(item) => Ok(Some(item)),
        ResolutionResult::MultipleMatches(candidates) => selector.select(&candidates),
    }
}

/// Write `date` to `item` unless it already holds it.
///
/// The previous value is captured before the write; it is only returned once the write succeeded.
/// In a dry run nothing is written and the would-be previous value is returned.
pub async fn apply_date<L>(
    library: &L,
    library_name: &str,
    item: &Item,
    date: DateSpec,
    dry_run: bool,
) -> Result<UpdateOutcome, EditError>
where
    L: PlexLibrary + ?Sized,
{
    debug!(
        id = %item.id,
        title = %item.display_name(),
        current = %item.added_at,
        new = %date,
        dry_run = dry_run,
        "Preparing added-date update"
    );

    if item.added_at == date {
        return Ok(UpdateOutcome::Unchanged(item.clone()));
    }

    let record = UndoRecord {
        item_id: item.id.clone(),
        library: library_name.to_string(),
        previous: item.added_at,
        title: item.display_name(),
    };

    if dry_run {
        return Ok(UpdateOutcome::Updated(AppliedUpdate {
            item: item.clone(),
            record,
            new_date: date,
            confirmed: None,
            dry_run: true,
        }));
    }

    library
        .set_added_date(item, date)
        .await
        .map_err(|e| EditError::mutation(&item.display_name(), e))?;

    // Reload to confirm; the write already succeeded so a failed read is not fatal
    let confirmed = match library.fetch_item(&item.id).await {
        Ok(Some(reloaded)) => Some(reloaded.added_at),
        Ok(None) => {
            warn!(id = %item.id, "Item vanished after update, cannot confirm new date");
            None
        }
        Err(e) => {
            warn!(id = %item.id, error = %e, "Could not reload item to confirm new date");
            None
        }
    };

    Ok(UpdateOutcome::Updated(AppliedUpdate {
        item: item.clone(),
        record,
        new_date: date,
        confirmed,
        dry_run: false,
    }))
}
