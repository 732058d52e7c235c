use crate::error::EditError;
use added_date_models::Item;
use added_date_sources::PlexLibrary;
use tracing::debug;

/// Outcome of matching a title (and optional year) against a library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    NoMatch,
    SingleMatch(Item),
    /// Ordered by year ascending, then title
    MultipleMatches(Vec<Item>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Several candidates are handed back for the user to choose from
    Interactive,
    /// Several candidates are an error unless exactly one title matches exactly
    Unattended,
}

/// Search `library` for `title` and narrow the results
pub async fn resolve<L>(
    library: &L,
    library_name: &str,
    title: &str,
    year: Option<u32>,
    mode: MatchMode,
) -> Result<ResolutionResult, EditError>
where
    L: PlexLibrary + ?Sized,
{
    let results = library
        .search(library_name, title)
        .await
        .map_err(EditError::lookup)?;
    debug!(
        title = %title,
        year = ?year,
        results = results.len(),
        "Search returned candidates"
    );

    narrow_candidates(results, title, year, mode)
}

/// Apply the year filter and the selection policy to raw search results.
///
/// The year filter runs after the title search, so a year with no title matches is `NoMatch`.
pub fn narrow_candidates(
    results: Vec<Item>,
    title: &str,
    year: Option<u32>,
    mode: MatchMode,
) -> Result<ResolutionResult, EditError> {
    let mut candidates: Vec<Item> = match year {
        Some(wanted) => results
            .into_iter()
            .filter(|item| item.year == Some(wanted))
            .collect(),
        None => results,
    };

    match candidates.len() {
        0 => return Ok(ResolutionResult::NoMatch),
        1 => return Ok(ResolutionResult::SingleMatch(candidates.remove(0))),
        _ => {}
    }

    sort_candidates(&mut candidates);

    match mode {
        MatchMode::Interactive => Ok(ResolutionResult::MultipleMatches(candidates)),
        MatchMode::Unattended => {
            let wanted = title.trim().to_lowercase();
            let mut exact: Vec<&Item> = candidates
                .iter()
                .filter(|item| item.title.trim().to_lowercase() == wanted)
                .collect();

            if exact.len() == 1 {
                let chosen = exact.remove(0).clone();
                debug!(
                    title = %chosen.title,
                    id = %chosen.id,
                    others = candidates.len() - 1,
                    "Exact title match takes precedence"
                );
                return Ok(ResolutionResult::SingleMatch(chosen));
            }

            Err(EditError::AmbiguousMatch {
                title: title.to_string(),
                count: candidates.len(),
                candidates: candidates
                    .iter()
                    .map(|item| item.display_name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }
}

/// Year ascending, then title; the rating key keeps equal entries deterministic
pub fn sort_candidates(candidates: &mut [Item]) {
    candidates.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
}
