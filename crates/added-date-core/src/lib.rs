pub mod batch;
pub mod batch_file;
pub mod date;
pub mod error;
pub mod resolver;
pub mod selection;
pub mod undo;
pub mod update;

#[cfg(test)]
mod testing;

pub use batch::{process_batch, BatchOptions, BatchSummary, FailedRow, RowOutcome};
pub use batch_file::{load_batch_file, parse_batch};
pub use date::parse_date;
pub use error::EditError;
pub use resolver::{narrow_candidates, resolve, sort_candidates, MatchMode, ResolutionResult};
pub use selection::{parse_selection, run_selection, CandidateSelector, RejectAll, SelectionInput};
pub use undo::{shell_quote, UndoEmitter};
pub use update::{apply_date, update_item, AppliedUpdate, Target, UpdateOutcome, UpdateRequest};
