use crate::DateSpec;
use serde::{Deserialize, Serialize};

/// The value an item held before it was overwritten.
///
/// Captured before the write is sent; only surfaced once the write succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UndoRecord {
    pub item_id: String,
    pub library: String,
    pub previous: DateSpec,
    /// Display only. Restores target `item_id`, never the title.
    pub title: String,
}
