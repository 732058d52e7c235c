use crate::DateSpec;
use serde::{Deserialize, Serialize};

/// One parsed line of a batch CSV file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchRow {
    /// 1-based line number in the source file
    pub line: u64,
    pub title: String,
    pub date: DateSpec,
    pub year: Option<u32>,
}
