use crate::error::EditError;
use added_date_models::Item;

/// Chooses one item out of an ordered candidate list.
///
/// `Ok(None)` means the user declined to choose.
pub trait CandidateSelector {
    fn select(&self, candidates: &[Item]) -> Result<Option<Item>, EditError>;
}

/// Never chooses; used where nobody is around to answer a prompt
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAll;

impl CandidateSelector for RejectAll {
    fn select(&self, _candidates: &[Item]) -> Result<Option<Item>, EditError> {
        Ok(None)
    }
}

/// One answer typed at the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    Cancel,
    /// Zero-based index into the candidate list
    Pick(usize),
    Invalid(String),
}

/// Interpret a 1-based answer; blank cancels
pub fn parse_selection(input: &str, count: usize) -> SelectionInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return SelectionInput::Cancel;
    }

    match trimmed.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => SelectionInput::Pick(n - 1),
        Ok(_) => SelectionInput::Invalid(format!("Please enter a number between 1 and {}.", count)),
        Err(_) => SelectionInput::Invalid("Invalid input. Please enter a valid number.".to_string()),
    }
}

/// Drive the prompt until a valid answer or a cancel.
///
/// `read` returns the next line typed by the user, `reject` is told why an answer was refused.
pub fn run_selection<R, J>(candidates: &[Item], mut read: R, mut reject: J) -> Result<Option<Item>, EditError>
where
    R: FnMut() -> Result<String, EditError>,
    J: FnMut(&str),
{
    if candidates.is_empty() {
        return Ok(None);
    }

    loop {
        let line = read()?;
        match parse_selection(&line, candidates.len()) {
            SelectionInput::Cancel => return Ok(None),
            SelectionInput::Pick(index) => return Ok(Some(candidates[index].clone())),
            SelectionInput::Invalid(message) => reject(&message),
        }
    }
}
