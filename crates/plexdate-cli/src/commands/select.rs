use crate::output::Output;
use added_date_core::{run_selection, CandidateSelector, EditError};
use added_date_models::Item;
use comfy_table::{presets, Cell, Table};
use dialoguer::Input;

const PROMPT: &str = "Select ID (or Enter to quit)";

/// Numbered table on stdout, answer read from the terminal
pub struct ConsoleSelector<'a> {
    output: &'a Output,
}

impl<'a> ConsoleSelector<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl CandidateSelector for ConsoleSelector<'_> {
    fn select(&self, candidates: &[Item]) -> Result<Option<Item>, EditError> {
        self.output.println(render_candidates(candidates));
        run_selection(candidates, prompt_line, |msg| self.output.error(msg))
    }
}

/// `ID  YEAR  CURRENT ADDED DATE  TITLE`, one row per candidate in the order given
pub fn render_candidates(candidates: &[Item]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("YEAR"),
        Cell::new("CURRENT ADDED DATE"),
        Cell::new("TITLE"),
    ]);

    for (index, item) in candidates.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(item.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(item.added_at),
            Cell::new(&item.title),
        ]);
    }

    table.to_string()
}

fn prompt_line() -> Result<String, EditError> {
    Input::<String>::new()
        .with_prompt(PROMPT)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| EditError::Io {
            context: "Failed to read selection".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use added_date_models::{DateSpec, ItemKind};

    fn item(id: &str, title: &str, year: Option<u32>) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            year,
            added_at: DateSpec::parse_canonical("2015-01-01 00:00:00").unwrap(),
            section_key: "1".to_string(),
            kind: ItemKind::Movie,
        }
    }

    #[test]
    fn test_table_lists_candidates_in_order() {
        let rendered = render_candidates(&[
            item("1978", "Halloween", Some(1978)),
            item("2007", "Halloween II", None),
        ]);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].contains("ID"));
        assert!(lines[0].contains("CURRENT ADDED DATE"));
        assert!(lines[0].contains("TITLE"));

        let first = lines.iter().position(|l| l.contains("1978")).unwrap();
        let second = lines.iter().position(|l| l.contains("Halloween II")).unwrap();
        assert!(first < second);
        assert!(lines[first].contains("2015-01-01 00:00:00"));
        assert!(lines[second].contains(" - ") || lines[second].contains("-  "));
    }
}
