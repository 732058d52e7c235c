use added_date_models::UndoRecord;

/// Formats restore commands for updated items.
///
/// The command targets the rating key, never the title, so re-running it cannot hit an ambiguity.
/// The token is left out on purpose: it comes from the environment when the command is re-run.
#[derive(Debug, Clone)]
pub struct UndoEmitter {
    program: String,
    server_url: String,
}

impl UndoEmitter {
    pub fn new(program: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            server_url: server_url.into(),
        }
    }

    pub fn emit(&self, record: &UndoRecord) -> String {
        format!(
            "{} --server {} --library {} --id {} --date {}",
            self.program,
            shell_quote(&self.server_url),
            shell_quote(&record.library),
            shell_quote(&record.item_id),
            shell_quote(&record.previous.to_string()),
        )
    }
}

/// POSIX single-quote a word
pub fn shell_quote(value: &str) -> String {
    let is_plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '%' | '+' | '='));
    if is_plain {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use crate::resolver::MatchMode;
    use crate::selection::RejectAll;
    use crate::testing::{item, FakeLibrary, LIBRARY};
    use crate::update::{update_item, Target, UpdateOutcome, UpdateRequest};
    use added_date_models::DateSpec;

    fn record(library: &str, previous: &str) -> UndoRecord {
        UndoRecord {
            item_id: "4242".to_string(),
            library: library.to_string(),
            previous: DateSpec::parse_canonical(previous).unwrap(),
            title: "Piranha 3D (2010)".to_string(),
        }
    }

    /// Pull the value following `flag` back out of an emitted command
    fn argument_after(command: &str, flag: &str) -> String {
        let rest = command.split(flag).nth(1).unwrap().trim_start();
        if let Some(quoted) = rest.strip_prefix('\'') {
            quoted.split('\'').next().unwrap().to_string()
        } else {
            rest.split_whitespace().next().unwrap().to_string()
        }
    }

    #[test]
    fn test_emit_targets_id() {
        let emitter = UndoEmitter::new("plexdate", "http://localhost:32400");
        let command = emitter.emit(&record("Movies", "2010-08-20 14:03:11"));

        assert_eq!(
            command,
            "plexdate --server http://localhost:32400 --library Movies --id 4242 --date '2010-08-20 14:03:11'"
        );
        assert!(!command.contains("Piranha"));
    }

    #[test]
    fn test_library_with_spaces_and_quotes() {
        let emitter = UndoEmitter::new("plexdate", "http://nas:32400");
        let command = emitter.emit(&record("Kid's Movies", "2010-08-20 00:00:00"));
        assert!(command.contains(r"--library 'Kid'\''s Movies'"));
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("Movies"), "Movies");
        assert_eq!(shell_quote("TV Shows"), "'TV Shows'");
        assert_eq!(shell_quote(""), "''");
    }

    #[tokio::test]
    async fn test_undo_command_restores_previous_date() {
        let library = FakeLibrary::new(vec![item("4242", "Piranha 3D", Some(2010), "2010-08-20 14:03:11")]);
        let emitter = UndoEmitter::new("plexdate", "http://localhost:32400");

        let forward = UpdateRequest {
            library: LIBRARY.to_string(),
            target: Target::Title {
                title: "Piranha 3D".to_string(),
                year: None,
            },
            date: parse_date("2023-01-01").unwrap(),
            dry_run: false,
            mode: MatchMode::Unattended,
        };
        let UpdateOutcome::Updated(applied) = update_item(&library, &RejectAll, &forward).await.unwrap() else {
            panic!("expected Updated");
        };
        assert_eq!(library.current_date("4242"), Some(forward.date));

        let command = emitter.emit(&applied.record);
        let restore = UpdateRequest {
            library: argument_after(&command, "--library"),
            target: Target::Id(argument_after(&command, "--id")),
            date: parse_date(&argument_after(&command, "--date")).unwrap(),
            dry_run: false,
            mode: MatchMode::Unattended,
        };
        update_item(&library, &RejectAll, &restore).await.unwrap();

        assert_eq!(
            library.current_date("4242"),
            DateSpec::parse_canonical("2010-08-20 14:03:11")
        );
    }
}
