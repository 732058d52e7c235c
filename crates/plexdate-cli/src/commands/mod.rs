pub mod batch;
pub mod batch_ui;
pub mod select;
pub mod update;

use crate::output::{Output, OutputFormat};
use added_date_config::{Config, ConnectionOverrides, ConnectionSettings, PathManager};
use added_date_core::{AppliedUpdate, EditError, UndoEmitter};
use added_date_sources::{PlexClient, PlexLibrary};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use tracing::debug;

/// Program name used in restore commands
const PROGRAM_NAME: &str = "plexdate";

/// Connection-related flags, before env/config fallback
pub struct ConnectionArgs {
    pub token: Option<String>,
    pub server: Option<String>,
    pub library: Option<String>,
}

/// An authenticated connection plus the library every lookup targets
pub struct Session {
    pub client: PlexClient,
    pub library: String,
    pub settings: ConnectionSettings,
}

impl Session {
    pub fn undo_emitter(&self) -> UndoEmitter {
        UndoEmitter::new(PROGRAM_NAME, self.settings.server_url.clone())
    }
}

/// Resolve settings once, then handshake and check the library exists
pub async fn connect(args: ConnectionArgs) -> Result<Session> {
    let path_manager = PathManager::from_env()
        .map_err(|e| eyre!("Failed to locate config directory: {}", e))?;
    let config_file = path_manager.config_file();
    let config = Config::load(&config_file)?;

    let overrides = ConnectionOverrides {
        server_url: args.server,
        token: args.token,
    };
    let settings = ConnectionSettings::resolve(overrides, |key| std::env::var(key).ok(), &config)
        .map_err(|e| EditError::ConfigurationMissing(e.to_string()))?;
    let library = config.library_name(args.library);
    debug!(server = %settings.server_url, library = %library, "Resolved connection settings");

    let mut client = PlexClient::new(&settings).map_err(EditError::ConnectionError)?;
    client.authenticate().await.map_err(EditError::ConnectionError)?;
    client
        .library_section(&library)
        .await
        .map_err(EditError::lookup)?;

    Ok(Session {
        client,
        library,
        settings,
    })
}

/// Print the result of one write (or would-be write) with its restore command
pub fn report_applied(output: &Output, applied: &AppliedUpdate, emitter: &UndoEmitter, line: Option<u64>) {
    let undo = emitter.emit(&applied.record);

    match output.format() {
        OutputFormat::Human => {
            let prefix = line.map(|l| format!("[line {}] ", l)).unwrap_or_default();
            output.info(format!("{}Found Item: {}", prefix, applied.item.display_name()));
            output.info(format!("{}Current Added Date: {}", prefix, applied.record.previous));
            output.info(format!("{}New Added Date:     {}", prefix, applied.new_date));

            if applied.dry_run {
                output.warn(format!("{}Dry Run enabled. No changes made.", prefix));
                output.info(format!("{}Restore command once applied: {}", prefix, undo));
            } else {
                let confirmed = applied.confirmed.unwrap_or(applied.new_date);
                output.success(format!("{}Success! Date updated to: {}", prefix, confirmed));
                output.info(format!("{}To undo: {}", prefix, undo));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": if applied.dry_run { "would_update" } else { "updated" },
                "line": line,
                "id": applied.item.id,
                "title": applied.item.title,
                "year": applied.item.year,
                "library": applied.record.library,
                "previous": applied.record.previous.to_string(),
                "new": applied.new_date.to_string(),
                "confirmed": applied.confirmed.map(|d| d.to_string()),
                "undo": undo,
            }));
        }
    }
}
