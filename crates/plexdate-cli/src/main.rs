use clap::{ArgAction, ArgGroup, Parser};
use color_eyre::eyre::eyre;
use commands::{batch, update, ConnectionArgs};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "plexdate")]
#[command(about = "Edit the 'Added At' date of items on a Plex Media Server")]
#[command(version)]
#[command(group(ArgGroup::new("target").required(true).args(["title", "id", "csv"])))]
struct Cli {
    /// Title to search for (partial match; an exact title wins over longer ones)
    #[arg(short, long, requires = "date")]
    title: Option<String>,

    /// New date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
    #[arg(short, long, conflicts_with = "csv")]
    date: Option<String>,

    /// Update every row of a CSV file with lines `Title, Date[, Year]`
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Plex rating key of the item to update, as printed in restore commands
    #[arg(long, requires = "date")]
    id: Option<String>,

    /// Only consider items released in this year
    #[arg(short, long, requires = "title")]
    year: Option<u32>,

    /// Pick from a numbered list when several items match
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with_all = ["csv", "id", "quiet"])]
    interactive: bool,

    /// Library to search [default: Movies]
    #[arg(short, long)]
    library: Option<String>,

    /// Show what would change without writing anything
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Plex authentication token (falls back to PLEX_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Plex server URL (falls back to PLEX_URL, then http://localhost:32400)
    #[arg(long)]
    server: Option<String>,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Output format
    #[arg(long, default_value = "human", value_enum)]
    output: output::OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let connection = ConnectionArgs {
        token: cli.token,
        server: cli.server,
        library: cli.library,
    };

    if let Some(csv) = cli.csv {
        return batch::run_batch(connection, csv, cli.dry_run, &output).await;
    }

    // clap guarantees --date alongside --title/--id
    let date = cli.date.ok_or_else(|| eyre!("--date is required"))?;
    let target = match (cli.id, cli.title) {
        (Some(id), _) => added_date_core::Target::Id(id),
        (None, Some(title)) => added_date_core::Target::Title { title, year: cli.year },
        (None, None) => return Err(eyre!("one of --title, --id or --csv is required")),
    };

    update::run_update(connection, target, &date, cli.interactive, cli.dry_run, &output).await
}
