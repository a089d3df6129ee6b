use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use maxban::commands;
use maxban::config::presented_token;
use maxban::error::Result;
use maxban::model::{ColumnId, Priority};
use maxban::output::Format;
use maxban::store::board::find_board_root;

#[derive(Parser)]
#[command(
    name = "maxban",
    version,
    about = "Single-user kanban board with XP, streaks, and unattended agents"
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Board token for mutating commands (or MAXBAN_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a .maxban/ board in the current directory
    Init {
        /// Require this shared-secret token for future writes
        #[arg(long)]
        with_token: Option<String>,
    },
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, short)]
        description: Option<String>,
        /// Starting column
        #[arg(long, value_enum)]
        column: Option<ColumnId>,
        /// Priority
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Tags to attach (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tag: Vec<String>,
        /// XP awarded on completion (0-500)
        #[arg(long)]
        xp: Option<i64>,
    },
    /// Display a single task
    Show {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// List tasks
    List {
        /// Filter by column
        #[arg(long, value_enum)]
        column: Option<ColumnId>,
        /// Filter by tag
        #[arg(long)]
        tag: Option<String>,
        /// Read the local cache instead of the store
        #[arg(long)]
        cached: bool,
    },
    /// Edit task fields
    Edit {
        /// Task ID (or unique prefix)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, short)]
        description: Option<String>,
        /// New column
        #[arg(long, value_enum)]
        column: Option<ColumnId>,
        /// New priority
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Replace tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tag: Option<Vec<String>>,
        /// New XP reward (0-500)
        #[arg(long)]
        xp: Option<i64>,
    },
    /// Move a task to another column
    Move {
        /// Task ID (or unique prefix)
        id: String,
        /// Target column
        #[arg(value_enum)]
        column: ColumnId,
    },
    /// Delete a task
    Delete {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Delete every task and reset the score
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
    /// Create a task from one line of free text
    Inbox {
        /// Free text, e.g. "new task: fix login #backend xp:50"
        text: String,
    },
    /// Show XP, level, and streak
    Stats,
    /// Export a versioned board snapshot
    Export {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Replace the board from a snapshot
    Import {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Refresh the local view cache from the store
    Pull,
    /// Agent: promote one eligible task to DOING
    Autostart,
    /// Agent: report or demote tasks stuck in DOING for >24h
    Sweep {
        /// Demote stale tasks to TODO instead of only reporting
        #[arg(long)]
        demote: bool,
    },
    /// Health status slot
    Health {
        #[command(subcommand)]
        action: HealthAction,
    },
}

#[derive(Subcommand)]
enum HealthAction {
    /// Print the current health report
    Show,
    /// Overwrite the health report with a JSON payload
    Report {
        /// JSON payload
        payload: String,
    },
}

fn dispatch(cli: Cli) -> Result<()> {
    let base = find_board_root()?;
    let token = presented_token(cli.token);
    let format = cli.format;

    match cli.command {
        Commands::Init { with_token } => commands::init::run(&base, with_token),
        Commands::Create {
            title,
            description,
            column,
            priority,
            tag,
            xp,
        } => commands::create::run(
            &base,
            title,
            description,
            column,
            priority,
            tag,
            xp,
            token,
            format,
        ),
        Commands::Show { id } => commands::show::run(&base, id, format),
        Commands::List {
            column,
            tag,
            cached,
        } => commands::list::run(&base, column, tag, cached, format),
        Commands::Edit {
            id,
            title,
            description,
            column,
            priority,
            tag,
            xp,
        } => commands::edit::run(
            &base,
            id,
            title,
            description,
            column,
            priority,
            tag,
            xp,
            token,
            format,
        ),
        Commands::Move { id, column } => commands::mv::run(&base, id, column, token, format),
        Commands::Delete { id } => commands::delete::run(&base, id, token),
        Commands::Clear { yes } => commands::clear::run(&base, yes, token),
        Commands::Inbox { text } => commands::inbox::run(&base, text, token, format),
        Commands::Stats => commands::stats::run(&base, format),
        Commands::Export { out } => commands::export::run(&base, out),
        Commands::Import { input } => commands::import::run(&base, input, token),
        Commands::Pull => commands::pull::run(&base, format),
        Commands::Autostart => commands::autostart::run(&base, token),
        Commands::Sweep { demote } => commands::sweep::run(&base, demote, token),
        Commands::Health { action } => match action {
            HealthAction::Show => commands::health::show(&base),
            HealthAction::Report { payload } => commands::health::report(&base, payload, token),
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
