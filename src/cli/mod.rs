//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Role-based bug tracking dashboard (`SQLite`)
#[derive(Parser, Debug)]
#[command(name = "bugboard", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: .bugboard/bugboard.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Name of the acting user
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Role of the acting user (developer or manager)
    #[arg(long, global = true)]
    pub role: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a bugboard workspace
    Init {
        /// Overwrite existing DB
        #[arg(long)]
        force: bool,
    },

    /// File a new bug
    Create(CreateArgs),

    /// List the bugs visible to the current actor
    List(ListArgs),

    /// Show bug details and the actions available to you
    Show {
        /// Bug ID (or unique prefix)
        id: String,
    },

    /// Edit a bug you created
    Update(UpdateArgs),

    /// Close a bug (moves it to pending-approval)
    Close(IdArgs),

    /// Approve a pending closure (managers)
    Approve(IdArgs),

    /// Send a pending closure back to open (managers)
    Reopen(IdArgs),

    /// Delete a bug you created
    Delete(IdArgs),

    /// Show status counts over all bugs (managers)
    Stats,

    /// Show the per-day status trend (managers)
    Trend,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}

/// A single bug ID.
#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Bug ID (or unique prefix)
    pub id: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Bug title
    pub title: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Priority (low, medium, high, critical)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Initial status (open or in-progress)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Project name
    #[arg(long)]
    pub project: String,

    /// Assign to a team member
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Due date (YYYY-MM-DD, +3d, +2w, today, tomorrow)
    #[arg(long)]
    pub due: Option<String>,

    /// Labels (comma-separated)
    #[arg(long, short = 'l', value_delimiter = ',')]
    pub labels: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "")]
    pub status: String,

    /// Filter by priority
    #[arg(long, short = 'p', default_value = "")]
    pub priority: String,

    /// Filter by project
    #[arg(long, default_value = "")]
    pub project: String,

    /// Sort key (title, project, status, priority, assignee, created-by,
    /// created-at, updated-at, due-date)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending (default when no --sort is given)
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Bug ID (or unique prefix)
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New priority
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// New status (open or in-progress)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Move to another project
    #[arg(long)]
    pub project: Option<String>,

    /// Assign to a team member ("" clears)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Due date ("" clears)
    #[arg(long)]
    pub due: Option<String>,
}
