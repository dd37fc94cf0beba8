//! Command-line interface for taskgrid
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::sheets::SheetsClient;
use crate::state::AppState;
use crate::store::SheetStore;

mod board;
mod gantt;
mod init;
mod session;
mod task;

/// taskgrid - Tasks in a shared spreadsheet
///
/// A CLI for a task tracker whose backing store is a Google Sheets
/// document: one sheet of tasks plus user and category masters, shown
/// as a filterable table, a status board, or a gantt timeline.
#[derive(Parser, Debug)]
#[command(name = "taskgrid")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./taskgrid.toml)
    #[arg(long, global = true, env = "TASKGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Access token override; skips the stored session
    #[arg(long, global = true, env = "TASKGRID_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter config pointing at a spreadsheet
    Init {
        /// Spreadsheet document id (the long id in the sheet URL)
        spreadsheet_id: String,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Verify an access token and store the session
    Login,

    /// Revoke the stored token and remove the session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Task management commands
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show tasks as a status board
    Board,

    /// Show tasks as a gantt timeline
    Gantt,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks with filters and sorting
    List {
        /// Case-insensitive substring match over name and details
        #[arg(long)]
        search: Option<String>,

        /// Filter by exact status: not-started, in-progress, completed
        #[arg(long)]
        status: Option<String>,

        /// Filter by exact assignee name
        #[arg(long)]
        assignee: Option<String>,

        /// Only tasks assigned to the signed-in user
        #[arg(long)]
        mine: bool,

        /// Sort key: name, assignee, category, start, due, priority, status, created, updated
        #[arg(long, default_value = "created")]
        sort: String,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,
    },

    /// Add a task
    Add {
        /// Task name
        name: String,

        /// Free-form details
        #[arg(long, default_value = "")]
        details: String,

        /// Assignee name, as written in the users sheet
        #[arg(long, default_value = "")]
        assignee: String,

        /// Category name
        #[arg(long, default_value = "")]
        category: String,

        /// Planned start date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        start: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        due: String,

        /// Priority: high, medium, low
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Initial status: not-started, in-progress, completed
        #[arg(long, default_value = "not-started")]
        status: String,
    },

    /// Show one task in full
    Show {
        /// Task id or unique prefix
        id: String,
    },

    /// Edit fields of a task
    Edit {
        /// Task id or unique prefix
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New details
        #[arg(long)]
        details: Option<String>,

        /// New assignee name
        #[arg(long)]
        assignee: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// New priority: high, medium, low
        #[arg(long)]
        priority: Option<String>,

        /// New status: not-started, in-progress, completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Set a task's status
    Status {
        /// Task id or unique prefix
        id: String,

        /// New status: not-started, in-progress, completed
        status: String,
    },

    /// Mark a task completed
    Done {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete a task row from the sheet
    Rm {
        /// Task id or unique prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init {
                spreadsheet_id,
                force,
            } => init::run(init::InitOptions {
                spreadsheet_id,
                force,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Login => session::run_login(session::LoginOptions {
                token: self.token,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Logout => session::run_logout(session::LogoutOptions {
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Whoami => session::run_whoami(session::WhoamiOptions {
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::List {
                    search,
                    status,
                    assignee,
                    mine,
                    sort,
                    order,
                } => task::run_list(task::ListOptions {
                    search,
                    status,
                    assignee,
                    mine,
                    sort,
                    order,
                    config: self.config,
                    token: self.token,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Add {
                    name,
                    details,
                    assignee,
                    category,
                    start,
                    due,
                    priority,
                    status,
                } => task::run_add(task::AddOptions {
                    name,
                    details,
                    assignee,
                    category,
                    start,
                    due,
                    priority,
                    status,
                    config: self.config,
                    token: self.token,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    config: self.config,
                    token: self.token,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Edit {
                    id,
                    name,
                    details,
                    assignee,
                    category,
                    start,
                    due,
                    priority,
                    status,
                } => task::run_edit(task::EditOptions {
                    id,
                    name,
                    details,
                    assignee,
                    category,
                    start,
                    due,
                    priority,
                    status,
                    config: self.config,
                    token: self.token,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Status { id, status } => task::run_status(
                    "task status",
                    task::StatusOptions {
                        id,
                        status,
                        config: self.config,
                        token: self.token,
                        json: self.json,
                        quiet: self.quiet,
                    },
                ),
                TaskCommands::Done { id } => task::run_status(
                    "task done",
                    task::StatusOptions {
                        id,
                        status: "completed".to_string(),
                        config: self.config,
                        token: self.token,
                        json: self.json,
                        quiet: self.quiet,
                    },
                ),
                TaskCommands::Rm { id, yes } => task::run_rm(task::RmOptions {
                    id,
                    yes,
                    config: self.config,
                    token: self.token,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Board => board::run(board::BoardOptions {
                config: self.config,
                token: self.token,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Gantt => gantt::run(gantt::GanttOptions {
                config: self.config,
                token: self.token,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

/// Resolve the config file path: the explicit flag, or `taskgrid.toml` in
/// the current directory.
fn resolve_config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Open the spreadsheet behind the config and load the full snapshot.
fn open_state(
    config_flag: Option<PathBuf>,
    token_flag: Option<&str>,
) -> Result<AppState<SheetsClient>> {
    let config_path = resolve_config_path(config_flag);
    let config = Config::load(&config_path)?;
    let spreadsheet_id = config.require_spreadsheet_id()?.to_string();

    let token_path = config.token_path(&config_path);
    let access_token = crate::auth::resolve_access_token(token_flag, &token_path)?;
    let profile = crate::auth::load_token(&token_path)?.map(|stored| stored.profile);

    let client = SheetsClient::new(&config.api.base_url, &spreadsheet_id, &access_token);
    let store = SheetStore::new(client, config.sheets.clone());

    let mut state = AppState::new(store, profile);
    state.load_all()?;
    Ok(state)
}
