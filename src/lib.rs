//! taskgrid - spreadsheet-backed task tracker
//!
//! This library provides the core functionality for the taskgrid CLI tool:
//! a task tracker whose storage engine is a Google Sheets spreadsheet.
//!
//! # Core Concepts
//!
//! - **Tasks**: one sheet row per task, 11 positional columns (A:K)
//! - **Masters**: read-only user and category lookup sheets
//! - **Row guard**: targeted writes re-check the id cell at the target row
//!   and refuse to touch a row that no longer holds the expected task
//! - **Views**: pure projections of the snapshot (table, board, gantt)
//! - **Session**: a stored access token plus the profile it resolved to
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskgrid.toml`
//! - `error`: Error types and result aliases
//! - `sheets`: Sheets API client and the `SheetsApi` trait
//! - `task`: Task entity and the sheet column contract
//! - `master`: User and category master sheets
//! - `store`: Typed CRUD over the spreadsheet binding
//! - `state`: In-memory snapshot and the mutation contract
//! - `auth`: Session management against the OAuth2 endpoints
//! - `view`: Table, board, and gantt projections
//! - `output`: Shared human/JSON output formatting

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod master;
pub mod output;
pub mod sheets;
pub mod state;
pub mod store;
pub mod task;
pub mod view;

pub use error::{Error, Result};
