//! Task entity and the sheet column contract.
//!
//! A task occupies one row of the tasks sheet. The positional column layout
//! in [`col`] is shared by read parsing and write serialization; the two
//! sides must never drift apart, so both live in this module.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Zero-indexed column layout of the tasks sheet.
pub mod col {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const DETAILS: usize = 2;
    pub const ASSIGNEE: usize = 3;
    pub const CATEGORY: usize = 4;
    pub const START_DATE: usize = 5;
    pub const DUE_DATE: usize = 6;
    pub const PRIORITY: usize = 7;
    pub const STATUS: usize = 8;
    pub const CREATED_DATE: usize = 9;
    pub const UPDATED_DATE: usize = 10;

    /// Number of columns a task row occupies.
    pub const WIDTH: usize = 11;
}

/// Column span of the tasks sheet, matching [`col::WIDTH`].
pub const TASK_SPAN: &str = "A:K";

/// Prefix of generated task ids.
pub const TASK_ID_PREFIX: &str = "TASK-";

/// Task priority. The sheet stores the deployment's cell labels, not the
/// enum names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Cell label written to the sheet.
    pub fn as_cell(self) -> &'static str {
        match self {
            Priority::High => "高",
            Priority::Medium => "中",
            Priority::Low => "低",
        }
    }

    /// Parse a cell label. Unknown labels are `None`, not an error.
    pub fn parse_cell(cell: &str) -> Option<Self> {
        match cell {
            "高" => Some(Priority::High),
            "中" => Some(Priority::Medium),
            "低" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Read-side defaulting policy: anything unrecognized is Medium.
    pub fn from_cell_or_default(cell: &str) -> Self {
        Self::parse_cell(cell).unwrap_or_default()
    }

    /// Sort rank, most urgent first.
    pub fn rank(self) -> usize {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.pad(label)
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" | "高" => Ok(Priority::High),
            "medium" | "m" | "中" => Ok(Priority::Medium),
            "low" | "l" | "低" => Ok(Priority::Low),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{s}': must be high, medium, or low"
            ))),
        }
    }
}

/// Task status. Variant order is the board's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Status {
    /// Display order used by the board and status filters.
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Completed];

    /// Cell label written to the sheet.
    pub fn as_cell(self) -> &'static str {
        match self {
            Status::NotStarted => "未着手",
            Status::InProgress => "進行中",
            Status::Completed => "完了",
        }
    }

    /// Parse a cell label. Unknown labels are `None`, not an error.
    pub fn parse_cell(cell: &str) -> Option<Self> {
        match cell {
            "未着手" => Some(Status::NotStarted),
            "進行中" => Some(Status::InProgress),
            "完了" => Some(Status::Completed),
            _ => None,
        }
    }

    /// Read-side defaulting policy: anything unrecognized is NotStarted.
    pub fn from_cell_or_default(cell: &str) -> Self {
        Self::parse_cell(cell).unwrap_or_default()
    }

    /// Position in [`Status::ALL`].
    pub fn rank(self) -> usize {
        match self {
            Status::NotStarted => 0,
            Status::InProgress => 1,
            Status::Completed => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        };
        f.pad(label)
    }
}

impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not-started" | "not_started" | "notstarted" | "未着手" => Ok(Status::NotStarted),
            "in-progress" | "in_progress" | "inprogress" | "進行中" => Ok(Status::InProgress),
            "completed" | "complete" | "done" | "完了" => Ok(Status::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status '{s}': must be not-started, in-progress, or completed"
            ))),
        }
    }
}

/// A task backed by one sheet row.
///
/// `row` is the absolute 1-based sheet row (header at row 1, first data row
/// at row 2), valid only until the next structural change to the sheet; 0
/// means unknown, e.g. on a freshly created task before the next reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub details: String,
    pub assignee: String,
    pub category: String,
    pub start_date: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: Status,
    pub created_date: String,
    pub updated_date: String,
    pub row: u32,
}

/// Field set for creating a task. Identity, timestamps, and the row position
/// are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub details: String,
    pub assignee: String,
    pub category: String,
    pub start_date: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: Status,
}

impl Task {
    /// Map one sheet row to a task. Rows with an empty id cell yield `None`.
    pub fn from_row(row: &[String], row_pos: u32) -> Option<Self> {
        let id = cell_or_empty(row, col::ID);
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            name: cell_or_empty(row, col::NAME).to_string(),
            details: cell_or_empty(row, col::DETAILS).to_string(),
            assignee: cell_or_empty(row, col::ASSIGNEE).to_string(),
            category: cell_or_empty(row, col::CATEGORY).to_string(),
            start_date: cell_or_empty(row, col::START_DATE).to_string(),
            due_date: cell_or_empty(row, col::DUE_DATE).to_string(),
            priority: Priority::from_cell_or_default(cell_or_empty(row, col::PRIORITY)),
            status: Status::from_cell_or_default(cell_or_empty(row, col::STATUS)),
            created_date: cell_or_empty(row, col::CREATED_DATE).to_string(),
            updated_date: cell_or_empty(row, col::UPDATED_DATE).to_string(),
            row: row_pos,
        })
    }

    /// Serialize to the 11-column row layout.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![String::new(); col::WIDTH];
        row[col::ID] = self.id.clone();
        row[col::NAME] = self.name.clone();
        row[col::DETAILS] = self.details.clone();
        row[col::ASSIGNEE] = self.assignee.clone();
        row[col::CATEGORY] = self.category.clone();
        row[col::START_DATE] = self.start_date.clone();
        row[col::DUE_DATE] = self.due_date.clone();
        row[col::PRIORITY] = self.priority.as_cell().to_string();
        row[col::STATUS] = self.status.as_cell().to_string();
        row[col::CREATED_DATE] = self.created_date.clone();
        row[col::UPDATED_DATE] = self.updated_date.clone();
        row
    }
}

/// Cell text at `index`; ragged rows read as empty.
pub fn cell_or_empty(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Map a raw grid to tasks. The first row is the header; data row `i`
/// (0-based) is sheet row `i + 2`. Fewer than two rows means no data.
pub fn parse_task_grid(values: &[Vec<String>]) -> Vec<Task> {
    if values.len() < 2 {
        return Vec::new();
    }
    values[1..]
        .iter()
        .enumerate()
        .filter_map(|(index, row)| Task::from_row(row, index as u32 + 2))
        .collect()
}

/// Generate a fresh task id (`TASK-` + ULID).
pub fn generate_task_id() -> String {
    format!("{}{}", TASK_ID_PREFIX, Ulid::new())
}

/// Current UTC time in the sheet's timestamp format (RFC 3339, millisecond
/// precision, `Z` suffix).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Resolve user input to a task id: exact match first, then a unique
/// case-insensitive prefix.
pub fn resolve_task_id(tasks: &[Task], input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "task id cannot be empty".to_string(),
        ));
    }

    if let Some(task) = tasks.iter().find(|task| task.id == trimmed) {
        return Ok(task.id.clone());
    }

    let needle = trimmed.to_uppercase();
    let mut candidates: Vec<String> = tasks
        .iter()
        .filter(|task| task.id.to_uppercase().starts_with(&needle))
        .map(|task| task.id.clone())
        .collect();
    candidates.sort();
    candidates.dedup();

    match candidates.len() {
        0 => Err(Error::TaskNotFound(trimmed.to_string())),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::AmbiguousTask {
            input: trimmed.to_string(),
            candidates,
        }),
    }
}
