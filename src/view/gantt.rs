//! Gantt view: date-window rows for tasks with plannable dates.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::task::{Status, Task};

/// One gantt row: a task projected onto a concrete date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttRow {
    pub id: String,
    pub name: String,
    pub assignee: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub percent: u8,
}

/// Project tasks onto gantt rows, in input order. Tasks without two
/// parseable dates are dropped; a window whose start is not before its end
/// is clamped to one day.
pub fn rows(tasks: &[Task]) -> Vec<GanttRow> {
    tasks.iter().filter_map(row_for).collect()
}

fn row_for(task: &Task) -> Option<GanttRow> {
    let start = parse_date(&task.start_date)?;
    let mut end = parse_date(&task.due_date)?;
    if start >= end {
        end = start.checked_add_days(Days::new(1))?;
    }
    Some(GanttRow {
        id: task.id.clone(),
        name: task.name.clone(),
        assignee: task.assignee.clone(),
        start,
        end,
        percent: percent_complete(task.status),
    })
}

/// Progress shown on the bar: in progress counts as half done.
pub fn percent_complete(status: Status) -> u8 {
    match status {
        Status::NotStarted => 0,
        Status::InProgress => 50,
        Status::Completed => 100,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    // Timestamp cells count as dates too.
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|stamp| stamp.date_naive())
}
