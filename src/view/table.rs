//! Table view: filter, then sort.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::Error;
use crate::task::{Status, Task};

/// Sortable columns of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Assignee,
    Category,
    StartDate,
    DueDate,
    Priority,
    Status,
    #[default]
    CreatedDate,
    UpdatedDate,
}

impl std::str::FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "assignee" => Ok(SortKey::Assignee),
            "category" => Ok(SortKey::Category),
            "start" | "start-date" | "startdate" => Ok(SortKey::StartDate),
            "due" | "due-date" | "duedate" => Ok(SortKey::DueDate),
            "priority" => Ok(SortKey::Priority),
            "status" => Ok(SortKey::Status),
            "created" | "created-date" | "createddate" => Ok(SortKey::CreatedDate),
            "updated" | "updated-date" | "updateddate" => Ok(SortKey::UpdatedDate),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort key '{s}': must be one of name, assignee, category, \
                 start, due, priority, status, created, updated"
            ))),
        }
    }
}

/// Filter and order applied to the snapshot. Empty/`None` filters keep
/// everything.
#[derive(Debug, Clone)]
pub struct TableQuery {
    /// Case-insensitive substring over name and details.
    pub search: Option<String>,
    pub status: Option<Status>,
    pub assignee: Option<String>,
    /// Keep only tasks assigned to this name (the signed-in user's sheet
    /// name). `None` disables the filter even when the user asked for it,
    /// because their email has no row in the users sheet.
    pub mine: Option<String>,
    pub sort_by: SortKey,
    pub descending: bool,
}

impl Default for TableQuery {
    fn default() -> Self {
        // Newest first is the table's resting order.
        Self {
            search: None,
            status: None,
            assignee: None,
            mine: None,
            sort_by: SortKey::CreatedDate,
            descending: true,
        }
    }
}

/// Apply the query and return the visible tasks in display order.
pub fn filter_and_sort(tasks: &[Task], query: &TableQuery) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| matches(task, query))
        .cloned()
        .collect();

    visible.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        if query.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    visible
}

fn matches(task: &Task, query: &TableQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        if !task.name.to_lowercase().contains(&needle)
            && !task.details.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(assignee) = &query.assignee {
        if &task.assignee != assignee {
            return false;
        }
    }
    if let Some(mine) = &query.mine {
        if &task.assignee != mine {
            return false;
        }
    }
    true
}

fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Assignee => a.assignee.cmp(&b.assignee),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::StartDate => a.start_date.cmp(&b.start_date),
        SortKey::DueDate => a.due_date.cmp(&b.due_date),
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Status => a.status.rank().cmp(&b.status.rank()),
        SortKey::CreatedDate => a.created_date.cmp(&b.created_date),
        SortKey::UpdatedDate => a.updated_date.cmp(&b.updated_date),
    }
}
