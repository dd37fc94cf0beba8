//! The task repository: typed CRUD over the spreadsheet binding.
//!
//! Owns range construction, id generation, timestamping, and the row
//! guard. Row positions returned by `fetch_tasks` are valid only until the
//! next structural change to the sheet; callers reload after mutating.

use tracing::{debug, info};

use crate::config::SheetsConfig;
use crate::error::{Error, Result};
use crate::master::{self, Category, User, CATEGORY_SPAN, USER_SPAN};
use crate::sheets::{row_range, sheet_range, SheetsApi};
use crate::task::{self, NewTask, Task, TASK_SPAN};

/// Typed CRUD over one spreadsheet document.
pub struct SheetStore<A: SheetsApi> {
    api: A,
    sheets: SheetsConfig,
}

impl<A: SheetsApi> SheetStore<A> {
    pub fn new(api: A, sheets: SheetsConfig) -> Self {
        Self { api, sheets }
    }

    /// All tasks, top to bottom. Row positions are accurate as of this call
    /// only.
    pub fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let range = sheet_range(&self.sheets.tasks, TASK_SPAN);
        let grid = self.api.read_range(&range)?;
        let tasks = task::parse_task_grid(&grid);
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    /// All users, empty rows included.
    pub fn fetch_users(&self) -> Result<Vec<User>> {
        let range = sheet_range(&self.sheets.users, USER_SPAN);
        let grid = self.api.read_range(&range)?;
        Ok(master::parse_user_grid(&grid))
    }

    /// All categories, empty rows included.
    pub fn fetch_categories(&self) -> Result<Vec<Category>> {
        let range = sheet_range(&self.sheets.categories, CATEGORY_SPAN);
        let grid = self.api.read_range(&range)?;
        Ok(master::parse_category_grid(&grid))
    }

    /// Create a task: fresh id, created == updated == now, appended after
    /// the last data row. The returned task carries row 0 (unknown); the
    /// caller reloads to learn its position.
    pub fn create_task(&self, new: NewTask) -> Result<Task> {
        let now = task::now_timestamp();
        let created = Task {
            id: task::generate_task_id(),
            name: new.name,
            details: new.details,
            assignee: new.assignee,
            category: new.category,
            start_date: new.start_date,
            due_date: new.due_date,
            priority: new.priority,
            status: new.status,
            created_date: now.clone(),
            updated_date: now,
            row: 0,
        };

        let range = sheet_range(&self.sheets.tasks, TASK_SPAN);
        self.api.append_row(&range, &created.to_row())?;
        info!(id = %created.id, "created task");
        Ok(created)
    }

    /// Overwrite the task's backing row in full, stamping `updated_date`.
    /// Returns the written copy.
    pub fn update_task(&self, task: &Task) -> Result<Task> {
        self.guard_row(task)?;

        let mut updated = task.clone();
        updated.updated_date = task::now_timestamp();

        let range = row_range(&self.sheets.tasks, TASK_SPAN, task.row);
        self.api.update_row(&range, &updated.to_row())?;
        info!(id = %updated.id, row = updated.row, "updated task");
        Ok(updated)
    }

    /// Structurally delete the task's backing row. Every later row shifts up
    /// by one, so all cached row positions are stale afterwards.
    pub fn delete_task(&self, task: &Task) -> Result<()> {
        self.guard_row(task)?;

        self.api
            .delete_rows(self.sheets.tasks_sheet_id, task.row - 1, task.row)?;
        info!(id = %task.id, row = task.row, "deleted task");
        Ok(())
    }

    /// Row positions are cache hints, not identity. Before a targeted write,
    /// re-read the id cell at the target row; a mismatch means the sheet
    /// changed shape since the last reload and the write must not happen.
    fn guard_row(&self, task: &Task) -> Result<()> {
        if task.row < 2 {
            return Err(Error::InvalidArgument(format!(
                "task {} has no row position; reload first",
                task.id
            )));
        }

        // Column A is the id column.
        let range = row_range(&self.sheets.tasks, "A", task.row);
        let grid = self.api.read_range(&range)?;
        let found = grid
            .first()
            .and_then(|row| row.first())
            .map(String::as_str)
            .unwrap_or("");

        if found != task.id {
            return Err(Error::StaleRow {
                id: task.id.clone(),
                row: task.row,
                found: found.to_string(),
            });
        }
        Ok(())
    }
}
