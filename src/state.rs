//! In-memory application state over the task store.
//!
//! Owns the entity snapshot and the reload-after-mutation contract: row
//! positions in the snapshot can be trusted precisely because every
//! structural mutation path here ends by replacing the snapshot wholesale.

use tracing::debug;

use crate::auth::Profile;
use crate::error::{Error, Result};
use crate::master::{Category, User};
use crate::sheets::SheetsApi;
use crate::store::SheetStore;
use crate::task::{self, NewTask, Status, Task};

/// Snapshot of all three entity lists plus the signed-in profile.
pub struct AppState<A: SheetsApi> {
    store: SheetStore<A>,
    tasks: Vec<Task>,
    users: Vec<User>,
    categories: Vec<Category>,
    profile: Option<Profile>,
}

impl<A: SheetsApi> AppState<A> {
    pub fn new(store: SheetStore<A>, profile: Option<Profile>) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            users: Vec::new(),
            categories: Vec::new(),
            profile,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Replace the whole snapshot from the backing store.
    pub fn load_all(&mut self) -> Result<()> {
        self.tasks = self.store.fetch_tasks()?;
        self.users = self.store.fetch_users()?;
        self.categories = self.store.fetch_categories()?;
        debug!(
            tasks = self.tasks.len(),
            users = self.users.len(),
            categories = self.categories.len(),
            "snapshot loaded"
        );
        Ok(())
    }

    /// Display name of the signed-in user, resolved through the users sheet
    /// by email.
    pub fn current_user_name(&self) -> Option<&str> {
        let profile = self.profile.as_ref()?;
        self.users
            .iter()
            .find(|user| user.email == profile.email)
            .map(|user| user.name.as_str())
    }

    /// Find a task by user input: exact id or unique prefix.
    pub fn resolve_task(&self, input: &str) -> Result<&Task> {
        let id = task::resolve_task_id(&self.tasks, input)?;
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Create a task, then reload. Returns the created task with its row
    /// position filled in by the reload.
    pub fn create_task(&mut self, new: NewTask) -> Result<Task> {
        let created = self.store.create_task(new)?;
        self.load_all()?;
        let task = self
            .tasks
            .iter()
            .find(|task| task.id == created.id)
            .cloned()
            .unwrap_or(created);
        Ok(task)
    }

    /// Overwrite an existing task in full, then reload.
    pub fn update_task(&mut self, task: Task) -> Result<Task> {
        let updated = self.store.update_task(&task)?;
        self.load_all()?;
        Ok(updated)
    }

    /// Optimistically move a task to a new status.
    ///
    /// The snapshot changes before the write. On failure the prior snapshot
    /// is restored exactly. On success there is no reload: a single-row
    /// overwrite is not structural, so row positions stay valid, and the
    /// written copy (with its stamped timestamp) replaces the optimistic one.
    pub fn set_task_status(&mut self, id: &str, status: Status) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        let previous = self.tasks.clone();
        self.tasks[index].status = status;

        match self.store.update_task(&self.tasks[index]) {
            Ok(written) => {
                self.tasks[index] = written.clone();
                Ok(written)
            }
            Err(err) => {
                self.tasks = previous;
                Err(err)
            }
        }
    }

    /// Delete a task by exact id, then reload.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self
            .tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        self.store.delete_task(&task)?;
        self.load_all()?;
        Ok(task)
    }
}
