//! Board view: one column per status.

use serde::Serialize;

use crate::task::{Status, Task};

/// One board column.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub status: Status,
    pub tasks: Vec<Task>,
}

/// Group tasks into status columns in display order, preserving each
/// task's relative position. Empty columns are kept.
pub fn group_by_status(tasks: &[Task]) -> Vec<BoardColumn> {
    Status::ALL
        .iter()
        .map(|&status| BoardColumn {
            status,
            tasks: tasks
                .iter()
                .filter(|task| task.status == status)
                .cloned()
                .collect(),
        })
        .collect()
}
