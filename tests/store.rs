mod support;

use support::{row, store, task_cells, FakeSheets, TASKS};
use taskgrid::error::Error;
use taskgrid::task::{NewTask, Priority, Status, TASK_ID_PREFIX};

#[test]
fn fetch_tasks_parses_the_grid() {
    let fake = FakeSheets::new();
    fake.add_task_row(row(&[
        "T1",
        "Buy milk",
        "",
        "Alice",
        "Errand",
        "2024-01-01",
        "2024-01-02",
        "中",
        "未着手",
        "2024-01-01T00:00:00Z",
        "2024-01-01T00:00:00Z",
    ]));

    let tasks = store(&fake).fetch_tasks().expect("fetch");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "T1");
    assert_eq!(tasks[0].name, "Buy milk");
    assert_eq!(tasks[0].assignee, "Alice");
    assert_eq!(tasks[0].priority, Priority::Medium);
    assert_eq!(tasks[0].status, Status::NotStarted);
    assert_eq!(tasks[0].row, 2);
}

#[test]
fn fetch_tasks_skips_rows_without_an_id_but_keeps_numbering() {
    let fake = FakeSheets::new();
    fake.add_task_row(task_cells("T1", "First"));
    fake.add_task_row(row(&["", "No id"]));
    fake.add_task_row(task_cells("T3", "Third"));

    let tasks = store(&fake).fetch_tasks().expect("fetch");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].row, 2);
    assert_eq!(tasks[1].id, "T3");
    assert_eq!(tasks[1].row, 4);
}

#[test]
fn create_appends_one_full_row_with_equal_timestamps() {
    let fake = FakeSheets::new();
    let created = store(&fake)
        .create_task(NewTask {
            name: "Write report".to_string(),
            assignee: "Alice".to_string(),
            priority: Priority::High,
            ..NewTask::default()
        })
        .expect("create");

    assert!(created.id.starts_with(TASK_ID_PREFIX));
    assert_eq!(created.created_date, created.updated_date);
    // The append does not reveal the row; that comes from the next reload.
    assert_eq!(created.row, 0);

    let grid = fake.grid(TASKS);
    assert_eq!(grid.len(), 2);
    assert_eq!(grid[1].len(), 11);
    assert_eq!(grid[1][0], created.id);
    assert_eq!(grid[1][1], "Write report");
    assert_eq!(grid[1][7], "高");
    assert_eq!(grid[1][8], "未着手");
}

#[test]
fn update_overwrites_only_the_target_row_and_stamps_updated() {
    let fake = FakeSheets::new();
    fake.add_task_row(task_cells("T1", "First"));
    fake.add_task_row(task_cells("T2", "Second"));

    let store = store(&fake);
    let tasks = store.fetch_tasks().expect("fetch");
    let mut second = tasks[1].clone();
    second.name = "Renamed".to_string();

    let written = store.update_task(&second).expect("update");
    assert_eq!(written.name, "Renamed");
    assert_ne!(written.updated_date, tasks[1].updated_date);
    assert_eq!(written.created_date, tasks[1].created_date);

    let grid = fake.grid(TASKS);
    assert_eq!(grid[1][1], "First");
    assert_eq!(grid[2][1], "Renamed");
    assert!(fake
        .calls()
        .iter()
        .any(|call| call == "update タスク!A3:K3"));
}

#[test]
fn update_refuses_a_row_that_moved() {
    let fake = FakeSheets::new();
    fake.add_task_row(task_cells("T1", "First"));
    fake.add_task_row(task_cells("T2", "Second"));
    fake.add_task_row(task_cells("T3", "Third"));

    let store = store(&fake);
    let second = store.fetch_tasks().expect("fetch")[1].clone();

    // Another client deletes the first data row; T3 slides into row 3.
    fake.remove_row(TASKS, 2);

    let err = store.update_task(&second).expect_err("stale");
    match err {
        Error::StaleRow { id, row, found } => {
            assert_eq!(id, "T2");
            assert_eq!(row, 3);
            assert_eq!(found, "T3");
        }
        other => panic!("expected StaleRow, got {other:?}"),
    }

    // The guard fired before any write.
    assert!(fake.calls().iter().all(|call| !call.starts_with("update")));
    let grid = fake.grid(TASKS);
    assert_eq!(grid[1][0], "T2");
    assert_eq!(grid[2][0], "T3");
}

#[test]
fn delete_removes_exactly_the_backing_row() {
    let fake = FakeSheets::new();
    fake.add_task_row(task_cells("T1", "First"));
    fake.add_task_row(task_cells("T2", "Second"));
    fake.add_task_row(task_cells("T3", "Third"));

    let store = store(&fake);
    let second = store.fetch_tasks().expect("fetch")[1].clone();
    store.delete_task(&second).expect("delete");

    // Sheet row 3 maps to the 0-based index window [2, 3).
    assert!(fake.calls().iter().any(|call| call == "delete 0 2 3"));

    let grid = fake.grid(TASKS);
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[1][0], "T1");
    assert_eq!(grid[2][0], "T3");
}

#[test]
fn delete_refuses_a_row_that_moved() {
    let fake = FakeSheets::new();
    fake.add_task_row(task_cells("T1", "First"));
    fake.add_task_row(task_cells("T2", "Second"));

    let store = store(&fake);
    let second = store.fetch_tasks().expect("fetch")[1].clone();
    fake.remove_row(TASKS, 2);

    let err = store.delete_task(&second).expect_err("stale");
    assert!(matches!(err, Error::StaleRow { .. }));
    assert!(fake.calls().iter().all(|call| !call.starts_with("delete")));
    assert_eq!(fake.grid(TASKS).len(), 2);
}

#[test]
fn mutations_require_a_known_row_position() {
    let fake = FakeSheets::new();
    fake.add_task_row(task_cells("T1", "First"));

    let store = store(&fake);
    let mut task = store.fetch_tasks().expect("fetch")[0].clone();
    task.row = 0;

    let err = store.update_task(&task).expect_err("no row");
    assert!(matches!(err, Error::InvalidArgument(_)));
    let err = store.delete_task(&task).expect_err("no row");
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn masters_keep_empty_rows() {
    let fake = FakeSheets::new();
    fake.add_user("alice@example.com", "Alice", "admin");
    fake.add_user("", "", "");
    fake.add_category("Errand");
    fake.add_category("");

    let store = store(&fake);
    let users = store.fetch_users().expect("users");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Alice");
    assert_eq!(users[1].email, "");

    let categories = store.fetch_categories().expect("categories");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "");
}
