use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taskgrid::auth::Profile;
use taskgrid::config::SheetsConfig;
use taskgrid::error::{Error, Result};
use taskgrid::sheets::SheetsApi;
use taskgrid::state::AppState;
use taskgrid::store::SheetStore;

pub const TASKS: &str = "タスク";
pub const USERS: &str = "ユーザーマスタ";
pub const CATEGORIES: &str = "カテゴリマスタ";

/// In-memory spreadsheet document standing in for the Sheets API.
///
/// Ranges are interpreted just enough for the store's access patterns:
/// whole-sheet reads (`Sheet!A:K`), single-cell and single-row reads
/// (`Sheet!A5`, `Sheet!A5:K5`), row overwrites, appends, and structural
/// row deletion. Clones share the same document, so a test can keep a
/// handle while the store owns another.
#[derive(Clone)]
pub struct FakeSheets {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    sheets: HashMap<String, Vec<Vec<String>>>,
    sheet_ids: HashMap<i64, String>,
    calls: Vec<String>,
    fail_on: Option<(String, Error)>,
}

impl FakeSheets {
    /// A document with the three default sheets, header rows in place.
    pub fn new() -> Self {
        let fake = Self {
            inner: Rc::new(RefCell::new(Inner {
                sheets: HashMap::new(),
                sheet_ids: HashMap::new(),
                calls: Vec::new(),
                fail_on: None,
            })),
        };
        fake.insert_sheet(
            TASKS,
            vec![row(&[
                "id",
                "name",
                "details",
                "assignee",
                "category",
                "startDate",
                "dueDate",
                "priority",
                "status",
                "createdDate",
                "updatedDate",
            ])],
        );
        fake.insert_sheet(USERS, vec![row(&["email", "name", "role"])]);
        fake.insert_sheet(CATEGORIES, vec![row(&["name"])]);
        fake.map_sheet_id(0, TASKS);
        fake
    }

    pub fn insert_sheet(&self, name: &str, grid: Vec<Vec<String>>) {
        self.inner.borrow_mut().sheets.insert(name.to_string(), grid);
    }

    pub fn map_sheet_id(&self, id: i64, name: &str) {
        self.inner
            .borrow_mut()
            .sheet_ids
            .insert(id, name.to_string());
    }

    pub fn add_task_row(&self, cells: Vec<String>) {
        self.push_row(TASKS, cells);
    }

    pub fn add_user(&self, email: &str, name: &str, role: &str) {
        self.push_row(USERS, row(&[email, name, role]));
    }

    pub fn add_category(&self, name: &str) {
        self.push_row(CATEGORIES, row(&[name]));
    }

    fn push_row(&self, sheet: &str, cells: Vec<String>) {
        let mut inner = self.inner.borrow_mut();
        inner.sheets.entry(sheet.to_string()).or_default().push(cells);
    }

    /// Snapshot of a sheet's raw grid.
    pub fn grid(&self, name: &str) -> Vec<Vec<String>> {
        self.inner
            .borrow()
            .sheets
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Structurally remove a 1-based row, as another client would.
    pub fn remove_row(&self, name: &str, row: u32) {
        let mut inner = self.inner.borrow_mut();
        if let Some(grid) = inner.sheets.get_mut(name) {
            let index = row as usize - 1;
            if index < grid.len() {
                grid.remove(index);
            }
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Fail the next call whose log line starts with `prefix` (one-shot).
    pub fn fail_on(&self, prefix: &str, err: Error) {
        self.inner.borrow_mut().fail_on = Some((prefix.to_string(), err));
    }

    fn record(&self, call: String) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let triggered = inner
            .fail_on
            .as_ref()
            .is_some_and(|(prefix, _)| call.starts_with(prefix.as_str()));
        inner.calls.push(call);
        if triggered {
            let (_, err) = inner.fail_on.take().expect("fail_on present");
            return Err(err);
        }
        Ok(())
    }
}

impl SheetsApi for FakeSheets {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        self.record(format!("read {range}"))?;

        let (sheet, span) = split_range(range);
        let grid = self.grid(&sheet);
        let (start_col, start_row, end_col, _) = parse_span(&span);

        let rows: Vec<Vec<String>> = match start_row {
            Some(row) => grid.get(row as usize - 1).cloned().into_iter().collect(),
            None => grid,
        };

        Ok(rows
            .into_iter()
            .map(|cells| {
                cells
                    .into_iter()
                    .skip(start_col)
                    .take(end_col - start_col + 1)
                    .collect()
            })
            .collect())
    }

    fn append_row(&self, range: &str, row: &[String]) -> Result<()> {
        self.record(format!("append {range}"))?;

        let (sheet, _) = split_range(range);
        self.push_row(&sheet, row.to_vec());
        Ok(())
    }

    fn update_row(&self, range: &str, row: &[String]) -> Result<()> {
        self.record(format!("update {range}"))?;

        let (sheet, span) = split_range(range);
        let (_, start_row, _, _) = parse_span(&span);
        let row_num = start_row.expect("update range must name a row");

        let mut inner = self.inner.borrow_mut();
        let grid = inner.sheets.entry(sheet).or_default();
        let index = row_num as usize - 1;
        assert!(index < grid.len(), "update beyond sheet: {range}");
        grid[index] = row.to_vec();
        Ok(())
    }

    fn delete_rows(&self, sheet_id: i64, start_index: u32, end_index: u32) -> Result<()> {
        self.record(format!("delete {sheet_id} {start_index} {end_index}"))?;

        let mut inner = self.inner.borrow_mut();
        let name = inner
            .sheet_ids
            .get(&sheet_id)
            .cloned()
            .expect("sheet id registered");
        let grid = inner.sheets.entry(name).or_default();
        let start = start_index as usize;
        let end = (end_index as usize).min(grid.len());
        if start < end {
            grid.drain(start..end);
        }
        Ok(())
    }
}

fn split_range(range: &str) -> (String, String) {
    match range.split_once('!') {
        Some((sheet, span)) => (sheet.to_string(), span.to_string()),
        None => (range.to_string(), String::new()),
    }
}

/// `A` -> (0, None); `A5` -> (0, Some(5)).
fn parse_ref(cell: &str) -> (usize, Option<u32>) {
    let letters: String = cell
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let digits: String = cell
        .chars()
        .skip_while(|c| c.is_ascii_alphabetic())
        .collect();
    let col = letters.chars().fold(0usize, |acc, c| {
        acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1)
    });
    (col.saturating_sub(1), digits.parse().ok())
}

fn parse_span(span: &str) -> (usize, Option<u32>, usize, Option<u32>) {
    match span.split_once(':') {
        Some((start, end)) => {
            let (start_col, start_row) = parse_ref(start);
            let (end_col, end_row) = parse_ref(end);
            (start_col, start_row, end_col, end_row)
        }
        None => {
            let (col, row) = parse_ref(span);
            (col, row, col, row)
        }
    }
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

/// An 11-cell task row with the given id and name and quiet defaults
/// everywhere else.
pub fn task_cells(id: &str, name: &str) -> Vec<String> {
    row(&[
        id,
        name,
        "",
        "",
        "",
        "",
        "",
        "中",
        "未着手",
        "2024-01-01T00:00:00.000Z",
        "2024-01-01T00:00:00.000Z",
    ])
}

pub fn store(fake: &FakeSheets) -> SheetStore<FakeSheets> {
    SheetStore::new(fake.clone(), SheetsConfig::default())
}

pub fn state(fake: &FakeSheets) -> AppState<FakeSheets> {
    AppState::new(store(fake), None)
}

pub fn state_with_profile(fake: &FakeSheets, email: &str) -> AppState<FakeSheets> {
    let profile = Profile {
        email: email.to_string(),
        name: String::new(),
        picture: String::new(),
    };
    AppState::new(store(fake), Some(profile))
}
