//! taskgrid board command implementation
//!
//! Groups the task list into one column per status.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, OutputOptions};
use crate::view::board::{self, BoardColumn};

/// Options for the board command
pub struct BoardOptions {
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct BoardReport {
    columns: Vec<BoardColumn>,
}

pub fn run(options: BoardOptions) -> Result<()> {
    let state = super::open_state(options.config, options.token.as_deref())?;
    let columns = board::group_by_status(state.tasks());

    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };
    if output.json {
        let report = BoardReport { columns };
        return emit_success(output, "board", &report, None);
    }
    if !output.quiet {
        render_board(&columns);
    }
    Ok(())
}

fn render_board(columns: &[BoardColumn]) {
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{} ({})", column.status, column.tasks.len());
        for task in &column.tasks {
            if task.assignee.is_empty() {
                println!("  {}  {}", task.id, task.name);
            } else {
                println!("  {}  {}  [{}]", task.id, task.name, task.assignee);
            }
        }
    }
}
