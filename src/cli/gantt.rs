//! taskgrid gantt command implementation
//!
//! Projects tasks with plannable dates onto a text timeline.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, OutputOptions};
use crate::view::gantt::{self, GanttRow};

/// Options for the gantt command
pub struct GanttOptions {
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct GanttReport {
    count: usize,
    rows: Vec<GanttRow>,
}

pub fn run(options: GanttOptions) -> Result<()> {
    let state = super::open_state(options.config, options.token.as_deref())?;
    let rows = gantt::rows(state.tasks());

    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };
    if output.json {
        let report = GanttReport {
            count: rows.len(),
            rows,
        };
        return emit_success(output, "gantt", &report, None);
    }
    if !output.quiet {
        render_gantt(&rows);
    }
    Ok(())
}

const BAR_WIDTH: i64 = 40;

fn render_gantt(rows: &[GanttRow]) {
    if rows.is_empty() {
        println!("No tasks with plannable dates.");
        return;
    }

    let mut min = rows[0].start;
    let mut max = rows[0].end;
    for row in rows {
        min = min.min(row.start);
        max = max.max(row.end);
    }
    let total = (max - min).num_days().max(1);

    println!("{min} .. {max}");
    for row in rows {
        // start < max always holds (every window is at least one day), so
        // lead stays strictly inside the bar.
        let lead = ((row.start - min).num_days() * BAR_WIDTH / total) as usize;
        let span = ((row.end - row.start).num_days() * BAR_WIDTH + total - 1) / total;
        let span = (span as usize).clamp(1, BAR_WIDTH as usize - lead);
        let bar = format!("{}{}", " ".repeat(lead), "#".repeat(span));
        println!(
            "{:<24.24}  {:<width$}  {} .. {}  {:>3}%",
            row.name,
            bar,
            row.start,
            row.end,
            row.percent,
            width = BAR_WIDTH as usize
        );
    }
}
