//! taskgrid task command implementations
//!
//! Every subcommand here opens the spreadsheet, loads the full snapshot,
//! and then works against it. Ids accept unique prefixes.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{NewTask, Priority, Status, Task};
use crate::view::table::{self, SortKey, TableQuery};

/// Options for the task list command
pub struct ListOptions {
    pub search: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub mine: bool,
    pub sort: String,
    pub order: String,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the task add command
pub struct AddOptions {
    pub name: String,
    pub details: String,
    pub assignee: String,
    pub category: String,
    pub start: String,
    pub due: String,
    pub priority: String,
    pub status: String,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the task show command
pub struct ShowOptions {
    pub id: String,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the task edit command
pub struct EditOptions {
    pub id: String,
    pub name: Option<String>,
    pub details: Option<String>,
    pub assignee: Option<String>,
    pub category: Option<String>,
    pub start: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the task status and task done commands
pub struct StatusOptions {
    pub id: String,
    pub status: String,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the task rm command
pub struct RmOptions {
    pub id: String,
    pub yes: bool,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ListReport {
    count: usize,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct RmReport {
    id: String,
    name: String,
    row: u32,
    deleted: bool,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let status = options
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;
    let sort_by: SortKey = options.sort.parse()?;
    let descending = parse_order(&options.order)?;

    let state = super::open_state(options.config, options.token.as_deref())?;

    // A --mine request with no matching row in the users sheet filters
    // nothing, same as the absent profile case.
    let mine = if options.mine {
        state.current_user_name().map(str::to_string)
    } else {
        None
    };

    let query = TableQuery {
        search: options.search,
        status,
        assignee: options.assignee,
        mine,
        sort_by,
        descending,
    };
    let tasks = table::filter_and_sort(state.tasks(), &query);

    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };
    if output.json {
        let report = ListReport {
            count: tasks.len(),
            tasks,
        };
        return emit_success(output, "task list", &report, None);
    }
    if !output.quiet {
        render_task_table(&tasks);
    }
    Ok(())
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let priority: Priority = options.priority.parse()?;
    let status: Status = options.status.parse()?;
    let name = options.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "task name cannot be empty".to_string(),
        ));
    }

    let mut state = super::open_state(options.config, options.token.as_deref())?;
    let created = state.create_task(NewTask {
        name,
        details: options.details,
        assignee: options.assignee,
        category: options.category,
        start_date: options.start,
        due_date: options.due,
        priority,
        status,
    })?;

    let mut human = HumanOutput::new(format!("taskgrid task add: created {}", created.id));
    human.push_summary("name", created.name.clone());
    human.push_summary("status", created.status.to_string());
    human.push_summary("priority", created.priority.to_string());
    if created.row != 0 {
        human.push_summary("row", created.row.to_string());
    }
    human.push_next_step(format!("taskgrid task show {}", created.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task add",
        &created,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let state = super::open_state(options.config, options.token.as_deref())?;
    let task = state.resolve_task(&options.id)?.clone();

    let mut human = HumanOutput::new(format!("{}: {}", task.id, task.name));
    if !task.details.is_empty() {
        human.push_detail(task.details.clone());
    }
    human.push_summary("status", task.status.to_string());
    human.push_summary("priority", task.priority.to_string());
    push_if_set(&mut human, "assignee", &task.assignee);
    push_if_set(&mut human, "category", &task.category);
    push_if_set(&mut human, "start", &task.start_date);
    push_if_set(&mut human, "due", &task.due_date);
    push_if_set(&mut human, "created", &task.created_date);
    push_if_set(&mut human, "updated", &task.updated_date);
    human.push_summary("row", task.row.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &task,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let priority = options
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let status = options
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;

    let has_changes = options.name.is_some()
        || options.details.is_some()
        || options.assignee.is_some()
        || options.category.is_some()
        || options.start.is_some()
        || options.due.is_some()
        || priority.is_some()
        || status.is_some();
    if !has_changes {
        return Err(Error::InvalidArgument(
            "nothing to change; pass at least one field option".to_string(),
        ));
    }

    let mut state = super::open_state(options.config, options.token.as_deref())?;
    let mut task = state.resolve_task(&options.id)?.clone();

    let mut changed: Vec<(&str, String)> = Vec::new();
    if let Some(name) = options.name {
        task.name = name;
        changed.push(("name", task.name.clone()));
    }
    if let Some(details) = options.details {
        task.details = details;
        changed.push(("details", task.details.clone()));
    }
    if let Some(assignee) = options.assignee {
        task.assignee = assignee;
        changed.push(("assignee", task.assignee.clone()));
    }
    if let Some(category) = options.category {
        task.category = category;
        changed.push(("category", task.category.clone()));
    }
    if let Some(start) = options.start {
        task.start_date = start;
        changed.push(("start", task.start_date.clone()));
    }
    if let Some(due) = options.due {
        task.due_date = due;
        changed.push(("due", task.due_date.clone()));
    }
    if let Some(priority) = priority {
        task.priority = priority;
        changed.push(("priority", priority.to_string()));
    }
    if let Some(status) = status {
        task.status = status;
        changed.push(("status", status.to_string()));
    }

    let updated = state.update_task(task)?;

    let mut human = HumanOutput::new(format!("taskgrid task edit: updated {}", updated.id));
    for (field, value) in changed {
        human.push_summary(field, value);
    }
    human.push_summary("updated", updated.updated_date.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task edit",
        &updated,
        Some(&human),
    )
}

pub fn run_status(command: &str, options: StatusOptions) -> Result<()> {
    let status: Status = options.status.parse()?;

    let mut state = super::open_state(options.config, options.token.as_deref())?;
    let id = state.resolve_task(&options.id)?.id.clone();
    let updated = state.set_task_status(&id, status)?;

    let mut human = HumanOutput::new(format!(
        "taskgrid {}: {} is now {}",
        command, updated.id, updated.status
    ));
    if !updated.name.is_empty() {
        human.push_summary("name", updated.name.clone());
    }
    human.push_summary("updated", updated.updated_date.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &updated,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut state = super::open_state(options.config, options.token.as_deref())?;
    let task = state.resolve_task(&options.id)?.clone();

    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };

    if !options.yes && !options.json && !confirm_delete(&task)? {
        let report = RmReport {
            id: task.id.clone(),
            name: task.name.clone(),
            row: task.row,
            deleted: false,
        };
        let human = HumanOutput::new("taskgrid task rm: aborted");
        return emit_success(output, "task rm", &report, Some(&human));
    }

    let deleted = state.delete_task(&task.id)?;

    let report = RmReport {
        id: deleted.id.clone(),
        name: deleted.name.clone(),
        row: deleted.row,
        deleted: true,
    };
    let mut human = HumanOutput::new(format!("taskgrid task rm: deleted {}", deleted.id));
    if !deleted.name.is_empty() {
        human.push_summary("name", deleted.name.clone());
    }
    human.push_summary("row", deleted.row.to_string());

    emit_success(output, "task rm", &report, Some(&human))
}

fn parse_order(order: &str) -> Result<bool> {
    match order.trim().to_lowercase().as_str() {
        "desc" => Ok(true),
        "asc" => Ok(false),
        _ => Err(Error::InvalidArgument(format!(
            "invalid order '{order}': must be asc or desc"
        ))),
    }
}

fn confirm_delete(task: &Task) -> Result<bool> {
    use std::io::Write;

    let label = if task.name.is_empty() {
        task.id.clone()
    } else {
        format!("{} ({})", task.id, task.name)
    };
    eprint!("Delete {label}? [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn push_if_set(human: &mut HumanOutput, key: &str, value: &str) {
    if !value.is_empty() {
        human.push_summary(key, value);
    }
}

fn render_task_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    let id_width = column_width(tasks.iter().map(|task| task.id.as_str()), "ID");
    let name_width = column_width(tasks.iter().map(|task| task.name.as_str()), "NAME");
    let assignee_width = column_width(tasks.iter().map(|task| task.assignee.as_str()), "ASSIGNEE");

    println!(
        "{:<id_width$}  {:<name_width$}  {:<11}  {:<8}  {:<assignee_width$}  DUE",
        "ID", "NAME", "STATUS", "PRIORITY", "ASSIGNEE"
    );
    for task in tasks {
        println!(
            "{:<id_width$}  {:<name_width$}  {:<11}  {:<8}  {:<assignee_width$}  {}",
            task.id, task.name, task.status, task.priority, task.assignee, task.due_date
        );
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}
