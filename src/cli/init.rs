//! taskgrid init command implementation
//!
//! Writes a starter config file pointing at a spreadsheet document.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for the init command
pub struct InitOptions {
    pub spreadsheet_id: String,
    pub force: bool,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct InitReport {
    config: PathBuf,
    spreadsheet_id: String,
    overwrote: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    let spreadsheet_id = options.spreadsheet_id.trim().to_string();
    if spreadsheet_id.is_empty() {
        return Err(Error::InvalidArgument(
            "spreadsheet id cannot be empty".to_string(),
        ));
    }

    let config_path = super::resolve_config_path(options.config);
    let existed = config_path.exists();
    if existed && !options.force {
        return Err(Error::InvalidArgument(format!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        )));
    }

    let config = Config {
        spreadsheet_id: spreadsheet_id.clone(),
        ..Config::default()
    };
    config.save(&config_path)?;

    let report = InitReport {
        config: config_path.clone(),
        spreadsheet_id: spreadsheet_id.clone(),
        overwrote: existed,
    };

    let mut human = HumanOutput::new(format!(
        "taskgrid init: wrote {}",
        config_path.display()
    ));
    human.push_summary("spreadsheet", spreadsheet_id);
    if existed {
        human.push_summary("overwrote", "yes");
    }
    human.push_next_step("taskgrid login --token <ACCESS_TOKEN>");
    human.push_next_step("taskgrid task list");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &report,
        Some(&human),
    )?;

    Ok(())
}
