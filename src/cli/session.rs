//! taskgrid login/logout/whoami command implementations
//!
//! The session is a stored access token plus the profile it resolved to.
//! These commands work without a config file; defaults cover the endpoint
//! URLs and the token location.

use std::path::PathBuf;

use crate::auth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for the login command
pub struct LoginOptions {
    pub token: Option<String>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the logout command
pub struct LogoutOptions {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the whoami command
pub struct WhoamiOptions {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct LoginReport {
    email: String,
    name: String,
    token_path: PathBuf,
}

#[derive(serde::Serialize)]
struct LogoutReport {
    revoked: bool,
    removed: bool,
}

#[derive(serde::Serialize)]
struct WhoamiReport {
    email: String,
    name: String,
    obtained_at: String,
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let token = match options.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => {
            return Err(Error::InvalidArgument(
                "--token is required (or set TASKGRID_TOKEN)".to_string(),
            ))
        }
    };

    let config_path = super::resolve_config_path(options.config);
    let config = Config::load_or_default(&config_path)?;
    let token_path = config.token_path(&config_path);

    let profile = auth::sign_in(&config.api.userinfo_url, &token)?;
    let stored = auth::stored_token(&token, profile.clone());
    auth::save_token(&token_path, &stored)?;

    let report = LoginReport {
        email: profile.email.clone(),
        name: profile.name.clone(),
        token_path: token_path.clone(),
    };

    let mut human = HumanOutput::new(format!("taskgrid login: signed in as {}", profile.email));
    if !profile.name.is_empty() {
        human.push_summary("name", profile.name.clone());
    }
    human.push_summary("session", token_path.display().to_string());
    human.push_next_step("taskgrid task list");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "login",
        &report,
        Some(&human),
    )
}

pub fn run_logout(options: LogoutOptions) -> Result<()> {
    let config_path = super::resolve_config_path(options.config);
    let config = Config::load_or_default(&config_path)?;
    let token_path = config.token_path(&config_path);

    let outcome = auth::sign_out(&config.api.revoke_url, &token_path)?;

    let report = LogoutReport {
        revoked: outcome.revoked,
        removed: outcome.removed,
    };

    let header = if outcome.removed {
        "taskgrid logout: signed out"
    } else {
        "taskgrid logout: no stored session"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("revoked", if outcome.revoked { "yes" } else { "no" });
    human.push_summary("session removed", if outcome.removed { "yes" } else { "no" });
    if outcome.removed && !outcome.revoked {
        human.push_warning("revocation failed; the token stays valid until it expires");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "logout",
        &report,
        Some(&human),
    )
}

pub fn run_whoami(options: WhoamiOptions) -> Result<()> {
    let config_path = super::resolve_config_path(options.config);
    let config = Config::load_or_default(&config_path)?;
    let token_path = config.token_path(&config_path);

    let stored = auth::load_token(&token_path)?.ok_or(Error::NotSignedIn)?;

    let report = WhoamiReport {
        email: stored.profile.email.clone(),
        name: stored.profile.name.clone(),
        obtained_at: stored.obtained_at.clone(),
    };

    let mut human = HumanOutput::new(format!("taskgrid whoami: {}", stored.profile.email));
    if !stored.profile.name.is_empty() {
        human.push_summary("name", stored.profile.name.clone());
    }
    human.push_summary("signed in at", stored.obtained_at.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "whoami",
        &report,
        Some(&human),
    )
}
