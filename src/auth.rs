//! Session management against the OAuth2 endpoints.
//!
//! `login` trades a user-supplied access token for a profile via the
//! userinfo endpoint and stores both; `logout` revokes the token and
//! removes the stored session. Token acquisition itself (the browser
//! consent flow) is out of scope: callers bring an already-issued token.

use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// The authenticated identity resolved from the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// Stored session: the access token plus the profile it resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub profile: Profile,
    pub obtained_at: String,
}

/// Outcome of [`sign_out`].
#[derive(Debug, Clone, Copy)]
pub struct SignOut {
    pub revoked: bool,
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
struct UserinfoResponse {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Verify an access token against the userinfo endpoint and return the
/// profile it belongs to. Any rejection is an auth failure, not transport.
pub fn sign_in(userinfo_url: &str, access_token: &str) -> Result<Profile> {
    let token = access_token.trim();
    if token.is_empty() {
        return Err(Error::InvalidArgument(
            "access token cannot be empty".to_string(),
        ));
    }

    let client = Client::new();
    let resp = client.get(userinfo_url).bearer_auth(token).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Unauthorized(format!(
            "userinfo request failed: HTTP {status}"
        )));
    }

    let info: UserinfoResponse = resp.json()?;
    let email = match info.email {
        Some(email) if !email.trim().is_empty() => email,
        _ => {
            return Err(Error::Unauthorized(
                "userinfo response has no email (token may lack the email scope)".to_string(),
            ))
        }
    };

    Ok(Profile {
        email,
        name: info.name.unwrap_or_default(),
        picture: info.picture.unwrap_or_default(),
    })
}

/// Build the stored session for a profile signed in right now.
pub fn stored_token(access_token: &str, profile: Profile) -> StoredToken {
    StoredToken {
        access_token: access_token.trim().to_string(),
        profile,
        obtained_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Load the stored session. A missing file is `Ok(None)`; a corrupt file is
/// an error.
pub fn load_token(path: &Path) -> Result<Option<StoredToken>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let token: StoredToken = serde_json::from_str(&content)?;
    Ok(Some(token))
}

/// Persist the session atomically: temp file in the same directory, synced,
/// then renamed over the target.
pub fn save_token(path: &Path, token: &StoredToken) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, token)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}

/// Access token for API calls: the `--token`/env override when present,
/// otherwise the stored session.
pub fn resolve_access_token(override_token: Option<&str>, path: &Path) -> Result<String> {
    if let Some(token) = override_token {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
    match load_token(path)? {
        Some(stored) => Ok(stored.access_token),
        None => Err(Error::NotSignedIn),
    }
}

/// Revoke the stored token (best effort) and remove the session file.
/// Revocation failure downgrades to a warning; the file still goes away.
pub fn sign_out(revoke_url: &str, path: &Path) -> Result<SignOut> {
    let stored = load_token(path)?;

    let mut revoked = false;
    if let Some(stored) = &stored {
        match revoke(revoke_url, &stored.access_token) {
            Ok(()) => revoked = true,
            Err(err) => warn!(error = %err, "token revocation failed"),
        }
    }

    let removed = if path.exists() {
        std::fs::remove_file(path)?;
        true
    } else {
        false
    };

    Ok(SignOut { revoked, removed })
}

fn revoke(revoke_url: &str, token: &str) -> Result<()> {
    let client = Client::new();
    let resp = client.post(revoke_url).form(&[("token", token)]).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            message: "revocation rejected".to_string(),
        });
    }
    Ok(())
}
