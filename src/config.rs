//! # Config — Project and Credential Resolution
//!
//! The runner needs three values to do anything: the Pinpoint project
//! (application) id, an access key, and a secret key. They are resolved from,
//! in order of precedence:
//!
//! 1. command-line flags, each of which falls back to an environment variable
//!    (`PINPOINT_PROJECT_ID`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, …),
//!    with `.env` loaded into the environment at startup;
//! 2. the TOML file at `~/.pinpoint-runner/config.toml` (or `--config`).
//!
//! Empty strings count as unset, so a blank `PINPOINT_PROJECT_ID=` in `.env`
//! does not shadow the file.
//!
//! Credentials resolve as one unit: the layer that supplies the access key
//! also supplies the secret key and session token. A temporary token from
//! one source is never paired with long-term keys from another.
//!
//! The file holds a secret key, so on unix it is written `0600` inside a
//! `0700` directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sigv4::Credentials;

pub const DEFAULT_REGION: &str = "us-east-1";

/// On-disk configuration, saved to `~/.pinpoint-runner/config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Values taken from flags/environment. Same shape as the file so the two
/// layers merge field by field.
pub type ConfigOverrides = FileConfig;

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_id: String,
    pub credentials: Credentials,
    pub region: String,
    pub endpoint: String,
}

impl Settings {
    /// Merge `overrides` over `file` and check that the required values exist.
    pub fn resolve(overrides: &ConfigOverrides, file: Option<&FileConfig>) -> Result<Settings> {
        let empty = FileConfig::default();
        let file = file.unwrap_or(&empty);
        let pick = |a: &Option<String>, b: &Option<String>| -> Option<String> {
            non_empty(a).or_else(|| non_empty(b))
        };

        let project_id = pick(&overrides.project_id, &file.project_id).ok_or_else(|| {
            anyhow::anyhow!(
                "Pinpoint project id is not set (use --project-id, PINPOINT_PROJECT_ID, or `pinpoint-runner configure`)"
            )
        })?;
        let access_key = pick(&overrides.access_key, &file.access_key).ok_or_else(|| {
            anyhow::anyhow!(
                "AWS access key is not set (use --access-key, AWS_ACCESS_KEY_ID, or `pinpoint-runner configure`)"
            )
        })?;
        let keys = if non_empty(&overrides.access_key).is_some() {
            overrides
        } else {
            file
        };
        let secret_key = non_empty(&keys.secret_key).ok_or_else(|| {
            anyhow::anyhow!(
                "AWS secret key is not set for access key {} (use --secret-key, AWS_SECRET_ACCESS_KEY, or `pinpoint-runner configure`)",
                access_key
            )
        })?;
        let session_token = non_empty(&keys.session_token);
        let region =
            pick(&overrides.region, &file.region).unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint = pick(&overrides.endpoint, &file.endpoint)
            .unwrap_or_else(|| default_endpoint(&region));

        Ok(Settings {
            project_id,
            credentials: Credentials {
                access_key,
                secret_key,
                session_token,
            },
            region,
            endpoint,
        })
    }
}

impl FileConfig {
    /// Apply explicitly given values over `existing`. A new access key
    /// replaces the whole stored credential set, so a token saved for the
    /// old key is dropped.
    pub fn merged_over(self, existing: FileConfig) -> Result<FileConfig> {
        let (access_key, secret_key, session_token) = if self.access_key.is_some() {
            (self.access_key, self.secret_key, self.session_token)
        } else if self.secret_key.is_some() || self.session_token.is_some() {
            anyhow::bail!("--secret-key and --session-token must be given with --access-key");
        } else {
            (existing.access_key, existing.secret_key, existing.session_token)
        };
        Ok(FileConfig {
            project_id: self.project_id.or(existing.project_id),
            access_key,
            secret_key,
            session_token,
            region: self.region.or(existing.region),
            endpoint: self.endpoint.or(existing.endpoint),
        })
    }
}

/// Regional REST endpoint of the service.
pub fn default_endpoint(region: &str) -> String {
    format!("https://pinpoint.{}.amazonaws.com", region)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Default config location, `~/.pinpoint-runner/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home)
        .join(".pinpoint-runner")
        .join("config.toml"))
}

/// Load the config file. A missing file is not an error.
pub fn load_file(path: &Path) -> Result<Option<FileConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    let config: FileConfig =
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(Some(config))
}

/// Write the config file, creating its directory if needed. Readable by the
/// owner only.
pub fn save_file(path: &Path, config: &FileConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_private_dir(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config)?;
    write_private_file(path, content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

fn write_private_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // The creation mode does not apply to a file that already existed.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    Ok(())
}
