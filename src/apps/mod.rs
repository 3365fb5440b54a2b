//! Tracked application storage.
//!
//! The pipeline never holds on to this state; each command loads the list,
//! runs, and saves the updated copy.

pub mod cli;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::github::Release;

/// One application the user asked us to keep an eye on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedApp {
    pub name: String,
    pub repo_url: String,
    /// Installed version, empty until a probe finds one. Only ever
    /// overwritten by a fresh probe result.
    #[serde(default)]
    pub version: String,
    /// Latest upstream version, empty until a release check succeeds.
    #[serde(default)]
    pub latest: String,
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}

impl TrackedApp {
    pub fn has_update(&self) -> bool {
        !self.version.is_empty() && !self.latest.is_empty() && self.version != self.latest
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppList {
    #[serde(default)]
    pub apps: Vec<TrackedApp>,
}

/// Path of the tracked-application store, creating the config directory on
/// demand.
pub fn store_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("unable to determine user config directory")?
        .join("apptrack");

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating config directory at {}", dir.display()))?;

    Ok(dir.join("apps.toml"))
}

impl AppList {
    pub fn load() -> Result<Self> {
        Self::load_from(&store_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&store_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("serializing tracked applications")?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.apps
            .iter()
            .position(|app| app.name.eq_ignore_ascii_case(name))
    }
}

/// Pick a display name for a newly tracked repository.
///
/// Release titles are often just the version tag ("v1.2.0") or boilerplate
/// ("Release 1.2.0"); in those cases the repository's trailing path segment is
/// the better name.
pub fn display_name(release: &Release, repo_url: &str) -> String {
    if let Some(name) = release.name.as_deref() {
        let trimmed = name.trim();
        if !trimmed.is_empty()
            && !looks_like_version(trimmed)
            && !trimmed.to_lowercase().contains("release")
        {
            return trimmed.to_string();
        }
    }
    repo_trailing_segment(repo_url)
}

fn looks_like_version(s: &str) -> bool {
    let rest = s.strip_prefix(['v', 'V']).unwrap_or(s);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn repo_trailing_segment(url: &str) -> String {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string()
}
