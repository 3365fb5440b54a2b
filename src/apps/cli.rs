//! Command handlers for the tracked-application list.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use colored::Colorize;

use super::{AppList, TrackedApp, display_name};
use crate::github;
use crate::installer;
use crate::package::probe;
use crate::ui::prelude::*;

pub async fn handle_add(url: &str) -> Result<()> {
    let mut list = AppList::load()?;

    if let Some(existing) = list.apps.iter().find(|app| app.repo_url == url) {
        emit(
            Level::Info,
            "apps.add.exists",
            &format!("{} is already tracked", existing.name),
            None,
        );
        return Ok(());
    }

    let release = github::latest_release(url)
        .await
        .with_context(|| format!("resolving latest release for {}", url))?;

    let name = display_name(&release, url);
    let mut app = TrackedApp {
        name: name.clone(),
        repo_url: url.to_string(),
        version: String::new(),
        latest: release.tag_name.clone(),
        last_checked: Some(Utc::now()),
    };

    if let Some(installed) = probe::probe(&name) {
        emit(
            Level::Debug,
            "apps.add.probed",
            &format!(
                "{} found as {} ({})",
                name, installed.version, installed.format
            ),
            None,
        );
        app.version = installed.version;
    }

    list.apps.push(app);
    list.save()?;

    emit(
        Level::Success,
        "apps.add.done",
        &format!("Tracking {} (latest {})", name, release.tag_name),
        None,
    );
    Ok(())
}

pub fn handle_list() -> Result<()> {
    let list = AppList::load()?;

    if list.apps.is_empty() {
        emit(
            Level::Info,
            "apps.list.empty",
            "No applications tracked yet. Add one with `apptrack add <url>`.",
            None,
        );
        return Ok(());
    }

    for app in &list.apps {
        let status = if app.version.is_empty() {
            "Not installed".dimmed().to_string()
        } else if app.has_update() {
            format!("Update available: {} -> {}", app.version, app.latest)
                .yellow()
                .to_string()
        } else {
            format!("Installed: {}", app.version).green().to_string()
        };

        emit(
            Level::Info,
            "apps.list.item",
            &format!("{}  {} ({})", app.name.bold(), app.repo_url, status),
            Some(serde_json::json!({
                "name": app.name,
                "repo_url": app.repo_url,
                "version": app.version,
                "latest": app.latest,
                "last_checked": app.last_checked,
            })),
        );
    }
    Ok(())
}

pub async fn handle_check(name: Option<&str>) -> Result<()> {
    let mut list = AppList::load()?;

    if name.is_none() && list.apps.is_empty() {
        emit(
            Level::Info,
            "apps.check.empty",
            "No applications tracked yet.",
            None,
        );
        return Ok(());
    }

    let mut matched = 0;
    for app in list.apps.iter_mut() {
        if name.is_some_and(|filter| !app.name.eq_ignore_ascii_case(filter)) {
            continue;
        }
        matched += 1;

        match github::latest_release(&app.repo_url).await {
            Ok(release) => {
                // Stale latest/last_checked stay untouched on failure, so only
                // update them here
                app.latest = release.tag_name;
                app.last_checked = Some(Utc::now());

                if app.has_update() {
                    emit(
                        Level::Warn,
                        "apps.check.update",
                        &format!(
                            "{}: update available ({} -> {})",
                            app.name, app.version, app.latest
                        ),
                        None,
                    );
                } else {
                    emit(
                        Level::Info,
                        "apps.check.current",
                        &format!("{}: latest is {}", app.name, app.latest),
                        None,
                    );
                }
            }
            Err(err) => {
                emit(
                    Level::Warn,
                    "apps.check.failed",
                    &format!("{}: check failed: {}", app.name, err),
                    None,
                );
            }
        }
    }

    if matched == 0 {
        bail!("no tracked application named '{}'", name.unwrap_or_default());
    }

    list.save()
}

pub async fn handle_install(name: &str) -> Result<()> {
    let mut list = AppList::load()?;
    let Some(index) = list.find(name) else {
        bail!("no tracked application named '{}'", name);
    };

    let repo_url = list.apps[index].repo_url.clone();
    let release = github::latest_release(&repo_url)
        .await
        .with_context(|| format!("resolving latest release for {}", repo_url))?;

    installer::install_update(&release)
        .await
        .with_context(|| format!("installing {}", list.apps[index].name))?;

    let app = &mut list.apps[index];
    app.latest = release.tag_name.clone();
    app.last_checked = Some(Utc::now());
    // Re-probe instead of trusting the release tag; package versions do not
    // always match tag names
    if let Some(installed) = probe::probe(&app.name) {
        app.version = installed.version;
    }
    let app_name = app.name.clone();
    list.save()?;

    emit(
        Level::Success,
        "apps.install.done",
        &format!("{} updated to {}", app_name, release.tag_name),
        None,
    );
    Ok(())
}

pub fn handle_remove(name: &str) -> Result<()> {
    let mut list = AppList::load()?;
    let Some(index) = list.find(name) else {
        bail!("no tracked application named '{}'", name);
    };

    let removed = list.apps.remove(index);
    list.save()?;

    emit(
        Level::Success,
        "apps.remove.done",
        &format!("Stopped tracking {}", removed.name),
        None,
    );
    Ok(())
}
