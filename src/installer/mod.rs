//! Download and install release artifacts through the native package manager.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::github::{Asset, Release};
use crate::package::{self, PackageFormat};
use crate::system;
use crate::ui::prelude::*;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("no supported package manager found (dpkg, pacman, rpm)")]
    UnsupportedSystem,

    #[error("no release asset matches {format} on this architecture")]
    NoCompatibleAsset { format: PackageFormat },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("cannot install {0} packages")]
    UnsupportedInstallType(PackageFormat),

    #[error("failed to run installer: {0}")]
    Io(#[from] std::io::Error),

    #[error("installer exited with {0}")]
    InstallerFailed(std::process::ExitStatus),
}

/// A downloaded artifact. The backing temp directory is removed when this is
/// dropped, success or failure.
pub struct Download {
    _dir: tempfile::TempDir,
    pub path: PathBuf,
    pub format: PackageFormat,
}

/// Select the asset compatible with the preferred format and architecture.
///
/// Assets are scanned in published order. An asset whose name carries no
/// recognizable architecture token is never selected, even when its format
/// matches; installing a wrong-architecture package is worse than failing.
pub fn match_asset<'a>(
    assets: &'a [Asset],
    format: PackageFormat,
    arch_keywords: &[&str],
) -> Result<&'a Asset, InstallError> {
    for asset in assets {
        if package::classify(&asset.name) != format {
            continue;
        }
        let lower = asset.name.to_lowercase();
        if arch_keywords.iter().any(|keyword| lower.contains(keyword)) {
            return Ok(asset);
        }
    }
    Err(InstallError::NoCompatibleAsset { format })
}

/// Download the release artifact matching this host into a temp location.
pub async fn download_update(release: &Release) -> Result<Download, InstallError> {
    let format = system::preferred_format();
    if format == PackageFormat::Unknown {
        return Err(InstallError::UnsupportedSystem);
    }

    let keywords = system::arch_keywords();
    let asset = match_asset(&release.assets, format, &keywords)?;

    let dir = tempfile::tempdir().map_err(|e| InstallError::DownloadFailed(e.to_string()))?;
    let path = dir.path().join(&asset.name);

    emit(
        Level::Info,
        "install.download",
        &format!("Downloading {}...", asset.browser_download_url),
        None,
    );
    fetch_to_file(&asset.browser_download_url, &path).await?;

    Ok(Download {
        _dir: dir,
        path,
        format,
    })
}

async fn fetch_to_file(url: &str, dest: &Path) -> Result<(), InstallError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("apptrack/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| InstallError::DownloadFailed(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| InstallError::DownloadFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(InstallError::DownloadFailed(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| InstallError::DownloadFailed(e.to_string()))?;

    std::fs::write(dest, bytes).map_err(|e| InstallError::DownloadFailed(e.to_string()))
}

/// The privileged install invocation for a downloaded package.
pub fn install_command(
    format: PackageFormat,
    package: &Path,
) -> Result<(&'static str, Vec<String>), InstallError> {
    let path = package.to_string_lossy().into_owned();
    match format {
        PackageFormat::Debian => Ok((
            "sudo",
            vec![
                "apt-get".to_string(),
                "install".to_string(),
                "-y".to_string(),
                path,
            ],
        )),
        PackageFormat::Arch => Ok((
            "sudo",
            vec![
                "pacman".to_string(),
                "-U".to_string(),
                "--noconfirm".to_string(),
                path,
            ],
        )),
        PackageFormat::Rpm => Ok((
            "sudo",
            vec!["rpm".to_string(), "-Uvh".to_string(), path],
        )),
        other => Err(InstallError::UnsupportedInstallType(other)),
    }
}

/// Download the matching artifact and install it.
///
/// The subprocess inherits stdin/stdout/stderr so the sudo password prompt is
/// visible and answerable. The temp file is removed when this returns, whether
/// the install succeeded or not.
pub async fn install_update(release: &Release) -> Result<(), InstallError> {
    let download = download_update(release).await?;
    let (program, args) = install_command(download.format, &download.path)?;

    emit(
        Level::Info,
        "install.run",
        &format!("Installing {}...", download.path.display()),
        None,
    );

    let status = Command::new(program).args(&args).status()?;
    if !status.success() {
        return Err(InstallError::InstallerFailed(status));
    }
    Ok(())
}
