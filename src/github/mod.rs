//! GitHub release metadata client.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const API_ROOT: &str = "https://api.github.com/repos";
const USER_AGENT: &str = concat!("apptrack/", env!("CARGO_PKG_VERSION"));

/// Timeout for the metadata fetch. Asset downloads are not bounded by this.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("not a GitHub repository URL: {0}")]
    MalformedRepoUrl(String),

    #[error("GitHub API request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("GitHub API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Extract "owner/repo" from a repository URL.
///
/// Fails before any network call when the URL does not contain the
/// `github.com/` separator.
pub fn repo_path(repo_url: &str) -> Result<&str, ReleaseError> {
    let (_, path) = repo_url
        .split_once("github.com/")
        .ok_or_else(|| ReleaseError::MalformedRepoUrl(repo_url.to_string()))?;
    let path = path.trim_end_matches('/').trim_end_matches(".git");
    if path.is_empty() {
        return Err(ReleaseError::MalformedRepoUrl(repo_url.to_string()));
    }
    Ok(path)
}

/// Fetch the latest published release for a repository URL.
///
/// A single attempt with a short timeout; the caller decides whether to retry.
pub async fn latest_release(repo_url: &str) -> Result<Release, ReleaseError> {
    let path = repo_path(repo_url)?;
    let url = format!("{}/{}/releases/latest", API_ROOT, path);

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()?;

    let response = client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ReleaseError::Status(response.status()));
    }

    Ok(response.json::<Release>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_path_plain_url() {
        assert_eq!(
            repo_path("https://github.com/owner/repo").unwrap(),
            "owner/repo"
        );
    }

    #[test]
    fn test_repo_path_strips_trailing_slash_and_git_suffix() {
        assert_eq!(
            repo_path("https://github.com/owner/repo/").unwrap(),
            "owner/repo"
        );
        assert_eq!(
            repo_path("https://github.com/owner/repo.git").unwrap(),
            "owner/repo"
        );
    }

    #[test]
    fn test_repo_path_rejects_non_github_urls() {
        assert!(matches!(
            repo_path("https://example.com/owner/repo"),
            Err(ReleaseError::MalformedRepoUrl(_))
        ));
        assert!(matches!(
            repo_path("owner/repo"),
            Err(ReleaseError::MalformedRepoUrl(_))
        ));
        assert!(matches!(
            repo_path("https://github.com/"),
            Err(ReleaseError::MalformedRepoUrl(_))
        ));
    }

    #[test]
    fn test_release_parses_api_contract() {
        let payload = r#"{
            "tag_name": "v2.0.0",
            "name": "Big Release",
            "body": "notes",
            "html_url": "https://github.com/owner/repo/releases/tag/v2.0.0",
            "assets": [
                {
                    "name": "owner-repo_2.0.0_amd64.deb",
                    "browser_download_url": "https://example.com/owner-repo_2.0.0_amd64.deb",
                    "size": 12345
                }
            ]
        }"#;

        let release: Release = serde_json::from_str(payload).unwrap();
        assert_eq!(release.tag_name, "v2.0.0");
        assert_eq!(release.name.as_deref(), Some("Big Release"));
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "owner-repo_2.0.0_amd64.deb");
    }

    #[test]
    fn test_release_tolerates_missing_optional_fields() {
        let payload = r#"{
            "tag_name": "v1.0.0",
            "name": null,
            "html_url": "https://github.com/owner/repo/releases/tag/v1.0.0"
        }"#;

        let release: Release = serde_json::from_str(payload).unwrap();
        assert!(release.name.is_none());
        assert!(release.body.is_none());
        assert!(release.assets.is_empty());
    }
}
