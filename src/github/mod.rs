use anyhow::{Context, Result, anyhow};
use log::debug;
use std::str::FromStr;

use crate::http::HttpClient;

mod types;

pub use types::{LatestRelease, ReleaseAsset, release_version};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Client for the GitHub releases API.
#[derive(Clone)]
pub struct GitHub {
    http: HttpClient,
    api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(http))]
    pub fn new(http: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self { http, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn latest_release_url(&self, repo: &RepoId) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        )
    }

    /// Fetches the latest published release of `repo`.
    #[tracing::instrument(skip(self))]
    pub async fn latest_release(&self, repo: &RepoId) -> Result<LatestRelease> {
        let url = self.latest_release_url(repo);
        debug!("Fetching latest release of {} from {}...", repo, url);

        self.http
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch the latest release of {}", repo))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!(
                "Invalid repository format {:?}. Expected 'owner/repo'.",
                s
            ))
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}
