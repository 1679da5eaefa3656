use anyhow::{Result, anyhow};
use serde::Deserialize;

/// Represents a GitHub release asset
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// The subset of a GitHub release the site build needs.
#[derive(Deserialize, Debug, PartialEq, Clone, Default)]
pub struct LatestRelease {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl LatestRelease {
    /// Version shown on the site: the date part of `published_at`.
    pub fn version(&self) -> Result<&str> {
        let published_at = self
            .published_at
            .as_deref()
            .ok_or_else(|| anyhow!("Release {:?} has no publish date", self.tag_name))?;
        Ok(release_version(published_at))
    }

    /// Asset names joined for display.
    pub fn asset_names(&self) -> String {
        self.assets
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Everything before the first `T` of an ISO-8601 timestamp, or the whole
/// string if it has no time part.
pub fn release_version(published_at: &str) -> &str {
    published_at
        .split_once('T')
        .map_or(published_at, |(date, _)| date)
}
