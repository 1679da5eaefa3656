use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

use super::{ContentClass, DocFormat};
use crate::github::ReleaseAsset;

/// No asset name contains both tokens as whole words.
#[derive(Debug, PartialEq, Eq)]
pub struct AssetNotFound {
    pub class: String,
    pub format: String,
}

impl std::fmt::Display for AssetNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Asset not found: no release asset name contains both {:?} and {:?}",
            self.class, self.format
        )
    }
}

impl std::error::Error for AssetNotFound {}

fn whole_word(token: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(token)))
        .with_context(|| format!("Invalid asset token {:?}", token))
}

/// Returns the first asset whose name contains `class` and `format` as
/// whole, case-sensitive words.
pub fn find_asset<'a>(
    assets: &'a [ReleaseAsset],
    class: &str,
    format: &str,
) -> Result<&'a ReleaseAsset> {
    let class_re = whole_word(class)?;
    let format_re = whole_word(format)?;

    let found = assets
        .iter()
        .find(|a| class_re.is_match(&a.name) && format_re.is_match(&a.name));

    match found {
        Some(asset) => {
            debug!("{} {} -> {}", class, format, asset.name);
            Ok(asset)
        }
        None => Err(AssetNotFound {
            class: class.to_string(),
            format: format.to_string(),
        }
        .into()),
    }
}

/// One asset per (content class, format) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedAssets {
    // Row-major by ContentClass::ALL, then DocFormat::ALL.
    entries: Vec<ReleaseAsset>,
}

impl SelectedAssets {
    /// Looks up every edition, failing on the first one that is missing.
    pub fn select(assets: &[ReleaseAsset]) -> Result<Self> {
        let mut entries = Vec::with_capacity(ContentClass::ALL.len() * DocFormat::ALL.len());
        for class in ContentClass::ALL {
            for format in DocFormat::ALL {
                entries.push(find_asset(assets, class.token(), format.token())?.clone());
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, class: ContentClass, format: DocFormat) -> &ReleaseAsset {
        &self.entries[class as usize * DocFormat::ALL.len() + format as usize]
    }

    pub fn url(&self, class: ContentClass, format: DocFormat) -> &str {
        &self.get(class, format).browser_download_url
    }
}
