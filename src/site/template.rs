//! Placeholder substitution for the landing page.

use regex::Regex;
use std::sync::LazyLock;

use crate::asset::{ContentClass, DocFormat, SelectedAssets};

pub const VERSION: &str = "{VERSION}";
pub const UNPRIVILEGED_PDF: &str = "{UNPRIVILEGED_PDF}";
pub const UNPRIVILEGED_EPUB: &str = "{UNPRIVILEGED_EPUB}";
pub const PRIVILEGED_PDF: &str = "{PRIVILEGED_PDF}";
pub const PRIVILEGED_EPUB: &str = "{PRIVILEGED_EPUB}";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[A-Z][A-Z0-9_]*\}").expect("valid placeholder pattern"));

/// Values substituted into the template, keyed by placeholder token.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateValues {
    pairs: Vec<(&'static str, String)>,
}

impl TemplateValues {
    pub fn new(version: &str, assets: &SelectedAssets) -> Self {
        let url = |class, format| assets.url(class, format).to_string();
        Self {
            pairs: vec![
                (VERSION, version.to_string()),
                (
                    UNPRIVILEGED_PDF,
                    url(ContentClass::Unprivileged, DocFormat::Pdf),
                ),
                (
                    UNPRIVILEGED_EPUB,
                    url(ContentClass::Unprivileged, DocFormat::Epub),
                ),
                (PRIVILEGED_PDF, url(ContentClass::Privileged, DocFormat::Pdf)),
                (
                    PRIVILEGED_EPUB,
                    url(ContentClass::Privileged, DocFormat::Epub),
                ),
            ],
        }
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: Vec<(&'static str, String)>) -> Self {
        Self { pairs }
    }

    #[cfg(test)]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }
}

/// Replaces every occurrence of every placeholder in a single left-to-right
/// pass. Substituted values are copied verbatim and never rescanned.
pub fn render(template: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.pairs.iter().find(|(token, _)| tail.starts_with(token)) {
            Some((token, value)) => {
                out.push_str(value);
                rest = &tail[token.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder-shaped tokens (`{UPPER_SNAKE}`) left in rendered text.
pub fn unresolved_placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER.find_iter(text).map(|m| m.as_str()).collect()
}
