//! Picking documentation editions out of a release's asset list.

mod selector;

pub use selector::{AssetNotFound, SelectedAssets, find_asset};

/// Which manual an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentClass {
    Unprivileged,
    Privileged,
}

impl ContentClass {
    pub const ALL: [ContentClass; 2] = [ContentClass::Unprivileged, ContentClass::Privileged];

    /// Word looked for in asset names.
    pub fn token(self) -> &'static str {
        match self {
            ContentClass::Unprivileged => "unprivileged",
            ContentClass::Privileged => "privileged",
        }
    }

    /// Output file the HTML edition is written to.
    pub fn html_file_name(self) -> &'static str {
        match self {
            ContentClass::Unprivileged => "unprivileged.html",
            ContentClass::Privileged => "privileged.html",
        }
    }
}

impl std::fmt::Display for ContentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// File format of an edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocFormat {
    Html,
    Pdf,
    Epub,
}

impl DocFormat {
    pub const ALL: [DocFormat; 3] = [DocFormat::Html, DocFormat::Pdf, DocFormat::Epub];

    pub fn token(self) -> &'static str {
        match self {
            DocFormat::Html => "html",
            DocFormat::Pdf => "pdf",
            DocFormat::Epub => "epub",
        }
    }
}

impl std::fmt::Display for DocFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
