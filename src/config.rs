use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::github::{GitHub, RepoId};
use crate::http::{DEFAULT_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, HttpClient, RetryPolicy};
use crate::runtime::Runtime;

/// Repository whose releases carry the manuals.
pub const DEFAULT_REPO: &str = "riscv/riscv-isa-manual";
pub const TEMPLATE_FILE: &str = "index.html";
pub const OUTPUT_DIR: &str = "_site";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = "isa-site";

/// Overrides collected from the command line. `None` means "use the default".
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub root: Option<PathBuf>,
    pub api_url: Option<String>,
    pub repo: Option<String>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout: Duration,
    pub attempts: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            root: None,
            api_url: None,
            repo: None,
            template: None,
            output: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            attempts: DEFAULT_ATTEMPTS,
        }
    }
}

/// Resolved settings for one build.
pub struct Config {
    pub root: PathBuf,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub repo: RepoId,
    pub github: GitHub,
    pub http: HttpClient,
}

impl Config {
    pub fn new<R: Runtime>(runtime: &R, options: BuildOptions) -> Result<Self> {
        let root = match options.root {
            Some(root) => root,
            None => runtime.current_dir()?,
        };
        if !runtime.is_dir(&root) {
            bail!("Root directory {:?} does not exist", root);
        }
        debug!("Root directory: {:?}", root);

        let template_path = resolve(&root, options.template, TEMPLATE_FILE);
        let output_dir = resolve(&root, options.output, OUTPUT_DIR);

        let repo: RepoId = options
            .repo
            .as_deref()
            .unwrap_or(DEFAULT_REPO)
            .parse()?;

        let client = build_client(runtime, options.timeout)?;
        let policy = RetryPolicy::new(
            options.attempts,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        );
        let http = HttpClient::with_policy(client, policy);
        let github = GitHub::new(http.clone(), options.api_url);

        Ok(Self {
            root,
            template_path,
            output_dir,
            repo,
            github,
            http,
        })
    }
}

fn resolve(root: &Path, path: Option<PathBuf>, default: &str) -> PathBuf {
    // Absolute paths replace the root on join.
    root.join(path.unwrap_or_else(|| PathBuf::from(default)))
}

fn build_client<R: Runtime>(runtime: &R, timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );

    let token = runtime
        .env_var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    if let Some(token) = token {
        let token = token.trim();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("GITHUB_TOKEN contains characters not allowed in a header")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using GITHUB_TOKEN for authentication: {}", mask_token(token));
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

fn mask_token(token: &str) -> String {
    match (token.get(..4), token.get(token.len().saturating_sub(4)..)) {
        (Some(head), Some(tail)) if token.len() > 12 => format!("{}*********{}", head, tail),
        _ => "*********".to_string(),
    }
}
