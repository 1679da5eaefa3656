use anyhow::Result;
use clap::Parser;
use isa_site::config::{BuildOptions, Config, DEFAULT_TIMEOUT_SECS};
use isa_site::http::DEFAULT_ATTEMPTS;
use isa_site::runtime::RealRuntime;
use std::path::PathBuf;
use std::time::Duration;

/// isa-site - RISC-V ISA manual site builder
///
/// Fetches the latest riscv-isa-manual release, downloads the HTML manuals
/// into `_site/` and renders `index.html` with links to the PDF and EPUB
/// editions.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding API rate limits.
#[derive(Parser, Debug)]
#[command(author, version = env!("ISA_SITE_VERSION"), about)]
struct Cli {
    /// Site root containing the template (defaults to the current directory)
    #[arg(long = "root", short = 'r', env = "ISA_SITE_ROOT", value_name = "PATH")]
    root: Option<PathBuf>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Repository to take the release from (defaults to riscv/riscv-isa-manual)
    #[arg(long = "repo", value_name = "OWNER/REPO")]
    repo: Option<String>,

    /// Template file, relative to the root (defaults to index.html)
    #[arg(long = "template", value_name = "PATH")]
    template: Option<PathBuf>,

    /// Output directory, relative to the root (defaults to _site)
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Total attempts per request, including the first (1 disables retries)
    #[arg(long = "attempts", value_name = "N", default_value_t = DEFAULT_ATTEMPTS)]
    attempts: usize,
}

impl From<Cli> for BuildOptions {
    fn from(cli: Cli) -> Self {
        BuildOptions {
            root: cli.root,
            api_url: cli.api_url,
            repo: cli.repo,
            template: cli.template,
            output: cli.output,
            timeout: Duration::from_secs(cli.timeout),
            attempts: cli.attempts,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let config = Config::new(&runtime, cli.into())?;
    isa_site::site::build(&runtime, &config).await?;

    println!("ok.");
    Ok(())
}
