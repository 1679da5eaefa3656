//! The site build: fetch release metadata, pick the editions, download the
//! HTML manuals and render the landing page.
//!
//! Every lookup and the template read happen before the output directory is
//! touched, so a missing asset or template leaves no output behind. A failure
//! while downloading leaves whatever was already written in place.

pub mod template;

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use crate::asset::{ContentClass, DocFormat, SelectedAssets};
use crate::config::Config;
use crate::runtime::Runtime;

pub use template::{TemplateValues, render, unresolved_placeholders};

/// Name of the rendered landing page inside the output directory.
pub const INDEX_FILE: &str = "index.html";

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub version: String,
    pub files: Vec<PathBuf>,
}

#[tracing::instrument(skip(runtime, config))]
pub async fn build<R: Runtime>(runtime: &R, config: &Config) -> Result<BuildReport> {
    println!("        root {}", config.root.display());
    println!("      output {}", config.output_dir.display());

    let release = config.github.latest_release(&config.repo).await?;
    let version = release.version()?.to_string();
    println!("     version {}", version);
    println!("      assets {}", release.asset_names());

    let selected = SelectedAssets::select(&release.assets)
        .with_context(|| format!("Release {} is missing a documentation asset", version))?;

    let template = runtime
        .read_to_string(&config.template_path)
        .with_context(|| format!("Failed to read template {:?}", config.template_path))?;

    runtime
        .create_dir_all(&config.output_dir)
        .context("Failed to create output directory")?;

    let mut files = Vec::new();
    for class in ContentClass::ALL {
        let asset = selected.get(class, DocFormat::Html);
        let path = config.output_dir.join(class.html_file_name());

        let bytes = config
            .http
            .download_file(&asset.browser_download_url, || runtime.create_file(&path))
            .await?;
        info!("Wrote {} ({} bytes) to {:?}", asset.name, bytes, path);
        println!("     writing {}", path.display());
        files.push(path);
    }

    let values = TemplateValues::new(&version, &selected);
    let rendered = render(&template, &values);
    for token in unresolved_placeholders(&rendered) {
        warn!("Unresolved placeholder {} in {:?}", token, config.template_path);
    }

    let index_path = config.output_dir.join(INDEX_FILE);
    runtime.write(&index_path, rendered.as_bytes())?;
    println!("     writing {}", index_path.display());
    files.push(index_path);

    Ok(BuildReport { version, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetNotFound;
    use crate::config::BuildOptions;
    use crate::http::FetchError;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::test_utils::{configure_mock_runtime_basics, test_root};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    const TEMPLATE: &str = "<h1>RISC-V {VERSION}</h1>\n\
        <a href=\"{UNPRIVILEGED_PDF}\">pdf</a> <a href=\"{UNPRIVILEGED_EPUB}\">epub</a>\n\
        <a href=\"{PRIVILEGED_PDF}\">pdf</a> <a href=\"{PRIVILEGED_EPUB}\">epub</a>\n";

    fn release_json(base: &str, names: &[&str]) -> String {
        let assets: Vec<String> = names
            .iter()
            .map(|name| {
                format!(
                    r#"{{"name": "{name}", "browser_download_url": "{base}/download/{name}", "size": 100}}"#
                )
            })
            .collect();
        format!(
            r#"{{"tag_name": "riscv-isa-release", "published_at": "2024-03-01T12:00:00Z", "assets": [{}]}}"#,
            assets.join(",")
        )
    }

    const ALL_ASSETS: [&str; 6] = [
        "riscv-unprivileged.html",
        "riscv-unprivileged.pdf",
        "riscv-unprivileged.epub",
        "riscv-privileged.html",
        "riscv-privileged.pdf",
        "riscv-privileged.epub",
    ];

    async fn mock_release(server: &mut mockito::Server, names: &[&str]) -> mockito::Mock {
        let body = release_json(&server.url(), names);
        server
            .mock("GET", "/repos/riscv/riscv-isa-manual/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    fn options(server: &mockito::Server, root: Option<PathBuf>) -> BuildOptions {
        BuildOptions {
            root,
            api_url: Some(server.url()),
            attempts: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_build_writes_three_files() {
        let mut server = mockito::Server::new_async().await;
        let release = mock_release(&mut server, &ALL_ASSETS).await;
        let unpriv = server
            .mock("GET", "/download/riscv-unprivileged.html")
            .with_status(200)
            .with_body("<html>unprivileged body</html>")
            .create_async()
            .await;
        let priv_ = server
            .mock("GET", "/download/riscv-privileged.html")
            .with_status(200)
            .with_body("<html>privileged body</html>")
            .create_async()
            .await;

        let root = tempdir().unwrap();
        std::fs::write(root.path().join("index.html"), TEMPLATE).unwrap();

        let runtime = RealRuntime;
        let config = Config::new(
            &runtime,
            options(&server, Some(root.path().to_path_buf())),
        )
        .unwrap();
        let report = build(&runtime, &config).await.unwrap();

        release.assert_async().await;
        unpriv.assert_async().await;
        priv_.assert_async().await;

        let site = root.path().join("_site");
        assert_eq!(report.version, "2024-03-01");
        assert_eq!(
            report.files,
            vec![
                site.join("unprivileged.html"),
                site.join("privileged.html"),
                site.join("index.html"),
            ]
        );

        assert_eq!(
            std::fs::read_to_string(site.join("unprivileged.html")).unwrap(),
            "<html>unprivileged body</html>"
        );
        assert_eq!(
            std::fs::read_to_string(site.join("privileged.html")).unwrap(),
            "<html>privileged body</html>"
        );

        let index = std::fs::read_to_string(site.join("index.html")).unwrap();
        let base = server.url();
        assert!(index.contains("<h1>RISC-V 2024-03-01</h1>"));
        assert!(index.contains(&format!("{}/download/riscv-unprivileged.pdf", base)));
        assert!(index.contains(&format!("{}/download/riscv-unprivileged.epub", base)));
        assert!(index.contains(&format!("{}/download/riscv-privileged.pdf", base)));
        assert!(index.contains(&format!("{}/download/riscv-privileged.epub", base)));
        assert!(unresolved_placeholders(&index).is_empty());
    }

    #[tokio::test]
    async fn test_build_missing_asset_writes_nothing() {
        let mut server = mockito::Server::new_async().await;
        let names: Vec<&str> = ALL_ASSETS
            .iter()
            .copied()
            .filter(|n| *n != "riscv-privileged.pdf")
            .collect();
        let release = mock_release(&mut server, &names).await;

        // Strict mock: any filesystem call beyond configuration panics.
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);

        let config = Config::new(&runtime, options(&server, None)).unwrap();
        let err = build(&runtime, &config).await.unwrap_err();

        release.assert_async().await;
        assert_eq!(
            err.downcast_ref::<AssetNotFound>(),
            Some(&AssetNotFound {
                class: "privileged".to_string(),
                format: "pdf".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_build_missing_template_writes_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _release = mock_release(&mut server, &ALL_ASSETS).await;

        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);
        runtime
            .expect_read_to_string()
            .with(eq(test_root().join("index.html")))
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("No such file or directory")));

        let config = Config::new(&runtime, options(&server, None)).unwrap();
        let err = build(&runtime, &config).await.unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to read template"));
    }

    #[tokio::test]
    async fn test_build_metadata_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let release = server
            .mock("GET", "/repos/riscv/riscv-isa-manual/releases/latest")
            .with_status(500)
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);

        let config = Config::new(&runtime, options(&server, None)).unwrap();
        let err = build(&runtime, &config).await.unwrap_err();

        release.assert_async().await;
        assert_eq!(
            err.downcast_ref::<FetchError>(),
            Some(&FetchError::ServerError(500))
        );
    }

    #[tokio::test]
    async fn test_build_unwritable_target_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let _release = mock_release(&mut server, &ALL_ASSETS).await;
        let unpriv = server
            .mock("GET", "/download/riscv-unprivileged.html")
            .with_status(200)
            .with_body("unprivileged")
            .expect(1)
            .create_async()
            .await;

        let root = tempdir().unwrap();
        std::fs::write(root.path().join("index.html"), TEMPLATE).unwrap();
        let site = root.path().join("_site");
        std::fs::create_dir_all(site.join("unprivileged.html")).unwrap();

        let runtime = RealRuntime;
        let options = BuildOptions {
            attempts: 3,
            ..options(&server, Some(root.path().to_path_buf()))
        };
        let config = Config::new(&runtime, options).unwrap();

        let started = std::time::Instant::now();
        let err = build(&runtime, &config).await.unwrap_err();

        unpriv.assert_async().await;
        assert!(started.elapsed() < std::time::Duration::from_millis(900));
        assert!(format!("{:#}", err).contains("unprivileged.html"));
        assert!(!site.join("index.html").exists());
    }

    #[tokio::test]
    async fn test_build_download_failure_keeps_earlier_output() {
        let mut server = mockito::Server::new_async().await;
        let _release = mock_release(&mut server, &ALL_ASSETS).await;
        let _unpriv = server
            .mock("GET", "/download/riscv-unprivileged.html")
            .with_status(200)
            .with_body("unprivileged")
            .create_async()
            .await;
        let _priv = server
            .mock("GET", "/download/riscv-privileged.html")
            .with_status(404)
            .create_async()
            .await;

        let root = tempdir().unwrap();
        std::fs::write(root.path().join("index.html"), TEMPLATE).unwrap();

        let runtime = RealRuntime;
        let config = Config::new(
            &runtime,
            options(&server, Some(root.path().to_path_buf())),
        )
        .unwrap();
        let err = build(&runtime, &config).await.unwrap_err();

        let site = root.path().join("_site");
        assert!(err.downcast_ref::<FetchError>().is_some());
        assert!(site.join("unprivileged.html").exists());
        assert!(!site.join("privileged.html").exists());
        assert!(!site.join("index.html").exists());
    }
}
