//! TLE catalog fetching functionality

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Celestrak supplemental GP data for the Starlink constellation, TLE format
pub const STARLINK_TLE_URL: &str =
    "https://celestrak.org/NORAD/elements/supplemental/sup-gp.php?FILE=starlink&FORMAT=tle";

/// Where a catalog comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Remote(String),
    Local(PathBuf),
}

impl CatalogSource {
    /// Resolve a URL-like source string; anything that is not http(s) is a local path
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            CatalogSource::Remote(source.to_string())
        } else if let Some(path) = source.strip_prefix("file://") {
            CatalogSource::Local(PathBuf::from(path))
        } else {
            CatalogSource::Local(PathBuf::from(source))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Remote(url) => url.clone(),
            CatalogSource::Local(path) => path.display().to_string(),
        }
    }
}

/// Read the raw TLE text from a source, blocking until done
pub fn fetch_catalog_text(source: &CatalogSource, timeout: Duration) -> anyhow::Result<String> {
    match source {
        CatalogSource::Remote(url) => fetch_remote(url, timeout),
        CatalogSource::Local(path) => read_local(path),
    }
}

fn read_local(path: &Path) -> anyhow::Result<String> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading TLE file {}", path.display()))?;
    tracing::info!("[TLE FILE] path={} bytes={}", path.display(), body.len());
    Ok(body)
}

fn fetch_remote(url: &str, timeout: Duration) -> anyhow::Result<String> {
    let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    rt.block_on(async {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let resp = client
            .get(url)
            .header("accept", "text/plain")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        tracing::info!(
            "[TLE FETCH] status={} url={} bytes={}",
            status,
            url,
            body.len()
        );
        if !status.is_success() {
            let sample: String = body.lines().take(3).collect::<Vec<_>>().join("\\n");
            anyhow::bail!("HTTP {} from {}. Sample: {}", status, url, sample);
        }
        Ok::<_, anyhow::Error>(body)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            CatalogSource::parse(STARLINK_TLE_URL),
            CatalogSource::Remote(STARLINK_TLE_URL.to_string())
        );
        assert_eq!(
            CatalogSource::parse("http://localhost:8080/tle.txt"),
            CatalogSource::Remote("http://localhost:8080/tle.txt".to_string())
        );
        assert_eq!(
            CatalogSource::parse("file:///tmp/starlink.tle"),
            CatalogSource::Local(PathBuf::from("/tmp/starlink.tle"))
        );
        assert_eq!(
            CatalogSource::parse(" data/starlink.tle "),
            CatalogSource::Local(PathBuf::from("data/starlink.tle"))
        );
    }

    #[test]
    fn test_missing_local_file_is_an_error() {
        let source = CatalogSource::Local(PathBuf::from("/definitely/not/here.tle"));
        let err = fetch_catalog_text(&source, Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.tle"));
    }
}
