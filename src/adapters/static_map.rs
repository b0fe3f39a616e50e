use crate::config::MapsConfig;
use crate::domain::ports::MapFetcher;
use crate::utils::error::{MapError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use url::Url;

pub const ZOOM: u8 = 3;
pub const SIZE: &str = "300x300";
pub const MAP_TYPE: &str = "roadmap";
pub const MARKER_STYLE: &str = "color:red|size:small";

/// Client for a Google-style static map image service.
pub struct StaticMapClient {
    config: MapsConfig,
    client: Client,
}

impl StaticMapClient {
    pub fn new(config: MapsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MapError::HttpError(e.without_url()))?;
        Ok(Self { config, client })
    }

    /// Full request URL for `center`, API key included.
    pub fn request_url(&self, center: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint).map_err(|e| {
            MapError::InvalidConfigValueError {
                field: "maps.endpoint".to_string(),
                value: self.config.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;

        url.query_pairs_mut()
            .append_pair("center", center)
            .append_pair("zoom", &ZOOM.to_string())
            .append_pair("size", SIZE)
            .append_pair("maptype", MAP_TYPE)
            .append_pair("markers", &format!("{}|{}", MARKER_STYLE, center))
            .append_pair("key", self.config.api_key.expose());

        Ok(url)
    }

    /// Downloads the image bytes for `center`.
    pub async fn fetch_image(&self, center: &str) -> Result<Vec<u8>> {
        let url = self.request_url(center)?;
        tracing::debug!(center, "Requesting static map");

        // reqwest errors carry the URL, which carries the key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MapError::HttpError(e.without_url()))?;

        let status = response.status();
        tracing::debug!("Map service response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapError::MapServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MapError::HttpError(e.without_url()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl MapFetcher for StaticMapClient {
    async fn fetch(&self, center: &str, destination: &Path) -> Result<()> {
        if center.trim().is_empty() {
            return Err(MapError::UnresolvableLocation {
                slug: destination
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            });
        }

        let bytes = self.fetch_image(center).await?;
        write_complete(destination, &bytes).await?;

        tracing::debug!(
            "Wrote {} bytes to {}",
            bytes.len(),
            destination.display()
        );
        Ok(())
    }
}

/// Writes to a sibling `.part` file and renames it into place, so
/// `destination` only ever exists with its full contents.
async fn write_complete(destination: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let partial = partial_path(destination);
    tokio::fs::write(&partial, bytes).await?;

    if let Err(e) = tokio::fs::rename(&partial, destination).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }
    Ok(())
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
