use crate::domain::model::ZipLookupTable;
use crate::domain::ports::ZipSource;
use crate::utils::error::{Result, SurveyError};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// 透過 HTTP 取得 zipcodes.json，不使用快取
#[derive(Debug, Clone)]
pub struct HttpZipSource {
    client: Client,
    url: Url,
}

impl HttpZipSource {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ZipSource for HttpZipSource {
    async fn fetch_table(&self) -> Result<ZipLookupTable> {
        tracing::debug!("Fetching ZIP lookup table from: {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        tracing::debug!("Lookup response status: {}", response.status());

        if !response.status().is_success() {
            return Err(SurveyError::HttpStatusError {
                status: response.status().as_u16(),
                url: self.url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let table: ZipLookupTable = serde_json::from_slice(&bytes)?;
        tracing::debug!("Loaded {} ZIP records", table.zipcodes.len());
        Ok(table)
    }
}

/// 從本機檔案讀取查詢表，每次都重新讀取
#[derive(Debug, Clone)]
pub struct FileZipSource {
    path: PathBuf,
}

impl FileZipSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ZipSource for FileZipSource {
    async fn fetch_table(&self) -> Result<ZipLookupTable> {
        tracing::debug!("Reading ZIP lookup table from: {}", self.path.display());
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// 依網址的 scheme 選擇查詢來源
#[derive(Debug, Clone)]
pub enum LookupSource {
    Http(HttpZipSource),
    File(FileZipSource),
}

impl LookupSource {
    /// 以頁面網址為基準解析相對的資源路徑，例如 `zipcodes.json`
    pub fn resolve(base_url: &str, resource: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| SurveyError::InvalidConfigValueError {
            field: "site.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        let url = base
            .join(resource)
            .map_err(|e| SurveyError::InvalidConfigValueError {
                field: "lookup.resource".to_string(),
                value: resource.to_string(),
                reason: format!("Cannot resolve against {}: {}", base, e),
            })?;

        match url.scheme() {
            "http" | "https" => Ok(LookupSource::Http(HttpZipSource::new(url))),
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| SurveyError::InvalidConfigValueError {
                        field: "lookup.resource".to_string(),
                        value: url.to_string(),
                        reason: "Not a local file path".to_string(),
                    })?;
                Ok(LookupSource::File(FileZipSource::new(path)))
            }
            scheme => Err(SurveyError::InvalidConfigValueError {
                field: "lookup.resource".to_string(),
                value: url.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        }
    }
}

#[async_trait]
impl ZipSource for LookupSource {
    async fn fetch_table(&self) -> Result<ZipLookupTable> {
        match self {
            LookupSource::Http(source) => source.fetch_table().await,
            LookupSource::File(source) => source.fetch_table().await,
        }
    }
}
