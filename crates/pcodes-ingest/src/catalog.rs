//! Read access to the open-data catalog that hosts the per-country datasets.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use pcodes_config::CatalogSettings;

use crate::error::{IngestError, Result};

/// A downloadable file attached to a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub format: String,
}

impl Resource {
    /// Lower-case file type, taken from the declared format or the URL extension.
    pub fn file_type(&self) -> String {
        let format = self.format.trim().to_lowercase();
        if !format.is_empty() {
            return format.trim_start_matches('.').to_string();
        }
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/')
            .next()
            .and_then(|file| file.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }
}

/// Catalog metadata for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            name: name.into(),
            resources,
            extras: Map::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extras.insert(key.to_string(), value.into());
        self
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.extras.get(attribute)
    }

    /// True when the dataset carries a non-empty `cod_level` classification.
    pub fn has_cod_level(&self) -> bool {
        self.get("cod_level").is_some_and(is_truthy)
    }

    /// Start of the dataset reference period as `YYYY-MM-DD`.
    pub fn reference_start(&self) -> Option<String> {
        let raw = self.get("dataset_date")?.as_str()?;
        parse_period_start(raw).map(|date| date.format("%Y-%m-%d").to_string())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Parse the start of a period such as `[2014-10-01T00:00:00 TO *]`.
pub fn parse_period_start(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim().trim_start_matches('[');
    let start = trimmed.split(" TO ").next()?.trim();
    let date_part = start.split('T').next()?.trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%m/%d/%Y"))
        .ok()
}

/// Source of dataset metadata.
pub trait Catalog {
    /// `Ok(None)` when the catalog has no dataset with this id.
    fn read_dataset(&self, id: &str) -> Result<Option<Dataset>>;
}

#[derive(Debug, Deserialize)]
struct PackageShow {
    success: bool,
    #[serde(default)]
    result: Option<Dataset>,
}

/// Client for a CKAN-style catalog API.
pub struct HdxCatalog {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl HdxCatalog {
    pub fn new(settings: &CatalogSettings, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    fn package_url(&self, id: &str) -> String {
        format!("{}/api/3/action/package_show?id={id}", self.base_url)
    }
}

impl Catalog for HdxCatalog {
    fn read_dataset(&self, id: &str) -> Result<Option<Dataset>> {
        let url = self.package_url(id);
        debug!(%url, "reading dataset");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IngestError::Http {
                url,
                status,
                message,
            });
        }

        let body: PackageShow = response.json()?;
        if !body.success {
            return Ok(None);
        }
        Ok(body.result)
    }
}

/// Catalog backed by `dataset-{id}.json` files in a directory.
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    dir: PathBuf,
}

impl LocalCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dataset_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("dataset-{id}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Catalog for LocalCatalog {
    fn read_dataset(&self, id: &str) -> Result<Option<Dataset>> {
        let path = self.dataset_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path).map_err(|e| IngestError::io(&path, e))?;
        let dataset = serde_json::from_str(&text)
            .map_err(|source| IngestError::Json { path, source })?;
        Ok(Some(dataset))
    }
}
