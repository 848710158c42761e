use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{LendSeerError, Result};
use super::opportunity::OpportunityRecord;

/// Boundary to whatever produces listing records - in the extension this is
/// the page scraper; here it is anything that can hand over a batch.
#[async_trait]
pub trait OpportunitySource {
    async fn fetch(&self) -> Result<Vec<OpportunityRecord>>;
}

/// Reads a JSON array of scraped listings from disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl OpportunitySource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<OpportunityRecord>> {
        info!("Loading listings from {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| {
                LendSeerError::source_error(format!(
                    "could not read {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let records: Vec<OpportunityRecord> = serde_json::from_str(&content)?;
        debug!("Parsed {} listings", records.len());

        Ok(records.into_iter().map(OpportunityRecord::sanitize).collect())
    }
}
