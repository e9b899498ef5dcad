use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::CatalogRepository;
use crate::error::{LoadError, PricingResult};
use crate::models::{PriceRow, Service};

/// Whole catalog as one JSON document: `{ "services": [...], "rows": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub services: Vec<Service>,
    #[serde(default)]
    pub rows: Vec<PriceRow>,
}

impl CatalogSnapshot {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let snapshot: Self = LoadError::read_json(path.as_ref())?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Slugs, service ids and row ids are unique; every row belongs to a known service.
    pub fn validate(&self) -> Result<(), LoadError> {
        let mut slugs = HashSet::new();
        let mut service_ids = HashSet::new();
        for service in &self.services {
            if !slugs.insert(service.slug.as_str()) {
                return Err(LoadError::Invalid(format!(
                    "duplicate service slug '{}'",
                    service.slug
                )));
            }
            if !service_ids.insert(service.id) {
                return Err(LoadError::Invalid(format!(
                    "duplicate service id {}",
                    service.id
                )));
            }
        }

        let mut row_ids = HashSet::new();
        for row in &self.rows {
            if !service_ids.contains(&row.service_id) {
                return Err(LoadError::Invalid(format!(
                    "row {} references unknown service {}",
                    row.id, row.service_id
                )));
            }
            if !row_ids.insert(row.id) {
                return Err(LoadError::Invalid(format!("duplicate row id {}", row.id)));
            }
        }

        Ok(())
    }
}

/// Catalog held in memory and swapped whole on reload
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    snapshot: Arc<RwLock<CatalogSnapshot>>,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Result<Self, LoadError> {
        snapshot.validate()?;
        Ok(Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let snapshot = CatalogSnapshot::from_json_file(path)?;
        tracing::info!(
            path = %path.display(),
            services = snapshot.services.len(),
            rows = snapshot.rows.len(),
            "Loaded catalog snapshot"
        );
        Self::new(snapshot)
    }

    /// Atomically replace the catalog. Readers see either the old or the new snapshot.
    pub async fn replace_snapshot(&self, snapshot: CatalogSnapshot) -> Result<(), LoadError> {
        snapshot.validate()?;
        *self.snapshot.write().await = snapshot;
        Ok(())
    }

    /// (services, rows)
    pub async fn counts(&self) -> (usize, usize) {
        let snapshot = self.snapshot.read().await;
        (snapshot.services.len(), snapshot.rows.len())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn get_service(&self, slug: &str) -> PricingResult<Option<Service>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot.services.iter().find(|s| s.slug == slug).cloned())
    }

    async fn get_price_rows(&self, service_id: i64) -> PricingResult<Vec<PriceRow>> {
        let snapshot = self.snapshot.read().await;

        let mut rows: Vec<PriceRow> = snapshot
            .rows
            .iter()
            .filter(|row| row.service_id == service_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.id);

        Ok(rows)
    }

    async fn list_services(&self) -> PricingResult<Vec<Service>> {
        let snapshot = self.snapshot.read().await;

        let mut services: Vec<Service> = snapshot
            .services
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.slug.cmp(&b.slug)));

        Ok(services)
    }
}
