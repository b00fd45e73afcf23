//! Read-only serving of a loaded pipeline

use crate::error::Result;
use crate::export::{ModelArtifact, ModelMetadata};
use crate::pipeline::PredictionPipeline;
use crate::record::PropertyRecord;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Process-wide service, populated on the first successful [`RentService::shared`]
static SHARED: Mutex<Option<(PathBuf, Arc<RentService>)>> = parking_lot::const_mutex(None);

/// Rent estimate for a single property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimated monthly rent
    pub rent: f64,
    /// `rent / size`; absent when the size is not positive
    pub rent_per_sqft: Option<f64>,
}

impl Estimate {
    fn new(rent: f64, size: f64) -> Self {
        let rent_per_sqft = if size > 0.0 { Some(rent / size) } else { None };
        Self { rent, rent_per_sqft }
    }
}

/// Fitted pipeline plus the metadata it was persisted with
#[derive(Debug, Clone)]
pub struct RentService {
    pipeline: Arc<PredictionPipeline>,
    metadata: ModelMetadata,
}

impl RentService {
    /// Load and verify an artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let (pipeline, metadata) = ModelArtifact::load(path)?.into_parts();
        Ok(Self {
            pipeline: Arc::new(pipeline),
            metadata,
        })
    }

    /// Serve an in-memory pipeline
    pub fn from_pipeline(pipeline: PredictionPipeline, metadata: ModelMetadata) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            metadata,
        }
    }

    /// The process-wide service, loading it from `path` on first use.
    ///
    /// A failed load is returned and nothing is cached, so a later call retries.
    /// Once loaded, later calls get the same instance whatever path they pass.
    pub fn shared(path: impl AsRef<Path>) -> Result<Arc<RentService>> {
        let path = path.as_ref();
        let mut slot = SHARED.lock();

        if let Some((loaded_from, service)) = slot.as_ref() {
            if loaded_from != path {
                warn!(
                    requested = %path.display(),
                    loaded = %loaded_from.display(),
                    "Shared rent service already loaded from another artifact"
                );
            }
            return Ok(Arc::clone(service));
        }

        let service = Arc::new(Self::load(path)?);
        info!(path = %path.display(), "Shared rent service initialised");
        *slot = Some((path.to_path_buf(), Arc::clone(&service)));
        Ok(service)
    }

    /// Drop the process-wide instance so the next `shared` call reloads
    pub fn reset_shared() {
        SHARED.lock().take();
    }

    /// Estimate the rent of one property
    pub fn estimate(&self, record: &PropertyRecord) -> Result<Estimate> {
        let start = Instant::now();
        let rent = self.pipeline.predict_one(record)?;
        debug!(
            city = %record.city,
            rent,
            latency_us = start.elapsed().as_micros() as u64,
            "Estimated rent"
        );
        Ok(Estimate::new(rent, record.size))
    }

    /// Estimate rents for a batch of properties
    pub fn estimate_batch(&self, records: &[PropertyRecord]) -> Result<Vec<Estimate>> {
        let rents = self.pipeline.predict(records)?;
        Ok(rents
            .iter()
            .zip(records)
            .map(|(&rent, record)| Estimate::new(rent, record.size))
            .collect())
    }

    pub fn pipeline(&self) -> &PredictionPipeline {
        &self.pipeline
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_guard() {
        let estimate = Estimate::new(30000.0, 1000.0);
        assert_eq!(estimate.rent_per_sqft, Some(30.0));

        assert_eq!(Estimate::new(30000.0, 0.0).rent_per_sqft, None);
        assert_eq!(Estimate::new(30000.0, -5.0).rent_per_sqft, None);
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RentService>();
        assert_send_sync::<PredictionPipeline>();
    }

    #[test]
    fn test_unfitted_service_reports_not_fitted() {
        let service = RentService::from_pipeline(PredictionPipeline::default(), ModelMetadata::default());
        let record = crate::inference::PropertyForm::default().into_record().unwrap();
        assert!(matches!(
            service.estimate(&record),
            Err(crate::error::RentError::NotFitted)
        ));
    }
}
