use crate::core::region::RegionBounds;
use crate::core::report::{ReportSummary, ResolutionReport};
use crate::domain::model::{Coordinate, GeocodeSource, InstitutionRecord, ResolutionOutcome};
use crate::domain::ports::Geocoder;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs the provider cascade over every record, validates hits against the
/// region bounds and retries out-of-region hits through the postal-code
/// path.
///
/// Records are processed strictly one at a time, in input order, with a
/// politeness delay between consecutive records. Provider failures are
/// never fatal; a record no provider can place is a normal `NotFound`.
pub struct ResolutionPipeline {
    cascade: Vec<Arc<dyn Geocoder>>,
    recovery: Arc<dyn Geocoder>,
    region: RegionBounds,
    delay: Duration,
}

impl ResolutionPipeline {
    pub fn new(
        cascade: Vec<Arc<dyn Geocoder>>,
        recovery: Arc<dyn Geocoder>,
        region: RegionBounds,
        delay: Duration,
    ) -> Self {
        Self {
            cascade,
            recovery,
            region,
            delay,
        }
    }

    pub async fn run(&self, records: Vec<InstitutionRecord>) -> ReportSummary {
        let started = Instant::now();
        let mut report = ResolutionReport::new();

        for (index, record) in records.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            tracing::info!("Searching for: {}", record.name);
            let outcome = self.resolve_record(&record).await;
            match &outcome {
                ResolutionOutcome::Resolved { coordinate, source } => {
                    tracing::info!("Found: {} -> {} via {}", record.name, coordinate, source);
                }
                ResolutionOutcome::OutOfRegion { coordinate } => {
                    tracing::warn!("Out of region: {} at {}", record.name, coordinate);
                }
                ResolutionOutcome::NotFound => {
                    tracing::warn!("Not found: {}", record.name);
                }
            }
            report.record(record, outcome);
        }

        report.finalize(started.elapsed())
    }

    async fn resolve_record(&self, record: &InstitutionRecord) -> ResolutionOutcome {
        let query = record.name.as_str();

        let Some((coordinate, source)) = self.first_hit(query).await else {
            return ResolutionOutcome::NotFound;
        };

        if self.region.contains(coordinate) {
            return ResolutionOutcome::Resolved { coordinate, source };
        }

        // Second-chance policy for boundary failures: one narrow retry
        // through the postal-code path, not a repeat of the full cascade.
        // A failed retry keeps the out-of-region classification.
        tracing::debug!(
            "Coordinates {} for '{}' outside region, retrying via {}",
            coordinate,
            query,
            self.recovery.source()
        );
        match self.attempt(self.recovery.as_ref(), query).await {
            Some(recovered) => ResolutionOutcome::Resolved {
                coordinate: recovered,
                source: self.recovery.source(),
            },
            None => ResolutionOutcome::OutOfRegion { coordinate },
        }
    }

    /// Walks the cascade in priority order, stopping at the first hit.
    async fn first_hit(&self, query: &str) -> Option<(Coordinate, GeocodeSource)> {
        for geocoder in &self.cascade {
            if let Some(coordinate) = self.attempt(geocoder.as_ref(), query).await {
                return Some((coordinate, geocoder.source()));
            }
        }
        None
    }

    /// Single provider call with uniform failure handling: transport and
    /// parse errors read as "no result" after logging provider and query.
    async fn attempt(&self, geocoder: &dyn Geocoder, query: &str) -> Option<Coordinate> {
        match geocoder.resolve(query).await {
            Ok(Some(coordinate)) => Some(coordinate),
            Ok(None) => {
                tracing::debug!("No result from {} for: {}", geocoder.source(), query);
                None
            }
            Err(e) => {
                tracing::warn!("{} failed for '{}': {}", geocoder.source(), query, e);
                None
            }
        }
    }
}
