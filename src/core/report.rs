use crate::domain::model::{Coordinate, GeocodeSource, InstitutionRecord, ResolutionOutcome};
use std::collections::HashMap;
use std::time::Duration;

/// Accumulates classified records while the pipeline runs.
///
/// Entries are keyed by the record's `id`; each record is committed exactly
/// once, after any recovery attempt has already been applied.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    entries: Vec<(InstitutionRecord, ResolutionOutcome)>,
    source_hits: HashMap<GeocodeSource, usize>,
}

impl ResolutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: InstitutionRecord, outcome: ResolutionOutcome) {
        debug_assert!(
            !self.entries.iter().any(|(r, _)| r.id == record.id),
            "record id committed twice"
        );
        if let ResolutionOutcome::Resolved { source, .. } = &outcome {
            *self.source_hits.entry(*source).or_default() += 1;
        }
        self.entries.push((record, outcome));
    }

    pub fn finalize(self, elapsed: Duration) -> ReportSummary {
        ReportSummary {
            entries: self.entries,
            source_hits: self.source_hits,
            elapsed,
        }
    }
}

/// Immutable end-of-run summary, consumed by the renderer and the summary
/// log lines.
#[derive(Debug)]
pub struct ReportSummary {
    entries: Vec<(InstitutionRecord, ResolutionOutcome)>,
    source_hits: HashMap<GeocodeSource, usize>,
    elapsed: Duration,
}

impl ReportSummary {
    pub fn entries(&self) -> &[(InstitutionRecord, ResolutionOutcome)] {
        &self.entries
    }

    pub fn resolved(
        &self,
    ) -> impl Iterator<Item = (&InstitutionRecord, Coordinate, GeocodeSource)> + '_ {
        self.entries.iter().filter_map(|(record, outcome)| match outcome {
            ResolutionOutcome::Resolved { coordinate, source } => {
                Some((record, *coordinate, *source))
            }
            _ => None,
        })
    }

    pub fn not_found(&self) -> impl Iterator<Item = &InstitutionRecord> + '_ {
        self.entries.iter().filter_map(|(record, outcome)| {
            matches!(outcome, ResolutionOutcome::NotFound).then_some(record)
        })
    }

    pub fn out_of_region(&self) -> impl Iterator<Item = &InstitutionRecord> + '_ {
        self.entries.iter().filter_map(|(record, outcome)| {
            matches!(outcome, ResolutionOutcome::OutOfRegion { .. }).then_some(record)
        })
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved().count()
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found().count()
    }

    pub fn out_of_region_count(&self) -> usize {
        self.out_of_region().count()
    }

    pub fn hits_for(&self, source: GeocodeSource) -> usize {
        self.source_hits.get(&source).copied().unwrap_or(0)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
