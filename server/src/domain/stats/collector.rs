//! Stats-to-metrics collector
//!
//! Ties the descriptor registry, the snapshot store and the value
//! translators together. Ingestion calls [`StatsCollector::push`]; each
//! scrape calls [`StatsCollector::describe`] / [`StatsCollector::collect`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::descriptors::{DescriptorRegistry, StatDescriptor, StatType};
use super::snapshot::{RawStat, Snapshot, SnapshotStore, SourceId};
use super::translate::{self, HistogramValue, TranslateError};

/// Name of the constant label carrying the source id
pub const SOURCE_LABEL: &str = "source";

/// Description of one exported metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub fq_name: String,
    /// Stat name as reported by the bridge
    pub stat: String,
    pub help: String,
    pub metric_type: StatType,
    pub source: SourceId,
}

impl MetricDescriptor {
    pub fn const_labels(&self) -> [(&'static str, &str); 1] {
        [(SOURCE_LABEL, self.source.as_str())]
    }
}

/// Translated value of one sample
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Counter(f64),
    Gauge(f64),
    Histogram(HistogramValue),
}

impl MetricValue {
    pub fn stat_type(&self) -> StatType {
        match self {
            Self::Counter(_) => StatType::Counter,
            Self::Gauge(_) => StatType::Gauge,
            Self::Histogram(_) => StatType::Histogram,
        }
    }
}

/// One typed sample ready for exposition
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub descriptor: MetricDescriptor,
    pub value: MetricValue,
}

/// Per-source summary for the sources listing
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: SourceId,
    /// Number of raw stats in the latest snapshot
    pub stats: usize,
    /// Number of those stats that produce a metric
    pub exported: usize,
    pub received_at: DateTime<Utc>,
}

pub struct StatsCollector {
    namespace: String,
    registry: DescriptorRegistry,
    store: SnapshotStore,
}

impl StatsCollector {
    pub fn new(namespace: impl Into<String>, registry: DescriptorRegistry) -> Self {
        Self {
            namespace: namespace.into(),
            registry,
            store: SnapshotStore::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Replace the stats known for `source`
    pub fn push(&self, source: SourceId, stats: Vec<RawStat>) {
        tracing::debug!(source = %source, stats = stats.len(), "Updating stats snapshot");
        self.store.push(source, Snapshot::new(stats));
    }

    /// Describe every metric the current snapshots would produce
    pub fn describe(&self) -> Vec<MetricDescriptor> {
        let mut descriptors = Vec::new();
        self.store.for_each(|source, snapshot| {
            for stat in distinct_stats(snapshot) {
                if let Some(desc) = self.exported_descriptor(&stat.name) {
                    descriptors.push(self.metric_descriptor(source, stat, desc));
                }
            }
        });
        descriptors
    }

    /// Translate the current snapshots into samples.
    ///
    /// A stat that fails to translate is logged and skipped; the rest of the
    /// scrape is unaffected.
    pub fn collect(&self) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        self.store.for_each(|source, snapshot| {
            let stats = distinct_stats(snapshot);
            if stats.len() < snapshot.len() {
                tracing::warn!(
                    source = %source,
                    duplicates = snapshot.len() - stats.len(),
                    "Snapshot repeats stat names, keeping the last value of each"
                );
            }

            for stat in stats {
                let Some(desc) = self.registry.lookup(&stat.name) else {
                    tracing::debug!(source = %source, stat = %stat.name, "Skipping unknown stat");
                    continue;
                };

                match translate_value(desc.stat_type, &stat.value) {
                    Ok(Some(value)) => samples.push(MetricSample {
                        descriptor: self.metric_descriptor(source, stat, desc),
                        value,
                    }),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            source = %source,
                            stat = %stat.name,
                            error = %e,
                            "Failed to translate stat"
                        );
                    }
                }
            }
        });
        samples
    }

    /// Summaries of all known sources, ordered by source id
    pub fn sources(&self) -> Vec<SourceSummary> {
        let mut summaries = Vec::with_capacity(self.store.len());
        self.store.for_each(|source, snapshot| {
            let exported = distinct_stats(snapshot)
                .into_iter()
                .filter(|stat| self.exported_descriptor(&stat.name).is_some())
                .count();
            summaries.push(SourceSummary {
                source: source.clone(),
                stats: snapshot.len(),
                exported,
                received_at: snapshot.received_at,
            });
        });
        summaries
    }

    fn exported_descriptor(&self, name: &str) -> Option<&StatDescriptor> {
        self.registry
            .lookup(name)
            .filter(|desc| desc.stat_type.is_exported())
    }

    fn metric_descriptor(
        &self,
        source: &SourceId,
        stat: &RawStat,
        desc: &StatDescriptor,
    ) -> MetricDescriptor {
        MetricDescriptor {
            fq_name: format!("{}_{}", self.namespace, stat.name),
            stat: stat.name.clone(),
            help: desc.help.clone(),
            metric_type: desc.stat_type,
            source: source.clone(),
        }
    }
}

/// Last occurrence of every stat name, in order of those occurrences
fn distinct_stats(snapshot: &Snapshot) -> Vec<&RawStat> {
    let mut seen = HashSet::new();
    let mut stats: Vec<&RawStat> = snapshot
        .stats
        .iter()
        .rev()
        .filter(|stat| seen.insert(stat.name.as_str()))
        .collect();
    stats.reverse();
    stats
}

/// Dispatch to the translator for `stat_type`. Tags yield `Ok(None)`.
fn translate_value(
    stat_type: StatType,
    value: &str,
) -> Result<Option<MetricValue>, TranslateError> {
    let value = match stat_type {
        StatType::Gauge => MetricValue::Gauge(translate::to_gauge(value)?),
        StatType::Counter => MetricValue::Counter(translate::to_counter(value)?),
        StatType::Histogram => MetricValue::Histogram(translate::to_histogram(value)?),
        StatType::Tag => return Ok(None),
    };
    Ok(Some(value))
}
