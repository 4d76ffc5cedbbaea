//! Prometheus exposition of collected JVB stats
//!
//! Bridges [`StatsCollector`] output into a `prometheus_client` collector.
//! Samples are grouped by metric name so each family gets a single
//! HELP/TYPE header with one sample per source.

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::sync::Arc;

use prometheus_client::collector::Collector;
use prometheus_client::encoding::{
    DescriptorEncoder, EncodeLabelValue, LabelValueEncoder, NoLabelSet,
};
use prometheus_client::metrics::MetricType;
use prometheus_client::registry::Registry;

use crate::domain::stats::{MetricSample, MetricValue, SOURCE_LABEL, StatType, StatsCollector};

/// Upper bound the text encoder renders as `+Inf`
const INF_BUCKET: f64 = f64::MAX;

pub struct StatsExposition {
    collector: Arc<StatsCollector>,
}

impl StatsExposition {
    pub fn new(collector: Arc<StatsCollector>) -> Self {
        Self { collector }
    }

    /// Registry containing only the stats collector
    pub fn registry(collector: Arc<StatsCollector>) -> Registry {
        let mut registry = Registry::default();
        registry.register_collector(Box::new(Self::new(collector)));
        registry
    }

    /// Render the registry in the text exposition format
    pub fn render(registry: &Registry) -> Result<String, fmt::Error> {
        let mut buffer = String::new();
        prometheus_client::encoding::text::encode(&mut buffer, registry)?;
        Ok(buffer)
    }
}

impl fmt::Debug for StatsExposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsExposition")
            .field("namespace", &self.collector.namespace())
            .finish()
    }
}

impl Collector for StatsExposition {
    fn encode(&self, mut encoder: DescriptorEncoder) -> Result<(), fmt::Error> {
        let samples = self.collector.collect();

        let mut families: BTreeMap<&str, Vec<&MetricSample>> = BTreeMap::new();
        for sample in &samples {
            families
                .entry(sample.descriptor.fq_name.as_str())
                .or_default()
                .push(sample);
        }

        for (name, family) in families {
            // Non-empty by construction
            let first = &family[0].descriptor;
            let help = if first.help.is_empty() {
                format!("JVB stat {}", first.stat)
            } else {
                first.help.clone()
            };

            let mut metric_encoder =
                encoder.encode_descriptor(name, &help, None, metric_type(first.metric_type))?;

            for sample in family {
                let labels = [(SOURCE_LABEL, EscapedLabelValue(sample.descriptor.source.as_str()))];
                let mut sample_encoder = metric_encoder.encode_family(&labels)?;
                match &sample.value {
                    MetricValue::Gauge(v) => sample_encoder.encode_gauge(v)?,
                    MetricValue::Counter(v) => {
                        sample_encoder.encode_counter::<NoLabelSet, _, f64>(v, None)?
                    }
                    MetricValue::Histogram(hist) => {
                        let mut buckets = hist.bucket_counts();
                        buckets.push((INF_BUCKET, 0));
                        sample_encoder.encode_histogram::<NoLabelSet>(
                            hist.sum,
                            hist.total_count,
                            &buckets,
                            None,
                        )?
                    }
                }
            }
        }

        Ok(())
    }
}

/// Label value escaped for the text exposition format. Source ids are
/// opaque, so backslashes, quotes and newlines must not reach the output raw.
struct EscapedLabelValue<'a>(&'a str);

impl EncodeLabelValue for EscapedLabelValue<'_> {
    fn encode(&self, encoder: &mut LabelValueEncoder) -> Result<(), fmt::Error> {
        for c in self.0.chars() {
            match c {
                '\\' => encoder.write_str("\\\\")?,
                '"' => encoder.write_str("\\\"")?,
                '\n' => encoder.write_str("\\n")?,
                c => encoder.write_char(c)?,
            }
        }
        Ok(())
    }
}

fn metric_type(stat_type: StatType) -> MetricType {
    match stat_type {
        StatType::Counter => MetricType::Counter,
        StatType::Gauge => MetricType::Gauge,
        StatType::Histogram => MetricType::Histogram,
        StatType::Tag => MetricType::Unknown,
    }
}
