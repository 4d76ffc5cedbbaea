//! Static classification of JVB stat names
//!
//! Every stat a bridge reports is a name/value string pair. The registry
//! tells the collector what kind of metric (if any) a given name maps to.

use std::collections::HashMap;

use serde::Serialize;

/// Semantic type of a stat reported by a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    Counter,
    Gauge,
    Histogram,
    /// Informational value (e.g. version). Never exported as a metric.
    Tag,
}

impl StatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Histogram => "histogram",
            Self::Tag => "tag",
        }
    }

    /// Whether stats of this type produce a metric
    pub fn is_exported(&self) -> bool {
        !matches!(self, Self::Tag)
    }
}

/// Type and help text for a known stat name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatDescriptor {
    pub stat_type: StatType,
    pub help: String,
}

impl StatDescriptor {
    pub fn new(stat_type: StatType, help: impl Into<String>) -> Self {
        Self {
            stat_type,
            help: help.into(),
        }
    }
}

/// Built-in table of colibri stats this exporter understands.
///
/// Names not listed here are ignored. Extend the table to export more stats.
const JVB_STATS: &[(&str, StatType, &str)] = &[
    ("version", StatType::Tag, ""),
    ("threads", StatType::Gauge, ""),
    ("p2p_conferences", StatType::Gauge, ""),
    ("conferences", StatType::Gauge, ""),
    ("participants", StatType::Gauge, ""),
    ("videostreams", StatType::Gauge, ""),
    ("videochannels", StatType::Gauge, ""),
    ("largest_conference", StatType::Gauge, ""),
    ("endpoints_sending_video", StatType::Gauge, ""),
    ("endpoints_sending_audio", StatType::Gauge, ""),
    ("bit_rate_download", StatType::Gauge, ""),
    ("bit_rate_upload", StatType::Gauge, ""),
    (
        "conference_sizes",
        StatType::Histogram,
        "The distribution of conference sizes hosted on the bridge.",
    ),
    ("conferences_by_video_senders", StatType::Histogram, ""),
    ("conferences_by_audio_senders", StatType::Histogram, ""),
    ("total_participants", StatType::Counter, ""),
    ("total_conference_seconds", StatType::Counter, ""),
];

/// Immutable stat name -> descriptor mapping, built once at startup
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<String, StatDescriptor>,
}

impl DescriptorRegistry {
    /// Registry with the built-in JVB stats
    pub fn jvb() -> Self {
        Self::from_entries(
            JVB_STATS
                .iter()
                .map(|(name, stat_type, help)| (*name, StatDescriptor::new(*stat_type, *help))),
        )
    }

    /// Build a registry from arbitrary entries. Later duplicates win.
    pub fn from_entries<I, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, StatDescriptor)>,
        N: Into<String>,
    {
        Self {
            descriptors: entries
                .into_iter()
                .map(|(name, desc)| (name.into(), desc))
                .collect(),
        }
    }

    /// Look up a stat by name. Unknown names return `None`.
    pub fn lookup(&self, name: &str) -> Option<&StatDescriptor> {
        self.descriptors.get(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterate over all descriptors in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatDescriptor)> {
        self.descriptors
            .iter()
            .map(|(name, desc)| (name.as_str(), desc))
    }
}
