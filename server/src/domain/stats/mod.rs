//! JVB stats translation
//!
//! - `descriptors` - static stat name classification
//! - `snapshot` - latest stats per bridge
//! - `translate` - raw value to metric value conversion
//! - `collector` - describe/collect over all snapshots

mod collector;
mod descriptors;
mod snapshot;
mod translate;

pub use collector::{
    MetricDescriptor, MetricSample, MetricValue, SOURCE_LABEL, SourceSummary, StatsCollector,
};
pub use descriptors::{DescriptorRegistry, StatDescriptor, StatType};
pub use snapshot::{RawStat, Snapshot, SnapshotStore, SourceId};
pub use translate::{HistogramValue, TranslateError, to_counter, to_gauge, to_histogram};
