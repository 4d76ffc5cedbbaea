//! Latest stats snapshot per bridge

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Identity of a stats source (a bridge's MUC nickname)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the source from a full MUC JID (`room@service/nickname`).
    ///
    /// The nickname is everything after the first `/`. Returns `None` for a
    /// bare JID or an empty nickname.
    pub fn from_muc_jid(jid: &str) -> Option<Self> {
        let (_, nickname) = jid.split_once('/')?;
        if nickname.is_empty() {
            return None;
        }
        Some(Self(nickname.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One name/value pair as reported, value still text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStat {
    pub name: String,
    pub value: String,
}

impl RawStat {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything known about one source at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub stats: Vec<RawStat>,
    pub received_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(stats: Vec<RawStat>) -> Self {
        Self {
            stats,
            received_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Holds the most recent snapshot for every source.
///
/// Snapshots are immutable once stored and replaced wholesale, so readers
/// only ever see a complete snapshot. Entries are never evicted.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: RwLock<BTreeMap<SourceId, Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot for `source`
    pub fn push(&self, source: SourceId, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        self.snapshots.write().insert(source, snapshot);
    }

    /// Visit a point-in-time view of all entries, ordered by source.
    ///
    /// The lock is released before `visit` runs, so visitors may take as
    /// long as they like (or push) without blocking writers.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&SourceId, &Snapshot),
    {
        let view: Vec<(SourceId, Arc<Snapshot>)> = self
            .snapshots
            .read()
            .iter()
            .map(|(source, snapshot)| (source.clone(), Arc::clone(snapshot)))
            .collect();

        for (source, snapshot) in &view {
            visit(source, snapshot);
        }
    }

    pub fn get(&self, source: &SourceId) -> Option<Arc<Snapshot>> {
        self.snapshots.read().get(source).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}
