use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Ticks between 0001-01-01 and the Unix epoch, in 100 ns units.
const EPOCH_TICKS: i64 = 621_355_968_000_000_000;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Tracing identifier sent as `Reference-Number`; the client never validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new() -> Self {
        let now = Utc::now();
        let ticks = EPOCH_TICKS
            + now.timestamp() * 10_000_000
            + i64::from(now.timestamp_subsec_nanos() / 100);
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{ticks}-{sequence}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationPolicy {
    #[default]
    PerCall,
    PerClient,
}

/// Hands out correlation ids according to a [`CorrelationPolicy`].
#[derive(Debug, Clone)]
pub enum CorrelationSource {
    PerCall,
    PerClient(CorrelationId),
}

impl CorrelationSource {
    pub fn new(policy: CorrelationPolicy) -> Self {
        match policy {
            CorrelationPolicy::PerCall => Self::PerCall,
            CorrelationPolicy::PerClient => Self::PerClient(CorrelationId::new()),
        }
    }

    pub fn next(&self) -> CorrelationId {
        match self {
            Self::PerCall => CorrelationId::new(),
            Self::PerClient(id) => id.clone(),
        }
    }
}
