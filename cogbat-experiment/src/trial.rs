use std::time::Duration;

use cogbat_core::TrialSpec;
use serde::{Deserialize, Serialize};

/// How long a stimulus stays up before the response window opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Presentation {
    /// Shown for `base_ms + per_item_ms * size`, then hidden.
    Timed { base_ms: u64, per_item_ms: u64 },
    /// Stays visible; the response window opens on the next advance.
    Immediate,
}

impl Presentation {
    pub fn display_duration(&self, spec: &TrialSpec) -> Option<Duration> {
        match self {
            Presentation::Timed {
                base_ms,
                per_item_ms,
            } => Some(Duration::from_millis(
                base_ms.saturating_add(per_item_ms.saturating_mul(spec.size() as u64)),
            )),
            Presentation::Immediate => None,
        }
    }

    pub fn per_item(&self) -> Option<Duration> {
        match self {
            Presentation::Timed { per_item_ms, .. } if *per_item_ms > 0 => {
                Some(Duration::from_millis(*per_item_ms))
            }
            _ => None,
        }
    }
}

/// The trial in flight.
#[derive(Debug, Clone)]
pub struct Trial<T> {
    /// Zero-based.
    pub index: usize,
    pub spec: TrialSpec,
    pub display: Option<Duration>,
    pub timestamps: TrialTimestamps<T>,
}

#[derive(Debug, Clone)]
pub struct TrialTimestamps<T> {
    pub presented: T,
    pub response_window: Option<T>,
}
