use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::track::Track;

/// Point in time up to which a tree is known to be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self(time)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

/// Decides which scanned tracks a pass works on.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateGate {
    new_only: bool,
    watermark: Option<Watermark>,
}

impl UpdateGate {
    pub fn new(new_only: bool, watermark: Option<Watermark>) -> Self {
        Self {
            new_only,
            watermark,
        }
    }

    /// The watermark in effect, if the gate filters at all.
    pub fn threshold(&self) -> Option<Watermark> {
        self.watermark.filter(|_| self.new_only)
    }

    /// Tracks never reconciled always pass. Otherwise the track's stamp
    /// must be strictly after the watermark.
    pub fn admits(&self, track: &Track) -> bool {
        match self.threshold() {
            None => true,
            Some(mark) => track
                .last_reconciled_at()
                .is_none_or(|at| at > mark.as_datetime()),
        }
    }

    /// Split into (admitted, held back), keeping scan order in both.
    pub fn partition(&self, tracks: Vec<Track>) -> (Vec<Track>, Vec<Track>) {
        let (admitted, held): (Vec<Track>, Vec<Track>) =
            tracks.into_iter().partition(|t| self.admits(t));
        debug!(
            admitted = admitted.len(),
            held = held.len(),
            watermark = ?self.threshold().map(|w| w.to_string()),
            "update gate applied"
        );
        (admitted, held)
    }
}
