use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::LoggedRun;

#[derive(Deref, Debug, Display, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AthleteID(Uuid);

impl AthleteID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for AthleteID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for AthleteID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Athlete state supplied with every planning request.
///
/// `readiness` is expected in `[0, 1]` but is used as given.
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteProfile {
    pub id: AthleteID,
    /// min/km
    pub threshold_pace: f32,
    pub threshold_hr: Option<u32>,
    pub readiness: Option<f32>,
    pub recent_rpe_average: Option<f32>,
}

/// Summary of recent training used to scale the next plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorLoad {
    pub average_run_minutes: f32,
    pub long_run_minutes: f32,
    pub high_rpe_count: u32,
}

impl PriorLoad {
    pub const DEFAULT: PriorLoad = PriorLoad {
        average_run_minutes: 40.0,
        long_run_minutes: 70.0,
        high_rpe_count: 0,
    };

    /// Summarize logged runs. Returns `None` without runs.
    #[must_use]
    pub fn from_runs(runs: &[LoggedRun]) -> Option<Self> {
        if runs.is_empty() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let average_run_minutes =
            runs.iter().map(|r| r.duration_minutes).sum::<f32>() / runs.len() as f32;
        let long_run_minutes = runs
            .iter()
            .map(|r| r.duration_minutes)
            .fold(0.0, f32::max);
        #[allow(clippy::cast_possible_truncation)]
        let high_rpe_count = runs
            .iter()
            .filter(|r| r.rpe.is_some_and(crate::RPE::is_high))
            .count() as u32;

        Some(Self {
            average_run_minutes,
            long_run_minutes,
            high_rpe_count,
        })
    }
}

impl Default for PriorLoad {
    fn default() -> Self {
        Self::DEFAULT
    }
}
