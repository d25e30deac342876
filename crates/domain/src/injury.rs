use chrono::NaiveDate;
use derive_more::Display;
use log::debug;

use crate::{History, Interval, LoggedRun, Week, volume_increase, volume_warnings};

/// Days considered by the injury assessor if not configured otherwise.
pub const DEFAULT_INJURY_WINDOW_DAYS: u32 = 14;
/// Runs within the last seven days from which rest is considered insufficient.
pub const MAX_RUNS_PER_WEEK: usize = 6;
/// Pace below which a run is hard, in min/km.
pub const HARD_RUN_PACE: f32 = 5.0;
/// Average heart rate above which a run is hard.
pub const HARD_RUN_HR: u32 = 165;
/// Average set effort from which a strength exercise counts as high effort.
pub const HIGH_EFFORT: f32 = 8.0;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    #[display("low")]
    Low,
    #[display("moderate")]
    Moderate,
    #[display("high")]
    High,
}

impl RiskLevel {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            50.. => RiskLevel::High,
            25..=49 => RiskLevel::Moderate,
            _ => RiskLevel::Low,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum RiskFactor {
    #[display("Rapid training volume increase detected")]
    RapidVolumeIncrease,
    #[display("Moderate volume increase - monitor closely")]
    ModerateVolumeIncrease,
    #[display("High-load strength training after intense run")]
    StrengthAfterHardRun,
    #[display("Insufficient rest days (need 2+ per week)")]
    InsufficientRest,
    #[display("Consistently training at very high effort levels")]
    HighEffortClustering,
    #[display("High pace variability - may indicate fatigue")]
    PaceVariability,
}

impl RiskFactor {
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            RiskFactor::RapidVolumeIncrease => 25,
            RiskFactor::StrengthAfterHardRun => 20,
            RiskFactor::ModerateVolumeIncrease | RiskFactor::InsufficientRest => 15,
            RiskFactor::HighEffortClustering | RiskFactor::PaceVariability => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjuryRiskAssessment {
    /// 0 to 100
    pub risk_score: u8,
    pub level: RiskLevel,
    /// Triggered factors in evaluation order.
    pub factors: Vec<RiskFactor>,
}

impl InjuryRiskAssessment {
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.factors.iter().map(ToString::to_string).collect()
    }
}

impl Default for InjuryRiskAssessment {
    fn default() -> Self {
        Self {
            risk_score: 0,
            level: RiskLevel::Low,
            factors: vec![],
        }
    }
}

/// Estimate the injury risk at `today` from the last `window_days` days.
///
/// The volume factor compares the week containing `today` with the previous
/// week, so `history` should cover both weeks in addition to the window.
#[must_use]
pub fn assess(history: &History, today: NaiveDate, window_days: u32) -> InjuryRiskAssessment {
    let recent = history.within(&Interval::trailing_days(today, window_days));

    let factors = [
        volume_factor(history, &Week::containing(today)),
        hard_run_factor(&recent),
        rest_factor(history, today),
        effort_factor(&recent),
        pace_factor(&recent.runs),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    #[allow(clippy::cast_possible_truncation)]
    let risk_score = factors
        .iter()
        .map(|f| f.points())
        .sum::<u32>()
        .min(100) as u8;

    debug!("injury risk at {today}: {risk_score} ({factors:?})");

    InjuryRiskAssessment {
        risk_score,
        level: RiskLevel::from_score(risk_score),
        factors,
    }
}

fn volume_factor(history: &History, week: &Week) -> Option<RiskFactor> {
    #[allow(clippy::cast_precision_loss)]
    let max_increase = volume_warnings(history, week)
        .iter()
        .map(|w| w.increase as f32)
        .fold(volume_increase(history, week), f32::max);

    if max_increase > 15.0 {
        Some(RiskFactor::RapidVolumeIncrease)
    } else if max_increase > 10.0 {
        Some(RiskFactor::ModerateVolumeIncrease)
    } else {
        None
    }
}

fn is_hard(run: &LoggedRun) -> bool {
    run.pace().is_some_and(|pace| pace < HARD_RUN_PACE)
        || run.avg_hr.is_some_and(|hr| hr > HARD_RUN_HR)
}

/// Counted once, however often the pattern occurs.
fn hard_run_factor(recent: &History) -> Option<RiskFactor> {
    recent
        .runs
        .windows(2)
        .any(|pair| {
            is_hard(&pair[0])
                && (pair[1].date - pair[0].date).num_days() < 2
                && recent.strength.iter().any(|e| e.date == pair[1].date)
        })
        .then_some(RiskFactor::StrengthAfterHardRun)
}

fn rest_factor(history: &History, today: NaiveDate) -> Option<RiskFactor> {
    let last_week = Interval::trailing_days(today, 7);
    (history.runs.iter().filter(|r| last_week.contains(r.date)).count() > MAX_RUNS_PER_WEEK)
        .then_some(RiskFactor::InsufficientRest)
}

fn effort_factor(recent: &History) -> Option<RiskFactor> {
    let exercises = recent.strength.len();
    if exercises <= 3 {
        return None;
    }
    let high_effort = recent
        .strength
        .iter()
        .filter(|e| e.avg_effort().is_some_and(|effort| effort >= HIGH_EFFORT))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let clustered = high_effort as f32 > exercises as f32 * 0.6;
    clustered.then_some(RiskFactor::HighEffortClustering)
}

fn pace_factor(runs: &[LoggedRun]) -> Option<RiskFactor> {
    let paces = runs.iter().filter_map(LoggedRun::pace).collect::<Vec<_>>();
    if paces.len() < 5 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = paces.len() as f32;
    let mean = paces.iter().sum::<f32>() / n;
    let variance = paces.iter().map(|p| (p - mean).powi(2)).sum::<f32>() / n;
    (variance.sqrt() / mean > 0.15).then_some(RiskFactor::PaceVariability)
}
