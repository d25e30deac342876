use std::{collections::BTreeSet, fmt};

use chrono::{Duration, NaiveDate};
use derive_more::Display;
use log::debug;

use crate::{History, Interval, LoggedRun, Week};

/// Days considered for health metrics if not configured otherwise.
pub const DEFAULT_HEALTH_WINDOW_DAYS: u32 = 30;
/// Score reported while there is not enough data.
pub const NEUTRAL_SCORE: u8 = 50;
/// Minimum number of runs for health metrics.
pub const MIN_RUNS: usize = 3;
/// Number of runs on each side of the efficiency comparison.
pub const COMPARED_RUNS: usize = 5;
/// Change of efficiency in percent from which a trend is reported.
pub const TREND_THRESHOLD: f32 = 3.0;
pub const TARGET_RUNS_PER_WEEK: f32 = 4.0;
pub const TARGET_DISTANCE_PER_WEEK: f32 = 35.0;
/// Days summarized by the monthly analytics if not configured otherwise.
pub const DEFAULT_ANALYTICS_WINDOW_DAYS: u32 = 30;
/// Number of seven-day periods in the monthly analytics.
pub const ANALYTICS_WEEKS: usize = 4;
/// Days considered for insights if not configured otherwise.
pub const DEFAULT_INSIGHT_WINDOW_DAYS: u32 = 14;
pub const MAX_INSIGHTS: usize = 3;
/// Runs on each side of the pace comparison.
const PACE_RUNS: usize = 3;
/// Runs on each side of the heart rate comparison.
const HR_RUNS: usize = 2;
const PACE_IMPROVEMENT: f32 = 2.0;
const PACE_DECLINE: f32 = -5.0;
/// bpm
const HR_DROP: f32 = 3.0;
/// km per week
const HIGH_VOLUME: f32 = 40.0;
/// km per week
const OPTIMAL_VOLUME: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeeklyStats {
    /// km
    pub total_distance: f32,
    pub total_runs: u32,
    /// min/km, 0 without distance
    pub average_pace: f32,
    /// 0 if no run reports a heart rate
    pub average_hr: f32,
    /// min
    pub total_duration: f32,
}

#[must_use]
pub fn weekly_stats(history: &History, week: &Week) -> WeeklyStats {
    let interval = week.interval();
    let runs = history
        .runs
        .iter()
        .filter(|r| interval.contains(r.date))
        .collect::<Vec<_>>();

    let total_distance = runs.iter().map(|r| r.distance_km).sum::<f32>();
    let total_duration = runs.iter().map(|r| r.duration_minutes).sum::<f32>();
    let heart_rates = runs.iter().filter_map(|r| r.avg_hr).collect::<Vec<_>>();

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    WeeklyStats {
        total_distance,
        total_runs: runs.len() as u32,
        average_pace: if total_distance > 0.0 {
            total_duration / total_distance
        } else {
            0.0
        },
        average_hr: if heart_rates.is_empty() {
            0.0
        } else {
            heart_rates.iter().sum::<u32>() as f32 / heart_rates.len() as f32
        },
        total_duration,
    }
}

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trend {
    #[display("improving")]
    Improving,
    #[default]
    #[display("stable")]
    Stable,
    #[display("declining")]
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthMetrics {
    /// 0 to 100
    pub aerobic_fitness: u8,
    /// 0 to 100
    pub training_load: u8,
    pub trend: Trend,
}

impl Default for HealthMetrics {
    fn default() -> Self {
        Self {
            aerobic_fitness: NEUTRAL_SCORE,
            training_load: NEUTRAL_SCORE,
            trend: Trend::Stable,
        }
    }
}

/// Aerobic fitness and training load at `today`.
///
/// With fewer than three runs in the last `window_days` days the neutral
/// defaults are returned. Aerobic fitness compares the pace and heart rate
/// efficiency of the five most recent runs with up to five older runs, the
/// training load is based on the runs of the current week.
#[must_use]
pub fn health_metrics(history: &History, today: NaiveDate, window_days: u32) -> HealthMetrics {
    let runs = history
        .within(&Interval::trailing_days(today, window_days))
        .runs;

    if runs.len() < MIN_RUNS {
        return HealthMetrics::default();
    }

    let recent = &runs[runs.len().saturating_sub(COMPARED_RUNS)..];
    let older = &runs[..COMPARED_RUNS.min(runs.len().saturating_sub(COMPARED_RUNS))];

    let mut aerobic_fitness = f32::from(NEUTRAL_SCORE);
    let mut trend = Trend::Stable;

    if let (Some(old_efficiency), Some(recent_efficiency)) = (efficiency(older), efficiency(recent))
    {
        let improvement = (recent_efficiency - old_efficiency) / old_efficiency * 100.0;
        aerobic_fitness = (50.0 + improvement * 2.0).clamp(0.0, 100.0);
        if improvement > TREND_THRESHOLD {
            trend = Trend::Improving;
        } else if improvement < -TREND_THRESHOLD {
            trend = Trend::Declining;
        }
    }

    let stats = weekly_stats(history, &Week::containing(today));
    #[allow(clippy::cast_precision_loss)]
    let frequency_score = (stats.total_runs as f32 / TARGET_RUNS_PER_WEEK * 100.0).min(100.0);
    let volume_score = (stats.total_distance / TARGET_DISTANCE_PER_WEEK * 100.0).min(100.0);
    let training_load = (frequency_score + volume_score) / 2.0;

    debug!(
        "health metrics at {today}: aerobic fitness {aerobic_fitness}, training load {training_load}, {trend}"
    );

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    HealthMetrics {
        aerobic_fitness: aerobic_fitness.round() as u8,
        training_load: training_load.round() as u8,
        trend,
    }
}

/// Speed relative to heart rate, higher is better.
///
/// Only runs with distance, duration and heart rate are considered.
fn efficiency(runs: &[LoggedRun]) -> Option<f32> {
    let valid = runs
        .iter()
        .filter_map(|r| Some((r.pace()?, r.avg_hr.filter(|hr| *hr > 0)?)))
        .collect::<Vec<_>>();
    if valid.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = valid.len() as f32;
    let pace = valid.iter().map(|(pace, _)| pace).sum::<f32>() / n;
    #[allow(clippy::cast_precision_loss)]
    let hr = valid.iter().map(|(_, hr)| *hr as f32).sum::<f32>() / n;
    Some((1.0 / pace) * (180.0 / hr))
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekSummary {
    /// km, rounded to 0.1
    pub distance: f32,
    /// bpm, 0 if no run reports a heart rate
    pub average_hr: u32,
    /// min/km, rounded to 0.01, 0 without distance
    pub average_pace: f32,
    pub runs: u32,
}

impl WeekSummary {
    fn of(runs: &[&LoggedRun]) -> Self {
        let distance = runs.iter().map(|r| r.distance_km).sum::<f32>();
        let duration = runs.iter().map(|r| r.duration_minutes).sum::<f32>();
        let heart_rates = runs
            .iter()
            .filter_map(|r| r.avg_hr.filter(|hr| *hr > 0))
            .collect::<Vec<_>>();
        let pace = if distance > 0.0 {
            duration / distance
        } else {
            0.0
        };

        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let average_hr = if heart_rates.is_empty() {
            0
        } else {
            (heart_rates.iter().sum::<u32>() as f32 / heart_rates.len() as f32).round() as u32
        };
        #[allow(clippy::cast_possible_truncation)]
        let count = runs.len() as u32;

        Self {
            distance: (distance * 10.0).round() / 10.0,
            average_hr,
            average_pace: (pace * 100.0).round() / 100.0,
            runs: count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunTotals {
    /// km
    pub distance: f32,
    pub runs: u32,
    /// min
    pub duration: f32,
    /// min/km, 0 without distance
    pub average_pace: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyAnalytics {
    /// Seven-day periods ending at the analysed day, oldest first.
    pub weeks: [WeekSummary; ANALYTICS_WEEKS],
    pub totals: RunTotals,
    /// Index of the week with the longest distance, the earliest one on ties.
    pub best_week: usize,
    /// Share of weeks with at least one run in percent.
    pub consistency: u8,
    /// Increase of distance from the first to the last week in percent, 0 if
    /// the distance did not increase.
    pub improvement: u32,
}

impl MonthlyAnalytics {
    #[must_use]
    pub fn best_week_distance(&self) -> f32 {
        self.weeks[self.best_week].distance
    }
}

/// Summary of the runs of the last `window_days` days up to `today`.
///
/// The weekly breakdown covers four seven-day periods, the last one ending at
/// `today`. An empty history yields zeros everywhere.
#[must_use]
pub fn monthly_analytics(
    history: &History,
    today: NaiveDate,
    window_days: u32,
) -> MonthlyAnalytics {
    let runs = history
        .within(&Interval::trailing_days(today, window_days))
        .runs;

    let mut weeks = [WeekSummary::default(); ANALYTICS_WEEKS];
    for (i, week) in weeks.iter_mut().enumerate() {
        let weeks_back = ANALYTICS_WEEKS - 1 - i;
        #[allow(clippy::cast_possible_wrap)]
        let last = today
            .checked_sub_signed(Duration::weeks(weeks_back as i64))
            .unwrap_or(NaiveDate::MIN);
        let interval = Interval::trailing_days(last, 7);
        *week = WeekSummary::of(
            &runs
                .iter()
                .filter(|r| interval.contains(r.date))
                .collect::<Vec<_>>(),
        );
    }

    let distance = runs.iter().map(|r| r.distance_km).sum::<f32>();
    let duration = runs.iter().map(|r| r.duration_minutes).sum::<f32>();
    #[allow(clippy::cast_possible_truncation)]
    let totals = RunTotals {
        distance,
        runs: runs.len() as u32,
        duration,
        average_pace: if distance > 0.0 {
            duration / distance
        } else {
            0.0
        },
    };

    let mut best_week = 0;
    for (i, week) in weeks.iter().enumerate() {
        if week.distance > weeks[best_week].distance {
            best_week = i;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let active = weeks.iter().filter(|w| w.runs > 0).count() as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let consistency = (active / ANALYTICS_WEEKS as f32 * 100.0).round() as u8;

    let (first, last) = (weeks[0].distance, weeks[ANALYTICS_WEEKS - 1].distance);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let improvement = if last > first {
        let base = if first > 0.0 { first } else { 1.0 };
        ((last - first) / base * 100.0).round() as u32
    } else {
        0
    };

    debug!(
        "monthly analytics at {today}: {} runs, best week {}, consistency {consistency}%",
        totals.runs,
        best_week + 1
    );

    MonthlyAnalytics {
        weeks,
        totals,
        best_week,
        consistency,
        improvement,
    }
}

/// Pace in min/km, displayed as minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Pace(pub f32);

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let seconds = (self.0 * 60.0).round().max(0.0) as u32;
        write!(f, "{}:{:02}", seconds / 60, seconds % 60)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    #[display("info")]
    Info,
    #[display("success")]
    Success,
    #[display("warning")]
    Warning,
}

/// Observation about recent runs. The display form is the detail text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Insight {
    NoData,
    PaceImproving { from: Pace, to: Pace },
    PaceDeclining,
    HeartRateEfficiency { drop: u32 },
    Consistency { runs: usize, days: usize },
    LowConsistency { window_days: u32 },
    HighVolume { distance: f32 },
    OptimalVolume { distance: f32 },
}

impl Insight {
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Insight::NoData => "no-data",
            Insight::PaceImproving { .. } => "pace-improving",
            Insight::PaceDeclining => "pace-declining",
            Insight::HeartRateEfficiency { .. } => "hr-efficiency",
            Insight::Consistency { .. } => "consistency",
            Insight::LowConsistency { .. } => "consistency-low",
            Insight::HighVolume { .. } => "high-volume",
            Insight::OptimalVolume { .. } => "optimal-volume",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Insight::NoData => "Start tracking your runs",
            Insight::PaceImproving { .. } => "Pace improving consistently",
            Insight::PaceDeclining => "Pace slowing down",
            Insight::HeartRateEfficiency { .. } => "Heart rate efficiency improving",
            Insight::Consistency { .. } => "Training consistency strong",
            Insight::LowConsistency { .. } => "Time to get back out there",
            Insight::HighVolume { .. } => "High training volume this week",
            Insight::OptimalVolume { .. } => "Training volume in optimal range",
        }
    }

    #[must_use]
    pub fn kind(&self) -> InsightKind {
        match self {
            Insight::NoData | Insight::LowConsistency { .. } => InsightKind::Info,
            Insight::PaceDeclining | Insight::HighVolume { .. } => InsightKind::Warning,
            Insight::PaceImproving { .. }
            | Insight::HeartRateEfficiency { .. }
            | Insight::Consistency { .. }
            | Insight::OptimalVolume { .. } => InsightKind::Success,
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::NoData => write!(
                f,
                "Import your activities or log your first run to get personalized insights."
            ),
            Insight::PaceImproving { from, to } => write!(
                f,
                "Your average pace improved from {from}/km to {to}/km in recent runs."
            ),
            Insight::PaceDeclining => write!(
                f,
                "Recent runs are slower than usual. Consider recovery or check for overtraining."
            ),
            Insight::HeartRateEfficiency { drop } => write!(
                f,
                "Average HR decreased by {drop} bpm at similar pace. Great aerobic adaptation!"
            ),
            Insight::Consistency { runs, days } => {
                write!(f, "{runs} runs in {days} days. Consistency builds fitness!")
            }
            Insight::LowConsistency { window_days } => write!(
                f,
                "Only 1 run in the last {window_days} days. Aim for 3-4 runs per week for steady progress."
            ),
            Insight::HighVolume { distance } => write!(
                f,
                "{distance:.1}km logged. Ensure adequate recovery between runs."
            ),
            Insight::OptimalVolume { distance } => write!(
                f,
                "{distance:.1}km this week provides good fitness stimulus with manageable fatigue."
            ),
        }
    }
}

/// Rule-based observations about the runs of the last `window_days` days.
///
/// Pace, heart rate, consistency and the volume of the current week are
/// checked in this order, at most three insights are returned. Without any
/// run in the window the only insight is [`Insight::NoData`].
#[must_use]
pub fn insights(history: &History, today: NaiveDate, window_days: u32) -> Vec<Insight> {
    let runs = history
        .within(&Interval::trailing_days(today, window_days))
        .runs;

    if runs.is_empty() {
        return vec![Insight::NoData];
    }

    let days = runs.iter().map(|r| r.date).collect::<BTreeSet<_>>().len();
    let consistency = if days >= 3 && runs.len() >= 3 {
        Some(Insight::Consistency {
            runs: runs.len(),
            days,
        })
    } else if runs.len() == 1 {
        Some(Insight::LowConsistency { window_days })
    } else {
        None
    };

    let distance = weekly_stats(history, &Week::containing(today)).total_distance;
    let volume = if distance > HIGH_VOLUME {
        Some(Insight::HighVolume { distance })
    } else if distance >= OPTIMAL_VOLUME {
        Some(Insight::OptimalVolume { distance })
    } else {
        None
    };

    let mut result = [pace_trend(&runs), heart_rate_trend(&runs), consistency, volume]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    result.truncate(MAX_INSIGHTS);

    debug!(
        "insights at {today}: {:?}",
        result.iter().map(Insight::id).collect::<Vec<_>>()
    );

    result
}

/// Compares the average pace of the last three runs with up to three of the
/// oldest runs not among them.
fn pace_trend(runs: &[LoggedRun]) -> Option<Insight> {
    let paces = runs.iter().filter_map(LoggedRun::pace).collect::<Vec<_>>();
    let older_count = PACE_RUNS.min(paces.len().checked_sub(PACE_RUNS)?);
    if older_count == 0 {
        return None;
    }
    let recent = mean(&paces[paces.len() - PACE_RUNS..]);
    let older = mean(&paces[..older_count]);
    let improvement = (older - recent) / older * 100.0;
    if improvement > PACE_IMPROVEMENT {
        Some(Insight::PaceImproving {
            from: Pace(older),
            to: Pace(recent),
        })
    } else if improvement < PACE_DECLINE {
        Some(Insight::PaceDeclining)
    } else {
        None
    }
}

/// Compares the average heart rate of the first and the last two runs.
fn heart_rate_trend(runs: &[LoggedRun]) -> Option<Insight> {
    #[allow(clippy::cast_precision_loss)]
    let heart_rates = runs
        .iter()
        .filter(|r| r.pace().is_some())
        .filter_map(|r| r.avg_hr.filter(|hr| *hr > 0))
        .map(|hr| hr as f32)
        .collect::<Vec<_>>();
    if heart_rates.len() < 2 * HR_RUNS {
        return None;
    }
    let older = mean(&heart_rates[..HR_RUNS]);
    let recent = mean(&heart_rates[heart_rates.len() - HR_RUNS..]);
    if recent >= older - HR_DROP {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let drop = (older - recent).round() as u32;
    Some(Insight::HeartRateEfficiency { drop })
}

fn mean(values: &[f32]) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f32;
    values.iter().sum::<f32>() / n
}
