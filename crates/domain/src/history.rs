use chrono::NaiveDate;
use derive_more::Display;

use crate::{AthleteID, Interval, RIR, RPE, ReadError, Reps, Weekday, Weight};

/// Read-only access to logged training history.
#[allow(async_fn_in_trait)]
pub trait HistoryRepository {
    /// All runs and strength exercises of `athlete` dated within `interval`.
    async fn read_history(&self, athlete: AthleteID, interval: Interval)
    -> Result<History, ReadError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub runs: Vec<LoggedRun>,
    pub strength: Vec<LoggedStrengthExercise>,
}

impl History {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.strength.is_empty()
    }

    /// The part of the history dated within `interval`, each list ordered by date.
    #[must_use]
    pub fn within(&self, interval: &Interval) -> History {
        let mut runs = self
            .runs
            .iter()
            .filter(|r| interval.contains(r.date))
            .cloned()
            .collect::<Vec<_>>();
        runs.sort_by_key(|r| r.date);
        let mut strength = self
            .strength
            .iter()
            .filter(|e| interval.contains(e.date))
            .cloned()
            .collect::<Vec<_>>();
        strength.sort_by_key(|e| e.date);
        History { runs, strength }
    }
}

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunSource {
    #[default]
    #[display("manual")]
    Manual,
    #[display("imported")]
    Imported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRun {
    pub date: NaiveDate,
    pub day: Weekday,
    pub distance_km: f32,
    pub duration_minutes: f32,
    pub avg_hr: Option<u32>,
    pub max_hr: Option<u32>,
    pub rpe: Option<RPE>,
    pub source: RunSource,
}

impl LoggedRun {
    /// Pace in min/km, `None` for runs without distance or duration.
    #[must_use]
    pub fn pace(&self) -> Option<f32> {
        if self.distance_km > 0.0 && self.duration_minutes > 0.0 {
            Some(self.duration_minutes / self.distance_km)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedSet {
    pub weight: Weight,
    pub reps: Reps,
    pub rpe: Option<RPE>,
    pub rir: Option<RIR>,
}

impl LoggedSet {
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.weight * self.reps
    }

    /// The logged RPE, or the RPE implied by the logged RIR.
    #[must_use]
    pub fn effort(&self) -> Option<RPE> {
        self.rpe.or_else(|| self.rir.map(RPE::from))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedStrengthExercise {
    pub name: String,
    pub date: NaiveDate,
    pub day: Weekday,
    pub sets: Vec<LoggedSet>,
}

impl LoggedStrengthExercise {
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.sets.iter().map(LoggedSet::volume).sum()
    }

    #[must_use]
    pub fn logged_rpe(&self) -> Vec<RPE> {
        self.sets.iter().filter_map(|s| s.rpe).collect()
    }

    #[must_use]
    pub fn avg_effort(&self) -> Option<f32> {
        RPE::avg(
            &self
                .sets
                .iter()
                .filter_map(LoggedSet::effort)
                .collect::<Vec<_>>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn run(date: NaiveDate, distance_km: f32, duration_minutes: f32) -> LoggedRun {
        LoggedRun {
            date,
            day: Weekday::of(date),
            distance_km,
            duration_minutes,
            avg_hr: None,
            max_hr: None,
            rpe: None,
            source: RunSource::Manual,
        }
    }

    fn set(weight: f32, reps: u32, rpe: Option<RPE>, rir: Option<RIR>) -> LoggedSet {
        LoggedSet {
            weight: Weight::new(weight).unwrap(),
            reps: Reps::new(reps).unwrap(),
            rpe,
            rir,
        }
    }

    #[rstest]
    #[case(10.0, 50.0, Some(5.0))]
    #[case(0.0, 50.0, None)]
    #[case(10.0, 0.0, None)]
    fn test_logged_run_pace(
        #[case] distance_km: f32,
        #[case] duration_minutes: f32,
        #[case] expected: Option<f32>,
    ) {
        assert_eq!(run(date(1), distance_km, duration_minutes).pace(), expected);
    }

    #[test]
    fn test_logged_strength_exercise_volume() {
        let exercise = LoggedStrengthExercise {
            name: String::from("Back Squat"),
            date: date(2),
            day: Weekday::Tuesday,
            sets: vec![
                set(100.0, 5, Some(RPE::EIGHT), None),
                set(100.0, 5, None, Some(RIR::new(1.0).unwrap())),
                set(80.0, 8, None, None),
            ],
        };
        assert_approx_eq!(exercise.volume(), 1640.0);
        assert_eq!(exercise.logged_rpe(), vec![RPE::EIGHT]);
        assert_approx_eq!(exercise.avg_effort().unwrap(), 8.5);
    }

    #[test]
    fn test_logged_strength_exercise_without_sets() {
        let exercise = LoggedStrengthExercise {
            name: String::from("Plank"),
            date: date(2),
            day: Weekday::Tuesday,
            sets: vec![],
        };
        assert_approx_eq!(exercise.volume(), 0.0);
        assert_eq!(exercise.avg_effort(), None);
    }

    #[test]
    fn test_history_within() {
        let history = History {
            runs: vec![run(date(9), 5.0, 30.0), run(date(3), 5.0, 30.0), run(date(1), 5.0, 30.0)],
            strength: vec![],
        };
        let interval = Interval {
            start: date(2),
            end: date(9),
        };
        assert_eq!(history.within(&interval).runs, vec![run(date(3), 5.0, 30.0)]);
        assert!(!history.is_empty());
        assert!(History::default().is_empty());
    }
}
