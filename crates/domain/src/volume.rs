use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::{History, MuscleGroup, Week, classify};

/// Weekly increase above which a warning is raised, in percent.
pub const WARNING_INCREASE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDatum {
    pub muscle_group: MuscleGroup,
    /// Sum of weight × reps in kg, rounded.
    pub volume: u32,
    pub sets: u32,
}

/// Strength volume per muscle group for the given week.
///
/// Groups without volume are omitted. The result is ordered by muscle group.
#[must_use]
pub fn weekly_volume(history: &History, week: &Week) -> Vec<VolumeDatum> {
    let interval = week.interval();
    let mut groups: BTreeMap<MuscleGroup, (f32, u32)> = BTreeMap::new();

    for exercise in history.strength.iter().filter(|e| interval.contains(e.date)) {
        let entry = groups.entry(classify(&exercise.name)).or_default();
        for set in &exercise.sets {
            entry.0 += set.volume();
            entry.1 += 1;
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let result = groups
        .into_iter()
        .map(|(muscle_group, (volume, sets))| VolumeDatum {
            muscle_group,
            volume: volume.round() as u32,
            sets,
        })
        .filter(|d| d.volume > 0)
        .collect::<Vec<_>>();

    debug!(
        "volume of week {}/{}: {} muscle groups",
        week.year(),
        week.number(),
        result.len()
    );

    result
}

#[must_use]
pub fn total_volume(volume: &[VolumeDatum]) -> u32 {
    volume.iter().map(|d| d.volume).sum()
}

/// Relative change from `previous` to `current` in percent, `None` if there is no previous value.
#[must_use]
pub fn percent_change(current: f32, previous: f32) -> Option<f32> {
    if previous > 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

#[must_use]
pub fn weekly_run_distance(history: &History, week: &Week) -> f32 {
    let interval = week.interval();
    history
        .runs
        .iter()
        .filter(|r| interval.contains(r.date))
        .map(|r| r.distance_km)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeWarningKind {
    MuscleGroup(MuscleGroup),
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeWarning {
    pub kind: VolumeWarningKind,
    /// Increase over the previous week in whole percent.
    pub increase: i32,
}

impl fmt::Display for VolumeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VolumeWarningKind::MuscleGroup(group) => write!(
                f,
                "{group} volume increased by {}% (recommended <10%)",
                self.increase
            ),
            VolumeWarningKind::Running => write!(
                f,
                "Running volume increased by {}% (recommended <10% per week)",
                self.increase
            ),
        }
    }
}

/// Week-over-week increases above 10% per muscle group and for running distance.
///
/// Only groups trained in both weeks are compared.
#[must_use]
pub fn volume_warnings(history: &History, week: &Week) -> Vec<VolumeWarning> {
    let Some(previous_week) = week.previous() else {
        return vec![];
    };

    let previous = weekly_volume(history, &previous_week)
        .into_iter()
        .map(|d| (d.muscle_group, d.volume))
        .collect::<BTreeMap<_, _>>();

    #[allow(clippy::cast_precision_loss)]
    let mut warnings = weekly_volume(history, week)
        .into_iter()
        .filter_map(|d| {
            let increase =
                percent_change(d.volume as f32, *previous.get(&d.muscle_group)? as f32)?;
            warning(VolumeWarningKind::MuscleGroup(d.muscle_group), increase)
        })
        .collect::<Vec<_>>();

    let current_distance = weekly_run_distance(history, week);
    if current_distance > 0.0 {
        if let Some(w) = percent_change(
            current_distance,
            weekly_run_distance(history, &previous_week),
        )
        .and_then(|increase| warning(VolumeWarningKind::Running, increase))
        {
            warnings.push(w);
        }
    }

    debug!("found {} volume warnings", warnings.len());

    warnings
}

fn warning(kind: VolumeWarningKind, increase: f32) -> Option<VolumeWarning> {
    if increase <= WARNING_INCREASE {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let increase = increase.round() as i32;
    Some(VolumeWarning { kind, increase })
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{
        LoggedRun, LoggedSet, LoggedStrengthExercise, RPE, Reps, RunSource, Weekday, Weight,
    };

    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn exercise(name: &str, date: NaiveDate, sets: &[(f32, u32)]) -> LoggedStrengthExercise {
        LoggedStrengthExercise {
            name: name.to_string(),
            date,
            day: Weekday::of(date),
            sets: sets
                .iter()
                .map(|(weight, reps)| LoggedSet {
                    weight: Weight::new(*weight).unwrap(),
                    reps: Reps::new(*reps).unwrap(),
                    rpe: Some(RPE::SEVEN),
                    rir: None,
                })
                .collect(),
        }
    }

    fn run(date: NaiveDate, distance_km: f32) -> LoggedRun {
        LoggedRun {
            date,
            day: Weekday::of(date),
            distance_km,
            duration_minutes: distance_km * 6.0,
            avg_hr: None,
            max_hr: None,
            rpe: None,
            source: RunSource::Manual,
        }
    }

    /// Week 2 of 2024 is January 8 to 14.
    fn week_2() -> Week {
        Week::new(2024, 2).unwrap()
    }

    #[test]
    fn test_weekly_volume() {
        let history = History {
            runs: vec![],
            strength: vec![
                exercise("Back Squat", date(1, 8), &[(100.0, 5), (100.0, 5)]),
                exercise("Romanian Deadlift", date(1, 12), &[(80.0, 8)]),
                exercise("Bench Press", date(1, 14), &[(60.0, 10), (60.0, 8)]),
                exercise("Farmer Carry", date(1, 10), &[(40.0, 10)]),
                exercise("Back Squat", date(1, 15), &[(100.0, 5)]),
                exercise("Back Squat", date(1, 7), &[(100.0, 5)]),
            ],
        };
        assert_eq!(
            weekly_volume(&history, &week_2()),
            vec![
                VolumeDatum {
                    muscle_group: MuscleGroup::Legs,
                    volume: 1640,
                    sets: 3
                },
                VolumeDatum {
                    muscle_group: MuscleGroup::Chest,
                    volume: 1080,
                    sets: 2
                },
                VolumeDatum {
                    muscle_group: MuscleGroup::Other,
                    volume: 400,
                    sets: 1
                },
            ]
        );
    }

    #[test]
    fn test_weekly_volume_omits_groups_without_volume() {
        let history = History {
            runs: vec![],
            strength: vec![
                exercise("Plank", date(1, 9), &[]),
                exercise("Pull-up", date(1, 9), &[(0.0, 10)]),
            ],
        };
        assert_eq!(weekly_volume(&history, &week_2()), vec![]);
        assert_eq!(weekly_volume(&History::default(), &week_2()), vec![]);
    }

    #[test]
    fn test_weekly_volume_is_idempotent() {
        let history = History {
            runs: vec![],
            strength: vec![
                exercise("Barbell Row", date(1, 9), &[(70.0, 8), (70.0, 8)]),
                exercise("Hammer Curl", date(1, 11), &[(16.0, 12)]),
            ],
        };
        assert_eq!(
            weekly_volume(&history, &week_2()),
            weekly_volume(&history, &week_2())
        );
    }

    #[test]
    fn test_total_volume() {
        assert_eq!(total_volume(&[]), 0);
        assert_eq!(
            total_volume(&[
                VolumeDatum {
                    muscle_group: MuscleGroup::Legs,
                    volume: 1000,
                    sets: 2
                },
                VolumeDatum {
                    muscle_group: MuscleGroup::Arms,
                    volume: 250,
                    sets: 1
                }
            ]),
            1250
        );
    }

    #[rstest]
    #[case(110.0, 100.0, Some(10.0))]
    #[case(80.0, 100.0, Some(-20.0))]
    #[case(80.0, 0.0, None)]
    fn test_percent_change(
        #[case] current: f32,
        #[case] previous: f32,
        #[case] expected: Option<f32>,
    ) {
        match (percent_change(current, previous), expected) {
            (Some(change), Some(expected)) => assert_approx_eq!(change, expected),
            (change, expected) => assert_eq!(change, expected),
        }
    }

    #[test]
    fn test_volume_warnings() {
        let history = History {
            runs: vec![
                run(date(1, 2), 10.0),
                run(date(1, 4), 10.0),
                run(date(1, 9), 12.0),
                run(date(1, 13), 12.0),
            ],
            strength: vec![
                exercise("Back Squat", date(1, 2), &[(100.0, 10)]),
                exercise("Back Squat", date(1, 9), &[(100.0, 12)]),
                exercise("Bench Press", date(1, 2), &[(50.0, 10)]),
                exercise("Bench Press", date(1, 9), &[(50.0, 10)]),
                exercise("Barbell Row", date(1, 9), &[(60.0, 10)]),
            ],
        };
        let warnings = volume_warnings(&history, &week_2());
        assert_eq!(
            warnings,
            vec![
                VolumeWarning {
                    kind: VolumeWarningKind::MuscleGroup(MuscleGroup::Legs),
                    increase: 20
                },
                VolumeWarning {
                    kind: VolumeWarningKind::Running,
                    increase: 20
                },
            ]
        );
        assert_eq!(
            warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![
                "Legs volume increased by 20% (recommended <10%)",
                "Running volume increased by 20% (recommended <10% per week)"
            ]
        );
    }

    #[test]
    fn test_volume_warnings_without_history() {
        assert_eq!(volume_warnings(&History::default(), &week_2()), vec![]);
    }
}
