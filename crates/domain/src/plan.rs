use chrono::NaiveDate;
use derive_more::Display;
use log::debug;

use crate::{AthleteProfile, PriorLoad, RPE, Weekday};

/// Readiness assumed when adjusting a plan for an athlete without a readiness score.
pub const DEFAULT_READINESS: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAssignment {
    Run,
    Strength,
    RunAndStrength,
    Rest,
}

impl DayAssignment {
    #[must_use]
    pub fn has_run(self) -> bool {
        matches!(self, DayAssignment::Run | DayAssignment::RunAndStrength)
    }

    #[must_use]
    pub fn has_strength(self) -> bool {
        matches!(self, DayAssignment::Strength | DayAssignment::RunAndStrength)
    }
}

/// The fixed weekly cadence. Plans only vary in magnitudes, never in this table.
pub const CADENCE: [(Weekday, DayAssignment); 7] = [
    (Weekday::Monday, DayAssignment::Run),
    (Weekday::Tuesday, DayAssignment::Strength),
    (Weekday::Wednesday, DayAssignment::Run),
    (Weekday::Thursday, DayAssignment::Strength),
    (Weekday::Friday, DayAssignment::RunAndStrength),
    (Weekday::Saturday, DayAssignment::Rest),
    (Weekday::Sunday, DayAssignment::Run),
];

#[must_use]
pub fn assignment(day: Weekday) -> DayAssignment {
    CADENCE
        .iter()
        .find(|(d, _)| *d == day)
        .map_or(DayAssignment::Rest, |(_, a)| *a)
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum IntensityZone {
    #[display("easy")]
    Easy,
    #[display("tempo")]
    Tempo,
    #[display("long")]
    Long,
}

impl IntensityZone {
    /// Run zone of a run day. Friday repeats the easy run of Monday.
    fn of(day: Weekday) -> Self {
        match day {
            Weekday::Wednesday => IntensityZone::Tempo,
            Weekday::Sunday => IntensityZone::Long,
            _ => IntensityZone::Easy,
        }
    }

    /// Minimum duration in minutes.
    #[must_use]
    pub fn floor(self) -> u32 {
        match self {
            IntensityZone::Easy => 30,
            IntensityZone::Tempo => 35,
            IntensityZone::Long => 60,
        }
    }

    #[must_use]
    pub fn target_rpe(self) -> RPE {
        match self {
            IntensityZone::Easy => RPE::SIX,
            IntensityZone::Tempo | IntensityZone::Long => RPE::SEVEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunPrescription {
    pub day: Weekday,
    pub duration_minutes: u32,
    pub intensity: IntensityZone,
    pub target_rpe: RPE,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthExerciseBlock {
    pub name: &'static str,
    pub sets: &'static str,
    pub tempo: &'static str,
    pub rest: &'static str,
    pub target: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthPrescription {
    pub day: Weekday,
    pub exercises: Vec<StrengthExerciseBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyPlan {
    pub start: NaiveDate,
    pub runs: Vec<RunPrescription>,
    pub strength: Vec<StrengthPrescription>,
}

impl WeeklyPlan {
    /// The seven training days, Monday first.
    #[must_use]
    pub fn structure(&self) -> [Weekday; 7] {
        CADENCE.map(|(day, _)| day)
    }

    #[must_use]
    pub fn assignments(&self) -> [(Weekday, DayAssignment); 7] {
        CADENCE
    }

    #[must_use]
    pub fn run(&self, day: Weekday) -> Option<&RunPrescription> {
        self.runs.iter().find(|r| r.day == day)
    }

    #[must_use]
    pub fn strength(&self, day: Weekday) -> Option<&StrengthPrescription> {
        self.strength.iter().find(|s| s.day == day)
    }
}

/// Factor applied to the prior load. The first matching rule wins.
#[must_use]
pub fn progression_multiplier(readiness: Option<f32>, high_rpe_count: u32) -> f32 {
    if readiness.is_some_and(|r| r < 0.4) {
        0.90
    } else if high_rpe_count > 2 {
        0.92
    } else if readiness.is_some_and(|r| r > 0.75) && high_rpe_count == 0 {
        1.06
    } else {
        1.02
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BaseDurations {
    easy: u32,
    tempo: u32,
    long: u32,
}

impl BaseDurations {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn new(multiplier: f32, prior: &PriorLoad) -> Self {
        let minutes = |value: f32| value.round().max(0.0) as u32;
        Self {
            easy: minutes(prior.average_run_minutes * multiplier),
            tempo: minutes((prior.average_run_minutes + 10.0) * multiplier),
            long: minutes(prior.long_run_minutes * multiplier + 10.0),
        }
    }

    fn of(self, zone: IntensityZone) -> u32 {
        match zone {
            IntensityZone::Easy => self.easy,
            IntensityZone::Tempo => self.tempo,
            IntensityZone::Long => self.long,
        }
    }
}

fn run_prescription(
    day: Weekday,
    base: BaseDurations,
    profile: &AthleteProfile,
) -> RunPrescription {
    let intensity = IntensityZone::of(day);
    let notes = match intensity {
        IntensityZone::Easy => {
            String::from("Easy aerobic, nose-breathing pace. No swapping days allowed.")
        }
        IntensityZone::Tempo => format!(
            "Tempo around threshold pace ({:.2} min/km).",
            profile.threshold_pace
        ),
        IntensityZone::Long => String::from("Long run, steady. Slight negative split allowed."),
    };
    RunPrescription {
        day,
        duration_minutes: base.of(intensity).max(intensity.floor()),
        intensity,
        target_rpe: intensity.target_rpe(),
        notes: Some(notes),
    }
}

/// Fixed strength template. Friday caps the effort ahead of the Sunday long run.
fn strength_prescription(day: Weekday) -> StrengthPrescription {
    let double_day = day == Weekday::Friday;
    StrengthPrescription {
        day,
        exercises: vec![
            StrengthExerciseBlock {
                name: "Back Squat",
                sets: if double_day { "3×6" } else { "4×6–8" },
                tempo: "Tempo 3-1-1",
                rest: "Rest 120s",
                target: if double_day {
                    "RPE 6 cap (double day)"
                } else {
                    "RPE 7"
                },
            },
            StrengthExerciseBlock {
                name: "Bench Press",
                sets: "3×8–10",
                tempo: "Tempo 2-1-1",
                rest: "Rest 90s",
                target: "RPE 7",
            },
            StrengthExerciseBlock {
                name: "Romanian Deadlift",
                sets: "3×8–10",
                tempo: "Tempo 3-1-1",
                rest: "Rest 120s",
                target: if double_day {
                    "RPE 6 (fatigue-managed)"
                } else {
                    "RPE 7"
                },
            },
        ],
    }
}

/// Prescribe the week starting at `start`.
///
/// Without a prior load the defaults of [`PriorLoad::DEFAULT`] apply.
#[must_use]
pub fn generate_weekly_plan(
    profile: &AthleteProfile,
    prior: Option<&PriorLoad>,
    start: NaiveDate,
) -> WeeklyPlan {
    let prior = prior.copied().unwrap_or_default();
    let multiplier = progression_multiplier(profile.readiness, prior.high_rpe_count);
    let base = BaseDurations::new(multiplier, &prior);

    debug!(
        "plan for athlete {} starting {start}: multiplier {multiplier}, {base:?}",
        profile.id
    );

    WeeklyPlan {
        start,
        runs: CADENCE
            .iter()
            .filter(|(_, a)| a.has_run())
            .map(|(day, _)| run_prescription(*day, base, profile))
            .collect(),
        strength: CADENCE
            .iter()
            .filter(|(_, a)| a.has_strength())
            .map(|(day, _)| strength_prescription(*day))
            .collect(),
    }
}

/// Prescribe the next week from the RPEs of recent sessions.
///
/// The high RPE count of `prior` is replaced by the count in `recent_rpe`.
#[must_use]
pub fn adjust_next_week(
    profile: &AthleteProfile,
    recent_rpe: &[RPE],
    prior: &PriorLoad,
    start: NaiveDate,
) -> WeeklyPlan {
    #[allow(clippy::cast_possible_truncation)]
    let prior = PriorLoad {
        high_rpe_count: recent_rpe.iter().filter(|rpe| rpe.is_high()).count() as u32,
        ..*prior
    };
    let profile = AthleteProfile {
        readiness: Some(profile.readiness.unwrap_or(DEFAULT_READINESS)),
        ..profile.clone()
    };
    generate_weekly_plan(&profile, Some(&prior), start)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::AthleteID;

    use super::*;

    fn profile(readiness: Option<f32>) -> AthleteProfile {
        AthleteProfile {
            id: AthleteID::from(1),
            threshold_pace: 4.5,
            threshold_hr: Some(172),
            readiness,
            recent_rpe_average: None,
        }
    }

    fn prior(average_run_minutes: f32, long_run_minutes: f32, high_rpe_count: u32) -> PriorLoad {
        PriorLoad {
            average_run_minutes,
            long_run_minutes,
            high_rpe_count,
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    #[rstest]
    #[case::deload(Some(0.3), 0, 0.90)]
    #[case::deload_before_fatigue(Some(0.3), 5, 0.90)]
    #[case::fatigue(Some(0.6), 3, 0.92)]
    #[case::fatigue_before_progress(Some(0.9), 3, 0.92)]
    #[case::progress(Some(0.8), 0, 1.06)]
    #[case::default(Some(0.6), 1, 1.02)]
    #[case::high_readiness_with_high_rpe(Some(0.8), 1, 1.02)]
    #[case::no_readiness(None, 0, 1.02)]
    #[case::out_of_range_readiness(Some(-1.0), 0, 0.90)]
    fn test_progression_multiplier(
        #[case] readiness: Option<f32>,
        #[case] high_rpe_count: u32,
        #[case] expected: f32,
    ) {
        assert_eq!(progression_multiplier(readiness, high_rpe_count), expected);
    }

    #[rstest]
    #[case::no_readiness(None, None)]
    #[case::low_readiness(Some(0.1), Some(prior(20.0, 30.0, 0)))]
    #[case::high_readiness(Some(1.0), Some(prior(90.0, 180.0, 0)))]
    #[case::fatigued(Some(0.7), Some(prior(40.0, 70.0, 6)))]
    #[case::out_of_range(Some(7.0), Some(prior(0.0, 0.0, 0)))]
    fn test_generate_weekly_plan_keeps_cadence(
        #[case] readiness: Option<f32>,
        #[case] prior: Option<PriorLoad>,
    ) {
        let plan = generate_weekly_plan(&profile(readiness), prior.as_ref(), monday());
        assert_eq!(
            plan.runs.iter().map(|r| r.day).collect::<Vec<_>>(),
            vec![
                Weekday::Monday,
                Weekday::Wednesday,
                Weekday::Friday,
                Weekday::Sunday
            ]
        );
        assert_eq!(
            plan.strength.iter().map(|s| s.day).collect::<Vec<_>>(),
            vec![Weekday::Tuesday, Weekday::Thursday, Weekday::Friday]
        );
        assert_eq!(plan.run(Weekday::Saturday), None);
        assert_eq!(plan.strength(Weekday::Saturday), None);
        assert_eq!(plan.structure().to_vec(), Weekday::iter().copied().collect::<Vec<_>>());
        for run in &plan.runs {
            assert!(run.duration_minutes >= run.intensity.floor());
        }
    }

    #[test]
    fn test_cadence() {
        assert_eq!(
            Weekday::iter().map(|d| assignment(*d)).collect::<Vec<_>>(),
            vec![
                DayAssignment::Run,
                DayAssignment::Strength,
                DayAssignment::Run,
                DayAssignment::Strength,
                DayAssignment::RunAndStrength,
                DayAssignment::Rest,
                DayAssignment::Run,
            ]
        );
    }

    #[test]
    fn test_generate_weekly_plan_durations() {
        let plan = generate_weekly_plan(
            &profile(Some(0.8)),
            Some(&prior(40.0, 70.0, 0)),
            monday(),
        );
        assert_eq!(plan.start, monday());
        assert_eq!(
            plan.runs
                .iter()
                .map(|r| (r.day, r.duration_minutes, r.intensity, r.target_rpe))
                .collect::<Vec<_>>(),
            vec![
                (Weekday::Monday, 42, IntensityZone::Easy, RPE::SIX),
                (Weekday::Wednesday, 53, IntensityZone::Tempo, RPE::SEVEN),
                (Weekday::Friday, 42, IntensityZone::Easy, RPE::SIX),
                (Weekday::Sunday, 84, IntensityZone::Long, RPE::SEVEN),
            ]
        );
        assert_eq!(
            plan.run(Weekday::Wednesday).unwrap().notes.as_deref(),
            Some("Tempo around threshold pace (4.50 min/km).")
        );
    }

    #[test]
    fn test_generate_weekly_plan_without_prior_load() {
        assert_eq!(
            generate_weekly_plan(&profile(None), None, monday()),
            generate_weekly_plan(&profile(None), Some(&PriorLoad::DEFAULT), monday())
        );
    }

    #[test]
    fn test_generate_weekly_plan_floors() {
        let plan = generate_weekly_plan(&profile(Some(0.2)), Some(&prior(10.0, 20.0, 0)), monday());
        assert_eq!(
            plan.runs
                .iter()
                .map(|r| r.duration_minutes)
                .collect::<Vec<_>>(),
            vec![30, 35, 30, 60]
        );
    }

    #[test]
    fn test_generate_weekly_plan_friday_strength() {
        let plan = generate_weekly_plan(&profile(None), None, monday());
        let targets = |day| {
            plan.strength(day)
                .unwrap()
                .exercises
                .iter()
                .map(|e| (e.name, e.target))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            targets(Weekday::Tuesday),
            vec![
                ("Back Squat", "RPE 7"),
                ("Bench Press", "RPE 7"),
                ("Romanian Deadlift", "RPE 7")
            ]
        );
        assert_eq!(targets(Weekday::Thursday), targets(Weekday::Tuesday));
        assert_eq!(
            targets(Weekday::Friday),
            vec![
                ("Back Squat", "RPE 6 cap (double day)"),
                ("Bench Press", "RPE 7"),
                ("Romanian Deadlift", "RPE 6 (fatigue-managed)")
            ]
        );
        assert_eq!(plan.strength(Weekday::Friday).unwrap().exercises[0].sets, "3×6");
    }

    #[test]
    fn test_generate_weekly_plan_is_idempotent() {
        let prior_load = prior(45.0, 95.0, 1);
        assert_eq!(
            generate_weekly_plan(&profile(Some(0.5)), Some(&prior_load), monday()),
            generate_weekly_plan(&profile(Some(0.5)), Some(&prior_load), monday())
        );
    }

    #[test]
    fn test_adjust_next_week() {
        let plan = adjust_next_week(
            &profile(None),
            &[RPE::EIGHT, RPE::NINE, RPE::TEN, RPE::SEVEN],
            &prior(40.0, 70.0, 0),
            monday(),
        );
        // three high RPEs back off to 0.92
        assert_eq!(plan.run(Weekday::Monday).unwrap().duration_minutes, 37);
        assert_eq!(plan.run(Weekday::Sunday).unwrap().duration_minutes, 74);

        let plan = adjust_next_week(&profile(None), &[RPE::SEVEN], &prior(40.0, 70.0, 5), monday());
        assert_eq!(plan.run(Weekday::Monday).unwrap().duration_minutes, 41);
    }
}
