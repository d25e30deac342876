use derive_more::Display;
use log::debug;

use crate::{History, RPE, Week, percent_change, total_volume, weekly_volume};

/// Intensity assumed for a week without any logged RPE.
pub const NEUTRAL_RPE: f32 = 7.0;
/// Number of weeks, including the current one, considered for consistency.
pub const CONSISTENCY_WEEKS: usize = 4;
pub const BASELINE_SCORE: i32 = 5;

/// Source of the recovery quality factor in percent.
pub trait RecoveryQualityProvider {
    fn recovery_quality(&self, week: &Week) -> f32;
}

/// Serves the same recovery quality for every week.
///
/// Stands in until a biometric feed (sleep, HRV) is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRecoveryQuality(pub f32);

impl ConstantRecoveryQuality {
    pub const DEFAULT: ConstantRecoveryQuality = ConstantRecoveryQuality(70.0);
}

impl Default for ConstantRecoveryQuality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RecoveryQualityProvider for ConstantRecoveryQuality {
    fn recovery_quality(&self, _: &Week) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverloadFactors {
    /// Change of total strength volume against the previous week in percent.
    pub volume_increase: f32,
    /// Change of average logged RPE against the previous week in percent.
    pub intensity_increase: f32,
    /// Share of the last four weeks with any strength volume in percent.
    pub frequency_consistency: f32,
    pub recovery_quality: f32,
}

/// Derive the overload factors of `week` from the logged history.
///
/// Weeks without volume or RPE yield neutral factors instead of errors.
#[must_use]
pub fn compute_factors(
    history: &History,
    week: &Week,
    recovery: &impl RecoveryQualityProvider,
) -> OverloadFactors {
    let current_rpe = average_rpe(history, week).unwrap_or(NEUTRAL_RPE);
    let previous_rpe = week
        .calendar_previous()
        .and_then(|w| average_rpe(history, &w))
        .unwrap_or(NEUTRAL_RPE);
    let intensity_increase = percent_change(current_rpe, previous_rpe).unwrap_or(0.0);

    let active_weeks = week
        .trailing(CONSISTENCY_WEEKS)
        .iter()
        .filter(|w| total_volume(&weekly_volume(history, w)) > 0)
        .count();
    #[allow(clippy::cast_precision_loss)]
    let frequency_consistency = (active_weeks as f32 / CONSISTENCY_WEEKS as f32 * 100.0).round();

    let factors = OverloadFactors {
        volume_increase: volume_increase(history, week),
        intensity_increase: round_to_tenth(intensity_increase),
        frequency_consistency,
        recovery_quality: recovery.recovery_quality(week),
    };

    debug!(
        "overload factors of week {}/{}: {factors:?}",
        week.year(),
        week.number()
    );

    factors
}

/// Change of total strength volume against the previous week in percent.
///
/// Zero if the previous week has no volume.
#[must_use]
pub fn volume_increase(history: &History, week: &Week) -> f32 {
    let current = total_volume(&weekly_volume(history, week));
    let previous = week
        .previous()
        .map_or(0, |w| total_volume(&weekly_volume(history, &w)));
    #[allow(clippy::cast_precision_loss)]
    round_to_tenth(percent_change(current as f32, previous as f32).unwrap_or(0.0))
}

fn average_rpe(history: &History, week: &Week) -> Option<f32> {
    let interval = week.interval();
    RPE::avg(
        &history
            .strength
            .iter()
            .filter(|e| interval.contains(e.date))
            .flat_map(|e| e.logged_rpe())
            .collect::<Vec<_>>(),
    )
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rating {
    #[display("Needs Attention")]
    NeedsAttention,
    Moderate,
    Good,
    Excellent,
}

impl Rating {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            8.. => Rating::Excellent,
            6..=7 => Rating::Good,
            4..=5 => Rating::Moderate,
            _ => Rating::NeedsAttention,
        }
    }

    /// Recommendations given for every score of this rating.
    #[must_use]
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            Rating::Excellent => &[
                "Maintain current progression rate",
                "Continue tracking recovery metrics",
            ],
            Rating::Good => &["Steady progress - keep it up"],
            Rating::Moderate => &["Progress is conservative"],
            Rating::NeedsAttention => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadScore {
    pub score: u8,
    pub rating: Rating,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A threshold crossing of one factor.
///
/// `score` is added whenever the threshold is crossed. The texts are only
/// reported if the resulting rating equals `rating`.
struct Threshold {
    crossed: fn(&OverloadFactors) -> bool,
    score: i32,
    rating: Option<Rating>,
    risk: Option<&'static str>,
    recommendation: Option<&'static str>,
}

impl Threshold {
    const fn score(crossed: fn(&OverloadFactors) -> bool, score: i32) -> Self {
        Self {
            crossed,
            score,
            rating: None,
            risk: None,
            recommendation: None,
        }
    }
}

/// Evaluated in order; texts are reported in the same order.
const THRESHOLDS: &[Threshold] = &[
    Threshold::score(|f| (5.0..=10.0).contains(&f.volume_increase), 2),
    Threshold::score(|f| f.volume_increase > 10.0 && f.volume_increase <= 15.0, 1),
    Threshold {
        crossed: |f| f.volume_increase > 20.0,
        score: -2,
        rating: Some(Rating::NeedsAttention),
        risk: Some("Volume increase too aggressive - risk of overtraining"),
        recommendation: Some("Reduce volume by 10-15%"),
    },
    Threshold::score(|f| f.volume_increase < 0.0, -1),
    Threshold::score(|f| (2.0..=5.0).contains(&f.intensity_increase), 1),
    Threshold::score(|f| f.intensity_increase > 10.0, -1),
    Threshold::score(|f| f.frequency_consistency >= 80.0, 1),
    Threshold::score(|f| f.frequency_consistency < 60.0, -1),
    Threshold::score(|f| f.recovery_quality >= 70.0, 1),
    Threshold {
        crossed: |f| f.recovery_quality < 50.0,
        score: -2,
        rating: Some(Rating::NeedsAttention),
        risk: Some("Poor recovery quality detected"),
        recommendation: Some("Add extra rest day or deload week"),
    },
    Threshold {
        crossed: |f| f.volume_increase < 5.0,
        score: 0,
        rating: Some(Rating::Good),
        risk: None,
        recommendation: Some("Consider slight volume increase (5-10%)"),
    },
    Threshold {
        crossed: |f| f.volume_increase < 2.0,
        score: 0,
        rating: Some(Rating::Moderate),
        risk: None,
        recommendation: Some("Increase training volume gradually"),
    },
    Threshold {
        crossed: |f| f.frequency_consistency < 70.0,
        score: 0,
        rating: Some(Rating::Moderate),
        risk: None,
        recommendation: Some("Improve training consistency"),
    },
    Threshold {
        crossed: |f| f.volume_increase < -10.0,
        score: 0,
        rating: Some(Rating::NeedsAttention),
        risk: Some("Significant volume decrease - may lose adaptations"),
        recommendation: Some("Gradually rebuild training volume"),
    },
];

/// Rate the factors on a scale from 1 to 10 and explain the rating.
#[must_use]
pub fn score(factors: &OverloadFactors) -> OverloadScore {
    let crossed = THRESHOLDS
        .iter()
        .filter(|t| (t.crossed)(factors))
        .collect::<Vec<_>>();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = (BASELINE_SCORE + crossed.iter().map(|t| t.score).sum::<i32>()).clamp(1, 10) as u8;
    let rating = Rating::from_score(score);

    let explained = crossed
        .iter()
        .filter(|t| t.rating == Some(rating))
        .collect::<Vec<_>>();
    let risks = explained
        .iter()
        .filter_map(|t| t.risk)
        .map(String::from)
        .collect();
    let recommendations = rating
        .recommendations()
        .iter()
        .copied()
        .chain(explained.iter().filter_map(|t| t.recommendation))
        .map(String::from)
        .collect();

    debug!("overload score {score} ({rating})");

    OverloadScore {
        score,
        rating,
        risks,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{LoggedSet, LoggedStrengthExercise, Reps, Weekday, Weight};

    use super::*;

    fn factors(volume: f32, intensity: f32, frequency: f32, recovery: f32) -> OverloadFactors {
        OverloadFactors {
            volume_increase: volume,
            intensity_increase: intensity,
            frequency_consistency: frequency,
            recovery_quality: recovery,
        }
    }

    fn exercise(date: NaiveDate, weight: f32, rpe: Option<RPE>) -> LoggedStrengthExercise {
        LoggedStrengthExercise {
            name: String::from("Back Squat"),
            date,
            day: Weekday::of(date),
            sets: vec![LoggedSet {
                weight: Weight::new(weight).unwrap(),
                reps: Reps::new(10).unwrap(),
                rpe,
                rir: None,
            }],
        }
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_score_excellent() {
        assert_eq!(
            score(&factors(7.0, 3.0, 85.0, 75.0)),
            OverloadScore {
                score: 10,
                rating: Rating::Excellent,
                risks: vec![],
                recommendations: vec![
                    String::from("Maintain current progression rate"),
                    String::from("Continue tracking recovery metrics"),
                ],
            }
        );
    }

    #[test]
    fn test_score_needs_attention() {
        let result = score(&factors(25.0, 0.0, 40.0, 40.0));
        assert!(result.score <= 2);
        assert_eq!(result.score, 1);
        assert_eq!(result.rating, Rating::NeedsAttention);
        assert_eq!(
            result.risks,
            vec![
                String::from("Volume increase too aggressive - risk of overtraining"),
                String::from("Poor recovery quality detected"),
            ]
        );
        assert_eq!(
            result.recommendations,
            vec![
                String::from("Reduce volume by 10-15%"),
                String::from("Add extra rest day or deload week"),
            ]
        );
    }

    #[test]
    fn test_score_needs_attention_volume_decrease() {
        let result = score(&factors(-30.0, 15.0, 25.0, 45.0));
        assert_eq!(result.score, 1);
        assert_eq!(
            result.risks,
            vec![
                String::from("Poor recovery quality detected"),
                String::from("Significant volume decrease - may lose adaptations"),
            ]
        );
    }

    #[test]
    fn test_score_good() {
        assert_eq!(
            score(&factors(0.0, 0.0, 100.0, 70.0)),
            OverloadScore {
                score: 7,
                rating: Rating::Good,
                risks: vec![],
                recommendations: vec![
                    String::from("Steady progress - keep it up"),
                    String::from("Consider slight volume increase (5-10%)"),
                ],
            }
        );
    }

    #[test]
    fn test_score_moderate() {
        assert_eq!(
            score(&factors(-5.0, 0.0, 50.0, 70.0)),
            OverloadScore {
                score: 4,
                rating: Rating::Moderate,
                risks: vec![],
                recommendations: vec![
                    String::from("Progress is conservative"),
                    String::from("Increase training volume gradually"),
                    String::from("Improve training consistency"),
                ],
            }
        );
    }

    #[rstest]
    #[case::volume_lower_bound(5.0, 8)]
    #[case::volume_upper_bound(10.0, 8)]
    #[case::volume_moderate(12.5, 7)]
    #[case::volume_gap(17.0, 6)]
    #[case::volume_aggressive(20.1, 4)]
    #[case::volume_decrease(-0.1, 5)]
    fn test_score_volume_thresholds(#[case] volume: f32, #[case] expected: u8) {
        assert_eq!(score(&factors(volume, 0.0, 70.0, 70.0)).score, expected);
    }

    #[rstest]
    #[case(10, Rating::Excellent)]
    #[case(8, Rating::Excellent)]
    #[case(7, Rating::Good)]
    #[case(6, Rating::Good)]
    #[case(5, Rating::Moderate)]
    #[case(4, Rating::Moderate)]
    #[case(3, Rating::NeedsAttention)]
    #[case(1, Rating::NeedsAttention)]
    fn test_rating_from_score(#[case] score: u8, #[case] expected: Rating) {
        assert_eq!(Rating::from_score(score), expected);
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::NeedsAttention.to_string(), "Needs Attention");
        assert_eq!(Rating::Excellent.to_string(), "Excellent");
    }

    #[test]
    fn test_compute_factors() {
        let history = History {
            runs: vec![],
            strength: vec![
                exercise(date(1, 2), 100.0, Some(RPE::SEVEN)),
                exercise(date(1, 9), 110.0, Some(RPE::new(7.5).unwrap())),
                exercise(date(1, 10), 0.0, None),
            ],
        };
        let week = Week::new(2024, 2).unwrap();
        let result = compute_factors(&history, &week, &ConstantRecoveryQuality::default());
        assert_approx_eq!(result.volume_increase, 10.0);
        assert_approx_eq!(result.intensity_increase, 7.1);
        assert_approx_eq!(result.frequency_consistency, 50.0);
        assert_approx_eq!(result.recovery_quality, 70.0);
    }

    #[test]
    fn test_compute_factors_across_year_boundary() {
        let history = History {
            runs: vec![],
            strength: vec![
                exercise(NaiveDate::from_ymd_opt(2023, 12, 26).unwrap(), 100.0, None),
                exercise(date(1, 3), 80.0, None),
            ],
        };
        let week = Week::new(2024, 1).unwrap();
        let result = compute_factors(&history, &week, &ConstantRecoveryQuality(55.0));
        assert_approx_eq!(result.volume_increase, -20.0);
        assert_approx_eq!(result.intensity_increase, 0.0);
        assert_approx_eq!(result.frequency_consistency, 50.0);
        assert_approx_eq!(result.recovery_quality, 55.0);
    }

    #[test]
    fn test_compute_factors_after_year_with_53_weeks() {
        let history = History {
            runs: vec![],
            strength: vec![
                exercise(
                    NaiveDate::from_ymd_opt(2020, 12, 30).unwrap(),
                    100.0,
                    Some(RPE::NINE),
                ),
                exercise(
                    NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
                    100.0,
                    Some(RPE::SEVEN),
                ),
            ],
        };
        let week = Week::new(2021, 1).unwrap();
        let result = compute_factors(&history, &week, &ConstantRecoveryQuality::default());
        // intensity is compared with week 53, volume with week 52 of 2020
        assert_approx_eq!(result.intensity_increase, -22.2);
        assert_approx_eq!(result.volume_increase, 0.0);
        assert_approx_eq!(result.frequency_consistency, 25.0);
    }

    #[test]
    fn test_compute_factors_without_history() {
        let week = Week::new(2024, 2).unwrap();
        assert_eq!(
            compute_factors(&History::default(), &week, &ConstantRecoveryQuality::default()),
            OverloadFactors {
                volume_increase: 0.0,
                intensity_increase: 0.0,
                frequency_consistency: 0.0,
                recovery_quality: 70.0,
            }
        );
    }
}
