use std::path::Path;

use anyhow::Context;
use cadence_domain as domain;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum JsonError {
    #[error("invalid entry {index} in {section} of athlete {athlete}: {source}")]
    InvalidEntry {
        athlete: Uuid,
        section: &'static str,
        index: usize,
        source: EntryError,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EntryError {
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
    #[error(transparent)]
    Effort(#[from] domain::EffortError),
    #[error("{0} must not be negative")]
    Negative(&'static str),
}

#[derive(AsRefStr, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    #[strum(serialize = "runs")]
    Runs,
    #[strum(serialize = "strength")]
    Strength,
}

/// Logged history of any number of athletes and the engine settings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub athletes: Vec<Athlete>,
}

impl Document {
    pub fn parse(json: &str) -> Result<Self, JsonError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document = Self::parse(&json)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(
            "loaded {} athletes from {}",
            document.athletes.len(),
            path.display()
        );
        Ok(document)
    }

    pub fn to_string_pretty(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The histories of all athletes, validated.
    pub fn histories(&self) -> Result<Vec<(domain::AthleteID, domain::History)>, JsonError> {
        self.athletes
            .iter()
            .map(|athlete| Ok((athlete.id.into(), athlete.history()?)))
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Athlete {
    pub id: Uuid,
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default)]
    pub strength: Vec<StrengthExercise>,
}

impl Athlete {
    #[must_use]
    pub fn new(id: domain::AthleteID, history: &domain::History) -> Self {
        Self {
            id: *id,
            runs: history.runs.iter().map(Run::from).collect(),
            strength: history
                .strength
                .iter()
                .map(StrengthExercise::from)
                .collect(),
        }
    }

    pub fn history(&self) -> Result<domain::History, JsonError> {
        let invalid = |section: Section| {
            move |(index, source): (usize, EntryError)| JsonError::InvalidEntry {
                athlete: self.id,
                section: section.into(),
                index,
                source,
            }
        };
        Ok(domain::History {
            runs: self
                .runs
                .iter()
                .enumerate()
                .map(|(i, r)| domain::LoggedRun::try_from(r.clone()).map_err(|err| (i, err)))
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid(Section::Runs))?,
            strength: self
                .strength
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    domain::LoggedStrengthExercise::try_from(e.clone()).map_err(|err| (i, err))
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid(Section::Strength))?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    #[default]
    Manual,
    Imported,
}

impl From<domain::RunSource> for Source {
    fn from(value: domain::RunSource) -> Self {
        match value {
            domain::RunSource::Manual => Source::Manual,
            domain::RunSource::Imported => Source::Imported,
        }
    }
}

impl From<Source> for domain::RunSource {
    fn from(value: Source) -> Self {
        match value {
            Source::Manual => domain::RunSource::Manual,
            Source::Imported => domain::RunSource::Imported,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Run {
    pub date: NaiveDate,
    pub distance_km: f32,
    pub duration_minutes: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_hr: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hr: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f32>,
    #[serde(default)]
    pub source: Source,
}

impl From<&domain::LoggedRun> for Run {
    fn from(value: &domain::LoggedRun) -> Self {
        Self {
            date: value.date,
            distance_km: value.distance_km,
            duration_minutes: value.duration_minutes,
            avg_hr: value.avg_hr,
            max_hr: value.max_hr,
            rpe: value.rpe.map(f32::from),
            source: value.source.into(),
        }
    }
}

impl TryFrom<Run> for domain::LoggedRun {
    type Error = EntryError;

    fn try_from(value: Run) -> Result<Self, Self::Error> {
        if value.distance_km < 0.0 {
            return Err(EntryError::Negative("distance"));
        }
        if value.duration_minutes < 0.0 {
            return Err(EntryError::Negative("duration"));
        }
        Ok(Self {
            date: value.date,
            day: domain::Weekday::of(value.date),
            distance_km: value.distance_km,
            duration_minutes: value.duration_minutes,
            avg_hr: value.avg_hr,
            max_hr: value.max_hr,
            rpe: value.rpe.map(domain::RPE::new).transpose()?,
            source: value.source.into(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Set {
    pub weight: f32,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<f32>,
}

impl From<&domain::LoggedSet> for Set {
    fn from(value: &domain::LoggedSet) -> Self {
        Self {
            weight: f32::from(value.weight),
            reps: u32::from(value.reps),
            rpe: value.rpe.map(f32::from),
            rir: value.rir.map(f32::from),
        }
    }
}

impl TryFrom<Set> for domain::LoggedSet {
    type Error = EntryError;

    fn try_from(value: Set) -> Result<Self, Self::Error> {
        Ok(Self {
            weight: domain::Weight::new(value.weight)?,
            reps: domain::Reps::new(value.reps)?,
            rpe: value.rpe.map(domain::RPE::new).transpose()?,
            rir: value.rir.map(domain::RIR::new).transpose()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StrengthExercise {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub sets: Vec<Set>,
}

impl From<&domain::LoggedStrengthExercise> for StrengthExercise {
    fn from(value: &domain::LoggedStrengthExercise) -> Self {
        Self {
            name: value.name.clone(),
            date: value.date,
            sets: value.sets.iter().map(Set::from).collect(),
        }
    }
}

impl TryFrom<StrengthExercise> for domain::LoggedStrengthExercise {
    type Error = EntryError;

    fn try_from(value: StrengthExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            day: domain::Weekday::of(value.date),
            date: value.date,
            name: value.name,
            sets: value
                .sets
                .into_iter()
                .map(domain::LoggedSet::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub average_run_minutes: f32,
    pub long_run_minutes: f32,
    pub recovery_quality: f32,
    pub injury_window_days: u32,
    pub health_window_days: u32,
    pub prior_load_window_days: u32,
    pub analytics_window_days: u32,
    pub insight_window_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(domain::Settings::default())
    }
}

impl From<domain::Settings> for Settings {
    fn from(value: domain::Settings) -> Self {
        Self {
            average_run_minutes: value.default_prior_load.average_run_minutes,
            long_run_minutes: value.default_prior_load.long_run_minutes,
            recovery_quality: value.recovery_quality,
            injury_window_days: value.injury_window_days,
            health_window_days: value.health_window_days,
            prior_load_window_days: value.prior_load_window_days,
            analytics_window_days: value.analytics_window_days,
            insight_window_days: value.insight_window_days,
        }
    }
}

impl From<Settings> for domain::Settings {
    fn from(value: Settings) -> Self {
        Self {
            default_prior_load: domain::PriorLoad {
                average_run_minutes: value.average_run_minutes,
                long_run_minutes: value.long_run_minutes,
                high_rpe_count: 0,
            },
            recovery_quality: value.recovery_quality,
            injury_window_days: value.injury_window_days,
            health_window_days: value.health_window_days,
            prior_load_window_days: value.prior_load_window_days,
            analytics_window_days: value.analytics_window_days,
            insight_window_days: value.insight_window_days,
        }
    }
}
