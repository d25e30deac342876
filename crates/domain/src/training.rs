use std::{fmt, ops::Mul};

use derive_more::{Display, Into};

/// Repetitions of a logged set.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub const MAX: u32 = 999;

    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value > Self::MAX {
            return Err(RepsError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must not exceed 999 ({0})")]
    OutOfRange(u32),
}

/// Load of a logged set in kg, with a resolution of 0.1 kg.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub const MAX: f32 = 999.9;

    pub fn new(kg: f32) -> Result<Self, WeightError> {
        if !(0.0..=Self::MAX).contains(&kg) {
            return Err(WeightError::OutOfRange);
        }
        if ((kg * 10.0).round() - kg * 10.0).abs() > 0.001 {
            return Err(WeightError::InvalidResolution);
        }
        Ok(Self(kg))
    }
}

/// Volume of a set, weight times reps.
impl Mul<Reps> for Weight {
    type Output = f32;

    fn mul(self, rhs: Reps) -> Self::Output {
        #[allow(clippy::cast_precision_loss)]
        let reps = rhs.0 as f32;
        self.0 * reps
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be between 0 and 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1 kg")]
    InvalidResolution,
}

/// RPE and RIR share a scale from 0 to 10 in half steps, stored in tenths.
fn effort_tenths(value: f32) -> Result<u8, EffortError> {
    if !(0.0..=10.0).contains(&value) {
        return Err(EffortError::OutOfRange);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tenths = (value * 10.0).round() as u8;
    if tenths % 5 != 0 {
        return Err(EffortError::InvalidResolution);
    }
    Ok(tenths)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EffortError {
    #[error("Effort must be in the range 0 to 10")]
    OutOfRange,
    #[error("Effort must be a multiple of 0.5")]
    InvalidResolution,
}

/// Rate of perceived exertion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RPE(u8);

impl RPE {
    pub const FIVE: RPE = RPE(50);
    pub const SIX: RPE = RPE(60);
    pub const SEVEN: RPE = RPE(70);
    pub const EIGHT: RPE = RPE(80);
    pub const NINE: RPE = RPE(90);
    pub const TEN: RPE = RPE(100);

    pub fn new(value: f32) -> Result<Self, EffortError> {
        effort_tenths(value).map(Self)
    }

    /// Sessions at or above RPE 8 count as high effort.
    #[must_use]
    pub fn is_high(self) -> bool {
        self >= RPE::EIGHT
    }

    #[must_use]
    pub fn avg(values: &[RPE]) -> Option<f32> {
        if values.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f32;
        Some(values.iter().copied().map(f32::from).sum::<f32>() / n)
    }
}

impl From<RPE> for f32 {
    fn from(value: RPE) -> Self {
        f32::from(value.0) / 10.0
    }
}

impl fmt::Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f32::from(*self))
    }
}

/// Reps in reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RIR(u8);

impl RIR {
    pub fn new(value: f32) -> Result<Self, EffortError> {
        effort_tenths(value).map(Self)
    }
}

/// RIR 0 is RPE 10, every rep in reserve lowers the RPE by one.
impl From<RIR> for RPE {
    fn from(value: RIR) -> Self {
        Self(100 - value.0)
    }
}

impl From<RIR> for f32 {
    fn from(value: RIR) -> Self {
        f32::from(value.0) / 10.0
    }
}
