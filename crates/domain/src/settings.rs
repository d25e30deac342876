use crate::{
    ConstantRecoveryQuality, DEFAULT_ANALYTICS_WINDOW_DAYS, DEFAULT_HEALTH_WINDOW_DAYS,
    DEFAULT_INJURY_WINDOW_DAYS, DEFAULT_INSIGHT_WINDOW_DAYS, PriorLoad,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Used when no runs have been logged recently.
    pub default_prior_load: PriorLoad,
    /// Percent, until recovery is measured.
    pub recovery_quality: f32,
    pub injury_window_days: u32,
    pub health_window_days: u32,
    /// Days of runs summarized into the prior load of the next plan.
    pub prior_load_window_days: u32,
    pub analytics_window_days: u32,
    pub insight_window_days: u32,
}

impl Settings {
    #[must_use]
    pub fn recovery(&self) -> ConstantRecoveryQuality {
        ConstantRecoveryQuality(self.recovery_quality)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_prior_load: PriorLoad::DEFAULT,
            recovery_quality: ConstantRecoveryQuality::DEFAULT.0,
            injury_window_days: DEFAULT_INJURY_WINDOW_DAYS,
            health_window_days: DEFAULT_HEALTH_WINDOW_DAYS,
            prior_load_window_days: 14,
            analytics_window_days: DEFAULT_ANALYTICS_WINDOW_DAYS,
            insight_window_days: DEFAULT_INSIGHT_WINDOW_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.default_prior_load, PriorLoad::DEFAULT);
        assert_approx_eq!(settings.recovery().0, 70.0);
        assert_eq!(settings.injury_window_days, 14);
        assert_eq!(settings.health_window_days, 30);
        assert_eq!(settings.prior_load_window_days, 14);
        assert_eq!(settings.analytics_window_days, 30);
        assert_eq!(settings.insight_window_days, 14);
    }
}
