use chrono::NaiveDate;
use log::{debug, error};

use crate::{
    AthleteID, AthleteProfile, ConstantRecoveryQuality, HealthMetrics, History, HistoryRepository,
    InjuryRiskAssessment, Insight, Interval, MonthlyAnalytics, OverloadFactors, OverloadScore,
    PriorLoad, ReadError, RecoveryQualityProvider, Settings, VolumeDatum, VolumeWarning, Week,
    WeeklyPlan, WeeklyStats, compute_factors, injury, metrics, overload, plan, volume,
};

#[allow(async_fn_in_trait)]
pub trait AnalyticsService {
    async fn weekly_volume(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<Vec<VolumeDatum>, ReadError>;
    async fn overload_factors(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<OverloadFactors, ReadError>;
    async fn volume_warnings(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<Vec<VolumeWarning>, ReadError>;
    async fn injury_risk(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<InjuryRiskAssessment, ReadError>;
    async fn health_metrics(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<HealthMetrics, ReadError>;
    async fn weekly_stats(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<WeeklyStats, ReadError>;
    async fn monthly_analytics(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<MonthlyAnalytics, ReadError>;
    async fn insights(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<Vec<Insight>, ReadError>;

    async fn overload_score(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<OverloadScore, ReadError> {
        Ok(overload::score(&self.overload_factors(athlete, week).await?))
    }
}

#[allow(async_fn_in_trait)]
pub trait PlanService {
    async fn prior_load(&self, athlete: AthleteID, today: NaiveDate)
    -> Result<PriorLoad, ReadError>;

    async fn weekly_plan(
        &self,
        profile: &AthleteProfile,
        start: NaiveDate,
        today: NaiveDate,
    ) -> Result<WeeklyPlan, ReadError> {
        let prior = self.prior_load(profile.id, today).await?;
        Ok(plan::generate_weekly_plan(profile, Some(&prior), start))
    }
}

pub struct Service<R, P = ConstantRecoveryQuality> {
    repository: R,
    recovery: P,
    settings: Settings,
}

impl<R: HistoryRepository> Service<R> {
    pub fn new(repository: R) -> Self {
        Self::with_settings(repository, Settings::default())
    }

    pub fn with_settings(repository: R, settings: Settings) -> Self {
        Self {
            repository,
            recovery: settings.recovery(),
            settings,
        }
    }
}

impl<R, P> Service<R, P> {
    /// Replace the source of the recovery quality factor.
    pub fn with_recovery<Q: RecoveryQualityProvider>(self, recovery: Q) -> Service<R, Q> {
        Service {
            repository: self.repository,
            recovery,
            settings: self.settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: HistoryRepository, P> Service<R, P> {
    async fn read_history(
        &self,
        athlete: AthleteID,
        interval: Interval,
    ) -> Result<History, ReadError> {
        debug!(
            "read history of athlete {athlete} from {} to {}",
            interval.start, interval.end
        );
        log_on_error!(
            self.repository.read_history(athlete, interval),
            ReadError,
            "read",
            "history"
        )
    }
}

/// The weeks from `count - 1` weeks before `week` up to `week`.
fn weeks_interval(week: &Week, count: usize) -> Interval {
    week.trailing(count)
        .iter()
        .map(Week::interval)
        .fold(week.interval(), |a, b| a.union(&b))
}

impl<R: HistoryRepository, P: RecoveryQualityProvider> AnalyticsService for Service<R, P> {
    async fn weekly_volume(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<Vec<VolumeDatum>, ReadError> {
        let history = self.read_history(athlete, week.interval()).await?;
        Ok(volume::weekly_volume(&history, &week))
    }

    async fn overload_factors(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<OverloadFactors, ReadError> {
        let history = self
            .read_history(athlete, weeks_interval(&week, overload::CONSISTENCY_WEEKS))
            .await?;
        Ok(compute_factors(&history, &week, &self.recovery))
    }

    async fn volume_warnings(
        &self,
        athlete: AthleteID,
        week: Week,
    ) -> Result<Vec<VolumeWarning>, ReadError> {
        let history = self.read_history(athlete, weeks_interval(&week, 2)).await?;
        Ok(volume::volume_warnings(&history, &week))
    }

    async fn injury_risk(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<InjuryRiskAssessment, ReadError> {
        let interval = weeks_interval(&Week::containing(today), 2).union(
            &Interval::trailing_days(today, self.settings.injury_window_days),
        );
        let history = self.read_history(athlete, interval).await?;
        Ok(injury::assess(
            &history,
            today,
            self.settings.injury_window_days,
        ))
    }

    async fn health_metrics(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<HealthMetrics, ReadError> {
        let interval = Week::containing(today)
            .interval()
            .union(&Interval::trailing_days(
                today,
                self.settings.health_window_days,
            ));
        let history = self.read_history(athlete, interval).await?;
        Ok(metrics::health_metrics(
            &history,
            today,
            self.settings.health_window_days,
        ))
    }

    async fn weekly_stats(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<WeeklyStats, ReadError> {
        let week = Week::containing(today);
        let history = self.read_history(athlete, week.interval()).await?;
        Ok(metrics::weekly_stats(&history, &week))
    }

    async fn monthly_analytics(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<MonthlyAnalytics, ReadError> {
        let window_days = self.settings.analytics_window_days;
        let history = self
            .read_history(athlete, Interval::trailing_days(today, window_days))
            .await?;
        Ok(metrics::monthly_analytics(&history, today, window_days))
    }

    async fn insights(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<Vec<Insight>, ReadError> {
        let window_days = self.settings.insight_window_days;
        let interval = Week::containing(today)
            .interval()
            .union(&Interval::trailing_days(today, window_days));
        let history = self.read_history(athlete, interval).await?;
        Ok(metrics::insights(&history, today, window_days))
    }
}

impl<R: HistoryRepository, P> PlanService for Service<R, P> {
    async fn prior_load(
        &self,
        athlete: AthleteID,
        today: NaiveDate,
    ) -> Result<PriorLoad, ReadError> {
        let interval = Interval::trailing_days(today, self.settings.prior_load_window_days);
        let history = self.read_history(athlete, interval).await?;
        Ok(PriorLoad::from_runs(&history.runs).unwrap_or(self.settings.default_prior_load))
    }
}
