use chrono::NaiveDate;
use tracing::debug;

use crate::aggregate::aggregate;
use crate::calendar::time_label;
use crate::config::ViewerConfig;
use crate::error::{ProfileError, Result};
use crate::profile::{round2, share_of_year, ProfileSource};
use crate::types::{Category, DayEnergy, Granularity, ProfileView, ViewRequest};

/// Adapter between a profile source and the aggregator. Selects the period
/// of a request, sums the scaled values into the buckets of its granularity,
/// labels them and summarises the result. Profiles are checked and scaled
/// against the reference energy of the viewer's configuration.
#[derive(Debug, Clone)]
pub struct ProfileViewer<S> {
    source: S,
    defaults: ViewerConfig,
}

impl<S: ProfileSource> ProfileViewer<S> {
    pub fn new(source: S, defaults: ViewerConfig) -> Self {
        Self { source, defaults }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn defaults(&self) -> &ViewerConfig {
        &self.defaults
    }

    pub fn categories(&self) -> Vec<Category> {
        self.source.categories()
    }

    pub fn day_energy(&self, category: &str, date: NaiveDate, yearly_sum_kwh: f64) -> Result<DayEnergy> {
        self.source
            .profile(category)?
            .day_energy_against(&self.defaults.reference(), date, yearly_sum_kwh)
    }

    pub fn view(&self, request: &ViewRequest) -> Result<ProfileView> {
        let profile = self.source.profile(&request.category)?;
        let reference = self.defaults.reference();
        let scale = profile.scale_factor_against(&reference, request.yearly_sum_kwh)?;
        let scaled_annual = profile.annual_total_against(&reference)? * scale;

        let granularity = request.granularity;
        let date = request.date;
        let mut values = vec![0.0; granularity.bucket_count(date)];
        let mut matched = 0usize;
        for point in profile.points() {
            if !granularity.contains(date, &point.timestamp) {
                continue;
            }
            if let Some(slot) = values.get_mut(granularity.bucket_index(&point.timestamp)) {
                *slot += point.energy_kwh * scale;
                matched += 1;
            }
        }

        let period = granularity.period_label(date);
        if matched == 0 {
            return Err(ProfileError::NoData {
                category: request.category.clone(),
                period,
            });
        }
        debug!(
            category = %request.category,
            %granularity,
            %period,
            matched,
            "selected profile period"
        );

        let summary = aggregate(
            values
                .into_iter()
                .enumerate()
                .map(|(i, kwh)| (granularity.bucket_label(date, i), kwh)),
        )?;
        let percent_of_year = round2(share_of_year(summary.total, scaled_annual));

        let quarter_hours = match granularity {
            Granularity::Hour => Some(aggregate(
                profile
                    .points()
                    .iter()
                    .filter(|p| p.timestamp.date() == date)
                    .map(|p| (time_label(&p.timestamp), p.energy_kwh * scale)),
            )?),
            _ => None,
        };

        Ok(ProfileView {
            granularity,
            category: profile.category.clone(),
            period,
            yearly_sum_kwh: request.yearly_sum_kwh,
            summary,
            percent_of_year,
            quarter_hours,
        })
    }

    /// Builds a request from the configured category and yearly sum.
    pub fn default_request(&self, date: NaiveDate, granularity: Granularity) -> ViewRequest {
        ViewRequest {
            category: self.defaults.default_category.clone(),
            date,
            granularity,
            yearly_sum_kwh: self.defaults.yearly_sum_kwh,
        }
    }
}
