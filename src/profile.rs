//! Standard load profiles and the source that serves them.
//!
//! A profile is the quarter-hourly consumption of one category over a year,
//! normalised to a reference annual energy (1000 kWh for the published
//! synthetic profiles). Values are scaled to a customer's yearly sum on read.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{ensure_non_negative, ProfileError, Result};
use crate::types::{Category, DayEnergy, TimeSeriesPoint};

pub const REFERENCE_ANNUAL_KWH: f64 = 1000.0;
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 1.0;

/// Annual energy a raw profile is normalised to, and how far its actual sum
/// may stray from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileReference {
    pub annual_kwh: f64,
    pub tolerance_percent: f64,
}

impl Default for ProfileReference {
    fn default() -> Self {
        Self {
            annual_kwh: REFERENCE_ANNUAL_KWH,
            tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfile {
    pub category: Category,
    pub reference: ProfileReference,
    points: Vec<TimeSeriesPoint>,
}

impl LoadProfile {
    /// Points are sorted by timestamp; negative or non-finite values are rejected.
    pub fn new(category: Category, mut points: Vec<TimeSeriesPoint>) -> Result<Self> {
        for p in &points {
            ensure_non_negative("profile energy", p.energy_kwh)?;
        }
        points.sort_by_key(|p| p.timestamp);
        Ok(Self {
            category,
            reference: ProfileReference::default(),
            points,
        })
    }

    pub fn with_reference(mut self, reference: ProfileReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn scale_factor(&self, yearly_sum_kwh: f64) -> Result<f64> {
        self.scale_factor_against(&self.reference, yearly_sum_kwh)
    }

    pub fn scale_factor_against(&self, reference: &ProfileReference, yearly_sum_kwh: f64) -> Result<f64> {
        if !yearly_sum_kwh.is_finite() || yearly_sum_kwh <= 0.0 {
            return Err(ProfileError::InvalidInput(format!(
                "yearly sum must be a positive number, got {yearly_sum_kwh}"
            )));
        }
        Ok(yearly_sum_kwh / reference.annual_kwh)
    }

    pub fn annual_total(&self) -> Result<f64> {
        self.annual_total_against(&self.reference)
    }

    /// Unscaled annual energy, rounded to two decimals. Fails if it deviates
    /// from `reference` by more than its tolerance.
    pub fn annual_total_against(&self, reference: &ProfileReference) -> Result<f64> {
        let total: f64 = self.points.iter().map(|p| p.energy_kwh).sum();
        let allowed = reference.annual_kwh * reference.tolerance_percent / 100.0;
        if (total - reference.annual_kwh).abs() > allowed {
            warn!(
                category = %self.category.code,
                total,
                reference = reference.annual_kwh,
                "annual energy outside tolerance"
            );
            return Err(ProfileError::AnnualTotalOutOfRange {
                category: self.category.code.clone(),
                total,
            });
        }
        Ok(round2(total))
    }

    pub fn day_energy(&self, date: NaiveDate, yearly_sum_kwh: f64) -> Result<DayEnergy> {
        self.day_energy_against(&self.reference, date, yearly_sum_kwh)
    }

    /// Scaled energy of `date` and its share of the scaled annual energy.
    pub fn day_energy_against(
        &self,
        reference: &ProfileReference,
        date: NaiveDate,
        yearly_sum_kwh: f64,
    ) -> Result<DayEnergy> {
        let scale = self.scale_factor_against(reference, yearly_sum_kwh)?;
        let raw: f64 = self
            .points
            .iter()
            .filter(|p| p.timestamp.date() == date)
            .map(|p| p.energy_kwh)
            .sum();
        let kwh = raw * scale;
        let percent_of_year = share_of_year(kwh, self.annual_total_against(reference)? * scale);
        debug!(category = %self.category.code, %date, kwh, "day energy");
        Ok(DayEnergy {
            date,
            kwh: round2(kwh),
            percent_of_year: round2(percent_of_year),
        })
    }
}

pub(crate) fn share_of_year(kwh: f64, scaled_annual_kwh: f64) -> f64 {
    if scaled_annual_kwh == 0.0 {
        0.0
    } else {
        100.0 * kwh / scaled_annual_kwh
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Supplier of load profiles by category code.
pub trait ProfileSource {
    /// All known categories, ordered by code.
    fn categories(&self) -> Vec<Category>;

    fn profile(&self, code: &str) -> Result<&LoadProfile>;

    fn category(&self, code: &str) -> Result<Category> {
        self.profile(code).map(|p| p.category.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    profiles: BTreeMap<String, LoadProfile>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: LoadProfile) -> Option<LoadProfile> {
        self.profiles.insert(profile.category.code.clone(), profile)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<LoadProfile> for InMemorySource {
    fn from_iter<T: IntoIterator<Item = LoadProfile>>(iter: T) -> Self {
        let mut source = Self::new();
        for profile in iter {
            source.insert(profile);
        }
        source
    }
}

impl ProfileSource for InMemorySource {
    fn categories(&self) -> Vec<Category> {
        self.profiles.values().map(|p| p.category.clone()).collect()
    }

    fn profile(&self, code: &str) -> Result<&LoadProfile> {
        self.profiles
            .get(code)
            .ok_or_else(|| ProfileError::UnknownCategory(code.to_string()))
    }
}
