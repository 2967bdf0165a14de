use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Linear sizing ratios, all per kWp of peak power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingCoefficients {
    pub area_per_kwp: f64,
    pub cost_per_kwp: f64,
    pub panels_per_kwp: f64,
    pub yield_per_kwp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingResult {
    pub required_area: f64,
    pub installation_cost: f64,
    pub panel_count: u64,
    pub yearly_yield: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedBucket {
    pub label: String,
    pub kwh: f64,
    pub percent_of_period: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationSummary {
    pub buckets: Vec<AggregatedBucket>,
    pub total: f64,
    pub average: f64,
    pub max: AggregatedBucket,
    pub min: AggregatedBucket,
}

/// Bucket size of a profile view. Each variant is named by its backend
/// route code, both in serde and in `Display`/`FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Hours of a single day.
    #[serde(rename = "pd")]
    Hour,
    /// Days of a single month.
    #[serde(rename = "pm")]
    Day,
    /// Months of a single year.
    #[serde(rename = "pym")]
    Month,
    /// Days of a single year.
    #[serde(rename = "pyd")]
    YearOfDays,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayEnergy {
    pub date: NaiveDate,
    pub kwh: f64,
    pub percent_of_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub category: String,
    pub date: NaiveDate,
    pub granularity: Granularity,
    pub yearly_sum_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub granularity: Granularity,
    pub category: Category,
    /// Human readable period, e.g. `2024-03-15`, `2024-03` or `2024`.
    pub period: String,
    pub yearly_sum_kwh: f64,
    pub summary: AggregationSummary,
    /// Period total as a share of the scaled annual energy.
    pub percent_of_year: f64,
    /// Raw quarter-hour readings of the day, `Hour` views only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_hours: Option<AggregationSummary>,
}
