pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod profile;
pub mod report;
pub mod sizing;
pub mod types;
pub mod viewer;

pub use aggregate::aggregate;

pub use calendar::{
    days_in_month, days_in_months, days_in_year, doy_to_month_day, hour_label, leap_year,
    month_abbreviation, time_label, HOURS_PER_DAY, MONTHS_PER_YEAR,
};

pub use config::{Config, SizingConfig, ViewerConfig};

pub use error::{ProfileError, Result};

pub use profile::{
    InMemorySource, LoadProfile, ProfileReference, ProfileSource, DEFAULT_TOLERANCE_PERCENT,
    REFERENCE_ANNUAL_KWH,
};

pub use report::{render_table, to_tsv};

pub use sizing::compute;

pub use types::{
    AggregatedBucket, AggregationSummary, Category, DayEnergy, Granularity, ProfileView,
    SizingCoefficients, SizingResult, TimeSeriesPoint, ViewRequest,
};

pub use viewer::ProfileViewer;
