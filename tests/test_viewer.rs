use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use energy_profile::calendar::{days_in_month, leap_year};
use energy_profile::config::ViewerConfig;
use energy_profile::profile::{InMemorySource, LoadProfile, ProfileSource};
use energy_profile::types::{Category, Granularity, TimeSeriesPoint, ViewRequest};
use energy_profile::viewer::ProfileViewer;
use energy_profile::ProfileError;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

const YEAR: i32 = 2024;
const MONTHLY: [f64; 12] = [
    205.0, 316.0, 803.0, 1385.0, 1460.0, 1393.0, 1460.0, 1240.0, 926.0, 410.0, 265.0, 137.0,
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quarter_hours(year: i32) -> impl Iterator<Item = NaiveDateTime> {
    let start = date(year, 1, 1).and_hms_opt(0, 0, 0).unwrap();
    let n = if leap_year(year) { 366 * 96 } else { 365 * 96 };
    (0..n).map(move |q| start + Duration::minutes(15 * q as i64))
}

fn category(code: &str, name: &str) -> Category {
    Category {
        code: code.to_string(),
        name: name.to_string(),
    }
}

/// Same energy in every quarter hour, 1000 kWh per year.
fn flat_profile() -> LoadProfile {
    let n = 366.0 * 96.0;
    let points = quarter_hours(YEAR)
        .map(|timestamp| TimeSeriesPoint {
            timestamp,
            energy_kwh: 1000.0 / n,
        })
        .collect();
    LoadProfile::new(category("G0", "Gewerbe allgemein"), points).unwrap()
}

/// Monthly totals of `MONTHLY / 10`, spread evenly over each month.
fn seasonal_profile() -> LoadProfile {
    let points = quarter_hours(YEAR)
        .map(|timestamp| {
            let m = chrono::Datelike::month(&timestamp);
            let per_point = MONTHLY[(m - 1) as usize] / 10.0 / (days_in_month(YEAR, m).unwrap() * 96) as f64;
            TimeSeriesPoint {
                timestamp,
                energy_kwh: per_point,
            }
        })
        .collect();
    LoadProfile::new(category("H0", "Haushalt"), points).unwrap()
}

/// Only January data, far below the reference annual energy.
fn truncated_profile() -> LoadProfile {
    let points = quarter_hours(YEAR)
        .take(31 * 96)
        .map(|timestamp| TimeSeriesPoint {
            timestamp,
            energy_kwh: 0.01,
        })
        .collect();
    LoadProfile::new(category("L0", "Landwirtschaft"), points).unwrap()
}

fn defaults() -> ViewerConfig {
    ViewerConfig {
        default_category: "H0".to_string(),
        yearly_sum_kwh: 1000.0,
        reference_annual_kwh: 1000.0,
        annual_tolerance_percent: 1.0,
    }
}

static VIEWER: LazyLock<ProfileViewer<InMemorySource>> = LazyLock::new(|| {
    let source: InMemorySource = [flat_profile(), seasonal_profile(), truncated_profile()]
        .into_iter()
        .collect();
    ProfileViewer::new(source, defaults())
});

fn request(code: &str, d: NaiveDate, granularity: Granularity, yearly_sum: f64) -> ViewRequest {
    ViewRequest {
        category: code.to_string(),
        date: d,
        granularity,
        yearly_sum_kwh: yearly_sum,
    }
}

// ── Source ──

#[test]
fn test_categories_ordered_by_code() {
    let codes: Vec<_> = VIEWER.categories().into_iter().map(|c| c.code).collect();
    assert_eq!(codes, ["G0", "H0", "L0"]);
    assert_eq!(VIEWER.source().category("H0").unwrap().name, "Haushalt");
}

#[test]
fn test_unknown_category() {
    let r = VIEWER.view(&request("Z9", date(YEAR, 1, 1), Granularity::Hour, 1000.0));
    assert!(matches!(r, Err(ProfileError::UnknownCategory(code)) if code == "Z9"));
}

#[test]
fn test_annual_total() {
    let source = VIEWER.source();
    assert_approx!(source.profile("G0").unwrap().annual_total().unwrap(), 1000.0, 0.01);
    assert!(matches!(
        source.profile("L0").unwrap().annual_total(),
        Err(ProfileError::AnnualTotalOutOfRange { .. })
    ));
}

// ── Day energy ──

#[test]
fn test_day_energy_flat() {
    let d = VIEWER.day_energy("G0", date(YEAR, 3, 15), 5500.0).unwrap();
    assert_approx!(d.kwh, 5500.0 / 366.0, 0.01);
    assert_approx!(d.percent_of_year, 100.0 / 366.0, 0.01);
}

#[test]
fn test_day_energy_outside_data_is_zero() {
    let d = VIEWER.day_energy("G0", date(2030, 1, 1), 1000.0).unwrap();
    assert_eq!(d.kwh, 0.0);
    assert_eq!(d.percent_of_year, 0.0);
}

// ── Granularities ──

#[test]
fn test_hour_view() {
    let v = VIEWER
        .view(&request("G0", date(YEAR, 6, 1), Granularity::Hour, 3000.0))
        .unwrap();
    let s = &v.summary;
    assert_eq!(s.buckets.len(), 24);
    assert_eq!(s.buckets[0].label, "00:00");
    assert_eq!(s.buckets[23].label, "23:00");
    assert_approx!(s.total, 3000.0 / 366.0, 1e-6);
    assert_eq!(v.period, "2024-06-01");
    assert_eq!(v.category.name, "Gewerbe allgemein");
    assert_approx!(v.percent_of_year, 100.0 / 366.0, 0.01);
    for b in &s.buckets {
        assert_approx!(b.percent_of_period, 100.0, 1e-6);
    }
}

#[test]
fn test_day_view_covers_month() {
    let v = VIEWER
        .view(&request("G0", date(YEAR, 2, 10), Granularity::Day, 1000.0))
        .unwrap();
    let s = &v.summary;
    assert_eq!(s.buckets.len(), 29);
    assert_eq!(s.buckets[0].label, "2024-02-01");
    assert_eq!(s.buckets[28].label, "2024-02-29");
    assert_approx!(s.total, 29.0 * 1000.0 / 366.0, 1e-6);
    assert_eq!(v.period, "2024-02");
}

#[test]
fn test_month_view_of_seasonal_profile() {
    let v = VIEWER
        .view(&request("H0", date(YEAR, 8, 20), Granularity::Month, 10000.0))
        .unwrap();
    let s = &v.summary;
    assert_eq!(s.buckets.len(), 12);
    assert_approx!(s.total, 10000.0, 1e-6);
    for (b, &expected) in s.buckets.iter().zip(MONTHLY.iter()) {
        assert_approx!(b.kwh, expected, 1e-6);
        assert_approx!(b.percent_of_period, 100.0 * expected / 1460.0, 1e-6);
    }
    assert_eq!(s.max.label, "May");
    assert_eq!(s.min.label, "Dec");
    assert_approx!(s.buckets[6].percent_of_period, 100.0, 1e-6);
    assert_approx!(v.percent_of_year, 100.0, 0.01);
}

#[test]
fn test_year_of_days_view() {
    let v = VIEWER
        .view(&request("G0", date(YEAR, 1, 1), Granularity::YearOfDays, 1000.0))
        .unwrap();
    let s = &v.summary;
    assert_eq!(s.buckets.len(), 366);
    assert_eq!(s.buckets[365].label, "2024-12-31");
    assert_approx!(s.average, 1000.0 / 366.0, 1e-6);
    assert_eq!(v.period, "2024");
}

#[test]
fn test_hour_view_carries_quarter_hours() {
    let v = VIEWER
        .view(&request("H0", date(YEAR, 3, 10), Granularity::Hour, 2000.0))
        .unwrap();
    let q = v.quarter_hours.as_ref().unwrap();
    assert_eq!(q.buckets.len(), 96);
    assert_eq!(q.buckets[0].label, "00:00");
    assert_eq!(q.buckets[1].label, "00:15");
    assert_eq!(q.buckets[95].label, "23:45");
    assert_approx!(q.total, v.summary.total, 1e-9);
    assert_approx!(q.buckets[0].kwh * 4.0, v.summary.buckets[0].kwh, 1e-9);

    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(json["granularity"], "pd");
    assert_eq!(json["quarter_hours"]["buckets"].as_array().unwrap().len(), 96);
}

#[test]
fn test_coarser_views_omit_quarter_hours() {
    for granularity in [Granularity::Day, Granularity::Month, Granularity::YearOfDays] {
        let v = VIEWER
            .view(&request("G0", date(YEAR, 3, 10), granularity, 1000.0))
            .unwrap();
        assert!(v.quarter_hours.is_none());
    }
}

// ── Configured reference ──

/// Flat profile summing to `annual` kWh.
fn flat_profile_of(code: &str, annual: f64) -> LoadProfile {
    let n = 366.0 * 96.0;
    let points = quarter_hours(YEAR)
        .map(|timestamp| TimeSeriesPoint {
            timestamp,
            energy_kwh: annual / n,
        })
        .collect();
    LoadProfile::new(category(code, "Referenz"), points).unwrap()
}

#[test]
fn test_viewer_applies_configured_reference() {
    let config = ViewerConfig {
        default_category: "R2".to_string(),
        reference_annual_kwh: 2000.0,
        ..defaults()
    };
    let source: InMemorySource = [flat_profile_of("R2", 2000.0)].into_iter().collect();
    let viewer = ProfileViewer::new(source, config);

    let v = viewer
        .view(&request("R2", date(YEAR, 5, 1), Granularity::Month, 3000.0))
        .unwrap();
    assert_approx!(v.summary.total, 3000.0, 1e-6);
    assert_approx!(v.percent_of_year, 100.0, 0.01);

    let d = viewer.day_energy("R2", date(YEAR, 5, 1), 3000.0).unwrap();
    assert_approx!(d.kwh, 3000.0 / 366.0, 0.01);
    assert_approx!(d.percent_of_year, 100.0 / 366.0, 0.01);
}

#[test]
fn test_default_reference_rejects_larger_profile() {
    let source: InMemorySource = [flat_profile_of("R2", 2000.0)].into_iter().collect();
    let viewer = ProfileViewer::new(source, defaults());
    let r = viewer.view(&request("R2", date(YEAR, 5, 1), Granularity::Month, 3000.0));
    assert!(matches!(r, Err(ProfileError::AnnualTotalOutOfRange { .. })));
}

#[test]
fn test_viewer_applies_configured_tolerance() {
    // 1030 kWh is 3 % off the reference: rejected at 1 %, accepted at 5 %.
    let source = || -> InMemorySource { [flat_profile_of("R3", 1030.0)].into_iter().collect() };
    let strict = ProfileViewer::new(source(), defaults());
    assert!(strict
        .view(&request("R3", date(YEAR, 1, 1), Granularity::Month, 1000.0))
        .is_err());

    let lenient = ProfileViewer::new(
        source(),
        ViewerConfig {
            annual_tolerance_percent: 5.0,
            ..defaults()
        },
    );
    let v = lenient
        .view(&request("R3", date(YEAR, 1, 1), Granularity::Month, 1000.0))
        .unwrap();
    assert_approx!(v.summary.total, 1030.0, 1e-6);
}

// ── Failures ──

#[test]
fn test_period_without_data() {
    let r = VIEWER.view(&request("G0", date(2023, 5, 1), Granularity::Month, 1000.0));
    assert!(matches!(r, Err(ProfileError::NoData { period, .. }) if period == "2023"));
}

#[test]
fn test_invalid_yearly_sum() {
    for yearly_sum in [0.0, -100.0, f64::NAN] {
        let r = VIEWER.view(&request("G0", date(YEAR, 1, 1), Granularity::Hour, yearly_sum));
        assert!(matches!(r, Err(ProfileError::InvalidInput(_))));
    }
}

#[test]
fn test_profile_outside_tolerance_rejected() {
    let r = VIEWER.view(&request("L0", date(YEAR, 1, 1), Granularity::Day, 1000.0));
    assert!(matches!(r, Err(ProfileError::AnnualTotalOutOfRange { .. })));
}

#[test]
fn test_negative_profile_value_rejected() {
    let points = vec![TimeSeriesPoint {
        timestamp: date(YEAR, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        energy_kwh: -1.0,
    }];
    assert!(matches!(
        LoadProfile::new(category("X", "x"), points),
        Err(ProfileError::InvalidInput(_))
    ));
}

#[test]
fn test_default_request() {
    let r = VIEWER.default_request(date(YEAR, 4, 1), Granularity::Day);
    assert_eq!(r.category, "H0");
    assert_eq!(r.yearly_sum_kwh, 1000.0);
    let v = VIEWER.view(&r).unwrap();
    assert_eq!(v.summary.buckets.len(), 30);
    assert_approx!(v.summary.total, 138.5, 1e-6);
}

#[test]
fn test_view_serializes_to_json() {
    let v = VIEWER
        .view(&request("H0", date(YEAR, 1, 1), Granularity::Month, 1000.0))
        .unwrap();
    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(json["granularity"], "pym");
    assert!(json.get("quarter_hours").is_none());
    assert_eq!(json["category"]["code"], "H0");
    assert_eq!(json["summary"]["buckets"].as_array().unwrap().len(), 12);
    assert_eq!(json["summary"]["max"]["label"], "May");
}
