use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Europe::Vienna;
use tracing_subscriber::EnvFilter;

use energy_profile::{
    compute, render_table, to_tsv, Category, Config, Granularity, InMemorySource, LoadProfile,
    ProfileViewer, TimeSeriesPoint,
};

/// Synthetic household-like profile: 35040 quarter hours summing to 1000 kWh,
/// higher in winter and in the evening.
fn synthetic_profile(year: i32) -> LoadProfile {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let days = if energy_profile::leap_year(year) { 366 } else { 365 };
    let mut points = Vec::with_capacity(days * 96);
    let mut weights = Vec::with_capacity(days * 96);
    for q in 0..days * 96 {
        let ts = start + chrono::Duration::minutes(15 * q as i64);
        let season = 1.0 + 0.4 * (ts.ordinal() as f64 / days as f64 * std::f64::consts::TAU).cos();
        let hour = (q % 96) as f64 / 4.0;
        let daily = 0.6 + 0.8 * (-(hour - 19.0).powi(2) / 8.0).exp() + 0.3 * (-(hour - 7.0).powi(2) / 2.0).exp();
        weights.push(season * daily);
        points.push(ts);
    }
    let sum: f64 = weights.iter().sum();
    let points = points
        .into_iter()
        .zip(weights)
        .map(|(timestamp, w)| TimeSeriesPoint {
            timestamp,
            energy_kwh: 1000.0 * w / sum,
        })
        .collect();
    let category = Category {
        code: "H0".to_string(),
        name: "Haushalt".to_string(),
    };
    LoadProfile::new(category, points).unwrap()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load("config/default.toml").unwrap();

    println!("=== Solar Installation Sizing ===");
    let coefficients = config.sizing_preset("standard").unwrap();
    for peak_kwp in [5.0, 10.0, 15.0] {
        let r = compute(peak_kwp, &coefficients).unwrap();
        println!(
            "{:>5.1} kWp: {:.1} m², {:.0} EUR, {} panels, {} kWh/year",
            peak_kwp, r.required_area, r.installation_cost, r.panel_count, r.yearly_yield
        );
    }
    println!();

    let today = Utc::now().with_timezone(&Vienna).date_naive();
    let source: InMemorySource = [synthetic_profile(today.year())]
        .into_iter()
        .collect();
    let viewer = ProfileViewer::new(source, config.viewer.clone());

    let day = viewer
        .day_energy(&config.viewer.default_category, today, config.viewer.yearly_sum_kwh)
        .unwrap();
    println!(
        "Today ({}): {:.2} kWh, {:.2}% of the year",
        day.date, day.kwh, day.percent_of_year
    );
    println!();

    let months = viewer.view(&viewer.default_request(today, Granularity::Month)).unwrap();
    print!("{}", render_table(&months));
    println!();

    let hours = viewer.view(&viewer.default_request(today, Granularity::Hour)).unwrap();
    print!("{}", to_tsv(&hours));
}
