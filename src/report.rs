use crate::types::{AggregationSummary, Granularity, ProfileView};

fn label_heading(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Hour => "Hour",
        Granularity::Day | Granularity::YearOfDays => "Date",
        Granularity::Month => "Month",
    }
}

/// Plain-text table of a view: a title, the period total, then one row per
/// bucket with its energy and percentage of the peak bucket.
pub fn render_table(view: &ProfileView) -> String {
    let summary = &view.summary;
    let heading = label_heading(view.granularity);
    let width = summary
        .buckets
        .iter()
        .map(|b| b.label.len())
        .chain([heading.len()])
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!(
            "Energy profile {} ({}) for {}, scaled to {} kWh/year",
            view.category.code, view.category.name, view.period, view.yearly_sum_kwh
        ),
        format!(
            "Total: {:.2} kWh ({:.2}% of year), average {:.2} kWh",
            summary.total, view.percent_of_year, summary.average
        ),
        format!(
            "Peak: {} {:.2} kWh, minimum: {} {:.2} kWh",
            summary.max.label, summary.max.kwh, summary.min.label, summary.min.kwh
        ),
        String::new(),
        format!("{:<width$} {:>10} {:>8}", heading, "kWh", "% peak"),
        format!("{} {} {}", "-".repeat(width), "-".repeat(10), "-".repeat(8)),
    ];
    lines.extend(summary.buckets.iter().map(|bucket| {
        format!(
            "{:<width$} {:>10.2} {:>7.2}%",
            bucket.label, bucket.kwh, bucket.percent_of_period
        )
    }));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn tsv_section(heading: &str, summary: &AggregationSummary) -> String {
    let mut out = format!("{heading}\tkwh\tpercent_of_period\n");
    for bucket in &summary.buckets {
        out.push_str(&format!(
            "{}\t{:.4}\t{:.2}\n",
            bucket.label, bucket.kwh, bucket.percent_of_period
        ));
    }
    out
}

/// Tab-separated export for pasting into a spreadsheet. Hour views append
/// the quarter-hour readings as a second block after a blank line.
pub fn to_tsv(view: &ProfileView) -> String {
    let heading = label_heading(view.granularity).to_lowercase();
    let mut out = tsv_section(&heading, &view.summary);
    if let Some(quarter_hours) = &view.quarter_hours {
        out.push('\n');
        out.push_str(&tsv_section("time", quarter_hours));
    }
    out
}
