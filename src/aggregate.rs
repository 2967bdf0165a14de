use tracing::debug;

use crate::error::{ProfileError, Result};
use crate::types::{AggregatedBucket, AggregationSummary};

/// Summarises already-grouped `(label, kWh)` pairs.
///
/// Buckets keep the input order. `percent_of_period` is relative to the
/// largest bucket rather than to the total, so the peak bucket reports 100.
/// When every bucket is zero all percentages are zero. Ties for max and min
/// resolve to the first occurrence.
pub fn aggregate<I, L>(points: I) -> Result<AggregationSummary>
where
    I: IntoIterator<Item = (L, f64)>,
    L: Into<String>,
{
    let mut buckets: Vec<AggregatedBucket> = Vec::new();
    let mut total = 0.0;
    let mut max_idx = 0;
    let mut min_idx = 0;

    for (label, kwh) in points {
        let label = label.into();
        if !kwh.is_finite() || kwh < 0.0 {
            return Err(ProfileError::InvalidInput(format!(
                "energy of bucket {label} must be a finite, non-negative number, got {kwh}"
            )));
        }

        let idx = buckets.len();
        if idx > 0 {
            if kwh > buckets[max_idx].kwh {
                max_idx = idx;
            }
            if kwh < buckets[min_idx].kwh {
                min_idx = idx;
            }
        }
        total += kwh;
        buckets.push(AggregatedBucket {
            label,
            kwh,
            percent_of_period: 0.0,
        });
    }

    if buckets.is_empty() {
        return Err(ProfileError::EmptyInput);
    }

    let peak = buckets[max_idx].kwh;
    if peak > 0.0 {
        for bucket in &mut buckets {
            bucket.percent_of_period = 100.0 * (bucket.kwh / peak);
        }
    }

    let average = total / buckets.len() as f64;
    debug!(buckets = buckets.len(), total, peak, "aggregated period");

    Ok(AggregationSummary {
        max: buckets[max_idx].clone(),
        min: buckets[min_idx].clone(),
        buckets,
        total,
        average,
    })
}
