use tracing::debug;

use crate::error::{ensure_non_negative, ProfileError, Result};
use crate::types::{SizingCoefficients, SizingResult};

impl SizingCoefficients {
    pub fn new(
        area_per_kwp: f64,
        cost_per_kwp: f64,
        panels_per_kwp: f64,
        yield_per_kwp: f64,
    ) -> Result<Self> {
        let coefficients = Self {
            area_per_kwp,
            cost_per_kwp,
            panels_per_kwp,
            yield_per_kwp,
        };
        coefficients.validate()?;
        Ok(coefficients)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("area_per_kwp", self.area_per_kwp)?;
        ensure_non_negative("cost_per_kwp", self.cost_per_kwp)?;
        ensure_non_negative("panels_per_kwp", self.panels_per_kwp)?;
        ensure_non_negative("yield_per_kwp", self.yield_per_kwp)
    }
}

/// Sizes an installation of `peak_power_kwp`. Area and cost are exact,
/// panel count and yearly yield are rounded up to whole units.
pub fn compute(peak_power_kwp: f64, coefficients: &SizingCoefficients) -> Result<SizingResult> {
    ensure_non_negative("peak power", peak_power_kwp)?;
    coefficients.validate()?;

    let result = SizingResult {
        required_area: finite("required area", coefficients.area_per_kwp * peak_power_kwp)?,
        installation_cost: finite("installation cost", coefficients.cost_per_kwp * peak_power_kwp)?,
        panel_count: round_up("panel count", coefficients.panels_per_kwp * peak_power_kwp)?,
        yearly_yield: round_up("yearly yield", coefficients.yield_per_kwp * peak_power_kwp)?,
    };
    debug!(peak_power_kwp, ?result, "sized installation");
    Ok(result)
}

fn finite(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(ProfileError::InvalidInput(format!("{name} overflows for this peak power")));
    }
    Ok(value)
}

/// Ceiling as an integer. Values beyond `u64` are rejected instead of saturating.
fn round_up(name: &str, value: f64) -> Result<u64> {
    let ceiled = finite(name, value)?.ceil();
    // u64::MAX as f64 rounds up to 2^64, which itself does not fit.
    if ceiled >= u64::MAX as f64 {
        return Err(ProfileError::InvalidInput(format!("{name} {ceiled} exceeds the integer range")));
    }
    Ok(ceiled as u64)
}
