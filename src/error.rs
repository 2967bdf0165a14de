use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty input: at least one point is required")]
    EmptyInput,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown sizing preset: {0}")]
    UnknownPreset(String),

    #[error("no data for category {category} in {period}")]
    NoData { category: String, period: String },

    /// The raw profile does not sum to the reference annual energy.
    #[error("annual energy for {category} deviates from the reference: {total} kWh")]
    AnnualTotalOutOfRange { category: String, total: f64 },

    #[error("invalid granularity: {0} (expected pd, pm, pym or pyd)")]
    InvalidGranularity(String),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ProfileError::InvalidInput(format!(
            "{name} must be a finite, non-negative number, got {value}"
        )));
    }
    Ok(())
}
