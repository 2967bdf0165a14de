use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::{ensure_non_negative, ProfileError, Result};
use crate::profile::{
    LoadProfile, ProfileReference, DEFAULT_TOLERANCE_PERCENT, REFERENCE_ANNUAL_KWH,
};
use crate::types::SizingCoefficients;

pub const ENV_PREFIX: &str = "ENERGY_PROFILE__";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    pub default_category: String,
    pub yearly_sum_kwh: f64,
    #[serde(default = "default_reference")]
    pub reference_annual_kwh: f64,
    #[serde(default = "default_tolerance")]
    pub annual_tolerance_percent: f64,
}

fn default_reference() -> f64 {
    REFERENCE_ANNUAL_KWH
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE_PERCENT
}

impl ViewerConfig {
    pub fn reference(&self) -> ProfileReference {
        ProfileReference {
            annual_kwh: self.reference_annual_kwh,
            tolerance_percent: self.annual_tolerance_percent,
        }
    }

    /// Applies the configured reference energy and tolerance to a profile.
    pub fn configure(&self, profile: LoadProfile) -> LoadProfile {
        profile.with_reference(self.reference())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.reference_annual_kwh.is_finite() || self.reference_annual_kwh <= 0.0 {
            return Err(ProfileError::InvalidInput(format!(
                "reference annual energy must be positive, got {}",
                self.reference_annual_kwh
            )));
        }
        ensure_non_negative("annual tolerance percent", self.annual_tolerance_percent)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SizingConfig {
    #[serde(default)]
    pub presets: BTreeMap<String, SizingCoefficients>,
}

impl Config {
    /// Reads `path` and overlays `ENERGY_PROFILE__`-prefixed environment
    /// variables, e.g. `ENERGY_PROFILE__VIEWER__YEARLY_SUM_KWH=4500`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::extract(Figment::new().merge(Toml::string(toml)))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for coefficients in self.sizing.presets.values() {
            coefficients.validate()?;
        }
        self.viewer.validate()
    }

    pub fn sizing_preset(&self, name: &str) -> Result<SizingCoefficients> {
        self.sizing
            .presets
            .get(name)
            .copied()
            .ok_or_else(|| ProfileError::UnknownPreset(name.to_string()))
    }
}
