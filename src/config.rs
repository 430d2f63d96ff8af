//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::io::profile::{CONSUMPTION_COLUMN, GENERATION_COLUMN, ProfileColumns};
use crate::model::types::{BuildingFunction, EconomicParameters, NetMeteringCap, UserShare};

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the residential reference example.
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or pick a built-in
/// preset with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Building use and installed capacity.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Discounting, inflation and cost parameters.
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Hourly input data source.
    #[serde(default)]
    pub data: DataConfig,
    /// Co-owners of a shared system; empty for a single building.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// Building use and installed capacity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Building function: `"residential"` or `"commercial"`.
    pub building_function: String,
    /// PV nameplate capacity (kW).
    pub capacity_kw: f64,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            building_function: "residential".to_string(),
            capacity_kw: 30.0,
        }
    }
}

/// Discounting, inflation and cost parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    pub inflation_rate: f64,
    pub discount_rate: f64,
    /// Lifecycle length in years (must be > 0).
    pub period_years: u32,
    pub degradation_rate: f64,
    /// Years triggering a component replacement.
    pub replacement_years: Vec<u32>,
    pub replacement_ratio: f64,
    pub maintenance_cost_ratio: f64,
    /// Tax credit rate, single-building runs only.
    pub tax_deduct: f64,
    /// One-time incentive, single-building runs only.
    pub incentive: f64,
    /// Net-metering cap; the run variant decides when absent.
    pub net_metering_cap: Option<NetMeteringCap>,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        let p = EconomicParameters::default();
        Self {
            inflation_rate: p.inflation_rate,
            discount_rate: p.discount_rate,
            period_years: p.period_years,
            degradation_rate: p.degradation_rate,
            replacement_years: p.replacement_years,
            replacement_ratio: p.replacement_ratio,
            maintenance_cost_ratio: p.maintenance_cost_ratio,
            tax_deduct: p.tax_deduct,
            incentive: p.incentive,
            net_metering_cap: p.net_metering_cap,
        }
    }
}

/// Hourly input data source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// CSV file with hourly values; synthetic profiles are used when absent.
    /// Relative paths resolve against the scenario file's directory.
    pub path: Option<PathBuf>,
    pub consumption_column: String,
    pub generation_column: String,
    /// Seed of the synthetic profiles.
    pub seed: u64,
    /// Average hourly building load of the synthetic profiles (kWh).
    pub base_load_kw: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            consumption_column: CONSUMPTION_COLUMN.to_string(),
            generation_column: GENERATION_COLUMN.to_string(),
            seed: 42,
            base_load_kw: 8.0,
        }
    }
}

impl DataConfig {
    pub fn columns(&self) -> ProfileColumns {
        ProfileColumns {
            consumption: self.consumption_column.clone(),
            generation: self.generation_column.clone(),
        }
    }
}

/// One co-owner of a shared system.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub id: String,
    pub consumption_share: f64,
    pub pv_share: f64,
    pub initial_cost_share: f64,
}

impl UserConfig {
    pub fn share(&self) -> UserShare {
        UserShare::new(self.consumption_share, self.pv_share, self.initial_cost_share)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"economics.period_years"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Single residential building with the reference parameters.
    pub fn residential() -> Self {
        Self {
            project: ProjectConfig::default(),
            economics: EconomicsConfig::default(),
            data: DataConfig::default(),
            users: Vec::new(),
        }
    }

    /// Single commercial building: commercial tariff and a larger daytime load.
    pub fn commercial() -> Self {
        Self {
            project: ProjectConfig {
                building_function: "commercial".to_string(),
                capacity_kw: 50.0,
            },
            data: DataConfig {
                base_load_kw: 20.0,
                ..DataConfig::default()
            },
            ..Self::residential()
        }
    }

    /// Five co-owners splitting one residential system.
    pub fn shared() -> Self {
        let users = [
            ("user1", 0.20, 0.25, 0.20),
            ("user2", 0.30, 0.20, 0.20),
            ("user3", 0.15, 0.15, 0.20),
            ("user4", 0.15, 0.20, 0.20),
            ("user5", 0.20, 0.20, 0.20),
        ]
        .into_iter()
        .map(|(id, consumption_share, pv_share, initial_cost_share)| UserConfig {
            id: id.to_string(),
            consumption_share,
            pv_share,
            initial_cost_share,
        })
        .collect();

        Self {
            users,
            ..Self::residential()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["residential", "commercial", "shared"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential" => Ok(Self::residential()),
            "commercial" => Ok(Self::commercial()),
            "shared" => Ok(Self::shared()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// A relative `data.path` is rebased onto the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(data_path), Some(dir)) = (&cfg.data.path, path.parent()) {
            if data_path.is_relative() {
                cfg.data.path = Some(dir.join(data_path));
            }
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Whether the scenario describes a shared system.
    pub fn is_shared(&self) -> bool {
        !self.users.is_empty()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.project;
        if let Err(e) = p.building_function.parse::<BuildingFunction>() {
            errors.push(ConfigError::new("project.building_function", e.to_string()));
        }
        if !(p.capacity_kw.is_finite() && p.capacity_kw > 0.0) {
            errors.push(ConfigError::new("project.capacity_kw", "must be > 0"));
        }

        let e = &self.economics;
        if e.period_years == 0 {
            errors.push(ConfigError::new("economics.period_years", "must be > 0"));
        }
        for (field, rate) in [
            ("economics.inflation_rate", e.inflation_rate),
            ("economics.discount_rate", e.discount_rate),
        ] {
            if !(rate.is_finite() && rate > -1.0) {
                errors.push(ConfigError::new(field, "must be a finite rate > -1"));
            }
        }
        for (field, fraction) in [
            ("economics.degradation_rate", e.degradation_rate),
            ("economics.tax_deduct", e.tax_deduct),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
            }
        }
        for (field, ratio) in [
            ("economics.replacement_ratio", e.replacement_ratio),
            ("economics.maintenance_cost_ratio", e.maintenance_cost_ratio),
        ] {
            if !(ratio.is_finite() && ratio >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }
        if e
            .replacement_years
            .iter()
            .any(|&y| y == 0 || y > e.period_years)
        {
            errors.push(ConfigError::new(
                "economics.replacement_years",
                format!("every year must be in 1..={}", e.period_years),
            ));
        }

        for (i, user) in self.users.iter().enumerate() {
            if user.id.is_empty() {
                errors.push(ConfigError::new(format!("users[{i}].id"), "must not be empty"));
            }
            if self.users[..i].iter().any(|u| u.id == user.id) {
                errors.push(ConfigError::new(
                    format!("users[{i}].id"),
                    format!("duplicate user id \"{}\"", user.id),
                ));
            }
        }

        errors
    }

    /// Converts the validated configuration into model parameters.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the building function is unknown.
    pub fn parameters(&self) -> Result<EconomicParameters, ConfigError> {
        let building_function = self
            .project
            .building_function
            .parse()
            .map_err(|e: crate::error::LifecycleError| {
                ConfigError::new("project.building_function", e.to_string())
            })?;
        let e = &self.economics;
        Ok(EconomicParameters {
            building_function,
            capacity_kw: self.project.capacity_kw,
            inflation_rate: e.inflation_rate,
            discount_rate: e.discount_rate,
            period_years: e.period_years,
            degradation_rate: e.degradation_rate,
            replacement_years: e.replacement_years.clone(),
            replacement_ratio: e.replacement_ratio,
            maintenance_cost_ratio: e.maintenance_cost_ratio,
            tax_deduct: e.tax_deduct,
            incentive: e.incentive,
            net_metering_cap: e.net_metering_cap,
        })
    }
}
