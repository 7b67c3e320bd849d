//! Generation parameters and their TOML persistence.

use crate::errors::{RoadgenError, RoadgenResult};
use crate::terrain::constants::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError, ValidationErrors};

/// Every tunable of the pipeline, passed explicitly into each stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_schema"))]
pub struct GenerationConfig {
    /// Elevation quantiles (water|plain, plain|forest, forest|mountain)
    pub quantiles: [f32; 3],

    // Buildable areas
    #[validate(range(min = 1, max = 512))]
    pub buildable_radius: usize,
    #[validate(range(max = 512))]
    pub city_dilation_radius: usize,
    #[validate(range(min = 1))]
    pub city_min_size: usize,

    // Cost field
    pub plain_cost: f32,
    pub forest_cost: f32,
    pub wide_plain_cost: f32,
    pub wide_forest_cost: f32,
    pub narrow_penalty: f32,
    #[validate(range(max = 64))]
    pub coast_tolerance: usize,
    pub coast_cost: f32,

    // Road network
    #[validate(range(min = 1))]
    pub corridor_margin: usize,
    #[validate(range(min = 0.0, max = 100.0))]
    pub corridor_border_weight: f32,
    #[validate(range(min = 1))]
    pub city_block_spacing: usize,
    pub avenue_grid: bool,
    #[validate(range(min = 1))]
    pub street_spacing: usize,
    pub street_inset: usize,
    #[validate(range(max = 64))]
    pub thickening_radius: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            quantiles: DEFAULT_QUANTILES,
            buildable_radius: DEFAULT_BUILDABLE_RADIUS,
            city_dilation_radius: DEFAULT_CITY_DILATION_RADIUS,
            city_min_size: DEFAULT_CITY_MIN_SIZE,
            plain_cost: DEFAULT_PLAIN_COST,
            forest_cost: DEFAULT_FOREST_COST,
            wide_plain_cost: DEFAULT_WIDE_PLAIN_COST,
            wide_forest_cost: DEFAULT_WIDE_FOREST_COST,
            narrow_penalty: DEFAULT_NARROW_PENALTY,
            coast_tolerance: DEFAULT_COAST_TOLERANCE,
            coast_cost: DEFAULT_COAST_COST,
            corridor_margin: DEFAULT_CORRIDOR_MARGIN,
            corridor_border_weight: DEFAULT_CORRIDOR_BORDER_WEIGHT,
            city_block_spacing: DEFAULT_CITY_BLOCK_SPACING,
            avenue_grid: false,
            street_spacing: DEFAULT_STREET_SPACING,
            street_inset: DEFAULT_STREET_INSET,
            thickening_radius: DEFAULT_THICKENING_RADIUS,
        }
    }
}

fn validate_quantiles(config: &GenerationConfig) -> Result<(), ValidationError> {
    let [q1, q2, q3] = config.quantiles;
    if q1 > 0.0 && q1 < q2 && q2 < q3 && q3 < 1.0 {
        Ok(())
    } else {
        let mut error = ValidationError::new("quantiles");
        error.message = Some(
            format!("quantiles must satisfy 0 < q1 < q2 < q3 < 1, got {q1}, {q2}, {q3}").into(),
        );
        Err(error)
    }
}

fn validate_costs(config: &GenerationConfig) -> Result<(), ValidationError> {
    let costs = [
        ("plain_cost", config.plain_cost),
        ("forest_cost", config.forest_cost),
        ("wide_plain_cost", config.wide_plain_cost),
        ("wide_forest_cost", config.wide_forest_cost),
        ("narrow_penalty", config.narrow_penalty),
        ("coast_cost", config.coast_cost),
    ];
    match costs
        .iter()
        .find(|(_, value)| !(value.is_finite() && *value > 0.0))
    {
        None => Ok(()),
        Some((name, value)) => {
            let mut error = ValidationError::new("costs");
            error.message = Some(format!("{name} must be finite and positive, got {value}").into());
            Err(error)
        }
    }
}

fn validate_border_weight(config: &GenerationConfig) -> Result<(), ValidationError> {
    if config.corridor_border_weight.is_finite() {
        Ok(())
    } else {
        let mut error = ValidationError::new("corridor_border_weight");
        error.message = Some(
            format!(
                "corridor_border_weight must be finite, got {}",
                config.corridor_border_weight
            )
            .into(),
        );
        Err(error)
    }
}

fn validate_schema(config: &GenerationConfig) -> Result<(), ValidationError> {
    validate_quantiles(config)?;
    validate_costs(config)?;
    validate_border_weight(config)
}

/// Flatten validator output into one readable line
fn describe_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            format!("{field}: {}", error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

impl GenerationConfig {
    /// Validate every parameter, failing before any grid work starts
    pub fn validated(self) -> RoadgenResult<Self> {
        self.check()?;
        Ok(self)
    }

    pub fn check(&self) -> RoadgenResult<()> {
        self.validate()
            .map_err(|validation_errors| RoadgenError::InvalidConfig {
                reason: describe_validation_errors(&validation_errors),
            })
    }
}

/// Default config location, `<config dir>/cityroads/config.toml`
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("cityroads");
        path.push("config.toml");
        path
    })
}

/// Load the default config file, falling back to built-in defaults
pub fn load_config() -> GenerationConfig {
    if let Some(config_path) = get_config_path() {
        if let Ok(config) = load_config_from(&config_path) {
            return config;
        }
    }
    GenerationConfig::default()
}

/// Load and validate a config file; missing keys take their default values
pub fn load_config_from<P: AsRef<Path>>(path: P) -> RoadgenResult<GenerationConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RoadgenError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    let config: GenerationConfig = toml::from_str(&contents)?;
    config.validated()
}

/// Save to the default config location
pub fn save_config(config: &GenerationConfig) -> RoadgenResult<()> {
    let path = get_config_path().ok_or(RoadgenError::ConfigDirNotFound)?;
    save_config_to(path, config)
}

pub fn save_config_to<P: AsRef<Path>>(path: P, config: &GenerationConfig) -> RoadgenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
