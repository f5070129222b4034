use super::ConfigError;
use crate::workflows::network::{DiscretePalette, GradientPalette, GraphLayout};
use serde::{Deserialize, Serialize};
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const COUNT_THRESHOLD_RANGE: RangeInclusive<usize> = 1..=20;
pub const SAMPLE_SIZE_RANGE: RangeInclusive<usize> = 10..=150;
pub const DEFAULT_MIN_COUNT: usize = 3;
pub const DEFAULT_SAMPLE_SIZE: usize = 20;
pub const DEFAULT_ROOT_LABEL: &str = "You";

/// Chart and graph options chosen by the viewer for a single render.
///
/// Every field has a default so partial JSON payloads deserialize cleanly;
/// call [`VisualizationConfig::validate`] before building anything from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub bar_palette: GradientPalette,
    pub network_palette: DiscretePalette,
    pub graph_layout: GraphLayout,
    pub company_min_count: usize,
    pub position_min_count: usize,
    pub sample_size: usize,
    pub root_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_seed: Option<u64>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            bar_palette: GradientPalette::default(),
            network_palette: DiscretePalette::default(),
            graph_layout: GraphLayout::default(),
            company_min_count: DEFAULT_MIN_COUNT,
            position_min_count: DEFAULT_MIN_COUNT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            sample_seed: None,
        }
    }
}

impl VisualizationConfig {
    /// Defaults overridden by the `NETWORK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(palette) = env_option::<GradientPalette>("NETWORK_BAR_PALETTE")? {
            config.bar_palette = palette;
        }
        if let Some(palette) = env_option::<DiscretePalette>("NETWORK_PALETTE")? {
            config.network_palette = palette;
        }
        if let Some(layout) = env_option::<GraphLayout>("NETWORK_LAYOUT")? {
            config.graph_layout = layout;
        }
        if let Some(count) = env_number("NETWORK_COMPANY_MIN_COUNT")? {
            config.company_min_count = count;
        }
        if let Some(count) = env_number("NETWORK_POSITION_MIN_COUNT")? {
            config.position_min_count = count;
        }
        if let Some(size) = env_number("NETWORK_SAMPLE_SIZE")? {
            config.sample_size = size;
        }
        if let Ok(label) = env::var("NETWORK_ROOT_LABEL") {
            config.root_label = label;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "company_min_count",
            self.company_min_count,
            &COUNT_THRESHOLD_RANGE,
        )?;
        check_range(
            "position_min_count",
            self.position_min_count,
            &COUNT_THRESHOLD_RANGE,
        )?;
        check_range("sample_size", self.sample_size, &SAMPLE_SIZE_RANGE)
    }

    /// Root label shown at the center of each graph; blank input falls back
    /// to the default.
    pub fn root_label(&self) -> &str {
        let trimmed = self.root_label.trim();
        if trimmed.is_empty() {
            DEFAULT_ROOT_LABEL
        } else {
            trimmed
        }
    }
}

/// Viewer choices layered over a [`VisualizationConfig`]. Fields left as
/// `None` keep whatever the base config says.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VisualizationOverrides {
    pub bar_palette: Option<GradientPalette>,
    pub network_palette: Option<DiscretePalette>,
    pub graph_layout: Option<GraphLayout>,
    pub company_min_count: Option<usize>,
    pub position_min_count: Option<usize>,
    pub sample_size: Option<usize>,
    pub root_label: Option<String>,
    pub sample_seed: Option<u64>,
}

impl VisualizationOverrides {
    /// Applies the overrides to `base` and validates the result.
    pub fn apply_to(
        self,
        mut base: VisualizationConfig,
    ) -> Result<VisualizationConfig, ConfigError> {
        if let Some(palette) = self.bar_palette {
            base.bar_palette = palette;
        }
        if let Some(palette) = self.network_palette {
            base.network_palette = palette;
        }
        if let Some(layout) = self.graph_layout {
            base.graph_layout = layout;
        }
        if let Some(count) = self.company_min_count {
            base.company_min_count = count;
        }
        if let Some(count) = self.position_min_count {
            base.position_min_count = count;
        }
        if let Some(size) = self.sample_size {
            base.sample_size = size;
        }
        if let Some(label) = self.root_label {
            base.root_label = label;
        }
        if self.sample_seed.is_some() {
            base.sample_seed = self.sample_seed;
        }

        base.validate()?;
        Ok(base)
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn env_number(variable: &'static str) -> Result<Option<usize>, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                variable,
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

fn env_option<T>(variable: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = crate::workflows::network::ParseOptionError>,
{
    match env::var(variable) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|source| ConfigError::InvalidOption { variable, source }),
        Err(_) => Ok(None),
    }
}
