//! Construction-time configuration.
//!
//! A [`MasonryConfig`] is parsed once (usually from JSON), validated, and then
//! handed to the controller by value. Nothing in the crate mutates it
//! afterwards; per-pass state is derived from it instead.

use std::path::Path;

use serde::Deserialize;

use crate::error::{MasonryError, Result};

pub const DEFAULT_CONTAINER_SELECTOR: &str = ".masonry";
pub const DEFAULT_ITEM_SELECTOR: &str = ".items";
pub const DEFAULT_GAP_RATIO: f64 = 0.01;
pub const DEFAULT_GAP_MIN: f64 = 10.0;
pub const DEFAULT_GAP_MAX: f64 = 30.0;

/// Top-level options recognized by the layout engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasonryConfig {
    pub container_selector: String,
    pub item_selector: String,
    #[serde(alias = "brakePoints")]
    pub breakpoints: Vec<BreakpointConfig>,
    #[serde(alias = "brakeTargetSelector")]
    pub breakpoint_target: BreakpointTarget,
    pub gap_min: f64,
    pub gap_max: f64,
    #[serde(alias = "initialStyle")]
    pub apply_positioning_mode: bool,
    #[serde(alias = "debug")]
    pub debug_logging: bool,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_string(),
            item_selector: DEFAULT_ITEM_SELECTOR.to_string(),
            breakpoints: Vec::new(),
            breakpoint_target: BreakpointTarget::Viewport,
            gap_min: DEFAULT_GAP_MIN,
            gap_max: DEFAULT_GAP_MAX,
            apply_positioning_mode: true,
            debug_logging: false,
        }
    }
}

impl MasonryConfig {
    /// Parse and validate a JSON options object.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_breakpoint(mut self, breakpoint: BreakpointConfig) -> Self {
        self.breakpoints.push(breakpoint);
        self
    }

    pub fn with_gap_limits(mut self, gap_min: f64, gap_max: f64) -> Self {
        self.gap_min = gap_min;
        self.gap_max = gap_max;
        self
    }

    pub fn with_target(mut self, target: BreakpointTarget) -> Self {
        self.breakpoint_target = target;
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn with_positioning_mode(mut self, enabled: bool) -> Self {
        self.apply_positioning_mode = enabled;
        self
    }

    pub fn limits(&self) -> GlobalLimits {
        GlobalLimits {
            gap_min: self.gap_min,
            gap_max: self.gap_max,
        }
    }

    /// Reject values the numeric paths cannot clamp their way out of.
    pub fn validate(&self) -> Result<()> {
        if self.container_selector.trim().is_empty() {
            return Err(invalid("containerSelector must not be empty"));
        }
        if !is_non_negative(self.gap_min) || !is_non_negative(self.gap_max) {
            return Err(invalid("gapMin and gapMax must be finite and non-negative"));
        }
        if self.gap_min > self.gap_max {
            return Err(invalid(format!(
                "gapMin ({}) exceeds gapMax ({})",
                self.gap_min, self.gap_max
            )));
        }
        for (idx, breakpoint) in self.breakpoints.iter().enumerate() {
            breakpoint
                .validate()
                .map_err(|reason| invalid(format!("breakpoint #{idx}: {reason}")))?;
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> MasonryError {
    MasonryError::InvalidConfig(reason.into())
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Gutter clamps applied to every derived gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalLimits {
    pub gap_min: f64,
    pub gap_max: f64,
}

impl Default for GlobalLimits {
    fn default() -> Self {
        Self {
            gap_min: DEFAULT_GAP_MIN,
            gap_max: DEFAULT_GAP_MAX,
        }
    }
}

impl GlobalLimits {
    pub const fn new(gap_min: f64, gap_max: f64) -> Self {
        Self { gap_min, gap_max }
    }

    /// Floor at `gap_min` first, then cap at `gap_max`.
    pub fn clamp_gap(&self, value: f64) -> f64 {
        value.max(self.gap_min).min(self.gap_max)
    }
}

/// Element whose width selects the active breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum BreakpointTarget {
    #[default]
    Viewport,
    Selector(String),
}

impl From<String> for BreakpointTarget {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "" | "viewport" | "window" => Self::Viewport,
            selector => Self::Selector(selector.to_string()),
        }
    }
}

impl From<&str> for BreakpointTarget {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

/// One responsive configuration, active above `threshold`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointConfig {
    #[serde(alias = "brakePoint")]
    pub threshold: f64,
    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default = "default_gap_ratio")]
    pub gap_ratio_x: f64,
    #[serde(default = "default_gap_ratio")]
    pub gap_ratio_y: f64,
}

fn default_gap_ratio() -> f64 {
    DEFAULT_GAP_RATIO
}

impl BreakpointConfig {
    pub fn new(threshold: f64, grid: GridSpec) -> Self {
        Self {
            threshold,
            grid,
            gap_ratio_x: DEFAULT_GAP_RATIO,
            gap_ratio_y: DEFAULT_GAP_RATIO,
        }
    }

    pub fn fixed(threshold: f64, columns: u32) -> Self {
        Self::new(threshold, GridSpec::Fixed { columns })
    }

    pub fn adaptive(threshold: f64, item_min_width: f64, item_max_width: f64) -> Self {
        Self::new(
            threshold,
            GridSpec::Adaptive {
                item_min_width,
                item_max_width,
            },
        )
    }

    pub fn with_gap_ratios(mut self, gap_ratio_x: f64, gap_ratio_y: f64) -> Self {
        self.gap_ratio_x = gap_ratio_x;
        self.gap_ratio_y = gap_ratio_y;
        self
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.threshold.is_finite() {
            return Err("threshold must be finite".to_string());
        }
        if !self.gap_ratio_x.is_finite() || !self.gap_ratio_y.is_finite() {
            return Err("gap ratios must be finite".to_string());
        }
        if let GridSpec::Adaptive {
            item_min_width,
            item_max_width,
        } = self.grid
        {
            if !(item_min_width.is_finite() && item_min_width > 0.0) {
                return Err("itemMinWidth must be positive".to_string());
            }
            if !item_max_width.is_finite() || item_min_width > item_max_width {
                return Err(format!(
                    "itemMinWidth ({item_min_width}) exceeds itemMaxWidth ({item_max_width})"
                ));
            }
        }
        Ok(())
    }
}

/// Column strategy of a breakpoint.
///
/// JSON accepts a bare number (`"grid": 3`), an explicit `{ "columns": 3 }`,
/// or `{ "itemMinWidth": .., "itemMaxWidth": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "RawGridSpec")]
pub enum GridSpec {
    Fixed { columns: u32 },
    Adaptive { item_min_width: f64, item_max_width: f64 },
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::Fixed { columns: 1 }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGridSpec {
    Columns(u32),
    Fixed {
        columns: u32,
    },
    Adaptive {
        #[serde(rename = "itemMinWidth")]
        item_min_width: f64,
        #[serde(rename = "itemMaxWidth")]
        item_max_width: f64,
    },
}

impl From<RawGridSpec> for GridSpec {
    fn from(raw: RawGridSpec) -> Self {
        match raw {
            RawGridSpec::Columns(columns) | RawGridSpec::Fixed { columns } => {
                Self::Fixed { columns }
            }
            RawGridSpec::Adaptive {
                item_min_width,
                item_max_width,
            } => Self::Adaptive {
                item_min_width,
                item_max_width,
            },
        }
    }
}
