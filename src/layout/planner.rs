use crate::config::{BreakpointConfig, GlobalLimits, GridSpec};

/// Which path produced a [`ColumnPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanStrategy {
    #[default]
    Inactive,
    Fixed,
    Adaptive,
}

impl PlanStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Fixed => "fixed",
            Self::Adaptive => "adaptive",
        }
    }
}

/// Column geometry for one layout pass.
///
/// `column_widths[s]` is the width of an item spanning `s + 1` columns.
/// A plan with zero columns means "no active layout".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnPlan {
    pub column_count: usize,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    pub column_widths: Vec<f64>,
    pub strategy: PlanStrategy,
}

impl ColumnPlan {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.column_count > 0
    }

    /// Single-column width.
    pub fn base_width(&self) -> f64 {
        self.column_widths.first().copied().unwrap_or(0.0)
    }

    /// Horizontal distance between the left edges of adjacent columns.
    pub fn pitch(&self) -> f64 {
        self.base_width() + self.horizontal_gap
    }

    /// Width of an item declaring `span`, after clamping to the grid.
    pub fn width_for_span(&self, span: u32) -> Option<f64> {
        if !self.is_active() {
            return None;
        }
        let span = clamp_span(span, self.column_count);
        self.column_widths.get(span - 1).copied()
    }
}

/// Clamp a declared span into `1..=column_count`.
pub fn clamp_span(span: u32, column_count: usize) -> usize {
    (span as usize).clamp(1, column_count.max(1))
}

/// Outcome of the adaptive column search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveLayout {
    pub column_count: usize,
    pub item_width: f64,
    pub gutter: f64,
}

/// Derives column geometry from the active breakpoint and the container width.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnPlanner {
    limits: GlobalLimits,
}

impl ColumnPlanner {
    pub fn new(limits: GlobalLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> GlobalLimits {
        self.limits
    }

    pub fn plan(&self, active: Option<&BreakpointConfig>, container_width: f64) -> ColumnPlan {
        let Some(config) = active else {
            return ColumnPlan::inactive();
        };
        // Also rejects NaN widths coming from a detached container.
        if !(container_width >= 1.0) {
            return ColumnPlan::inactive();
        }

        let (column_count, base_width, horizontal_gap, strategy) = match config.grid {
            GridSpec::Fixed { columns } => {
                let column_count = columns.max(1) as usize;
                let gap = self.limits.clamp_gap(container_width * config.gap_ratio_y);
                let base = (container_width - gap * (column_count - 1) as f64) / column_count as f64;
                (column_count, base, gap, PlanStrategy::Fixed)
            }
            GridSpec::Adaptive {
                item_min_width,
                item_max_width,
            } => {
                let Some(adaptive) = derive_adaptive_layout(
                    container_width,
                    item_min_width,
                    item_max_width,
                    config.gap_ratio_x,
                    self.limits,
                ) else {
                    return ColumnPlan::inactive();
                };
                (
                    adaptive.column_count,
                    adaptive.item_width,
                    adaptive.gutter,
                    PlanStrategy::Adaptive,
                )
            }
        };

        // The vertical gutter follows gapRatioX on both paths.
        let vertical_gap = self.limits.clamp_gap(container_width * config.gap_ratio_x);

        ColumnPlan {
            column_count,
            horizontal_gap,
            vertical_gap,
            column_widths: span_widths(base_width, horizontal_gap, column_count),
            strategy,
        }
    }
}

fn span_widths(base_width: f64, gap: f64, column_count: usize) -> Vec<f64> {
    (1..=column_count)
        .map(|span| base_width * span as f64 + gap * (span - 1) as f64)
        .collect()
}

/// Pick a column count whose item width lands in `[item_min_width, item_max_width]`.
///
/// Returns `None` when the container is narrower than one pixel or the minimum
/// width is not positive.
pub fn derive_adaptive_layout(
    container_width: f64,
    item_min_width: f64,
    item_max_width: f64,
    gap_ratio: f64,
    limits: GlobalLimits,
) -> Option<AdaptiveLayout> {
    let mut item_min_width = item_min_width;
    if container_width < item_min_width {
        item_min_width = container_width;
    }
    if !(container_width >= 1.0) || !(item_min_width > 0.0) {
        return None;
    }

    let max_columns = container_width / item_min_width;
    let mut column_count = (max_columns.floor() as usize).max(1);
    let gutter = limits.clamp_gap(container_width * gap_ratio);
    let width_for =
        |count: usize| (container_width - gutter * (count - 1) as f64) / count as f64;

    let mut item_width = width_for(column_count);
    while item_width > item_max_width && (column_count as f64) < max_columns {
        column_count += 1;
        item_width = width_for(column_count);
    }
    while item_width < item_min_width && column_count > 1 {
        column_count -= 1;
        item_width = width_for(column_count);
    }

    if item_width > item_max_width {
        item_width = item_max_width;
    } else if item_width < item_min_width {
        item_width = item_min_width;
    }

    let mut gutter = gutter;
    let used = item_width * column_count as f64 + gutter * (column_count - 1) as f64;
    if used < container_width && column_count > 1 {
        gutter = (container_width - item_width * column_count as f64) / (column_count - 1) as f64;
    }

    Some(AdaptiveLayout {
        column_count,
        item_width,
        gutter,
    })
}
