use serde::Serialize;

use crate::geometry::Placement;

use super::planner::{ColumnPlan, clamp_span};

/// Declared span parsed from a per-item attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span(pub u32);

impl Default for Span {
    fn default() -> Self {
        Self(1)
    }
}

impl Span {
    /// Lenient attribute parsing. Missing or non-numeric values fall back to a
    /// single column; fractions truncate, oversized values saturate at
    /// `u32::MAX` and negatives become zero. The packer clamps the rest.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };
        if let Ok(value) = raw.parse::<u32>() {
            return Self(value);
        }
        match raw.parse::<f64>() {
            // Infinities saturate like any other out-of-range count.
            Ok(value) if !value.is_nan() => Self(value.trunc().clamp(0.0, u32::MAX as f64) as u32),
            _ => Self::default(),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// One item as seen by the packer, in document order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDescriptor {
    pub span: u32,
    pub measured_height: f64,
}

impl ItemDescriptor {
    pub const fn new(span: u32, measured_height: f64) -> Self {
        Self {
            span,
            measured_height,
        }
    }

    pub const fn single(measured_height: f64) -> Self {
        Self::new(1, measured_height)
    }
}

/// Positioning instructions for the style sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutResult {
    /// Clear every override written by a previous pass.
    Reset,
    Placed {
        items: Vec<Placement>,
        container_height: f64,
    },
}

impl LayoutResult {
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Reset)
    }

    pub fn placements(&self) -> &[Placement] {
        match self {
            Self::Reset => &[],
            Self::Placed { items, .. } => items,
        }
    }

    pub fn container_height(&self) -> Option<f64> {
        match self {
            Self::Reset => None,
            Self::Placed {
                container_height, ..
            } => Some(*container_height),
        }
    }
}

/// Greedy shortest-column packer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackingEngine;

impl PackingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn pack(&self, plan: &ColumnPlan, items: &[ItemDescriptor]) -> LayoutResult {
        if !plan.is_active() {
            return LayoutResult::Reset;
        }

        let mut column_heights = vec![0.0_f64; plan.column_count];
        let pitch = plan.pitch();
        let mut placements = Vec::with_capacity(items.len());

        for item in items {
            let span = clamp_span(item.span, plan.column_count);
            let (column, top) = find_slot(&column_heights, span);
            let bottom = top + item.measured_height + plan.vertical_gap;
            for height in &mut column_heights[column..column + span] {
                *height = bottom;
            }
            placements.push(Placement::new(
                pitch * column as f64,
                top,
                plan.column_widths[span - 1],
            ));
        }

        LayoutResult::Placed {
            items: placements,
            container_height: column_heights.iter().copied().fold(0.0, f64::max),
        }
    }
}

/// Start column of the contiguous `span`-wide run with the lowest bottom, and
/// that bottom. Ties keep the leftmost run.
pub fn find_slot(column_heights: &[f64], span: usize) -> (usize, f64) {
    let span = span.clamp(1, column_heights.len().max(1));
    let mut best = (0, 0.0);
    for (start, window) in column_heights.windows(span).enumerate() {
        let height = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if start == 0 || height < best.1 {
            best = (start, height);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BreakpointConfig, GlobalLimits};
    use crate::layout::planner::ColumnPlanner;

    fn plan(columns: u32, container: f64) -> ColumnPlan {
        let config = BreakpointConfig::fixed(0.0, columns).with_gap_ratios(0.01, 0.05);
        ColumnPlanner::new(GlobalLimits::new(10.0, 30.0)).plan(Some(&config), container)
    }

    #[test]
    fn inactive_plan_resets() {
        let result = PackingEngine::new().pack(&ColumnPlan::inactive(), &[ItemDescriptor::single(50.0)]);
        assert_eq!(result, LayoutResult::Reset);
        assert!(result.placements().is_empty());
    }

    #[test]
    fn find_slot_ties_favor_leftmost() {
        assert_eq!(find_slot(&[0.0, 0.0, 0.0], 1), (0, 0.0));
        assert_eq!(find_slot(&[20.0, 5.0, 5.0], 1), (1, 5.0));
        assert_eq!(find_slot(&[10.0, 30.0, 0.0, 0.0], 2), (2, 0.0));
        assert_eq!(find_slot(&[10.0, 30.0, 0.0, 40.0], 2), (0, 30.0));
    }

    #[test]
    fn find_slot_full_span_uses_tallest_column() {
        assert_eq!(find_slot(&[10.0, 70.0, 20.0], 3), (0, 70.0));
    }

    #[test]
    fn single_span_items_stack_without_overlap() {
        let plan = plan(3, 930.0);
        let heights = [120.0, 80.0, 200.0, 40.0, 60.0, 90.0, 150.0];
        let items: Vec<_> = heights.iter().map(|h| ItemDescriptor::single(*h)).collect();

        let result = PackingEngine::new().pack(&plan, &items);
        let placements = result.placements();
        assert_eq!(placements.len(), items.len());

        let mut column_sums = vec![0.0; plan.column_count];
        let mut by_column: Vec<Vec<(f64, f64)>> = vec![Vec::new(); plan.column_count];
        for (placement, item) in placements.iter().zip(&items) {
            let column = (placement.left / plan.pitch()).round() as usize;
            assert_eq!(placement.top, column_sums[column]);
            column_sums[column] += item.measured_height + plan.vertical_gap;
            by_column[column].push((placement.top, placement.top + item.measured_height));
        }

        for spans in &by_column {
            for pair in spans.windows(2) {
                assert!(pair[0].1 <= pair[1].0);
            }
        }
        let tallest = column_sums.iter().copied().fold(0.0, f64::max);
        assert_eq!(result.container_height(), Some(tallest));
    }

    #[test]
    fn spanning_item_waits_for_both_columns() {
        let plan = plan(3, 930.0);
        let items = [
            ItemDescriptor::single(100.0),
            ItemDescriptor::single(50.0),
            ItemDescriptor::single(70.0),
            ItemDescriptor::new(2, 40.0),
        ];

        let result = PackingEngine::new().pack(&plan, &items);
        let placed = result.placements();
        let gap = plan.vertical_gap;

        // Columns end at 100+g, 50+g, 70+g; the pair (1, 2) has the lowest max.
        assert_eq!(placed[3].left, plan.pitch());
        assert_eq!(placed[3].top, 70.0 + gap);
        assert_eq!(placed[3].width, 610.0);
        assert_eq!(result.container_height(), Some(70.0 + gap + 40.0 + gap));
    }

    #[test]
    fn pitch_ignores_item_span() {
        let plan = plan(4, 1000.0);
        let items = [ItemDescriptor::single(500.0), ItemDescriptor::new(3, 10.0)];
        let placed = PackingEngine::new().pack(&plan, &items);

        let second = placed.placements()[1];
        assert_eq!(second.left, plan.column_widths[0] + plan.horizontal_gap);
        assert_eq!(second.width, plan.column_widths[2]);
    }

    #[test]
    fn out_of_range_spans_are_clamped() {
        let plan = plan(2, 600.0);
        let items = [ItemDescriptor::new(0, 10.0), ItemDescriptor::new(7, 10.0)];
        let placed = PackingEngine::new().pack(&plan, &items);

        assert_eq!(placed.placements()[0].width, plan.column_widths[0]);
        assert_eq!(placed.placements()[1].width, plan.column_widths[1]);
        assert_eq!(placed.placements()[1].left, 0.0);
    }

    #[test]
    fn empty_item_list_has_zero_height() {
        let result = PackingEngine::new().pack(&plan(3, 900.0), &[]);
        assert_eq!(
            result,
            LayoutResult::Placed {
                items: Vec::new(),
                container_height: 0.0
            }
        );
    }

    #[test]
    fn span_parse_is_lenient() {
        assert_eq!(Span::parse(None), Span(1));
        assert_eq!(Span::parse(Some("")), Span(1));
        assert_eq!(Span::parse(Some(" 3 ")), Span(3));
        assert_eq!(Span::parse(Some("2.7")), Span(2));
        assert_eq!(Span::parse(Some("-4")), Span(0));
        assert_eq!(Span::parse(Some("wide")), Span(1));
        assert_eq!(Span::parse(Some("NaN")), Span(1));
    }

    #[test]
    fn oversized_spans_saturate_and_clamp_to_full_width() {
        assert_eq!(Span::parse(Some("1e99")), Span(u32::MAX));
        assert_eq!(Span::parse(Some("Infinity")), Span(u32::MAX));
        assert_eq!(Span::parse(Some("-Infinity")), Span(0));

        let plan = plan(3, 930.0);
        let declared = Span::parse(Some("Infinity")).get();
        let placed = PackingEngine::new().pack(&plan, &[ItemDescriptor::new(declared, 10.0)]);
        assert_eq!(placed.placements()[0].width, 930.0);
    }
}
