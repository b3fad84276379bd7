use crate::config::BreakpointTarget;
use crate::error::Result;
use crate::geometry::Measurement;
use crate::layout::{LayoutResult, Span};

/// Whether the sink switches the container to relative and items to absolute
/// positioning while a layout is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositioningMode {
    Absolute,
    Untouched,
}

impl PositioningMode {
    pub fn from_flag(apply: bool) -> Self {
        if apply { Self::Absolute } else { Self::Untouched }
    }
}

/// Load state of an image inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Complete,
    Pending,
}

/// Supplies the two widths a pass needs.
pub trait MeasurementProvider {
    /// Locate the layout container. `false` aborts construction.
    fn bind_container(&mut self, selector: &str) -> bool;

    /// Locate the breakpoint target. The viewport must always bind.
    fn bind_target(&mut self, target: &BreakpointTarget) -> bool;

    fn measure(&self) -> Measurement;
}

/// Supplies the ordered items and their rendered heights.
pub trait ItemProvider {
    /// Collect the items matching `selector`; returns how many were found.
    fn bind_items(&mut self, selector: &str) -> usize;

    fn item_count(&self) -> usize;

    fn declared_span(&self, index: usize) -> Span;

    /// Height as currently rendered, read after widths were pre-sized.
    fn measured_height(&self, index: usize) -> f64;

    fn image_states(&self) -> Vec<ImageState> {
        Vec::new()
    }
}

/// Receives positioning instructions.
pub trait StyleSink {
    /// Set item widths ahead of height measurement; `widths[i]` belongs to item `i`.
    fn presize(&mut self, _widths: &[f64]) -> Result<()> {
        Ok(())
    }

    /// Apply a pass result. Returns how many style entries actually changed.
    fn apply(&mut self, result: &LayoutResult, mode: PositioningMode) -> Result<usize>;

    fn mark_initialized(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Everything the controller needs from its environment.
pub trait LayoutHost: MeasurementProvider + ItemProvider + StyleSink {}

impl<T> LayoutHost for T where T: MeasurementProvider + ItemProvider + StyleSink {}
