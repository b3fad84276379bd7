/// Widths sampled once per layout pass, in CSS pixels.
///
/// `container_width` drives column math while `target_width` only selects the
/// active breakpoint. Both may come from the same element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub container_width: f64,
    pub target_width: f64,
}

impl Measurement {
    pub const fn new(container_width: f64, target_width: f64) -> Self {
        Self {
            container_width,
            target_width,
        }
    }

    /// Measurement where the container also acts as the breakpoint target.
    pub const fn uniform(width: f64) -> Self {
        Self::new(width, width)
    }
}

/// Absolute position and width assigned to one item, relative to the container.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

impl Placement {
    pub const fn new(left: f64, top: f64, width: f64) -> Self {
        Self { left, top, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}
