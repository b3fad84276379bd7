use std::io::Write;

use crate::controller::{PositioningMode, StyleSink};
use crate::error::{MasonryError, Result};
use crate::layout::LayoutResult;
use crate::registry::{StyleDecl, StyleRegistry, StyleTarget};

/// Selectors used when emitting declaration blocks.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    pub container_selector: String,
    pub item_selector: String,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            container_selector: crate::config::DEFAULT_CONTAINER_SELECTOR.to_string(),
            item_selector: crate::config::DEFAULT_ITEM_SELECTOR.to_string(),
        }
    }
}

/// Writes style entries as CSS rule blocks.
///
/// Each block stands for the element's complete set of layout-owned inline
/// declarations; an empty block clears them.
pub struct CssRenderer {
    settings: RendererSettings,
}

impl CssRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn render(
        &self,
        writer: &mut impl Write,
        dirty: &[(StyleTarget, StyleDecl)],
    ) -> Result<()> {
        for (target, decl) in dirty {
            let selector = self.selector_for(*target);
            writeln!(writer, "{selector} {{{}}}", declarations(decl))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn selector_for(&self, target: StyleTarget) -> String {
        match target {
            StyleTarget::Container => self.settings.container_selector.clone(),
            StyleTarget::Item(index) => {
                format!("{}:nth-child({})", self.settings.item_selector, index + 1)
            }
        }
    }
}

fn declarations(decl: &StyleDecl) -> String {
    let mut out = String::new();
    let lengths = [
        ("width", decl.width),
        ("left", decl.left),
        ("top", decl.top),
        ("height", decl.height),
    ];
    for (property, value) in lengths {
        if let Some(value) = value {
            out.push_str(&format!(" {property}: {value}px;"));
        }
    }
    if let Some(position) = decl.position {
        out.push_str(&format!(" position: {position};"));
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out
}

/// [`StyleSink`] that renders only changed elements to a writer.
pub struct CssSink<W: Write> {
    registry: StyleRegistry,
    renderer: CssRenderer,
    writer: W,
    item_count: usize,
    initialized: bool,
}

impl<W: Write> CssSink<W> {
    pub fn new(writer: W, renderer: CssRenderer) -> Self {
        Self {
            registry: StyleRegistry::new(),
            renderer,
            writer,
            item_count: 0,
            initialized: false,
        }
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Rejects instructions that would render as `NaNpx` or `infpx`.
fn check_finite(result: &LayoutResult) -> Result<()> {
    if let LayoutResult::Placed {
        items,
        container_height,
    } = result
    {
        if !container_height.is_finite() {
            return Err(MasonryError::Sink(format!(
                "container height {container_height} is not finite"
            )));
        }
        for (index, placement) in items.iter().enumerate() {
            let lengths = [placement.left, placement.top, placement.width];
            if lengths.iter().any(|value| !value.is_finite()) {
                return Err(MasonryError::Sink(format!(
                    "item {index} has a non-finite placement {placement:?}"
                )));
            }
        }
    }
    Ok(())
}

impl<W: Write> StyleSink for CssSink<W> {
    /// Static CSS output cannot reflow, so widths are only counted here and
    /// written alongside the positions in `apply`.
    fn presize(&mut self, widths: &[f64]) -> Result<()> {
        self.item_count = widths.len();
        Ok(())
    }

    fn apply(&mut self, result: &LayoutResult, mode: PositioningMode) -> Result<usize> {
        check_finite(result)?;
        let item_count = match result {
            LayoutResult::Reset => self.item_count,
            LayoutResult::Placed { items, .. } => items.len(),
        };
        self.item_count = item_count;
        self.registry.sync(result, mode, item_count);
        let dirty = self.registry.take_dirty();
        if !dirty.is_empty() {
            self.renderer.render(&mut self.writer, &dirty)?;
        }
        Ok(dirty.len())
    }

    fn mark_initialized(&mut self) -> Result<()> {
        if !self.initialized {
            self.initialized = true;
            writeln!(
                self.writer,
                "/* {} masonry-initialized */",
                self.renderer.settings().container_selector
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Placement;

    fn placed() -> LayoutResult {
        LayoutResult::Placed {
            items: vec![
                Placement::new(0.0, 0.0, 290.0),
                Placement::new(320.0, 0.0, 610.0),
            ],
            container_height: 140.5,
        }
    }

    fn output(sink: &CssSink<Vec<u8>>) -> String {
        String::from_utf8(sink.writer().clone()).unwrap()
    }

    #[test]
    fn renders_placed_blocks() {
        let mut sink = CssSink::new(Vec::new(), CssRenderer::with_default());
        let written = sink.apply(&placed(), PositioningMode::Absolute).unwrap();

        assert_eq!(written, 3);
        let css = output(&sink);
        assert!(css.contains(".masonry { height: 140.5px; position: relative; }"));
        assert!(css.contains(".items:nth-child(1) { width: 290px; left: 0px; top: 0px; position: absolute; }"));
        assert!(css.contains(".items:nth-child(2) { width: 610px; left: 320px; top: 0px; position: absolute; }"));
    }

    #[test]
    fn repeated_apply_writes_nothing() {
        let mut sink = CssSink::new(Vec::new(), CssRenderer::with_default());
        sink.apply(&placed(), PositioningMode::Untouched).unwrap();
        let before = output(&sink);

        assert_eq!(sink.apply(&placed(), PositioningMode::Untouched).unwrap(), 0);
        assert_eq!(output(&sink), before);
    }

    #[test]
    fn reset_renders_empty_blocks() {
        let settings = RendererSettings {
            container_selector: "#grid".to_string(),
            item_selector: ".card".to_string(),
        };
        let mut sink = CssSink::new(Vec::new(), CssRenderer::new(settings));
        sink.apply(&placed(), PositioningMode::Absolute).unwrap();
        sink.apply(&LayoutResult::Reset, PositioningMode::Absolute).unwrap();

        let css = output(&sink);
        assert!(css.contains("#grid {}"));
        assert!(css.contains(".card:nth-child(2) {}"));
    }

    #[test]
    fn non_finite_placement_is_rejected_before_writing() {
        let mut sink = CssSink::new(Vec::new(), CssRenderer::with_default());
        let broken = LayoutResult::Placed {
            items: vec![Placement::new(0.0, f64::NAN, 290.0)],
            container_height: 100.0,
        };

        let err = sink.apply(&broken, PositioningMode::Absolute).unwrap_err();
        assert!(matches!(err, MasonryError::Sink(_)));
        assert!(output(&sink).is_empty());
        assert!(!sink.registry().has_dirty());

        let unbounded = LayoutResult::Placed {
            items: Vec::new(),
            container_height: f64::INFINITY,
        };
        assert!(matches!(
            sink.apply(&unbounded, PositioningMode::Absolute),
            Err(MasonryError::Sink(_))
        ));
        assert_eq!(sink.apply(&placed(), PositioningMode::Absolute).unwrap(), 3);
    }

    #[test]
    fn initialized_marker_is_written_once() {
        let mut sink = CssSink::new(Vec::new(), CssRenderer::with_default());
        sink.mark_initialized().unwrap();
        sink.mark_initialized().unwrap();

        assert!(sink.is_initialized());
        assert_eq!(output(&sink).matches("masonry-initialized").count(), 1);
    }
}
