use std::io;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use masonry_layout::logging::NullSink;
use masonry_layout::{
    BreakpointConfig, BreakpointTarget, ControllerOptions, CssRenderer, CssSink, ItemDescriptor,
    ItemProvider, LayoutController, LayoutResult, Logger, MasonryConfig, Measurement,
    MeasurementProvider, PositioningMode, Result, Span, StyleSink, Trigger,
};

const ITEM_COUNT: usize = 400;

/// Synthetic page: item heights reflow with the width they are given.
struct BenchHost {
    widths: Vec<(f64, f64)>,
    step: usize,
    spans: Vec<u32>,
    areas: Vec<f64>,
    presized: Vec<f64>,
    sink: CssSink<io::Sink>,
}

impl BenchHost {
    fn new() -> Self {
        Self {
            widths: vec![(1180.0, 1200.0), (740.0, 768.0), (360.0, 375.0), (1900.0, 1920.0)],
            step: 0,
            spans: (0..ITEM_COUNT)
                .map(|idx| if idx % 7 == 0 { 2 } else { 1 })
                .collect(),
            areas: (0..ITEM_COUNT)
                .map(|idx| 20_000.0 + (idx * 7919 % 60_000) as f64)
                .collect(),
            presized: vec![0.0; ITEM_COUNT],
            sink: CssSink::new(io::sink(), CssRenderer::with_default()),
        }
    }
}

impl MeasurementProvider for BenchHost {
    fn bind_container(&mut self, _selector: &str) -> bool {
        true
    }

    fn bind_target(&mut self, _target: &BreakpointTarget) -> bool {
        true
    }

    fn measure(&self) -> Measurement {
        let (container, target) = self.widths[self.step % self.widths.len()];
        Measurement::new(container, target)
    }
}

impl ItemProvider for BenchHost {
    fn bind_items(&mut self, _selector: &str) -> usize {
        ITEM_COUNT
    }

    fn item_count(&self) -> usize {
        ITEM_COUNT
    }

    fn declared_span(&self, index: usize) -> Span {
        Span(self.spans[index])
    }

    fn measured_height(&self, index: usize) -> f64 {
        self.areas[index] / self.presized[index].max(1.0)
    }
}

impl StyleSink for BenchHost {
    fn presize(&mut self, widths: &[f64]) -> Result<()> {
        self.presized.copy_from_slice(widths);
        self.sink.presize(widths)
    }

    fn apply(&mut self, result: &LayoutResult, mode: PositioningMode) -> Result<usize> {
        self.step += 1;
        self.sink.apply(result, mode)
    }
}

fn config() -> MasonryConfig {
    MasonryConfig::default()
        .with_breakpoint(BreakpointConfig::fixed(0.0, 1))
        .with_breakpoint(BreakpointConfig::fixed(600.0, 3).with_gap_ratios(0.01, 0.02))
        .with_breakpoint(BreakpointConfig::adaptive(1024.0, 220.0, 320.0))
}

fn relayout_resize_script(c: &mut Criterion) {
    let script = vec![Trigger::Resize; 8];
    c.bench_function("relayout_resize_script", |b| {
        b.iter(|| {
            let mut host = BenchHost::new();
            let options = ControllerOptions::default().with_logger(Logger::new(NullSink));
            let controller =
                LayoutController::attach(config(), &mut host, options).expect("controller");
            controller
                .run_scripted(&mut host, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn compute_adaptive(c: &mut Criterion) {
    let mut host = BenchHost::new();
    let controller = LayoutController::attach(config(), &mut host, ControllerOptions::default())
        .expect("controller");
    let items: Vec<ItemDescriptor> = (0..ITEM_COUNT)
        .map(|idx| ItemDescriptor::new(host.spans[idx], host.areas[idx] / 250.0))
        .collect();

    c.bench_function("compute_adaptive", |b| {
        b.iter(|| controller.compute(black_box(Measurement::uniform(1440.0)), black_box(&items)));
    });
}

criterion_group!(benches, relayout_resize_script, compute_adaptive);
criterion_main!(benches);
