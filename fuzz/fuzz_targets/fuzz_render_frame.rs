#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mviz_core::{Point, RowCount, Triangle, Viewport, step_to_cell, total_steps};
use mviz_render::{RenderInput, ascii, render_triangle};
use mviz_style::{StyleSheet, Theme, ThemeMode};

#[derive(Debug, Arbitrary)]
struct Input {
    rows: u8,
    step: Option<u16>,
    width: f32,
    height: f32,
    dark: bool,
    probe: (f32, f32),
    cols: u8,
    lines: u8,
}

fuzz_target!(|input: Input| {
    let rows = usize::from(input.rows % 64) + 1;
    let Ok(row_count) = RowCount::new(rows) else {
        return;
    };
    let triangle = Triangle::build(row_count);
    let total = total_steps(rows);
    let step = input.step.map(|s| usize::from(s) % total);
    let active = step
        .and_then(|s| step_to_cell(s, rows).ok())
        .filter(|cell| cell.is_interior());

    let mode = if input.dark { ThemeMode::Dark } else { ThemeMode::Light };
    let sheet = StyleSheet::resolve(&Theme::default(), mode);
    let viewport = Viewport::new(input.width, input.height);
    let frame = render_triangle(
        &RenderInput {
            triangle: &triangle,
            step,
            active,
            viewport,
        },
        &sheet,
    );

    if viewport.is_degenerate() {
        assert!(frame.is_empty());
        return;
    }
    assert_eq!(frame.hits().len(), total);
    for cell in mviz_core::cells(rows) {
        let revealed = step.is_some_and(|s| mviz_core::cell_to_step(cell) <= s);
        let label = frame.label(cell).expect("every cell is labelled");
        assert_eq!(label == "?", !revealed, "{cell} label {label}");
    }
    assert_eq!(frame.formula().is_some(), active.is_some());

    let _ = frame.hit_test(Point::new(input.probe.0, input.probe.1));
    let cols = usize::from(input.cols % 120) + 1;
    let lines = usize::from(input.lines % 60) + 1;
    let raster = ascii::rasterize(&frame, cols, lines);
    assert_eq!(raster.split('\n').count(), lines);
});
