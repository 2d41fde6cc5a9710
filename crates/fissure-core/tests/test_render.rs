mod common;

use common::uniform;
use fissure_core::layer::LayerStack;
use fissure_core::render::{render, resample, ruler, RenderOptions, ResampleKernel};
use fissure_core::slice::Slice;
use fissure_core::transform::TransformEngine;

fn checker_slice() -> Slice {
    let mut data = uniform(8, 8, 0);
    for ((y, x), v) in data.indexed_iter_mut() {
        if (x + y) % 2 == 0 {
            *v = 240;
        }
    }
    Slice::new(data, "mem".into(), 8)
}

/// Options for tests asserting raw image pixels, where ruler ticks at the
/// canvas edges would get in the way.
fn image_only() -> RenderOptions {
    RenderOptions {
        ruler_visible: false,
        ..Default::default()
    }
}

#[test]
fn test_render_without_slice_is_blank() {
    let frame = render(
        &TransformEngine::new(),
        16,
        16,
        None,
        &LayerStack::new(),
        &RenderOptions::default(),
    );
    assert!(frame.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn test_render_zero_area_canvas_is_blank() {
    let slice = checker_slice();
    let frame = render(
        &TransformEngine::new(),
        0,
        16,
        Some(&slice),
        &LayerStack::new(),
        &RenderOptions::default(),
    );
    assert_eq!(frame.width(), 0);
}

#[test]
fn test_identity_transform_copies_pixels() {
    let slice = checker_slice();
    let frame = render(
        &TransformEngine::new(),
        8,
        8,
        Some(&slice),
        &LayerStack::new(),
        &image_only(),
    );
    for (x, y, px) in frame.enumerate_pixels() {
        let v = slice.data[[y as usize, x as usize]];
        assert_eq!(px.0, [v, v, v, 255]);
    }
}

#[test]
fn test_offscreen_area_renders_background() {
    let slice = checker_slice();
    let mut transform = TransformEngine::new();
    transform.translate(4.0, 0.0);
    let frame = render(
        &transform,
        16,
        8,
        Some(&slice),
        &LayerStack::new(),
        &image_only(),
    );
    // Left of the shifted image there is nothing to sample.
    assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(frame.get_pixel(3, 0).0, [0, 0, 0, 255]);
}

#[test]
fn test_active_layer_tints_painted_pixels() {
    let slice = Slice::new(uniform(4, 4, 0), "mem".into(), 8);
    let mut layers = LayerStack::new();
    let mut overlay = uniform(4, 4, 0);
    overlay[[1, 2]] = 255;
    layers.push_raster(overlay, None);
    layers.active_mut().unwrap().color = [255, 0, 0];

    let frame = render(
        &TransformEngine::new(),
        4,
        4,
        Some(&slice),
        &layers,
        &image_only(),
    );
    // Full intensity, brightness 1, opacity 1: pure layer color.
    assert_eq!(frame.get_pixel(2, 1).0, [255, 0, 0, 255]);
    // Unpainted pixels keep the base value.
    assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn test_invisible_layer_is_skipped() {
    let slice = Slice::new(uniform(4, 4, 7), "mem".into(), 8);
    let mut layers = LayerStack::new();
    layers.push_raster(uniform(4, 4, 255), None);
    layers.active_mut().unwrap().visible = false;

    let frame = render(
        &TransformEngine::new(),
        4,
        4,
        Some(&slice),
        &layers,
        &image_only(),
    );
    assert_eq!(frame.get_pixel(0, 0).0, [7, 7, 7, 255]);
}

#[test]
fn test_overlays_visible_flag_hides_all_layers() {
    let slice = Slice::new(uniform(4, 4, 7), "mem".into(), 8);
    let mut layers = LayerStack::new();
    layers.push_raster(uniform(4, 4, 255), None);

    let opts = RenderOptions {
        overlays_visible: false,
        ruler_visible: false,
        ..Default::default()
    };
    let frame = render(&TransformEngine::new(), 4, 4, Some(&slice), &layers, &opts);
    assert_eq!(frame.get_pixel(1, 1).0, [7, 7, 7, 255]);
}

#[test]
fn test_opacity_halves_layer_contribution() {
    let slice = Slice::new(uniform(2, 2, 0), "mem".into(), 8);
    let mut layers = LayerStack::new();
    layers.push_raster(uniform(2, 2, 255), None);
    let active = layers.active_mut().unwrap();
    active.color = [255, 0, 0];
    active.set_opacity(0.5).unwrap();

    let frame = render(
        &TransformEngine::new(),
        2,
        2,
        Some(&slice),
        &layers,
        &image_only(),
    );
    let px = frame.get_pixel(0, 0).0;
    assert!((px[0] as i16 - 128).abs() <= 1);
    assert_eq!(px[1], 0);
}

#[test]
fn test_ruler_drawn_by_default() {
    let slice = Slice::new(uniform(32, 32, 0), "mem".into(), 8);
    let frame = render(
        &TransformEngine::new(),
        32,
        32,
        Some(&slice),
        &LayerStack::new(),
        &RenderOptions::default(),
    );
    // The first tick sits at the canvas origin in every composed frame.
    assert_eq!(frame.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

fn label_present(img: &image::RgbaImage, x0: u32, y0: u32) -> bool {
    // A digit glyph occupies a 3x5 box; any set pixel counts.
    (y0..y0 + 5).any(|y| (x0..x0 + 3).any(|x| img.get_pixel(x, y).0[3] != 0))
}

#[test]
fn test_ruler_labels_every_tick() {
    // 21 ticks fit, above the legibility floor, so spacing stays 20.
    let img = ruler::draw_ruler(400, 400, 20.0);

    // Labels start 2 px past the tick, below the 12 px tick stubs.
    for k in [0u32, 1, 3, 7] {
        let x = k * 20;
        assert!(
            label_present(&img, x + 2, 14),
            "top-edge tick {k} has no label"
        );
        assert!(
            label_present(&img, 14, x + 2),
            "left-edge tick {k} has no label"
        );
    }
}

#[test]
fn test_ruler_major_ticks_are_longer() {
    let img = ruler::draw_ruler(400, 400, 20.0);
    // k=5 is a major tick (full 12 px), k=1 a minor one (6 px).
    assert_eq!(img.get_pixel(100, 11).0[3], 255);
    assert_eq!(img.get_pixel(20, 5).0[3], 255);
    assert_eq!(img.get_pixel(20, 11).0[3], 0);
}

#[test]
fn test_bilinear_interpolates_between_neighbors() {
    let mut data = uniform(2, 1, 0);
    data[[0, 1]] = 100;
    let mut transform = TransformEngine::new();
    transform.scale_at(2.0, 0.0, 0.0);
    let inv = transform.inverse();

    // Canvas x=1 maps to source x=0.5, halfway between 0 and 100.
    let out = resample(&data, &inv, 2, 1, ResampleKernel::Bilinear);
    assert_eq!(out[[0, 1]], 50);
}

#[test]
fn test_nearest_rounds_to_closest_pixel() {
    let mut data = uniform(2, 1, 10);
    data[[0, 1]] = 90;
    let mut transform = TransformEngine::new();
    transform.scale_at(2.0, 0.0, 0.0);
    let inv = transform.inverse();

    let out = resample(&data, &inv, 4, 1, ResampleKernel::Nearest);
    assert_eq!(out[[0, 0]], 10); // source 0.0
    assert_eq!(out[[0, 2]], 90); // source 1.0
}

#[test]
fn test_bicubic_preserves_constant_regions() {
    let data = uniform(8, 8, 77);
    let mut transform = TransformEngine::new();
    transform.scale_at(1.5, 0.0, 0.0);
    let inv = transform.inverse();

    let out = resample(&data, &inv, 8, 8, ResampleKernel::Bicubic);
    // Interior samples, away from the zero padding at the border.
    assert_eq!(out[[3, 3]], 77);
    assert_eq!(out[[4, 5]], 77);
}
