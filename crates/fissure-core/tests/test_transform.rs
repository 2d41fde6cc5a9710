use approx::assert_relative_eq;

use fissure_core::transform::TransformEngine;

#[test]
fn test_round_trip_after_gestures() {
    let mut engine = TransformEngine::new();
    engine.translate(37.0, -12.5);
    engine.scale_at(1.7, 100.0, 80.0);
    engine.rotate_at(23.0, 50.0, 50.0);

    let (ix, iy) = engine.screen_to_image(120.0, 90.0, 1000.0, 1000.0).unwrap();
    let (sx, sy) = engine.image_to_screen(ix, iy);
    assert_relative_eq!(sx, 120.0, epsilon = 1e-9);
    assert_relative_eq!(sy, 90.0, epsilon = 1e-9);
}

#[test]
fn test_screen_to_image_outside_bounds() {
    let engine = TransformEngine::new();
    assert!(engine.screen_to_image(5.0, 5.0, 10.0, 10.0).is_some());
    assert!(engine.screen_to_image(11.0, 5.0, 10.0, 10.0).is_none());
    assert!(engine.screen_to_image(5.0, -1.0, 10.0, 10.0).is_none());
}

#[test]
fn test_zoom_fit_wide_image_fits_width() {
    // Image wider than the canvas proportionally: width becomes the
    // limiting dimension.
    let mut engine = TransformEngine::new();
    engine.zoom_fit(200.0, 50.0, 100.0, 100.0);

    let (left, _) = engine.image_to_screen(0.0, 25.0);
    let (right, _) = engine.image_to_screen(200.0, 25.0);
    assert_relative_eq!(right - left, 100.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_fit_tall_image_fits_height() {
    let mut engine = TransformEngine::new();
    engine.zoom_fit(50.0, 200.0, 100.0, 100.0);

    let (_, top) = engine.image_to_screen(25.0, 0.0);
    let (_, bottom) = engine.image_to_screen(25.0, 200.0);
    assert_relative_eq!(bottom - top, 100.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_fit_centers_image() {
    let mut engine = TransformEngine::new();
    engine.zoom_fit(200.0, 50.0, 100.0, 100.0);

    let (cx, cy) = engine.image_to_screen(100.0, 25.0);
    assert_relative_eq!(cx, 50.0, epsilon = 1e-9);
    assert_relative_eq!(cy, 50.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_fit_degenerate_inputs_ignored() {
    let mut engine = TransformEngine::new();
    engine.scale_at(2.0, 0.0, 0.0);
    let before = *engine.matrix();
    engine.zoom_fit(0.0, 100.0, 100.0, 100.0);
    assert_eq!(*engine.matrix(), before);
}

#[test]
fn test_linear_scale_invariant_under_rotation() {
    let mut engine = TransformEngine::new();
    engine.scale_at(2.5, 0.0, 0.0);
    let before = engine.linear_scale();
    engine.rotate_at(67.0, 13.0, 7.0);
    assert_relative_eq!(engine.linear_scale(), before, epsilon = 1e-9);
    assert_relative_eq!(before, 2.5, epsilon = 1e-9);
}

#[test]
fn test_scale_at_keeps_pivot_fixed() {
    let mut engine = TransformEngine::new();
    // Pivot (40, 30) in screen space corresponds to image (40, 30) under
    // identity; it must stay put after zooming about it.
    engine.scale_at(3.0, 40.0, 30.0);
    let (sx, sy) = engine.image_to_screen(40.0, 30.0);
    assert_relative_eq!(sx, 40.0, epsilon = 1e-9);
    assert_relative_eq!(sy, 30.0, epsilon = 1e-9);
}

#[test]
fn test_reset_restores_identity() {
    let mut engine = TransformEngine::new();
    engine.translate(5.0, 5.0);
    engine.rotate_at(90.0, 1.0, 2.0);
    engine.reset();
    let (sx, sy) = engine.image_to_screen(12.0, 34.0);
    assert_relative_eq!(sx, 12.0, epsilon = 1e-12);
    assert_relative_eq!(sy, 34.0, epsilon = 1e-12);
}
