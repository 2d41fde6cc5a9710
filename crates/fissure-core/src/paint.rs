//! Freehand stroke stamping onto annotation rasters.

use ndarray::Array2;

/// Paint a thick segment from `from` to `to` (image-space coordinates)
/// using round caps. `value` is 255 for painting, 0 for erasing.
///
/// The segment is walked in sub-pixel steps and a filled disc of
/// `width / 2` radius is stamped at each step, which keeps fast pointer
/// motion from leaving gaps.
pub fn stamp_stroke(
    data: &mut Array2<u8>,
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    value: u8,
) {
    let radius = (width / 2.0).max(0.5);
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let length = (dx * dx + dy * dy).sqrt();
    let steps = (length.ceil() as usize).max(1);

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        stamp_disc(data, from.0 + dx * t, from.1 + dy * t, radius, value);
    }
}

fn stamp_disc(data: &mut Array2<u8>, cx: f64, cy: f64, radius: f64, value: u8) {
    let (height, width) = data.dim();
    let x_min = ((cx - radius).floor().max(0.0)) as usize;
    let y_min = ((cy - radius).floor().max(0.0)) as usize;
    let x_max = ((cx + radius).ceil() as usize).min(width.saturating_sub(1));
    let y_max = ((cy + radius).ceil() as usize).min(height.saturating_sub(1));
    if x_min >= width || y_min >= height {
        return;
    }

    let r2 = radius * radius;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let ddx = x as f64 - cx;
            let ddy = y as f64 - cy;
            if ddx * ddx + ddy * ddy <= r2 {
                data[[y, x]] = value;
            }
        }
    }
}
