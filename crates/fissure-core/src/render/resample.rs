//! Inverse-mapped resampling of image-space rasters into canvas space.

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::transform::Affine;

/// Interpolation kernel used when resampling through the view transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResampleKernel {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
}

/// Resample `src` into a canvas-sized raster by pulling each destination
/// pixel through the inverse view matrix. Samples outside the source
/// read as 0 (background).
pub fn resample(
    src: &Array2<u8>,
    inv: &Affine,
    canvas_w: usize,
    canvas_h: usize,
    kernel: ResampleKernel,
) -> Array2<u8> {
    let mut out = Array2::<u8>::zeros((canvas_h, canvas_w));

    let fill_row = |row: usize, out_row: &mut [u8]| {
        for (col, px) in out_row.iter_mut().enumerate() {
            let (sx, sy) = inv.apply(col as f64, row as f64);
            *px = match kernel {
                ResampleKernel::Nearest => sample_nearest(src, sx, sy),
                ResampleKernel::Bilinear => sample_bilinear(src, sx, sy),
                ResampleKernel::Bicubic => sample_bicubic(src, sx, sy),
            };
        }
    };

    if canvas_w * canvas_h >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<u8>> = (0..canvas_h)
            .into_par_iter()
            .map(|row| {
                let mut buf = vec![0u8; canvas_w];
                fill_row(row, &mut buf);
                buf
            })
            .collect();
        for (row, buf) in rows.into_iter().enumerate() {
            for (col, v) in buf.into_iter().enumerate() {
                out[[row, col]] = v;
            }
        }
    } else {
        for row in 0..canvas_h {
            let mut buf = vec![0u8; canvas_w];
            fill_row(row, &mut buf);
            for (col, v) in buf.into_iter().enumerate() {
                out[[row, col]] = v;
            }
        }
    }

    out
}

fn tap(src: &Array2<u8>, x: i64, y: i64) -> f64 {
    if x < 0 || y < 0 {
        return 0.0;
    }
    src.get((y as usize, x as usize))
        .copied()
        .map_or(0.0, f64::from)
}

fn sample_nearest(src: &Array2<u8>, x: f64, y: f64) -> u8 {
    let xi = x.round() as i64;
    let yi = y.round() as i64;
    if xi < 0 || yi < 0 {
        return 0;
    }
    src.get((yi as usize, xi as usize)).copied().unwrap_or(0)
}

fn sample_bilinear(src: &Array2<u8>, x: f64, y: f64) -> u8 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let top = tap(src, x0, y0) * (1.0 - fx) + tap(src, x0 + 1, y0) * fx;
    let bottom = tap(src, x0, y0 + 1) * (1.0 - fx) + tap(src, x0 + 1, y0 + 1) * fx;
    (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
}

/// Catmull-Rom cubic weight (a = -0.5).
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.5;
    let t = t.abs();
    if t <= 1.0 {
        (A + 2.0) * t * t * t - (A + 3.0) * t * t + 1.0
    } else if t < 2.0 {
        A * t * t * t - 5.0 * A * t * t + 8.0 * A * t - 4.0 * A
    } else {
        0.0
    }
}

fn sample_bicubic(src: &Array2<u8>, x: f64, y: f64) -> u8 {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let mut acc = 0.0;
    for dy in -1..=2i64 {
        let wy = cubic_weight(dy as f64 - fy);
        if wy == 0.0 {
            continue;
        }
        for dx in -1..=2i64 {
            let wx = cubic_weight(dx as f64 - fx);
            acc += tap(src, x0 + dx, y0 + dy) * wx * wy;
        }
    }
    acc.round().clamp(0.0, 255.0) as u8
}
