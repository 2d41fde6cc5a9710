//! Screen-space measurement ruler drawn along the canvas edges.
//!
//! Tick spacing tracks the view's linear scale so one labelled unit always
//! spans the same physical distance on the specimen regardless of zoom.

use image::{Rgba, RgbaImage};

use crate::consts::{RULER_MAJOR_EVERY, RULER_MIN_TICKS, RULER_TICK_LEN};

const TICK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

// 3x5 bitmap digits, one row per byte, low three bits used.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// Render a transparent ruler raster the size of the canvas.
///
/// `unit_size` is the on-screen pixel span of one labelled unit. When the
/// canvas would show fewer ticks than the legibility floor, the spacing is
/// recomputed so the floor count fits along the longer edge.
pub fn draw_ruler(canvas_w: u32, canvas_h: u32, unit_size: f64) -> RgbaImage {
    let mut img = RgbaImage::new(canvas_w, canvas_h);
    if canvas_w == 0 || canvas_h == 0 || !unit_size.is_finite() || unit_size <= 0.0 {
        return img;
    }

    let extent = canvas_w.max(canvas_h) as f64;
    let mut spacing = unit_size;
    if (extent / spacing) as usize + 1 < RULER_MIN_TICKS {
        spacing = (extent / RULER_MIN_TICKS as f64).max(1.0);
    }

    // Top edge: vertical ticks.
    let mut k = 0usize;
    loop {
        let x = (k as f64 * spacing).round() as i64;
        if x >= canvas_w as i64 {
            break;
        }
        let len = tick_length(k);
        for y in 0..len {
            put(&mut img, x, y as i64);
        }
        draw_label(&mut img, k, x + 2, RULER_TICK_LEN as i64 + 2);
        k += 1;
    }

    // Left edge: horizontal ticks.
    let mut k = 0usize;
    loop {
        let y = (k as f64 * spacing).round() as i64;
        if y >= canvas_h as i64 {
            break;
        }
        let len = tick_length(k);
        for x in 0..len {
            put(&mut img, x as i64, y);
        }
        draw_label(&mut img, k, RULER_TICK_LEN as i64 + 2, y + 2);
        k += 1;
    }

    img
}

fn tick_length(k: usize) -> u32 {
    if k % RULER_MAJOR_EVERY == 0 {
        RULER_TICK_LEN
    } else {
        RULER_TICK_LEN / 2
    }
}

fn put(img: &mut RgbaImage, x: i64, y: i64) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, TICK_COLOR);
    }
}

fn draw_label(img: &mut RgbaImage, value: usize, x: i64, y: i64) {
    let digits: Vec<usize> = value
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    for (i, &d) in digits.iter().enumerate() {
        let ox = x + i as i64 * 4;
        for (row, bits) in DIGITS[d].iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    put(img, ox + col as i64, y + row as i64);
                }
            }
        }
    }
}
