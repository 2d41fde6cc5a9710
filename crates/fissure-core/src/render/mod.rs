//! View compositing: base slice, tinted annotation layers, ruler.

pub mod resample;
pub mod ruler;

use image::{Rgba, RgbaImage};

use crate::consts::DEFAULT_MICRON_FACTOR;
use crate::layer::{Layer, LayerStack};
use crate::slice::Slice;
use crate::transform::TransformEngine;

pub use resample::{resample, ResampleKernel};

/// Per-frame rendering knobs. Everything that is not part of the scene
/// itself lives here.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub kernel: ResampleKernel,
    pub overlays_visible: bool,
    /// The ruler is part of every composed frame; this switch exists for
    /// callers that need the bare image (exports, pixel inspection).
    pub ruler_visible: bool,
    /// Microns represented by one image pixel, used to size ruler units.
    pub micron_factor: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            kernel: ResampleKernel::Nearest,
            overlays_visible: true,
            ruler_visible: true,
            micron_factor: DEFAULT_MICRON_FACTOR,
        }
    }
}

/// Compose the displayed frame: the current slice pulled through the view
/// transform, each visible layer tinted and alpha-blended on top (active
/// layer drawn last), and the ruler anchored at the canvas origin.
///
/// A missing slice or an empty canvas yields a blank frame, never an error.
pub fn render(
    transform: &TransformEngine,
    canvas_w: u32,
    canvas_h: u32,
    slice: Option<&Slice>,
    layers: &LayerStack,
    opts: &RenderOptions,
) -> RgbaImage {
    let mut frame = RgbaImage::new(canvas_w, canvas_h);
    let Some(slice) = slice else {
        return frame;
    };
    if canvas_w == 0 || canvas_h == 0 {
        return frame;
    }

    let inv = transform.inverse();
    let base = resample(
        &slice.data,
        &inv,
        canvas_w as usize,
        canvas_h as usize,
        opts.kernel,
    );
    for (x, y, px) in frame.enumerate_pixels_mut() {
        let g = base[[y as usize, x as usize]];
        *px = Rgba([g, g, g, 255]);
    }

    if opts.overlays_visible {
        // Background layers in stack order, active layer (slot 0) on top.
        for layer in layers.iter().skip(1) {
            blend_layer(&mut frame, layer, &inv, opts.kernel);
        }
        if let Some(active) = layers.active() {
            blend_layer(&mut frame, active, &inv, opts.kernel);
        }
    }

    if opts.ruler_visible && opts.micron_factor > 0.0 {
        let unit = transform.linear_scale() / opts.micron_factor;
        let overlay = ruler::draw_ruler(canvas_w, canvas_h, unit);
        blend_over(&mut frame, &overlay);
    }

    frame
}

/// Resample one layer into canvas space and blend it onto the frame.
///
/// Alpha comes from the layer's own grayscale intensity scaled by its
/// brightness, so painted regions glow in the layer color while untouched
/// (zero) regions stay fully transparent. The layer's opacity scales the
/// whole mask.
fn blend_layer(
    frame: &mut RgbaImage,
    layer: &Layer,
    inv: &crate::transform::Affine,
    kernel: ResampleKernel,
) {
    if !layer.visible {
        return;
    }
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let resampled = resample(&layer.data, inv, w, h, kernel);
    let [cr, cg, cb] = layer.color;

    for (x, y, px) in frame.enumerate_pixels_mut() {
        let g = resampled[[y as usize, x as usize]] as f32;
        let mask = (g * layer.brightness).min(255.0) / 255.0;
        if mask <= 0.0 {
            continue;
        }
        // Tint toward the layer color where the mask is strong, keep the
        // raster's own value where it is weak.
        let tr = g + (cr as f32 - g) * mask;
        let tg = g + (cg as f32 - g) * mask;
        let tb = g + (cb as f32 - g) * mask;
        let alpha = mask * layer.opacity;

        let Rgba([br, bg, bb, ba]) = *px;
        *px = Rgba([
            mix(br, tr, alpha),
            mix(bg, tg, alpha),
            mix(bb, tb, alpha),
            ba,
        ]);
    }
}

fn mix(base: u8, top: f32, alpha: f32) -> u8 {
    (base as f32 + (top - base as f32) * alpha)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Straightforward source-over composite of a premade RGBA raster.
fn blend_over(frame: &mut RgbaImage, top: &RgbaImage) {
    for (x, y, px) in frame.enumerate_pixels_mut() {
        let t = top.get_pixel(x, y);
        let a = t.0[3] as f32 / 255.0;
        if a <= 0.0 {
            continue;
        }
        for c in 0..3 {
            px.0[c] = mix(px.0[c], t.0[c] as f32, a);
        }
    }
}
