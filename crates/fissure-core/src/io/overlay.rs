//! Reading and writing annotation overlays.
//!
//! Overlays are saved as 1-bit grayscale PNGs: the payload is binary
//! (painted / not painted), so bilevel packing keeps files small while a
//! reload reproduces the painted locations exactly.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::RgbaImage;
use ndarray::Array2;
use tracing::{info, warn};

use crate::error::{FissureError, Result};
use crate::layer::LayerStack;
use crate::loader::load_gray8;

const OVERLAY_EXTENSIONS: [&str; 3] = ["png", "tif", "tiff"];

/// Load an overlay raster as 8-bit grayscale. 16-bit sources are reduced
/// to 8 bits the same way slices are. Extensions outside the supported
/// set are rejected before any disk access.
pub fn load_overlay(path: &Path) -> Result<Array2<u8>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !OVERLAY_EXTENSIONS.contains(&ext.as_str()) {
        return Err(FissureError::UnsupportedOverlayFormat(ext));
    }
    let (data, _) = load_gray8(path)?;
    info!(path = %path.display(), "loaded overlay");
    Ok(data)
}

/// Save an overlay as a 1-bit grayscale PNG. Any nonzero value becomes a
/// set bit; a later [`load_overlay`] reads them back as 255.
pub fn save_overlay_bilevel(path: &Path, data: &Array2<u8>) -> Result<()> {
    let (height, width) = data.dim();
    let stride = width.div_ceil(8);
    let mut packed = vec![0u8; stride * height];
    for ((y, x), &v) in data.indexed_iter() {
        if v != 0 {
            packed[y * stride + x / 8] |= 0x80 >> (x % 8);
        }
    }

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::One);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&packed)?;
    info!(path = %path.display(), width, height, "saved overlay");
    Ok(())
}

/// Merge every layer into a single raster, brightest value winning at each
/// pixel. Layers whose dimensions differ from the active layer are skipped.
/// Returns `None` when the stack is empty.
pub fn combined_overlay(layers: &LayerStack) -> Option<Array2<u8>> {
    let mut iter = layers.iter();
    let first = iter.next()?;
    let mut combined = first.data.clone();
    for layer in iter {
        if layer.data.dim() != combined.dim() {
            warn!(
                layer = layer.name.as_str(),
                "skipping layer with mismatched dimensions"
            );
            continue;
        }
        combined.zip_mut_with(&layer.data, |acc, &v| *acc = (*acc).max(v));
    }
    Some(combined)
}

/// Write the displayed frame to disk, format chosen by the extension.
pub fn save_display(path: &Path, frame: &RgbaImage) -> Result<()> {
    frame.save(path)?;
    info!(path = %path.display(), "saved displayed frame");
    Ok(())
}
