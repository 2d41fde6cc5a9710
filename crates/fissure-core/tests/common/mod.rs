use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma};
use ndarray::Array2;
use tempfile::TempDir;

/// Build a raster filled with one value.
#[allow(dead_code)]
pub fn uniform(width: usize, height: usize, value: u8) -> Array2<u8> {
    Array2::from_elem((height, width), value)
}

/// Write a raster as an 8-bit grayscale image, format from the extension.
#[allow(dead_code)]
pub fn save_gray8(path: &Path, data: &Array2<u8>) {
    let (height, width) = data.dim();
    let mut img = GrayImage::new(width as u32, height as u32);
    for ((y, x), &v) in data.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([v]));
    }
    img.save(path).unwrap();
}

/// Write a raster as a 16-bit grayscale PNG.
#[allow(dead_code)]
pub fn save_gray16(path: &Path, data: &Array2<u16>) {
    let (height, width) = data.dim();
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::new(width as u32, height as u32);
    for ((y, x), &v) in data.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([v]));
    }
    img.save(path).unwrap();
}

/// Create a temp directory holding the given slices as numbered files
/// with the given extension.
#[allow(dead_code)]
pub fn slice_dir(slices: &[Array2<u8>], ext: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (i, slice) in slices.iter().enumerate() {
        save_gray8(&dir.path().join(format!("slice_{i:03}.{ext}")), slice);
    }
    dir
}
