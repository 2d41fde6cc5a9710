use ndarray::Array2;
use std::path::PathBuf;

/// A single 8-bit grayscale scan slice.
///
/// Slices are never mutated in place: navigation and composite
/// recomputation replace the whole value.
#[derive(Clone, Debug)]
pub struct Slice {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
    /// File the pixels came from (or the current slice for a computed
    /// composite).
    pub source: PathBuf,
    /// Bit depth of the source file before reduction (8 or 16)
    pub source_bit_depth: u8,
}

impl Slice {
    pub fn new(data: Array2<u8>, source: PathBuf, source_bit_depth: u8) -> Self {
        Self {
            data,
            source,
            source_bit_depth,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Intensity at image coordinates, or None when out of bounds.
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.data.get((y as usize, x as usize)).copied()
    }

    /// Human-readable metadata string for the status bar.
    pub fn info(&self) -> String {
        format!(
            "{} : {} x {} ({}-bit source)",
            self.source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.source.display().to_string()),
            self.width(),
            self.height(),
            self.source_bit_depth,
        )
    }
}
