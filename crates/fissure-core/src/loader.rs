//! Slice stack loading: directory enumeration, bit-depth reduction,
//! parallel preload and multi-slice composite reductions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::DynamicImage;
use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::SLICE_EXTENSIONS;
use crate::error::{FissureError, Result};
use crate::slice::Slice;

/// Pixelwise reduction applied over a slice window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Max,
    Min,
    Mean,
}

/// Which neighbours of the current slice a composite window covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowDirection {
    /// Symmetric: `[index - radius, index + radius]`.
    Omni,
    /// Forward only: `[index, index + radius]`.
    Front,
    /// Backward only: `[index - radius, index]`.
    Back,
}

/// Input intensity bounds for the optional linear remap after reduction.
/// The defaults (full 16-bit range) leave pixels untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityRange {
    pub min: f32,
    pub max: f32,
}

impl Default for IntensityRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 65535.0,
        }
    }
}

impl IntensityRange {
    pub fn is_identity(&self) -> bool {
        self.min == 0.0 && self.max == 65535.0
    }

    /// Remap an 8-bit intensity using the configured source bounds.
    fn apply(&self, v: f32) -> f32 {
        (v - self.min / 256.0) * (65535.0 / (self.max - self.min))
    }
}

/// Decode a grayscale raster, reducing 16-bit sources to 8-bit by
/// integer division by 256 (fixed reduction, not a range stretch).
pub(crate) fn load_gray8(path: &Path) -> Result<(Array2<u8>, u8)> {
    let img = image::open(path)?;
    let bit_depth = match &img {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => 16,
        _ => 8,
    };

    let (w, h);
    let data = if bit_depth == 16 {
        let gray = img.to_luma16();
        (w, h) = gray.dimensions();
        Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
            (gray.get_pixel(col as u32, row as u32).0[0] / 256) as u8
        })
    } else {
        let gray = img.to_luma8();
        (w, h) = gray.dimensions();
        Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
            gray.get_pixel(col as u32, row as u32).0[0]
        })
    };

    debug!(path = %path.display(), width = w, height = h, bit_depth, "loaded slice");
    Ok((data, bit_depth))
}

/// An ordered directory of slice files with an optional in-memory cache.
pub struct SliceStack {
    files: Vec<PathBuf>,
    index: usize,
    preloaded: Option<HashMap<PathBuf, Array2<u8>>>,
}

impl SliceStack {
    /// Enumerate slice files in one directory. Extensions are tried in
    /// priority order (`.tif`, then `.png`, then `.jpg`) and the first
    /// extension with any matches wins. Starts at the middle slice.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for ext in SLICE_EXTENSIONS {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(ext))
                {
                    files.push(path);
                }
            }
            if !files.is_empty() {
                break;
            }
        }

        if files.is_empty() {
            return Err(FissureError::NoSlicesFound {
                dir: dir.to_path_buf(),
            });
        }

        files.sort();
        let index = files.len() / 2;
        info!(dir = %dir.display(), count = files.len(), "opened slice stack");

        Ok(Self {
            files,
            index,
            preloaded: None,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn set_index(&mut self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            return Err(FissureError::SliceIndexOutOfRange {
                index,
                total: self.files.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// Step back one slice; clamped at the first.
    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Step forward one slice; clamped at the last.
    pub fn next(&mut self) {
        if self.index + 1 < self.files.len() {
            self.index += 1;
        }
    }

    pub fn reset_to_middle(&mut self) {
        self.index = self.files.len() / 2;
    }

    pub fn is_preloaded(&self) -> bool {
        self.preloaded.is_some()
    }

    /// Load every slice in parallel and publish the cache in one step.
    /// `progress` is called with (done, total) as files finish decoding.
    pub fn preload(&mut self, progress: impl Fn(usize, usize) + Sync) -> Result<()> {
        let total = self.files.len();
        let done = AtomicUsize::new(0);

        let loaded: Vec<(PathBuf, Array2<u8>)> = self
            .files
            .par_iter()
            .map(|path| {
                let (data, _) = load_gray8(path)?;
                progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
                Ok((path.clone(), data))
            })
            .collect::<Result<_>>()?;

        self.preloaded = Some(loaded.into_iter().collect());
        info!(count = total, "preloaded slice cache");
        Ok(())
    }

    /// Drop the entire preload cache.
    pub fn disable_preload(&mut self) {
        self.preloaded = None;
    }

    /// Load the slice at `index`, from the cache when preloaded.
    pub fn load_slice(&self, index: usize) -> Result<Slice> {
        let path = self
            .files
            .get(index)
            .ok_or(FissureError::SliceIndexOutOfRange {
                index,
                total: self.files.len(),
            })?;

        if let Some(data) = self.preloaded.as_ref().and_then(|c| c.get(path)) {
            // Cache entries lose the original depth; record them as 8-bit.
            return Ok(Slice::new(data.clone(), path.clone(), 8));
        }

        let (data, bit_depth) = load_gray8(path)?;
        Ok(Slice::new(data, path.clone(), bit_depth))
    }

    /// Window of slice indices around the current one, clamped to the
    /// stack bounds (never wraps, never fails at the boundaries).
    pub fn window(&self, radius: usize, direction: WindowDirection) -> std::ops::Range<usize> {
        let start = match direction {
            WindowDirection::Omni | WindowDirection::Back => self.index.saturating_sub(radius),
            WindowDirection::Front => self.index,
        };
        let end = match direction {
            WindowDirection::Omni | WindowDirection::Front => {
                (self.index + radius + 1).min(self.files.len())
            }
            WindowDirection::Back => self.index + 1,
        };
        start..end
    }

    /// Reduce a window of slices pixelwise into one composite slice,
    /// optionally remapping intensities with `range` before the final
    /// clamp to `[0, 255]`. `radius == 0` returns the current slice
    /// unmodified for every operation.
    pub fn composite(
        &self,
        radius: usize,
        direction: WindowDirection,
        op: ReduceOp,
        range: Option<&IntensityRange>,
    ) -> Result<Slice> {
        let window = self.window(radius, direction);
        let window_start = window.start;
        let slices: Vec<Slice> = window.map(|i| self.load_slice(i)).collect::<Result<_>>()?;
        if slices.is_empty() {
            return Err(FissureError::EmptyWindow);
        }
        // The composite inherits the current slice's metadata.
        let current = &slices[self.index - window_start];
        let (source, source_bit_depth) = (current.source.clone(), current.source_bit_depth);

        let reduced: Array2<f32> = if slices.len() == 1 {
            current.data.mapv(f32::from)
        } else {
            reduce(&slices, op)
        };

        let remap = range.filter(|r| !r.is_identity());
        let data = reduced.mapv(|v| {
            let v = match remap {
                Some(r) => r.apply(v),
                None => v,
            };
            v.clamp(0.0, 255.0) as u8
        });

        debug!(op = ?op, direction = ?direction, radius, "composited slice window");
        Ok(Slice::new(data, source, source_bit_depth))
    }
}

fn reduce(slices: &[Slice], op: ReduceOp) -> Array2<f32> {
    let mut acc = slices[0].data.mapv(f32::from);
    match op {
        ReduceOp::Max => {
            for slice in &slices[1..] {
                acc.zip_mut_with(&slice.data, |a, &b| *a = a.max(f32::from(b)));
            }
        }
        ReduceOp::Min => {
            for slice in &slices[1..] {
                acc.zip_mut_with(&slice.data, |a, &b| *a = a.min(f32::from(b)));
            }
        }
        ReduceOp::Mean => {
            for slice in &slices[1..] {
                acc.zip_mut_with(&slice.data, |a, &b| *a += f32::from(b));
            }
            acc /= slices.len() as f32;
        }
    }
    acc
}
