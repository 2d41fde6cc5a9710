//! Top-level viewer state: one slice stack, one view transform, one layer
//! stack, at most one running fill.

use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};

use crate::consts::{DEFAULT_MICRON_FACTOR, WHEEL_ROTATE_DEG, WHEEL_ZOOM_STEP};
use crate::error::{FissureError, Result};
use crate::fill::{FillEvent, FloodFillEngine, FloodFillParams};
use crate::io;
use crate::layer::LayerStack;
use crate::loader::{IntensityRange, ReduceOp, SliceStack, WindowDirection};
use crate::paint;
use crate::render::{self, RenderOptions};
use crate::slice::Slice;
use crate::transform::TransformEngine;

/// Validated numeric inputs. Setters reject out-of-range values with
/// [`FissureError::InvalidControl`] and leave the previous value intact.
#[derive(Clone, Debug)]
pub struct Controls {
    pub pencil_width: f64,
    pub fill_threshold: u8,
    pub max_fill_steps: usize,
    pub micron_factor: f64,
    pub composite_radius: usize,
    pub composite_direction: WindowDirection,
    pub composite_op: ReduceOp,
    pub intensity_range: IntensityRange,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            pencil_width: 3.0,
            fill_threshold: 4,
            max_fill_steps: 100,
            micron_factor: DEFAULT_MICRON_FACTOR,
            composite_radius: 0,
            composite_direction: WindowDirection::Omni,
            composite_op: ReduceOp::Max,
            intensity_range: IntensityRange::default(),
        }
    }
}

impl Controls {
    pub fn set_pencil_width(&mut self, width: f64) -> Result<()> {
        if !(1.0..=500.0).contains(&width) {
            return Err(FissureError::InvalidControl {
                name: "pencil_width",
                value: width,
            });
        }
        self.pencil_width = width;
        Ok(())
    }

    pub fn set_fill_threshold(&mut self, threshold: u8) -> Result<()> {
        if threshold > 100 {
            return Err(FissureError::InvalidControl {
                name: "fill_threshold",
                value: threshold as f64,
            });
        }
        self.fill_threshold = threshold;
        Ok(())
    }

    pub fn set_max_fill_steps(&mut self, steps: usize) -> Result<()> {
        if !(1..=500).contains(&steps) {
            return Err(FissureError::InvalidControl {
                name: "max_fill_steps",
                value: steps as f64,
            });
        }
        self.max_fill_steps = steps;
        Ok(())
    }

    pub fn set_micron_factor(&mut self, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(FissureError::InvalidControl {
                name: "micron_factor",
                value: factor,
            });
        }
        self.micron_factor = factor;
        Ok(())
    }

    pub fn set_intensity_range(&mut self, min: f32, max: f32) -> Result<()> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(FissureError::InvalidControl {
                name: "intensity_range",
                value: min as f64,
            });
        }
        self.intensity_range = IntensityRange { min, max };
        Ok(())
    }
}

/// Pointer and keyboard gestures, already decoded from whatever windowing
/// layer sits above.
#[derive(Clone, Copy, Debug)]
pub enum InputEvent {
    /// Drag pan, screen-space delta.
    PointerDrag { dx: f64, dy: f64 },
    /// Wheel scroll at a screen position. Positive `notches` zooms in or
    /// rotates counter-clockwise; `rotate` is the modifier state.
    Wheel { x: f64, y: f64, notches: f64, rotate: bool },
    /// Double click refits the image to the canvas.
    DoubleClick,
    /// Pencil stroke between two screen positions.
    Stroke { from: (f64, f64), to: (f64, f64), erase: bool },
    /// Flood fill trigger at a screen position.
    Fill { x: f64, y: f64 },
    NextSlice,
    PrevSlice,
}

/// Owns the whole scene and consumes input events. Everything mutable
/// lives here; the fill worker only sees an immutable slice snapshot.
pub struct Viewer {
    stack: Option<SliceStack>,
    slice: Option<Arc<Slice>>,
    pub transform: TransformEngine,
    pub layers: LayerStack,
    fill: FloodFillEngine,
    fill_rx: Option<Receiver<FillEvent>>,
    pub controls: Controls,
    pub options: RenderOptions,
    canvas: (u32, u32),
}

impl Viewer {
    pub fn new(canvas_w: u32, canvas_h: u32) -> Self {
        Self {
            stack: None,
            slice: None,
            transform: TransformEngine::new(),
            layers: LayerStack::default(),
            fill: FloodFillEngine::new(),
            fill_rx: None,
            controls: Controls::default(),
            options: RenderOptions::default(),
            canvas: (canvas_w, canvas_h),
        }
    }

    pub fn canvas(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn set_canvas(&mut self, width: u32, height: u32) {
        self.canvas = (width, height);
    }

    pub fn slice(&self) -> Option<&Arc<Slice>> {
        self.slice.as_ref()
    }

    pub fn stack(&self) -> Option<&SliceStack> {
        self.stack.as_ref()
    }

    pub fn stack_mut(&mut self) -> Option<&mut SliceStack> {
        self.stack.as_mut()
    }

    /// Open a slice directory, show its middle slice fitted to the canvas
    /// and make sure there is an empty active layer to paint on.
    pub fn open_stack(&mut self, dir: &Path) -> Result<()> {
        let stack = SliceStack::open(dir)?;
        info!(dir = %dir.display(), slices = stack.len(), "opened slice stack");
        self.stack = Some(stack);
        self.recompute_composite()?;
        self.zoom_fit();
        if self.layers.is_empty() {
            if let Some(slice) = &self.slice {
                self.layers.create_empty(slice.width(), slice.height());
            }
        }
        Ok(())
    }

    /// Rebuild the displayed slice from the current composite controls.
    /// With radius 0 this is just the current slice.
    pub fn recompute_composite(&mut self) -> Result<()> {
        let stack = self.stack.as_ref().ok_or(FissureError::NoSliceLoaded)?;
        let range = self.controls.intensity_range;
        let slice = stack.composite(
            self.controls.composite_radius,
            self.controls.composite_direction,
            self.controls.composite_op,
            Some(&range),
        )?;
        self.slice = Some(Arc::new(slice));
        Ok(())
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::PointerDrag { dx, dy } => {
                self.transform.translate(dx, dy);
                Ok(())
            }
            InputEvent::Wheel { x, y, notches, rotate } => {
                if rotate {
                    self.transform.rotate_at(notches * WHEEL_ROTATE_DEG, x, y);
                } else {
                    let factor = WHEEL_ZOOM_STEP.powf(notches);
                    self.zoom_at(factor, x, y)?;
                }
                Ok(())
            }
            InputEvent::DoubleClick => {
                self.zoom_fit();
                Ok(())
            }
            InputEvent::Stroke { from, to, erase } => self.stroke(from, to, erase),
            InputEvent::Fill { x, y } => self.flood_fill_at(x, y).map(|_| ()),
            InputEvent::NextSlice => self.next_slice(),
            InputEvent::PrevSlice => self.prev_slice(),
        }
    }

    pub fn zoom_at(&mut self, factor: f64, x: f64, y: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(FissureError::InvalidControl {
                name: "zoom_factor",
                value: factor,
            });
        }
        self.transform.scale_at(factor, x, y);
        Ok(())
    }

    pub fn zoom_fit(&mut self) {
        if let Some(slice) = &self.slice {
            let (w, h) = self.canvas;
            self.transform
                .zoom_fit(slice.width() as f64, slice.height() as f64, w as f64, h as f64);
        }
    }

    pub fn next_slice(&mut self) -> Result<()> {
        if let Some(stack) = self.stack.as_mut() {
            stack.next();
        }
        self.recompute_composite()
    }

    pub fn prev_slice(&mut self) -> Result<()> {
        if let Some(stack) = self.stack.as_mut() {
            stack.prev();
        }
        self.recompute_composite()
    }

    pub fn set_slice_index(&mut self, index: usize) -> Result<()> {
        self.stack
            .as_mut()
            .ok_or(FissureError::NoSliceLoaded)?
            .set_index(index)?;
        self.recompute_composite()
    }

    /// Paint or erase a thick segment into the active layer. Endpoints
    /// outside the image are dropped silently, matching the canvas edge
    /// behavior of the pointer.
    pub fn stroke(&mut self, from: (f64, f64), to: (f64, f64), erase: bool) -> Result<()> {
        let slice = self.slice.as_ref().ok_or(FissureError::NoSliceLoaded)?;
        let (img_w, img_h) = (slice.width() as f64, slice.height() as f64);
        let from = self.transform.screen_to_image(from.0, from.1, img_w, img_h);
        let to = self.transform.screen_to_image(to.0, to.1, img_w, img_h);
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(());
        };
        let width = self.controls.pencil_width;
        let layer = self.layers.active_mut().ok_or(FissureError::NoActiveLayer)?;
        let value = if erase { 0 } else { 255 };
        paint::stamp_stroke(&mut layer.data, from, to, width, value);
        Ok(())
    }

    /// Start a flood fill at a screen position. Returns `Ok(false)` when a
    /// fill is already running or the position misses the image; both are
    /// quiet refusals, not errors.
    pub fn flood_fill_at(&mut self, x: f64, y: f64) -> Result<bool> {
        let slice = self.slice.as_ref().ok_or(FissureError::NoSliceLoaded)?;
        if self.layers.active().is_none() {
            return Err(FissureError::NoActiveLayer);
        }
        let (img_w, img_h) = (slice.width() as f64, slice.height() as f64);
        let Some((ix, iy)) = self.transform.screen_to_image(x, y, img_w, img_h) else {
            debug!("fill request outside the image, ignored");
            return Ok(false);
        };
        let seed = (ix.floor() as usize, iy.floor() as usize);

        let params = FloodFillParams {
            threshold: self.controls.fill_threshold,
            max_steps: self.controls.max_fill_steps,
        };
        let (tx, rx) = mpsc::channel();
        if !self.fill.start(Arc::clone(slice), seed, params, tx) {
            return Ok(false);
        }
        self.fill_rx = Some(rx);
        Ok(true)
    }

    pub fn fill_active(&self) -> bool {
        self.fill.is_active()
    }

    pub fn cancel_fill(&mut self) {
        self.fill.cancel();
    }

    /// Apply any paint deltas the fill worker has produced so far to the
    /// active layer. Returns `true` when pixels changed and the frame
    /// should be redrawn.
    pub fn pump_fill(&mut self) -> bool {
        let Some(rx) = &self.fill_rx else {
            return false;
        };
        let mut changed = false;
        let mut finished = false;
        let mut batches = Vec::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                FillEvent::Painted(batch) => batches.push(batch),
                FillEvent::Finished { painted } => {
                    debug!(painted, "fill worker done");
                    finished = true;
                }
            }
        }
        if let Some(layer) = self.layers.active_mut() {
            for batch in batches {
                for (x, y) in batch {
                    if let Some(px) = layer.data.get_mut((y, x)) {
                        *px = 255;
                        changed = true;
                    }
                }
            }
        }
        if finished {
            self.fill_rx = None;
        }
        changed
    }

    /// Block until the running fill (if any) has delivered everything,
    /// applying deltas as they arrive.
    pub fn finish_fill(&mut self) -> usize {
        let Some(rx) = self.fill_rx.take() else {
            return 0;
        };
        let mut total = 0;
        while let Ok(event) = rx.recv() {
            match event {
                FillEvent::Painted(batch) => {
                    if let Some(layer) = self.layers.active_mut() {
                        for (x, y) in batch {
                            if let Some(px) = layer.data.get_mut((y, x)) {
                                *px = 255;
                            }
                        }
                    }
                }
                FillEvent::Finished { painted } => {
                    total = painted;
                    break;
                }
            }
        }
        total
    }

    pub fn render(&self) -> RgbaImage {
        let mut opts = self.options.clone();
        opts.micron_factor = self.controls.micron_factor;
        render::render(
            &self.transform,
            self.canvas.0,
            self.canvas.1,
            self.slice.as_deref(),
            &self.layers,
            &opts,
        )
    }

    /// Status-bar text for a pointer position: image coordinates with two
    /// decimals, or placeholder dashes outside the image.
    pub fn pointer_status(&self, x: f64, y: f64) -> String {
        let coords = self.slice.as_ref().and_then(|slice| {
            self.transform
                .screen_to_image(x, y, slice.width() as f64, slice.height() as f64)
        });
        match coords {
            Some((ix, iy)) => format!("({ix:.2}, {iy:.2})"),
            None => "(--, --)".to_string(),
        }
    }

    /// One-line description of the displayed slice and stack position.
    pub fn slice_info(&self) -> String {
        match (&self.slice, &self.stack) {
            (Some(slice), Some(stack)) => format!(
                "{} [{}/{}]",
                slice.info(),
                stack.current_index() + 1,
                stack.len()
            ),
            (Some(slice), None) => slice.info(),
            _ => "no slice loaded".to_string(),
        }
    }

    /// Add a layer from an overlay file on disk.
    pub fn load_overlay_layer(&mut self, path: &Path) -> Result<usize> {
        let data = io::load_overlay(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(self.layers.push_raster(data, name))
    }

    pub fn save_active_overlay(&self, path: &Path) -> Result<()> {
        let layer = self.layers.active().ok_or(FissureError::NoActiveLayer)?;
        io::save_overlay_bilevel(path, &layer.data)
    }

    /// Save every layer merged into one bilevel image, brightest wins.
    pub fn save_combined_overlay(&self, path: &Path) -> Result<()> {
        let combined = io::combined_overlay(&self.layers).ok_or(FissureError::NoActiveLayer)?;
        io::save_overlay_bilevel(path, &combined)
    }

    /// Save exactly what the canvas shows right now.
    pub fn save_display(&self, path: &Path) -> Result<()> {
        io::save_display(path, &self.render())
    }
}
