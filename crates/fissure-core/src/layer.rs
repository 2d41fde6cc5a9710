//! Overlay layers: one mutable active layer plus read-only sub-overlays.

use ndarray::Array2;

use crate::consts::LAYER_PALETTE;
use crate::error::{FissureError, Result};

/// A single overlay raster with its display styling.
///
/// Color, name and pixels travel together as one record, so reordering
/// the stack can never desynchronize them.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Grayscale raster, shape = (height, width). Nonzero means painted.
    pub data: Array2<u8>,
    /// Tint applied to bright regions when compositing.
    pub color: [u8; 3],
    /// Blend opacity in [0, 1].
    pub opacity: f32,
    /// Alpha-mask brightness multiplier in [0, 10].
    pub brightness: f32,
    pub visible: bool,
    pub name: String,
}

impl Layer {
    pub fn new(data: Array2<u8>, color: [u8; 3], name: String) -> Self {
        Self {
            data,
            color,
            opacity: 1.0,
            brightness: 1.0,
            visible: true,
            name,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn set_opacity(&mut self, opacity: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(FissureError::InvalidControl {
                name: "opacity",
                value: opacity as f64,
            });
        }
        self.opacity = opacity;
        Ok(())
    }

    pub fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        if !(0.0..=10.0).contains(&brightness) {
            return Err(FissureError::InvalidControl {
                name: "brightness",
                value: brightness as f64,
            });
        }
        self.brightness = brightness;
        Ok(())
    }
}

/// Ordered overlay collection. Index 0 is always the single paintable
/// (active) layer once any overlay exists; everything above it is
/// display-only.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// The paintable layer at slot 0, if any overlay exists.
    pub fn active(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn active_mut(&mut self) -> Option<&mut Layer> {
        self.layers.first_mut()
    }

    /// Palette color for the n-th appended layer. Past the end of the
    /// palette the last color repeats.
    fn palette_color(index: usize) -> [u8; 3] {
        LAYER_PALETTE[index.min(LAYER_PALETTE.len() - 1)]
    }

    /// Append a raster as a new layer with the next palette color and an
    /// auto-generated name. Returns its index.
    pub fn push_raster(&mut self, data: Array2<u8>, name: Option<String>) -> usize {
        let index = self.layers.len();
        let name = name.unwrap_or_else(|| format!("overlay-{index}"));
        self.layers
            .push(Layer::new(data, Self::palette_color(index), name));
        index
    }

    /// Replace (or create) the active layer's raster, keeping slot 0's
    /// styling when it already exists.
    pub fn set_active_raster(&mut self, data: Array2<u8>, name: String) {
        match self.layers.first_mut() {
            Some(layer) => {
                layer.data = data;
                layer.name = name;
            }
            None => {
                self.layers
                    .push(Layer::new(data, Self::palette_color(0), name));
            }
        }
    }

    /// Create an all-background active raster at the given bounds.
    pub fn create_empty(&mut self, width: usize, height: usize) {
        self.set_active_raster(
            Array2::zeros((height, width)),
            "newly_created_overlay.png".to_string(),
        );
    }

    /// Swap layer `k` into the active slot as one whole-record move.
    /// Applying the same selection twice restores the original order.
    pub fn select_active(&mut self, k: usize) -> Result<()> {
        if k >= self.layers.len() {
            return Err(FissureError::SliceIndexOutOfRange {
                index: k,
                total: self.layers.len(),
            });
        }
        self.layers.swap(0, k);
        Ok(())
    }

    /// Drop every layer except the active one.
    pub fn clear(&mut self) {
        self.layers.truncate(1);
    }
}
