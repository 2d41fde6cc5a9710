/// Minimum pixel count (h*w) to use row-level Rayon parallelism when resampling.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Slice file extensions in priority order: the first extension with any
/// matches wins and the rest are ignored.
pub const SLICE_EXTENSIONS: [&str; 3] = ["tif", "png", "jpg"];

/// Overlay palette, assigned to layers in order. Once exhausted the last
/// color repeats.
pub const LAYER_PALETTE: [[u8; 3]; 7] = [
    [255, 255, 255], // white
    [255, 0, 0],     // red
    [0, 255, 0],     // green
    [0, 0, 255],     // blue
    [255, 255, 0],   // yellow
    [0, 255, 255],   // cyan
    [255, 0, 255],   // magenta
];

/// Fill worker flushes a paint batch (and requests a redraw) every this
/// many painted pixels.
pub const FILL_REDRAW_INTERVAL: usize = 10;

/// Minimum number of ruler ticks; below this the tick spacing is
/// recomputed so at least this many fit.
pub const RULER_MIN_TICKS: usize = 15;

/// Every n-th ruler tick is drawn at full length.
pub const RULER_MAJOR_EVERY: usize = 5;

/// Full length in pixels of a major ruler tick.
pub const RULER_TICK_LEN: u32 = 12;

/// Default physical size of one image pixel, in millimetres per micron
/// of scan resolution (the original scanner's 3.24 um voxel pitch).
pub const DEFAULT_MICRON_FACTOR: f64 = 0.00324;

/// Zoom multiplier applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Rotation in degrees applied per wheel notch when rotating.
pub const WHEEL_ROTATE_DEG: f64 = 5.0;
