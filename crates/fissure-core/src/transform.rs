//! View transform: a 3x3 affine matrix mapping image space to screen space.

/// Row-major 3x3 affine matrix. The bottom row is always `[0, 0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub m: [[f64; 3]; 3],
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            m: [[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]],
        }
    }

    pub fn scaling(factor: f64) -> Self {
        Self {
            m: [[factor, 0.0, 0.0], [0.0, factor, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Screen-space rotation by degrees (y axis pointing down).
    pub fn rotation_deg(deg: f64) -> Self {
        let rad = deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Matrix product `self * rhs` (apply `rhs` first).
    pub fn mul(&self, rhs: &Affine) -> Affine {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[row][k] * rhs.m[k][col]).sum();
            }
        }
        Affine { m: out }
    }

    /// Apply to a point (homogeneous coordinate 1).
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m[0][0] * x + self.m[0][1] * y + self.m[0][2],
            self.m[1][0] * x + self.m[1][1] * y + self.m[1][2],
        )
    }

    /// Closed-form inverse of the affine part. The caller guarantees the
    /// 2x2 block is non-singular, which holds for every matrix this
    /// module composes.
    pub fn inverse(&self) -> Affine {
        let [a, b, tx] = self.m[0];
        let [c, d, ty] = self.m[1];
        let det = a * d - b * c;
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        Affine {
            m: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Determinant of the 2x2 linear block.
    pub fn det2(&self) -> f64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }
}

/// Owns the view's affine matrix and maps screen <-> image coordinates.
///
/// Elementary transforms are prepended (left-multiplied) in application
/// order, so each new gesture acts on already-transformed screen space.
/// Callers must never feed a zero or negative scale factor; the engine
/// assumes the matrix stays invertible.
#[derive(Clone, Debug)]
pub struct TransformEngine {
    mat: Affine,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformEngine {
    pub fn new() -> Self {
        Self {
            mat: Affine::identity(),
        }
    }

    pub fn reset(&mut self) {
        self.mat = Affine::identity();
    }

    pub fn matrix(&self) -> &Affine {
        &self.mat
    }

    pub fn inverse(&self) -> Affine {
        self.mat.inverse()
    }

    /// Current linear magnification, invariant under rotation.
    pub fn linear_scale(&self) -> f64 {
        self.mat.det2().abs().sqrt()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.mat = Affine::translation(dx, dy).mul(&self.mat);
    }

    fn scale(&mut self, factor: f64) {
        self.mat = Affine::scaling(factor).mul(&self.mat);
    }

    fn rotate(&mut self, deg: f64) {
        self.mat = Affine::rotation_deg(deg).mul(&self.mat);
    }

    /// Pivot-preserving zoom: factor > 1 zooms in, 0 < factor < 1 out.
    pub fn scale_at(&mut self, factor: f64, cx: f64, cy: f64) {
        self.translate(-cx, -cy);
        self.scale(factor);
        self.translate(cx, cy);
    }

    /// Pivot-preserving rotation by degrees around a screen point.
    pub fn rotate_at(&mut self, deg: f64, cx: f64, cy: f64) {
        self.translate(-cx, -cy);
        self.rotate(deg);
        self.translate(cx, cy);
    }

    /// Reset and fit the image into the canvas, centered on the shorter
    /// axis. The branch condition compares cross products rather than
    /// ratios so the centering matches on exact ties.
    pub fn zoom_fit(&mut self, img_w: f64, img_h: f64, canvas_w: f64, canvas_h: f64) {
        if img_w * img_h <= 0.0 || canvas_w * canvas_h <= 0.0 {
            return;
        }
        self.reset();

        let (scale, offset_x, offset_y) = if canvas_w * img_h > img_w * canvas_h {
            let scale = canvas_h / img_h;
            (scale, (canvas_w - img_w * scale) / 2.0, 0.0)
        } else {
            let scale = canvas_w / img_w;
            (scale, 0.0, (canvas_h - img_h * scale) / 2.0)
        };

        self.scale(scale);
        self.translate(offset_x, offset_y);
    }

    /// Map a screen point to image coordinates. Returns None when the
    /// point lands outside `[0, img_w] x [0, img_h]` -- a soft failure
    /// the status bar shows as "(--, --)".
    pub fn screen_to_image(&self, x: f64, y: f64, img_w: f64, img_h: f64) -> Option<(f64, f64)> {
        let (ix, iy) = self.mat.inverse().apply(x, y);
        if ix < 0.0 || iy < 0.0 || ix > img_w || iy > img_h {
            None
        } else {
            Some((ix, iy))
        }
    }

    /// Map an image point to screen coordinates.
    pub fn image_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        self.mat.apply(x, y)
    }
}
