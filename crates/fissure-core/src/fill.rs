//! Threshold flood fill running on a background worker.
//!
//! The worker never touches the annotation layers directly: painted pixel
//! coordinates are streamed back over a channel in small batches so the
//! owner can apply them and refresh the display between batches.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use ndarray::Array2;
use tracing::{debug, info};

use crate::consts::FILL_REDRAW_INTERVAL;
use crate::slice::Slice;

/// Tuning knobs for a fill run.
#[derive(Clone, Copy, Debug)]
pub struct FloodFillParams {
    /// Maximum absolute difference from the seed value for a pixel to join
    /// the region.
    pub threshold: u8,
    /// Hard cap on painted pixels, guarding against near-uniform slices.
    pub max_steps: usize,
}

/// Messages streamed from the fill worker.
#[derive(Debug)]
pub enum FillEvent {
    /// A batch of pixel coordinates (x, y) accepted into the region.
    Painted(Vec<(usize, usize)>),
    /// The run ended (completed, capped, or cancelled).
    Finished { painted: usize },
}

/// Owns at most one fill worker at a time.
///
/// The `active` flag is both the busy indicator and the cancellation
/// signal: a second start while it is set is refused, and clearing it
/// makes the running worker stop at its next iteration.
pub struct FloodFillEngine {
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Default for FloodFillEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FloodFillEngine {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Launch a fill from `seed` on the given slice. Returns `false`
    /// without side effects if a fill is already running.
    pub fn start(
        &mut self,
        slice: Arc<Slice>,
        seed: (usize, usize),
        params: FloodFillParams,
        tx: Sender<FillEvent>,
    ) -> bool {
        if self.active.swap(true, Ordering::SeqCst) {
            debug!("flood fill already running, ignoring request");
            return false;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        let active = Arc::clone(&self.active);
        self.handle = Some(thread::spawn(move || {
            let painted = run_fill(&slice.data, seed, params, &active, |batch| {
                let _ = tx.send(FillEvent::Painted(batch));
            });
            active.store(false, Ordering::SeqCst);
            info!(painted, "flood fill finished");
            let _ = tx.send(FillEvent::Finished { painted });
        }));
        true
    }

    /// Ask the running worker (if any) to stop and wait for it.
    pub fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FloodFillEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Breadth-first threshold fill over an 8-connected grid.
///
/// Pixels join the region when their value differs from the seed value by
/// at most `params.threshold`. Accepted coordinates are handed to `emit`
/// in batches so callers can redraw while the fill is still growing.
/// Returns the number of pixels painted.
pub fn run_fill(
    data: &Array2<u8>,
    seed: (usize, usize),
    params: FloodFillParams,
    active: &AtomicBool,
    mut emit: impl FnMut(Vec<(usize, usize)>),
) -> usize {
    let (height, width) = data.dim();
    let (sx, sy) = seed;
    if sx >= width || sy >= height {
        return 0;
    }
    let target = data[[sy, sx]] as i16;
    let threshold = params.threshold as i16;

    let mut visited = Array2::<bool>::default((height, width));
    let mut queue = VecDeque::new();
    visited[[sy, sx]] = true;
    queue.push_back((sx, sy));

    let mut painted = 0usize;
    let mut batch = Vec::with_capacity(FILL_REDRAW_INTERVAL);

    while let Some((x, y)) = queue.pop_front() {
        if !active.load(Ordering::SeqCst) || painted >= params.max_steps {
            break;
        }
        if (data[[y, x]] as i16 - target).abs() > threshold {
            continue;
        }

        painted += 1;
        batch.push((x, y));
        if batch.len() >= FILL_REDRAW_INTERVAL {
            emit(std::mem::take(&mut batch));
        }

        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !visited[[ny, nx]] {
                    visited[[ny, nx]] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    if !batch.is_empty() {
        emit(batch);
    }
    painted
}
