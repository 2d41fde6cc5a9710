//! Overlay and session persistence.

pub mod overlay;
pub mod session;

pub use overlay::{combined_overlay, load_overlay, save_display, save_overlay_bilevel};
pub use session::Session;
