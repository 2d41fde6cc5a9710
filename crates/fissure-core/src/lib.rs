pub mod consts;
pub mod error;
pub mod fill;
pub mod io;
pub mod layer;
pub mod loader;
pub mod paint;
pub mod render;
pub mod slice;
pub mod transform;
pub mod viewer;
