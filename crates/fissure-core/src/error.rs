use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FissureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No tif, png or jpg slices found in {dir}")]
    NoSlicesFound { dir: PathBuf },

    #[error("Slice index {index} out of range (total: {total})")]
    SliceIndexOutOfRange { index: usize, total: usize },

    #[error("No slice loaded")]
    NoSliceLoaded,

    #[error("No active overlay layer")]
    NoActiveLayer,

    #[error("Unsupported overlay format: {0:?}")]
    UnsupportedOverlayFormat(String),

    #[error("Invalid value {value} for control {name}")]
    InvalidControl { name: &'static str, value: f64 },

    #[error("Empty slice window")]
    EmptyWindow,

    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, FissureError>;
