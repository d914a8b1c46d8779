use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color {0:?}, expected `#rrggbb`")]
    InvalidColor(String),
    #[error("lattice resolution must be at least 1x1, got {cols}x{rows}")]
    InvalidResolution { cols: u32, rows: u32 },
    #[error("`{option}` must be at most {max}, got {value}")]
    InvalidRandomness { option: &'static str, value: u32, max: u32 },
    #[error("gradient must contain at least one color")]
    EmptyGradient,
    #[error("canvas must not be empty, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
