use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("a stop switch needs at least 2 stops, got {count}")]
    TooFewStops { count: usize },
    #[error("stop colors must map every stop: {stops} stops but {colors} colors")]
    StopColorMismatch { stops: usize, colors: usize },
    #[error("invalid switch bounds {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
