use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image Error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config Error: {0}")]
    ConfigError(#[from] serde_yaml::Error),

    #[error("Json Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("wrong detections format at line {line}: {reason}")]
    DetectionsFormat { line: usize, reason: &'static str },

    #[error("frame buffer of {len} bytes does not match {width}x{height}x3")]
    FrameSize { width: u32, height: u32, len: usize },
}
