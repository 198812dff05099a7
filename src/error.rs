//! Error types for the photomark crate.

/// Errors that can occur while building or applying a watermark.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A watermark parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The text watermark content is empty.
    #[error("text watermark content is empty")]
    EmptyContent,

    /// The secondary image layer has a zero dimension.
    #[error("watermark layer has invalid dimensions ({width}x{height})")]
    DimensionMismatch {
        /// Layer width in pixels.
        width: u32,
        /// Layer height in pixels.
        height: u32,
    },

    /// No usable font could be loaded for text rendering.
    #[error("failed to load font: {0}")]
    FontLoad(String),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let invalid = Error::InvalidParameter("opacity 1.5 outside [0, 1]".to_string());
        assert!(invalid.to_string().contains("opacity 1.5"));

        let dims = Error::DimensionMismatch {
            width: 0,
            height: 32,
        };
        assert!(dims.to_string().contains("0x32"));

        assert_eq!(
            Error::EmptyContent.to_string(),
            "text watermark content is empty"
        );
    }
}
