use thiserror::Error;

/// Unified error type for the megapix rendering pipeline.
///
/// Detector routines are total over their input domain; errors only arise
/// from caller contract violations (degenerate dimensions) or from the
/// backend's allocation and PNG codec seams.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported target dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Source image has no pixels: {width}x{height}")]
    EmptySource { width: u32, height: u32 },

    #[error("Failed to allocate {width}x{height} canvas")]
    CanvasAllocation { width: u32, height: u32 },

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}
