//! The platform seam: drawing surfaces and decoded images.
//!
//! The detectors and the tiled renderer never touch pixels directly. They
//! speak to a [`Backend`], which models the 2D drawing capabilities of the
//! host platform: creating surfaces, drawing a decoded image onto a surface
//! with clipping, copying between surfaces with independent source and
//! destination rectangles, and reading back alpha values.
//!
//! This indirection exists because the defects this crate corrects live in
//! the *platform's* drawing routine, not in the images themselves. The
//! production backend ([`crate::pixmap::PixmapBackend`]) has no such
//! defects; tests drive the pipeline through a simulated backend that
//! reproduces them.

use crate::error::RenderError;
use crate::options::EncodingOptions;

/// A rectangular pixel region, used for both source and destination
/// rectangles of a surface-to-surface copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Host drawing capabilities required by the correction pipeline.
///
/// `Image` is an opaque handle to a fully decoded bitmap; the pipeline only
/// asks for its natural size and hands it back to the backend for drawing.
/// It is never mutated and never retained beyond a single render call.
///
/// `Canvas` is a drawing surface of known pixel dimensions. Drawing an
/// image or another canvas into it must clip to the surface bounds, and
/// blending must be source-over so that fully transparent source pixels
/// leave the destination untouched.
pub trait Backend {
    type Image;
    type Canvas;

    /// Natural pixel dimensions of a decoded image, as reported by the
    /// platform. These may overstate the effective resolution on platforms
    /// that subsample large images.
    fn image_size(&self, image: &Self::Image) -> (u32, u32);

    /// Decode PNG bytes into an image handle.
    fn decode_png(&self, bytes: &[u8]) -> Result<Self::Image, RenderError>;

    /// Allocate a transparent canvas of the given size.
    fn create_canvas(&self, width: u32, height: u32) -> Result<Self::Canvas, RenderError>;

    /// Resize a canvas, discarding its contents. The canvas comes back
    /// fully transparent even when the size is unchanged.
    fn resize_canvas(
        &self,
        canvas: &mut Self::Canvas,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError>;

    fn canvas_size(&self, canvas: &Self::Canvas) -> (u32, u32);

    /// Reset every pixel to transparent.
    fn clear_canvas(&self, canvas: &mut Self::Canvas);

    /// Draw an image at its natural scale, offset by `(dx, dy)`, clipped to
    /// the canvas bounds. Negative offsets select which part of the image
    /// lands on the surface.
    fn draw_image(&self, canvas: &mut Self::Canvas, image: &Self::Image, dx: i64, dy: i64);

    /// Copy `src_rect` of one canvas into `dst_rect` of another, scaling as
    /// needed and clipping to the destination bounds.
    fn draw_canvas(&self, dst: &mut Self::Canvas, src: &Self::Canvas, src_rect: Rect, dst_rect: Rect);

    /// Alpha channel value of a single pixel; 0 for out-of-bounds reads.
    fn alpha_at(&self, canvas: &Self::Canvas, x: u32, y: u32) -> u8;

    /// Alpha values of a full pixel column, top to bottom.
    fn read_alpha_column(&self, canvas: &Self::Canvas, x: u32) -> Vec<u8>;

    /// Encode the canvas contents as PNG bytes.
    fn encode_png(
        &self,
        canvas: &Self::Canvas,
        encoding: &EncodingOptions,
    ) -> Result<Vec<u8>, RenderError>;
}
