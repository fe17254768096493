//! Defect detection probes.
//!
//! Some mobile browser engines silently corrupt large images when drawing
//! them onto a 2D surface: images over a megapixel may be subsampled to
//! half their reported resolution, and decoded content may be compressed
//! vertically ("squashed") into the top of the drawn extent, leaving
//! transparent dead space below. Neither defect raises an error, so the
//! only way to know is to draw small diagnostic regions and inspect the
//! resulting alpha values.
//!
//! Both probes are cheap relative to a full render (a 1x1 surface and a
//! 1-pixel-wide strip) and are re-run on every render call rather than
//! cached, so reusing an image across renders can never go stale.

use crate::canvas::Backend;
use crate::error::RenderError;

/// Pixel count above which the platform's drawing routine may subsample.
/// Images at or below this size are never affected and skip the probe.
pub const SUBSAMPLING_THRESHOLD: u64 = 1024 * 1024;

/// Per-render measurement of both defects.
///
/// `squash_ratio` is the fraction of the nominal height that actually
/// contains image content, in `(0, 1]`; 1.0 means no squash was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionFactors {
    pub subsampled: bool,
    pub squash_ratio: f64,
}

impl CorrectionFactors {
    /// Run both probes against an image. The squash probe uses the
    /// post-subsampling effective height, since that is the extent the
    /// platform actually draws.
    pub fn measure<B: Backend>(backend: &B, image: &B::Image) -> Result<Self, RenderError> {
        let (natural_width, natural_height) = backend.image_size(image);
        let subsampled = detect_subsampling(backend, image)?;
        let (_, effective_height) = effective_size(natural_width, natural_height, subsampled);
        let squash_ratio = detect_vertical_squash(backend, image, effective_height)?;
        tracing::debug!(subsampled, squash_ratio, "Measured correction factors");
        Ok(Self {
            subsampled,
            squash_ratio,
        })
    }
}

/// True pixel extent of the source content after subsampling compensation.
///
/// Halving is clamped to at least one pixel so the tile geometry stays
/// defined for degenerate one-pixel-wide megapixel strips.
pub(crate) fn effective_size(width: u32, height: u32, subsampled: bool) -> (u32, u32) {
    if subsampled {
        ((width / 2).max(1), (height / 2).max(1))
    } else {
        (width, height)
    }
}

/// Detect whether the platform silently halved the image's effective
/// resolution.
///
/// Draws the image onto a 1x1 probe surface offset so that the rightmost
/// source column would land exactly on pixel (0,0). If the platform halved
/// the image internally, the true rendered width is only half the natural
/// width, the draw overshoots, and the probe pixel stays transparent.
///
/// Known limitation: a source with a genuinely transparent right edge
/// produces a false positive. The probe cannot tell dead space apart from
/// real transparency.
pub fn detect_subsampling<B: Backend>(backend: &B, image: &B::Image) -> Result<bool, RenderError> {
    let (width, height) = backend.image_size(image);
    if u64::from(width) * u64::from(height) <= SUBSAMPLING_THRESHOLD {
        return Ok(false);
    }

    let mut probe = backend.create_canvas(1, 1)?;
    backend.draw_image(&mut probe, image, 1 - i64::from(width), 0);
    Ok(backend.alpha_at(&probe, 0, 0) == 0)
}

/// Measure vertical squash: the fraction of `corrected_height` that
/// actually receives image content when the image is drawn.
///
/// Draws the image at origin into a 1-pixel-wide strip of the corrected
/// height and binary-searches the alpha column for the boundary between
/// content (non-zero alpha) and dead space (zero alpha). This assumes the
/// dead space, if any, is one contiguous run at the bottom of the strip,
/// which holds for the platform defect being measured.
///
/// The returned ratio is always in `(0, 1]`. A `corrected_height` of zero
/// returns the neutral ratio 1.0, as does a fully transparent column
/// (nothing drawn is not the same defect as squash).
pub fn detect_vertical_squash<B: Backend>(
    backend: &B,
    image: &B::Image,
    corrected_height: u32,
) -> Result<f64, RenderError> {
    if corrected_height == 0 {
        return Ok(1.0);
    }

    let mut strip = backend.create_canvas(1, corrected_height)?;
    backend.draw_image(&mut strip, image, 0, 0);
    let alpha = backend.read_alpha_column(&strip, 0);
    debug_assert_eq!(alpha.len(), corrected_height as usize);

    // Bracket the content/dead-space boundary: `sy` is the highest row
    // known to be content, `ey` the lowest known to be dead. The probe row
    // `py` is keyed on the alpha of the row above it, matching a boundary
    // defined as "rows below py are dead".
    let mut sy: u32 = 0;
    let mut ey: u32 = corrected_height;
    let mut py: u32 = corrected_height;
    while py > sy {
        if alpha[py as usize - 1] == 0 {
            ey = py;
        } else {
            sy = py;
        }
        let next = (sy + ey) >> 1;
        debug_assert!(
            next != py || next == sy,
            "squash boundary search must narrow each step"
        );
        py = next;
    }

    // A column with no opaque rows at all drives the search to row 0.
    // That is an empty source, not a squashed one; report the neutral
    // ratio so the result stays a usable divisor.
    if py == 0 {
        tracing::debug!(corrected_height, "Strip fully transparent, no squash measured");
        return Ok(1.0);
    }

    let ratio = f64::from(py) / f64::from(corrected_height);
    tracing::debug!(corrected_height, ratio, "Measured vertical squash");
    Ok(ratio)
}
