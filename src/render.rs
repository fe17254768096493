//! Tiled, correction-aware scaled rendering.
//!
//! Drawing a multi-megapixel image onto a surface in one call is exactly
//! what triggers the subsampling and squash defects in the first place, so
//! the renderer never does it. Instead it measures both defects up front,
//! then copies the source through a fixed-size scratch surface one tile at
//! a time. Every individual draw touches at most `TILE_SIZE * TILE_SIZE`
//! source pixels, which keeps the corrective draws themselves below the
//! defect threshold and bounds per-operation memory.

use crate::canvas::{Backend, Rect};
use crate::detect::{effective_size, CorrectionFactors};
use crate::error::RenderError;
use crate::options::RenderOptions;

/// Edge length of the scratch tile, in source pixels.
pub const TILE_SIZE: u32 = 1024;

/// Render `image` into `canvas` at the target size resolved from
/// `options`, compensating for subsampling and vertical squash.
///
/// The destination canvas is resized to the target dimensions before any
/// drawing, discarding its previous contents. On success the canvas is
/// fully painted; no partial output is left behind on error because all
/// validation happens before the first tile is drawn.
pub fn render_to_canvas<B: Backend>(
    backend: &B,
    image: &B::Image,
    canvas: &mut B::Canvas,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let (natural_width, natural_height) = backend.image_size(image);
    let (width, height) = options.resolve_target(natural_width, natural_height)?;
    backend.resize_canvas(canvas, width, height)?;

    let factors = CorrectionFactors::measure(backend, image)?;
    let (iw, ih) = effective_size(natural_width, natural_height, factors.subsampled);
    let squash = factors.squash_ratio;

    tracing::debug!(
        natural_width,
        natural_height,
        effective_width = iw,
        effective_height = ih,
        subsampled = factors.subsampled,
        squash_ratio = squash,
        target_width = width,
        target_height = height,
        "Rendering with correction factors"
    );

    let mut scratch = backend.create_canvas(TILE_SIZE, TILE_SIZE)?;

    let mut sy = 0u32;
    while sy < ih {
        let sh = (ih - sy).min(TILE_SIZE);
        let mut sx = 0u32;
        while sx < iw {
            let sw = (iw - sx).min(TILE_SIZE);

            // Pull the (sx, sy, sw, sh) source tile into the top-left of
            // the scratch surface. Clipping to the scratch bounds does the
            // cropping.
            backend.clear_canvas(&mut scratch);
            backend.draw_image(&mut scratch, image, -i64::from(sx), -i64::from(sy));

            // Floor the origin and ceil the extent so consecutive tiles
            // cover the destination without gaps. Dividing the vertical
            // geometry by the squash ratio pre-stretches the content the
            // platform is about to compress.
            let dx = (f64::from(sx) * f64::from(width) / f64::from(iw)).floor() as u32;
            let dw = (f64::from(sw) * f64::from(width) / f64::from(iw)).ceil() as u32;
            let dy = (f64::from(sy) * f64::from(height) / f64::from(ih) / squash).floor() as u32;
            let dh = (f64::from(sh) * f64::from(height) / f64::from(ih) / squash).ceil() as u32;

            backend.draw_canvas(
                canvas,
                &scratch,
                Rect::new(0, 0, sw, sh),
                Rect::new(dx, dy, dw, dh),
            );

            sx += TILE_SIZE;
        }
        sy += TILE_SIZE;
    }

    Ok(())
}

/// Render `image` at the target size resolved from `options` and return
/// the result as encoded PNG bytes.
pub fn render_to_png<B: Backend>(
    backend: &B,
    image: &B::Image,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    let (natural_width, natural_height) = backend.image_size(image);
    let (width, height) = options.resolve_target(natural_width, natural_height)?;
    let mut canvas = backend.create_canvas(width, height)?;
    render_to_canvas(backend, image, &mut canvas, options)?;
    backend.encode_png(&canvas, &options.encoding)
}
