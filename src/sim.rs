//! Simulated defective drawing surface for tests.
//!
//! The production backend has none of the defects the pipeline corrects,
//! so tests drive the detectors and renderer through this simulation
//! instead. It reproduces the two observed platform behaviors on demand:
//! halving the drawn size of images over a megapixel, and leaving a run of
//! transparent rows at the bottom of an image's drawn extent.
//!
//! The backend is also instrumented: it counts canvas allocations and
//! records every tile copy, so tests can assert that probes are skipped
//! below the subsampling threshold and that the renderer's destination
//! rectangles tile the target exactly.

use std::cell::{Cell, RefCell};

use crate::canvas::{Backend, Rect};
use crate::error::RenderError;
use crate::options::EncodingOptions;

/// A synthetic decoded image. Content is pure coverage: every drawn pixel
/// is fully opaque except the bottom `dead_rows` of the drawn extent,
/// which the simulated squash defect leaves transparent.
pub(crate) struct SimImage {
    pub width: u32,
    pub height: u32,
    pub dead_rows: u32,
}

impl SimImage {
    pub fn opaque(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            dead_rows: 0,
        }
    }

    pub fn with_dead_rows(width: u32, height: u32, dead_rows: u32) -> Self {
        Self {
            width,
            height,
            dead_rows,
        }
    }
}

/// Alpha-only canvas; the pipeline's probes and coverage assertions never
/// need color channels.
pub(crate) struct SimCanvas {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl SimCanvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x < self.width && y < self.height {
            self.alpha[y as usize * self.width as usize + x as usize]
        } else {
            0
        }
    }

    fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.alpha[y as usize * self.width as usize + x as usize] = value;
        }
    }

    pub fn fully_painted(&self) -> bool {
        self.alpha.iter().all(|&a| a != 0)
    }
}

#[derive(Default)]
pub(crate) struct SimBackend {
    /// Halve the drawn size of images over a megapixel.
    pub subsample_over_megapixel: bool,
    pub canvases_created: Cell<usize>,
    /// Every `draw_canvas` call as `(src_rect, dst_rect)`.
    pub tile_copies: RefCell<Vec<(Rect, Rect)>>,
}

impl SimBackend {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn subsampling() -> Self {
        Self {
            subsample_over_megapixel: true,
            ..Self::default()
        }
    }

    fn drawn_size(&self, image: &SimImage) -> (u32, u32) {
        if self.subsample_over_megapixel
            && u64::from(image.width) * u64::from(image.height) > 1024 * 1024
        {
            (image.width / 2, image.height / 2)
        } else {
            (image.width, image.height)
        }
    }
}

impl Backend for SimBackend {
    type Image = SimImage;
    type Canvas = SimCanvas;

    fn image_size(&self, image: &SimImage) -> (u32, u32) {
        (image.width, image.height)
    }

    fn decode_png(&self, _bytes: &[u8]) -> Result<SimImage, RenderError> {
        Err(RenderError::PngDecode(
            "simulated surface has no codec".to_string(),
        ))
    }

    fn create_canvas(&self, width: u32, height: u32) -> Result<SimCanvas, RenderError> {
        self.canvases_created.set(self.canvases_created.get() + 1);
        Ok(SimCanvas::new(width, height))
    }

    fn resize_canvas(
        &self,
        canvas: &mut SimCanvas,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        *canvas = SimCanvas::new(width, height);
        Ok(())
    }

    fn canvas_size(&self, canvas: &SimCanvas) -> (u32, u32) {
        (canvas.width, canvas.height)
    }

    fn clear_canvas(&self, canvas: &mut SimCanvas) {
        canvas.alpha.fill(0);
    }

    fn draw_image(&self, canvas: &mut SimCanvas, image: &SimImage, dx: i64, dy: i64) {
        let (drawn_w, drawn_h) = self.drawn_size(image);
        let content_h = i64::from(drawn_h.saturating_sub(image.dead_rows));
        let drawn_w = i64::from(drawn_w);

        for y in 0..i64::from(canvas.height) {
            let sy = y - dy;
            if sy < 0 || sy >= content_h {
                continue;
            }
            for x in 0..i64::from(canvas.width) {
                let sx = x - dx;
                if sx >= 0 && sx < drawn_w {
                    canvas.set(x as u32, y as u32, 255);
                }
            }
        }
    }

    fn draw_canvas(&self, dst: &mut SimCanvas, src: &SimCanvas, src_rect: Rect, dst_rect: Rect) {
        self.tile_copies.borrow_mut().push((src_rect, dst_rect));
        if dst_rect.width == 0 || dst_rect.height == 0 {
            return;
        }

        // Nearest-neighbor coverage copy with source-over semantics:
        // transparent source samples leave the destination untouched.
        for y in 0..dst_rect.height {
            let ty = dst_rect.y + y;
            if ty >= dst.height {
                break;
            }
            let sy = src_rect.y
                + (u64::from(y) * u64::from(src_rect.height) / u64::from(dst_rect.height)) as u32;
            for x in 0..dst_rect.width {
                let tx = dst_rect.x + x;
                if tx >= dst.width {
                    break;
                }
                let sx = src_rect.x
                    + (u64::from(x) * u64::from(src_rect.width) / u64::from(dst_rect.width)) as u32;
                let sample = src.get(sx, sy);
                if sample != 0 {
                    dst.set(tx, ty, sample);
                }
            }
        }
    }

    fn alpha_at(&self, canvas: &SimCanvas, x: u32, y: u32) -> u8 {
        canvas.get(x, y)
    }

    fn read_alpha_column(&self, canvas: &SimCanvas, x: u32) -> Vec<u8> {
        (0..canvas.height).map(|y| canvas.get(x, y)).collect()
    }

    fn encode_png(
        &self,
        canvas: &SimCanvas,
        _encoding: &EncodingOptions,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(format!("sim-png:{}x{}", canvas.width, canvas.height).into_bytes())
    }
}
