//! Production backend over `tiny-skia` pixmaps.
//!
//! Pixmaps here have none of the defects the pipeline corrects, so on this
//! backend the detectors report `subsampled = false` and a squash ratio of
//! 1.0 for opaque sources, and the tiled renderer degrades to a plain
//! scaled copy. The backend exists so the same pipeline runs unchanged on
//! healthy and defective surfaces alike.

use tiny_skia::{Color, FilterQuality, IntRect, Pixmap, PixmapPaint, Transform};

use crate::canvas::{Backend, Rect};
use crate::error::RenderError;
use crate::options::{EncodingOptions, PngCompression};

#[derive(Debug, Default, Clone, Copy)]
pub struct PixmapBackend;

impl PixmapBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for PixmapBackend {
    type Image = Pixmap;
    type Canvas = Pixmap;

    fn image_size(&self, image: &Pixmap) -> (u32, u32) {
        (image.width(), image.height())
    }

    fn decode_png(&self, bytes: &[u8]) -> Result<Pixmap, RenderError> {
        Pixmap::decode_png(bytes).map_err(|e| RenderError::PngDecode(e.to_string()))
    }

    fn create_canvas(&self, width: u32, height: u32) -> Result<Pixmap, RenderError> {
        Pixmap::new(width, height).ok_or(RenderError::CanvasAllocation { width, height })
    }

    fn resize_canvas(
        &self,
        canvas: &mut Pixmap,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if canvas.width() == width && canvas.height() == height {
            self.clear_canvas(canvas);
        } else {
            *canvas = self.create_canvas(width, height)?;
        }
        Ok(())
    }

    fn canvas_size(&self, canvas: &Pixmap) -> (u32, u32) {
        (canvas.width(), canvas.height())
    }

    fn clear_canvas(&self, canvas: &mut Pixmap) {
        canvas.fill(Color::TRANSPARENT);
    }

    fn draw_image(&self, canvas: &mut Pixmap, image: &Pixmap, dx: i64, dy: i64) {
        let dx = dx.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let dy = dy.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        canvas.draw_pixmap(
            dx,
            dy,
            image.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn draw_canvas(&self, dst: &mut Pixmap, src: &Pixmap, src_rect: Rect, dst_rect: Rect) {
        if src_rect.width == 0
            || src_rect.height == 0
            || dst_rect.width == 0
            || dst_rect.height == 0
        {
            return;
        }
        let Some(crop) = IntRect::from_xywh(
            src_rect.x as i32,
            src_rect.y as i32,
            src_rect.width,
            src_rect.height,
        ) else {
            return;
        };
        let Some(tile) = src.clone_rect(crop) else {
            return;
        };

        let scale_x = dst_rect.width as f32 / src_rect.width as f32;
        let scale_y = dst_rect.height as f32 / src_rect.height as f32;
        // An unscaled copy stays pixel-exact; only real resampling gets
        // the bilinear filter.
        let quality = if scale_x == 1.0 && scale_y == 1.0 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_scale(scale_x, scale_y)
            .post_translate(dst_rect.x as f32, dst_rect.y as f32);
        dst.draw_pixmap(0, 0, tile.as_ref(), &paint, transform, None);
    }

    fn alpha_at(&self, canvas: &Pixmap, x: u32, y: u32) -> u8 {
        canvas.pixel(x, y).map_or(0, |pixel| pixel.alpha())
    }

    fn read_alpha_column(&self, canvas: &Pixmap, x: u32) -> Vec<u8> {
        (0..canvas.height())
            .map(|y| self.alpha_at(canvas, x, y))
            .collect()
    }

    fn encode_png(
        &self,
        canvas: &Pixmap,
        encoding: &EncodingOptions,
    ) -> Result<Vec<u8>, RenderError> {
        // Pixmap stores premultiplied RGBA; PNG wants straight alpha.
        let mut data = Vec::with_capacity(canvas.data().len());
        for pixel in canvas.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(match encoding.compression {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Balanced => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        });
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        Ok(out)
    }
}
