//! megapix: corrective rendering for mobile 2D surfaces that mangle large
//! images.
//!
//! Some mobile browser engines silently corrupt large raster images when
//! drawing them onto a 2D surface: anything over a megapixel may be
//! subsampled to half its reported resolution, and decoded content may be
//! squashed vertically into the top of the drawn extent. Neither defect
//! raises an error; a naive scale-and-draw simply produces cropped,
//! stretched, or blank output.
//!
//! This crate measures both defects with small drawing probes
//! ([`detect_subsampling`], [`detect_vertical_squash`]) and reproduces a
//! correctly scaled full-resolution image through a tiled copy
//! ([`render_to_canvas`]) whose individual draws stay small enough not to
//! re-trigger the defects. The platform's drawing capabilities sit behind
//! the [`Backend`] trait; [`PixmapBackend`] is the bundled implementation
//! over `tiny-skia` pixmaps.
//!
//! # Quick Start
//!
//! ```
//! use megapix::{render_to_png, PixmapBackend, RenderOptions};
//! use tiny_skia::Pixmap;
//!
//! let backend = PixmapBackend::new();
//! let mut source = Pixmap::new(64, 48).unwrap();
//! source.fill(tiny_skia::Color::WHITE);
//!
//! // Height is derived from the aspect ratio: 32x24.
//! let png = render_to_png(&backend, &source, &RenderOptions::new().width(32)).unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! For sources that arrive as raw bytes, or that the host decodes
//! asynchronously, use the [`MegaPixImage`] facade: it queues render
//! requests until decode completes and replays them in order.

pub mod api;
pub mod canvas;
pub mod detect;
pub mod error;
pub mod options;
pub mod pixmap;
pub mod render;

#[cfg(test)]
mod sim;

pub use api::{MegaPixImage, RenderOutput, RenderTarget};
pub use canvas::{Backend, Rect};
pub use detect::{
    detect_subsampling, detect_vertical_squash, CorrectionFactors, SUBSAMPLING_THRESHOLD,
};
pub use error::RenderError;
pub use options::{EncodingOptions, PngCompression, RenderOptions};
pub use pixmap::PixmapBackend;
pub use render::{render_to_canvas, render_to_png, TILE_SIZE};
