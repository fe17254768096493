//! High-level entry point: source resolution, request queueing, and sink
//! dispatch.
//!
//! [`MegaPixImage`] wraps a source image and routes render requests to the
//! tiled renderer. The source is either already decoded or still pending
//! decode by the host. Requests made against a pending source are queued
//! in arrival order and replayed exactly once when the decoded image is
//! supplied; none are coalesced or dropped.

use crate::canvas::Backend;
use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::render::{render_to_canvas, render_to_png};

/// Where a render request should deliver its result.
///
/// The renderer always paints a canvas; an encoded-image sink just adds an
/// encoding step over an internally created canvas.
pub enum RenderTarget<B: Backend> {
    /// Paint into this canvas (resized to the target dimensions) and hand
    /// it back.
    Canvas(B::Canvas),
    /// Return the rendered result as encoded PNG bytes.
    EncodedPng,
}

/// The result of one completed render request, in the shape the request's
/// [`RenderTarget`] asked for.
pub enum RenderOutput<B: Backend> {
    Canvas(B::Canvas),
    EncodedPng(Vec<u8>),
}

struct QueuedRender<B: Backend> {
    target: RenderTarget<B>,
    options: RenderOptions,
}

enum SourceState<B: Backend> {
    Ready(B::Image),
    Pending(Vec<QueuedRender<B>>),
}

/// A source image plus the backend that can draw it.
///
/// # Example
///
/// ```
/// use megapix::{MegaPixImage, PixmapBackend, RenderOptions, RenderTarget};
/// use tiny_skia::Pixmap;
///
/// let mut source = Pixmap::new(100, 100).unwrap();
/// source.fill(tiny_skia::Color::WHITE);
///
/// let mut image = MegaPixImage::from_image(PixmapBackend::new(), source);
/// let output = image
///     .render(RenderTarget::EncodedPng, RenderOptions::new().width(50))
///     .unwrap()
///     .expect("source is decoded, so the render completes immediately");
/// assert!(matches!(output, megapix::RenderOutput::EncodedPng(_)));
/// ```
pub struct MegaPixImage<B: Backend> {
    backend: B,
    state: SourceState<B>,
}

impl<B: Backend> MegaPixImage<B> {
    /// Wrap an already decoded image.
    pub fn from_image(backend: B, image: B::Image) -> Self {
        Self {
            backend,
            state: SourceState::Ready(image),
        }
    }

    /// Decode raw PNG bytes through the backend's codec.
    pub fn from_png_bytes(backend: B, bytes: &[u8]) -> Result<Self, RenderError> {
        let image = backend.decode_png(bytes)?;
        Ok(Self::from_image(backend, image))
    }

    /// Start with no image. Render requests queue until the host finishes
    /// decoding and calls [`supply_image`](Self::supply_image).
    pub fn pending(backend: B) -> Self {
        Self {
            backend,
            state: SourceState::Pending(Vec::new()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SourceState::Pending(_))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The decoded source image, if decode has completed.
    pub fn image(&self) -> Option<&B::Image> {
        match &self.state {
            SourceState::Ready(image) => Some(image),
            SourceState::Pending(_) => None,
        }
    }

    /// Render into `target` with `options`.
    ///
    /// Returns `Ok(Some(output))` when the source is decoded. When it is
    /// still pending, the request is queued and `Ok(None)` is returned;
    /// the output is delivered later by [`supply_image`](Self::supply_image).
    pub fn render(
        &mut self,
        target: RenderTarget<B>,
        options: RenderOptions,
    ) -> Result<Option<RenderOutput<B>>, RenderError> {
        match &mut self.state {
            SourceState::Pending(queue) => {
                queue.push(QueuedRender { target, options });
                tracing::debug!(queued = queue.len(), "Source not decoded yet, queued request");
                Ok(None)
            }
            SourceState::Ready(image) => {
                Self::execute(&self.backend, image, target, options).map(Some)
            }
        }
    }

    /// Complete a pending decode, flushing queued requests in arrival
    /// order. Outputs are returned in the same order.
    ///
    /// The image is stored before the queue is replayed, so a failing
    /// request cannot lose it: on error the source is still decoded and
    /// subsequent renders run immediately (the remaining queued requests
    /// are dropped with the error).
    ///
    /// Supplying an image to an already decoded source replaces the source
    /// image; there is nothing queued in that case, so the result is
    /// empty.
    pub fn supply_image(&mut self, image: B::Image) -> Result<Vec<RenderOutput<B>>, RenderError> {
        let queued = match std::mem::replace(&mut self.state, SourceState::Ready(image)) {
            SourceState::Pending(queue) => queue,
            SourceState::Ready(_) => Vec::new(),
        };

        tracing::debug!(flushing = queued.len(), "Decode complete");
        let mut outputs = Vec::with_capacity(queued.len());
        if let SourceState::Ready(image) = &self.state {
            for request in queued {
                outputs.push(Self::execute(
                    &self.backend,
                    image,
                    request.target,
                    request.options,
                )?);
            }
        }
        Ok(outputs)
    }

    fn execute(
        backend: &B,
        image: &B::Image,
        target: RenderTarget<B>,
        options: RenderOptions,
    ) -> Result<RenderOutput<B>, RenderError> {
        match target {
            RenderTarget::Canvas(mut canvas) => {
                render_to_canvas(backend, image, &mut canvas, &options)?;
                let (width, height) = backend.canvas_size(&canvas);
                tracing::debug!(width, height, "Canvas sink painted");
                Ok(RenderOutput::Canvas(canvas))
            }
            RenderTarget::EncodedPng => {
                render_to_png(backend, image, &options).map(RenderOutput::EncodedPng)
            }
        }
    }
}
