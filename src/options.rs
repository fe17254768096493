//! Render options and target dimension resolution.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Configuration for a single render request.
///
/// When only one of `width`/`height` is given, the other is derived from
/// the source's natural aspect ratio with integer floor rounding. When both
/// are omitted, the natural size is used.
///
/// The `encoding` options are pass-through: the renderer itself ignores
/// them, they only apply when the result is encoded to PNG.
///
/// # Example
///
/// ```
/// use megapix::RenderOptions;
///
/// let options = RenderOptions::new().width(960);
/// assert_eq!(options.resolve_target(2000, 1500).unwrap(), (960, 720));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Target pixel width. Derived from the aspect ratio when omitted.
    pub width: Option<u32>,
    /// Target pixel height. Derived from the aspect ratio when omitted.
    pub height: Option<u32>,
    /// Options forwarded unmodified to the PNG encoding step.
    pub encoding: EncodingOptions,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target width.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the target height.
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the PNG compression level for encoded-image sinks.
    pub fn compression(mut self, compression: PngCompression) -> Self {
        self.encoding.compression = compression;
        self
    }

    /// Resolve the effective target dimensions for a source of the given
    /// natural size.
    ///
    /// Fails fast on zero-sized sources and non-positive targets; the
    /// renderer's geometry is undefined for either.
    pub fn resolve_target(
        &self,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<(u32, u32), RenderError> {
        if natural_width == 0 || natural_height == 0 {
            return Err(RenderError::EmptySource {
                width: natural_width,
                height: natural_height,
            });
        }

        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let h = u64::from(natural_height) * u64::from(w) / u64::from(natural_width);
                (w, h as u32)
            }
            (None, Some(h)) => {
                let w = u64::from(natural_width) * u64::from(h) / u64::from(natural_height);
                (w as u32, h)
            }
            (None, None) => (natural_width, natural_height),
        };

        if width == 0 || height == 0 {
            return Err(RenderError::UnsupportedDimensions { width, height });
        }
        Ok((width, height))
    }
}

/// Options applied when encoding a rendered surface to PNG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingOptions {
    pub compression: PngCompression,
}

/// PNG compression level, trading encode time against output size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PngCompression {
    Fast,
    #[default]
    Balanced,
    Best,
}
