//! Watermark description and parameter validation.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::position::Anchor;

/// Default edge inset for named anchors, in pixels.
pub const DEFAULT_MARGIN: u32 = 16;

/// Default font size for text watermarks, in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 36.0;

/// What to stamp: rendered text or a secondary image layer.
#[derive(Debug, Clone)]
pub enum WatermarkKind {
    /// Render a string with the compositor's font.
    Text {
        /// The string to render. Must be non-empty.
        content: String,
        /// Fill color. Its alpha channel is carried into the layer and
        /// further multiplied by the spec opacity at composite time.
        color: Rgba<u8>,
        /// Glyph size in pixels.
        font_size: f32,
    },
    /// Composite a pre-decoded RGBA layer.
    Image {
        /// The watermark layer. Must have non-zero dimensions.
        layer: RgbaImage,
    },
}

/// A complete description of one watermark operation.
///
/// Immutable input to [`Compositor::apply`](crate::Compositor::apply);
/// build one per stamp, validation happens inside `apply`.
#[derive(Debug, Clone)]
pub struct WatermarkSpec {
    /// Text or image payload.
    pub kind: WatermarkKind,
    /// Where the layer lands on the base.
    pub anchor: Anchor,
    /// Edge inset for named anchors (ignored by `Absolute`/`Relative`).
    pub margin: u32,
    /// Layer opacity in `[0, 1]`, multiplied into the layer's own alpha.
    pub opacity: f32,
    /// Uniform scale factor applied to the layer. Must be finite and > 0.
    pub scale: f32,
    /// Clockwise rotation in degrees. 0 skips the rotation resample.
    pub rotation: f32,
}

impl WatermarkSpec {
    /// Describe a text watermark with default placement and blending.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: WatermarkKind::Text {
                content: content.into(),
                color: Rgba([255, 255, 255, 255]),
                font_size: DEFAULT_FONT_SIZE,
            },
            ..Self::base()
        }
    }

    /// Describe an image watermark with default placement and blending.
    #[must_use]
    pub fn image(layer: RgbaImage) -> Self {
        Self {
            kind: WatermarkKind::Image { layer },
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            kind: WatermarkKind::Text {
                content: String::new(),
                color: Rgba([255, 255, 255, 255]),
                font_size: DEFAULT_FONT_SIZE,
            },
            anchor: Anchor::Center,
            margin: DEFAULT_MARGIN,
            opacity: 0.5,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Set the anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the named-anchor margin.
    #[must_use]
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the scale factor.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation in degrees (clockwise).
    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the text color. No effect on image watermarks.
    #[must_use]
    pub fn with_color(mut self, rgba: Rgba<u8>) -> Self {
        if let WatermarkKind::Text { ref mut color, .. } = self.kind {
            *color = rgba;
        }
        self
    }

    /// Set the font size in pixels. No effect on image watermarks.
    #[must_use]
    pub fn with_font_size(mut self, px: f32) -> Self {
        if let WatermarkKind::Text {
            ref mut font_size, ..
        } = self.kind
        {
            *font_size = px;
        }
        self
    }

    /// Check every parameter against its valid range.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for opacity outside `[0, 1]`, a
    ///   non-positive or non-finite scale, a non-finite rotation, or a
    ///   non-positive font size.
    /// - [`Error::EmptyContent`] for an empty text string.
    /// - [`Error::DimensionMismatch`] for an image layer with a zero
    ///   dimension.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::InvalidParameter(format!(
                "opacity {} outside [0, 1]",
                self.opacity
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "scale {} must be finite and > 0",
                self.scale
            )));
        }
        if !self.rotation.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "rotation {} must be finite",
                self.rotation
            )));
        }

        match &self.kind {
            WatermarkKind::Text {
                content, font_size, ..
            } => {
                if content.is_empty() {
                    return Err(Error::EmptyContent);
                }
                if !font_size.is_finite() || *font_size <= 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "font size {font_size} must be finite and > 0"
                    )));
                }
            }
            WatermarkKind::Image { layer } => {
                if layer.width() == 0 || layer.height() == 0 {
                    return Err(Error::DimensionMismatch {
                        width: layer.width(),
                        height: layer.height(),
                    });
                }
            }
        }

        Ok(())
    }
}
