//! Alpha compositing of a watermark layer onto a base raster.
//!
//! The blend is the Porter-Duff "over" operator per overlapping pixel,
//! with the spec opacity multiplied into the foreground alpha. Layers
//! that extend past the base are clipped; the base is never mutated.

use ab_glyph::FontVec;
use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::position::{self, Placement};
use crate::spec::{WatermarkKind, WatermarkSpec};
use crate::text;
use crate::transform;

/// Blend a foreground pixel over a background pixel.
///
/// `opacity` is multiplied into the foreground alpha. An effective
/// foreground alpha of 0 returns the background pixel verbatim and an
/// alpha of 1 returns the foreground pixel verbatim, so full
/// transparency and full coverage are bit-exact rather than subject to
/// float rounding.
#[must_use]
pub fn over_pixel(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (f32::from(foreground[3]) / 255.0) * opacity.clamp(0.0, 1.0);
    if fg_alpha <= 0.0 {
        return background;
    }
    if fg_alpha >= 1.0 {
        return foreground;
    }

    let bg_alpha = f32::from(background[3]) / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |fg: u8, bg: u8| -> u8 {
        let fg = f32::from(fg) / 255.0;
        let bg = f32::from(bg) / 255.0;
        to_byte((fg * fg_alpha + bg * bg_alpha * (1.0 - fg_alpha)) / out_alpha)
    };

    Rgba([
        channel(foreground[0], background[0]),
        channel(foreground[1], background[1]),
        channel(foreground[2], background[2]),
        to_byte(out_alpha),
    ])
}

/// Convert a normalized [0, 1] channel value back to a byte.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Blend `layer` onto `base` in place with its top-left corner at `pos`.
///
/// The overlap region is clipped to the base bounds; a layer entirely
/// outside the base is a no-op.
pub fn blend_layer(base: &mut RgbaImage, layer: &RgbaImage, pos: Placement, opacity: f32) {
    let base_w = i64::from(base.width());
    let base_h = i64::from(base.height());

    let x_start = pos.x.max(0);
    let y_start = pos.y.max(0);
    let x_end = (pos.x + i64::from(layer.width())).min(base_w);
    let y_end = (pos.y + i64::from(layer.height())).min(base_h);

    for by in y_start..y_end {
        for bx in x_start..x_end {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (lx, ly) = ((bx - pos.x) as u32, (by - pos.y) as u32);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (ux, uy) = (bx as u32, by as u32);

            let fg = *layer.get_pixel(lx, ly);
            let bg = *base.get_pixel(ux, uy);
            base.put_pixel(ux, uy, over_pixel(bg, fg, opacity));
        }
    }
}

/// The watermark compositor.
///
/// Holds the loaded font for text watermarks; create once and reuse for
/// any number of [`apply`](Compositor::apply) calls. Image-only callers
/// can skip font loading entirely with [`Compositor::image_only`].
pub struct Compositor {
    font: Option<FontVec>,
}

impl Compositor {
    /// Create a compositor with a loaded font.
    #[must_use]
    pub fn new(font: FontVec) -> Self {
        Self { font: Some(font) }
    }

    /// Create a compositor that can only apply image watermarks.
    #[must_use]
    pub fn image_only() -> Self {
        Self { font: None }
    }

    /// Whether a font is loaded (required for text watermarks).
    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Apply a watermark to `base`, returning a new raster of the same
    /// dimensions. `base` itself is never modified.
    ///
    /// The watermark layer is rendered (text) or cloned (image), scaled,
    /// rotated, placed per the spec's anchor, and alpha-composited with
    /// the "over" operator. Parts of the layer outside the base are
    /// clipped.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if the base has a zero dimension or
    ///   a spec parameter is out of range.
    /// - [`Error::EmptyContent`] for an empty text watermark.
    /// - [`Error::DimensionMismatch`] for an empty image layer.
    /// - [`Error::FontLoad`] for a text watermark on a compositor built
    ///   with [`Compositor::image_only`].
    pub fn apply(&self, base: &RgbaImage, spec: &WatermarkSpec) -> Result<RgbaImage> {
        if base.width() == 0 || base.height() == 0 {
            return Err(Error::InvalidParameter(format!(
                "base image has invalid dimensions ({}x{})",
                base.width(),
                base.height()
            )));
        }
        spec.validate()?;

        let mut layer = match &spec.kind {
            WatermarkKind::Text {
                content,
                color,
                font_size,
            } => {
                let font = self.font.as_ref().ok_or_else(|| {
                    Error::FontLoad("no font loaded for text watermark".to_string())
                })?;
                text::render(font, content, *color, *font_size)?
            }
            WatermarkKind::Image { layer } => layer.clone(),
        };

        layer = transform::scale_layer(&layer, spec.scale);
        layer = transform::rotate_layer(&layer, spec.rotation);

        let pos = position::resolve(
            spec.anchor,
            base.width(),
            base.height(),
            layer.width(),
            layer.height(),
            spec.margin,
        );

        let mut out = base.clone();
        blend_layer(&mut out, &layer, pos, spec.opacity);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Anchor;

    fn solid(w: u32, h: u32, px: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(w, h, px)
    }

    #[test]
    fn over_pixel_zero_alpha_returns_background_verbatim() {
        let bg = Rgba([13, 77, 201, 255]);
        assert_eq!(over_pixel(bg, Rgba([255, 0, 0, 255]), 0.0), bg);
        assert_eq!(over_pixel(bg, Rgba([255, 0, 0, 0]), 1.0), bg);
    }

    #[test]
    fn over_pixel_full_alpha_replaces_exactly() {
        let fg = Rgba([255, 0, 0, 255]);
        assert_eq!(over_pixel(Rgba([0, 0, 0, 255]), fg, 1.0), fg);
    }

    #[test]
    fn over_pixel_half_alpha_blends() {
        // 50% white over opaque black: mid gray.
        let out = over_pixel(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]), 0.5);
        assert!(out[0] > 100 && out[0] < 160);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn blend_layer_clips_at_edges() {
        let mut base = solid(50, 50, Rgba([255, 255, 255, 255]));
        let layer = solid(30, 30, Rgba([255, 0, 0, 255]));

        blend_layer(&mut base, &layer, Placement::new(40, 40), 1.0);

        assert_eq!(*base.get_pixel(45, 45), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(30, 30), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn blend_layer_clips_negative_positions() {
        let mut base = solid(50, 50, Rgba([255, 255, 255, 255]));
        let layer = solid(30, 30, Rgba([255, 0, 0, 255]));

        blend_layer(&mut base, &layer, Placement::new(-20, -20), 1.0);

        assert_eq!(*base.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(20, 20), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn blend_layer_fully_outside_is_noop() {
        let mut base = solid(50, 50, Rgba([9, 9, 9, 255]));
        let expected = base.clone();
        let layer = solid(30, 30, Rgba([255, 0, 0, 255]));

        blend_layer(&mut base, &layer, Placement::new(100, 100), 1.0);
        assert_eq!(base, expected);
    }

    #[test]
    fn apply_zero_opacity_returns_base_exactly() {
        let base = solid(64, 64, Rgba([17, 34, 51, 255]));
        let spec = crate::WatermarkSpec::image(solid(16, 16, Rgba([255, 0, 0, 255])))
            .with_opacity(0.0);

        let out = Compositor::image_only().apply(&base, &spec).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn apply_does_not_mutate_base() {
        let base = solid(64, 64, Rgba([255, 255, 255, 255]));
        let before = base.clone();
        let spec = crate::WatermarkSpec::image(solid(16, 16, Rgba([255, 0, 0, 255])))
            .with_opacity(1.0);

        let out = Compositor::image_only().apply(&base, &spec).unwrap();
        assert_eq!(base, before);
        assert_ne!(out, base);
        assert_eq!((out.width(), out.height()), (64, 64));
    }

    #[test]
    fn apply_rejects_empty_base() {
        let base = RgbaImage::new(0, 0);
        let spec = crate::WatermarkSpec::image(solid(4, 4, Rgba([0, 0, 0, 255])));
        assert!(matches!(
            Compositor::image_only().apply(&base, &spec),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn apply_text_without_font_fails() {
        let base = solid(64, 64, Rgba([255, 255, 255, 255]));
        let spec = crate::WatermarkSpec::text("hello");
        assert!(matches!(
            Compositor::image_only().apply(&base, &spec),
            Err(Error::FontLoad(_))
        ));
    }

    #[test]
    fn apply_anchored_image_watermark() {
        let base = solid(200, 200, Rgba([0, 0, 255, 255]));
        let spec = crate::WatermarkSpec::image(solid(50, 50, Rgba([255, 0, 0, 255])))
            .with_opacity(1.0)
            .with_anchor(Anchor::TopLeft)
            .with_margin(0);

        let out = Compositor::image_only().apply(&base, &spec).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(49, 49), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(50, 50), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn apply_oversized_watermark_clips_to_base() {
        let base = solid(40, 40, Rgba([255, 255, 255, 255]));
        let spec = crate::WatermarkSpec::image(solid(100, 100, Rgba([0, 255, 0, 255])))
            .with_opacity(1.0)
            .with_anchor(Anchor::Center);

        let out = Compositor::image_only().apply(&base, &spec).unwrap();
        assert_eq!((out.width(), out.height()), (40, 40));
        assert_eq!(*out.get_pixel(20, 20), Rgba([0, 255, 0, 255]));
    }
}
