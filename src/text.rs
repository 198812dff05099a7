//! Text watermark rasterization.
//!
//! Renders a string into a tight transparent RGBA layer with `ab_glyph`,
//! kerned and anti-aliased. The layer is then scaled, rotated, and
//! composited like any image watermark; opacity is applied at composite
//! time, not here.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::compose::over_pixel;
use crate::error::{Error, Result};

/// Breathing room added around measured text, in pixels.
const TEXT_PADDING: u32 = 2;

/// Parse a hex color string into RGBA components.
///
/// Supports `#RGB`, `#RRGGBB`, and `#RRGGBBAA`. Alpha defaults to 255
/// when the string does not carry one.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for a missing `#` prefix, an
/// unsupported length, or a non-hex digit.
pub fn parse_hex_color(hex: &str) -> Result<Rgba<u8>> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| Error::InvalidParameter(format!("color '{hex}' must start with '#'")))?;

    let component = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| Error::InvalidParameter(format!("invalid hex digit in '{hex}'")))
    };

    match digits.len() {
        3 => {
            // #RGB: each digit doubled, 0xF -> 0xFF
            let r = component(&digits[0..1])?;
            let g = component(&digits[1..2])?;
            let b = component(&digits[2..3])?;
            Ok(Rgba([r * 17, g * 17, b * 17, 255]))
        }
        6 => Ok(Rgba([
            component(&digits[0..2])?,
            component(&digits[2..4])?,
            component(&digits[4..6])?,
            255,
        ])),
        8 => Ok(Rgba([
            component(&digits[0..2])?,
            component(&digits[2..4])?,
            component(&digits[4..6])?,
            component(&digits[6..8])?,
        ])),
        n => Err(Error::InvalidParameter(format!(
            "color must be #RGB, #RRGGBB or #RRGGBBAA, got {n} digits"
        ))),
    }
}

/// Measure the rendered dimensions of `text` at `font_size` pixels.
///
/// Returns `(width, height)` including a small padding.
#[must_use]
pub fn measure(font: &FontVec, text: &str, font_size: f32) -> (u32, u32) {
    let scaled = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev: Option<ab_glyph::GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    let height = scaled.height();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let w = width.max(0.0).ceil() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let h = height.max(0.0).ceil() as u32;
    (w + TEXT_PADDING, h + TEXT_PADDING)
}

/// Render `content` into a tight transparent RGBA layer.
///
/// The fill color's alpha channel scales each glyph's anti-alias
/// coverage; overlapping glyphs are blended with the "over" operator.
///
/// # Errors
///
/// Returns [`Error::EmptyContent`] if the string is empty.
pub fn render(font: &FontVec, content: &str, color: Rgba<u8>, font_size: f32) -> Result<RgbaImage> {
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }

    let scale = PxScale::from(font_size);
    let scaled = font.as_scaled(scale);
    let (width, height) = measure(font, content, font_size);

    let mut layer = RgbaImage::new(width.max(1), height.max(1));
    #[allow(clippy::cast_precision_loss)]
    let pad = (TEXT_PADDING / 2) as f32;
    let baseline_y = scaled.ascent() + pad;

    let mut cursor_x = pad;
    let mut prev: Option<ab_glyph::GlyphId> = None;

    for c in content.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            cursor_x += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                #[allow(clippy::cast_possible_truncation)]
                let x = px as i64 + i64::from(bounds.min.x as i32);
                #[allow(clippy::cast_possible_truncation)]
                let y = py as i64 + i64::from(bounds.min.y as i32);

                if x >= 0 && y >= 0 && x < i64::from(layer.width()) && y < i64::from(layer.height())
                {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color[3])).round() as u8;
                    let glyph_px = Rgba([color[0], color[1], color[2], alpha]);

                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let (ux, uy) = (x as u32, y as u32);
                    let existing = *layer.get_pixel(ux, uy);
                    layer.put_pixel(ux, uy, over_pixel(existing, glyph_px, 1.0));
                }
            });
        }

        cursor_x += scaled.h_advance(id);
        prev = Some(id);
    }

    Ok(layer)
}
