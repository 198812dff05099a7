//! Geometric transforms applied to a watermark layer before compositing.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Uniformly scale a layer by `factor` with Lanczos3 resampling.
///
/// Target dimensions are rounded and floored at 1x1 so extreme
/// down-scales never produce an empty layer. A factor of exactly 1.0
/// returns a clone untouched by the resampler.
#[must_use]
pub fn scale_layer(layer: &RgbaImage, factor: f32) -> RgbaImage {
    if (factor - 1.0).abs() < f32::EPSILON {
        return layer.clone();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let new_w = ((layer.width() as f32 * factor).round() as u32).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let new_h = ((layer.height() as f32 * factor).round() as u32).max(1);

    imageops::resize(layer, new_w, new_h, FilterType::Lanczos3)
}

/// Rotate a layer clockwise by `degrees` around its center.
///
/// The output canvas expands to the rotated bounding box; uncovered
/// pixels stay fully transparent. Sampling is bilinear. Angles that
/// normalize to 0 return a clone.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn rotate_layer(layer: &RgbaImage, degrees: f32) -> RgbaImage {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        return layer.clone();
    }

    // Negative for clockwise in image coordinates (y grows downward).
    let radians = -normalized.to_radians();
    let (sin, cos) = radians.sin_cos();

    let src_w = layer.width() as f32;
    let src_h = layer.height() as f32;
    let cx = src_w / 2.0;
    let cy = src_h / 2.0;

    let corners = [
        (-cx, -cy),
        (src_w - cx, -cy),
        (-cx, src_h - cy),
        (src_w - cx, src_h - cy),
    ];

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for (x, y) in corners {
        let rx = x * cos - y * sin;
        let ry = x * sin + y * cos;
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }

    let dst_w = ((max_x - min_x).ceil() as u32).max(1);
    let dst_h = ((max_y - min_y).ceil() as u32).max(1);
    let mut rotated = RgbaImage::new(dst_w, dst_h);

    let dst_cx = dst_w as f32 / 2.0;
    let dst_cy = dst_h as f32 / 2.0;

    // Inverse mapping: sample the source for each destination pixel.
    let (inv_sin, inv_cos) = (-radians).sin_cos();

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let rx = dx as f32 - dst_cx;
            let ry = dy as f32 - dst_cy;

            let sx = rx * inv_cos - ry * inv_sin + cx;
            let sy = rx * inv_sin + ry * inv_cos + cy;

            if sx >= 0.0 && sx < src_w - 1.0 && sy >= 0.0 && sy < src_h - 1.0 {
                let x0 = sx.floor() as u32;
                let y0 = sy.floor() as u32;
                let fx = sx - x0 as f32;
                let fy = sy - y0 as f32;

                let p00 = layer.get_pixel(x0, y0);
                let p10 = layer.get_pixel(x0 + 1, y0);
                let p01 = layer.get_pixel(x0, y0 + 1);
                let p11 = layer.get_pixel(x0 + 1, y0 + 1);

                let lerp2 = |c: usize| -> u8 {
                    let v = f32::from(p00[c]) * (1.0 - fx) * (1.0 - fy)
                        + f32::from(p10[c]) * fx * (1.0 - fy)
                        + f32::from(p01[c]) * (1.0 - fx) * fy
                        + f32::from(p11[c]) * fx * fy;
                    v.clamp(0.0, 255.0) as u8
                };

                rotated.put_pixel(dx, dy, Rgba([lerp2(0), lerp2(1), lerp2(2), lerp2(3)]));
            }
        }
    }

    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(w, h, px)
    }

    #[test]
    fn scale_identity_is_noop() {
        let layer = solid(10, 20, Rgba([10, 20, 30, 255]));
        let scaled = scale_layer(&layer, 1.0);
        assert_eq!(scaled, layer);
    }

    #[test]
    fn scale_doubles_dimensions() {
        let layer = solid(10, 20, Rgba([10, 20, 30, 255]));
        let scaled = scale_layer(&layer, 2.0);
        assert_eq!((scaled.width(), scaled.height()), (20, 40));
    }

    #[test]
    fn scale_never_collapses_to_zero() {
        let layer = solid(4, 4, Rgba([255, 0, 0, 255]));
        let scaled = scale_layer(&layer, 0.01);
        assert_eq!((scaled.width(), scaled.height()), (1, 1));
    }

    #[test]
    fn rotate_zero_is_noop() {
        let layer = solid(10, 10, Rgba([1, 2, 3, 4]));
        assert_eq!(rotate_layer(&layer, 0.0), layer);
        assert_eq!(rotate_layer(&layer, 360.0), layer);
        assert_eq!(rotate_layer(&layer, -720.0), layer);
    }

    #[test]
    fn rotate_45_expands_canvas() {
        let layer = solid(100, 100, Rgba([255, 0, 0, 255]));
        let rotated = rotate_layer(&layer, 45.0);

        // 100 * sqrt(2) ~ 142
        assert!(rotated.width() > 100);
        assert!(rotated.height() > 100);

        // Center stays opaque red, corners are transparent fill.
        let center = rotated.get_pixel(rotated.width() / 2, rotated.height() / 2);
        assert_eq!(center[0], 255);
        assert_eq!(center[3], 255);
        assert_eq!(rotated.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn rotate_preserves_alpha_holes() {
        let mut layer = RgbaImage::new(50, 50);
        for y in 20..30 {
            for x in 20..30 {
                layer.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        let rotated = rotate_layer(&layer, 90.0);

        let has_green = rotated.pixels().any(|p| p[1] > 200 && p[3] > 200);
        assert!(has_green);
        let has_transparent = rotated.pixels().any(|p| p[3] == 0);
        assert!(has_transparent);
    }
}
