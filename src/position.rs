//! Placement math for positioning a watermark layer on a base raster.
//!
//! Named anchors snap the layer to a 9-grid cell inset by the spec's
//! margin. `Absolute` pins the layer's top-left corner to exact pixel
//! coordinates; `Relative` centers the layer at a fractional point of
//! the base, which is how interactive drag placement maps back onto a
//! full-resolution image.

/// Where to place a watermark on the base image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Top-left corner, inset by the margin.
    TopLeft,
    /// Top edge, horizontally centered.
    TopCenter,
    /// Top-right corner, inset by the margin.
    TopRight,
    /// Left edge, vertically centered.
    CenterLeft,
    /// Dead center of the image.
    Center,
    /// Right edge, vertically centered.
    CenterRight,
    /// Bottom-left corner, inset by the margin.
    BottomLeft,
    /// Bottom edge, horizontally centered.
    BottomCenter,
    /// Bottom-right corner, inset by the margin.
    BottomRight,
    /// Exact top-left pixel coordinates of the layer. Ignores margin.
    Absolute {
        /// X coordinate of the layer's top-left corner.
        x: i64,
        /// Y coordinate of the layer's top-left corner.
        y: i64,
    },
    /// Layer center at a fraction of the base dimensions. Ignores margin.
    ///
    /// `(0.5, 0.5)` centers the layer; `(1.0, 1.0)` centers it on the
    /// bottom-right corner (half the layer hangs off and is clipped).
    Relative {
        /// Horizontal fraction in [0, 1] of the base width.
        fx: f32,
        /// Vertical fraction in [0, 1] of the base height.
        fy: f32,
    },
}

/// A computed top-left placement for a watermark layer.
///
/// Coordinates may be negative or exceed the base bounds; the
/// compositor clips the layer to the visible region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// X coordinate of the layer's top-left corner on the base.
    pub x: i64,
    /// Y coordinate of the layer's top-left corner on the base.
    pub y: i64,
}

impl Placement {
    /// Create a placement from raw coordinates.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Compute the top-left placement of a `layer_w` x `layer_h` layer on a
/// `base_w` x `base_h` base for the given anchor and margin.
#[must_use]
pub fn resolve(
    anchor: Anchor,
    base_w: u32,
    base_h: u32,
    layer_w: u32,
    layer_h: u32,
    margin: u32,
) -> Placement {
    let bw = i64::from(base_w);
    let bh = i64::from(base_h);
    let lw = i64::from(layer_w);
    let lh = i64::from(layer_h);
    let m = i64::from(margin);

    match anchor {
        Anchor::TopLeft => Placement::new(m, m),
        Anchor::TopCenter => Placement::new((bw - lw) / 2, m),
        Anchor::TopRight => Placement::new(bw - lw - m, m),
        Anchor::CenterLeft => Placement::new(m, (bh - lh) / 2),
        Anchor::Center => Placement::new((bw - lw) / 2, (bh - lh) / 2),
        Anchor::CenterRight => Placement::new(bw - lw - m, (bh - lh) / 2),
        Anchor::BottomLeft => Placement::new(m, bh - lh - m),
        Anchor::BottomCenter => Placement::new((bw - lw) / 2, bh - lh - m),
        Anchor::BottomRight => Placement::new(bw - lw - m, bh - lh - m),
        Anchor::Absolute { x, y } => Placement::new(x, y),
        Anchor::Relative { fx, fy } => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let cx = (f64::from(fx) * bw as f64) as i64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let cy = (f64::from(fy) * bh as f64) as i64;
            Placement::new(cx - lw / 2, cy - lh / 2)
        }
    }
}

/// Check whether any part of the layer at `pos` overlaps the base.
#[must_use]
pub fn is_visible(pos: Placement, base_w: u32, base_h: u32, layer_w: u32, layer_h: u32) -> bool {
    pos.x < i64::from(base_w)
        && pos.y < i64::from(base_h)
        && pos.x + i64::from(layer_w) > 0
        && pos.y + i64::from(layer_h) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_anchors_with_margin() {
        // 800x600 base, 100x50 layer, 10px margin
        let cases = [
            (Anchor::TopLeft, Placement::new(10, 10)),
            (Anchor::TopCenter, Placement::new(350, 10)),
            (Anchor::TopRight, Placement::new(690, 10)),
            (Anchor::CenterLeft, Placement::new(10, 275)),
            (Anchor::Center, Placement::new(350, 275)),
            (Anchor::CenterRight, Placement::new(690, 275)),
            (Anchor::BottomLeft, Placement::new(10, 540)),
            (Anchor::BottomCenter, Placement::new(350, 540)),
            (Anchor::BottomRight, Placement::new(690, 540)),
        ];
        for (anchor, expected) in cases {
            assert_eq!(resolve(anchor, 800, 600, 100, 50, 10), expected, "{anchor:?}");
        }
    }

    #[test]
    fn zero_margin_touches_edges() {
        let pos = resolve(Anchor::TopLeft, 800, 600, 100, 50, 0);
        assert_eq!(pos, Placement::new(0, 0));

        let pos = resolve(Anchor::BottomRight, 800, 600, 100, 50, 0);
        assert_eq!(pos, Placement::new(700, 550));
    }

    #[test]
    fn absolute_ignores_margin() {
        let pos = resolve(Anchor::Absolute { x: 42, y: -7 }, 800, 600, 100, 50, 99);
        assert_eq!(pos, Placement::new(42, -7));
    }

    #[test]
    fn relative_centers_layer_at_fraction() {
        let pos = resolve(
            Anchor::Relative { fx: 0.5, fy: 0.5 },
            200,
            200,
            50,
            50,
            16,
        );
        assert_eq!(pos, Placement::new(75, 75));

        // Bottom-right corner: half the layer hangs off the base.
        let pos = resolve(
            Anchor::Relative { fx: 1.0, fy: 1.0 },
            200,
            200,
            50,
            50,
            16,
        );
        assert_eq!(pos, Placement::new(175, 175));
    }

    #[test]
    fn layer_larger_than_base_centers_negative() {
        let pos = resolve(Anchor::Center, 100, 100, 200, 200, 0);
        assert_eq!(pos, Placement::new(-50, -50));
    }

    #[test]
    fn visibility_checks() {
        assert!(is_visible(Placement::new(10, 10), 100, 100, 20, 20));
        // Partially off the left edge still counts.
        assert!(is_visible(Placement::new(-10, 10), 100, 100, 20, 20));
        // Fully off-screen does not.
        assert!(!is_visible(Placement::new(-30, 10), 100, 100, 20, 20));
        assert!(!is_visible(Placement::new(100, 10), 100, 100, 20, 20));
        assert!(!is_visible(Placement::new(10, 150), 100, 100, 20, 20));
    }
}
