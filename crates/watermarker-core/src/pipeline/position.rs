//! Placement of the watermark on the base image.
//!
//! Anchors map to a top-left origin. A watermark larger than the image in
//! either dimension always starts at the image origin; one that fits is
//! clamped so it stays fully inside.
//!
//! ```text
//! top-left      (m, m)
//! top-right     (bw - ww - m, m)
//! bottom-left   (m, bh - wh - m)
//! bottom-right  (bw - ww - m, bh - wh - m)
//! center        ((bw - ww) / 2, (bh - wh) / 2)
//! ```

use crate::config::Position;

/// Width and height of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the watermark within the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
}

impl Placement {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Unclamped origin for an anchor. May be negative for oversized watermarks.
pub fn anchor_origin(
    position: Position,
    image: Dimensions,
    watermark: Dimensions,
    margin: u32,
) -> Placement {
    let img_w = image.width as i64;
    let img_h = image.height as i64;
    let wm_w = watermark.width as i64;
    let wm_h = watermark.height as i64;
    let m = margin as i64;

    match position {
        Position::TopLeft => Placement::new(m, m),
        Position::TopRight => Placement::new(img_w - wm_w - m, m),
        Position::BottomLeft => Placement::new(m, img_h - wm_h - m),
        Position::BottomRight => Placement::new(img_w - wm_w - m, img_h - wm_h - m),
        Position::Center => Placement::new((img_w - wm_w) / 2, (img_h - wm_h) / 2),
    }
}

/// Clamp a position so as much of the watermark as possible stays visible.
pub fn clamp_to_bounds(pos: Placement, image: Dimensions, watermark: Dimensions) -> Placement {
    let max_x = (image.width as i64 - watermark.width as i64).max(0);
    let max_y = (image.height as i64 - watermark.height as i64).max(0);

    Placement::new(pos.x.clamp(0, max_x), pos.y.clamp(0, max_y))
}

/// Final placement used by the compositor.
pub fn calculate_position(
    position: Position,
    image: Dimensions,
    watermark: Dimensions,
    margin: u32,
) -> Placement {
    if watermark.width > image.width || watermark.height > image.height {
        return Placement::new(0, 0);
    }
    clamp_to_bounds(
        anchor_origin(position, image, watermark, margin),
        image,
        watermark,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Dimensions = Dimensions {
        width: 1000,
        height: 800,
    };
    const WM: Dimensions = Dimensions {
        width: 100,
        height: 80,
    };

    #[test]
    fn test_reference_placements() {
        let expected = [
            (Position::TopLeft, (10, 10)),
            (Position::TopRight, (890, 10)),
            (Position::BottomLeft, (10, 710)),
            (Position::BottomRight, (890, 710)),
            (Position::Center, (450, 360)),
        ];
        for (position, (x, y)) in expected {
            assert_eq!(
                calculate_position(position, BASE, WM, 10),
                Placement::new(x, y),
                "{position}"
            );
        }
    }

    #[test]
    fn test_fitting_watermark_stays_inside() {
        let sizes = [(1, 1), (50, 20), (990, 790), (1000, 800), (985, 10)];
        for (w, h) in sizes {
            let wm = Dimensions::new(w, h);
            for position in Position::ALL {
                let p = calculate_position(position, BASE, wm, 10);
                assert!(p.x >= 0 && p.y >= 0, "{position} {w}x{h}");
                assert!(p.x + w as i64 <= BASE.width as i64, "{position} {w}x{h}");
                assert!(p.y + h as i64 <= BASE.height as i64, "{position} {w}x{h}");
            }
        }
    }

    #[test]
    fn test_oversized_watermark_clamps_to_origin() {
        let wm = Dimensions::new(1200, 900);
        for position in Position::ALL {
            assert_eq!(
                calculate_position(position, BASE, wm, 10),
                Placement::new(0, 0)
            );
        }
    }

    #[test]
    fn test_oversized_in_one_dimension() {
        // Too wide or too tall on its own is enough to pin the origin
        for wm in [Dimensions::new(1500, 80), Dimensions::new(100, 801)] {
            for position in Position::ALL {
                assert_eq!(
                    calculate_position(position, BASE, wm, 10),
                    Placement::new(0, 0),
                    "{position} {}x{}",
                    wm.width,
                    wm.height
                );
            }
        }
    }

    #[test]
    fn test_clamp_keeps_fitting_watermark_inside() {
        // Margin pushes a near-full-width watermark past the edge; clamping pulls it back
        let p = clamp_to_bounds(Placement::new(-5, 795), BASE, WM);
        assert_eq!(p, Placement::new(0, 720));
    }

    #[test]
    fn test_anchor_origin_can_be_negative() {
        let wm = Dimensions::new(1200, 900);
        let p = anchor_origin(Position::BottomRight, BASE, wm, 10);
        assert_eq!(p, Placement::new(-210, -110));
    }
}
