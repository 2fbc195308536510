//! Text watermark rendering.
//!
//! Text is drawn white on a transparent canvas, glyph coverage becoming
//! alpha, then cropped to the inked area. It is rendered large and left to
//! the compositor to resample down to the target width.
//!
//! Font resolution order:
//! 1. the font file given on the command line (failure is fatal),
//! 2. the first loadable font from [`HOST_FONT_CANDIDATES`],
//! 3. the built-in bitmap font.

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::imageops;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

use super::bitmap_font;
use crate::error::WatermarkLoadError;

/// Pixel height used for outline fonts.
pub const FONT_SIZE: f32 = 48.0;

/// Upscale factor applied to the 5x8 bitmap font.
pub const BITMAP_PIXEL_SIZE: u32 = 4;

/// Watermark text colour.
pub const TEXT_COLOR: [u8; 3] = [255, 255, 255];

/// Well-known font locations on Linux, macOS and Windows.
pub const HOST_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load an outline font from a TrueType/OpenType file.
pub fn load_font(path: &Path) -> Result<FontVec, WatermarkLoadError> {
    let font_err = |message: String| WatermarkLoadError::Font {
        path: path.to_path_buf(),
        message,
    };
    let bytes = std::fs::read(path).map_err(|e| font_err(e.to_string()))?;
    FontVec::try_from_vec(bytes).map_err(|e| font_err(e.to_string()))
}

/// First host font that exists and parses.
pub fn find_host_font() -> Option<(PathBuf, FontVec)> {
    HOST_FONT_CANDIDATES.iter().map(PathBuf::from).find_map(|path| {
        if !path.is_file() {
            return None;
        }
        match load_font(&path) {
            Ok(font) => Some((path, font)),
            Err(e) => {
                tracing::debug!("Skipping host font: {e}");
                None
            }
        }
    })
}

/// Render `text` into a cropped RGBA raster.
///
/// `font` is the explicitly requested font file, if any.
pub fn render_text(text: &str, font: Option<&Path>) -> Result<RgbaImage, WatermarkLoadError> {
    if text.trim().is_empty() {
        return Err(WatermarkLoadError::EmptyText(text.to_string()));
    }

    let canvas = match font {
        Some(path) => {
            let font = load_font(path)?;
            tracing::debug!("Rendering watermark text with {:?}", path);
            render_outline(text, &font, FONT_SIZE)
        }
        None => match find_host_font() {
            Some((path, font)) => {
                tracing::debug!("Rendering watermark text with host font {:?}", path);
                render_outline(text, &font, FONT_SIZE)
            }
            None => {
                tracing::debug!("No host font found, using built-in bitmap font");
                bitmap_font::render(text, TEXT_COLOR, BITMAP_PIXEL_SIZE)
            }
        },
    };

    crop_to_ink(&canvas).ok_or_else(|| WatermarkLoadError::EmptyText(text.to_string()))
}

/// Rasterize a single line with an outline font.
pub fn render_outline<F: Font>(text: &str, font: &F, size: f32) -> RgbaImage {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);

    // Leave room for glyphs overhanging their advance box
    let pad = (size / 4.0).ceil();
    let mut advance = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            advance += scaled.kern(p, id);
        }
        advance += scaled.h_advance(id);
        prev = Some(id);
    }

    let width = (advance + pad * 2.0).ceil().max(1.0) as u32;
    let height = (scaled.height() + pad * 2.0).ceil().max(1.0) as u32;
    let mut canvas = RgbaImage::new(width, height);
    let [r, g, b] = TEXT_COLOR;

    let baseline = pad + scaled.ascent();
    let mut cursor = pad;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            cursor += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(scale, point(cursor, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i64 + bounds.min.x as i64;
                let y = py as i64 + bounds.min.y as i64;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                // Overlapping glyphs keep the stronger coverage
                if alpha > pixel[3] {
                    *pixel = Rgba([r, g, b, alpha]);
                }
            });
        }
        cursor += scaled.h_advance(id);
        prev = Some(id);
    }

    canvas
}

/// Crop to the bounding box of pixels with non-zero alpha.
///
/// Returns `None` if nothing is inked.
pub fn crop_to_ink(image: &RgbaImage) -> Option<RgbaImage> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut inked = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        inked = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if !inked {
        return None;
    }
    let cropped = imageops::crop_imm(image, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
    Some(cropped.to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_to_ink() {
        let mut img = RgbaImage::new(10, 10);
        img.put_pixel(2, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(5, 7, Rgba([255, 255, 255, 10]));

        let cropped = crop_to_ink(&img).unwrap();
        assert_eq!(cropped.dimensions(), (4, 5));
        assert_eq!(cropped.get_pixel(0, 0)[3], 255);
        assert_eq!(cropped.get_pixel(3, 4)[3], 10);
    }

    #[test]
    fn test_crop_blank_canvas() {
        assert!(crop_to_ink(&RgbaImage::new(4, 4)).is_none());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        for text in ["", "   ", "\t"] {
            assert!(matches!(
                render_text(text, None),
                Err(WatermarkLoadError::EmptyText(_))
            ));
        }
    }

    #[test]
    fn test_unparseable_font_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("broken.ttf");
        std::fs::write(&font, b"definitely not a font").unwrap();

        let result = render_text("Hello", Some(&font));
        assert!(matches!(result, Err(WatermarkLoadError::Font { .. })));
    }

    #[test]
    fn test_render_without_explicit_font() {
        // Uses a host font when present, the bitmap font otherwise
        let img = render_text("Sample", None).unwrap();
        assert!(img.width() > img.height());
        assert!(img.pixels().any(|p| p[3] > 128));
        assert!(img
            .pixels()
            .filter(|p| p[3] > 0)
            .all(|p| p[0] == 255 && p[1] == 255 && p[2] == 255));
    }

    #[test]
    fn test_bitmap_text_is_cropped_tight() {
        let canvas = bitmap_font::render("I", TEXT_COLOR, BITMAP_PIXEL_SIZE);
        let img = crop_to_ink(&canvas).unwrap();
        // 'I' spans three columns and seven rows of the glyph cell
        assert_eq!(img.dimensions(), (3 * BITMAP_PIXEL_SIZE, 7 * BITMAP_PIXEL_SIZE));
    }
}
