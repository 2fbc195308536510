//! Watermark compositing: scaling, opacity and "over" blending.
//!
//! Blending is integer arithmetic with rounding at the depth of the base
//! image, so an invisible watermark (alpha 0) leaves base pixels untouched
//! and an opaque one (alpha 255) replaces them with the watermark colour
//! exactly. 16-bit bases are blended at 16 bits and keep their precision.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Pixel, Rgba, RgbaImage};
use std::path::Path;

use super::position::{calculate_position, Dimensions, Placement};
use crate::config::Position;
use crate::error::FileProcessError;

/// Scaled watermarks may cover at most this many times the base area.
const MAX_COVERAGE: u64 = 16;

/// Pixel limit never drops below this, so small images still take large scales.
const MIN_PIXEL_LIMIT: u64 = 1 << 22;

/// Pixel limit never exceeds this, whatever the base size.
const MAX_PIXEL_LIMIT: u64 = 1 << 28;

/// Per-file compositing parameters.
#[derive(Debug, Clone, Copy)]
pub struct CompositeOptions {
    /// Watermark width as a fraction of the base width
    pub scale: f32,
    /// Anchor for placement
    pub position: Position,
    /// Opacity multiplier, 0..=255
    pub transparency: u8,
    /// Edge inset for corner anchors
    pub margin: u32,
}

/// Channel depths the compositor can blend into.
pub trait Channel: Copy {
    /// Full-scale value of the channel
    const MAX: u64;

    fn widen(self) -> u64;

    /// Saturating conversion back from the wide value.
    fn narrow(value: u64) -> Self;

    /// An 8-bit value rescaled to this depth.
    fn from_u8(value: u8) -> u64 {
        value as u64 * Self::MAX / 255
    }
}

impl Channel for u8 {
    const MAX: u64 = u8::MAX as u64;

    fn widen(self) -> u64 {
        self as u64
    }

    fn narrow(value: u64) -> Self {
        value.min(<Self as Channel>::MAX) as u8
    }
}

impl Channel for u16 {
    const MAX: u64 = u16::MAX as u64;

    fn widen(self) -> u64 {
        self as u64
    }

    fn narrow(value: u64) -> Self {
        value.min(<Self as Channel>::MAX) as u16
    }
}

/// Target watermark size for a base image of `base_width` pixels.
///
/// Width is `round(base_width * scale)`, at least 1; height keeps the
/// watermark's aspect ratio, also at least 1.
pub fn target_size(base_width: u32, watermark: Dimensions, scale: f32) -> Dimensions {
    let width = ((base_width as f64) * (scale as f64)).round().max(1.0);
    let width = width.min(u32::MAX as f64) as u32;
    let height = if watermark.width == 0 {
        1
    } else {
        ((watermark.height as f64) * (width as f64) / (watermark.width as f64))
            .round()
            .clamp(1.0, u32::MAX as f64) as u32
    };
    Dimensions::new(width, height)
}

/// Largest scaled watermark, in pixels, accepted for a base image.
pub fn pixel_limit(base: Dimensions) -> u64 {
    (base.width as u64 * base.height as u64)
        .saturating_mul(MAX_COVERAGE)
        .clamp(MIN_PIXEL_LIMIT, MAX_PIXEL_LIMIT)
}

/// Resample the watermark to `size` with a Lanczos filter.
pub fn scale_watermark(watermark: &RgbaImage, size: Dimensions) -> RgbaImage {
    if watermark.dimensions() == (size.width, size.height) {
        return watermark.clone();
    }
    imageops::resize(watermark, size.width, size.height, FilterType::Lanczos3)
}

/// Multiply every alpha value by `transparency / 255`, rounding to nearest.
pub fn apply_transparency(watermark: &mut RgbaImage, transparency: u8) {
    if transparency == u8::MAX {
        return;
    }
    let t = transparency as u32;
    for pixel in watermark.pixels_mut() {
        pixel[3] = ((pixel[3] as u32 * t + 127) / 255).min(255) as u8;
    }
}

/// Blend `watermark` onto `base` with its top-left corner at `at`.
///
/// Pixels falling outside the base are clipped.
pub fn blend_onto<T>(base: &mut ImageBuffer<Rgba<T>, Vec<T>>, watermark: &RgbaImage, at: Placement)
where
    T: Channel,
    Rgba<T>: Pixel<Subpixel = T>,
{
    let base_w = base.width() as i64;
    let base_h = base.height() as i64;
    let wm_w = watermark.width() as i64;
    let wm_h = watermark.height() as i64;

    let x_start = at.x.max(0);
    let y_start = at.y.max(0);
    let x_end = (at.x + wm_w).min(base_w);
    let y_end = (at.y + wm_h).min(base_h);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wm_pixel = watermark.get_pixel((tx - at.x) as u32, (ty - at.y) as u32);
            if wm_pixel[3] == 0 {
                continue;
            }
            let base_pixel = base.get_pixel_mut(tx as u32, ty as u32);
            *base_pixel = blend_pixel(*base_pixel, *wm_pixel);
        }
    }
}

/// Porter-Duff "over" for a single pixel, at the base pixel's depth.
///
/// Colour: `wm * a + base * (1 - a)`. Alpha: `a + base_a * (1 - a)`.
fn blend_pixel<T: Channel>(base: Rgba<T>, wm: Rgba<u8>) -> Rgba<T> {
    let max = T::MAX;
    let half = max / 2;
    let a = T::from_u8(wm.0[3]);
    let inv = max - a;
    let mix = |fg: u8, bg: T| T::narrow((T::from_u8(fg) * a + bg.widen() * inv + half) / max);
    let alpha = a + (base.0[3].widen() * inv + half) / max;

    Rgba([
        mix(wm.0[0], base.0[0]),
        mix(wm.0[1], base.0[1]),
        mix(wm.0[2], base.0[2]),
        T::narrow(alpha),
    ])
}

/// Scale, fade, place and blend the watermark onto `base`.
///
/// The shared `watermark` is never modified; a scaled copy is made per call.
/// Returns where the watermark was placed. A scale that would blow the
/// watermark up past [`pixel_limit`] is refused before anything is
/// allocated; `path` only names the file in that error.
pub fn composite<T>(
    base: &mut ImageBuffer<Rgba<T>, Vec<T>>,
    watermark: &RgbaImage,
    options: &CompositeOptions,
    path: &Path,
) -> Result<Placement, FileProcessError>
where
    T: Channel,
    Rgba<T>: Pixel<Subpixel = T>,
{
    let base_dims = Dimensions::new(base.width(), base.height());
    let size = target_size(
        base_dims.width,
        Dimensions::new(watermark.width(), watermark.height()),
        options.scale,
    );
    if size.width as u64 * size.height as u64 > pixel_limit(base_dims) {
        return Err(FileProcessError::WatermarkTooLarge {
            path: path.to_path_buf(),
            width: size.width,
            height: size.height,
        });
    }

    let mut scaled = scale_watermark(watermark, size);
    apply_transparency(&mut scaled, options.transparency);

    let at = calculate_position(options.position, base_dims, size, options.margin);
    tracing::trace!(
        "Watermark {}x{} at ({}, {}) on {}x{}",
        size.width,
        size.height,
        at.x,
        at.y,
        base_dims.width,
        base_dims.height
    );
    blend_onto(base, &scaled, at);
    Ok(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

    fn options(scale: f32, position: Position, transparency: u8) -> CompositeOptions {
        CompositeOptions {
            scale,
            position,
            transparency,
            margin: 10,
        }
    }

    fn apply<T>(
        base: &mut ImageBuffer<Rgba<T>, Vec<T>>,
        wm: &RgbaImage,
        opts: CompositeOptions,
    ) -> Placement
    where
        T: Channel,
        Rgba<T>: Pixel<Subpixel = T>,
    {
        composite(base, wm, &opts, Path::new("test.png")).unwrap()
    }

    #[test]
    fn test_target_size_keeps_aspect_ratio() {
        let size = target_size(1000, Dimensions::new(200, 50), 0.1);
        assert_eq!(size, Dimensions::new(100, 25));
    }

    #[test]
    fn test_target_size_rounds() {
        // 333 * 0.1 = 33.3 -> 33; 33 * 10 / 3 = 110
        let size = target_size(333, Dimensions::new(3, 10), 0.1);
        assert_eq!(size, Dimensions::new(33, 110));
    }

    #[test]
    fn test_target_size_never_zero() {
        let size = target_size(3, Dimensions::new(1000, 1), 0.01);
        assert_eq!(size, Dimensions::new(1, 1));
    }

    #[test]
    fn test_apply_transparency_scales_alpha() {
        let mut wm = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        apply_transparency(&mut wm, 128);
        assert_eq!(wm.get_pixel(0, 0)[3], 128);
        assert_eq!(wm.get_pixel(0, 0)[0], 10);

        let mut wm = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 100]));
        apply_transparency(&mut wm, 0);
        assert_eq!(wm.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_blend_pixel_extremes() {
        let base = Rgba([12u8, 34, 56, 255]);
        assert_eq!(blend_pixel(base, Rgba([200, 100, 0, 0])), base);
        assert_eq!(
            blend_pixel(base, Rgba([200, 100, 0, 255])),
            Rgba([200, 100, 0, 255])
        );
    }

    #[test]
    fn test_blend_pixel_half() {
        let out = blend_pixel(Rgba([0u8, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!(out, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_blend_pixel_16_bit_extremes() {
        let base = Rgba([1000u16, 30000, 65000, 65535]);
        assert_eq!(blend_pixel(base, Rgba([200, 100, 0, 0])), base);
        assert_eq!(
            blend_pixel(base, Rgba([255, 100, 0, 255])),
            Rgba([65535, 25700, 0, 65535])
        );
    }

    #[test]
    fn test_zero_transparency_is_identity_at_16_bits() {
        let base = Rgba16Image::from_fn(40, 30, |x, y| {
            Rgba([1000 + x as u16, 30000 + y as u16, 65000, 65535])
        });
        let wm = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));

        let mut out = base.clone();
        apply(&mut out, &wm, options(0.5, Position::Center, 0));
        assert_eq!(out, base);
    }

    #[test]
    fn test_opaque_watermark_at_16_bits() {
        let mut base = Rgba16Image::from_pixel(40, 30, Rgba([1000, 30000, 65000, 65535]));
        let wm = RgbaImage::from_pixel(10, 5, Rgba([0, 255, 0, 255]));

        // 40 * 0.25 = 10 wide, so no resampling
        let at = apply(&mut base, &wm, options(0.25, Position::TopLeft, 255));
        assert_eq!(at, Placement::new(10, 10));
        assert_eq!(base.get_pixel(10, 10), &Rgba([0, 65535, 0, 65535]));
        assert_eq!(base.get_pixel(19, 14), &Rgba([0, 65535, 0, 65535]));
        assert_eq!(base.get_pixel(9, 10), &Rgba([1000, 30000, 65000, 65535]));
    }

    #[test]
    fn test_blend_clips_outside_base() {
        let mut base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let wm = RgbaImage::from_pixel(5, 5, Rgba([255, 0, 0, 255]));
        blend_onto(&mut base, &wm, Placement::new(8, -2));

        assert_eq!(base.get_pixel(9, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(base.get_pixel(8, 2), &Rgba([255, 0, 0, 255]));
        assert_eq!(base.get_pixel(8, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(base.get_pixel(7, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_zero_transparency_is_identity() {
        let base = RgbaImage::from_fn(64, 48, |x, y| Rgba([x as u8 * 3, y as u8 * 5, 77, 255]));
        let wm = RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255]));

        let mut out = base.clone();
        apply(&mut out, &wm, options(0.5, Position::Center, 0));
        assert_eq!(out, base);
    }

    #[test]
    fn test_opaque_solid_watermark_replaces_region() {
        let mut base = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 255, 255]));
        let wm = RgbaImage::from_pixel(100, 20, Rgba([255, 0, 0, 255]));

        let at = apply(&mut base, &wm, options(0.5, Position::TopLeft, 255));
        // 200 * 0.5 = 100 wide, so the watermark is used at its own size
        assert_eq!(at, Placement::new(10, 10));
        for y in 10..30 {
            for x in 10..110 {
                assert_eq!(base.get_pixel(x, y), &Rgba([255, 0, 0, 255]), "({x},{y})");
            }
        }
        assert_eq!(base.get_pixel(9, 10), &Rgba([0, 0, 255, 255]));
        assert_eq!(base.get_pixel(110, 10), &Rgba([0, 0, 255, 255]));
        assert_eq!(base.get_pixel(10, 30), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_composite_leaves_shared_watermark_untouched() {
        let wm = RgbaImage::from_pixel(30, 30, Rgba([9, 9, 9, 200]));
        let original = wm.clone();
        let mut base = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        apply(&mut base, &wm, options(0.2, Position::BottomRight, 64));
        assert_eq!(wm, original);
    }

    #[test]
    fn test_oversized_watermark_is_clipped_at_origin() {
        let mut base = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        let wm = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let at = apply(&mut base, &wm, options(3.0, Position::BottomRight, 255));
        assert_eq!(at, Placement::new(0, 0));
        assert!(base.get_pixel(0, 0)[0] > 240);
        assert!(base.get_pixel(19, 19)[0] > 240);
    }

    #[test]
    fn test_pixel_limit_bounds() {
        assert_eq!(pixel_limit(Dimensions::new(1, 1)), MIN_PIXEL_LIMIT);
        assert_eq!(pixel_limit(Dimensions::new(2000, 1000)), 2000 * 1000 * MAX_COVERAGE);
        assert_eq!(pixel_limit(Dimensions::new(u32::MAX, u32::MAX)), MAX_PIXEL_LIMIT);
    }

    #[test]
    fn test_huge_scale_is_refused_without_touching_base() {
        let mut base = RgbaImage::from_pixel(100, 100, Rgba([5, 6, 7, 255]));
        let original = base.clone();
        let wm = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));

        let err = composite(
            &mut base,
            &wm,
            &options(100_000.0, Position::Center, 255),
            Path::new("huge.png"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FileProcessError::WatermarkTooLarge {
                width: 10_000_000,
                height: 10_000_000,
                ..
            }
        ));
        assert_eq!(base, original);
    }
}
