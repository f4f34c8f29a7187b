//! Raster frame content.

use std::path::Path;

use bevy::math::{IRect, IVec2, Rect};
use image::{Rgba, RgbaImage, imageops};

use crate::error::FileResult;

/// A pixel buffer placed on the canvas at `top_left`.
///
/// An image with zero width or height is empty and covers no canvas area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BitmapImage {
    top_left: IVec2,
    pixels: RgbaImage,
}

impl BitmapImage {
    pub fn new(top_left: IVec2, pixels: RgbaImage) -> Self {
        Self { top_left, pixels }
    }

    /// Transparent image covering `bounds`.
    pub fn transparent(bounds: IRect) -> Self {
        let size = bounds.size().max(IVec2::ZERO);
        Self::new(bounds.min, RgbaImage::new(size.x as u32, size.y as u32))
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    pub fn top_left(&self) -> IVec2 {
        self.top_left
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn bounds(&self) -> IRect {
        IRect::from_corners(
            self.top_left,
            self.top_left + IVec2::new(self.width() as i32, self.height() as i32),
        )
    }

    pub fn move_top_left(&mut self, top_left: IVec2) {
        self.top_left = top_left;
    }

    /// Pixel at canvas coordinates, if the image covers that point.
    pub fn pixel(&self, at: IVec2) -> Option<Rgba<u8>> {
        let local = at - self.top_left;
        if local.x < 0 || local.y < 0 {
            return None;
        }
        self.pixels
            .get_pixel_checked(local.x as u32, local.y as u32)
            .copied()
    }

    /// Copy of the part of this image inside `area` (canvas coordinates).
    pub fn copy_rect(&self, area: IRect) -> BitmapImage {
        let clipped = area.intersect(self.bounds());
        if clipped.is_empty() {
            return BitmapImage::default();
        }
        let local = clipped.min - self.top_left;
        let size = clipped.size();
        let pixels = imageops::crop_imm(
            &self.pixels,
            local.x as u32,
            local.y as u32,
            size.x as u32,
            size.y as u32,
        )
        .to_image();
        BitmapImage::new(clipped.min, pixels)
    }

    /// Resample this image so it exactly fills `area`.
    pub fn transform_into(&self, area: Rect) -> BitmapImage {
        let min = area.min.round().as_ivec2();
        let size = area.size().round().as_ivec2().max(IVec2::ONE);
        if self.is_empty() {
            return BitmapImage::default();
        }
        let pixels = imageops::resize(
            &self.pixels,
            size.x as u32,
            size.y as u32,
            imageops::FilterType::Triangle,
        );
        BitmapImage::new(min, pixels)
    }

    /// Composite `source` over this image, growing the bounds to cover both.
    pub fn paste(&mut self, source: &BitmapImage) {
        if source.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = source.clone();
            return;
        }

        let bounds = self.bounds().union(source.bounds());
        let mut merged = BitmapImage::transparent(bounds);
        imageops::replace(
            &mut merged.pixels,
            &self.pixels,
            i64::from(self.top_left.x - bounds.min.x),
            i64::from(self.top_left.y - bounds.min.y),
        );

        let offset = source.top_left - bounds.min;
        for (x, y, src) in source.pixels.enumerate_pixels() {
            let dst = merged
                .pixels
                .get_pixel_mut(x + offset.x as u32, y + offset.y as u32);
            *dst = blend_over(*dst, *src);
        }
        *self = merged;
    }

    pub fn load_png(path: &Path, top_left: IVec2) -> FileResult<Self> {
        let pixels = image::open(path)?.to_rgba8();
        Ok(Self::new(top_left, pixels))
    }

    pub fn save_png(&self, path: &Path) -> FileResult<()> {
        self.pixels.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Straight-alpha source-over.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let s = u32::from(src[i]) * sa * 255;
        let d = u32::from(dst[i]) * da * (255 - sa);
        ((s + d) / (out_a * 255)) as u8
    };
    Rgba([channel(0), channel(1), channel(2), out_a as u8])
}
