use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, Luma};

use crate::{Error, Result};

/// Cells darker than this are drawable when converting mask images.
pub const DEFAULT_MASK_THRESHOLD: u8 = 128;

/// Immutable grid of drawable cells.
///
/// Mask images follow the silhouette convention: dark pixels are drawable and
/// white pixels (or fully transparent ones) are background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasMask {
    width: u32,
    height: u32,
    allowed: Vec<bool>,
    allowed_count: usize,
}

impl CanvasMask {
    pub fn from_rectangle(width: u32, height: u32) -> Result<Self> {
        let len = width as usize * height as usize;
        Self::from_cells(width, height, vec![true; len])
    }

    /// A cell is allowed iff its brightness is below `threshold`.
    pub fn from_brightness(
        width: u32,
        height: u32,
        brightness: &[u8],
        threshold: u8,
    ) -> Result<Self> {
        let expected = width as usize * height as usize;
        if brightness.len() != expected {
            return Err(Error::MaskDimensions {
                expected,
                actual: brightness.len(),
            });
        }

        let allowed = brightness.iter().map(|&value| value < threshold).collect();
        Self::from_cells(width, height, allowed)
    }

    /// Resizes `image` to the working canvas before thresholding.
    pub fn from_gray(image: &GrayImage, width: u32, height: u32, threshold: u8) -> Result<Self> {
        if image.dimensions() == (width, height) {
            return Self::from_brightness(width, height, image.as_raw(), threshold);
        }

        let resized = imageops::resize(image, width, height, FilterType::Nearest);
        Self::from_brightness(width, height, resized.as_raw(), threshold)
    }

    pub fn from_image(
        image: &DynamicImage,
        width: u32,
        height: u32,
        threshold: u8,
    ) -> Result<Self> {
        Self::from_gray(&flatten_on_white(image), width, height, threshold)
    }

    fn from_cells(width: u32, height: u32, allowed: Vec<bool>) -> Result<Self> {
        let allowed_count = allowed.iter().filter(|&&cell| cell).count();
        if allowed_count == 0 {
            return Err(Error::InvalidMask { width, height });
        }

        Ok(CanvasMask {
            width,
            height,
            allowed,
            allowed_count,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_allowed(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.allowed[self.index(x, y)]
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed_count
    }

    pub fn is_full(&self) -> bool {
        self.allowed_count == self.allowed.len()
    }

    /// Where the placement spiral starts: the canvas centre for a plain
    /// rectangle, otherwise the centroid of the allowed cells.
    pub fn seed_point(&self) -> (u32, u32) {
        if self.is_full() {
            return (self.width / 2, self.height / 2);
        }

        let (mut sum_x, mut sum_y) = (0u64, 0u64);
        for (i, _) in self.allowed.iter().enumerate().filter(|(_, &cell)| cell) {
            sum_x += (i % self.width as usize) as u64;
            sum_y += (i / self.width as usize) as u64;
        }

        let count = self.allowed_count as u64;
        ((sum_x / count) as u32, (sum_y / count) as u32)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Luma of the image after compositing it over a white background.
fn flatten_on_white(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let luma = 0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32;
        let value = luma * alpha + 255.0 * (1.0 - alpha);
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}
