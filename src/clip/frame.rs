use image::{imageops::FilterType, DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// A single rendered frame
///
/// Wraps an image buffer that is always one of three layouts: single-channel
/// masks (`Luma8`), colour frames (`Rgb8`) and colour frames with alpha
/// (`Rgba8`). Every transform keeps the layout of its input.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: DynamicImage,
}

impl Frame {
    /// Create a frame from any decoded image, normalising the pixel layout
    pub fn new(image: DynamicImage) -> Self {
        let buffer = match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Self { buffer }
    }

    /// Create a colour frame from an RGB image buffer
    pub fn from_rgb(buffer: RgbImage) -> Self {
        Self { buffer: DynamicImage::ImageRgb8(buffer) }
    }

    /// Create a colour frame with alpha from an RGBA image buffer
    pub fn from_rgba(buffer: RgbaImage) -> Self {
        Self { buffer: DynamicImage::ImageRgba8(buffer) }
    }

    /// Create a single-channel mask frame
    pub fn from_mask(buffer: GrayImage) -> Self {
        Self { buffer: DynamicImage::ImageLuma8(buffer) }
    }

    /// Create a new frame with the given dimensions filled with black
    pub fn new_black(width: u32, height: u32) -> Self {
        Self::from_rgb(ImageBuffer::new(width, height))
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::from_rgb(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    /// Create a mask frame filled with a single opacity value
    pub fn new_mask(width: u32, height: u32, value: u8) -> Self {
        Self::from_mask(ImageBuffer::from_pixel(width, height, Luma([value])))
    }

    /// Create a frame from raw interleaved bytes with 1, 3 or 4 channels
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Option<Self> {
        let buffer = match channels {
            1 => DynamicImage::ImageLuma8(ImageBuffer::from_raw(width, height, data)?),
            3 => DynamicImage::ImageRgb8(ImageBuffer::from_raw(width, height, data)?),
            4 => DynamicImage::ImageRgba8(ImageBuffer::from_raw(width, height, data)?),
            _ => return None,
        };
        Some(Self { buffer })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Number of interleaved channels (1, 3 or 4)
    pub fn channels(&self) -> usize {
        self.buffer.color().channel_count() as usize
    }

    pub fn is_mask(&self) -> bool {
        self.channels() == 1
    }

    /// Channel values of the pixel at the given coordinates
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels();
        let idx = (y as usize * self.width() as usize + x as usize) * c;
        &self.buffer.as_bytes()[idx..idx + c]
    }

    /// Raw interleaved pixel bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &DynamicImage {
        &self.buffer
    }

    pub fn into_image(self) -> DynamicImage {
        self.buffer
    }

    /// Copy out the rectangle starting at `(x, y)`
    ///
    /// The rectangle is clipped to the frame bounds.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Frame {
        Self { buffer: self.buffer.crop_imm(x, y, width, height) }
    }

    /// Resize to exact dimensions with a Lanczos3 filter
    pub fn resize(&self, width: u32, height: u32) -> Frame {
        if self.size() == (width, height) {
            return self.clone();
        }
        Self { buffer: self.buffer.resize_exact(width, height, FilterType::Lanczos3) }
    }

    /// Split an RGBA frame into its colour part and its alpha mask
    pub fn split_alpha(&self) -> Option<(Frame, Frame)> {
        let DynamicImage::ImageRgba8(rgba) = &self.buffer else {
            return None;
        };
        let color = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, _]) = *rgba.get_pixel(x, y);
            Rgb([r, g, b])
        });
        let alpha = GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| Luma([rgba.get_pixel(x, y)[3]]));
        Some((Self::from_rgb(color), Self::from_mask(alpha)))
    }

    /// Flatten to an RGB buffer for encoding
    pub fn to_rgb8(&self) -> RgbImage {
        self.buffer.to_rgb8()
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }
}
