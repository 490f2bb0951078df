//! Image normalization for transport.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, Rgb, RgbImage};
use tracing::debug;

use likh_inference::EncodedPayload;

use crate::error::DecodeError;
use crate::models::config::ImageConfig;

/// Decode raw bytes into an image, guessing the format from its contents.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Corrupt("no image data".to_string()));
    }
    let image = image::load_from_memory(bytes)?;
    debug!(
        "Decoded {}x{} image ({:?})",
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// Turns any decoded image into an opaque JPEG payload.
///
/// Transparent and translucent pixels are composited onto `background`.
/// Dimensions are never changed.
pub struct ImageNormalizer {
    quality: u8,
    background: Rgb<u8>,
}

impl ImageNormalizer {
    /// Create a normalizer with default settings (quality 75, white background).
    pub fn new() -> Self {
        Self::from_config(&ImageConfig::default())
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            quality: config.jpeg_quality.clamp(1, 100),
            background: Rgb(config.background),
        }
    }

    /// Set JPEG quality (1 - 100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Set the fill used under transparent pixels.
    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = Rgb(background);
        self
    }

    /// Encode an image for transport.
    pub fn normalize(&self, image: &DynamicImage) -> Result<EncodedPayload, DecodeError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Encode(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let rgb = self.flatten(image);

        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, self.quality);
        encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;

        debug!(
            "Encoded {}x{} image as {} byte JPEG (quality {})",
            width,
            height,
            buf.len(),
            self.quality
        );

        Ok(EncodedPayload::jpeg(buf, width, height))
    }

    /// Decode bytes and encode them for transport.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<EncodedPayload, DecodeError> {
        self.normalize(&decode(bytes)?)
    }

    /// Reduce to opaque 8-bit RGB.
    fn flatten(&self, image: &DynamicImage) -> RgbImage {
        if !image.color().has_alpha() {
            return image.to_rgb8();
        }

        let rgba = image.to_rgba8();
        let [br, bg, bb] = self.background.0;
        let mut rgb = RgbImage::new(rgba.width(), rgba.height());

        for (x, y, pixel) in rgba.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.put_pixel(
                x,
                y,
                Rgb([blend(r, br, a), blend(g, bg, a), blend(b, bb, a)]),
            );
        }

        rgb
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// `fg` over `bg` at coverage `alpha`, rounded.
fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}
