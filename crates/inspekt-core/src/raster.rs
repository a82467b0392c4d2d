//! Encoded raster images.
//!
//! A [`RasterImage`] keeps the encoded bytes of a PNG or JPEG image together
//! with its pixel dimensions. Sketch snapshots and normalised photos are both
//! represented this way, so the document assembler only ever deals with one
//! raster representation.
//!
//! Images can be moved in and out of `data:` URLs, the form in which browsers
//! hand canvas snapshots around:
//!
//! ```
//! # use inspekt_core::raster::RasterImage;
//! # fn main() -> Result<(), inspekt_core::raster::RasterError> {
//! let pixels = image::RgbaImage::from_pixel(4, 3, image::Rgba([255, 0, 0, 255]));
//! let png = RasterImage::encode_png(&pixels)?;
//!
//! let url = png.to_data_url();
//! assert!(url.starts_with("data:image/png;base64,"));
//!
//! let back = RasterImage::from_data_url(&url)?;
//! assert_eq!(back, png);
//! # Ok(())
//! # }
//! ```

use std::{fmt, io::Cursor};

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{
    DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, RgbaImage, codecs::jpeg::JpegEncoder,
};
use thiserror::Error;

/// Errors raised while decoding or encoding raster data.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed data URL: {0}")]
    DataUrl(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// Encodings a [`RasterImage`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    /// MIME type used in `data:` URLs.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// An encoded raster image with known dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    format: RasterFormat,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl RasterImage {
    /// Wraps already-encoded PNG or JPEG bytes.
    ///
    /// The format is sniffed from the content and the header is read to
    /// learn the dimensions; the bytes themselves are kept untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::UnsupportedFormat`] for anything but PNG/JPEG
    /// and an image error when the header cannot be read.
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, RasterError> {
        let format = image::guess_format(&bytes)?;
        let format = RasterFormat::from_image_format(format)
            .ok_or_else(|| RasterError::UnsupportedFormat(format!("{format:?}")))?;
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format.image_format())
            .into_dimensions()?;
        Ok(Self {
            format,
            width,
            height,
            bytes,
        })
    }

    /// Parses a base64 `data:` URL such as `data:image/png;base64,iVBOR...`.
    ///
    /// # Errors
    ///
    /// Fails when the URL is not a base64 data URL, announces a MIME type
    /// other than PNG/JPEG, or its payload is not a readable image.
    pub fn from_data_url(url: &str) -> Result<Self, RasterError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| RasterError::DataUrl("missing `data:` prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| RasterError::DataUrl("missing `,` separator".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| RasterError::DataUrl("only base64 payloads are supported".to_string()))?;
        let announced = RasterFormat::from_mime_type(mime)
            .ok_or_else(|| RasterError::UnsupportedFormat(mime.to_string()))?;

        let image = Self::from_encoded(STANDARD.decode(payload.trim())?)?;
        if image.format != announced {
            return Err(RasterError::DataUrl(format!(
                "declared {announced} but payload is {}",
                image.format
            )));
        }
        Ok(image)
    }

    /// Encodes RGBA pixels as PNG.
    pub fn encode_png(pixels: &RgbaImage) -> Result<Self, RasterError> {
        let mut bytes = Vec::new();
        pixels.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(Self {
            format: RasterFormat::Png,
            width: pixels.width(),
            height: pixels.height(),
            bytes,
        })
    }

    /// Encodes RGB pixels as JPEG with the given quality (1-100).
    pub fn encode_jpeg(pixels: &RgbImage, quality: u8) -> Result<Self, RasterError> {
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        pixels.write_with_encoder(encoder)?;
        Ok(Self {
            format: RasterFormat::Jpeg,
            width: pixels.width(),
            height: pixels.height(),
            bytes,
        })
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 `data:` URL of the encoded bytes.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }

    /// Decodes the image.
    pub fn decode(&self) -> Result<DynamicImage, RasterError> {
        Ok(image::load_from_memory_with_format(
            &self.bytes,
            self.format.image_format(),
        )?)
    }

    /// Decodes the image and composites it onto an opaque white background.
    pub fn to_rgb8_on_white(&self) -> Result<RgbImage, RasterError> {
        Ok(flatten_on_white(&self.decode()?))
    }
}

/// Composites an image with transparency onto white, producing opaque RGB.
pub fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let blend = |channel: u8| (channel as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}
