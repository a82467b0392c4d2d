use inspekt_core::raster::{RasterError, RasterFormat, RasterImage};

/// A committed sketch: the surface contents flattened to a PNG.
///
/// Snapshots are immutable. The strokes that produced one are gone once it
/// exists, so it can only be shown, exported or removed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchSnapshot {
    image: RasterImage,
}

impl SketchSnapshot {
    pub(crate) fn new(image: RasterImage) -> Self {
        Self { image }
    }

    /// Restores a snapshot from a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    ///
    /// Fails when the URL is malformed or does not hold a PNG.
    pub fn from_data_url(url: &str) -> Result<Self, RasterError> {
        Self::from_png(RasterImage::from_data_url(url)?)
    }

    /// Wraps an already encoded PNG image.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::UnsupportedFormat`] for non-PNG images and a
    /// decoding error when the PNG body is truncated or corrupt.
    pub fn from_png(image: RasterImage) -> Result<Self, RasterError> {
        if image.format() != RasterFormat::Png {
            return Err(RasterError::UnsupportedFormat(format!(
                "sketch snapshots must be PNG, got {}",
                image.format()
            )));
        }
        image.decode()?;
        Ok(Self { image })
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn into_image(self) -> RasterImage {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn to_data_url(&self) -> String {
        self.image.to_data_url()
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    fn png_bytes() -> Vec<u8> {
        RasterImage::encode_png(&RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255])))
            .unwrap()
            .bytes()
            .to_vec()
    }

    #[test]
    fn test_from_png_accepts_png() {
        let image = RasterImage::from_encoded(png_bytes()).unwrap();
        let snapshot = SketchSnapshot::from_png(image.clone()).unwrap();
        assert_eq!((snapshot.width(), snapshot.height()), (64, 64));
        assert_eq!(SketchSnapshot::from_data_url(&image.to_data_url()).unwrap(), snapshot);
    }

    #[test]
    fn test_from_png_rejects_jpeg() {
        let jpeg = RasterImage::encode_jpeg(&RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])), 90).unwrap();
        assert!(matches!(
            SketchSnapshot::from_png(jpeg),
            Err(RasterError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_png_rejects_truncated_body() {
        let mut bytes = png_bytes();
        bytes.truncate(60);
        let truncated = RasterImage::from_encoded(bytes).unwrap();
        assert!(SketchSnapshot::from_png(truncated).is_err());
    }
}
