//! Photos attached to a report.
//!
//! Photos arrive either as raw uploaded files or as already encoded raster
//! data. Before they are placed into a document every photo is normalised
//! into a single [`RasterImage`]: files are decoded, composited onto an
//! opaque white background and re-encoded as JPEG, while encoded data is
//! used as is.
//!
//! The [`PhotoLibrary`] owns the uploaded photos, gives each one a stable
//! identifier and keeps small cached previews for display.

use std::{fs, path::Path};

use image::imageops::FilterType;
use log::{debug, info, warn};
use serde::Deserialize;
use uuid::Uuid;

use inspekt_core::raster::{RasterError, RasterImage, flatten_on_white};

use crate::error::InspektError;

/// Side length of the square previews, in pixels.
pub const PREVIEW_SIZE: u32 = 100;

/// File extensions accepted by the upload surface.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "jpe", "jfif", "gif", "bmp", "webp", "tif", "tiff", "avif", "heic",
    "heif",
];

/// What to do when a photo cannot be decoded during export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoErrorPolicy {
    /// Leave the photo out, report it and finish the export.
    #[default]
    Skip,
    /// Abort the export on the first unreadable photo.
    Abort,
}

/// A photo as handed to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    /// A raw uploaded file.
    File { name: String, bytes: Vec<u8> },
    /// Already encoded PNG or JPEG data.
    Encoded(RasterImage),
    /// A `data:` URL holding encoded image data.
    DataUrl(String),
}

impl PhotoSource {
    /// Creates a file source.
    pub fn file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file source from disk, named after the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InspektError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::file(name, bytes))
    }

    /// Display name used in logs and error reports.
    pub fn name(&self) -> String {
        match self {
            Self::File { name, .. } => name.clone(),
            Self::Encoded(image) => format!("encoded {} image", image.format()),
            Self::DataUrl(_) => "data URL".to_string(),
        }
    }

    /// Returns `true` when the source can be accepted by the upload surface.
    pub fn is_image(&self) -> bool {
        match self {
            Self::File { name, .. } => has_image_extension(name),
            Self::Encoded(_) => true,
            Self::DataUrl(url) => url.trim_start().starts_with("data:image/"),
        }
    }

    /// Normalises the photo into a single embeddable raster.
    ///
    /// Already encoded images keep their bytes but are decoded once, so a
    /// truncated or corrupt body is caught here rather than by an exporter.
    ///
    /// # Errors
    ///
    /// Returns a [`RasterError`] when the data cannot be decoded.
    pub fn normalize(&self, jpeg_quality: u8) -> Result<RasterImage, RasterError> {
        let image = match self {
            Self::File { bytes, .. } => {
                let decoded = image::load_from_memory(bytes)?;
                return RasterImage::encode_jpeg(&flatten_on_white(&decoded), jpeg_quality);
            }
            Self::Encoded(image) => image.clone(),
            Self::DataUrl(url) => RasterImage::from_data_url(url)?,
        };
        image.decode()?;
        Ok(image)
    }

    fn preview(&self) -> Result<RasterImage, RasterError> {
        let decoded = match self {
            Self::File { bytes, .. } => image::load_from_memory(bytes)?,
            Self::Encoded(image) => image.decode()?,
            Self::DataUrl(url) => RasterImage::from_data_url(url)?.decode()?,
        };
        let thumbnail = decoded.resize_to_fill(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Triangle);
        RasterImage::encode_jpeg(&flatten_on_white(&thumbnail), 80)
    }
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// A photo that was left out of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPhoto {
    name: String,
    reason: String,
}

impl SkippedPhoto {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Normalises photos one after another, applying `policy` to failures.
///
/// Returns the normalised images in input order together with the photos
/// that were skipped.
///
/// # Errors
///
/// With [`PhotoErrorPolicy::Abort`] the first failure is returned as
/// [`InspektError::Photo`].
pub fn normalize_all<'a>(
    sources: impl IntoIterator<Item = &'a PhotoSource>,
    policy: PhotoErrorPolicy,
    jpeg_quality: u8,
) -> Result<(Vec<RasterImage>, Vec<SkippedPhoto>), InspektError> {
    let mut images = Vec::new();
    let mut skipped = Vec::new();

    for source in sources {
        match source.normalize(jpeg_quality) {
            Ok(image) => {
                debug!(name = source.name(), width = image.width(), height = image.height(); "Photo normalised");
                images.push(image);
            }
            Err(err) => match policy {
                PhotoErrorPolicy::Abort => {
                    return Err(InspektError::new_photo_error(source.name(), err));
                }
                PhotoErrorPolicy::Skip => {
                    warn!(name = source.name(), err:% = err; "Skipping unreadable photo");
                    skipped.push(SkippedPhoto::new(source.name(), err.to_string()));
                }
            },
        }
    }

    Ok((images, skipped))
}

#[derive(Debug, Clone)]
struct PhotoEntry {
    id: Uuid,
    source: PhotoSource,
    preview: Option<RasterImage>,
}

/// The uploaded photos of a report, in upload order.
///
/// # Examples
///
/// ```
/// # use inspekt::photo::{PhotoLibrary, PhotoSource};
/// let mut library = PhotoLibrary::new();
/// assert!(library.add(PhotoSource::file("notes.txt", b"hello".to_vec())).is_err());
///
/// let id = library.add(PhotoSource::file("unit.jpg", Vec::new())).unwrap();
/// assert_eq!(library.len(), 1);
/// assert!(library.remove(id));
/// assert!(library.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhotoLibrary {
    entries: Vec<PhotoEntry>,
}

impl PhotoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a photo and returns its identifier.
    ///
    /// Decoding is deferred to export, so only the file type is checked here.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::UnsupportedFile`] for non-image files.
    pub fn add(&mut self, source: PhotoSource) -> Result<Uuid, InspektError> {
        if !source.is_image() {
            return Err(InspektError::UnsupportedFile(source.name()));
        }
        let id = Uuid::new_v4();
        debug!(id:% = id, name = source.name(); "Photo added");
        self.entries.push(PhotoEntry {
            id,
            source,
            preview: None,
        });
        Ok(id)
    }

    /// Adds a batch of dropped files, ignoring those that are not images.
    ///
    /// Returns the identifiers of the accepted files in order.
    pub fn add_files<I, N>(&mut self, files: I) -> Vec<Uuid>
    where
        I: IntoIterator<Item = (N, Vec<u8>)>,
        N: Into<String>,
    {
        let ids: Vec<Uuid> = files
            .into_iter()
            .filter_map(|(name, bytes)| match self.add(PhotoSource::file(name, bytes)) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(err:% = err; "Ignoring dropped file");
                    None
                }
            })
            .collect();
        info!(accepted = ids.len(); "Files added to photo library");
        ids
    }

    /// Removes a photo together with its cached preview.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Returns the square preview of a photo, generating it on first use.
    ///
    /// Returns `Ok(None)` for unknown identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Photo`] when the photo cannot be decoded.
    pub fn preview(&mut self, id: Uuid) -> Result<Option<&RasterImage>, InspektError> {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(None);
        };
        if entry.preview.is_none() {
            let preview = entry
                .source
                .preview()
                .map_err(|err| InspektError::new_photo_error(entry.source.name(), err))?;
            entry.preview = Some(preview);
        }
        Ok(entry.preview.as_ref())
    }

    pub fn get(&self, id: Uuid) -> Option<&PhotoSource> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.source)
    }

    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Photo sources in upload order.
    pub fn sources(&self) -> impl Iterator<Item = &PhotoSource> {
        self.entries.iter().map(|entry| &entry.source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
