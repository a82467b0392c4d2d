//! Report manifests.
//!
//! A manifest is a TOML file describing one inspection report. Sketches
//! are given either as PNG files or as recorded strokes, which are replayed
//! through a [`SketchSurface`](inspekt::sketch::SketchSurface) and committed
//! exactly as a pointer-driven front-end would.
//!
//! ```toml
//! client = "Jana"
//! notes = "Second floor, north wall"
//! brands = ["Samsung", "Toshiba"]
//! max_price = 500
//! photos = ["photos/front.jpg"]
//! sketch_images = ["plan.png"]
//!
//! [[sketches]]
//! viewport = [800.0, 600.0]
//! strokes = [{ from = [10, 10], to = [300, 200] }]
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;

use inspekt::{
    InspektError, ReportBuilder,
    geometry::{Point, Size},
    photo::PhotoSource,
    raster::RasterImage,
    report::{Brand, BrandList, Report},
    sketch::SketchSnapshot,
};

/// Viewport used to replay strokes when a sketch does not name one.
const DEFAULT_VIEWPORT: [f32; 2] = [800.0, 600.0];

/// Price ceiling as written in the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One recorded pointer gesture.
#[derive(Debug, Clone, Deserialize)]
pub struct Stroke {
    from: [f32; 2],
    to: [f32; 2],
    /// The gesture was interrupted instead of released.
    #[serde(default)]
    cancel: bool,
}

/// A sketch recorded as strokes.
#[derive(Debug, Clone, Deserialize)]
pub struct SketchStrokes {
    #[serde(default = "default_viewport")]
    viewport: [f32; 2],
    #[serde(default)]
    strokes: Vec<Stroke>,
    /// Strokes taken back with undo after drawing.
    #[serde(default)]
    undo: usize,
}

fn default_viewport() -> [f32; 2] {
    DEFAULT_VIEWPORT
}

/// Deserialized report manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    client: String,
    notes: String,
    /// Brand names; an empty string or `-` leaves the row unselected.
    brands: Vec<String>,
    max_price: Option<Price>,
    photos: Vec<PathBuf>,
    sketch_images: Vec<PathBuf>,
    sketches: Vec<SketchStrokes>,

    #[serde(skip)]
    base_dir: PathBuf,
}

impl Manifest {
    /// Reads a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Io`] when the file cannot be read and
    /// [`InspektError::Config`] when it is not a valid manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InspektError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut manifest = Self::parse(&content)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(path = path.display().to_string(); "Manifest loaded");
        Ok(manifest)
    }

    /// Parses manifest text; relative paths resolve against the working directory.
    pub fn parse(content: &str) -> Result<Self, InspektError> {
        toml::from_str(content)
            .map_err(|err| InspektError::Config(format!("Invalid manifest: {err}")))
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Builds the report, reading photos and sketch images from disk and
    /// replaying recorded strokes on sketch surfaces from `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown brands, unreadable files, files that are
    /// not images and sketch images that are not PNG.
    pub fn to_report(&self, builder: &ReportBuilder) -> Result<Report, InspektError> {
        let mut report = Report::new();
        report.set_client_name(self.client.as_str());
        report.set_notes(self.notes.as_str());
        if let Some(price) = &self.max_price {
            report.set_max_price(price.to_string());
        }
        *report.brands_mut() = self.brand_list()?;

        for path in &self.sketch_images {
            let path = self.resolve(path);
            let bytes = fs::read(&path)?;
            let snapshot = RasterImage::from_encoded(bytes).and_then(SketchSnapshot::from_png)?;
            report.sketches_mut().push(snapshot);
        }

        for sketch in &self.sketches {
            report.sketches_mut().push(replay(builder, sketch)?);
        }

        for path in &self.photos {
            report
                .photos_mut()
                .add(PhotoSource::from_path(self.resolve(path))?)?;
        }

        info!(
            brands = report.brands().len(),
            sketches = report.sketches().len(),
            photos = report.photos().len();
            "Report assembled from manifest"
        );
        Ok(report)
    }

    fn brand_list(&self) -> Result<BrandList, InspektError> {
        if self.brands.is_empty() {
            return Ok(BrandList::new());
        }
        let brands = self
            .brands
            .iter()
            .map(|name| match name.trim() {
                "" | "-" => Ok(None),
                name => name.parse::<Brand>().map(Some).map_err(InspektError::Config),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BrandList::from_brands(brands))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

fn replay(builder: &ReportBuilder, sketch: &SketchStrokes) -> Result<SketchSnapshot, InspektError> {
    let [width, height] = sketch.viewport;
    let mut surface = builder.sketch_surface(Size::new(width, height))?;

    for stroke in &sketch.strokes {
        surface.pointer_down(Point::new(stroke.from[0], stroke.from[1]));
        surface.pointer_move(Point::new(stroke.to[0], stroke.to[1]));
        if stroke.cancel {
            surface.pointer_cancel();
        } else {
            surface.pointer_up();
        }
    }
    for _ in 0..sketch.undo {
        surface.undo_last();
    }

    debug!(segments = surface.history().len(); "Sketch replayed");
    surface.commit()
}
