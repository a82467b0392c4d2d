use inspekt_core::{
    geometry::{Bounds, Point, Size},
    raster::RasterImage,
};

use crate::photo::SkippedPhoto;

/// Index of an image stored in a [`DocumentLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(usize);

/// Where a placed image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Sketch,
    Photo,
}

/// A single line of text positioned by the left end of its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    position: Point,
    font_size: f32,
    text: String,
}

impl TextElement {
    pub fn position(&self) -> Point {
        self.position
    }

    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An image stretched into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    bounds: Bounds,
    image: ImageId,
    kind: ImageKind,
}

impl ImageElement {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn image(&self) -> ImageId {
        self.image
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
}

/// One page of positioned elements, in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    elements: Vec<Element>,
}

impl Page {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(text) => Some(text),
            Element::Image(_) => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageElement> {
        self.elements.iter().filter_map(|element| match element {
            Element::Image(image) => Some(image),
            Element::Text(_) => None,
        })
    }

    /// Returns the text element with exactly this content, if any.
    pub fn find_text(&self, text: &str) -> Option<&TextElement> {
        self.texts().find(|element| element.text == text)
    }
}

/// A paginated, fully positioned document.
///
/// All coordinates are millimetres from the top-left corner of the page.
/// Exporters convert to their own units and origin.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    page_size: Size,
    pages: Vec<Page>,
    images: Vec<RasterImage>,
    skipped: Vec<SkippedPhoto>,
}

impl DocumentLayout {
    /// Creates a layout with a single empty page.
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: vec![Page::default()],
            images: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn image(&self, id: ImageId) -> Option<&RasterImage> {
        self.images.get(id.0)
    }

    /// Photos that could not be decoded and were left out.
    pub fn skipped_photos(&self) -> &[SkippedPhoto] {
        &self.skipped
    }

    pub(crate) fn set_skipped_photos(&mut self, skipped: Vec<SkippedPhoto>) {
        self.skipped = skipped;
    }

    /// Appends an empty page and returns its index.
    pub(crate) fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.pages.len() - 1
    }

    pub(crate) fn push_text(
        &mut self,
        page: usize,
        position: Point,
        font_size: f32,
        text: impl Into<String>,
    ) {
        self.page_mut(page).elements.push(Element::Text(TextElement {
            position,
            font_size,
            text: text.into(),
        }));
    }

    pub(crate) fn push_image(
        &mut self,
        page: usize,
        bounds: Bounds,
        image: RasterImage,
        kind: ImageKind,
    ) -> ImageId {
        let id = ImageId(self.images.len());
        self.images.push(image);
        self.page_mut(page).elements.push(Element::Image(ImageElement {
            bounds,
            image: id,
            kind,
        }));
        id
    }

    fn page_mut(&mut self, page: usize) -> &mut Page {
        while self.pages.len() <= page {
            self.pages.push(Page::default());
        }
        &mut self.pages[page]
    }
}
