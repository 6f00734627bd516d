use crate::annotations::Annotation;
use crate::error::{PdfError, Result};
use crate::graphics::RasterCanvas;
use crate::page_size::{dimensions, PageOrientation, PageSize};
use image::RgbImage;

/// Largest page side in points, the PDF user-space limit of 200 inches.
pub const MAX_PAGE_DIMENSION: f64 = 14_400.0;

/// A single page in a PDF document.
///
/// Pages have a size (width and height in points, fixed at construction),
/// a rotation, a raster drawing surface and a list of annotations.
///
/// # Example
///
/// ```rust
/// use sheaf_pdf::{Canvas, Color, Page, PageOrientation, PageSize, Rectangle};
///
/// let mut page = Page::new(PageSize::A4, PageOrientation::Landscape)?;
/// assert!(page.width() > page.height());
///
/// if let Some(canvas) = page.graphics() {
///     canvas.fill_rect(Rectangle::new(72.0, 72.0, 200.0, 100.0), Color::blue());
/// }
/// # Ok::<(), sheaf_pdf::PdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    size: PageSize,
    orientation: PageOrientation,
    width: f64,
    height: f64,
    rotation: u16,
    canvas: Option<RasterCanvas>,
    annotations: Vec<Annotation>,
}

impl Page {
    /// Creates a page of a catalog size. `PageSize::Custom` is rejected;
    /// use [`Page::custom`] for explicit dimensions.
    pub fn new(size: PageSize, orientation: PageOrientation) -> Result<Self> {
        let (width, height) = dimensions(size, orientation)?;
        Ok(Self::with_geometry(size, orientation, width, height))
    }

    /// Creates a page with explicit dimensions in points. Each side must lie
    /// in `(0, MAX_PAGE_DIMENSION]`.
    pub fn custom(width: f64, height: f64) -> Result<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PdfError::InvalidArgument(format!(
                    "page {name} must be a positive number of points, got {value}"
                )));
            }
            if value > MAX_PAGE_DIMENSION {
                return Err(PdfError::InvalidArgument(format!(
                    "page {name} of {value} points exceeds the {MAX_PAGE_DIMENSION} point limit"
                )));
            }
        }
        Ok(Self::with_geometry(
            PageSize::Custom,
            PageOrientation::from_dimensions(width, height),
            width,
            height,
        ))
    }

    /// Creates a new A4 portrait page (595.28 x 841.89 points).
    pub fn a4() -> Self {
        Self::with_geometry(PageSize::A4, PageOrientation::Portrait, 595.28, 841.89)
    }

    /// Creates a new US Letter portrait page (612 x 792 points).
    pub fn letter() -> Self {
        Self::with_geometry(PageSize::Letter, PageOrientation::Portrait, 612.0, 792.0)
    }

    fn with_geometry(size: PageSize, orientation: PageOrientation, width: f64, height: f64) -> Self {
        Self {
            size,
            orientation,
            width,
            height,
            rotation: 0,
            canvas: Some(RasterCanvas::new(width, height)),
            annotations: Vec::new(),
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn orientation(&self) -> PageOrientation {
        self.orientation
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in degrees, written as `/Rotate`.
    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    /// Sets the page rotation. Only 0, 90, 180 and 270 are valid.
    pub fn set_rotation(&mut self, degrees: u16) -> Result<()> {
        match degrees {
            0 | 90 | 180 | 270 => {
                self.rotation = degrees;
                Ok(())
            }
            other => Err(PdfError::InvalidArgument(format!(
                "rotation must be 0, 90, 180 or 270 degrees, got {other}"
            ))),
        }
    }

    /// Returns the drawing surface, or `None` once the page is disposed.
    pub fn graphics(&mut self) -> Option<&mut RasterCanvas> {
        self.canvas.as_mut()
    }

    pub fn canvas(&self) -> Option<&RasterCanvas> {
        self.canvas.as_ref()
    }

    /// The rendered page content, `None` once the page is disposed.
    pub(crate) fn raster(&self) -> Option<&RgbImage> {
        self.canvas.as_ref().map(RasterCanvas::image)
    }

    /// Releases the drawing surface. Calling it again does nothing.
    pub fn dispose(&mut self) {
        self.canvas = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.canvas.is_none()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn remove_annotation(&mut self, index: usize) -> Result<Annotation> {
        PdfError::check_index(index, self.annotations.len())?;
        Ok(self.annotations.remove(index))
    }

    /// Paints every visible annotation onto the drawing surface. The
    /// annotations stay attached and are still written as dictionaries.
    pub fn flatten_annotations(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            for annotation in &self.annotations {
                annotation.draw(canvas);
            }
        }
    }
}
