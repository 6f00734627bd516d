//! # sheaf-pdf
//!
//! A small PDF document library: build multi-page documents with a raster
//! drawing surface per page, annotate them, add bookmarks and form fields,
//! write them as PDF 1.7 and read them back with a lenient scanner.
//!
//! ## Features
//!
//! - **Page catalog**: ISO A0-A6 and North American sizes in either orientation,
//!   plus custom dimensions
//! - **Drawing**: one RGB raster per page with lines, rectangles, ellipses,
//!   polygons and affine transforms
//! - **Interactivity**: text, highlight, link and free-text annotations; text,
//!   check box, radio button and combo box form fields; nested bookmarks
//! - **Writer**: header, indirect objects, a byte-exact cross-reference table
//!   and trailer, written in one pass
//! - **Reader**: pattern-based recovery of page geometry and document
//!   information that never fails on malformed input
//! - **Operations**: merge, split and file-level helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use sheaf_pdf::{Canvas, Color, Document, PageOrientation, PageSize, Rectangle, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.set_title("My PDF");
//!
//! let page = doc.add_page(PageSize::Letter, PageOrientation::Portrait)?;
//! if let Some(canvas) = page.graphics() {
//!     canvas.fill_ellipse(Rectangle::new(250.0, 250.0, 100.0, 100.0), Color::rgb(0.0, 0.5, 1.0));
//! }
//!
//! let bytes = doc.to_bytes()?;
//! let read_back = Document::open_bytes(Some(&bytes))?;
//! assert_eq!(read_back.page_count(), 1);
//! assert_eq!(read_back.metadata().title.as_deref(), Some("My PDF"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`document`] - document model, merge, split, save and open
//! - [`page`] - pages and their drawing surface
//! - [`graphics`] - the [`Canvas`] trait and its raster implementation
//! - [`annotations`], [`forms`], [`structure`] - interactive content
//! - [`writer`] - serialization to PDF bytes
//! - [`recovery`] - the structural scanner
//! - [`operations`] - path-based merge and split

pub mod annotations;
pub mod document;
pub mod error;
pub mod forms;
pub mod geometry;
pub mod graphics;
pub mod objects;
pub mod operations;
pub mod page;
pub mod page_size;
pub mod recovery;
pub mod security;
pub mod structure;
pub mod writer;

// Re-export the document model
pub use document::{Document, DocumentMetadata};
pub use error::{PdfError, Result};
pub use geometry::{Point, Rectangle};
pub use graphics::{Canvas, Color, RasterCanvas, Transform};
pub use page::{Page, MAX_PAGE_DIMENSION};
pub use page_size::{dimensions, PageOrientation, PageSize};

// Re-export interactive content
pub use annotations::{Annotation, AnnotationKind, Icon, LinkTarget};
pub use forms::{FieldKind, FieldType, FormField};
pub use security::{DocumentSecurity, Permissions};
pub use structure::{Bookmark, OutlineFlags};

// Re-export reading and writing
pub use recovery::{DocumentScanner, ScanOptions};
pub use writer::{PdfWriter, WriterOptions};

// Re-export operations
pub use operations::{merge_pdf_files, split_pdf_file};

/// Current version of sheaf-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PDF version written in the file header
pub const PDF_VERSION: &str = "1.7";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_document() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_create_page() {
        let page = Page::new(PageSize::A4, PageOrientation::Portrait).unwrap();
        assert_eq!(page.width(), 595.28);
        assert_eq!(page.height(), 841.89);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(PDF_VERSION, "1.7");
    }
}
