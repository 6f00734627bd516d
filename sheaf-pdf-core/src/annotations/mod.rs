//! Annotations attached to pages.
//!
//! The supported set is closed: sticky notes, highlights, links and free
//! text. Each annotation can be emitted as an annotation dictionary or
//! flattened onto its page's raster.

mod annotation;

pub use annotation::{Annotation, AnnotationKind, Icon, LinkTarget};
pub(crate) use annotation::{color_array, rect_array};
