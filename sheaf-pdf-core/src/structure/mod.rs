//! Document structure: the bookmark outline.

mod outline;

pub use outline::{Bookmark, OutlineFlags};
pub(crate) use outline::{outline_object_count, outline_objects, PageTarget};
