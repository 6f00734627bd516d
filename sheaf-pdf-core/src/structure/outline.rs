//! Document outline (bookmarks) according to ISO 32000-1 Section 12.3.3

use crate::annotations::color_array;
use crate::error::{PdfError, Result};
use crate::graphics::Color;
use crate::objects::{Dictionary, Object, ObjectId};
use tracing::warn;

/// Outline item flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineFlags {
    pub italic: bool,
    pub bold: bool,
}

impl OutlineFlags {
    /// Convert to PDF integer
    pub fn to_int(&self) -> i64 {
        let mut flags = 0;
        if self.italic {
            flags |= 1;
        }
        if self.bold {
            flags |= 2;
        }
        flags
    }
}

/// An outline entry pointing at a position on a page.
///
/// The page index is not checked against any document here; bookmarks whose
/// page no longer exists when the document is written lose their destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    title: String,
    page_index: usize,
    vertical_position: f64,
    color: Option<Color>,
    flags: OutlineFlags,
    children: Vec<Bookmark>,
}

impl Bookmark {
    /// Creates a bookmark. `vertical_position` runs from 0.0 (top of the
    /// page) to 1.0 (bottom); anything else is `InvalidArgument`.
    pub fn new(title: impl Into<String>, page_index: usize, vertical_position: f64) -> Result<Self> {
        check_vertical_position(vertical_position)?;
        Ok(Self {
            title: title.into(),
            page_index,
            vertical_position,
            color: None,
            flags: OutlineFlags::default(),
            children: Vec::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn vertical_position(&self) -> f64 {
        self.vertical_position
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn is_bold(&self) -> bool {
        self.flags.bold
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.flags.bold = bold;
    }

    pub fn is_italic(&self) -> bool {
        self.flags.italic
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.flags.italic = italic;
    }

    pub fn flags(&self) -> OutlineFlags {
        self.flags
    }

    pub fn children(&self) -> &[Bookmark] {
        &self.children
    }

    /// Appends a child bookmark and returns it for further nesting.
    pub fn add_child(
        &mut self,
        title: impl Into<String>,
        page_index: usize,
        vertical_position: f64,
    ) -> Result<&mut Bookmark> {
        let child = Bookmark::new(title, page_index, vertical_position)?;
        self.children.push(child);
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Removes and returns the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Result<Bookmark> {
        PdfError::check_index(index, self.children.len())?;
        Ok(self.children.remove(index))
    }

    /// Number of descendants, excluding this bookmark.
    pub fn count_all(&self) -> usize {
        self.children.iter().map(|c| 1 + c.count_all()).sum()
    }
}

fn check_vertical_position(vertical_position: f64) -> Result<()> {
    if (0.0..=1.0).contains(&vertical_position) {
        Ok(())
    } else {
        Err(PdfError::InvalidArgument(format!(
            "vertical position must be between 0 and 1, got {vertical_position}"
        )))
    }
}

/// A page as seen by outline destinations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageTarget {
    pub id: ObjectId,
    pub height: f64,
}

/// Number of objects an outline over `roots` occupies, including the
/// `/Outlines` dictionary itself. Zero when there are no bookmarks.
pub(crate) fn outline_object_count(roots: &[Bookmark]) -> usize {
    if roots.is_empty() {
        0
    } else {
        1 + roots.iter().map(|b| 1 + b.count_all()).sum::<usize>()
    }
}

/// Builds the outline objects. `root_id` is the `/Outlines` dictionary;
/// items take the following ids in pre-order.
pub(crate) fn outline_objects(
    roots: &[Bookmark],
    root_id: ObjectId,
    pages: &[PageTarget],
) -> Vec<(ObjectId, Dictionary)> {
    let mut objects = Vec::with_capacity(outline_object_count(roots));
    let mut root = Dictionary::typed("Outlines");

    let ids = level_ids(roots, root_id.number() + 1);
    if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
        root.set("First", first);
        root.set("Last", last);
        root.set("Count", (outline_object_count(roots) - 1) as i64);
    }
    objects.push((root_id, root));

    emit_level(roots, &ids, root_id, pages, &mut objects);
    objects
}

fn level_ids(items: &[Bookmark], start: u32) -> Vec<ObjectId> {
    let mut next = start;
    items
        .iter()
        .map(|item| {
            let id = ObjectId::new(next, 0);
            next += 1 + item.count_all() as u32;
            id
        })
        .collect()
}

fn emit_level(
    items: &[Bookmark],
    ids: &[ObjectId],
    parent: ObjectId,
    pages: &[PageTarget],
    out: &mut Vec<(ObjectId, Dictionary)>,
) {
    for (i, item) in items.iter().enumerate() {
        let id = ids[i];
        let child_ids = level_ids(&item.children, id.number() + 1);

        let mut dict = Dictionary::new();
        dict.set("Title", item.title.as_str());
        dict.set("Parent", parent);

        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if let Some(&next) = ids.get(i + 1) {
            dict.set("Next", next);
        }

        if let (Some(&first), Some(&last)) = (child_ids.first(), child_ids.last()) {
            dict.set("First", first);
            dict.set("Last", last);
            dict.set("Count", item.count_all() as i64);
        }

        match pages.get(item.page_index) {
            Some(page) => {
                let top = page.height * (1.0 - item.vertical_position);
                dict.set(
                    "Dest",
                    vec![
                        Object::Reference(page.id),
                        Object::name("XYZ"),
                        Object::Integer(0),
                        Object::Real(top),
                        Object::Null,
                    ],
                );
            }
            None => {
                warn!(
                    title = %item.title,
                    page = item.page_index,
                    "Bookmark points past the last page; writing it without a destination"
                );
            }
        }

        if let Some(color) = item.color {
            dict.set("C", color_array(color));
        }

        let flags = item.flags.to_int();
        if flags != 0 {
            dict.set("F", flags);
        }

        out.push((id, dict));
        emit_level(&item.children, &child_ids, id, pages, out);
    }
}
