//! Page annotations

use crate::geometry::Rectangle;
use crate::graphics::{Canvas, Color};
use crate::objects::{Dictionary, Object, ObjectId};
use tracing::warn;

/// Side length of the sticky-note marker drawn for text annotations.
const NOTE_ICON_SIZE: f64 = 20.0;

/// Opacity used when flattening highlights.
const HIGHLIGHT_OPACITY: f64 = 0.5;

/// Annotation flag bits (ISO 32000-1 section 12.5.3)
const FLAG_HIDDEN: i64 = 1 << 1;
const FLAG_PRINT: i64 = 1 << 2;

/// Icon types for text annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Icon {
    Comment,
    Key,
    #[default]
    Note,
    Help,
    NewParagraph,
    Paragraph,
    Insert,
}

impl Icon {
    /// Get PDF icon name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Icon::Comment => "Comment",
            Icon::Key => "Key",
            Icon::Note => "Note",
            Icon::Help => "Help",
            Icon::NewParagraph => "NewParagraph",
            Icon::Paragraph => "Paragraph",
            Icon::Insert => "Insert",
        }
    }
}

/// Where a link annotation points.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// Zero-based page index within the same document
    Page(usize),
    Uri(String),
}

/// Variant-specific annotation data
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    /// Sticky note
    Text { icon: Icon },
    Highlight { color: Color },
    Link { target: LinkTarget },
    FreeText { text_color: Color },
}

impl AnnotationKind {
    /// Get PDF subtype name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            AnnotationKind::Text { .. } => "Text",
            AnnotationKind::Highlight { .. } => "Highlight",
            AnnotationKind::Link { .. } => "Link",
            AnnotationKind::FreeText { .. } => "FreeText",
        }
    }
}

/// An annotation attached to a page
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Position on the page, top-left origin
    pub bounds: Rectangle,
    pub title: Option<String>,
    pub contents: Option<String>,
    pub visible: bool,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, bounds: Rectangle) -> Self {
        Self {
            bounds,
            title: None,
            contents: None,
            visible: true,
            kind,
        }
    }

    /// Sticky note with the default icon
    pub fn text(bounds: Rectangle) -> Self {
        Self::new(AnnotationKind::Text { icon: Icon::Note }, bounds)
    }

    /// Yellow highlight over `bounds`
    pub fn highlight(bounds: Rectangle) -> Self {
        Self::new(
            AnnotationKind::Highlight {
                color: Color::yellow(),
            },
            bounds,
        )
    }

    pub fn link_to_page(bounds: Rectangle, page_index: usize) -> Self {
        Self::new(
            AnnotationKind::Link {
                target: LinkTarget::Page(page_index),
            },
            bounds,
        )
    }

    pub fn link_to_uri(bounds: Rectangle, uri: impl Into<String>) -> Self {
        Self::new(
            AnnotationKind::Link {
                target: LinkTarget::Uri(uri.into()),
            },
            bounds,
        )
    }

    pub fn free_text(bounds: Rectangle, contents: impl Into<String>) -> Self {
        Self::new(
            AnnotationKind::FreeText {
                text_color: Color::black(),
            },
            bounds,
        )
        .with_contents(contents)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the icon; ignored for anything but text annotations.
    pub fn with_icon(mut self, new_icon: Icon) -> Self {
        if let AnnotationKind::Text { icon } = &mut self.kind {
            *icon = new_icon;
        }
        self
    }

    /// Sets the highlight or free-text color; ignored for other kinds.
    pub fn with_color(mut self, new_color: Color) -> Self {
        match &mut self.kind {
            AnnotationKind::Highlight { color } => *color = new_color,
            AnnotationKind::FreeText { text_color } => *text_color = new_color,
            _ => {}
        }
        self
    }

    /// Builds the annotation dictionary for a page `page_height` points tall.
    ///
    /// `page_refs` holds the object ids of the document's pages, in order;
    /// page links resolve against it.
    pub fn to_dict(&self, page_height: f64, page_refs: &[ObjectId]) -> Dictionary {
        let mut dict = Dictionary::typed("Annot");
        dict.set("Subtype", Object::name(self.kind.pdf_name()));
        dict.set("Rect", rect_array(self.bounds, page_height));

        if let Some(ref title) = self.title {
            dict.set("T", title.as_str());
        }
        if let Some(ref contents) = self.contents {
            dict.set("Contents", contents.as_str());
        }

        let flags = if self.visible {
            FLAG_PRINT
        } else {
            FLAG_HIDDEN
        };
        dict.set("F", flags);

        match &self.kind {
            AnnotationKind::Text { icon } => {
                dict.set("Name", Object::name(icon.pdf_name()));
            }
            AnnotationKind::Highlight { color } => {
                dict.set("C", color_array(*color));
                let [llx, lly, urx, ury] = self.bounds.to_pdf_rect(page_height);
                let quad: Vec<Object> = [llx, ury, urx, ury, llx, lly, urx, lly]
                    .into_iter()
                    .map(Object::Real)
                    .collect();
                dict.set("QuadPoints", quad);
            }
            AnnotationKind::Link { target } => {
                dict.set(
                    "Border",
                    vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                );
                match target {
                    LinkTarget::Page(index) => match page_refs.get(*index) {
                        Some(&page) => {
                            dict.set(
                                "Dest",
                                vec![
                                    Object::Reference(page),
                                    Object::name("Fit"),
                                ],
                            );
                        }
                        None => {
                            warn!(page = index, "Link annotation points past the last page");
                        }
                    },
                    LinkTarget::Uri(uri) => {
                        let mut action = Dictionary::new();
                        action.set("S", Object::name("URI"));
                        action.set("URI", uri.as_str());
                        dict.set("A", action);
                    }
                }
            }
            AnnotationKind::FreeText { text_color } => {
                let (r, g, b) = text_color.to_rgb();
                dict.set("DA", format!("/Helv 12 Tf {r:.3} {g:.3} {b:.3} rg"));
            }
        }

        dict
    }

    /// Paints the annotation's appearance onto `canvas`. Hidden annotations
    /// draw nothing.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }

        match &self.kind {
            AnnotationKind::Text { .. } => {
                let icon = Rectangle::new(self.bounds.x, self.bounds.y, NOTE_ICON_SIZE, NOTE_ICON_SIZE);
                canvas.fill_rect(icon, Color::yellow());
                canvas.stroke_rect(icon, Color::black());
            }
            AnnotationKind::Highlight { color } => {
                canvas.blend_rect(self.bounds, *color, HIGHLIGHT_OPACITY);
            }
            AnnotationKind::Link { .. } => {
                canvas.stroke_rect(self.bounds, Color::blue());
            }
            AnnotationKind::FreeText { text_color } => {
                // Glyphs are not rasterized; the text box is outlined instead.
                if self.contents.as_deref().is_some_and(|c| !c.is_empty()) {
                    canvas.stroke_rect(self.bounds, *text_color);
                }
            }
        }
    }
}

pub(crate) fn rect_array(bounds: Rectangle, page_height: f64) -> Vec<Object> {
    bounds
        .to_pdf_rect(page_height)
        .into_iter()
        .map(Object::Real)
        .collect()
}

pub(crate) fn color_array(color: Color) -> Vec<Object> {
    let (r, g, b) = color.to_rgb();
    vec![Object::Real(r), Object::Real(g), Object::Real(b)]
}
