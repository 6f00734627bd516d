//! Interactive form fields according to ISO 32000-1 Section 12.7

use crate::annotations::rect_array;
use crate::geometry::{Point, Rectangle};
use crate::graphics::{Canvas, Color};
use crate::objects::{Dictionary, Object, ObjectId};

/// Width of the drop-down arrow drawn inside combo boxes.
const COMBO_ARROW_SIZE: f64 = 8.0;

/// Field flag bits (ISO 32000-1 Tables 221, 226, 228, 230)
mod flag {
    pub const READ_ONLY: u32 = 1;
    pub const REQUIRED: u32 = 1 << 1;
    pub const MULTILINE: u32 = 1 << 12;
    pub const PASSWORD: u32 = 1 << 13;
    pub const RADIO: u32 = 1 << 15;
    pub const COMBO: u32 = 1 << 17;
}

/// Type of form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Button field (checkbox, radio button)
    Button,
    Text,
    /// Choice field (combo box)
    Choice,
}

impl FieldType {
    /// Get the PDF field type name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            FieldType::Button => "Btn",
            FieldType::Text => "Tx",
            FieldType::Choice => "Ch",
        }
    }
}

/// Variant-specific field state
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text {
        max_length: Option<u32>,
        multiline: bool,
        password: bool,
    },
    CheckBox {
        checked: bool,
    },
    RadioButton {
        selected: bool,
        group: String,
    },
    ComboBox {
        options: Vec<String>,
        selected_index: Option<usize>,
    },
}

/// A form field placed on the first page of a document
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: Option<String>,
    pub required: bool,
    pub read_only: bool,
    /// Position on the page, top-left origin
    pub bounds: Rectangle,
    pub kind: FieldKind,
}

impl FormField {
    fn new(name: impl Into<String>, bounds: Rectangle, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            value: None,
            required: false,
            read_only: false,
            bounds,
            kind,
        }
    }

    /// Single-line text field
    pub fn text(name: impl Into<String>, bounds: Rectangle) -> Self {
        Self::new(
            name,
            bounds,
            FieldKind::Text {
                max_length: None,
                multiline: false,
                password: false,
            },
        )
    }

    /// Unchecked check box
    pub fn check_box(name: impl Into<String>, bounds: Rectangle) -> Self {
        Self::new(name, bounds, FieldKind::CheckBox { checked: false })
    }

    /// Unselected radio button belonging to `group`
    pub fn radio_button(name: impl Into<String>, group: impl Into<String>, bounds: Rectangle) -> Self {
        Self::new(
            name,
            bounds,
            FieldKind::RadioButton {
                selected: false,
                group: group.into(),
            },
        )
    }

    /// Combo box with nothing selected
    pub fn combo_box<I, S>(name: impl Into<String>, options: I, bounds: Rectangle) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            bounds,
            FieldKind::ComboBox {
                options: options.into_iter().map(Into::into).collect(),
                selected_index: None,
            },
        )
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the maximum length of a text field; ignored for other kinds.
    pub fn with_max_length(mut self, length: u32) -> Self {
        if let FieldKind::Text { max_length, .. } = &mut self.kind {
            *max_length = Some(length);
        }
        self
    }

    pub fn with_multiline(mut self, enabled: bool) -> Self {
        if let FieldKind::Text { multiline, .. } = &mut self.kind {
            *multiline = enabled;
        }
        self
    }

    pub fn with_password(mut self, enabled: bool) -> Self {
        if let FieldKind::Text { password, .. } = &mut self.kind {
            *password = enabled;
        }
        self
    }

    /// Checks a check box or selects a radio button.
    pub fn with_checked(mut self, on: bool) -> Self {
        match &mut self.kind {
            FieldKind::CheckBox { checked } => *checked = on,
            FieldKind::RadioButton { selected, .. } => *selected = on,
            _ => {}
        }
        self
    }

    /// Selects a combo box option. An index past the option list selects
    /// nothing.
    pub fn with_selected_index(mut self, index: usize) -> Self {
        if let FieldKind::ComboBox {
            options,
            selected_index,
        } = &mut self.kind
        {
            *selected_index = (index < options.len()).then_some(index);
        }
        self
    }

    pub fn field_type(&self) -> FieldType {
        match self.kind {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::CheckBox { .. } | FieldKind::RadioButton { .. } => FieldType::Button,
            FieldKind::ComboBox { .. } => FieldType::Choice,
        }
    }

    /// The selected combo box option, if any.
    pub fn selected_option(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::ComboBox {
                options,
                selected_index,
            } => selected_index.and_then(|i| options.get(i)).map(String::as_str),
            _ => None,
        }
    }

    /// Field flags (`/Ff`)
    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.read_only {
            flags |= flag::READ_ONLY;
        }
        if self.required {
            flags |= flag::REQUIRED;
        }
        match self.kind {
            FieldKind::Text {
                multiline,
                password,
                ..
            } => {
                if multiline {
                    flags |= flag::MULTILINE;
                }
                if password {
                    flags |= flag::PASSWORD;
                }
            }
            FieldKind::CheckBox { .. } => {}
            FieldKind::RadioButton { .. } => flags |= flag::RADIO,
            FieldKind::ComboBox { .. } => flags |= flag::COMBO,
        }
        flags
    }

    /// Builds a merged field/widget dictionary for a page `page_height`
    /// points tall.
    pub fn to_dict(&self, page_height: f64, page: Option<ObjectId>) -> Dictionary {
        let mut dict = Dictionary::typed("Annot");
        dict.set("Subtype", Object::name("Widget"));
        dict.set("FT", Object::name(self.field_type().pdf_name()));
        dict.set("T", self.name.as_str());
        dict.set("Rect", rect_array(self.bounds, page_height));
        dict.set("F", 4i64);
        if let Some(page) = page {
            dict.set("P", page);
        }

        let flags = self.flags();
        if flags != 0 {
            dict.set("Ff", flags);
        }

        match &self.kind {
            FieldKind::Text { max_length, .. } => {
                if let Some(max) = max_length {
                    dict.set("MaxLen", *max);
                }
                if let Some(ref value) = self.value {
                    dict.set("V", value.as_str());
                }
            }
            FieldKind::CheckBox { checked: on } | FieldKind::RadioButton { selected: on, .. } => {
                let state = if *on { "Yes" } else { "Off" };
                dict.set("V", Object::name(state));
                dict.set("AS", Object::name(state));
            }
            FieldKind::ComboBox { options, .. } => {
                let opts: Vec<Object> = options.iter().map(|o| Object::from(o.as_str())).collect();
                dict.set("Opt", opts);
                if let Some(selected) = self.selected_option() {
                    dict.set("V", selected);
                }
            }
        }

        dict
    }

    /// Paints the field's appearance onto `canvas`.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let b = self.bounds;
        match &self.kind {
            FieldKind::Text { .. } => {
                canvas.stroke_rect(b, Color::black());
            }
            FieldKind::CheckBox { checked } => {
                canvas.stroke_rect(b, Color::black());
                if *checked {
                    let inner = b.inset(b.width.min(b.height) * 0.2);
                    let mid = Point::new(inner.x + inner.width * 0.4, inner.bottom());
                    canvas.draw_line(
                        Point::new(inner.x, inner.y + inner.height * 0.55),
                        mid,
                        Color::black(),
                    );
                    canvas.draw_line(mid, Point::new(inner.right(), inner.y), Color::black());
                }
            }
            FieldKind::RadioButton { selected, .. } => {
                let center = b.center();
                let radius = b.width.min(b.height) / 2.0;
                let outer = Rectangle::new(
                    center.x - radius,
                    center.y - radius,
                    radius * 2.0,
                    radius * 2.0,
                );
                canvas.stroke_ellipse(outer, Color::black());
                if *selected {
                    let dot = Rectangle::new(
                        center.x - radius * 0.5,
                        center.y - radius * 0.5,
                        radius,
                        radius,
                    );
                    canvas.fill_ellipse(dot, Color::black());
                }
            }
            FieldKind::ComboBox { .. } => {
                canvas.stroke_rect(b, Color::black());
                let x = b.right() - COMBO_ARROW_SIZE - 2.0;
                let y = b.y + (b.height - COMBO_ARROW_SIZE) / 2.0;
                canvas.fill_polygon(
                    &[
                        Point::new(x, y),
                        Point::new(x + COMBO_ARROW_SIZE, y),
                        Point::new(x + COMBO_ARROW_SIZE / 2.0, y + COMBO_ARROW_SIZE),
                    ],
                    Color::black(),
                );
            }
        }
    }
}
