use crate::document::Document;
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::page::Page;
use crate::structure::{outline_object_count, outline_objects, PageTarget};
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::debug;

/// JPEG quality used for page rasters unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Writer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    jpeg_quality: u8,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// JPEG quality for page rasters, 1 to 100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    fn validate(&self) -> Result<()> {
        if (1..=100).contains(&self.jpeg_quality) {
            Ok(())
        } else {
            Err(PdfError::InvalidArgument(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )))
        }
    }
}

/// Serializes a [`Document`] into a PDF byte stream.
///
/// The whole file is assembled in memory and handed to the underlying
/// writer in one `write_all`, so a failure while building the document
/// never leaves a partial file behind. Object numbering and the offset
/// table start fresh for every [`PdfWriter::write_document`] call.
pub struct PdfWriter<W: Write> {
    writer: W,
    options: WriterOptions,
    buffer: Vec<u8>,
    xref_positions: BTreeMap<u32, u64>,
    next_object_number: u32,
}

/// Object ids reserved for one page.
struct PageLayout {
    content_id: ObjectId,
    page_id: ObjectId,
    image_id: Option<ObjectId>,
    annotation_ids: Vec<ObjectId>,
}

/// Every object id of a document, allocated before anything is written.
struct Layout {
    pages: Vec<PageLayout>,
    field_ids: Vec<ObjectId>,
    pages_id: ObjectId,
    catalog_id: ObjectId,
    outline_id: Option<ObjectId>,
    info_id: ObjectId,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            options: WriterOptions::default(),
            buffer: Vec::new(),
            xref_positions: BTreeMap::new(),
            next_object_number: 1,
        }
    }

    pub fn with_options(writer: W, options: WriterOptions) -> Result<Self> {
        options.validate()?;
        let mut pdf_writer = Self::new_with_writer(writer);
        pdf_writer.options = options;
        Ok(pdf_writer)
    }

    /// Writes `document` to the underlying writer.
    ///
    /// # Errors
    ///
    /// `NullArgument` when no document is given, `InvalidImage` when a page
    /// raster cannot be encoded, and any I/O error from the sink unchanged.
    pub fn write_document(&mut self, document: Option<&Document>) -> Result<()> {
        let document = document.ok_or(PdfError::NullArgument("document"))?;

        self.reset();
        self.write_header();

        let layout = self.plan(document);
        let page_refs: Vec<ObjectId> = layout.pages.iter().map(|p| p.page_id).collect();

        for (index, (page, page_layout)) in document.pages.iter().zip(&layout.pages).enumerate() {
            let extra_annots: &[ObjectId] = if index == 0 { &layout.field_ids } else { &[] };
            self.write_page(page, page_layout, layout.pages_id, &page_refs, extra_annots)?;
        }

        self.write_form_fields(document, &layout);
        self.write_page_tree(&layout, &page_refs);
        self.write_catalog(&layout);
        self.write_outline(document, &layout);
        self.write_info(document, layout.info_id);

        let xref_position = self.buffer.len() as u64;
        self.write_xref();
        self.write_trailer(layout.catalog_id, layout.info_id, xref_position);

        self.writer.write_all(&self.buffer)?;
        self.writer.flush()?;

        debug!(
            objects = self.next_object_number - 1,
            bytes = self.buffer.len(),
            pages = document.pages.len(),
            "Wrote PDF document"
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.xref_positions.clear();
        self.next_object_number = 1;
    }

    fn allocate_object_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_number, 0);
        self.next_object_number += 1;
        id
    }

    /// Reserves ids in the order the objects are written.
    fn plan(&mut self, document: &Document) -> Layout {
        let mut pages = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let content_id = self.allocate_object_id();
            let page_id = self.allocate_object_id();
            let image_id = page.raster().map(|_| self.allocate_object_id());
            let annotation_ids = page
                .annotations()
                .iter()
                .map(|_| self.allocate_object_id())
                .collect();
            pages.push(PageLayout {
                content_id,
                page_id,
                image_id,
                annotation_ids,
            });
        }

        let field_ids = document
            .form_fields
            .iter()
            .map(|_| self.allocate_object_id())
            .collect();
        let pages_id = self.allocate_object_id();
        let catalog_id = self.allocate_object_id();

        let outline_count = outline_object_count(&document.bookmarks);
        let outline_id = (outline_count > 0).then(|| {
            let first = self.allocate_object_id();
            for _ in 1..outline_count {
                self.allocate_object_id();
            }
            first
        });

        let info_id = self.allocate_object_id();

        Layout {
            pages,
            field_ids,
            pages_id,
            catalog_id,
            outline_id,
            info_id,
        }
    }

    fn write_header(&mut self) {
        self.write_bytes(format!("%PDF-{}\n", crate::PDF_VERSION).as_bytes());
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
    }

    fn write_page(
        &mut self,
        page: &Page,
        layout: &PageLayout,
        parent_id: ObjectId,
        page_refs: &[ObjectId],
        extra_annots: &[ObjectId],
    ) -> Result<()> {
        let mut resources = Dictionary::new();
        let content = match layout.image_id {
            Some(image_id) => {
                let name = format!("Im{}", image_id.number());
                let mut xobjects = Dictionary::new();
                xobjects.set(name.as_str(), image_id);
                resources.set("XObject", xobjects);
                format!(
                    "q\n{} 0 0 {} 0 0 cm\n/{} Do\nQ\n",
                    format_real(page.width()),
                    format_real(page.height()),
                    name
                )
                .into_bytes()
            }
            None => Vec::new(),
        };
        self.write_object(layout.content_id, &Object::Stream(Stream::new(content)));

        let mut page_dict = Dictionary::typed("Page");
        page_dict.set("Parent", parent_id);
        page_dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width()),
                Object::Real(page.height()),
            ],
        );
        page_dict.set("Contents", layout.content_id);
        page_dict.set("Resources", resources);
        page_dict.set("Rotate", i64::from(page.rotation()));

        let annots: Vec<Object> = layout
            .annotation_ids
            .iter()
            .chain(extra_annots)
            .map(|&id| Object::Reference(id))
            .collect();
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        self.write_object(layout.page_id, &Object::Dictionary(page_dict));

        if let (Some(image_id), Some(raster)) = (layout.image_id, page.raster()) {
            let image = self.image_stream(raster)?;
            self.write_object(image_id, &Object::Stream(image));
        }

        for (annotation, &id) in page.annotations().iter().zip(&layout.annotation_ids) {
            let mut dict = annotation.to_dict(page.height(), page_refs);
            dict.set("P", layout.page_id);
            self.write_object(id, &Object::Dictionary(dict));
        }

        Ok(())
    }

    fn image_stream(&self, raster: &RgbImage) -> Result<Stream> {
        let data = encode_jpeg(raster, self.options.jpeg_quality)?;

        let mut dict = Dictionary::typed("XObject");
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", raster.width());
        dict.set("Height", raster.height());
        dict.set("ColorSpace", Object::name("DeviceRGB"));
        dict.set("BitsPerComponent", 8i64);
        dict.set("Filter", Object::name("DCTDecode"));
        Ok(Stream::with_dictionary(dict, data))
    }

    fn write_form_fields(&mut self, document: &Document, layout: &Layout) {
        let first_page = layout.pages.first().map(|p| p.page_id);
        let page_height = document.pages.first().map_or(0.0, Page::height);

        for (field, &id) in document.form_fields.iter().zip(&layout.field_ids) {
            let dict = field.to_dict(page_height, first_page);
            self.write_object(id, &Object::Dictionary(dict));
        }
    }

    fn write_page_tree(&mut self, layout: &Layout, page_refs: &[ObjectId]) {
        let mut pages = Dictionary::typed("Pages");
        let kids: Vec<Object> = page_refs.iter().map(|&id| Object::Reference(id)).collect();
        pages.set("Kids", kids);
        pages.set("Count", page_refs.len() as i64);
        self.write_object(layout.pages_id, &Object::Dictionary(pages));
    }

    fn write_catalog(&mut self, layout: &Layout) {
        let mut catalog = Dictionary::typed("Catalog");
        catalog.set("Pages", layout.pages_id);

        if let Some(outline_id) = layout.outline_id {
            catalog.set("Outlines", outline_id);
            catalog.set("PageMode", Object::name("UseOutlines"));
        }

        if !layout.field_ids.is_empty() {
            let mut acro_form = Dictionary::new();
            let fields: Vec<Object> = layout
                .field_ids
                .iter()
                .map(|&id| Object::Reference(id))
                .collect();
            acro_form.set("Fields", fields);
            acro_form.set("NeedAppearances", true);
            catalog.set("AcroForm", acro_form);
        }

        self.write_object(layout.catalog_id, &Object::Dictionary(catalog));
    }

    fn write_outline(&mut self, document: &Document, layout: &Layout) {
        let Some(outline_id) = layout.outline_id else {
            return;
        };

        let targets: Vec<PageTarget> = document
            .pages
            .iter()
            .zip(&layout.pages)
            .map(|(page, page_layout)| PageTarget {
                id: page_layout.page_id,
                height: page.height(),
            })
            .collect();

        for (id, dict) in outline_objects(&document.bookmarks, outline_id, &targets) {
            self.write_object(id, &Object::Dictionary(dict));
        }
    }

    fn write_info(&mut self, document: &Document, info_id: ObjectId) {
        let metadata = &document.metadata;
        let mut info = Dictionary::new();

        let strings = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
            ("Creator", &metadata.creator),
            ("Producer", &metadata.producer),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                info.set(key, value.as_str());
            }
        }

        if let Some(date) = metadata.creation_date {
            info.set("CreationDate", format_pdf_date(date));
        }
        if let Some(date) = metadata.modification_date {
            info.set("ModDate", format_pdf_date(date));
        }

        self.write_object(info_id, &Object::Dictionary(info));
    }

    fn write_object(&mut self, id: ObjectId, object: &Object) {
        let previous = self
            .xref_positions
            .insert(id.number(), self.buffer.len() as u64);
        debug_assert!(previous.is_none(), "object {id} written twice");

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes());
        self.write_object_value(object);
        self.write_bytes(b"\nendobj\n");
    }

    fn write_object_value(&mut self, object: &Object) {
        match object {
            Object::Null => self.write_bytes(b"null"),
            Object::Boolean(b) => {
                let keyword: &[u8] = if *b { b"true" } else { b"false" };
                self.write_bytes(keyword);
            }
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes()),
            Object::Real(f) => self.write_bytes(format_real(*f).as_bytes()),
            Object::String(s) => {
                let encoded = encode_string(s);
                self.write_bytes(&encoded);
            }
            Object::Name(n) => {
                self.write_bytes(b"/");
                self.write_bytes(n.as_bytes());
            }
            Object::Array(arr) => {
                self.write_bytes(b"[");
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ");
                    }
                    self.write_object_value(obj);
                }
                self.write_bytes(b"]");
            }
            Object::Dictionary(dict) => self.write_dictionary(dict),
            Object::Stream(stream) => {
                self.write_dictionary(stream.dictionary());
                self.write_bytes(b"\nstream\n");
                self.write_bytes(stream.data());
                self.write_bytes(b"\nendstream");
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes());
            }
        }
    }

    fn write_dictionary(&mut self, dict: &Dictionary) {
        self.write_bytes(b"<<");
        for (key, value) in dict.entries() {
            self.write_bytes(b"\n/");
            self.write_bytes(key.as_bytes());
            self.write_bytes(b" ");
            self.write_object_value(value);
        }
        self.write_bytes(b"\n>>");
    }

    fn write_xref(&mut self) {
        let size = self.next_object_number;
        self.write_bytes(format!("xref\n0 {size}\n").as_bytes());
        self.write_bytes(b"0000000000 65535 f \n");

        for number in 1..size {
            let entry = match self.xref_positions.get(&number) {
                Some(position) => format!("{position:010} 00000 n \n"),
                None => "0000000000 00000 f \n".to_string(),
            };
            self.write_bytes(entry.as_bytes());
        }
    }

    fn write_trailer(&mut self, catalog_id: ObjectId, info_id: ObjectId, xref_position: u64) {
        let mut trailer = Dictionary::new();
        trailer.set("Size", i64::from(self.next_object_number));
        trailer.set("Root", catalog_id);
        trailer.set("Info", info_id);

        self.write_bytes(b"trailer\n");
        self.write_dictionary(&trailer);
        self.write_bytes(b"\nstartxref\n");
        self.write_bytes(xref_position.to_string().as_bytes());
        self.write_bytes(b"\n%%EOF\n");
    }

    fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }
}

fn encode_jpeg(raster: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, quality);
    raster
        .write_with_encoder(encoder)
        .map_err(|err| PdfError::InvalidImage(format!("JPEG encoding failed: {err}")))?;
    Ok(data)
}

/// Formats a number with at most six decimals and no trailing zeros.
fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Encodes a text string. ASCII text becomes a literal string with `\`,
/// `(`, `)`, CR and LF escaped; anything else is written as UTF-16BE hex
/// with a byte order mark.
fn encode_string(s: &str) -> Vec<u8> {
    if s.is_ascii() {
        let mut out = Vec::with_capacity(s.len() + 2);
        out.push(b'(');
        out.extend_from_slice(escape_literal(s).as_bytes());
        out.push(b')');
        return out;
    }

    let mut hex = String::from("<FEFF");
    for unit in s.encode_utf16() {
        hex.push_str(&format!("{unit:04X}"));
    }
    hex.push('>');
    hex.into_bytes()
}

fn escape_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSS)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Annotation;
    use crate::forms::FormField;
    use crate::geometry::Rectangle;
    use crate::page_size::{PageOrientation, PageSize};
    use chrono::TimeZone;
    use std::io::{self, ErrorKind};

    fn small_doc(pages: usize) -> Document {
        let mut doc = Document::new();
        for _ in 0..pages {
            doc.add_page(PageSize::A6, PageOrientation::Portrait).unwrap();
        }
        doc
    }

    fn write(doc: &Document) -> Vec<u8> {
        let mut buffer = Vec::new();
        PdfWriter::new_with_writer(&mut buffer)
            .write_document(Some(doc))
            .unwrap();
        buffer
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Object numbers in the order their `N 0 obj` headers appear.
    fn object_numbers(bytes: &[u8]) -> Vec<u32> {
        text(bytes)
            .lines()
            .filter_map(|line| line.strip_suffix(" 0 obj"))
            .filter_map(|n| n.parse().ok())
            .collect()
    }

    fn startxref(bytes: &[u8]) -> usize {
        let s = text(bytes);
        let tail = &s[s.rfind("startxref\n").unwrap() + "startxref\n".len()..];
        tail.lines().next().unwrap().parse().unwrap()
    }

    #[test]
    fn test_pdf_writer_new_with_writer() {
        let writer = PdfWriter::new_with_writer(Vec::new());
        assert_eq!(writer.next_object_number, 1);
        assert!(writer.xref_positions.is_empty());
        assert_eq!(writer.options.jpeg_quality(), DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn test_write_header() {
        let bytes = write(&Document::new());
        assert!(bytes.starts_with(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"));
    }

    #[test]
    fn test_missing_document_is_null_argument() {
        let mut buffer = Vec::new();
        let result = PdfWriter::new_with_writer(&mut buffer).write_document(None);
        assert!(matches!(result, Err(PdfError::NullArgument("document"))));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_invalid_jpeg_quality() {
        for quality in [0, 101] {
            let result =
                PdfWriter::with_options(Vec::new(), WriterOptions::new().with_jpeg_quality(quality));
            assert!(matches!(result, Err(PdfError::InvalidArgument(_))));
        }
        assert!(PdfWriter::with_options(Vec::new(), WriterOptions::new().with_jpeg_quality(50)).is_ok());
    }

    #[test]
    fn test_object_ids_are_sequential() {
        let mut doc = small_doc(2);
        doc.add_bookmark("One", 0, 0.0).unwrap();
        let bytes = write(&doc);

        let numbers = object_numbers(&bytes);
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_single_page_layout() {
        let bytes = write(&small_doc(1));
        let s = text(&bytes);

        // content 1, page 2, image 3, pages 4, catalog 5, info 6
        assert_eq!(object_numbers(&bytes), vec![1, 2, 3, 4, 5, 6]);
        assert!(s.contains("q\n297.64 0 0 419.53 0 0 cm\n/Im3 Do\nQ\n"));
        assert!(s.contains("/Type /Page\n/Parent 4 0 R\n/MediaBox [0 0 297.64 419.53]\n/Contents 1 0 R"));
        assert!(s.contains("/XObject <<\n/Im3 3 0 R\n>>"));
        assert!(s.contains("/Rotate 0"));
        assert!(s.contains("/Type /Pages\n/Kids [2 0 R]\n/Count 1"));
        assert!(s.contains("/Type /Catalog\n/Pages 4 0 R"));
        assert!(s.contains("/Subtype /Image\n/Width 297\n/Height 419\n/ColorSpace /DeviceRGB\n/BitsPerComponent 8\n/Filter /DCTDecode"));
        assert!(s.contains("trailer\n<<\n/Size 7\n/Root 5 0 R\n/Info 6 0 R\n>>"));
    }

    #[test]
    fn test_xref_offsets_match_objects() {
        let mut doc = small_doc(3);
        doc.add_form_field(Some(FormField::check_box(
            "agree",
            Rectangle::new(10.0, 10.0, 12.0, 12.0),
        )))
        .unwrap();
        let bytes = write(&doc);

        let xref_at = startxref(&bytes);
        assert!(bytes[xref_at..].starts_with(b"xref\n"));

        let table = text(&bytes[xref_at..]);
        let mut lines = table.lines().skip(1);
        let size: u32 = lines
            .next()
            .unwrap()
            .split_whitespace()
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(lines.next(), Some("0000000000 65535 f "));

        for number in 1..size {
            let entry = lines.next().unwrap();
            assert!(entry.ends_with(" 00000 n "), "entry {number}: {entry}");
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{number} 0 obj\n");
            assert!(
                bytes[offset..].starts_with(expected.as_bytes()),
                "object {number} not at offset {offset}"
            );
        }
    }

    #[test]
    fn test_writer_resets_between_documents() {
        let doc = small_doc(1);
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer);
            writer.write_document(Some(&doc)).unwrap();
            writer.write_document(Some(&doc)).unwrap();
        }

        let s = text(&buffer);
        let second = s.rfind("%PDF-1.7").unwrap();
        assert!(second > 0);
        assert_eq!(object_numbers(s[second..].as_bytes()), vec![1, 2, 3, 4, 5, 6]);
        assert!(s[second..].contains("/Size 7"));
    }

    #[test]
    fn test_disposed_page_has_no_image() {
        let mut doc = small_doc(1);
        doc.page_mut(0).unwrap().dispose();
        let s = text(&write(&doc));

        assert!(!s.contains("/Subtype /Image"));
        assert!(s.contains("1 0 obj\n<<\n/Length 0\n>>\nstream\n\nendstream"));
        assert_eq!(object_numbers(s.as_bytes()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_write_info() {
        let mut doc = Document::new();
        doc.set_title("Test Title");
        doc.set_author("Test Author");
        doc.set_subject("Test Subject");
        doc.set_keywords("one, two");
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        doc.set_creation_date(date);
        doc.set_modification_date(date);

        let s = text(&write(&doc));
        assert!(s.contains("/Title (Test Title)"));
        assert!(s.contains("/Author (Test Author)"));
        assert!(s.contains("/Subject (Test Subject)"));
        assert!(s.contains("/Keywords (one, two)"));
        assert!(s.contains("/Creator (sheaf_pdf)"));
        assert!(s.contains("/CreationDate (D:20240102030405)"));
        assert!(s.contains("/ModDate (D:20240102030405)"));
    }

    #[test]
    fn test_info_strings_are_escaped() {
        let mut doc = Document::new();
        doc.set_title("a(b)\\c\r\nd");
        let s = text(&write(&doc));
        assert!(s.contains("/Title (a\\(b\\)\\\\c\\r\\nd)"));
    }

    #[test]
    fn test_non_ascii_strings_use_utf16() {
        assert_eq!(encode_string("é"), b"<FEFF00E9>".to_vec());
        assert_eq!(encode_string("ok"), b"(ok)".to_vec());
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(595.28), "595.28");
        assert_eq!(format_real(612.0), "612");
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(-0.0), "0");
        assert_eq!(format_real(0.1234567), "0.123457");
        assert_eq!(format_real(f64::NAN), "0");
    }

    #[test]
    fn test_format_pdf_date() {
        let date = Utc.with_ymd_and_hms(2023, 12, 25, 10, 30, 45).unwrap();
        assert_eq!(format_pdf_date(date), "D:20231225103045");
    }

    #[test]
    fn test_outline_and_forms_in_catalog() {
        let mut doc = small_doc(2);
        doc.add_bookmark("Second", 1, 0.5).unwrap();
        doc.add_form_field(Some(FormField::text(
            "name",
            Rectangle::new(10.0, 10.0, 100.0, 20.0),
        )))
        .unwrap();
        let s = text(&write(&doc));

        // pages: 1-3, 4-6; field 7; pages 8; catalog 9; outlines 10-11; info 12
        assert!(s.contains("/Type /Catalog\n/Pages 8 0 R\n/Outlines 10 0 R\n/PageMode /UseOutlines"));
        assert!(s.contains("/AcroForm <<\n/Fields [7 0 R]\n/NeedAppearances true\n>>"));
        assert!(s.contains("/Annots [7 0 R]"));
        assert!(s.contains("/Dest [5 0 R /XYZ 0 209.765 null]"));
        assert!(s.contains("/Info 12 0 R"));
    }

    #[test]
    fn test_page_annotations_written() {
        let mut doc = small_doc(2);
        doc.page_mut(0)
            .unwrap()
            .add_annotation(Annotation::link_to_page(Rectangle::new(10.0, 10.0, 50.0, 20.0), 1));
        let s = text(&write(&doc));

        // content 1, page 2, image 3, annot 4, then page 2 at 5-7
        assert!(s.contains("/Annots [4 0 R]"));
        assert!(s.contains("4 0 obj\n<<\n/Type /Annot\n/Subtype /Link"));
        assert!(s.contains("/Dest [6 0 R /Fit]"));
        assert!(s.contains("/P 2 0 R"));
    }

    #[test]
    fn test_rotation_written() {
        let mut doc = small_doc(1);
        doc.page_mut(0).unwrap().set_rotation(270).unwrap();
        assert!(text(&write(&doc)).contains("/Rotate 270"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "Simulated write error"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_errors_propagate() {
        let doc = small_doc(1);
        let result = PdfWriter::new_with_writer(FailingWriter).write_document(Some(&doc));
        match result {
            Err(PdfError::Io(err)) => assert_eq!(err.kind(), ErrorKind::PermissionDenied),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
