use crate::error::{PdfError, Result};
use crate::forms::FormField;
use crate::page::Page;
use crate::page_size::{PageOrientation, PageSize};
use crate::recovery::DocumentScanner;
use crate::security::DocumentSecurity;
use crate::structure::Bookmark;
use crate::writer::PdfWriter;
use chrono::{DateTime, Local, Utc};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A PDF document: an ordered list of pages plus metadata, a security
/// record, a bookmark outline and form fields.
///
/// # Example
///
/// ```rust,no_run
/// use sheaf_pdf::{Document, PageOrientation, PageSize};
///
/// let mut doc = Document::new();
/// doc.set_title("My Document");
/// doc.set_author("Jane Doe");
///
/// doc.add_page(PageSize::A4, PageOrientation::Portrait)?;
/// doc.add_bookmark("Start", 0, 0.0)?;
///
/// doc.save("output.pdf")?;
/// # Ok::<(), sheaf_pdf::PdfError>(())
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) pages: Vec<Page>,
    pub(crate) metadata: DocumentMetadata,
    pub(crate) security: DocumentSecurity,
    pub(crate) bookmarks: Vec<Bookmark>,
    pub(crate) form_fields: Vec<FormField>,
}

/// Metadata for a PDF document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Software that created the original document
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    /// Date and time the document was created
    pub creation_date: Option<DateTime<Utc>>,
    /// Date and time the document was last modified
    pub modification_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some("sheaf_pdf".to_string()),
            producer: Some(format!("sheaf_pdf v{}", env!("CARGO_PKG_VERSION"))),
            creation_date: Some(now),
            modification_date: Some(now),
        }
    }
}

impl DocumentMetadata {
    /// Metadata with every field unset, the starting point for recovery.
    pub fn empty() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: None,
            producer: None,
            creation_date: None,
            modification_date: None,
        }
    }
}

impl Document {
    /// Creates a new empty PDF document with generated creator, producer
    /// and timestamps.
    pub fn new() -> Self {
        Self::with_metadata(DocumentMetadata::default())
    }

    pub(crate) fn with_metadata(metadata: DocumentMetadata) -> Self {
        Self {
            pages: Vec::new(),
            metadata,
            security: DocumentSecurity::default(),
            bookmarks: Vec::new(),
            form_fields: Vec::new(),
        }
    }

    /// Appends a page of a catalog size and returns it for drawing.
    ///
    /// # Errors
    ///
    /// `PageSize::Custom` has no catalog dimensions and yields
    /// `InvalidArgument`; use [`Document::add_custom_page`] instead.
    pub fn add_page(&mut self, size: PageSize, orientation: PageOrientation) -> Result<&mut Page> {
        let page = Page::new(size, orientation)?;
        Ok(self.push_page(page))
    }

    /// Appends a page with explicit dimensions in points.
    pub fn add_custom_page(&mut self, width: f64, height: f64) -> Result<&mut Page> {
        let page = Page::custom(width, height)?;
        Ok(self.push_page(page))
    }

    /// Appends an existing page.
    pub fn push_page(&mut self, page: Page) -> &mut Page {
        self.pages.push(page);
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Removes the page at `index`, shifting later pages down.
    pub fn remove_page(&mut self, index: usize) -> Result<Page> {
        PdfError::check_index(index, self.pages.len())?;
        Ok(self.pages.remove(index))
    }

    /// Gets the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Result<&Page> {
        PdfError::check_index(index, self.pages.len())?;
        Ok(&self.pages[index])
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page> {
        PdfError::check_index(index, self.pages.len())?;
        Ok(&mut self.pages[index])
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DocumentMetadata {
        &mut self.metadata
    }

    /// Sets the document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
    }

    /// Sets the document author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Some(author.into());
    }

    /// Sets the document subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = Some(subject.into());
    }

    /// Sets the document keywords.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.metadata.keywords = Some(keywords.into());
    }

    /// Sets the document creator (software that created the original document).
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.metadata.creator = Some(creator.into());
    }

    /// Sets the document producer (software that produced the PDF).
    pub fn set_producer(&mut self, producer: impl Into<String>) {
        self.metadata.producer = Some(producer.into());
    }

    /// Sets the document creation date.
    pub fn set_creation_date(&mut self, date: DateTime<Utc>) {
        self.metadata.creation_date = Some(date);
    }

    /// Sets the document creation date using local time.
    pub fn set_creation_date_local(&mut self, date: DateTime<Local>) {
        self.metadata.creation_date = Some(date.with_timezone(&Utc));
    }

    /// Sets the document modification date.
    pub fn set_modification_date(&mut self, date: DateTime<Utc>) {
        self.metadata.modification_date = Some(date);
    }

    /// Sets the modification date to the current time.
    pub fn update_modification_date(&mut self) {
        self.metadata.modification_date = Some(Utc::now());
    }

    pub fn security(&self) -> &DocumentSecurity {
        &self.security
    }

    pub fn security_mut(&mut self) -> &mut DocumentSecurity {
        &mut self.security
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Adds a top-level bookmark pointing at `page_index`.
    ///
    /// The page index must refer to an existing page at the time of the
    /// call. `vertical_position` runs from 0.0 (top) to 1.0 (bottom).
    pub fn add_bookmark(
        &mut self,
        title: impl Into<String>,
        page_index: usize,
        vertical_position: f64,
    ) -> Result<&mut Bookmark> {
        PdfError::check_index(page_index, self.pages.len())?;
        let bookmark = Bookmark::new(title, page_index, vertical_position)?;
        self.bookmarks.push(bookmark);
        let last = self.bookmarks.len() - 1;
        Ok(&mut self.bookmarks[last])
    }

    pub fn remove_bookmark(&mut self, index: usize) -> Result<Bookmark> {
        PdfError::check_index(index, self.bookmarks.len())?;
        Ok(self.bookmarks.remove(index))
    }

    pub fn form_fields(&self) -> &[FormField] {
        &self.form_fields
    }

    /// Appends a form field. `None` is rejected with `NullArgument`.
    pub fn add_form_field(&mut self, field: Option<FormField>) -> Result<()> {
        let field = field.ok_or(PdfError::NullArgument("field"))?;
        self.form_fields.push(field);
        Ok(())
    }

    pub fn remove_form_field(&mut self, index: usize) -> Result<FormField> {
        PdfError::check_index(index, self.form_fields.len())?;
        Ok(self.form_fields.remove(index))
    }

    /// Concatenates the pages of `documents`, in order, into a new document
    /// with fresh metadata. The inputs are consumed.
    pub fn merge(documents: Vec<Document>) -> Result<Document> {
        if documents.is_empty() {
            return Err(PdfError::InvalidArgument(
                "merge requires at least one document".to_string(),
            ));
        }

        let mut merged = Document::new();
        for document in documents {
            merged.pages.extend(document.pages);
        }
        debug!(pages = merged.pages.len(), "Merged documents");
        Ok(merged)
    }

    /// Returns one single-page document per page, in order.
    ///
    /// Each result owns a copy of its page (raster included) and a copy of
    /// this document's metadata and security record; bookmarks and form
    /// fields are not carried over. Use [`Document::into_split`] to move the
    /// pages instead of copying them.
    pub fn split(&self) -> Vec<Document> {
        self.pages
            .iter()
            .map(|page| self.single_page(page.clone()))
            .collect()
    }

    /// Like [`Document::split`] but moves the pages out of this document.
    pub fn into_split(self) -> Vec<Document> {
        let template = Document {
            pages: Vec::new(),
            metadata: self.metadata,
            security: self.security,
            bookmarks: Vec::new(),
            form_fields: Vec::new(),
        };
        self.pages
            .into_iter()
            .map(|page| template.single_page(page))
            .collect()
    }

    fn single_page(&self, page: Page) -> Document {
        Document {
            pages: vec![page],
            metadata: self.metadata.clone(),
            security: self.security.clone(),
            bookmarks: Vec::new(),
            form_fields: Vec::new(),
        }
    }

    /// Serializes the document into memory.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.update_modification_date();

        let mut buffer = Vec::new();
        PdfWriter::new_with_writer(&mut buffer).write_document(Some(&*self))?;
        Ok(buffer)
    }

    /// Writes the document to `sink` in a single write once the whole
    /// file has been produced.
    pub fn write<W: Write>(&mut self, sink: W) -> Result<()> {
        self.update_modification_date();

        let mut writer = PdfWriter::new_with_writer(sink);
        writer.write_document(Some(&*self))?;
        Ok(())
    }

    /// Saves the document to a file.
    ///
    /// The file is written next to `path` under a temporary name and then
    /// renamed into place, so a failed save leaves any existing file intact.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty path; I/O errors otherwise.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(PdfError::InvalidArgument("path must not be empty".to_string()));
        }

        let bytes = self.to_bytes()?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(err) = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        info!(
            path = %path.display(),
            pages = self.pages.len(),
            bytes = bytes.len(),
            "Saved PDF document"
        );
        Ok(())
    }

    /// Opens a PDF file with the lenient structural scanner.
    ///
    /// Only a missing file or an I/O failure is an error; content that does
    /// not look like a PDF yields an empty document.
    pub fn open(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(PdfError::InvalidArgument("path must not be empty".to_string()));
        }
        if !path.exists() {
            return Err(PdfError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;
        let document = DocumentScanner::default().scan(&bytes);
        info!(
            path = %path.display(),
            pages = document.page_count(),
            "Opened PDF document"
        );
        Ok(document)
    }

    /// Reads all of `reader` and scans it.
    pub fn open_reader<R: Read>(mut reader: R) -> Result<Document> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(DocumentScanner::default().scan(&bytes))
    }

    /// Scans an in-memory PDF. `None` is rejected with `NullArgument`.
    pub fn open_bytes(data: Option<&[u8]>) -> Result<Document> {
        let data = data.ok_or(PdfError::NullArgument("data"))?;
        Ok(DocumentScanner::default().scan(data))
    }

    /// Releases every page's drawing surface and drops the pages.
    /// Calling it again does nothing.
    pub fn dispose(&mut self) {
        for page in &mut self.pages {
            page.dispose();
        }
        self.pages.clear();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use std::io::Cursor;

    fn doc_with_pages(sizes: &[PageSize]) -> Document {
        let mut doc = Document::new();
        for &size in sizes {
            doc.add_page(size, PageOrientation::Portrait).unwrap();
        }
        doc
    }

    fn sizes(doc: &Document) -> Vec<PageSize> {
        doc.pages().iter().map(Page::size).collect()
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
        assert!(doc.metadata.title.is_none());
        assert!(doc.metadata.author.is_none());
        assert_eq!(doc.metadata.creator, Some("sheaf_pdf".to_string()));
        assert!(doc
            .metadata
            .producer
            .as_ref()
            .unwrap()
            .starts_with("sheaf_pdf"));
        assert!(doc.metadata.creation_date.is_some());
        assert!(doc.bookmarks().is_empty());
        assert!(doc.form_fields().is_empty());
        assert_eq!(doc.security(), &DocumentSecurity::default());
    }

    #[test]
    fn test_add_page() {
        let mut doc = Document::new();
        let page = doc.add_page(PageSize::A4, PageOrientation::Portrait).unwrap();
        assert_eq!((page.width(), page.height()), (595.28, 841.89));
        assert_eq!(doc.page_count(), 1);

        let page = doc
            .add_page(PageSize::Letter, PageOrientation::Landscape)
            .unwrap();
        assert!(page.width() > page.height());
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_add_custom_page() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.add_page(PageSize::Custom, PageOrientation::Portrait),
            Err(PdfError::InvalidArgument(_))
        ));
        assert!(doc.add_custom_page(0.0, 100.0).is_err());
        assert!(matches!(
            doc.add_custom_page(1e12, 1e12),
            Err(PdfError::InvalidArgument(_))
        ));
        assert_eq!(doc.page_count(), 0);

        let page = doc.add_custom_page(400.0, 300.0).unwrap();
        assert_eq!(page.size(), PageSize::Custom);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_remove_page_preserves_order() {
        let mut doc = doc_with_pages(&[PageSize::A3, PageSize::A4, PageSize::A5]);
        let removed = doc.remove_page(1).unwrap();
        assert_eq!(removed.size(), PageSize::A4);
        assert_eq!(sizes(&doc), vec![PageSize::A3, PageSize::A5]);
    }

    #[test]
    fn test_remove_page_out_of_range() {
        let mut doc = doc_with_pages(&[PageSize::A4]);
        assert!(matches!(
            doc.remove_page(1),
            Err(PdfError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(doc.page_count(), 1);

        let mut empty = Document::new();
        assert!(empty.remove_page(0).is_err());
    }

    #[test]
    fn test_page_access() {
        let mut doc = doc_with_pages(&[PageSize::A4, PageSize::Legal]);
        assert_eq!(doc.page(1).unwrap().size(), PageSize::Legal);
        assert!(doc.page(2).is_err());
        doc.page_mut(0).unwrap().set_rotation(180).unwrap();
        assert_eq!(doc.pages()[0].rotation(), 180);
    }

    #[test]
    fn test_metadata_setters() {
        let mut doc = Document::new();
        doc.set_title("Test Document");
        doc.set_author("John Doe");
        doc.set_subject("Test Subject");
        doc.set_keywords("test, pdf, rust");
        doc.set_creator("unit test");
        doc.set_producer("producer");

        let meta = doc.metadata();
        assert_eq!(meta.title.as_deref(), Some("Test Document"));
        assert_eq!(meta.author.as_deref(), Some("John Doe"));
        assert_eq!(meta.subject.as_deref(), Some("Test Subject"));
        assert_eq!(meta.keywords.as_deref(), Some("test, pdf, rust"));
        assert_eq!(meta.creator.as_deref(), Some("unit test"));
        assert_eq!(meta.producer.as_deref(), Some("producer"));
    }

    #[test]
    fn test_creation_date_from_local_time() {
        let mut doc = Document::new();
        let local = Local::now();
        doc.set_creation_date_local(local);
        assert_eq!(doc.metadata.creation_date, Some(local.with_timezone(&Utc)));
    }

    #[test]
    fn test_update_modification_date() {
        let mut doc = Document::new();
        let old = Utc::now() - chrono::Duration::days(1);
        doc.set_modification_date(old);
        doc.update_modification_date();
        assert!(doc.metadata.modification_date.unwrap() > old);
    }

    #[test]
    fn test_merge() {
        let a = doc_with_pages(&[PageSize::A3]);
        let b = doc_with_pages(&[PageSize::A4, PageSize::A5]);
        let merged = Document::merge(vec![a, b]).unwrap();
        assert_eq!(merged.page_count(), 3);
        assert_eq!(
            sizes(&merged),
            vec![PageSize::A3, PageSize::A4, PageSize::A5]
        );
    }

    #[test]
    fn test_merge_requires_documents() {
        assert!(matches!(
            Document::merge(Vec::new()),
            Err(PdfError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_split() {
        let mut doc = doc_with_pages(&[PageSize::A3, PageSize::A4, PageSize::A5]);
        doc.set_title("Source");

        let parts = doc.split();
        assert_eq!(parts.len(), 3);
        for (part, size) in parts.iter().zip([PageSize::A3, PageSize::A4, PageSize::A5]) {
            assert_eq!(part.page_count(), 1);
            assert_eq!(part.pages()[0].size(), size);
            assert_eq!(part.metadata().title.as_deref(), Some("Source"));
        }
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_split_copies_do_not_alias() {
        let mut doc = doc_with_pages(&[PageSize::A4]);
        let mut parts = doc.split();
        parts[0].page_mut(0).unwrap().dispose();
        assert!(!doc.page_mut(0).unwrap().is_disposed());
    }

    #[test]
    fn test_into_split() {
        let doc = doc_with_pages(&[PageSize::A4, PageSize::Letter]);
        let parts = doc.into_split();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].pages()[0].size(), PageSize::Letter);
    }

    #[test]
    fn test_add_bookmark() {
        let mut doc = doc_with_pages(&[PageSize::A4, PageSize::A4]);
        let bookmark = doc.add_bookmark("Chapter 2", 1, 0.5).unwrap();
        assert_eq!(bookmark.title(), "Chapter 2");
        assert_eq!(bookmark.page_index(), 1);
        assert_eq!(bookmark.vertical_position(), 0.5);
        assert_eq!(doc.bookmarks().len(), 1);
    }

    #[test]
    fn test_add_bookmark_out_of_range() {
        let mut doc = doc_with_pages(&[PageSize::A4]);
        assert!(matches!(
            doc.add_bookmark("Nowhere", 1, 0.0),
            Err(PdfError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            doc.add_bookmark("Bad anchor", 0, -0.1),
            Err(PdfError::InvalidArgument(_))
        ));
        assert!(doc.bookmarks().is_empty());
    }

    #[test]
    fn test_add_form_field() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.add_form_field(None),
            Err(PdfError::NullArgument("field"))
        ));

        doc.add_form_field(Some(FormField::text(
            "name",
            Rectangle::new(10.0, 10.0, 100.0, 20.0),
        )))
        .unwrap();
        assert_eq!(doc.form_fields().len(), 1);
        assert_eq!(doc.remove_form_field(0).unwrap().name, "name");
        assert!(doc.remove_form_field(0).is_err());
    }

    #[test]
    fn test_to_bytes_starts_with_header() {
        let mut doc = doc_with_pages(&[PageSize::A6]);
        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_write_to_sink() {
        let mut doc = doc_with_pages(&[PageSize::A6]);
        let mut sink = Cursor::new(Vec::new());
        doc.write(&mut sink).unwrap();
        assert!(sink.into_inner().starts_with(b"%PDF-"));
    }

    #[test]
    fn test_save_empty_path() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.save(""),
            Err(PdfError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            Document::open("/definitely/not/here.pdf"),
            Err(PdfError::NotFound(_))
        ));
    }

    #[test]
    fn test_open_bytes() {
        assert!(matches!(
            Document::open_bytes(None),
            Err(PdfError::NullArgument("data"))
        ));
        let doc = Document::open_bytes(Some(b"not a pdf at all")).unwrap();
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_open_reader_round_trip() {
        let mut doc = doc_with_pages(&[PageSize::A6, PageSize::A6]);
        doc.set_title("Reader");
        let bytes = doc.to_bytes().unwrap();

        let reopened = Document::open_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(reopened.page_count(), 2);
        assert_eq!(reopened.metadata().title.as_deref(), Some("Reader"));
    }

    #[test]
    fn test_dispose() {
        let mut doc = doc_with_pages(&[PageSize::A4, PageSize::A4]);
        doc.dispose();
        doc.dispose();
        assert_eq!(doc.page_count(), 0);
    }
}
