//! Merging PDF files into a single file.

use crate::document::Document;
use crate::error::{PdfError, Result};
use std::path::Path;
use tracing::info;

/// Options for [`merge_pdf_files_with`].
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// How to fill in the merged document's metadata
    pub metadata_mode: MetadataMode,
}

/// How to handle metadata when merging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetadataMode {
    /// Fresh metadata, as for a new document
    #[default]
    Fresh,
    /// Title, author, subject and keywords from the first input
    FromFirst,
}

/// Merges `inputs` in order into `output` and returns the page count of
/// the merged file.
pub fn merge_pdf_files<P: AsRef<Path>>(inputs: &[P], output: impl AsRef<Path>) -> Result<usize> {
    merge_pdf_files_with(inputs, output, &MergeOptions::default())
}

pub fn merge_pdf_files_with<P: AsRef<Path>>(
    inputs: &[P],
    output: impl AsRef<Path>,
    options: &MergeOptions,
) -> Result<usize> {
    if inputs.is_empty() {
        return Err(PdfError::InvalidArgument(
            "at least one input file is required".to_string(),
        ));
    }

    let documents = inputs
        .iter()
        .map(Document::open)
        .collect::<Result<Vec<_>>>()?;
    let first = documents[0].metadata().clone();

    let mut merged = Document::merge(documents)?;
    if options.metadata_mode == MetadataMode::FromFirst {
        let metadata = merged.metadata_mut();
        metadata.title = first.title;
        metadata.author = first.author;
        metadata.subject = first.subject;
        metadata.keywords = first.keywords;
    }

    merged.save(output.as_ref())?;
    info!(
        inputs = inputs.len(),
        pages = merged.page_count(),
        output = %output.as_ref().display(),
        "Merged PDF files"
    );
    Ok(merged.page_count())
}
