//! Splitting a PDF file into single-page files.

use crate::document::Document;
use crate::error::{PdfError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Builds the output path for the page at `index` (0-based).
///
/// `{}` and `{page}` are replaced with the 1-based page number; `{n}` with
/// the same number zero-padded to the width of `total`.
pub fn format_output_path(pattern: &str, index: usize, total: usize) -> PathBuf {
    let number = index + 1;
    let width = total.max(1).to_string().len();
    let filename = pattern
        .replace("{}", &number.to_string())
        .replace("{page}", &number.to_string())
        .replace("{n}", &format!("{number:0width$}"));
    PathBuf::from(filename)
}

/// Splits `input` into one file per page named by `pattern` (see
/// [`format_output_path`]) and returns the written paths in page order.
///
/// A pattern without a placeholder is rejected, since every page would be
/// written to the same file.
pub fn split_pdf_file(input: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    if !["{}", "{page}", "{n}"].iter().any(|p| pattern.contains(p)) {
        return Err(PdfError::InvalidArgument(format!(
            "output pattern {pattern:?} has no page placeholder"
        )));
    }

    let document = Document::open(input.as_ref())?;
    let total = document.page_count();

    let mut outputs = Vec::with_capacity(total);
    for (index, mut part) in document.into_split().into_iter().enumerate() {
        let path = format_output_path(pattern, index, total);
        part.save(&path)?;
        outputs.push(path);
    }

    info!(
        input = %input.as_ref().display(),
        files = outputs.len(),
        "Split PDF file"
    );
    Ok(outputs)
}
