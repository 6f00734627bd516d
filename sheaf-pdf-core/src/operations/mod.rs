//! File-level PDF operations
//!
//! These functions work on paths: they open documents with the structural
//! scanner, combine or divide them in memory and save the results.

pub mod merge;
pub mod split;

pub use merge::{merge_pdf_files, merge_pdf_files_with, MergeOptions, MetadataMode};
pub use split::{format_output_path, split_pdf_file};
