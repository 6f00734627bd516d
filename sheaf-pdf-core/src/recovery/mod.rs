//! Recovering documents from existing PDF bytes.
//!
//! Reading is deliberately shallow: the scanner recovers page geometry and
//! document information without decoding content streams, so damaged or
//! unusual files still produce a document instead of an error.
//!
//! # Example
//!
//! ```rust
//! use sheaf_pdf::recovery::{DocumentScanner, ScanOptions};
//! use sheaf_pdf::PageSize;
//!
//! let scanner = DocumentScanner::new(ScanOptions::default().with_default_size(PageSize::Letter));
//! let doc = scanner.scan(b"%PDF-1.7\n1 0 obj\n<< /Type /Page /MediaBox [0 0 612 792] >>\nendobj\n");
//! assert_eq!(doc.page_count(), 1);
//! ```

mod scanner;

pub use scanner::{DocumentScanner, ScanOptions};
