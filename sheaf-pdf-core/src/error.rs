use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Required argument is missing: {0}")]
    NullArgument(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} is out of range (valid range is 0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

impl PdfError {
    /// Checks `index` against a collection of `len` items.
    pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(PdfError::IndexOutOfRange { index, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_pdf_error_display() {
        let error = PdfError::InvalidArgument("width must be positive".to_string());
        assert_eq!(error.to_string(), "Invalid argument: width must be positive");
    }

    #[test]
    fn test_index_out_of_range_display() {
        let error = PdfError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(
            error.to_string(),
            "Index 5 is out of range (valid range is 0..2)"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = PdfError::NotFound(PathBuf::from("missing.pdf"));
        assert_eq!(error.to_string(), "File not found: missing.pdf");
    }

    #[test]
    fn test_null_argument_display() {
        let error = PdfError::NullArgument("field");
        assert_eq!(error.to_string(), "Required argument is missing: field");
    }

    #[test]
    fn test_pdf_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::PermissionDenied, "access denied");
        let pdf_error = PdfError::from(io_error);

        match pdf_error {
            PdfError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::PermissionDenied);
                assert_eq!(err.to_string(), "access denied");
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_check_index() {
        assert!(PdfError::check_index(0, 1).is_ok());
        assert!(matches!(
            PdfError::check_index(1, 1),
            Err(PdfError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(PdfError::check_index(0, 0).is_err());
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfError>();
    }
}
