//! Named page sizes and their dimensions in points (1/72 inch).

use crate::error::{PdfError, Result};
use std::fmt;
use std::str::FromStr;

/// Standard page sizes. `Custom` has no catalog entry and must be created
/// with explicit dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
    Tabloid,
    Ledger,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl PageSize {
    /// Every size that has a catalog entry, in catalog order.
    pub const STANDARD: [PageSize; 11] = [
        PageSize::A0,
        PageSize::A1,
        PageSize::A2,
        PageSize::A3,
        PageSize::A4,
        PageSize::A5,
        PageSize::A6,
        PageSize::Letter,
        PageSize::Legal,
        PageSize::Tabloid,
        PageSize::Ledger,
    ];

    /// Catalog width and height in portrait order, `None` for `Custom`.
    fn portrait_points(self) -> Option<(f64, f64)> {
        let dims = match self {
            PageSize::A0 => (2383.94, 3370.39),
            PageSize::A1 => (1683.78, 2383.94),
            PageSize::A2 => (1190.55, 1683.78),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::A6 => (297.64, 419.53),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Ledger => (1224.0, 792.0),
            PageSize::Custom => return None,
        };
        Some(dims)
    }

    /// Finds the catalog entry closest to `width` x `height`.
    ///
    /// Orientation is decided first (`width > height` is landscape) and only
    /// entries whose oriented dimensions are both within `tolerance` points
    /// are considered.
    pub fn match_dimensions(
        width: f64,
        height: f64,
        tolerance: f64,
    ) -> Option<(PageSize, PageOrientation)> {
        let orientation = PageOrientation::from_dimensions(width, height);

        Self::STANDARD
            .iter()
            .filter_map(|&size| {
                let (w, h) = dimensions(size, orientation).ok()?;
                let dw = (w - width).abs();
                let dh = (h - height).abs();
                (dw < tolerance && dh < tolerance).then_some((size, dw + dh))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(size, _)| (size, orientation))
    }
}

impl PageOrientation {
    /// Landscape when the page is strictly wider than it is tall.
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        if width > height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        }
    }
}

/// Returns `(width, height)` in points for `size` in `orientation`.
///
/// Landscape swaps the catalog dimensions. `Custom` is rejected with
/// `InvalidArgument`: the catalog never invents a size for it.
pub fn dimensions(size: PageSize, orientation: PageOrientation) -> Result<(f64, f64)> {
    let (width, height) = size.portrait_points().ok_or_else(|| {
        PdfError::InvalidArgument("custom page size requires explicit dimensions".to_string())
    })?;

    Ok(match orientation {
        PageOrientation::Portrait => (width, height),
        PageOrientation::Landscape => (height, width),
    })
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageSize::A0 => "A0",
            PageSize::A1 => "A1",
            PageSize::A2 => "A2",
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::A6 => "A6",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
            PageSize::Tabloid => "Tabloid",
            PageSize::Ledger => "Ledger",
            PageSize::Custom => "Custom",
        };
        f.write_str(name)
    }
}

impl FromStr for PageSize {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        let size = match s.to_ascii_lowercase().as_str() {
            "a0" => PageSize::A0,
            "a1" => PageSize::A1,
            "a2" => PageSize::A2,
            "a3" => PageSize::A3,
            "a4" => PageSize::A4,
            "a5" => PageSize::A5,
            "a6" => PageSize::A6,
            "letter" => PageSize::Letter,
            "legal" => PageSize::Legal,
            "tabloid" => PageSize::Tabloid,
            "ledger" => PageSize::Ledger,
            "custom" => PageSize::Custom,
            other => {
                return Err(PdfError::InvalidArgument(format!(
                    "unknown page size '{other}'"
                )))
            }
        };
        Ok(size)
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageOrientation::Portrait => f.write_str("Portrait"),
            PageOrientation::Landscape => f.write_str("Landscape"),
        }
    }
}

impl FromStr for PageOrientation {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(PageOrientation::Portrait),
            "landscape" => Ok(PageOrientation::Landscape),
            other => Err(PdfError::InvalidArgument(format!(
                "unknown orientation '{other}'"
            ))),
        }
    }
}
