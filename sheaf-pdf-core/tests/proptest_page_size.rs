//! Property-based tests for the page-size catalog and page geometry

use proptest::prelude::*;
use sheaf_pdf::{dimensions, Page, PageOrientation, PageSize, Rectangle};

fn catalog_size() -> impl Strategy<Value = PageSize> {
    prop::sample::select(PageSize::STANDARD.to_vec())
}

fn orientation() -> impl Strategy<Value = PageOrientation> {
    prop_oneof![
        Just(PageOrientation::Portrait),
        Just(PageOrientation::Landscape),
    ]
}

proptest! {
    #[test]
    fn test_landscape_swaps_dimensions(size in catalog_size()) {
        let (w, h) = dimensions(size, PageOrientation::Portrait).unwrap();
        let (lw, lh) = dimensions(size, PageOrientation::Landscape).unwrap();
        prop_assert_eq!((lw, lh), (h, w));
    }

    #[test]
    fn test_page_matches_catalog(size in catalog_size(), orientation in orientation()) {
        let page = Page::new(size, orientation).unwrap();
        let expected = dimensions(size, orientation).unwrap();
        prop_assert_eq!((page.width(), page.height()), expected);
        prop_assert_eq!(page.size(), size);
    }

    #[test]
    fn test_match_dimensions_within_tolerance(
        size in catalog_size(),
        orientation in orientation(),
        dw in -4.0..4.0f64,
        dh in -4.0..4.0f64,
    ) {
        let (w, h) = dimensions(size, orientation).unwrap();
        let (width, height) = (w + dw, h + dh);

        let (matched, matched_orientation) = PageSize::match_dimensions(width, height, 10.0)
            .expect("a catalog size lies within tolerance");
        prop_assert_eq!(matched_orientation, PageOrientation::from_dimensions(width, height));

        let (mw, mh) = dimensions(matched, matched_orientation).unwrap();
        prop_assert!((mw - width).abs() < 10.0);
        prop_assert!((mh - height).abs() < 10.0);
    }

    #[test]
    fn test_custom_page_orientation(width in 1.0..2000.0f64, height in 1.0..2000.0f64) {
        let page = Page::custom(width, height).unwrap();
        prop_assert_eq!(page.size(), PageSize::Custom);
        prop_assert_eq!(page.orientation() == PageOrientation::Landscape, width > height);
        prop_assert_eq!((page.width(), page.height()), (width, height));
    }

    #[test]
    fn test_non_positive_custom_dimensions_rejected(width in -1000.0..=0.0f64) {
        prop_assert!(Page::custom(width, 100.0).is_err());
        prop_assert!(Page::custom(100.0, width).is_err());
    }

    #[test]
    fn test_pdf_rect_flips_y_axis(
        x in 0.0..500.0f64,
        y in 0.0..500.0f64,
        width in 0.0..300.0f64,
        height in 0.0..300.0f64,
    ) {
        let page_height = 842.0;
        let [llx, lly, urx, ury] = Rectangle::new(x, y, width, height).to_pdf_rect(page_height);
        prop_assert_eq!(llx, x);
        prop_assert!((urx - llx - width).abs() < 1e-9);
        prop_assert!((ury - lly - height).abs() < 1e-9);
        prop_assert!((ury - (page_height - y)).abs() < 1e-9);
    }
}

#[test]
fn test_size_names_parse_back() {
    for size in PageSize::STANDARD {
        let parsed: PageSize = size.to_string().parse().unwrap();
        assert_eq!(parsed, size);
    }
    assert!("B5".parse::<PageSize>().is_err());
}
