use pdf_crop::*;

#[test]
fn test_parity_of_index() {
    // Page 1 (index 0) is odd
    assert_eq!(Parity::of(0), Parity::Odd);
    assert_eq!(Parity::of(1), Parity::Even);
    assert_eq!(Parity::of(4), Parity::Odd);
    assert_eq!(Scope::from(Parity::Even), Scope::Even);
}

#[test]
fn test_page_subset_contains() {
    assert!(PageSubset::All.contains(3));
    assert!(PageSubset::Odd.contains(2));
    assert!(!PageSubset::Odd.contains(3));
    assert!(PageSubset::Even.contains(3));
}

#[test]
fn test_view_mode_classification() {
    assert_eq!(ViewMode::default(), ViewMode::Split);
    assert!(ViewMode::Split.is_parity());
    assert!(ViewMode::OddOnly.is_parity());
    assert!(!ViewMode::All.is_parity());
    assert!(!ViewMode::SinglePreview(0).is_parity());
    assert!(ViewMode::SinglePreview(0).is_preview());
}

#[test]
fn test_pdf_box_normalizes_corners() {
    let b = PdfBox::new(100.0, 50.0, 10.0, 500.0);
    assert_eq!((b.x0, b.y0, b.x1, b.y1), (10.0, 50.0, 100.0, 500.0));
    assert_eq!(b.width(), 90.0);
    assert!(!b.is_degenerate());
    assert!(PdfBox::new(5.0, 5.0, 5.0, 10.0).is_degenerate());
}

#[test]
fn test_error_messages() {
    let err = CropError::PageOutOfRange { index: 7, count: 3 };
    assert_eq!(err.to_string(), "Page 7 is out of range (document has 3 pages)");
    assert!(CropError::InvalidRect { page: 2 }.to_string().contains("page 2"));
}
