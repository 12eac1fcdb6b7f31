use pdf_crop::*;
use proptest::prelude::*;

#[test]
fn test_default_transform_is_identity() {
    let t = Transform::default();
    let p = Point::new(12.5, -3.0);
    assert_eq!(t.page_to_view(p), p);
    assert_eq!(t.view_to_page(p), p);
}

#[test]
fn test_zoom_is_clamped() {
    let t = Transform::new(Point::default(), 1e9);
    assert_eq!(t.zoom(), constants::MAX_ZOOM);

    let mut t = Transform::default();
    for _ in 0..200 {
        t.zoom_about(Point::new(10.0, 10.0), 1.0 / constants::WHEEL_ZOOM_STEP);
    }
    assert_eq!(t.zoom(), constants::MIN_ZOOM);
}

#[test]
fn test_pan_by_shifts_view() {
    let mut t = Transform::new(Point::new(5.0, 5.0), 2.0);
    t.pan_by(10.0, -5.0);
    assert_eq!(t.page_to_view(Point::new(1.0, 1.0)), Point::new(17.0, 2.0));
}

#[test]
fn test_fit_empty_content() {
    let t = Transform::fit(Size::new(0.0, 100.0), Size::new(400.0, 300.0));
    assert_eq!(t, Transform::default());
}

proptest! {
    #[test]
    fn prop_view_page_round_trip(
        x in -5000.0..5000.0f64,
        y in -5000.0..5000.0f64,
        pan_x in -2000.0..2000.0f64,
        pan_y in -2000.0..2000.0f64,
        zoom in 0.02..64.0f64,
    ) {
        let t = Transform::new(Point::new(pan_x, pan_y), zoom);
        let p = Point::new(x, y);
        let back = t.view_to_page(t.page_to_view(p));
        prop_assert!((back.x - p.x).abs() < 1e-6);
        prop_assert!((back.y - p.y).abs() < 1e-6);
    }

    #[test]
    fn prop_round_trip_survives_zoom_and_pan(
        x in -5000.0..5000.0f64,
        y in -5000.0..5000.0f64,
        notches in -20i32..20,
        dx in -500.0..500.0f64,
    ) {
        let mut t = Transform::default();
        t.zoom_about(Point::new(300.0, 200.0), constants::WHEEL_ZOOM_STEP.powi(notches));
        t.pan_by(dx, -dx);
        let p = Point::new(x, y);
        let back = t.view_to_page(t.page_to_view(p));
        prop_assert!((back.x - p.x).abs() < 1e-6);
        prop_assert!((back.y - p.y).abs() < 1e-6);
    }
}
