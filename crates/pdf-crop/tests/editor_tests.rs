use pdf_crop::*;
use proptest::prelude::*;

const PAGE: Size = Size {
    width: 600.0,
    height: 800.0,
};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect(l: f64, t: f64, r: f64, b: f64) -> CropRect {
    CropRect::new(l, t, r, b).unwrap()
}

fn edges(r: CropRect) -> [f64; 4] {
    r.into()
}

/// An editor holding `r`, viewed at zoom 1 with no pan
fn editor_with(r: CropRect) -> (RectEditor, Transform) {
    let mut editor = RectEditor::new(PAGE);
    editor.set_rect(Some(r));
    (editor, Transform::default())
}

fn gesture(editor: &mut RectEditor, t: &Transform, from: Point, to: Point) -> EditOutcome {
    editor.press(from, t);
    editor.drag(to, t);
    editor.release(to, t)
}

#[test]
fn test_draw_new_rect() {
    let mut editor = RectEditor::new(PAGE);
    let t = Transform::default();

    editor.press(p(300.0, 400.0), &t);
    assert!(matches!(editor.gesture(), Gesture::Drawing { .. }));
    editor.drag(p(100.0, 100.0), &t);
    assert_eq!(editor.display_rect().map(edges), Some([100.0, 100.0, 300.0, 400.0]));

    let outcome = editor.release(p(100.0, 100.0), &t);
    assert_eq!(outcome, EditOutcome::Committed(rect(100.0, 100.0, 300.0, 400.0)));
    assert!(editor.is_idle());
}

#[test]
fn test_drawing_is_clamped_to_page() {
    let mut editor = RectEditor::new(PAGE);
    let t = Transform::default();

    gesture(&mut editor, &t, p(500.0, 700.0), p(900.0, 1200.0));
    assert_eq!(editor.rect().map(edges), Some([500.0, 700.0, 600.0, 800.0]));
}

#[test]
fn test_click_without_drag_clears() {
    let (mut editor, t) = editor_with(rect(100.0, 100.0, 200.0, 200.0));

    let outcome = gesture(&mut editor, &t, p(400.0, 400.0), p(400.0, 400.0));
    assert_eq!(outcome, EditOutcome::Cleared);
    assert!(editor.rect().is_none());
}

#[test]
fn test_hit_test_prefers_corners() {
    let (editor, _) = editor_with(rect(100.0, 100.0, 300.0, 300.0));

    assert_eq!(editor.hit_test(p(101.0, 102.0), 4.0), Hit::Handle(Handle::TopLeft));
    assert_eq!(editor.hit_test(p(299.0, 298.0), 4.0), Hit::Handle(Handle::BottomRight));
    assert_eq!(editor.hit_test(p(200.0, 98.0), 4.0), Hit::Handle(Handle::Top));
    assert_eq!(editor.hit_test(p(302.0, 200.0), 4.0), Hit::Handle(Handle::Right));
    assert_eq!(editor.hit_test(p(200.0, 200.0), 4.0), Hit::Body);
    assert_eq!(editor.hit_test(p(50.0, 50.0), 4.0), Hit::Outside);
    assert_eq!(editor.hit_test(p(200.0, 305.0), 4.0), Hit::Outside);
}

#[test]
fn test_handle_margin_follows_zoom() {
    let (editor, _) = editor_with(rect(100.0, 100.0, 300.0, 300.0));

    // 4 view pixels at zoom 4 is one page unit
    let zoomed = Transform::new(Point::default(), 4.0);
    assert_eq!(editor.hit_test_view(p(400.0 - 3.0, 800.0), &zoomed), Hit::Handle(Handle::Left));
    assert_eq!(editor.hit_test_view(p(400.0 + 8.0, 800.0), &zoomed), Hit::Body);

    // and twenty page units at zoom 0.2
    let zoomed_out = Transform::new(Point::default(), 0.2);
    assert_eq!(editor.hit_test_view(p(20.0 + 3.0, 40.0), &zoomed_out), Hit::Handle(Handle::Left));
}

#[test]
fn test_drag_moves_rect() {
    let (mut editor, t) = editor_with(rect(100.0, 100.0, 200.0, 200.0));

    editor.press(p(150.0, 150.0), &t);
    assert!(matches!(editor.gesture(), Gesture::Dragging { .. }));
    editor.drag(p(170.0, 130.0), &t);
    let outcome = editor.release(p(170.0, 130.0), &t);

    assert_eq!(outcome, EditOutcome::Committed(rect(120.0, 80.0, 220.0, 180.0)));
}

#[test]
fn test_drag_stays_inside_page() {
    let (mut editor, t) = editor_with(rect(100.0, 100.0, 200.0, 200.0));

    gesture(&mut editor, &t, p(150.0, 150.0), p(-500.0, 5000.0));
    assert_eq!(editor.rect().map(edges), Some([0.0, 700.0, 100.0, 800.0]));
}

#[test]
fn test_resize_moves_only_owned_edges() {
    let (mut editor, t) = editor_with(rect(100.0, 100.0, 300.0, 300.0));

    editor.press(p(300.0, 200.0), &t);
    assert!(matches!(
        editor.gesture(),
        Gesture::Resizing {
            handle: Handle::Right,
            ..
        }
    ));
    editor.release(p(350.0, 250.0), &t);
    assert_eq!(editor.rect().map(edges), Some([100.0, 100.0, 350.0, 300.0]));

    gesture(&mut editor, &t, p(100.0, 100.0), p(50.0, 60.0));
    assert_eq!(editor.rect().map(edges), Some([50.0, 60.0, 350.0, 300.0]));
}

#[test]
fn test_resize_never_inverts() {
    let (mut editor, t) = editor_with(rect(100.0, 100.0, 300.0, 300.0));

    gesture(&mut editor, &t, p(100.0, 200.0), p(900.0, 200.0));
    let r = editor.rect().unwrap();
    assert!(r.left() < r.right());
    assert_eq!(r.right(), 300.0);
    assert_eq!(r.width(), constants::MIN_EXTENT);
}

#[test]
fn test_cancel_restores_previous_rect() {
    let original = rect(100.0, 100.0, 200.0, 200.0);
    let (mut editor, t) = editor_with(original);

    editor.press(p(150.0, 150.0), &t);
    editor.drag(p(400.0, 400.0), &t);
    editor.cancel();
    assert_eq!(editor.rect(), Some(original));
    assert!(editor.is_idle());

    editor.press(p(500.0, 500.0), &t);
    editor.drag(p(550.0, 550.0), &t);
    assert!(editor.rect().is_none());
    editor.cancel();
    assert_eq!(editor.rect(), Some(original));
}

#[test]
fn test_events_use_page_space() {
    let mut editor = RectEditor::new(PAGE);
    let t = Transform::new(Point::new(50.0, 20.0), 2.0);

    gesture(&mut editor, &t, p(250.0, 220.0), p(450.0, 420.0));
    assert_eq!(editor.rect().map(edges), Some([100.0, 100.0, 200.0, 200.0]));

    let (tl, br) = editor.view_rect(&t).unwrap();
    assert_eq!((tl, br), (p(250.0, 220.0), p(450.0, 420.0)));
}

#[test]
fn test_unchanged_when_nothing_moved() {
    let (mut editor, t) = editor_with(rect(100.0, 100.0, 200.0, 200.0));
    let outcome = gesture(&mut editor, &t, p(150.0, 150.0), p(150.0, 150.0));
    assert_eq!(outcome, EditOutcome::Unchanged);
}

#[test]
fn test_selection_links_parity_sizes() {
    let mut selection = CropSelection::new(PAGE);
    selection.set_link_parity_sizes(true);
    let t = Transform::default();

    let outcome = gesture(selection.editor_mut(Scope::Odd), &t, p(10.0, 10.0), p(110.0, 210.0));
    selection.after_edit(Scope::Odd, outcome);
    // Even had nothing: the whole rectangle is copied
    assert_eq!(selection.editor(Scope::Even).rect().map(edges), Some([10.0, 10.0, 110.0, 210.0]));

    selection.editor_mut(Scope::Even).set_rect(Some(rect(300.0, 300.0, 400.0, 500.0)));
    let outcome = gesture(selection.editor_mut(Scope::Odd), &t, p(110.0, 210.0), p(160.0, 260.0));
    selection.after_edit(Scope::Odd, outcome);
    // Even keeps its position and takes the new size
    assert_eq!(selection.editor(Scope::Even).rect().map(edges), Some([300.0, 300.0, 450.0, 550.0]));
}

#[test]
fn test_selection_without_link_keeps_parities_independent() {
    let mut selection = CropSelection::new(PAGE);
    let t = Transform::default();

    let outcome = gesture(selection.editor_mut(Scope::Odd), &t, p(10.0, 10.0), p(110.0, 210.0));
    selection.after_edit(Scope::Odd, outcome);
    assert!(selection.editor(Scope::Even).rect().is_none());
}

#[test]
fn test_scoped_rects_follow_view_mode() {
    let mut selection = CropSelection::new(PAGE);
    selection.editor_mut(Scope::All).set_rect(Some(rect(1.0, 2.0, 3.0, 4.0)));
    selection.editor_mut(Scope::Even).set_rect(Some(rect(5.0, 6.0, 7.0, 8.0)));

    assert_eq!(
        selection.scoped_rects(ViewMode::All),
        ScopedRects::All {
            rect: Some(rect(1.0, 2.0, 3.0, 4.0))
        }
    );
    assert_eq!(
        selection.scoped_rects(ViewMode::Split),
        ScopedRects::Parity {
            odd: None,
            even: Some(rect(5.0, 6.0, 7.0, 8.0))
        }
    );
}

#[test]
fn test_switching_overlay_carries_rect() {
    let mut selection = CropSelection::new(PAGE);
    selection.editor_mut(Scope::All).set_rect(Some(rect(10.0, 10.0, 50.0, 50.0)));

    selection.switch_overlay(ViewMode::All, ViewMode::Split);
    assert_eq!(selection.editor(Scope::Odd).rect(), Some(rect(10.0, 10.0, 50.0, 50.0)));
    assert!(selection.editor(Scope::Even).rect().is_none());

    selection.editor_mut(Scope::Odd).set_rect(Some(rect(20.0, 20.0, 60.0, 60.0)));
    selection.switch_overlay(ViewMode::Split, ViewMode::All);
    assert_eq!(selection.editor(Scope::All).rect(), Some(rect(20.0, 20.0, 60.0, 60.0)));
}

#[test]
fn test_switching_overlay_linked_sizes_even() {
    let mut selection = CropSelection::new(PAGE);
    selection.set_link_parity_sizes(true);
    selection.editor_mut(Scope::All).set_rect(Some(rect(10.0, 10.0, 50.0, 50.0)));

    // Empty even editor takes the whole rectangle
    selection.switch_overlay(ViewMode::All, ViewMode::Split);
    assert_eq!(selection.editor(Scope::Odd).rect(), Some(rect(10.0, 10.0, 50.0, 50.0)));
    assert_eq!(selection.editor(Scope::Even).rect(), Some(rect(10.0, 10.0, 50.0, 50.0)));

    // Existing even rectangle keeps its position and takes the new size
    selection.switch_overlay(ViewMode::Split, ViewMode::All);
    selection.editor_mut(Scope::All).set_rect(Some(rect(0.0, 0.0, 80.0, 60.0)));
    selection.editor_mut(Scope::Even).set_rect(Some(rect(100.0, 200.0, 120.0, 220.0)));
    selection.switch_overlay(ViewMode::All, ViewMode::OddOnly);
    assert_eq!(selection.editor(Scope::Odd).rect(), Some(rect(0.0, 0.0, 80.0, 60.0)));
    assert_eq!(selection.editor(Scope::Even).rect(), Some(rect(100.0, 200.0, 180.0, 260.0)));
}

#[test]
fn test_scoped_rects_in_points() {
    let rects = ScopedRects::All {
        rect: Some(rect(15.0, 30.0, 150.0, 300.0)),
    };
    assert_eq!(
        rects.in_points(1.5),
        ScopedRects::All {
            rect: Some(rect(10.0, 20.0, 100.0, 200.0))
        }
    );
}

#[derive(Debug, Clone)]
enum Step {
    Press(f64, f64),
    Drag(f64, f64),
    Release(f64, f64),
    Cancel,
}

fn step() -> impl Strategy<Value = Step> {
    let coord = || -200.0..1000.0f64;
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| Step::Press(x, y)),
        (coord(), coord()).prop_map(|(x, y)| Step::Drag(x, y)),
        (coord(), coord()).prop_map(|(x, y)| Step::Release(x, y)),
        Just(Step::Cancel),
    ]
}

proptest! {
    #[test]
    fn prop_rect_is_valid_after_any_gesture_sequence(
        steps in prop::collection::vec(step(), 1..40),
        zoom in 0.1..8.0f64,
        pan_x in -300.0..300.0f64,
        pan_y in -300.0..300.0f64,
    ) {
        let mut editor = RectEditor::new(PAGE);
        let t = Transform::new(Point::new(pan_x, pan_y), zoom);

        for s in steps {
            match s {
                Step::Press(x, y) => editor.press(p(x, y), &t),
                Step::Drag(x, y) => editor.drag(p(x, y), &t),
                Step::Release(x, y) => {
                    editor.release(p(x, y), &t);
                }
                Step::Cancel => editor.cancel(),
            }
            if let Some(r) = editor.display_rect() {
                prop_assert!(r.left() < r.right() && r.top() < r.bottom());
                prop_assert!(r.left() >= 0.0 && r.top() >= 0.0);
                prop_assert!(r.right() <= PAGE.width && r.bottom() <= PAGE.height);
            }
        }
    }
}
