//! End-to-end flows through the page engine.

use kurbo::{Point, Size};
use pageink_core::codec;
use pageink_core::{InkColor, LegacyStroke, PageInk, PointerEvent, SessionState, StrokeStyle};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn page(width: f64, height: f64) -> PageInk {
    init_logging();
    let mut page = PageInk::new(1, Default::default());
    page.set_canvas_size(width, height);
    page
}

fn draw(page: &mut PageInk, points: &[(f64, f64)]) {
    let (first, rest) = points.split_first().expect("at least one point");
    page.handle_pointer(PointerEvent::down(1, first.0, first.1));
    for &(x, y) in rest {
        page.handle_pointer(PointerEvent::moved(1, x, y));
    }
    let last = points.last().expect("at least one point");
    page.handle_pointer(PointerEvent::up(1, last.0, last.1));
}

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
        "{:?} != {:?}",
        a,
        b
    );
}

#[test]
fn test_pen_stroke_persists_normalized() {
    let mut page = page(100.0, 100.0);
    draw(&mut page, &[(10.0, 10.0), (50.0, 50.0), (90.0, 10.0)]);

    assert_eq!(page.strokes().len(), 1);
    assert!(page.has_unsaved_changes());

    let record = page.data_to_persist().expect("ink to persist");
    assert_eq!(record.reference_size(), Size::new(100.0, 100.0));

    let decoded = codec::decode(&record.encoded, Some(record.reference_size()), None).unwrap();
    assert_eq!(decoded.len(), 1);
    let points = decoded.strokes()[0].points();
    assert_eq!(points.len(), 3);
    assert_close(points[0], Point::new(0.1, 0.1));
    assert_close(points[1], Point::new(0.5, 0.5));
    assert_close(points[2], Point::new(0.9, 0.1));
    assert_eq!(decoded.styles()[0], StrokeStyle::pen());
}

#[test]
fn test_undo_redo_order() {
    let mut page = page(100.0, 100.0);
    draw(&mut page, &[(10.0, 10.0), (20.0, 20.0)]);
    draw(&mut page, &[(30.0, 30.0), (40.0, 40.0)]);
    let first = page.strokes().strokes()[0].clone();
    let second = page.strokes().strokes()[1].clone();

    assert!(page.undo());
    assert_eq!(page.strokes().strokes(), &[first.clone()]);
    assert!(page.undo());
    assert!(page.strokes().is_empty());
    assert!(!page.undo());

    assert!(page.redo());
    assert_eq!(page.strokes().strokes(), &[first.clone()]);
    assert!(page.redo());
    assert_eq!(page.strokes().strokes(), &[first, second]);
    assert!(!page.redo());
}

#[test]
fn test_new_stroke_clears_redo() {
    let mut page = page(100.0, 100.0);
    draw(&mut page, &[(10.0, 10.0), (20.0, 20.0)]);
    page.undo();
    assert!(page.can_redo());

    draw(&mut page, &[(50.0, 50.0)]);
    assert!(!page.can_redo());
}

#[test]
fn test_legacy_without_decoder_loads_empty() {
    let mut page = page(100.0, 100.0);
    page.load(&[0x00, 0x01, 0x02, 0x03], Some(Size::new(100.0, 100.0)), None);

    assert!(page.strokes().is_empty());
    assert!(page.rendered().is_empty());
    assert!(!page.has_unsaved_changes());
}

#[test]
fn test_legacy_with_decoder_imports() {
    let decoder = |_: &[u8]| -> Result<Vec<LegacyStroke>, String> {
        Ok(vec![LegacyStroke {
            points: vec![Point::new(25.0, 50.0), Point::new(75.0, 50.0)],
            style: StrokeStyle::pen(),
        }])
    };
    let mut page = page(200.0, 200.0);
    page.load(&[0x00, 0xFF], Some(Size::new(100.0, 100.0)), Some(&decoder));

    assert_eq!(page.strokes().len(), 1);
    assert_eq!(
        page.strokes().strokes()[0].points(),
        &[Point::new(0.25, 0.5), Point::new(0.75, 0.5)]
    );
    assert!(!page.can_undo());

    // Re-saving always writes the portable format.
    draw(&mut page, &[(10.0, 10.0)]);
    let record = page.data_to_persist().unwrap();
    assert_eq!(record.encoded.first(), Some(&b'{'));
}

#[test]
fn test_highlighter_round_trip() {
    let mut page = page(100.0, 100.0);
    page.select_highlighter();
    draw(&mut page, &[(10.0, 50.0), (90.0, 50.0)]);

    let record = page.data_to_persist().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&record.encoded).unwrap();
    assert_eq!(json["strokes"][0]["color"], "#FFFF00");
    assert_eq!(json["strokes"][0]["isHighlighter"], true);

    let mut reloaded = PageInk::new(1, Default::default());
    reloaded.set_canvas_size(100.0, 100.0);
    reloaded.load_record(&record, None);
    let style = reloaded.strokes().styles()[0];
    assert_eq!(style.color, InkColor::YELLOW);
    assert!((style.opacity - 0.5).abs() < f64::EPSILON);
    assert!(style.is_highlighter);
}

#[test]
fn test_rectangle_gesture() {
    let mut page = page(400.0, 200.0);
    page.select_rectangle();
    page.handle_pointer(PointerEvent::down(1, 20.0, 20.0));
    page.handle_pointer(PointerEvent::moved(1, 120.0, 80.0));
    assert_eq!(page.session().state(), SessionState::DrawingRectangle);
    assert!(page.preview().is_some());
    page.handle_pointer(PointerEvent::up(1, 120.0, 80.0));

    assert_eq!(page.strokes().len(), 1);
    let points = page.strokes().strokes()[0].points();
    assert_eq!(points.len(), 5);
    assert_close(points[0], Point::new(0.05, 0.1));
    assert_close(points[1], Point::new(0.3, 0.1));
    assert_close(points[2], Point::new(0.3, 0.4));
    assert_close(points[3], Point::new(0.05, 0.4));
    assert_close(points[4], points[0]);
    assert!(page.preview().is_none());
}

#[test]
fn test_tiny_rectangle_is_discarded() {
    let mut page = page(400.0, 200.0);
    page.select_rectangle();
    page.handle_pointer(PointerEvent::down(1, 20.0, 20.0));
    page.handle_pointer(PointerEvent::up(1, 21.0, 80.0));

    assert!(page.strokes().is_empty());
    assert!(!page.can_undo());
    assert!(!page.has_unsaved_changes());
}

#[test]
fn test_erase_drag_removes_one_per_event() {
    let mut page = page(100.0, 100.0);
    draw(&mut page, &[(50.0, 50.0)]);
    draw(&mut page, &[(50.0, 50.0)]);
    draw(&mut page, &[(50.0, 50.0)]);
    assert_eq!(page.strokes().len(), 3);

    page.select_eraser();
    page.handle_pointer(PointerEvent::down(1, 50.0, 50.0));
    assert_eq!(page.strokes().len(), 2);
    page.handle_pointer(PointerEvent::moved(1, 50.5, 50.0));
    assert_eq!(page.strokes().len(), 1);
    page.handle_pointer(PointerEvent::up(1, 50.5, 50.0));
    assert_eq!(page.strokes().len(), 1);

    assert!(page.undo());
    assert!(page.undo());
    assert_eq!(page.strokes().len(), 3);
}

#[test]
fn test_resize_keeps_ink_relative() {
    let mut page = page(100.0, 100.0);
    draw(&mut page, &[(25.0, 25.0), (75.0, 75.0)]);
    page.set_canvas_size(400.0, 400.0);

    let path = &page.rendered()[0].path;
    assert_eq!(
        path.elements(),
        &[
            kurbo::PathEl::MoveTo(Point::new(100.0, 100.0)),
            kurbo::PathEl::LineTo(Point::new(300.0, 300.0)),
        ]
    );
    assert_eq!(
        page.strokes().strokes()[0].points(),
        &[Point::new(0.25, 0.25), Point::new(0.75, 0.75)]
    );
}
