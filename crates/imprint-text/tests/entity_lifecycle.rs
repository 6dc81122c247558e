use imprint_core::math::Vec2;
use imprint_core::{Color, Quad, Size};
use imprint_scene::{EntityKind, MotionEntity, PaintOverride};
use imprint_test_utils::{AllocationEvent, AllocationTracker, BoxLayouter, InkFaults, TrackingAllocator};
use imprint_text::{FontSizeLimits, TextEntity, TextEntityConfig, TextError, TextLayer};
use tiny_skia::Pixmap;

const LONG_TEXT: &str = "Hi there, this is a much longer line of text that wraps";

type TestEntity = TextEntity<BoxLayouter, TrackingAllocator>;

fn entity_with(text: &str, canvas: Size<u32>, config: TextEntityConfig) -> (TestEntity, AllocationTracker) {
    let allocator = TrackingAllocator::new();
    let tracker = allocator.tracker();
    let layer = TextLayer::with_defaults(text, &config.font_limits);
    let entity = TextEntity::create(layer, canvas, BoxLayouter::new(), allocator, config).unwrap();
    (entity, tracker)
}

fn entity(text: &str) -> (TestEntity, AllocationTracker) {
    entity_with(text, Size::new(1000, 1000), TextEntityConfig::default())
}

fn faulty_entity(text: &str) -> (TestEntity, AllocationTracker, InkFaults) {
    let allocator = TrackingAllocator::new();
    let tracker = allocator.tracker();
    let layouter = BoxLayouter::new();
    let faults = layouter.faults();
    let config = TextEntityConfig::default();
    let layer = TextLayer::with_defaults(text, &config.font_limits);
    let entity = TextEntity::create(layer, Size::new(1000, 1000), layouter, allocator, config).unwrap();
    (entity, tracker, faults)
}

fn pixels(entity: &TestEntity) -> Vec<u8> {
    entity.buffer().unwrap().pixmap().data().to_vec()
}

fn buffer_pixel(entity: &TestEntity, x: u32, y: u32) -> [u8; 4] {
    let p = entity.buffer().unwrap().pixmap().pixel(x, y).unwrap();
    [p.red(), p.green(), p.blue(), p.alpha()]
}

fn assert_close(a: Vec2, b: Vec2) {
    assert!((a - b).length() < 1e-2, "{:?} != {:?}", a, b);
}

#[test]
fn identical_edit_reuses_buffer_and_pixels() {
    let (mut entity, tracker) = entity("Hi");
    let id = entity.buffer().unwrap().id();
    let before = pixels(&entity);

    entity.set_text("Hi").unwrap();

    assert_eq!(entity.buffer().unwrap().id(), id);
    assert_eq!(pixels(&entity), before);
    assert_eq!(tracker.allocations(), 1);
    assert_eq!(tracker.releases(), 0);
}

#[test]
fn same_height_edit_clears_and_reuses() {
    let (mut entity, tracker) = entity("A");
    let id = entity.buffer().unwrap().id();

    entity.set_text("B").unwrap();

    assert_eq!(entity.buffer().unwrap().id(), id);
    assert_eq!(tracker.allocations(), 1);
    assert_eq!(entity.text(), "B");
}

#[test]
fn buffer_never_shorter_than_minimum() {
    for canvas_height in [1u32, 7, 99, 1000, 1234] {
        for text in ["", "Hi", LONG_TEXT] {
            let (entity, _) = entity_with(
                text,
                Size::new(1000, canvas_height),
                TextEntityConfig::default(),
            );
            let minimum = canvas_height as f64 * 0.13 - 1e-3;
            assert!(
                entity.height() as f64 >= minimum,
                "{} px canvas, {:?}: {} px buffer",
                canvas_height,
                text,
                entity.height()
            );
        }
    }
}

#[test]
fn buffer_width_is_sixty_percent_of_canvas() {
    for canvas_width in [2u32, 7, 999, 1000, 1001, 1920] {
        for text in ["", LONG_TEXT] {
            let (entity, _) = entity_with(
                text,
                Size::new(canvas_width, 1000),
                TextEntityConfig::default(),
            );
            assert_eq!(entity.width(), canvas_width * 6 / 10);
        }
    }
}

#[test]
fn uniform_scale_maps_buffer_to_canvas_width() {
    for canvas_width in [2u32, 333, 1000, 1080] {
        let (entity, _) = entity_with("Hi", Size::new(canvas_width, 800), TextEntityConfig::default());
        let mapped = entity.uniform_scale() * entity.width() as f32;
        assert!((mapped - canvas_width as f32).abs() < 1e-2);
        assert_eq!(
            entity.corners(),
            Quad::from_size(entity.width() as f32, entity.height() as f32)
        );
    }
}

#[test]
fn no_buffer_survives_dispose() {
    let (mut entity, tracker) = entity("Hi");
    entity.set_text(LONG_TEXT).unwrap();
    entity.increase_font_size().unwrap();
    entity.set_text("").unwrap();
    entity.decrease_font_size().unwrap();
    entity.preview_color(Color::RED).unwrap();

    entity.dispose();

    assert_eq!(tracker.live(), 0);
    assert_eq!(tracker.allocations(), tracker.releases());
    assert_eq!(tracker.unknown_releases(), 0);
}

#[test]
fn dropping_releases_buffer() {
    let (mut entity, tracker) = entity("Hi");
    entity.set_text(LONG_TEXT).unwrap();
    drop(entity);

    assert_eq!(tracker.live(), 0);
    assert_eq!(tracker.unknown_releases(), 0);
}

#[test]
fn dispose_is_idempotent() {
    let (mut entity, tracker) = entity("Hi");

    entity.dispose();
    entity.dispose();
    entity.release();

    assert_eq!(tracker.releases(), 1);
    assert_eq!(entity.width(), 0);
    assert_eq!(entity.height(), 0);
    assert!(entity.buffer().is_none());

    drop(entity);
    assert_eq!(tracker.releases(), 1);
}

#[test]
fn resize_keeps_visual_center() {
    let (mut entity, _) = entity("Hi");
    let target = Vec2::new(400.0, 300.0);
    entity.move_center_to(target);
    entity.transform_mut().rotate_by(30.0);
    entity.transform_mut().scale_by(0.5);
    let height = entity.height();

    entity.set_text(LONG_TEXT).unwrap();

    assert!(entity.height() > height);
    assert_close(entity.absolute_center(), target);
    assert_close(entity.mapped_corners().center(), target);
}

#[test]
fn short_to_long_text_on_square_canvas() {
    let config = TextEntityConfig::default().with_min_height_fraction(0.1);
    let (mut entity, tracker) = entity_with("Hi", Size::new(1000, 1000), config);
    entity.move_to_canvas_center();
    let center = entity.absolute_center();

    assert_eq!(entity.width(), 600);
    assert!(entity.height() >= 100);
    let short_height = entity.height();
    let first = entity.buffer().unwrap().id();

    entity.set_text(LONG_TEXT).unwrap();

    assert_eq!(entity.width(), 600);
    assert!(entity.height() > short_height);
    assert_ne!(entity.buffer().unwrap().id(), first);
    assert!(!tracker.is_live(first));
    assert_eq!(tracker.allocations(), 2);
    assert_eq!(tracker.releases(), 1);
    assert_close(entity.absolute_center(), center);
}

#[test]
fn failed_allocation_keeps_previous_state() {
    let (mut entity, tracker) = entity("Hi");
    let id = entity.buffer().unwrap().id();
    let size = (entity.width(), entity.height());
    let before = pixels(&entity);

    tracker.fail_next(1);
    let err = entity.set_text(LONG_TEXT).unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(entity.buffer().unwrap().id(), id);
    assert_eq!((entity.width(), entity.height()), size);
    assert_eq!(pixels(&entity), before);
    assert_eq!(entity.text(), "Hi");
    assert_eq!(tracker.live(), 1);

    entity.set_text(LONG_TEXT).unwrap();
    assert!(entity.height() > size.1);
    assert_eq!(tracker.live(), 1);
}

#[test]
fn failed_glyph_ink_keeps_buffer_and_geometry() {
    let (mut entity, tracker, faults) = faulty_entity("Hi");
    let id = entity.buffer().unwrap().id();
    let size = (entity.width(), entity.height());
    let corners = entity.corners();
    let scale = entity.uniform_scale();
    let before = pixels(&entity);

    faults.fail_next(1);
    let err = entity.set_text(LONG_TEXT).unwrap_err();

    assert!(matches!(err, TextError::LockPoisoned(_)));
    assert_eq!(entity.text(), "Hi");
    assert_eq!((entity.width(), entity.height()), (600, 130));
    assert_eq!((entity.width(), entity.height()), size);
    assert_eq!(entity.corners(), corners);
    assert_eq!(entity.uniform_scale(), scale);
    assert_eq!(entity.buffer().unwrap().id(), id);
    assert_eq!(pixels(&entity), before);
    assert_eq!(tracker.allocations(), 1);
    assert_eq!(tracker.live(), 1);

    entity.set_text(LONG_TEXT).unwrap();
    assert!(entity.height() > size.1);
    assert!((entity.corners().height() - entity.height() as f32).abs() < 1e-3);
    assert_eq!(tracker.live(), 1);
}

#[test]
fn failed_recolor_keeps_pixels_and_preview() {
    let (mut entity, _, faults) = faulty_entity("Hi");
    entity.transform_mut().set_selected(true);
    let before = pixels(&entity);

    faults.fail_next(1);
    assert!(entity.preview_color(Color::RED).is_err());
    assert_eq!(entity.preview(), None);
    assert_eq!(pixels(&entity), before);

    faults.fail_next(1);
    assert!(entity.commit_color(Color::BLUE).is_err());
    assert_eq!(entity.layer().font().color, Color::BLACK);
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 0, 0, 255]);
}

#[test]
fn failed_override_paints_previous_buffer() {
    let (mut entity, tracker, faults) = faulty_entity("Hi");
    let id = entity.buffer().unwrap().id();
    let mut surface = Pixmap::new(1000, 1000).unwrap();

    faults.fail_next(1);
    entity.paint_current(&mut surface.as_mut(), Some(&PaintOverride::color(Color::GREEN)));

    assert_eq!(entity.buffer().unwrap().id(), id);
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 0, 0, 255]);
    assert!(surface.data().chunks_exact(4).any(|px| px[3] == 255));
    assert_eq!(tracker.allocations(), 1);

    entity.paint_current(&mut surface.as_mut(), Some(&PaintOverride::color(Color::GREEN)));
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 255, 0, 255]);
}

#[test]
fn disposed_entity_stays_released() {
    let (mut entity, tracker) = entity("Hi");
    let id = entity.buffer().unwrap().id();
    let mut surface = Pixmap::new(1000, 1000).unwrap();

    entity.dispose();
    entity.paint_current(&mut surface.as_mut(), None);
    entity.paint_current(&mut surface.as_mut(), Some(&PaintOverride::color(Color::RED)));

    assert!(entity.is_disposed());
    assert!(entity.buffer().is_none());
    assert_eq!(tracker.live(), 0);
    assert_eq!(tracker.allocations(), 1);
    assert_eq!(tracker.events().last(), Some(&AllocationEvent::Released { id }));
    assert!(surface.data().iter().all(|&b| b == 0));

    assert_eq!(entity.set_text(LONG_TEXT), Err(TextError::Disposed));
    assert_eq!(entity.text(), "Hi");
    assert_eq!(entity.preview_color(Color::RED), Err(TextError::Disposed));
    assert_eq!(entity.preview(), None);
    entity.transform_mut().set_selected(true);
    assert_eq!(entity.commit_color(Color::BLUE), Err(TextError::Disposed));
    assert_eq!(entity.update_on_edit(), Err(TextError::Disposed));
    assert_eq!(tracker.allocations(), 1);
}

#[test]
fn oversized_buffer_is_rejected_by_limit() {
    let allocator = TrackingAllocator::with_limit(600 * 200);
    let tracker = allocator.tracker();
    let layer = TextLayer::with_defaults("Hi", &FontSizeLimits::default());
    let mut entity = TextEntity::create(
        layer,
        Size::new(1000, 1000),
        BoxLayouter::new(),
        allocator,
        TextEntityConfig::default(),
    )
    .unwrap();
    let height = entity.height();

    assert!(matches!(
        entity.set_text(LONG_TEXT),
        Err(TextError::BufferAllocation { .. })
    ));
    assert_eq!(entity.height(), height);
    assert_eq!(tracker.failures(), 1);
}

#[test]
fn empty_text_gets_minimum_buffer() {
    let (entity, _) = entity("");
    assert_eq!(entity.width(), 600);
    assert_eq!(entity.height(), 130);
    assert!(entity.buffer().is_some());
}

#[test]
fn unusable_canvas_is_rejected() {
    let allocator = TrackingAllocator::new();
    let tracker = allocator.tracker();
    let layer = TextLayer::with_defaults("Hi", &FontSizeLimits::default());
    let result = TextEntity::create(
        layer,
        Size::new(1, 1000),
        BoxLayouter::new(),
        allocator,
        TextEntityConfig::default(),
    );

    assert!(matches!(result, Err(TextError::InvalidLayoutInput { .. })));
    assert_eq!(tracker.allocations(), 0);
}

#[test]
fn preview_does_not_touch_layer() {
    // Inside the "H" box of "Hi" on the default 600x130 buffer.
    let (mut entity, _) = entity("Hi");
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 0, 0, 255]);

    entity.preview_color(Color::RED).unwrap();
    assert_eq!(entity.layer().font().color, Color::BLACK);
    assert_eq!(entity.preview(), Some(Color::RED));
    assert_eq!(buffer_pixel(&entity, 275, 60), [255, 0, 0, 255]);

    entity.clear_preview().unwrap();
    assert_eq!(entity.preview(), None);
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 0, 0, 255]);
}

#[test]
fn commit_requires_selection() {
    let (mut entity, _) = entity("Hi");
    entity.preview_color(Color::RED).unwrap();

    assert!(!entity.commit_color(Color::BLUE).unwrap());
    assert_eq!(entity.layer().font().color, Color::BLACK);
    assert_eq!(entity.preview(), Some(Color::RED));

    entity.transform_mut().set_selected(true);
    assert!(entity.apply_color_edit(Color::BLUE).unwrap());
    assert_eq!(entity.layer().font().color, Color::BLUE);
    assert_eq!(entity.preview(), None);
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 0, 255, 255]);
}

#[test]
fn paint_override_is_not_committed() {
    let (mut entity, _) = entity("Hi");
    entity.transform_mut().set_selected(true);
    let mut surface = Pixmap::new(1000, 1000).unwrap();

    entity.paint_current(&mut surface.as_mut(), Some(&PaintOverride::color(Color::GREEN)));
    assert_eq!(entity.layer().font().color, Color::BLACK);
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 255, 0, 255]);

    entity.paint_current(&mut surface.as_mut(), None);
    assert_eq!(buffer_pixel(&entity, 275, 60), [0, 0, 0, 255]);
}

#[test]
fn paint_maps_buffer_through_matrix() {
    let (mut entity, _) = entity("Hi");
    let mut surface = Pixmap::new(1000, 1000).unwrap();

    // Buffer point (340, 110) is inside the card below the glyphs. Base scale
    // 1000/600 then the default 0.8 user scale about the center (500, 108.33).
    let expected = Vec2::new(553.333_3, 168.333_3);
    assert_close(
        entity.matrix().transform_point(Vec2::new(340.0, 110.0)),
        expected,
    );

    entity.paint_current(&mut surface.as_mut(), None);
    let inside = surface.pixel(553, 168).unwrap();
    assert_eq!(inside.alpha(), 255);
    assert!(inside.red() >= 250 && inside.green() >= 250 && inside.blue() >= 250);
    assert_eq!(surface.pixel(900, 900).unwrap().alpha(), 0);

    assert!(entity.contains_point(expected));
    assert!(!entity.contains_point(Vec2::new(900.0, 900.0)));
}

#[test]
fn zero_opacity_paints_nothing() {
    let (mut entity, _) = entity("Hi");
    let mut surface = Pixmap::new(1000, 1000).unwrap();

    entity.paint_current(&mut surface.as_mut(), Some(&PaintOverride::opacity(0.0)));

    assert!(surface.data().iter().all(|&b| b == 0));
}

#[test]
fn font_size_steps_within_limits() {
    let limits = FontSizeLimits {
        initial: 0.075,
        step: 0.05,
        min: 0.05,
        max: 0.15,
    };
    let config = TextEntityConfig::default().with_font_limits(limits);
    let (mut entity, _) = entity_with(LONG_TEXT, Size::new(1000, 1000), config);
    let height = entity.height();

    assert!(entity.increase_font_size().unwrap());
    assert!(entity.height() > height);
    assert!(entity.increase_font_size().unwrap());
    assert!(!entity.increase_font_size().unwrap());
    assert_eq!(entity.layer().font().size_fraction, 0.15);

    while entity.decrease_font_size().unwrap() {}
    assert_eq!(entity.layer().font().size_fraction, 0.05);
}

#[test]
fn reports_text_kind() {
    let (entity, _) = entity("Hi");
    assert_eq!(entity.kind(), EntityKind::Text);
    assert_eq!(entity.kind().label(), "Text");
}
