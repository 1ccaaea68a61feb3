//! Pointer interaction through the page dispatch table: concurrent card
//! hovers stay independent, magnets chase and release, and keys without a
//! controller are ignored.

use scrollweave::{Page, Point, PointerEventKind, Prop, Rgba8, Scene, Surface, Viewport};

struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self) {}
    fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba8) {}
}

fn page() -> Page {
    let scene = Scene::from_json(include_str!("data/lumiere_scene.json")).unwrap();
    let mut page = Page::new(&scene, Viewport::new(1280.0, 800.0).unwrap()).unwrap();
    // Two 400x200 cards side by side at the document top, plus a 40x40
    // magnet; at scroll 0 client coordinates equal document coordinates.
    page.set_layout("card.0", scrollweave::Rect::new(0.0, 0.0, 400.0, 200.0));
    page.set_layout("card.1", scrollweave::Rect::new(400.0, 0.0, 800.0, 200.0));
    page.set_layout(
        "social.instagram",
        scrollweave::Rect::new(600.0, 300.0, 640.0, 340.0),
    );
    page
}

fn run(page: &mut Page, seconds: f64) {
    let mut surface = NullSurface;
    let frames = (seconds * 60.0).round() as usize;
    for _ in 0..frames {
        page.frame(1.0 / 60.0, &mut surface).unwrap();
    }
}

fn scalar(page: &Page, key: &str, prop: Prop) -> Option<f64> {
    let id = page.stage().id_of(key)?;
    page.stage().scalar(id, prop)
}

#[test]
fn concurrent_card_hovers_are_independent() {
    let mut page = page();

    // card.0: top-right corner. card.1: halfway left of center.
    page.on_pointer("card.0", PointerEventKind::Move, Point::new(400.0, 0.0))
        .unwrap();
    page.on_pointer("card.1", PointerEventKind::Move, Point::new(500.0, 100.0))
        .unwrap();
    run(&mut page, 1.0);

    assert_eq!(scalar(&page, "card.0.inner", Prop::RotateX), Some(10.0));
    assert_eq!(scalar(&page, "card.0.inner", Prop::RotateY), Some(10.0));
    assert_eq!(scalar(&page, "card.1.inner", Prop::RotateX), Some(0.0));
    assert_eq!(scalar(&page, "card.1.inner", Prop::RotateY), Some(-5.0));

    // Blobs trail their own cursor in card-local coordinates.
    assert_eq!(scalar(&page, "card.0.blob", Prop::BlobX), Some(400.0));
    assert_eq!(scalar(&page, "card.1.blob", Prop::BlobX), Some(100.0));

    // Leaving one card releases only that card.
    page.on_pointer("card.0", PointerEventKind::Leave, Point::new(0.0, 0.0))
        .unwrap();
    run(&mut page, 2.0);
    assert_eq!(scalar(&page, "card.0.inner", Prop::RotateY), Some(0.0));
    assert_eq!(scalar(&page, "card.0.blob", Prop::BlobOpacity), Some(0.0));
    assert_eq!(scalar(&page, "card.1.inner", Prop::RotateY), Some(-5.0));
}

#[test]
fn hover_accents_rise_and_reset() {
    let mut page = page();
    page.on_pointer("card.0", PointerEventKind::Enter, Point::new(200.0, 100.0))
        .unwrap();
    run(&mut page, 1.0);
    assert_eq!(scalar(&page, "card.0.number", Prop::Scale), Some(1.1));
    assert_eq!(scalar(&page, "card.0.name", Prop::TranslateY), Some(-5.0));

    page.on_pointer("card.0", PointerEventKind::Leave, Point::new(0.0, 0.0))
        .unwrap();
    run(&mut page, 2.0);
    assert_eq!(scalar(&page, "card.0.number", Prop::Scale), Some(1.0));
    assert_eq!(scalar(&page, "card.0.name", Prop::TranslateY), Some(0.0));
}

#[test]
fn magnet_chases_at_half_strength_and_releases() {
    let mut page = page();

    // Cursor at local (30, 10): offset (10, -10) from the 40x40 center.
    page.on_pointer(
        "social.instagram",
        PointerEventKind::Move,
        Point::new(630.0, 310.0),
    )
    .unwrap();
    page.on_pointer(
        "social.instagram",
        PointerEventKind::Enter,
        Point::new(630.0, 310.0),
    )
    .unwrap();
    run(&mut page, 1.0);
    assert_eq!(scalar(&page, "social.instagram", Prop::TranslateX), Some(5.0));
    assert_eq!(scalar(&page, "social.instagram", Prop::TranslateY), Some(-5.0));
    assert_eq!(
        scalar(&page, "social.instagram.glyph", Prop::Rotation),
        Some(360.0)
    );

    page.on_pointer(
        "social.instagram",
        PointerEventKind::Leave,
        Point::new(0.0, 0.0),
    )
    .unwrap();
    // Glyph rotation resets instantly so the next entry spins a full turn.
    assert_eq!(
        scalar(&page, "social.instagram.glyph", Prop::Rotation),
        Some(0.0)
    );
    run(&mut page, 2.0);
    assert_eq!(scalar(&page, "social.instagram", Prop::TranslateX), Some(0.0));
    assert_eq!(scalar(&page, "social.instagram", Prop::TranslateY), Some(0.0));
}

#[test]
fn uncontrolled_keys_are_ignored() {
    let mut page = page();

    // card.3 declares no sub-elements, so the capability check skipped it;
    // never-registered keys are equally silent.
    for key in ["card.3", "hero-title", "nonexistent"] {
        for kind in [
            PointerEventKind::Enter,
            PointerEventKind::Move,
            PointerEventKind::Leave,
        ] {
            page.on_pointer(key, kind, Point::new(50.0, 50.0)).unwrap();
        }
    }
    run(&mut page, 0.5);
    let card3 = page.stage().id_of("card.3").unwrap();
    assert_eq!(page.stage().get(card3, Prop::RotateX), None);
}

#[test]
fn card_without_accents_still_tilts() {
    let mut page = page();
    page.set_layout("card.2", scrollweave::Rect::new(800.0, 0.0, 1200.0, 200.0));

    // card.2 has inner and blob but no number or name.
    page.on_pointer("card.2", PointerEventKind::Enter, Point::new(900.0, 50.0))
        .unwrap();
    page.on_pointer("card.2", PointerEventKind::Move, Point::new(1200.0, 0.0))
        .unwrap();
    run(&mut page, 1.0);
    assert_eq!(scalar(&page, "card.2.inner", Prop::RotateY), Some(10.0));

    page.on_pointer("card.2", PointerEventKind::Leave, Point::new(0.0, 0.0))
        .unwrap();
    run(&mut page, 2.0);
    assert_eq!(scalar(&page, "card.2.inner", Prop::RotateY), Some(0.0));
}
