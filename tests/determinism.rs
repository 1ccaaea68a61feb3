//! Two sessions fed the same scene, seed, and input script must land on
//! identical stage snapshots and identical particle draws.

use scrollweave::{Page, Point, PointerEventKind, Rect, Rgba8, Scene, Surface, Viewport};

#[derive(Default)]
struct Recorder {
    clears: u64,
    circles: Vec<(f64, f64, f64)>,
}

impl Surface for Recorder {
    fn clear(&mut self) {
        self.clears += 1;
    }
    fn fill_circle(&mut self, center: Point, radius: f64, _color: Rgba8) {
        self.circles.push((center.x, center.y, radius));
    }
}

fn scene() -> Scene {
    Scene::from_json(include_str!("data/lumiere_scene.json")).unwrap()
}

fn drive_session(scene: &Scene) -> (Page, Recorder) {
    let mut page = Page::new(scene, Viewport::new(1280.0, 1000.0).unwrap()).unwrap();
    page.set_layout("body", Rect::new(0.0, 0.0, 1280.0, 5200.0));
    page.set_layout("origins", Rect::new(0.0, 1000.0, 1280.0, 2600.0));
    page.set_layout("showcase", Rect::new(0.0, 2600.0, 1280.0, 4200.0));
    page.set_layout("card.0", Rect::new(0.0, 2700.0, 400.0, 3100.0));

    let mut surface = Recorder::default();
    let dt = 1.0 / 60.0;
    for frame in 0..240 {
        let t = frame as f64 * dt;
        page.on_scroll(t * 600.0).unwrap();
        if frame == 90 {
            page.on_pointer("card.0", PointerEventKind::Enter, Point::new(200.0, 100.0))
                .unwrap();
            page.on_pointer("card.0", PointerEventKind::Move, Point::new(350.0, 50.0))
                .unwrap();
        }
        if frame == 150 {
            page.on_pointer("card.0", PointerEventKind::Leave, Point::new(0.0, 0.0))
                .unwrap();
        }
        page.frame(dt, &mut surface).unwrap();
    }
    (page, surface)
}

#[test]
fn identical_sessions_produce_identical_state() {
    let scene = scene();
    let (page_a, rec_a) = drive_session(&scene);
    let (page_b, rec_b) = drive_session(&scene);

    assert_eq!(page_a.stage().snapshot(), page_b.stage().snapshot());
    assert_eq!(rec_a.circles, rec_b.circles);
    assert_eq!(rec_a.clears, 240);
    // Every frame draws the full field.
    assert_eq!(rec_a.circles.len(), 240 * 100);
}

#[test]
fn seed_changes_the_particle_field_only() {
    let base = scene();
    let mut reseeded = scene();
    reseeded.seed = base.seed + 1;

    let (page_a, rec_a) = drive_session(&base);
    let (page_b, rec_b) = drive_session(&reseeded);

    assert_ne!(rec_a.circles, rec_b.circles);
    // The stage never sees the particle field; tween state is unaffected.
    assert_eq!(page_a.stage().snapshot(), page_b.stage().snapshot());
}
