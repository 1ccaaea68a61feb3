use std::collections::BTreeMap;

use crate::{
    core::{Point, Rect, ScrollOffset, Seconds, Viewport},
    ease::Ease,
    error::WeaveResult,
    menu::MenuController,
    orchestrator::Orchestrator,
    particles::ParticleField,
    pointer::{MagnetController, PointerController},
    scene::Scene,
    scroll::TriggerSet,
    stage::{Prop, Stage, Surface, Value},
    timeline::{Segment, Timeline},
    tween::{Scheduler, TweenSpec},
};

/// Completion tag linking the entrance overlay lift to the hero reveal.
const TAG_ENTRANCE_LIFTED: &str = "entrance.lifted";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Enter,
    Move,
    Leave,
}

#[derive(Clone, Copy, Debug)]
enum PointerTarget {
    Card(usize),
    Magnet(usize),
}

/// One page session: wires the entrance timeline, scroll orchestration,
/// particle field, and pointer controllers over a shared scheduler.
///
/// Everything is per-instance; two pages share no state. The host feeds
/// layout rects, scroll offsets, pointer events, and frame ticks.
pub struct Page {
    viewport: Viewport,
    stage: Stage,
    sched: Scheduler,
    triggers: TriggerSet,
    orchestrator: Orchestrator,
    particles: ParticleField,
    cards: Vec<PointerController>,
    magnets: Vec<MagnetController>,
    /// Declarative dispatch table: element key -> pointer target, built once
    /// at setup.
    pointer_targets: BTreeMap<String, PointerTarget>,
    menu: Option<MenuController>,
    hero: crate::stage::ElementId,
    scroll: ScrollOffset,
    now: Seconds,
}

impl Page {
    #[tracing::instrument(skip_all)]
    pub fn new(scene: &Scene, viewport: Viewport) -> WeaveResult<Self> {
        scene.validate()?;

        let mut stage = Stage::new();
        let mut triggers = TriggerSet::new();
        let mut sched = Scheduler::new();

        let orchestrator = Orchestrator::build(scene, &mut triggers, &mut stage)?;

        // Register the declared card/magnet sub-elements so capability
        // checks reflect the scene, then attach controllers. Cards missing
        // inner or blob silently get none.
        let mut pointer_targets = BTreeMap::new();
        let mut cards = Vec::new();
        for spec in &scene.showcase.cards {
            for key in [&spec.inner, &spec.blob, &spec.number, &spec.name]
                .into_iter()
                .flatten()
            {
                stage.register(key);
            }
            if let Some(ctrl) = PointerController::attach(spec, &mut stage) {
                pointer_targets.insert(spec.key.clone(), PointerTarget::Card(cards.len()));
                cards.push(ctrl);
            }
        }
        let mut magnets = Vec::new();
        for spec in &scene.magnets {
            stage.register(&spec.key);
            if let Some(glyph) = &spec.glyph {
                stage.register(glyph);
            }
            if let Some(ctrl) = MagnetController::attach(spec, &mut stage) {
                pointer_targets.insert(spec.key.clone(), PointerTarget::Magnet(magnets.len()));
                magnets.push(ctrl);
            }
        }

        let menu = scene
            .menu
            .as_ref()
            .map(|spec| MenuController::attach(spec, &mut stage));

        let particles = ParticleField::new(
            scene.particle_count,
            viewport,
            scene.particle_color,
            scene.seed,
        )?;

        // Cinematic entrance: brand glow, overlay lift, then hero reveal
        // chained off the lift's completion tag.
        let brand = stage.register(&scene.entrance.brand);
        let overlay = stage.register(&scene.entrance.overlay);
        let hero = stage.register(&scene.entrance.hero);
        stage.set(brand, Prop::Opacity, Value::Scalar(0.0));
        Timeline::new()
            .then(
                Segment::new(vec![TweenSpec::to(
                    brand,
                    Prop::Opacity,
                    Value::Scalar(1.0),
                    2.0,
                    Ease::OutQuart,
                )])
                .with_delay(0.5),
            )
            .then(
                Segment::new(vec![TweenSpec::to(
                    overlay,
                    Prop::TranslateY,
                    Value::Scalar(-100.0),
                    1.5,
                    Ease::InOutExpo,
                )])
                .with_delay(1.0)
                .with_tag(TAG_ENTRANCE_LIFTED),
            )
            .play(&mut sched, 0.0)?;

        Ok(Self {
            viewport,
            stage,
            sched,
            triggers,
            orchestrator,
            particles,
            cards,
            magnets,
            pointer_targets,
            menu,
            hero,
            scroll: 0.0,
            now: 0.0,
        })
    }

    pub fn now(&self) -> Seconds {
        self.now
    }

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Host-supplied document-space layout for a known element. Unknown keys
    /// are ignored: layout for elements outside the scene is none of ours.
    pub fn set_layout(&mut self, key: &str, rect: Rect) {
        if let Some(id) = self.stage.id_of(key) {
            self.stage.set_layout(id, rect);
        }
    }

    /// One animation frame: advance the particle field and every in-flight
    /// tween, then re-evaluate triggers (layout may have moved under us).
    pub fn frame(&mut self, dt: Seconds, surface: &mut dyn Surface) -> WeaveResult<()> {
        self.now += dt;
        self.particles.advance();
        self.particles.render(surface);

        let tags = self.sched.advance(self.now, &mut self.stage);
        for tag in tags {
            self.dispatch_tag(&tag)?;
        }
        self.evaluate_triggers()
    }

    /// Scroll event: cheap re-evaluation of every trigger at the new offset.
    pub fn on_scroll(&mut self, offset: ScrollOffset) -> WeaveResult<()> {
        self.scroll = offset;
        self.evaluate_triggers()
    }

    /// Pointer event dispatch. Keys without a controller (absent from the
    /// scene, or skipped by the capability check) are silently ignored.
    pub fn on_pointer(
        &mut self,
        key: &str,
        kind: PointerEventKind,
        client: Point,
    ) -> WeaveResult<()> {
        let Some(target) = self.pointer_targets.get(key).copied() else {
            return Ok(());
        };
        match (target, kind) {
            (PointerTarget::Card(i), PointerEventKind::Move) => self.cards[i].pointer_move(
                client,
                self.scroll,
                self.now,
                &mut self.sched,
                &self.stage,
            ),
            (PointerTarget::Card(i), PointerEventKind::Enter) => {
                self.cards[i].pointer_enter(self.now, &mut self.sched)
            }
            (PointerTarget::Card(i), PointerEventKind::Leave) => {
                self.cards[i].pointer_leave(self.now, &mut self.sched)
            }
            (PointerTarget::Magnet(i), PointerEventKind::Move) => self.magnets[i].pointer_move(
                client,
                self.scroll,
                self.now,
                &mut self.sched,
                &self.stage,
            ),
            (PointerTarget::Magnet(i), PointerEventKind::Enter) => {
                self.magnets[i].pointer_enter(self.now, &mut self.sched)
            }
            (PointerTarget::Magnet(i), PointerEventKind::Leave) => {
                self.magnets[i].pointer_leave(self.now, &mut self.sched, &mut self.stage)
            }
        }
    }

    pub fn toggle_menu(&mut self) -> WeaveResult<bool> {
        match self.menu.as_mut() {
            Some(menu) => menu.toggle(self.now, &mut self.sched),
            None => Ok(false),
        }
    }

    pub fn click_menu_link(&mut self) -> WeaveResult<()> {
        if let Some(menu) = self.menu.as_mut() {
            menu.close_if_open(self.now, &mut self.sched)?;
        }
        Ok(())
    }

    fn evaluate_triggers(&mut self) -> WeaveResult<()> {
        let events = self.triggers.evaluate(self.scroll, self.viewport, &self.stage);
        for event in events {
            self.orchestrator
                .handle(event, self.now, &mut self.sched, &mut self.stage)?;
        }
        Ok(())
    }

    fn dispatch_tag(&mut self, tag: &str) -> WeaveResult<()> {
        if tag == TAG_ENTRANCE_LIFTED {
            tracing::debug!("entrance lifted; revealing hero");
            self.sched.schedule(
                TweenSpec::from_to(
                    self.hero,
                    Prop::TranslateY,
                    Value::Scalar(100.0),
                    Value::Scalar(0.0),
                    1.5,
                    Ease::OutQuart,
                ),
                self.now,
            )?;
            self.sched.schedule(
                TweenSpec::from_to(
                    self.hero,
                    Prop::Opacity,
                    Value::Scalar(0.0),
                    Value::Scalar(1.0),
                    1.5,
                    Ease::OutQuart,
                ),
                self.now,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rgba8;
    use crate::scene::sample_scene;

    struct NullSurface;
    impl Surface for NullSurface {
        fn clear(&mut self) {}
        fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba8) {}
    }

    fn page() -> Page {
        let scene = sample_scene();
        let viewport = Viewport::new(1280.0, 1000.0).unwrap();
        let mut page = Page::new(&scene, viewport).unwrap();
        page.set_layout("body", Rect::new(0.0, 0.0, 1280.0, 5000.0));
        page.set_layout("origins", Rect::new(0.0, 1000.0, 1280.0, 2600.0));
        page.set_layout("showcase", Rect::new(0.0, 2600.0, 1280.0, 4200.0));
        page.set_layout("card.0", Rect::new(100.0, 2700.0, 500.0, 2900.0));
        page
    }

    fn run(page: &mut Page, seconds: f64) {
        let mut surface = NullSurface;
        let frames = (seconds / (1.0 / 60.0)).round() as usize;
        for _ in 0..frames {
            page.frame(1.0 / 60.0, &mut surface).unwrap();
        }
    }

    #[test]
    fn entrance_chains_into_hero_reveal() {
        let mut page = page();
        let stage_id = |p: &Page, k: &str| p.stage().id_of(k).unwrap();
        let brand = stage_id(&page, "brand-name");
        let hero = stage_id(&page, "hero-title");

        run(&mut page, 1.0);
        let mid_brand = page.stage().scalar(brand, Prop::Opacity).unwrap();
        assert!(mid_brand > 0.0 && mid_brand < 1.0);
        assert_eq!(page.stage().get(hero, Prop::Opacity), None);

        // Brand ends at 2.5s, overlay lift runs 3.5..5.0, hero after that.
        run(&mut page, 4.2);
        assert_eq!(page.stage().scalar(brand, Prop::Opacity), Some(1.0));
        let hero_mid = page.stage().scalar(hero, Prop::Opacity).unwrap();
        assert!(hero_mid < 1.0);

        run(&mut page, 2.0);
        assert_eq!(page.stage().scalar(hero, Prop::Opacity), Some(1.0));
        assert_eq!(page.stage().scalar(hero, Prop::TranslateY), Some(0.0));

        let overlay = stage_id(&page, "entrance");
        assert_eq!(page.stage().scalar(overlay, Prop::TranslateY), Some(-100.0));
    }

    #[test]
    fn scroll_drives_orchestration_through_page() {
        let mut page = page();
        page.on_scroll(2250.0).unwrap();
        run(&mut page, 3.0);

        let body = page.stage().id_of("body").unwrap();
        let dark = Rgba8::from_hex("#3B2F2F").unwrap();
        let light = Rgba8::from_hex("#F8F5F2").unwrap();
        let mid = page.stage().color(body, Prop::BackgroundColor).unwrap();
        assert_ne!(mid, dark);
        assert_ne!(mid, light);

        // Card reveal fired on the way (zone starts at 1900).
        let card = page.stage().id_of("card.0").unwrap();
        assert_eq!(page.stage().scalar(card, Prop::Opacity), Some(1.0));
    }

    #[test]
    fn pointer_events_dispatch_by_key() {
        let mut page = page();
        page.on_scroll(2700.0).unwrap();
        // card.0 spans document y 2700..2900; at scroll 2700 its top is at
        // viewport 0, so client (300, 100) is the card center.
        page.on_pointer("card.0", PointerEventKind::Move, Point::new(480.0, 40.0))
            .unwrap();
        run(&mut page, 2.0);

        let inner = page.stage().id_of("card.0.inner").unwrap();
        let ry = page.stage().scalar(inner, Prop::RotateY).unwrap();
        assert!(ry > 0.0);

        page.on_pointer("card.0", PointerEventKind::Leave, Point::new(0.0, 0.0))
            .unwrap();
        run(&mut page, 2.0);
        assert_eq!(page.stage().scalar(inner, Prop::RotateY), Some(0.0));

        // Unknown keys and capability-skipped cards are silent.
        page.on_pointer("nope", PointerEventKind::Move, Point::new(0.0, 0.0))
            .unwrap();
    }

    #[test]
    fn menu_round_trip() {
        let mut page = page();
        assert!(page.toggle_menu().unwrap());
        run(&mut page, 1.5);
        let link = page.stage().id_of("menu.link.0").unwrap();
        assert_eq!(page.stage().scalar(link, Prop::Opacity), Some(1.0));
        page.click_menu_link().unwrap();
        run(&mut page, 1.0);
        assert_eq!(page.stage().scalar(link, Prop::Opacity), Some(0.0));
    }

    #[test]
    fn capability_check_skips_incomplete_cards() {
        let mut scene = sample_scene();
        scene.showcase.cards[2].inner = None;
        let viewport = Viewport::new(1280.0, 1000.0).unwrap();
        let page = Page::new(&scene, viewport).unwrap();
        assert!(!page.pointer_targets.contains_key("card.2"));
        assert!(page.pointer_targets.contains_key("card.1"));
    }
}
