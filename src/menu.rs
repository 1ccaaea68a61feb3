use crate::{
    core::Seconds,
    ease::Ease,
    error::WeaveResult,
    scene::MenuSpec,
    stage::{ElementId, Prop, Stage, Value},
    timeline::{Segment, Timeline},
    tween::{Scheduler, TweenSpec},
};

const OPEN_SECS: Seconds = 0.4;
const OPEN_STAGGER: Seconds = 0.08;
const OPEN_DELAY: Seconds = 0.15;
const CLOSE_SECS: Seconds = 0.2;
const CLOSE_STAGGER: Seconds = 0.03;

/// Dropdown menu with staggered link animation.
///
/// Open state is carried per controller instance, so independent menus
/// coexist without interference.
#[derive(Clone, Debug)]
pub struct MenuController {
    links: Vec<ElementId>,
    open: bool,
}

impl MenuController {
    pub fn attach(spec: &MenuSpec, stage: &mut Stage) -> Self {
        let links = spec.links.iter().map(|k| stage.register(k)).collect();
        Self { links, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<bool> {
        self.open = !self.open;
        tracing::debug!(open = self.open, "menu toggled");
        if self.open {
            self.play_open(now, sched)?;
        } else {
            self.play_close(now, sched)?;
        }
        Ok(self.open)
    }

    /// Link-click path: collapse only when currently open.
    pub fn close_if_open(&mut self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        if self.open {
            self.open = false;
            self.play_close(now, sched)?;
        }
        Ok(())
    }

    fn play_open(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        let tweens = self
            .links
            .iter()
            .flat_map(|link| {
                [
                    TweenSpec::from_to(
                        *link,
                        Prop::TranslateY,
                        Value::Scalar(-20.0),
                        Value::Scalar(0.0),
                        OPEN_SECS,
                        Ease::OutCubic,
                    ),
                    TweenSpec::from_to(
                        *link,
                        Prop::Opacity,
                        Value::Scalar(0.0),
                        Value::Scalar(1.0),
                        OPEN_SECS,
                        Ease::OutCubic,
                    ),
                ]
            })
            .collect();
        Timeline::new()
            .then(
                link_segment(tweens, OPEN_STAGGER)
                    .with_delay(OPEN_DELAY),
            )
            .play(sched, now)
    }

    fn play_close(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        let tweens = self
            .links
            .iter()
            .flat_map(|link| {
                [
                    TweenSpec::to(*link, Prop::TranslateY, Value::Scalar(-10.0), CLOSE_SECS, Ease::InQuad),
                    TweenSpec::to(*link, Prop::Opacity, Value::Scalar(0.0), CLOSE_SECS, Ease::InQuad),
                ]
            })
            .collect();
        Timeline::new()
            .then(link_segment(tweens, CLOSE_STAGGER))
            .play(sched, now)
    }
}

/// Two tweens per link share one stagger step.
fn link_segment(mut tweens: Vec<TweenSpec>, stagger: Seconds) -> Segment {
    for (i, tw) in tweens.iter_mut().enumerate() {
        tw.delay += (i / 2) as f64 * stagger;
    }
    Segment::new(tweens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (MenuController, Stage, Scheduler) {
        let mut stage = Stage::new();
        let spec = MenuSpec {
            button: "menu-btn".into(),
            panel: "mobile-menu".into(),
            links: vec!["link.0".into(), "link.1".into(), "link.2".into()],
        };
        let menu = MenuController::attach(&spec, &mut stage);
        (menu, stage, Scheduler::new())
    }

    #[test]
    fn toggle_opens_with_staggered_links() {
        let (mut menu, mut stage, mut sched) = setup();
        assert!(menu.toggle(0.0, &mut sched).unwrap());
        assert!(menu.is_open());

        let l0 = stage.id_of("link.0").unwrap();
        let l2 = stage.id_of("link.2").unwrap();

        // Before the 0.15s delay: resting state painted, nothing moving.
        sched.advance(0.05, &mut stage);
        assert_eq!(stage.scalar(l0, Prop::Opacity), Some(0.0));

        // After link 0 starts but before link 2 does (0.15 + 2*0.08 = 0.31).
        sched.advance(0.25, &mut stage);
        assert!(stage.scalar(l0, Prop::Opacity).unwrap() > 0.0);
        assert_eq!(stage.scalar(l2, Prop::Opacity), Some(0.0));

        sched.advance(2.0, &mut stage);
        assert_eq!(stage.scalar(l2, Prop::Opacity), Some(1.0));
        assert_eq!(stage.scalar(l2, Prop::TranslateY), Some(0.0));
    }

    #[test]
    fn toggle_twice_closes() {
        let (mut menu, mut stage, mut sched) = setup();
        menu.toggle(0.0, &mut sched).unwrap();
        sched.advance(2.0, &mut stage);
        assert!(!menu.toggle(2.0, &mut sched).unwrap());
        sched.advance(4.0, &mut stage);

        let l1 = stage.id_of("link.1").unwrap();
        assert_eq!(stage.scalar(l1, Prop::Opacity), Some(0.0));
        assert_eq!(stage.scalar(l1, Prop::TranslateY), Some(-10.0));
    }

    #[test]
    fn close_if_open_is_noop_when_closed() {
        let (mut menu, mut stage, mut sched) = setup();
        menu.close_if_open(0.0, &mut sched).unwrap();
        assert_eq!(sched.in_flight(), 0);

        menu.toggle(0.0, &mut sched).unwrap();
        menu.close_if_open(1.0, &mut sched).unwrap();
        assert!(!menu.is_open());
        sched.advance(3.0, &mut stage);
        let l0 = stage.id_of("link.0").unwrap();
        assert_eq!(stage.scalar(l0, Prop::Opacity), Some(0.0));
    }

    #[test]
    fn instances_are_independent() {
        let mut stage = Stage::new();
        let mut sched = Scheduler::new();
        let mut a = MenuController::attach(
            &MenuSpec {
                button: "a.btn".into(),
                panel: "a.panel".into(),
                links: vec!["a.link".into()],
            },
            &mut stage,
        );
        let b = MenuController::attach(
            &MenuSpec {
                button: "b.btn".into(),
                panel: "b.panel".into(),
                links: vec!["b.link".into()],
            },
            &mut stage,
        );
        a.toggle(0.0, &mut sched).unwrap();
        assert!(a.is_open());
        assert!(!b.is_open());
    }
}
