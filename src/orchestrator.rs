use std::collections::BTreeSet;

use crate::{
    core::Seconds,
    ease::Ease,
    error::{WeaveError, WeaveResult},
    scene::{Palette, Scene},
    scroll::{TriggerEvent, TriggerEventKind, TriggerId, TriggerPoint, TriggerSet, TriggerSpec},
    stage::{ElementId, Prop, Stage, Value},
    timeline::{Segment, Timeline},
    tween::{Scheduler, TweenSpec},
};

const CARD_REST_OFFSET: f64 = 150.0;
const CARD_REVEAL_SECS: Seconds = 1.2;
const CARD_STAGGER_SECS: Seconds = 0.15;
const WORD_STAGGER_SECS: Seconds = 0.12;
const PARALLAX_FACTOR: f64 = 0.20;

fn scalar(v: f64) -> Value {
    Value::Scalar(v)
}

/// Composite motion profile for the showcase/origins section pair: one
/// value object owning the three scroll-keyed effects (color crossfade,
/// parallax, staggered reveal) plus the recovered origins reveal and footer
/// progress scrubs. Each effect owns its `(element, prop)` slots
/// exclusively; `build` rejects overlapping claims.
#[derive(Clone, Debug)]
pub struct Orchestrator {
    color_scrub: TriggerId,
    parallax_scrub: TriggerId,
    card_reveal: TriggerId,
    origins_reveal: TriggerId,
    footer_scrub: Option<TriggerId>,

    surfaces: Vec<ElementId>,
    palette_dark: Palette,
    palette_light: Palette,
    origins: ElementId,
    origins_image_container: Option<ElementId>,
    origins_image: Option<ElementId>,
    origins_words: Vec<ElementId>,
    origins_label: Option<ElementId>,
    origins_body: Option<ElementId>,
    origins_cta: Option<ElementId>,
    cards: Vec<ElementId>,
    footer_bar: Option<ElementId>,
}

impl Orchestrator {
    #[tracing::instrument(skip_all)]
    pub fn build(
        scene: &Scene,
        triggers: &mut TriggerSet,
        stage: &mut Stage,
    ) -> WeaveResult<Self> {
        let showcase = &scene.showcase;
        let origins_spec = &scene.origins;

        // Phase crossfade: color is a pure function of scroll across the
        // showcase approach, fully reversible.
        let color_scrub = triggers.register(TriggerSpec {
            element: showcase.key.clone(),
            start: TriggerPoint::parse("top bottom")?,
            end: Some(TriggerPoint::parse("center center")?),
            scrub: true,
        })?;

        // Parallax exit: origins translates at 20% of its own scroll range.
        let parallax_scrub = triggers.register(TriggerSpec {
            element: origins_spec.key.clone(),
            start: TriggerPoint::parse("top top")?,
            end: Some(TriggerPoint::parse("bottom top")?),
            scrub: true,
        })?;

        let card_reveal = triggers.register(TriggerSpec {
            element: showcase.key.clone(),
            start: TriggerPoint::parse("top 70%")?,
            end: None,
            scrub: false,
        })?;

        let origins_reveal = triggers.register(TriggerSpec {
            element: origins_spec.key.clone(),
            start: TriggerPoint::parse("top 70%")?,
            end: None,
            scrub: false,
        })?;

        // The first surface is the document body; its layout rect spans the
        // whole document, so "top top".."bottom bottom" covers the page.
        let footer_scrub = match &scene.footer_progress {
            Some(_) => Some(triggers.register(TriggerSpec {
                element: showcase.surfaces[0].clone(),
                start: TriggerPoint::parse("top top")?,
                end: Some(TriggerPoint::parse("bottom bottom")?),
                scrub: true,
            })?),
            None => None,
        };

        let surfaces: Vec<_> = showcase.surfaces.iter().map(|k| stage.register(k)).collect();
        let origins = stage.register(&origins_spec.key);
        stage.register(&showcase.key);
        let cards: Vec<_> = showcase.cards.iter().map(|c| stage.register(&c.key)).collect();
        let footer_bar = scene.footer_progress.as_deref().map(|k| stage.register(k));

        let this = Self {
            color_scrub,
            parallax_scrub,
            card_reveal,
            origins_reveal,
            footer_scrub,
            surfaces,
            palette_dark: showcase.palette_dark,
            palette_light: showcase.palette_light,
            origins,
            origins_image_container: origins_spec
                .image_container
                .as_deref()
                .map(|k| stage.register(k)),
            origins_image: origins_spec.image.as_deref().map(|k| stage.register(k)),
            origins_words: origins_spec.words.iter().map(|k| stage.register(k)).collect(),
            origins_label: origins_spec.label.as_deref().map(|k| stage.register(k)),
            origins_body: origins_spec.body.as_deref().map(|k| stage.register(k)),
            origins_cta: origins_spec.cta.as_deref().map(|k| stage.register(k)),
            cards,
            footer_bar,
        };
        this.check_slot_ownership()?;

        // Cards rest invisible and lower until the reveal fires.
        for card in &this.cards {
            stage.set(*card, Prop::TranslateY, scalar(CARD_REST_OFFSET));
            stage.set(*card, Prop::Opacity, scalar(0.0));
        }
        // Surfaces start in the dark phase.
        for surface in &this.surfaces {
            stage.set(
                *surface,
                Prop::BackgroundColor,
                Value::Color(this.palette_dark.background),
            );
            stage.set(*surface, Prop::TextColor, Value::Color(this.palette_dark.text));
        }
        if let Some(bar) = this.footer_bar {
            stage.set(bar, Prop::ProgressWidth, scalar(0.0));
        }

        Ok(this)
    }

    /// No two effects may animate the same slot of the same element.
    fn check_slot_ownership(&self) -> WeaveResult<()> {
        let mut claimed = BTreeSet::new();
        let mut claim = |el: ElementId, prop: Prop| -> WeaveResult<()> {
            if !claimed.insert((el, prop)) {
                return Err(WeaveError::validation(format!(
                    "conflicting effect registrations for {el:?}/{prop:?}"
                )));
            }
            Ok(())
        };

        for s in &self.surfaces {
            claim(*s, Prop::BackgroundColor)?;
            claim(*s, Prop::TextColor)?;
        }
        claim(self.origins, Prop::TranslateY)?;
        for c in &self.cards {
            claim(*c, Prop::TranslateY)?;
            claim(*c, Prop::Opacity)?;
        }
        if let Some(bar) = self.footer_bar {
            claim(bar, Prop::ProgressWidth)?;
        }
        Ok(())
    }

    /// Route one trigger event into the scheduler/stage.
    pub fn handle(
        &self,
        event: TriggerEvent,
        now: Seconds,
        sched: &mut Scheduler,
        stage: &mut Stage,
    ) -> WeaveResult<()> {
        if event.id == self.color_scrub {
            if let TriggerEventKind::Scrub(p) = event.kind {
                self.apply_phase_colors(p, sched, stage)?;
            }
        } else if event.id == self.parallax_scrub {
            if let TriggerEventKind::Scrub(p) = event.kind {
                self.apply_parallax(p, sched, stage)?;
            }
        } else if event.id == self.card_reveal {
            match event.kind {
                TriggerEventKind::Enter => self.play_card_reveal(now, sched)?,
                // Scrolling back up does not hide the cards again; the
                // reveal is one-way by product decision.
                TriggerEventKind::LeaveBack => {}
                _ => {}
            }
        } else if event.id == self.origins_reveal {
            if event.kind == TriggerEventKind::Enter {
                self.play_origins_reveal(now, sched)?;
            }
        } else if Some(event.id) == self.footer_scrub
            && let TriggerEventKind::Scrub(p) = event.kind
            && let Some(bar) = self.footer_bar
        {
            sched.scrub(bar, Prop::ProgressWidth, scalar(0.0), scalar(100.0), p, stage)?;
        }
        Ok(())
    }

    fn apply_phase_colors(
        &self,
        progress: f64,
        sched: &mut Scheduler,
        stage: &mut Stage,
    ) -> WeaveResult<()> {
        for surface in &self.surfaces {
            sched.scrub(
                *surface,
                Prop::BackgroundColor,
                Value::Color(self.palette_dark.background),
                Value::Color(self.palette_light.background),
                progress,
                stage,
            )?;
            sched.scrub(
                *surface,
                Prop::TextColor,
                Value::Color(self.palette_dark.text),
                Value::Color(self.palette_light.text),
                progress,
                stage,
            )?;
        }
        Ok(())
    }

    fn apply_parallax(
        &self,
        progress: f64,
        sched: &mut Scheduler,
        stage: &mut Stage,
    ) -> WeaveResult<()> {
        let Some(rect) = stage.layout(self.origins) else {
            return Ok(());
        };
        let full = PARALLAX_FACTOR * rect.height();
        sched.scrub(
            self.origins,
            Prop::TranslateY,
            scalar(0.0),
            scalar(full),
            progress,
            stage,
        )
    }

    fn play_card_reveal(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        tracing::debug!(cards = self.cards.len(), "card reveal");
        // Two tweens per card share one stagger step.
        let tweens = self
            .cards
            .iter()
            .enumerate()
            .flat_map(|(i, card)| {
                let delay = i as f64 * CARD_STAGGER_SECS;
                [
                    TweenSpec::to(*card, Prop::TranslateY, scalar(0.0), CARD_REVEAL_SECS, Ease::OutQuart)
                        .with_delay(delay),
                    TweenSpec::to(*card, Prop::Opacity, scalar(1.0), CARD_REVEAL_SECS, Ease::OutQuart)
                        .with_delay(delay),
                ]
            })
            .collect::<Vec<_>>();
        Timeline::new().then(Segment::new(tweens)).play(sched, now)
    }

    fn play_origins_reveal(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        tracing::debug!("origins reveal");
        // Revealing mask wipe with a zoom-out inside it.
        if let Some(container) = self.origins_image_container {
            sched.schedule(
                TweenSpec::from_to(
                    container,
                    Prop::ClipRight,
                    scalar(100.0),
                    scalar(0.0),
                    1.5,
                    Ease::OutQuart,
                ),
                now,
            )?;
        }
        if let Some(image) = self.origins_image {
            sched.schedule(
                TweenSpec::from_to(image, Prop::Scale, scalar(1.1), scalar(1.0), 1.5, Ease::OutQuart),
                now,
            )?;
        }

        // Headline words rise in sequence.
        for (i, word) in self.origins_words.iter().enumerate() {
            let delay = i as f64 * WORD_STAGGER_SECS;
            sched.schedule(
                TweenSpec::from_to(*word, Prop::TranslateY, scalar(40.0), scalar(0.0), 0.8, Ease::OutQuart)
                    .with_delay(delay),
                now,
            )?;
            sched.schedule(
                TweenSpec::from_to(*word, Prop::Opacity, scalar(0.0), scalar(1.0), 0.8, Ease::OutQuart)
                    .with_delay(delay),
                now,
            )?;
        }

        let slide_up = |sched: &mut Scheduler,
                        el: Option<ElementId>,
                        from_y: f64,
                        duration: Seconds,
                        delay: Seconds|
         -> WeaveResult<()> {
            let Some(el) = el else { return Ok(()) };
            sched.schedule(
                TweenSpec::from_to(el, Prop::TranslateY, scalar(from_y), scalar(0.0), duration, Ease::OutQuart)
                    .with_delay(delay),
                now,
            )?;
            sched.schedule(
                TweenSpec::from_to(el, Prop::Opacity, scalar(0.0), scalar(1.0), duration, Ease::OutQuart)
                    .with_delay(delay),
                now,
            )
        };
        slide_up(sched, self.origins_label, 20.0, 0.8, 0.0)?;
        slide_up(sched, self.origins_body, 30.0, 1.0, 0.3)?;

        // CTA slides in from behind its overflow mask.
        if let Some(cta) = self.origins_cta {
            sched.schedule(
                TweenSpec::from_to(cta, Prop::TranslateX, scalar(-50.0), scalar(0.0), 1.0, Ease::OutQuart)
                    .with_delay(0.5),
                now,
            )?;
            sched.schedule(
                TweenSpec::from_to(cta, Prop::Opacity, scalar(0.0), scalar(1.0), 1.0, Ease::OutQuart)
                    .with_delay(0.5),
                now,
            )?;
        }
        Ok(())
    }
}
