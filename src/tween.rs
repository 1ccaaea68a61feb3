use crate::{
    core::{Rgba8, Seconds, Vec2},
    ease::Ease,
    error::{WeaveError, WeaveResult},
    stage::{ElementId, Prop, Stage, Value, check_kind},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

impl Lerp for Value {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f64::lerp(a, b, t)),
            (Value::Color(a), Value::Color(b)) => Value::Color(Rgba8::lerp(a, b, t)),
            // Mixed kinds are rejected before scheduling; jump to the end value.
            _ => *b,
        }
    }
}

/// One requested interpolation toward a target value.
#[derive(Clone, Debug)]
pub struct TweenSpec {
    pub element: ElementId,
    pub prop: Prop,
    pub to: Value,
    pub duration: Seconds,
    pub delay: Seconds,
    pub ease: Ease,
    /// Explicit start value; `None` captures the stage value when the tween
    /// begins (after its delay).
    pub from: Option<Value>,
    /// Completion tag returned by [`Scheduler::advance`] when this tween
    /// finishes.
    pub tag: Option<String>,
}

impl TweenSpec {
    pub fn to(element: ElementId, prop: Prop, to: Value, duration: Seconds, ease: Ease) -> Self {
        Self {
            element,
            prop,
            to,
            duration,
            delay: 0.0,
            ease,
            from: None,
            tag: None,
        }
    }

    pub fn from_to(
        element: ElementId,
        prop: Prop,
        from: Value,
        to: Value,
        duration: Seconds,
        ease: Ease,
    ) -> Self {
        Self {
            from: Some(from),
            ..Self::to(element, prop, to, duration, ease)
        }
    }

    pub fn with_delay(mut self, delay: Seconds) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn validate(&self) -> WeaveResult<()> {
        check_kind(self.prop, self.to)?;
        if let Some(from) = self.from {
            check_kind(self.prop, from)?;
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(WeaveError::animation("tween duration must be finite and >= 0"));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(WeaveError::animation("tween delay must be finite and >= 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct ActiveTween {
    element: ElementId,
    prop: Prop,
    from: Option<Value>, // captured lazily at start
    to: Value,
    start: Seconds,
    duration: Seconds,
    ease: Ease,
    tag: Option<String>,
    primed: bool,
}

/// Multiplexes concurrent interpolations over one per-frame clock.
///
/// Slots are keyed by `(element, prop)`: scheduling onto a slot with an
/// in-flight tween replaces it (last-write-wins), nothing queues. Scrub and
/// instant writes also claim the slot.
#[derive(Debug, Default)]
pub struct Scheduler {
    tweens: Vec<ActiveTween>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.tweens.len()
    }

    pub fn schedule(&mut self, spec: TweenSpec, now: Seconds) -> WeaveResult<()> {
        spec.validate()?;
        if self.claim_slot(spec.element, spec.prop) {
            tracing::debug!(element = ?spec.element, prop = ?spec.prop, "retargeting in-flight tween");
        }
        self.tweens.push(ActiveTween {
            element: spec.element,
            prop: spec.prop,
            from: spec.from,
            to: spec.to,
            start: now + spec.delay,
            duration: spec.duration,
            ease: spec.ease,
            tag: spec.tag,
            primed: false,
        });
        Ok(())
    }

    /// Instant write; cancels any in-flight tween on the slot.
    pub fn set(&mut self, element: ElementId, prop: Prop, value: Value, stage: &mut Stage) {
        self.claim_slot(element, prop);
        stage.set(element, prop, value);
    }

    /// Scroll-driven write: `lerp(from, to, progress)` with progress clamped
    /// to `[0,1]`, bypassing the clock. Scroll owns the slot from then on.
    pub fn scrub(
        &mut self,
        element: ElementId,
        prop: Prop,
        from: Value,
        to: Value,
        progress: f64,
        stage: &mut Stage,
    ) -> WeaveResult<()> {
        check_kind(prop, from)?;
        check_kind(prop, to)?;
        if !from.same_kind(to) {
            return Err(WeaveError::animation("scrub endpoints must share a kind"));
        }
        self.claim_slot(element, prop);
        let progress = progress.clamp(0.0, 1.0);
        stage.set(element, prop, Value::lerp(&from, &to, progress));
        Ok(())
    }

    /// Advance the clock to `now`, writing eased values for live tweens and
    /// retiring finished ones at their exact end value. Returns the tags of
    /// tweens completed by this call, in completion order.
    pub fn advance(&mut self, now: Seconds, stage: &mut Stage) -> Vec<String> {
        let mut done_tags = Vec::new();
        let mut keep = Vec::with_capacity(self.tweens.len());

        for mut tw in self.tweens.drain(..) {
            if now < tw.start {
                // An explicit start value paints its resting state on the
                // first tick, before the delay expires.
                if !tw.primed && let Some(from) = tw.from {
                    stage.set(tw.element, tw.prop, from);
                    tw.primed = true;
                }
                keep.push(tw);
                continue;
            }

            let from = *tw.from.get_or_insert_with(|| {
                // First tick at/after start: capture the current stage value,
                // falling back to the end value when the slot was never set.
                stage.get(tw.element, tw.prop).unwrap_or(tw.to)
            });

            let finished = now >= tw.start + tw.duration || tw.duration <= 0.0;
            if finished {
                stage.set(tw.element, tw.prop, tw.to);
                if let Some(tag) = tw.tag.take() {
                    done_tags.push(tag);
                }
                continue;
            }

            let t = (now - tw.start) / tw.duration;
            let eased = tw.ease.apply(t);
            stage.set(tw.element, tw.prop, Value::lerp(&from, &tw.to, eased));
            keep.push(tw);
        }

        self.tweens = keep;
        done_tags
    }

    fn claim_slot(&mut self, element: ElementId, prop: Prop) -> bool {
        let before = self.tweens.len();
        self.tweens
            .retain(|tw| !(tw.element == element && tw.prop == prop));
        self.tweens.len() != before
    }
}
