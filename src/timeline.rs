use crate::{
    core::Seconds,
    error::WeaveResult,
    tween::{Scheduler, TweenSpec},
};

/// A group of tweens that start together, optionally fanned out by a
/// stagger increment across the group.
#[derive(Clone, Debug)]
pub struct Segment {
    pub tweens: Vec<TweenSpec>,
    /// Extra delay before the segment starts, on top of its position.
    pub delay: Seconds,
    /// Per-member start increment: member `i` starts at `i * stagger`.
    pub stagger: Seconds,
    /// Emitted by the scheduler when the segment's last tween finishes.
    pub tag: Option<String>,
}

impl Segment {
    pub fn new(tweens: Vec<TweenSpec>) -> Self {
        Self {
            tweens,
            delay: 0.0,
            stagger: 0.0,
            tag: None,
        }
    }

    pub fn with_delay(mut self, delay: Seconds) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_stagger(mut self, stagger: Seconds) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Offset of member `i` from segment start.
    fn member_offset(&self, i: usize) -> Seconds {
        i as f64 * self.stagger + self.tweens[i].delay
    }

    /// Time from segment start until the last member finishes.
    fn span(&self) -> Seconds {
        self.tweens
            .iter()
            .enumerate()
            .map(|(i, tw)| self.member_offset(i) + tw.duration)
            .fold(0.0, f64::max)
    }
}

#[derive(Clone, Copy, Debug)]
enum Position {
    AfterPrevious,
    WithPrevious,
}

/// Ordered tween sequence. Segments appended with [`Timeline::then`] start
/// when the previous segment's last tween ends; [`Timeline::with`] segments
/// start alongside the previous segment. Immutable once played, except
/// through the scheduler's overwrite semantics.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    segments: Vec<(Position, Segment)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, segment: Segment) -> Self {
        self.segments.push((Position::AfterPrevious, segment));
        self
    }

    pub fn with(mut self, segment: Segment) -> Self {
        self.segments.push((Position::WithPrevious, segment));
        self
    }

    /// Per-segment member start offsets relative to timeline start.
    pub fn plan(&self) -> Vec<Vec<Seconds>> {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut prev_start = 0.0f64;
        let mut prev_end = 0.0f64;
        for (position, seg) in &self.segments {
            let base = match position {
                Position::AfterPrevious => prev_end,
                Position::WithPrevious => prev_start,
            };
            let start = base + seg.delay;
            out.push(
                (0..seg.tweens.len())
                    .map(|i| start + seg.member_offset(i))
                    .collect(),
            );
            prev_start = start;
            prev_end = prev_end.max(start + seg.span());
        }
        out
    }

    /// Schedule every segment onto `sched`, anchored at `now`.
    pub fn play(self, sched: &mut Scheduler, now: Seconds) -> WeaveResult<()> {
        let plan = self.plan();
        for ((_, seg), starts) in self.segments.into_iter().zip(plan) {
            // The segment tag rides on its last-finishing member.
            let last = starts
                .iter()
                .zip(&seg.tweens)
                .enumerate()
                .map(|(i, (s, tw))| (i, s + tw.duration))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i);

            for (i, (mut tween, start)) in seg.tweens.into_iter().zip(starts).enumerate() {
                tween.delay = start;
                if Some(i) == last {
                    if let Some(tag) = seg.tag.clone() {
                        tween.tag = Some(tag);
                    }
                }
                sched.schedule(tween, now)?;
            }
        }
        Ok(())
    }
}
