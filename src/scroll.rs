use crate::{
    core::{Rect, ScrollOffset, Viewport},
    error::{WeaveError, WeaveResult},
    stage::Stage,
};

/// Edge of a trigger element's document-space rect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

/// A point in scroll space: "the element's `edge` meets `viewport_fraction`
/// of viewport height" (e.g. `top 70%` = element top hits 70% down the
/// viewport). Serialized as that string form.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerPoint {
    pub edge: Edge,
    pub viewport_fraction: f64,
}

impl TriggerPoint {
    pub fn new(edge: Edge, viewport_fraction: f64) -> Self {
        Self {
            edge,
            viewport_fraction,
        }
    }

    /// Parse `"<edge> <position>"` where edge is `top|center|bottom` and
    /// position is `top|center|bottom` or a percentage like `70%`.
    pub fn parse(s: &str) -> WeaveResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(edge), Some(pos), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(WeaveError::validation(format!(
                "trigger point '{s}' must be '<edge> <position>'"
            )));
        };
        let edge = match edge {
            "top" => Edge::Top,
            "center" => Edge::Center,
            "bottom" => Edge::Bottom,
            other => {
                return Err(WeaveError::validation(format!(
                    "unknown trigger edge '{other}'"
                )));
            }
        };
        let viewport_fraction = match pos {
            "top" => 0.0,
            "center" => 0.5,
            "bottom" => 1.0,
            other => {
                let pct = other.strip_suffix('%').ok_or_else(|| {
                    WeaveError::validation(format!("unknown trigger position '{other}'"))
                })?;
                let v: f64 = pct.parse().map_err(|_| {
                    WeaveError::validation(format!("unknown trigger position '{other}'"))
                })?;
                v / 100.0
            }
        };
        if !viewport_fraction.is_finite() {
            return Err(WeaveError::validation("trigger position must be finite"));
        }
        Ok(Self {
            edge,
            viewport_fraction,
        })
    }

    /// Scroll offset at which this point is reached, for the given layout.
    fn resolve(&self, rect: Rect, viewport: Viewport) -> ScrollOffset {
        let edge_y = match self.edge {
            Edge::Top => rect.y0,
            Edge::Center => (rect.y0 + rect.y1) / 2.0,
            Edge::Bottom => rect.y1,
        };
        edge_y - viewport.height * self.viewport_fraction
    }
}

impl TryFrom<String> for TriggerPoint {
    type Error = WeaveError;

    fn try_from(s: String) -> WeaveResult<Self> {
        Self::parse(&s)
    }
}

impl From<TriggerPoint> for String {
    fn from(p: TriggerPoint) -> String {
        let edge = match p.edge {
            Edge::Top => "top",
            Edge::Center => "center",
            Edge::Bottom => "bottom",
        };
        format!("{edge} {}%", p.viewport_fraction * 100.0)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerSpec {
    /// Stage key of the trigger element.
    pub element: String,
    pub start: TriggerPoint,
    #[serde(default)]
    pub end: Option<TriggerPoint>,
    #[serde(default)]
    pub scrub: bool,
}

impl TriggerSpec {
    pub fn validate(&self) -> WeaveResult<()> {
        if self.element.trim().is_empty() {
            return Err(WeaveError::validation("trigger element must be non-empty"));
        }
        if self.scrub && self.end.is_none() {
            return Err(WeaveError::validation(
                "scrub trigger requires an end point",
            ));
        }
        for p in std::iter::once(&self.start).chain(self.end.as_ref()) {
            if !p.viewport_fraction.is_finite() {
                return Err(WeaveError::validation(
                    "trigger point fraction must be finite",
                ));
            }
        }
        Ok(())
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TriggerId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    Before,
    Active,
    After,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerEventKind {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
    Scrub(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEvent {
    pub id: TriggerId,
    pub kind: TriggerEventKind,
}

#[derive(Clone, Debug)]
struct Trigger {
    spec: TriggerSpec,
    state: TriggerState,
    last_progress: Option<f64>,
}

/// Independent per-trigger state machines evaluated against the current
/// scroll offset. Evaluation is O(number of triggers), arithmetic only;
/// layout rects are read from the stage, never measured here.
#[derive(Clone, Debug, Default)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: TriggerSpec) -> WeaveResult<TriggerId> {
        spec.validate()?;
        let id = TriggerId(self.triggers.len());
        self.triggers.push(Trigger {
            spec,
            state: TriggerState::Before,
            last_progress: None,
        });
        Ok(id)
    }

    pub fn state(&self, id: TriggerId) -> Option<TriggerState> {
        self.triggers.get(id.0).map(|t| t.state)
    }

    /// Re-evaluate every trigger, emitting boundary transitions exactly once
    /// per crossing and scrub progress updates. Events are ordered by
    /// registration order; a zone skipped entirely in one evaluation still
    /// fires each of its boundary transitions once.
    pub fn evaluate(
        &mut self,
        scroll: ScrollOffset,
        viewport: Viewport,
        stage: &Stage,
    ) -> Vec<TriggerEvent> {
        let mut events = Vec::new();
        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            let id = TriggerId(index);

            // Missing element: capability check, skip silently.
            let Some(rect) = stage.id_of(&trigger.spec.element).and_then(|e| stage.layout(e))
            else {
                continue;
            };

            let start = trigger.spec.start.resolve(rect, viewport);
            let end = trigger.spec.end.map(|p| p.resolve(rect, viewport));

            let new_state = if scroll < start {
                TriggerState::Before
            } else if end.is_some_and(|e| scroll > e.max(start)) {
                TriggerState::After
            } else {
                TriggerState::Active
            };

            let old_state = trigger.state;
            if new_state != old_state {
                tracing::debug!(?id, ?old_state, ?new_state, scroll, "trigger transition");
            }
            for kind in transition_events(old_state, new_state) {
                events.push(TriggerEvent { id, kind });
            }
            trigger.state = new_state;

            if trigger.spec.scrub
                && let Some(end) = end
            {
                let progress = scrub_progress(scroll, start, end);
                if trigger.last_progress != Some(progress) {
                    trigger.last_progress = Some(progress);
                    events.push(TriggerEvent {
                        id,
                        kind: TriggerEventKind::Scrub(progress),
                    });
                }
            }
        }
        events
    }
}

/// Clamped linear progress through `[start, end]`. Degenerate ordering
/// (`start >= end`) yields a step: 0 below start, 1 at or above.
fn scrub_progress(scroll: ScrollOffset, start: ScrollOffset, end: ScrollOffset) -> f64 {
    if start >= end {
        return if scroll >= start { 1.0 } else { 0.0 };
    }
    ((scroll - start) / (end - start)).clamp(0.0, 1.0)
}

/// Boundary events fired by a state change, in crossing order. A jump across
/// the whole zone fires both boundaries, once each.
fn transition_events(from: TriggerState, to: TriggerState) -> Vec<TriggerEventKind> {
    use TriggerEventKind::*;
    use TriggerState::*;
    match (from, to) {
        (Before, Active) => vec![Enter],
        (Before, After) => vec![Enter, Leave],
        (Active, After) => vec![Leave],
        (After, Active) => vec![EnterBack],
        (After, Before) => vec![EnterBack, LeaveBack],
        (Active, Before) => vec![LeaveBack],
        _ => vec![],
    }
}
