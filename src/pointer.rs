use crate::{
    core::{Point, Rect, ScrollOffset, Seconds},
    ease::Ease,
    error::WeaveResult,
    scene::{CardSpec, MagnetSpec},
    stage::{ElementId, Prop, Stage, Value},
    tween::{Scheduler, TweenSpec},
};

/// Maximum 3D tilt, degrees, at a normalized offset of 1.
const MAX_TILT_DEG: f64 = 10.0;

const BLOB_FOLLOW_SECS: Seconds = 0.6;
const BLOB_VISIBLE_OPACITY: f64 = 0.6;
const TILT_SECS: Seconds = 0.3;
const SNAP_BACK_SECS: Seconds = 0.8;
const HOVER_ACCENT_SECS: Seconds = 0.4;
const MAGNET_FOLLOW_SECS: Seconds = 0.3;
const MAGNET_RELEASE_SECS: Seconds = 0.6;
const GLYPH_SPIN_SECS: Seconds = 0.6;

fn scalar(v: f64) -> Value {
    Value::Scalar(v)
}

/// Cursor position local to an element, from client coordinates and the
/// element's document-space layout rect.
fn local_cursor(client: Point, rect: Rect, scroll: ScrollOffset) -> Point {
    Point::new(client.x - rect.x0, client.y - (rect.y0 - scroll))
}

/// Per-card pointer interaction: trailing blob, 3D tilt, hover accents.
///
/// One controller per card, no cross-card state. Attachment is a capability
/// check: cards without the nested inner layer or blob get no controller.
#[derive(Clone, Debug)]
pub struct PointerController {
    card: ElementId,
    inner: ElementId,
    blob: ElementId,
    number: Option<ElementId>,
    name: Option<ElementId>,
}

impl PointerController {
    pub fn attach(spec: &CardSpec, stage: &mut Stage) -> Option<Self> {
        let card = stage.id_of(&spec.key)?;
        let inner = spec.inner.as_deref().and_then(|k| stage.id_of(k))?;
        let blob = spec.blob.as_deref().and_then(|k| stage.id_of(k))?;
        let number = spec.number.as_deref().and_then(|k| stage.id_of(k));
        let name = spec.name.as_deref().and_then(|k| stage.id_of(k));

        // Resting state.
        stage.set(blob, Prop::BlobOpacity, scalar(0.0));
        stage.set(inner, Prop::RotateX, scalar(0.0));
        stage.set(inner, Prop::RotateY, scalar(0.0));

        Some(Self {
            card,
            inner,
            blob,
            number,
            name,
        })
    }

    /// Normalized cursor offset from the card center, each axis in `[-1,1]`.
    fn normalized_offset(local: Point, rect: Rect) -> (f64, f64) {
        let cx = rect.width() / 2.0;
        let cy = rect.height() / 2.0;
        if cx <= 0.0 || cy <= 0.0 {
            return (0.0, 0.0);
        }
        (
            ((local.x - cx) / cx).clamp(-1.0, 1.0),
            ((local.y - cy) / cy).clamp(-1.0, 1.0),
        )
    }

    pub fn pointer_move(
        &self,
        client: Point,
        scroll: ScrollOffset,
        now: Seconds,
        sched: &mut Scheduler,
        stage: &Stage,
    ) -> WeaveResult<()> {
        let Some(rect) = stage.layout(self.card) else {
            return Ok(());
        };
        let local = local_cursor(client, rect, scroll);

        // Blob trails the cursor: a short eased transition, not a snap.
        for (prop, to) in [
            (Prop::BlobX, local.x),
            (Prop::BlobY, local.y),
            (Prop::BlobOpacity, BLOB_VISIBLE_OPACITY),
        ] {
            sched.schedule(
                TweenSpec::to(self.blob, prop, scalar(to), BLOB_FOLLOW_SECS, Ease::OutQuart),
                now,
            )?;
        }

        // Tilt: vertical offset negated so the cursor's side tilts toward
        // the viewer. Overlapping moves retarget the in-flight tween.
        let (dx, dy) = Self::normalized_offset(local, rect);
        let rotate_x = -dy * MAX_TILT_DEG;
        let rotate_y = dx * MAX_TILT_DEG;
        sched.schedule(
            TweenSpec::to(self.inner, Prop::RotateX, scalar(rotate_x), TILT_SECS, Ease::OutQuart),
            now,
        )?;
        sched.schedule(
            TweenSpec::to(self.inner, Prop::RotateY, scalar(rotate_y), TILT_SECS, Ease::OutQuart),
            now,
        )?;
        Ok(())
    }

    pub fn pointer_enter(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        if let Some(number) = self.number {
            sched.schedule(
                TweenSpec::to(number, Prop::Scale, scalar(1.1), HOVER_ACCENT_SECS, Ease::OutQuart),
                now,
            )?;
        }
        if let Some(name) = self.name {
            sched.schedule(
                TweenSpec::to(
                    name,
                    Prop::TranslateY,
                    scalar(-5.0),
                    HOVER_ACCENT_SECS,
                    Ease::OutQuart,
                ),
                now,
            )?;
        }
        Ok(())
    }

    /// Single consolidated leave handler: elastic tilt release, blob fade,
    /// and hover-accent resets all at once.
    pub fn pointer_leave(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        for prop in [Prop::RotateX, Prop::RotateY] {
            sched.schedule(
                TweenSpec::to(self.inner, prop, scalar(0.0), SNAP_BACK_SECS, Ease::SNAP_BACK),
                now,
            )?;
        }
        sched.schedule(
            TweenSpec::to(
                self.blob,
                Prop::BlobOpacity,
                scalar(0.0),
                HOVER_ACCENT_SECS,
                Ease::OutQuart,
            ),
            now,
        )?;
        if let Some(number) = self.number {
            sched.schedule(
                TweenSpec::to(number, Prop::Scale, scalar(1.0), HOVER_ACCENT_SECS, Ease::OutQuart),
                now,
            )?;
        }
        if let Some(name) = self.name {
            sched.schedule(
                TweenSpec::to(
                    name,
                    Prop::TranslateY,
                    scalar(0.0),
                    HOVER_ACCENT_SECS,
                    Ease::OutQuart,
                ),
                now,
            )?;
        }
        Ok(())
    }
}

/// Icon-only magnetic element: the element itself chases the cursor at half
/// strength, with an elastic release and a glyph spin on entry.
#[derive(Clone, Debug)]
pub struct MagnetController {
    element: ElementId,
    glyph: Option<ElementId>,
}

impl MagnetController {
    pub fn attach(spec: &MagnetSpec, stage: &mut Stage) -> Option<Self> {
        let element = stage.id_of(&spec.key)?;
        let glyph = spec.glyph.as_deref().and_then(|k| stage.id_of(k));
        stage.set(element, Prop::TranslateX, scalar(0.0));
        stage.set(element, Prop::TranslateY, scalar(0.0));
        Some(Self { element, glyph })
    }

    pub fn pointer_move(
        &self,
        client: Point,
        scroll: ScrollOffset,
        now: Seconds,
        sched: &mut Scheduler,
        stage: &Stage,
    ) -> WeaveResult<()> {
        let Some(rect) = stage.layout(self.element) else {
            return Ok(());
        };
        let local = local_cursor(client, rect, scroll);
        let offset_x = local.x - rect.width() / 2.0;
        let offset_y = local.y - rect.height() / 2.0;
        sched.schedule(
            TweenSpec::to(
                self.element,
                Prop::TranslateX,
                scalar(offset_x * 0.5),
                MAGNET_FOLLOW_SECS,
                Ease::OutQuart,
            ),
            now,
        )?;
        sched.schedule(
            TweenSpec::to(
                self.element,
                Prop::TranslateY,
                scalar(offset_y * 0.5),
                MAGNET_FOLLOW_SECS,
                Ease::OutQuart,
            ),
            now,
        )?;
        Ok(())
    }

    pub fn pointer_enter(&self, now: Seconds, sched: &mut Scheduler) -> WeaveResult<()> {
        if let Some(glyph) = self.glyph {
            sched.schedule(
                TweenSpec::to(glyph, Prop::Rotation, scalar(360.0), GLYPH_SPIN_SECS, Ease::SPIN_IN),
                now,
            )?;
        }
        Ok(())
    }

    /// Elastic translation release; glyph rotation snaps to 0 instantly so
    /// the next entry spins the full turn again.
    pub fn pointer_leave(
        &self,
        now: Seconds,
        sched: &mut Scheduler,
        stage: &mut Stage,
    ) -> WeaveResult<()> {
        for prop in [Prop::TranslateX, Prop::TranslateY] {
            sched.schedule(
                TweenSpec::to(self.element, prop, scalar(0.0), MAGNET_RELEASE_SECS, Ease::SNAP_BACK),
                now,
            )?;
        }
        if let Some(glyph) = self.glyph {
            sched.set(glyph, Prop::Rotation, scalar(0.0), stage);
        }
        Ok(())
    }
}
