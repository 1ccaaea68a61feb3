#![forbid(unsafe_code)]

pub mod core;
pub mod ease;
pub mod error;
pub mod menu;
pub mod orchestrator;
pub mod page;
pub mod particles;
pub mod pointer;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod timeline;
pub mod tween;

pub use crate::core::{Point, Rect, Rgba8, ScrollOffset, Seconds, Vec2, Viewport};
pub use crate::ease::Ease;
pub use crate::error::{WeaveError, WeaveResult};
pub use crate::page::{Page, PointerEventKind};
pub use crate::particles::ParticleField;
pub use crate::scene::Scene;
pub use crate::scroll::{TriggerEvent, TriggerEventKind, TriggerSet, TriggerSpec};
pub use crate::stage::{ElementId, Prop, Stage, Surface, Value};
pub use crate::timeline::{Segment, Timeline};
pub use crate::tween::{Scheduler, TweenSpec};
