use std::collections::BTreeMap;

use crate::{
    core::{Point, Rect, Rgba8},
    error::{WeaveError, WeaveResult},
};

/// Handle to a registered stage element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// Animatable property slot on an element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Prop {
    TranslateX,
    TranslateY,
    RotateX,
    RotateY,
    Rotation,
    Scale,
    Opacity,
    BackgroundColor,
    TextColor,
    BlobX,
    BlobY,
    BlobOpacity,
    /// Footer progress bar width, percent of full width.
    ProgressWidth,
    /// Right inset of a reveal clip mask, percent (100 = fully hidden).
    ClipRight,
}

/// A property value. Color and scalar slots never mix.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Scalar(f64),
    Color(Rgba8),
}

impl Value {
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Rgba8> {
        match self {
            Self::Scalar(_) => None,
            Self::Color(c) => Some(c),
        }
    }

    pub fn same_kind(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Scalar(_), Self::Scalar(_)) | (Self::Color(_), Self::Color(_))
        )
    }
}

#[derive(Clone, Debug, Default)]
struct Element {
    props: BTreeMap<Prop, Value>,
    layout: Option<Rect>,
}

/// In-memory render target: per-element animated property values plus the
/// host-supplied document-space layout rect for each element.
///
/// Missing keys are a capability condition, not an error: lookups return
/// `Option` and callers skip the affected behavior.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    keys: BTreeMap<String, ElementId>,
    elements: Vec<Element>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`, returning the existing id if already present.
    pub fn register(&mut self, key: &str) -> ElementId {
        if let Some(id) = self.keys.get(key) {
            return *id;
        }
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element::default());
        self.keys.insert(key.to_string(), id);
        id
    }

    pub fn id_of(&self, key: &str) -> Option<ElementId> {
        self.keys.get(key).copied()
    }

    pub fn key_of(&self, id: ElementId) -> Option<&str> {
        self.keys
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn set(&mut self, id: ElementId, prop: Prop, value: Value) {
        if let Some(el) = self.elements.get_mut(id.0 as usize) {
            el.props.insert(prop, value);
        }
    }

    pub fn get(&self, id: ElementId, prop: Prop) -> Option<Value> {
        self.elements.get(id.0 as usize)?.props.get(&prop).copied()
    }

    pub fn scalar(&self, id: ElementId, prop: Prop) -> Option<f64> {
        self.get(id, prop)?.as_scalar()
    }

    pub fn color(&self, id: ElementId, prop: Prop) -> Option<Rgba8> {
        self.get(id, prop)?.as_color()
    }

    /// Host-supplied document-space rect (y measured from document top).
    pub fn set_layout(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.elements.get_mut(id.0 as usize) {
            el.layout = Some(rect);
        }
    }

    pub fn layout(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id.0 as usize)?.layout
    }

    /// Dump all set properties keyed by element key, for the CLI and tests.
    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<Prop, Value>> {
        let mut out = BTreeMap::new();
        for (key, id) in &self.keys {
            let el = &self.elements[id.0 as usize];
            if !el.props.is_empty() {
                out.insert(key.clone(), el.props.clone());
            }
        }
        out
    }
}

/// 2D drawing surface for the particle field.
pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);
}

/// Validate that a value matches the slot it is being scheduled into.
pub fn check_kind(prop: Prop, value: Value) -> WeaveResult<()> {
    let wants_color = matches!(prop, Prop::BackgroundColor | Prop::TextColor);
    let is_color = matches!(value, Value::Color(_));
    if wants_color != is_color {
        return Err(WeaveError::animation(format!(
            "property {prop:?} cannot hold {value:?}"
        )));
    }
    Ok(())
}
