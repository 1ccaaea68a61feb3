use std::collections::BTreeSet;

use crate::{
    core::Rgba8,
    error::{WeaveError, WeaveResult},
};

/// Declarative description of a page's motion: which stage elements exist
/// and how they participate in the entrance, scroll, and pointer effects.
///
/// Layout, styling, and content stay with the host; the scene only names
/// elements by stage key.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    #[serde(default = "default_particle_color")]
    pub particle_color: Rgba8,
    pub entrance: EntranceSpec,
    pub origins: OriginsSpec,
    pub showcase: ShowcaseSpec,
    #[serde(default)]
    pub magnets: Vec<MagnetSpec>,
    #[serde(default)]
    pub menu: Option<MenuSpec>,
    /// Stage key of the footer progress bar, scrubbed over the whole page.
    #[serde(default)]
    pub footer_progress: Option<String>,
}

fn default_particle_count() -> usize {
    100
}

fn default_particle_color() -> Rgba8 {
    Rgba8::opaque(0xD4, 0xAF, 0x37)
}

/// Cinematic entrance: brand fade, overlay lift, hero reveal.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EntranceSpec {
    pub brand: String,
    pub overlay: String,
    pub hero: String,
}

/// Brand-narrative section with its one-shot reveal sequence.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OriginsSpec {
    pub key: String,
    #[serde(default)]
    pub image_container: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Headline word spans, revealed with a stagger.
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub background: Rgba8,
    pub text: Rgba8,
}

/// Product showcase: the color-phase/parallax/reveal section plus its cards.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ShowcaseSpec {
    pub key: String,
    /// Surfaces whose background/text colors crossfade with scroll
    /// (typically the body and the content wrapper).
    pub surfaces: Vec<String>,
    pub palette_dark: Palette,
    pub palette_light: Palette,
    pub cards: Vec<CardSpec>,
}

/// One pointer-reactive card. `inner` and `blob` are optional: a card
/// missing either simply gets no pointer interaction (capability check).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CardSpec {
    pub key: String,
    #[serde(default)]
    pub inner: Option<String>,
    #[serde(default)]
    pub blob: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Icon-only magnetic element with an optional spinnable glyph.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MagnetSpec {
    pub key: String,
    #[serde(default)]
    pub glyph: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MenuSpec {
    pub button: String,
    pub panel: String,
    pub links: Vec<String>,
}

impl Scene {
    pub fn from_json(s: &str) -> WeaveResult<Self> {
        let scene: Scene =
            serde_json::from_str(s).map_err(|e| WeaveError::scene(format!("parse scene: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> WeaveResult<()> {
        if self.particle_count == 0 {
            return Err(WeaveError::scene("particle_count must be > 0"));
        }

        let mut keys = BTreeSet::new();
        let mut unique = |key: &str, what: &str| -> WeaveResult<()> {
            if key.trim().is_empty() {
                return Err(WeaveError::scene(format!("{what} key must be non-empty")));
            }
            if !keys.insert(key.to_string()) {
                return Err(WeaveError::scene(format!("duplicate element key '{key}'")));
            }
            Ok(())
        };

        unique(&self.entrance.brand, "entrance.brand")?;
        unique(&self.entrance.overlay, "entrance.overlay")?;
        unique(&self.entrance.hero, "entrance.hero")?;
        unique(&self.origins.key, "origins")?;
        for w in &self.origins.words {
            unique(w, "origins word")?;
        }
        unique(&self.showcase.key, "showcase")?;
        if self.showcase.surfaces.is_empty() {
            return Err(WeaveError::scene("showcase.surfaces must be non-empty"));
        }
        for s in &self.showcase.surfaces {
            unique(s, "showcase surface")?;
        }
        if self.showcase.cards.is_empty() {
            return Err(WeaveError::scene("showcase.cards must be non-empty"));
        }
        for card in &self.showcase.cards {
            unique(&card.key, "card")?;
            for sub in [&card.inner, &card.blob, &card.number, &card.name]
                .into_iter()
                .flatten()
            {
                unique(sub, "card sub-element")?;
            }
        }
        for magnet in &self.magnets {
            unique(&magnet.key, "magnet")?;
            if let Some(glyph) = &magnet.glyph {
                unique(glyph, "magnet glyph")?;
            }
        }
        if let Some(menu) = &self.menu {
            unique(&menu.button, "menu.button")?;
            unique(&menu.panel, "menu.panel")?;
            for link in &menu.links {
                unique(link, "menu link")?;
            }
        }
        if let Some(fp) = &self.footer_progress {
            unique(fp, "footer_progress")?;
        }
        Ok(())
    }
}

/// Shared test fixture: a full page scene with four cards.
#[cfg(test)]
pub(crate) fn sample_scene() -> Scene {
    tests::basic_scene()
}
