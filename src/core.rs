use crate::error::{WeaveError, WeaveResult};

pub use kurbo::{Point, Rect, Vec2};

/// Scroll offset in document pixels, measured from the document top.
pub type ScrollOffset = f64;

/// Wall-clock time in seconds since engine start.
pub type Seconds = f64;

/// Viewport dimensions in pixels, read once at engine start.
///
/// Live resize is out of scope; the values stay fixed for the page session.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> WeaveResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(WeaveError::validation(
                "viewport width/height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Straight-alpha RGBA8 color. Serialized as `#RRGGBB`/`#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> WeaveResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| WeaveError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(WeaveError::validation(format!(
                "color '{s}' has invalid hex digits"
            )));
        }
        let byte = |i: usize| -> WeaveResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| WeaveError::validation(format!("color '{s}' has invalid hex digits")))
        };
        match hex.len() {
            6 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(WeaveError::validation(format!(
                "color '{s}' must be #RRGGBB or #RRGGBBAA"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = WeaveError;

    fn try_from(s: String) -> WeaveResult<Self> {
        Self::from_hex(&s)
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> String {
        c.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let c = Rgba8::from_hex("#3B2F2F").unwrap();
        assert_eq!(c, Rgba8::opaque(0x3B, 0x2F, 0x2F));
        assert_eq!(c.to_hex(), "#3B2F2F");

        let c = Rgba8::from_hex("#D4AF3780").unwrap();
        assert_eq!(c.a, 0x80);
        assert_eq!(c.to_hex(), "#D4AF3780");
    }

    #[test]
    fn hex_rejects_junk() {
        assert!(Rgba8::from_hex("3B2F2F").is_err());
        assert!(Rgba8::from_hex("#3B2F").is_err());
        assert!(Rgba8::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(0.0, 800.0).is_err());
        assert!(Viewport::new(1280.0, f64::NAN).is_err());
        assert!(Viewport::new(1280.0, 800.0).is_ok());
    }
}
