//! Partial rendering settings and the per-field merge rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering settings for one image. Every field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Keep an alpha channel (`true`) or flatten to opaque pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<bool>,

    /// Exact pixel size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<(u32, u32)>,

    /// Resize factor, uniform or per axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,

    /// Size in units; multiplied by the registry unit at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_size: Option<(f64, f64)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorkey: Option<ColorKey>,

    /// Per-surface alpha, 0 (transparent) to 255 (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_alpha: Option<u8>,

    /// Use the smooth filter for every resize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothscale: Option<bool>,
}

impl Settings {
    /// The built-in base layer: alpha on, sharp scaling, nothing else set.
    pub fn base() -> Self {
        Self {
            alpha: Some(true),
            smoothscale: Some(false),
            ..Self::default()
        }
    }

    /// Fill every unset field from `fallback`. Fields that are already set
    /// are never overwritten.
    pub fn merge_default(mut self, fallback: &Settings) -> Self {
        fn fill<T: Clone>(slot: &mut Option<T>, fallback: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(fallback);
            }
        }

        fill(&mut self.alpha, &fallback.alpha);
        fill(&mut self.size, &fallback.size);
        fill(&mut self.scale, &fallback.scale);
        fill(&mut self.unit_size, &fallback.unit_size);
        fill(&mut self.colorkey, &fallback.colorkey);
        fill(&mut self.global_alpha, &fallback.global_alpha);
        fill(&mut self.smoothscale, &fallback.smoothscale);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn alpha_or_default(&self) -> bool {
        self.alpha.unwrap_or(true)
    }

    pub fn smoothscale_or_default(&self) -> bool {
        self.smoothscale.unwrap_or(false)
    }
}

/// A resize factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f64),
    Axes(f64, f64),
}

impl Scale {
    pub fn factors(&self) -> (f64, f64) {
        match *self {
            Scale::Uniform(f) => (f, f),
            Scale::Axes(x, y) => (x, y),
        }
    }
}

/// An RGB colour treated as transparent when the surface is composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorKeyRepr", into = "String")]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("magenta", [255, 0, 255]),
    ("cyan", [0, 255, 255]),
    ("yellow", [255, 255, 0]),
];

impl ColorKey {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Parse `#rrggbb` or one of the named colours.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("invalid hex colour '{}'", text));
            }
            let packed = u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
            return Ok(Self::from_packed(packed));
        }
        let lower = text.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b])| Self::new(*r, *g, *b))
            .ok_or_else(|| format!("unknown colour name '{}'", text))
    }

    fn from_packed(packed: u32) -> Self {
        Self::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<ColorKey> for String {
    fn from(key: ColorKey) -> Self {
        key.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorKeyRepr {
    Text(String),
    Channels(Vec<i64>),
    Packed(i64),
}

impl TryFrom<ColorKeyRepr> for ColorKey {
    type Error = String;

    fn try_from(repr: ColorKeyRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorKeyRepr::Text(text) => ColorKey::parse(&text),
            ColorKeyRepr::Channels(channels) => {
                if channels.len() != 3 && channels.len() != 4 {
                    return Err(format!(
                        "colorkey needs 3 or 4 channels, got {}",
                        channels.len()
                    ));
                }
                let mut rgb = [0u8; 3];
                for (slot, value) in rgb.iter_mut().zip(&channels) {
                    *slot = u8::try_from(*value)
                        .map_err(|_| format!("colorkey channel {} is outside 0..=255", value))?;
                }
                Ok(ColorKey::new(rgb[0], rgb[1], rgb[2]))
            }
            ColorKeyRepr::Packed(packed) => u32::try_from(packed)
                .ok()
                .filter(|p| *p <= 0xFF_FFFF)
                .map(ColorKey::from_packed)
                .ok_or_else(|| format!("packed colorkey {} is outside 0..=0xFFFFFF", packed)),
        }
    }
}
