use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{EngineError, EngineResult};

/// CSS colour with float channels in `0..=255` and alpha in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Opacity.
    pub a: f64,
}

impl Color {
    /// `#000000`.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// `#ffffff`.
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);

    /// Opaque colour.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour with alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey with every channel set to `level`.
    pub const fn grey(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    /// Whether all three channels are equal.
    pub fn is_grey(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// `#rrggbb`, channels rounded and clamped. Alpha is dropped.
    pub fn to_hex(&self) -> String {
        fn byte(v: f64) -> u8 {
            v.clamp(0.0, 255.0).round() as u8
        }
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// `rgb(r, g, b)` for opaque colours, `rgba(r, g, b, a)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return parse_hex(s).map_err(EngineError::config);
        }
        parse_functional(s).map_err(EngineError::config)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Css(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Css(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err(format!("invalid hex color \"#{s}\""));
    }

    fn hex_byte(pair: &str) -> Result<f64, String> {
        u8::from_str_radix(pair, 16)
            .map(f64::from)
            .map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    match s.len() {
        3 => {
            let mut ch = [0.0; 3];
            for (i, slot) in ch.iter_mut().enumerate() {
                let digit = &s[i..i + 1];
                *slot = hex_byte(&format!("{digit}{digit}"))?;
            }
            Ok(Color::rgb(ch[0], ch[1], ch[2]))
        }
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])? / 255.0,
        )),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

fn parse_functional(s: &str) -> Result<Color, String> {
    let lower = s.to_ascii_lowercase();
    let (body, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest, false)
    } else {
        return Err(format!("unsupported color \"{s}\""));
    };
    let body = body
        .strip_suffix(')')
        .ok_or_else(|| format!("unterminated color \"{s}\""))?;
    let parts = body
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid color component \"{}\"", p.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match (with_alpha, parts.as_slice()) {
        (false, [r, g, b]) => Ok(Color::rgb(*r, *g, *b)),
        (true, [r, g, b, a]) => Ok(Color::rgba(*r, *g, *b, *a)),
        _ => Err(format!("wrong number of components in \"{s}\"")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/value.rs"]
mod tests;
