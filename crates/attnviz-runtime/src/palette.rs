//! Cell colors and value text

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation toward `other` by `t` in [0, 1]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub const COLOR_NEGATIVE: Rgb = Rgb(0xd9, 0x4a, 0x4a);
pub const COLOR_NEUTRAL: Rgb = Rgb(0xff, 0xff, 0xff);
pub const COLOR_POSITIVE: Rgb = Rgb(0x3b, 0x7d, 0xd8);

/// `atan(value * steepness) / (π/2)` with `steepness = 1 / max_abs`.
///
/// Maps the real line onto (-1, 1); `±max_abs` lands on `±0.5`.
pub fn normalize(value: f64, max_abs: f64) -> f64 {
    let steepness = 1.0 / max_abs;
    (value * steepness).atan() / FRAC_PI_2
}

/// Diverging color scale around a neutral midpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub negative: Rgb,
    pub neutral: Rgb,
    pub positive: Rgb,
    pub max_abs: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_max_abs(1.0)
    }
}

impl Palette {
    pub fn with_max_abs(max_abs: f64) -> Self {
        Self { negative: COLOR_NEGATIVE, neutral: COLOR_NEUTRAL, positive: COLOR_POSITIVE, max_abs }
    }

    pub fn color(&self, value: f64) -> Rgb {
        let n = normalize(value, self.max_abs);
        if n < 0.0 {
            self.neutral.lerp(self.negative, -n)
        } else {
            self.neutral.lerp(self.positive, n)
        }
    }
}

/// Cell text when raw values are shown
pub fn format_value(value: f64) -> String {
    let text = format!("{:.2}", value);
    // Fold negative zero
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}
