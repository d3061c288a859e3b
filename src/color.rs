//! RGB / HSV color model.
//!
//! [`Rgba`] is the authoritative color value: 8-bit channels with the alpha
//! carried alongside. [`Hsv`] keeps hue in degrees `[0, 360)` and saturation
//! and value as percentages `[0, 100]`. Conversions in both directions are
//! explicit; HSV to RGB rounds to whole channels, so a value taken through
//! integer HSV and back may move by a unit or two. That loss is expected.

use std::fmt;

use crate::error::ColorError;
use crate::math::clamp_unit;

/// An 8-bit RGB color with alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

pub const RED: Rgba = Rgba::rgb(255, 0, 0);
pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
pub const YELLOW: Rgba = Rgba::rgb(255, 255, 0);
pub const CYAN: Rgba = Rgba::rgb(0, 255, 255);
pub const MAGENTA: Rgba = Rgba::rgb(255, 0, 255);
pub const LIGHT_GRAY: Rgba = Rgba::rgb(204, 204, 204);
pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Alpha normalized to `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.alpha as f64 / 255.0
    }

    /// Alpha as the nearest whole percentage. Every percent survives a trip
    /// through [`Rgba::with_opacity`].
    pub fn opacity_percent(&self) -> u8 {
        (self.opacity() * 100.0).round() as u8
    }

    pub fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    /// Replaces alpha from a normalized opacity; out-of-range input is clamped.
    pub fn with_opacity(self, opacity: f64) -> Self {
        self.with_alpha((clamp_unit(opacity) * 255.0).round() as u8)
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha == 255
    }

    pub fn to_hsv(&self) -> Hsv {
        rgb_to_hsv(self.red, self.green, self.blue)
    }

    /// Channels as `[red, green, blue, alpha]`.
    pub fn channels(&self) -> [i32; 4] {
        [
            self.red as i32,
            self.green as i32,
            self.blue as i32,
            self.alpha as i32,
        ]
    }

    /// Lowercase `rrggbb`, with `aa` appended when `include_alpha` is set.
    pub fn to_hex(&self, include_alpha: bool) -> String {
        let rgb = format!("{:02x}{:02x}{:02x}", self.red, self.green, self.blue);
        if include_alpha {
            format!("{rgb}{:02x}", self.alpha)
        } else {
            rgb
        }
    }

    /// `rgb(r,g,b), #rrggbb` for opaque colors, otherwise
    /// `rgba(r,g,b,a), #rrggbbaa` with `a` floored to two decimals.
    pub fn rgba_label(&self) -> String {
        if self.is_opaque() {
            return format!(
                "rgb({},{},{}), #{}",
                self.red,
                self.green,
                self.blue,
                self.to_hex(false)
            );
        }
        let alpha = (self.opacity() * 100.0).floor() / 100.0;
        format!(
            "rgba({},{},{},{}), #{}",
            self.red,
            self.green,
            self.blue,
            alpha,
            self.to_hex(true)
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex(!self.is_opaque()))
    }
}

/// Hue in degrees, saturation and value in percent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    /// Builds an HSV triple, wrapping hue and clamping the percentages.
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue: wrap_hue(hue),
            saturation: clamp_unit(saturation / 100.0) * 100.0,
            value: clamp_unit(value / 100.0) * 100.0,
        }
    }

    /// Opaque RGB for this triple.
    pub fn to_rgba(&self) -> Rgba {
        hsv_to_rgb(self.hue, self.saturation, self.value)
    }

    /// Whole-number view: hue in `[0, 360)`, saturation and value in `[0, 100]`.
    pub fn rounded(&self) -> (u16, u8, u8) {
        let hue = (self.hue.round() as i64).rem_euclid(360) as u16;
        let saturation = (clamp_unit(self.saturation / 100.0) * 100.0).round() as u8;
        let value = (clamp_unit(self.value / 100.0) * 100.0).round() as u8;
        (hue, saturation, value)
    }
}

/// Wraps any angle in degrees into `[0, 360)`. Non-finite input becomes 0.
pub fn wrap_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid may round up to the divisor for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// RGB to HSV. Achromatic colors (r == g == b) report hue 0 and saturation 0.
pub fn rgb_to_hsv(red: u8, green: u8, blue: u8) -> Hsv {
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let chroma = (max - min) as f64;

    let value = max as f64 / 255.0 * 100.0;
    let saturation = if max == 0 {
        0.0
    } else {
        chroma / max as f64 * 100.0
    };

    let (r, g, b) = (red as f64, green as f64, blue as f64);
    let mut hue = if chroma == 0.0 {
        0.0
    } else if max == red {
        60.0 * ((g - b) / chroma)
    } else if max == green {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    Hsv {
        hue: wrap_hue(hue),
        saturation,
        value,
    }
}

/// RGB to whole-number HSV: `(hue 0..360, saturation 0..=100, value 0..=100)`.
pub fn rgb_to_hsv_int(red: u8, green: u8, blue: u8) -> (u16, u8, u8) {
    rgb_to_hsv(red, green, blue).rounded()
}

/// HSV to opaque RGB.
///
/// Hue wraps, saturation and value are clamped to `[0, 100]`, and each
/// channel is rounded to the nearest integer.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgba {
    let hue = wrap_hue(hue);
    let s = clamp_unit(saturation / 100.0);
    let v = clamp_unit(value / 100.0);

    let chroma = v * s;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = v - chroma;

    let (r, g, b) = match sector.floor() as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    Rgba::rgb(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

fn to_channel(unit: f64) -> u8 {
    (clamp_unit(unit) * 255.0).round() as u8
}

/// Formats raw `[red, green, blue, alpha]` channels as lowercase hex.
///
/// Channels are not clamped: any value outside `0..=255` fails with
/// [`ColorError::InvalidChannel`], alpha included even when it is not emitted.
pub fn to_hex(channels: [i32; 4], include_alpha: bool) -> Result<String, ColorError> {
    const NAMES: [&str; 4] = ["red", "green", "blue", "alpha"];

    let mut bytes = [0u8; 4];
    for (i, &value) in channels.iter().enumerate() {
        bytes[i] = u8::try_from(value).map_err(|_| ColorError::InvalidChannel {
            channel: NAMES[i],
            value,
        })?;
    }
    Ok(Rgba::new(bytes[0], bytes[1], bytes[2], bytes[3]).to_hex(include_alpha))
}

/// Parses `rrggbb` or `rrggbbaa`, optionally prefixed with `#`.
pub fn parse_hex(input: &str) -> Result<Rgba, ColorError> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let invalid = || ColorError::InvalidHex(input.to_string());

    if !(digits.len() == 6 || digits.len() == 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let byte = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| invalid());
    let alpha = if digits.len() == 8 { byte(6)? } else { 255 };
    Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, alpha))
}
