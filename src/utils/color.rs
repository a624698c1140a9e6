use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A colour with four float channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Channels scaled to bytes, alpha dropped.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        fn channel(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        (channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::opaque(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(input: &str) -> Result<Self, String> {
        let hex = input.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid colour '{input}': expected #rrggbb or #rrggbbaa"));
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        let (r, g, b) = (byte(0)?, byte(2)?, byte(4)?);
        let mut color = Self::from_rgb8(r, g, b);
        if hex.len() == 8 {
            color.a = byte(6)? as f32 / 255.0;
        }
        Ok(color)
    }

    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    pub fn to_tui(self) -> Color {
        let (r, g, b) = self.to_rgb8();
        Color::Rgb(r, g, b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_hex()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Truecolor,
    X256,
    X16,
}

/// Environment variable that forces a colour depth.
pub const COLOR_ENV: &str = "SCHOOLBOT_COLOR";

/// Detect terminal color depth from environment.
/// Priority: SCHOOLBOT_COLOR override -> COLORTERM truecolor/24bit -> TERM *256color -> 16.
pub fn detect_color_depth() -> ColorDepth {
    depth_from_env(
        std::env::var(COLOR_ENV).ok().as_deref(),
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

/// Parse a forced depth (`truecolor`, `256`, `16` and aliases); anything else is no override.
pub fn forced_color_depth(force: Option<&str>) -> Option<ColorDepth> {
    match force?.trim().to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" | "24-bit" => Some(ColorDepth::Truecolor),
        "256" | "x256" | "256color" => Some(ColorDepth::X256),
        "16" | "ansi" | "x16" => Some(ColorDepth::X16),
        _ => None,
    }
}

fn depth_from_env(force: Option<&str>, colorterm: Option<&str>, term: Option<&str>) -> ColorDepth {
    if let Some(depth) = forced_color_depth(force) {
        return depth;
    }

    if let Some(colorterm) = colorterm {
        let s = colorterm.to_ascii_lowercase();
        if s.contains("truecolor") || s.contains("24bit") || s.contains("24-bit") {
            return ColorDepth::Truecolor;
        }
    }
    if let Some(term) = term {
        if term.to_ascii_lowercase().contains("256color") {
            return ColorDepth::X256;
        }
    }
    ColorDepth::X16
}

/// Map a Color to the nearest representable color in the chosen depth.
pub fn quantize_color(color: Color, depth: ColorDepth) -> Color {
    match (color, depth) {
        (Color::Rgb(r, g, b), ColorDepth::X256) => Color::Indexed(nearest_xterm256(r, g, b)),
        (Color::Rgb(r, g, b), ColorDepth::X16) => nearest_ansi16(r, g, b),
        (other, _) => other,
    }
}

const ANSI16: [(u8, u8, u8, Color); 16] = [
    (0, 0, 0, Color::Black),
    (205, 0, 0, Color::Red),
    (0, 205, 0, Color::Green),
    (205, 205, 0, Color::Yellow),
    (0, 0, 205, Color::Blue),
    (205, 0, 205, Color::Magenta),
    (0, 205, 205, Color::Cyan),
    (192, 192, 192, Color::Gray),
    (128, 128, 128, Color::DarkGray),
    (255, 0, 0, Color::LightRed),
    (0, 255, 0, Color::LightGreen),
    (255, 255, 0, Color::LightYellow),
    (92, 92, 255, Color::LightBlue),
    (255, 0, 255, Color::LightMagenta),
    (0, 255, 255, Color::LightCyan),
    (255, 255, 255, Color::White),
];

fn nearest_ansi16(r: u8, g: u8, b: u8) -> Color {
    ANSI16
        .iter()
        .min_by_key(|&&(rr, gg, bb, _)| dist_sq((r, g, b), (rr, gg, bb)))
        .map(|entry| entry.3)
        .unwrap_or(Color::Reset)
}

fn nearest_xterm256(r: u8, g: u8, b: u8) -> u8 {
    // 6x6x6 cube vs. 24-step grey ramp, whichever lands closer
    fn cube_level(c: u8) -> u8 {
        if c < 48 {
            0
        } else if c < 114 {
            1
        } else {
            ((c - 35) / 40).min(5)
        }
    }
    fn cube_value(level: u8) -> u8 {
        if level == 0 {
            0
        } else {
            55 + 40 * level
        }
    }

    let (ri, gi, bi) = (cube_level(r), cube_level(g), cube_level(b));
    let cube_index = 16 + 36 * ri + 6 * gi + bi;
    let cube_rgb = (cube_value(ri), cube_value(gi), cube_value(bi));

    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let step = (avg.saturating_sub(8) / 10).min(23) as u8;
    let grey = 8 + 10 * step;
    let grey_index = 232 + step;

    if dist_sq((r, g, b), (grey, grey, grey)) < dist_sq((r, g, b), cube_rgb) {
        grey_index
    } else {
        cube_index
    }
}

fn dist_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}
