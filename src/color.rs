//! Display colors and their textual encoding.
//!
//! Colors are written as six lowercase hex digits (`ff0000`). An absent color
//! is written as the sentinel `None`. On input an optional `#` prefix, an
//! 8-digit ARGB form (alpha is dropped) and a handful of common color names are
//! also accepted.

use serde::{Deserialize, Serialize};

/// Sentinel used in documents for "no color".
pub const NONE_SENTINEL: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const DARK_GRAY: Color = Color::rgb(0x40, 0x40, 0x40);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `rrggbb`, `aarrggbb` (with or without `#`) or a color name.
    pub fn parse(val: &str) -> Option<Color> {
        let val = val.trim();
        let hex = val.strip_prefix('#').unwrap_or(val);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return named(val);
        }
        let digits = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return None,
        };
        let n = u32::from_str_radix(digits, 16).ok()?;
        Some(Color::rgb((n >> 16) as u8, (n >> 8) as u8, n as u8))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn named(val: &str) -> Option<Color> {
    let c = match val.to_ascii_lowercase().as_str() {
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "red" => Color::RED,
        "green" | "lime" => Color::GREEN,
        "blue" => Color::BLUE,
        "yellow" => Color::rgb(0xff, 0xff, 0x00),
        "orange" => Color::rgb(0xff, 0xc8, 0x00),
        "cyan" => Color::rgb(0x00, 0xff, 0xff),
        "magenta" => Color::rgb(0xff, 0x00, 0xff),
        "pink" => Color::rgb(0xff, 0xaf, 0xaf),
        "gray" | "grey" => Color::rgb(0x80, 0x80, 0x80),
        "lightgray" | "lightgrey" => Color::rgb(0xc0, 0xc0, 0xc0),
        "darkgray" | "darkgrey" => Color::DARK_GRAY,
        _ => return None,
    };
    Some(c)
}

/// Encode an optional color, using [`NONE_SENTINEL`] for absence.
pub fn encode(color: Option<Color>) -> String {
    match color {
        Some(c) => c.to_hex(),
        None => NONE_SENTINEL.to_string(),
    }
}

/// Decode an optional color. `None` (the sentinel) and the empty string mean
/// no color; anything unparsable is `Err(())`.
pub fn decode(val: &str) -> Result<Option<Color>, ()> {
    let val = val.trim();
    if val.is_empty() || val == NONE_SENTINEL {
        return Ok(None);
    }
    Color::parse(val).map(Some).ok_or(())
}
