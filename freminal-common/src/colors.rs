// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use conv2::ValueInto;
use std::fmt;

#[must_use]
pub fn lookup_256_color_by_index(index: usize) -> TerminalColor {
    // https://stackoverflow.com/questions/69138165/how-to-get-the-rgb-values-of-a-256-color-palette-terminal-color
    match index {
        // standard colors 0 -15, as well as their bright counterparts 8-15
        // And the other values that map to them further up the color table
        // Standard ANSI colors (0–7)
        0 | 16 | 256 => TerminalColor::Black,
        1 => TerminalColor::Red,
        2 => TerminalColor::Green,
        3 => TerminalColor::Yellow,
        4 => TerminalColor::Blue,
        5 => TerminalColor::Magenta,
        6 => TerminalColor::Cyan,
        7 => TerminalColor::White,

        // Bright ANSI colors (8–15)
        8 => TerminalColor::BrightBlack,
        9 => TerminalColor::BrightRed,
        10 => TerminalColor::BrightGreen,
        11 => TerminalColor::BrightYellow,
        12 => TerminalColor::BrightBlue,
        13 => TerminalColor::BrightMagenta,
        14 => TerminalColor::BrightCyan,
        15 => TerminalColor::BrightWhite,
        // gray scale
        232..=255 => {
            let value = (2056 + 2570 * (index - 232)) / 256;

            // use conv2 crate to ensure safe casting
            let value: u8 = value.value_into().unwrap_or(0);
            TerminalColor::Custom(value, value, value)
        } // // the blacks
        // 0 | 16 | 256.. => (0, 0, 0),
        // // programtic colors
        _ => {
            let r = cube_component(index, 36).value_into().unwrap_or(0);
            let g = cube_component(index, 6).value_into().unwrap_or(0);
            let b = cube_component(index, 1).value_into().unwrap_or(0);
            TerminalColor::Custom(r, g, b)
        }
    }
}

#[must_use]
pub const fn cube_component(value: usize, modifier: usize) -> usize {
    let i = ((value - 16) / modifier) % 6;

    if i == 0 { 0 } else { (14135 + 10280 * i) / 256 }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TerminalColor {
    Default,
    DefaultBackground,
    DefaultUnderlineColor,
    DefaultCursorColor,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightYellow,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Custom(u8, u8, u8),
}

impl TerminalColor {
    #[must_use]
    pub const fn default_to_regular(self) -> Self {
        match self {
            Self::Default | Self::DefaultUnderlineColor | Self::DefaultCursorColor => Self::White,
            Self::DefaultBackground => Self::Black,
            _ => self,
        }
    }
}

impl fmt::Display for TerminalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Default => "default",
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::BrightYellow => "bright yellow",
            Self::BrightBlack => "bright black",
            Self::BrightRed => "bright red",
            Self::BrightGreen => "bright green",
            Self::BrightBlue => "bright blue",
            Self::BrightMagenta => "bright magenta",
            Self::BrightCyan => "bright cyan",
            Self::BrightWhite => "bright white",
            Self::DefaultUnderlineColor => "default underline color",
            Self::DefaultBackground => "default background",
            Self::DefaultCursorColor => "default cursor color",
            Self::Custom(r, g, b) => {
                return write!(f, "rgb({r}, {g}, {b})");
            }
        };

        f.write_str(s)
    }
}

/// RGB triple backing the lowest 16 palette slots, matching the default theme.
///
/// Slots 16..=255 fall back to the computed 6x6x6 cube / grayscale ramp via
/// [`lookup_256_color_by_index`], since those are already purely derived from
/// their index and carry no separate "named" identity.
#[must_use]
pub fn default_rgb_for_index(index: u8) -> (u8, u8, u8) {
    match index {
        0 => (0x45, 0x47, 0x5a),
        1 => (0xf3, 0x8b, 0xa8),
        2 => (0xa6, 0xe3, 0xa1),
        3 => (0xf9, 0xe2, 0xaf),
        4 => (0x89, 0xb4, 0xfa),
        5 => (0xf5, 0xc2, 0xe7),
        6 => (0x94, 0xe2, 0xd5),
        7 => (0xa6, 0xad, 0xc8),
        8 => (0x58, 0x5b, 0x70),
        9 => (0xf3, 0x77, 0x99),
        10 => (0x89, 0xd8, 0x8b),
        11 => (0xeb, 0xd3, 0x91),
        12 => (0x74, 0xa8, 0xfc),
        13 => (0xf2, 0xae, 0xde),
        14 => (0x6b, 0xd7, 0xca),
        15 => (0xba, 0xc2, 0xde),
        _ => match lookup_256_color_by_index(usize::from(index)) {
            TerminalColor::Custom(r, g, b) => (r, g, b),
            _ => (0, 0, 0),
        },
    }
}

/// Parse an OSC 4 / OSC 104 color spec into an RGB triple.
///
/// Accepts the two forms xterm sends in practice: `#RRGGBB` and the X11-style
/// `rgb:RR/GG/BB` (also tolerating the wider `RRRR/GGGG/BBBB` component width,
/// keeping only the high byte of each component).
#[must_use]
pub fn parse_color_spec(spec: &str) -> Option<(u8, u8, u8)> {
    fn component(s: &str) -> Option<u8> {
        // xterm allows 1-4 hex digits per component; only the most
        // significant byte is kept when more than two digits are given.
        let padded = if s.len() < 2 {
            format!("{s}{s}")
        } else {
            s.to_string()
        };
        u8::from_str_radix(&padded[0..2], 16).ok()
    }

    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some((r, g, b));
    }

    if let Some(rest) = spec.strip_prefix("rgb:") {
        let mut parts = rest.split('/');
        let r = component(parts.next()?)?;
        let g = component(parts.next()?)?;
        let b = component(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        return Some((r, g, b));
    }

    None
}

/// Mutable 256-slot color table backing OSC 4 (set) / OSC 104 (reset).
///
/// Defaults mirror [`default_rgb_for_index`]; redefining or resetting a slot
/// only affects future lookups through this table, not cells whose color was
/// already resolved at parse time.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: [(u8, u8, u8); 256],
}

impl Default for Palette {
    fn default() -> Self {
        let mut entries = [(0u8, 0u8, 0u8); 256];
        for (i, entry) in entries.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let idx = i as u8;
            *entry = default_rgb_for_index(idx);
        }
        Self { entries }
    }
}

impl Palette {
    #[must_use]
    pub fn get(&self, index: u8) -> (u8, u8, u8) {
        self.entries[usize::from(index)]
    }

    pub fn set(&mut self, index: u8, rgb: (u8, u8, u8)) {
        self.entries[usize::from(index)] = rgb;
    }

    pub fn reset(&mut self, index: u8) {
        self.entries[usize::from(index)] = default_rgb_for_index(index);
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}

impl std::str::FromStr for TerminalColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let ret = match s {
            "default" => Self::Default,
            "default_background" => Self::DefaultBackground,
            "default_underline_color" => Self::DefaultUnderlineColor,
            "default_cursor_color" => Self::DefaultCursorColor,
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "bright yellow" => Self::BrightYellow,
            "bright black" => Self::BrightBlack,
            "bright red" => Self::BrightRed,
            "bright green" => Self::BrightGreen,
            "bright blue" => Self::BrightBlue,
            "bright magenta" => Self::BrightMagenta,
            "bright cyan" => Self::BrightCyan,
            "bright white" => Self::BrightWhite,
            _ => return Err(anyhow::anyhow!("Invalid color string")),
        };
        Ok(ret)
    }
}
