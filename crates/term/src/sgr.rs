//! SGR (Select Graphic Rendition) attributes and colors.
//!
//! Attributes are the numeric parameter strings; [`set`] joins any number of
//! them into one sequence and [`wrap`] brackets text with set/reset so a
//! style never leaks past the text it was applied to.
//!
//! Color builders silently return an empty string for values outside their
//! range: styling is cosmetic and never fails.

use std::fmt;

use crossterm::Command;

use crate::csi::CSI;

/// Reset all attributes.
pub const RESET: &str = "\x1b[m";

pub const BOLD: &str = "1";
pub const FAINT: &str = "2";
pub const ITALIC: &str = "3";
pub const UNDERLINE: &str = "4";
pub const SLOW_BLINK: &str = "5";
pub const RAPID_BLINK: &str = "6";
pub const REVERSE: &str = "7";
pub const HIDE: &str = "8";
pub const STRIKE: &str = "9";

pub const PRIMARY_FONT: &str = "10";

pub const NOT_BOLD: &str = "21";
pub const NOT_FAINT: &str = "22";
pub const NOT_ITALIC: &str = "23";
pub const NOT_UNDERLINE: &str = "24";
pub const NOT_BLINK: &str = "25";
pub const NOT_REVERSE: &str = "27";
pub const NOT_HIDE: &str = "28";
pub const NOT_STRIKE: &str = "29";

pub const OVERLINE: &str = "53";
pub const NOT_OVERLINE: &str = "55";

const COLOR_256: &str = "8;5;";
const COLOR_RGB: &str = "8;2;";

/// Number of colors in the basic palette.
pub const COLOR8_MAX: u8 = 8;

/// One SGR sequence carrying a single parameter string.
pub fn sgr(param: &str) -> String {
    format!("{CSI}{param}m")
}

/// Combine attributes into one sequence. No attributes means no sequence.
pub fn set(attrs: &[&str]) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    sgr(&attrs.join(";"))
}

/// `set(attrs)` + `text` + [`RESET`].
pub fn wrap(text: &str, attrs: &[&str]) -> String {
    format!("{}{text}{RESET}", set(attrs))
}

/// Color role. Raw values outside the four defined roles are representable
/// and produce no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorType(pub u8);

impl ColorType {
    pub const FOREGROUND: ColorType = ColorType(0);
    pub const BACKGROUND: ColorType = ColorType(1);
    pub const BRIGHT_FOREGROUND: ColorType = ColorType(2);
    pub const BRIGHT_BACKGROUND: ColorType = ColorType(3);

    /// Role from its raw value. Unknown values are kept and emit no color.
    pub const fn from_u8(raw: u8) -> Self {
        ColorType(raw)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Leading digit(s) of the color parameter, `None` for unknown roles.
    pub fn prefix(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("3"),
            1 => Some("4"),
            2 => Some("9"),
            3 => Some("10"),
            _ => None,
        }
    }
}

/// The basic 8-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color8 {
    Black = 0,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl From<Color8> for u8 {
    fn from(color: Color8) -> u8 {
        color as u8
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parameter for a palette color; empty if the role is unknown or
/// `index >= 8`.
pub fn color8(role: ColorType, index: impl Into<u8>) -> String {
    let index = index.into();
    match role.prefix() {
        Some(prefix) if index < COLOR8_MAX => format!("{prefix}{index}"),
        _ => String::new(),
    }
}

/// Parameter for a 256-color palette entry.
pub fn color256(role: ColorType, index: u8) -> String {
    match role.prefix() {
        Some(prefix) => format!("{prefix}{COLOR_256}{index}"),
        None => String::new(),
    }
}

/// Parameter for a 24-bit color.
pub fn color_rgb(role: ColorType, rgb: Rgb) -> String {
    match role.prefix() {
        Some(prefix) => format!("{prefix}{COLOR_RGB}{};{};{}", rgb.r, rgb.g, rgb.b),
        None => String::new(),
    }
}

/// Queueable form of [`wrap`].
#[derive(Debug, Clone, Copy)]
pub struct Styled<'a> {
    pub text: &'a str,
    pub attrs: &'a [&'a str],
}

impl Command for Styled<'_> {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str(&wrap(self.text, self.attrs))
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Err(std::io::Error::other("ANSI terminal required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_joins_attributes() {
        assert_eq!(set(&[BOLD]), "\x1b[1m");
        assert_eq!(set(&[BOLD, UNDERLINE, REVERSE]), "\x1b[1;4;7m");
    }

    #[test]
    fn set_without_attributes_is_empty() {
        assert_eq!(set(&[]), "");
    }

    #[test]
    fn wrap_always_resets() {
        assert_eq!(wrap("hi", &[BOLD, FAINT]), "\x1b[1;2mhi\x1b[m");
        assert_eq!(wrap("hello world", &[]), "hello world\x1b[m");
    }

    #[test]
    fn palette_colors() {
        assert_eq!(color8(ColorType::FOREGROUND, Color8::Red), "31");
        assert_eq!(color8(ColorType::BACKGROUND, Color8::Black), "40");
        assert_eq!(color8(ColorType::BRIGHT_FOREGROUND, Color8::White), "97");
        assert_eq!(color8(ColorType::BRIGHT_BACKGROUND, 2u8), "102");
        assert_eq!(
            wrap("x", &[&color8(ColorType::FOREGROUND, Color8::Red)]),
            "\x1b[31mx\x1b[m"
        );
    }

    #[test]
    fn extended_colors() {
        assert_eq!(color256(ColorType::FOREGROUND, 0x1f), "38;5;31");
        assert_eq!(
            color_rgb(ColorType::BACKGROUND, Rgb::new(0xcc, 0xcc, 0xcc)),
            "48;2;204;204;204"
        );
    }

    #[test]
    fn roles_from_raw_values() {
        assert_eq!(ColorType::from_u8(0), ColorType::FOREGROUND);
        assert_eq!(ColorType::from_u8(3), ColorType::BRIGHT_BACKGROUND);
        assert_eq!(ColorType::from_u8(7).as_u8(), 7);
        assert_eq!(color8(ColorType::from_u8(1), Color8::Blue), "44");
        assert_eq!(color256(ColorType::from_u8(2), 200), "98;5;200");
        assert_eq!(color8(ColorType::from_u8(4), Color8::Red), "");
    }

    #[test]
    fn out_of_range_colors_are_rejected_silently() {
        assert_eq!(color8(ColorType(4), Color8::Red), "");
        assert_eq!(color8(ColorType(255), 0u8), "");
        assert_eq!(color8(ColorType::FOREGROUND, 8u8), "");
        assert_eq!(color8(ColorType::FOREGROUND, 200u8), "");
        assert_eq!(color256(ColorType(9), 1), "");
        assert_eq!(color_rgb(ColorType(4), Rgb::default()), "");
    }

    #[test]
    fn styled_command_matches_wrap() {
        let mut out = String::new();
        Styled {
            text: "ok",
            attrs: &[BOLD],
        }
        .write_ansi(&mut out)
        .unwrap();
        assert_eq!(out, wrap("ok", &[BOLD]));
    }
}
