// src/color.rs

//! Defines colour values (`NamedColor`, `Color`), per-token styling
//! (`TokenStyle`, `StyleFlags`) and the `Palette` that binds every
//! [`TokenKind`] to a style.
//!
//! The tokenizer only produces categories; this table is the single place
//! where categories become colours.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::highlight::TokenKind;

/// Standard ANSI named colors (indices 0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// SGR foreground parameter for this color (30-37 normal, 90-97 bright).
    pub fn fg_sgr_code(self) -> u8 {
        let idx = self as u8;
        if idx < 8 {
            30 + idx
        } else {
            90 + (idx - 8)
        }
    }
}

/// A color value as used by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    /// The terminal's own foreground color.
    #[default]
    Default,
    /// A standard named ANSI color (indices 0-15).
    Named(NamedColor),
    /// An entry of the 256-color palette.
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Builds an RGB color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Color::Rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// SGR parameter list selecting this color as the foreground.
    pub fn fg_sgr_params(&self) -> String {
        match *self {
            Color::Default => "39".to_string(),
            Color::Named(named) => named.fg_sgr_code().to_string(),
            Color::Indexed(idx) => format!("38;5;{}", idx),
            Color::Rgb(r, g, b) => format!("38;2;{};{};{}", r, g, b),
        }
    }
}

bitflags! {
    /// Text attributes a palette entry may add on top of its color.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StyleFlags: u8 {
        const BOLD      = 1 << 0;
        const ITALIC    = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

/// How one token category is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TokenStyle {
    pub fg: Color,
    pub flags: StyleFlags,
}

impl TokenStyle {
    pub const fn plain(fg: Color) -> Self {
        TokenStyle {
            fg,
            flags: StyleFlags::empty(),
        }
    }
}

/// Category → style table. Defaults follow the One Dark theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub keyword: TokenStyle,
    pub sql_keyword: TokenStyle,
    pub string: TokenStyle,
    pub comment: TokenStyle,
    pub number: TokenStyle,
    pub builtin: TokenStyle,
    pub function: TokenStyle,
    pub decorator: TokenStyle,
    pub operator: TokenStyle,
    pub class: TokenStyle,
    pub text: TokenStyle,
    /// Color of the block cursor drawn after the last typed line.
    pub cursor: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            keyword: TokenStyle::plain(Color::from_hex(0xc678dd)), // purple
            sql_keyword: TokenStyle::plain(Color::from_hex(0x56b6c2)), // cyan
            string: TokenStyle::plain(Color::from_hex(0x98c379)),  // green
            comment: TokenStyle {
                fg: Color::from_hex(0x5c6370), // gray
                flags: StyleFlags::ITALIC,
            },
            number: TokenStyle::plain(Color::from_hex(0xd19a66)), // orange
            builtin: TokenStyle::plain(Color::from_hex(0xe5c07b)), // yellow
            function: TokenStyle::plain(Color::from_hex(0x61afef)), // blue
            decorator: TokenStyle::plain(Color::from_hex(0xd19a66)),
            operator: TokenStyle::plain(Color::from_hex(0x56b6c2)),
            class: TokenStyle::plain(Color::from_hex(0xe5c07b)),
            text: TokenStyle::plain(Color::from_hex(0xabb2bf)), // light gray
            cursor: Color::from_hex(0x528bff),
        }
    }
}

impl Palette {
    /// Looks up the style for a token category.
    pub fn style(&self, kind: TokenKind) -> TokenStyle {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::SqlKeyword => self.sql_keyword,
            TokenKind::String => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::Number => self.number,
            TokenKind::Builtin => self.builtin,
            TokenKind::Function => self.function,
            TokenKind::Decorator => self.decorator,
            TokenKind::Operator => self.operator,
            TokenKind::Class => self.class,
            TokenKind::Text => self.text,
        }
    }
}
