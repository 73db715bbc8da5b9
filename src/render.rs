// src/render.rs

//! Turns highlighted lines into ANSI text for a terminal.
//!
//! Each token is preceded by a full SGR sequence (reset, foreground, style
//! flags) and every line ends with a reset, so lines can be printed in any
//! order without leaking attributes.

use crate::color::{Color, Palette, StyleFlags, TokenStyle};
use crate::config::RenderConfig;
use crate::highlight::{Highlighter, Token};
use crate::typing::TypingFrame;

const SGR_RESET: &str = "\x1b[0m";
const CLEAR_AND_HOME: &str = "\x1b[H\x1b[2J";

fn sgr(style: TokenStyle) -> String {
    let mut params = format!("0;{}", style.fg.fg_sgr_params());
    if style.flags.contains(StyleFlags::BOLD) {
        params.push_str(";1");
    }
    if style.flags.contains(StyleFlags::ITALIC) {
        params.push_str(";3");
    }
    if style.flags.contains(StyleFlags::UNDERLINE) {
        params.push_str(";4");
    }
    format!("\x1b[{}m", params)
}

/// Renders one tokenized line. Empty tokens produce no output.
pub fn render_line(tokens: &[Token<'_>], palette: &Palette) -> String {
    let mut out = String::new();
    for token in tokens.iter().filter(|t| !t.text.is_empty()) {
        out.push_str(&sgr(palette.style(token.kind)));
        out.push_str(token.text);
    }
    out.push_str(SGR_RESET);
    out
}

/// Renders every visible line of a frame, highlighting each one afresh.
pub fn render_frame(
    frame: &TypingFrame,
    highlighter: &Highlighter,
    palette: &Palette,
    config: &RenderConfig,
) -> String {
    let mut out = String::new();
    if config.clear_screen {
        out.push_str(CLEAR_AND_HOME);
    }

    let last = frame.displayed_lines.len().saturating_sub(1);
    for (i, line) in frame.displayed_lines.iter().enumerate() {
        out.push_str(&render_line(&highlighter.highlight_line(line), palette));
        if i == last && config.show_cursor && frame.shows_cursor() {
            out.push_str(&render_cursor(palette.cursor, config.cursor_char));
        }
        out.push('\n');
    }
    out
}

fn render_cursor(color: Color, cursor_char: char) -> String {
    format!("{}{}{}", sgr(TokenStyle::plain(color)), cursor_char, SGR_RESET)
}
