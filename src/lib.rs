// src/lib.rs

//! `codetype` plays a looping "typing" animation of a short code script and
//! highlights every visible line for display.
//!
//! The two halves are independent:
//! - [`typing`] owns the state machine that reveals and erases the script,
//!   plus a driver thread that runs it on a real clock.
//! - [`highlight`] is a pure, stateless line tokenizer.
//!
//! [`render`] glues them together for an ANSI terminal.

pub mod color;
pub mod config;
pub mod highlight;
pub mod render;
pub mod script;
pub mod typing;

pub use highlight::{highlight, HighlightMode, HighlightOptions, Highlighter, Token, TokenKind};
pub use typing::{
    frame_channel, AnimatorActor, AnimatorCommand, Phase, Transition, TransitionKind, TypingAnimator,
    TypingConfig, TypingFrame, TypingState,
};
