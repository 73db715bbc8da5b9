// src/typing/mod.rs

//! The typing animation: a state machine that types a script line by line,
//! holds it, erases it from the end backward, holds the empty state and
//! starts over.
//!
//! [`TypingAnimator`] is the pure machine. It never sleeps; callers either
//! `step()` it one transition at a time, feed it elapsed time through
//! `advance()`, or hand it to an [`AnimatorActor`] which drives it from a
//! dedicated thread on a real clock.

mod actor;
mod machine;

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use actor::{frame_channel, AnimatorActor, AnimatorCommand, FRAME_CHANNEL_CAPACITY};
pub use machine::{Phase, Transition, TransitionKind, TypingAnimator, TypingState};

/// Pacing and content of one animation. Fixed for the lifetime of an
/// animator.
///
/// Durations are signed milliseconds as a caller might write them in a
/// config file; the accessors clamp negative values to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// The script, in typing order.
    pub lines: Vec<String>,
    /// Delay before each typed character.
    pub typing_speed_ms: i64,
    /// Delay before each deleted character or dropped empty line.
    pub deleting_speed_ms: i64,
    /// How long the fully typed script stays on screen.
    pub pause_before_delete_ms: i64,
    /// How long the empty screen stays before typing restarts.
    pub pause_before_restart_ms: i64,
    /// Wait inserted by the driver thread after a cycle that took no time at
    /// all (e.g. an empty script with zero pauses).
    pub idle_backoff_ms: i64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        TypingConfig {
            lines: Vec::new(),
            typing_speed_ms: 40,
            deleting_speed_ms: 20,
            pause_before_delete_ms: 1500,
            pause_before_restart_ms: 500,
            idle_backoff_ms: 16, // one frame at 60 FPS
        }
    }
}

impl TypingConfig {
    /// Default pacing for the given script.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypingConfig {
            lines: lines.into_iter().map(Into::into).collect(),
            ..TypingConfig::default()
        }
    }

    /// Quick typing and fast erasing, as used by the editor-style code block.
    pub fn editor<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypingConfig {
            typing_speed_ms: 75,
            deleting_speed_ms: 15,
            pause_before_delete_ms: 150,
            pause_before_restart_ms: 50,
            ..TypingConfig::new(lines)
        }
    }

    pub fn typing_speed(&self) -> Duration {
        clamp_ms(self.typing_speed_ms)
    }

    pub fn deleting_speed(&self) -> Duration {
        clamp_ms(self.deleting_speed_ms)
    }

    pub fn pause_before_delete(&self) -> Duration {
        clamp_ms(self.pause_before_delete_ms)
    }

    pub fn pause_before_restart(&self) -> Duration {
        clamp_ms(self.pause_before_restart_ms)
    }

    pub fn idle_backoff(&self) -> Duration {
        clamp_ms(self.idle_backoff_ms)
    }

    /// Logs every negative duration. Negative values are a caller error but
    /// are clamped rather than rejected so the loop keeps running.
    pub(crate) fn warn_on_negative(&self) {
        let fields = [
            ("typing_speed_ms", self.typing_speed_ms),
            ("deleting_speed_ms", self.deleting_speed_ms),
            ("pause_before_delete_ms", self.pause_before_delete_ms),
            ("pause_before_restart_ms", self.pause_before_restart_ms),
            ("idle_backoff_ms", self.idle_backoff_ms),
        ];
        for (name, value) in fields {
            if value < 0 {
                warn!("TypingConfig: {} is {} ms, clamping to 0", name, value);
            }
        }
    }
}

fn clamp_ms(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

/// Owned snapshot of what a renderer needs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub displayed_lines: Vec<String>,
    pub is_deleting: bool,
    pub is_complete: bool,
    pub phase: Phase,
}

impl TypingFrame {
    /// The typing cursor is shown while typing, once something is visible.
    pub fn shows_cursor(&self) -> bool {
        !self.is_deleting && !self.displayed_lines.is_empty()
    }
}

#[cfg(test)]
mod tests;
