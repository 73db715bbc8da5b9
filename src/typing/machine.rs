// src/typing/machine.rs

//! The typing/deleting state machine.
//!
//! Every state has exactly one pending transition, made of an action and
//! the delay that must elapse before it is applied. The machine itself
//! never waits; it only reports the delay.

use log::{debug, trace};
use std::time::Duration;

use super::{TypingConfig, TypingFrame};

/// Mutable animation state. Owned by a single [`TypingAnimator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingState {
    /// Visible text: each entry is a prefix of the script line at the same
    /// index.
    pub displayed_lines: Vec<String>,
    /// Script line being typed. Meaningful only while typing.
    pub current_line_index: usize,
    /// Characters (not bytes) of the current line already revealed.
    pub current_char_index: usize,
    pub is_deleting: bool,
    /// Set once every line has been typed, cleared on restart.
    pub is_complete: bool,
}

impl TypingState {
    /// Total characters across all visible lines.
    pub fn visible_chars(&self) -> usize {
        self.displayed_lines.iter().map(|l| l.chars().count()).sum()
    }
}

/// Where the machine is, derived from [`TypingState`] and the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Characters of the current line remain to be typed.
    Typing,
    /// The current line is fully typed and waits to be committed.
    LineComplete,
    /// Every line is typed; holding before deletion.
    AllComplete,
    /// The last visible line still has characters.
    Deleting,
    /// The last visible line is empty and is dropped next.
    DeletingLineEmpty,
    /// Nothing is visible; holding before restart.
    AllDeleted,
}

/// The action part of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Reveal one more character of the current line.
    TypeChar,
    /// Commit the full current line and move to the next.
    CommitLine,
    /// Flag the script as fully typed. Takes no time.
    MarkComplete,
    /// Leave the hold and start deleting.
    BeginDelete,
    /// Remove the last character of the last visible line.
    DeleteChar,
    /// Remove the empty last visible line.
    DropLine,
    /// Return to the initial state.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    /// Time to wait, counted from the previous transition.
    pub delay: Duration,
}

/// Runs the typing loop over a fixed script.
#[derive(Debug, Clone)]
pub struct TypingAnimator {
    config: TypingConfig,
    state: TypingState,
    /// Time fed to `advance` that has not yet paid for a transition.
    carried: Duration,
    /// Delay accumulated since the last restart.
    cycle_elapsed: Duration,
    /// Transitions applied since the last restart.
    cycle_steps: usize,
    /// Duration and transition count of the last finished cycle.
    last_cycle: Option<(Duration, usize)>,
}

impl TypingAnimator {
    pub fn new(config: TypingConfig) -> Self {
        config.warn_on_negative();
        debug!(
            "TypingAnimator: new animation over {} lines",
            config.lines.len()
        );
        TypingAnimator {
            config,
            state: TypingState::default(),
            carried: Duration::ZERO,
            cycle_elapsed: Duration::ZERO,
            cycle_steps: 0,
            last_cycle: None,
        }
    }

    pub fn config(&self) -> &TypingConfig {
        &self.config
    }

    pub fn state(&self) -> &TypingState {
        &self.state
    }

    pub fn displayed_lines(&self) -> &[String] {
        &self.state.displayed_lines
    }

    pub fn is_deleting(&self) -> bool {
        self.state.is_deleting
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    /// Total delay of the most recently finished cycle, if one has finished
    /// since construction or the last reset.
    pub fn last_cycle_duration(&self) -> Option<Duration> {
        self.last_cycle.map(|(duration, _)| duration)
    }

    pub fn frame(&self) -> TypingFrame {
        TypingFrame {
            displayed_lines: self.state.displayed_lines.clone(),
            is_deleting: self.state.is_deleting,
            is_complete: self.state.is_complete,
            phase: self.phase(),
        }
    }

    pub fn phase(&self) -> Phase {
        let state = &self.state;
        if state.is_deleting {
            return match state.displayed_lines.last() {
                None => Phase::AllDeleted,
                Some(line) if line.is_empty() => Phase::DeletingLineEmpty,
                Some(_) => Phase::Deleting,
            };
        }

        match self.config.lines.get(state.current_line_index) {
            Some(_) if state.is_complete => Phase::AllComplete,
            None => Phase::AllComplete,
            Some(line) if state.current_char_index >= line.chars().count() => {
                Phase::LineComplete
            }
            Some(_) => Phase::Typing,
        }
    }

    /// The transition `step` would apply next.
    pub fn pending(&self) -> Transition {
        let (kind, delay) = match self.phase() {
            Phase::Typing => (TransitionKind::TypeChar, self.config.typing_speed()),
            // Line boundaries hold for two typing ticks.
            Phase::LineComplete => (
                TransitionKind::CommitLine,
                self.config.typing_speed().saturating_mul(2),
            ),
            Phase::AllComplete if !self.state.is_complete => {
                (TransitionKind::MarkComplete, Duration::ZERO)
            }
            Phase::AllComplete => (
                TransitionKind::BeginDelete,
                self.config.pause_before_delete(),
            ),
            Phase::Deleting => (TransitionKind::DeleteChar, self.config.deleting_speed()),
            Phase::DeletingLineEmpty => (TransitionKind::DropLine, self.config.deleting_speed()),
            Phase::AllDeleted => (
                TransitionKind::Restart,
                self.config.pause_before_restart(),
            ),
        };
        Transition { kind, delay }
    }

    /// Applies the pending transition immediately and returns it.
    pub fn step(&mut self) -> Transition {
        let transition = self.pending();
        self.apply(transition.kind);
        self.cycle_elapsed = self.cycle_elapsed.saturating_add(transition.delay);
        self.cycle_steps = self.cycle_steps.saturating_add(1);
        if transition.kind == TransitionKind::Restart {
            self.last_cycle = Some((self.cycle_elapsed, self.cycle_steps));
            self.cycle_elapsed = Duration::ZERO;
            self.cycle_steps = 0;
        }
        transition
    }

    /// Moves the clock forward by `elapsed`, applying every transition that
    /// falls due. Time left over is carried into the next call.
    ///
    /// Returns the number of transitions applied. Every cycle replays the
    /// same transitions, so once one has finished, whole cycles that fit in
    /// the remaining time are counted without being stepped. A cycle that
    /// consumes no time ends the call so zero pacing cannot loop forever.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let mut budget = self.carried.saturating_add(elapsed);
        let mut applied: usize = 0;
        loop {
            let next = self.pending();
            if next.delay > budget {
                break;
            }
            budget -= next.delay;
            self.step();
            applied = applied.saturating_add(1);
            if next.kind != TransitionKind::Restart {
                continue;
            }
            match self.last_cycle {
                Some((cycle, _)) if cycle.is_zero() => {
                    budget = Duration::ZERO;
                    break;
                }
                Some((cycle, steps)) if budget >= cycle => {
                    let (skipped, rest) = split_cycles(budget, cycle);
                    trace!("TypingAnimator: skipping {} whole cycles", skipped);
                    let skipped = usize::try_from(skipped).unwrap_or(usize::MAX);
                    applied = applied.saturating_add(skipped.saturating_mul(steps));
                    budget = rest;
                }
                _ => {}
            }
        }
        self.carried = budget;
        applied
    }

    /// Drops all progress and starts typing from the first line.
    pub fn reset_animation(&mut self) {
        debug!("TypingAnimator: reset");
        self.state = TypingState::default();
        self.carried = Duration::ZERO;
        self.cycle_elapsed = Duration::ZERO;
        self.cycle_steps = 0;
        self.last_cycle = None;
    }

    fn apply(&mut self, kind: TransitionKind) {
        trace!("TypingAnimator: {:?} in {:?}", kind, self.phase());
        let state = &mut self.state;
        match kind {
            TransitionKind::TypeChar => {
                let idx = state.current_line_index;
                let next_char = self.config.lines[idx].chars().nth(state.current_char_index);
                if let Some(c) = next_char {
                    if state.displayed_lines.len() <= idx {
                        state.displayed_lines.push(String::new());
                    }
                    state.displayed_lines[idx].push(c);
                    state.current_char_index += 1;
                }
            }
            TransitionKind::CommitLine => {
                let idx = state.current_line_index;
                let full = self.config.lines[idx].clone();
                match state.displayed_lines.get_mut(idx) {
                    Some(entry) => *entry = full,
                    None => state.displayed_lines.push(full),
                }
                state.current_line_index += 1;
                state.current_char_index = 0;
            }
            TransitionKind::MarkComplete => {
                debug!("TypingAnimator: script fully typed");
                state.is_complete = true;
            }
            TransitionKind::BeginDelete => {
                debug!("TypingAnimator: deleting");
                state.is_deleting = true;
            }
            TransitionKind::DeleteChar => {
                if let Some(last) = state.displayed_lines.last_mut() {
                    last.pop();
                }
            }
            TransitionKind::DropLine => {
                state.displayed_lines.pop();
            }
            TransitionKind::Restart => {
                debug!("TypingAnimator: restarting");
                *state = TypingState::default();
            }
        }
    }
}

/// Splits `budget` into whole cycles of length `cycle` and the remainder.
/// `cycle` must be non-zero.
fn split_cycles(budget: Duration, cycle: Duration) -> (u128, Duration) {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let cycle_nanos = cycle.as_nanos();
    let budget_nanos = budget.as_nanos();
    let rest = budget_nanos % cycle_nanos;
    (
        budget_nanos / cycle_nanos,
        Duration::new((rest / NANOS_PER_SEC) as u64, (rest % NANOS_PER_SEC) as u32),
    )
}
