// src/typing/actor.rs

//! Drives a [`TypingAnimator`] on a real clock from a dedicated thread.
//!
//! The thread holds exactly one pending timer: a `recv_timeout` on the
//! control channel for the delay of the next transition. A command that
//! arrives first cancels the timer. After every transition the new
//! [`TypingFrame`] is offered to the consumer.
//!
//! Frames travel over a bounded channel (see [`frame_channel`]). The thread
//! never blocks on it: a frame that does not fit is held and replaced by the
//! next one, so a slow consumer sees the latest state rather than a backlog.

use anyhow::{Context, Result};
use log::*;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{TransitionKind, TypingAnimator, TypingConfig, TypingFrame};

/// Floor for the wait after a zero-time cycle.
const MIN_IDLE_BACKOFF: Duration = Duration::from_millis(1);

/// Frames the consumer may have queued at once.
pub const FRAME_CHANNEL_CAPACITY: usize = 1;

/// How often a held frame is offered again while the channel is full.
const FLUSH_RETRY: Duration = Duration::from_millis(5);

/// Creates the bounded channel an [`AnimatorActor`] publishes frames on.
pub fn frame_channel() -> (SyncSender<TypingFrame>, Receiver<TypingFrame>) {
    mpsc::sync_channel(FRAME_CHANNEL_CAPACITY)
}

/// Commands accepted by a running [`AnimatorActor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorCommand {
    /// Discard progress and start typing from the first line.
    Reset,
    /// Stop the thread. No transition is applied afterwards.
    Shutdown,
}

/// Handle to an animator thread. Dropping it stops and joins the thread.
pub struct AnimatorActor {
    control_tx: Sender<AnimatorCommand>,
    thread_handle: Option<JoinHandle<()>>,
}

impl AnimatorActor {
    /// Spawns the animator thread.
    ///
    /// # Arguments
    ///
    /// * `config` - Script and pacing, fixed for the thread's lifetime
    /// * `frame_tx` - Receives the initial frame and the frame after each
    ///   transition, coalesced while the channel is full
    pub fn spawn(config: TypingConfig, frame_tx: SyncSender<TypingFrame>) -> Result<Self> {
        let (control_tx, control_rx) = mpsc::channel();
        let animator = TypingAnimator::new(config);

        let thread_handle = thread::Builder::new()
            .name("typing-animator".to_string())
            .spawn(move || run(animator, control_rx, frame_tx))
            .context("Failed to spawn typing animator thread")?;

        info!("AnimatorActor spawned successfully");
        Ok(Self {
            control_tx,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn send(&self, command: AnimatorCommand) -> Result<()> {
        self.control_tx
            .send(command)
            .context("Typing animator thread has exited")
    }

    /// Restarts the animation from an empty screen.
    pub fn reset(&self) -> Result<()> {
        self.send(AnimatorCommand::Reset)
    }

    /// Stops the thread and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            // The thread may already be gone if the frame receiver was dropped.
            let _ = self.control_tx.send(AnimatorCommand::Shutdown);
            if let Err(e) = handle.join() {
                error!("AnimatorActor thread panicked: {:?}", e);
            }
        }
    }
}

impl Drop for AnimatorActor {
    fn drop(&mut self) {
        debug!("AnimatorActor dropped");
        self.stop_and_join();
    }
}

/// Offers the held frame to the consumer without blocking.
///
/// Returns `false` once the receiver is gone.
fn flush(frame_tx: &SyncSender<TypingFrame>, held: &mut Option<TypingFrame>) -> bool {
    let Some(frame) = held.take() else {
        return true;
    };
    match frame_tx.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(frame)) => {
            trace!("AnimatorActor: Frame channel full, holding latest frame");
            *held = Some(frame);
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

/// When the pending transition falls due. `None` if it never does.
fn schedule(animator: &TypingAnimator, idle: bool, idle_backoff: Duration) -> Option<Instant> {
    let delay = animator.pending().delay;
    let wait = if idle { delay.max(idle_backoff) } else { delay };
    Instant::now().checked_add(wait)
}

fn run(
    mut animator: TypingAnimator,
    control_rx: Receiver<AnimatorCommand>,
    frame_tx: SyncSender<TypingFrame>,
) {
    info!(
        "AnimatorActor: Started ({} lines)",
        animator.config().lines.len()
    );
    let idle_backoff = animator.config().idle_backoff().max(MIN_IDLE_BACKOFF);

    let mut idle = false;
    let mut held = Some(animator.frame());
    let mut deadline = schedule(&animator, idle, idle_backoff);
    loop {
        if !flush(&frame_tx, &mut held) {
            info!("AnimatorActor: Frame channel closed, exiting");
            break;
        }

        let received = match (deadline, held.is_some()) {
            (None, false) => control_rx
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
            (deadline, holding) => {
                let mut wait = match deadline {
                    Some(at) => at.saturating_duration_since(Instant::now()),
                    None => FLUSH_RETRY,
                };
                if holding {
                    wait = wait.min(FLUSH_RETRY);
                }
                control_rx.recv_timeout(wait)
            }
        };

        match received {
            Ok(AnimatorCommand::Reset) => {
                animator.reset_animation();
                idle = false;
                held = Some(animator.frame());
                deadline = schedule(&animator, idle, idle_backoff);
            }
            Ok(AnimatorCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                info!("AnimatorActor: Shutdown requested, exiting");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                if !matches!(deadline, Some(at) if Instant::now() >= at) {
                    // Woke up only to retry the held frame.
                    continue;
                }
                let applied = animator.step();
                idle = applied.kind == TransitionKind::Restart
                    && animator.last_cycle_duration() == Some(Duration::ZERO);
                if idle {
                    debug!("AnimatorActor: Cycle took no time, backing off {:?}", idle_backoff);
                }
                held = Some(animator.frame());
                deadline = schedule(&animator, idle, idle_backoff);
            }
        }
    }
    debug!("AnimatorActor: Thread exiting");
}
