// src/typing/tests.rs

//! Tests for the typing state machine and its driver thread.

use super::*;
use crate::script::data_pipeline_lines;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

// --- Test Helpers ---

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn scenario_config() -> TypingConfig {
    TypingConfig {
        lines: vec!["ab".to_string(), "c".to_string()],
        typing_speed_ms: 10,
        deleting_speed_ms: 5,
        pause_before_delete_ms: 100,
        pause_before_restart_ms: 50,
        ..TypingConfig::default()
    }
}

fn zero_config(lines: &[&str]) -> TypingConfig {
    TypingConfig {
        typing_speed_ms: 0,
        deleting_speed_ms: 0,
        pause_before_delete_ms: 0,
        pause_before_restart_ms: 0,
        ..TypingConfig::new(lines.iter().copied())
    }
}

fn lines(animator: &TypingAnimator) -> Vec<&str> {
    animator.displayed_lines().iter().map(String::as_str).collect()
}

/// Steps until the machine restarts, returning every applied transition.
fn run_cycle(animator: &mut TypingAnimator) -> Vec<Transition> {
    let mut applied = Vec::new();
    loop {
        let t = animator.step();
        applied.push(t);
        if t.kind == TransitionKind::Restart {
            return applied;
        }
        assert!(applied.len() < 100_000, "cycle never restarted");
    }
}

// --- State machine ---

#[test_log::test]
fn test_initial_state() {
    let animator = TypingAnimator::new(scenario_config());
    assert_eq!(animator.state(), &TypingState::default());
    assert_eq!(animator.phase(), Phase::Typing);
    assert!(!animator.is_deleting());
    assert!(!animator.is_complete());
    assert_eq!(
        animator.pending(),
        Transition {
            kind: TransitionKind::TypeChar,
            delay: ms(10)
        }
    );
}

#[test_log::test]
fn test_end_to_end_scenario() {
    let mut a = TypingAnimator::new(scenario_config());

    assert_eq!(a.step().delay, ms(10));
    assert_eq!(lines(&a), vec!["a"]);
    assert_eq!(a.step().delay, ms(10));
    assert_eq!(lines(&a), vec!["ab"]);
    assert_eq!(a.phase(), Phase::LineComplete);

    // Line boundary holds for twice the typing speed.
    assert_eq!(
        a.step(),
        Transition {
            kind: TransitionKind::CommitLine,
            delay: ms(20)
        }
    );
    assert_eq!(lines(&a), vec!["ab"]);
    assert_eq!(a.state().current_line_index, 1);
    assert_eq!(a.state().current_char_index, 0);

    assert_eq!(a.step().kind, TransitionKind::TypeChar);
    assert_eq!(lines(&a), vec!["ab", "c"]);
    assert_eq!(a.step().kind, TransitionKind::CommitLine);
    assert_eq!(a.phase(), Phase::AllComplete);

    assert_eq!(
        a.step(),
        Transition {
            kind: TransitionKind::MarkComplete,
            delay: Duration::ZERO
        }
    );
    assert!(a.is_complete());
    assert!(!a.is_deleting());

    assert_eq!(
        a.step(),
        Transition {
            kind: TransitionKind::BeginDelete,
            delay: ms(100)
        }
    );
    assert!(a.is_deleting());
    assert_eq!(lines(&a), vec!["ab", "c"]);

    assert_eq!(
        a.step(),
        Transition {
            kind: TransitionKind::DeleteChar,
            delay: ms(5)
        }
    );
    assert_eq!(lines(&a), vec!["ab", ""]);
    assert_eq!(a.phase(), Phase::DeletingLineEmpty);

    assert_eq!(a.step().kind, TransitionKind::DropLine);
    assert_eq!(lines(&a), vec!["ab"]);
    a.step();
    a.step();
    assert_eq!(lines(&a), vec![""]);
    a.step();
    assert!(a.displayed_lines().is_empty());
    assert_eq!(a.phase(), Phase::AllDeleted);

    assert_eq!(
        a.step(),
        Transition {
            kind: TransitionKind::Restart,
            delay: ms(50)
        }
    );
    assert_eq!(a.state(), &TypingState::default());
    assert_eq!(a.last_cycle_duration(), Some(ms(245)));
}

#[test_log::test]
fn test_typing_reveals_one_character_per_tick() {
    let mut a = TypingAnimator::new(TypingConfig::new(data_pipeline_lines()));
    while !a.is_complete() {
        let before = a.state().visible_chars();
        let lines_before = a.displayed_lines().len();
        let t = a.step();
        let after = a.state().visible_chars();
        match t.kind {
            TransitionKind::TypeChar => assert_eq!(after, before + 1),
            TransitionKind::CommitLine => {
                assert_eq!(after, before);
                assert!(a.displayed_lines().len() >= lines_before);
            }
            TransitionKind::MarkComplete => assert_eq!(after, before),
            other => panic!("unexpected {:?} while typing", other),
        }
        // Typed lines always match the script prefix.
        let state = a.state();
        for (i, shown) in state.displayed_lines.iter().enumerate() {
            assert!(a.config().lines[i].starts_with(shown.as_str()));
            if i < state.current_line_index {
                assert_eq!(shown, &a.config().lines[i]);
            }
        }
    }
    assert_eq!(a.displayed_lines(), a.config().lines.as_slice());
}

#[test_log::test]
fn test_deleting_removes_one_character_or_one_empty_line() {
    let mut a = TypingAnimator::new(TypingConfig::new(data_pipeline_lines()));
    while !a.is_deleting() {
        a.step();
    }
    let full = a.config().lines.clone();
    while !a.displayed_lines().is_empty() {
        let chars_before = a.state().visible_chars();
        let lines_before = a.displayed_lines().len();
        match a.step().kind {
            TransitionKind::DeleteChar => {
                assert_eq!(a.state().visible_chars(), chars_before - 1);
                assert_eq!(a.displayed_lines().len(), lines_before);
            }
            TransitionKind::DropLine => {
                assert_eq!(a.state().visible_chars(), chars_before);
                assert_eq!(a.displayed_lines().len(), lines_before - 1);
            }
            other => panic!("unexpected {:?} while deleting", other),
        }
        // Suffix truncation: everything but the last line is untouched.
        let shown = a.displayed_lines();
        if let Some((last, rest)) = shown.split_last() {
            assert_eq!(rest, &full[..rest.len()]);
            assert!(full[rest.len()].starts_with(last.as_str()));
        }
    }
}

#[test_log::test]
fn test_full_cycle_restores_initial_state() {
    let mut a = TypingAnimator::new(TypingConfig::new(data_pipeline_lines()));
    let first = run_cycle(&mut a);
    assert_eq!(a.state(), &TypingState::default());
    assert_eq!(a.phase(), Phase::Typing);

    // The loop repeats identically.
    let second = run_cycle(&mut a);
    assert_eq!(first, second);
}

#[test_log::test]
fn test_empty_script_cycles_without_output() {
    let mut a = TypingAnimator::new(TypingConfig::new(Vec::<String>::new()));
    assert_eq!(a.phase(), Phase::AllComplete);
    let kinds: Vec<_> = run_cycle(&mut a).into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransitionKind::MarkComplete,
            TransitionKind::BeginDelete,
            TransitionKind::Restart
        ]
    );
    assert!(a.displayed_lines().is_empty());
}

#[test_log::test]
fn test_empty_line_still_takes_the_line_pause() {
    let mut a = TypingAnimator::new(TypingConfig {
        typing_speed_ms: 7,
        ..TypingConfig::new(["x", "", "y"])
    });
    a.step(); // x
    a.step(); // commit x
    assert_eq!(a.phase(), Phase::LineComplete);
    assert_eq!(
        a.step(),
        Transition {
            kind: TransitionKind::CommitLine,
            delay: ms(14)
        }
    );
    assert_eq!(lines(&a), vec!["x", ""]);
    a.step(); // y
    assert_eq!(lines(&a), vec!["x", "", "y"]);
}

#[test_log::test]
fn test_multibyte_characters_are_typed_whole() {
    let mut a = TypingAnimator::new(TypingConfig::new(["é→☃"]));
    a.step();
    assert_eq!(lines(&a), vec!["é"]);
    a.step();
    assert_eq!(lines(&a), vec!["é→"]);
    a.step();
    assert_eq!(lines(&a), vec!["é→☃"]);
    assert_eq!(a.phase(), Phase::LineComplete);
}

#[test_log::test]
fn test_negative_durations_clamp_to_zero() {
    let config = TypingConfig {
        typing_speed_ms: -5,
        deleting_speed_ms: -1,
        pause_before_delete_ms: -100,
        pause_before_restart_ms: i64::MIN,
        ..TypingConfig::new(["a"])
    };
    assert_eq!(config.typing_speed(), Duration::ZERO);
    assert_eq!(config.deleting_speed(), Duration::ZERO);
    assert_eq!(config.pause_before_delete(), Duration::ZERO);
    assert_eq!(config.pause_before_restart(), Duration::ZERO);

    let mut a = TypingAnimator::new(config);
    let cycle = run_cycle(&mut a);
    assert!(cycle.iter().all(|t| t.delay.is_zero()));
    assert_eq!(a.last_cycle_duration(), Some(Duration::ZERO));
}

#[test_log::test]
fn test_reset_animation_discards_progress() {
    let mut a = TypingAnimator::new(scenario_config());
    for _ in 0..7 {
        a.step();
    }
    assert!(a.is_deleting());
    a.reset_animation();
    assert_eq!(a.state(), &TypingState::default());
    assert_eq!(a.phase(), Phase::Typing);
}

#[test_log::test]
fn test_reset_animation_forgets_the_last_cycle() {
    let mut a = TypingAnimator::new(scenario_config());
    run_cycle(&mut a);
    assert_eq!(a.last_cycle_duration(), Some(ms(245)));

    a.reset_animation();
    assert_eq!(a.last_cycle_duration(), None);

    // A new cycle is measured from the reset, not from before it.
    a.step();
    a.reset_animation();
    run_cycle(&mut a);
    assert_eq!(a.last_cycle_duration(), Some(ms(245)));
}

#[test_log::test]
fn test_huge_delays_saturate_instead_of_overflowing() {
    let long_line = "x".repeat(3_000);
    let config = TypingConfig {
        typing_speed_ms: i64::MAX,
        ..TypingConfig::new([long_line.as_str()])
    };
    let mut a = TypingAnimator::new(config);
    for _ in 0..3_000 {
        assert_eq!(a.step().kind, TransitionKind::TypeChar);
    }
    assert_eq!(a.displayed_lines(), &[long_line.clone()][..]);

    let commit = a.step();
    assert_eq!(commit.kind, TransitionKind::CommitLine);
    assert_eq!(commit.delay, Duration::from_millis(i64::MAX as u64) * 2);
    assert_eq!(a.last_cycle_duration(), None);
}

#[test_log::test]
fn test_frame_snapshot_and_cursor() {
    let mut a = TypingAnimator::new(scenario_config());
    assert!(!a.frame().shows_cursor());
    a.step();
    let frame = a.frame();
    assert_eq!(frame.displayed_lines, vec!["a".to_string()]);
    assert_eq!(frame.phase, Phase::Typing);
    assert!(frame.shows_cursor());

    while !a.is_deleting() {
        a.step();
    }
    assert!(!a.frame().shows_cursor());
}

// --- Virtual clock ---

#[test_log::test]
fn test_advance_carries_leftover_time() {
    let mut a = TypingAnimator::new(scenario_config());
    assert_eq!(a.advance(ms(25)), 2);
    assert_eq!(lines(&a), vec!["ab"]);
    assert_eq!(a.phase(), Phase::LineComplete);

    // 5 ms carried + 15 ms pays for the 20 ms line pause exactly.
    assert_eq!(a.advance(ms(15)), 1);
    assert_eq!(a.state().current_line_index, 1);
    assert_eq!(a.advance(ms(9)), 0);
    assert_eq!(a.advance(ms(1)), 1);
    assert_eq!(lines(&a), vec!["ab", "c"]);
}

#[test_log::test]
fn test_advance_through_a_whole_cycle() {
    let mut a = TypingAnimator::new(scenario_config());
    assert_eq!(a.advance(ms(245)), 13);
    assert_eq!(a.state(), &TypingState::default());
    assert_eq!(a.last_cycle_duration(), Some(ms(245)));
}

#[test_log::test]
fn test_advance_stops_after_a_zero_time_cycle() {
    let mut a = TypingAnimator::new(zero_config(&["ab"]));
    assert_eq!(a.advance(Duration::ZERO), 9);
    assert_eq!(a.state(), &TypingState::default());

    let mut empty = TypingAnimator::new(zero_config(&[]));
    assert_eq!(empty.advance(ms(1000)), 3);
    assert_eq!(empty.advance(ms(1000)), 3);
}

#[test_log::test]
fn test_advance_skips_whole_cycles() {
    let mut a = TypingAnimator::new(scenario_config());
    let applied = a.advance(ms(245) * 1_000 + ms(25));
    assert_eq!(applied, 13 * 1_000 + 2);
    assert_eq!(lines(&a), vec!["ab"]);
    assert_eq!(a.last_cycle_duration(), Some(ms(245)));

    // The 5 ms left over is carried: 15 more completes the commit.
    assert_eq!(a.advance(ms(15)), 1);
    assert_eq!(a.phase(), Phase::Typing);
}

#[test_log::test]
fn test_advance_by_the_largest_duration_terminates() {
    let mut a = TypingAnimator::new(scenario_config());
    assert_eq!(a.advance(ms(5)), 0);
    assert_eq!(a.advance(Duration::MAX), usize::MAX);
    assert_eq!(a.last_cycle_duration(), Some(ms(245)));
}

// --- Config ---

#[test_log::test]
fn test_config_defaults_and_partial_json() {
    let config: TypingConfig =
        serde_json::from_str(r#"{ "lines": ["a"], "typing_speed_ms": 75 }"#).unwrap();
    assert_eq!(config.lines, vec!["a".to_string()]);
    assert_eq!(config.typing_speed(), ms(75));
    assert_eq!(config.deleting_speed(), ms(20));
    assert_eq!(config.pause_before_delete(), ms(1500));
    assert_eq!(config.pause_before_restart(), ms(500));

    let editor = TypingConfig::editor(["a"]);
    assert_eq!(editor.typing_speed(), ms(75));
    assert_eq!(editor.deleting_speed(), ms(15));
    assert_eq!(editor.pause_before_delete(), ms(150));
    assert_eq!(editor.pause_before_restart(), ms(50));
}

// --- Driver thread ---

#[test_log::test]
fn test_actor_plays_the_script() {
    let (frame_tx, frame_rx) = frame_channel();
    let config = TypingConfig {
        typing_speed_ms: 1,
        deleting_speed_ms: 1,
        pause_before_delete_ms: 50,
        pause_before_restart_ms: 50,
        ..TypingConfig::new(["hi", "yo"])
    };
    let actor = AnimatorActor::spawn(config, frame_tx).unwrap();

    let first = frame_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(first.displayed_lines.is_empty());

    // Frames may be coalesced, so only states held for a pause are certain
    // to be seen.
    let mut saw_complete = false;
    let mut saw_restart = false;
    while !saw_restart {
        let frame = frame_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        if frame.is_complete && !frame.is_deleting {
            assert_eq!(frame.displayed_lines, vec!["hi".to_string(), "yo".to_string()]);
            saw_complete = true;
        } else if saw_complete && !frame.is_complete && !frame.is_deleting {
            saw_restart = true;
        }
    }

    drop(actor);
    // The thread owned the only sender; once joined the channel drains and closes.
    while frame_rx.recv_timeout(Duration::from_secs(5)).is_ok() {}
    assert!(matches!(
        frame_rx.try_recv(),
        Err(mpsc::TryRecvError::Disconnected)
    ));
}

#[test_log::test]
fn test_actor_reset_and_shutdown_cancel_pending_timer() {
    let (frame_tx, frame_rx) = frame_channel();
    let config = TypingConfig {
        typing_speed_ms: 60_000,
        ..TypingConfig::new(["slow"])
    };
    let actor = AnimatorActor::spawn(config, frame_tx).unwrap();
    let initial = frame_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(initial.displayed_lines.is_empty());

    actor.reset().unwrap();
    let after_reset = frame_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(after_reset, initial);

    let started = Instant::now();
    actor.shutdown();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(frame_rx.recv().is_err());
}

#[test_log::test]
fn test_actor_backs_off_on_zero_time_cycles() {
    let (frame_tx, frame_rx) = frame_channel();
    let config = TypingConfig {
        idle_backoff_ms: 5,
        ..zero_config(&[])
    };
    let actor = AnimatorActor::spawn(config, frame_tx).unwrap();

    let deadline = Instant::now() + Duration::from_millis(200);
    let mut frames = 0;
    let mut saw_complete = false;
    while Instant::now() < deadline {
        if let Ok(frame) = frame_rx.recv_timeout(Duration::from_millis(10)) {
            frames += 1;
            saw_complete |= frame.is_complete;
        }
    }
    actor.shutdown();

    assert!(saw_complete);
    // Three transitions per cycle, one cycle per 5 ms at most.
    assert!(frames < 1_000, "actor spun: {} frames", frames);
}

#[test_log::test]
fn test_actor_backlog_stays_bounded_when_frames_are_not_read() {
    let (frame_tx, frame_rx) = frame_channel();
    let config = TypingConfig {
        lines: data_pipeline_lines(),
        ..zero_config(&[])
    };
    let actor = AnimatorActor::spawn(config, frame_tx).unwrap();

    thread::sleep(Duration::from_millis(300));
    let started = Instant::now();
    actor.shutdown();
    // Shutdown must not wait on the full channel.
    assert!(started.elapsed() < Duration::from_secs(5));

    let queued = frame_rx.try_iter().count();
    assert!(queued >= 1);
    assert!(
        queued <= FRAME_CHANNEL_CAPACITY,
        "{} frames queued for an idle consumer",
        queued
    );
}

#[test_log::test]
fn test_actor_exits_when_frame_receiver_is_dropped() {
    let (frame_tx, frame_rx) = frame_channel();
    let config = TypingConfig {
        typing_speed_ms: 1,
        ..TypingConfig::new(["abc"])
    };
    let actor = AnimatorActor::spawn(config, frame_tx).unwrap();
    drop(frame_rx);
    // Joining must not hang even though the thread may exit on its own first.
    actor.shutdown();
}
