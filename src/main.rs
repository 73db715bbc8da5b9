// src/main.rs

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use log::{error, info};

use codetype::{
    config::{Config, CONFIG},
    render::render_frame,
    frame_channel, AnimatorActor,
};

/// Main entry point for the `codetype` terminal player.
///
/// Usage: `codetype [CONFIG.json]`. Without an argument the file named by
/// `CODETYPE_CONFIG` is used, or the built-in defaults.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting codetype...");

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => CONFIG.clone(),
    };
    let typing = config.effective_typing();
    let highlighter = config.highlight.highlighter();
    info!(
        "Playing {} lines, highlighter options {:?}",
        typing.lines.len(),
        highlighter.options()
    );

    let (frame_tx, frame_rx) = frame_channel();
    let actor = AnimatorActor::spawn(typing, frame_tx).context("Failed to start animation")?;

    let stdout = std::io::stdout();
    for frame in frame_rx {
        let text = render_frame(&frame, &highlighter, &config.colors, &config.render);
        let mut out = stdout.lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            error!("Failed to write frame: {}. Exiting.", e);
            break;
        }
    }

    actor.shutdown();
    info!("codetype exited.");
    Ok(())
}
