//! Loading spinner and Ctrl+C driven refresh loop for live pages

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputContext;

static INTERRUPTED: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Ctrl+C flag; the handler is installed on first use
fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    if let Some(flag) = INTERRUPTED.get() {
        return Ok(flag.clone());
    }
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;
    Ok(INTERRUPTED.get_or_init(|| flag).clone())
}

fn spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.quiet || ctx.is_json() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Show a spinner until `is_ready` returns true
pub async fn until_loaded(ctx: &OutputContext, message: &str, mut is_ready: impl FnMut() -> bool) {
    let pb = spinner(ctx, message);
    while !is_ready() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// Show a spinner while `fut` runs
pub async fn spin<F: Future>(ctx: &OutputContext, message: &str, fut: F) -> F::Output {
    let pb = spinner(ctx, message);
    let output = fut.await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    output
}

/// Call `render` every `every` until Ctrl+C or until it fails
pub async fn watch<F>(ctx: &OutputContext, every: Duration, mut render: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let stop = interrupt_flag()?;
    stop.store(false, Ordering::SeqCst);
    ctx.info("Press Ctrl+C to stop");

    let mut ticker = tokio::time::interval(every);
    // the first tick completes immediately; the page has just rendered
    ticker.tick().await;

    while !stop.load(Ordering::SeqCst) {
        tokio::select! {
            _ = ticker.tick() => {
                render()?;
            }
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
    }

    ctx.info("\nStopped");
    Ok(())
}
