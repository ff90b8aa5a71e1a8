use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::warn;

/// Install the shutdown handler. The first SIGINT or SIGTERM clears
/// `running` so the capture loop can finish its batch and report; a
/// second one exits immediately with status 1.
pub(crate) fn spawn_signal_handler(running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::Builder::new()
        .name("Signal Handler".to_string())
        .spawn(move || {
            for sig in signals.forever() {
                match sig {
                    SIGINT => warn!("Stopping on SIGINT"),
                    SIGTERM => warn!("Stopping on SIGTERM"),
                    _ => warn!("No handler for signal: {sig}"),
                }
                if !request_stop(&running) {
                    warn!("Second stop request, exiting immediately");
                    std::process::exit(1);
                }
            }
        })?;
    Ok(())
}

/// Clears the flag. Returns `false` if a stop had already been requested.
fn request_stop(running: &AtomicBool) -> bool {
    running.swap(false, Ordering::SeqCst)
}
