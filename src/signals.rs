use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use tokio::sync::mpsc::Sender;

/// What should we do when the user stops this program?
///
/// The first signal asks the monitor loop to stop after any in-flight
/// check. A second one while that request is still pending exits at once.
pub fn handle_shutdown(cancel_tx: Sender<()>) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    std::thread::spawn(move || {
        for signal in signals.forever() {
            let _ = sd_notify::notify(false, &[sd_notify::NotifyState::Stopping]);
            log::warn!("Received signal {signal}, shutting down");

            if cancel_tx.try_send(()).is_err() {
                log::warn!("Shutdown already in progress, exiting now");
                std::process::exit(1);
            }
        }
    });

    Ok(())
}
