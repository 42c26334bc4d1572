//! Process-wide shutdown wiring.
//!
//! Whatever ends this process (signal, panic, normal return from `main`),
//! the tracked player subprocesses must not survive it.

use anyhow::Result;
use std::io;
use std::panic;
use std::sync::{Arc, Mutex, TryLockError};
use std::thread;

use crossterm::cursor::Show;
use crossterm::terminal::LeaveAlternateScreen;

use crate::player::{process, PlayerSession};
use crate::shared::constants;
use crate::utils::logger;

pub type SharedSession = Arc<Mutex<PlayerSession>>;

pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(PlayerSession::new()))
}

/// Hook termination signals (INT/TERM/HUP) and panics to force-stop playback
/// before the process exits. Call once, right after logger init.
pub fn install(session: SharedSession) -> Result<()> {
    let panic_session = Arc::clone(&session);
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        match panic_session.try_lock() {
            Ok(mut guard) => guard.force_stop(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().force_stop(),
            Err(TryLockError::WouldBlock) => {
                // The panicking thread may hold the lock; fall back to the
                // name sweep so players still die.
                process::sweep_by_name(&[constants::MPV_BIN, constants::VLC_BIN]);
            }
        }
        restore_terminal();
        previous_hook(info);
    }));

    ctrlc::set_handler(move || {
        logger::info("termination signal received, cleaning up");
        match session.lock() {
            Ok(mut guard) => guard.force_stop(),
            Err(poisoned) => poisoned.into_inner().force_stop(),
        }
        restore_terminal();
        // Give the kill signals a beat to propagate, then leave. Any pending
        // interactive prompt dies with the process.
        thread::sleep(constants::SHUTDOWN_LINGER);
        std::process::exit(0);
    })?;

    Ok(())
}

/// Best-effort final cleanup on the normal exit path. Synchronous only.
pub fn shutdown(session: &SharedSession) {
    match session.lock() {
        Ok(mut guard) => guard.force_stop(),
        Err(poisoned) => poisoned.into_inner().force_stop(),
    }
}

fn restore_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, Show);
}
