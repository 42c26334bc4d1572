use anyhow::{bail, Context, Result};
use std::io::ErrorKind;
use std::process::Child;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::directory::Station;
use crate::player::backend::Backend;
use crate::player::process;
use crate::shared::constants;
use crate::utils::logger;

/// Owns the zero-or-one active playback subprocess.
///
/// Termination is fire-and-forget with a grace window: `stop` sends SIGTERM
/// and schedules a deferred SIGKILL check instead of waiting for death. The
/// generation counter ties each deferred kill to the session state it was
/// scheduled against; a later `start` or `force_stop` bumps the counter and
/// the stale timer backs off, so a reused pid is never killed by mistake.
pub struct PlayerSession {
    current: Option<Station>,
    child: Option<Child>,
    tracked: Vec<u32>,
    generation: Arc<AtomicU64>,
    backends: Vec<Backend>,
}

impl PlayerSession {
    pub fn new() -> Self {
        Self::with_backends(vec![Backend::mpv(), Backend::vlc()])
    }

    pub fn with_backends(backends: Vec<Backend>) -> Self {
        Self {
            current: None,
            child: None,
            tracked: Vec::new(),
            generation: Arc::new(AtomicU64::new(0)),
            backends,
        }
    }

    /// Start playing `station`, replacing any current playback.
    ///
    /// The previous subprocess is retired (signal-send only, no death wait)
    /// before the new one is spawned. After spawning, the call settles for
    /// about a second and probes the child once so an immediate failure is
    /// reported here instead of hanging silently.
    pub fn start(&mut self, station: Station) -> Result<()> {
        if station.url.trim().is_empty() {
            bail!("station '{}' has no stream URL", station.name);
        }

        self.stop();
        self.generation.fetch_add(1, Ordering::SeqCst);

        let child = self.spawn_with_fallback(&station.url)?;
        logger::info(&format!(
            "started playback pid={} station='{}'",
            child.id(),
            station.name
        ));

        self.tracked.push(child.id());
        self.child = Some(child);
        self.current = Some(station);

        thread::sleep(constants::SPAWN_SETTLE);
        self.probe_early_exit();

        Ok(())
    }

    /// Graceful stop: SIGTERM now, SIGKILL after the grace window unless a
    /// newer session supersedes it. Session state clears immediately.
    pub fn stop(&mut self) {
        if self.child.is_none() && self.tracked.is_empty() && self.current.is_none() {
            return;
        }

        let child = self.child.take();
        let pids = std::mem::take(&mut self.tracked);
        self.current = None;

        if let Some(id) = child.as_ref().map(|c| c.id()) {
            process::terminate_group(id);
        }
        for &pid in &pids {
            process::terminate_group(pid);
            process::terminate_pid(pid);
        }
        logger::info(&format!("stop: signaled {} tracked pid(s)", pids.len()));

        let generation = Arc::clone(&self.generation);
        let snapshot = generation.load(Ordering::SeqCst);
        thread::spawn(move || {
            thread::sleep(constants::KILL_GRACE);
            if generation.load(Ordering::SeqCst) != snapshot {
                // A newer session took over; the pids may have been reused.
                if let Some(mut child) = child {
                    let _ = child.try_wait();
                }
                return;
            }
            for &pid in &pids {
                if process::pid_alive(pid) {
                    process::kill_group(pid);
                    process::kill_pid(pid);
                }
            }
            if let Some(mut child) = child {
                let _ = child.kill();
                let _ = child.wait();
            }
        });
    }

    /// Immediate forced teardown plus the orphan sweep. Shutdown paths only;
    /// never errors, safe to call repeatedly and while idle.
    pub fn force_stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(mut child) = self.child.take() {
            process::kill_group(child.id());
            let _ = child.kill();
            let _ = child.wait();
        }
        for pid in std::mem::take(&mut self.tracked) {
            process::kill_group(pid);
            process::kill_pid(pid);
        }
        self.current = None;

        let names: Vec<&str> = self.backends.iter().map(|b| b.binary_name()).collect();
        let swept = process::sweep_by_name(&names);
        if swept > 0 {
            logger::info(&format!("force_stop: swept {} orphaned player(s)", swept));
        }
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.current.as_ref()
    }

    pub fn is_playing(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn spawn_with_fallback(&self, url: &str) -> Result<Child> {
        let mut backends = self.backends.iter();
        let primary = backends.next().context("no playback backend configured")?;

        match primary.command(url).spawn() {
            Ok(child) => Ok(child),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                logger::info(&format!("{} not found, trying fallback", primary.name()));
                let Some(secondary) = backends.next() else {
                    bail!(
                        "{} is not installed and no fallback player is configured",
                        primary.name()
                    );
                };
                match secondary.command(url).spawn() {
                    Ok(child) => Ok(child),
                    Err(err) if err.kind() == ErrorKind::NotFound => {
                        bail!(
                            "no player found: install {} (recommended) or {}",
                            primary.name(),
                            secondary.name()
                        );
                    }
                    Err(err) => {
                        Err(err).with_context(|| format!("failed to launch {}", secondary.name()))
                    }
                }
            }
            Err(err) => Err(err).with_context(|| format!("failed to launch {}", primary.name())),
        }
    }

    /// One-shot probe after the settle delay: if the player already exited
    /// with a failure status, report a stopped notice and clear the session.
    fn probe_early_exit(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    let name = self
                        .current
                        .as_ref()
                        .map(|s| s.name.as_str())
                        .unwrap_or("stream");
                    logger::error(&format!("player exited early ({}): {}", name, status));
                    eprintln!("Playback stopped: player exited ({})", status);
                }
                self.child = None;
                self.current = None;
                self.tracked.clear();
            }
            Ok(None) => {}
            Err(err) => {
                logger::error(&format!("failed to probe player process: {}", err));
            }
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        // Last line of defense; the lifecycle hooks normally run first.
        if self.child.is_some() || !self.tracked.is_empty() {
            self.force_stop();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    fn station(name: &str) -> Station {
        Station::from_url(name, "http://example.invalid/stream")
    }

    /// A backend backed by a private copy of /bin/sh, so the process table
    /// sweep only ever matches this test's own children.
    fn fake_sh_backend(tag: &str, script: &str) -> Backend {
        let dir = std::env::temp_dir().join(format!("skywave-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let bin = dir.join(tag);
        if !bin.exists() {
            fs::copy("/bin/sh", &bin).unwrap();
        }
        Backend::with_args(
            "fake",
            bin.to_string_lossy().to_string(),
            vec!["-c".to_string(), script.to_string()],
        )
    }

    fn missing_backend() -> Backend {
        Backend::with_args("missing", "/nonexistent/skywave-missing-player", vec![])
    }

    #[test]
    fn test_start_then_current_station() {
        let mut session =
            PlayerSession::with_backends(vec![fake_sh_backend("sw_current", "sleep 300")]);
        session.start(station("Test FM")).unwrap();
        assert_eq!(session.current_station().unwrap().name, "Test FM");
        assert!(session.is_playing());
        session.force_stop();
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut session =
            PlayerSession::with_backends(vec![fake_sh_backend("sw_idle", "sleep 300")]);
        session.stop();
        assert!(!session.is_playing());
        assert!(session.current_station().is_none());
    }

    #[test]
    fn test_second_start_retires_first() {
        let mut session =
            PlayerSession::with_backends(vec![fake_sh_backend("sw_retire", "sleep 300")]);
        session.start(station("A")).unwrap();
        let pid_a = session.tracked[0];

        session.start(station("B")).unwrap();
        assert!(!session.tracked.contains(&pid_a));
        assert_eq!(session.current_station().unwrap().name, "B");
        session.force_stop();
    }

    #[test]
    fn test_force_stop_is_idempotent() {
        let mut session =
            PlayerSession::with_backends(vec![fake_sh_backend("sw_force", "sleep 300")]);
        session.start(station("A")).unwrap();
        session.force_stop();
        session.force_stop();
        assert!(!session.is_playing());
        assert!(session.current_station().is_none());
    }

    #[test]
    fn test_not_found_falls_back_exactly_once() {
        let mut session = PlayerSession::with_backends(vec![
            missing_backend(),
            fake_sh_backend("sw_fallback", "sleep 300"),
        ]);
        session.start(station("A")).unwrap();
        assert!(session.is_playing());
        session.force_stop();

        let mut session =
            PlayerSession::with_backends(vec![missing_backend(), missing_backend()]);
        let err = session.start(station("A")).unwrap_err();
        assert!(err.to_string().contains("install"), "got: {}", err);
        assert!(!session.is_playing());
    }

    #[test]
    fn test_early_exit_reports_stopped_without_error() {
        let mut session = PlayerSession::with_backends(vec![fake_sh_backend("sw_exit", "exit 3")]);
        session.start(station("Test FM")).unwrap();
        assert!(!session.is_playing());
        assert!(session.current_station().is_none());
        assert!(session.tracked.is_empty());
    }

    #[test]
    fn test_deferred_kill_skipped_after_new_start() {
        let mut session = PlayerSession::with_backends(vec![fake_sh_backend(
            "sw_generation",
            "trap '' TERM; sleep 300",
        )]);
        session.start(station("A")).unwrap();
        session.stop();
        session.start(station("B")).unwrap();

        // The deferred kill from stop() must notice the newer generation and
        // leave B alone even though B's backend ignores SIGTERM.
        thread::sleep(constants::KILL_GRACE + Duration::from_millis(300));
        assert!(session.is_playing());
        assert!(process::pid_alive(session.tracked[0]));
        session.force_stop();
    }

    #[test]
    fn test_start_with_empty_url_fails() {
        let mut session =
            PlayerSession::with_backends(vec![fake_sh_backend("sw_nourl", "sleep 300")]);
        let err = session.start(Station::from_url("Bad", "  ")).unwrap_err();
        assert!(err.to_string().contains("stream URL"));
        assert!(!session.is_playing());
    }
}
