use std::path::Path;
use std::process::{Command, Stdio};

use crate::shared::constants;

/// One external player backend: the binary to spawn plus the fixed argument
/// list that makes it stream a URL headlessly.
#[derive(Debug, Clone)]
pub struct Backend {
    name: &'static str,
    binary: String,
    args: Vec<String>,
}

impl Backend {
    /// Primary backend: mpv with video and terminal UI disabled.
    pub fn mpv() -> Self {
        Self {
            name: "mpv",
            binary: constants::MPV_BIN.to_string(),
            args: vec![
                "--no-video".to_string(),
                "--no-terminal".to_string(),
                "--really-quiet".to_string(),
                format!("--volume={}", constants::DEFAULT_VOLUME),
            ],
        }
    }

    /// Secondary backend: VLC headless with its loopback HTTP interface.
    pub fn vlc() -> Self {
        Self {
            name: "VLC",
            binary: constants::VLC_BIN.to_string(),
            args: [
                "-I",
                "dummy",
                "--extraintf",
                "http",
                "--http-host",
                "127.0.0.1",
                "--http-password",
                constants::VLC_HTTP_PASSWORD,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    #[cfg(test)]
    pub fn with_args(name: &'static str, binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name,
            binary: binary.into(),
            args,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Executable file name, as it appears in the OS process table.
    pub fn binary_name(&self) -> &str {
        Path::new(&self.binary)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.binary)
    }

    /// Build the spawn command for a stream URL.
    ///
    /// The child becomes its own process-group leader so the whole group can
    /// be signaled without touching the host process.
    pub fn command(&self, url: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpv_args_disable_video_and_set_volume() {
        let backend = Backend::mpv();
        let cmd = backend.command("http://example.com/stream");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert!(args.contains(&"--no-video".to_string()));
        assert!(args.contains(&"--volume=70".to_string()));
        assert_eq!(args.last().unwrap(), "http://example.com/stream");
    }

    #[test]
    fn test_vlc_uses_headless_interface() {
        let backend = Backend::vlc();
        let cmd = backend.command("http://example.com/stream");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert!(args.contains(&"dummy".to_string()));
        assert!(args.contains(&"--http-password".to_string()));
    }

    #[test]
    fn test_binary_name_strips_path() {
        let backend = Backend::with_args("fake", "/tmp/some/dir/fakeplayer", vec![]);
        assert_eq!(backend.binary_name(), "fakeplayer");
    }
}
