use std::time::Duration;

pub const APP_NAME: &str = "Skywave";

pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const MPV_BIN: &str = "mpv";
pub const VLC_BIN: &str = "vlc";

pub const DEFAULT_VOLUME: u32 = 70;
pub const VLC_HTTP_PASSWORD: &str = "skywave";

pub const SEARCH_ENDPOINT: &str = "https://de1.api.radio-browser.info/json/stations/search";
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// How long `start` waits before probing whether the player survived launch.
pub const SPAWN_SETTLE: Duration = Duration::from_secs(1);
/// Grace window between SIGTERM and the deferred SIGKILL check.
pub const KILL_GRACE: Duration = Duration::from_secs(1);
/// Pause before exiting on a signal so kill signals propagate.
pub const SHUTDOWN_LINGER: Duration = Duration::from_millis(100);

pub const MENU_HOME_ACTIONS: &[&str] = &[
    "Browse preset stations",
    "Search stations by name",
    "Search stations by genre",
    "Play a stream URL",
    "Quit",
];

pub const MENU_LOGO: &[&str] = &[
    r"  ____  _                                ",
    r" / ___|| | ___   ___      ______   _____ ",
    r" \___ \| |/ / | | \ \ /\ / / _` | / / _ \",
    r"  ___) |   <| |_| |\ V  V / (_| |/ /  __/",
    r" |____/|_|\_\\__, | \_/\_/ \__,_|\_/\___|",
    r"             |___/                       ",
];
