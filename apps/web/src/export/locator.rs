//! Executable Locator: finds an installed Chrome/Chromium when the bundled
//! binary is unavailable.
//!
//! [`locate_executable`] is pure over an [`ExecutableProbe`]; [`SystemProbe`]
//! is the real filesystem / `PATH` implementation.

use std::path::{Path, PathBuf};

/// Commands resolved through `PATH` on POSIX hosts, in priority order.
pub const POSIX_COMMANDS: [&str; 5] = [
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Well-known absolute paths probed when no command resolves.
pub const POSIX_PATHS: [&str; 5] = [
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/usr/bin/google-chrome",
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// `username` fills in the per-user install locations.
    Windows { username: Option<String> },
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows {
                username: std::env::var("USERNAME").ok(),
            }
        } else {
            Platform::Posix
        }
    }
}

/// Host capabilities the locator needs.
pub trait ExecutableProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Resolves a bare command name the way the host shell would.
    fn resolve(&self, command: &str) -> Option<PathBuf>;

    fn is_executable(&self, path: &Path) -> bool;
}

pub fn locate_executable(platform: &Platform, probe: &dyn ExecutableProbe) -> Option<PathBuf> {
    match platform {
        Platform::Windows { username } => windows_candidates(username.as_deref())
            .into_iter()
            .find(|path| probe.exists(path)),
        Platform::Posix => POSIX_COMMANDS
            .iter()
            .find_map(|command| probe.resolve(command))
            .or_else(|| {
                POSIX_PATHS
                    .iter()
                    .map(PathBuf::from)
                    .find(|path| probe.exists(path))
            }),
    }
}

fn windows_candidates(username: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
    ];
    if let Some(user) = username.filter(|u| !u.is_empty()) {
        let local = format!(r"C:\Users\{user}\AppData\Local");
        candidates.push(PathBuf::from(format!(r"{local}\Google\Chrome\Application\chrome.exe")));
        candidates.push(PathBuf::from(format!(r"{local}\Chromium\Application\chrome.exe")));
    }
    candidates.push(PathBuf::from(r"C:\Program Files\Chromium\Application\chrome.exe"));
    candidates.push(PathBuf::from(r"C:\Program Files (x86)\Chromium\Application\chrome.exe"));
    candidates
}

/// Probes the real filesystem and `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl ExecutableProbe for SystemProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn resolve(&self, command: &str) -> Option<PathBuf> {
        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file() && self.is_executable(candidate))
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(&self, path: &Path) -> bool {
        path.is_file()
    }
}
