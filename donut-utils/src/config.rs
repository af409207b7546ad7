use std::path::PathBuf;
use std::time::Duration;

use crate::platform;

/// GitHub REST endpoint for repositories.
pub const BASE_URL: &str = "https://api.github.com/repos";

/// Repository list read from the working directory.
pub const REPOS_LIST: &str = "repolist.txt";

/// Download directory, relative to the home directory.
pub const DOWNLOAD_DIR: &str = ".donut-utils";

/// Seconds to wait after the banner so the user can abort.
pub const DEFAULT_PAUSE_SECS: u64 = 3;

/// Deadline for a single API request, body included.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Settings fixed for the whole run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo_list: PathBuf,
    pub api_url: String,
    pub token: Option<String>,
    pub pause: Duration,
    pub api_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_list: PathBuf::from(REPOS_LIST),
            api_url: BASE_URL.to_string(),
            token: None,
            pause: Duration::from_secs(DEFAULT_PAUSE_SECS),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

/// Facts about the host, captured once at startup.
#[derive(Debug, Clone)]
pub struct Environment {
    pub home: Option<PathBuf>,
    pub shell: Option<String>,
    pub os: String,
    pub arch: String,
}

impl Environment {
    pub fn detect() -> Self {
        Self {
            home: directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
            shell: std::env::var("SHELL").ok(),
            os: platform::os_name().to_string(),
            arch: platform::arch_name().to_string(),
        }
    }

    /// Windows has no shell profile to append to.
    pub fn has_shell_profiles(&self) -> bool {
        self.os != "windows"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.repo_list, PathBuf::from("repolist.txt"));
        assert_eq!(settings.api_url, "https://api.github.com/repos");
        assert_eq!(settings.pause, Duration::from_secs(3));
        assert_eq!(settings.api_timeout, Duration::from_secs(30));
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_windows_has_no_shell_profiles() {
        let mut env = Environment {
            home: None,
            shell: None,
            os: "windows".to_string(),
            arch: "amd64".to_string(),
        };
        assert!(!env.has_shell_profiles());

        env.os = "linux".to_string();
        assert!(env.has_shell_profiles());
    }

    #[test]
    fn test_detect_uses_release_naming() {
        let env = Environment::detect();
        assert_eq!(env.os, platform::os_name());
        assert_eq!(env.arch, platform::arch_name());
    }
}
