//! Registering the download directory on PATH through the user's shell profile.

use crate::error::{DonutError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shell startup files that can be appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellProfile {
    Bash,
    Zsh,
}

impl ShellProfile {
    /// Pick the profile from a `SHELL` value such as `/usr/bin/zsh`.
    pub fn detect(shell: &str) -> Option<Self> {
        if shell.contains("bash") {
            Some(ShellProfile::Bash)
        } else if shell.contains("zsh") {
            Some(ShellProfile::Zsh)
        } else {
            None
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ShellProfile::Bash => ".bashrc",
            ShellProfile::Zsh => ".zshrc",
        }
    }
}

/// The line appended to the profile.
pub fn export_line(dir: &Path) -> String {
    format!("\nexport PATH=$PATH:{}", dir.display())
}

/// Append a PATH export for `dir` to the profile in `home`.
///
/// The profile must already exist. Nothing is deduplicated: every call appends
/// another export line.
pub fn add_to_path(home: &Path, shell: Option<&str>, dir: &Path) -> Result<PathBuf> {
    let shell = shell.unwrap_or_default();
    let profile = ShellProfile::detect(shell).ok_or_else(|| DonutError::UnsupportedShell {
        shell: shell.to_string(),
    })?;

    let profile_path = home.join(profile.file_name());
    let mut file = OpenOptions::new()
        .append(true)
        .open(&profile_path)
        .map_err(DonutError::file("open shellrc file", &profile_path))?;
    file.write_all(export_line(dir).as_bytes())
        .map_err(DonutError::file("write to shellrc file", &profile_path))?;

    tracing::info!("Appended PATH entry to {}", profile_path.display());
    Ok(profile_path)
}
