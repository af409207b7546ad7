//! # donut-utils
//!
//! Fetches the donut-utils command line tools from their GitHub releases.
//!
//! ## Overview
//!
//! The installer reads `repolist.txt` (one `owner/repo` per line), asks the GitHub API
//! for each repository's description and latest release, and keeps the first asset
//! whose name mentions both the current OS and architecture (`linux`/`amd64` style).
//! After a `yes` at the prompt every selected binary is saved as
//! `~/.donut-utils/<name>`, where `<name>` is the asset filename cut at its `-v`
//! version marker, and the directory is appended to PATH in `~/.bashrc` or `~/.zshrc`.
//!
//! Work is strictly sequential. A failure for one repository or download is printed
//! and skipped; only a missing list file, an unknown home directory, an uncreatable
//! download directory or an unreadable answer stop the run.
//!
//! ## Usage
//!
//! ```bash
//! # Uses ./repolist.txt and api.github.com
//! donut-utils
//!
//! # Different list, no pause after the banner
//! donut-utils --list tools.txt --pause 0
//! ```

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Process-wide settings and host environment
pub mod config;

/// Error types for recoverable, per-item failures
pub mod error;

/// GitHub API client and platform asset selection
pub mod github;

/// The download pipeline from repository list to PATH registration
pub mod installer;

/// OS and architecture names as used in release asset names
pub mod platform;

/// Repository list loading
pub mod repolist;

/// Shell profile PATH registration
pub mod shell;

/// Filename derivation and file permission helpers
pub mod utils;
