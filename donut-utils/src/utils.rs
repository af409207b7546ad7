use crate::error::{DonutError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Version marker that ends the application name in an asset filename.
const VERSION_MARKER: &str = "-v";

/// Last path segment of a URL, ignoring trailing slashes.
pub fn base_name(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Application name for a download URL: its file name cut at the first `-v`.
///
/// `.../myapp-v1.2.0-linux-amd64` becomes `myapp`.
pub fn app_name(url: &str) -> Result<&str> {
    let filename = base_name(url);
    match filename.find(VERSION_MARKER) {
        Some(index) if index > 0 => Ok(&filename[..index]),
        _ => Err(DonutError::MissingVersion {
            filename: filename.to_string(),
        }),
    }
}

/// Create the download directory and its parents, `rwxr-xr-x` on Unix.
#[cfg(unix)]
pub fn create_download_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
pub fn create_download_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Set `rwxr-xr-x` on a downloaded binary (Unix only)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    // No-op on Windows
    Ok(())
}
