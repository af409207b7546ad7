use anyhow::{Context, Result};
use futures_util::StreamExt;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{Environment, Settings, DOWNLOAD_DIR};
use crate::error::{DonutError, Result as DonutResult};
use crate::github::GitHubClient;
use crate::{repolist, shell, utils};

const BANNER: &str = r"     _                   _
  __| | ___  _ __  _   _| |_
 / _' |/ _ \| '_ \| | | | __|
| (_| | (_) | | | | |_| | |_
 \__,_|_____|_| |_|\__,_|\__|
 _   _| |_(_| |___
| | | | __| | / __|
| |_| | |_| | \__ \
 \__,_|\__|_|_|___/
                             ";

const INTRO: &str = "donut-utils is a collection of cli utilities focusing on convenience and human readable output.

The applications will be downloaded from Github, and placed in ~/.donut-utils and then ~/.donut-utils will be added to your path.

for more information, visit the url below:
https://github.com/donuts-are-good/donut-utils

To abort this process, press CTRL C now.";

/// A release asset built for this platform, offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableApp {
    pub name: String,
    pub description: String,
    pub download_url: String,
}

/// What a run did, for callers that want more than the printed output.
#[derive(Debug, Default)]
pub struct Summary {
    pub download_dir: PathBuf,
    pub available: Vec<AvailableApp>,
    pub confirmed: bool,
    pub installed: Vec<PathBuf>,
    pub profile: Option<PathBuf>,
}

/// Which of the two API requests for a repository failed.
#[derive(Debug, Clone, Copy)]
enum Request {
    RepoInfo,
    LatestRelease,
}

pub struct Installer {
    settings: Settings,
    env: Environment,
    github_client: GitHubClient,
}

impl Installer {
    pub fn new(settings: Settings, env: Environment) -> Result<Self> {
        let github_client = GitHubClient::new(
            &settings.api_url,
            settings.token.clone(),
            settings.api_timeout,
        )
        .context("Failed to create HTTP client")?;

        Ok(Self {
            settings,
            env,
            github_client,
        })
    }

    /// Run the whole pipeline, reading the confirmation from `input` and writing
    /// everything the user sees to `out`.
    ///
    /// Errors returned here are the fatal ones; per-repository and per-download
    /// failures are printed and skipped.
    pub async fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<Summary> {
        writeln!(out, "{BANNER}")?;
        writeln!(out, "{INTRO}")?;
        out.flush()?;
        if !self.settings.pause.is_zero() {
            tokio::time::sleep(self.settings.pause).await;
        }

        let repos = repolist::load(&self.settings.repo_list).with_context(|| {
            format!(
                "Failed to read repos list file {}",
                self.settings.repo_list.display()
            )
        })?;
        tracing::info!("Loaded {} repositories", repos.len());

        let home = self
            .env
            .home
            .clone()
            .ok_or(DonutError::HomeDirNotFound)
            .context("Failed to get current user")?;

        let download_dir = home.join(DOWNLOAD_DIR);
        utils::create_download_dir(&download_dir).with_context(|| {
            format!(
                "Failed to create download directory {}",
                download_dir.display()
            )
        })?;

        let mut summary = Summary {
            download_dir,
            ..Default::default()
        };

        summary.available = self.collect(&repos, out).await?;

        writeln!(
            out,
            "\n\n\nThe following applications are available for your system:"
        )?;
        for (i, app) in summary.available.iter().enumerate() {
            writeln!(
                out,
                "\n{}. Name: {}\nDescription: {}",
                i + 1,
                app.name,
                app.description
            )?;
        }
        writeln!(
            out,
            "\n\nDo you want to download these applications? (yes/no)"
        )?;
        out.flush()?;

        summary.confirmed = read_confirmation(input).context("Failed to read user input")?;
        if summary.confirmed {
            for app in &summary.available {
                match self
                    .download_and_store(&app.download_url, &summary.download_dir)
                    .await
                {
                    Ok(path) => {
                        writeln!(out, "File downloaded and saved to: {}", path.display())?;
                        summary.installed.push(path);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", app.name, e);
                        writeln!(out, "{}", download_failure(&e))?;
                    }
                }
            }
        } else {
            tracing::info!("Downloads declined");
        }

        summary.profile = self.register_path(&home, &summary.download_dir, out)?;
        Ok(summary)
    }

    /// Fetch every repository in order and keep the ones with an asset for this platform.
    async fn collect<W: Write>(&self, repos: &[String], out: &mut W) -> io::Result<Vec<AvailableApp>> {
        let mut available = Vec::new();

        for repo in repos {
            match self.fetch(repo).await {
                Ok(Some(app)) => {
                    tracing::info!("{}: found {}", repo, app.name);
                    available.push(app);
                }
                Ok(None) => {
                    tracing::debug!(
                        "{}: no asset for {}/{}",
                        repo,
                        self.env.os,
                        self.env.arch
                    );
                }
                Err((request, e)) => {
                    tracing::warn!("Skipping {}: {}", repo, e);
                    writeln!(out, "{}", fetch_failure(request, &e))?;
                }
            }
        }

        Ok(available)
    }

    /// Both API requests for one repository, then asset selection.
    async fn fetch(&self, repo: &str) -> Result<Option<AvailableApp>, (Request, DonutError)> {
        let info = self
            .github_client
            .repo_info(repo)
            .await
            .map_err(|e| (Request::RepoInfo, e))?;

        let release = self
            .github_client
            .latest_release(repo)
            .await
            .map_err(|e| (Request::LatestRelease, e))?;

        Ok(
            GitHubClient::find_asset(&release.assets, &self.env.os, &self.env.arch).map(
                |asset| AvailableApp {
                    name: asset.name.clone(),
                    description: info.description.clone(),
                    download_url: asset.browser_download_url.clone(),
                },
            ),
        )
    }

    /// Download one asset into `dir` under its application name and mark it executable.
    async fn download_and_store(&self, url: &str, dir: &Path) -> DonutResult<PathBuf> {
        let name = utils::app_name(url)?;
        let response = self.github_client.download(url).await?;

        let path = dir.join(name);
        let mut file = File::create(&path).map_err(DonutError::file("create file", &path))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .map_err(DonutError::file("write file", &path))?;
        }
        file.flush().map_err(DonutError::file("write file", &path))?;
        drop(file);

        utils::make_executable(&path).map_err(DonutError::file("change file permissions", &path))?;

        tracing::info!("Installed {}", path.display());
        Ok(path)
    }

    fn register_path<W: Write>(
        &self,
        home: &Path,
        download_dir: &Path,
        out: &mut W,
    ) -> io::Result<Option<PathBuf>> {
        if !self.env.has_shell_profiles() {
            writeln!(
                out,
                "Please add the following directory to your PATH manually in Windows:"
            )?;
            writeln!(out, "{}", download_dir.display())?;
            writeln!(
                out,
                "You may need to restart your terminal or system for changes to take effect."
            )?;
            return Ok(None);
        }

        let profile = match shell::add_to_path(home, self.env.shell.as_deref(), download_dir) {
            Ok(profile) => {
                let file_name = profile
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                writeln!(out, "Successfully added to PATH in {file_name}")?;
                writeln!(
                    out,
                    "\nTo update your current session, please run the following command:"
                )?;
                writeln!(out, "\nsource ~/{file_name}\n")?;
                Some(profile)
            }
            Err(DonutError::UnsupportedShell { shell }) => {
                tracing::warn!("Unsupported shell '{}'", shell);
                writeln!(
                    out,
                    "Unsupported shell. Please add the following directory to your PATH manually:"
                )?;
                writeln!(out, "{}", download_dir.display())?;
                None
            }
            Err(e) => {
                tracing::warn!("PATH registration failed: {}", e);
                writeln!(out, "{e}")?;
                None
            }
        };

        writeln!(
            out,
            "You will need to restart your terminal or source your shell profile for the changes to take effect."
        )?;
        writeln!(
            out,
            "If you're using bash or zsh, you can do this by running one of the following commands:"
        )?;
        writeln!(out, "\nFor bash: source ~/.bashrc")?;
        writeln!(out, "For zsh:  source ~/.zshrc")?;

        Ok(profile)
    }
}

/// Only a literal "yes", ignoring case and surrounding whitespace, confirms.
pub fn is_confirmed(response: &str) -> bool {
    response.trim().to_lowercase() == "yes"
}

fn read_confirmation<R: BufRead>(mut input: R) -> io::Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    if !line.ends_with('\n') {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input ended before a complete line",
        ));
    }
    Ok(is_confirmed(&line))
}

fn fetch_failure(request: Request, err: &DonutError) -> String {
    match (request, err) {
        (Request::RepoInfo, DonutError::Status { status, .. }) => format!(
            "Received non-200 response code when getting repository info: {status}"
        ),
        (Request::LatestRelease, DonutError::Status { status, .. }) => {
            format!("Received non-200 response code: {status}")
        }
        (_, DonutError::Decode { .. }) => err.to_string(),
        (Request::RepoInfo, _) => format!("Failed to get repository info: {err}"),
        (Request::LatestRelease, _) => format!("Failed to get latest release: {err}"),
    }
}

fn download_failure(err: &DonutError) -> String {
    match err {
        DonutError::Http(_) | DonutError::Status { .. } => {
            format!("Failed to download file: {err}")
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_confirmed() {
        assert!(is_confirmed("yes"));
        assert!(is_confirmed("YES\n"));
        assert!(is_confirmed("  Yes \r\n"));
        assert!(!is_confirmed("y"));
        assert!(!is_confirmed("Yes please"));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("no"));
    }

    #[test]
    fn test_read_confirmation() {
        assert!(read_confirmation(Cursor::new("yes\n")).unwrap());
        assert!(!read_confirmation(Cursor::new("\n")).unwrap());
        assert!(!read_confirmation(Cursor::new("no\nyes\n")).unwrap());
    }

    #[test]
    fn test_read_confirmation_eof_is_error() {
        let err = read_confirmation(Cursor::new("")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        // an unterminated answer is as incomplete as no answer
        let err = read_confirmation(Cursor::new("yes")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_fetch_failure_messages() {
        let status = DonutError::Status {
            url: "https://api.github.com/repos/acme/tool".to_string(),
            status: 404,
        };
        assert_eq!(
            fetch_failure(Request::RepoInfo, &status),
            "Received non-200 response code when getting repository info: 404"
        );
        assert_eq!(
            fetch_failure(Request::LatestRelease, &status),
            "Received non-200 response code: 404"
        );

        let decode = DonutError::Decode {
            what: "release info",
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert!(fetch_failure(Request::LatestRelease, &decode)
            .starts_with("Failed to unmarshal release info"));
    }

    #[test]
    fn test_download_failure_messages() {
        let missing = DonutError::MissingVersion {
            filename: "tool".to_string(),
        };
        assert_eq!(
            download_failure(&missing),
            "Invalid filename format, cannot find version: tool"
        );

        let status = DonutError::Status {
            url: "https://example.com/tool-v1".to_string(),
            status: 500,
        };
        assert!(download_failure(&status).starts_with("Failed to download file:"));
    }
}
