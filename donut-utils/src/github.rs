use crate::error::{DonutError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Repository fields the installer reads. Does not contain all fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoInfo {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// A latest-release payload. Does not contain all fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// GitHub returns `"description": null` for repositories without one.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Longest wait for establishing a connection, API or download.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GitHubClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
    api_timeout: Duration,
}

impl GitHubClient {
    /// `api_timeout` bounds each API request including its body. Downloads have no
    /// overall deadline, only the connect timeout.
    pub fn new(base_url: &str, token: Option<String>, api_timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent("donut-utils")
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            api_timeout,
        })
    }

    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}/{}", self.base_url, repo)
    }

    pub fn latest_release_url(&self, repo: &str) -> String {
        format!("{}/{}/releases/latest", self.base_url, repo)
    }

    /// Fetch the repository description.
    pub async fn repo_info(&self, repo: &str) -> Result<RepoInfo> {
        self.get_json(&self.repo_url(repo), "repository info").await
    }

    /// Fetch the asset list of the latest release.
    pub async fn latest_release(&self, repo: &str) -> Result<Release> {
        self.get_json(&self.latest_release_url(repo), "release info")
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &'static str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(url)
            .timeout(self.api_timeout)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = ok_status(request.send().await?, url)?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| DonutError::Decode { what, source })
    }

    /// Start downloading an asset. The body is left unread for the caller to stream.
    pub async fn download(&self, url: &str) -> Result<Response> {
        tracing::debug!("Downloading {}", url);
        let response = self.http_client.get(url).send().await?;
        ok_status(response, url)
    }

    /// First asset whose name contains both the OS and the architecture identifier.
    ///
    /// Plain substring matching: `"arm"` also matches an `arm64` asset.
    pub fn find_asset<'a>(
        assets: &'a [ReleaseAsset],
        os: &str,
        arch: &str,
    ) -> Option<&'a ReleaseAsset> {
        assets
            .iter()
            .find(|asset| asset.name.contains(os) && asset.name.contains(arch))
    }
}

fn ok_status(response: Response, url: &str) -> Result<Response> {
    if response.status() != StatusCode::OK {
        return Err(DonutError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("https://example.com/{name}"),
        }
    }

    #[test]
    fn test_find_asset_first_match_wins() {
        let assets = vec![
            asset("tool-v1.0.0-windows-amd64.exe"),
            asset("tool-v1.0.0-linux-amd64"),
            asset("tool-v1.0.0-linux-amd64.tar.gz"),
        ];
        let found = GitHubClient::find_asset(&assets, "linux", "amd64").unwrap();
        assert_eq!(found.name, "tool-v1.0.0-linux-amd64");
    }

    #[test]
    fn test_find_asset_ignores_order_of_non_matches() {
        let matching = asset("tool-v1.0.0-linux-arm64");
        let mut assets = vec![
            asset("tool-v1.0.0-darwin-arm64"),
            matching.clone(),
            asset("tool-v1.0.0-linux-amd64"),
        ];
        assert_eq!(
            GitHubClient::find_asset(&assets, "linux", "arm64"),
            Some(&matching)
        );

        assets.swap(0, 2);
        assert_eq!(
            GitHubClient::find_asset(&assets, "linux", "arm64"),
            Some(&matching)
        );
    }

    #[test]
    fn test_find_asset_requires_both_identifiers() {
        let assets = vec![
            asset("tool-v1.0.0-linux-386"),
            asset("tool-v1.0.0-darwin-amd64"),
        ];
        assert!(GitHubClient::find_asset(&assets, "linux", "amd64").is_none());
        assert!(GitHubClient::find_asset(&[], "linux", "amd64").is_none());
    }

    #[test]
    fn test_find_asset_is_case_sensitive() {
        let assets = vec![asset("tool-v1.0.0-Linux-AMD64")];
        assert!(GitHubClient::find_asset(&assets, "linux", "amd64").is_none());
    }

    #[test]
    fn test_find_asset_substring_false_positive_is_kept() {
        // "arm" is a substring of "arm64"
        let assets = vec![asset("tool-v1.0.0-linux-arm64")];
        assert!(GitHubClient::find_asset(&assets, "linux", "arm").is_some());
    }

    #[test]
    fn test_decode_null_description() {
        let info: RepoInfo = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(info.description, "");

        let info: RepoInfo =
            serde_json::from_str(r#"{"id": 1, "description": "a tool"}"#).unwrap();
        assert_eq!(info.description, "a tool");
    }

    #[test]
    fn test_decode_release_assets() {
        let release: Release = serde_json::from_str(
            r#"{"tag_name": "v2.0.0", "assets": [
                {"name": "tool-v2.0.0-linux-amd64", "size": 10,
                 "browser_download_url": "https://example.com/tool-v2.0.0-linux-amd64"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "tool-v2.0.0-linux-amd64");
    }

    #[test]
    fn test_urls_join_base() {
        let client =
            GitHubClient::new("https://api.github.com/repos/", None, Duration::from_secs(30))
                .unwrap();
        assert_eq!(
            client.repo_url("acme/tool"),
            "https://api.github.com/repos/acme/tool"
        );
        assert_eq!(
            client.latest_release_url("acme/tool"),
            "https://api.github.com/repos/acme/tool/releases/latest"
        );
    }
}
