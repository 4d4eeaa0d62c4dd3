//! GitHub release creation and asset upload.
//!
//! [`HostingClient`] is the capability trait consumed by [`ReleasePublisher`];
//! [`GitHubClient`] implements it over the GitHub REST API with `reqwest`.
//! Both publication calls are sequential and never retried: a release without
//! its asset is an accepted partial state, because the hosting service offers
//! no atomic multi-part publication.

use crate::error::{PublicationError, Result, io_error};
use bytes::Bytes;
use semver::Version;
use serde::Deserialize;
use std::future::Future;
use std::path::Path;

const API_BASE: &str = "https://api.github.com";
const UPLOADS_BASE: &str = "https://uploads.github.com";
const USER_AGENT: &str = concat!("theme-release/", env!("CARGO_PKG_VERSION"));

/// Owner/repository pair identifying a hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoIdentity {
    /// Derive the repository identity from a remote push URL.
    ///
    /// Accepts `https://github.com/owner/repo(.git)`,
    /// `ssh://git@github.com/owner/repo.git` and the scp-like
    /// `git@github.com:owner/repo.git` form.
    pub fn from_remote_url(remote_url: &str) -> std::result::Result<Self, PublicationError> {
        let unrecognized = || PublicationError::UnrecognizedRemoteUrl {
            url: remote_url.to_string(),
        };

        let path = if let Ok(parsed) = url::Url::parse(remote_url) {
            parsed.path().to_string()
        } else if let Some((_, path)) = remote_url.split_once(':') {
            // scp-like syntax: git@github.com:owner/repo.git
            path.to_string()
        } else {
            return Err(unrecognized());
        };

        let mut segments = path
            .trim_matches('/')
            .trim_end_matches(".git")
            .split('/')
            .filter(|s| !s.is_empty());

        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(unrecognized()),
        }
    }
}

/// Parameters for creating a release entry
#[derive(Debug, Clone)]
pub struct ReleaseParams {
    /// Tag to create the release against
    pub tag_name: String,
    /// Release title
    pub title: String,
    /// Release-note body
    pub body: String,
}

/// Remote hosting service's representation of a published release
#[derive(Debug, Clone)]
pub struct ReleaseRecord {
    /// Release identifier on the hosting service
    pub id: u64,
    /// Public release page URL
    pub html_url: String,
    /// Public download URL of the attached bundle, once uploaded
    pub asset_download_url: Option<String>,
}

/// Trait defining the hosting-release operations the publisher needs
pub trait HostingClient {
    /// Create a release entry; returns the record without an asset
    fn create_release(
        &self,
        token: &str,
        repo: &RepoIdentity,
        params: &ReleaseParams,
    ) -> impl Future<Output = Result<ReleaseRecord>> + Send;

    /// Attach a binary asset to an existing release; returns its download URL
    fn upload_release_asset(
        &self,
        token: &str,
        repo: &RepoIdentity,
        release_id: u64,
        asset_name: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Deserialize)]
struct CreatedRelease {
    id: u64,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadedAsset {
    browser_download_url: String,
}

/// GitHub REST API client
#[derive(Debug, Clone, Default)]
pub struct GitHubClient {
    http: reqwest::Client,
}

impl GitHubClient {
    /// Create a client against api.github.com
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl HostingClient for GitHubClient {
    async fn create_release(
        &self,
        token: &str,
        repo: &RepoIdentity,
        params: &ReleaseParams,
    ) -> Result<ReleaseRecord> {
        let url = format!("{API_BASE}/repos/{}/{}/releases", repo.owner, repo.repo);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&serde_json::json!({
                "tag_name": params.tag_name,
                "name": params.title,
                "body": params.body,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublicationError::ReleaseCreationFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let created: CreatedRelease = response.json().await?;
        Ok(ReleaseRecord {
            id: created.id,
            html_url: created.html_url,
            asset_download_url: None,
        })
    }

    async fn upload_release_asset(
        &self,
        token: &str,
        repo: &RepoIdentity,
        release_id: u64,
        asset_name: &str,
        content: Bytes,
    ) -> Result<String> {
        let url = format!(
            "{UPLOADS_BASE}/repos/{}/{}/releases/{release_id}/assets",
            repo.owner, repo.repo
        );

        let response = self
            .http
            .post(&url)
            .query(&[("name", asset_name)])
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::CONTENT_TYPE, "application/zip")
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublicationError::AssetUploadFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let asset: UploadedAsset = response.json().await?;
        Ok(asset.browser_download_url)
    }
}

/// Publishes a release entry with the bundle attached
pub struct ReleasePublisher<'a, H> {
    client: &'a H,
    token: String,
    repo: RepoIdentity,
}

impl<'a, H: HostingClient> ReleasePublisher<'a, H> {
    /// Create a publisher bound to one repository and credential
    pub fn new(client: &'a H, token: String, repo: RepoIdentity) -> Self {
        Self {
            client,
            token,
            repo,
        }
    }

    /// Create the release entry and upload the bundle as its asset.
    ///
    /// A failure after the release entry exists leaves a real but asset-less
    /// release on the hosting service; the caller reports that partial state
    /// instead of rolling back.
    pub async fn publish(
        &self,
        version: &Version,
        notes: &str,
        bundle_path: &Path,
    ) -> Result<ReleaseRecord> {
        let tag_name = format!("v{version}");
        let params = ReleaseParams {
            tag_name: tag_name.clone(),
            title: tag_name,
            body: notes.to_string(),
        };

        let mut record = self
            .client
            .create_release(&self.token, &self.repo, &params)
            .await?;

        let asset_name = bundle_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-{}.zip", self.repo.repo, version));

        let content = tokio::fs::read(bundle_path)
            .await
            .map_err(|e| io_error(bundle_path, e))?;

        let download_url = self
            .client
            .upload_release_asset(
                &self.token,
                &self.repo,
                record.id,
                &asset_name,
                Bytes::from(content),
            )
            .await?;

        record.asset_download_url = Some(download_url);
        Ok(record)
    }
}
