//! End-to-end release pipeline scenarios over mock collaborators.
//!
//! The theme configuration, filesystem and store collaborators are the real
//! implementations over a temp directory; git, prompts, bundling and the
//! hosting API are scripted doubles that record every call.

use bytes::Bytes;
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use theme_release::cli::OutputManager;
use theme_release::error::{
    PublicationError, ReleaseError, RepositoryError, Result, ValidationError,
};
use theme_release::fsutil::LocalFileStore;
use theme_release::git::{GitClient, GitStatus, RemoteDescriptor};
use theme_release::github::{HostingClient, ReleaseParams, ReleaseRecord, RepoIdentity};
use theme_release::prompt::Prompter;
use theme_release::release::{ReleaseOrchestrator, ReleaseOutcome, ReleasePhase};
use theme_release::store::StoreConfigManager;
use theme_release::theme::ThemeConfigManager;
use theme_release::Bundler;

const REMOTE_URL: &str = "https://github.com/bigcommerce/cornerstone";

const CONFIG: &str = r#"{
  "name": "cornerstone",
  "version": "1.0.0",
  "meta": {
    "author_name": "Emilio Esteves",
    "author_email": "Emilio@work.net",
    "author_support_url": "http://emilio.net"
  }
}"#;

const CHANGELOG: &str = "# Changelog\n\
All notable changes to this project will be documented in this file.\n\
\n\
## Draft\n\
- Polished the footer\n\
\n\
## 1.0.0 (08-06-2021)\n\
- Released 1.0.0\n";

type CallLog = Arc<Mutex<Vec<String>>>;

fn log_call(log: &CallLog, call: impl Into<String>) {
    log.lock().expect("call log").push(call.into());
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().expect("call log").clone()
}

#[derive(Clone)]
struct MockGit {
    status: GitStatus,
    remotes: Vec<RemoteDescriptor>,
    fail_push: bool,
    log: CallLog,
}

impl MockGit {
    fn clean(log: CallLog) -> Self {
        Self {
            status: GitStatus {
                current_branch: "master".to_string(),
                ..Default::default()
            },
            remotes: vec![RemoteDescriptor {
                name: "cornerstone".to_string(),
                push_url: REMOTE_URL.to_string(),
            }],
            fail_push: false,
            log,
        }
    }

    fn dirty(log: CallLog) -> Self {
        let mut git = Self::clean(log);
        git.status.modified = vec!["templates/page.html".to_string()];
        git
    }

    fn rejecting_push(log: CallLog) -> Self {
        let mut git = Self::clean(log);
        git.fail_push = true;
        git
    }
}

impl GitClient for MockGit {
    async fn status(&self) -> Result<GitStatus> {
        log_call(&self.log, "git.status");
        Ok(self.status.clone())
    }

    async fn remotes(&self) -> Result<Vec<RemoteDescriptor>> {
        log_call(&self.log, "git.remotes");
        Ok(self.remotes.clone())
    }

    async fn add(&self, paths: &[PathBuf]) -> Result<()> {
        log_call(&self.log, format!("git.add:{}", paths.len()));
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<String> {
        log_call(&self.log, format!("git.commit:{message}"));
        Ok("123456789".to_string())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        log_call(&self.log, format!("git.push:{remote}:{branch}"));
        if self.fail_push {
            return Err(RepositoryError::PushRejected {
                remote: remote.to_string(),
                branch: branch.to_string(),
                stderr: "non-fast-forward".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Clone)]
struct ScriptedPrompter {
    version_answer: String,
    create_release: bool,
    token: Option<String>,
    proceed: bool,
    log: CallLog,
}

impl ScriptedPrompter {
    fn new(version_answer: &str, log: CallLog) -> Self {
        Self {
            version_answer: version_answer.to_string(),
            create_release: false,
            token: None,
            proceed: true,
            log,
        }
    }

    fn with_release(mut self, token: &str) -> Self {
        self.create_release = true;
        self.token = Some(token.to_string());
        self
    }

    fn declining(mut self) -> Self {
        self.proceed = false;
        self
    }
}

impl Prompter for ScriptedPrompter {
    async fn target_version(&self, _current: &Version) -> Result<String> {
        log_call(&self.log, "prompt.version");
        Ok(self.version_answer.clone())
    }

    async fn select_remote(&self, remotes: &[RemoteDescriptor]) -> Result<RemoteDescriptor> {
        log_call(&self.log, "prompt.remote");
        Ok(remotes.first().expect("remotes").clone())
    }

    async fn create_remote_release(&self) -> Result<bool> {
        log_call(&self.log, "prompt.create_release");
        Ok(self.create_release)
    }

    async fn hosting_token(&self) -> Result<String> {
        log_call(&self.log, "prompt.token");
        Ok(self.token.clone().expect("token scripted"))
    }

    async fn confirm_release(
        &self,
        _target: &Version,
        _remote: &RemoteDescriptor,
    ) -> Result<bool> {
        log_call(&self.log, "prompt.confirm");
        Ok(self.proceed)
    }
}

#[derive(Clone)]
struct MockBundler {
    theme_root: PathBuf,
    log: CallLog,
}

impl Bundler for MockBundler {
    async fn bundle(&self, theme_name: &str, version: &Version) -> Result<PathBuf> {
        log_call(&self.log, format!("bundle:{theme_name}:{version}"));
        let path = self.theme_root.join(format!("{theme_name}-{version}.zip"));
        std::fs::write(&path, b"zip-bytes").expect("write bundle");
        Ok(path)
    }
}

#[derive(Clone)]
struct MockHosting {
    fail_upload: bool,
    log: CallLog,
}

impl HostingClient for MockHosting {
    async fn create_release(
        &self,
        token: &str,
        repo: &RepoIdentity,
        params: &ReleaseParams,
    ) -> Result<ReleaseRecord> {
        log_call(
            &self.log,
            format!("hosting.create:{token}:{}/{}:{}", repo.owner, repo.repo, params.tag_name),
        );
        Ok(ReleaseRecord {
            id: 7,
            html_url: "release_url".to_string(),
            asset_download_url: None,
        })
    }

    async fn upload_release_asset(
        &self,
        _token: &str,
        _repo: &RepoIdentity,
        release_id: u64,
        asset_name: &str,
        _content: Bytes,
    ) -> Result<String> {
        log_call(&self.log, format!("hosting.upload:{release_id}:{asset_name}"));
        if self.fail_upload {
            return Err(PublicationError::AssetUploadFailed {
                status: 500,
                body: "boom".to_string(),
            }
            .into());
        }
        Ok("bundle_download_url".to_string())
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    log: CallLog,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), CONFIG).expect("write config");
        std::fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).expect("write changelog");
        Self {
            dir,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn orchestrator(
        &self,
        git: MockGit,
        prompter: ScriptedPrompter,
        hosting: MockHosting,
    ) -> ReleaseOrchestrator<
        MockGit,
        ScriptedPrompter,
        MockBundler,
        MockHosting,
        ThemeConfigManager,
        LocalFileStore,
    > {
        ReleaseOrchestrator::new(
            self.root(),
            git,
            prompter,
            MockBundler {
                theme_root: self.root().to_path_buf(),
                log: self.log.clone(),
            },
            hosting,
            ThemeConfigManager::new(self.root()),
            LocalFileStore,
            StoreConfigManager::new(self.root()),
            OutputManager::new(true),
        )
    }

    fn hosting(&self) -> MockHosting {
        MockHosting {
            fail_upload: false,
            log: self.log.clone(),
        }
    }
}

// Scenario A: clean tree, one remote, user opts out of remote publication.
#[tokio::test]
async fn release_without_remote_publication() {
    let fixture = Fixture::new();
    let git = MockGit::clean(fixture.log.clone());
    let prompter = ScriptedPrompter::new("1.0.1", fixture.log.clone());

    let outcome = fixture
        .orchestrator(git, prompter, fixture.hosting())
        .run()
        .await
        .expect("release succeeds");

    let summary = match outcome {
        ReleaseOutcome::Released(summary) => summary,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(summary.version, Version::parse("1.0.1").expect("semver"));
    assert_eq!(summary.commit, "123456789");
    assert_eq!(summary.remote.name, "cornerstone");
    assert!(summary.record.is_none());

    let log = calls(&fixture.log);
    assert!(log.contains(&"git.commit:Release version 1.0.1".to_string()));
    assert!(log.contains(&"git.push:cornerstone:master".to_string()));
    assert!(!log.iter().any(|c| c.starts_with("hosting.")));

    // Version files were persisted.
    let config = std::fs::read_to_string(fixture.root().join("config.json")).expect("config");
    assert!(config.contains(r#""version": "1.0.1""#));
    let changelog =
        std::fs::read_to_string(fixture.root().join("CHANGELOG.md")).expect("changelog");
    assert!(changelog.contains("## 1.0.1"));
    assert!(changelog.contains("- Polished the footer"));

    // Bundle artifact is cleaned out of the working tree.
    assert!(!fixture.root().join("cornerstone-1.0.1.zip").exists());
}

// Scenario B: user opts in and supplies a credential.
#[tokio::test]
async fn release_with_remote_publication() {
    let fixture = Fixture::new();
    let git = MockGit::clean(fixture.log.clone());
    let prompter =
        ScriptedPrompter::new("1.0.1", fixture.log.clone()).with_release("githubToken_value");

    let outcome = fixture
        .orchestrator(git, prompter, fixture.hosting())
        .run()
        .await
        .expect("release succeeds");

    let summary = match outcome {
        ReleaseOutcome::Released(summary) => summary,
        other => panic!("unexpected outcome: {other:?}"),
    };
    let record = summary.record.expect("release record");
    assert_eq!(record.html_url, "release_url");
    assert_eq!(record.asset_download_url.as_deref(), Some("bundle_download_url"));

    let log = calls(&fixture.log);
    assert!(
        log.contains(
            &"hosting.create:githubToken_value:bigcommerce/cornerstone:v1.0.1".to_string()
        )
    );
    assert!(log.contains(&"hosting.upload:7:cornerstone-1.0.1.zip".to_string()));

    // Push happened before publication.
    let push_idx = log.iter().position(|c| c.starts_with("git.push")).expect("push");
    let create_idx = log
        .iter()
        .position(|c| c.starts_with("hosting.create"))
        .expect("create");
    assert!(push_idx < create_idx);
}

// Scenario C: dirty tree aborts before any commit, push or publish call.
#[tokio::test]
async fn dirty_tree_aborts_without_mutation() {
    let fixture = Fixture::new();
    let git = MockGit::dirty(fixture.log.clone());
    let prompter = ScriptedPrompter::new("1.0.1", fixture.log.clone());

    let failure = fixture
        .orchestrator(git, prompter, fixture.hosting())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase, ReleasePhase::ValidateGit);
    assert!(matches!(
        failure.error,
        ReleaseError::Validation(ValidationError::DirtyWorkingTree { .. })
    ));
    assert!(!failure.local_commit_exists());

    let log = calls(&fixture.log);
    assert!(!log.iter().any(|c| c.starts_with("git.commit")));
    assert!(!log.iter().any(|c| c.starts_with("git.push")));
    assert!(!log.iter().any(|c| c.starts_with("hosting.")));
    assert!(!log.iter().any(|c| c.starts_with("bundle")));

    // No prompt was reached either.
    assert!(!log.iter().any(|c| c.starts_with("prompt.")));
}

// Scenario D: target equal to current is rejected during version collection.
#[tokio::test]
async fn non_advancing_version_is_rejected() {
    let fixture = Fixture::new();
    let git = MockGit::clean(fixture.log.clone());
    let prompter = ScriptedPrompter::new("1.0.0", fixture.log.clone());

    let failure = fixture
        .orchestrator(git, prompter, fixture.hosting())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase, ReleasePhase::CollectTargetVersion);
    assert!(matches!(
        failure.error,
        ReleaseError::Validation(ValidationError::VersionNotAdvancing { .. })
    ));

    // No prompt beyond version collection proceeded, and nothing was built.
    let log = calls(&fixture.log);
    assert!(log.contains(&"prompt.version".to_string()));
    assert!(!log.contains(&"prompt.create_release".to_string()));
    assert!(!log.contains(&"prompt.confirm".to_string()));
    assert!(!log.iter().any(|c| c.starts_with("bundle")));
    assert!(!log.iter().any(|c| c.starts_with("git.commit")));
}

// Declining the final confirmation is a full no-op, not an error.
#[tokio::test]
async fn declined_confirmation_is_a_full_no_op() {
    let fixture = Fixture::new();
    let git = MockGit::clean(fixture.log.clone());
    let prompter = ScriptedPrompter::new("1.0.1", fixture.log.clone()).declining();

    let outcome = fixture
        .orchestrator(git, prompter, fixture.hosting())
        .run()
        .await
        .expect("decline is not an error");

    assert!(matches!(outcome, ReleaseOutcome::Declined));

    let log = calls(&fixture.log);
    assert!(log.contains(&"prompt.confirm".to_string()));
    assert!(!log.iter().any(|c| c.starts_with("bundle")));
    assert!(!log.iter().any(|c| c.starts_with("git.add")));
    assert!(!log.iter().any(|c| c.starts_with("git.commit")));
    assert!(!log.iter().any(|c| c.starts_with("git.push")));
    assert!(!log.iter().any(|c| c.starts_with("hosting.")));

    // Files are untouched.
    let config = std::fs::read_to_string(fixture.root().join("config.json")).expect("config");
    assert!(config.contains(r#""version": "1.0.0""#));
    let changelog =
        std::fs::read_to_string(fixture.root().join("CHANGELOG.md")).expect("changelog");
    assert_eq!(changelog, CHANGELOG);
}

// Asset upload failure after the push is a flagged partial success.
#[tokio::test]
async fn asset_upload_failure_reports_partial_release() {
    let fixture = Fixture::new();
    let git = MockGit::clean(fixture.log.clone());
    let prompter =
        ScriptedPrompter::new("1.0.1", fixture.log.clone()).with_release("githubToken_value");
    let hosting = MockHosting {
        fail_upload: true,
        log: fixture.log.clone(),
    };

    let failure = fixture
        .orchestrator(git, prompter, hosting)
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase, ReleasePhase::PublishRelease);
    assert!(failure.local_commit_exists());
    assert!(failure.release_missing_asset());

    // The commit and push already happened.
    let log = calls(&fixture.log);
    assert!(log.iter().any(|c| c.starts_with("git.push")));
    assert!(log.iter().any(|c| c.starts_with("hosting.create")));

    // The bundle is kept so the user can attach it to the release manually.
    assert!(fixture.root().join("cornerstone-1.0.1.zip").exists());
}

// A rejected push must not leave the bundle artifact dirtying the tree.
#[tokio::test]
async fn rejected_push_cleans_up_the_bundle() {
    let fixture = Fixture::new();
    let git = MockGit::rejecting_push(fixture.log.clone());
    let prompter = ScriptedPrompter::new("1.0.1", fixture.log.clone());

    let failure = fixture
        .orchestrator(git, prompter, fixture.hosting())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.phase, ReleasePhase::ConfirmAndPush);
    assert!(matches!(
        failure.error,
        ReleaseError::Repository(RepositoryError::PushRejected { .. })
    ));
    assert!(failure.local_commit_exists());
    assert!(!fixture.root().join("cornerstone-1.0.1.zip").exists());
}
