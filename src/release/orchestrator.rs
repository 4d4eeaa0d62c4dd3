//! The release state machine.
//!
//! Drives the collaborators in strict order, short-circuiting to a
//! [`ReleaseFailure`] the moment any gate fails, and to
//! [`ReleaseOutcome::Declined`] when the user refuses the final confirmation.
//! Irreversible actions are ordered after every validation and the bundle
//! build, so an early failure never mutates git state.

use crate::bundle::Bundler;
use crate::changelog::{CHANGELOG_FILE, ChangelogEditor, RenderedChangelog};
use crate::cli::OutputManager;
use crate::error::{ReleaseError, Result, ValidationError};
use crate::fsutil::FileStore;
use crate::git::{GitClient, RepositoryGate};
use crate::github::{HostingClient, ReleasePublisher, RepoIdentity};
use crate::prompt::Prompter;
use crate::release::{ReleaseContext, ReleaseFailure, ReleaseOutcome, ReleasePhase, ReleaseSummary};
use crate::store::StoreConfigManager;
use crate::theme::{ThemeConfig, render_version_update};
use crate::version::VersionPolicy;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Sequences validation gates, external calls and state transitions for one
/// release run.
///
/// Collaborators are injected so the whole pipeline can run against test
/// doubles; a second concurrent `run()` against the same checkout is not
/// supported.
pub struct ReleaseOrchestrator<G, P, B, H, T, F> {
    theme_root: PathBuf,
    git: G,
    prompter: P,
    bundler: B,
    hosting: H,
    theme: T,
    files: F,
    store: StoreConfigManager,
    output: OutputManager,
}

fn fail(phase: ReleasePhase) -> impl FnOnce(ReleaseError) -> ReleaseFailure {
    move |error| ReleaseFailure { phase, error }
}

impl<G, P, B, H, T, F> ReleaseOrchestrator<G, P, B, H, T, F>
where
    G: GitClient,
    P: Prompter,
    B: Bundler,
    H: HostingClient,
    T: ThemeConfig,
    F: FileStore,
{
    /// Construct an orchestrator over a theme checkout and its collaborators
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        theme_root: impl Into<PathBuf>,
        git: G,
        prompter: P,
        bundler: B,
        hosting: H,
        theme: T,
        files: F,
        store: StoreConfigManager,
        output: OutputManager,
    ) -> Self {
        Self {
            theme_root: theme_root.into(),
            git,
            prompter,
            bundler,
            hosting,
            theme,
            files,
            store,
            output,
        }
    }

    /// Run the release pipeline to its terminal state
    pub async fn run(&self) -> std::result::Result<ReleaseOutcome, ReleaseFailure> {
        let mut ctx = ReleaseContext::default();
        let gate = RepositoryGate::new(&self.git);

        self.validate_environment()
            .await
            .map_err(fail(ReleasePhase::ValidateEnvironment))?;
        self.output.success("Environment validated");

        let status = gate
            .ensure_clean()
            .await
            .map_err(fail(ReleasePhase::ValidateGit))?;
        ctx.branch = Some(status.current_branch.clone());
        self.output
            .success(&format!("Working tree clean on '{}'", status.current_branch));

        let confirmed = self
            .collect_target_version(&gate, &mut ctx)
            .await
            .map_err(fail(ReleasePhase::CollectTargetVersion))?;
        if !confirmed {
            info!("user declined the final confirmation; nothing was changed");
            self.output.info("Release cancelled; nothing was changed");
            return Ok(ReleaseOutcome::Declined);
        }

        let target = ctx.target_version.clone().expect("target collected");

        self.output.progress("Building bundle...");
        let bundle_path = self
            .build_bundle(&ctx)
            .await
            .map_err(fail(ReleasePhase::BuildBundle))?;
        self.output
            .success(&format!("Bundle built at {}", bundle_path.display()));
        ctx.bundle_path = Some(bundle_path);

        let result = self.finish_release(&gate, &mut ctx).await;

        // The artifact must not linger in the working tree, or the next run
        // fails the clean-tree gate. Only an asset-less remote release keeps
        // it, so the user can upload it manually.
        let keep_bundle = matches!(&result, Err(failure) if failure.release_missing_asset());
        if !keep_bundle {
            self.cleanup_bundle(&ctx).await;
        }
        let record = result?;

        Ok(ReleaseOutcome::Released(ReleaseSummary {
            version: target,
            commit: ctx.commit.clone().expect("commit recorded"),
            remote: ctx.remote.clone().expect("remote collected"),
            record,
        }))
    }

    /// Every step after the bundle exists, through the optional publication
    async fn finish_release<'g>(
        &self,
        gate: &RepositoryGate<'g, G>,
        ctx: &mut ReleaseContext,
    ) -> std::result::Result<Option<crate::github::ReleaseRecord>, ReleaseFailure> {
        let rendered = self
            .render_changelog(ctx)
            .await
            .map_err(fail(ReleasePhase::RenderChangelog))?;
        ctx.changelog_excerpt = Some(rendered.excerpt.clone());
        self.output.success("Changelog rendered");

        self.persist_version_files(ctx, &rendered)
            .await
            .map_err(fail(ReleasePhase::PersistVersionFiles))?;
        self.output.success("Version files written");

        let commit = self
            .stage_and_commit(gate, ctx)
            .await
            .map_err(fail(ReleasePhase::StageAndCommit))?;
        self.output.success(&format!("Committed {commit}"));
        ctx.commit = Some(commit);

        let remote = ctx.remote.clone().expect("remote collected");
        let branch = ctx.branch.clone().expect("branch known");
        gate.push(&remote, &branch)
            .await
            .map_err(fail(ReleasePhase::ConfirmAndPush))?;
        self.output
            .success(&format!("Pushed {branch} to '{}'", remote.name));

        if !ctx.create_remote_release {
            debug!("remote release creation skipped by user choice");
            return Ok(None);
        }

        self.output.progress("Publishing release...");
        let record = self
            .publish_release(ctx)
            .await
            .map_err(fail(ReleasePhase::PublishRelease))?;
        self.output
            .success(&format!("Release published: {}", record.html_url));
        Ok(Some(record))
    }

    /// Runtime and tooling checks; the store configuration is read once here
    async fn validate_environment(&self) -> Result<()> {
        which::which("git").map_err(|e| ValidationError::UnsupportedEnvironment {
            reason: format!("git binary not found on PATH: {e}"),
        })?;

        if !self.theme.config_exists() {
            return Err(ValidationError::UnsupportedEnvironment {
                reason: format!(
                    "no theme configuration found in {}",
                    self.theme_root.display()
                ),
            }
            .into());
        }
        if !self.theme.schema_exists() {
            debug!("theme has no schema file; continuing");
        }

        match self.store.read().await? {
            Some(store) => {
                if let Some(url) = store.normal_store_url {
                    debug!("store configuration found for {url}");
                }
            }
            None => debug!("no store configuration present"),
        }

        Ok(())
    }

    /// Prompt sequence: target version, remote, opt-in, token, confirmation
    async fn collect_target_version<'g>(
        &self,
        gate: &RepositoryGate<'g, G>,
        ctx: &mut ReleaseContext,
    ) -> Result<bool> {
        let current = self.theme.version().await?;
        self.output.info(&format!("Current version: {current}"));

        let answer = self.prompter.target_version(&current).await?;
        let target = VersionPolicy::validate_target(&current, &answer)?;
        info!("releasing {current} -> {target}");

        let remote = gate.select_remote(&self.prompter).await?;
        let create_remote_release = self.prompter.create_remote_release().await?;
        let hosting_token = if create_remote_release {
            Some(self.prompter.hosting_token().await?)
        } else {
            None
        };

        let confirmed = self.prompter.confirm_release(&target, &remote).await?;

        ctx.current_version = Some(current);
        ctx.target_version = Some(target);
        ctx.remote = Some(remote);
        ctx.create_remote_release = create_remote_release;
        ctx.hosting_token = hosting_token;

        Ok(confirmed)
    }

    async fn build_bundle(&self, ctx: &ReleaseContext) -> Result<PathBuf> {
        let name = self.theme.name().await?;
        let target = ctx.target_version.as_ref().expect("target collected");
        self.bundler.bundle(&name, target).await
    }

    async fn render_changelog(&self, ctx: &ReleaseContext) -> Result<RenderedChangelog> {
        let target = ctx.target_version.as_ref().expect("target collected");
        let changelog_path = self.theme_root.join(CHANGELOG_FILE);
        let existing = self.files.read_to_string(&changelog_path).await?;
        let author = self.theme.raw_config().await?.author();
        let today = chrono::Local::now().date_naive();

        Ok(ChangelogEditor::render(
            existing.as_deref(),
            target,
            today,
            &author,
        )?)
    }

    async fn persist_version_files(
        &self,
        ctx: &ReleaseContext,
        rendered: &RenderedChangelog,
    ) -> Result<()> {
        let changelog_path = self.theme_root.join(CHANGELOG_FILE);
        self.files.write(&changelog_path, &rendered.document).await?;

        let config_path = self.theme.config_path();
        let config_text = self
            .files
            .read_to_string(&config_path)
            .await?
            .ok_or_else(|| {
                crate::error::io_error(
                    &config_path,
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                )
            })?;
        let target = ctx.target_version.as_ref().expect("target collected");
        let updated = render_version_update(&config_text, target)?;
        self.files.write(&config_path, &updated).await
    }

    async fn stage_and_commit<'g>(
        &self,
        gate: &RepositoryGate<'g, G>,
        ctx: &ReleaseContext,
    ) -> Result<String> {
        let paths = vec![
            self.theme_root.join(CHANGELOG_FILE),
            self.theme.config_path(),
        ];
        gate.stage(&paths).await?;
        let target = ctx.target_version.as_ref().expect("target collected");
        gate.commit_release(target).await
    }

    async fn publish_release(&self, ctx: &ReleaseContext) -> Result<crate::github::ReleaseRecord> {
        let remote = ctx.remote.as_ref().expect("remote collected");
        let token = ctx
            .hosting_token
            .clone()
            .ok_or_else(|| ValidationError::UnsupportedEnvironment {
                reason: "remote release requested without a hosting token".to_string(),
            })?;
        let repo = RepoIdentity::from_remote_url(&remote.push_url)?;

        let target = ctx.target_version.as_ref().expect("target collected");
        let notes = ctx
            .changelog_excerpt
            .as_deref()
            .unwrap_or_default();
        let bundle_path = ctx.bundle_path.as_ref().expect("bundle built");

        ReleasePublisher::new(&self.hosting, token, repo)
            .publish(target, notes, bundle_path)
            .await
    }

    /// Remove the bundle artifact from the working tree; failure is a warning
    async fn cleanup_bundle(&self, ctx: &ReleaseContext) {
        let Some(bundle_path) = ctx.bundle_path.as_ref() else {
            return;
        };
        if let Err(e) = self.files.remove(bundle_path).await {
            warn!("could not remove bundle {}: {e}", bundle_path.display());
            self.output.warn(&format!(
                "Could not remove bundle {}: {e}",
                bundle_path.display()
            ));
        }
    }
}
