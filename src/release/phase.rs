//! Release pipeline phases.

/// Phase of the release pipeline.
///
/// The pipeline is linear; every phase may abort the run, and once
/// `StageAndCommit` has completed a local commit exists regardless of how a
/// later phase ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleasePhase {
    /// Collaborators constructed, nothing checked yet
    Init,
    /// Runtime and tooling checks
    ValidateEnvironment,
    /// Clean-working-tree gate
    ValidateGit,
    /// Target version, remote and confirmation prompts
    CollectTargetVersion,
    /// Bundle artifact creation
    BuildBundle,
    /// Changelog section rendering
    RenderChangelog,
    /// Changelog and version-bearing config writes
    PersistVersionFiles,
    /// Staging and release commit
    StageAndCommit,
    /// Push to the selected remote
    ConfirmAndPush,
    /// Remote release creation and asset upload (opt-in)
    PublishRelease,
    /// Pipeline ran to completion
    Done,
}

impl std::fmt::Display for ReleasePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReleasePhase::Init => "init",
            ReleasePhase::ValidateEnvironment => "validate environment",
            ReleasePhase::ValidateGit => "validate git",
            ReleasePhase::CollectTargetVersion => "collect target version",
            ReleasePhase::BuildBundle => "build bundle",
            ReleasePhase::RenderChangelog => "render changelog",
            ReleasePhase::PersistVersionFiles => "persist version files",
            ReleasePhase::StageAndCommit => "stage and commit",
            ReleasePhase::ConfirmAndPush => "push",
            ReleasePhase::PublishRelease => "publish release",
            ReleasePhase::Done => "done",
        };
        f.write_str(name)
    }
}
