// ---------------------------------------------------------------------------
// External collaborators consulted by the load path
// ---------------------------------------------------------------------------
//
// Dialogs and process launching live outside this crate. The load path only
// sees these narrow traits, so headless servers and tests can swap in
// non-interactive implementations.

use std::path::Path;

use simulation::Version;
use tracing::warn;

/// What the legacy-runtime collaborator managed to do with a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyResolution {
    /// An older engine was started to open the save.
    Launched,
    /// No suitable engine was found.
    Unresolvable,
}

/// Finds and starts an older engine able to open a save made by
/// `loaded_version`.
pub trait LegacyRuntimeResolver: Send + Sync {
    fn resolve(&self, loaded_version: &Version, save_path: &Path) -> LegacyResolution;
}

/// Answer to the "open a save made by a newer build?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Proceed,
    Cancel,
}

/// Asks the user whether to open a save made by a newer build of this engine.
pub trait UpgradePrompt: Send + Sync {
    fn confirm(&self, loaded_version: &Version, running_version: &Version) -> PromptAnswer;
}

/// Fire-and-forget operator notification, used in unattended mode when a
/// load is rejected (e.g. relayed into the lobby chat of a headless host).
pub trait UnattendedNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Resolver for installations that ship no older engines.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLegacyRuntime;

impl LegacyRuntimeResolver for NoLegacyRuntime {
    fn resolve(&self, _loaded_version: &Version, _save_path: &Path) -> LegacyResolution {
        LegacyResolution::Unresolvable
    }
}

/// Prompt that always answers "proceed".
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoProceed;

impl UpgradePrompt for AutoProceed {
    fn confirm(&self, _loaded: &Version, _running: &Version) -> PromptAnswer {
        PromptAnswer::Proceed
    }
}

/// Prompt that always answers "cancel".
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoCancel;

impl UpgradePrompt for AutoCancel {
    fn confirm(&self, _loaded: &Version, _running: &Version) -> PromptAnswer {
        PromptAnswer::Cancel
    }
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl UnattendedNotifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{message}");
    }
}
