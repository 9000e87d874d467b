// ---------------------------------------------------------------------------
// Compatibility policy: may this engine load a save made by that engine?
// ---------------------------------------------------------------------------
//
// Engine version numbers work like this with regard to saves:
// - any change to the first three components means saves are not
//   compatible between the two engines;
// - a change only to the fourth (build) component means saves must be
//   compatible.

use simulation::Version;

/// Result of comparing a save's version against the running engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Load it.
    Accept,
    /// Loadable, but made by a newer build of this engine; ask the user first.
    AcceptWithUpgradeWarning,
    /// Not loadable, and nobody is around to ask. Not an error.
    RejectIncompatible,
    /// Not loadable by this engine; try handing it to an older engine.
    RequireLegacyRuntime,
}

/// Decide how to treat a save made by `loaded` when running `running`.
pub fn decide(loaded: &Version, running: &Version, unattended: bool) -> Outcome {
    if !loaded.is_engine_compatible(running) {
        return if unattended {
            Outcome::RejectIncompatible
        } else {
            Outcome::RequireLegacyRuntime
        };
    }
    if !unattended && loaded.is_greater_than(running, false) {
        return Outcome::AcceptWithUpgradeWarning;
    }
    Outcome::Accept
}
