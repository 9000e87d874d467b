// ---------------------------------------------------------------------------
// Data upgrade registry: post-load fixes keyed by engine build number
// ---------------------------------------------------------------------------
//
// Saves are only ever loaded by an engine with the same major/minor/patch,
// so the only thing that can differ is the build number. Each step is a
// function `fn(&mut GameData)` that brings data written by an older build up
// to date with the behaviour of the build that introduced the step. The
// registry validates at construction time that no two steps share a build.

use std::collections::HashSet;

use simulation::{GameData, Version};
use tracing::info;

/// A single upgrade step, introduced by engine build `build`.
pub struct DataUpgrade {
    pub build: u32,
    pub description: &'static str,
    pub apply: fn(&mut GameData),
}

/// Result of running the upgrade steps on a loaded game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    /// Build number of the engine that wrote the save.
    pub from_build: u32,
    /// Build number of the running engine.
    pub to_build: u32,
    /// Descriptions of each step that was applied, in order.
    pub applied: Vec<&'static str>,
}

impl UpgradeReport {
    pub fn steps_applied(&self) -> usize {
        self.applied.len()
    }
}

/// Registry holding the ordered, validated list of upgrade steps.
#[derive(Default)]
pub struct DataUpgradeRegistry {
    steps: Vec<DataUpgrade>,
}

impl DataUpgradeRegistry {
    /// Build a registry from a list of upgrade steps, in any order. Steps are
    /// stored sorted by build.
    ///
    /// # Panics
    ///
    /// Panics if two steps are registered for the same build.
    pub fn new(steps: Vec<DataUpgrade>) -> Self {
        let mut seen = HashSet::new();
        for step in &steps {
            assert!(
                seen.insert(step.build),
                "Duplicate data upgrade step for build {}",
                step.build
            );
        }

        let mut steps = steps;
        steps.sort_by_key(|s| s.build);
        Self { steps }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Apply every step newer than `loaded` and not newer than `running`.
    pub fn apply(&self, data: &mut GameData, loaded: &Version, running: &Version) -> UpgradeReport {
        let mut report = UpgradeReport {
            from_build: loaded.build,
            to_build: running.build,
            applied: Vec::new(),
        };
        for step in &self.steps {
            if step.build > loaded.build && step.build <= running.build {
                (step.apply)(data);
                report.applied.push(step.description);
            }
        }
        if !report.applied.is_empty() {
            info!(
                "Applied {} data upgrades (build {} -> {})",
                report.steps_applied(),
                report.from_build,
                report.to_build
            );
        }
        report
    }
}
