// ---------------------------------------------------------------------------
// SaveLoadManager: save and load orchestration
// ---------------------------------------------------------------------------
//
// Save:  read lock -> snapshot + delegate states -> unlock -> encode -> envelope
// Load:  envelope -> version header -> compatibility policy -> snapshot ->
//        delegates -> data upgrades -> fresh GameState
//
// A load never touches the caller's live state. It builds a brand-new
// GameState and hands it back; publishing it is up to the caller.

use std::io::Cursor;
use std::path::Path;

use simulation::{GameData, GameState, SharedGameState, Version};
use tracing::{debug, info};

use crate::atomic_write::atomic_write;
use crate::collaborators::{
    AutoProceed, LegacyResolution, LegacyRuntimeResolver, LogNotifier, NoLegacyRuntime,
    PromptAnswer, UnattendedNotifier, UpgradePrompt,
};
use crate::compatibility::{self, Outcome};
use crate::container_codec::{Container, ContainerReader, DelegateState};
use crate::data_upgrade::{DataUpgradeRegistry, UpgradeReport};
use crate::delegate_registry::DelegateRegistry;
use crate::file_header::{unwrap_header, wrap_with_header};
use crate::save_config::SaveConfig;
use crate::save_error::SaveError;

/// A fully reconstructed game, not yet visible to anyone else.
#[derive(Debug)]
pub struct LoadedGame {
    /// Engine version that wrote the save.
    pub version: Version,
    pub state: GameState,
    pub upgrades: UpgradeReport,
}

impl LoadedGame {
    /// Publish the loaded state behind a fresh lock.
    pub fn into_shared(self) -> SharedGameState {
        SharedGameState::new(self.state)
    }
}

/// Why a load finished without producing a game. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotLoadedReason {
    /// Incompatible save in unattended mode.
    RejectedIncompatible,
    /// The user declined to open a save from a newer build.
    UpgradeDeclined,
    /// An older engine was launched to open the save instead.
    HandedToLegacyRuntime,
}

#[derive(Debug)]
pub enum LoadResult {
    Loaded(LoadedGame),
    NotLoaded(NotLoadedReason),
}

impl LoadResult {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded(_))
    }

    pub fn loaded(self) -> Option<LoadedGame> {
        match self {
            LoadResult::Loaded(game) => Some(game),
            LoadResult::NotLoaded(_) => None,
        }
    }
}

/// Saves and loads games according to a [`SaveConfig`].
pub struct SaveLoadManager {
    config: SaveConfig,
    registry: DelegateRegistry,
    upgrades: DataUpgradeRegistry,
    legacy_runtime: Box<dyn LegacyRuntimeResolver>,
    upgrade_prompt: Box<dyn UpgradePrompt>,
    notifier: Box<dyn UnattendedNotifier>,
}

impl Default for SaveLoadManager {
    fn default() -> Self {
        Self::new(SaveConfig::default())
    }
}

impl SaveLoadManager {
    /// Manager with the built-in delegates, no data upgrades and headless
    /// collaborators.
    pub fn new(config: SaveConfig) -> Self {
        Self {
            config,
            registry: DelegateRegistry::builtin(),
            upgrades: DataUpgradeRegistry::default(),
            legacy_runtime: Box::new(NoLegacyRuntime),
            upgrade_prompt: Box::new(AutoProceed),
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_registry(mut self, registry: DelegateRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_upgrades(mut self, upgrades: DataUpgradeRegistry) -> Self {
        self.upgrades = upgrades;
        self
    }

    pub fn with_legacy_runtime(mut self, resolver: impl LegacyRuntimeResolver + 'static) -> Self {
        self.legacy_runtime = Box::new(resolver);
        self
    }

    pub fn with_upgrade_prompt(mut self, prompt: impl UpgradePrompt + 'static) -> Self {
        self.upgrade_prompt = Box::new(prompt);
        self
    }

    pub fn with_notifier(mut self, notifier: impl UnattendedNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    pub fn registry(&self) -> &DelegateRegistry {
        &self.registry
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Take a consistent projection of `state` under its read lock.
    ///
    /// Writers are blocked from before the snapshot is taken until after the
    /// last delegate has handed over its state.
    pub fn capture(&self, state: &SharedGameState) -> Container {
        let guard = state.acquire_read_lock();
        let snapshot = guard.data.encode();
        let delegates = if self.config.save_delegate_state {
            guard.delegates.iter().map(DelegateState::capture).collect()
        } else {
            Vec::new()
        };
        Container {
            version: self.config.engine_version,
            snapshot,
            delegates,
        }
    }

    /// Encode `state` into complete save-file bytes.
    pub fn save(&self, state: &SharedGameState) -> Result<Vec<u8>, SaveError> {
        let container = self.capture(state);
        let encoded = container.encode()?;
        let bytes = wrap_with_header(&encoded, self.config.compress)?;
        debug!(
            "Encoded save: engine {}, {} delegates, container {} bytes, file {} bytes",
            container.version,
            container.delegates.len(),
            encoded.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Encode `state` fully in memory, then write it to `path` atomically.
    pub fn save_to_file(&self, state: &SharedGameState, path: &Path) -> Result<usize, SaveError> {
        let bytes = self.save(state)?;
        atomic_write(path, &bytes)?;
        info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(bytes.len())
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Decode a save and, if policy allows, rebuild the game it holds.
    ///
    /// `save_path` is handed to the legacy-runtime collaborator when the save
    /// needs an older engine. Without it that case cannot be resolved.
    pub fn load(&self, bytes: &[u8], save_path: Option<&Path>) -> Result<LoadResult, SaveError> {
        let container = unwrap_header(bytes)?;
        let mut reader = ContainerReader::new(Cursor::new(container.as_slice()));

        let loaded = reader.read_version()?;
        let running = self.config.engine_version;
        let outcome = compatibility::decide(&loaded, &running, self.config.unattended);
        debug!("Save from engine {loaded}, running {running}: {outcome:?}");

        match outcome {
            Outcome::Accept => {}
            Outcome::RejectIncompatible => {
                let message = format!(
                    "Incompatible engine versions. We are: {running}. \
                     Trying to load game created with: {loaded}"
                );
                self.notifier.notify(&message);
                return Ok(LoadResult::NotLoaded(NotLoadedReason::RejectedIncompatible));
            }
            Outcome::RequireLegacyRuntime => {
                let resolution = match save_path {
                    Some(path) => self.legacy_runtime.resolve(&loaded, path),
                    None => LegacyResolution::Unresolvable,
                };
                return match resolution {
                    LegacyResolution::Launched => {
                        info!("Save from engine {loaded} handed to an older engine");
                        Ok(LoadResult::NotLoaded(NotLoadedReason::HandedToLegacyRuntime))
                    }
                    LegacyResolution::Unresolvable => {
                        Err(SaveError::VersionIncompatible { loaded, running })
                    }
                };
            }
            Outcome::AcceptWithUpgradeWarning => {
                if self.upgrade_prompt.confirm(&loaded, &running) == PromptAnswer::Cancel {
                    info!("Load of save from newer engine {loaded} cancelled");
                    return Ok(LoadResult::NotLoaded(NotLoadedReason::UpgradeDeclined));
                }
            }
        }

        let snapshot = reader.read_snapshot()?;
        let entries = reader.read_delegates()?;
        reader.finish()?;

        let mut data = GameData::decode(&snapshot)
            .map_err(|e| SaveError::CorruptContainer(format!("snapshot: {e}")))?;
        let delegates = self.registry.reconstruct(&entries)?;
        let upgrades = self.upgrades.apply(&mut data, &loaded, &running);

        info!(
            "Loaded game '{}' (engine {}, round {}, {} delegates)",
            data.game_name,
            loaded,
            data.round,
            delegates.len()
        );
        Ok(LoadResult::Loaded(LoadedGame {
            version: loaded,
            state: GameState::new(data, delegates),
            upgrades,
        }))
    }

    /// Read and load a save file.
    pub fn load_file(&self, path: &Path) -> Result<LoadResult, SaveError> {
        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.load(&bytes, Some(path))
    }
}
