pub mod atomic_write;
pub mod collaborators;
pub mod compatibility;
pub mod container_codec;
pub mod data_upgrade;
pub mod delegate_registry;
pub mod file_header;
mod frame_io;
pub mod save_config;
pub mod save_coordinator;
pub mod save_error;
pub mod save_load;


pub use collaborators::{
    AutoCancel, AutoProceed, LegacyResolution, LegacyRuntimeResolver, LogNotifier,
    NoLegacyRuntime, PromptAnswer, UnattendedNotifier, UpgradePrompt,
};
pub use compatibility::Outcome;
pub use container_codec::{Container, ContainerReader, DelegateState};
pub use data_upgrade::{DataUpgrade, DataUpgradeRegistry, UpgradeReport};
pub use delegate_registry::DelegateRegistry;
pub use save_config::SaveConfig;
pub use save_coordinator::SaveCoordinator;
pub use save_error::SaveError;
pub use save_load::{LoadResult, LoadedGame, NotLoadedReason, SaveLoadManager};
