pub mod delegate;
pub mod delegates;
pub mod game_data;
pub mod game_state;
pub mod version;

pub use delegate::{
    decode_state, Delegate, DelegateIdentity, DelegateList, DelegateStateError, DelegateType,
};
pub use game_data::{GameData, PlayerData, TerritoryData};
pub use game_state::{GameState, SharedGameState};
pub use version::{ParseVersionError, Version, ENGINE_VERSION};
