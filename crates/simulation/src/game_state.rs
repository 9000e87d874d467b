// ---------------------------------------------------------------------------
// GameState: world data + live delegates behind a read/write lock
// ---------------------------------------------------------------------------

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::delegate::DelegateList;
use crate::game_data::GameData;

/// The live simulation: serializable world data plus its delegates.
#[derive(Debug, Default)]
pub struct GameState {
    pub data: GameData,
    pub delegates: DelegateList,
}

impl GameState {
    pub fn new(data: GameData, delegates: DelegateList) -> Self {
        Self { data, delegates }
    }
}

/// Shared handle to a [`GameState`].
///
/// Readers (saves, UI queries) take the read lock; simulation steps take the
/// write lock. Guards release the lock when dropped.
#[derive(Debug, Clone, Default)]
pub struct SharedGameState(Arc<RwLock<GameState>>);

impl SharedGameState {
    pub fn new(state: GameState) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    pub fn acquire_read_lock(&self) -> RwLockReadGuard<'_, GameState> {
        self.0.read()
    }

    pub fn acquire_write_lock(&self) -> RwLockWriteGuard<'_, GameState> {
        self.0.write()
    }

    /// Non-blocking write attempt; `None` while any reader holds the lock.
    pub fn try_acquire_write_lock(&self) -> Option<RwLockWriteGuard<'_, GameState>> {
        self.0.try_write()
    }
}

impl From<GameState> for SharedGameState {
    fn from(state: GameState) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_blocked_while_reader_holds_lock() {
        let shared = SharedGameState::new(GameState::new(GameData::new("t"), DelegateList::new()));
        let guard = shared.acquire_read_lock();
        assert!(shared.try_acquire_write_lock().is_none());
        drop(guard);
        let mut w = shared.try_acquire_write_lock().expect("lock should be free");
        w.data.round = 7;
        drop(w);
        assert_eq!(shared.acquire_read_lock().data.round, 7);
    }
}
