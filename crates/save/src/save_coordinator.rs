// ---------------------------------------------------------------------------
// SaveCoordinator: serializes file saves and cleans up interrupted writes
// ---------------------------------------------------------------------------

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use simulation::SharedGameState;
use tracing::{info, warn};

use crate::save_error::SaveError;
use crate::save_load::{LoadResult, SaveLoadManager};

/// Wraps a [`SaveLoadManager`] so that at most one file operation runs at a
/// time. Two saves never race on the same `.tmp` file.
pub struct SaveCoordinator {
    manager: SaveLoadManager,
    file_lock: Mutex<()>,
}

impl SaveCoordinator {
    pub fn new(manager: SaveLoadManager) -> Self {
        Self {
            manager,
            file_lock: Mutex::new(()),
        }
    }

    pub fn manager(&self) -> &SaveLoadManager {
        &self.manager
    }

    /// True while another thread is saving or loading through this
    /// coordinator.
    pub fn is_busy(&self) -> bool {
        self.file_lock.is_locked()
    }

    pub fn save_to_file(&self, state: &SharedGameState, path: &Path) -> Result<usize, SaveError> {
        let _guard = self.file_lock.lock();
        self.manager.save_to_file(state, path)
    }

    pub fn load_file(&self, path: &Path) -> Result<LoadResult, SaveError> {
        let _guard = self.file_lock.lock();
        self.manager.load_file(path)
    }

    /// Remove `.tmp` files left in `dir` by writes that never reached their
    /// rename. Returns the number of files removed.
    pub fn clean_stale_tmp(&self, dir: &Path) -> std::io::Result<usize> {
        let _guard = self.file_lock.lock();
        let mut cleaned = 0;
        for path in find_tmp_files(dir)? {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("Cleaned up stale tmp file: {}", path.display());
                    cleaned += 1;
                }
                Err(e) => warn!("Failed to remove tmp file {}: {}", path.display(), e),
            }
        }
        Ok(cleaned)
    }
}

fn find_tmp_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut tmp_files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "tmp") {
            tmp_files.push(path);
        }
    }
    tmp_files.sort();
    Ok(tmp_files)
}
