use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::BridgeError;
use crate::widget::state::WidgetState;

/// File-backed key-value record holding the current `WidgetState`.
///
/// Writes replace the whole record, last writer wins. Reads never fail:
/// a missing or unreadable record resolves to the default state. There is
/// no locking; racing writers are an accepted condition.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn write(&self, state: &WidgetState) -> Result<(), BridgeError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Temp file + rename, so a racing reader never sees a torn record.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            path = %self.path.display(),
            title = state.title.as_str(),
            is_playing = state.is_playing,
            "state_store_written"
        );
        Ok(())
    }

    pub fn read(&self) -> WidgetState {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "state_store_empty");
                return WidgetState::default();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            debug!(path = %self.path.display(), error = %e, "state_store_unreadable");
            WidgetState::default()
        })
    }
}
