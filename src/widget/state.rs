use serde::{Deserialize, Serialize};

/// The persisted now-playing record. Every field defaults on a missing key,
/// so reading a partial or absent record never fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetState {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, rename = "isPlaying")]
    pub is_playing: bool,
    #[serde(default, rename = "albumPath")]
    pub album_path: Option<String>,
}
