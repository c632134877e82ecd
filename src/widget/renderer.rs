use tracing::{debug, info};

use crate::bridge::action::WidgetAction;
use crate::widget::artwork::ArtworkResolver;
use crate::widget::host::WidgetHost;
use crate::widget::state::WidgetState;
use crate::widget::store::StateStore;
use crate::widget::view::{
    BuiltinIcon, IconSource, TapAction, TapTarget, WidgetElement, WidgetView,
};

const ICON_PLAY: &str = "ic_play_arrow";
const ICON_PAUSE: &str = "ic_pause";
const NO_SONG_PLAYING: &str = "No song playing";

/// Turns the persisted record into a `WidgetView`. Rendering never fails:
/// every missing resource or artwork problem substitutes a default.
pub struct WidgetRenderer {
    artwork: ArtworkResolver,
}

impl WidgetRenderer {
    pub fn new(artwork: ArtworkResolver) -> Self {
        Self { artwork }
    }

    pub async fn render(&self, state: &WidgetState, host: &dyn WidgetHost) -> WidgetView {
        let title = if state.title.is_empty() {
            host.app_name()
        } else {
            state.title.clone()
        };
        let artist = if state.artist.is_empty() {
            NO_SONG_PLAYING.to_string()
        } else {
            state.artist.clone()
        };

        let playback_icon = if state.is_playing {
            resolve_icon(host, ICON_PAUSE, BuiltinIcon::MediaPause)
        } else {
            resolve_icon(host, ICON_PLAY, BuiltinIcon::MediaPlay)
        };

        let artwork = self.artwork.resolve(state.album_path.as_deref()).await;

        let tap_targets = vec![
            TapTarget {
                element: WidgetElement::PlayPause,
                action: TapAction::Broadcast(WidgetAction::TogglePlay),
            },
            TapTarget {
                element: WidgetElement::Next,
                action: TapAction::Broadcast(WidgetAction::Next),
            },
            TapTarget {
                element: WidgetElement::Previous,
                action: TapAction::Broadcast(WidgetAction::Previous),
            },
            TapTarget {
                element: WidgetElement::Root,
                action: TapAction::OpenApp,
            },
        ];

        WidgetView {
            title,
            artist,
            playback_icon,
            artwork,
            tap_targets,
        }
    }

    /// Reads the store once and pushes a fresh view to every placed instance.
    pub async fn refresh_all(&self, store: &StateStore, host: &dyn WidgetHost) {
        let ids = host.widget_ids();
        if ids.is_empty() {
            debug!("widget_refresh_no_instances");
            return;
        }

        let state = store.read();
        let view = self.render(&state, host).await;

        info!(
            count = ids.len(),
            title = view.title.as_str(),
            is_playing = state.is_playing,
            "widget_refresh"
        );
        for id in ids {
            host.push_view(id, view.clone());
        }
    }
}

fn resolve_icon(host: &dyn WidgetHost, name: &str, fallback: BuiltinIcon) -> IconSource {
    if host.has_drawable(name) {
        IconSource::Resource(name.to_string())
    } else {
        IconSource::Builtin(fallback)
    }
}
