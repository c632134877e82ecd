use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use flume::Receiver;
use tracing::{debug, info, warn};

use crate::bridge::action::WidgetAction;
use crate::bridge::activity::BridgeActivity;
use crate::bridge::context::BridgeContext;
use crate::bridge::engine::EngineRegistry;
use crate::bridge::router::ActionRouter;
use crate::util::log::data_dir;
use crate::widget::artwork::{ArtworkResolver, HTTP_TIMEOUT, HttpFetcher, RESOLVE_TIMEOUT};
use crate::widget::host::InMemoryHost;
use crate::widget::renderer::WidgetRenderer;
use crate::widget::store::StateStore;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub artwork_resolve_timeout: Duration,
    pub http_timeout: Duration,
    pub state_path: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            artwork_resolve_timeout: RESOLVE_TIMEOUT,
            http_timeout: HTTP_TIMEOUT,
            state_path: data_dir().join("widget_state.json"),
        }
    }
}

/// Demo wiring: an in-memory widget host, the bridge subsystem, and a small
/// simulated application runtime on the far side of the channel.
pub struct App {
    ctx: Arc<BridgeContext>,
    host: Arc<InMemoryHost>,
}

impl App {
    pub async fn new() -> color_eyre::Result<Self> {
        let config = BridgeConfig::default();

        let host = Arc::new(InMemoryHost::new("Nowbar"));
        host.add_drawable("ic_play_arrow");
        host.add_drawable("ic_pause");
        host.place_widget(1);

        let fetcher = Arc::new(HttpFetcher::new(config.http_timeout));
        let renderer = WidgetRenderer::new(ArtworkResolver::new(
            fetcher,
            config.artwork_resolve_timeout,
        ));

        let ctx = Arc::new(BridgeContext {
            registry: EngineRegistry::new(),
            store: StateStore::new(config.state_path),
            renderer,
            host: host.clone(),
        });

        // Service cold-start requests coming back from the host.
        spawn_activity_launcher(ctx.clone(), host.launches());

        // The application process warms the engine eagerly at startup.
        if let Some(outbound_rx) = BridgeActivity::launch(&ctx, None) {
            spawn_app_runtime(ctx.clone(), outbound_rx);
        }

        Ok(Self { ctx, host })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        // Let the runtime's initial updateWidget land before tapping around.
        tokio::time::sleep(Duration::from_millis(100)).await;

        for action in [
            WidgetAction::TogglePlay,
            WidgetAction::Next,
            WidgetAction::Previous,
        ] {
            ActionRouter::on_broadcast(&self.ctx, action.broadcast_id());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        match self.host.view(1) {
            Some(view) => info!(
                title = view.title.as_str(),
                artist = view.artist.as_str(),
                "demo_final_view"
            ),
            None => warn!("demo_widget_never_rendered"),
        }

        Ok(())
    }
}

fn spawn_activity_launcher(ctx: Arc<BridgeContext>, launches: Receiver<Option<WidgetAction>>) {
    tokio::spawn(async move {
        while let Ok(pending) = launches.recv_async().await {
            if let Some(outbound_rx) = BridgeActivity::launch(&ctx, pending) {
                spawn_app_runtime(ctx.clone(), outbound_rx);
            }
        }
    });
}

/// Stand-in for the application runtime on the far side of the channel:
/// reacts to forwarded taps and pushes now-playing updates back.
fn spawn_app_runtime(ctx: Arc<BridgeContext>, actions: Receiver<WidgetAction>) {
    tokio::spawn(async move {
        let playlist = [
            ("Midnight Sun", "Aurora Fields"),
            ("Glass River", "Cobalt Waves"),
            ("Paper Planes", "Holly Grove"),
        ];
        let mut index = 0usize;
        let mut playing = true;

        push_now_playing(&ctx, playlist[index], playing).await;

        while let Ok(action) = actions.recv_async().await {
            match action {
                WidgetAction::TogglePlay => playing = !playing,
                WidgetAction::Next => index = (index + 1) % playlist.len(),
                WidgetAction::Previous => {
                    index = (index + playlist.len() - 1) % playlist.len();
                }
            }
            push_now_playing(&ctx, playlist[index], playing).await;
        }
    });
}

async fn push_now_playing(ctx: &BridgeContext, (title, artist): (&str, &str), playing: bool) {
    let Some(engine) = ctx.registry.get() else {
        return;
    };

    let args = serde_json::json!({
        "title": title,
        "artist": artist,
        "isPlaying": playing,
        "albumPath": null,
    });

    match engine.channel().call("updateWidget", args).await {
        Ok(reply) => debug!(?reply, "app_update_widget"),
        Err(e) => warn!(error = %e, "app_update_widget_failed"),
    }
}
