use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use flume::Receiver;
use tracing::{debug, info, warn};

use crate::bridge::action::WidgetAction;
use crate::bridge::channel::{BridgeHandler, BridgeReply, BridgeRequest};
use crate::bridge::context::BridgeContext;
use crate::bridge::engine::EngineHandle;
use crate::widget::state::WidgetState;

/// Native-side dispatch for calls arriving on the method channel.
pub struct ChannelHandler {
    ctx: Arc<BridgeContext>,
}

impl ChannelHandler {
    pub fn new(ctx: Arc<BridgeContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl BridgeHandler for ChannelHandler {
    async fn on_call(&self, request: BridgeRequest) -> BridgeReply {
        match request {
            BridgeRequest::TestConnection => {
                let epoch_ms = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis();
                BridgeReply::Connected { epoch_ms }
            }
            BridgeRequest::UpdateWidget {
                title,
                artist,
                is_playing,
                album_path,
            } => {
                let state = WidgetState {
                    title,
                    artist,
                    is_playing,
                    album_path,
                };
                if let Err(e) = self.ctx.store.write(&state) {
                    warn!(error = %e, "widget_state_write_failed");
                }
                self.ctx
                    .renderer
                    .refresh_all(&self.ctx.store, self.ctx.host.as_ref())
                    .await;
                BridgeReply::WidgetUpdated
            }
            // Legacy diagnostics only; playback control flows native → app.
            BridgeRequest::TogglePlay => BridgeReply::Acknowledged("togglePlay"),
            BridgeRequest::Next => BridgeReply::Acknowledged("next"),
            BridgeRequest::Prev => BridgeReply::Acknowledged("prev"),
        }
    }
}

/// The activity hosting the channel. Ensures an engine exists and is cached,
/// installs the channel handler, then forwards any pending widget action
/// carried by the start intent.
pub struct BridgeActivity;

impl BridgeActivity {
    /// Returns the outbound receiver when a new engine was created (the
    /// cold → warm transition, which happens at most once per process); the
    /// application runtime takes that end of the channel. A warm launch
    /// reuses the cached engine and returns nothing.
    pub fn launch(
        ctx: &Arc<BridgeContext>,
        pending: Option<WidgetAction>,
    ) -> Option<Receiver<WidgetAction>> {
        let (engine, outbound_rx) = match ctx.registry.get() {
            Some(engine) => {
                debug!("bridge_activity_engine_reused");
                (engine, None)
            }
            None => {
                let (handle, rx) = EngineHandle::create();
                let handle = Arc::new(handle);
                ctx.registry.set(handle.clone());
                info!(
                    channel = handle.channel().name(),
                    "bridge_activity_engine_created"
                );
                (handle, Some(rx))
            }
        };

        engine
            .channel()
            .set_handler(Arc::new(ChannelHandler::new(ctx.clone())));

        if let Some(action) = pending {
            info!(
                method = action.method_name(),
                "bridge_activity_pending_forwarded"
            );
            engine.channel().invoke(action);
        }

        outbound_rx
    }
}
