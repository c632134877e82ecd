use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use flume::{Receiver, Sender};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bridge::action::WidgetAction;
use crate::error::BridgeError;

/// The single named channel carrying all native ↔ app calls. One constant:
/// there is no per-build-flavor override surface.
pub const CHANNEL_NAME: &str = "dev.nowbar/widget";

/// App → native calls, decoded from the wire's string method dispatch into
/// a closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeRequest {
    TestConnection,
    UpdateWidget {
        title: String,
        artist: String,
        is_playing: bool,
        album_path: Option<String>,
    },
    TogglePlay,
    Next,
    Prev,
}

impl BridgeRequest {
    /// Decodes a wire call. `None` means the method is not part of the
    /// contract and gets the typed `NotImplemented` reply.
    pub fn from_wire(method: &str, args: &Value) -> Option<Self> {
        match method {
            "testConnection" => Some(BridgeRequest::TestConnection),
            "updateWidget" => Some(BridgeRequest::UpdateWidget {
                title: args
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                artist: args
                    .get("artist")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                is_playing: args
                    .get("isPlaying")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                album_path: args
                    .get("albumPath")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            "togglePlay" => Some(BridgeRequest::TogglePlay),
            "next" => Some(BridgeRequest::Next),
            "prev" => Some(BridgeRequest::Prev),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeReply {
    Connected { epoch_ms: u128 },
    WidgetUpdated,
    Acknowledged(&'static str),
    NotImplemented,
}

#[async_trait]
pub trait BridgeHandler: Send + Sync {
    async fn on_call(&self, request: BridgeRequest) -> BridgeReply;
}

/// One bidirectional method channel over the engine's messaging transport.
///
/// The native side installs a handler for incoming calls; outgoing calls to
/// the app side are one-way, best-effort notifications with no reply.
pub struct MethodChannel {
    name: &'static str,
    handler: RwLock<Option<Arc<dyn BridgeHandler>>>,
    outbound_tx: Sender<WidgetAction>,
}

impl MethodChannel {
    pub fn new(name: &'static str) -> (Self, Receiver<WidgetAction>) {
        let (outbound_tx, outbound_rx) = flume::unbounded();
        (
            Self {
                name,
                handler: RwLock::new(None),
                outbound_tx,
            },
            outbound_rx,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn set_handler(&self, handler: Arc<dyn BridgeHandler>) {
        *self.handler.write().unwrap() = Some(handler);
        debug!(channel = self.name, "channel_handler_installed");
    }

    pub fn has_handler(&self) -> bool {
        self.handler.read().unwrap().is_some()
    }

    /// App → native. String method dispatch at the wire, decoded into the
    /// closed request set; an unknown method replies `NotImplemented`.
    pub async fn call(&self, method: &str, args: Value) -> Result<BridgeReply, BridgeError> {
        let handler = self
            .handler
            .read()
            .unwrap()
            .clone()
            .ok_or(BridgeError::NoHandler(self.name))?;

        let Some(request) = BridgeRequest::from_wire(method, &args) else {
            warn!(channel = self.name, method, "channel_method_not_implemented");
            return Ok(BridgeReply::NotImplemented);
        };

        debug!(channel = self.name, method, "channel_call");
        Ok(handler.on_call(request).await)
    }

    /// Native → app. Fire and forget: delivery is best-effort and callers
    /// must not depend on a response. A dropped peer is logged, nothing more.
    pub fn invoke(&self, action: WidgetAction) {
        match self.outbound_tx.send(action) {
            Ok(()) => {
                info!(
                    channel = self.name,
                    method = action.method_name(),
                    "channel_invoke"
                );
            }
            Err(e) => {
                warn!(
                    channel = self.name,
                    method = action.method_name(),
                    error = %e,
                    "channel_invoke_dropped"
                );
            }
        }
    }
}
