use std::sync::Arc;

use arc_swap::ArcSwapOption;
use flume::Receiver;

use crate::bridge::action::WidgetAction;
use crate::bridge::channel::{CHANNEL_NAME, MethodChannel};

/// A live engine reference. The engine's lifetime belongs to the application
/// runtime; this handle only exposes its method channel for forwarding.
pub struct EngineHandle {
    channel: Arc<MethodChannel>,
}

impl EngineHandle {
    /// Creates an engine endpoint. The returned receiver is the application
    /// runtime's end of the outbound (native → app) call stream.
    pub fn create() -> (Self, Receiver<WidgetAction>) {
        let (channel, outbound_rx) = MethodChannel::new(CHANNEL_NAME);
        (
            Self {
                channel: Arc::new(channel),
            },
            outbound_rx,
        )
    }

    pub fn channel(&self) -> &Arc<MethodChannel> {
        &self.channel
    }
}

/// Single-slot registry for the process-wide engine. The slot may be empty;
/// callers decide between the warm and cold paths by asking `get`.
#[derive(Default)]
pub struct EngineRegistry {
    slot: ArcSwapOption<EngineHandle>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<EngineHandle>> {
        self.slot.load_full()
    }

    pub fn set(&self, handle: Arc<EngineHandle>) {
        self.slot.store(Some(handle));
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }
}
