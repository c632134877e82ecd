use std::sync::Arc;

use crate::bridge::engine::EngineRegistry;
use crate::widget::host::WidgetHost;
use crate::widget::renderer::WidgetRenderer;
use crate::widget::store::StateStore;

/// Shared services threaded explicitly through the router, the bridge
/// activity and the channel handler. No ambient globals.
pub struct BridgeContext {
    pub registry: EngineRegistry,
    pub store: StateStore,
    pub renderer: WidgetRenderer,
    pub host: Arc<dyn WidgetHost>,
}
