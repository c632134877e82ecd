use tracing::{debug, info};

use crate::bridge::action::WidgetAction;
use crate::bridge::context::BridgeContext;

/// Receives widget-tap broadcasts and routes them into the application.
///
/// Warm path: an engine is cached, forward the call on its channel and stay
/// in the background. Cold path: ask the host to start the bridge activity
/// with the action attached; the activity creates and caches the engine and
/// forwards the pending action once the channel handler is installed.
pub struct ActionRouter;

impl ActionRouter {
    /// Entry point for the OS broadcast delivery. Unknown identifiers are
    /// ignored.
    pub fn on_broadcast(ctx: &BridgeContext, action_id: &str) {
        match WidgetAction::from_broadcast_id(action_id) {
            Some(action) => Self::on_action(ctx, action),
            None => debug!(action_id, "router_unknown_broadcast"),
        }
    }

    pub fn on_action(ctx: &BridgeContext, action: WidgetAction) {
        match ctx.registry.get() {
            Some(engine) => {
                info!(method = action.method_name(), "router_forward_warm");
                // Fire and forget; a stale engine is logged by the channel.
                engine.channel().invoke(action);
            }
            None => {
                info!(method = action.method_name(), "router_cold_start");
                ctx.host.start_bridge_activity(Some(action));
            }
        }
    }
}
