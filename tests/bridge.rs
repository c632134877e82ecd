use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::{Value, json};

use nowbar::bridge::action::WidgetAction;
use nowbar::bridge::activity::BridgeActivity;
use nowbar::bridge::channel::BridgeReply;
use nowbar::bridge::context::BridgeContext;
use nowbar::bridge::engine::{EngineHandle, EngineRegistry};
use nowbar::bridge::router::ActionRouter;
use nowbar::error::BridgeError;
use nowbar::widget::artwork::{ArtworkFetcher, ArtworkResolver};
use nowbar::widget::host::InMemoryHost;
use nowbar::widget::renderer::WidgetRenderer;
use nowbar::widget::state::WidgetState;
use nowbar::widget::store::StateStore;
use nowbar::widget::view::{Artwork, BuiltinIcon, IconSource};

struct FailingFetcher;

#[async_trait]
impl ArtworkFetcher for FailingFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, BridgeError> {
        Err(BridgeError::Fetch("connection refused".into()))
    }
}

fn temp_store(name: &str) -> StateStore {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    StateStore::new(std::env::temp_dir().join(format!(
        "nowbar-bridge-{}-{nanos}-{name}.json",
        std::process::id()
    )))
}

fn test_ctx(name: &str, host: Arc<InMemoryHost>) -> Arc<BridgeContext> {
    Arc::new(BridgeContext {
        registry: EngineRegistry::new(),
        store: temp_store(name),
        renderer: WidgetRenderer::new(ArtworkResolver::new(
            Arc::new(FailingFetcher),
            Duration::from_millis(200),
        )),
        host,
    })
}

#[tokio::test]
async fn warm_tap_forwards_without_starting_an_activity() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    host.place_widget(1);
    let ctx = test_ctx("warm", host.clone());

    let outbound = BridgeActivity::launch(&ctx, None).expect("first launch creates the engine");

    ActionRouter::on_action(&ctx, WidgetAction::Next);

    assert_eq!(outbound.try_recv().ok(), Some(WidgetAction::Next));
    assert!(outbound.try_recv().is_err(), "exactly one call forwarded");
    assert!(host.launches().try_recv().is_err(), "no activity started");
}

#[tokio::test]
async fn cold_tap_starts_activity_which_forwards_the_pending_action() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    host.place_widget(1);
    let ctx = test_ctx("cold", host.clone());

    // Nothing cached yet: the tap must go through the activity.
    ActionRouter::on_action(&ctx, WidgetAction::Next);
    assert!(ctx.registry.get().is_none());
    assert_eq!(host.launches().try_recv().ok(), Some(Some(WidgetAction::Next)));

    // The activity starts, caches the engine and forwards the pending tap.
    let outbound =
        BridgeActivity::launch(&ctx, Some(WidgetAction::Next)).expect("engine created once");
    assert!(ctx.registry.get().is_some());
    assert_eq!(outbound.try_recv().ok(), Some(WidgetAction::Next));
    assert!(outbound.try_recv().is_err());

    // Warm from here on: taps forward directly, no further activity starts.
    ActionRouter::on_action(&ctx, WidgetAction::TogglePlay);
    assert_eq!(outbound.try_recv().ok(), Some(WidgetAction::TogglePlay));
    assert!(host.launches().try_recv().is_err());
}

#[tokio::test]
async fn relaunching_the_activity_reuses_the_cached_engine() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    let ctx = test_ctx("relaunch", host);

    let first = BridgeActivity::launch(&ctx, None);
    assert!(first.is_some());

    let second = BridgeActivity::launch(&ctx, Some(WidgetAction::Previous));
    assert!(second.is_none(), "warm launch must not create a new engine");

    let outbound = first.unwrap();
    assert_eq!(outbound.try_recv().ok(), Some(WidgetAction::Previous));
}

#[tokio::test]
async fn update_widget_writes_the_store_and_refreshes_every_instance() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    host.place_widget(1);
    host.place_widget(2);
    let ctx = test_ctx("update", host.clone());
    BridgeActivity::launch(&ctx, None);

    let engine = ctx.registry.get().unwrap();
    let reply = engine
        .channel()
        .call(
            "updateWidget",
            json!({
                "title": "Song A",
                "artist": "Artist B",
                "isPlaying": true,
                "albumPath": null,
            }),
        )
        .await
        .unwrap();
    assert_eq!(reply, BridgeReply::WidgetUpdated);

    assert_eq!(
        ctx.store.read(),
        WidgetState {
            title: "Song A".into(),
            artist: "Artist B".into(),
            is_playing: true,
            album_path: None,
        }
    );

    for id in [1, 2] {
        let view = host.view(id).expect("every instance refreshed");
        assert_eq!(view.title, "Song A");
        assert_eq!(view.artist, "Artist B");
        assert_eq!(
            view.playback_icon,
            IconSource::Builtin(BuiltinIcon::MediaPause)
        );
        assert_eq!(view.artwork, Artwork::AppIcon);
    }
}

#[tokio::test]
async fn update_widget_with_empty_fields_renders_defaults() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    host.place_widget(1);
    let ctx = test_ctx("defaults", host.clone());
    BridgeActivity::launch(&ctx, None);

    let engine = ctx.registry.get().unwrap();
    engine
        .channel()
        .call(
            "updateWidget",
            json!({ "title": "", "artist": "", "isPlaying": false, "albumPath": null }),
        )
        .await
        .unwrap();

    let view = host.view(1).unwrap();
    assert_eq!(view.title, "Nowbar");
    assert_eq!(view.artist, "No song playing");
    assert_eq!(
        view.playback_icon,
        IconSource::Builtin(BuiltinIcon::MediaPlay)
    );
}

#[tokio::test]
async fn test_connection_replies_with_a_liveness_token() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    let ctx = test_ctx("liveness", host);
    BridgeActivity::launch(&ctx, None);

    let engine = ctx.registry.get().unwrap();
    let reply = engine
        .channel()
        .call("testConnection", Value::Null)
        .await
        .unwrap();
    assert!(matches!(reply, BridgeReply::Connected { epoch_ms } if epoch_ms > 0));
}

#[tokio::test]
async fn legacy_playback_methods_are_acknowledged_only() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    host.place_widget(1);
    let ctx = test_ctx("legacy", host.clone());
    BridgeActivity::launch(&ctx, None);

    let engine = ctx.registry.get().unwrap();
    for method in ["togglePlay", "next", "prev"] {
        let reply = engine.channel().call(method, Value::Null).await.unwrap();
        assert_eq!(reply, BridgeReply::Acknowledged(method));
    }
    // Acknowledgment must not touch the widget surface.
    assert!(host.view(1).is_none());
}

#[tokio::test]
async fn unknown_methods_reply_not_implemented() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    let ctx = test_ctx("unknown", host);
    BridgeActivity::launch(&ctx, None);

    let engine = ctx.registry.get().unwrap();
    let reply = engine
        .channel()
        .call("definitelyNotAMethod", Value::Null)
        .await
        .unwrap();
    assert_eq!(reply, BridgeReply::NotImplemented);
}

#[tokio::test]
async fn calling_before_a_handler_is_installed_is_an_error() {
    let (engine, _outbound) = EngineHandle::create();
    let result = engine.channel().call("testConnection", Value::Null).await;
    assert!(matches!(result, Err(BridgeError::NoHandler(_))));
}

#[tokio::test]
async fn unknown_broadcasts_are_ignored() {
    let host = Arc::new(InMemoryHost::new("Nowbar"));
    let ctx = test_ctx("broadcast", host.clone());

    ActionRouter::on_broadcast(&ctx, "some.other.package.ACTION");
    assert!(host.launches().try_recv().is_err());

    ActionRouter::on_broadcast(&ctx, nowbar::bridge::action::ACTION_PREV);
    assert_eq!(
        host.launches().try_recv().ok(),
        Some(Some(WidgetAction::Previous))
    );
}
