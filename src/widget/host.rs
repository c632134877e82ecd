use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use flume::{Receiver, Sender};

use crate::bridge::action::WidgetAction;
use crate::widget::view::WidgetView;

/// The OS widget surface: placement queries, resource lookups, pushing
/// rendered views and starting the bridge activity on the cold path.
pub trait WidgetHost: Send + Sync {
    fn app_name(&self) -> String;
    fn has_drawable(&self, name: &str) -> bool;
    /// All currently placed widget instance ids.
    fn widget_ids(&self) -> Vec<i32>;
    fn push_view(&self, widget_id: i32, view: WidgetView);
    fn start_bridge_activity(&self, pending: Option<WidgetAction>);
}

/// In-process host backing the demo binary and the test suite. Pushed views
/// are retained per instance; activity starts are delivered on a channel.
pub struct InMemoryHost {
    app_name: String,
    drawables: RwLock<HashSet<String>>,
    widgets: RwLock<BTreeMap<i32, Option<WidgetView>>>,
    launch_tx: Sender<Option<WidgetAction>>,
    launch_rx: Receiver<Option<WidgetAction>>,
}

impl InMemoryHost {
    pub fn new(app_name: impl Into<String>) -> Self {
        let (launch_tx, launch_rx) = flume::unbounded();
        Self {
            app_name: app_name.into(),
            drawables: RwLock::new(HashSet::new()),
            widgets: RwLock::new(BTreeMap::new()),
            launch_tx,
            launch_rx,
        }
    }

    pub fn add_drawable(&self, name: impl Into<String>) {
        self.drawables.write().unwrap().insert(name.into());
    }

    pub fn place_widget(&self, widget_id: i32) {
        self.widgets.write().unwrap().insert(widget_id, None);
    }

    pub fn view(&self, widget_id: i32) -> Option<WidgetView> {
        self.widgets
            .read()
            .unwrap()
            .get(&widget_id)
            .and_then(|slot| slot.clone())
    }

    /// Requested bridge-activity starts, in order, with their pending action.
    pub fn launches(&self) -> Receiver<Option<WidgetAction>> {
        self.launch_rx.clone()
    }
}

impl WidgetHost for InMemoryHost {
    fn app_name(&self) -> String {
        self.app_name.clone()
    }

    fn has_drawable(&self, name: &str) -> bool {
        self.drawables.read().unwrap().contains(name)
    }

    fn widget_ids(&self) -> Vec<i32> {
        self.widgets.read().unwrap().keys().copied().collect()
    }

    fn push_view(&self, widget_id: i32, view: WidgetView) {
        if let Some(slot) = self.widgets.write().unwrap().get_mut(&widget_id) {
            *slot = Some(view);
        }
    }

    fn start_bridge_activity(&self, pending: Option<WidgetAction>) {
        let _ = self.launch_tx.send(pending);
    }
}
