/// Broadcast identifiers registered for the widget tap targets.
pub const ACTION_TOGGLE_PLAY: &str = "dev.nowbar.ACTION_TOGGLE_PLAY";
pub const ACTION_NEXT: &str = "dev.nowbar.ACTION_NEXT";
pub const ACTION_PREV: &str = "dev.nowbar.ACTION_PREV";

/// A widget tap. Closed set, carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    TogglePlay,
    Next,
    Previous,
}

impl WidgetAction {
    pub fn broadcast_id(self) -> &'static str {
        match self {
            WidgetAction::TogglePlay => ACTION_TOGGLE_PLAY,
            WidgetAction::Next => ACTION_NEXT,
            WidgetAction::Previous => ACTION_PREV,
        }
    }

    pub fn from_broadcast_id(id: &str) -> Option<Self> {
        match id {
            ACTION_TOGGLE_PLAY => Some(WidgetAction::TogglePlay),
            ACTION_NEXT => Some(WidgetAction::Next),
            ACTION_PREV => Some(WidgetAction::Previous),
            _ => None,
        }
    }

    /// Method name used when forwarding the action over the channel.
    pub fn method_name(self) -> &'static str {
        match self {
            WidgetAction::TogglePlay => "togglePlay",
            WidgetAction::Next => "next",
            WidgetAction::Previous => "prev",
        }
    }
}
