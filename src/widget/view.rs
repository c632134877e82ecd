use std::sync::Arc;

use image::RgbaImage;

use crate::bridge::action::WidgetAction;

/// Platform-provided media icons used when a named drawable is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinIcon {
    MediaPlay,
    MediaPause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Resource(String),
    Builtin(BuiltinIcon),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artwork {
    AppIcon,
    Bitmap(Arc<RgbaImage>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetElement {
    PlayPause,
    Next,
    Previous,
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Broadcast(WidgetAction),
    OpenApp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapTarget {
    pub element: WidgetElement,
    pub action: TapAction,
}

/// The visual description submitted to the widget host for one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub title: String,
    pub artist: String,
    pub playback_icon: IconSource,
    pub artwork: Artwork,
    pub tap_targets: Vec<TapTarget>,
}

impl WidgetView {
    pub fn tap_action(&self, element: WidgetElement) -> Option<TapAction> {
        self.tap_targets
            .iter()
            .find(|target| target.element == element)
            .map(|target| target.action)
    }
}
