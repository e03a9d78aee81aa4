//! Stacked one-line notices, newest at the bottom.

use gpui::{App, SharedString};

use super::{OverlayFamily, OverlayId, OverlayKind, OverlayOptions};

pub fn show(options: impl Into<OverlayOptions>, cx: &mut App) -> Option<OverlayId> {
    super::show(OverlayFamily::Message, options, cx)
}

pub fn info(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(OverlayOptions::new(text).kind(OverlayKind::Info), cx)
}

pub fn success(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(OverlayOptions::new(text).kind(OverlayKind::Success), cx)
}

pub fn warning(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(OverlayOptions::new(text).kind(OverlayKind::Warning), cx)
}

pub fn error(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(OverlayOptions::new(text).kind(OverlayKind::Error), cx)
}

pub fn close(id: OverlayId, cx: &mut App) {
    super::close(OverlayFamily::Message, id, cx)
}

pub fn clear(cx: &mut App) {
    super::clear(OverlayFamily::Message, cx)
}
