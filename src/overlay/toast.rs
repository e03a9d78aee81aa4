//! Single-slot notifications. Showing a toast replaces the current one.

use gpui::{App, SharedString};

use super::{OverlayFamily, OverlayId, OverlayKind, OverlayOptions, OverlayPatch};

pub fn show(options: impl Into<OverlayOptions>, cx: &mut App) -> Option<OverlayId> {
    super::show(OverlayFamily::Toast, options, cx)
}

pub fn success(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(OverlayOptions::new(text).kind(OverlayKind::Success), cx)
}

pub fn error(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(OverlayOptions::new(text).kind(OverlayKind::Error), cx)
}

/// Shows a toast that stays until it is updated or closed.
pub fn loading(text: impl Into<SharedString>, cx: &mut App) -> Option<OverlayId> {
    show(
        OverlayOptions::new(text).kind(OverlayKind::Loading).sticky(),
        cx,
    )
}

pub fn update(id: OverlayId, patch: OverlayPatch, cx: &mut App) {
    super::update(OverlayFamily::Toast, id, patch, cx)
}

pub fn close(id: OverlayId, cx: &mut App) {
    super::close(OverlayFamily::Toast, id, cx)
}

pub fn clear(cx: &mut App) {
    super::clear(OverlayFamily::Toast, cx)
}
