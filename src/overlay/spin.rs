//! A blocking loading indicator over the whole window.

use gpui::App;

use super::{OverlayFamily, OverlayId, OverlayKind, OverlayOptions, OverlayPatch};

/// Shows the spinner. Unless `options` sets a duration it stays until closed.
pub fn show(options: impl Into<OverlayOptions>, cx: &mut App) -> Option<OverlayId> {
    let options = options.into().kind(OverlayKind::Loading);
    super::show(OverlayFamily::Spin, options, cx)
}

pub fn update(id: OverlayId, patch: OverlayPatch, cx: &mut App) {
    super::update(OverlayFamily::Spin, id, patch, cx)
}

pub fn close(id: OverlayId, cx: &mut App) {
    super::close(OverlayFamily::Spin, id, cx)
}
