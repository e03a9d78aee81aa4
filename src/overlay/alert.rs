//! Stacked dismissible alerts in the top-right corner.

use gpui::App;

use super::{OverlayFamily, OverlayId, OverlayOptions};

pub fn show(options: impl Into<OverlayOptions>, cx: &mut App) -> Option<OverlayId> {
    super::show(OverlayFamily::Alert, options, cx)
}

pub fn close(id: OverlayId, cx: &mut App) {
    super::close(OverlayFamily::Alert, id, cx)
}

pub fn clear(cx: &mut App) {
    super::clear(OverlayFamily::Alert, cx)
}
