use gpui::{App, Window};

use crate::{
    components::{input, select},
    overlay::{OverlayConfig, OverlayRegistry},
    theme::ThemeExt,
};

/// Registers key bindings and installs the overlay registry with default timings.
pub fn init(cx: &mut App) {
    init_with_config(OverlayConfig::default(), cx);
}

/// Like [`init`], with custom overlay timings.
pub fn init_with_config(config: OverlayConfig, cx: &mut App) {
    input::init(cx);
    select::init(cx);
    OverlayRegistry::install(config, cx);

    tracing::debug!("gpui_mosaic initialized");
}

pub fn init_for_window(window: &mut Window, cx: &mut App) {
    window.set_rem_size(cx.get_theme().layout.text.base_size);
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use gpui::TestAppContext;

    use super::*;
    use crate::overlay::{OverlayFamily, toast};

    #[gpui::test]
    fn test_overlays_are_noops_before_init(cx: &mut TestAppContext) {
        cx.update(|cx| {
            assert!(toast::success("nobody is listening", cx).is_none());
            assert!(OverlayRegistry::get(OverlayFamily::Toast, cx).is_none());
        });
    }

    #[gpui::test]
    fn test_init_with_config_keeps_custom_timings(cx: &mut TestAppContext) {
        cx.update(|cx| {
            let config = OverlayConfig::from_json(r#"{ "exit_duration_ms": 90 }"#).unwrap();
            init_with_config(config, cx);

            assert!(OverlayRegistry::is_installed(cx));
            assert_eq!(OverlayRegistry::config(cx).unwrap().exit_duration_ms, 90);
            assert!(toast::success("hello", cx).is_some());
        });
    }
}
