//! App-wide transient overlays: toasts, messages, alerts and the loading spinner.
//!
//! Each family gets one [`OverlayManager`] entity, created the first time something is
//! shown in it and kept for the rest of the app's life. [`crate::views::Root`] draws
//! every mounted manager above its content.
//!
//! An entry moves through [`OverlayPhase`]s in one direction only:
//! `Entering` for one frame, `Visible` until it is closed or its timer runs out,
//! `Leaving` while the exit animation plays, then `Removed`.

mod entry;
pub use entry::*;

mod queue;
pub use queue::*;

mod family;
pub use family::*;

mod manager;
pub use manager::*;

mod card;
pub use card::*;

mod registry;
pub use registry::*;

pub mod alert;
pub mod message;
pub mod spin;
pub mod toast;

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::time::Duration;

    use gpui::TestAppContext;

    use super::*;

    #[gpui::test]
    fn test_loading_toast_turns_into_success(cx: &mut TestAppContext) {
        let id = cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);
            toast::loading("Uploading", cx).unwrap()
        });
        cx.executor().advance_clock(Duration::from_secs(10));
        cx.run_until_parked();

        cx.update(|cx| {
            toast::update(
                id,
                OverlayPatch::default()
                    .kind(OverlayKind::Success)
                    .text("Uploaded")
                    .duration(Duration::from_millis(500)),
                cx,
            );

            let toasts = OverlayRegistry::get(OverlayFamily::Toast, cx).unwrap();
            let entry = toasts.read(cx).queue().get(id).unwrap().clone();
            assert_eq!(entry.phase, OverlayPhase::Visible);
            assert_eq!(entry.payload.text.as_deref(), Some("Uploaded"));
        });

        cx.executor().advance_clock(Duration::from_millis(700));
        cx.run_until_parked();

        cx.update(|cx| {
            let toasts = OverlayRegistry::get(OverlayFamily::Toast, cx).unwrap();
            assert!(toasts.read(cx).queue().is_empty());
        });
    }

    #[gpui::test]
    fn test_three_alerts_then_clear(cx: &mut TestAppContext) {
        cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);

            for text in ["one", "two", "three"] {
                alert::show(OverlayOptions::new(text).sticky(), cx);
            }

            let alerts = OverlayRegistry::get(OverlayFamily::Alert, cx).unwrap();
            assert_eq!(alerts.read(cx).queue().live_count(), 3);

            alert::clear(cx);
            assert_eq!(alerts.read(cx).queue().live_count(), 0);
        });
    }

    #[gpui::test]
    fn test_spin_is_always_loading(cx: &mut TestAppContext) {
        cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);

            let id = spin::show("Working", cx).unwrap();

            let spinner = OverlayRegistry::get(OverlayFamily::Spin, cx).unwrap();
            let entry = spinner.read(cx).queue().get(id).unwrap().clone();
            assert_eq!(entry.kind, OverlayKind::Loading);
            assert!(!entry.auto_dismisses());

            spin::close(id, cx);
            assert_eq!(spinner.read(cx).queue().live_count(), 0);
        });
    }

    #[gpui::test]
    fn test_message_helpers_set_kind(cx: &mut TestAppContext) {
        cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);

            let ids = [
                message::info("i", cx).unwrap(),
                message::success("s", cx).unwrap(),
                message::warning("w", cx).unwrap(),
                message::error("e", cx).unwrap(),
            ];

            let messages = OverlayRegistry::get(OverlayFamily::Message, cx).unwrap();
            let kinds: Vec<_> = ids
                .iter()
                .map(|id| messages.read(cx).queue().get(*id).unwrap().kind)
                .collect();
            assert_eq!(
                kinds,
                vec![
                    OverlayKind::Info,
                    OverlayKind::Success,
                    OverlayKind::Warning,
                    OverlayKind::Error
                ]
            );

            message::clear(cx);
            assert_eq!(messages.read(cx).queue().live_count(), 0);
        });
    }
}
