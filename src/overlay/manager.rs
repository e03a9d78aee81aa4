use std::{collections::HashMap, time::Duration};

use gpui::{
    Context, ElementId, InteractiveElement, IntoElement, ParentElement, Render, Styled, Task,
    Window, div, prelude::FluentBuilder,
};

use super::{
    OverlayCard, OverlayConfig, OverlayEntry, OverlayFamily, OverlayId, OverlayOptions,
    OverlayPatch, OverlayQueue,
};
use crate::{theme::ThemeExt, utils::rgb_a};

/// Time an entry spends in `Entering` so its first frame renders the start state.
///
/// This is one frame at 60 Hz, not a paint callback: overlays are shown from `App`
/// code that has no window to hook `on_next_frame` on.
pub const ENTER_FRAME: Duration = Duration::from_millis(16);

/// The mount point of one overlay family.
///
/// Owns the family's queue and its dismiss timers. It is the only thing that mutates
/// the queue; callers go through `show`, `close`, `clear` and `update`.
pub struct OverlayManager {
    family: OverlayFamily,
    config: OverlayConfig,
    queue: OverlayQueue,
    timers: HashMap<OverlayId, Task<()>>,
}

impl OverlayManager {
    pub fn new(family: OverlayFamily, config: OverlayConfig) -> Self {
        Self {
            family,
            config,
            queue: OverlayQueue::new(),
            timers: HashMap::new(),
        }
    }

    pub fn family(&self) -> OverlayFamily {
        self.family
    }

    pub fn queue(&self) -> &OverlayQueue {
        &self.queue
    }

    pub fn show(&mut self, options: OverlayOptions, cx: &mut Context<Self>) -> OverlayId {
        if let Some(capacity) = self.config.capacity(self.family) {
            let overflow = (self.queue.live_count() + 1).saturating_sub(capacity);

            for id in self.queue.live_ids().into_iter().take(overflow) {
                self.close(id, cx);
            }
        }

        let entry = OverlayEntry::new(options, self.config.family(self.family).duration());
        let id = self.queue.push(entry);

        tracing::debug!(family = self.family.name(), %id, "showing overlay");

        self.schedule_enter(id, cx);
        self.arm_dismiss_timer(id, cx);
        cx.notify();

        id
    }

    /// Starts the exit of `id`. Returns false when `id` is unknown or already leaving.
    pub fn close(&mut self, id: OverlayId, cx: &mut Context<Self>) -> bool {
        self.timers.remove(&id);

        if !self.queue.begin_leave(id) {
            return false;
        }

        tracing::debug!(family = self.family.name(), %id, "closing overlay");

        self.schedule_removal(id, cx);
        cx.notify();
        true
    }

    pub fn clear(&mut self, cx: &mut Context<Self>) {
        let ids = self.queue.begin_leave_all();
        if ids.is_empty() {
            return;
        }

        tracing::debug!(family = self.family.name(), count = ids.len(), "clearing overlays");

        for id in ids {
            self.timers.remove(&id);
            self.schedule_removal(id, cx);
        }
        cx.notify();
    }

    /// Patches a live entry in place. Setting a duration restarts its dismiss timer.
    pub fn update(&mut self, id: OverlayId, patch: OverlayPatch, cx: &mut Context<Self>) -> bool {
        let rearm = patch.duration.is_some();

        if self.queue.update(id, patch).is_none() {
            return false;
        }

        if rearm {
            self.arm_dismiss_timer(id, cx);
        }
        cx.notify();
        true
    }

    pub fn has_pending_timer(&self, id: OverlayId) -> bool {
        self.timers.contains_key(&id)
    }

    fn schedule_enter(&mut self, id: OverlayId, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            cx.background_executor().timer(ENTER_FRAME).await;

            let _ = this.update(cx, |this, cx| {
                if this.queue.mark_visible(id) {
                    cx.notify();
                }
            });
        })
        .detach();
    }

    fn arm_dismiss_timer(&mut self, id: OverlayId, cx: &mut Context<Self>) {
        // Replacing the task cancels the previous timer.
        self.timers.remove(&id);

        let Some(duration) = self
            .queue
            .get(id)
            .filter(|entry| entry.auto_dismisses())
            .map(|entry| entry.duration)
        else {
            return;
        };

        let task = cx.spawn(async move |this, cx| {
            cx.background_executor().timer(duration).await;

            let _ = this.update(cx, |this, cx| {
                // This task is the one running, so let it finish instead of dropping it.
                if let Some(task) = this.timers.remove(&id) {
                    task.detach();
                }
                this.close(id, cx);
            });
        });

        self.timers.insert(id, task);
    }

    fn schedule_removal(&mut self, id: OverlayId, cx: &mut Context<Self>) {
        let exit_duration = self.config.exit_duration();

        cx.spawn(async move |this, cx| {
            cx.background_executor().timer(exit_duration).await;

            let _ = this.update(cx, |this, cx| {
                if this.queue.finish_leave(id).is_some() {
                    tracing::debug!(family = this.family.name(), %id, "removed overlay");
                    cx.notify();
                }
            });
        })
        .detach();
    }
}

impl Render for OverlayManager {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let padding = cx.get_theme().layout.padding.xl;
        let gap = cx.get_theme().layout.padding.lg;
        let family = self.family;
        let exit_duration = self.config.exit_duration();
        let is_blocking = family == OverlayFamily::Spin && self.queue.live_count() > 0;

        div()
            .id(ElementId::Name(
                format!("mosaic-overlay-layer-{}", family.name()).into(),
            ))
            .absolute()
            .top_0()
            .left_0()
            .size_full()
            .flex()
            .flex_col()
            .gap(gap)
            .p(padding)
            .map(|this| match family {
                OverlayFamily::Toast | OverlayFamily::Spin => this.items_center().justify_center(),
                OverlayFamily::Message => this.items_center().justify_start(),
                OverlayFamily::Alert => this.items_end().justify_start(),
            })
            .when(is_blocking, |this| this.bg(rgb_a(0x000000, 0.25)).occlude())
            .children(
                self.queue
                    .iter()
                    .map(|entry| OverlayCard::new(family, entry.clone(), exit_duration)),
            )
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use gpui::{AppContext, Entity, TestAppContext};

    use super::*;
    use crate::overlay::{FamilyConfig, OverlayKind, OverlayPhase};

    const EXIT: Duration = Duration::from_millis(200);

    fn manager(
        cx: &mut TestAppContext,
        family: OverlayFamily,
        config: OverlayConfig,
    ) -> Entity<OverlayManager> {
        cx.new(|_cx| OverlayManager::new(family, config))
    }

    fn live_count(manager: &Entity<OverlayManager>, cx: &mut TestAppContext) -> usize {
        manager.read_with(cx, |manager, _| manager.queue().live_count())
    }

    fn phase(
        manager: &Entity<OverlayManager>,
        id: OverlayId,
        cx: &mut TestAppContext,
    ) -> Option<OverlayPhase> {
        manager.read_with(cx, |manager, _| manager.queue().phase(id))
    }

    #[gpui::test]
    fn test_entry_becomes_visible_after_one_frame(cx: &mut TestAppContext) {
        let toasts = manager(cx, OverlayFamily::Toast, OverlayConfig::default());

        let id = toasts.update(cx, |toasts, cx| {
            toasts.show(OverlayOptions::new("hi").sticky(), cx)
        });
        assert_eq!(phase(&toasts, id, cx), Some(OverlayPhase::Entering));

        cx.executor().advance_clock(ENTER_FRAME);
        cx.run_until_parked();

        assert_eq!(phase(&toasts, id, cx), Some(OverlayPhase::Visible));
    }

    #[gpui::test]
    fn test_alerts_stack_in_call_order_and_clear(cx: &mut TestAppContext) {
        let alerts = manager(cx, OverlayFamily::Alert, OverlayConfig::default());

        let ids = alerts.update(cx, |alerts, cx| {
            ["first", "second", "third"]
                .map(|text| alerts.show(OverlayOptions::new(text).sticky(), cx))
        });
        cx.executor().advance_clock(ENTER_FRAME);
        cx.run_until_parked();

        alerts.read_with(cx, |alerts, _| {
            assert_eq!(alerts.queue().live_ids(), ids.to_vec());
            let texts: Vec<_> = alerts
                .queue()
                .live()
                .filter_map(|entry| entry.payload.text.clone())
                .collect();
            assert_eq!(texts, vec!["first", "second", "third"]);
        });

        alerts.update(cx, |alerts, cx| alerts.clear(cx));
        assert_eq!(live_count(&alerts, cx), 0);

        cx.executor().advance_clock(EXIT);
        cx.run_until_parked();
        alerts.read_with(cx, |alerts, _| assert!(alerts.queue().is_empty()));
    }

    #[gpui::test]
    fn test_toast_auto_dismiss_timing(cx: &mut TestAppContext) {
        let toasts = manager(cx, OverlayFamily::Toast, OverlayConfig::default());

        let id = toasts.update(cx, |toasts, cx| {
            toasts.show(
                OverlayOptions::new("saved").duration(Duration::from_millis(1000)),
                cx,
            )
        });

        cx.executor().advance_clock(Duration::from_millis(500));
        cx.run_until_parked();
        assert_eq!(phase(&toasts, id, cx), Some(OverlayPhase::Visible));

        cx.executor().advance_clock(Duration::from_millis(500));
        cx.run_until_parked();
        assert_eq!(phase(&toasts, id, cx), Some(OverlayPhase::Leaving));
        assert_eq!(live_count(&toasts, cx), 0);

        cx.executor().advance_clock(EXIT);
        cx.run_until_parked();
        assert_eq!(phase(&toasts, id, cx), None);
    }

    #[gpui::test]
    fn test_second_toast_replaces_first(cx: &mut TestAppContext) {
        let toasts = manager(cx, OverlayFamily::Toast, OverlayConfig::default());

        let first = toasts.update(cx, |toasts, cx| toasts.show("first".into(), cx));
        cx.executor().advance_clock(ENTER_FRAME);
        cx.run_until_parked();
        let second = toasts.update(cx, |toasts, cx| toasts.show("second".into(), cx));

        toasts.read_with(cx, |toasts, _| {
            assert_eq!(toasts.queue().live_ids(), vec![second]);
            assert!(!toasts.has_pending_timer(first));
        });
    }

    #[gpui::test]
    fn test_close_is_idempotent(cx: &mut TestAppContext) {
        let messages = manager(cx, OverlayFamily::Message, OverlayConfig::default());

        let id = messages.update(cx, |messages, cx| messages.show("bye".into(), cx));

        let (first, second) = messages.update(cx, |messages, cx| {
            (messages.close(id, cx), messages.close(id, cx))
        });
        assert!(first);
        assert!(!second);
        messages.read_with(cx, |messages, _| assert!(!messages.has_pending_timer(id)));

        cx.executor().advance_clock(EXIT);
        cx.run_until_parked();

        let late = messages.update(cx, |messages, cx| messages.close(id, cx));
        assert!(!late);
        assert!(messages.read_with(cx, |messages, _| messages.queue().is_empty()));
    }

    #[gpui::test]
    fn test_close_after_auto_dismiss_is_noop(cx: &mut TestAppContext) {
        let messages = manager(cx, OverlayFamily::Message, OverlayConfig::default());

        let id = messages.update(cx, |messages, cx| {
            messages.show(
                OverlayOptions::new("quick").duration(Duration::from_millis(100)),
                cx,
            )
        });
        cx.executor().advance_clock(Duration::from_millis(100));
        cx.run_until_parked();

        assert!(!messages.update(cx, |messages, cx| messages.close(id, cx)));
    }

    #[gpui::test]
    fn test_manual_close_cancels_timer(cx: &mut TestAppContext) {
        let alerts = manager(cx, OverlayFamily::Alert, OverlayConfig::default());

        let id = alerts.update(cx, |alerts, cx| {
            alerts.show(
                OverlayOptions::new("later").duration(Duration::from_millis(300)),
                cx,
            )
        });
        assert!(alerts.read_with(cx, |alerts, _| alerts.has_pending_timer(id)));

        alerts.update(cx, |alerts, cx| alerts.close(id, cx));
        assert!(!alerts.read_with(cx, |alerts, _| alerts.has_pending_timer(id)));

        cx.executor().advance_clock(Duration::from_millis(1000));
        cx.run_until_parked();
        assert!(alerts.read_with(cx, |alerts, _| alerts.queue().is_empty()));
    }

    #[gpui::test]
    fn test_message_stack_is_capped(cx: &mut TestAppContext) {
        let config = OverlayConfig {
            message: FamilyConfig {
                duration_ms: 0,
                max_stack: Some(2),
            },
            ..Default::default()
        };
        let messages = manager(cx, OverlayFamily::Message, config);

        let ids = messages.update(cx, |messages, cx| {
            ["a", "b", "c"].map(|text| messages.show(text.into(), cx))
        });

        messages.read_with(cx, |messages, _| {
            assert_eq!(messages.queue().live_ids(), vec![ids[1], ids[2]]);
            assert_eq!(messages.queue().phase(ids[0]), Some(OverlayPhase::Leaving));
        });
    }

    #[gpui::test]
    fn test_update_keeps_phase_and_rearms(cx: &mut TestAppContext) {
        let toasts = manager(cx, OverlayFamily::Toast, OverlayConfig::default());

        let id = toasts.update(cx, |toasts, cx| {
            toasts.show(
                OverlayOptions::new("uploading")
                    .kind(OverlayKind::Loading)
                    .sticky(),
                cx,
            )
        });
        cx.executor().advance_clock(ENTER_FRAME);
        cx.run_until_parked();
        assert!(!toasts.read_with(cx, |toasts, _| toasts.has_pending_timer(id)));

        let updated = toasts.update(cx, |toasts, cx| {
            toasts.update(
                id,
                OverlayPatch::default()
                    .kind(OverlayKind::Success)
                    .text("uploaded")
                    .duration(Duration::from_millis(400)),
                cx,
            )
        });
        assert!(updated);

        toasts.read_with(cx, |toasts, _| {
            let entry = toasts.queue().get(id).unwrap();
            assert_eq!(entry.phase, OverlayPhase::Visible);
            assert_eq!(entry.kind, OverlayKind::Success);
            assert!(toasts.has_pending_timer(id));
        });

        cx.executor().advance_clock(Duration::from_millis(400));
        cx.run_until_parked();
        assert_eq!(live_count(&toasts, cx), 0);
    }

    #[gpui::test]
    fn test_update_unknown_id_is_noop(cx: &mut TestAppContext) {
        let spin = manager(cx, OverlayFamily::Spin, OverlayConfig::default());

        let updated = spin.update(cx, |spin, cx| {
            spin.update(OverlayId::next(), OverlayPatch::default().text("x"), cx)
        });

        assert!(!updated);
    }
}
