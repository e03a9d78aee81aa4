use std::time::Duration;

use gpui::Context;

const BLINK_INTERVAL: Duration = Duration::from_millis(530);

/// Blinking text cursor. Each restart bumps the epoch so older blink tasks stop.
pub struct CursorBlink {
    visible: bool,
    epoch: usize,
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorBlink {
    pub fn new() -> Self {
        Self {
            visible: true,
            epoch: 0,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Shows the cursor and restarts the blink cycle, e.g. after an edit.
    pub fn restart(&mut self, cx: &mut Context<Self>) {
        self.visible = true;
        self.epoch = self.epoch.wrapping_add(1);
        self.schedule_blink(self.epoch, cx);
        cx.notify();
    }

    pub fn stop(&mut self, cx: &mut Context<Self>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.visible = true;
        cx.notify();
    }

    fn schedule_blink(&mut self, epoch: usize, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            cx.background_executor().timer(BLINK_INTERVAL).await;
            if let Some(this) = this.upgrade() {
                this.update(cx, |blink, cx| blink.blink(epoch, cx));
            }
        })
        .detach();
    }

    fn blink(&mut self, epoch: usize, cx: &mut Context<Self>) {
        if epoch != self.epoch {
            return;
        }
        self.visible = !self.visible;
        cx.notify();
        self.schedule_blink(epoch, cx);
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use gpui::{AppContext, TestAppContext};

    use super::*;

    #[gpui::test]
    fn test_blinks_and_stops(cx: &mut TestAppContext) {
        let blink = cx.new(|_cx| CursorBlink::new());

        blink.update(cx, |blink, cx| blink.restart(cx));
        cx.executor().advance_clock(BLINK_INTERVAL);
        cx.run_until_parked();
        assert!(!blink.read_with(cx, |blink, _| blink.visible()));

        blink.update(cx, |blink, cx| blink.stop(cx));
        cx.executor().advance_clock(BLINK_INTERVAL * 3);
        cx.run_until_parked();
        assert!(blink.read_with(cx, |blink, _| blink.visible()));
    }
}
