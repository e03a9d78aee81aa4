//! Controlled/uncontrolled value resolution shared by every stateful component.
//!
//! A component is *controlled* when its owner passes a value on the first render and
//! keeps passing it; the component then only reports changes and renders whatever the
//! owner supplies. Otherwise it is *uncontrolled* and keeps its own value, seeded from
//! the default. The mode is fixed when the state is created.

use gpui::{App, ElementId, Entity, Window};

/// Callback invoked with the next value whenever a component requests a change.
pub type ChangeHandler<T> = Box<dyn Fn(&T, &mut Window, &mut App) + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Controlled,
    Uncontrolled,
}

#[derive(Debug, Clone)]
enum Source<T> {
    /// The owner's latest value.
    External(T),
    /// The component's own value.
    Internal(T),
}

/// The resolved value of a component plus the bookkeeping needed to keep its mode stable.
#[derive(Debug, Clone)]
pub struct Controlled<T> {
    source: Source<T>,
    mode_mismatch_reported: bool,
}

impl<T> Controlled<T> {
    /// Decides the mode from `value` and seeds the internal value from `default_value`.
    pub fn new(value: Option<T>, default_value: Option<T>) -> Self
    where
        T: Default,
    {
        let source = match value {
            Some(value) => Source::External(value),
            None => Source::Internal(default_value.unwrap_or_default()),
        };

        Self {
            source,
            mode_mismatch_reported: false,
        }
    }

    pub fn mode(&self) -> ControlMode {
        match self.source {
            Source::External(_) => ControlMode::Controlled,
            Source::Internal(_) => ControlMode::Uncontrolled,
        }
    }

    pub fn is_controlled(&self) -> bool {
        self.mode() == ControlMode::Controlled
    }

    /// The value to render.
    pub fn value(&self) -> &T {
        match &self.source {
            Source::External(value) | Source::Internal(value) => value,
        }
    }

    /// Feeds the owner's value for this render.
    ///
    /// Passing a value to an uncontrolled field, or dropping the value of a controlled
    /// one, logs a warning once and keeps the original mode.
    pub fn sync(&mut self, value: Option<T>) {
        match (&mut self.source, value) {
            (Source::External(current), Some(value)) => *current = value,
            (Source::Internal(_), None) => {}
            (Source::External(_), None) => {
                self.report_mode_mismatch("a controlled value was removed; keeping the last value")
            }
            (Source::Internal(_), Some(_)) => self.report_mode_mismatch(
                "a value was passed to an uncontrolled component; it is ignored",
            ),
        }
    }

    /// Applies a user-initiated change.
    ///
    /// Uncontrolled fields store `next` right away. `on_change` is called exactly once
    /// with `next` in both modes; a controlled owner is expected to pass it back in on
    /// the next render.
    pub fn request_change(&mut self, next: T, on_change: impl FnOnce(&T)) {
        match &mut self.source {
            Source::Internal(current) => {
                *current = next;
                on_change(current);
            }
            Source::External(_) => on_change(&next),
        }
    }

    fn report_mode_mismatch(&mut self, message: &str) {
        if self.mode_mismatch_reported {
            return;
        }
        self.mode_mismatch_reported = true;

        tracing::warn!(mode = ?self.mode(), "{message}");
    }
}

/// Creates (once) and syncs the controlled state stored under `id`.
pub fn use_controlled<T: Default + 'static>(
    id: impl Into<ElementId>,
    window: &mut Window,
    cx: &mut App,
    value: Option<T>,
    default_value: Option<T>,
) -> Entity<Controlled<T>>
where
    T: Clone,
{
    let initial_value = value.clone();
    let state = window.use_keyed_state(id, cx, move |_window, _cx| {
        Controlled::new(initial_value, default_value)
    });

    state.update(cx, |state, _cx| state.sync(value));
    state
}

/// Requests a change on `state`, re-renders it, then reports the change to the owner.
///
/// The owner callback runs after the state entity is released, so it may read the
/// component's state again.
pub fn commit_change<T: Clone + 'static>(
    state: &Entity<Controlled<T>>,
    next: T,
    on_change: Option<&ChangeHandler<T>>,
    window: &mut Window,
    cx: &mut App,
) {
    let mut changed = None;

    state.update(cx, |state, cx| {
        state.request_change(next, |value| changed = Some(value.clone()));
        cx.notify();
    });

    if let (Some(value), Some(on_change)) = (changed, on_change) {
        (on_change)(&value, window, cx);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn value_on_first_render_makes_it_controlled() {
        let field = Controlled::new(Some(3), Some(7));

        assert!(field.is_controlled());
        assert_eq!(*field.value(), 3);
    }

    #[test]
    fn controlled_always_renders_latest_owner_value() {
        let mut field = Controlled::new(Some(1), None);

        for next in [2, 5, 9, 4] {
            field.sync(Some(next));
            assert_eq!(*field.value(), next);
        }
    }

    #[test]
    fn controlled_request_change_does_not_store() {
        let mut field = Controlled::new(Some(String::from("a")), None);

        field.request_change(String::from("b"), |_| {});

        assert_eq!(field.value(), "a");
    }

    #[test]
    fn uncontrolled_starts_at_default_and_updates_locally() {
        let mut field = Controlled::new(None, Some(String::from("x")));
        assert_eq!(field.mode(), ControlMode::Uncontrolled);
        assert_eq!(field.value(), "x");

        field.request_change(String::from("y"), |_| {});

        assert_eq!(field.value(), "y");
    }

    #[test]
    fn uncontrolled_without_default_uses_type_default() {
        let field: Controlled<Vec<u8>> = Controlled::new(None, None);

        assert!(field.value().is_empty());
    }

    #[test]
    fn on_change_fires_once_in_both_modes() {
        for initial in [Some(false), None] {
            let calls = RefCell::new(Vec::new());
            let mut field = Controlled::new(initial, Some(false));

            field.request_change(true, |value| calls.borrow_mut().push(*value));

            assert_eq!(calls.into_inner(), vec![true]);
        }
    }

    #[traced_test]
    #[test]
    fn dropping_controlled_value_warns_and_keeps_mode() {
        let mut field = Controlled::new(Some(10), None);

        field.sync(None);
        field.sync(None);

        assert!(field.is_controlled());
        assert_eq!(*field.value(), 10);
        assert!(logs_contain("a controlled value was removed"));
        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|line| line.contains("a controlled value was removed"))
                .count()
            {
                1 => Ok(()),
                n => Err(format!("expected one warning, got {n}")),
            }
        });
    }

    #[traced_test]
    #[test]
    fn late_value_on_uncontrolled_is_ignored() {
        let mut field = Controlled::new(None, Some(1));

        field.sync(Some(42));

        assert!(!field.is_controlled());
        assert_eq!(*field.value(), 1);
        assert!(logs_contain("passed to an uncontrolled component"));
    }
}

#[cfg(all(test, feature = "test-support"))]
mod gpui_tests {
    use std::{cell::RefCell, rc::Rc};

    use gpui::{AppContext as _, TestAppContext};

    use super::*;

    #[gpui::test]
    fn test_commit_change_notifies_owner_once(cx: &mut TestAppContext) {
        let window = cx.add_empty_window();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let on_change: ChangeHandler<bool> = {
            let calls = calls.clone();
            Box::new(move |value, _window, _cx| calls.borrow_mut().push(*value))
        };

        let uncontrolled =
            window.update(|_window, cx| cx.new(|_cx| Controlled::new(None, Some(false))));
        let controlled =
            window.update(|_window, cx| cx.new(|_cx| Controlled::new(Some(false), None)));

        window.update(|window, cx| {
            commit_change(&uncontrolled, true, Some(&on_change), window, cx);
            commit_change(&controlled, true, Some(&on_change), window, cx);

            assert!(*uncontrolled.read(cx).value());
            assert!(!*controlled.read(cx).value());
        });

        assert_eq!(*calls.borrow(), vec![true, true]);
    }
}
