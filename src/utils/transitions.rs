use std::time::Duration;

use gpui::{App, ElementId, Window, ease_out_quint};
use gpui_transitions::{Transition, WindowUseTransition};

use crate::ElementIdExt;

/// Keyed transition whose goal is picked from a list of conditions, the first true one
/// winning:
///
/// ```ignore
/// conditional_transition!(id, window, cx, Duration::from_millis(365), {
///     is_focus => accent,
///     is_hover => hover,
///     _ => idle
/// })
/// ```
#[macro_export]
macro_rules! conditional_transition {
    (
        $id:expr, $window:expr, $cx:expr, $duration:expr, $($rest:tt)+
    ) => {{
        use gpui_transitions::WindowUseTransition;

        let value = $crate::conditional_transition_branches!(@condition [ $($rest)+ ]);

        let transition = $window
            .use_keyed_transition($id, $cx, $duration, |_window, _cx| value)
            .with_easing(gpui::ease_out_quint());

        let value = value.into();

        if transition.read_goal($cx) != &value {
            transition.update($cx, |this, _cx| *this = value);
            $cx.notify(transition.entity_id());
        }

        transition
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! conditional_transition_branches {
    (@branch_list [ _ => $value:expr, $($rest:tt)+ ]) => {{
        compile_error!("`_ => value` is only allowed on the last branch.");
    }};

    (@condition [ { $cond:expr => $value:expr, $($rest:tt)+ } ]) => {{
        if $cond {
            $value
        } else {
            $crate::conditional_transition_branches!(@branch_list [ $($rest)+ ])
        }
    }};

    (@branch_list [ $cond:expr => $value:expr, $($rest:tt)+ ]) => {{
        if $cond {
            $value
        } else {
            $crate::conditional_transition_branches!(@branch_list [ $($rest)+ ])
        }
    }};

    (@branch_list [ _ => $value:expr ]) => {{
        $value
    }};

    (@branch_list [ $cond:expr => $value:expr ]) => {{
        compile_error!("The last branch must be `_ => value`");
    }};

    (@condition [ $($rest:tt)+ ]) => {{
        $($rest)+
    }};
}

/// Fades disabled components.
pub fn disabled_transition(
    base_id: impl Into<ElementId>,
    window: &mut Window,
    cx: &mut App,
    is_disabled: bool,
) -> Transition<f32> {
    conditional_transition!(
        base_id.into().with_suffix("state:transition:disabled"),
        window,
        cx,
        Duration::from_millis(365),
        {
            is_disabled => 0.45,
            _ => 1.
        }
    )
}

/// 0 → 1 as `is_on` becomes true. Shared by checkboxes, radios and switches.
pub fn toggle_transition(
    base_id: impl Into<ElementId>,
    window: &mut Window,
    cx: &mut App,
    duration: Duration,
    is_on: bool,
) -> Transition<f32> {
    let goal = is_on as u8 as f32;

    let transition = window
        .use_keyed_transition(
            base_id.into().with_suffix("state:toggle"),
            cx,
            duration,
            |_window, _cx| goal,
        )
        .with_easing(ease_out_quint());

    transition.update(cx, |this, cx| {
        if *this != goal {
            *this = goal;
            cx.notify();
        }
    });

    transition
}
