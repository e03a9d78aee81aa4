use std::{rc::Rc, time::Duration};

use gpui::{
    App, CursorStyle, ElementId, InteractiveElement, IntoElement, KeyDownEvent, MouseButton,
    ParentElement, RenderOnce, SharedString, StatefulInteractiveElement, Styled, Window, div,
    prelude::FluentBuilder, px,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;

use crate::{
    components::input::Backspace,
    conditional_transition,
    controlled::{ChangeHandler, commit_change, use_controlled},
    primitives::FocusRing,
    theme::{ThemeExt, ThemeLayerKind},
    utils::{ElementIdExt, TestSelectorExt, disabled_transition},
};

pub const DEFAULT_OTP_LENGTH: usize = 6;

/// Appends the digits of `input` to `current`, stopping at `length` digits.
/// Anything that isn't an ASCII digit is dropped.
pub fn push_digits(current: &str, input: &str, length: usize) -> String {
    current
        .chars()
        .chain(input.chars())
        .filter(char::is_ascii_digit)
        .take(length)
        .collect()
}

/// A fixed-length code entry, one cell per digit.
#[derive(IntoElement)]
pub struct InputOtp {
    id: ElementId,
    layer: ThemeLayerKind,
    length: usize,
    value: Option<SharedString>,
    default_value: Option<SharedString>,
    disabled: bool,
    on_change: Option<ChangeHandler<SharedString>>,
    on_complete: Option<Box<dyn Fn(&SharedString, &mut Window, &mut App) + 'static>>,
}

impl InputOtp {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            length: DEFAULT_OTP_LENGTH,
            value: None,
            default_value: None,
            disabled: false,
            on_change: None,
            on_complete: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    /// Number of digits. Zero is treated as one.
    pub fn length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<SharedString>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(
        mut self,
        on_change: impl Fn(&SharedString, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Called after the change that fills the last cell.
    pub fn on_complete(
        mut self,
        on_complete: impl Fn(&SharedString, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }
}

impl RenderOnce for InputOtp {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let cell_size = cx.get_theme().layout.size.xl;
        let gap = cx.get_theme().layout.padding.lg;
        let corner_radius = cx.get_theme().layout.corner_radii.md;
        let text_size = cx.get_theme().layout.text.default_font.sizes.heading;
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let primary_accent_color = cx.get_theme().variants.active(cx).colors.accent.primary;
        let background_color = self.layer.resolve(cx);
        let border_color = self.layer.next().resolve(cx);
        let border_hover_color = border_color.lerp(&primary_text_color, 0.07);

        let length = self.length;
        let state = use_controlled(
            self.id.with_suffix("state:value"),
            window,
            cx,
            self.value,
            self.default_value,
        );
        let value = state.read(cx).value().clone();
        let digits: Vec<char> = value.chars().take(length).collect();

        let is_disabled = self.disabled;

        let is_hover_state =
            window.use_keyed_state(self.id.with_suffix("state:hover"), cx, |_window, _cx| false);
        let is_hover = *is_hover_state.read(cx);

        let focus_handle = window
            .use_keyed_state(
                self.id.with_suffix("state:focus_handle"),
                cx,
                |_window, cx| cx.focus_handle().tab_stop(true),
            )
            .read(cx)
            .clone();
        let is_focus = focus_handle.is_focused(window);

        let disabled_transition = disabled_transition(self.id.clone(), window, cx, is_disabled);

        if is_focus && is_disabled {
            window.blur();
        }

        let active_cell = digits.len().min(length - 1);
        let cells = (0..length).map(|index| {
            let is_active = is_focus && index == active_cell;

            let cell_border_transition = conditional_transition!(
                self.id.with_index(index).with_suffix("state:transition:border_color"),
                window,
                cx,
                Duration::from_millis(285),
                {
                    is_active => primary_accent_color,
                    is_hover => border_hover_color,
                    _ => border_color
                }
            );

            div()
                .relative()
                .flex_none()
                .size(cell_size)
                .flex()
                .items_center()
                .justify_center()
                .child(
                    squircle()
                        .absolute_expand()
                        .rounded(corner_radius)
                        .bg(background_color)
                        .border(px(1.))
                        .border_inside()
                        .border_color(*cell_border_transition.evaluate(window, cx)),
                )
                .when_some(digits.get(index), |this, digit| {
                    this.child(div().relative().child(SharedString::from(digit.to_string())))
                })
        });
        let cells: Vec<_> = cells.collect();

        let on_change = Rc::new(self.on_change);
        let on_complete = Rc::new(self.on_complete);
        let selector_id = self.id.clone();

        div()
            .id(self.id.clone())
            .test_selector(|| format!("input-otp-{selector_id}"))
            .key_context("MosaicInput")
            .cursor(if is_disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::IBeam
            })
            .relative()
            .flex()
            .gap(gap)
            .text_size(text_size)
            .text_color(primary_text_color)
            .opacity(*disabled_transition.evaluate(window, cx))
            .child(
                FocusRing::new(self.id.with_suffix("focus_ring"), focus_handle.clone())
                    .rounded(corner_radius),
            )
            .children(cells)
            .when(!is_disabled, |this| {
                let focus_handle_on_mouse_down = focus_handle.clone();
                let backspace_state = state.clone();
                let backspace_on_change = on_change.clone();

                this.on_hover(move |hover, _window, cx| {
                    is_hover_state.update(cx, |this, cx| {
                        *this = *hover;
                        cx.notify();
                    });
                })
                .on_mouse_down(MouseButton::Left, move |_event, window, cx| {
                    focus_handle_on_mouse_down.focus(window, cx);
                })
                .on_key_down(move |event: &KeyDownEvent, window, cx| {
                    let Some(input) = event.keystroke.key_char.as_deref() else {
                        return;
                    };

                    // Keys can arrive faster than frames; build on the latest value.
                    let current = state.read(cx).value().clone();
                    let next = SharedString::from(push_digits(&current, input, length));
                    if next == current {
                        return;
                    }
                    cx.stop_propagation();

                    commit_change(&state, next.clone(), (*on_change).as_ref(), window, cx);

                    if next.chars().count() == length
                        && let Some(on_complete) = (*on_complete).as_ref()
                    {
                        (on_complete)(&next, window, cx);
                    }
                })
                .on_action(move |_: &Backspace, window, cx| {
                    let mut next = backspace_state.read(cx).value().to_string();
                    if next.pop().is_none() {
                        return;
                    }

                    commit_change(
                        &backspace_state,
                        next.into(),
                        (*backspace_on_change).as_ref(),
                        window,
                        cx,
                    );
                })
                .track_focus(&focus_handle)
            })
    }
}
