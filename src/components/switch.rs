use std::time::Duration;

use gpui::{
    App, CursorStyle, ElementId, InteractiveElement, IntoElement, MouseButton, ParentElement,
    Pixels, RenderOnce, StatefulInteractiveElement, Styled, Window, div, prelude::FluentBuilder,
    px,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;

use crate::{
    MosaicIconKind,
    components::Icon,
    conditional_transition,
    controlled::{ChangeHandler, commit_change, use_controlled},
    primitives::FocusRing,
    theme::{ThemeExt, ThemeLayerKind},
    utils::{
        ElementIdExt, RgbaExt, SquircleExt, TestSelectorExt, disabled_transition,
        toggle_transition,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwitchSize {
    Small,
    #[default]
    Medium,
}

impl SwitchSize {
    fn knob_size(self, cx: &App) -> Pixels {
        match self {
            Self::Small => cx.get_theme().layout.size.sm,
            Self::Medium => cx.get_theme().layout.size.md,
        }
    }
}

/// A two-state toggle. While `loading` the knob shows a spinner and clicks are ignored.
#[derive(IntoElement)]
pub struct Switch {
    id: ElementId,
    layer: ThemeLayerKind,
    size: SwitchSize,
    checked: Option<bool>,
    default_checked: Option<bool>,
    disabled: bool,
    loading: bool,
    on_change: Option<ChangeHandler<bool>>,
}

impl Switch {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            size: SwitchSize::default(),
            checked: None,
            default_checked: None,
            disabled: false,
            loading: false,
            on_change: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    pub fn size(mut self, size: SwitchSize) -> Self {
        self.size = size;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn default_checked(mut self, checked: bool) -> Self {
        self.default_checked = Some(checked);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn on_change(mut self, on_change: impl Fn(&bool, &mut Window, &mut App) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

impl RenderOnce for Switch {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        const INNER_SIZE_FOCUS_MULT: f32 = 1.25;

        let inner_size = self.size.knob_size(cx);
        let padding = cx.get_theme().layout.padding.md;
        let width = (inner_size * 2) + (padding * 2);
        let height = inner_size + (padding * 2);
        let (start_offset, end_offset) = (
            padding.to_f64() as f32,
            (width - inner_size - padding).to_f64() as f32,
        );
        let primary_accent_color = cx.get_theme().variants.active(cx).colors.accent.primary;
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let background_color = self.layer.resolve(cx);
        let border_color = self.layer.next().resolve(cx);
        let border_hover_color = border_color.lerp(&primary_text_color, 0.07);
        let border_click_down_color = border_color.lerp(&primary_text_color, 0.16);

        let state = use_controlled(
            self.id.with_suffix("state:checked"),
            window,
            cx,
            self.checked,
            self.default_checked,
        );
        let checked = *state.read(cx).value();

        let checked_transition = toggle_transition(
            self.id.clone(),
            window,
            cx,
            Duration::from_millis(200),
            checked,
        );

        let is_disabled = self.disabled;
        let is_loading = self.loading;

        let is_hover_state =
            window.use_keyed_state(self.id.with_suffix("state:hover"), cx, |_window, _cx| false);
        let is_hover = *is_hover_state.read(cx);

        let is_click_down_state = window.use_keyed_state(
            self.id.with_suffix("state:click_down"),
            cx,
            |_window, _cx| false,
        );
        let is_click_down = *is_click_down_state.read(cx);

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

        let border_color_transition = conditional_transition!(
            self.id.with_suffix("state:transition:border_color"),
            window,
            cx,
            Duration::from_millis(365),
            {
                is_focus => primary_accent_color,
                is_click_down => border_click_down_color,
                is_hover => border_hover_color,
                _ => border_color
            }
        );

        // The knob stretches a little while focused or pressed.
        let inner_width_transition = conditional_transition!(
            self.id.with_suffix("state:transition:inner_width"),
            window,
            cx,
            Duration::from_millis(185),
            {
                !is_loading && (is_focus | is_click_down) => {
                    px((inner_size.to_f64() as f32 * INNER_SIZE_FOCUS_MULT).floor())
                },
                _ => inner_size
            }
        );

        let selector_id = self.id.clone();

        div()
            .id(self.id.clone())
            .test_selector(|| format!("switch-{selector_id}"))
            .cursor(if is_disabled || is_loading {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::PointingHand
            })
            .relative()
            .flex_none()
            .w(width)
            .h(height)
            .opacity(*disabled_transition.evaluate(window, cx))
            .child(
                FocusRing::new(self.id.with_suffix("focus_ring"), focus_handle.clone())
                    .rounded(px(100.)),
            )
            .child(
                squircle()
                    .absolute_expand()
                    .rounded(px(100.))
                    .bg(background_color)
                    .border(px(1.))
                    .border_inside()
                    .border_color(*border_color_transition.evaluate(window, cx)),
            )
            .map(|this| {
                let checked_delta = *checked_transition.evaluate(window, cx);
                let inner_width = *inner_width_transition.evaluate(window, cx);

                let offset = remap(checked_delta, 0., 1., start_offset, end_offset);
                let width_diff = (inner_width - inner_size) * checked_delta;

                this.child(
                    squircle()
                        .absolute_expand()
                        .bg(primary_accent_color.alpha(checked_delta))
                        .rounded(px(100.))
                        .border_inside()
                        .border(px(1.))
                        .border_highlight(0.15 * checked_delta),
                )
                .child(
                    div()
                        .absolute()
                        .w(inner_width)
                        .h(inner_size)
                        .top(padding)
                        .bg(primary_text_color)
                        .rounded(px(100.))
                        .left(px(offset) - width_diff)
                        .flex()
                        .items_center()
                        .justify_center()
                        .when(is_loading, |this| {
                            this.child(
                                Icon::kind(MosaicIconKind::Loading)
                                    .size(inner_size * 0.7)
                                    .color(primary_accent_color),
                            )
                        }),
                )
            })
            .when(!is_disabled && !is_loading, |this| {
                let is_hover_state_on_hover = is_hover_state.clone();
                let is_click_down_state_on_mouse_down = is_click_down_state.clone();
                let is_click_down_state_on_click = is_click_down_state.clone();
                let on_change = self.on_change;

                this.on_hover(move |hover, _window, cx| {
                    is_hover_state_on_hover.update(cx, |this, _cx| *this = *hover);
                    cx.notify(is_hover_state_on_hover.entity_id());
                })
                .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                    window.prevent_default();

                    is_click_down_state_on_mouse_down.update(cx, |this, _cx| *this = true);
                    cx.notify(is_click_down_state_on_mouse_down.entity_id());
                })
                .on_click(move |_, window, cx| {
                    window.prevent_default();
                    cx.stop_propagation();

                    if !is_focus {
                        window.blur();
                    }

                    is_click_down_state_on_click.update(cx, |this, _cx| *this = false);
                    cx.notify(is_click_down_state_on_click.entity_id());

                    commit_change(&state, !checked, on_change.as_ref(), window, cx);
                })
                .on_mouse_up_out(MouseButton::Left, move |_event, _window, cx| {
                    is_hover_state.update(cx, |this, _cx| *this = false);
                    cx.notify(is_hover_state.entity_id());

                    is_click_down_state.update(cx, |this, _cx| *this = false);
                    cx.notify(is_click_down_state.entity_id());
                })
                .track_focus(&focus_handle)
            })
    }
}

pub fn remap(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    (value - from_min) / (from_max - from_min) * (to_max - to_min) + to_min
}


#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::theme::{Theme, ThemeExt};
    use gpui::{AppContext, Modifiers, TestAppContext, VisualTestContext};

    #[gpui::test]
    fn test_switch_builder_chain(cx: &mut TestAppContext) {
        cx.update(|_cx| {
            let switch = Switch::new("test-switch")
                .default_checked(true)
                .disabled(true)
                .size(SwitchSize::Small)
                .layer(ThemeLayerKind::Secondary);

            assert_eq!(switch.checked, None);
            assert_eq!(switch.size, SwitchSize::Small);
            assert!(!switch.loading);
            assert_eq!(switch.default_checked, Some(true));
            assert!(switch.disabled);
            assert!(matches!(switch.layer, ThemeLayerKind::Secondary));
        });
    }

    struct SwitchTestView {
        disabled: bool,
        loading: bool,
        changes: Rc<RefCell<Vec<bool>>>,
    }

    impl gpui::Render for SwitchTestView {
        fn render(
            &mut self,
            _window: &mut Window,
            _cx: &mut gpui::Context<Self>,
        ) -> impl IntoElement {
            let changes = self.changes.clone();

            div().size_full().child(
                Switch::new("wifi")
                    .disabled(self.disabled)
                    .loading(self.loading)
                    .on_change(move |checked, _window, _cx| changes.borrow_mut().push(*checked)),
            )
        }
    }

    fn open(
        cx: &mut TestAppContext,
        disabled: bool,
        loading: bool,
    ) -> (VisualTestContext, Rc<RefCell<Vec<bool>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));

        let window = cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);
            let changes = changes.clone();
            cx.open_window(Default::default(), |_window, cx| {
                cx.new(|_cx| SwitchTestView {
                    disabled,
                    loading,
                    changes,
                })
            })
            .unwrap()
        });

        let mut cx = VisualTestContext::from_window(window.into(), cx);
        cx.run_until_parked();
        (cx, changes)
    }

    #[gpui::test]
    fn test_switch_toggles_from_unchecked(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx, false, false);

        for _ in 0..3 {
            let bounds = cx.debug_bounds("switch-wifi").expect("switch should be rendered");
            cx.simulate_click(bounds.center(), Modifiers::none());
            cx.run_until_parked();
        }

        assert_eq!(*changes.borrow(), vec![true, false, true]);
    }

    #[gpui::test]
    fn test_disabled_switch_ignores_clicks(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx, true, false);

        let bounds = cx.debug_bounds("switch-wifi").expect("switch should be rendered");
        cx.simulate_click(bounds.center(), Modifiers::none());
        cx.run_until_parked();

        assert!(changes.borrow().is_empty());
    }

    #[gpui::test]
    fn test_loading_switch_ignores_clicks(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx, false, true);

        let bounds = cx.debug_bounds("switch-wifi").expect("switch should be rendered");
        cx.simulate_click(bounds.center(), Modifiers::none());
        cx.run_until_parked();

        assert!(changes.borrow().is_empty());
    }
}
