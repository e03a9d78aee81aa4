use std::{rc::Rc, time::Duration};

use gpui::{
    App, CursorStyle, ElementId, InteractiveElement, IntoElement, MouseButton, ParentElement,
    RenderOnce, SharedString, StatefulInteractiveElement, Styled, Window, div,
    prelude::FluentBuilder, px, relative,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;

use crate::{
    components::GroupOption,
    conditional_transition,
    controlled::{ChangeHandler, commit_change, use_controlled},
    primitives::FocusRing,
    theme::{ThemeExt, ThemeLayerKind},
    utils::{
        ElementIdExt, RgbaExt, SquircleExt, TestSelectorExt, disabled_transition,
        toggle_transition,
    },
};

/// A single radio button.
///
/// Clicking a checked radio does nothing; only selecting something else can uncheck it.
#[derive(IntoElement)]
pub struct Radio {
    id: ElementId,
    layer: ThemeLayerKind,
    label: Option<SharedString>,
    checked: Option<bool>,
    default_checked: Option<bool>,
    disabled: bool,
    on_change: Option<ChangeHandler<bool>>,
}

impl Radio {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            label: None,
            checked: None,
            default_checked: None,
            disabled: false,
            on_change: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = Some(label.into());
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

    pub fn on_change(mut self, on_change: impl Fn(&bool, &mut Window, &mut App) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

impl RenderOnce for Radio {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let size = cx.get_theme().layout.size.md;
        let gap = cx.get_theme().layout.padding.lg;
        let text_size = cx.get_theme().layout.text.default_font.sizes.body;
        let primary_accent_color = cx.get_theme().variants.active(cx).colors.accent.primary;
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let background_color = self.layer.resolve(cx);
        let border_color = self.layer.next().resolve(cx);
        let border_hover_color = border_color.lerp(&primary_text_color, 0.07);

        let state = use_controlled(
            self.id.with_suffix("state:checked"),
            window,
            cx,
            self.checked,
            self.default_checked,
        );
        let checked = *state.read(cx).value();

        let checked_transition =
            toggle_transition(self.id.clone(), window, cx, Duration::from_millis(245), checked);
        let checked_delta = *checked_transition.evaluate(window, cx);

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

        let border_color_transition = conditional_transition!(
            self.id.with_suffix("state:transition:border_color"),
            window,
            cx,
            Duration::from_millis(365),
            {
                is_focus => primary_accent_color,
                is_hover => border_hover_color,
                _ => border_color
            }
        );

        let selector_id = self.id.clone();

        div()
            .id(self.id.clone())
            .test_selector(|| format!("radio-{selector_id}"))
            .cursor(if is_disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::PointingHand
            })
            .flex()
            .items_center()
            .gap(gap)
            .text_size(text_size)
            .text_color(primary_text_color)
            .opacity(*disabled_transition.evaluate(window, cx))
            .child(
                div()
                    .relative()
                    .flex_none()
                    .size(size)
                    .flex()
                    .items_center()
                    .justify_center()
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
                    .child(
                        squircle()
                            .absolute_expand()
                            .rounded(px(100.))
                            .border(px(1.))
                            .border_inside()
                            .bg(primary_accent_color.alpha(checked_delta))
                            .border_highlight(checked_delta * 0.15),
                    )
                    .child(
                        div()
                            .size(relative(0.4 * checked_delta))
                            .rounded(px(100.))
                            .bg(primary_text_color),
                    ),
            )
            .when_some(self.label.clone(), |this, label| this.child(label))
            .when(!is_disabled, |this| {
                let is_hover_state_on_hover = is_hover_state.clone();
                let on_change = self.on_change;

                this.on_hover(move |hover, _window, cx| {
                    is_hover_state_on_hover.update(cx, |this, _cx| *this = *hover);
                    cx.notify(is_hover_state_on_hover.entity_id());
                })
                .on_mouse_down(MouseButton::Left, |_, window, _cx| window.prevent_default())
                .on_click(move |_, window, cx| {
                    window.prevent_default();

                    if !is_focus {
                        window.blur();
                    }

                    if !checked {
                        commit_change(&state, true, on_change.as_ref(), window, cx);
                    }
                })
                .on_mouse_up_out(MouseButton::Left, move |_event, _window, cx| {
                    is_hover_state.update(cx, |this, _cx| *this = false);
                    cx.notify(is_hover_state.entity_id());
                })
                .track_focus(&focus_handle)
            })
    }
}

/// A set of radios with at most one selected value.
#[derive(IntoElement)]
pub struct RadioGroup {
    id: ElementId,
    options: Vec<GroupOption>,
    layer: ThemeLayerKind,
    value: Option<Option<SharedString>>,
    default_value: Option<Option<SharedString>>,
    disabled: bool,
    horizontal: bool,
    on_change: Option<ChangeHandler<Option<SharedString>>>,
}

impl RadioGroup {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            options: Vec::new(),
            layer: ThemeLayerKind::Tertiary,
            value: None,
            default_value: None,
            disabled: false,
            horizontal: false,
            on_change: None,
        }
    }

    pub fn option(mut self, option: impl Into<GroupOption>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn options<O: Into<GroupOption>>(mut self, options: impl IntoIterator<Item = O>) -> Self {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    /// Controls the selection. `None` means "nothing selected", not "uncontrolled".
    pub fn value(mut self, value: Option<impl Into<SharedString>>) -> Self {
        self.value = Some(value.map(Into::into));
        self
    }

    pub fn default_value(mut self, value: impl Into<SharedString>) -> Self {
        self.default_value = Some(Some(value.into()));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    pub fn on_change(
        mut self,
        on_change: impl Fn(&Option<SharedString>, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

impl RenderOnce for RadioGroup {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let gap = cx.get_theme().layout.padding.lg;

        let state = use_controlled(
            self.id.with_suffix("state:value"),
            window,
            cx,
            self.value,
            self.default_value,
        );
        let selected = state.read(cx).value().clone();
        let on_change = Rc::new(self.on_change);

        div()
            .id(self.id.clone())
            .flex()
            .when(!self.horizontal, |this| this.flex_col())
            .gap(gap)
            .children(self.options.into_iter().enumerate().map(|(index, option)| {
                let state = state.clone();
                let on_change = on_change.clone();
                let value = option.value.clone();

                Radio::new(self.id.with_index(index))
                    .layer(self.layer)
                    .label(option.label)
                    .checked(selected.as_ref() == Some(&option.value))
                    .disabled(self.disabled || option.disabled)
                    .on_change(move |_checked, window, cx| {
                        commit_change(
                            &state,
                            Some(value.clone()),
                            (*on_change).as_ref(),
                            window,
                            cx,
                        );
                    })
            }))
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::theme::{Theme, ThemeExt};
    use gpui::{AppContext, Modifiers, TestAppContext, VisualTestContext};

    struct RadioTestView {
        changes: Rc<RefCell<Vec<Option<SharedString>>>>,
    }

    impl gpui::Render for RadioTestView {
        fn render(
            &mut self,
            _window: &mut Window,
            _cx: &mut gpui::Context<Self>,
        ) -> impl IntoElement {
            let changes = self.changes.clone();

            div().size_full().child(
                RadioGroup::new("size")
                    .options(["small", "large"])
                    .default_value("small")
                    .on_change(move |value, _window, _cx| changes.borrow_mut().push(value.clone())),
            )
        }
    }

    fn click(cx: &mut VisualTestContext, index: usize) {
        let group: ElementId = "size".into();
        let selector = format!("radio-{}", group.with_index(index));
        let bounds = cx
            .debug_bounds(Box::leak(selector.into_boxed_str()))
            .expect("radio should be rendered");
        cx.simulate_click(bounds.center(), Modifiers::none());
        cx.run_until_parked();
    }

    #[gpui::test]
    fn test_radio_group_selects_one_value(cx: &mut TestAppContext) {
        let changes = Rc::new(RefCell::new(Vec::new()));

        let window = cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);
            let changes = changes.clone();
            cx.open_window(Default::default(), |_window, cx| {
                cx.new(|_cx| RadioTestView { changes })
            })
            .unwrap()
        });
        let cx = &mut VisualTestContext::from_window(window.into(), cx);
        cx.run_until_parked();

        // Already selected: no change.
        click(cx, 0);
        click(cx, 1);
        click(cx, 1);
        click(cx, 0);

        assert_eq!(
            *changes.borrow(),
            vec![Some(SharedString::from("large")), Some("small".into())]
        );
    }

    #[gpui::test]
    fn test_radio_group_value_none_is_controlled(cx: &mut TestAppContext) {
        cx.update(|_cx| {
            let group = RadioGroup::new("size").value(None::<SharedString>);

            assert_eq!(group.value, Some(None));
        });
    }
}
