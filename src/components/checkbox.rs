use std::time::Duration;

use gpui::{
    App, CursorStyle, ElementId, InteractiveElement, IntoElement, MouseButton, ParentElement,
    RenderOnce, SharedString, StatefulInteractiveElement, Styled, Window, div,
    prelude::FluentBuilder, px, relative, svg,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;

use crate::{
    MosaicIconKind, conditional_transition,
    controlled::{ChangeHandler, commit_change, use_controlled},
    primitives::FocusRing,
    theme::{ThemeExt, ThemeLayerKind},
    utils::{
        ElementIdExt, RgbaExt, SquircleExt, TestSelectorExt, disabled_transition,
        toggle_transition,
    },
};

/// A checkbox with an optional label.
///
/// Pass [`Checkbox::checked`] to control it, or [`Checkbox::default_checked`] to let it
/// keep its own state.
#[derive(IntoElement)]
pub struct Checkbox {
    id: ElementId,
    icon: SharedString,
    layer: ThemeLayerKind,
    label: Option<SharedString>,
    checked: Option<bool>,
    default_checked: Option<bool>,
    disabled: bool,
    on_change: Option<ChangeHandler<bool>>,
}

impl Checkbox {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            icon: MosaicIconKind::Checkmark.into(),
            layer: ThemeLayerKind::Tertiary,
            label: None,
            checked: None,
            default_checked: None,
            disabled: false,
            on_change: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<SharedString>) -> Self {
        self.icon = icon.into();
        self
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

impl RenderOnce for Checkbox {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let size = cx.get_theme().layout.size.md;
        let corner_radius = cx.get_theme().layout.corner_radii.sm;
        let gap = cx.get_theme().layout.padding.lg;
        let text_size = cx.get_theme().layout.text.default_font.sizes.body;
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
            Duration::from_millis(285),
            checked,
        );

        let is_disabled = self.disabled;

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

        let checked_delta = *checked_transition.evaluate(window, cx);

        let indicator = div()
            .relative()
            .flex_none()
            .size(size)
            .flex()
            .items_center()
            .justify_center()
            .child(
                FocusRing::new(self.id.with_suffix("focus_ring"), focus_handle.clone())
                    .rounded(corner_radius),
            )
            .child(
                squircle()
                    .absolute_expand()
                    .rounded(corner_radius)
                    .bg(background_color)
                    .border(px(1.))
                    .border_inside()
                    .border_color(*border_color_transition.evaluate(window, cx)),
            )
            .child(
                squircle()
                    .absolute_expand()
                    .rounded(corner_radius)
                    .border(px(1.))
                    .border_inside()
                    .bg(primary_accent_color.alpha(checked_delta))
                    .border_highlight(checked_delta * 0.15),
            )
            .child(
                svg()
                    .size(relative(0.48))
                    .text_color(primary_text_color.alpha(checked_delta))
                    .path(self.icon.clone()),
            );

        let selector_id = self.id.clone();

        div()
            .id(self.id.clone())
            .test_selector(|| format!("checkbox-{selector_id}"))
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
            .child(indicator)
            .when_some(self.label.clone(), |this, label| this.child(label))
            .when(!is_disabled, |this| {
                let is_hover_state_on_hover = is_hover_state.clone();
                let is_click_down_state_on_mouse_down = is_click_down_state.clone();
                let is_click_down_state_on_click = is_click_down_state.clone();
                let on_change = self.on_change;

                this.on_hover(move |hover, _window, cx| {
                    is_hover_state_on_hover.update(cx, |this, _cx| *this = *hover);
                    cx.notify(is_hover_state_on_hover.entity_id());
                })
                .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                    // Keeps the focus ring hidden for mouse interaction.
                    window.prevent_default();

                    is_click_down_state_on_mouse_down.update(cx, |this, _cx| *this = true);
                    cx.notify(is_click_down_state_on_mouse_down.entity_id());
                })
                .on_click(move |_, window, cx| {
                    window.prevent_default();

                    if !is_focus {
                        window.blur();
                    }

                    is_click_down_state_on_click.update(cx, |this, _cx| *this = false);
                    cx.notify(is_click_down_state_on_click.entity_id());

                    commit_change(&state, !checked, on_change.as_ref(), window, cx);
                })
                .on_mouse_up_out(MouseButton::Left, move |_event, _window, cx| {
                    // Pressed inside, released outside.
                    is_hover_state.update(cx, |this, _cx| *this = false);
                    cx.notify(is_hover_state.entity_id());

                    is_click_down_state.update(cx, |this, _cx| *this = false);
                    cx.notify(is_click_down_state.entity_id());
                })
                .track_focus(&focus_handle)
            })
    }
}

/// One choice in a [`CheckboxGroup`] or [`crate::components::RadioGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOption {
    pub value: SharedString,
    pub label: SharedString,
    pub disabled: bool,
}

impl GroupOption {
    pub fn new(value: impl Into<SharedString>, label: impl Into<SharedString>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl From<&'static str> for GroupOption {
    fn from(value: &'static str) -> Self {
        Self::new(value, value)
    }
}

/// The selection after `clicked` is toggled, in option order.
pub fn toggle_member(
    options: &[GroupOption],
    selected: &[SharedString],
    clicked: &SharedString,
) -> Vec<SharedString> {
    options
        .iter()
        .map(|option| &option.value)
        .filter(|value| selected.contains(value) != (*value == clicked))
        .cloned()
        .collect()
}

/// A list of checkboxes sharing one `Vec` of checked values.
///
/// The group owns its options and renders the checkboxes itself, so there is no way to
/// build an item that isn't part of a group.
#[derive(IntoElement)]
pub struct CheckboxGroup {
    id: ElementId,
    options: Vec<GroupOption>,
    layer: ThemeLayerKind,
    value: Option<Vec<SharedString>>,
    default_value: Option<Vec<SharedString>>,
    disabled: bool,
    horizontal: bool,
    on_change: Option<ChangeHandler<Vec<SharedString>>>,
}

impl CheckboxGroup {
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

    pub fn value<S: Into<SharedString>>(mut self, value: impl IntoIterator<Item = S>) -> Self {
        self.value = Some(value.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value<S: Into<SharedString>>(
        mut self,
        value: impl IntoIterator<Item = S>,
    ) -> Self {
        self.default_value = Some(value.into_iter().map(Into::into).collect());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Lays the checkboxes out in a row instead of a column.
    pub fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    pub fn on_change(
        mut self,
        on_change: impl Fn(&Vec<SharedString>, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

impl RenderOnce for CheckboxGroup {
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

        let on_change = std::rc::Rc::new(self.on_change);
        let options = std::rc::Rc::new(self.options);

        div()
            .id(self.id.clone())
            .flex()
            .when(!self.horizontal, |this| this.flex_col())
            .gap(gap)
            .children(options.iter().enumerate().map(|(index, option)| {
                let state = state.clone();
                let on_change = on_change.clone();
                let options = options.clone();
                let selected = selected.clone();
                let clicked = option.value.clone();

                Checkbox::new(self.id.with_index(index))
                    .layer(self.layer)
                    .label(option.label.clone())
                    .checked(selected.contains(&option.value))
                    .disabled(self.disabled || option.disabled)
                    .on_change(move |_checked, window, cx| {
                        let next = toggle_member(&options, &selected, &clicked);
                        commit_change(&state, next, (*on_change).as_ref(), window, cx);
                    })
            }))
    }
}

#[cfg(test)]
mod group_tests {
    use super::*;

    fn options() -> Vec<GroupOption> {
        ["apple", "pear", "plum"].map(GroupOption::from).to_vec()
    }

    #[test]
    fn toggling_keeps_option_order() {
        let selected = vec![SharedString::from("plum")];

        let next = toggle_member(&options(), &selected, &"apple".into());

        assert_eq!(next, vec![SharedString::from("apple"), "plum".into()]);
    }

    #[test]
    fn toggling_a_checked_value_removes_it() {
        let selected = vec![SharedString::from("apple"), "pear".into()];

        let next = toggle_member(&options(), &selected, &"apple".into());

        assert_eq!(next, vec![SharedString::from("pear")]);
    }

    #[test]
    fn unknown_selected_values_are_dropped() {
        let selected = vec![SharedString::from("kiwi")];

        let next = toggle_member(&options(), &selected, &"pear".into());

        assert_eq!(next, vec![SharedString::from("pear")]);
    }
}
