use std::{rc::Rc, time::Duration};

use gpui::{
    App, CursorStyle, ElementId, Entity, InteractiveElement, IntoElement, KeyBinding, Length,
    MouseButton, ParentElement, RenderOnce, SharedString, StatefulInteractiveElement, Styled,
    Window, actions, anchored, deferred, div, prelude::FluentBuilder, px, radians, relative,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;
use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    MosaicIconKind,
    components::Icon,
    conditional_transition,
    controlled::{ChangeHandler, Controlled, commit_change, use_controlled},
    primitives::FocusRing,
    theme::{ThemeExt, ThemeLayerKind},
    utils::{
        ElementIdExt, PixelsExt, RgbaExt, TestSelectorExt, disabled_transition,
        toggle_transition,
    },
};

actions!(select_menu, [MoveUp, MoveDown, Confirm, Cancel]);

const KEY_CONTEXT: &str = "MosaicSelect";

pub(crate) fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("up", MoveUp, Some(KEY_CONTEXT)),
        KeyBinding::new("down", MoveDown, Some(KEY_CONTEXT)),
        KeyBinding::new("enter", Confirm, Some(KEY_CONTEXT)),
        KeyBinding::new("escape", Cancel, Some(KEY_CONTEXT)),
    ]);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("no option has the value `{0}`")]
    UnknownOption(SharedString),
}

/// Options keyed by value, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOptions(IndexMap<SharedString, SharedString>);

impl SelectOptions {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Adds an option, replacing the label of an existing value in place.
    pub fn push(&mut self, value: impl Into<SharedString>, label: impl Into<SharedString>) {
        self.0.insert(value.into(), label.into());
    }

    pub fn label(&self, value: &SharedString) -> Result<&SharedString, SelectError> {
        self.0
            .get(value)
            .ok_or_else(|| SelectError::UnknownOption(value.clone()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SharedString, &SharedString)> {
        self.0.iter()
    }

    /// The option after `current`, wrapping to the first. Starts at the first option.
    pub fn next_after(&self, current: Option<&SharedString>) -> Option<SharedString> {
        let len = self.0.len();
        if len == 0 {
            return None;
        }

        let index = match current.and_then(|value| self.0.get_index_of(value)) {
            Some(index) if index + 1 >= len => 0,
            Some(index) => index + 1,
            None => 0,
        };

        self.0.get_index(index).map(|(value, _)| value.clone())
    }

    /// The option before `current`, wrapping to the last. Starts at the last option.
    pub fn previous_before(&self, current: Option<&SharedString>) -> Option<SharedString> {
        let len = self.0.len();
        if len == 0 {
            return None;
        }

        let index = match current.and_then(|value| self.0.get_index_of(value)) {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        };

        self.0.get_index(index).map(|(value, _)| value.clone())
    }
}

impl<V: Into<SharedString>, L: Into<SharedString>> FromIterator<(V, L)> for SelectOptions {
    fn from_iter<T: IntoIterator<Item = (V, L)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(value, label)| (value.into(), label.into()))
                .collect(),
        )
    }
}

/// Open state and keyboard highlight shared by the trigger and its menu.
#[derive(Clone)]
struct MenuState {
    value: Entity<Controlled<Option<SharedString>>>,
    open: Entity<bool>,
    highlighted: Entity<Option<SharedString>>,
    options: Rc<SelectOptions>,
    on_change: Rc<Option<ChangeHandler<Option<SharedString>>>>,
}

impl MenuState {
    fn set_open(&self, open: bool, cx: &mut App) {
        if open {
            // Start from the current selection.
            let selected = self.value.read(cx).value().clone();
            self.highlighted.update(cx, |this, _cx| *this = selected);
        }

        self.open.update(cx, |this, cx| {
            if *this != open {
                *this = open;
                cx.notify();
            }
        });
    }

    fn move_highlight(&self, down: bool, cx: &mut App) {
        if !*self.open.read(cx) {
            self.set_open(true, cx);
            return;
        }

        let current = self.highlighted.read(cx).clone();
        let next = if down {
            self.options.next_after(current.as_ref())
        } else {
            self.options.previous_before(current.as_ref())
        };

        self.highlighted.update(cx, |this, cx| {
            *this = next;
            cx.notify();
        });
    }

    fn choose(&self, value: SharedString, window: &mut Window, cx: &mut App) {
        self.set_open(false, cx);

        if self.value.read(cx).value().as_ref() == Some(&value) {
            return;
        }

        commit_change(&self.value, Some(value), (*self.on_change).as_ref(), window, cx);
    }

    fn confirm(&self, window: &mut Window, cx: &mut App) {
        if !*self.open.read(cx) {
            self.set_open(true, cx);
            return;
        }

        match self.highlighted.read(cx).clone() {
            Some(value) => self.choose(value, window, cx),
            None => self.set_open(false, cx),
        }
    }
}

/// A dropdown of options with keyboard navigation.
#[derive(IntoElement)]
pub struct Select {
    id: ElementId,
    layer: ThemeLayerKind,
    options: SelectOptions,
    placeholder: SharedString,
    value: Option<Option<SharedString>>,
    default_value: Option<Option<SharedString>>,
    disabled: bool,
    width: Length,
    on_change: Option<ChangeHandler<Option<SharedString>>>,
}

impl Select {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            options: SelectOptions::new(),
            placeholder: "Select…".into(),
            value: None,
            default_value: None,
            disabled: false,
            width: Length::Auto,
            on_change: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    pub fn option(
        mut self,
        value: impl Into<SharedString>,
        label: impl Into<SharedString>,
    ) -> Self {
        self.options.push(value, label);
        self
    }

    pub fn options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = placeholder.into();
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

    pub fn w(mut self, width: impl Into<Length>) -> Self {
        self.width = width.into();
        self
    }

    pub fn w_full(mut self) -> Self {
        self.width = relative(1.).into();
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

impl RenderOnce for Select {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let secondary_text_color = cx.get_theme().variants.active(cx).colors.text.secondary;
        let primary_accent_color = cx.get_theme().variants.active(cx).colors.accent.primary;
        let background_color = self.layer.resolve(cx);
        let border_color = self.layer.next().resolve(cx);
        let border_hover_color = border_color.lerp(&primary_text_color, 0.07);
        let menu_background_color = self.layer.next().resolve(cx);
        let line_height = cx.get_theme().layout.text.default_font.line_height;
        let text_size = cx.get_theme().layout.text.default_font.sizes.body;
        let corner_radius = cx.get_theme().layout.corner_radii.md;
        let padding = cx.get_theme().layout.padding.md;
        let horizontal_padding = cx.get_theme().layout.padding.lg;
        let vertical_padding = cx
            .get_theme()
            .layout
            .size
            .lg
            .padding_needed_for_height(window, text_size, line_height);

        let value = use_controlled(
            self.id.with_suffix("state:value"),
            window,
            cx,
            self.value,
            self.default_value,
        );
        let menu = MenuState {
            value,
            open: window.use_keyed_state(self.id.with_suffix("state:open"), cx, |_window, _cx| {
                false
            }),
            highlighted: window.use_keyed_state(
                self.id.with_suffix("state:highlighted"),
                cx,
                |_window, _cx| None,
            ),
            options: Rc::new(self.options),
            on_change: Rc::new(self.on_change),
        };

        let selected = menu.value.read(cx).value().clone();
        let selected_label = selected.as_ref().and_then(|value| match menu.options.label(value) {
            Ok(label) => Some(label.clone()),
            Err(err) => {
                tracing::debug!("{err}; showing the placeholder");
                None
            }
        });

        let is_open = *menu.open.read(cx);
        let highlighted = menu.highlighted.read(cx).clone();

        let is_disabled = self.disabled;
        if is_disabled && is_open {
            menu.set_open(false, cx);
        }

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

        if is_disabled && is_focus {
            window.blur();
        }

        let border_color_transition = conditional_transition!(
            self.id.with_suffix("state:transition:border_color"),
            window,
            cx,
            Duration::from_millis(400),
            {
                is_focus || is_open => primary_accent_color,
                is_hover => border_hover_color,
                _ => border_color
            }
        );

        let menu_visible_transition = toggle_transition(
            self.id.with_suffix("menu"),
            window,
            cx,
            Duration::from_millis(275),
            is_open,
        );
        let menu_visible_delta = *menu_visible_transition.evaluate(window, cx);

        let selector_id = self.id.clone();

        let menu_panel = is_open.then(|| {
            let items = menu.options.iter().map(|(value, label)| {
                let is_selected = selected.as_ref() == Some(value);
                let is_highlighted = highlighted.as_ref() == Some(value);
                let menu_for_click = menu.clone();
                let menu_for_hover = menu.clone();
                let value_for_click = value.clone();
                let value_for_hover = value.clone();
                let selector_id = self.id.clone();
                let selector_value = value.clone();

                div()
                    .id(self.id.with_suffix("item").with_suffix(value.clone()))
                    .test_selector(|| format!("select-item-{selector_id}-{selector_value}"))
                    .w_full()
                    .px(horizontal_padding - padding)
                    .py(vertical_padding - padding)
                    .rounded(corner_radius - padding)
                    .text_color(if is_selected {
                        primary_text_color
                    } else {
                        secondary_text_color
                    })
                    .when(is_highlighted, |this| {
                        this.bg(primary_accent_color.alpha(0.16))
                    })
                    .when(is_selected, |this| this.text_color(primary_accent_color))
                    .child(label.clone())
                    .on_mouse_down(MouseButton::Left, |_event, window, _cx| {
                        window.prevent_default();
                    })
                    .on_hover(move |hover, _window, cx| {
                        if *hover {
                            menu_for_hover.highlighted.update(cx, |this, cx| {
                                *this = Some(value_for_hover.clone());
                                cx.notify();
                            });
                        }
                    })
                    .on_click(move |_event, window, cx| {
                        cx.stop_propagation();
                        menu_for_click.choose(value_for_click.clone(), window, cx);
                    })
            });
            let items: Vec<_> = items.collect();

            let menu_for_outside = menu.clone();
            let is_hover_state_for_outside = is_hover_state.clone();

            deferred(
                anchored().snap_to_window_with_margin(px(8.)).child(
                    div()
                        .id(self.id.with_suffix("menu"))
                        .occlude()
                        .pt(padding)
                        .opacity(menu_visible_delta)
                        .child(
                            div()
                                .relative()
                                .min_w(px(120.))
                                .flex()
                                .flex_col()
                                .p(padding)
                                .text_size(text_size)
                                .child(
                                    squircle()
                                        .absolute_expand()
                                        .rounded(corner_radius)
                                        .bg(menu_background_color)
                                        .border_color(border_color)
                                        .border(px(1.))
                                        .border_inside(),
                                )
                                .children(items),
                        )
                        .on_mouse_down_out(move |_event, _window, cx| {
                            // The trigger toggles the menu itself.
                            if !*is_hover_state_for_outside.read(cx) {
                                menu_for_outside.set_open(false, cx);
                            }
                        }),
                ),
            )
            .priority(1)
        });

        div()
            .id(self.id.clone())
            .test_selector(|| format!("select-{selector_id}"))
            .key_context(KEY_CONTEXT)
            .cursor(if is_disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::PointingHand
            })
            .relative()
            .w(self.width)
            .flex()
            .flex_col()
            .opacity(*disabled_transition.evaluate(window, cx))
            .child(
                div()
                    .relative()
                    .w_full()
                    .px(horizontal_padding)
                    .py(vertical_padding)
                    .gap(horizontal_padding)
                    .flex()
                    .items_center()
                    .justify_between()
                    .text_size(text_size)
                    .line_height(line_height)
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
                        div()
                            .relative()
                            .map(|this| match selected_label {
                                Some(label) => this.text_color(primary_text_color).child(label),
                                None => this
                                    .text_color(secondary_text_color)
                                    .child(self.placeholder.clone()),
                            }),
                    )
                    .child(
                        Icon::kind(MosaicIconKind::ArrowDown)
                            .size(px(11.))
                            .color(secondary_text_color)
                            .rotate(radians(menu_visible_delta * std::f32::consts::PI)),
                    ),
            )
            .when_some(menu_panel, |this, panel| this.child(panel))
            .when(!is_disabled, |this| {
                let menu_for_click = menu.clone();
                let menu_for_up = menu.clone();
                let menu_for_down = menu.clone();
                let menu_for_confirm = menu.clone();
                let menu_for_cancel = menu;
                let focus_handle_on_mouse_down = focus_handle.clone();

                this.on_hover(move |hover, _window, cx| {
                    is_hover_state.update(cx, |this, cx| {
                        *this = *hover;
                        cx.notify();
                    });
                })
                .on_mouse_down(MouseButton::Left, move |_event, window, cx| {
                    window.prevent_default();
                    focus_handle_on_mouse_down.focus(window, cx);
                })
                .on_click(move |_event, _window, cx| {
                    let open = *menu_for_click.open.read(cx);
                    menu_for_click.set_open(!open, cx);
                })
                .on_action(move |_: &MoveUp, _window, cx| menu_for_up.move_highlight(false, cx))
                .on_action(move |_: &MoveDown, _window, cx| menu_for_down.move_highlight(true, cx))
                .on_action(move |_: &Confirm, window, cx| menu_for_confirm.confirm(window, cx))
                .on_action(move |_: &Cancel, _window, cx| menu_for_cancel.set_open(false, cx))
                .track_focus(&focus_handle)
            })
    }
}

#[cfg(test)]
mod option_tests {
    use super::*;

    fn fruit() -> SelectOptions {
        [("apple", "Apple"), ("pear", "Pear"), ("plum", "Plum")]
            .into_iter()
            .collect()
    }

    #[test]
    fn highlight_wraps_around() {
        let options = fruit();

        assert_eq!(options.next_after(None).as_deref(), Some("apple"));
        assert_eq!(options.next_after(Some(&"plum".into())).as_deref(), Some("apple"));
        assert_eq!(options.previous_before(None).as_deref(), Some("plum"));
        assert_eq!(options.previous_before(Some(&"apple".into())).as_deref(), Some("plum"));
        assert_eq!(options.previous_before(Some(&"plum".into())).as_deref(), Some("pear"));
    }

    #[test]
    fn empty_options_have_no_highlight() {
        let options = SelectOptions::new();

        assert!(options.next_after(None).is_none());
        assert!(options.previous_before(None).is_none());
    }

    #[test]
    fn unknown_value_is_an_error() {
        let options = fruit();

        assert_eq!(options.label(&"pear".into()), Ok(&SharedString::from("Pear")));
        assert_eq!(
            options.label(&"kiwi".into()),
            Err(SelectError::UnknownOption("kiwi".into()))
        );
    }

    #[test]
    fn pushing_existing_value_keeps_position() {
        let mut options = fruit();
        options.push("apple", "Green apple");

        let values: Vec<&str> = options.iter().map(|(value, _)| &**value).collect();
        assert_eq!(values, ["apple", "pear", "plum"]);
        assert_eq!(options.len(), 3);
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::theme::Theme;
    use gpui::{AppContext, Modifiers, TestAppContext, VisualTestContext};

    struct SelectTestView {
        changes: Rc<RefCell<Vec<Option<SharedString>>>>,
    }

    impl gpui::Render for SelectTestView {
        fn render(
            &mut self,
            _window: &mut Window,
            _cx: &mut gpui::Context<Self>,
        ) -> impl IntoElement {
            let changes = self.changes.clone();

            div().size_full().child(
                Select::new("fruit")
                    .w(px(160.))
                    .option("apple", "Apple")
                    .option("pear", "Pear")
                    .on_change(move |value, _window, _cx| changes.borrow_mut().push(value.clone())),
            )
        }
    }

    fn open(
        cx: &mut TestAppContext,
    ) -> (VisualTestContext, Rc<RefCell<Vec<Option<SharedString>>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));

        let window = cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);
            init(cx);
            let changes = changes.clone();
            cx.open_window(Default::default(), |_window, cx| {
                cx.new(|_cx| SelectTestView { changes })
            })
            .unwrap()
        });

        let mut cx = VisualTestContext::from_window(window.into(), cx);
        cx.run_until_parked();

        let bounds = cx.debug_bounds("select-fruit").expect("select should be rendered");
        cx.simulate_mouse_move(bounds.center(), None::<MouseButton>, Modifiers::none());
        cx.simulate_click(bounds.center(), Modifiers::none());
        cx.run_until_parked();

        (cx, changes)
    }

    #[gpui::test]
    fn test_keyboard_selection_wraps(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx);

        // apple, pear, apple
        cx.simulate_keystrokes("down down down enter");
        cx.run_until_parked();

        assert_eq!(*changes.borrow(), vec![Some(SharedString::from("apple"))]);
    }

    #[gpui::test]
    fn test_clicking_an_item_selects_it(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx);

        let bounds = cx
            .debug_bounds("select-item-fruit-pear")
            .expect("menu item should be rendered");
        cx.simulate_mouse_move(bounds.center(), None::<MouseButton>, Modifiers::none());
        cx.simulate_click(bounds.center(), Modifiers::none());
        cx.run_until_parked();

        assert_eq!(*changes.borrow(), vec![Some(SharedString::from("pear"))]);
        assert!(cx.debug_bounds("select-item-fruit-pear").is_none());
    }

    #[gpui::test]
    fn test_escape_closes_without_change(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx);

        cx.simulate_keystrokes("down escape");
        cx.run_until_parked();

        assert!(changes.borrow().is_empty());
        assert!(cx.debug_bounds("select-item-fruit-apple").is_none());
    }
}
