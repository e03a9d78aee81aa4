use std::time::Duration;

use gpui::{
    App, CursorStyle, ElementId, Entity, InteractiveElement, IntoElement, KeyBinding, KeyDownEvent,
    Length, MouseButton, ParentElement, RenderOnce, SharedString, StatefulInteractiveElement,
    Styled, Window, actions, div, prelude::FluentBuilder, px, relative,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;

use crate::{
    conditional_transition,
    controlled::{ChangeHandler, Controlled, commit_change, use_controlled},
    primitives::{CursorBlink, FocusRing, TextEdit},
    theme::{ThemeExt, ThemeLayerKind},
    utils::{ElementIdExt, PixelsExt, TestSelectorExt, disabled_transition},
};

actions!(mosaic_input, [Backspace, Delete, Left, Right, Home, End]);

const KEY_CONTEXT: &str = "MosaicInput";

pub(crate) fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("backspace", Backspace, Some(KEY_CONTEXT)),
        KeyBinding::new("delete", Delete, Some(KEY_CONTEXT)),
        KeyBinding::new("left", Left, Some(KEY_CONTEXT)),
        KeyBinding::new("right", Right, Some(KEY_CONTEXT)),
        KeyBinding::new("home", Home, Some(KEY_CONTEXT)),
        KeyBinding::new("end", End, Some(KEY_CONTEXT)),
    ]);
}

/// One keystroke's worth of editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Insert(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

impl EditCommand {
    /// Applies the command, refusing inserts that would push the text past `max_length`
    /// graphemes. Returns whether the text changed.
    pub fn apply(&self, edit: &mut TextEdit, max_length: Option<usize>) -> bool {
        match self {
            Self::Insert(input) => {
                let before = edit.text().len();
                let mut next = edit.clone();
                next.insert(input);

                if max_length.is_some_and(|max| next.grapheme_count() > max) {
                    return false;
                }

                *edit = next;
                edit.text().len() != before
            }
            Self::Backspace => edit.backspace(),
            Self::Delete => edit.delete(),
            Self::Left => {
                edit.move_left();
                false
            }
            Self::Right => {
                edit.move_right();
                false
            }
            Self::Home => {
                edit.move_to_start();
                false
            }
            Self::End => {
                edit.move_to_end();
                false
            }
        }
    }
}

/// A single-line text field.
#[derive(IntoElement)]
pub struct Input {
    id: ElementId,
    layer: ThemeLayerKind,
    value: Option<SharedString>,
    default_value: Option<SharedString>,
    placeholder: Option<SharedString>,
    max_length: Option<usize>,
    invalid: bool,
    disabled: bool,
    width: Length,
    on_change: Option<ChangeHandler<SharedString>>,
}

impl Input {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            value: None,
            default_value: None,
            placeholder: None,
            max_length: None,
            invalid: false,
            disabled: false,
            width: Length::Auto,
            on_change: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
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

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Caps the text at `max_length` graphemes.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
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
        on_change: impl Fn(&SharedString, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

/// Everything a key handler needs to edit the field.
#[derive(Clone)]
struct EditTarget {
    state: Entity<Controlled<SharedString>>,
    cursor: Entity<usize>,
    blink: Entity<CursorBlink>,
    max_length: Option<usize>,
    on_change: std::rc::Rc<Option<ChangeHandler<SharedString>>>,
}

impl EditTarget {
    fn run(&self, command: EditCommand, window: &mut Window, cx: &mut App) {
        let text = self.state.read(cx).value().to_string();
        let mut edit = TextEdit::with_cursor(text, *self.cursor.read(cx));

        let changed = command.apply(&mut edit, self.max_length);

        let cursor = edit.cursor();
        self.cursor.update(cx, |this, cx| {
            *this = cursor;
            cx.notify();
        });
        self.blink.update(cx, |blink, cx| blink.restart(cx));

        if changed {
            commit_change(
                &self.state,
                SharedString::from(edit.into_text()),
                (*self.on_change).as_ref(),
                window,
                cx,
            );
        }
    }
}

impl RenderOnce for Input {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let secondary_text_color = cx.get_theme().variants.active(cx).colors.text.secondary;
        let primary_accent_color = cx.get_theme().variants.active(cx).colors.accent.primary;
        let destructive_accent_color = cx.get_theme().variants.active(cx).colors.accent.destructive;
        let background_color = self.layer.resolve(cx);
        let border_color = self.layer.next().resolve(cx);
        let border_hover_color = border_color.lerp(&primary_text_color, 0.07);
        let font_family = cx.get_theme().layout.text.default_font.family[0].clone();
        let line_height = cx.get_theme().layout.text.default_font.line_height;
        let text_size = cx.get_theme().layout.text.default_font.sizes.body;
        let corner_radius = cx.get_theme().layout.corner_radii.md;
        let horizontal_padding = cx.get_theme().layout.padding.lg;
        let vertical_padding = cx
            .get_theme()
            .layout
            .size
            .lg
            .padding_needed_for_height(window, text_size, line_height);

        let state = use_controlled(
            self.id.with_suffix("state:value"),
            window,
            cx,
            self.value,
            self.default_value,
        );
        let text = state.read(cx).value().clone();

        let cursor =
            window.use_keyed_state(self.id.with_suffix("state:cursor"), cx, |_window, _cx| {
                usize::MAX
            });
        let blink =
            window.use_keyed_state(self.id.with_suffix("state:blink"), cx, |_window, _cx| {
                CursorBlink::new()
            });

        let edit = TextEdit::with_cursor(text.to_string(), *cursor.read(cx));

        let is_invalid = self.invalid;
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
            Duration::from_millis(400),
            {
                is_invalid => destructive_accent_color,
                is_focus => primary_accent_color,
                is_hover => border_hover_color,
                _ => border_color
            }
        );

        let show_cursor = is_focus && blink.read(cx).visible();
        let (before, after) = edit.split();

        let text_row = if text.is_empty() && !is_focus {
            div()
                .text_color(secondary_text_color)
                .child(self.placeholder.unwrap_or_default())
        } else {
            div()
                .flex()
                .items_center()
                .text_color(primary_text_color)
                .child(SharedString::from(before.to_string()))
                .child(
                    div()
                        .w(px(1.))
                        .h(relative(1.))
                        .when(show_cursor, |this| this.bg(primary_accent_color)),
                )
                .child(SharedString::from(after.to_string()))
        };

        let target = EditTarget {
            state,
            cursor,
            blink,
            max_length: self.max_length,
            on_change: std::rc::Rc::new(self.on_change),
        };
        let selector_id = self.id.clone();

        div()
            .id(self.id.clone())
            .test_selector(|| format!("input-{selector_id}"))
            .key_context(KEY_CONTEXT)
            .cursor(if is_disabled {
                CursorStyle::OperationNotAllowed
            } else {
                CursorStyle::IBeam
            })
            .relative()
            .w(self.width)
            .px(horizontal_padding)
            .py(vertical_padding)
            .flex()
            .items_center()
            .overflow_hidden()
            .text_size(text_size)
            .line_height(line_height)
            .font_family(font_family)
            .opacity(*disabled_transition.evaluate(window, cx))
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
            .child(text_row.relative())
            .when(!is_disabled, |this| {
                let on_mouse_down = target.clone();
                let on_backspace = target.clone();
                let on_delete = target.clone();
                let on_left = target.clone();
                let on_right = target.clone();
                let on_home = target.clone();
                let on_end = target.clone();
                let focus_handle_on_mouse_down = focus_handle.clone();

                this.on_hover(move |hover, _window, cx| {
                    is_hover_state.update(cx, |this, cx| {
                        *this = *hover;
                        cx.notify();
                    });
                })
                .on_mouse_down(MouseButton::Left, move |_event, window, cx| {
                    focus_handle_on_mouse_down.focus(window, cx);
                    on_mouse_down.run(EditCommand::End, window, cx);
                })
                .on_key_down(move |event: &KeyDownEvent, window, cx| {
                    let modifiers = event.keystroke.modifiers;
                    if modifiers.control || modifiers.platform || modifiers.function {
                        return;
                    }

                    if let Some(input) = event.keystroke.key_char.as_ref()
                        && !input.chars().any(char::is_control)
                    {
                        target.run(EditCommand::Insert(input.clone()), window, cx);
                        cx.stop_propagation();
                    }
                })
                .on_action(move |_: &Backspace, window, cx| {
                    on_backspace.run(EditCommand::Backspace, window, cx)
                })
                .on_action(move |_: &Delete, window, cx| {
                    on_delete.run(EditCommand::Delete, window, cx)
                })
                .on_action(move |_: &Left, window, cx| on_left.run(EditCommand::Left, window, cx))
                .on_action(move |_: &Right, window, cx| {
                    on_right.run(EditCommand::Right, window, cx)
                })
                .on_action(move |_: &Home, window, cx| on_home.run(EditCommand::Home, window, cx))
                .on_action(move |_: &End, window, cx| on_end.run(EditCommand::End, window, cx))
                .track_focus(&focus_handle)
            })
    }
}
