use std::{rc::Rc, time::Duration};

use gpui::{
    AnyElement, AnyWeakEntity, App, ElementId, Entity, EntityId, Global, InteractiveElement,
    IntoElement, ParentElement, RenderOnce, StatefulInteractiveElement, Styled, Window, anchored,
    deferred, div, prelude::FluentBuilder, px,
};
use gpui_squircle::{SquircleStyled, squircle};

use crate::{
    controlled::{ChangeHandler, Controlled, commit_change, use_controlled},
    theme::{ThemeExt, ThemeLayerKind},
    utils::{ElementIdExt, TestSelectorExt, toggle_transition},
};

type CloseFn = Rc<dyn Fn(&mut Window, &mut App)>;

struct OpenPopover {
    key: EntityId,
    /// The popover's state. Once it is released the popover has unmounted.
    owner: AnyWeakEntity,
    close: CloseFn,
}

impl OpenPopover {
    fn is_mounted(&self) -> bool {
        self.owner.upgrade().is_some()
    }
}

/// Click-triggered popovers that are currently open.
///
/// Opening one closes the others, across every window of the app. Entries whose owner
/// has been released are dropped without being closed.
#[derive(Default)]
pub struct PopoverRegistry {
    open: Vec<OpenPopover>,
}

impl Global for PopoverRegistry {}

impl PopoverRegistry {
    /// Marks `owner` as the only open popover, closing the rest.
    pub fn open_exclusive<T: 'static>(
        owner: &Entity<T>,
        close: impl Fn(&mut Window, &mut App) + 'static,
        window: &mut Window,
        cx: &mut App,
    ) {
        let key = owner.entity_id();
        let registry = cx.default_global::<Self>();

        let others: Vec<CloseFn> = registry
            .open
            .drain(..)
            .filter(|entry| entry.key != key && entry.is_mounted())
            .map(|entry| entry.close)
            .collect();
        registry.open.push(OpenPopover {
            key,
            owner: owner.downgrade().into(),
            close: Rc::new(close),
        });

        if !others.is_empty() {
            tracing::debug!(closed = others.len(), "closing other open popovers");
        }

        for close in others {
            (close)(window, cx);
        }
    }

    /// Forgets `key` without running its close callback.
    pub fn release(key: EntityId, cx: &mut App) {
        if cx.has_global::<Self>() {
            cx.global_mut::<Self>()
                .open
                .retain(|entry| entry.key != key && entry.is_mounted());
        }
    }

    pub fn is_open(key: EntityId, cx: &App) -> bool {
        cx.try_global::<Self>().is_some_and(|registry| {
            registry
                .open
                .iter()
                .any(|entry| entry.key == key && entry.is_mounted())
        })
    }

    pub fn open_count(cx: &App) -> usize {
        cx.try_global::<Self>().map_or(0, |registry| {
            registry.open.iter().filter(|entry| entry.is_mounted()).count()
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopoverTrigger {
    /// Toggles on click and closes on a click elsewhere. Only one is open at a time.
    #[default]
    Click,
    /// Opens while the pointer is over the trigger or the panel.
    Hover,
}

type PopoverContent = Rc<dyn Fn(&mut Window, &mut App) -> AnyElement>;

/// A floating panel attached below a trigger element.
#[derive(IntoElement)]
pub struct Popover {
    id: ElementId,
    layer: ThemeLayerKind,
    trigger_mode: PopoverTrigger,
    trigger: Option<AnyElement>,
    content: Option<PopoverContent>,
    open: Option<bool>,
    default_open: Option<bool>,
    on_open_change: Option<Rc<ChangeHandler<bool>>>,
}

impl Popover {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Secondary,
            trigger_mode: PopoverTrigger::default(),
            trigger: None,
            content: None,
            open: None,
            default_open: None,
            on_open_change: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    pub fn trigger_mode(mut self, mode: PopoverTrigger) -> Self {
        self.trigger_mode = mode;
        self
    }

    pub fn trigger(mut self, trigger: impl IntoElement) -> Self {
        self.trigger = Some(trigger.into_any_element());
        self
    }

    pub fn content<E: IntoElement>(
        mut self,
        content: impl Fn(&mut Window, &mut App) -> E + 'static,
    ) -> Self {
        self.content = Some(Rc::new(move |window, cx| {
            content(window, cx).into_any_element()
        }));
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    pub fn default_open(mut self, open: bool) -> Self {
        self.default_open = Some(open);
        self
    }

    pub fn on_open_change(
        mut self,
        on_open_change: impl Fn(&bool, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_open_change = Some(Rc::new(Box::new(on_open_change)));
        self
    }
}

fn set_open(
    state: &Entity<Controlled<bool>>,
    open: bool,
    mode: PopoverTrigger,
    on_open_change: &Option<Rc<ChangeHandler<bool>>>,
    window: &mut Window,
    cx: &mut App,
) {
    if mode == PopoverTrigger::Click {
        if open {
            let close_state = state.downgrade();
            let close_handler = on_open_change.clone();

            PopoverRegistry::open_exclusive(
                state,
                move |window, cx| {
                    if let Some(state) = close_state.upgrade() {
                        set_open(&state, false, mode, &close_handler, window, cx);
                    }
                },
                window,
                cx,
            );
        } else {
            PopoverRegistry::release(state.entity_id(), cx);
        }
    }

    commit_change(state, open, on_open_change.as_deref(), window, cx);
}

impl RenderOnce for Popover {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let corner_radius = cx.get_theme().layout.corner_radii.md;
        let padding = cx.get_theme().layout.padding.lg;
        let gap = cx.get_theme().layout.padding.md;
        let text_size = cx.get_theme().layout.text.default_font.sizes.body;
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let background_color = self.layer.resolve(cx);
        let border_color = self.layer.next().resolve(cx);

        let state = use_controlled(
            self.id.with_suffix("state:open"),
            window,
            cx,
            self.open,
            self.default_open,
        );
        let is_open = *state.read(cx).value();

        let is_trigger_hover_state = window.use_keyed_state(
            self.id.with_suffix("state:trigger_hover"),
            cx,
            |_window, _cx| false,
        );
        let is_panel_hover_state = window.use_keyed_state(
            self.id.with_suffix("state:panel_hover"),
            cx,
            |_window, _cx| false,
        );

        let visible_transition =
            toggle_transition(self.id.clone(), window, cx, Duration::from_millis(185), is_open);
        let visible_delta = *visible_transition.evaluate(window, cx);

        let mode = self.trigger_mode;
        let on_open_change = self.on_open_change;
        let selector_id = self.id.clone();

        let trigger = div()
            .id(self.id.with_suffix("trigger"))
            .test_selector(|| format!("popover-trigger-{selector_id}"))
            .when_some(self.trigger, |this, trigger| this.child(trigger))
            .map(|this| {
                let state = state.clone();
                let on_open_change = on_open_change.clone();
                let is_trigger_hover_state = is_trigger_hover_state.clone();
                let is_panel_hover_state = is_panel_hover_state.clone();

                match mode {
                    PopoverTrigger::Click => this
                        .on_hover(move |hover, _window, cx| {
                            is_trigger_hover_state.update(cx, |this, _cx| *this = *hover);
                        })
                        .on_click(move |_event, window, cx| {
                            let open = *state.read(cx).value();
                            set_open(&state, !open, mode, &on_open_change, window, cx);
                        }),
                    PopoverTrigger::Hover => this.on_hover(move |hover, window, cx| {
                        is_trigger_hover_state.update(cx, |this, _cx| *this = *hover);

                        let open = *state.read(cx).value();
                        let wants_open = *hover || *is_panel_hover_state.read(cx);
                        if open != wants_open {
                            set_open(&state, wants_open, mode, &on_open_change, window, cx);
                        }
                    }),
                }
            });

        let panel = self.content.filter(|_| is_open).map(|content| {
            let state = state.clone();
            let on_open_change = on_open_change.clone();
            let selector_id = self.id.clone();

            deferred(
                anchored().snap_to_window_with_margin(px(8.)).child(
                    div()
                        .id(self.id.with_suffix("panel"))
                        .test_selector(|| format!("popover-panel-{selector_id}"))
                        .occlude()
                        .pt(gap)
                        .opacity(visible_delta)
                        .child(
                            div()
                                .relative()
                                .p(padding)
                                .text_size(text_size)
                                .text_color(primary_text_color)
                                .child(
                                    squircle()
                                        .absolute_expand()
                                        .rounded(corner_radius)
                                        .bg(background_color)
                                        .border(px(1.))
                                        .border_inside()
                                        .border_color(border_color),
                                )
                                .child(div().relative().child(content(window, cx))),
                        )
                        .map(|this| match mode {
                            PopoverTrigger::Click => {
                                this.on_mouse_down_out(move |_event, window, cx| {
                                    // The trigger's own click toggles it.
                                    if *is_trigger_hover_state.read(cx) {
                                        return;
                                    }

                                    if *state.read(cx).value() {
                                        set_open(&state, false, mode, &on_open_change, window, cx);
                                    }
                                })
                            }
                            PopoverTrigger::Hover => this.on_hover(move |hover, window, cx| {
                                is_panel_hover_state.update(cx, |this, _cx| *this = *hover);

                                if !*hover && !*is_trigger_hover_state.read(cx) {
                                    set_open(&state, false, mode, &on_open_change, window, cx);
                                }
                            }),
                        }),
                ),
            )
            .priority(1)
        });

        div()
            .id(self.id.clone())
            .relative()
            .flex()
            .flex_col()
            .flex_none()
            .child(trigger)
            .when_some(panel, |this, panel| this.child(panel))
    }
}
