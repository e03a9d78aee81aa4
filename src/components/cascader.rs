use std::{rc::Rc, time::Duration};

use gpui::{
    App, CursorStyle, ElementId, Entity, InteractiveElement, IntoElement, Length, MouseButton,
    ParentElement, RenderOnce, SharedString, StatefulInteractiveElement, Styled, Window, anchored,
    deferred, div, prelude::FluentBuilder, px,
};
use gpui_squircle::{SquircleStyled, squircle};
use gpui_transitions::Lerp;

use crate::{
    MosaicIconKind,
    components::Icon,
    conditional_transition,
    controlled::{ChangeHandler, Controlled, commit_change, use_controlled},
    primitives::FocusRing,
    theme::{ThemeExt, ThemeLayerKind},
    utils::{ElementIdExt, PixelsExt, RgbaExt, TestSelectorExt, disabled_transition},
};

/// A node in a cascader tree. Nodes without children are leaves and can be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascaderOption {
    pub value: SharedString,
    pub label: SharedString,
    pub disabled: bool,
    pub children: Vec<CascaderOption>,
}

impl CascaderOption {
    pub fn new(value: impl Into<SharedString>, label: impl Into<SharedString>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: CascaderOption) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = CascaderOption>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The outcome of clicking an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeStep {
    /// A parent was clicked; its children become the next column.
    Expanded(Vec<SharedString>),
    /// A leaf was clicked; this is the full path from the root.
    Committed(Vec<SharedString>),
}

/// Walks `path` down the tree, returning the nodes along it.
pub fn resolve_path<'a>(
    options: &'a [CascaderOption],
    path: &[SharedString],
) -> Option<Vec<&'a CascaderOption>> {
    let mut level = options;
    let mut nodes = Vec::with_capacity(path.len());

    for value in path {
        let node = level.iter().find(|option| &option.value == value)?;
        nodes.push(node);
        level = &node.children;
    }

    Some(nodes)
}

/// The options shown in each column while `expanded` is open.
pub fn columns<'a>(
    options: &'a [CascaderOption],
    expanded: &[SharedString],
) -> Vec<&'a [CascaderOption]> {
    let mut columns = vec![options];

    if let Some(nodes) = resolve_path(options, expanded) {
        columns.extend(
            nodes
                .into_iter()
                .filter(|node| !node.is_leaf())
                .map(|node| node.children.as_slice()),
        );
    }

    columns
}

/// Handles a click on `value` in column `depth`, given the currently expanded path.
///
/// Returns `None` when the value isn't in that column or is disabled.
pub fn step(
    options: &[CascaderOption],
    expanded: &[SharedString],
    depth: usize,
    value: &SharedString,
) -> Option<CascadeStep> {
    let mut path: Vec<SharedString> = expanded.iter().take(depth).cloned().collect();
    if path.len() != depth {
        return None;
    }
    path.push(value.clone());

    let node = *resolve_path(options, &path)?.last()?;
    if node.disabled {
        return None;
    }

    Some(if node.is_leaf() {
        CascadeStep::Committed(path)
    } else {
        CascadeStep::Expanded(path)
    })
}

#[derive(Clone)]
struct CascaderState {
    value: Entity<Controlled<Vec<SharedString>>>,
    open: Entity<bool>,
    expanded: Entity<Vec<SharedString>>,
    options: Rc<Vec<CascaderOption>>,
    on_change: Rc<Option<ChangeHandler<Vec<SharedString>>>>,
}

impl CascaderState {
    fn set_open(&self, open: bool, cx: &mut App) {
        if open {
            // Reopen on the committed path so its columns are visible.
            let value = self.value.read(cx).value().clone();
            let expanded = match resolve_path(&self.options, &value) {
                Some(_) => value,
                None => Vec::new(),
            };
            self.expanded.update(cx, |this, _cx| *this = expanded);
        }

        self.open.update(cx, |this, cx| {
            *this = open;
            cx.notify();
        });
    }

    fn click(&self, depth: usize, value: &SharedString, window: &mut Window, cx: &mut App) {
        let expanded = self.expanded.read(cx).clone();

        match step(&self.options, &expanded, depth, value) {
            Some(CascadeStep::Expanded(path)) => {
                self.expanded.update(cx, |this, cx| {
                    *this = path;
                    cx.notify();
                });
            }
            Some(CascadeStep::Committed(path)) => {
                self.set_open(false, cx);
                commit_change(&self.value, path, (*self.on_change).as_ref(), window, cx);
            }
            None => {}
        }
    }
}

/// Picks a leaf from a tree of options, one column per level.
#[derive(IntoElement)]
pub struct Cascader {
    id: ElementId,
    layer: ThemeLayerKind,
    options: Vec<CascaderOption>,
    placeholder: SharedString,
    separator: SharedString,
    value: Option<Vec<SharedString>>,
    default_value: Option<Vec<SharedString>>,
    disabled: bool,
    width: Length,
    on_change: Option<ChangeHandler<Vec<SharedString>>>,
}

impl Cascader {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            options: Vec::new(),
            placeholder: "Select…".into(),
            separator: " / ".into(),
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

    pub fn option(mut self, option: CascaderOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = CascaderOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Text between labels of the selected path. Defaults to `" / "`.
    pub fn separator(mut self, separator: impl Into<SharedString>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn value<S: Into<SharedString>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.value = Some(path.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value<S: Into<SharedString>>(
        mut self,
        path: impl IntoIterator<Item = S>,
    ) -> Self {
        self.default_value = Some(path.into_iter().map(Into::into).collect());
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

    pub fn on_change(
        mut self,
        on_change: impl Fn(&Vec<SharedString>, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

impl RenderOnce for Cascader {
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

        let state = CascaderState {
            value: use_controlled(
                self.id.with_suffix("state:value"),
                window,
                cx,
                self.value,
                self.default_value,
            ),
            open: window.use_keyed_state(self.id.with_suffix("state:open"), cx, |_window, _cx| {
                false
            }),
            expanded: window.use_keyed_state(
                self.id.with_suffix("state:expanded"),
                cx,
                |_window, _cx| Vec::new(),
            ),
            options: Rc::new(self.options),
            on_change: Rc::new(self.on_change),
        };

        let selected = state.value.read(cx).value().clone();
        let display = resolve_path(&state.options, &selected)
            .filter(|nodes| !nodes.is_empty())
            .map(|nodes| {
                let separator: &str = &self.separator;
                let labels: Vec<&str> = nodes.iter().map(|node| &*node.label).collect();
                SharedString::from(labels.join(separator))
            });

        let is_open = *state.open.read(cx);
        let expanded = state.expanded.read(cx).clone();
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

        let menu_panel = (is_open && !is_disabled).then(|| {
            let columns = columns(&state.options, &expanded).into_iter().enumerate().map(
                |(depth, column)| {
                    div()
                        .relative()
                        .min_w(px(120.))
                        .flex()
                        .flex_col()
                        .p(padding)
                        .children(column.iter().map(|option| {
                            let is_on_path = expanded.get(depth) == Some(&option.value)
                                || (selected.get(depth) == Some(&option.value)
                                    && expanded.len() <= depth);
                            let state = state.clone();
                            let value = option.value.clone();
                            let selector_id = self.id.clone();
                            let selector_value = option.value.clone();

                            div()
                                .id(self
                                    .id
                                    .with_suffix(format!("column:{depth}"))
                                    .with_suffix(option.value.clone()))
                                .test_selector(|| {
                                    let value = selector_value;
                                    format!("cascader-option-{selector_id}-{depth}-{value}")
                                })
                                .w_full()
                                .flex()
                                .items_center()
                                .justify_between()
                                .gap(horizontal_padding)
                                .px(horizontal_padding - padding)
                                .py(vertical_padding - padding)
                                .rounded(corner_radius - padding)
                                .text_color(if option.disabled {
                                    secondary_text_color.alpha(0.5)
                                } else if is_on_path {
                                    primary_text_color
                                } else {
                                    secondary_text_color
                                })
                                .when(is_on_path, |this| this.bg(primary_accent_color.alpha(0.16)))
                                .child(option.label.clone())
                                .when(!option.is_leaf(), |this| {
                                    this.child(
                                        Icon::kind(MosaicIconKind::ArrowRight)
                                            .size(px(9.))
                                            .color(secondary_text_color),
                                    )
                                })
                                .when(!option.disabled, |this| {
                                    this.cursor(CursorStyle::PointingHand)
                                        .on_mouse_down(MouseButton::Left, |_event, window, _cx| {
                                            window.prevent_default();
                                        })
                                        .on_click(move |_event, window, cx| {
                                            cx.stop_propagation();
                                            state.click(depth, &value, window, cx);
                                        })
                                })
                        }))
                },
            );
            let columns: Vec<_> = columns.collect();

            let state_for_outside = state.clone();
            let is_hover_state_for_outside = is_hover_state.clone();

            deferred(
                anchored().snap_to_window_with_margin(px(8.)).child(
                    div()
                        .id(self.id.with_suffix("menu"))
                        .occlude()
                        .pt(padding)
                        .child(
                            div()
                                .relative()
                                .flex()
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
                                .children(columns),
                        )
                        .on_mouse_down_out(move |_event, _window, cx| {
                            if !*is_hover_state_for_outside.read(cx) {
                                state_for_outside.set_open(false, cx);
                            }
                        }),
                ),
            )
            .priority(1)
        });

        let selector_id = self.id.clone();

        div()
            .id(self.id.clone())
            .test_selector(|| format!("cascader-{selector_id}"))
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
                    .child(div().relative().map(|this| match display {
                        Some(display) => this.text_color(primary_text_color).child(display),
                        None => this
                            .text_color(secondary_text_color)
                            .child(self.placeholder.clone()),
                    }))
                    .child(
                        Icon::kind(MosaicIconKind::ArrowDown)
                            .size(px(11.))
                            .color(secondary_text_color),
                    ),
            )
            .when_some(menu_panel, |this, panel| this.child(panel))
            .when(!is_disabled, |this| {
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
                    let open = *state.open.read(cx);
                    state.set_open(!open, cx);
                })
                .track_focus(&focus_handle)
            })
    }
}

#[cfg(test)]
mod step_tests {
    use super::*;

    fn tree() -> Vec<CascaderOption> {
        vec![
            CascaderOption::new("option1", "Option 1").children([
                CascaderOption::new("sub1", "Sub 1"),
                CascaderOption::new("sub2", "Sub 2").disabled(true),
            ]),
            CascaderOption::new("option2", "Option 2"),
        ]
    }

    #[test]
    fn non_leaf_expands_then_leaf_commits_full_path() {
        let options = tree();

        let first = step(&options, &[], 0, &"option1".into());
        assert_eq!(first, Some(CascadeStep::Expanded(vec!["option1".into()])));

        let Some(CascadeStep::Expanded(expanded)) = first else {
            unreachable!();
        };
        let second = step(&options, &expanded, 1, &"sub1".into());
        assert_eq!(
            second,
            Some(CascadeStep::Committed(vec!["option1".into(), "sub1".into()]))
        );
    }

    #[test]
    fn top_level_leaf_commits_immediately() {
        assert_eq!(
            step(&tree(), &[], 0, &"option2".into()),
            Some(CascadeStep::Committed(vec!["option2".into()]))
        );
    }

    #[test]
    fn clicking_a_shallower_column_replaces_the_tail() {
        let expanded = vec![SharedString::from("option1")];

        assert_eq!(
            step(&tree(), &expanded, 0, &"option2".into()),
            Some(CascadeStep::Committed(vec!["option2".into()]))
        );
    }

    #[test]
    fn disabled_and_unknown_options_do_nothing() {
        let expanded = vec![SharedString::from("option1")];

        assert_eq!(step(&tree(), &expanded, 1, &"sub2".into()), None);
        assert_eq!(step(&tree(), &expanded, 1, &"nope".into()), None);
        // Column 2 isn't open.
        assert_eq!(step(&tree(), &expanded, 2, &"sub1".into()), None);
    }

    #[test]
    fn columns_follow_the_expanded_path() {
        let options = tree();

        assert_eq!(columns(&options, &[]).len(), 1);
        assert_eq!(columns(&options, &["option1".into()]).len(), 2);
        assert_eq!(columns(&options, &["option1".into(), "sub1".into()]).len(), 2);
        assert_eq!(columns(&options, &["missing".into()]).len(), 1);
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::theme::Theme;
    use gpui::{AppContext, Modifiers, TestAppContext, VisualTestContext};

    struct CascaderTestView {
        changes: Rc<RefCell<Vec<Vec<SharedString>>>>,
    }

    impl gpui::Render for CascaderTestView {
        fn render(
            &mut self,
            _window: &mut Window,
            _cx: &mut gpui::Context<Self>,
        ) -> impl IntoElement {
            let changes = self.changes.clone();

            div().size_full().child(
                Cascader::new("place")
                    .w(px(200.))
                    .option(
                        CascaderOption::new("option1", "Option 1")
                            .child(CascaderOption::new("sub1", "Sub 1")),
                    )
                    .option(CascaderOption::new("option2", "Option 2"))
                    .on_change(move |path, _window, _cx| changes.borrow_mut().push(path.clone())),
            )
        }
    }

    fn click(cx: &mut VisualTestContext, selector: &'static str) {
        let bounds = cx
            .debug_bounds(selector)
            .unwrap_or_else(|| panic!("{selector} should be rendered"));
        cx.simulate_mouse_move(bounds.center(), None::<MouseButton>, Modifiers::none());
        cx.simulate_click(bounds.center(), Modifiers::none());
        cx.run_until_parked();
    }

    #[gpui::test]
    fn test_non_leaf_then_leaf_reports_once(cx: &mut TestAppContext) {
        let changes = Rc::new(RefCell::new(Vec::new()));

        let window = cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);
            let changes = changes.clone();
            cx.open_window(Default::default(), |_window, cx| {
                cx.new(|_cx| CascaderTestView { changes })
            })
            .unwrap()
        });
        let cx = &mut VisualTestContext::from_window(window.into(), cx);
        cx.run_until_parked();

        click(cx, "cascader-place");
        click(cx, "cascader-option-place-0-option1");
        assert!(changes.borrow().is_empty());

        click(cx, "cascader-option-place-1-sub1");

        assert_eq!(
            *changes.borrow(),
            vec![vec![SharedString::from("option1"), SharedString::from("sub1")]]
        );
        assert!(cx.debug_bounds("cascader-option-place-0-option1").is_none());
    }
}
