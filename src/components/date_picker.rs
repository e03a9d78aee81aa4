use std::{fmt::Write, rc::Rc, time::Duration};

use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};
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

/// Rows in the day grid. Six weeks fit every month.
pub const GRID_WEEKS: usize = 6;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// The first day of `date`'s month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Moves a month start by `delta` months, saturating at chrono's date range.
pub fn shift_month(month: NaiveDate, delta: i32) -> NaiveDate {
    let month = month_start(month);
    let shifted = if delta >= 0 {
        month.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        month.checked_sub_months(Months::new(delta.unsigned_abs()))
    };

    shifted.unwrap_or(month)
}

/// The dates shown for `month`, `GRID_WEEKS` full weeks starting on `week_start`.
pub fn month_grid(month: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let first = month_start(month);
    let lead = (first.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    let start = first.checked_sub_days(Days::new(lead as u64)).unwrap_or(first);

    start.iter_days().take(GRID_WEEKS * 7).collect()
}

/// Whether `date` falls within the optional inclusive bounds.
pub fn in_range(date: NaiveDate, min: Option<NaiveDate>, max: Option<NaiveDate>) -> bool {
    min.is_none_or(|min| date >= min) && max.is_none_or(|max| date <= max)
}

#[derive(Clone)]
struct PickerState {
    value: Entity<Controlled<Option<NaiveDate>>>,
    open: Entity<bool>,
    month: Entity<NaiveDate>,
    on_change: Rc<Option<ChangeHandler<Option<NaiveDate>>>>,
}

impl PickerState {
    fn set_open(&self, open: bool, cx: &mut App) {
        if open {
            let month = self
                .value
                .read(cx)
                .value()
                .unwrap_or_else(|| Local::now().date_naive());
            self.month.update(cx, |this, _cx| *this = month_start(month));
        }

        self.open.update(cx, |this, cx| {
            *this = open;
            cx.notify();
        });
    }

    fn shift(&self, delta: i32, cx: &mut App) {
        self.month.update(cx, |this, cx| {
            *this = shift_month(*this, delta);
            cx.notify();
        });
    }

    fn pick(&self, date: NaiveDate, window: &mut Window, cx: &mut App) {
        self.set_open(false, cx);
        commit_change(&self.value, Some(date), (*self.on_change).as_ref(), window, cx);
    }
}

/// A date field with a month calendar.
#[derive(IntoElement)]
pub struct DatePicker {
    id: ElementId,
    layer: ThemeLayerKind,
    value: Option<Option<NaiveDate>>,
    default_value: Option<Option<NaiveDate>>,
    placeholder: SharedString,
    format: SharedString,
    week_start: Weekday,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
    width: Length,
    disabled: bool,
    on_change: Option<ChangeHandler<Option<NaiveDate>>>,
}

impl DatePicker {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            layer: ThemeLayerKind::Tertiary,
            value: None,
            default_value: None,
            placeholder: "Select date".into(),
            format: DEFAULT_DATE_FORMAT.into(),
            week_start: Weekday::Mon,
            min: None,
            max: None,
            width: Length::Auto,
            disabled: false,
            on_change: None,
        }
    }

    pub fn layer(mut self, layer: ThemeLayerKind) -> Self {
        self.layer = layer;
        self
    }

    /// Controls the date. `None` means "no date", not "uncontrolled".
    pub fn value(mut self, value: Option<NaiveDate>) -> Self {
        self.value = Some(value);
        self
    }

    pub fn default_value(mut self, value: NaiveDate) -> Self {
        self.default_value = Some(Some(value));
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// A `chrono` format string for the field text.
    ///
    /// A string `chrono` cannot render for a date falls back to [`DEFAULT_DATE_FORMAT`].
    pub fn format(mut self, format: impl Into<SharedString>) -> Self {
        self.format = format.into();
        self
    }

    pub fn week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn min(mut self, min: NaiveDate) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: NaiveDate) -> Self {
        self.max = Some(max);
        self
    }

    pub fn w(mut self, width: impl Into<Length>) -> Self {
        self.width = width.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(
        mut self,
        on_change: impl Fn(&Option<NaiveDate>, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }
}

impl RenderOnce for DatePicker {
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
        let caption_size = cx.get_theme().layout.text.default_font.sizes.caption;
        let corner_radius = cx.get_theme().layout.corner_radii.md;
        let cell_size = cx.get_theme().layout.size.lg;
        let padding = cx.get_theme().layout.padding.md;
        let horizontal_padding = cx.get_theme().layout.padding.lg;
        let vertical_padding = cx
            .get_theme()
            .layout
            .size
            .lg
            .padding_needed_for_height(window, text_size, line_height);

        let state = PickerState {
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
            month: window.use_keyed_state(self.id.with_suffix("state:month"), cx, |_window, _cx| {
                month_start(Local::now().date_naive())
            }),
            on_change: Rc::new(self.on_change),
        };

        let selected = *state.value.read(cx).value();
        let month = *state.month.read(cx);
        let is_open = *state.open.read(cx);
        let is_disabled = self.disabled;
        let today = Local::now().date_naive();

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

        let field_text = selected.map(|date| SharedString::from(format_date(date, &self.format)));
        let id = self.id.clone();

        let panel = (is_open && !is_disabled).then(|| {
            let nav_button = |suffix: &'static str, icon: MosaicIconKind, delta: i32| {
                let state = state.clone();
                let selector_id = id.clone();

                div()
                    .id(id.with_suffix(suffix))
                    .test_selector(|| format!("date-picker-{suffix}-{selector_id}"))
                    .cursor(CursorStyle::PointingHand)
                    .size(cell_size)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(Icon::kind(icon).size(px(10.)).color(secondary_text_color))
                    .on_mouse_down(MouseButton::Left, |_event, window, _cx| {
                        window.prevent_default();
                    })
                    .on_click(move |_event, _window, cx| {
                        cx.stop_propagation();
                        state.shift(delta, cx);
                    })
            };

            let header = div()
                .flex()
                .items_center()
                .justify_between()
                .child(nav_button("previous", MosaicIconKind::ArrowLeft, -1))
                .child(
                    div()
                        .text_color(primary_text_color)
                        .child(SharedString::from(month.format("%B %Y").to_string())),
                )
                .child(nav_button("next", MosaicIconKind::ArrowRight, 1));

            let weekdays = div().flex().text_size(caption_size).children(
                (0..7u64).map(|offset| {
                    let weekday = self.week_start.num_days_from_monday() as u64 + offset;
                    let label = NaiveDate::from_isoywd_opt(2024, 1, Weekday::Mon)
                        .and_then(|monday| monday.checked_add_days(Days::new(weekday)))
                        .map(|date| date.format("%a").to_string())
                        .unwrap_or_default();

                    div()
                        .size(cell_size)
                        .flex()
                        .items_center()
                        .justify_center()
                        .text_color(secondary_text_color)
                        .child(SharedString::from(label))
                }),
            );

            let days = month_grid(month, self.week_start);
            let weeks = days.chunks(7).map(|week| {
                div().flex().children(week.iter().map(|date| {
                    let date = *date;
                    let is_selected = selected == Some(date);
                    let is_outside = date.month() != month.month();
                    let is_selectable = in_range(date, self.min, self.max);
                    let state = state.clone();
                    let selector_id = id.clone();

                    div()
                        .id(id.with_suffix(date.format("day:%Y-%m-%d").to_string()))
                        .test_selector(|| format!("date-picker-day-{selector_id}-{date}"))
                        .size(cell_size)
                        .flex()
                        .items_center()
                        .justify_center()
                        .rounded(corner_radius - padding)
                        .text_color(if is_selected {
                            primary_text_color
                        } else if is_outside || !is_selectable {
                            secondary_text_color.alpha(0.5)
                        } else {
                            primary_text_color
                        })
                        .when(is_selected, |this| this.bg(primary_accent_color))
                        .when(date == today && !is_selected, |this| {
                            this.border_1().border_color(primary_accent_color.alpha(0.5))
                        })
                        .child(SharedString::from(date.day().to_string()))
                        .when(is_selectable, |this| {
                            this.cursor(CursorStyle::PointingHand)
                                .on_mouse_down(MouseButton::Left, |_event, window, _cx| {
                                    window.prevent_default();
                                })
                                .on_click(move |_event, window, cx| {
                                    cx.stop_propagation();
                                    state.pick(date, window, cx);
                                })
                        })
                }))
            });
            let weeks: Vec<_> = weeks.collect();

            let state_for_outside = state.clone();
            let is_hover_state_for_outside = is_hover_state.clone();

            deferred(
                anchored().snap_to_window_with_margin(px(8.)).child(
                    div()
                        .id(self.id.with_suffix("panel"))
                        .occlude()
                        .pt(padding)
                        .child(
                            div()
                                .relative()
                                .flex()
                                .flex_col()
                                .p(horizontal_padding)
                                .gap(padding)
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
                                .child(header.relative())
                                .child(weekdays.relative())
                                .children(weeks),
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
            .test_selector(|| format!("date-picker-{selector_id}"))
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
                    .child(div().relative().map(|this| match field_text {
                        Some(text) => this.text_color(primary_text_color).child(text),
                        None => this
                            .text_color(secondary_text_color)
                            .child(self.placeholder.clone()),
                    }))
                    .child(
                        Icon::kind(MosaicIconKind::Calendar)
                            .size(px(12.))
                            .color(secondary_text_color),
                    ),
            )
            .when_some(panel, |this, panel| this.child(panel))
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

fn format_date(date: NaiveDate, format: &str) -> String {
    let mut text = String::new();
    if write!(text, "{}", date.format(format)).is_ok() {
        return text;
    }

    tracing::warn!(format, "unusable date format, using {DEFAULT_DATE_FORMAT}");
    date.format(DEFAULT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod calendar_tests {
    use super::*;
    use tracing_test::traced_test;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn grid_starts_on_the_week_start() {
        // 2026-10-01 is a Thursday.
        let grid = month_grid(date(2026, 10, 19), Weekday::Mon);

        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0], date(2026, 9, 28));
        assert_eq!(grid[3], date(2026, 10, 1));
        assert_eq!(grid[41], date(2026, 11, 8));
    }

    #[test]
    fn grid_with_sunday_start() {
        let grid = month_grid(date(2026, 10, 1), Weekday::Sun);

        assert_eq!(grid[0].weekday(), Weekday::Sun);
        assert_eq!(grid[4], date(2026, 10, 1));
    }

    #[test]
    fn month_starting_on_week_start_has_no_lead() {
        // 2026-06-01 is a Monday.
        assert_eq!(month_grid(date(2026, 6, 15), Weekday::Mon)[0], date(2026, 6, 1));
    }

    #[test]
    fn shifting_months_crosses_years() {
        assert_eq!(shift_month(date(2026, 12, 31), 1), date(2027, 1, 1));
        assert_eq!(shift_month(date(2026, 1, 5), -1), date(2025, 12, 1));
        assert_eq!(shift_month(date(2026, 3, 1), 0), date(2026, 3, 1));
    }

    #[test]
    fn field_text_uses_the_format() {
        assert_eq!(format_date(date(2026, 10, 19), "%d/%m/%Y"), "19/10/2026");
        assert_eq!(format_date(date(2026, 10, 19), DEFAULT_DATE_FORMAT), "2026-10-19");
    }

    #[test]
    #[traced_test]
    fn bad_format_falls_back_to_default() {
        assert_eq!(format_date(date(2026, 10, 19), "%Y/%Q"), "2026-10-19");
        assert!(logs_contain("unusable date format"));
    }

    #[test]
    fn time_fields_on_a_date_fall_back_to_default() {
        assert_eq!(format_date(date(2026, 10, 19), "%H:%M"), "2026-10-19");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let min = Some(date(2026, 1, 10));
        let max = Some(date(2026, 1, 20));

        assert!(in_range(date(2026, 1, 10), min, max));
        assert!(in_range(date(2026, 1, 20), min, max));
        assert!(!in_range(date(2026, 1, 21), min, max));
        assert!(in_range(date(1999, 1, 1), None, None));
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::theme::Theme;
    use gpui::{AppContext, Modifiers, TestAppContext, VisualTestContext};

    struct PickerTestView {
        format: &'static str,
        changes: Rc<RefCell<Vec<Option<NaiveDate>>>>,
    }

    impl gpui::Render for PickerTestView {
        fn render(
            &mut self,
            _window: &mut Window,
            _cx: &mut gpui::Context<Self>,
        ) -> impl IntoElement {
            let changes = self.changes.clone();

            div().size_full().child(
                DatePicker::new("due")
                    .format(self.format)
                    .default_value(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
                    .on_change(move |date, _window, _cx| changes.borrow_mut().push(*date)),
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

    fn open(
        cx: &mut TestAppContext,
        format: &'static str,
    ) -> (VisualTestContext, Rc<RefCell<Vec<Option<NaiveDate>>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));

        let window = cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);
            let changes = changes.clone();
            cx.open_window(Default::default(), |_window, cx| {
                cx.new(|_cx| PickerTestView { format, changes })
            })
            .unwrap()
        });
        let mut cx = VisualTestContext::from_window(window.into(), cx);
        cx.run_until_parked();

        (cx, changes)
    }

    #[gpui::test]
    fn test_bad_format_still_renders(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx, "%Y/%Q");

        assert!(cx.debug_bounds("date-picker-due").is_some());

        click(&mut cx, "date-picker-due");
        click(&mut cx, "date-picker-day-due-2026-10-20");

        assert_eq!(
            *changes.borrow(),
            vec![Some(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())]
        );
    }

    #[gpui::test]
    fn test_navigate_and_pick(cx: &mut TestAppContext) {
        let (mut cx, changes) = open(cx, DEFAULT_DATE_FORMAT);
        let cx = &mut cx;

        click(cx, "date-picker-due");
        // The panel opens on the selected month.
        assert!(cx.debug_bounds("date-picker-day-due-2026-10-19").is_some());
        assert!(cx.debug_bounds("date-picker-day-due-2026-11-25").is_none());

        click(cx, "date-picker-next-due");
        click(cx, "date-picker-day-due-2026-11-25");

        assert_eq!(
            *changes.borrow(),
            vec![Some(NaiveDate::from_ymd_opt(2026, 11, 25).unwrap())]
        );
        assert!(cx.debug_bounds("date-picker-day-due-2026-11-25").is_none());
    }
}
