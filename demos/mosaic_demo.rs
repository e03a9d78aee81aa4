use std::time::Duration;

use gpui::{
    App, AppContext, Application, Bounds, Context, FocusHandle, KeyBinding, Menu, SharedString,
    TitlebarOptions, Window, WindowBounds, WindowOptions, actions, div, point, prelude::*, px,
    size,
};
use tracing_subscriber::EnvFilter;

use gpui_mosaic::{
    MosaicAssets, alert, assets,
    components::{
        Badge, Cascader, CascaderOption, Checkbox, CheckboxGroup, DatePicker, Input, InputOtp,
        Popover, PopoverTrigger, RadioGroup, Select, Switch,
    },
    message,
    overlay::{OverlayKind, OverlayOptions, OverlayPatch},
    spin,
    theme::{JsonFileStore, Theme, ThemeExt, ThemeStore, load_or_default},
    toast,
    views::Root,
};

struct Gallery {
    focus_handle: FocusHandle,
    store: JsonFileStore,
    notifications: bool,
    unread: u32,
}

actions!(window, [TabNext, TabPrev]);

fn demo_button(
    id: &'static str,
    label: &'static str,
    cx: &App,
    on_click: impl Fn(&mut Window, &mut App) + 'static,
) -> impl IntoElement {
    let colors = &cx.get_theme().variants.active(cx).colors;

    div()
        .id(id)
        .px(px(12.))
        .py(px(6.))
        .rounded(px(8.))
        .bg(colors.background.tertiary)
        .text_color(colors.text.primary)
        .cursor_pointer()
        .child(label)
        .on_click(move |_event, window, cx| on_click(window, cx))
}

impl Render for Gallery {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        gpui_mosaic::init_for_window(window, cx);

        let theme = cx.get_theme();
        let background = theme.variants.active(cx).colors.background.primary;
        let text_size = theme.layout.text.default_font.sizes.body;
        let preference = cx.theme_preference();

        let region = Cascader::new("region").options([
            CascaderOption::new("europe", "Europe")
                .child(CascaderOption::new("berlin", "Berlin"))
                .child(CascaderOption::new("lisbon", "Lisbon")),
            CascaderOption::new("asia", "Asia").child(CascaderOption::new("tokyo", "Tokyo")),
        ]);

        div()
            .tab_group()
            .track_focus(&self.focus_handle)
            .size_full()
            .text_size(text_size)
            .bg(background)
            .flex()
            .flex_col()
            .items_center()
            .gap(px(16.))
            .p(px(48.))
            .child(
                div()
                    .flex()
                    .gap(px(12.))
                    .items_center()
                    .child(
                        Switch::new("notifications")
                            .checked(self.notifications)
                            .on_change(cx.listener(|view, checked, _window, cx| {
                                view.notifications = *checked;
                                cx.notify();
                            })),
                    )
                    .child(Checkbox::new("remember").label("Remember me").default_checked(true))
                    .child(
                        Badge::new("inbox").count(self.unread).child(demo_button(
                            "inbox-button",
                            "Inbox",
                            cx,
                            |_window, cx| {
                                message::info("3 unread messages", cx);
                            },
                        )),
                    ),
            )
            .child(
                CheckboxGroup::new("fruits")
                    .options(["apple", "pear", "plum"])
                    .default_value(["pear"])
                    .horizontal(),
            )
            .child(
                RadioGroup::new("size")
                    .options(["small", "medium", "large"])
                    .default_value("medium"),
            )
            .child(
                Input::new("name")
                    .placeholder("Your name")
                    .max_length(32)
                    .disabled(!self.notifications)
                    .w(px(240.)),
            )
            .child(InputOtp::new("otp").length(4).on_complete(|code, _window, cx| {
                toast::success(format!("Code {code} accepted"), cx);
            }))
            .child(
                Select::new("fruit")
                    .option("apple", "Apple")
                    .option("pear", "Pear")
                    .option("plum", "Plum")
                    .w(px(240.)),
            )
            .child(region)
            .child(DatePicker::new("due").w(px(240.)))
            .child(
                Popover::new("help")
                    .trigger_mode(PopoverTrigger::Hover)
                    .trigger(div().child("Hover for help"))
                    .content(|_window, _cx| div().p(px(8.)).child("Popovers close each other.")),
            )
            .child(
                div()
                    .flex()
                    .gap(px(8.))
                    .child(demo_button("toast", "Toast", cx, |_window, cx| {
                        let Some(id) = toast::loading("Uploading", cx) else {
                            return;
                        };

                        cx.spawn(async move |cx| {
                            cx.background_executor().timer(Duration::from_secs(2)).await;
                            cx.update(|cx| {
                                toast::update(
                                    id,
                                    OverlayPatch::default()
                                        .kind(OverlayKind::Success)
                                        .text("Uploaded")
                                        .duration(Duration::from_secs(3)),
                                    cx,
                                )
                            })
                        })
                        .detach();
                    }))
                    .child(demo_button("alert", "Alert", cx, |_window, cx| {
                        alert::show(
                            OverlayOptions::new("Disk almost full").kind(OverlayKind::Warning),
                            cx,
                        );
                    }))
                    .child(demo_button("spin", "Spin", cx, |_window, cx| {
                        let Some(id) = spin::show("Working", cx) else {
                            return;
                        };

                        cx.spawn(async move |cx| {
                            cx.background_executor().timer(Duration::from_secs(1)).await;
                            cx.update(|cx| spin::close(id, cx))
                        })
                        .detach();
                    }))
                    .child(demo_button("clear", "Clear all", cx, |_window, cx| {
                        toast::clear(cx);
                        message::clear(cx);
                        alert::clear(cx);
                    })),
            )
            .child(
                div()
                    .id("theme-toggle")
                    .cursor_pointer()
                    .child(SharedString::from(format!("Theme: {preference:?}")))
                    .on_click(cx.listener(|view, _event, _window, cx| {
                        let next = cx.theme_preference().next();
                        cx.persist_theme_preference(next, &view.store);
                        cx.notify();
                    })),
            )
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gpui_mosaic=debug")),
        )
        .init();

    Application::new()
        .with_quit_mode(gpui::QuitMode::LastWindowClosed)
        .with_assets(assets![MosaicAssets])
        .run(|cx: &mut App| {
            gpui_mosaic::init(cx);

            cx.set_menus(vec![Menu {
                name: "Mosaic".into(),
                items: vec![],
            }]);

            let store =
                JsonFileStore::new(std::env::temp_dir().join("mosaic_demo").join("theme.json"));
            cx.set_theme(Theme::DEFAULT);
            cx.apply_theme_preference(load_or_default(&store as &dyn ThemeStore));

            let bounds = Bounds::centered(None, size(px(720.), px(900.)), cx);

            let opened = cx.open_window(
                WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(bounds)),
                    titlebar: Some(TitlebarOptions {
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(10.), px(10.))),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let gallery = cx.new(|cx| Gallery {
                        focus_handle: cx.focus_handle(),
                        store,
                        notifications: true,
                        unread: 3,
                    });
                    cx.new(|cx| Root::new(gallery, window, cx))
                },
            );

            if let Err(err) = opened {
                tracing::error!("could not open the demo window: {err}");
                cx.quit();
                return;
            }

            init_tab_indexing_actions(cx);

            cx.activate(true);
        });
}

fn init_tab_indexing_actions(cx: &mut App) {
    cx.on_action(move |_: &TabNext, cx| {
        cx.defer(move |cx| {
            let Some(window) = cx.active_window() else {
                return;
            };

            let _ = window.update(cx, move |_, window, cx| {
                window.focus_next(cx);
            });
        })
    });

    cx.on_action(move |_: &TabPrev, cx| {
        cx.defer(move |cx| {
            let Some(window) = cx.active_window() else {
                return;
            };

            let _ = window.update(cx, move |_, window, cx| {
                window.focus_prev(cx);
            });
        })
    });

    cx.bind_keys([KeyBinding::new("tab", TabNext, None)]);
    cx.bind_keys([KeyBinding::new("shift-tab", TabPrev, None)]);
}
