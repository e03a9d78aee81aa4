use std::any::TypeId;

use gpui::{
    AnyView, App, Context, InteractiveElement, IntoElement, ParentElement, Render, Styled, Window,
    WindowHandle, div,
};

use crate::overlay::OverlayRegistry;

/// Top-level view of a window. Renders the app's view and, above it, the layer of
/// every overlay family that has been mounted.
///
/// ```ignore
/// cx.open_window(options, |window, cx| {
///     let main = cx.new(|cx| MainView::new(window, cx));
///     cx.new(|cx| Root::new(main, window, cx))
/// });
///
/// // Anywhere afterwards:
/// gpui_mosaic::toast::success("Saved", cx);
/// ```
pub struct Root {
    view: AnyView,
}

impl Root {
    pub fn new(view: impl Into<AnyView>, _window: &mut Window, _cx: &mut Context<Self>) -> Self {
        Self { view: view.into() }
    }

    /// Finds a Root window with a specific child view.
    pub fn find_window<V: Render>(cx: &App) -> Option<WindowHandle<Root>> {
        cx.windows().iter().find_map(|window| {
            let window = window.downcast::<Root>()?;
            let is_of_view = window
                .read(cx)
                .map(|root| root.is_of_view::<V>())
                .unwrap_or(false);

            is_of_view.then_some(window)
        })
    }

    /// Checks if the child view of this root is of the specific type.
    pub fn is_of_view<V: Render>(&self) -> bool {
        TypeId::of::<V>() == self.view.entity_type()
    }
}

impl Render for Root {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .id("root")
            .size_full()
            .relative()
            .child(self.view.clone())
            .children(OverlayRegistry::mounted(cx))
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use super::*;
    use crate::{
        overlay::{OverlayConfig, OverlayFamily, toast},
        theme::{Theme, ThemeExt},
    };
    use gpui::{AppContext, TestAppContext, VisualTestContext};

    struct TestView;

    impl Render for TestView {
        fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
            div().id("test-view").size_full().child("Test Content")
        }
    }

    struct OtherView;

    impl Render for OtherView {
        fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
            div()
        }
    }

    fn open_root(cx: &mut TestAppContext) -> WindowHandle<Root> {
        cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);
            OverlayRegistry::install(OverlayConfig::default(), cx);

            cx.open_window(Default::default(), |window, cx| {
                let test_view = cx.new(|_cx| TestView);
                cx.new(|cx| Root::new(test_view, window, cx))
            })
            .unwrap()
        })
    }

    #[gpui::test]
    fn test_find_window_by_view(cx: &mut TestAppContext) {
        let window = open_root(cx);

        cx.update(|cx| {
            assert_eq!(Root::find_window::<TestView>(cx), Some(window));
            assert!(Root::find_window::<OtherView>(cx).is_none());
        });
    }

    #[gpui::test]
    fn test_root_renders_mounted_overlays(cx: &mut TestAppContext) {
        let window = open_root(cx);
        let cx = &mut VisualTestContext::from_window(window.into(), cx);

        cx.update(|_window, cx| {
            toast::success("Saved", cx);
        });
        cx.run_until_parked();

        cx.update(|_window, cx| {
            let mounted = OverlayRegistry::mounted(cx);
            assert_eq!(mounted.len(), 1);
            assert_eq!(mounted[0].read(cx).family(), OverlayFamily::Toast);
        });
    }
}
