use gpui::{
    AnyElement, App, ElementId, IntoElement, ParentElement, RenderOnce, SharedString, Styled,
    Window, div, prelude::FluentBuilder, px,
};
use gpui_squircle::{SquircleStyled, squircle};

use crate::{
    theme::{ThemeExt, ThemeStatusKind},
    utils::SquircleExt,
};

/// Counts above this show as `"99+"` unless [`Badge::overflow`] says otherwise.
pub const DEFAULT_OVERFLOW: u32 = 99;

/// The text a badge shows for `count`, or `None` when it shows no count at all.
pub fn badge_text(count: u32, overflow: u32, show_zero: bool) -> Option<SharedString> {
    match count {
        0 if !show_zero => None,
        count if count > overflow => Some(format!("{overflow}+").into()),
        count => Some(count.to_string().into()),
    }
}

/// A count or dot pinned to the top right corner of its child.
#[derive(IntoElement)]
pub struct Badge {
    id: ElementId,
    count: u32,
    overflow: u32,
    show_zero: bool,
    dot: bool,
    status: ThemeStatusKind,
    child: Option<AnyElement>,
}

impl Badge {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            count: 0,
            overflow: DEFAULT_OVERFLOW,
            show_zero: false,
            dot: false,
            status: ThemeStatusKind::Error,
            child: None,
        }
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn overflow(mut self, overflow: u32) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn show_zero(mut self, show_zero: bool) -> Self {
        self.show_zero = show_zero;
        self
    }

    /// Draws a plain dot instead of the count. The dot hides at zero like the count does.
    pub fn dot(mut self, dot: bool) -> Self {
        self.dot = dot;
        self
    }

    pub fn status(mut self, status: ThemeStatusKind) -> Self {
        self.status = status;
        self
    }

    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.child = Some(child.into_any_element());
        self
    }

    /// What the badge will show, `None` meaning nothing is drawn.
    pub fn text(&self) -> Option<SharedString> {
        badge_text(self.count, self.overflow, self.show_zero)
    }
}

impl RenderOnce for Badge {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let height = cx.get_theme().layout.size.md;
        let padding = cx.get_theme().layout.padding.md;
        let caption_size = cx.get_theme().layout.text.default_font.sizes.caption;
        let text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let status_color = self.status.resolve(cx);

        let text = self.text();
        let is_standalone = self.child.is_none();

        let indicator = text.map(|text| {
            let indicator = div()
                .flex()
                .items_center()
                .justify_center()
                .when(!is_standalone, |this| this.absolute().top(-height / 2.).right(-height / 2.))
                .child(
                    squircle()
                        .absolute_expand()
                        .rounded(px(100.))
                        .bg(status_color)
                        .border(px(1.))
                        .border_inside()
                        .border_highlight(0.15),
                );

            if self.dot {
                indicator
                    .size(height / 2.)
                    .when(!is_standalone, |this| this.top(-height / 4.).right(-height / 4.))
            } else {
                indicator
                    .h(height)
                    .min_w(height)
                    .px(padding * 2)
                    .text_size(caption_size)
                    .text_color(text_color)
                    .child(div().relative().child(text))
            }
        });

        div()
            .id(self.id)
            .relative()
            .flex_none()
            .when_some(self.child, |this, child| this.child(child))
            .when_some(indicator, |this, indicator| this.child(indicator))
    }
}
