use gpui::{
    Hsla, IntoElement, Length, Radians, RenderOnce, SharedString, Styled, Transformation,
    prelude::FluentBuilder, px, svg,
};

use crate::{MosaicIconKind, theme::ThemeExt};

/// An SVG icon tinted with the theme's text color unless a color is set.
#[derive(IntoElement)]
pub struct Icon {
    path: SharedString,
    size: Option<Length>,
    rotate: Radians,
    color: Option<Hsla>,
}

impl Icon {
    /// Creates a new icon from an SVG asset path.
    pub fn new(path: impl Into<SharedString>) -> Self {
        Self {
            path: path.into(),
            size: None,
            rotate: Radians(0.),
            color: None,
        }
    }

    pub fn kind(kind: MosaicIconKind) -> Self {
        Self::new(kind.path())
    }

    /// Sets uniform width and height. Defaults to 14px.
    pub fn size(mut self, size: impl Into<Length>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn color(mut self, color: impl Into<Hsla>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn rotate(mut self, rotate: impl Into<Radians>) -> Self {
        self.rotate = rotate.into();
        self
    }
}

impl RenderOnce for Icon {
    fn render(self, _window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let primary_text_color = cx.get_theme().variants.active(cx).colors.text.primary;
        let size = self.size.unwrap_or_else(|| px(14.).into());

        svg()
            .path(self.path)
            .flex_none()
            .text_color(primary_text_color)
            .w(size)
            .min_w(size)
            .h(size)
            .min_h(size)
            .with_transformation(Transformation::rotate(self.rotate))
            .when_some(self.color, |this, color| this.text_color(color))
    }
}
