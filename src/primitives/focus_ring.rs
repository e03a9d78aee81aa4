use std::time::Duration;

use gpui::{
    CornersRefinement, ElementId, FocusHandle, IntoElement, Pixels, RenderOnce, prelude::*, px,
};
use gpui_squircle::{SquircleStyleRefinement, SquircleStyled, squircle};

use crate::{conditional_transition, theme::ThemeExt, utils::RgbaExt};

/// How far outside its final position the ring starts when focus arrives.
const SPREAD: f32 = 8.;

/// Accent ring drawn around a focused component.
#[derive(IntoElement)]
pub struct FocusRing {
    id: ElementId,
    focus_handle: FocusHandle,
    style: SquircleStyleRefinement,
}

impl FocusRing {
    pub fn new(id: impl Into<ElementId>, focus_handle: FocusHandle) -> Self {
        Self {
            id: id.into(),
            focus_handle,
            style: SquircleStyleRefinement::default(),
        }
    }
}

impl SquircleStyled for FocusRing {
    fn style(&mut self) -> &mut gpui::StyleRefinement {
        &mut self.style.inner
    }

    fn outer_style(&mut self) -> &mut SquircleStyleRefinement {
        &mut self.style
    }
}

impl RenderOnce for FocusRing {
    fn render(self, window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let accent_color = cx.get_theme().variants.active(cx).colors.accent.primary;
        let is_focused = self.focus_handle.is_focused(window);

        let ring_transition = conditional_transition!(
            self.id.clone(),
            window,
            cx,
            Duration::from_millis(365),
            {
                is_focused => 1f32,
                _ => 0.
            }
        );
        let delta: f32 = *ring_transition.evaluate(window, cx);
        let spread = (1. - delta) * SPREAD;

        squircle()
            .absolute()
            .inset(px(-spread))
            .border(px(3.))
            .border_outside()
            .border_color(accent_color.alpha(delta * 0.3))
            .map(|mut this| {
                this.outer_style().corner_radii =
                    grow_corner_radii(&self.style.corner_radii, px(8.), px(spread + 1.));
                this
            })
    }
}

fn grow_corner_radii(
    corner_radii: &CornersRefinement<Pixels>,
    default: Pixels,
    by: Pixels,
) -> CornersRefinement<Pixels> {
    let grow = |radius: Option<Pixels>| Some(radius.unwrap_or(default) + by);

    CornersRefinement {
        top_left: grow(corner_radii.top_left),
        top_right: grow(corner_radii.top_right),
        bottom_right: grow(corner_radii.bottom_right),
        bottom_left: grow(corner_radii.bottom_left),
    }
}
