use std::time::Duration;

use gpui::{
    App, CursorStyle, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce,
    StatefulInteractiveElement, Styled, Window, div, prelude::FluentBuilder, px, relative, svg,
};
use gpui_squircle::{SquircleStyled, squircle};

use super::{OverlayEntry, OverlayFamily, OverlayKind, OverlayPhase};
use crate::{
    MosaicIconKind, conditional_transition,
    theme::{ThemeExt, ThemeLayerKind, ThemeStatusKind},
    utils::{ElementIdExt, RgbaExt},
};

/// Distance the card slides while fading in or out.
const SLIDE_DISTANCE: f32 = 8.;

/// One overlay entry as drawn inside its family layer.
#[derive(IntoElement)]
pub struct OverlayCard {
    id: ElementId,
    family: OverlayFamily,
    entry: OverlayEntry,
    exit_duration: Duration,
}

impl OverlayCard {
    pub fn new(family: OverlayFamily, entry: OverlayEntry, exit_duration: Duration) -> Self {
        Self {
            id: ElementId::Name(format!("{}-{}", family.name(), entry.id).into()),
            family,
            entry,
            exit_duration,
        }
    }
}

fn status_of(kind: OverlayKind) -> ThemeStatusKind {
    match kind {
        OverlayKind::Info | OverlayKind::Loading => ThemeStatusKind::Info,
        OverlayKind::Success => ThemeStatusKind::Success,
        OverlayKind::Warning => ThemeStatusKind::Warning,
        OverlayKind::Error => ThemeStatusKind::Error,
    }
}

impl RenderOnce for OverlayCard {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.get_theme();
        let corner_radius = theme.layout.corner_radii.lg;
        let padding = theme.layout.padding.lg;
        let icon_size = theme.layout.size.md;
        let text_size = theme.layout.text.default_font.sizes.body;
        let text_color = theme.variants.active(cx).colors.text.primary;
        let background_color = ThemeLayerKind::Secondary.resolve(cx);
        let border_color = ThemeLayerKind::Secondary.next().resolve(cx);
        let status_color = status_of(self.entry.kind).resolve(cx);

        let is_shown = self.entry.phase == OverlayPhase::Visible;

        let presence_transition = conditional_transition!(
            self.id.with_suffix("state:transition:presence"),
            window,
            cx,
            self.exit_duration,
            {
                is_shown => 1f32,
                _ => 0.
            }
        );
        let presence = *presence_transition.evaluate(window, cx);

        let family = self.family;
        let id = self.entry.id;
        let content = self.entry.payload.content.clone();

        div()
            .id(self.id.clone())
            .relative()
            .top(px((1. - presence) * -SLIDE_DISTANCE))
            .opacity(presence)
            .min_w(px(160.))
            .max_w(px(420.))
            .flex()
            .items_center()
            .gap(padding)
            .p(padding)
            .text_size(text_size)
            .text_color(text_color)
            .child(
                squircle()
                    .absolute_expand()
                    .rounded(corner_radius)
                    .bg(background_color)
                    .border(px(1.))
                    .border_inside()
                    .border_color(border_color),
            )
            .child(
                svg()
                    .flex_none()
                    .size(icon_size)
                    .text_color(status_color)
                    .path(self.entry.icon_path()),
            )
            .when_some(self.entry.payload.text.clone(), |this, text| {
                this.child(div().flex_1().min_w_0().child(text))
            })
            .when_some(content, |this, content| this.child(content(window, cx)))
            .when(family == OverlayFamily::Alert, |this| {
                this.child(
                    div()
                        .id(self.id.with_suffix("close"))
                        .flex_none()
                        .size(icon_size)
                        .cursor(CursorStyle::PointingHand)
                        .child(
                            svg()
                                .size(relative(0.7))
                                .text_color(text_color.alpha(0.6))
                                .path(MosaicIconKind::Close.path()),
                        )
                        .on_click(move |_event, _window, cx| {
                            super::close(family, id, cx);
                        }),
                )
            })
    }
}
