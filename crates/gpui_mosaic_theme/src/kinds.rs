#![allow(missing_docs)] // Derive macros generate undocumented methods.

use enum_assoc::Assoc;
use gpui::App;

use crate::ThemeExt;

/// Background color variants from the active theme variant.
#[derive(Assoc, Clone, Copy, Debug, PartialEq, Eq)]
#[func(pub fn resolve(&self, cx: &App) -> gpui::Rgba)]
pub enum ThemeBackgroundKind {
    /// Base background for main surfaces.
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.primary)]
    Primary,
    /// Slightly elevated or grouped content.
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.secondary)]
    Secondary,
    /// Further elevated elements.
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.tertiary)]
    Tertiary,
    /// High emphasis backgrounds.
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.quaternary)]
    Quaternary,
    /// Highest emphasis backgrounds.
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.quinary)]
    Quinary,
}

/// Background layers for stacking surfaces with visual hierarchy.
///
/// `next()` gives the color for borders and nested elements on top of the layer.
#[derive(Assoc, Clone, Copy, Debug, PartialEq, Eq)]
#[func(pub fn resolve(&self, cx: &App) -> gpui::Rgba)]
#[func(pub fn next(&self) -> ThemeBackgroundKind)]
pub enum ThemeLayerKind {
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.primary)]
    #[assoc(next = ThemeBackgroundKind::Secondary)]
    Primary,
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.secondary)]
    #[assoc(next = ThemeBackgroundKind::Tertiary)]
    Secondary,
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.tertiary)]
    #[assoc(next = ThemeBackgroundKind::Quaternary)]
    Tertiary,
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.background.quaternary)]
    #[assoc(next = ThemeBackgroundKind::Quinary)]
    Quaternary,
}

impl From<ThemeLayerKind> for ThemeBackgroundKind {
    fn from(layer: ThemeLayerKind) -> Self {
        match layer {
            ThemeLayerKind::Primary => Self::Primary,
            ThemeLayerKind::Secondary => Self::Secondary,
            ThemeLayerKind::Tertiary => Self::Tertiary,
            ThemeLayerKind::Quaternary => Self::Quaternary,
        }
    }
}

/// Status colors for notifications and badges.
#[derive(Assoc, Clone, Copy, Debug, PartialEq, Eq)]
#[func(pub fn resolve(&self, cx: &App) -> gpui::Rgba)]
pub enum ThemeStatusKind {
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.status.info)]
    Info,
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.status.success)]
    Success,
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.status.warning)]
    Warning,
    #[assoc(resolve = cx.get_theme().variants.active(cx).colors.status.error)]
    Error,
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use super::*;
    use crate::{Theme, ThemeExt};
    use gpui::TestAppContext;

    #[gpui::test]
    fn test_layer_next_is_one_step_up(cx: &mut TestAppContext) {
        cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);

            assert_eq!(
                ThemeLayerKind::Primary.next().resolve(cx),
                ThemeBackgroundKind::Secondary.resolve(cx)
            );
            assert_eq!(
                ThemeLayerKind::Quaternary.next().resolve(cx),
                ThemeBackgroundKind::Quinary.resolve(cx)
            );
        });
    }

    #[gpui::test]
    fn test_status_colors_are_distinct(cx: &mut TestAppContext) {
        cx.update(|cx| {
            cx.set_theme(Theme::DEFAULT);

            assert_ne!(
                ThemeStatusKind::Success.resolve(cx),
                ThemeStatusKind::Error.resolve(cx)
            );
            assert!(ThemeStatusKind::Info.resolve(cx).a > 0.);
        });
    }
}
