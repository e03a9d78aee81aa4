#![allow(missing_docs)] // Derive macros generate undocumented methods.

cfg_if::cfg_if!(
    if #[cfg(feature = "assets")] {
        use std::borrow::Cow;

        use gpui::Result;
        use rust_embed::RustEmbed;

        use crate::assets::assets::AssetProvider;

        /// Icons bundled with the mosaic crate.
        #[derive(RustEmbed)]
        #[folder = "assets/"]
        #[include = "icons/**/*.svg"]
        #[exclude = "*.DS_Store"]
        pub struct MosaicAssets;

        impl AssetProvider for MosaicAssets {
            fn get(&self, path: &str) -> Option<Cow<'static, [u8]>> {
                <Self as RustEmbed>::get(path).map(|f| f.data)
            }

            fn list(&self, path: &str) -> Result<Vec<SharedString>> {
                Ok(MosaicAssets::iter()
                    .filter_map(|p| p.starts_with(path).then(|| p.into()))
                    .collect())
            }
        }
    }
);

use enum_assoc::Assoc;
use gpui::SharedString;

/// Built-in icons. Without the `assets` feature the app's own asset source must
/// provide these paths.
#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq)]
#[func(pub fn path(&self) -> SharedString)]
pub enum MosaicIconKind {
    #[assoc(path = "icons/checkmark.svg".into())]
    Checkmark,
    #[assoc(path = "icons/arrow_down.svg".into())]
    ArrowDown,
    #[assoc(path = "icons/arrow_left.svg".into())]
    ArrowLeft,
    #[assoc(path = "icons/arrow_right.svg".into())]
    ArrowRight,
    #[assoc(path = "icons/calendar.svg".into())]
    Calendar,
    #[assoc(path = "icons/close.svg".into())]
    Close,
    #[assoc(path = "icons/info.svg".into())]
    Info,
    #[assoc(path = "icons/success.svg".into())]
    Success,
    #[assoc(path = "icons/warning.svg".into())]
    Warning,
    #[assoc(path = "icons/error.svg".into())]
    Error,
    #[assoc(path = "icons/loading.svg".into())]
    Loading,
}

impl From<MosaicIconKind> for SharedString {
    fn from(icon: MosaicIconKind) -> Self {
        icon.path()
    }
}

#[cfg(all(test, feature = "assets"))]
mod tests {
    use super::*;

    const ALL: [MosaicIconKind; 11] = [
        MosaicIconKind::Checkmark,
        MosaicIconKind::ArrowDown,
        MosaicIconKind::ArrowLeft,
        MosaicIconKind::ArrowRight,
        MosaicIconKind::Calendar,
        MosaicIconKind::Close,
        MosaicIconKind::Info,
        MosaicIconKind::Success,
        MosaicIconKind::Warning,
        MosaicIconKind::Error,
        MosaicIconKind::Loading,
    ];

    #[test]
    fn every_icon_is_bundled() {
        for icon in ALL {
            assert!(
                MosaicAssets.get(&icon.path()).is_some(),
                "{icon:?} is missing from the bundle"
            );
        }
    }

    #[test]
    fn list_filters_by_prefix() {
        let icons = MosaicAssets.list("icons/").unwrap();

        assert!(icons.len() >= ALL.len());
        assert!(MosaicAssets.list("fonts/").unwrap().is_empty());
    }
}
