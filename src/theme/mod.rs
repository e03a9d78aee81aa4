//! Re-export of [`gpui_mosaic_theme`], so components only depend on `crate::theme`.

pub use gpui_mosaic_theme::*;
