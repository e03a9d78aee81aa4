use std::{
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use gpui::{AnyElement, App, SharedString, Window};

use crate::assets::MosaicIconKind;

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `show`, used to update or close one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub(crate) fn next() -> Self {
        Self(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl OverlayKind {
    pub fn icon(&self) -> MosaicIconKind {
        match self {
            Self::Info => MosaicIconKind::Info,
            Self::Success => MosaicIconKind::Success,
            Self::Warning => MosaicIconKind::Warning,
            Self::Error => MosaicIconKind::Error,
            Self::Loading => MosaicIconKind::Loading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    /// Mounted, waiting one frame so the enter animation has a start state.
    Entering,
    Visible,
    /// Playing the exit animation.
    Leaving,
    Removed,
}

impl OverlayPhase {
    /// Entering and visible entries count towards stacks and can still be closed.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Entering | Self::Visible)
    }
}

/// Builds custom body content for an overlay on every render.
pub type OverlayContent = Rc<dyn Fn(&mut Window, &mut App) -> AnyElement + 'static>;

/// What an overlay displays.
#[derive(Clone, Default)]
pub struct OverlayPayload {
    pub text: Option<SharedString>,
    pub content: Option<OverlayContent>,
    pub icon: Option<SharedString>,
}

impl fmt::Debug for OverlayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayPayload")
            .field("text", &self.text)
            .field("content", &self.content.is_some())
            .field("icon", &self.icon)
            .finish()
    }
}

/// Options accepted by `show`.
///
/// A `duration` of `None` uses the family's configured default. `Some(Duration::ZERO)`
/// keeps the overlay until it is closed.
#[derive(Debug, Clone, Default)]
pub struct OverlayOptions {
    pub kind: OverlayKind,
    pub payload: OverlayPayload,
    pub duration: Option<Duration>,
}

impl OverlayOptions {
    pub fn new(text: impl Into<SharedString>) -> Self {
        Self {
            payload: OverlayPayload {
                text: Some(text.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: OverlayKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Keeps the overlay open until it is closed explicitly.
    pub fn sticky(self) -> Self {
        self.duration(Duration::ZERO)
    }

    pub fn icon(mut self, path: impl Into<SharedString>) -> Self {
        self.payload.icon = Some(path.into());
        self
    }

    pub fn content<E: gpui::IntoElement>(
        mut self,
        content: impl Fn(&mut Window, &mut App) -> E + 'static,
    ) -> Self {
        self.payload.content = Some(Rc::new(move |window, cx| {
            content(window, cx).into_any_element()
        }));
        self
    }
}

impl From<&'static str> for OverlayOptions {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}

impl From<String> for OverlayOptions {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<SharedString> for OverlayOptions {
    fn from(text: SharedString) -> Self {
        Self::new(text)
    }
}

/// Partial changes applied by `update`. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct OverlayPatch {
    pub kind: Option<OverlayKind>,
    pub text: Option<SharedString>,
    pub icon: Option<SharedString>,
    pub duration: Option<Duration>,
}

impl OverlayPatch {
    pub fn kind(mut self, kind: OverlayKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn text(mut self, text: impl Into<SharedString>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn icon(mut self, path: impl Into<SharedString>) -> Self {
        self.icon = Some(path.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[derive(Debug, Clone)]
pub struct OverlayEntry {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub payload: OverlayPayload,
    /// Zero means no auto-dismiss.
    pub duration: Duration,
    pub phase: OverlayPhase,
}

impl OverlayEntry {
    pub(crate) fn new(options: OverlayOptions, default_duration: Duration) -> Self {
        Self {
            id: OverlayId::next(),
            kind: options.kind,
            payload: options.payload,
            duration: options.duration.unwrap_or(default_duration),
            phase: OverlayPhase::Entering,
        }
    }

    pub fn auto_dismisses(&self) -> bool {
        !self.duration.is_zero()
    }

    /// The icon to draw, either the explicit one or the kind's default.
    pub fn icon_path(&self) -> SharedString {
        self.payload
            .icon
            .clone()
            .unwrap_or_else(|| self.kind.icon().path())
    }

    pub(crate) fn apply(&mut self, patch: OverlayPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(text) = patch.text {
            self.payload.text = Some(text);
        }
        if let Some(icon) = patch.icon {
            self.payload.icon = Some(icon);
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = OverlayId::next();
        let b = OverlayId::next();

        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn explicit_duration_overrides_family_default() {
        let default = Duration::from_secs(3);

        let entry = OverlayEntry::new(OverlayOptions::new("saved"), default);
        assert_eq!(entry.duration, default);
        assert!(entry.auto_dismisses());

        let sticky = OverlayEntry::new(OverlayOptions::new("saved").sticky(), default);
        assert!(!sticky.auto_dismisses());
        assert_eq!(sticky.phase, OverlayPhase::Entering);
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut entry = OverlayEntry::new(
            OverlayOptions::new("uploading").kind(OverlayKind::Loading),
            Duration::ZERO,
        );

        entry.apply(OverlayPatch::default().kind(OverlayKind::Success));

        assert_eq!(entry.kind, OverlayKind::Success);
        assert_eq!(entry.payload.text.as_deref(), Some("uploading"));
        assert_eq!(entry.duration, Duration::ZERO);
        assert_eq!(entry.icon_path(), MosaicIconKind::Success.path());
    }
}
