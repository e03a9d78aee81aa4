use gpui::{ElementId, SharedString};

pub trait ElementIdExt {
    /// Derives a child id, used to key per-element state.
    fn with_suffix(&self, suffix: impl Into<SharedString>) -> ElementId;

    /// Derives a child id for the `index`th item of a list.
    fn with_index(&self, index: usize) -> ElementId;
}

impl ElementIdExt for ElementId {
    fn with_suffix(&self, suffix: impl Into<SharedString>) -> ElementId {
        ElementId::NamedChild(Box::new(self.clone()), suffix.into())
    }

    fn with_index(&self, index: usize) -> ElementId {
        self.with_suffix(format!("item:{index}"))
    }
}
