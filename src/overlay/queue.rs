use super::{OverlayEntry, OverlayId, OverlayPatch, OverlayPhase};

/// Insertion-ordered overlay entries of one family.
///
/// Every phase change goes through one method here and each method only accepts the
/// transition it names, so late timer callbacks for an entry that already moved on
/// fall through as no-ops.
#[derive(Debug, Default)]
pub struct OverlayQueue {
    entries: Vec<OverlayEntry>,
}

impl OverlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OverlayEntry) -> OverlayId {
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn get_mut(&mut self, id: OverlayId) -> Option<&mut OverlayEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn phase(&self, id: OverlayId) -> Option<OverlayPhase> {
        self.get(id).map(|entry| entry.phase)
    }

    /// Entering → Visible.
    pub fn mark_visible(&mut self, id: OverlayId) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.phase == OverlayPhase::Entering => {
                entry.phase = OverlayPhase::Visible;
                true
            }
            _ => false,
        }
    }

    /// Entering/Visible → Leaving. Returns false for unknown or already leaving ids.
    pub fn begin_leave(&mut self, id: OverlayId) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.phase.is_live() => {
                entry.phase = OverlayPhase::Leaving;
                true
            }
            _ => false,
        }
    }

    /// Moves every live entry to Leaving and returns their ids.
    pub fn begin_leave_all(&mut self) -> Vec<OverlayId> {
        self.entries
            .iter_mut()
            .filter(|entry| entry.phase.is_live())
            .map(|entry| {
                entry.phase = OverlayPhase::Leaving;
                entry.id
            })
            .collect()
    }

    /// Leaving → Removed, dropping the entry.
    pub fn finish_leave(&mut self, id: OverlayId) -> Option<OverlayEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id && entry.phase == OverlayPhase::Leaving)?;

        let mut entry = self.entries.remove(index);
        entry.phase = OverlayPhase::Removed;
        Some(entry)
    }

    /// Applies `patch` to a live entry without touching its phase.
    pub fn update(&mut self, id: OverlayId, patch: OverlayPatch) -> Option<&OverlayEntry> {
        let entry = self.get_mut(id).filter(|entry| entry.phase.is_live())?;
        entry.apply(patch);
        Some(entry)
    }

    /// Ids of live entries, oldest first.
    pub fn live_ids(&self) -> Vec<OverlayId> {
        self.live().map(|entry| entry.id).collect()
    }

    pub fn live(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter().filter(|entry| entry.phase.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Every mounted entry in display order, leaving ones included.
    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::overlay::{OverlayKind, OverlayOptions};

    fn entry(text: &'static str) -> OverlayEntry {
        OverlayEntry::new(OverlayOptions::new(text), Duration::ZERO)
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut queue = OverlayQueue::new();
        let first = queue.push(entry("first"));
        let second = queue.push(entry("second"));
        let third = queue.push(entry("third"));

        assert_eq!(queue.live_ids(), vec![first, second, third]);
    }

    #[test]
    fn entry_walks_every_phase() {
        let mut queue = OverlayQueue::new();
        let id = queue.push(entry("hello"));
        assert_eq!(queue.phase(id), Some(OverlayPhase::Entering));

        assert!(queue.mark_visible(id));
        assert_eq!(queue.phase(id), Some(OverlayPhase::Visible));

        assert!(queue.begin_leave(id));
        assert_eq!(queue.phase(id), Some(OverlayPhase::Leaving));
        assert_eq!(queue.live_count(), 0);
        assert_eq!(queue.len(), 1);

        let removed = queue.finish_leave(id).unwrap();
        assert_eq!(removed.phase, OverlayPhase::Removed);
        assert!(queue.is_empty());
    }

    #[test]
    fn closing_while_entering_still_leaves() {
        let mut queue = OverlayQueue::new();
        let id = queue.push(entry("quick"));

        assert!(queue.begin_leave(id));
        assert!(!queue.mark_visible(id));
        assert_eq!(queue.phase(id), Some(OverlayPhase::Leaving));
    }

    #[test]
    fn begin_leave_is_idempotent() {
        let mut queue = OverlayQueue::new();
        let id = queue.push(entry("once"));

        assert!(queue.begin_leave(id));
        assert!(!queue.begin_leave(id));

        queue.finish_leave(id);
        assert!(!queue.begin_leave(id));
        assert!(queue.finish_leave(id).is_none());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut queue = OverlayQueue::new();
        queue.push(entry("kept"));
        let stranger = OverlayId::next();

        assert!(!queue.mark_visible(stranger));
        assert!(!queue.begin_leave(stranger));
        assert!(queue.finish_leave(stranger).is_none());
        assert!(queue.update(stranger, OverlayPatch::default()).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn finish_leave_requires_leaving() {
        let mut queue = OverlayQueue::new();
        let id = queue.push(entry("visible"));
        queue.mark_visible(id);

        assert!(queue.finish_leave(id).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn begin_leave_all_skips_leaving_entries() {
        let mut queue = OverlayQueue::new();
        let a = queue.push(entry("a"));
        let b = queue.push(entry("b"));
        let c = queue.push(entry("c"));
        queue.begin_leave(a);

        assert_eq!(queue.begin_leave_all(), vec![b, c]);
        assert_eq!(queue.live_count(), 0);
    }

    #[test]
    fn update_keeps_phase_and_rejects_leaving() {
        let mut queue = OverlayQueue::new();
        let id = queue.push(entry("loading"));
        queue.mark_visible(id);

        let updated = queue
            .update(id, OverlayPatch::default().kind(OverlayKind::Success).text("done"))
            .unwrap();
        assert_eq!(updated.phase, OverlayPhase::Visible);
        assert_eq!(updated.payload.text.as_deref(), Some("done"));

        queue.begin_leave(id);
        assert!(queue.update(id, OverlayPatch::default().text("late")).is_none());
    }
}
