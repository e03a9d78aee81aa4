use unicode_segmentation::UnicodeSegmentation;

/// Single-line text with a cursor, edited one keystroke at a time.
///
/// The cursor is a byte offset that always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEdit {
    text: String,
    cursor: usize,
}

impl TextEdit {
    /// Starts with the cursor at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    /// Restores a previous cursor position, snapped into `text`.
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let mut this = Self::new(text);
        this.cursor = this.snap(cursor);
        this
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before and after the cursor.
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.cursor)
    }

    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Inserts `input` at the cursor. Line breaks are dropped.
    pub fn insert(&mut self, input: &str) {
        let input: String = input.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        if input.is_empty() {
            return;
        }

        self.text.insert_str(self.cursor, &input);
        self.cursor += input.len();
    }

    pub fn backspace(&mut self) -> bool {
        let start = self.previous_boundary(self.cursor);
        if start == self.cursor {
            return false;
        }

        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    pub fn delete(&mut self) -> bool {
        let end = self.next_boundary(self.cursor);
        if end == self.cursor {
            return false;
        }

        self.text.replace_range(self.cursor..end, "");
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.previous_boundary(self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary(self.cursor);
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    fn previous_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .rev()
            .find_map(|(idx, _)| (idx < offset).then_some(idx))
            .unwrap_or(0)
    }

    fn next_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .find_map(|(idx, _)| (idx > offset).then_some(idx))
            .unwrap_or(self.text.len())
    }

    fn snap(&self, offset: usize) -> usize {
        if offset >= self.text.len() {
            return self.text.len();
        }

        self.text
            .grapheme_indices(true)
            .map(|(idx, _)| idx)
            .take_while(|idx| *idx <= offset)
            .last()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_deleting() {
        let mut edit = TextEdit::new("helo");
        edit.move_left();
        edit.insert("l");
        assert_eq!(edit.text(), "hello");
        assert_eq!(edit.split(), ("hell", "o"));

        assert!(edit.backspace());
        assert!(edit.delete());
        assert_eq!(edit.text(), "hel");
        assert!(!edit.delete());
    }

    #[test]
    fn backspace_at_start_does_nothing() {
        let mut edit = TextEdit::new("abc");
        edit.move_to_start();

        assert!(!edit.backspace());
        assert_eq!(edit.text(), "abc");
    }

    #[test]
    fn graphemes_are_removed_whole() {
        let mut edit = TextEdit::new("ae\u{301}");
        assert_eq!(edit.grapheme_count(), 2);

        edit.backspace();
        assert_eq!(edit.text(), "a");
    }

    #[test]
    fn newlines_are_dropped() {
        let mut edit = TextEdit::new("");
        edit.insert("one\ntwo\r\n");

        assert_eq!(edit.text(), "onetwo");
        assert_eq!(edit.cursor(), 6);
    }

    #[test]
    fn restored_cursor_snaps_to_boundaries() {
        let edit = TextEdit::with_cursor("e\u{301}x", 1);
        assert_eq!(edit.cursor(), 0);

        let edit = TextEdit::with_cursor("abc", 99);
        assert_eq!(edit.cursor(), 3);
    }

    #[test]
    fn home_and_end() {
        let mut edit = TextEdit::with_cursor("abc", 1);
        edit.move_to_end();
        assert_eq!(edit.cursor(), 3);
        edit.move_to_start();
        edit.move_right();
        assert_eq!(edit.cursor(), 1);
    }
}
