use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use inshort_core::ComposerConfig;
use unicode_width::UnicodeWidthStr;

/// Width assumed until the composer has been laid out
const DEFAULT_WIDTH: u16 = 80;

/// What a key press did to the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Enter without Shift/Alt: the caller should try to submit
    Submit,
    /// The draft text changed
    Changed,
    /// Only the cursor moved
    Moved,
    Ignored,
}

/// The draft being composed, plus the composer height derived from it
#[derive(Debug, Clone)]
pub struct InputState {
    buffer: String,
    /// Byte offset, always on a char boundary
    cursor: usize,
    width: u16,
    height: u16,
    min_height: u16,
    max_height: u16,
}

impl InputState {
    pub fn new(bounds: ComposerConfig) -> Self {
        let min_height = bounds.min_height.max(1);
        let max_height = bounds.max_height.max(min_height);
        Self { buffer: String::new(), cursor: 0, width: DEFAULT_WIDTH, height: min_height, min_height, max_height }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rows the composer needs for the current draft
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn min_height(&self) -> u16 {
        self.min_height
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replace the draft verbatim and re-measure
    pub fn on_change(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
        self.remeasure();
    }

    /// Set the text width available inside the composer
    pub fn set_width(&mut self, width: u16) {
        let width = width.max(1);
        if width != self.width {
            self.width = width;
            self.remeasure();
        }
    }

    pub fn on_key_down(&mut self, key: KeyEvent) -> InputAction {
        let newline_modifier = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

        match key.code {
            KeyCode::Enter if newline_modifier => {
                self.insert_char('\n');
                InputAction::Changed
            }
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
                InputAction::Changed
            }
            KeyCode::Backspace => self.edited(Self::backspace),
            KeyCode::Delete => self.edited(Self::delete),
            KeyCode::Left => self.moved(Self::move_left),
            KeyCode::Right => self.moved(Self::move_right),
            KeyCode::Home => self.moved(Self::move_home),
            KeyCode::End => self.moved(Self::move_end),
            _ => InputAction::Ignored,
        }
    }

    /// Take the trimmed draft if there is anything to send
    ///
    /// On success the draft is cleared and the height drops back to the minimum; a blank
    /// draft is left untouched.
    pub fn try_submit(&mut self) -> Option<String> {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            return None;
        }

        let submitted = trimmed.to_string();
        self.buffer.clear();
        self.cursor = 0;
        self.height = self.min_height;
        Some(submitted)
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.remeasure();
    }

    /// Insert text at the cursor as-is, newlines included
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.remeasure();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
            self.remeasure();
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.buffer.replace_range(self.cursor..next, "");
            self.remeasure();
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// The draft split into display rows at the current width
    pub fn wrapped_lines(&self) -> Vec<String> {
        wrap_lines(&self.buffer, self.width)
    }

    /// (row, column) of the cursor within [`InputState::wrapped_lines`]
    pub fn cursor_position(&self) -> (u16, u16) {
        let before = wrap_lines(&self.buffer[..self.cursor], self.width);
        let row = before.len().saturating_sub(1);
        let col = before.last().map(|line| line.width()).unwrap_or(0);
        (to_u16(row), to_u16(col))
    }

    fn edited(&mut self, op: fn(&mut Self)) -> InputAction {
        let before = self.buffer.len();
        op(self);
        if self.buffer.len() == before { InputAction::Ignored } else { InputAction::Changed }
    }

    fn moved(&mut self, op: fn(&mut Self)) -> InputAction {
        let before = self.cursor;
        op(self);
        if self.cursor == before { InputAction::Ignored } else { InputAction::Moved }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..].chars().next().map(|c| self.cursor + c.len_utf8())
    }

    /// Reset to the minimum, then grow to fit the content
    fn remeasure(&mut self) {
        self.height = self.min_height;
        self.height = measure_height(&self.buffer, self.width, self.min_height, self.max_height);
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}

/// Rows needed to show `text` at `width`, clamped to `[min, max]`
pub fn measure_height(text: &str, width: u16, min: u16, max: u16) -> u16 {
    to_u16(wrap_lines(text, width).len()).clamp(min, max.max(min))
}

/// Split on hard newlines, then soft-wrap each line to `width` columns
pub fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for line in text.split('\n') {
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(textwrap::wrap(line, width).into_iter().map(|l| l.into_owned()));
    }

    lines
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
