//! Single line text input used by the configuration editor

/// Text being edited plus a cursor counted in characters
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    chars: Vec<char>,
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value`, cursor at the end
    pub fn with_value(value: &str) -> Self {
        let chars: Vec<char> = value.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Text split around the cursor, for rendering a caret
    pub fn split(&self) -> (String, String) {
        (
            self.chars[..self.cursor].iter().collect(),
            self.chars[self.cursor..].iter().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_in_middle() {
        let mut input = TextInputState::with_value("1280800");
        input.move_left();
        input.move_left();
        input.move_left();
        input.insert('x');
        assert_eq!(input.value(), "1280x800");
        assert_eq!(input.split(), ("1280x".to_string(), "800".to_string()));
    }

    #[test]
    fn test_multibyte_backspace() {
        let mut input = TextInputState::with_value("é→");
        input.backspace();
        assert_eq!(input.value(), "é");
        input.home();
        input.backspace();
        input.delete();
        assert_eq!(input.value(), "");
        input.end();
        assert_eq!(input.cursor(), 0);
    }
}
