use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Single line editor backing the filter and edit prompts.
#[derive(Debug, Default)]
pub struct Inputter {
    current_input: String,
    cursor_pos: usize,
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub cursor_pos: usize,
}

impl Inputter {
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.finished = true,
            (KeyCode::Esc, _) => {
                self.canceled = true;
                self.finished = true;
            }
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.cursor_pos = self.cursor_pos.saturating_sub(1),
            (KeyCode::Right, _) => self.cursor_pos = (self.cursor_pos + 1).min(self.char_len()),
            (KeyCode::Home, _) => self.cursor_pos = 0,
            (KeyCode::End, _) => self.cursor_pos = self.char_len(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear(),
            (code, modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(chr) = code.as_char() {
                    self.insert(chr);
                }
            }
            (code, modifiers) => trace!("Ignored input key {code:?} {modifiers:?}"),
        }
        self.get()
    }

    /// Replaces the content and puts the cursor at the end.
    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.cursor_pos = self.char_len();
        self.finished = false;
        self.canceled = false;
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            input: self.current_input.clone(),
            finished: self.finished,
            canceled: self.canceled,
            cursor_pos: self.cursor_pos,
        }
    }

    pub fn clear(&mut self) {
        self.set("");
    }

    fn insert(&mut self, chr: char) {
        let at = self.byte_pos(self.cursor_pos);
        self.current_input.insert(at, chr);
        self.cursor_pos += 1;
    }

    fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.byte_pos(self.cursor_pos);
            self.current_input.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor_pos < self.char_len() {
            let at = self.byte_pos(self.cursor_pos);
            self.current_input.remove(at);
        }
    }

    fn char_len(&self) -> usize {
        self.current_input.chars().count()
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.current_input
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut Inputter, s: &str) {
        for c in s.chars() {
            input.read(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_editing_in_the_middle() {
        let mut input = Inputter::default();
        type_str(&mut input, "4957");
        input.read(key(KeyCode::Left));
        input.read(key(KeyCode::Left));
        input.read(key(KeyCode::Backspace));
        let res = input.read(key(KeyCode::Char('x')));
        assert_eq!(res.input, "4x57");
        assert_eq!(res.cursor_pos, 2);

        input.read(key(KeyCode::Delete));
        let res = input.read(key(KeyCode::End));
        assert_eq!(res.input, "4x7");
        assert_eq!(res.cursor_pos, 3);
    }

    #[test]
    fn multibyte_chars() {
        let mut input = Inputter::default();
        type_str(&mut input, "Zoë");
        input.read(key(KeyCode::Home));
        input.read(key(KeyCode::Right));
        input.read(key(KeyCode::Right));
        let res = input.read(key(KeyCode::Delete));
        assert_eq!(res.input, "Zo");
    }

    #[test]
    fn enter_finishes_esc_cancels() {
        let mut input = Inputter::default();
        input.set("1234.5");
        let res = input.read(key(KeyCode::Enter));
        assert!(res.finished && !res.canceled);
        assert_eq!(res.input, "1234.5");

        input.set("abc");
        let res = input.read(key(KeyCode::Esc));
        assert!(res.finished && res.canceled);
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = Inputter::default();
        type_str(&mut input, "abc");
        let res = input.read(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(res.input, "");
        assert_eq!(res.cursor_pos, 0);
    }
}
