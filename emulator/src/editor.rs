use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Longest command line accepted from the terminal.
const MAX_LINE: usize = 64;

/// What the main loop should do after a key press.
#[derive(Debug, Eq, PartialEq)]
pub enum EditorAction {
    /// Nothing visible changed.
    None,
    /// The pending line changed and the prompt must be redrawn.
    Redraw,
    /// A complete line was entered.
    Submit(String),
    /// The operator asked to leave.
    Quit,
}

/// Single-line input buffer fed from raw-mode key events.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.kind == KeyEventKind::Release {
            return EditorAction::None;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c' | 'd') if control => EditorAction::Quit,
            KeyCode::Char('u') if control => self.clear(),
            KeyCode::Char(ch) if !control && !ch.is_control() => {
                if self.buffer.len() >= MAX_LINE {
                    return EditorAction::None;
                }
                self.buffer.push(ch);
                EditorAction::Redraw
            }
            KeyCode::Backspace => {
                if self.buffer.pop().is_some() {
                    EditorAction::Redraw
                } else {
                    EditorAction::None
                }
            }
            KeyCode::Esc => self.clear(),
            KeyCode::Enter => EditorAction::Submit(core::mem::take(&mut self.buffer)),
            _ => EditorAction::None,
        }
    }

    fn clear(&mut self) -> EditorAction {
        if self.buffer.is_empty() {
            EditorAction::None
        } else {
            self.buffer.clear();
            EditorAction::Redraw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(editor: &mut LineEditor, text: &str) {
        for ch in text.chars() {
            assert_eq!(editor.handle_key(press(KeyCode::Char(ch))), EditorAction::Redraw);
        }
    }

    #[test]
    fn enter_submits_and_clears_the_line() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "statuz");
        assert_eq!(editor.handle_key(press(KeyCode::Backspace)), EditorAction::Redraw);
        type_text(&mut editor, "s");

        assert_eq!(
            editor.handle_key(press(KeyCode::Enter)),
            EditorAction::Submit("status".to_string())
        );
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn control_keys_quit_or_clear() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "start");
        assert_eq!(
            editor.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            EditorAction::Redraw
        );
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.handle_key(press(KeyCode::Esc)), EditorAction::None);
        assert_eq!(
            editor.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            EditorAction::Quit
        );
    }

    #[test]
    fn ignores_releases_and_overlong_input() {
        let mut editor = LineEditor::new();
        let mut release = press(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(editor.handle_key(release), EditorAction::None);

        type_text(&mut editor, &"s".repeat(MAX_LINE));
        assert_eq!(editor.handle_key(press(KeyCode::Char('s'))), EditorAction::None);
        assert_eq!(editor.buffer().len(), MAX_LINE);
        assert_eq!(editor.handle_key(press(KeyCode::Backspace)), EditorAction::Redraw);
    }
}
