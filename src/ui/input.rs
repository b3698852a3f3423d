use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MAX_MINUTE_DIGITS: usize = 4;
const MAX_SECOND_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Minutes,
    Seconds,
}

impl Field {
    fn max_digits(self) -> usize {
        match self {
            Field::Minutes => MAX_MINUTE_DIGITS,
            Field::Seconds => MAX_SECOND_DIGITS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Minutes => "minutes",
            Field::Seconds => "seconds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Editing {
        field: Field,
        buffer: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    ToggleTimer,
    Reset,
    OpenGallery,
    CloseGallery,
    Retry,
    SetMinutes(u64),
    SetSeconds(u64),
}

/// What the key handler needs to know about the rest of the app.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext {
    pub running: bool,
    pub gallery_open: bool,
    pub can_retry: bool,
}

#[derive(Debug, Default)]
pub struct InputState {
    pub mode: Mode,
    pub notice: Option<String>,
    pub gallery_scroll: u16,
}

impl InputState {
    pub fn handle_key(&mut self, key: KeyEvent, ctx: KeyContext) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match std::mem::take(&mut self.mode) {
            Mode::Editing { field, buffer } => self.handle_editing(key, field, buffer),
            Mode::Normal if ctx.gallery_open => self.handle_gallery(key),
            Mode::Normal => self.handle_normal(key, ctx),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, ctx: KeyContext) -> Action {
        self.notice = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char(' ') => Action::ToggleTimer,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('g') => {
                self.gallery_scroll = 0;
                Action::OpenGallery
            }
            KeyCode::Char('t') if ctx.can_retry => Action::Retry,
            KeyCode::Char(c @ ('m' | 's')) => {
                if ctx.running {
                    self.notice = Some("Pause the timer to change the duration".into());
                    return Action::None;
                }
                let field = if c == 'm' { Field::Minutes } else { Field::Seconds };
                self.mode = Mode::Editing {
                    field,
                    buffer: String::new(),
                };
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_gallery(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('g') | KeyCode::Esc => Action::CloseGallery,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.gallery_scroll = self.gallery_scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.gallery_scroll = self.gallery_scroll.saturating_add(1);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_editing(&mut self, key: KeyEvent, field: Field, mut buffer: String) -> Action {
        match key.code {
            KeyCode::Esc => Action::None,
            KeyCode::Enter => {
                // An empty field counts as zero.
                let value = buffer.parse::<u64>().unwrap_or(0);
                match field {
                    Field::Minutes => Action::SetMinutes(value),
                    Field::Seconds => Action::SetSeconds(value),
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::Editing { field, buffer };
                Action::None
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if buffer.len() < field.max_digits() {
                    buffer.push(c);
                }
                self.mode = Mode::Editing { field, buffer };
                Action::None
            }
            _ => {
                self.mode = Mode::Editing { field, buffer };
                Action::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_keys(input: &mut InputState, keys: &str, ctx: KeyContext) -> Action {
        let mut last = Action::None;
        for c in keys.chars() {
            last = input.handle_key(press(KeyCode::Char(c)), ctx);
        }
        last
    }

    #[test]
    fn minutes_entry_applies_on_enter() {
        let mut input = InputState::default();
        let ctx = KeyContext::default();
        type_keys(&mut input, "m25", ctx);
        assert_eq!(
            input.mode,
            Mode::Editing {
                field: Field::Minutes,
                buffer: "25".into()
            }
        );
        assert_eq!(input.handle_key(press(KeyCode::Enter), ctx), Action::SetMinutes(25));
        assert_eq!(input.mode, Mode::Normal);
    }

    #[test]
    fn seconds_entry_is_capped_at_two_digits() {
        let mut input = InputState::default();
        let ctx = KeyContext::default();
        type_keys(&mut input, "s1234", ctx);
        assert_eq!(input.handle_key(press(KeyCode::Enter), ctx), Action::SetSeconds(12));
    }

    #[test]
    fn empty_entry_means_zero_and_escape_cancels() {
        let mut input = InputState::default();
        let ctx = KeyContext::default();
        type_keys(&mut input, "m", ctx);
        assert_eq!(input.handle_key(press(KeyCode::Enter), ctx), Action::SetMinutes(0));

        type_keys(&mut input, "s4", ctx);
        assert_eq!(input.handle_key(press(KeyCode::Esc), ctx), Action::None);
        assert_eq!(input.mode, Mode::Normal);
    }

    #[test]
    fn editing_is_refused_while_running() {
        let mut input = InputState::default();
        let ctx = KeyContext {
            running: true,
            ..KeyContext::default()
        };
        assert_eq!(type_keys(&mut input, "m", ctx), Action::None);
        assert_eq!(input.mode, Mode::Normal);
        assert!(input.notice.is_some());
    }

    #[test]
    fn retry_only_offered_after_failure() {
        let mut input = InputState::default();
        assert_eq!(type_keys(&mut input, "t", KeyContext::default()), Action::None);
        let ctx = KeyContext {
            can_retry: true,
            ..KeyContext::default()
        };
        assert_eq!(type_keys(&mut input, "t", ctx), Action::Retry);
    }

    #[test]
    fn gallery_keys_scroll_and_close() {
        let mut input = InputState::default();
        let ctx = KeyContext {
            gallery_open: true,
            ..KeyContext::default()
        };
        input.handle_key(press(KeyCode::Down), ctx);
        input.handle_key(press(KeyCode::Down), ctx);
        input.handle_key(press(KeyCode::Up), ctx);
        assert_eq!(input.gallery_scroll, 1);
        // Space does not reach the timer while the gallery covers it.
        assert_eq!(input.handle_key(press(KeyCode::Char(' ')), ctx), Action::None);
        assert_eq!(input.handle_key(press(KeyCode::Esc), ctx), Action::CloseGallery);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut input = InputState::default();
        type_keys(&mut input, "m1", KeyContext::default());
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(key, KeyContext::default()), Action::Quit);
    }
}
