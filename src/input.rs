use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    RefreshNow,
    ToggleLog,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::F(5) => Some(UiCommand::RefreshNow),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'r' => Some(UiCommand::RefreshNow),
            'l' => Some(UiCommand::ToggleLog),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_quit_key(key_code: &KeyCode) -> bool {
    matches!(key_code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
}
