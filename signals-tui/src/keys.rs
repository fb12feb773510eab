//! Terminal key mapping for the interactive dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;
use signals_ui::Key;

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Sort by the n-th visible column, counting from zero.
    Sort(usize),
    /// Toggle selection of the focused row.
    Select,
    /// Retry a failed render.
    Retry,
    /// Forward to the table.
    Table(Key),
}

/// Convert a crossterm key code to a table key.
pub fn convert_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(key)
}

/// Map a key event to a dashboard command.
pub fn command(event: KeyEvent) -> Option<Command> {
    trace!("key event: code={:?}, modifiers={:?}", event.code, event.modifiers);

    // Only handle key press events, not release or repeat
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('s') => Some(Command::Select),
        KeyCode::Char('r') => Some(Command::Retry),
        KeyCode::Char(c @ '1'..='9') => Some(Command::Sort(c as usize - '1' as usize)),
        KeyCode::Char('j') => Some(Command::Table(Key::Down)),
        KeyCode::Char('k') => Some(Command::Table(Key::Up)),
        KeyCode::Char('g') => Some(Command::Table(Key::Home)),
        KeyCode::Char('G') => Some(Command::Table(Key::End)),
        code => convert_key(code).map(Command::Table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(command(press(KeyCode::Down)), Some(Command::Table(Key::Down)));
        assert_eq!(command(press(KeyCode::Char('k'))), Some(Command::Table(Key::Up)));
        assert_eq!(command(press(KeyCode::Char('G'))), Some(Command::Table(Key::End)));
        assert_eq!(command(press(KeyCode::Char(' '))), Some(Command::Table(Key::Space)));
        assert_eq!(command(press(KeyCode::Enter)), Some(Command::Table(Key::Enter)));
    }

    #[test]
    fn test_digits_sort_columns() {
        assert_eq!(command(press(KeyCode::Char('1'))), Some(Command::Sort(0)));
        assert_eq!(command(press(KeyCode::Char('6'))), Some(Command::Sort(5)));
        assert_eq!(command(press(KeyCode::Char('0'))), Some(Command::Table(Key::Char('0'))));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(command(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn test_release_ignored() {
        let mut event = press(KeyCode::Down);
        event.kind = KeyEventKind::Release;
        assert_eq!(command(event), None);
        assert_eq!(command(press(KeyCode::F(5))), None);
    }
}
