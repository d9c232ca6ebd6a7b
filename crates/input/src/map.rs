//! Key and mouse mapping from terminal events to battle input.

use crate::types::{ButtonState, DebugCommand, InputEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Map keyboard input to battle input.
pub fn handle_key_event(key: KeyEvent) -> Option<InputEvent> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(InputEvent::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputEvent::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(InputEvent::FastFall(ButtonState::Pressed))
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('x')
        | KeyCode::Char('X') => Some(InputEvent::RotateCw),
        KeyCode::Char('z')
        | KeyCode::Char('Z')
        | KeyCode::Char('y')
        | KeyCode::Char('Y') => Some(InputEvent::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(InputEvent::HardDrop),
        KeyCode::Tab => Some(InputEvent::SelectEnemyNext),
        KeyCode::BackTab => Some(InputEvent::SelectEnemyPrev),
        KeyCode::Char(c @ '1'..='3') => Some(InputEvent::UsePotion(c as usize - '1' as usize)),

        // Developer commands
        KeyCode::F(1) => Some(InputEvent::Debug(DebugCommand::Kill)),
        KeyCode::F(2) => Some(InputEvent::Debug(DebugCommand::Heal)),
        KeyCode::F(3) => Some(InputEvent::Debug(DebugCommand::Damage)),

        _ => None,
    }
}

/// Map a left click to enemy selection.
///
/// `arena` is the terminal cell where the enemy arena starts; clicks left of
/// or above it are ignored.
pub fn handle_mouse_event(mouse: MouseEvent, arena: (u16, u16)) -> Option<InputEvent> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let x = mouse.column.checked_sub(arena.0)?;
    let y = mouse.row.checked_sub(arena.1)?;
    Some(InputEvent::SelectEnemyAt { x, y })
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(InputEvent::MoveLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('D'))),
            Some(InputEvent::MoveRight)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Down)),
            Some(InputEvent::FastFall(ButtonState::Pressed))
        );
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up)),
            Some(InputEvent::RotateCw)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('x'))),
            Some(InputEvent::RotateCw)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('Z'))),
            Some(InputEvent::RotateCcw)
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(InputEvent::HardDrop)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Tab)),
            Some(InputEvent::SelectEnemyNext)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::BackTab)),
            Some(InputEvent::SelectEnemyPrev)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('3'))),
            Some(InputEvent::UsePotion(2))
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('4'))), None);
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::F(1))),
            Some(InputEvent::Debug(DebugCommand::Kill))
        );
    }

    #[test]
    fn test_mouse_click_is_arena_relative() {
        assert_eq!(
            handle_mouse_event(click(40, 6), (10, 2)),
            Some(InputEvent::SelectEnemyAt { x: 30, y: 4 })
        );
        assert_eq!(handle_mouse_event(click(5, 6), (10, 2)), None);

        let mut release = click(40, 6);
        release.kind = MouseEventKind::Up(MouseButton::Left);
        assert_eq!(handle_mouse_event(release, (10, 2)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
