//! The terminal application updater.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// What the application must be able to do in response to the player's input.
pub trait ControlsSupport {
    fn move_cursor(&mut self, direction: MoveCursorDirection);
    /// Reveal the cell under the cursor.
    fn perform_main_action(&mut self);
    /// Toggle the flag of the cell under the cursor.
    fn perform_secondary_action(&mut self);
    /// A mouse button went down at the given terminal column and row.
    fn click(&mut self, button: MouseButton, column: u16, row: u16);
    fn replay(&mut self);
    fn leave(&mut self);
}

/// The available directions to move the cursor to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

pub fn update(app: &mut impl ControlsSupport, key_event: KeyEvent) {
    use MoveCursorDirection::*;

    match key_event.code {
        KeyCode::Up | KeyCode::Char('i') | KeyCode::Char('w') => app.move_cursor(Up),
        KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('a') => app.move_cursor(Left),
        KeyCode::Down | KeyCode::Char('k') | KeyCode::Char('s') => app.move_cursor(Down),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => app.move_cursor(Right),
        KeyCode::Enter | KeyCode::Char(' ') => app.perform_main_action(),
        KeyCode::Char('f') => app.perform_secondary_action(),
        KeyCode::Char('r') => app.replay(),
        KeyCode::Esc | KeyCode::Char('q') => app.leave(),
        KeyCode::Char('c') => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                app.leave();
            }
        }
        _ => {}
    };
}

/// Only button presses count, releases, drags and moves are ignored.
pub fn update_on_mouse(app: &mut impl ControlsSupport, mouse_event: MouseEvent) {
    if let MouseEventKind::Down(button) = mouse_event.kind {
        app.click(button, mouse_event.column, mouse_event.row);
    }
}

#[cfg(test)]
mod test {
    use super::{update, update_on_mouse, ControlsSupport, MoveCursorDirection};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ControlsSupport for Recorder {
        fn move_cursor(&mut self, direction: MoveCursorDirection) {
            self.calls.push(format!("move {direction:?}"));
        }

        fn perform_main_action(&mut self) {
            self.calls.push("reveal".to_string());
        }

        fn perform_secondary_action(&mut self) {
            self.calls.push("flag".to_string());
        }

        fn click(&mut self, button: MouseButton, column: u16, row: u16) {
            self.calls.push(format!("click {button:?} {column} {row}"));
        }

        fn replay(&mut self) {
            self.calls.push("replay".to_string());
        }

        fn leave(&mut self) {
            self.calls.push("leave".to_string());
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keys_are_mapped_to_controls() {
        let mut recorder = Recorder::default();

        for code in [
            KeyCode::Char('w'),
            KeyCode::Left,
            KeyCode::Char(' '),
            KeyCode::Char('f'),
            KeyCode::Char('r'),
            KeyCode::Char('x'),
            KeyCode::Esc,
        ] {
            update(&mut recorder, KeyEvent::new(code, KeyModifiers::NONE));
        }

        assert_eq!(
            recorder.calls,
            ["move Up", "move Left", "reveal", "flag", "replay", "leave"]
        );
    }

    #[test]
    fn only_ctrl_c_leaves() {
        let mut recorder = Recorder::default();

        update(
            &mut recorder,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE),
        );
        assert!(recorder.calls.is_empty());

        update(
            &mut recorder,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(recorder.calls, ["leave"]);
    }

    #[test]
    fn only_button_presses_are_clicks() {
        let mut recorder = Recorder::default();

        update_on_mouse(&mut recorder, mouse(MouseEventKind::Moved, 3, 4));
        update_on_mouse(&mut recorder, mouse(MouseEventKind::Up(MouseButton::Left), 3, 4));
        update_on_mouse(&mut recorder, mouse(MouseEventKind::Down(MouseButton::Right), 7, 2));

        assert_eq!(recorder.calls, ["click Right 7 2"]);
    }
}
