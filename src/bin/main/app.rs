//! The terminal application

use crate::game_ui::render_game;
use crate::tui::Render;
use crate::update::{ControlsSupport, MoveCursorDirection};
use crossterm::event::MouseButton;
use grid_sweeper::{BoardConfig, GameSession, Position};
use ratatui::{layout::Rect, Frame};
use std::cmp;

/// The terminal application
#[derive(Debug)]
pub struct App {
    /// The game instance.
    pub session: GameSession,
    /// The position of the currently selected cell, for keyboard play.
    pub cursor_position: Position,
    /// The terminal rectangle the cells were drawn into on the last frame. `None` until the first frame and while
    /// the terminal is too small to draw the board.
    pub board_area: Option<Rect>,
    /// Indicates that the main application loop should be broken on the next tick and thus the app should quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(seed: Option<u64>) -> App {
        App {
            session: GameSession::new(BoardConfig::default(), seed),
            cursor_position: (0, 0),
            board_area: None,
            should_quit: false,
        }
    }

    /// Maps a terminal position to the cell drawn there, if any.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        let grid = self.session.grid();
        let (grid_column, grid_row) =
            screen_to_grid(self.board_area?, (grid.columns(), grid.rows()), column, row)?;

        grid.is_valid_index(grid_column, grid_row)
            .then_some((grid_column as u8, grid_row as u8))
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Converts a terminal position into grid coordinates by integer division by the cell size, where
/// `cell_width = area.width / columns` and `cell_height = area.height / rows`.
///
/// Returns `None` when the cells have no size or the position lies above or to the left of the area. Positions to
/// the right of or below the area produce coordinates past the last column or row, validating them is up to the
/// caller.
pub fn screen_to_grid(
    area: Rect,
    (columns, rows): (u8, u8),
    column: u16,
    row: u16,
) -> Option<(i32, i32)> {
    let cell_width = area.width.checked_div(u16::from(columns))?;
    let cell_height = area.height.checked_div(u16::from(rows))?;

    if cell_width == 0 || cell_height == 0 {
        return None;
    }

    let x = column.checked_sub(area.x)?;
    let y = row.checked_sub(area.y)?;

    Some((i32::from(x / cell_width), i32::from(y / cell_height)))
}

impl ControlsSupport for App {
    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        // don't move the cursor when the round is already over
        if self.session.state().is_terminal() {
            return;
        }

        let grid = self.session.grid();
        let (columns, rows) = (grid.columns(), grid.rows());
        let (cx, cy) = self.cursor_position;

        self.cursor_position = match direction {
            MoveCursorDirection::Up => (cx, cy.saturating_sub(1)),
            MoveCursorDirection::Left => (cx.saturating_sub(1), cy),
            MoveCursorDirection::Down => (cx, cmp::min(cy + 1, rows - 1)),
            MoveCursorDirection::Right => (cmp::min(cx + 1, columns - 1), cy),
        };
    }

    fn perform_main_action(&mut self) {
        self.session.reveal(self.cursor_position);
    }

    fn perform_secondary_action(&mut self) {
        self.session.flag(self.cursor_position);
    }

    fn click(&mut self, button: MouseButton, column: u16, row: u16) {
        let Some(position) = self.cell_at(column, row) else {
            log::debug!("click at ({column}, {row}) is off the board");
            return;
        };

        if !self.session.state().is_terminal() {
            self.cursor_position = position;
        }

        match button {
            MouseButton::Left => {
                self.session.reveal(position);
            }
            MouseButton::Right => {
                self.session.flag(position);
            }
            MouseButton::Middle => {}
        }
    }

    fn replay(&mut self) {
        self.session.replay();
    }

    fn leave(&mut self) {
        self.quit();
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        render_game(self, frame);
    }
}

#[cfg(test)]
mod test {
    use super::{screen_to_grid, App};
    use crate::update::{ControlsSupport, MoveCursorDirection};
    use crossterm::event::MouseButton;
    use grid_sweeper::GameState;
    use ratatui::layout::Rect;

    #[test]
    fn clicks_are_divided_by_the_cell_size() {
        let area = Rect::new(10, 5, 50, 30);

        assert_eq!(screen_to_grid(area, (10, 10), 10, 5), Some((0, 0)));
        assert_eq!(screen_to_grid(area, (10, 10), 14, 7), Some((0, 0)));
        assert_eq!(screen_to_grid(area, (10, 10), 15, 8), Some((1, 1)));
        assert_eq!(screen_to_grid(area, (10, 10), 59, 34), Some((9, 9)));
    }

    #[test]
    fn clicks_past_the_board_map_past_the_last_cell() {
        let area = Rect::new(10, 5, 50, 30);

        assert_eq!(screen_to_grid(area, (10, 10), 60, 5), Some((10, 0)));
        assert_eq!(screen_to_grid(area, (10, 10), 9, 5), None);
        assert_eq!(screen_to_grid(area, (10, 10), 10, 4), None);
    }

    #[test]
    fn a_squashed_board_maps_nothing() {
        assert_eq!(screen_to_grid(Rect::new(0, 0, 5, 30), (10, 10), 1, 1), None);
    }

    #[test]
    fn cell_at_rejects_positions_off_the_board() {
        let mut app = App::new(Some(1));
        assert_eq!(app.cell_at(0, 0), None);

        app.board_area = Some(Rect::new(0, 0, 50, 30));
        assert_eq!(app.cell_at(49, 29), Some((9, 9)));
        assert_eq!(app.cell_at(50, 0), None);
        assert_eq!(app.cell_at(0, 30), None);
    }

    #[test]
    fn a_right_click_flags_the_cell_under_the_pointer() {
        let mut app = App::new(Some(2));
        app.board_area = Some(Rect::new(0, 0, 50, 30));

        app.click(MouseButton::Right, 12, 7);

        assert_eq!(app.cursor_position, (2, 2));
        assert!(app.session.grid().cell((2, 2)).unwrap().is_flagged());
    }

    #[test]
    fn a_left_click_on_a_mine_loses() {
        let mut app = App::new(Some(3));
        app.board_area = Some(Rect::new(0, 0, 50, 30));
        let (column, row) = app
            .session
            .grid()
            .iter()
            .find(|cell| cell.is_mined())
            .unwrap()
            .position();

        app.click(MouseButton::Left, u16::from(column) * 5, u16::from(row) * 3);

        assert_eq!(app.session.state(), GameState::Lose);
    }

    #[test]
    fn the_cursor_stays_on_the_board() {
        let mut app = App::new(Some(4));

        app.move_cursor(MoveCursorDirection::Up);
        app.move_cursor(MoveCursorDirection::Left);
        assert_eq!(app.cursor_position, (0, 0));

        for _ in 0..20 {
            app.move_cursor(MoveCursorDirection::Right);
            app.move_cursor(MoveCursorDirection::Down);
        }
        assert_eq!(app.cursor_position, (9, 9));
    }
}
