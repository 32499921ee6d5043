pub mod grid;
mod stopwatch;

pub use grid::{
    BoardConfig, FlagOutcome, Grid, GridError, MinePlacement, Position, RevealOutcome,
};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use stopwatch::Stopwatch;

/// The number of columns of the stock board.
pub const COLS: u8 = 10;
/// The number of rows of the stock board.
pub const ROWS: u8 = 10;
/// The share of cells holding a mine.
pub const MINE_DENSITY: f32 = 0.1;

/// `floor(columns * rows * MINE_DENSITY)`.
pub fn mines_for_density(columns: u8, rows: u8) -> u16 {
    (f32::from(columns) * f32::from(rows) * MINE_DENSITY).floor() as u16
}

/// The status of a round.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameState {
    /// The round accepts moves.
    Playing,
    /// Every safe cell has been revealed.
    Win,
    /// A mine has been revealed.
    Lose,
}

impl GameState {
    /// `Win` and `Lose` are terminal: only a replay leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Win | GameState::Lose)
    }
}

/// Describes all the possible actions a player can take.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionAction {
    /// A request to reveal a cell by its position.
    Reveal(Position),
    /// A request to toggle the flag of a cell by its position.
    Flag(Position),
    /// A request to throw the current board away and start over.
    Replay,
}

/// A Minesweeper game: one board at a time, replayable.
#[derive(Debug)]
pub struct GameSession {
    /// What every new board looks like.
    config: BoardConfig,
    /// The board of the current round.
    grid: Grid,
    state: GameState,
    /// Started with every round, stopped on the terminal transition.
    stopwatch: Stopwatch,
    rng: StdRng,
}

impl GameSession {
    /// Starts a session and its first round.
    ///
    /// A `seed` makes the sequence of boards reproducible, otherwise the generator is seeded from the OS.
    pub fn new(config: BoardConfig, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = Grid::generate(&config, &mut rng);

        let session = GameSession {
            config,
            grid,
            state: GameState::Playing,
            stopwatch: Stopwatch::start(),
            rng,
        };
        session.log_round_start();

        session
    }

    /// Starts a session whose first round is played on the given board. Replays generate random boards of the same
    /// shape and mine count.
    pub fn with_grid(grid: Grid) -> Self {
        let session = GameSession {
            config: grid.config(),
            grid,
            state: GameState::Playing,
            stopwatch: Stopwatch::start(),
            rng: StdRng::from_entropy(),
        };
        session.log_round_start();

        session
    }

    /// Throws the current board away and starts a new round on a freshly generated one.
    pub fn init(&mut self) {
        self.grid = Grid::generate(&self.config, &mut self.rng);
        self.state = GameState::Playing;
        self.stopwatch = Stopwatch::start();

        self.log_round_start();
    }

    /// Starts over, whatever the state of the current round.
    pub fn replay(&mut self) {
        log::debug!("replay requested in state {:?}", self.state);
        self.init();
    }

    /// Performs the requested action and returns the resulting state.
    ///
    /// Moves out of bounds or after the round is over are silently ignored.
    pub fn take_action(&mut self, action: SessionAction) -> GameState {
        match action {
            SessionAction::Reveal(position) => self.reveal(position),
            SessionAction::Flag(position) => self.flag(position),
            SessionAction::Replay => {
                self.replay();
                self.state
            }
        }
    }

    /// Reveals a cell (and the zero region behind it) and updates the state.
    pub fn reveal(&mut self, position: Position) -> GameState {
        if !self.accepts_move_at(position) {
            return self.state;
        }

        match self.grid.reveal(position) {
            RevealOutcome::HitMine => self.finish(GameState::Lose),
            RevealOutcome::Cleared => self.finish(GameState::Win),
            outcome => log::debug!(
                "reveal at {position:?}: {outcome:?}, {}/{} safe cells revealed",
                self.grid.tiles_revealed(),
                self.grid.safe_cells()
            ),
        }

        self.state
    }

    /// Toggles the flag of a closed cell. Never changes the state.
    pub fn flag(&mut self, position: Position) -> GameState {
        if self.accepts_move_at(position) {
            let outcome = self.grid.flag(position);
            log::debug!("flag at {position:?}: {outcome:?}");
        }

        self.state
    }

    fn accepts_move_at(&self, (column, row): Position) -> bool {
        if self.state.is_terminal() {
            log::debug!(
                "ignoring a move at ({column}, {row}): the round is over ({:?})",
                self.state
            );
            false
        } else if !self.grid.is_valid_index(i32::from(column), i32::from(row)) {
            log::debug!("ignoring a move at ({column}, {row}): outside the board");
            false
        } else {
            true
        }
    }

    /// The first terminal transition wins, later ones are ignored.
    fn finish(&mut self, state: GameState) {
        if self.state.is_terminal() {
            return;
        }

        self.state = state;
        self.stopwatch.stop();

        log::info!(
            "round over: {:?} after {:.1?}, {} safe cells revealed",
            state,
            self.stopwatch.elapsed(),
            self.grid.tiles_revealed()
        );
    }

    fn log_round_start(&self) {
        log::info!(
            "new round on a {}x{} board with {} mines",
            self.grid.columns(),
            self.grid.rows(),
            self.grid.mines_present()
        );
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The duration of the round: frozen once the round is over, still running otherwise.
    pub fn elapsed_time(&self) -> Duration {
        self.stopwatch.elapsed()
    }
}

impl Default for GameSession {
    /// A session on the stock board with an OS-seeded generator.
    fn default() -> Self {
        Self::new(BoardConfig::default(), None)
    }
}

#[cfg(test)]
mod test {
    use super::{
        mines_for_density, BoardConfig, GameSession, GameState, Grid, MinePlacement, Position,
        SessionAction,
    };
    use std::time::Duration;

    fn mine_positions(grid: &Grid) -> Vec<Position> {
        grid.iter()
            .filter(|cell| cell.is_mined())
            .map(|cell| cell.position())
            .collect()
    }

    fn safe_positions(grid: &Grid) -> Vec<Position> {
        grid.iter()
            .filter(|cell| !cell.is_mined())
            .map(|cell| cell.position())
            .collect()
    }

    fn seeded_session(seed: u64) -> GameSession {
        GameSession::new(BoardConfig::default(), Some(seed))
    }

    #[test]
    fn the_mine_count_follows_the_density() {
        assert_eq!(mines_for_density(10, 10), 10);
        assert_eq!(mines_for_density(3, 3), 0);
        assert_eq!(mines_for_density(9, 9), 8);
        assert_eq!(mines_for_density(16, 30), 48);
    }

    #[test]
    fn a_new_session_starts_a_playing_round() {
        let session = seeded_session(1);

        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.grid().mines_present(), 10);
        assert_eq!(session.grid().safe_cells(), 90);
        assert_eq!(session.grid().tiles_revealed(), 0);
        assert_eq!(mine_positions(session.grid()).len(), 10);
    }

    #[test]
    fn the_same_seed_produces_the_same_boards() {
        let mut first = seeded_session(42);
        let mut second = seeded_session(42);

        assert_eq!(first.grid(), second.grid());

        first.replay();
        second.replay();
        assert_eq!(first.grid(), second.grid());
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut session = seeded_session(3);
        let positions = safe_positions(session.grid());

        let states: Vec<GameState> = positions
            .into_iter()
            .map(|position| session.reveal(position))
            .collect();

        assert_eq!(session.state(), GameState::Win);
        assert_eq!(session.grid().tiles_revealed(), 90);
        // Once won, the remaining reveals (cells already opened by flood fills) are ignored.
        let first_win = states
            .iter()
            .position(|&state| state == GameState::Win)
            .unwrap();
        assert!(states[..first_win]
            .iter()
            .all(|&state| state == GameState::Playing));
        assert!(states[first_win..]
            .iter()
            .all(|&state| state == GameState::Win));
    }

    #[test]
    fn revealing_every_safe_cell_in_reverse_order_wins_too() {
        let mut session = seeded_session(4);
        let mut positions = safe_positions(session.grid());
        positions.reverse();

        for position in positions {
            session.reveal(position);
        }

        assert_eq!(session.state(), GameState::Win);
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut session = seeded_session(5);
        let mine = mine_positions(session.grid())[0];

        assert_eq!(session.reveal(mine), GameState::Lose);
        assert!(session.grid().cell(mine).unwrap().is_revealed());
    }

    #[test]
    fn nothing_changes_after_the_round_is_over() {
        let mut session = seeded_session(6);
        let mines = mine_positions(session.grid());
        let safe = safe_positions(session.grid());

        session.reveal(mines[0]);
        let frozen = session.elapsed_time();
        let grid_after_loss = session.grid().clone();

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(session.reveal(safe[0]), GameState::Lose);
        assert_eq!(session.reveal(mines[1]), GameState::Lose);
        assert_eq!(session.flag(safe[1]), GameState::Lose);
        assert_eq!(session.grid(), &grid_after_loss);
        assert_eq!(session.elapsed_time(), frozen);
    }

    #[test]
    fn the_clock_keeps_running_while_playing() {
        let session = seeded_session(7);
        let before = session.elapsed_time();

        std::thread::sleep(Duration::from_millis(20));

        assert!(session.elapsed_time() > before);
    }

    #[test]
    fn revealing_a_flagged_cell_is_ignored() {
        let mut session = seeded_session(8);
        let mine = mine_positions(session.grid())[0];

        session.flag(mine);
        assert_eq!(session.reveal(mine), GameState::Playing);

        let cell = session.grid().cell(mine).unwrap();
        assert!(cell.is_flagged());
        assert!(!cell.is_revealed());
        assert_eq!(session.grid().tiles_revealed(), 0);
    }

    #[test]
    fn flagging_a_revealed_cell_is_ignored() {
        let grid = Grid::from_mine_positions(3, 3, &[(0, 0)]).unwrap();
        let mut session = GameSession::with_grid(grid);

        session.reveal((1, 1));
        session.flag((1, 1));

        assert!(!session.grid().cell((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn moves_outside_the_board_are_ignored() {
        let mut session = seeded_session(9);
        let grid_before = session.grid().clone();

        assert_eq!(session.reveal((10, 0)), GameState::Playing);
        assert_eq!(session.flag((0, 200)), GameState::Playing);
        assert_eq!(session.grid(), &grid_before);
    }

    #[test]
    fn replay_starts_a_fresh_round() {
        let mut session = seeded_session(10);
        let mine = mine_positions(session.grid())[0];
        session.reveal(mine);

        session.replay();

        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.grid().tiles_revealed(), 0);
        assert_eq!(session.grid().mines_present(), 10);
        assert!(session.grid().iter().all(|cell| !cell.is_revealed()));
        assert!(session.elapsed_time() < Duration::from_secs(1));
    }

    #[test]
    fn consecutive_inits_produce_independent_boards() {
        let mut session = seeded_session(11);
        let first_layout = mine_positions(session.grid());

        let layouts: Vec<Vec<Position>> = (0..5)
            .map(|_| {
                session.init();
                mine_positions(session.grid())
            })
            .collect();

        assert!(layouts.iter().all(|layout| layout.len() == 10));
        assert!(layouts.iter().any(|layout| layout != &first_layout));
    }

    #[test]
    fn take_action_dispatches_the_actions() {
        let grid = Grid::from_mine_positions(2, 2, &[(0, 0)]).unwrap();
        let mut session = GameSession::with_grid(grid);

        assert_eq!(
            session.take_action(SessionAction::Flag((0, 0))),
            GameState::Playing
        );
        assert!(session.grid().cell((0, 0)).unwrap().is_flagged());

        session.take_action(SessionAction::Reveal((1, 0)));
        session.take_action(SessionAction::Reveal((0, 1)));
        assert_eq!(
            session.take_action(SessionAction::Reveal((1, 1))),
            GameState::Win
        );

        assert_eq!(
            session.take_action(SessionAction::Replay),
            GameState::Playing
        );
        assert_eq!(session.grid().columns(), 2);
        assert_eq!(session.grid().rows(), 2);
        assert_eq!(session.grid().mines_present(), 1);
    }

    #[test]
    fn a_custom_board_is_used_for_every_round() {
        let config = BoardConfig::new(5, 4, 6, MinePlacement::Shuffle).unwrap();
        let mut session = GameSession::new(config, Some(12));

        for _ in 0..3 {
            assert_eq!(session.grid().columns(), 5);
            assert_eq!(session.grid().rows(), 4);
            assert_eq!(mine_positions(session.grid()).len(), 6);
            session.replay();
        }
        assert_eq!(session.config(), &config);
    }
}
