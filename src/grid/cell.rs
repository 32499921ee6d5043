use super::Position;
use std::fmt::{Debug, Display, Formatter};

/// The cell variant.
///
/// A cell can either be empty or contain a mine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellVariant {
    /// Represents an empty cell. The empty cell is one that doesn't contain a mine.
    ///
    /// The parameter represents the amount of mines around the cell.
    Empty(u8),
    /// Represents a mined cell.
    Mine,
}

/// The cell's state.
///
/// A closed cell may carry a flag, a revealed one never does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellState {
    Closed { flagged: bool },
    Revealed,
}

/// A single board position.
///
/// The cell remembers its own `(column, row)` position, which always equals its index in the grid.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    variant: CellVariant,
    state: CellState,
}

impl Cell {
    /// Creates a closed, un-flagged, empty cell at the given position.
    pub fn new(position: Position) -> Self {
        Cell {
            position,
            variant: CellVariant::Empty(0),
            state: CellState::Closed { flagged: false },
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Checks whether the cell is mined.
    pub fn is_mined(&self) -> bool {
        self.variant == CellVariant::Mine
    }

    pub(super) fn mine(&mut self) {
        self.variant = CellVariant::Mine;
    }

    /// Returns the amount of mines around the cell or `None` if the cell itself is mined.
    pub fn nearby_mines(&self) -> Option<u8> {
        match self.variant {
            CellVariant::Empty(nearby_mines) => Some(nearby_mines),
            CellVariant::Mine => None,
        }
    }

    /// Stores the adjacency count. Has no effect on mined cells.
    pub(super) fn set_nearby_mines(&mut self, nearby_mines: u8) {
        if let CellVariant::Empty(_) = self.variant {
            self.variant = CellVariant::Empty(nearby_mines);
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Revealed
    }

    /// Reveals the cell. Revealing is one-way: there's no way back to the closed state.
    pub(super) fn reveal(&mut self) {
        self.state = CellState::Revealed;
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Closed { flagged: true })
    }

    /// Toggles the flag and returns the new flag value.
    ///
    /// Revealed cells can't be flagged, for them the method does nothing and returns `None`.
    pub(super) fn toggle_flag(&mut self) -> Option<bool> {
        match self.state {
            CellState::Closed { flagged } => {
                self.state = CellState::Closed { flagged: !flagged };
                Some(!flagged)
            }
            CellState::Revealed => None,
        }
    }
}

/// The `Debug` implementation shows what's under every cell, closed or not.
impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.variant {
            CellVariant::Mine => write!(f, "*"),
            CellVariant::Empty(0) => write!(f, "."),
            CellVariant::Empty(n) => write!(f, "{n}"),
        }
    }
}

/// The `Display` implementation shows the cell the way a player sees it.
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.state {
            CellState::Closed { flagged: true } => write!(f, "F"),
            CellState::Closed { flagged: false } => write!(f, "#"),
            CellState::Revealed => write!(f, "{:?}", self),
        }
    }
}
