pub mod cell;

use cell::Cell;
use rand::{seq::SliceRandom, Rng};
use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};
use std::ops::BitOr;
use thiserror::Error;

/// A `(column, row)` pair.
pub type Position = (u8, u8);

/// The offsets of the eight Chebyshev neighbours of a cell.
const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Everything that can go wrong when describing a board.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("the board must have at least one cell")]
    NoCells,
    /// The value is the maximum amount of mines the board could hold.
    #[error("requested {requested} mines, but the board only holds {max}")]
    TooManyMines { requested: u16, max: u16 },
    #[error("position ({0}, {1}) is outside the board")]
    InvalidPosition(u8, u8),
}

/// How mines get distributed over a fresh board.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum MinePlacement {
    /// Draw a random position and retry if it's already mined. Fast on sparse boards, but the number of draws
    /// grows without bound as the board fills up.
    #[default]
    RejectionSampling,
    /// Shuffle all the positions and mine the first ones. Always terminates.
    Shuffle,
}

/// Validated board dimensions and mine count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    columns: u8,
    rows: u8,
    mines: u16,
    placement: MinePlacement,
}

impl BoardConfig {
    /// Fails with [`GridError::NoCells`] for boards without cells and with [`GridError::TooManyMines`] when the
    /// mines wouldn't fit.
    pub fn new(
        columns: u8,
        rows: u8,
        mines: u16,
        placement: MinePlacement,
    ) -> Result<Self, GridError> {
        let cells_amount = u16::from(columns) * u16::from(rows);

        if cells_amount == 0 {
            Err(GridError::NoCells)
        } else if mines > cells_amount {
            Err(GridError::TooManyMines {
                requested: mines,
                max: cells_amount,
            })
        } else {
            Ok(BoardConfig {
                columns,
                rows,
                mines,
                placement,
            })
        }
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn mines(&self) -> u16 {
        self.mines
    }

    pub fn placement(&self) -> MinePlacement {
        self.placement
    }
}

/// The stock 10x10 board with a 10% mine density.
impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            columns: crate::COLS,
            rows: crate::ROWS,
            mines: crate::mines_for_density(crate::COLS, crate::ROWS),
            placement: MinePlacement::default(),
        }
    }
}

/// What a reveal request did to the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell was flagged, already revealed or out of bounds.
    NoChange,
    /// One or more safe cells got revealed, some safe cells are still closed.
    Revealed,
    /// A mined cell got revealed.
    HitMine,
    /// The last closed safe cell got revealed.
    Cleared,
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;

        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Cleared, _) | (_, Cleared) => Cleared,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// What a flag request did to the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

/// The board: a 2D vector of cells indexed as `cells[column][row]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    columns: u8,
    rows: u8,
    /// Fixed once the mines are placed.
    mines_present: u16,
    /// Only ever goes up during a round.
    tiles_revealed: u16,
}

impl Grid {
    /// Creates a fresh board with randomly placed mines and the adjacency counts computed.
    pub fn generate<R: Rng + ?Sized>(config: &BoardConfig, rng: &mut R) -> Self {
        let mut grid = Self::blank(config.columns, config.rows);
        grid.place_mines(config.mines, config.placement, rng);
        grid.update_nearby_mines();

        log::trace!("generated board:\n{:?}", grid);

        grid
    }

    /// Creates a board with mines at exactly the given positions. Repeated positions hold a single mine.
    ///
    /// Fails with [`GridError::NoCells`] for boards without cells and with [`GridError::InvalidPosition`] when a
    /// position lies outside the board.
    pub fn from_mine_positions(
        columns: u8,
        rows: u8,
        mine_positions: &[Position],
    ) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::NoCells);
        }

        let mut grid = Self::blank(columns, rows);

        for &(column, row) in mine_positions {
            let cell = grid
                .cell_mut((column, row))
                .ok_or(GridError::InvalidPosition(column, row))?;

            if !cell.is_mined() {
                cell.mine();
                grid.mines_present += 1;
            }
        }

        grid.update_nearby_mines();

        Ok(grid)
    }

    fn blank(columns: u8, rows: u8) -> Self {
        let cells = (0..columns)
            .map(|column| (0..rows).map(|row| Cell::new((column, row))).collect())
            .collect();

        Grid {
            cells,
            columns,
            rows,
            mines_present: 0,
            tiles_revealed: 0,
        }
    }

    /// Mines `count` distinct, not yet mined cells chosen uniformly at random.
    fn place_mines<R: Rng + ?Sized>(&mut self, count: u16, placement: MinePlacement, rng: &mut R) {
        let free_cells = self.total_cells() - self.mines_present;

        let count = if count > free_cells {
            log::warn!("Cannot place {count} mines, only {free_cells} cells are free");
            free_cells
        } else {
            count
        };

        match placement {
            MinePlacement::RejectionSampling => {
                let mut mines_to_place = count;
                let mut draws = 0u32;

                while mines_to_place > 0 {
                    let column = rng.gen_range(0..self.columns);
                    let row = rng.gen_range(0..self.rows);
                    draws += 1;

                    let cell = &mut self.cells[usize::from(column)][usize::from(row)];
                    if !cell.is_mined() {
                        cell.mine();
                        mines_to_place -= 1;
                    }
                }

                log::trace!("placed {count} mines in {draws} draws");
            }
            MinePlacement::Shuffle => {
                let mut free = self
                    .cells
                    .iter_mut()
                    .flatten()
                    .filter(|cell| !cell.is_mined())
                    .collect::<Vec<&mut Cell>>();

                free.shuffle(rng);

                free.into_iter()
                    .take(usize::from(count))
                    .for_each(|cell| cell.mine());
            }
        }

        self.mines_present += count;
    }

    /// Stores the adjacency count in every safe cell.
    fn update_nearby_mines(&mut self) {
        for column in 0..self.columns {
            for row in 0..self.rows {
                let nearby_mines = self.count_adjacent_mines((column, row));
                self.cells[usize::from(column)][usize::from(row)].set_nearby_mines(nearby_mines);
            }
        }
    }

    /// Counts the mined cells among the in-bounds neighbours of the given position (the cell itself excluded).
    pub fn count_adjacent_mines(&self, position: Position) -> u8 {
        self.neighbours(position)
            .filter(|&neighbour| self.cell(neighbour).is_some_and(Cell::is_mined))
            .count() as u8
    }

    /// Checks that `0 <= column < columns` and `0 <= row < rows`.
    pub fn is_valid_index(&self, column: i32, row: i32) -> bool {
        (0..i32::from(self.columns)).contains(&column) && (0..i32::from(self.rows)).contains(&row)
    }

    /// Iterates over the in-bounds neighbours of the given position.
    pub fn neighbours(&self, (column, row): Position) -> impl Iterator<Item = Position> + '_ {
        DISPLACEMENTS
            .iter()
            .map(move |&(column_offset, row_offset)| {
                (i32::from(column) + column_offset, i32::from(row) + row_offset)
            })
            .filter(|&(column, row)| self.is_valid_index(column, row))
            .map(|(column, row)| (column as u8, row as u8))
    }

    /// Reveals the cell at the given position.
    ///
    /// Flagged, already revealed and out-of-bounds cells are left alone. Revealing a cell without mines around it
    /// also reveals every closed neighbour, and so on through the whole zero region and its numbered border.
    pub fn reveal(&mut self, position: Position) -> RevealOutcome {
        let mut outcome = RevealOutcome::NoChange;
        let mut pending = VecDeque::from([position]);

        while let Some(next) = pending.pop_front() {
            let step = self.reveal_single(next);
            outcome = outcome | step;

            if step == RevealOutcome::Revealed
                && self.cell(next).and_then(Cell::nearby_mines) == Some(0)
            {
                // Mines never show up here: a zero count means no mined neighbours.
                pending.extend(self.neighbours(next).filter(|&neighbour| {
                    self.cell(neighbour).is_some_and(|c| !c.is_revealed())
                }));
            }
        }

        match outcome {
            RevealOutcome::Revealed if self.is_cleared() => RevealOutcome::Cleared,
            other => other,
        }
    }

    fn reveal_single(&mut self, position: Position) -> RevealOutcome {
        let Some(cell) = self.cell_mut(position) else {
            return RevealOutcome::NoChange;
        };

        if cell.is_flagged() || cell.is_revealed() {
            return RevealOutcome::NoChange;
        }

        cell.reveal();

        if cell.is_mined() {
            RevealOutcome::HitMine
        } else {
            self.tiles_revealed += 1;
            RevealOutcome::Revealed
        }
    }

    /// Toggles the flag of a closed cell. Revealed and out-of-bounds cells are left alone.
    pub fn flag(&mut self, position: Position) -> FlagOutcome {
        match self.cell_mut(position).and_then(Cell::toggle_flag) {
            Some(true) => FlagOutcome::Flagged,
            Some(false) => FlagOutcome::Unflagged,
            None => FlagOutcome::NoChange,
        }
    }

    /// Returns a read-only cell reference by its position or [`None`] if there's no cell at the given position.
    pub fn cell(&self, (column, row): Position) -> Option<&Cell> {
        self.cells
            .get(usize::from(column))
            .and_then(|cells| cells.get(usize::from(row)))
    }

    fn cell_mut(&mut self, (column, row): Position) -> Option<&mut Cell> {
        self.cells
            .get_mut(usize::from(column))
            .and_then(|cells| cells.get_mut(usize::from(row)))
    }

    /// Iterates over all the cells, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// The configuration that generates boards of the same shape and mine count (with the default placement).
    pub fn config(&self) -> BoardConfig {
        BoardConfig {
            columns: self.columns,
            rows: self.rows,
            mines: self.mines_present,
            placement: MinePlacement::default(),
        }
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn total_cells(&self) -> u16 {
        u16::from(self.columns) * u16::from(self.rows)
    }

    pub fn mines_present(&self) -> u16 {
        self.mines_present
    }

    pub fn safe_cells(&self) -> u16 {
        self.total_cells() - self.mines_present
    }

    pub fn tiles_revealed(&self) -> u16 {
        self.tiles_revealed
    }

    /// Whether every safe cell has been revealed.
    pub fn is_cleared(&self) -> bool {
        self.tiles_revealed == self.safe_cells()
    }

    /// The total number of currently flagged cells.
    pub fn flagged_count(&self) -> u16 {
        self.iter().filter(|cell| cell.is_flagged()).count() as u16
    }

    fn write_rows(
        &self,
        f: &mut Formatter<'_>,
        write_cell: impl Fn(&mut Formatter<'_>, &Cell) -> std::fmt::Result,
    ) -> std::fmt::Result {
        write!(f, "   ")?;
        for column in 0..self.columns {
            write!(f, "{column:>2}")?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "{row:>2} ")?;
            for column in 0..self.columns {
                write!(f, " ")?;
                write_cell(f, &self.cells[usize::from(column)][usize::from(row)])?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Everything uncovered, mines included.
impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_rows(f, |f, cell| write!(f, "{:?}", cell))
    }
}

/// The player's view of the board.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_rows(f, |f, cell| write!(f, "{}", cell))
    }
}
