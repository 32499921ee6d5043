//! The game renderer functions.

use crate::app::App;
use grid_sweeper::{grid::cell::Cell, GameState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Widget, Wrap},
};

/// How much room a single cell takes on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellSize {
    /// 5 columns by 3 rows, the cell's own border included.
    Framed,
    /// 3 columns by 1 row without a border, for terminals that are too short for the framed board (e.g. 80x24).
    Compact,
}

impl CellSize {
    fn width(self) -> u16 {
        match self {
            CellSize::Framed => 5,
            CellSize::Compact => 3,
        }
    }

    fn height(self) -> u16 {
        match self {
            CellSize::Framed => 3,
            CellSize::Compact => 1,
        }
    }

    /// The width and height of the whole board, its border included.
    fn board_size(self, columns: u8, rows: u8) -> (u16, u16) {
        (
            u16::from(columns) * self.width() + 2,
            u16::from(rows) * self.height() + 2,
        )
    }

    /// The biggest cell size the board fits into the container with. `None` if not even the compact board fits.
    ///
    /// The board is never squashed: a squashed board no longer lines up with the click mapping.
    fn fitting(container: &Rect, columns: u8, rows: u8) -> Option<CellSize> {
        [CellSize::Framed, CellSize::Compact]
            .into_iter()
            .find(|size| {
                let (width, height) = size.board_size(columns, rows);
                width <= container.width && height <= container.height
            })
    }
}

const FLAG_SYMBOL: &str = " 🚩";
const MINE_SYMBOL: &str = " 💣";
const WRONG_CHOICE_SYMBOL: &str = " ❌";
const CLOCK_SYMBOL: &str = "🕓";
const APP_BG_COLOR: Color = Color::White;
const CLOSED_CELL_COLOR: Color = Color::Reset;
const REVEALED_CELL_COLOR: Color = Color::Gray;
const MINE_CELL_COLOR: Color = Color::Red;
const CELL_BORDER_COLOR: Color = Color::Black;
const SELECTED_CELL_BORDER_COLOR: Color = Color::Yellow;
const FIELD_BORDER_COLOR: Color = Color::Yellow;
const OUTCOME_POPUP_VICTORY_BORDER_COLOR: Color = Color::Green;
const OUTCOME_POPUP_LOSS_BORDER_COLOR: Color = Color::Red;
const INFO_WIDGET_BLOCK_COLOR: Color = Color::LightYellow;
const REGULAR_TEXT_COLOR: Color = Color::Black;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;
/// The numeral colors for 1 to 8 mines around.
const NEARBY_MINES_COLORS: [Color; 8] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::LightRed,
    Color::Cyan,
    Color::Black,
    Color::DarkGray,
];

const LEGEND_TEXT: [&str; 5] = [
    "[left click] / [SPACE] / [ENTER]: reveal a cell",
    "[right click] / [f]: toggle the flag of a cell",
    "[↑][←][↓][→] / [w][a][s][d] / [i][j][k][l]: move the cursor",
    "[r]: start a new game",
    "[q] / [ESC]: leave",
];
const TOO_SMALL_TEXT: &str = "The terminal is too small for the board. Please, enlarge it.";
const VICTORY_LINE_TEXT: &str = "You won! Congratulations!";
const LOSS_LINE_TEXT: &str = "You lost... Wanna try again?";
const OUTCOME_POPUP_HINT_TEXT: [&str; 4] = [
    "",
    "Use:",
    "[r] to start a new game",
    "[q] / [ESC] to leave",
];

pub fn render_game(app: &mut App, frame: &mut Frame) {
    // the root container is the whole terminal rectangle
    let root_container = frame.size();

    let (
        field_container,
        (flags_info_container, mines_info_container, time_info_container),
        legend_container,
    ) = create_app_layout(&root_container);

    let grid = app.session.grid();
    let state = app.session.state();

    // 1. Render the terminal background
    frame.render_widget(Block::default().bg(APP_BG_COLOR), root_container);

    // 2. Render the board, or a notice if it doesn't fit
    let board_area = match CellSize::fitting(&field_container, grid.columns(), grid.rows()) {
        Some(cell_size) => Some(render_board(frame, &field_container, app, cell_size)),
        None => {
            frame.render_widget(build_too_small_widget(), field_container);
            None
        }
    };

    // 3. Render the stats
    frame.render_widget(
        build_flags_info_widget(grid.flagged_count()),
        flags_info_container,
    );
    frame.render_widget(
        build_mines_info_widget(grid.mines_present()),
        mines_info_container,
    );
    frame.render_widget(
        build_time_info_widget(format_duration(app.session.elapsed_time().as_secs())),
        time_info_container,
    );

    // 4. Render the legend
    frame.render_widget(build_legend_widget(), legend_container);

    // 5. Render the outcome popup once the round is over
    match state {
        GameState::Win => render_outcome_popup(
            frame,
            VICTORY_LINE_TEXT,
            app.session.elapsed_time().as_secs(),
            OUTCOME_POPUP_VICTORY_BORDER_COLOR,
        ),
        GameState::Lose => render_outcome_popup(
            frame,
            LOSS_LINE_TEXT,
            app.session.elapsed_time().as_secs(),
            OUTCOME_POPUP_LOSS_BORDER_COLOR,
        ),
        GameState::Playing => {}
    }

    // clicks are mapped against what's actually been drawn, nothing drawn means no clicks
    app.board_area = board_area;
}

/// Renders the bordered board centered in the container and returns the area the cells were drawn into.
fn render_board(frame: &mut Frame, container: &Rect, app: &App, cell_size: CellSize) -> Rect {
    let grid = app.session.grid();
    let state = app.session.state();

    let (board_width, board_height) = cell_size.board_size(grid.columns(), grid.rows());
    let board_container = center_in(container, board_width, board_height);
    let board_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(FIELD_BORDER_COLOR));
    let cells_container = board_block.inner(board_container);

    frame.render_widget(board_block, board_container);

    // the whole board on every frame
    let cell_containers =
        build_grid_layout(&cells_container, grid.rows(), grid.columns(), cell_size);
    for (row_index, row) in cell_containers.iter().enumerate() {
        for (column_index, cell_container) in row.iter().enumerate() {
            let position = (column_index as u8, row_index as u8);

            if let Some(cell) = grid.cell(position) {
                let is_selected = app.cursor_position == position && !state.is_terminal();
                frame.render_widget(
                    build_cell_widget(cell, is_selected, state, cell_size),
                    *cell_container,
                );
            }
        }
    }

    cells_container
}

/// The method creates the base layout of the application: the field, the stats and the controls-legend.
fn create_app_layout(container: &Rect) -> (Rect, (Rect, Rect, Rect), Rect) {
    // the stats container's height is 3 rows: 2 for borders and one for the contents
    let stats_container_height = 3;
    let legend_container_height = LEGEND_TEXT.len() as u16;
    // the field container's height is all that's left
    let field_container_height = container
        .height
        .saturating_sub(stats_container_height + legend_container_height);

    let app_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            field_container_height,
            stats_container_height,
            legend_container_height,
        ]))
        .split(*container)
        .to_vec();

    // the stats are centered and split into 3 equal sections
    let stats_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([25, 50, 25]))
        .split(app_layout[1])[1];

    let flags_mines_and_time_containers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([33, 34, 33]))
        .split(stats_container)
        .to_vec();

    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(app_layout[2])[1];

    (
        app_layout[0],
        (
            flags_mines_and_time_containers[0],
            flags_mines_and_time_containers[1],
            flags_mines_and_time_containers[2],
        ),
        legend_container,
    )
}

/// Carves a `width` by `height` rectangle out of the middle of the container. Shrinks to the container if it's
/// too small.
fn center_in(container: &Rect, width: u16, height: u16) -> Rect {
    let remainder_height = container.height.saturating_sub(height);
    let remainder_width = container.width.saturating_sub(width);

    let middle_row = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            remainder_height / 2,
            height,
            remainder_height - remainder_height / 2,
        ]))
        .split(*container)[1];

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            remainder_width / 2,
            width,
            remainder_width - remainder_width / 2,
        ]))
        .split(middle_row)[1]
}

/// The grid layout is what's used to display the cells of the field.
///
/// The container is first divided into equal rows, and then each row is divided into equal cells.
fn build_grid_layout(
    container: &Rect,
    rows_amount: u8,
    columns_amount: u8,
    cell_size: CellSize,
) -> Vec<Vec<Rect>> {
    // divide the space vertically into rows
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows_amount).map(|_| Constraint::Length(cell_size.height())))
        .split(*container);

    // divide each row horizontally into cells
    vertical_layout
        .iter()
        .map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..columns_amount).map(|_| Constraint::Length(cell_size.width())))
                .split(*row)
                .to_vec()
        })
        .collect::<Vec<_>>()
}

/// The function builds a widget (basically, a paragraph) that represents a single cell.
///
/// Mines are red, revealed safe cells are gray with the amount of mines around (unless it's zero), closed cells
/// keep the default background and may show a flag. Once the round is lost, the mines nobody found and the wrong
/// flags are shown as well. Framed cells show the cursor with their border, compact ones with their background.
fn build_cell_widget(
    cell: &Cell,
    selected: bool,
    state: GameState,
    cell_size: CellSize,
) -> impl Widget {
    let game_lost = state == GameState::Lose;

    let (symbol, background, foreground) = if cell.is_revealed() {
        match cell.nearby_mines() {
            None => (MINE_SYMBOL.to_string(), MINE_CELL_COLOR, REGULAR_TEXT_COLOR),
            Some(0) => (String::new(), REVEALED_CELL_COLOR, REGULAR_TEXT_COLOR),
            Some(nearby_mines) => (
                format!(" {nearby_mines}"),
                REVEALED_CELL_COLOR,
                NEARBY_MINES_COLORS[usize::from(nearby_mines - 1).min(7)],
            ),
        }
    } else if game_lost && cell.is_flagged() && !cell.is_mined() {
        (
            WRONG_CHOICE_SYMBOL.to_string(),
            CLOSED_CELL_COLOR,
            REGULAR_TEXT_COLOR,
        )
    } else if cell.is_flagged() {
        (FLAG_SYMBOL.to_string(), CLOSED_CELL_COLOR, REGULAR_TEXT_COLOR)
    } else if game_lost && cell.is_mined() {
        (MINE_SYMBOL.to_string(), CLOSED_CELL_COLOR, REGULAR_TEXT_COLOR)
    } else {
        (String::new(), CLOSED_CELL_COLOR, REGULAR_TEXT_COLOR)
    };

    let block = match cell_size {
        CellSize::Framed => {
            let border_color = if selected {
                SELECTED_CELL_BORDER_COLOR
            } else {
                CELL_BORDER_COLOR
            };

            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(border_color))
                .bg(background)
        }
        CellSize::Compact if selected => Block::default().bg(SELECTED_CELL_BORDER_COLOR),
        CellSize::Compact => Block::default().bg(background),
    };

    Paragraph::new(symbol).fg(foreground).bold().block(block)
}

fn build_too_small_widget() -> impl Widget {
    Paragraph::new(TOO_SMALL_TEXT)
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Renders the end-of-round popup: the outcome, the time the round took and the controls.
fn render_outcome_popup(frame: &mut Frame, outcome_line: &str, seconds: u64, border_color: Color) {
    let (minutes, seconds) = split_minutes(seconds);

    let lines: Vec<String> = [
        outcome_line.to_string(),
        format!("Time: {minutes} min {seconds} sec"),
    ]
    .into_iter()
    .chain(OUTCOME_POPUP_HINT_TEXT.iter().map(|line| line.to_string()))
    .collect();

    render_popup(frame, lines, border_color);
}

/// Build a popup with the provided contents (lines of a text), set to it the provided border color and render it in the
/// center of the terminal.
///
/// The popup is as wide as the longest line and as high as the number of lines (plus the borders).
fn render_popup(frame: &mut Frame, lines: impl IntoIterator<Item = String>, border_color: Color) {
    let lines: Vec<String> = lines.into_iter().collect();
    let popup_height = lines.len() as u16 + 2;
    let popup_width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as u16
        + 4;

    let block = Block::default()
        .bg(APP_BG_COLOR)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let text = Paragraph::new(lines.join("\n"))
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(block);

    let container = center_in(&frame.size(), popup_width, popup_height);

    // clear the region so that it doesn't contain any old graphics
    frame.render_widget(Clear, container);
    frame.render_widget(text, container);
}

/// Prepares a paragraph to render as an info-block showing the number of flags placed on the field.
fn build_flags_info_widget(flags_amount: u16) -> impl Widget {
    Paragraph::new(flags_amount.to_string())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(FLAG_SYMBOL.trim()))
}

/// Prepares a paragraph to render as an info-block showing the total number of mines hidden in the field.
fn build_mines_info_widget(mines_amount: u16) -> impl Widget {
    Paragraph::new(mines_amount.to_string())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(MINE_SYMBOL.trim()))
}

/// Prepares a paragraph to render as an info-block showing the time it took from the beginning of the round.
fn build_time_info_widget(formatted_time: String) -> impl Widget {
    Paragraph::new(formatted_time)
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(CLOCK_SYMBOL))
}

fn build_info_widget_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(INFO_WIDGET_BLOCK_COLOR))
}

/// Splits seconds into whole minutes and the remaining seconds.
fn split_minutes(seconds: u64) -> (u64, u64) {
    (seconds / 60, seconds % 60)
}

/// Formats the duration of the round in seconds as `MM:SS`.
fn format_duration(seconds: u64) -> String {
    let (minutes, seconds) = split_minutes(seconds);
    format!("{:0>2}:{:0>2}", minutes, seconds)
}

/// The function builds the ready-to-use legend block (some text that provides information about the in-game controls).
fn build_legend_widget() -> impl Widget {
    let rows = LEGEND_TEXT.map(|legend_row| {
        let (keys, description) = legend_row.split_once(':').unwrap_or((legend_row, ""));

        Row::new([
            Line::from(keys).alignment(Alignment::Right),
            Line::from(format!(":{description}")).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50])).fg(LEGEND_TEXT_COLOR)
}
