use color_eyre::Result;
use env_logger::Env;
use grid_sweeper::{BoardConfig, GameSession, GameState, Grid, SessionAction};
use std::io::{self, BufRead};

/// Parses a line like `r 3,5` (reveal the cell in the 4th column of the 6th row), `f 3,5` (toggle its flag) or `n`
/// (start a new round).
fn parse_action(input: &str) -> Option<SessionAction> {
    let mut words = input.split_whitespace();
    let action = words.next()?;

    if action == "n" {
        return words.next().is_none().then_some(SessionAction::Replay);
    }

    let [cell_position]: [&str; 1] = words.collect::<Vec<&str>>().as_slice().try_into().ok()?;

    let cell_position = cell_position
        .trim()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect::<Vec<u8>>();

    let cell_position = match cell_position.as_slice() {
        [column, row] => (*column, *row),
        _ => return None,
    };

    match action {
        "r" => Some(SessionAction::Reveal(cell_position)),
        "f" => Some(SessionAction::Flag(cell_position)),
        _ => None,
    }
}

fn print_grid(grid: &Grid) {
    println!("DISPLAY:\n{}", grid);
    log::trace!("DEBUG:\n{:?}", grid);
}

fn print_prompt() {
    println!("Enter the desired action and the target cell's coordinates (e.g. `f 3,5` to flag the cell in the 4th column of the 6th row, `n` for a new round):");
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let seed = std::env::args().nth(1).and_then(|seed| seed.parse().ok());
    let mut game = GameSession::new(BoardConfig::default(), seed);

    print_grid(game.grid());
    print_prompt();

    for line in io::stdin().lock().lines() {
        let line = line?;

        let Some(action) = parse_action(&line) else {
            println!("Incorrect input! Please, try again.");
            continue;
        };

        let state = game.take_action(action);
        print_grid(game.grid());

        match state {
            GameState::Win => println!(
                "You won in {} sec! `n` to play again.",
                game.elapsed_time().as_secs()
            ),
            GameState::Lose => println!(
                "You lost after {} sec... `n` to play again.",
                game.elapsed_time().as_secs()
            ),
            GameState::Playing => print_prompt(),
        }
    }

    Ok(())
}
