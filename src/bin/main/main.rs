pub mod app;
pub mod event;
pub mod game_ui;
pub mod tui;
pub mod update;

use app::App;
use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use env_logger::{Builder, Env, Target};
use event::{Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, path::PathBuf};
use tui::Tui;
use update::{update, update_on_mouse};

/// How long to wait for input before redrawing anyway, in milliseconds.
const TICK_RATE: u64 = 250;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed the board generator to replay the same sequence of boards
    #[arg(short, long)]
    seed: Option<u64>,
    /// Write log messages to this file (the terminal is busy drawing the board)
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

/// Logging goes to the file if one is given and nowhere otherwise. `RUST_LOG` picks the level.
fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("Couldn't create the log file {}", path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    // Create the terminal application.
    let mut app = App::new(args.seed);

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(TICK_RATE);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    // Start the main loop.
    while !app.should_quit {
        // Render the user interface.
        tui.draw(&mut app)?;
        // Handle events.
        match tui.events.next()? {
            Event::Key(key_event) => update(&mut app, key_event),
            Event::Mouse(mouse_event) => update_on_mouse(&mut app, mouse_event),
            Event::Tick | Event::Resize(_, _) => {}
        };
    }

    // Exit the user interface.
    tui.exit()?;
    Ok(())
}
