//! Terminal events.

use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;

/// The events the main loop reacts to.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// Nothing happened during a whole tick. Still worth a redraw, the clock is running.
    Tick,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Waits for terminal events on the main thread, one per call.
#[derive(Debug)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// `tick_rate` is in milliseconds.
    pub fn new(tick_rate: u64) -> Self {
        EventHandler {
            tick_rate: Duration::from_millis(tick_rate),
        }
    }

    /// Returns the next event, or [`Event::Tick`] if none arrives within a tick.
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }

        Ok(match event::read()? {
            CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                Event::Key(key_event)
            }
            CrosstermEvent::Mouse(mouse_event) => Event::Mouse(mouse_event),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        })
    }
}
