use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::App;

// Card rows moved by PageUp/PageDown
const PAGE_ROWS: usize = 3;

/// Poll for keyboard events with timeout
pub fn poll_event(timeout_ms: u64) -> anyhow::Result<Option<Event>> {
    if event::poll(Duration::from_millis(timeout_ms))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle keyboard input
pub fn handle_event(app: &mut App, event: Event) -> anyhow::Result<()> {
    if let Event::Key(key) = event {
        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        handle_key(app, key);
    }
    // Resize handled by ratatui automatically
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            app.insert_newline()
        }
        KeyCode::Enter => app.submit(),
        KeyCode::F(n @ 1..=3) => app.use_example(usize::from(n - 1)),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(PAGE_ROWS),
        KeyCode::PageDown => app.scroll_down(PAGE_ROWS),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}
