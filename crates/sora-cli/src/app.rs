use sora_client::{Session, SubmitError};
use std::cell::Cell;

pub const CARDS_PER_ROW: usize = 3;

pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "A futuristic city with flying cars at night, neon lights reflecting on wet streets",
    "A majestic dragon soaring through clouds at sunset with golden light",
    "An underwater scene with colorful coral reefs and tropical fish swimming gracefully",
];

/// Application state
pub struct App {
    pub session: Session,
    pub server_url: String,
    pub should_quit: bool,

    // Prompt input
    pub input: String,

    // Last refusal or error, shown under the input
    pub notice: Option<String>,

    // Advances once per frame, drives the spinner
    pub tick: usize,

    // First card row drawn; row 0 holds the newest records
    pub scroll_row: usize,

    // Card rows that fit on screen, written back by the renderer
    pub visible_rows: Cell<usize>,
}

impl App {
    pub fn new(session: Session, server_url: String) -> Self {
        Self {
            session,
            server_url,
            should_quit: false,
            input: String::new(),
            notice: None,
            tick: 0,
            scroll_row: 0,
            visible_rows: Cell::new(1),
        }
    }

    /// Input is locked while any generation is running.
    pub fn input_enabled(&self) -> bool {
        !self.session.is_generating()
    }

    pub fn insert_char(&mut self, c: char) {
        if self.input_enabled() {
            self.input.push(c);
        }
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.input_enabled() {
            self.input.pop();
        }
    }

    pub fn use_example(&mut self, index: usize) {
        if !self.input_enabled() {
            return;
        }
        if let Some(example) = EXAMPLE_PROMPTS.get(index) {
            self.input = example.to_string();
        }
    }

    pub fn submit(&mut self) {
        match self.session.submit(&self.input) {
            Ok(_) => {
                self.input.clear();
                self.notice = None;
            }
            // Nothing typed yet: same as an inert button
            Err(SubmitError::EmptyPrompt) => {}
            Err(e @ SubmitError::Busy) => {
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Called once per frame: apply arrived updates and advance the spinner.
    pub fn on_tick(&mut self) {
        self.session.drain();
        if !self.session.is_generating() {
            // A busy refusal is stale once nothing is running
            self.notice = None;
        }
        self.tick = self.tick.wrapping_add(1);
    }

    /// Rows in the card grid.
    pub fn card_rows(&self) -> usize {
        self.session.records().len().div_ceil(CARDS_PER_ROW)
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_row = self.scroll_row.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        let last = self.card_rows().saturating_sub(self.visible_rows.get().max(1));
        self.scroll_row = (self.scroll_row + rows).min(last);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sora_client::Client;

    fn test_app() -> App {
        let url = "http://127.0.0.1:9".to_string();
        App::new(Session::new(Client::new(&url).unwrap()), url)
    }

    #[tokio::test]
    async fn test_editing_and_examples() {
        let mut app = test_app();
        app.insert_char('h');
        app.insert_char('i');
        app.insert_newline();
        app.insert_char('x');
        app.backspace();
        assert_eq!(app.input, "hi\n");

        app.use_example(1);
        assert_eq!(app.input, EXAMPLE_PROMPTS[1]);

        app.use_example(7);
        assert_eq!(app.input, EXAMPLE_PROMPTS[1]);
    }

    #[tokio::test]
    async fn test_submit_clears_input_and_locks_editing() {
        let mut app = test_app();
        app.use_example(0);
        app.submit();

        assert!(app.input.is_empty());
        assert_eq!(app.session.records().len(), 1);
        assert!(!app.input_enabled());

        app.insert_char('z');
        assert!(app.input.is_empty());
    }

    async fn run_to_idle(app: &mut App) {
        while app.session.is_generating() {
            if app.session.next_update().await.is_none() {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_busy_notice_clears_once_idle() {
        let mut app = test_app();
        app.session.submit("first").unwrap();
        app.input = "second".to_string();
        app.submit();
        assert!(app.notice.is_some());
        assert_eq!(app.input, "second");

        app.on_tick();
        if app.session.is_generating() {
            assert!(app.notice.is_some());
        }

        // Port 9 refuses the connection, so the record fails quickly
        run_to_idle(&mut app).await;
        app.on_tick();
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_scroll_is_bounded_by_card_rows() {
        let mut app = test_app();
        app.scroll_down(1);
        assert_eq!(app.scroll_row, 0);

        for i in 0..7 {
            app.session.submit(&format!("clip {}", i)).unwrap();
            run_to_idle(&mut app).await;
        }
        assert_eq!(app.card_rows(), 3);

        app.scroll_down(10);
        assert_eq!(app.scroll_row, 2);

        // Two rows on screen leave one row to scroll past
        app.visible_rows.set(2);
        app.scroll_down(10);
        assert_eq!(app.scroll_row, 1);
        app.scroll_down(1);
        assert_eq!(app.scroll_row, 1);
        app.scroll_up(5);
        assert_eq!(app.scroll_row, 0);
    }

    #[tokio::test]
    async fn test_empty_submit_is_ignored() {
        let mut app = test_app();
        app.insert_char(' ');
        app.submit();

        assert!(app.session.records().is_empty());
        assert!(app.notice.is_none());
        assert_eq!(app.input, " ");
    }
}
