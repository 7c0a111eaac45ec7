//! Watch-mode application state
//!
//! Holds what the quote widget displays and translates key presses into
//! requests for the event loop in `main`.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use quotd::quote::{Quote, QuoteResponse, Role};

/// Main application struct for the live quote widget
pub struct App {
    /// Role whose quote is displayed
    pub role: Role,
    /// Quote currently on screen
    pub quote: Option<Quote>,
    /// Last status line (e.g. an API error behind a fallback quote)
    pub status: Option<String>,
    /// When the displayed quote last changed
    pub last_updated: Option<DateTime<Local>>,
    /// Flag indicating a forced refresh has been requested
    pub refresh_requested: bool,
    /// Flag indicating a refresh is in flight
    pub refreshing: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            quote: None,
            status: None,
            last_updated: None,
            refresh_requested: false,
            refreshing: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// Handles a key press
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('r') if !self.refreshing => {
                self.refresh_requested = true;
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    /// Takes a pending refresh request, marking the refresh as in flight
    pub fn take_refresh_request(&mut self) -> bool {
        if !self.refresh_requested {
            return false;
        }
        self.refresh_requested = false;
        self.refreshing = true;
        true
    }

    /// Shows a newly published quote
    pub fn apply_quote(&mut self, quote: Quote) {
        if self.quote.as_ref() != Some(&quote) {
            self.last_updated = Some(Local::now());
        }
        self.quote = Some(quote);
    }

    /// Records the outcome of a forced refresh
    pub fn apply_refresh_result(&mut self, response: QuoteResponse) {
        self.refreshing = false;
        self.status = (!response.success).then_some(response.message);
        self.apply_quote(response.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotd::quote::fallback_quote;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_new_app_is_empty() {
        let app = App::new(Role::Faculty);
        assert_eq!(app.role, Role::Faculty);
        assert!(app.quote.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_q_and_esc_quit() {
        let mut app = App::new(Role::Student);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new(Role::Student);
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new(Role::Student);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_r_requests_single_refresh() {
        let mut app = App::new(Role::Student);

        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.take_refresh_request());
        assert!(app.refreshing);

        // Ignored while the first refresh is in flight
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(!app.take_refresh_request());
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = App::new(Role::Student);
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(!app.refresh_requested);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_failed_refresh_shows_status() {
        let mut app = App::new(Role::Student);
        app.refreshing = true;

        app.apply_refresh_result(QuoteResponse::failed(
            fallback_quote(Role::Student),
            "API Error: offline",
        ));

        assert!(!app.refreshing);
        assert_eq!(app.status.as_deref(), Some("API Error: offline"));
        assert_eq!(app.quote.as_ref().map(|q| q.author.as_str()), Some("Nelson Mandela"));
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn test_successful_refresh_clears_status() {
        let mut app = App::new(Role::Admin);
        app.status = Some("API Error: offline".to_string());

        app.apply_refresh_result(QuoteResponse::ok(
            Quote::new("Fresh", "Someone", "random"),
            "Quote fetched successfully",
        ));

        assert!(app.status.is_none());
    }
}
