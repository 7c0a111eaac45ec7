//! UI rendering for the live quote widget

pub mod help_overlay;
pub mod quote_card;

pub use help_overlay::render as render_help_overlay;
pub use quote_card::render as render_quote_card;
