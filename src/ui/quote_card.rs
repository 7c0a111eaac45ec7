//! Quote of the day card
//!
//! Renders the current quote centered in a bordered card, with the role,
//! category and refresh status underneath.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Renders the quote card for the current app state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let card_area = card_rect(chunks[0]);
    let block = Block::default()
        .title(format!(" Quote of the Day · {} ", app.role))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(quote_lines(app))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, card_area);

    let footer = Paragraph::new(footer_line(app)).alignment(Alignment::Center);
    frame.render_widget(footer, chunks[1]);
}

fn quote_lines(app: &App) -> Vec<Line<'static>> {
    let Some(quote) = &app.quote else {
        return vec![
            Line::from(""),
            Line::from(Span::styled(
                "Loading quote...",
                Style::default().fg(Color::Cyan),
            )),
        ];
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("“{}”", quote.text),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("— {}", quote.author),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("#{}", quote.category),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    lines
}

fn footer_line(app: &App) -> Line<'static> {
    let updated = match (app.refreshing, app.last_updated) {
        (true, _) => "Refreshing...".to_string(),
        (false, Some(at)) => format!("Updated {}", at.format("%H:%M")),
        (false, None) => String::new(),
    };

    Line::from(vec![
        Span::styled(updated, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ])
}

/// Centers the card, capping its width for readability
fn card_rect(area: Rect) -> Rect {
    let width = area.width.min(72);
    let height = area.height.min(14);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
