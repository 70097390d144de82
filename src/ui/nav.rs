use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

const SELECTED: Color = Color::Rgb(187, 46, 31);

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.language_index();

    let mut spans = Vec::with_capacity(app.languages.len() * 2);
    for (i, language) in app.languages.iter().enumerate() {
        let style = if Some(i) == selected {
            Style::default().fg(SELECTED).add_modifier(Modifier::BOLD)
        } else if app.controller().state().repos(language).is_some() {
            Style::default()
        } else {
            Style::default().fg(Color::Gray)
        };
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(language.to_string(), style));
    }

    // A language given on the command line may not be in the list.
    if selected.is_none() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            app.controller().current().to_string(),
            Style::default().fg(SELECTED).add_modifier(Modifier::BOLD),
        ));
    }

    let nav = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(nav, area);
}
