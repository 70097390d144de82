mod grid;
mod loading;
mod nav;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::state::Panel;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    nav::render(frame, app, chunks[1]);
    render_body(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.controller().current();
    let title = if current.is_all() {
        "popular - Most Starred Repositories".to_string()
    } else {
        format!("popular - Most Starred {} Repositories", current)
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    match app.controller().panel() {
        Panel::Loading => loading::render(frame, &app.loading_text(), area),
        Panel::Failed(message) => render_error(frame, message, middle_row(area)),
        Panel::Grid { repos, error } => {
            let grid_area = match error {
                Some(message) => {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(1), Constraint::Min(0)])
                        .split(area);
                    render_error(frame, message, chunks[0]);
                    chunks[1]
                }
                None => area,
            };
            grid::render(frame, app, repos, grid_area);
        }
    }
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let error = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = match &app.notice {
        Some(notice) => Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )]),
        None => Line::from(vec![Span::styled(
            "Tab/1-9: language | h/j/k/l: move | g/G: first/last | o: open | u: owner | y: yank url | q: quit",
            Style::default().fg(Color::Gray),
        )]),
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// One-line rect in the vertical middle of `area`.
fn middle_row(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}
