use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::{format_count, RepositoryRecord};

pub const CARD_WIDTH: u16 = 32;
pub const CARD_HEIGHT: u16 = 7; // borders(2) + name + owner + stars + forks + issues

const USER: Color = Color::Rgb(255, 191, 116);
const STAR: Color = Color::Rgb(255, 215, 0);
const FORK: Color = Color::Rgb(129, 195, 245);
const ISSUE: Color = Color::Rgb(241, 138, 147);

/// How many cards fit side by side in `width` columns. Never zero.
pub fn columns_for(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// First grid row to draw so that `selected_row` stays on screen.
pub fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

pub fn render(frame: &mut Frame, app: &App, repos: &[RepositoryRecord], area: Rect) {
    if repos.is_empty() {
        let empty = Paragraph::new("No repositories found")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = columns_for(area.width);
    app.columns.set(columns);

    let card_width = area.width / columns as u16;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(app.card_index / columns, visible_rows);

    let rows = repos
        .chunks(columns)
        .enumerate()
        .skip(first_row)
        .take(visible_rows);

    for (row, cards) in rows {
        let y = area.y + ((row - first_row) as u16) * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }

        for (col, repo) in cards.iter().enumerate() {
            let index = row * columns + col;
            let card_area = Rect {
                x: area.x + col as u16 * card_width,
                y,
                width: card_width,
                height,
            };
            render_card(frame, index + 1, repo, index == app.card_index, card_area);
        }
    }
}

fn render_card(
    frame: &mut Frame,
    rank: usize,
    repo: &RepositoryRecord,
    selected: bool,
    area: Rect,
) {
    let inner_width = area.width.saturating_sub(2) as usize;

    let (title_style, border_style) = if selected {
        (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (
            Style::default().fg(Color::Gray),
            Style::default().fg(Color::DarkGray),
        )
    };

    let mut owner = vec![
        Span::styled("@ ", Style::default().fg(USER)),
        Span::raw(repo.owner.login.clone()),
    ];
    if selected {
        owner.push(tooltip("GitHub username"));
    }

    let lines = vec![
        Line::from(Span::styled(
            truncate(&repo.name, inner_width),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(owner),
        stat_line("★", STAR, repo.stars, "stars"),
        stat_line("⑂", FORK, repo.forks, "forks"),
        stat_line("⚠", ISSUE, repo.open_issues, "open issues"),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(format!(" #{} ", rank), title_style)),
    );

    frame.render_widget(card, area);
}

fn stat_line(icon: &'static str, color: Color, count: u64, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::raw(format!("{} {}", format_count(count), label)),
    ])
}

/// Hint shown next to a field of the selected card.
fn tooltip(text: &str) -> Span<'static> {
    Span::styled(
        format!("  ({})", text),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
