use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::App;
use crate::ui::{bold, dim, format::fit_width, green_bold, red_bold};

/// The ordering board: events top to bottom, earliest expected first.
/// Correctness marks from the last attempt stay visible until the player
/// rearranges something.
pub fn render_timeline(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.controller.session();
    let Some(board) = session.timeline() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1),
            Constraint::Min(board.events.len() as u16 + 2),
            Constraint::Length(1), // status
            Constraint::Length(1), // help
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("TIMELINE", bold().fg(Color::Cyan)),
        Span::raw(format!("  {} events", board.events.len())),
        Span::raw("  Score "),
        Span::styled(session.board.score.to_string(), bold()),
        Span::raw(format!("  Attempts left {}", board.attempts_left())),
    ]))
    .render(chunks[0], buf);

    let marks = board.last_attempt().filter(|attempt| {
        attempt
            .submitted
            .iter()
            .eq(board.events.iter().map(|e| &e.id))
    });

    let width = chunks[2].width.saturating_sub(10) as usize;
    let cursor = app.cursor.position.min(board.events.len().saturating_sub(1));
    let lines: Vec<Line> = board
        .events
        .iter()
        .enumerate()
        .map(|(idx, event)| {
            let pointer = match (idx == cursor, app.cursor.grabbed) {
                (true, true) => "≡ ",
                (true, false) => "> ",
                _ => "  ",
            };
            let mut style = match marks.map(|m| m.verification.per_item[idx].is_correct) {
                Some(true) => green_bold(),
                Some(false) => red_bold(),
                None => Style::default(),
            };
            if idx == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let mut spans = vec![
                Span::raw(pointer),
                Span::styled(format!("{}. ", idx + 1), dim()),
                Span::styled(fit_width(&event.title, width), style),
            ];
            if marks.is_some() {
                spans.push(Span::styled(format!("  ({})", event.period), dim()));
            }
            Line::from(spans)
        })
        .collect();

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Earliest first "),
        )
        .render(chunks[2], buf);

    if let Some(status) = &app.status {
        Paragraph::new(Span::styled(status.clone(), Style::default().fg(Color::Yellow)))
            .render(chunks[3], buf);
    }

    Paragraph::new(Span::styled(
        "↑/↓ move  space grab/drop  enter verify  f finish  r restart  esc quit",
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}
