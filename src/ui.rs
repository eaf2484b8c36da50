pub mod format;
pub mod review;
pub mod screen;
pub mod timeline;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};

use crate::{
    app::App,
    question::QuestionBody,
    results::Outcome,
    session::Snapshot,
    ui::format::{fit_width, format_clock, outcome_label},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const LOW_TIME_SECS: u32 = 5;

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn green_bold() -> Style {
    bold().fg(Color::Green)
}

pub(crate) fn red_bold() -> Style {
    bold().fg(Color::Red)
}

pub(crate) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self).render(self, area, buf);
    }
}

/// Score, streak and hints line shared by the playing screens
pub(crate) fn header_line(snapshot: &Snapshot<'_>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(snapshot.mode.to_string().to_uppercase(), bold().fg(Color::Cyan)),
        Span::raw(format!(
            "  Question {}/{}",
            snapshot.question_number, snapshot.total
        )),
        Span::raw("  Score "),
        Span::styled(snapshot.score.to_string(), bold()),
    ];
    if snapshot.streak > 1 {
        spans.push(Span::styled(
            format!("  Streak x{}", snapshot.streak),
            bold().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw(format!("  Hints {}", snapshot.hints_remaining)));
    Line::from(spans)
}

/// Multiple-choice question with countdown, options and, once answered,
/// the verdict and explanation
pub(crate) fn render_question(app: &App, area: Rect, buf: &mut Buffer) {
    let snapshot = app.controller.snapshot();
    let Some(question) = snapshot.question else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // header
                Constraint::Length(1), // countdown
                Constraint::Length(1),
                Constraint::Min(3),    // prompt
                Constraint::Length(question.options.len() as u16 + 1),
                Constraint::Length(3), // verdict + explanation
                Constraint::Length(1), // status
                Constraint::Length(1), // help
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(header_line(&snapshot)).render(chunks[0], buf);

    let ratio = if snapshot.time_limit == 0 {
        0.0
    } else {
        f64::from(snapshot.time_remaining) / f64::from(snapshot.time_limit)
    };
    let timer_color = if snapshot.time_remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Magenta
    };
    Gauge::default()
        .gauge_style(Style::default().fg(timer_color))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format_clock(snapshot.time_remaining))
        .render(chunks[1], buf);

    let prompt = match &question.question.body {
        QuestionBody::Quote { text, .. } => vec![
            Line::from(Span::styled(
                format!("\u{201c}{text}\u{201d}"),
                bold().add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled("Who said it?", dim())),
        ],
        _ => vec![Line::from(Span::styled(
            question.question.prompt().to_string(),
            bold(),
        ))],
    };
    Paragraph::new(prompt)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let option_width = chunks[4].width.saturating_sub(4) as usize;
    let options: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let label = format!("{}. {}", idx + 1, fit_width(option, option_width));
            let style = if snapshot.revealed.is_some() && idx == question.correct_index {
                green_bold()
            } else if snapshot.revealed.is_some() && snapshot.selected == Some(idx) {
                red_bold()
            } else if snapshot.eliminated.contains(&idx) {
                dim().add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            Line::from(Span::styled(label, style))
        })
        .collect();
    Paragraph::new(options).render(chunks[4], buf);

    if let Some(result) = snapshot.revealed {
        let verdict_style = match result.outcome {
            Outcome::Correct => green_bold(),
            Outcome::Wrong => red_bold(),
            Outcome::Skipped | Outcome::TimedOut => bold().fg(Color::Yellow),
        };
        let points = if result.points > 0 {
            format!("  +{}", result.points)
        } else if result.points < 0 {
            format!("  {}", result.points)
        } else {
            String::new()
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(outcome_label(result.outcome), verdict_style),
                Span::raw(points),
            ]),
            Line::from(Span::styled(result.explanation.clone(), dim())),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(chunks[5], buf);
    }

    if let Some(status) = &app.status {
        Paragraph::new(Span::styled(status.clone(), Style::default().fg(Color::Yellow)))
            .render(chunks[6], buf);
    }

    Paragraph::new(Span::styled(
        "1-4 answer  h hint  s skip  p pause  f finish  r restart  esc quit",
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}

pub(crate) fn render_paused(app: &App, area: Rect, buf: &mut Buffer) {
    let snapshot = app.controller.snapshot();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(header_line(&snapshot)).render(chunks[0], buf);
    Paragraph::new(Span::styled(
        format!(
            "PAUSED - {} left, press p to continue",
            format_clock(snapshot.time_remaining)
        ),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[2], buf);
}

/// Shown while no session is running, e.g. after a restart was refused
pub(crate) fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled(
        app.config.mode.to_string().to_uppercase(),
        bold().fg(Color::Cyan),
    ))
    .render(chunks[0], buf);

    let message = app
        .status
        .clone()
        .unwrap_or_else(|| "No session running".to_string());
    Paragraph::new(Span::styled(message, red_bold()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);
    Paragraph::new(Span::styled("(r)etry (esc)ape", dim()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}


#[cfg(test)]
mod tests {
    use super::test_support::{app, draw};
    use crate::app::KeyOutcome;
    use crate::config::GameMode;
    use crate::session::SessionState;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_question_screen_shows_prompt_and_options() {
        let app = app(GameMode::Trivia);
        let screen = draw(&app);
        let question = app.controller.session().current_question().unwrap();
        assert!(screen.contains("TRIVIA"));
        assert!(screen.contains("Question 1/10"));
        assert!(screen.contains(&format!("1. {}", question.options[0])));
        assert!(screen.contains("0:15"));
    }

    #[test]
    fn test_quote_screen_asks_for_author() {
        let app = app(GameMode::Quotes);
        assert!(draw(&app).contains("Who said it?"));
    }

    #[test]
    fn test_revealed_answer_shows_explanation() {
        let mut app = app(GameMode::Trivia);
        app.controller.skip();
        let screen = draw(&app);
        assert!(screen.contains("Skipped"));
    }

    #[test]
    fn test_paused_screen() {
        let mut app = app(GameMode::Trivia);
        app.controller.pause();
        assert!(draw(&app).contains("PAUSED"));
    }

    #[test]
    fn test_failed_restart_shows_reason() {
        let mut app = app(GameMode::Trivia);
        app.config.category = Some("atlantis".into());
        let outcome = app.on_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        assert_eq!(outcome, KeyOutcome::Continue);
        assert_eq!(app.controller.session().state, SessionState::Setup);

        let screen = draw(&app);
        assert!(screen.contains("TRIVIA"));
        assert!(screen.contains("no trivia questions match category"));
        assert!(screen.contains("atlantis"));
        assert!(screen.contains("(r)etry"));
    }

    #[test]
    fn test_setup_screen_without_status() {
        let mut app = app(GameMode::Timeline);
        app.controller.reset();
        let screen = draw(&app);
        assert!(screen.contains("TIMELINE"));
        assert!(screen.contains("No session running"));
    }
}
