use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::App;
use crate::ordering::canonical_order;
use crate::question::format_year;
use crate::results::{Outcome, SessionStats};
use crate::session::TimelineBoard;
use crate::ui::{
    bold, dim,
    format::{fit_width, format_percent, outcome_label},
    green_bold, red_bold,
};

fn stats_lines(stats: &SessionStats, best: Option<u32>) -> Vec<Line<'static>> {
    let mut headline = vec![
        Span::styled(format!("{} points", stats.score), bold().fg(Color::Cyan)),
        Span::raw(format!(
            "   {}/{} correct   {} accuracy",
            stats.correct_answers,
            stats.total_questions,
            format_percent(stats.accuracy)
        )),
    ];
    match best {
        Some(best) if stats.score > best => {
            headline.push(Span::styled("   new best!", bold().fg(Color::Yellow)))
        }
        Some(best) => headline.push(Span::styled(format!("   best {best}"), dim())),
        None => {}
    }

    let details = Line::from(Span::styled(
        format!(
            "wrong {}  skipped {} ({} timed out)  max streak {}  hints {}  avg {:.1}s",
            stats.wrong_answers,
            stats.skipped,
            stats.timed_out,
            stats.max_streak,
            stats.hints_used,
            stats.average_time_per_question
        ),
        dim(),
    ));
    vec![Line::from(headline), details]
}

fn outcome_style(outcome: Outcome) -> Style {
    match outcome {
        Outcome::Correct => green_bold(),
        Outcome::Wrong => red_bold(),
        Outcome::Skipped | Outcome::TimedOut => Style::default().fg(Color::Yellow),
    }
}

fn question_rows(app: &App, width: usize) -> Vec<Row<'static>> {
    app.controller
        .results()
        .iter()
        .enumerate()
        .skip(app.review_scroll)
        .map(|(idx, result)| {
            Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(Span::styled(
                    outcome_label(result.outcome),
                    outcome_style(result.outcome),
                )),
                Cell::from(fit_width(&result.prompt, width)),
                Cell::from(fit_width(
                    result.selected_answer.as_deref().unwrap_or("-"),
                    width / 2,
                )),
                Cell::from(fit_width(&result.correct_answer, width / 2)),
                Cell::from(format!("{:+}", result.points)),
            ])
        })
        .collect()
}

fn timeline_rows(board: &TimelineBoard, width: usize) -> Vec<Row<'static>> {
    let placed = board.last_attempt();
    canonical_order(&board.events)
        .into_iter()
        .enumerate()
        .map(|(idx, event)| {
            let verdict = placed.and_then(|attempt| {
                attempt
                    .verification
                    .per_item
                    .iter()
                    .find(|item| item.event_id == event.id)
            });
            let (mark, style) = match verdict {
                Some(item) if item.is_correct => ("✓", green_bold()),
                Some(_) => ("✗", red_bold()),
                None => ("-", dim()),
            };
            Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(Span::styled(mark, style)),
                Cell::from(format_year(event.year)),
                Cell::from(fit_width(&event.title, width)),
            ])
        })
        .collect()
}

/// Final statistics followed by a per-question (or per-event) review
pub fn render_review(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(2), // stats
            Constraint::Length(1),
            Constraint::Min(0), // review table
            Constraint::Length(1), // help
        ])
        .split(area);

    let mode = app.controller.mode();
    Paragraph::new(format!("{} complete", mode.to_string().to_uppercase()))
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if let Some(stats) = app.controller.statistics() {
        Paragraph::new(stats_lines(&stats, app.best_score)).render(chunks[1], buf);
    }

    let width = chunks[3].width.saturating_sub(30) as usize;
    let table = match app.controller.session().timeline() {
        Some(board) => Table::new(
            timeline_rows(board, width),
            [
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(9),
                Constraint::Min(10),
            ],
        )
        .header(Row::new(vec!["#", "", "Year", "Event"]).style(bold())),
        None => Table::new(
            question_rows(app, width / 2),
            [
                Constraint::Length(3),
                Constraint::Length(10),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Length(6),
            ],
        )
        .header(
            Row::new(vec!["#", "Result", "Question", "Yours", "Answer", "Pts"]).style(bold()),
        ),
    };
    table
        .block(Block::default().borders(Borders::TOP).title(" Review "))
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "↑/↓ scroll  r play again  esc quit",
        dim().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

#[cfg(test)]
mod tests {
    use crate::config::GameMode;
    use crate::ui::test_support::{app, draw};

    #[test]
    fn test_results_screen_summarises_session() {
        let mut app = app(GameMode::Trivia);
        let correct = app.controller.session().current_question().unwrap().correct_index;
        app.controller.submit_answer(correct);
        app.controller.finish();
        let screen = draw(&app);
        assert!(screen.contains("TRIVIA complete"));
        assert!(screen.contains("1/10 correct"));
        assert!(screen.contains("10% accuracy"));
        assert!(screen.contains("Correct!"));
    }

    #[test]
    fn test_best_score_shown() {
        let mut app = app(GameMode::Quotes);
        app.best_score = Some(10_000);
        app.controller.finish();
        assert!(draw(&app).contains("best 10000"));
    }

    #[test]
    fn test_timeline_review_lists_years() {
        let mut app = app(GameMode::Timeline);
        app.controller.verify_order();
        app.controller.finish();
        let screen = draw(&app);
        assert!(screen.contains("TIMELINE complete"));
        let board = app.controller.session().timeline().unwrap();
        let earliest = board.events.iter().map(|e| e.year).min().unwrap();
        assert!(screen.contains(&crate::question::format_year(earliest)));
    }
}
