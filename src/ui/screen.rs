use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::App,
    session::SessionState,
    ui::{render_paused, render_question, render_setup, review::render_review, timeline::render_timeline},
};

/// A UI Screen boundary: responsible for rendering one phase of the game
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_setup(app, area, buf);
    }
}

/// Multiple-choice question with countdown
pub struct QuestionScreen;

impl Screen for QuestionScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_question(app, area, buf);
    }
}

pub struct PausedScreen;

impl Screen for PausedScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_paused(app, area, buf);
    }
}

/// Drag-to-order event board
pub struct TimelineScreen;

impl Screen for TimelineScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_timeline(app, area, buf);
    }
}

/// Statistics and answer review
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_review(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    let session = app.controller.session();
    match session.state {
        SessionState::Setup => Box::new(SetupScreen),
        SessionState::Completed => Box::new(ResultsScreen),
        SessionState::Paused => Box::new(PausedScreen),
        _ if session.timeline().is_some() => Box::new(TimelineScreen),
        _ => Box::new(QuestionScreen),
    }
}
