mod quiz;
mod result;
mod setup;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state() {
        AppState::Setup => setup::render(frame, area, app),
        AppState::Generating => render_generating(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
    }
}

fn render_generating(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .split(area);

    let topic = app.topic().unwrap_or_default();
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GENERATING QUESTIONS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} · {} · {} questions",
                topic,
                app.difficulty(),
                app.count().get()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from("Waiting for the model...".fg(Color::Yellow)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);
}
