use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::game::{Feedback, GamePhase};
use crate::models::Question;
use crate::resolver;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Min(9),
        Constraint::Length(6),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.text);
    render_options(frame, chunks[2], question, app);

    if let Some(feedback) = app.feedback() {
        render_feedback(frame, chunks[3], feedback);
    }

    render_controls(frame, chunks[4], app.phase());
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let progress = format!(
        "Question {} of {}  ·  score {}",
        app.current_question_number(),
        app.total_questions(),
        app.score()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, app: &App) {
    let graded = app.feedback().is_some();
    let correct_index = resolver::correct_index(question);
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    if question.options.is_empty() {
        lines.push(Line::from(Span::styled(
            "This question came without any options.",
            Style::default().fg(Color::Red),
        )));
    }

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = index == app.selected_option();
        let is_correct = correct_index == Some(index as i64);

        let style = match (graded, is_selected, is_correct) {
            (true, _, true) => Style::default().fg(Color::Green).bold(),
            (true, true, false) => Style::default().fg(Color::Red).bold(),
            (true, false, false) => Style::default().fg(Color::DarkGray),
            (false, true, _) => Style::default().fg(Color::Cyan).bold(),
            (false, false, _) => Style::default().fg(Color::Gray),
        };
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS
            .get(index)
            .map_or_else(|| format!("{}.", index + 1), |c| format!("{}.", c));

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{} ", label), style),
            Span::styled(option.trim(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback) {
    let mut lines = Vec::new();

    if feedback.correct {
        lines.push(Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        )));
    } else {
        let answer = feedback
            .correct_answer
            .as_deref()
            .unwrap_or("(the model did not say)");
        lines.push(Line::from(vec![
            Span::styled("Wrong! ", Style::default().fg(Color::Red).bold()),
            Span::styled("The correct answer was: ", Style::default().fg(Color::Gray)),
            Span::styled(answer, Style::default().fg(Color::White).bold()),
        ]));
        if let Some(explanation) = &feedback.explanation {
            lines.push(Line::from(Span::styled(
                explanation.as_str(),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, phase: GamePhase) {
    let hint = match phase {
        GamePhase::Graded => "enter/n next question  ·  q quit",
        _ => "j/k navigate  ·  enter submit  ·  q quit",
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
