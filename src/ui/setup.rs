use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, SetupField};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(17),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let box_area = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(64),
        Constraint::Fill(1),
    ])
    .split(chunks[1])[1];

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "AI TRIVIA",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Test your knowledge with AI-generated questions".fg(Color::DarkGray)),
        Line::from(""),
        choice_line("Topic", app.topic_label(), app.focus() == SetupField::Topic),
    ];

    if app.is_custom_topic() {
        content.push(input_line(
            app.custom_topic(),
            app.focus() == SetupField::CustomTopic,
        ));
    } else {
        content.push(Line::from(""));
    }

    content.extend([
        choice_line(
            "Difficulty",
            &app.difficulty().to_string(),
            app.focus() == SetupField::Difficulty,
        ),
        Line::from(""),
        choice_line(
            "Questions",
            &app.count().get().to_string(),
            app.focus() == SetupField::Count,
        ),
        Line::from(""),
        start_line(app.focus() == SetupField::Start),
        Line::from(""),
    ]);

    if let Some(error) = app.error() {
        content.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red).bold(),
        )));
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, box_area);

    render_controls(frame, chunks[3], app.focus() == SetupField::CustomTopic);
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn choice_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = field_style(focused);
    let (left, right) = if focused { ("< ", " >") } else { ("  ", "  ") };

    Line::from(vec![
        Span::styled(format!("{:>10}  ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(left, style),
        Span::styled(value.to_string(), style),
        Span::styled(right, style),
    ])
}

fn input_line(text: &str, focused: bool) -> Line<'static> {
    let style = field_style(focused);
    let cursor = if focused { "_" } else { "" };
    let shown = if text.is_empty() && !focused {
        Span::styled("type a topic...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(format!("{}{}", text, cursor), style)
    };

    Line::from(vec![
        Span::styled(format!("{:>10}  ", "Custom"), Style::default().fg(Color::DarkGray)),
        shown,
    ])
}

fn start_line(focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Green).bold()
    };
    Line::from(Span::styled(" START GAME ", style))
}

fn render_controls(frame: &mut Frame, area: Rect, typing: bool) {
    let hint = if typing {
        "type topic  ·  tab/esc next field  ·  enter start"
    } else {
        "j/k field  ·  h/l change  ·  enter start  ·  q quit"
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
