//! Rendering for the board.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::task::Task;

use super::app::{AppState, InputMode, StatusKind};
use super::model::Row;

pub fn render(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_title(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &AppState, area: Rect) {
    let count = app.snapshot.tasks().len();
    let title = format!(
        " agenda · {} · {} task{}",
        app.today.format("%Y-%m-%d"),
        count,
        if count == 1 { "" } else { "s" }
    );
    let line = Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    // A failed store read replaces the list content entirely.
    if let Some(err) = app.load_error.as_ref() {
        let error = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("store error: {err}"),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                "press r to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(error, area);
        return;
    }

    let items: Vec<ListItem> = app.rows.iter().map(|row| row_item(row, app)).collect();
    let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(app.selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn row_item<'a>(row: &'a Row, app: &'a AppState) -> ListItem<'a> {
    match row {
        Row::Header(bucket) => ListItem::new(Line::from(Span::styled(
            bucket.label(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))),
        Row::Empty(bucket) => ListItem::new(Line::from(Span::styled(
            format!("  ({})", bucket.empty_label()),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))),
        Row::Task(task) => ListItem::new(task_line(task, app)),
    }
}

fn task_line<'a>(task: &'a Task, app: &'a AppState) -> Line<'a> {
    let checkbox = if task.completed { "  [x] " } else { "  [ ] " };
    let description_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(checkbox),
        Span::styled(format!("#{} ", task.id), Style::default().fg(Color::DarkGray)),
        Span::styled(task.description.as_str(), description_style),
    ];
    if let Some(due) = task.due_date {
        spans.push(Span::styled(
            format!("  due {}", due.format("%Y-%m-%d")),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(project) = task.project_id.as_deref() {
        spans.push(Span::styled(
            format!("  {}", app.config.project_name(project)),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

fn render_status(frame: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.mode {
        InputMode::AddTask { buffer } => Line::from(vec![
            Span::styled("New task: ", Style::default().fg(Color::Cyan)),
            Span::raw(buffer.as_str()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]),
        InputMode::EditDue { id, buffer } => Line::from(vec![
            Span::styled(
                format!("Due for #{id} (YYYY-MM-DD, empty clears): "),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(buffer.as_str()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]),
        InputMode::ConfirmDelete { id, description } => Line::from(Span::styled(
            format!("Delete #{id} '{description}'? y = delete, esc = cancel"),
            Style::default().fg(Color::Red),
        )),
        InputMode::Normal => match app.status_line() {
            Some((message, StatusKind::Error)) => {
                Line::from(Span::styled(message, Style::default().fg(Color::Red)))
            }
            Some((message, StatusKind::Info)) => {
                Line::from(Span::styled(message, Style::default().fg(Color::Blue)))
            }
            None => Line::default(),
        },
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = Line::from(Span::styled(
        app.footer_hint(),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(hint), area);
}
