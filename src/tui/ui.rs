use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::calendar::{self, WEEKDAY_LABELS};
use crate::models::TimeBlock;
use crate::state::{CalendarView, FeedbackKind, PlannerState};
use super::app::{App, InputMode};

/// Tasks listed per day in the week view.
const WEEK_PREVIEW: usize = 3;

fn accent(block: &TimeBlock) -> Color {
    match block {
        TimeBlock::Morning => Color::LightRed,
        TimeBlock::Afternoon => Color::Yellow,
        TimeBlock::Evening | TimeBlock::Other(_) => Color::LightBlue,
    }
}

pub fn ui<A>(f: &mut Frame, app: &mut App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with block tabs
            Constraint::Min(0),    // Calendar + tasks
            Constraint::Length(1), // Feedback
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    render_header(f, &app.planner.state, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[1]);

    render_calendar(f, &app.planner.state, body[0]);
    render_tasks(f, app, body[1]);
    render_feedback(f, &app.planner.state, chunks[2]);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | Tab/1-3: Block | a: Add | e: Edit | Space: Done | p: Priority | d: Del | h/l: Day | [/]: Page | t: Today | v: Month/Week | r: Reload",
        InputMode::Adding | InputMode::Editing => "Enter: Save | Esc: Cancel",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);

    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);
        let title = match app.input_mode {
            InputMode::Adding => format!("Add Task to {}", app.planner.state.selected_block.title()),
            _ => "Edit Task".to_string(),
        };
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

fn render_header(f: &mut Frame, state: &PlannerState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!("{}  ", state.selected_date.format("%a, %b %-d")),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (i, block) in TimeBlock::ALL.iter().enumerate() {
        let stats = state.block_stats(block);
        let label = format!(" {}:{} {}/{} ", i + 1, block, stats.completed, stats.total);
        let style = if *block == state.selected_block {
            Style::default().fg(Color::Black).bg(accent(block)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent(block))
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Daily Structured To-Do List"),
    );
    f.render_widget(header, area);
}

fn render_calendar(f: &mut Frame, state: &PlannerState, area: Rect) {
    let color = accent(&state.selected_block);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)].as_ref())
        .split(area);

    match state.calendar_view {
        CalendarView::Month => {
            let cells = calendar::month_grid(state.calendar_month);
            let rows: Vec<Row> = cells
                .chunks(7)
                .map(|week| {
                    Row::new(week.iter().map(|cell| match cell {
                        None => Cell::from(""),
                        Some(day) => {
                            let count = state.tasks_on(*day).len();
                            let text = if count > 0 {
                                format!("{:>2}·{}", day.format("%-d"), count)
                            } else {
                                format!("{:>2}", day.format("%-d"))
                            };
                            let mut style = Style::default();
                            if calendar::is_today(*day) {
                                style = style.fg(color).add_modifier(Modifier::BOLD);
                            }
                            if calendar::is_selected_date(*day, state.selected_date) {
                                style = style.fg(Color::Black).bg(color);
                            }
                            Cell::from(text).style(style)
                        }
                    }))
                })
                .collect();

            let table = Table::new(rows, [Constraint::Length(5); 7])
                .header(Row::new(WEEKDAY_LABELS).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Calendar - {}", calendar::month_label(state.calendar_month))),
                );
            f.render_widget(table, chunks[0]);
        }
        CalendarView::Week => {
            let mut lines = Vec::new();
            for (label, day) in WEEKDAY_LABELS.iter().zip(calendar::week_dates(state.selected_date)) {
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if calendar::is_selected_date(day, state.selected_date) {
                    style = style.fg(color);
                }
                let today = if calendar::is_today(day) { " (today)" } else { "" };
                lines.push(Line::styled(format!("{} {}{}", label, day.format("%b %-d"), today), style));

                let day_tasks = state.tasks_on(day);
                for t in day_tasks.iter().take(WEEK_PREVIEW) {
                    let dot = if t.is_priority { "●" } else { "○" };
                    lines.push(Line::raw(format!("  {} {}", dot, t.title)));
                }
                if day_tasks.len() > WEEK_PREVIEW {
                    lines.push(Line::styled(
                        format!("  +{} more", day_tasks.len() - WEEK_PREVIEW),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            let week = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Week View"))
                .wrap(Wrap { trim: false });
            f.render_widget(week, chunks[0]);
        }
    }

    let mut info = vec![
        Line::styled(
            format!("Selected: {}", state.selected_date.format("%A, %B %-d, %Y")),
            Style::default().fg(color),
        ),
        Line::raw(format!("{} tasks scheduled", state.tasks_on(state.selected_date).len())),
    ];
    if state.generating_routine {
        info.push(Line::styled("Generating daily routine...", Style::default().fg(color)));
    }
    let info = Paragraph::new(info).block(Block::default().borders(Borders::TOP));
    f.render_widget(info, chunks[1]);
}

fn render_tasks<A>(f: &mut Frame, app: &mut App<A>, area: Rect) {
    let state = &app.planner.state;
    let block = &state.selected_block;
    let color = accent(block);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)].as_ref())
        .split(area);

    let heading = Paragraph::new(vec![
        Line::styled(block.title().to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Line::styled(block.quote(), Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[0]);

    let rows: Vec<Row> = state
        .visible_tasks()
        .into_iter()
        .map(|t| {
            let style = if t.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(if t.is_priority { "★" } else { " " }).style(Style::default().fg(color)),
                Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                Cell::from(t.title.clone()),
            ])
            .style(style)
        })
        .collect();

    let stats = state.block_stats(block);
    let table = Table::new(rows, [Constraint::Length(2), Constraint::Length(4), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Tasks - {}/{} done", stats.completed, stats.total)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);
}

fn render_feedback(f: &mut Frame, state: &PlannerState, area: Rect) {
    let Some(feedback) = &state.feedback else {
        if state.loading {
            f.render_widget(Paragraph::new("Saving..."), area);
        }
        return;
    };
    let color = match feedback.kind {
        FeedbackKind::Success => Color::Green,
        FeedbackKind::Warning => Color::Yellow,
        FeedbackKind::Error => Color::Red,
    };
    let line = Paragraph::new(feedback.message.as_str()).style(Style::default().fg(color));
    f.render_widget(line, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
