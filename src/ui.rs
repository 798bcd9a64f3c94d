//! Render projection: one full frame per event from current state. Form on
//! the left, search bar and card list on the right, modal popups on top.

use crate::app::{App, Focus, FormField, Modal};
use crate::task::{needs_light_text, parse_hex_color};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(f.area());

    draw_form(f, app, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3), Constraint::Min(1), Constraint::Length(1)])
        .split(chunks[1]);

    draw_search(f, app, right[0]);
    draw_tasks(f, app, right[1]);
    draw_help(f, right[2]);

    match &app.modal {
        Some(Modal::Alert(message)) => draw_popup(f, "Notice", message, "press any key"),
        Some(Modal::Confirm { message, .. }) => draw_popup(f, "Confirm", message, "y: yes  n: no"),
        None => {}
    }
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let active = |field: FormField| {
        if app.focus == Focus::Form && app.form.field == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let kind_value = if app.form.kind.is_empty() {
        Span::styled("< select type >", Style::default().add_modifier(Modifier::DIM))
    } else {
        Span::raw(app.form.kind.clone())
    };

    let lines = vec![
        Line::from(vec![Span::styled("Name:        ", active(FormField::Name)), Span::raw(app.form.name.clone())]),
        Line::from(""),
        Line::from(vec![Span::styled("Type:        ", active(FormField::Kind)), kind_value]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Description: ", active(FormField::Description)),
            Span::raw(app.form.description.clone()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Color:       ", active(FormField::Color)), color_swatch(&app.form.color)]),
        Line::from(""),
        Line::from(Span::styled(
            format!("[ {} ]", app.form.submit_label()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let block = Block::default()
        .title(if app.form.editing.is_some() { "Edit Task" } else { "New Task" })
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::Form {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn color_swatch(color: &str) -> Span<'static> {
    match parse_hex_color(color) {
        Some((r, g, b)) => Span::styled(color.to_string(), Style::default().fg(Color::Rgb(r, g, b))),
        None => Span::raw(color.to_string()),
    }
}

fn draw_search(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Search")
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::Search {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    f.render_widget(Paragraph::new(app.search.clone()).block(block), area);
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible();
    let block = Block::default()
        .title("Tasks")
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::List {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if visible.is_empty() {
        let message = if app.store.is_empty() {
            "No tasks found. Add a new task!"
        } else {
            "No tasks match your search."
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|t| {
            let style = card_style(&t.color);
            ListItem::new(vec![
                Line::from(Span::styled(format!("[{}]", t.kind), style)),
                Line::from(Span::styled(t.name.clone(), style.add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(t.description.clone(), style)),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol(">> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// Card colors: the task's stored color as background, foreground picked by
/// the luminance rule. Unparseable colors keep the terminal defaults.
fn card_style(color: &str) -> Style {
    let Some((r, g, b)) = parse_hex_color(color) else {
        return Style::default();
    };
    let fg = if needs_light_text(color) { Color::White } else { Color::Black };
    Style::default().bg(Color::Rgb(r, g, b)).fg(fg)
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = "n: new  e: edit  d: delete  c: clear all  /: search  q: quit";
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().add_modifier(Modifier::DIM))),
        area,
    );
}

fn draw_popup(f: &mut Frame, title: &str, message: &str, hint: &str) {
    let area = centered_rect(50, f.area());
    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().add_modifier(Modifier::DIM))),
    ];
    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(5), Constraint::Min(1)])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
