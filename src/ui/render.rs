//! Render functions for the TUI.

use crate::app::{App, Body};
use blogfeed::render::messages;
use blogfeed::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{articles, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filter bar
            Constraint::Min(3),    // Articles
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Status
        ])
        .split(area);

    render_filter_bar(f, app, chunks[0]);

    match &app.screen.body {
        Body::Notice { text, retry } => render_notice(f, text, *retry, chunks[1]),
        Body::List { cards } => articles::render_list(f, cards, app.selected, chunks[1]),
        Body::Single(card) => articles::render_single(f, card, chunks[1]),
    }

    render_pagination(f, app, chunks[2]);
    status::render(f, app, chunks[3]);
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.search_mode {
        Line::from(vec![
            Span::styled("Recherche : ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", app.search_input)),
        ])
    } else {
        let filter = app.controller.filter();
        let mut spans = vec![
            Span::styled("Tag : ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                filter.tag().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        if !filter.search().is_empty() {
            spans.push(Span::styled(
                "  Recherche : ",
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::raw(
                truncate_to_width(filter.search(), area.width as usize / 2).into_owned(),
            ));
        }
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_notice(f: &mut Frame, text: &str, retry: bool, area: Rect) {
    let mut lines = vec![Line::from(""), Line::from(text.to_string())];
    if retry {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[r] {}", messages::RETRY),
            Style::default().fg(Color::Yellow),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_pagination(f: &mut Frame, app: &App, area: Rect) {
    let Some(p) = app.screen.pagination else {
        return;
    };
    let enabled = |on: bool| {
        if on {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let line = Line::from(vec![
        Span::styled(format!("[p] {}", messages::PREVIOUS), enabled(p.has_previous())),
        Span::raw("   "),
        Span::raw(messages::page_info(p.current, p.total)),
        Span::raw("   "),
        Span::styled(format!("{} [n]", messages::NEXT), enabled(p.has_next())),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
