use crate::app::CardView;
use blogfeed::render::messages;
use blogfeed::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Word wrap by display width. Words wider than `width` are split across lines.
pub(super) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn card_item(card: &CardView, is_selected: bool, width: usize) -> ListItem<'static> {
    let title_style = if is_selected {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut header = Vec::new();
    if let Some(indicator) = card.indicator {
        header.push(Span::styled(
            format!("{} ", indicator),
            Style::default().fg(Color::Cyan),
        ));
    }
    let date_width = card.date.as_deref().map_or(0, |d| display_width(d) + 2);
    let max_title = width.saturating_sub(date_width + 2);
    header.push(Span::styled(
        truncate_to_width(&card.title, max_title).into_owned(),
        title_style,
    ));
    if let Some(date) = &card.date {
        header.push(Span::styled(
            format!("  {}", date),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(header)];

    if !card.tags.is_empty() {
        let tags = card
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_to_width(&tags, width.saturating_sub(2))),
            Style::default().fg(Color::Magenta),
        )));
    }

    let text = card.body.as_deref().unwrap_or(&card.summary);
    let text_style = if card.body.is_some() {
        Style::default()
    } else {
        Style::default().fg(Color::Gray)
    };
    for line in wrap_text(text, width.saturating_sub(2)) {
        lines.push(Line::from(Span::styled(format!("  {}", line), text_style)));
    }
    lines.push(Line::from(""));

    ListItem::new(lines)
}

/// Render the cards on the current page.
pub(super) fn render_list(f: &mut Frame, cards: &[CardView], selected: usize, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| card_item(card, i == selected, width))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Blog"));
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// Render one article with its full content.
pub(super) fn render_single(f: &mut Frame, card: &CardView, area: Rect) {
    let mut lines = Vec::new();
    if let Some(date) = &card.date {
        lines.push(Line::from(Span::styled(
            date.clone(),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }
    let body = card.body.as_deref().unwrap_or(&card.summary);
    lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[b] {}", messages::BACK_TO_LIST),
        Style::default().fg(Color::Cyan),
    )));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(card.title.clone()),
        );
    f.render_widget(paragraph, area);
}
