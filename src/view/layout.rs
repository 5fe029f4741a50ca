//! Layout rendering (search bar, scope bar, status line)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{MediaCategory, UiState, ViewMode};

pub fn render_search_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let (text, style) = if ui_state.search_text.is_empty() {
        ("Type to search...", Style::default().fg(Color::DarkGray))
    } else {
        (ui_state.search_text.as_str(), Style::default().fg(Color::Green))
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(search, area);
}

pub fn render_scope_bar(frame: &mut Frame, area: Rect, active: MediaCategory) {
    let tabs: Vec<Span> = MediaCategory::ALL
        .iter()
        .flat_map(|&category| {
            let style = if category == active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", category.title()), style), Span::raw("  ")]
        })
        .collect();

    let scope = Paragraph::new(Line::from(tabs)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Category (Tab to switch) "),
    );
    frame.render_widget(scope, area);
}

pub fn render_status_line(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    result_count: usize,
    is_searching: bool,
) {
    let mode = match ui_state.view_mode {
        ViewMode::Table => "Table",
        ViewMode::Grid => "Grid",
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} results ", result_count),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} · {} ", ui_state.category.title(), mode),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if is_searching {
        spans.push(Span::styled("· Searching...", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled("  F1 help", Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
