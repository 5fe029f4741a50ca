//! Table presentation: one line per result

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{PresentedList, UiState};
use super::utils::{release_year, thumbnail_size, thumbnail_span, truncate_string};

pub fn render_table(frame: &mut Frame, area: Rect, list: &PresentedList, ui_state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", list.section(), list.len()))
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if list.is_empty() {
        frame.render_widget(empty_message(ui_state).block(block), area);
        return;
    }

    // Format: "{thumb} {size}   {name}   {artist}   {kind}   {year}"
    let content_width = area.width.saturating_sub(4) as usize;
    let size_width = 9;
    let kind_width = 14;
    let year_width = 4;
    let fixed_width = 2 + 1 + size_width + 3 + 3 + 3 + kind_width + 3 + year_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let name_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(name_width);

    let selected = list.selected();
    let items: Vec<ListItem> = list
        .visible_range()
        .filter_map(|index| list.row(index).map(|row| (index, row)))
        .map(|(index, row)| {
            let style = if index == selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let line = Line::from(vec![
                thumbnail_span(&row.image),
                Span::styled(
                    format!(" {:<size_width$}   ", thumbnail_size(&row.image)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_string(&row.item.name, name_width), style),
                Span::raw("   "),
                Span::styled(
                    truncate_string(&row.item.artist, artist_width),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("   "),
                Span::styled(
                    truncate_string(&row.item.kind, kind_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("{:>year_width$}", release_year(&row.item)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

pub(super) fn empty_message(ui_state: &UiState) -> Paragraph<'static> {
    let text = if ui_state.search_text.is_empty() {
        "Type to search the iTunes catalog\n\nTab switches category, Ctrl+T switches between table and grid"
    } else {
        "No results"
    };
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}
