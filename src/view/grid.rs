//! Grid presentation: results as cells, `stride` cells per line

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{PresentedList, RowImage, UiState};
use super::table::empty_message;
use super::utils::{release_year, thumbnail_size, thumbnail_span, truncate_string};
use super::GRID_CELL_HEIGHT;

pub fn render_grid(frame: &mut Frame, area: Rect, list: &PresentedList, ui_state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", list.section(), list.len()))
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if list.is_empty() {
        frame.render_widget(empty_message(ui_state), inner);
        return;
    }

    let columns = list.stride() as u16;
    let cell_width = inner.width / columns.max(1);
    let range = list.visible_range();
    let first = range.start;

    for index in range {
        let Some(row) = list.row(index) else { continue };
        let offset = index - first;
        let cell = Rect {
            x: inner.x + (offset % list.stride()) as u16 * cell_width,
            y: inner.y + (offset / list.stride()) as u16 * GRID_CELL_HEIGHT,
            width: cell_width.saturating_sub(1),
            height: GRID_CELL_HEIGHT,
        };
        if cell.bottom() > inner.bottom() {
            break;
        }

        let selected = index == list.selected();
        let name_style = if selected {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        let width = cell.width as usize;

        let lines = vec![
            artwork_line(&row.image, width),
            Line::from(Span::styled(truncate_string(&row.item.name, width), name_style)),
            Line::from(Span::styled(
                truncate_string(&row.item.artist, width),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                truncate_string(&format!("{} {}", row.item.kind, release_year(&row.item)), width),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), cell);
    }
}

fn artwork_line(image: &RowImage, width: usize) -> Line<'static> {
    let size = thumbnail_size(image);
    Line::from(vec![
        thumbnail_span(image),
        Span::styled(
            truncate_string(&format!(" {}", size), width.saturating_sub(2)),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
