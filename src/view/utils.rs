//! Utility functions for rendering UI components

use ratatui::{
    style::{Color, Style},
    text::Span,
};

use crate::model::{Item, RowImage};

/// Shown until a row's artwork has loaded
pub const PHOTO_PLACEHOLDER: &str = "📷";

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Two-column thumbnail cell: the placeholder glyph or a swatch of the
/// artwork's average color
pub fn thumbnail_span(image: &RowImage) -> Span<'static> {
    match image {
        RowImage::Placeholder => Span::styled(PHOTO_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        RowImage::Loaded(thumb) => {
            let [r, g, b] = thumb.rgb;
            Span::styled("██", Style::default().fg(Color::Rgb(r, g, b)))
        }
    }
}

pub fn thumbnail_size(image: &RowImage) -> String {
    match image {
        RowImage::Placeholder => String::new(),
        RowImage::Loaded(thumb) => format!("{}x{}", thumb.width, thumb.height),
    }
}

pub fn release_year(item: &Item) -> String {
    item.release_year()
        .map(|year| year.to_string())
        .unwrap_or_default()
}
