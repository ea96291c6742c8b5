//! Playlist rendering with `ratatui`.
//!
//! The renderer only sees what [`Playlist::visible_rows`] and
//! [`Playlist::totals`] project; it never touches the song list directly.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::playlist::{Playlist, VisibleRow};

/// `"<n>. <title>"` padded so the duration ends at the right edge.
fn row_text(row: &VisibleRow, width: usize) -> String {
    let duration_width = row.duration.chars().count();
    let room = width.saturating_sub(duration_width + 1);
    let label: String = format!("{}. {}", row.index + 1, row.title)
        .chars()
        .take(room)
        .collect();
    format!("{label:<room$} {}", row.duration)
}

fn row_style(row: &VisibleRow) -> Style {
    let mut style = Style::default();
    if row.is_selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if row.is_now_playing {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Draw the playlist window and the totals line into `frame`.
///
/// The list starts `start_pos` rows below the top of the frame.
pub fn draw(frame: &mut Frame, playlist: &Playlist) {
    let full = frame.area();
    let top = playlist.start_pos().min(full.height.saturating_sub(2));
    let area = Rect {
        y: full.y + top,
        height: full.height - top,
        ..full
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = chunks[0];

    let rows = playlist.visible_rows();
    for (offset, row) in rows.iter().enumerate().take(list_area.height as usize) {
        let Some(row) = row else {
            continue;
        };
        let area = Rect {
            y: list_area.y + offset as u16,
            height: 1,
            ..list_area
        };
        let line = Line::from(row_text(row, area.width as usize));
        frame.render_widget(Paragraph::new(line).style(row_style(row)), area);
    }

    let totals = Paragraph::new(playlist.totals().to_string()).alignment(Alignment::Right);
    frame.render_widget(totals, chunks[1]);
}
