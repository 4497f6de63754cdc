use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::AppState;
use crate::ui::layout::grid_columns;
use crate::ui::theme::palette;

/// First grid row on screen, chosen so the highlighted entry stays visible.
fn scroll_offset(state: &AppState, rows_visible: usize, columns: usize) -> usize {
    let Some(session) = state.session.as_ref() else {
        return 0;
    };
    let current_row = session.nav_info().highlighted.saturating_sub(1) / columns;
    if rows_visible == 0 {
        return 0;
    }
    if current_row >= state.sidebar_scroll + rows_visible {
        current_row + 1 - rows_visible
    } else if current_row < state.sidebar_scroll {
        current_row
    } else {
        state.sidebar_scroll
    }
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(session) = state.session.as_ref() else {
        return;
    };
    if area.width == 0 {
        return;
    }
    let colors = palette(state.theme());
    let total = session.quiz().total();
    let columns = grid_columns(area.width);
    let rows_visible = area.height.saturating_sub(1) as usize;
    let offset = scroll_offset(state, rows_visible, columns);
    let highlighted = session.nav_info().highlighted;

    let mut lines: Vec<Line> = Vec::new();
    let indices: Vec<usize> = (1..=total).collect();
    for row in indices.chunks(columns).skip(offset).take(rows_visible) {
        let mut spans = vec![Span::raw(" ")];
        for &index in row {
            let answered = session.is_marked(index);
            let marker = if answered { "✓" } else { " " };
            let mut style = if answered {
                Style::default().fg(colors.answered)
            } else {
                Style::default().fg(colors.fg)
            };
            if index == highlighted {
                style = style.bg(colors.highlight_bg).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("{:>3}{}", index, marker), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    let progress = session.progress();
    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(format!(" {}/{} answered ", progress.answered, progress.total))
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(colors.muted))
        .style(Style::default().bg(colors.bg).fg(colors.fg));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Question under a click at (`x`, `y`), if any.
pub fn grid_hit(state: &AppState, area: Rect, x: u16, y: u16) -> Option<usize> {
    let session = state.session.as_ref()?;
    if x < area.x + 1 || x >= area.x + area.width.saturating_sub(1) {
        return None;
    }
    if y < area.y + 1 || y >= area.y + area.height {
        return None;
    }
    let columns = grid_columns(area.width);
    let rows_visible = area.height.saturating_sub(1) as usize;
    let row = (y - area.y - 1) as usize + scroll_offset(state, rows_visible, columns);
    let col = (x - area.x - 1) as usize / 5;
    if col >= columns {
        return None;
    }
    let index = row * columns + col + 1;
    (index <= session.quiz().total()).then_some(index)
}
