use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_WIDTH: u16 = 24;

pub struct AppLayout {
    pub titlebar: Rect,
    /// Zero width when the navigation grid is hidden.
    pub sidebar: Rect,
    pub main: Rect,
    pub statusbar: Rect,
    pub keybar: Rect,
}

pub fn compute_layout(area: Rect, show_sidebar: bool) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // titlebar
            Constraint::Min(5),    // middle (sidebar + main)
            Constraint::Length(1), // statusbar
            Constraint::Length(1), // keybar
        ])
        .split(area);

    let sidebar_width = if show_sidebar { SIDEBAR_WIDTH } else { 0 };
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(vertical[1]);

    AppLayout {
        titlebar: vertical[0],
        sidebar: middle[0],
        main: middle[1],
        statusbar: vertical[2],
        keybar: vertical[3],
    }
}

/// Number of grid cells per row inside a sidebar of `width` columns.
pub fn grid_columns(width: u16) -> usize {
    // One cell is " 12✓" plus a space: 5 columns. The right border takes one.
    (width.saturating_sub(2) as usize / 5).max(1)
}
