pub mod catalog;
pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod question;
pub mod result;
pub mod sidebar;
pub mod statusbar;
pub mod theme;
pub mod titlebar;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::navigation::Mode;
use crate::state::{AppState, Screen};

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();

    match state.screen {
        Screen::Catalog => draw_catalog(f, area, state),
        Screen::Quiz => draw_quiz(f, area, state),
    }

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}

/// The grid is part of single mode; after a submit the page layout decides.
pub fn sidebar_visible(state: &AppState) -> bool {
    state
        .session
        .as_ref()
        .map(|s| s.layout().nav_grid_visible && s.navigator().mode() == Mode::Single)
        .unwrap_or(false)
}

fn draw_catalog(f: &mut Frame, area: Rect, state: &AppState) {
    let layout = layout::compute_layout(area, false);
    titlebar::draw_titlebar(f, layout.titlebar, state);
    catalog::draw_catalog(f, layout.main, state);
    keybar::draw_keybar(f, layout.keybar, state);
}

fn draw_quiz(f: &mut Frame, area: Rect, state: &AppState) {
    let layout = layout::compute_layout(area, sidebar_visible(state));
    let page = state
        .session
        .as_ref()
        .map(|s| s.layout())
        .unwrap_or_default();

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    if page.questions_visible {
        question::draw_question(f, layout.main, state);
    } else if page.results_visible {
        result::draw_results(f, layout.main, state);
    }
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);
}
