use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::error::AppError;
use crate::navigation::Mode;
use crate::state::{byte_index, AppState, Dialog, InputMode, Screen};
use crate::ui;

pub fn run_tui(mut state: AppState) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<(), AppError> {
    loop {
        let size = terminal.size()?;
        apply_scroll_request(state, Rect::new(0, 0, size.width, size.height));
        terminal.draw(|f| ui::draw(f, state))?;

        if state.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, state),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(mouse, state, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }

        state.drain_events(Instant::now());
    }
    Ok(())
}

/// Turn a pending "show card N" into a scroll position for the question pane.
fn apply_scroll_request(state: &mut AppState, area: Rect) {
    let nav_request = state
        .session
        .as_mut()
        .and_then(|s| s.take_scroll_request());
    let target = state.scroll_to.take().or(nav_request);
    let Some(index) = target else {
        return;
    };
    if state.mode() == Mode::Single {
        state.question_scroll = 0;
        return;
    }
    let layout = ui::layout::compute_layout(area, ui::sidebar_visible(state));
    let width = layout.main.width.saturating_sub(1) as usize;
    if let Some((_, start)) = ui::question::card_offsets(state, width)
        .into_iter()
        .find(|(i, _)| *i == index)
    {
        state.question_scroll = start;
    }
}

fn handle_key(key: KeyEvent, state: &mut AppState) {
    if state.has_dialog() {
        handle_dialog_key(key, state);
        return;
    }
    match state.screen {
        Screen::Catalog => handle_catalog_key(key, state),
        Screen::Quiz => handle_quiz_key(key, state),
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState) {
    match state.top_dialog() {
        Some(Dialog::ConfirmSubmit(_)) => match key.code {
            KeyCode::Enter => state.confirm_submit(),
            KeyCode::Esc => {
                // Dropping the prompt cancels the submit.
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::ConfirmQuit) => match key.code {
            KeyCode::Enter => {
                state.pop_dialog();
                state.quit();
            }
            KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::Alert(_)) => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::Help) => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter => {
                state.pop_dialog();
            }
            _ => {}
        },
        None => {}
    }
}

fn handle_catalog_key(key: KeyEvent, state: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('t') if ctrl => state.toggle_theme(),
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => state.catalog.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.catalog.move_down(&state.prefs),
        KeyCode::Enter | KeyCode::Char(' ') => state.activate_catalog_row(),
        KeyCode::Char('r') => state.open_catalog(),
        _ => {}
    }
}

fn handle_quiz_key(key: KeyEvent, state: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings
    if ctrl {
        match key.code {
            KeyCode::Char('q') => state.push_dialog(Dialog::ConfirmQuit),
            KeyCode::Char('s') => state.request_submit(),
            KeyCode::Char('a') => state.switch_mode(Mode::All),
            KeyCode::Char('o') => state.switch_mode(Mode::Single),
            KeyCode::Char('t') => state.toggle_theme(),
            KeyCode::Char('l') => state.close_quiz(),
            KeyCode::Up | KeyCode::Left => state.focus_prev(),
            KeyCode::Down | KeyCode::Right => state.focus_next(),
            _ => {}
        }
        return;
    }

    if state.results_visible() {
        handle_results_key(key, state);
        return;
    }

    match state.input_mode {
        InputMode::TextInput => handle_text_input_key(key, state),
        InputMode::ChoiceSelect => handle_choice_key(key, state),
        InputMode::Navigation => handle_nav_key(key, state),
    }
}

fn handle_results_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.result_scroll = state.result_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => state.result_scroll += 1,
        KeyCode::PageUp => state.result_scroll = state.result_scroll.saturating_sub(10),
        KeyCode::PageDown => state.result_scroll += 10,
        KeyCode::Home => state.result_scroll = 0,
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => {}
    }
}

fn handle_text_input_key(key: KeyEvent, state: &mut AppState) {
    let len = state.text_input.chars().count();
    match key.code {
        KeyCode::Char(c) => {
            let at = byte_index(&state.text_input, state.text_cursor);
            state.text_input.insert(at, c);
            state.text_cursor += 1;
            state.commit_text();
        }
        KeyCode::Backspace => {
            if state.text_cursor > 0 {
                state.text_cursor -= 1;
                let at = byte_index(&state.text_input, state.text_cursor);
                state.text_input.remove(at);
                state.commit_text();
            }
        }
        KeyCode::Delete => {
            if state.text_cursor < len {
                let at = byte_index(&state.text_input, state.text_cursor);
                state.text_input.remove(at);
                state.commit_text();
            }
        }
        KeyCode::Left => state.text_cursor = state.text_cursor.saturating_sub(1),
        KeyCode::Right => state.text_cursor = (state.text_cursor + 1).min(len),
        KeyCode::Home => state.text_cursor = 0,
        KeyCode::End => state.text_cursor = len,
        KeyCode::Up => state.focus_prev(),
        KeyCode::Down | KeyCode::Enter | KeyCode::Tab => state.focus_next(),
        KeyCode::Esc => {
            state.commit_text();
            state.input_mode = InputMode::Navigation;
        }
        _ => {}
    }
}

fn handle_choice_key(key: KeyEvent, state: &mut AppState) {
    let option_count = match state.focused_question().map(|q| &q.kind) {
        Some(crate::model::QuestionKind::Choice(choices)) => choices.len(),
        _ => 0,
    };
    match key.code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() && c.to_ascii_lowercase() <= 'd' => {
            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            if idx < option_count {
                state.select_choice(idx);
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if state.choice_cursor < option_count {
                state.select_choice(state.choice_cursor);
            }
        }
        KeyCode::Tab => {
            if option_count > 0 {
                state.choice_cursor = (state.choice_cursor + 1) % option_count;
            }
        }
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => handle_nav_key(key, state),
    }
}

fn handle_nav_key(key: KeyEvent, state: &mut AppState) {
    let total = state
        .session
        .as_ref()
        .map(|s| s.quiz().total())
        .unwrap_or(0);
    match key.code {
        KeyCode::Up | KeyCode::Left => state.focus_prev(),
        KeyCode::Down | KeyCode::Right => state.focus_next(),
        KeyCode::Home => state.focus_question(1),
        KeyCode::End => state.focus_question(total),
        KeyCode::Enter => {
            let is_open = state.focused_question().map(|q| !q.is_choice()).unwrap_or(false);
            if is_open {
                state.input_mode = InputMode::TextInput;
                state.text_cursor = state.text_input.chars().count();
            }
        }
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => {}
    }
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState, size: Rect) {
    if state.has_dialog() {
        return;
    }
    let layout = ui::layout::compute_layout(size, ui::sidebar_visible(state));
    let inside = |r: Rect, x: u16, y: u16| {
        x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
    };
    let (x, y) = (mouse.column, mouse.row);

    match (state.screen, mouse.kind) {
        (Screen::Catalog, MouseEventKind::Down(MouseButton::Left)) => {
            if let Some(row) = ui::catalog::row_hit(state, layout.main, y) {
                let already_selected = row == state.catalog.cursor();
                state.catalog.select(row, &state.prefs);
                if already_selected {
                    state.activate_catalog_row();
                }
            }
        }
        (Screen::Catalog, MouseEventKind::ScrollUp) => state.catalog.move_up(),
        (Screen::Catalog, MouseEventKind::ScrollDown) => state.catalog.move_down(&state.prefs),
        (Screen::Quiz, MouseEventKind::Down(MouseButton::Left)) => {
            if inside(layout.sidebar, x, y) {
                if let Some(index) = ui::sidebar::grid_hit(state, layout.sidebar, x, y) {
                    state.focus_question(index);
                }
            } else if inside(layout.main, x, y) && !state.results_visible() {
                let width = layout.main.width.saturating_sub(1) as usize;
                let line = (y - layout.main.y) as usize + state.question_scroll;
                if let Some((index, choice)) = ui::question::choice_hit(state, width, line) {
                    if index != state.focused_index() {
                        state.focus_question(index);
                    }
                    state.select_choice(choice);
                }
            }
        }
        (Screen::Quiz, MouseEventKind::ScrollUp) => {
            if state.results_visible() {
                state.result_scroll = state.result_scroll.saturating_sub(1);
            } else {
                state.question_scroll = state.question_scroll.saturating_sub(1);
            }
        }
        (Screen::Quiz, MouseEventKind::ScrollDown) => {
            if state.results_visible() {
                state.result_scroll += 1;
            } else {
                state.question_scroll += 1;
            }
        }
        _ => {}
    }
}
