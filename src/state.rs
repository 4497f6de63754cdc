use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::QuizBackend;
use crate::catalog::{CatalogAction, CatalogView};
use crate::error::{BackendError, QuizLoadError};
use crate::model::{Question, QuestionKind};
use crate::navigation::{Mode, ModeButton};
use crate::parser;
use crate::prefs::{PrefsStore, Theme};
use crate::session::{QuizSession, SubmitPrompt};
use crate::sync::{AnswerSync, SyncEvent};

/// Upper bound for the calls the UI waits on (catalog, saved answers).
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Quiz,
}

#[derive(Debug, PartialEq)]
pub enum Dialog {
    ConfirmSubmit(SubmitPrompt),
    ConfirmQuit,
    Alert(String),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Navigation,
    ChoiceSelect,
    TextInput,
}

pub struct AppState {
    pub screen: Screen,
    pub session: Option<QuizSession>,
    events: Option<UnboundedReceiver<SyncEvent>>,
    pub catalog: CatalogView,
    pub prefs: PrefsStore,
    backend: Arc<dyn QuizBackend>,
    runtime: Handle,
    pub root: PathBuf,
    pub start_in_all_mode: bool,
    pub input_mode: InputMode,
    pub dialog_stack: Vec<Dialog>,
    /// Question the keyboard acts on in all mode, 1-based.
    pub focus: usize,
    pub choice_cursor: usize,
    pub text_input: String,
    /// Cursor position in chars, not bytes.
    pub text_cursor: usize,
    pub sidebar_scroll: usize,
    pub question_scroll: usize,
    pub result_scroll: usize,
    /// Card the question pane should bring into view on the next frame.
    pub scroll_to: Option<usize>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(backend: Arc<dyn QuizBackend>, runtime: Handle, root: PathBuf, prefs: PrefsStore) -> Self {
        Self {
            screen: Screen::Catalog,
            session: None,
            events: None,
            catalog: CatalogView::default(),
            prefs,
            backend,
            runtime,
            root,
            start_in_all_mode: false,
            input_mode: InputMode::Navigation,
            dialog_stack: Vec::new(),
            focus: 1,
            choice_cursor: 0,
            text_input: String::new(),
            text_cursor: 0,
            sidebar_scroll: 0,
            question_scroll: 0,
            result_scroll: 0,
            scroll_to: None,
            should_quit: false,
        }
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme()
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.prefs.toggle_theme();
        tracing::debug!(theme = theme.name(), "theme changed");
    }

    /// Fetch the quiz list and show it.
    pub fn open_catalog(&mut self) {
        self.catalog = match self.wait_for("quiz list", self.backend.catalog()) {
            Some(catalog) => CatalogView::new(catalog),
            None => CatalogView::unavailable("Could not load the quiz list from the server."),
        };
        self.screen = Screen::Catalog;
        self.input_mode = InputMode::Navigation;
    }

    pub fn activate_catalog_row(&mut self) {
        if let CatalogAction::Open(file) = self.catalog.activate(&mut self.prefs) {
            if let Err(e) = self.open_quiz(&file) {
                tracing::warn!(quiz_file = %file, error = %e, "cannot open quiz");
                self.push_dialog(Dialog::Alert(e.to_string()));
            }
        }
    }

    pub fn open_quiz(&mut self, quiz_file: &str) -> Result<(), QuizLoadError> {
        let quiz = parser::load_quiz(&self.root, quiz_file)?;
        tracing::info!(quiz_file, questions = quiz.total(), "quiz opened");

        let (sync, events) = AnswerSync::new(Arc::clone(&self.backend), quiz_file, self.runtime.clone());
        let mut session = QuizSession::new(quiz, sync);
        if let Some(saved) = self.wait_for("saved answers", self.backend.saved_answers(quiz_file)) {
            session.restore_saved(&saved);
        }
        if self.start_in_all_mode {
            session.switch_mode(Mode::All, ModeButton::All);
        }

        self.session = Some(session);
        self.events = Some(events);
        self.screen = Screen::Quiz;
        self.dialog_stack.clear();
        self.focus = 1;
        self.question_scroll = 0;
        self.result_scroll = 0;
        self.sidebar_scroll = 0;
        self.scroll_to = None;
        self.load_input_for_focus();
        Ok(())
    }

    /// Leave the quiz for the list. The edit buffer is saved first.
    pub fn close_quiz(&mut self) {
        self.flush_answers();
        self.session = None;
        self.events = None;
        self.text_input.clear();
        self.text_cursor = 0;
        self.open_catalog();
    }

    /// Quit after committing the edit buffer and sending any save still
    /// waiting on the debounce.
    pub fn quit(&mut self) {
        self.flush_answers();
        self.should_quit = true;
    }

    fn flush_answers(&mut self) {
        self.commit_text();
        let runtime = self.runtime.clone();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.has_pending_save() {
            return;
        }
        let flushed = runtime.block_on(async {
            tokio::time::timeout(FETCH_TIMEOUT, session.flush_pending_save()).await
        });
        match flushed {
            Ok(_) => tracing::info!("pending open answer saved"),
            Err(_) => tracing::warn!("timed out saving pending open answer"),
        }
    }

    pub fn mode(&self) -> Mode {
        self.session
            .as_ref()
            .map(|s| s.navigator().mode())
            .unwrap_or_default()
    }

    /// 1-based index of the question keys apply to.
    pub fn focused_index(&self) -> usize {
        match (&self.session, self.mode()) {
            (Some(session), Mode::Single) => session.navigator().current(),
            _ => self.focus,
        }
    }

    pub fn focused_question(&self) -> Option<&Question> {
        let session = self.session.as_ref()?;
        self.focused_index()
            .checked_sub(1)
            .and_then(|i| session.questions().get(i))
    }

    pub fn results_visible(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.layout().results_visible)
            .unwrap_or(false)
    }

    /// Move the keyboard to question `index`. Single mode pages to it; all mode
    /// scrolls it into view.
    pub fn focus_question(&mut self, index: usize) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if index == 0 || index > session.quiz().total() {
            return;
        }
        self.commit_text();
        match self.mode() {
            Mode::Single => {
                if let Some(session) = self.session.as_mut() {
                    session.go_to_question(index);
                }
            }
            Mode::All => {
                self.focus = index;
                self.scroll_to = Some(index);
            }
        }
        self.load_input_for_focus();
    }

    pub fn focus_prev(&mut self) {
        match self.mode() {
            Mode::Single => {
                self.commit_text();
                if let Some(session) = self.session.as_mut() {
                    session.prev_question();
                }
                self.load_input_for_focus();
            }
            Mode::All => self.focus_question(self.focus.saturating_sub(1)),
        }
    }

    pub fn focus_next(&mut self) {
        match self.mode() {
            Mode::Single => {
                self.commit_text();
                if let Some(session) = self.session.as_mut() {
                    session.next_question();
                }
                self.load_input_for_focus();
            }
            Mode::All => self.focus_question(self.focus + 1),
        }
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.commit_text();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.switch_mode(mode, ModeButton::from(mode));
        if mode == Mode::All {
            self.focus = session.navigator().current();
            self.scroll_to = Some(self.focus);
        }
        self.load_input_for_focus();
    }

    /// Sync the editing buffers with the focused question's stored answer.
    pub fn load_input_for_focus(&mut self) {
        let (input_mode, text, cursor) = match (self.focused_question(), &self.session) {
            (Some(q), Some(session)) => match &q.kind {
                QuestionKind::Choice(choices) => {
                    let cursor = session
                        .answers()
                        .selected_choice(&q.id)
                        .and_then(|label| choices.iter().position(|c| label.starts_with(c.label)))
                        .unwrap_or(0);
                    (InputMode::ChoiceSelect, String::new(), cursor)
                }
                QuestionKind::Open => (InputMode::TextInput, session.answers().text(&q.id).to_string(), 0),
            },
            _ => (InputMode::Navigation, String::new(), 0),
        };
        self.input_mode = if self.results_visible() {
            InputMode::Navigation
        } else {
            input_mode
        };
        self.choice_cursor = cursor;
        self.text_cursor = text.chars().count();
        self.text_input = text;
    }

    pub fn select_choice(&mut self, idx: usize) {
        let Some(q) = self.focused_question() else {
            return;
        };
        let QuestionKind::Choice(choices) = &q.kind else {
            return;
        };
        let Some(choice) = choices.get(idx) else {
            return;
        };
        let (id, label) = (q.id.clone(), choice.label.to_string());
        self.choice_cursor = idx;
        if let Some(session) = self.session.as_mut() {
            session.select_choice(&id, &label);
        }
    }

    /// Hand the edit buffer to the session if it differs from what is stored.
    pub fn commit_text(&mut self) {
        let Some(q) = self.focused_question() else {
            return;
        };
        if !matches!(q.kind, QuestionKind::Open) {
            return;
        }
        let id = q.id.clone();
        if let Some(session) = self.session.as_mut() {
            if session.answers().text(&id) != self.text_input {
                session.update_open_answer(&id, &self.text_input);
            }
        }
    }

    pub fn request_submit(&mut self) {
        self.commit_text();
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.is_submitting() {
            return;
        }
        let dialog = match session.begin_submit() {
            Ok(prompt) => Dialog::ConfirmSubmit(prompt),
            Err(e) => Dialog::Alert(e.to_string()),
        };
        self.push_dialog(dialog);
    }

    pub fn confirm_submit(&mut self) {
        if let Some(Dialog::ConfirmSubmit(prompt)) = self.pop_dialog() {
            if let Some(session) = self.session.as_mut() {
                session.confirm_submit(prompt);
            }
        }
    }

    /// Apply finished network calls. Runs once per loop tick.
    pub fn drain_events(&mut self, now: Instant) {
        let (Some(session), Some(events)) = (self.session.as_mut(), self.events.as_mut()) else {
            return;
        };
        let mut results_replaced = false;
        while let Ok(event) = events.try_recv() {
            results_replaced |= matches!(event, SyncEvent::Submitted(_));
            session.handle_event(event, now);
        }
        session.prune_notices(now);
        let alert = session.take_alert();

        if results_replaced {
            self.result_scroll = 0;
            self.load_input_for_focus();
        }
        if let Some(message) = alert {
            self.push_dialog(Dialog::Alert(message));
        }
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }

    /// Run a backend call to completion from the UI thread. Failures are
    /// logged and come back as `None`.
    fn wait_for<T, F>(&self, what: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(FETCH_TIMEOUT, call).await });
        match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "cannot fetch {}", what);
                None
            }
            Err(_) => {
                tracing::warn!("timed out fetching {}", what);
                None
            }
        }
    }
}

/// Byte offset of the `chars`-th character of `text`.
pub fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_index_handles_multibyte_text() {
        let text = "图的遍历";
        assert_eq!(byte_index(text, 0), 0);
        assert_eq!(byte_index(text, 1), 3);
        assert_eq!(byte_index(text, 4), text.len());
        assert_eq!(byte_index(text, 10), text.len());
    }
}
