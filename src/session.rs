//! One open quiz: navigation, answers, saves, submission and results.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDateTime};

use crate::answers::{Answer, AnswerStore};
use crate::error::SubmitError;
use crate::model::{Question, QuestionKind, Quiz};
use crate::navigation::{Mode, ModeButton, NavInfo, Navigator};
use crate::progress::{Progress, ProgressTracker};
use crate::results::{PageLayout, ResultsView};
use crate::sync::{AnswerSync, SyncEvent};

pub const SUBMIT_FAILED_ALERT: &str = "Submission failed, please try again.";

/// How long a "saved" notice stays next to its question.
pub const NOTICE_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveNotice {
    pub text: String,
    pub shown_at: Instant,
}

/// Confirmation step between pressing submit and sending. Dropping it cancels.
#[derive(Debug, PartialEq, Eq)]
pub struct SubmitPrompt {
    answered: usize,
    total: usize,
}

impl SubmitPrompt {
    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn message(&self) -> String {
        format!(
            "You answered {} of {} questions. Submit now?",
            self.answered, self.total
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Cancelled,
}

pub struct QuizSession {
    quiz: Quiz,
    nav: Navigator,
    answers: AnswerStore,
    progress: ProgressTracker,
    sync: AnswerSync,
    results: Option<ResultsView>,
    layout: PageLayout,
    notices: HashMap<String, SaveNotice>,
    alert: Option<String>,
    submitting: bool,
}

impl QuizSession {
    pub fn new(quiz: Quiz, sync: AnswerSync) -> Self {
        let nav = Navigator::new(quiz.total());
        let answers = AnswerStore::new();
        let mut progress = ProgressTracker::new();
        progress.recompute(&quiz.questions, &answers);
        Self {
            quiz,
            nav,
            answers,
            progress,
            sync,
            results: None,
            layout: PageLayout::default(),
            notices: HashMap::new(),
            alert: None,
            submitting: false,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn questions(&self) -> &[Question] {
        &self.quiz.questions
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn progress(&self) -> Progress {
        self.progress.progress()
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.progress.is_marked(index)
    }

    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Send the open answer still waiting on the debounce and wait for it.
    pub async fn flush_pending_save(&mut self) -> bool {
        self.sync.flush().await
    }

    pub fn has_pending_save(&self) -> bool {
        self.sync.has_pending_save()
    }

    /// Question shown in single mode.
    pub fn current_question(&self) -> Option<&Question> {
        self.nav
            .current()
            .checked_sub(1)
            .and_then(|i| self.quiz.questions.get(i))
    }

    /// Pre-fill answers the server already holds for this quiz.
    pub fn restore_saved(&mut self, saved: &HashMap<String, String>) -> usize {
        let restored = self.answers.restore(&self.quiz.questions, saved);
        self.progress.recompute(&self.quiz.questions, &self.answers);
        tracing::info!(quiz_file = %self.quiz.quiz_file, restored, "restored saved answers");
        restored
    }

    pub fn nav_info(&self) -> NavInfo {
        self.nav.info()
    }

    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.nav.take_scroll_request()
    }

    pub fn go_to_question(&mut self, index: usize) {
        self.nav.go_to_question(index);
    }

    pub fn prev_question(&mut self) {
        self.nav.prev_question();
    }

    pub fn next_question(&mut self) {
        self.nav.next_question();
    }

    pub fn switch_mode(&mut self, mode: Mode, trigger: ModeButton) {
        self.nav.switch_mode(mode, trigger);
    }

    /// Select option `label` and save it straight away. Ignored unless the
    /// question is a choice question offering that label.
    pub fn select_choice(&mut self, question_id: &str, label: &str) {
        let offered = self
            .quiz
            .question(question_id)
            .map(|q| q.has_option(label))
            .unwrap_or(false);
        if !offered {
            tracing::debug!(question_id, label, "ignoring selection of unknown option");
            return;
        }
        self.answers
            .record(question_id, Answer::Choice(label.to_string()));
        self.sync.save_now(question_id, label);
    }

    /// Store free text; the save goes out once typing pauses.
    pub fn update_open_answer(&mut self, question_id: &str, text: &str) {
        let is_open = matches!(
            self.quiz.question(question_id).map(|q| &q.kind),
            Some(QuestionKind::Open)
        );
        if !is_open {
            return;
        }
        self.answers
            .record(question_id, Answer::Text(text.to_string()));
        self.sync.save_debounced(question_id, text);
    }

    pub fn begin_submit(&self) -> Result<SubmitPrompt, SubmitError> {
        let answered = self.answers.choice_count();
        if answered == 0 {
            return Err(SubmitError::NoChoiceAnswers);
        }
        Ok(SubmitPrompt {
            answered,
            total: self.quiz.total(),
        })
    }

    /// Send the selected options for scoring. Free-text answers are not part
    /// of the submission; they reach the server through saves.
    pub fn confirm_submit(&mut self, prompt: SubmitPrompt) {
        let snapshot = self.answers.choice_snapshot();
        tracing::debug!(
            confirmed = prompt.answered,
            sending = snapshot.len(),
            "submit confirmed"
        );
        self.submitting = true;
        self.sync.submit(snapshot);
    }

    pub fn submit_with<F>(&mut self, confirm: F) -> Result<SubmitOutcome, SubmitError>
    where
        F: FnOnce(&SubmitPrompt) -> bool,
    {
        let prompt = self.begin_submit()?;
        if !confirm(&prompt) {
            return Ok(SubmitOutcome::Cancelled);
        }
        self.confirm_submit(prompt);
        Ok(SubmitOutcome::Sent)
    }

    pub fn handle_event(&mut self, event: SyncEvent, now: Instant) {
        match event {
            SyncEvent::Saved {
                question_id,
                receipt,
            } => {
                self.progress.recompute(&self.quiz.questions, &self.answers);
                let text = match receipt.saved_at {
                    Some(saved_at) => format!("Saved at {}", format_saved_at(&saved_at)),
                    None => "Saved".to_string(),
                };
                self.notices.insert(
                    question_id,
                    SaveNotice {
                        text,
                        shown_at: now,
                    },
                );
            }
            SyncEvent::SaveFailed { question_id, error } => {
                // The local answer stands either way, so the grid follows it.
                self.progress.recompute(&self.quiz.questions, &self.answers);
                tracing::warn!(question_id, %error, "failed to save answer");
            }
            SyncEvent::Submitted(response) => {
                let view = ResultsView::from_response(&response);
                tracing::info!(
                    quiz_file = %self.quiz.quiz_file,
                    score = %view.summary.headline(),
                    "quiz scored"
                );
                self.results = Some(view);
                self.layout = PageLayout::after_submit(self.nav.mode());
                self.submitting = false;
            }
            SyncEvent::SubmitFailed(error) => {
                tracing::warn!(%error, "submit failed");
                self.alert = Some(SUBMIT_FAILED_ALERT.to_string());
                self.submitting = false;
            }
        }
    }

    pub fn notice(&self, question_id: &str) -> Option<&SaveNotice> {
        self.notices.get(question_id)
    }

    /// Most recent notice still on screen.
    pub fn latest_notice(&self) -> Option<&SaveNotice> {
        self.notices.values().max_by_key(|n| n.shown_at)
    }

    pub fn prune_notices(&mut self, now: Instant) {
        self.notices
            .retain(|_, n| now.saturating_duration_since(n.shown_at) < NOTICE_TTL);
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

/// Render the server's timestamp as a wall-clock time, or as-is when it is
/// not in a format we know.
fn format_saved_at(raw: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%H:%M:%S").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%H:%M:%S").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_at_is_shown_as_time_of_day() {
        assert_eq!(format_saved_at("2024-05-01T12:34:56.123456"), "12:34:56");
        assert_eq!(format_saved_at("2024-05-01T08:00:01"), "08:00:01");
        assert_eq!(format_saved_at("2024-05-01T08:00:01+02:00"), "08:00:01");
        assert_eq!(format_saved_at("just now"), "just now");
    }

    #[test]
    fn prompt_message_counts_answers() {
        let prompt = SubmitPrompt {
            answered: 2,
            total: 5,
        };
        assert_eq!(prompt.message(), "You answered 2 of 5 questions. Submit now?");
    }
}
